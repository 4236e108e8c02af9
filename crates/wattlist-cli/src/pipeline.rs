//! Build orchestration: read inputs, reconcile, derive, render, splice, and
//! write the output document atomically.
//!
//! Failure policy follows the input's weight. The catalog is load-bearing:
//! any read or parse failure aborts the run and the previous output document
//! is left untouched. The price feed is not: failures are logged and the run
//! continues with catalog-only prices.

use std::fs;
use std::path::Path;

use anyhow::Context;
use chrono::Utc;
use serde::Serialize;
use uuid::Uuid;

use wattlist_core::{derive, AppConfig, CanonicalProduct, DerivedFields, Vocab};
use wattlist_ingest::{
    load_or_default, normalize_catalog, parse_price_feed, reconcile, AliasTable, IngestError,
    RawPriceEntry, ReconcileReport,
};
use wattlist_render::{apply, render_rows, Mutation};

/// Outcome of one run, surfaced to the operator by `main`.
#[derive(Debug, Clone, Copy)]
pub(crate) struct BuildSummary {
    pub products: usize,
    pub matched: usize,
    pub updated: usize,
    pub priced: usize,
}

/// One merged record in the JSON data artifact.
#[derive(Serialize)]
struct DataRecord<'a> {
    #[serde(flatten)]
    product: &'a CanonicalProduct,
    derived: &'a DerivedFields,
}

/// Full pipeline: inputs → reconciled records → mutated host document.
pub(crate) fn run_build(config: &AppConfig) -> anyhow::Result<BuildSummary> {
    let run_id = Uuid::new_v4();
    tracing::info!(%run_id, catalog = %config.catalog_path.display(), "starting build");

    let (records, report) = assemble_records(config)?;

    let document = fs::read_to_string(&config.site_path).with_context(|| {
        format!("failed to read host template {}", config.site_path.display())
    })?;

    let mutation = Mutation {
        rows_html: render_rows(&records),
        product_count: records.len(),
        generated_at: Utc::now(),
    };
    let output = apply(&document, &mutation)?;

    write_atomic(&config.output_path, &output)?;

    if let Some(data_path) = &config.data_path {
        write_data_artifact(data_path, &records)?;
    }

    let summary = summarize(&records, report);
    tracing::info!(
        %run_id,
        products = summary.products,
        matched = summary.matched,
        updated = summary.updated,
        priced = summary.priced,
        output = %config.output_path.display(),
        "build complete"
    );

    Ok(summary)
}

/// Dry run: same ingestion and derivation, nothing written.
pub(crate) fn run_check(config: &AppConfig) -> anyhow::Result<BuildSummary> {
    let (records, report) = assemble_records(config)?;
    Ok(summarize(&records, report))
}

fn assemble_records(
    config: &AppConfig,
) -> anyhow::Result<(Vec<(CanonicalProduct, DerivedFields)>, ReconcileReport)> {
    let catalog_text = fs::read_to_string(&config.catalog_path).with_context(|| {
        format!("failed to read catalog {}", config.catalog_path.display())
    })?;
    let catalog = normalize_catalog(&catalog_text, &AliasTable::default())?;

    let feed = load_feed(&config.feed_path);
    let (merged, report) = reconcile(&catalog, &feed);

    let vocab = match &config.vocab_path {
        Some(path) => wattlist_core::load_vocab(path)?,
        None => Vocab::builtin(),
    };

    let records = merged
        .into_iter()
        .map(|product| {
            let derived = derive(&product, &vocab, config.ppw_decimals);
            (product, derived)
        })
        .collect();

    Ok((records, report))
}

/// Reads and parses the price feed, degrading to an empty feed on any
/// failure. The read error is folded into the same recoverable variant the
/// parser uses, so one policy covers both.
fn load_feed(path: &Path) -> Vec<RawPriceEntry> {
    let result = fs::read_to_string(path)
        .map_err(|e| IngestError::PriceFeedUnavailable {
            reason: format!("{}: {e}", path.display()),
        })
        .and_then(|text| parse_price_feed(&text));
    load_or_default("price feed", result, Vec::new())
}

fn summarize(
    records: &[(CanonicalProduct, DerivedFields)],
    report: ReconcileReport,
) -> BuildSummary {
    BuildSummary {
        products: records.len(),
        matched: report.matched,
        updated: report.updated,
        priced: records.iter().filter(|(p, _)| p.has_price()).count(),
    }
}

/// Writes via a sibling temp file plus rename, so a failed run can never
/// leave a half-written document that looks successful.
fn write_atomic(path: &Path, contents: &str) -> anyhow::Result<()> {
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .with_context(|| format!("output path {} has no file name", path.display()))?;
    let tmp = path.with_file_name(format!("{file_name}.tmp"));

    fs::write(&tmp, contents)
        .with_context(|| format!("failed to write {}", tmp.display()))?;
    fs::rename(&tmp, path)
        .with_context(|| format!("failed to move {} into place", path.display()))?;

    Ok(())
}

fn write_data_artifact(
    path: &Path,
    records: &[(CanonicalProduct, DerivedFields)],
) -> anyhow::Result<()> {
    let data: Vec<DataRecord<'_>> = records
        .iter()
        .map(|(product, derived)| DataRecord { product, derived })
        .collect();

    let json = serde_json::to_string_pretty(&data).context("failed to serialize data artifact")?;
    write_atomic(path, &json)?;

    tracing::debug!(path = %path.display(), records = records.len(), "wrote data artifact");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const CATALOG: &str = "\
asin,title,affiliate_link,output_wattage,starting_wattage,battery_capacity,fuel_type,engine_type,condition,link_text,price
B00HONDA001,Honda EU2200i,https://www.amazon.com/dp/B00HONDA001?tag=s-20,1800,2200,,Gas,Inverter,New,Buy Now,$1049.00
B00JACK0001,Jackery Explorer 500,https://www.amazon.com/dp/B00JACK0001?tag=s-20,500,1000,518,Electric,,New,Buy Now,
";

    const FEED: &str = r#"[
  {"asin": "B00JACK0001", "price": 419.99, "last_updated": "2025-08-01T06:00:00Z"},
  {"asin": "B00HONDA001", "price": "N/A", "last_updated": "2025-08-01T06:00:00Z"}
]"#;

    const TEMPLATE: &str = "<html><body>\n\
        <span id=\"update-timestamp\">never</span>\n\
        <span id=\"product-count\">0</span>\n\
        <table><tbody id=\"product-rows\">\n</tbody></table>\n\
        </body></html>";

    fn test_config(dir: &Path) -> AppConfig {
        AppConfig {
            catalog_path: dir.join("products.csv"),
            feed_path: dir.join("prices.json"),
            site_path: dir.join("index.html"),
            output_path: dir.join("index.html"),
            data_path: Some(dir.join("products-data.json")),
            vocab_path: None,
            ppw_decimals: 3,
            log_level: "info".to_string(),
        }
    }

    fn write_inputs(dir: &Path) {
        fs::write(dir.join("products.csv"), CATALOG).expect("write catalog");
        fs::write(dir.join("prices.json"), FEED).expect("write feed");
        fs::write(dir.join("index.html"), TEMPLATE).expect("write template");
    }

    #[test]
    fn build_end_to_end() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_inputs(dir.path());
        let config = test_config(dir.path());

        let summary = run_build(&config).expect("build should succeed");
        assert_eq!(summary.products, 2);
        assert_eq!(summary.matched, 2);
        // Honda's feed entry is the N/A sentinel; only Jackery updates.
        assert_eq!(summary.updated, 1);
        assert_eq!(summary.priced, 2);

        let output = fs::read_to_string(config.output_path).expect("read output");
        // Feed price accepted for Jackery, catalog price kept for Honda.
        assert!(output.contains("$419.99"));
        assert!(output.contains("$1049.00"));
        assert!(output.contains("<span id=\"product-count\">2</span>"));

        let artifact = fs::read_to_string(dir.path().join("products-data.json"))
            .expect("read data artifact");
        assert!(artifact.contains("\"key\": \"B00HONDA001\""));
        assert!(artifact.contains("\"price_per_watt\""));
    }

    #[test]
    fn build_degrades_without_feed() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_inputs(dir.path());
        fs::remove_file(dir.path().join("prices.json")).expect("remove feed");
        let config = test_config(dir.path());

        let summary = run_build(&config).expect("build should degrade, not abort");
        assert_eq!(summary.products, 2);
        assert_eq!(summary.matched, 0);
        assert_eq!(summary.updated, 0);
        // Honda keeps its catalog price even with no feed at all.
        assert_eq!(summary.priced, 1);
    }

    #[test]
    fn build_aborts_without_catalog_and_leaves_output_untouched() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_inputs(dir.path());
        fs::remove_file(dir.path().join("products.csv")).expect("remove catalog");
        let config = test_config(dir.path());

        let err = run_build(&config).unwrap_err();
        assert!(err.to_string().contains("catalog"));

        let output = fs::read_to_string(dir.path().join("index.html")).expect("read output");
        assert_eq!(output, TEMPLATE);
    }

    #[test]
    fn build_aborts_on_malformed_catalog_header() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_inputs(dir.path());
        fs::write(dir.path().join("products.csv"), ",,,\n").expect("write bad catalog");
        let config = test_config(dir.path());

        assert!(run_build(&config).is_err());
    }

    #[test]
    fn build_aborts_on_missing_anchor() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_inputs(dir.path());
        fs::write(dir.path().join("index.html"), "<html><body></body></html>")
            .expect("write bad template");
        let config = test_config(dir.path());

        let err = run_build(&config).unwrap_err();
        assert!(err.to_string().contains("anchor not found"));
    }

    #[test]
    fn rebuild_on_own_output_succeeds() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_inputs(dir.path());
        let config = test_config(dir.path());

        run_build(&config).expect("first build");
        let first = fs::read_to_string(dir.path().join("index.html")).expect("read output");

        run_build(&config).expect("second build");
        let second = fs::read_to_string(dir.path().join("index.html")).expect("read output");

        // Only the timestamp zone may differ between the two generations.
        assert_eq!(
            first.replace(|c: char| c.is_ascii_digit(), "#"),
            second.replace(|c: char| c.is_ascii_digit(), "#")
        );
    }

    #[test]
    fn check_writes_nothing() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_inputs(dir.path());
        let config = test_config(dir.path());

        let summary = run_check(&config).expect("check should succeed");
        assert_eq!(summary.products, 2);

        let output = fs::read_to_string(dir.path().join("index.html")).expect("read output");
        assert_eq!(output, TEMPLATE, "check must not touch the document");
        assert!(!dir.path().join("products-data.json").exists());
    }

    #[test]
    fn write_atomic_replaces_and_cleans_up() {
        let dir = tempfile::tempdir().expect("tempdir");
        let target = dir.path().join("out.html");
        fs::write(&target, "old").expect("seed target");

        write_atomic(&target, "new").expect("atomic write");
        assert_eq!(fs::read_to_string(&target).expect("read target"), "new");
        assert!(!dir.path().join("out.html.tmp").exists());
    }
}

//! Starter host template for `wattlist init`.
//!
//! The template carries exactly the anchor set the mutator targets, plus the
//! table head matching the row renderer's column layout. The browser-side
//! sort/filter script is delivered separately and referenced, never inlined,
//! so regeneration has nothing to deduplicate.

use std::fs;
use std::path::Path;

use anyhow::Context;

pub(crate) const STARTER_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Generator Price Comparison</title>
    <style>
        body { font-family: Arial, sans-serif; margin: 0; padding: 20px; background-color: #f5f5f5; }
        .container { max-width: 1200px; margin: 0 auto; }
        h1 { text-align: center; color: #333; }
        .last-updated { text-align: center; color: #666; margin-bottom: 20px; }
        .product-table { width: 100%; border-collapse: collapse; background: white; }
        .product-table th, .product-table td { padding: 10px 12px; border-bottom: 1px solid #eee; text-align: left; }
        .product-name a { color: #333; font-weight: bold; text-decoration: none; }
        .price { font-size: 18px; font-weight: bold; color: #e47911; }
        .buy-link { background: #ff9900; color: white; padding: 8px 16px; text-decoration: none; border-radius: 4px; }
        .buy-link:hover { background: #e88700; }
    </style>
    <script src="table-sort.js" defer></script>
</head>
<body>
    <div class="container">
        <h1>Generator Price Comparison</h1>
        <p class="last-updated">Last updated: <span id="update-timestamp">never</span>
           &middot; <span id="product-count">0</span> products tracked</p>
        <table class="product-table">
            <thead>
                <tr>
                    <th>Product</th>
                    <th>Running W</th>
                    <th>Starting W</th>
                    <th>Capacity Wh</th>
                    <th>Fuel</th>
                    <th>Engine</th>
                    <th>Condition</th>
                    <th>Price</th>
                    <th>$/W</th>
                    <th></th>
                </tr>
            </thead>
            <tbody id="product-rows">
            </tbody>
        </table>
    </div>
</body>
</html>
"#;

/// Writes the starter template. Refuses to overwrite: an existing document
/// is a previous generation's output, not ours to clobber.
pub(crate) fn write_starter_template(path: &Path) -> anyhow::Result<()> {
    anyhow::ensure!(
        !path.exists(),
        "refusing to overwrite existing {}",
        path.display()
    );

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
    }

    fs::write(path, STARTER_TEMPLATE)
        .with_context(|| format!("failed to write {}", path.display()))?;

    tracing::info!(path = %path.display(), "wrote starter template");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use wattlist_render::{apply, Mutation, COUNT_ANCHOR_ID, ROWS_ANCHOR_ID, TIMESTAMP_ANCHOR_ID};

    #[test]
    fn starter_template_carries_every_anchor() {
        for anchor in [ROWS_ANCHOR_ID, TIMESTAMP_ANCHOR_ID, COUNT_ANCHOR_ID] {
            assert!(
                STARTER_TEMPLATE.contains(&format!("id=\"{anchor}\"")),
                "starter template is missing #{anchor}"
            );
        }
    }

    #[test]
    fn starter_template_accepts_a_mutation() {
        let mutation = Mutation {
            rows_html: "<tr><td>x</td></tr>".to_string(),
            product_count: 1,
            generated_at: chrono::Utc::now(),
        };
        assert!(apply(STARTER_TEMPLATE, &mutation).is_ok());
    }

    #[test]
    fn init_writes_once_then_refuses() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("public").join("index.html");

        write_starter_template(&path).expect("first init should write");
        assert!(path.exists());

        let err = write_starter_template(&path).unwrap_err();
        assert!(err.to_string().contains("refusing to overwrite"));
    }
}

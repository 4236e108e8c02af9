//! Row fragment rendering.
//!
//! One `<tr>` per record, carrying the machine-readable `data-*` attribute
//! set the client-side sort/filter script keys on. Output order always
//! equals input order; sorting is a presentation concern and happens in the
//! browser, never here.
//!
//! Free text (names, URLs) is inserted as-is: the catalog and feed are
//! operator-owned inputs, not arbitrary third-party text. See DESIGN.md.

use wattlist_core::{CanonicalProduct, DerivedFields};

/// Renders one table row.
///
/// The name column is structurally distinct (`class="product-name"`) from
/// the plain data columns so the stylesheet can target it; the price and
/// price-per-watt columns keep their long-standing classes.
#[must_use]
pub fn render_row(product: &CanonicalProduct, derived: &DerivedFields) -> String {
    let name_cell = match product.link.as_deref().or(product.affiliate_url.as_deref()) {
        Some(link) => format!("<a href=\"{link}\">{}</a>", product.display_name),
        None => product.display_name.clone(),
    };

    let buy_cell = match product.affiliate_url.as_deref().or(product.link.as_deref()) {
        Some(link) => format!(
            "<a class=\"buy-link\" href=\"{link}\" target=\"_blank\" rel=\"nofollow sponsored\">{}</a>",
            product.link_text
        ),
        None => String::new(),
    };

    format!(
        concat!(
            "<tr data-key=\"{key}\" data-tier=\"{tier}\" data-condition=\"{condition}\"",
            " data-capacity=\"{capacity}\" data-wattage=\"{wattage}\"",
            " data-fuel-type=\"{fuel}\" data-brand=\"{brand}\">\n",
            "    <td class=\"product-name\">{name}</td>\n",
            "    <td>{wattage}</td>\n",
            "    <td>{starting}</td>\n",
            "    <td>{capacity}</td>\n",
            "    <td>{fuel}</td>\n",
            "    <td>{engine}</td>\n",
            "    <td>{condition_display}</td>\n",
            "    <td class=\"price\">{price}</td>\n",
            "    <td class=\"price-per-watt\">{ppw}</td>\n",
            "    <td class=\"buy\">{buy}</td>\n",
            "</tr>"
        ),
        key = product.key,
        tier = derived.tier,
        condition = product.condition.to_lowercase(),
        capacity = fmt_quantity(product.capacity_wh),
        wattage = fmt_quantity(product.running_wattage),
        fuel = derived.fuel_type,
        brand = derived.brand,
        name = name_cell,
        starting = fmt_quantity(product.starting_wattage),
        engine = product.engine_type,
        condition_display = product.condition,
        price = derived.formatted_price,
        ppw = derived.price_per_watt,
        buy = buy_cell,
    )
}

/// Renders the whole record set, one row per line group, in input order.
#[must_use]
pub fn render_rows(records: &[(CanonicalProduct, DerivedFields)]) -> String {
    records
        .iter()
        .map(|(product, derived)| render_row(product, derived))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Formats a wattage/capacity value for display and `data-*` attributes:
/// whole numbers lose the trailing `.0`, fractional values print as-is.
fn fmt_quantity(value: f64) -> String {
    if value.fract().abs() < f64::EPSILON {
        format!("{value:.0}")
    } else {
        format!("{value}")
    }
}

use std::fmt::Write as _;

use salvage_core::SalvageItem;
use salvage_core::core_api::{AnalysisResponse, BuildableItem, Material, MissingMaterial, UnknownItem};
use salvage_core::efficiency::EfficiencyTier;
use serde_json::{Map as JsonMap, Value as JsonValue};

const MATERIAL_COL_WIDTH_NAME: usize = 30;
const MATERIAL_COL_WIDTH_QTY: usize = 14;
const MATERIAL_COL_WIDTH_PRICE: usize = 18;
const MATERIAL_COL_WIDTH_TOTAL: usize = 22;
const ITEM_NAME_WIDTH: usize = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonStyle {
    #[default]
    CanonicalV1,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextRenderOptions {
    /// Also list missing materials under each buildable item.
    pub verbose: bool,
}

pub fn render_items_text(items: &[SalvageItem]) -> String {
    let mut out = String::new();
    writeln!(&mut out, " ::: Current Items :::").expect("writing to String cannot fail");
    if items.is_empty() {
        writeln!(&mut out, "  none").expect("writing to String cannot fail");
        return out;
    }
    for item in items {
        writeln!(
            &mut out,
            "  {} \u{d7}{}",
            fit_column(&item.name, ITEM_NAME_WIDTH),
            format_quantity(i64::from(item.quantity))
        )
        .expect("writing to String cannot fail");
    }
    out
}

pub fn render_items_json(items: &[SalvageItem]) -> JsonValue {
    JsonValue::Array(
        items
            .iter()
            .map(|item| {
                let mut m = JsonMap::new();
                m.insert("name".to_string(), JsonValue::String(item.name.clone()));
                m.insert("quantity".to_string(), JsonValue::from(item.quantity));
                JsonValue::Object(m)
            })
            .collect(),
    )
}

pub fn render_analysis_json(response: &AnalysisResponse, style: JsonStyle) -> JsonValue {
    match style {
        JsonStyle::CanonicalV1 => JsonValue::Object(analysis_json(response)),
    }
}

pub fn render_analysis_text(response: &AnalysisResponse, options: TextRenderOptions) -> String {
    let mut out = String::new();

    let efficiency = response.reprocessing_efficiency_used;
    writeln!(&mut out, " ::: Reprocessing :::").expect("writing to String cannot fail");
    writeln!(
        &mut out,
        "  Efficiency: {:.2}% ({})",
        efficiency * 100.0,
        EfficiencyTier::from_value(efficiency).label()
    )
    .expect("writing to String cannot fail");

    if response.is_empty() {
        writeln!(&mut out).expect("writing to String cannot fail");
        writeln!(&mut out, "  No results").expect("writing to String cannot fail");
        return out;
    }

    if !response.materials.is_empty() {
        writeln!(&mut out).expect("writing to String cannot fail");
        write_materials_section(&mut out, &response.materials, response.total_material_value);
    }
    if !response.buildable_items.is_empty() {
        writeln!(&mut out).expect("writing to String cannot fail");
        write_buildable_section(&mut out, &response.buildable_items, options);
    }
    if !response.unknown_items.is_empty() {
        writeln!(&mut out).expect("writing to String cannot fail");
        write_unknown_section(&mut out, &response.unknown_items);
    }

    out
}

fn analysis_json(response: &AnalysisResponse) -> JsonMap<String, JsonValue> {
    let mut out = JsonMap::new();

    out.insert(
        "reprocessing_efficiency_used".to_string(),
        JsonValue::from(response.reprocessing_efficiency_used),
    );
    out.insert(
        "efficiency_label".to_string(),
        JsonValue::String(
            EfficiencyTier::from_value(response.reprocessing_efficiency_used)
                .label()
                .to_string(),
        ),
    );
    out.insert(
        "materials".to_string(),
        JsonValue::Array(response.materials.iter().map(material_to_json).collect()),
    );
    out.insert(
        "total_material_value".to_string(),
        JsonValue::from(response.total_material_value),
    );
    out.insert(
        "buildable_items".to_string(),
        JsonValue::Array(
            response
                .buildable_items
                .iter()
                .map(buildable_to_json)
                .collect(),
        ),
    );
    out.insert(
        "unknown_items".to_string(),
        JsonValue::Array(
            response
                .unknown_items
                .iter()
                .map(|item| {
                    let mut m = JsonMap::new();
                    m.insert("name".to_string(), JsonValue::String(item.name.clone()));
                    m.insert("quantity".to_string(), JsonValue::from(item.quantity));
                    JsonValue::Object(m)
                })
                .collect(),
        ),
    );

    out
}

fn material_to_json(material: &Material) -> JsonValue {
    let mut m = JsonMap::new();
    m.insert("type_id".to_string(), JsonValue::from(material.type_id));
    m.insert("name".to_string(), JsonValue::String(material.name.clone()));
    m.insert("quantity".to_string(), JsonValue::from(material.quantity));
    m.insert(
        "unit_price".to_string(),
        match material.unit_price {
            Some(v) => JsonValue::from(v),
            None => JsonValue::Null,
        },
    );
    m.insert(
        "total_value".to_string(),
        JsonValue::from(material.total_value),
    );
    JsonValue::Object(m)
}

fn buildable_to_json(item: &BuildableItem) -> JsonValue {
    let mut m = JsonMap::new();
    m.insert(
        "product_type_id".to_string(),
        JsonValue::from(item.product_type_id),
    );
    m.insert(
        "product_name".to_string(),
        JsonValue::String(item.product_name.clone()),
    );
    m.insert(
        "match_percentage".to_string(),
        JsonValue::from(item.match_percentage),
    );
    m.insert("can_build".to_string(), JsonValue::Bool(item.can_build));
    m.insert(
        "estimated_profit".to_string(),
        JsonValue::from(item.estimated_profit),
    );
    m.insert(
        "profit_margin".to_string(),
        JsonValue::from(item.profit_margin),
    );
    m.insert(
        "product_price".to_string(),
        JsonValue::from(item.product_price),
    );
    m.insert(
        "material_cost".to_string(),
        JsonValue::from(item.material_cost),
    );
    m.insert(
        "missing_materials".to_string(),
        JsonValue::Array(item.missing_materials.iter().map(missing_to_json).collect()),
    );
    JsonValue::Object(m)
}

fn missing_to_json(missing: &MissingMaterial) -> JsonValue {
    let mut m = JsonMap::new();
    m.insert("type_id".to_string(), JsonValue::from(missing.type_id));
    m.insert("name".to_string(), JsonValue::String(missing.name.clone()));
    m.insert("needed".to_string(), JsonValue::from(missing.needed));
    m.insert("available".to_string(), JsonValue::from(missing.available));
    m.insert("missing".to_string(), JsonValue::from(missing.missing));
    m.insert(
        "cost_to_buy".to_string(),
        JsonValue::from(missing.cost_to_buy),
    );
    JsonValue::Object(m)
}

fn write_materials_section(out: &mut String, materials: &[Material], total_value: f64) {
    writeln!(out, " ::: Reprocessed Materials :::").expect("writing to String cannot fail");
    let header = format!(
        "  {:<a$}{:>b$}{:>c$}{:>d$}",
        "Material",
        "Quantity",
        "Unit Price",
        "Total Value",
        a = MATERIAL_COL_WIDTH_NAME,
        b = MATERIAL_COL_WIDTH_QTY,
        c = MATERIAL_COL_WIDTH_PRICE,
        d = MATERIAL_COL_WIDTH_TOTAL
    );
    writeln!(out, "{header}").expect("writing to String cannot fail");

    for material in materials {
        let unit_price = material
            .unit_price
            .map(format_isk)
            .unwrap_or_else(|| "-".to_string());
        let line = format!(
            "  {:<a$}{:>b$}{:>c$}{:>d$}",
            fit_column(&material.name, MATERIAL_COL_WIDTH_NAME - 1),
            format_quantity(material.quantity),
            unit_price,
            format_isk(material.total_value),
            a = MATERIAL_COL_WIDTH_NAME,
            b = MATERIAL_COL_WIDTH_QTY,
            c = MATERIAL_COL_WIDTH_PRICE,
            d = MATERIAL_COL_WIDTH_TOTAL
        );
        writeln!(out, "{line}").expect("writing to String cannot fail");
    }

    let label_width = MATERIAL_COL_WIDTH_NAME + MATERIAL_COL_WIDTH_QTY + MATERIAL_COL_WIDTH_PRICE;
    writeln!(
        out,
        "  {:>a$}{:>d$}",
        "Total Material Value:",
        format_isk(total_value),
        a = label_width,
        d = MATERIAL_COL_WIDTH_TOTAL
    )
    .expect("writing to String cannot fail");
}

fn write_buildable_section(out: &mut String, items: &[BuildableItem], options: TextRenderOptions) {
    writeln!(out, " ::: Buildable Items :::").expect("writing to String cannot fail");

    for (index, item) in items.iter().enumerate() {
        if index > 0 {
            writeln!(out).expect("writing to String cannot fail");
        }
        let status = if item.can_build {
            "Can Build"
        } else {
            "Missing Materials"
        };
        writeln!(out, "  {}", fit_column(&item.product_name, ITEM_NAME_WIDTH))
            .expect("writing to String cannot fail");
        writeln!(
            out,
            "    Match: {:.0}%   Status: {}",
            item.match_percentage, status
        )
        .expect("writing to String cannot fail");
        writeln!(
            out,
            "    Profit: {} ({:.1}% margin)",
            format_isk(item.estimated_profit),
            item.profit_margin
        )
        .expect("writing to String cannot fail");
        writeln!(
            out,
            "    Product: {}   Materials: {}",
            format_isk(item.product_price),
            format_isk(item.material_cost)
        )
        .expect("writing to String cannot fail");

        if options.verbose && !item.missing_materials.is_empty() {
            writeln!(out, "    Missing Materials:").expect("writing to String cannot fail");
            for missing in &item.missing_materials {
                writeln!(
                    out,
                    "      {}: Need {}, Missing {} ({} to buy)",
                    missing.name,
                    format_quantity(missing.needed),
                    format_quantity(missing.missing),
                    format_isk(missing.cost_to_buy)
                )
                .expect("writing to String cannot fail");
            }
        }
    }
}

fn write_unknown_section(out: &mut String, items: &[UnknownItem]) {
    writeln!(out, " ::: Unknown Items (Cannot Reprocess) :::")
        .expect("writing to String cannot fail");
    for item in items {
        writeln!(
            out,
            "  {} \u{d7}{}",
            fit_column(&item.name, ITEM_NAME_WIDTH),
            format_quantity(item.quantity)
        )
        .expect("writing to String cannot fail");
    }
}

fn fit_column(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        return value.to_string();
    }
    if width <= 3 {
        return value.chars().take(width).collect();
    }

    let mut out = String::with_capacity(width);
    for ch in value.chars().take(width - 3) {
        out.push(ch);
    }
    out.push_str("...");
    out
}

/// `1306596.0` renders as `1,306,596.00 ISK`.
pub fn format_isk(value: f64) -> String {
    let cents = (value.abs() * 100.0).round() as u64;
    let sign = if value < 0.0 && cents > 0 { "-" } else { "" };
    format!(
        "{sign}{}.{:02} ISK",
        format_number_with_commas(cents / 100),
        cents % 100
    )
}

pub fn format_quantity(n: i64) -> String {
    if n < 0 {
        return format!("-{}", format_number_with_commas(n.unsigned_abs()));
    }
    format_number_with_commas(n.unsigned_abs())
}

fn format_number_with_commas(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    for (i, c) in s.chars().enumerate() {
        if i > 0 && (s.len() - i).is_multiple_of(3) {
            result.push(',');
        }
        result.push(c);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn isk_formatting() {
        assert_eq!(format_isk(13065.96), "13,065.96 ISK");
        assert_eq!(format_isk(0.0), "0.00 ISK");
        assert_eq!(format_isk(-12000.0), "-12,000.00 ISK");
        assert_eq!(format_isk(-0.001), "0.00 ISK");
        assert_eq!(format_isk(999.999), "1,000.00 ISK");
    }

    #[test]
    fn quantity_formatting() {
        assert_eq!(format_quantity(0), "0");
        assert_eq!(format_quantity(999), "999");
        assert_eq!(format_quantity(12500), "12,500");
        assert_eq!(format_quantity(-1234567), "-1,234,567");
    }

    #[test]
    fn fit_column_truncates_with_ellipsis() {
        assert_eq!(fit_column("Tritanium", 20), "Tritanium");
        assert_eq!(fit_column("Contaminated Nanite Compound", 12), "Contamina...");
    }
}

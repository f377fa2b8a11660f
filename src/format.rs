//! Display formatting for KPI values and chart labels.

use crate::data::model::DimensionValue;
use crate::pipeline::{Dimension, KpiSet};

/// Shown when a metric has no value (e.g. average discount of nothing).
pub const PLACEHOLDER: &str = "–";

/// `1234.5` → `"$1,234.50"`. Negative amounts keep the sign after the
/// currency symbol: `"$-12.00"`.
pub fn format_currency(v: f64) -> String {
    if !v.is_finite() {
        return PLACEHOLDER.to_string();
    }
    format!("${}", group_thousands(&format!("{v:.2}")))
}

/// Fraction to percent with two decimals: `0.1234` → `"12.34%"`.
pub fn format_percent(v: f64) -> String {
    if !v.is_finite() {
        return PLACEHOLDER.to_string();
    }
    let pct = v * 100.0;
    let pct = if pct == 0.0 { 0.0 } else { pct }; // normalize `-0.0`
    format!("{pct:.2}%")
}

/// Insert `,` every three digits of the integer part of a formatted number.
fn group_thousands(formatted: &str) -> String {
    let (sign, rest) = match formatted.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", formatted),
    };
    let (int_part, frac_part) = match rest.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (rest, None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    match frac_part {
        Some(f) => format!("{sign}{grouped}.{f}"),
        None => format!("{sign}{grouped}"),
    }
}

/// The three KPI tiles as `(label, value)` pairs, in display order.
pub fn kpi_labels(kpis: &KpiSet) -> [(&'static str, String); 3] {
    [
        ("Total Sales", format_currency(kpis.total_sales)),
        ("Total Profit", format_currency(kpis.total_profit)),
        (
            "Average Discount",
            kpis.avg_discount
                .map(format_percent)
                .unwrap_or_else(|| PLACEHOLDER.to_string()),
        ),
    ]
}

/// Axis / legend label for a summary key. Discount rates read as percents.
pub fn key_label(dimension: Dimension, key: &DimensionValue) -> String {
    match (dimension, key) {
        (Dimension::DiscountAnalysis, DimensionValue::Float(v)) => {
            let label = format_percent(*v);
            // "10.00%" → "10%", "12.50%" → "12.5%"
            let number = label.trim_end_matches('%');
            let number = if number.contains('.') {
                number.trim_end_matches('0').trim_end_matches('.')
            } else {
                number
            };
            format!("{number}%")
        }
        _ => key.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn currency_has_two_decimals_and_grouping() {
        assert_eq!(format_currency(0.0), "$0.00");
        assert_eq!(format_currency(100.0), "$100.00");
        assert_eq!(format_currency(1234.5), "$1,234.50");
        assert_eq!(format_currency(1234567.891), "$1,234,567.89");
        assert_eq!(format_currency(-9876.5), "$-9,876.50");
    }

    #[test]
    fn percent_has_two_decimals() {
        assert_eq!(format_percent(0.1), "10.00%");
        assert_eq!(format_percent(0.1234), "12.34%");
        assert_eq!(format_percent(-0.0), "0.00%");
    }

    #[test]
    fn non_finite_values_render_placeholder() {
        assert_eq!(format_currency(f64::NAN), PLACEHOLDER);
        assert_eq!(format_percent(f64::INFINITY), PLACEHOLDER);
    }

    #[test]
    fn kpi_labels_render_missing_discount() {
        let labels = kpi_labels(&KpiSet {
            total_sales: 100.0,
            total_profit: 10.0,
            avg_discount: None,
        });
        assert_eq!(labels[0], ("Total Sales", "$100.00".to_string()));
        assert_eq!(labels[2].1, PLACEHOLDER);

        let labels = kpi_labels(&KpiSet {
            avg_discount: Some(0.1),
            ..KpiSet::default()
        });
        assert_eq!(labels[2].1, "10.00%");
    }

    #[test]
    fn discount_keys_read_as_short_percents() {
        let d = Dimension::DiscountAnalysis;
        assert_eq!(key_label(d, &DimensionValue::Float(0.1)), "10%");
        assert_eq!(key_label(d, &DimensionValue::Float(0.125)), "12.5%");
        assert_eq!(key_label(d, &DimensionValue::Float(0.0)), "0%");
        assert_eq!(
            key_label(Dimension::GeographicAnalysis, &DimensionValue::Text("East".into())),
            "East"
        );
    }
}

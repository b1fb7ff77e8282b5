use fincalc_core::format::{format_currency, CurrencyFormat};
use rust_decimal::Decimal;
use serde_json::Value;
use std::io;
use tabled::{builder::Builder, Table};

use crate::OutputFormat;

/// Result fields holding per-period or per-bracket arrays; rendered as
/// their own row tables instead of being inlined into the scalar table.
const SCHEDULE_KEYS: [&str; 4] = ["schedule", "comparison", "bracket_breakdown", "per_bracket"];

/// Priority list for minimal output: the single headline figure per engine.
const MINIMAL_KEYS: [&str; 7] = [
    "monthly_payment",
    "net_annual",
    "total_tax",
    "discounted_price",
    "recovered_original_price",
    "total_depreciation",
    "total_interest",
];

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => print_json(value),
        OutputFormat::Table => print_table(value),
        OutputFormat::Csv => print_csv(value),
        OutputFormat::Minimal => print_minimal(value),
    }
}

// ---------------------------------------------------------------------------
// JSON
// ---------------------------------------------------------------------------

fn print_json(value: &Value) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{}", s),
        Err(e) => eprintln!("JSON serialization error: {}", e),
    }
}

// ---------------------------------------------------------------------------
// Table
// ---------------------------------------------------------------------------

fn print_table(value: &Value) {
    let envelope = value.as_object();
    let result = envelope
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    match result {
        Value::Object(map) => {
            // Scalar fields first, schedules as separate tables after
            let mut builder = Builder::default();
            builder.push_record(["Field", "Value"]);
            for (key, val) in map {
                if SCHEDULE_KEYS.contains(&key.as_str()) {
                    continue;
                }
                builder.push_record([key.as_str(), &format_cell(key, val)]);
            }
            println!("{}", Table::from(builder));

            for key in SCHEDULE_KEYS {
                if let Some(Value::Array(rows)) = map.get(key) {
                    if !rows.is_empty() {
                        println!("\n{}:", key);
                        print_array_table(rows);
                    }
                }
            }
        }
        Value::Array(rows) => print_array_table(rows),
        other => println!("{}", other),
    }

    if let Some(map) = envelope {
        if let Some(Value::Array(warnings)) = map.get("warnings") {
            if !warnings.is_empty() {
                println!("\nWarnings:");
                for w in warnings {
                    if let Value::String(s) = w {
                        println!("  - {}", s);
                    }
                }
            }
        }
        if let Some(Value::String(methodology)) = map.get("methodology") {
            println!("\nMethodology: {}", methodology);
        }
    }
}

fn print_array_table(rows: &[Value]) {
    if rows.is_empty() {
        println!("(empty)");
        return;
    }

    if let Some(Value::Object(first)) = rows.first() {
        let headers: Vec<String> = first.keys().cloned().collect();
        let mut builder = Builder::default();
        builder.push_record(&headers);

        for row in rows {
            if let Value::Object(map) = row {
                let record: Vec<String> = headers
                    .iter()
                    .map(|h| {
                        map.get(h.as_str())
                            .map(|v| format_cell(h, v))
                            .unwrap_or_default()
                    })
                    .collect();
                builder.push_record(record);
            }
        }
        println!("{}", Table::from(builder));
    } else {
        for row in rows {
            println!("{}", format_value(row));
        }
    }
}

// ---------------------------------------------------------------------------
// CSV
// ---------------------------------------------------------------------------

fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    let result = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    match result {
        Value::Object(map) => {
            // A result with a schedule becomes row-per-period CSV, which is
            // what chart/export consumers want; scalar-only results become
            // field/value pairs.
            let schedule = SCHEDULE_KEYS
                .iter()
                .find_map(|key| match map.get(*key) {
                    Some(Value::Array(rows)) if !rows.is_empty() => Some(rows),
                    _ => None,
                });
            match schedule {
                Some(rows) => write_array_csv(&mut wtr, rows),
                None => {
                    let _ = wtr.write_record(["field", "value"]);
                    for (key, val) in map {
                        let _ = wtr.write_record([key.as_str(), &format_value(val)]);
                    }
                }
            }
        }
        Value::Array(rows) => write_array_csv(&mut wtr, rows),
        other => {
            let _ = wtr.write_record([&format_value(other)]);
        }
    }

    let _ = wtr.flush();
}

fn write_array_csv(wtr: &mut csv::Writer<io::StdoutLock<'_>>, rows: &[Value]) {
    if rows.is_empty() {
        return;
    }

    if let Some(Value::Object(first)) = rows.first() {
        let headers: Vec<&str> = first.keys().map(|k| k.as_str()).collect();
        let _ = wtr.write_record(&headers);

        for row in rows {
            if let Value::Object(map) = row {
                let record: Vec<String> = headers
                    .iter()
                    .map(|h| map.get(*h).map(format_value).unwrap_or_default())
                    .collect();
                let _ = wtr.write_record(&record);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Minimal
// ---------------------------------------------------------------------------

fn print_minimal(value: &Value) {
    let result = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    if let Value::Object(map) = result {
        for key in &MINIMAL_KEYS {
            if let Some(val) = map.get(*key) {
                if !val.is_null() {
                    println!("{}", format_value(val));
                    return;
                }
            }
        }
        if let Some((key, val)) = map.iter().next() {
            println!("{}: {}", key, format_value(val));
            return;
        }
    }

    println!("{}", format_value(result));
}

// ---------------------------------------------------------------------------
// Shared
// ---------------------------------------------------------------------------

fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}

/// Table-cell rendering. Monetary fields (Decimal values serialized as
/// strings) get currency formatting; rates, percentages, counts, dates,
/// and enum tags stay raw. CSV and minimal output stay machine-readable.
fn format_cell(key: &str, value: &Value) -> String {
    if let Value::String(s) = value {
        if is_money_key(key) {
            if let Ok(amount) = s.parse::<Decimal>() {
                return format_currency(amount, &CurrencyFormat::default());
            }
        }
    }
    format_value(value)
}

fn is_money_key(key: &str) -> bool {
    !(key.ends_with("rate") || key.ends_with("pct"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_monetary_cells_get_currency_formatting() {
        assert_eq!(
            format_cell("total_tax", &json!("8341.00")),
            "$8,341.00"
        );
        assert_eq!(
            format_cell("monthly_payment", &json!("325.58")),
            "$325.58"
        );
        assert_eq!(
            format_cell("depreciable_base", &json!("-1234.5")),
            "-$1,234.50"
        );
    }

    #[test]
    fn test_rates_and_percentages_stay_raw() {
        assert_eq!(format_cell("marginal_tax_rate", &json!("0.22")), "0.22");
        assert_eq!(format_cell("effective_discount_pct", &json!("28")), "28");
        assert_eq!(format_cell("rate", &json!("0.10")), "0.10");
    }

    #[test]
    fn test_non_decimal_strings_stay_raw() {
        assert_eq!(format_cell("payoff_date", &json!("2034-06-01")), "2034-06-01");
        assert_eq!(format_cell("plan", &json!("standard")), "standard");
        // Counts serialize as JSON numbers, not Decimal strings
        assert_eq!(format_cell("payoff_months", &json!(120)), "120");
    }
}

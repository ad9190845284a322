use serde_json::Value;
use tabled::{builder::Builder, Table};

use super::scalar;

/// Keys holding per-row record lists that read better as their own table
/// under the summary (investor allocations, ledger events, validator
/// findings).
const DETAIL_KEYS: [&str; 4] = ["allocations", "events", "errors", "warnings"];

/// Format output as tables using the tabled crate: scalar fields as a
/// field/value summary, known record lists as sub-tables beneath it.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => {
            // computation envelopes nest the payload under "result"
            if let Some(payload) = map.get("result") {
                print_object(payload);
                if let Some(Value::Array(warnings)) = map.get("warnings") {
                    print_string_list("Warnings", warnings);
                }
                if let Some(Value::String(methodology)) = map.get("methodology") {
                    println!("\nMethodology: {}", methodology);
                }
            } else {
                print_object(value);
            }
        }
        Value::Array(arr) => print_records(arr),
        _ => println!("{}", value),
    }
}

fn print_object(value: &Value) {
    let map = match value {
        Value::Object(map) => map,
        _ => {
            println!("{}", value);
            return;
        }
    };

    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in map {
        if DETAIL_KEYS.contains(&key.as_str()) {
            continue;
        }
        builder.push_record([key.as_str(), &scalar(val)]);
    }
    println!("{}", Table::from(builder));

    for key in DETAIL_KEYS {
        match map.get(key) {
            Some(Value::Array(items)) if !items.is_empty() => {
                if items.iter().all(|i| i.is_string()) {
                    print_string_list(key, items);
                } else {
                    println!("\n{}:", key);
                    print_records(items);
                }
            }
            _ => {}
        }
    }
}

fn print_records(arr: &[Value]) {
    if arr.is_empty() {
        println!("(empty)");
        return;
    }

    let first = match arr.first() {
        Some(Value::Object(first)) => first,
        _ => {
            for item in arr {
                println!("{}", scalar(item));
            }
            return;
        }
    };

    let headers: Vec<String> = first.keys().cloned().collect();
    let mut builder = Builder::default();
    builder.push_record(&headers);
    for item in arr {
        if let Value::Object(map) = item {
            let row: Vec<String> = headers
                .iter()
                .map(|h| map.get(h.as_str()).map(scalar).unwrap_or_default())
                .collect();
            builder.push_record(row);
        }
    }
    println!("{}", Table::from(builder));
}

fn print_string_list(title: &str, items: &[Value]) {
    if items.is_empty() {
        return;
    }
    println!("\n{}:", title);
    for item in items {
        if let Value::String(s) = item {
            println!("  - {}", s);
        }
    }
}

use serde_json::Value;
use std::io;

use super::scalar;

/// Write output as CSV to stdout. Objects become field/value rows; the
/// first record list found (allocations, events) becomes a row-per-record
/// table instead, which is the shape spreadsheets want.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    match value {
        Value::Object(map) => {
            let payload = match map.get("result") {
                Some(Value::Object(result)) => result,
                _ => map,
            };

            let records = payload.iter().find_map(|(_, v)| match v {
                Value::Array(items) if items.first().map(Value::is_object).unwrap_or(false) => {
                    Some(items)
                }
                _ => None,
            });

            if let Some(items) = records {
                write_records(&mut wtr, items);
            } else {
                let _ = wtr.write_record(["field", "value"]);
                for (key, val) in payload {
                    if val.is_array() || val.is_object() {
                        continue;
                    }
                    let _ = wtr.write_record([key.as_str(), &scalar(val)]);
                }
            }
        }
        Value::Array(arr) => write_records(&mut wtr, arr),
        _ => {
            let _ = wtr.write_record([&scalar(value)]);
        }
    }

    let _ = wtr.flush();
}

fn write_records(wtr: &mut csv::Writer<io::StdoutLock<'_>>, arr: &[Value]) {
    if arr.is_empty() {
        return;
    }

    if let Some(Value::Object(first)) = arr.first() {
        let headers: Vec<&str> = first.keys().map(|k| k.as_str()).collect();
        let _ = wtr.write_record(&headers);

        for item in arr {
            if let Value::Object(map) = item {
                let row: Vec<String> = headers
                    .iter()
                    .map(|h| map.get(*h).map(scalar).unwrap_or_default())
                    .collect();
                let _ = wtr.write_record(&row);
            }
        }
    } else {
        for item in arr {
            let _ = wtr.write_record([&scalar(item)]);
        }
    }
}

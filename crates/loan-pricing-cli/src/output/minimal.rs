use serde_json::Value;

/// Headline figures, in priority order. Nested paths reach into the
/// analysis envelope.
const PRIORITY: [&str; 5] = [
    "/commercial_margin",
    "/break_even_rate",
    "/rating_class",
    "/total_interest",
    "/pricing/break_even_rate",
];

/// Print just the key answer value from the output.
pub fn print_minimal(value: &Value) {
    let result = value.get("result").unwrap_or(value);

    if let Some(val) = PRIORITY
        .iter()
        .filter_map(|p| result.pointer(p))
        .find(|v| !v.is_null())
    {
        println!("{}", format_minimal(val));
        return;
    }

    match result {
        Value::Array(arr) => {
            for item in arr {
                println!("{}", format_minimal(item.get("rating_class").unwrap_or(item)));
            }
        }
        Value::Object(map) => {
            if let Some((key, val)) = map.iter().next() {
                println!("{}: {}", key, format_minimal(val));
            }
        }
        other => println!("{}", format_minimal(other)),
    }
}

fn format_minimal(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}

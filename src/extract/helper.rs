use percent_encoding::percent_decode_str;
use serde_json::Value;

/// Parses YouTube's abbreviated counters ("1.2K", "3M", "1,024").
pub fn parse_count(text: &str) -> Option<u64> {
    let text = text.to_lowercase().replace(&[',', ' '][..], "");

    if text.is_empty() {
        return None;
    }

    let scaled = |suffix: char, factor: f64| {
        text.trim_end_matches(suffix)
            .parse::<f64>()
            .ok()
            .map(|n| (n * factor).round() as u64)
    };

    if text.ends_with('k') {
        scaled('k', 1_000.0)
    } else if text.ends_with('m') {
        scaled('m', 1_000_000.0)
    } else if text.ends_with('b') {
        scaled('b', 1_000_000_000.0)
    } else {
        text.parse().ok()
    }
}

/// Every value stored under `key` anywhere in `data`, depth first. Array
/// elements are visited in order.
pub fn search_dict<'a>(data: &'a Value, key: &str) -> Vec<&'a Value> {
    let mut found = Vec::new();
    collect_key(data, key, &mut found);
    found
}

fn collect_key<'a>(data: &'a Value, key: &str, found: &mut Vec<&'a Value>) {
    match data {
        Value::Object(map) => {
            for (k, v) in map {
                if k == key {
                    found.push(v);
                } else {
                    collect_key(v, key, found);
                }
            }
        }
        Value::Array(items) => {
            for item in items {
                collect_key(item, key, found);
            }
        }
        _ => {}
    }
}

/// Continuation tokens sometimes arrive percent-encoded; the API wants them raw.
pub fn decode_continuation(token: &str) -> String {
    if !token.contains('%') {
        return token.to_string();
    }

    match percent_decode_str(token).decode_utf8() {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => token.to_string(),
    }
}

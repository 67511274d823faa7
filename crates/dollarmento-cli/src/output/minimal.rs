use serde_json::Value;

/// Priority list of headline fields, in the order a user asks for them.
const PRIORITY_KEYS: [&str; 6] = [
    "months_to_payoff",
    "total_future_value",
    "required_monthly_contribution",
    "timeline",
    "interest_saved",
    "standard_payment",
];

/// Print just the key answer value from the output.
///
/// Heuristic: look for well-known result fields in order of priority,
/// then fall back to the first scalar field in the result object.
pub fn print_minimal(value: &Value) {
    println!("{}", minimal_answer(value));
}

fn minimal_answer(value: &Value) -> String {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    if let Value::Object(map) = result_obj {
        for key in PRIORITY_KEYS {
            if let Some(val) = map.get(key) {
                if !val.is_null() {
                    return format_minimal(val);
                }
            }
        }

        if let Some((key, val)) = map.iter().find(|(_, v)| !v.is_array() && !v.is_object()) {
            return format!("{}: {}", key, format_minimal(val));
        }
    }

    format_minimal(result_obj)
}

fn format_minimal(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        Value::Object(map) if map.contains_key("status") => {
            // Goal timeline: show months when known, otherwise the status.
            match map.get("months") {
                Some(m) => format_minimal(m),
                None => format_minimal(&map["status"]),
            }
        }
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_priority_key_wins() {
        let v = json!({"result": {"standard_payment": "1580.17", "months_to_payoff": 287}});
        assert_eq!(minimal_answer(&v), "287");
    }

    #[test]
    fn test_goal_timeline_is_unwrapped() {
        let v = json!({"result": {"timeline": {"status": "months", "months": "41.2"}}});
        assert_eq!(minimal_answer(&v), "41.2");

        let v = json!({"result": {"timeline": {"status": "unreachable"}}});
        assert_eq!(minimal_answer(&v), "unreachable");
    }

    #[test]
    fn test_fallback_skips_arrays() {
        let v = json!({"result": {"entries": [1, 2], "note": "ok"}});
        assert_eq!(minimal_answer(&v), "note: ok");
    }
}

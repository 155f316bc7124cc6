use serde_json::Value;

// JSON playlists come from other tools too, scalars are accepted as text
pub fn get_string_from_serde_value(value: &Value) -> Option<String> {
    match value {
        Value::String(str_val) => Some(str_val.clone()),
        Value::Number(num_val) => Some(num_val.to_string()),
        Value::Bool(bool_val) => Some(bool_val.to_string()),
        Value::Null => Some(String::new()),
        Value::Array(_) | Value::Object(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::get_string_from_serde_value;
    use serde_json::json;

    #[test]
    fn test_get_string_from_serde_value() {
        assert_eq!(get_string_from_serde_value(&json!("abc")), Some("abc".to_string()));
        assert_eq!(get_string_from_serde_value(&json!(-1)), Some("-1".to_string()));
        assert_eq!(get_string_from_serde_value(&json!(true)), Some("true".to_string()));
        assert_eq!(get_string_from_serde_value(&json!(null)), Some(String::new()));
        assert_eq!(get_string_from_serde_value(&json!(["a"])), None);
    }
}

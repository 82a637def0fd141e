//! Canonical serialization used as hashing input.
//!
//! Values are routed through `serde_json::Value`, whose object map is ordered
//! by key, so the output does not depend on struct field order.

use serde::Serialize;

use crate::SerializationError;

/// Serialize `value` to JSON with lexicographically sorted object keys.
pub fn canonical_json<T: Serialize + ?Sized>(value: &T) -> Result<String, SerializationError> {
    let value = serde_json::to_value(value)?;
    Ok(value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;

    #[derive(Serialize)]
    struct Forward {
        alpha: u8,
        beta: &'static str,
    }

    #[derive(Serialize)]
    struct Reversed {
        beta: &'static str,
        alpha: u8,
    }

    #[test]
    fn test_field_order_independent() {
        let a = canonical_json(&Forward { alpha: 1, beta: "x" }).unwrap();
        let b = canonical_json(&Reversed { beta: "x", alpha: 1 }).unwrap();
        assert_eq!(a, b);
        assert_eq!(a, r#"{"alpha":1,"beta":"x"}"#);
    }
}

//! Currency registry: the fixed set of supported currency codes.

use serde::ser::{Serialize, SerializeMap, Serializer};
use std::fmt::Display;

/// Supported currencies, in display order.
static CURRENCIES: [(&str, &str); 20] = [
    ("USD", "US Dollar"),
    ("EUR", "Euro"),
    ("GBP", "British Pound"),
    ("JPY", "Japanese Yen"),
    ("AUD", "Australian Dollar"),
    ("CAD", "Canadian Dollar"),
    ("CHF", "Swiss Franc"),
    ("CNY", "Chinese Yuan"),
    ("INR", "Indian Rupee"),
    ("MXN", "Mexican Peso"),
    ("SGD", "Singapore Dollar"),
    ("HKD", "Hong Kong Dollar"),
    ("NZD", "New Zealand Dollar"),
    ("BRL", "Brazilian Real"),
    ("ZAR", "South African Rand"),
    ("RUB", "Russian Ruble"),
    ("KRW", "South Korean Won"),
    ("SEK", "Swedish Krona"),
    ("NOK", "Norwegian Krone"),
    ("DKK", "Danish Krone"),
];

/// A currency code known to the registry.
///
/// Only constructible through [`Currency::parse`], so holding one means the
/// code has already been validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Currency {
    code: &'static str,
    name: &'static str,
}

impl Currency {
    /// Looks up an exact (already upper-cased) code.
    pub fn parse(code: &str) -> Option<Self> {
        CURRENCIES
            .iter()
            .find(|(c, _)| *c == code)
            .map(|&(code, name)| Currency { code, name })
    }

    pub fn code(&self) -> &'static str {
        self.code
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code)
    }
}

pub fn is_valid(code: &str) -> bool {
    Currency::parse(code).is_some()
}

/// Returns the registry as `code -> name`, preserving display order.
pub fn list() -> CurrencyList {
    CurrencyList
}

/// Ordered view over the registry. Serializes as a JSON object.
#[derive(Debug, Clone, Copy)]
pub struct CurrencyList;

impl CurrencyList {
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &'static str)> {
        CURRENCIES.iter().copied()
    }

    pub fn len(&self) -> usize {
        CURRENCIES.len()
    }

    pub fn is_empty(&self) -> bool {
        CURRENCIES.is_empty()
    }
}

impl Serialize for CurrencyList {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (code, name) in self.iter() {
            map.serialize_entry(code, name)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_has_twenty_currencies() {
        assert_eq!(list().len(), 20);
        assert!(list().iter().all(|(code, _)| code.len() == 3
            && code.chars().all(|c| c.is_ascii_uppercase())));
    }

    #[test]
    fn test_validation() {
        assert!(is_valid("USD"));
        assert!(is_valid("DKK"));
        assert!(!is_valid("usd"));
        assert!(!is_valid("XYZ"));
        assert!(!is_valid(""));
    }

    #[test]
    fn test_parse_exposes_name() {
        let gbp = Currency::parse("GBP").unwrap();
        assert_eq!(gbp.code(), "GBP");
        assert_eq!(gbp.name(), "British Pound");
        assert_eq!(gbp.to_string(), "GBP");
    }

    #[test]
    fn test_list_serializes_in_registry_order() {
        let json = serde_json::to_string(&list()).unwrap();
        assert!(json.starts_with(r#"{"USD":"US Dollar","EUR":"Euro","GBP""#));
        assert!(json.ends_with(r#""DKK":"Danish Krone"}"#));
    }
}

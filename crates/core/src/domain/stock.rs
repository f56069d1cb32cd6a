use serde::{Deserialize, Serialize};

/// One entry of the stock list endpoint. Every field may be absent; absent
/// means unknown, never zero or empty.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StockRecord {
    pub ticker: Option<String>,
    pub name: Option<String>,
    #[serde(rename = "currentPrice")]
    pub current_price: Option<f64>,
}

impl StockRecord {
    /// Case-insensitive substring match on `name`. A record without a name
    /// never matches a non-empty query.
    pub fn name_matches(&self, query: &str) -> bool {
        if query.is_empty() {
            return true;
        }
        let Some(name) = self.name.as_deref() else {
            return false;
        };
        name.to_lowercase().contains(&query.to_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn named(name: Option<&str>) -> StockRecord {
        StockRecord {
            name: name.map(str::to_string),
            ..StockRecord::default()
        }
    }

    #[test]
    fn parses_partial_records_and_ignores_unknown_fields() {
        let v = json!([
            {"ticker": "AAPL", "name": "Apple Inc.", "currentPrice": 189.5, "exchange": "NASDAQ"},
            {"ticker": "MSFT"},
            {}
        ]);

        let parsed: Vec<StockRecord> = serde_json::from_value(v).unwrap();
        assert_eq!(parsed.len(), 3);
        assert_eq!(parsed[0].current_price, Some(189.5));
        assert_eq!(parsed[1].name, None);
        assert_eq!(parsed[2], StockRecord::default());
    }

    #[test]
    fn explicit_nulls_deserialize_to_absent() {
        let v = json!({"ticker": null, "name": null, "currentPrice": null});
        let parsed: StockRecord = serde_json::from_value(v).unwrap();
        assert_eq!(parsed, StockRecord::default());
    }

    #[test]
    fn rejects_wrongly_typed_price() {
        let v = json!({"ticker": "AAPL", "currentPrice": "189.5"});
        assert!(serde_json::from_value::<StockRecord>(v).is_err());
    }

    #[test]
    fn name_match_ignores_case() {
        assert!(named(Some("Apple Inc.")).name_matches("app"));
        assert!(named(Some("APPLICATIONS CO")).name_matches("app"));
        assert!(!named(Some("Microsoft")).name_matches("app"));
    }

    #[test]
    fn missing_name_only_matches_empty_query() {
        assert!(!named(None).name_matches("app"));
        assert!(named(None).name_matches(""));
    }
}

use crate::domain::stock::StockRecord;

pub const EMPTY_TITLE: &str = "No stock found";
pub const EMPTY_HINT: &str = "Try adjusting your search";

/// What the presentation layer should draw for the search screen.
#[derive(Debug, Clone, PartialEq)]
pub struct ScreenView {
    pub loading: bool,
    pub query: String,
    pub body: ViewBody,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ViewBody {
    Empty {
        title: &'static str,
        hint: &'static str,
    },
    Searching,
    Results(Vec<StockRow>),
}

/// One list row; only the fields the record actually has.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockRow {
    pub ticker: Option<String>,
    pub name: Option<String>,
    pub price: Option<String>,
}

impl From<&StockRecord> for StockRow {
    fn from(record: &StockRecord) -> Self {
        Self {
            ticker: record.ticker.clone(),
            name: record.name.clone(),
            price: record.current_price.map(format_price),
        }
    }
}

impl ScreenView {
    pub fn render(loading: bool, query: &str, searching: bool, results: &[StockRecord]) -> Self {
        let body = if results.is_empty() {
            ViewBody::Empty {
                title: EMPTY_TITLE,
                hint: EMPTY_HINT,
            }
        } else if searching {
            ViewBody::Searching
        } else {
            ViewBody::Results(results.iter().map(StockRow::from).collect())
        };

        Self {
            loading,
            query: query.to_string(),
            body,
        }
    }
}

/// Same text a JVM `Double.toString` would give: plain decimal with at least
/// one fraction digit in `[1e-3, 1e7)`, `1.0E7` style outside it.
fn format_price(price: f64) -> String {
    if price.is_nan() {
        return "NaN".to_string();
    }
    if price.is_infinite() {
        return if price > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }

    let magnitude = price.abs();
    if price == 0.0 || (1e-3..1e7).contains(&magnitude) {
        let plain = price.to_string();
        return if plain.contains('.') {
            plain
        } else {
            format!("{plain}.0")
        };
    }

    let scientific = format!("{price:e}");
    match scientific.split_once('e') {
        Some((mantissa, exponent)) if mantissa.contains('.') => format!("{mantissa}E{exponent}"),
        Some((mantissa, exponent)) => format!("{mantissa}.0E{exponent}"),
        None => scientific,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::stock;

    #[test]
    fn empty_results_render_empty_state_even_while_searching() {
        let view = ScreenView::render(false, "zzz", true, &[]);
        assert_eq!(
            view.body,
            ViewBody::Empty {
                title: EMPTY_TITLE,
                hint: EMPTY_HINT
            }
        );
    }

    #[test]
    fn searching_with_results_shows_spinner() {
        let view = ScreenView::render(false, "a", true, &[stock("A", Some("Alpha"))]);
        assert_eq!(view.body, ViewBody::Searching);
    }

    #[test]
    fn prices_print_like_jvm_doubles() {
        assert_eq!(format_price(189.5), "189.5");
        assert_eq!(format_price(100.0), "100.0");
        assert_eq!(format_price(0.0), "0.0");
        assert_eq!(format_price(0.001), "0.001");
        assert_eq!(format_price(9_999_999.5), "9999999.5");
        assert_eq!(format_price(1e7), "1.0E7");
        assert_eq!(format_price(12_345_678.9), "1.23456789E7");
        assert_eq!(format_price(0.0001), "1.0E-4");
        assert_eq!(format_price(-2.5e-5), "-2.5E-5");
        assert_eq!(format_price(f64::NAN), "NaN");
    }

    #[test]
    fn rows_carry_only_present_fields() {
        let mut priced = stock("AAPL", Some("Apple Inc."));
        priced.current_price = Some(189.5);
        let mut whole = stock("IBM", None);
        whole.current_price = Some(100.0);

        let view = ScreenView::render(true, "", false, &[priced, whole]);
        assert!(view.loading);
        assert_eq!(
            view.body,
            ViewBody::Results(vec![
                StockRow {
                    ticker: Some("AAPL".to_string()),
                    name: Some("Apple Inc.".to_string()),
                    price: Some("189.5".to_string()),
                },
                StockRow {
                    ticker: Some("IBM".to_string()),
                    name: None,
                    price: Some("100.0".to_string()),
                },
            ])
        );
    }
}

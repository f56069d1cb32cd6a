use crate::domain::stock::StockRecord;

/// Derives the visible list from a query and the loaded items. Pure: input
/// order is kept and duplicates are not collapsed.
pub fn filter_stocks(query: &str, items: &[StockRecord]) -> Vec<StockRecord> {
    if query.is_empty() {
        return items.to_vec();
    }
    items
        .iter()
        .filter(|item| item.name_matches(query))
        .cloned()
        .collect()
}

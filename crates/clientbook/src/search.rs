//! Name search over a snapshot of client records.

use crate::client::Client;

/// Return the records whose full name contains `query`, ignoring case.
///
/// Order is preserved and the input is left untouched. An empty query
/// matches every record.
#[must_use]
pub fn filter<'a>(records: &'a [Client], query: &str) -> Vec<&'a Client> {
    if query.is_empty() {
        return records.iter().collect();
    }

    let needle = query.to_lowercase();
    records
        .iter()
        .filter(|client| client.full_name.to_lowercase().contains(&needle))
        .collect()
}

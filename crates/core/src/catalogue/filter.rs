use super::record::CatalogueRecord;
use crate::callnumber::CallnumberKey;
use crate::query::Query;

/// Records kept by [`filter`], in catalogue order.
pub type FilteredRecords<'a> = Vec<&'a CatalogueRecord>;

/// Keep the records whose callnumber matches any alternative of `query`.
///
/// Relative order is preserved, so filtering an already filtered set with
/// the same query returns it unchanged. A record whose callnumber is not a
/// full callnumber matches nothing.
pub fn filter<'a, I>(records: I, query: &Query) -> FilteredRecords<'a>
where
    I: IntoIterator<Item = &'a CatalogueRecord>,
{
    records
        .into_iter()
        .filter(|record| record_matches(record, query))
        .collect()
}

/// Whether one record matches `query`.
pub fn record_matches(record: &CatalogueRecord, query: &Query) -> bool {
    CallnumberKey::parse_full(&record.callnumber).is_some_and(|key| query.matches(&key))
}

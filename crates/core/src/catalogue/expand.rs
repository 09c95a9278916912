use std::iter;

use super::record::CatalogueRecord;

/// Records sorted by callnumber (byte order), as listed next to printed
/// sheets. The sort is stable.
pub fn sort_by_callnumber<'a, I>(records: I) -> Vec<&'a CatalogueRecord>
where
    I: IntoIterator<Item = &'a CatalogueRecord>,
{
    let mut sorted: Vec<&CatalogueRecord> = records.into_iter().collect();
    sorted.sort_by(|a, b| a.callnumber.cmp(&b.callnumber));
    sorted
}

/// Label texts for a set of records: callnumbers in sorted order, each
/// repeated `quantity` times. Records with zero quantity contribute nothing.
pub fn expand_labels<'a, I>(records: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a CatalogueRecord>,
{
    sort_by_callnumber(records)
        .into_iter()
        .flat_map(|r| iter::repeat_n(r.callnumber.clone(), r.quantity as usize))
        .collect()
}

use std::collections::BTreeMap;

use crate::catalogue::{
    CatalogueRecord, FilteredRecords, expand_labels, filter, sort_by_callnumber, validate_catalogue,
};
use crate::diag::{Diagnostic, codes};
use crate::error::LabelError;
use crate::query::{Query, parse_query};

/// Outcome of running a query against a catalogue.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection<'a> {
    /// The parsed query.
    pub query: Query,
    /// Matching records, in catalogue order.
    pub records: FilteredRecords<'a>,
    /// One label text per copy, sorted by callnumber.
    pub labels: Vec<String>,
    /// Non-fatal notes produced along the way.
    pub diagnostics: Vec<Diagnostic>,
}

impl Selection<'_> {
    /// Matching records sorted by callnumber, in label order.
    pub fn sorted_records(&self) -> Vec<&CatalogueRecord> {
        sort_by_callnumber(self.records.iter().copied())
    }
}

/// Parse `query_text`, check the catalogue, and select the labels to print.
///
/// The query is parsed before the catalogue is looked at, so a typo in the
/// query is reported even when the catalogue is broken. An empty result is
/// not an error; it produces an `Info` note instead.
///
/// # Errors
///
/// [`LabelError::Parse`] for a bad query and [`LabelError::Validation`] for a
/// catalogue with duplicate or malformed callnumbers.
pub fn select<'a>(
    catalogue: &'a [CatalogueRecord],
    query_text: &str,
) -> Result<Selection<'a>, LabelError> {
    let query = parse_query(query_text)?;
    validate_catalogue(catalogue)?;

    let records = filter(catalogue, &query);
    let labels = expand_labels(records.iter().copied());

    let mut diagnostics = Vec::new();
    if records.is_empty() {
        diagnostics.push(
            Diagnostic::info(
                codes::EMPTY_SELECTION,
                format!("query '{query}' matched no records"),
                None,
            )
            .with_context(BTreeMap::from([(
                "records".into(),
                catalogue.len().to_string(),
            )])),
        );
    } else if labels.is_empty() {
        diagnostics.push(Diagnostic::info(
            codes::EMPTY_SELECTION,
            format!(
                "{} matching record(s) all have zero quantity; no labels to print",
                records.len()
            ),
            None,
        ));
    }

    Ok(Selection {
        query,
        records,
        labels,
        diagnostics,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalogue() -> Vec<CatalogueRecord> {
        vec![
            CatalogueRecord::new("K5/5-001", 2),
            CatalogueRecord::new("A12/3-002", 1),
            CatalogueRecord::new("K4/11-101", 1),
        ]
    }

    #[test]
    fn selects_and_expands() {
        let catalogue = catalogue();
        let selection = select(&catalogue, "k").unwrap();
        let callnumbers: Vec<&str> = selection
            .records
            .iter()
            .map(|r| r.callnumber.as_str())
            .collect();
        assert_eq!(callnumbers, vec!["K5/5-001", "K4/11-101"]);
        assert_eq!(selection.labels, vec!["K4/11-101", "K5/5-001", "K5/5-001"]);
        assert_eq!(selection.sorted_records()[0].callnumber, "K4/11-101");
        assert!(selection.diagnostics.is_empty());
    }

    #[test]
    fn query_error_reported_before_catalogue_error() {
        let catalogue = vec![
            CatalogueRecord::new("K5/5-001", 1),
            CatalogueRecord::new("K5/5-001", 1),
        ];
        assert!(matches!(
            select(&catalogue, "A--B"),
            Err(LabelError::Parse(_))
        ));
        assert!(matches!(
            select(&catalogue, "K"),
            Err(LabelError::Validation(_))
        ));
    }

    #[test]
    fn empty_selection_is_a_note() {
        let catalogue = catalogue();
        let selection = select(&catalogue, "Z").unwrap();
        assert!(selection.labels.is_empty());
        assert_eq!(selection.diagnostics.len(), 1);
        assert_eq!(selection.diagnostics[0].id, codes::EMPTY_SELECTION);
        assert!(!selection.diagnostics[0].is_error());
    }

    #[test]
    fn zero_quantity_matches_produce_note() {
        let catalogue = vec![CatalogueRecord::new("A1/1-001", 0)];
        let selection = select(&catalogue, "A").unwrap();
        assert_eq!(selection.records.len(), 1);
        assert!(selection.labels.is_empty());
        assert_eq!(selection.diagnostics[0].id, codes::EMPTY_SELECTION);
    }
}

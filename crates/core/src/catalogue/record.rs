use serde::{Deserialize, Serialize};

/// One catalogue entry: a callnumber, how many labels it needs, and
/// descriptive fields carried through to listings untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogueRecord {
    /// Shelving code, e.g. `"K4/11-101"`.
    pub callnumber: String,
    /// Number of copies, and so of labels to print.
    pub quantity: u32,
    /// Title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Author.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// Publisher.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,
}

impl CatalogueRecord {
    /// Record with only a callnumber and quantity.
    pub fn new(callnumber: impl Into<String>, quantity: u32) -> Self {
        Self {
            callnumber: callnumber.into(),
            quantity,
            title: None,
            author: None,
            publisher: None,
        }
    }
}

/// Load a catalogue from a JSON array of records.
pub fn load_catalogue_from_str(s: &str) -> Result<Vec<CatalogueRecord>, serde_json::Error> {
    serde_json::from_str(s)
}

//! Settings file definitions and validation for the shelf-labels toolchain.
//!
//! A settings file names the catalogue to read and describes the label sheet:
//! the grid of stickers on a page, the font used for callnumbers and, when
//! known, the pixel size of the sticker template artwork.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default settings file name, looked up in the working directory.
pub const DEFAULT_SETTINGS_PATH: &str = "config.json";

/// Errors that can occur when loading or validating a settings file.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// JSON deserialization failed.
    #[error("invalid settings JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// A field value is out of its valid range.
    #[error("invalid {field}: {reason}")]
    InvalidField {
        /// Dotted path of the field that failed validation.
        field: String,
        /// A human-readable explanation of why the field value is invalid.
        reason: String,
    },
}

/// Top-level settings.
///
/// # Example
/// ```
/// let settings = shelf_labels_settings::load_settings_from_str(
///     r#"{ "design": { "grid": { "columns": 3, "rows": 8 } } }"#,
/// )
/// .unwrap();
/// assert_eq!(settings.design.grid.cells_per_page(), 24);
/// assert_eq!(settings.design.font.size, 12.0);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Settings {
    /// Where the catalogue comes from.
    #[serde(default)]
    pub catalogue: Option<CatalogueSource>,
    /// Label sheet design.
    #[serde(default)]
    pub design: Design,
}

/// Location of the catalogue file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CatalogueSource {
    /// Path to a JSON array of catalogue records.
    pub path: String,
}

/// Label sheet design: template, font and grid.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Design {
    /// Sticker template artwork, if any.
    #[serde(default)]
    pub template: Option<Template>,
    /// Callnumber font.
    #[serde(default)]
    pub font: Font,
    /// Sticker grid on one page.
    #[serde(default)]
    pub grid: Grid,
}

/// Sticker template artwork description.
///
/// Only the pixel size matters here: it is compared with the grid cell's
/// proportions to warn about stretched stickers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Template {
    /// Optional path to the artwork, carried through for renderers.
    #[serde(default)]
    pub path: Option<String>,
    /// Template width in pixels.
    pub width: u32,
    /// Template height in pixels.
    pub height: u32,
}

/// Font used to print the callnumber on each sticker.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Font {
    /// Font family name.
    #[serde(default = "default_family")]
    pub family: String,
    /// Font size in points.
    #[serde(default = "default_font_size")]
    pub size: f64,
    /// Text colour as `#rrggbb`.
    #[serde(default = "default_color")]
    pub color: String,
    /// Vertical position of the text's top edge as a fraction of the sticker
    /// height, measured from the top.
    #[serde(rename = "text-y-align", default = "default_text_y_align")]
    pub text_y_align: f64,
}

impl Default for Font {
    fn default() -> Self {
        Self {
            family: default_family(),
            size: default_font_size(),
            color: default_color(),
            text_y_align: default_text_y_align(),
        }
    }
}

fn default_family() -> String {
    "sans-serif".into()
}

fn default_font_size() -> f64 {
    12.0
}

fn default_color() -> String {
    "#000000".into()
}

fn default_text_y_align() -> f64 {
    0.5
}

/// Sticker grid on one page.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Grid {
    /// Stickers per row.
    #[serde(default = "default_columns")]
    pub columns: u32,
    /// Sticker rows per page.
    #[serde(default = "default_rows")]
    pub rows: u32,
}

impl Grid {
    /// Number of stickers on a full page.
    pub fn cells_per_page(&self) -> u32 {
        self.columns * self.rows
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self {
            columns: default_columns(),
            rows: default_rows(),
        }
    }
}

fn default_columns() -> u32 {
    3
}

fn default_rows() -> u32 {
    7
}

/// Load and validate [`Settings`] from a JSON string.
///
/// Every section is optional and falls back to its defaults. Performs
/// structural validation after deserialization:
/// - `catalogue.path` must be non-empty (if present)
/// - `design.grid.columns` and `design.grid.rows` must be in range 1–100
/// - `design.font.size` must be > 0
/// - `design.font.color` must be `#rrggbb`
/// - `design.font.text-y-align` must be within 0–1
/// - `design.template.width` and `design.template.height` must be > 0 (if present)
pub fn load_settings_from_str(s: &str) -> Result<Settings, SettingsError> {
    let settings: Settings = serde_json::from_str(s)?;

    if let Some(ref source) = settings.catalogue
        && source.path.trim().is_empty()
    {
        return Err(invalid("catalogue.path", "must not be empty"));
    }

    // -- Grid --
    let grid = settings.design.grid;
    for (field, value) in [
        ("design.grid.columns", grid.columns),
        ("design.grid.rows", grid.rows),
    ] {
        if value == 0 {
            return Err(invalid(field, "must be > 0"));
        }
        if value > MAX_GRID_SIDE {
            return Err(invalid(
                field,
                format!("{value} exceeds maximum grid size ({MAX_GRID_SIDE})"),
            ));
        }
    }

    // -- Font --
    let font = &settings.design.font;
    if !(font.size.is_finite() && font.size > 0.0) {
        return Err(invalid("design.font.size", "must be > 0"));
    }
    if !is_hex_color(&font.color) {
        return Err(invalid(
            "design.font.color",
            format!("'{}' is not a #rrggbb colour", font.color),
        ));
    }
    if !(0.0..=1.0).contains(&font.text_y_align) {
        return Err(invalid(
            "design.font.text-y-align",
            format!("{} is outside 0..=1", font.text_y_align),
        ));
    }

    // -- Template --
    if let Some(ref template) = settings.design.template {
        if template.width == 0 {
            return Err(invalid("design.template.width", "must be > 0"));
        }
        if template.height == 0 {
            return Err(invalid("design.template.height", "must be > 0"));
        }
    }

    Ok(settings)
}

const MAX_GRID_SIDE: u32 = 100;

fn invalid(field: &str, reason: impl Into<String>) -> SettingsError {
    SettingsError::InvalidField {
        field: field.into(),
        reason: reason.into(),
    }
}

fn is_hex_color(s: &str) -> bool {
    s.len() == 7
        && s.starts_with('#')
        && s.bytes().skip(1).all(|b| b.is_ascii_hexdigit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_full_settings() {
        let json = r##"{
            "catalogue": { "path": "books.json" },
            "design": {
                "template": { "path": "sticker.png", "width": 600, "height": 360 },
                "font": { "family": "DejaVu Sans", "size": 14, "color": "#1a2b3c", "text-y-align": 0.4 },
                "grid": { "columns": 4, "rows": 10 }
            }
        }"##;
        let s = load_settings_from_str(json).unwrap();
        assert_eq!(s.catalogue.as_ref().unwrap().path, "books.json");
        assert_eq!(s.design.grid, Grid { columns: 4, rows: 10 });
        assert_eq!(s.design.font.family, "DejaVu Sans");
        assert_eq!(s.design.font.size, 14.0);
        assert_eq!(s.design.font.text_y_align, 0.4);
        let t = s.design.template.as_ref().unwrap();
        assert_eq!((t.width, t.height), (600, 360));
        assert_eq!(t.path.as_deref(), Some("sticker.png"));
    }

    #[test]
    fn load_empty_object_uses_defaults() {
        let s = load_settings_from_str("{}").unwrap();
        assert!(s.catalogue.is_none());
        assert!(s.design.template.is_none());
        assert_eq!(s.design.grid, Grid { columns: 3, rows: 7 });
        assert_eq!(s.design.grid.cells_per_page(), 21);
        assert_eq!(s.design.font, Font::default());
        assert_eq!(s.design.font.color, "#000000");
    }

    #[test]
    fn partial_grid_keeps_other_default() {
        let s = load_settings_from_str(r#"{ "design": { "grid": { "rows": 9 } } }"#).unwrap();
        assert_eq!(s.design.grid, Grid { columns: 3, rows: 9 });
    }

    #[test]
    fn zero_columns_rejected() {
        let err = load_settings_from_str(r#"{ "design": { "grid": { "columns": 0 } } }"#)
            .unwrap_err();
        assert!(
            err.to_string().contains("design.grid.columns"),
            "error should mention design.grid.columns: {err}"
        );
    }

    #[test]
    fn zero_rows_rejected() {
        let err =
            load_settings_from_str(r#"{ "design": { "grid": { "rows": 0 } } }"#).unwrap_err();
        assert!(
            err.to_string().contains("design.grid.rows"),
            "error should mention design.grid.rows: {err}"
        );
    }

    #[test]
    fn oversized_grid_rejected() {
        let err = load_settings_from_str(r#"{ "design": { "grid": { "rows": 500 } } }"#)
            .unwrap_err();
        assert!(
            err.to_string().contains("exceeds maximum grid size"),
            "{err}"
        );
    }

    #[test]
    fn negative_grid_is_json_error() {
        let err = load_settings_from_str(r#"{ "design": { "grid": { "rows": -1 } } }"#)
            .unwrap_err();
        assert!(matches!(err, SettingsError::InvalidJson(_)), "{err}");
    }

    #[test]
    fn bad_color_rejected() {
        for color in ["black", "#12345", "#12345g", "000000#"] {
            let json = format!(r#"{{ "design": {{ "font": {{ "color": "{color}" }} }} }}"#);
            let err = load_settings_from_str(&json).unwrap_err();
            assert!(
                err.to_string().contains("design.font.color"),
                "colour {color} should be rejected: {err}"
            );
        }
    }

    #[test]
    fn font_size_zero_rejected() {
        let err = load_settings_from_str(r#"{ "design": { "font": { "size": 0 } } }"#)
            .unwrap_err();
        assert!(err.to_string().contains("design.font.size"), "{err}");
    }

    #[test]
    fn text_align_out_of_range_rejected() {
        let err =
            load_settings_from_str(r#"{ "design": { "font": { "text-y-align": 1.5 } } }"#)
                .unwrap_err();
        assert!(err.to_string().contains("text-y-align"), "{err}");
    }

    #[test]
    fn template_zero_height_rejected() {
        let err = load_settings_from_str(
            r#"{ "design": { "template": { "width": 10, "height": 0 } } }"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("design.template.height"), "{err}");
    }

    #[test]
    fn empty_catalogue_path_rejected() {
        let err = load_settings_from_str(r#"{ "catalogue": { "path": "  " } }"#).unwrap_err();
        assert!(err.to_string().contains("catalogue.path"), "{err}");
    }

    #[test]
    fn malformed_json_rejected() {
        let err = load_settings_from_str("not json at all");
        assert!(err.is_err(), "malformed JSON should return error");
    }
}

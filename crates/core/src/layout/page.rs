use std::collections::BTreeMap;

use serde::Serialize;

use super::design::DesignConfig;
use crate::diag::{Diagnostic, codes};

/// Page size in PostScript points (1/72 inch).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PageSize {
    /// Width in points.
    pub width: f64,
    /// Height in points.
    pub height: f64,
}

impl PageSize {
    /// ISO A4, 210 × 297 mm.
    pub const A4: PageSize = PageSize {
        width: 210.0 * POINTS_PER_MM,
        height: 297.0 * POINTS_PER_MM,
    };
}

impl Default for PageSize {
    fn default() -> Self {
        PageSize::A4
    }
}

const POINTS_PER_MM: f64 = 72.0 / 25.4;

/// Position and size of one cell, origin at the page's bottom-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CellGeometry {
    /// Left edge.
    pub x: f64,
    /// Bottom edge.
    pub y: f64,
    /// Cell width.
    pub width: f64,
    /// Cell height.
    pub height: f64,
}

/// Grid geometry of one page.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PageLayout {
    rows: u32,
    cols: u32,
    page: PageSize,
}

impl PageLayout {
    /// Layout of `config`'s grid over a `page`.
    pub fn new(config: &DesignConfig, page: PageSize) -> Self {
        Self {
            rows: config.grid_rows(),
            cols: config.grid_columns(),
            page,
        }
    }

    /// Rows per page.
    pub fn rows(&self) -> u32 {
        self.rows
    }

    /// Columns per page.
    pub fn cols(&self) -> u32 {
        self.cols
    }

    /// Cells on one page.
    pub fn cells_per_page(&self) -> u32 {
        self.rows * self.cols
    }

    /// Page size.
    pub fn page(&self) -> PageSize {
        self.page
    }

    /// Width of one cell.
    pub fn cell_width(&self) -> f64 {
        self.page.width / f64::from(self.cols)
    }

    /// Height of one cell.
    pub fn cell_height(&self) -> f64 {
        self.page.height / f64::from(self.rows)
    }

    /// Geometry of the 0-based cell `row`, `col`.
    ///
    /// Rows count down from the top of the page while `y` counts up from
    /// the bottom, so row 0 sits at `page_height - cell_height`.
    pub fn cell_geometry(&self, row: u32, col: u32) -> CellGeometry {
        let (width, height) = (self.cell_width(), self.cell_height());
        CellGeometry {
            x: f64::from(col) * width,
            y: self.page.height - f64::from(row + 1) * height,
            width,
            height,
        }
    }

    /// Warn when a sticker template's proportions differ from the cell's by
    /// more than 10 %.
    pub fn check_template_ratio(&self, template_width: u32, template_height: u32) -> Option<Diagnostic> {
        let cell_ratio = self.cell_width() / self.cell_height();
        let template_ratio = f64::from(template_width) / f64::from(template_height);
        if is_close(cell_ratio, template_ratio, TEMPLATE_RATIO_TOLERANCE) {
            return None;
        }
        Some(
            Diagnostic::warn(
                codes::TEMPLATE_RATIO_MISMATCH,
                format!(
                    "sticker proportions on the sheet differ from the template's: {cell_ratio:.2} vs {template_ratio:.2}"
                ),
                None,
            )
            .with_context(BTreeMap::from([
                ("sticker_ratio".into(), format!("{cell_ratio:.2}")),
                ("template_ratio".into(), format!("{template_ratio:.2}")),
            ])),
        )
    }
}

const TEMPLATE_RATIO_TOLERANCE: f64 = 0.1;

/// Relative closeness, scaled by the larger magnitude.
fn is_close(a: f64, b: f64, rel_tol: f64) -> bool {
    (a - b).abs() <= rel_tol * a.abs().max(b.abs())
}

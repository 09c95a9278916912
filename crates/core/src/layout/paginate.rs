use std::convert::Infallible;

use serde::Serialize;
use thiserror::Error;

use super::design::DesignConfig;
use super::page::{CellGeometry, PageLayout, PageSize};
use crate::diag::{Diagnostic, codes};

// ─── Label input ────────────────────────────────────────────────────────────

/// Something that can fill one sticker.
///
/// `None` still consumes a cell and renders a blank sticker.
pub trait LabelText {
    /// Text to print, if any.
    fn label_text(&self) -> Option<&str>;
}

impl LabelText for String {
    fn label_text(&self) -> Option<&str> {
        Some(self)
    }
}

impl LabelText for &str {
    fn label_text(&self) -> Option<&str> {
        Some(self)
    }
}

impl<T: LabelText> LabelText for Option<T> {
    fn label_text(&self) -> Option<&str> {
        self.as_ref().and_then(LabelText::label_text)
    }
}

// ─── Renderer seam ──────────────────────────────────────────────────────────

/// One filled cell handed to a [`CellRenderer`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellPlacement<'a> {
    /// 0-based page number.
    pub page: usize,
    /// 0-based row from the top.
    pub row: u32,
    /// 0-based column from the left.
    pub col: u32,
    /// 1-based row-major position on the page.
    pub ordinal: u32,
    /// Index of the label in the input sequence.
    pub index: usize,
    /// Text to print; `None` for a blank sticker.
    pub text: Option<&'a str>,
    /// Where the cell sits on the page.
    pub geometry: CellGeometry,
}

/// Draws filled cells. Called once per filled cell, in placement order, and
/// once at the end of every page.
pub trait CellRenderer {
    /// Error raised by the renderer.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Draw one filled cell.
    fn render_cell(&mut self, cell: &CellPlacement<'_>) -> Result<(), Self::Error>;

    /// Called after the last cell of `page` (also for a page left empty).
    fn finish_page(&mut self, page: usize) -> Result<(), Self::Error> {
        let _ = page;
        Ok(())
    }
}

/// Pagination aborted because the renderer failed.
///
/// No cell or page is requested after the failure; whatever the renderer
/// produced so far is incomplete and must be discarded by the caller.
#[derive(Debug, Error)]
pub enum PaginationError<E> {
    /// Drawing a cell failed.
    #[error("rendering label {index} failed on page {}, row {}, column {}", .page + 1, .row + 1, .col + 1)]
    Render {
        /// 0-based page.
        page: usize,
        /// 0-based row.
        row: u32,
        /// 0-based column.
        col: u32,
        /// Index of the label being drawn.
        index: usize,
        /// Renderer error.
        #[source]
        source: E,
    },

    /// Finishing a page failed.
    #[error("finishing page {} failed", .page + 1)]
    FinishPage {
        /// 0-based page.
        page: usize,
        /// Renderer error.
        #[source]
        source: E,
    },
}

impl<E: std::error::Error> PaginationError<E> {
    /// The renderer's error.
    pub fn renderer_error(&self) -> &E {
        match self {
            PaginationError::Render { source, .. } | PaginationError::FinishPage { source, .. } => {
                source
            }
        }
    }

    /// Convert into an error diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        Diagnostic::error(
            codes::RENDER_FAILED,
            format!("{self}: {}", self.renderer_error()),
            None,
        )
    }
}

// ─── Engine ─────────────────────────────────────────────────────────────────

/// Counters describing a finished pagination run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PaginationSummary {
    /// Pages used (at least one, even with no labels).
    pub total_pages: usize,
    /// Unfilled cells after the last label on the last page.
    pub left_on_last_page: u32,
    /// Labels placed.
    pub labels_placed: usize,
}

/// Whether the 0-based cell `row`, `col` on `page` is left blank.
///
/// Only the first page has blank cells: those before the start cell in
/// row-major order.
pub fn should_skip_cell(config: &DesignConfig, page: usize, row: u32, col: u32) -> bool {
    if page != 0 {
        return false;
    }
    let start_row = config.start_row() - 1;
    let start_col = config.start_col() - 1;
    row < start_row || (row == start_row && col < start_col)
}

/// Lay `labels` out over as many pages as needed and hand every filled cell
/// to `renderer`.
///
/// Cells are visited row by row. On the first page the cells before the
/// start cell are skipped without consuming a label; every later page is
/// filled from its top-left cell. Once the labels run out the current page
/// is finished and no further pages are started.
///
/// The returned counters come from this pass itself;
/// [`expected_total_pages`] and [`expected_left_on_last_page`] give the same
/// numbers in closed form.
///
/// # Errors
///
/// The first renderer failure stops the run and is returned.
pub fn paginate<L, R>(
    labels: &[L],
    config: &DesignConfig,
    page_size: PageSize,
    renderer: &mut R,
) -> Result<PaginationSummary, PaginationError<R::Error>>
where
    L: LabelText,
    R: CellRenderer + ?Sized,
{
    let layout = PageLayout::new(config, page_size);
    let mut cursor = 0usize;
    let mut page = 0usize;

    loop {
        // Ordinal of the last cell used (filled or deliberately blank).
        let mut last_used = if page == 0 { config.blank_cells() } else { 0 };

        'cells: for row in 0..layout.rows() {
            for col in 0..layout.cols() {
                if should_skip_cell(config, page, row, col) {
                    continue;
                }
                let Some(label) = labels.get(cursor) else {
                    break 'cells;
                };
                let ordinal = row * layout.cols() + col + 1;
                let cell = CellPlacement {
                    page,
                    row,
                    col,
                    ordinal,
                    index: cursor,
                    text: label.label_text(),
                    geometry: layout.cell_geometry(row, col),
                };
                renderer
                    .render_cell(&cell)
                    .map_err(|source| PaginationError::Render {
                        page,
                        row,
                        col,
                        index: cursor,
                        source,
                    })?;
                cursor += 1;
                last_used = ordinal;
            }
        }

        renderer
            .finish_page(page)
            .map_err(|source| PaginationError::FinishPage { page, source })?;

        if cursor >= labels.len() {
            return Ok(PaginationSummary {
                total_pages: page + 1,
                left_on_last_page: layout.cells_per_page() - last_used,
                labels_placed: cursor,
            });
        }
        page += 1;
    }
}

/// Closed-form page count for `label_count` labels:
/// `ceil((label_count + blank_cells) / cells_per_page)`, at least one.
pub fn expected_total_pages(label_count: usize, config: &DesignConfig) -> usize {
    let per_page = config.max_cell_ordinal() as usize;
    let used = label_count + config.blank_cells() as usize;
    used.div_ceil(per_page).max(1)
}

/// Closed-form count of unfilled cells on the last page.
pub fn expected_left_on_last_page(label_count: usize, config: &DesignConfig) -> u32 {
    let per_page = config.max_cell_ordinal() as usize;
    let blank = config.blank_cells() as usize;
    let left = if expected_total_pages(label_count, config) == 1 {
        per_page - blank - label_count
    } else {
        let first_page_capacity = per_page - blank;
        let remaining = label_count - first_page_capacity;
        let on_last_page = match remaining % per_page {
            0 => per_page,
            n => n,
        };
        per_page - on_last_page
    };
    left as u32
}

// ─── Pure planning ──────────────────────────────────────────────────────────

/// A filled cell, owned.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Placement {
    /// 0-based page.
    pub page: usize,
    /// 0-based row.
    pub row: u32,
    /// 0-based column.
    pub col: u32,
    /// 1-based row-major position on the page.
    pub ordinal: u32,
    /// Text printed; `None` for a blank sticker.
    pub text: Option<String>,
    /// Cell position and size.
    pub geometry: CellGeometry,
}

/// Every placement of a run plus its counters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SheetPlan {
    /// Run counters.
    pub summary: PaginationSummary,
    /// Filled cells in placement order.
    pub placements: Vec<Placement>,
}

/// Run [`paginate`] without drawing anything, collecting the placements.
pub fn plan<L: LabelText>(labels: &[L], config: &DesignConfig, page_size: PageSize) -> SheetPlan {
    let mut collector = PlacementCollector::default();
    let summary = match paginate(labels, config, page_size, &mut collector) {
        Ok(summary) => summary,
        Err(PaginationError::Render { source, .. } | PaginationError::FinishPage { source, .. }) => {
            match source {}
        }
    };
    SheetPlan {
        summary,
        placements: collector.placements,
    }
}

#[derive(Default)]
struct PlacementCollector {
    placements: Vec<Placement>,
}

impl CellRenderer for PlacementCollector {
    type Error = Infallible;

    fn render_cell(&mut self, cell: &CellPlacement<'_>) -> Result<(), Infallible> {
        self.placements.push(Placement {
            page: cell.page,
            row: cell.row,
            col: cell.col,
            ordinal: cell.ordinal,
            text: cell.text.map(str::to_string),
            geometry: cell.geometry,
        });
        Ok(())
    }
}

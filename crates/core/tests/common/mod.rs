//! Shared test helpers for `shelf_labels_core` integration tests.

#![allow(unreachable_pub, dead_code)]

use std::convert::Infallible;

use shelf_labels_core::layout::{CellPlacement, CellRenderer, DesignConfig};
use shelf_labels_core::{CallnumberKey, CatalogueRecord};

/// Full key from its four parts.
pub fn key(room: char, bookcase: u32, shelf: u32, book: u32) -> CallnumberKey {
    CallnumberKey::full(room, bookcase, shelf, book)
}

/// Catalogue of `(callnumber, quantity)` pairs.
pub fn catalogue(entries: &[(&str, u32)]) -> Vec<CatalogueRecord> {
    entries
        .iter()
        .map(|(callnumber, quantity)| CatalogueRecord::new(*callnumber, *quantity))
        .collect()
}

/// `n` distinct label texts.
pub fn labels(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("A1/1-{i:03}")).collect()
}

/// A grid with the given start ordinal.
pub fn grid(columns: u32, rows: u32, start: u32) -> DesignConfig {
    DesignConfig::new(columns, rows)
        .and_then(|config| config.with_start_ordinal(start))
        .unwrap_or_else(|e| panic!("bad test grid {columns}x{rows}@{start}: {e}"))
}

/// One renderer call, recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    /// `render_cell(page, row, col, text)`.
    Cell(usize, u32, u32, Option<String>),
    /// `finish_page(page)`.
    Finish(usize),
}

/// Renderer that records every call.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    /// Calls in order.
    pub calls: Vec<Call>,
}

impl RecordingRenderer {
    /// `(page, row, col)` of every filled cell.
    pub fn cells(&self) -> Vec<(usize, u32, u32)> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                Call::Cell(page, row, col, _) => Some((*page, *row, *col)),
                Call::Finish(_) => None,
            })
            .collect()
    }
}

impl CellRenderer for RecordingRenderer {
    type Error = Infallible;

    fn render_cell(&mut self, cell: &CellPlacement<'_>) -> Result<(), Infallible> {
        self.calls.push(Call::Cell(
            cell.page,
            cell.row,
            cell.col,
            cell.text.map(str::to_string),
        ));
        Ok(())
    }

    fn finish_page(&mut self, page: usize) -> Result<(), Infallible> {
        self.calls.push(Call::Finish(page));
        Ok(())
    }
}

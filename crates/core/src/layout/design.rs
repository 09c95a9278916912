use std::collections::BTreeMap;

use serde::Serialize;
use shelf_labels_settings::Grid;
use thiserror::Error;

use crate::diag::{Diagnostic, codes};

/// Invalid sheet geometry or start cell, detected before pagination runs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The grid has zero rows or columns, or more cells than fit in a `u32`.
    #[error(
        "invalid label grid {columns}x{rows}: columns and rows must be > 0 and the cell count must fit in 32 bits"
    )]
    InvalidGrid {
        /// Columns requested.
        columns: u32,
        /// Rows requested.
        rows: u32,
    },

    /// The start ordinal is 0 or past the last cell.
    #[error("first label position {ordinal} is outside the sheet (valid positions are 1 to {max})")]
    StartOrdinalOutOfRange {
        /// Ordinal requested.
        ordinal: u32,
        /// Last valid ordinal (`columns * rows`).
        max: u32,
    },

    /// The start row or column lies outside the grid.
    #[error("start cell (row {row}, column {col}) is outside the {rows}-row, {columns}-column grid")]
    StartCellOutOfRange {
        /// Row requested (1-based).
        row: u32,
        /// Column requested (1-based).
        col: u32,
        /// Grid rows.
        rows: u32,
        /// Grid columns.
        columns: u32,
    },
}

impl ConfigError {
    /// Diagnostic code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            ConfigError::InvalidGrid { .. } => codes::INVALID_GRID,
            ConfigError::StartOrdinalOutOfRange { .. } | ConfigError::StartCellOutOfRange { .. } => {
                codes::START_CELL_OUT_OF_RANGE
            }
        }
    }

    /// Convert into an error diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let diag = Diagnostic::error(self.code(), self.to_string(), None);
        match self {
            ConfigError::InvalidGrid { columns, rows } => diag.with_context(BTreeMap::from([
                ("columns".into(), columns.to_string()),
                ("rows".into(), rows.to_string()),
            ])),
            ConfigError::StartOrdinalOutOfRange { ordinal, max } => {
                diag.with_context(BTreeMap::from([
                    ("ordinal".into(), ordinal.to_string()),
                    ("max".into(), max.to_string()),
                ]))
            }
            ConfigError::StartCellOutOfRange { row, col, .. } => diag.with_context(BTreeMap::from([
                ("row".into(), row.to_string()),
                ("col".into(), col.to_string()),
            ])),
        }
    }
}

/// Where the first label goes on the first page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartCell {
    /// 1-based row-major position: `columns * (row - 1) + col`.
    Ordinal(u32),
    /// 1-based row and column.
    Position {
        /// Row, counted from the top.
        row: u32,
        /// Column, counted from the left.
        col: u32,
    },
}

impl Default for StartCell {
    fn default() -> Self {
        StartCell::Ordinal(1)
    }
}

/// Grid geometry plus the first cell to fill on the first page.
///
/// Cells before the start cell on page one are left blank so a partially
/// used sheet can go back through the printer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DesignConfig {
    grid_columns: u32,
    grid_rows: u32,
    start_row: u32,
    start_col: u32,
}

impl DesignConfig {
    /// A `columns` × `rows` grid starting at the top-left cell.
    ///
    /// Every ordinal is a `u32`, so `columns * rows` must not overflow.
    pub fn new(columns: u32, rows: u32) -> Result<Self, ConfigError> {
        if columns == 0 || rows == 0 || columns.checked_mul(rows).is_none() {
            return Err(ConfigError::InvalidGrid { columns, rows });
        }
        Ok(Self {
            grid_columns: columns,
            grid_rows: rows,
            start_row: 1,
            start_col: 1,
        })
    }

    /// Grid taken from the settings file.
    pub fn from_grid(grid: &Grid) -> Result<Self, ConfigError> {
        Self::new(grid.columns, grid.rows)
    }

    /// Same grid, starting at `row`, `col` (both 1-based).
    pub fn with_start_cell(self, row: u32, col: u32) -> Result<Self, ConfigError> {
        if !(1..=self.grid_rows).contains(&row) || !(1..=self.grid_columns).contains(&col) {
            return Err(ConfigError::StartCellOutOfRange {
                row,
                col,
                rows: self.grid_rows,
                columns: self.grid_columns,
            });
        }
        Ok(Self {
            start_row: row,
            start_col: col,
            ..self
        })
    }

    /// Same grid, starting at a 1-based row-major ordinal.
    pub fn with_start_ordinal(self, ordinal: u32) -> Result<Self, ConfigError> {
        let (row, col) = self.cell_of_ordinal(ordinal)?;
        self.with_start_cell(row, col)
    }

    /// Same grid, starting at `start`.
    pub fn with_start(self, start: StartCell) -> Result<Self, ConfigError> {
        match start {
            StartCell::Ordinal(ordinal) => self.with_start_ordinal(ordinal),
            StartCell::Position { row, col } => self.with_start_cell(row, col),
        }
    }

    /// Stickers per row.
    pub fn grid_columns(&self) -> u32 {
        self.grid_columns
    }

    /// Sticker rows per page.
    pub fn grid_rows(&self) -> u32 {
        self.grid_rows
    }

    /// Start row, 1-based.
    pub fn start_row(&self) -> u32 {
        self.start_row
    }

    /// Start column, 1-based.
    pub fn start_col(&self) -> u32 {
        self.start_col
    }

    /// Number of cells on one page, and the last valid ordinal.
    pub fn max_cell_ordinal(&self) -> u32 {
        self.grid_columns * self.grid_rows
    }

    /// Ordinal of the start cell.
    pub fn start_ordinal(&self) -> u32 {
        self.ordinal_of_cell(self.start_row, self.start_col)
    }

    /// Cells left blank before the start cell on the first page.
    pub fn blank_cells(&self) -> u32 {
        self.start_ordinal() - 1
    }

    /// Ordinal of the 1-based cell `row`, `col`.
    pub fn ordinal_of_cell(&self, row: u32, col: u32) -> u32 {
        self.grid_columns * (row - 1) + col
    }

    /// 1-based `(row, col)` of a 1-based ordinal.
    pub fn cell_of_ordinal(&self, ordinal: u32) -> Result<(u32, u32), ConfigError> {
        let max = self.max_cell_ordinal();
        if !(1..=max).contains(&ordinal) {
            return Err(ConfigError::StartOrdinalOutOfRange { ordinal, max });
        }
        let zero_based = ordinal - 1;
        Ok((
            zero_based / self.grid_columns + 1,
            zero_based % self.grid_columns + 1,
        ))
    }
}

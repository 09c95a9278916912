//! Label sheet layout.
//!
//! A sheet is a grid of equally sized stickers. [`DesignConfig`] fixes the
//! grid and the first cell to use, [`PageLayout`] maps cells to page
//! coordinates, and [`paginate`] walks the labels across as many pages as
//! they need, handing each filled cell to a [`CellRenderer`].

/// Grid and start cell configuration.
pub mod design;
/// Page size and cell geometry.
pub mod page;
/// Pagination engine.
pub mod paginate;

pub use design::{ConfigError, DesignConfig, StartCell};
pub use page::{CellGeometry, PageLayout, PageSize};
pub use paginate::{
    CellPlacement, CellRenderer, LabelText, PaginationError, PaginationSummary, Placement,
    SheetPlan, expected_left_on_last_page, expected_total_pages, paginate, plan, should_skip_cell,
};

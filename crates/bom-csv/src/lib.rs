//! CSV bill-of-materials reports for KiCad component exports.
//!
//! Three report shapes are supported:
//! - flat: one row per component
//! - grouped: one row per distinct value of a user field, with a count
//! - assembly: grouped rows carrying the designator list and footprint
//!
//! Grouped reports sort components before grouping (by reference, or
//! alphanumerically for assembly) and count, rather than drop silently, the
//! components that have no value for the grouping field.

pub mod designator;
mod group;
mod options;
mod report;

pub use group::{Group, Grouping, SortOrder};
pub use options::{ReportKind, ReportOptions, Separator, SeparatorError};
pub use report::{
    render, write_assembly, write_flat, write_group_summary, write_grouped, write_report,
    ReportSummary,
};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, ReportError>;

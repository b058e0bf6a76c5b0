//! Flaw nozzle finder.
//!
//! Turns labelled 2D measurements of print-head test strips into nozzle
//! indices:
//! - Loading labelled `Label, X, Y` measurements from CSV
//! - Levelling each strip by the tilt of its endpoint line
//! - Snapping interior points onto an evenly spaced nozzle grid within a tolerance
//! - Combining accepted indices across labels and exporting them as plain text
//!
//! The two extreme points of a strip are taken to be the first and last
//! physical nozzles. If a strip does not start and end on real nozzles, every
//! index found on it shifts by the same amount.
//!
//! # Example
//!
//! ```no_run
//! use nozzle_finder::{core::loaders::load_label_groups, processors::RunReport};
//!
//! let groups = load_label_groups("measurements.csv").unwrap();
//! let report = RunReport::build(&groups, 636, 0.25);
//! println!("{:?}", report.combined);
//! ```

pub mod cli;
pub mod config;
pub mod core;
pub mod processors;
pub mod report;

pub use config::{ExportConfig, MatchingConfig, PipelineConfig};
pub use core::loaders::{LabelGroups, Point};
pub use processors::{LabelResult, RunReport};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

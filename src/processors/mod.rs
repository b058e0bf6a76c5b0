//! Strip processing: grid matching and per-label aggregation.

pub mod aggregation;
pub mod matching;

pub use aggregation::{
    combined_indices, process_label, process_labels, LabelResult, RunReport, RunWarning,
};
pub use matching::{match_indices, GridMatch, MatchDetail, OutOfRange};

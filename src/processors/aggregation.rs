//! Per-label processing and aggregation into the combined nozzle list.
//!
//! Labels are visited in lexicographic order and processed in parallel with
//! Rayon; results come back in that same order, so the output does not depend
//! on the iteration order of the input map or on thread scheduling.

use std::collections::BTreeSet;

use log::debug;
use rayon::prelude::*;

use super::matching::{match_indices, MatchDetail, OutOfRange};
use crate::core::loaders::{LabelGroups, Point};
use crate::core::transforms::orient_strip;

/// Everything computed for one label.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelResult {
    pub label: String,
    /// Points as loaded, in file order.
    pub points: Vec<Point>,
    /// Accepted nozzle indices.
    pub indices: Vec<usize>,
    pub out_of_range: Vec<OutOfRange>,
    /// Strip tilt in degrees (0 when the label has fewer than two points).
    pub angle_deg: f64,
    pub step: f64,
    pub start: f64,
    pub end: f64,
    pub details: Vec<MatchDetail>,
}

/// Non-fatal conditions surfaced by a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunWarning {
    /// Some interior points of a label fell outside the tolerance.
    ToleranceMiss { label: String, count: usize },
}

impl std::fmt::Display for RunWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunWarning::ToleranceMiss { label, count } => {
                write!(f, "{label}: {count} point(s) out of range")
            }
        }
    }
}

/// Output of one run over all labels.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunReport {
    /// One result per label, in label order.
    pub labels: Vec<LabelResult>,
    /// Sorted, deduplicated union of all accepted indices.
    pub combined: Vec<usize>,
}

impl RunReport {
    /// Process every label and combine the accepted indices.
    pub fn build(groups: &LabelGroups, nozzle_count: usize, tolerance: f64) -> Self {
        let labels = process_labels(groups, nozzle_count, tolerance);
        let combined = combined_indices(&labels);
        Self { labels, combined }
    }

    pub fn total_points(&self) -> usize {
        self.labels.iter().map(|r| r.points.len()).sum()
    }

    pub fn has_tolerance_misses(&self) -> bool {
        self.labels.iter().any(|r| !r.out_of_range.is_empty())
    }

    pub fn warnings(&self) -> Vec<RunWarning> {
        self.labels
            .iter()
            .filter(|r| !r.out_of_range.is_empty())
            .map(|r| RunWarning::ToleranceMiss {
                label: r.label.clone(),
                count: r.out_of_range.len(),
            })
            .collect()
    }
}

/// Level and match a single label's points.
pub fn process_label(label: &str, points: &[Point], nozzle_count: usize, tolerance: f64) -> LabelResult {
    let orientation = orient_strip(points).unwrap_or_default();
    let grid = match_indices(&orientation.rotated_xs(), nozzle_count, tolerance);

    debug!(
        "{}: angle {:.4} deg, step {:.6}, {} accepted, {} out of range",
        label,
        orientation.angle_deg(),
        grid.step,
        grid.indices.len(),
        grid.out_of_range.len()
    );

    LabelResult {
        label: label.to_string(),
        points: points.to_vec(),
        indices: grid.indices,
        out_of_range: grid.out_of_range,
        angle_deg: orientation.angle_deg(),
        step: grid.step,
        start: grid.start,
        end: grid.end,
        details: grid.details,
    }
}

/// Process all labels in lexicographic label order.
pub fn process_labels(groups: &LabelGroups, nozzle_count: usize, tolerance: f64) -> Vec<LabelResult> {
    let mut labels: Vec<&String> = groups.keys().collect();
    labels.sort();

    labels
        .par_iter()
        .map(|label| process_label(label, &groups[*label], nozzle_count, tolerance))
        .collect()
}

/// Sorted, deduplicated union of every label's accepted indices.
pub fn combined_indices(results: &[LabelResult]) -> Vec<usize> {
    results
        .iter()
        .flat_map(|r| r.indices.iter().copied())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

//! Plain-text diagnostics for a run.
//!
//! Every function returns lines rather than printing, so the CLI decides where
//! they go and tests can check them directly.

use crate::core::loaders::LabelGroups;
use crate::processors::{LabelResult, RunReport};

/// Point count per label, in label order.
pub fn point_count_lines(groups: &LabelGroups) -> Vec<String> {
    let mut labels: Vec<&String> = groups.keys().collect();
    labels.sort();
    labels
        .into_iter()
        .map(|label| format!("  {}: {} points", label, groups[label].len()))
        .collect()
}

/// Overview of a run: totals, one line per label and the combined list.
pub fn summary_lines(report: &RunReport) -> Vec<String> {
    let mut lines = Vec::with_capacity(report.labels.len() + 2);
    lines.push(format!(
        "Loaded {} points across {} labels.",
        report.total_points(),
        report.labels.len()
    ));

    for result in &report.labels {
        let misses = result.out_of_range.len();
        let miss_note = if misses > 0 {
            format!(", {} out-of-range", misses)
        } else {
            String::new()
        };
        lines.push(format!(
            "- {}: {} points, indices={:?}{}",
            result.label,
            result.points.len(),
            result.indices,
            miss_note
        ));
    }

    lines.push(format!(
        "Combined nozzle list ({} unique): {:?}",
        report.combined.len(),
        report.combined
    ));
    lines
}

/// Grid parameters and every match detail for one label.
pub fn detail_lines(result: &LabelResult) -> Vec<String> {
    let mut lines = vec![
        format!("[{}] {} points", result.label, result.points.len()),
        format!("  angle: {:.4} deg", result.angle_deg),
        format!(
            "  grid: start {:.4}, end {:.4}, step {:.6}",
            result.start, result.end, result.step
        ),
    ];

    if result.details.is_empty() {
        lines.push("  no interior points".to_string());
        return lines;
    }

    lines.push(format!(
        "  {:>14} {:>12} {:>7}  status",
        "coord", "position", "index"
    ));
    for d in &result.details {
        lines.push(format!(
            "  {:>14.4} {:>12.4} {:>7}  {}",
            d.coord,
            d.position,
            d.index,
            if d.in_tolerance { "OK" } else { "MISS" }
        ));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::loaders::Point;

    fn sample_groups() -> LabelGroups {
        let mut groups = LabelGroups::new();
        groups.insert(
            "B".to_string(),
            vec![Point::new(0.0, 0.0), Point::new(63.0, 0.0), Point::new(100.0, 0.0)],
        );
        groups.insert(
            "A".to_string(),
            vec![Point::new(0.0, 0.0), Point::new(50.2, 0.0), Point::new(100.0, 0.0)],
        );
        groups.insert("C".to_string(), vec![Point::new(1.0, 1.0)]);
        groups
    }

    #[test]
    fn test_point_count_lines_sorted() {
        let lines = point_count_lines(&sample_groups());
        assert_eq!(
            lines,
            vec!["  A: 3 points", "  B: 3 points", "  C: 1 points"]
        );
    }

    #[test]
    fn test_summary_lines() {
        let report = RunReport::build(&sample_groups(), 3, 0.25);
        let lines = summary_lines(&report);

        assert_eq!(lines[0], "Loaded 7 points across 3 labels.");
        assert_eq!(lines[1], "- A: 3 points, indices=[1]");
        assert_eq!(lines[2], "- B: 3 points, indices=[], 1 out-of-range");
        assert_eq!(lines[3], "- C: 1 points, indices=[]");
        assert_eq!(lines[4], "Combined nozzle list (1 unique): [1]");
    }

    #[test]
    fn test_detail_lines() {
        let report = RunReport::build(&sample_groups(), 3, 0.25);

        let b = detail_lines(&report.labels[1]);
        assert_eq!(b[0], "[B] 3 points");
        assert_eq!(b.len(), 5);
        assert!(b[4].contains("63.0000"));
        assert!(b[4].contains("1.2600"));
        assert!(b[4].ends_with("MISS"));

        let c = detail_lines(&report.labels[2]);
        assert_eq!(c.last().unwrap(), "  no interior points");
    }
}

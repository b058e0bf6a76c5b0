//! Matching of levelled strip coordinates against an evenly spaced nozzle grid.
//!
//! The two extreme coordinates of a strip anchor the grid: the smallest is
//! nozzle 0 and the largest is nozzle `N - 1`. Every coordinate in between is
//! snapped to the nearest grid index and accepted when it lies within the
//! tolerance of that index.
//!
//! Ties are rounded half to even, so a coordinate exactly half way between two
//! nozzles has a deviation of 0.5 and is accepted only when the tolerance
//! exceeds 0.5.

/// Outcome for one interior coordinate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchDetail {
    /// Levelled coordinate along the strip.
    pub coord: f64,
    /// Continuous position in nozzle steps from the grid start.
    pub position: f64,
    /// Nearest grid index.
    pub index: usize,
    /// Whether `|index - position| < tolerance`.
    pub in_tolerance: bool,
}

/// An interior coordinate rejected by the tolerance check.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutOfRange {
    pub coord: f64,
    pub position: f64,
}

/// Result of matching one strip against the grid.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GridMatch {
    /// Accepted indices in ascending coordinate order.
    pub indices: Vec<usize>,
    pub out_of_range: Vec<OutOfRange>,
    pub start: f64,
    pub end: f64,
    pub step: f64,
    /// One entry per interior coordinate, accepted or not.
    pub details: Vec<MatchDetail>,
}

impl GridMatch {
    #[inline]
    pub fn has_misses(&self) -> bool {
        !self.out_of_range.is_empty()
    }
}

/// Match levelled coordinates against a grid of `nozzle_count` nozzles.
///
/// Fewer than two coordinates or fewer than two nozzles leave no grid to build
/// and produce an empty result with zero bounds. If all coordinates coincide
/// the grid has zero width; interior points are then reported out of range
/// with a NaN position.
pub fn match_indices(coords: &[f64], nozzle_count: usize, tolerance: f64) -> GridMatch {
    if coords.len() < 2 || nozzle_count < 2 {
        return GridMatch::default();
    }

    let mut sorted = coords.to_vec();
    sorted.sort_by(f64::total_cmp);

    let start = sorted[0];
    let end = sorted[sorted.len() - 1];
    let interior = &sorted[1..sorted.len() - 1];

    let step = (end - start) / (nozzle_count - 1) as f64;
    let has_grid = step > 0.0 && step.is_finite();

    let mut result = GridMatch {
        indices: Vec::with_capacity(interior.len()),
        out_of_range: Vec::new(),
        start,
        end,
        step,
        details: Vec::with_capacity(interior.len()),
    };

    for &coord in interior {
        let position = if has_grid {
            (coord - start) / step
        } else {
            f64::NAN
        };
        let rounded = position.round_ties_even();
        let in_tolerance = (rounded - position).abs() < tolerance;
        // position >= 0 for interior points; NaN saturates to 0
        let index = rounded as usize;

        if in_tolerance {
            result.indices.push(index);
        } else {
            result.out_of_range.push(OutOfRange { coord, position });
        }
        result.details.push(MatchDetail {
            coord,
            position,
            index,
            in_tolerance,
        });
    }

    result
}

//! Strip orientation estimation and levelling.
//!
//! A measurement strip is assumed to lie along a straight line. Its tilt is
//! taken from the two extreme points along X, and the whole strip is rotated
//! by the opposite angle so that line becomes horizontal.

use log::debug;
use nalgebra::{Point2, Rotation2};

use super::loaders::Point;

/// Tilt of a strip and its levelled points.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Orientation {
    /// Angle of the endpoint line in radians, `atan2(dy, dx)`.
    pub angle_rad: f64,
    /// Points rotated by `-angle_rad`, ordered by their original X.
    pub rotated: Vec<Point>,
}

impl Orientation {
    #[inline]
    pub fn angle_deg(&self) -> f64 {
        self.angle_rad.to_degrees()
    }

    /// Rotated X coordinates, in the same order as `rotated`.
    pub fn rotated_xs(&self) -> Vec<f64> {
        self.rotated.iter().map(|p| p.x).collect()
    }
}

/// Rotate points about the origin by `angle_rad` (counter-clockwise).
pub fn rotate_points(points: &[Point], angle_rad: f64) -> Vec<Point> {
    let rotation = Rotation2::new(angle_rad);
    points
        .iter()
        .map(|p| {
            let r = rotation * Point2::new(p.x, p.y);
            Point::new(r.x, r.y)
        })
        .collect()
}

/// Estimate the tilt of a strip and level it.
///
/// Points are stably sorted by X; the first and last sorted points define the
/// strip direction. `atan2` is used rather than the slope so a near-vertical
/// endpoint line does not flip by 90 degrees.
///
/// Returns `None` for fewer than two points, where no direction exists.
pub fn orient_strip(points: &[Point]) -> Option<Orientation> {
    if points.len() < 2 {
        return None;
    }

    let mut sorted = points.to_vec();
    sorted.sort_by(|a, b| a.x.total_cmp(&b.x));

    let first = sorted[0];
    let last = sorted[sorted.len() - 1];
    let angle_rad = (last.y - first.y).atan2(last.x - first.x);

    debug!(
        "Strip of {} points tilted {:.4} deg",
        sorted.len(),
        angle_rad.to_degrees()
    );

    Some(Orientation {
        angle_rad,
        rotated: rotate_points(&sorted, -angle_rad),
    })
}

// src/algebra.rs
//
// Adapter over the external polygon boolean engine (`i_overlay`). Everything
// here works on flattened point rings; the engine decides how unions split or
// merge contours, including multi-ring results.

use i_overlay::core::fill_rule::FillRule;
use i_overlay::core::overlay_rule::OverlayRule;
use i_overlay::float::single::SingleFloatOverlay;

use crate::geometry::{Ring, AREA_EPSILON};

/// Boolean set operation on two polygon areas.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BoolOp {
    Union,
    Intersect,
    Difference,
    Xor,
}

fn rule(op: BoolOp) -> OverlayRule {
    match op {
        BoolOp::Union => OverlayRule::Union,
        BoolOp::Intersect => OverlayRule::Intersect,
        BoolOp::Difference => OverlayRule::Difference,
        BoolOp::Xor => OverlayRule::Xor,
    }
}

/// Combines `subject` with `clip` under `op`, returning the resulting rings.
///
/// Contours with fewer than 3 points are discarded; the survivors are
/// simplified so that vertices left on straight edges by the engine do not
/// leak into equality comparisons or reconstruction text.
pub fn combine(subject: &[Ring], clip: &[Ring], op: BoolOp) -> Vec<Ring> {
    let subj: Vec<Vec<[f64; 2]>> = subject.iter().map(Ring::to_path).collect();
    let clip_paths: Vec<Vec<[f64; 2]>> = clip.iter().map(Ring::to_path).collect();

    let shapes = subj.overlay(&clip_paths, rule(op), FillRule::NonZero);

    let mut rings = Vec::new();
    for shape in shapes {
        for contour in shape {
            if contour.len() >= 3 {
                let ring = Ring::from_path(contour).simplified();
                if ring.len() >= 3 {
                    rings.push(ring);
                }
            }
        }
    }
    rings
}

fn total_area(rings: &[Ring]) -> f64 {
    rings.iter().map(Ring::area).sum()
}

/// True iff the two areas intersect with non-degenerate overlap.
pub fn overlaps(a: &[Ring], b: &[Ring]) -> bool {
    total_area(&combine(a, b, BoolOp::Intersect)) > AREA_EPSILON
}

/// True iff `b`'s area is entirely contained within `a`'s area.
pub fn covers(a: &[Ring], b: &[Ring]) -> bool {
    total_area(&combine(b, a, BoolOp::Difference)) <= AREA_EPSILON
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use glam::DVec2;

    fn rect(min: DVec2, max: DVec2) -> Ring {
        Ring::new(vec![
            min,
            DVec2::new(max.x, min.y),
            max,
            DVec2::new(min.x, max.y),
        ])
    }

    #[test]
    fn union_of_adjacent_squares_is_one_rectangle() {
        let a = [rect(DVec2::new(-1.0, 0.0), DVec2::new(0.0, 1.0))];
        let b = [rect(DVec2::new(0.0, 0.0), DVec2::new(1.0, 1.0))];
        let out = combine(&a, &b, BoolOp::Union);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].len(), 4);
        assert_abs_diff_eq!(out[0].area(), 2.0, epsilon = 1e-6);
    }

    #[test]
    fn intersection_of_disjoint_squares_is_empty() {
        let a = [rect(DVec2::new(0.0, 0.0), DVec2::new(1.0, 1.0))];
        let b = [rect(DVec2::new(5.0, 5.0), DVec2::new(6.0, 6.0))];
        assert!(combine(&a, &b, BoolOp::Intersect).is_empty());
        assert!(!overlaps(&a, &b));
    }

    #[test]
    fn difference_can_split_into_multiple_rings() {
        // Carve a vertical channel through the middle of a wide rectangle.
        let base = [rect(DVec2::new(0.0, 0.0), DVec2::new(3.0, 1.0))];
        let channel = [rect(DVec2::new(1.0, -1.0), DVec2::new(2.0, 2.0))];
        let out = combine(&base, &channel, BoolOp::Difference);
        assert_eq!(out.len(), 2);
        assert_abs_diff_eq!(total_area(&out), 2.0, epsilon = 1e-6);
    }

    #[test]
    fn covers_requires_full_containment() {
        let outer = [rect(DVec2::new(0.0, 0.0), DVec2::new(4.0, 4.0))];
        let inner = [rect(DVec2::new(1.0, 1.0), DVec2::new(2.0, 2.0))];
        let poking_out = [rect(DVec2::new(3.0, 3.0), DVec2::new(5.0, 5.0))];
        assert!(covers(&outer, &inner));
        assert!(!covers(&outer, &poking_out));
        assert!(!covers(&inner, &outer));
    }
}

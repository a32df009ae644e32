//! Geometry builder: motion code + pen position to a path primitive

use mpfview_core::{PathSegment, Point2D};

/// Build the segment a motion code describes, starting at the pen position
///
/// Codes 0 and 1 give a line; 2 (clockwise) and 3 (counter-clockwise) give
/// an arc whose center is `start + (i, j)`. Any other code gives `None`, and
/// the caller must then leave the pen where it is.
pub fn build_segment(
    code: i32,
    start: Point2D,
    end: Point2D,
    i: f64,
    j: f64,
) -> Option<PathSegment> {
    match code {
        0 | 1 => Some(PathSegment::line(start, end)),
        2 | 3 => {
            let center = start.offset(i, j);
            Some(PathSegment::arc(start, end, center, code == 2))
        }
        _ => None,
    }
}

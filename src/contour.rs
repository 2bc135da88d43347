use ndarray::Array2;

use crate::bitmap::NEIGHBORS;
use crate::geometry::PixelCoord;

/// Jumps longer than this get a synthesized midpoint when ordering a contour.
pub const STITCH_DISTANCE: f64 = 2.5;

/// Contours with this many points or fewer are discarded.
const MIN_CONTOUR_POINTS: usize = 2;

/// Collect the boundary component containing `start` by depth-first flood fill.
///
/// Neighbors are pushed without checks and validated when popped, so the
/// same cell may sit on the stack several times. `visited` is shared across
/// calls and marks every collected cell.
pub fn trace_contour(
    boundary: &Array2<bool>,
    start: PixelCoord,
    visited: &mut Array2<bool>,
) -> Vec<PixelCoord> {
    let mut contour = Vec::new();
    let mut stack: Vec<(i64, i64)> = vec![(start.x as i64, start.y as i64)];

    while let Some((x, y)) = stack.pop() {
        if x < 0 || y < 0 {
            continue;
        }
        let idx = [y as usize, x as usize];
        match boundary.get(idx) {
            Some(&true) => {}
            _ => continue,
        }
        if visited[idx] {
            continue;
        }
        visited[idx] = true;
        contour.push(PixelCoord::new(x as u32, y as u32));

        for (dx, dy) in NEIGHBORS {
            stack.push((x + dx, y + dy));
        }
    }

    contour
}

/// Split a boundary map into its connected components, scanning row-major.
///
/// Components with two points or fewer are dropped.
pub fn find_contours(boundary: &Array2<bool>) -> Vec<Vec<PixelCoord>> {
    let mut visited = Array2::from_elem(boundary.dim(), false);
    let mut contours = Vec::new();

    for ((y, x), &is_boundary) in boundary.indexed_iter() {
        if !is_boundary || visited[[y, x]] {
            continue;
        }
        let contour = trace_contour(boundary, PixelCoord::new(x as u32, y as u32), &mut visited);
        if contour.len() > MIN_CONTOUR_POINTS {
            contours.push(contour);
        }
    }

    contours
}

/// Arrange an unordered contour into a nearest-neighbor tour.
///
/// The tour starts at the first point. Whenever the nearest remaining point is
/// farther than [`STITCH_DISTANCE`], the rounded midpoint is inserted first.
pub fn order_contour(contour: &[PixelCoord]) -> Vec<PixelCoord> {
    if contour.len() <= MIN_CONTOUR_POINTS {
        return contour.to_vec();
    }

    let mut used = vec![false; contour.len()];
    used[0] = true;
    let mut remaining = contour.len() - 1;
    let mut current = contour[0];
    let mut ordered = Vec::with_capacity(contour.len() + contour.len() / 4);
    ordered.push(current);

    while remaining > 0 {
        let mut closest: Option<(usize, f64)> = None;
        for (i, point) in contour.iter().enumerate() {
            if used[i] {
                continue;
            }
            let distance = current.distance(point);
            if closest.is_none_or(|(_, best)| distance < best) {
                closest = Some((i, distance));
            }
        }

        let Some((i, distance)) = closest else {
            break;
        };
        let next = contour[i];
        if distance > STITCH_DISTANCE {
            ordered.push(current.midpoint(&next));
        }
        ordered.push(next);
        used[i] = true;
        remaining -= 1;
        current = next;
    }

    ordered
}

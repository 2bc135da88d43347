use crate::geometry::PixelCoord;

/// Distance from `point` to the segment `start..end`.
///
/// The projection parameter is clamped to `[0, 1]`, so points projecting
/// outside the segment measure to the nearest endpoint. A zero-length segment
/// degrades to point distance.
pub fn segment_distance(point: &PixelCoord, start: &PixelCoord, end: &PixelCoord) -> f64 {
    let (px, py) = (point.x as f64, point.y as f64);
    let (sx, sy) = (start.x as f64, start.y as f64);
    let dx = end.x as f64 - sx;
    let dy = end.y as f64 - sy;

    let length_sq = dx * dx + dy * dy;
    if length_sq == 0.0 {
        return point.distance(start);
    }

    let t = (((px - sx) * dx + (py - sy) * dy) / length_sq).clamp(0.0, 1.0);
    let proj_x = sx + t * dx;
    let proj_y = sy + t * dy;
    (px - proj_x).hypot(py - proj_y)
}

/// Douglas-Peucker simplification of an ordered point run.
///
/// A slice whose endpoints coincide collapses to those two points. A slice
/// whose farthest point deviates less than `tolerance` (or not at all)
/// collapses to its endpoints; otherwise it is split at the farthest point.
/// Ranges are processed with an explicit stack, giving the same output as
/// the recursive formulation without its depth limit.
pub fn simplify_path(points: &[PixelCoord], tolerance: f64) -> Vec<PixelCoord> {
    if points.len() <= 2 {
        return points.to_vec();
    }

    let last = points.len() - 1;
    let mut keep = vec![false; points.len()];
    keep[0] = true;
    keep[last] = true;

    let mut ranges = vec![(0usize, last)];
    while let Some((first, end)) = ranges.pop() {
        if end - first < 2 {
            continue;
        }
        let (start_pt, end_pt) = (&points[first], &points[end]);
        if start_pt == end_pt {
            continue;
        }

        let mut max_distance = 0.0;
        let mut index = first;
        for (i, point) in points.iter().enumerate().take(end).skip(first + 1) {
            let distance = segment_distance(point, start_pt, end_pt);
            if distance > max_distance {
                max_distance = distance;
                index = i;
            }
        }

        if index == first || max_distance < tolerance {
            continue;
        }
        keep[index] = true;
        ranges.push((index, end));
        ranges.push((first, index));
    }

    points
        .iter()
        .zip(keep)
        .filter_map(|(point, kept)| kept.then_some(*point))
        .collect()
}

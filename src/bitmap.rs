use ndarray::Array2;

use crate::config::BoundaryPolicy;
use crate::geometry::PixelCoord;

/// The 8-neighborhood, scanned row by row from the top-left.
pub(crate) const NEIGHBORS: [(i64, i64); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Build a `height x width` occupancy grid, true at every listed pixel.
///
/// Pixels outside the grid are ignored.
pub fn rasterize_bucket(pixels: &[PixelCoord], width: u32, height: u32) -> Array2<bool> {
    let mut bitmap = Array2::from_elem((height as usize, width as usize), false);
    for p in pixels {
        if let Some(cell) = bitmap.get_mut([p.y as usize, p.x as usize]) {
            *cell = true;
        }
    }
    bitmap
}

/// Mark occupied cells that touch empty space.
///
/// With [`BoundaryPolicy::InteriorOnly`] only cells with `1 <= y <= h-2` and
/// `1 <= x <= w-2` are evaluated, so rasters narrower than 3 cells in either
/// direction produce no boundary at all.
pub fn extract_boundary(bitmap: &Array2<bool>, policy: BoundaryPolicy) -> Array2<bool> {
    let (h, w) = bitmap.dim();
    let mut boundary = Array2::from_elem((h, w), false);

    let (ys, xs) = match policy {
        BoundaryPolicy::InteriorOnly => {
            if h < 3 || w < 3 {
                return boundary;
            }
            (1..h - 1, 1..w - 1)
        }
        BoundaryPolicy::IncludeImageEdges => (0..h, 0..w),
    };

    for y in ys {
        for x in xs.clone() {
            if !bitmap[[y, x]] {
                continue;
            }
            let touches_empty = NEIGHBORS.iter().any(|&(dx, dy)| {
                let nx = x as i64 + dx;
                let ny = y as i64 + dy;
                if nx < 0 || ny < 0 {
                    return true;
                }
                match bitmap.get([ny as usize, nx as usize]) {
                    Some(&occupied) => !occupied,
                    None => true,
                }
            });
            if touches_empty {
                boundary[[y, x]] = true;
            }
        }
    }

    boundary
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(w: u32, h: u32) -> Vec<PixelCoord> {
        (0..h)
            .flat_map(|y| (0..w).map(move |x| PixelCoord::new(x, y)))
            .collect()
    }

    fn count(grid: &Array2<bool>) -> usize {
        grid.iter().filter(|&&v| v).count()
    }

    mod rasterize_bucket {
        use super::*;

        #[test]
        fn marks_listed_pixels() {
            let pixels = [PixelCoord::new(0, 0), PixelCoord::new(2, 1)];
            let bitmap = rasterize_bucket(&pixels, 3, 2);
            assert_eq!(bitmap.dim(), (2, 3));
            assert!(bitmap[[0, 0]]);
            assert!(bitmap[[1, 2]]);
            assert_eq!(count(&bitmap), 2);
        }

        #[test]
        fn ignores_out_of_range_pixels() {
            let pixels = [PixelCoord::new(5, 5)];
            let bitmap = rasterize_bucket(&pixels, 3, 3);
            assert_eq!(count(&bitmap), 0);
        }
    }

    mod extract_boundary {
        use super::*;

        mod unit {
            use super::*;

            #[test]
            fn solid_four_by_four_has_no_interior_boundary() {
                let bitmap = rasterize_bucket(&filled(4, 4), 4, 4);
                let boundary = extract_boundary(&bitmap, BoundaryPolicy::InteriorOnly);
                assert_eq!(count(&boundary), 0);
            }

            #[test]
            fn border_cells_are_never_marked() {
                let mut pixels = filled(5, 5);
                pixels.retain(|p| !(p.x == 2 && p.y == 2));
                let bitmap = rasterize_bucket(&pixels, 5, 5);
                let boundary = extract_boundary(&bitmap, BoundaryPolicy::InteriorOnly);
                for y in 0..5 {
                    assert!(!boundary[[y, 0]]);
                    assert!(!boundary[[y, 4]]);
                    assert!(!boundary[[0, y]]);
                    assert!(!boundary[[4, y]]);
                }
                // the ring around the hole
                assert_eq!(count(&boundary), 8);
            }

            #[test]
            fn empty_cells_are_not_boundary() {
                let pixels = [PixelCoord::new(1, 1)];
                let bitmap = rasterize_bucket(&pixels, 3, 3);
                let boundary = extract_boundary(&bitmap, BoundaryPolicy::InteriorOnly);
                assert_eq!(count(&boundary), 1);
                assert!(boundary[[1, 1]]);
            }

            #[test]
            fn edge_policy_marks_image_border() {
                let bitmap = rasterize_bucket(&filled(4, 4), 4, 4);
                let boundary = extract_boundary(&bitmap, BoundaryPolicy::IncludeImageEdges);
                // all 12 perimeter cells, none of the 2x2 interior
                assert_eq!(count(&boundary), 12);
                assert!(!boundary[[1, 1]]);
                assert!(boundary[[0, 0]]);
            }

            #[test]
            fn edge_policy_handles_tiny_rasters() {
                let bitmap = rasterize_bucket(&filled(2, 1), 2, 1);
                let boundary = extract_boundary(&bitmap, BoundaryPolicy::IncludeImageEdges);
                assert_eq!(count(&boundary), 2);
            }
        }

        mod prop {
            use super::*;
            use proptest::prelude::*;

            proptest! {
                /// Rasters thinner than 3 cells never produce interior boundaries.
                #[test]
                fn thin_rasters_have_no_boundary(
                    w in 1u32..3,
                    h in 1u32..12,
                    transpose in proptest::bool::ANY
                ) {
                    let (w, h) = if transpose { (h, w) } else { (w, h) };
                    let bitmap = rasterize_bucket(&filled(w, h), w, h);
                    let boundary = extract_boundary(&bitmap, BoundaryPolicy::InteriorOnly);
                    prop_assert_eq!(count(&boundary), 0);
                }

                /// Boundary cells are always occupied cells.
                #[test]
                fn boundary_is_subset_of_bitmap(
                    cells in proptest::collection::vec(proptest::bool::ANY, 64)
                ) {
                    let pixels: Vec<PixelCoord> = cells
                        .iter()
                        .enumerate()
                        .filter(|(_, on)| **on)
                        .map(|(i, _)| PixelCoord::new(i as u32 % 8, i as u32 / 8))
                        .collect();
                    let bitmap = rasterize_bucket(&pixels, 8, 8);
                    let boundary = extract_boundary(&bitmap, BoundaryPolicy::InteriorOnly);
                    for ((y, x), &b) in boundary.indexed_iter() {
                        if b {
                            prop_assert!(bitmap[[y, x]]);
                        }
                    }
                }
            }
        }
    }
}

use image::Rgb;

use crate::layer::ColorLayer;

/// Largest possible Euclidean distance between two RGB colors, `sqrt(3 * 255^2)`.
pub const MAX_RGB_DISTANCE: f64 = 441.67;

/// Layers scoring strictly above this similarity join the same group.
pub const MERGE_SIMILARITY: f64 = 0.9;

/// Normalized inverse Euclidean distance: 1 for equal colors, 0 for black vs white.
pub fn color_similarity(a: Rgb<u8>, b: Rgb<u8>) -> f64 {
    let distance = a
        .0
        .iter()
        .zip(b.0.iter())
        .map(|(&x, &y)| {
            let d = x as f64 - y as f64;
            d * d
        })
        .sum::<f64>()
        .sqrt();
    1.0 - (distance / MAX_RGB_DISTANCE).min(1.0)
}

/// Coalesce layers whose colors are close to a group's first member.
///
/// Each layer joins the first group whose representative scores above
/// [`MERGE_SIMILARITY`]. A group with several members becomes a single layer
/// carrying one space-joined path string under the representative's color;
/// single-member groups pass through unchanged.
pub fn merge_similar_layers(layers: Vec<ColorLayer>) -> Vec<ColorLayer> {
    let mut groups: Vec<Vec<ColorLayer>> = Vec::new();

    for layer in layers {
        let target = groups
            .iter_mut()
            .find(|group| color_similarity(layer.color, group[0].color) > MERGE_SIMILARITY);
        match target {
            Some(group) => group.push(layer),
            None => groups.push(vec![layer]),
        }
    }

    groups
        .into_iter()
        .filter_map(|mut group| {
            if group.len() == 1 {
                return group.pop();
            }
            let color = group[0].color;
            let combined = group
                .iter()
                .map(ColorLayer::joined_paths)
                .collect::<Vec<_>>()
                .join(" ");
            Some(ColorLayer::new(color, vec![combined]))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layer(color: [u8; 3], path: &str) -> ColorLayer {
        ColorLayer::new(Rgb(color), vec![path.to_string()])
    }

    mod color_similarity {
        use super::*;

        #[test]
        fn identical_colors_score_one() {
            assert_eq!(color_similarity(Rgb([7, 8, 9]), Rgb([7, 8, 9])), 1.0);
        }

        #[test]
        fn black_and_white_score_zero() {
            let s = color_similarity(Rgb([0, 0, 0]), Rgb([255, 255, 255]));
            assert!(s.abs() < 1e-3);
        }

        #[test]
        fn near_black_pair_is_similar() {
            let s = color_similarity(Rgb([10, 10, 10]), Rgb([12, 11, 9]));
            assert!((s - 0.9945).abs() < 1e-3);
        }
    }

    mod merge_similar_layers {
        use super::*;

        mod unit {
            use super::*;

            #[test]
            fn near_colors_merge_and_distant_colors_stay() {
                let merged = merge_similar_layers(vec![
                    layer([10, 10, 10], "M 0 0 L 1 1 Z"),
                    layer([12, 11, 9], "M 4 4 L 5 5 Z"),
                    layer([250, 250, 250], "M 8 8 L 9 9 Z"),
                ]);
                assert_eq!(merged.len(), 2);
                assert_eq!(merged[0].color, Rgb([10, 10, 10]));
                assert_eq!(merged[0].paths, vec!["M 0 0 L 1 1 Z M 4 4 L 5 5 Z"]);
                assert_eq!(merged[1], layer([250, 250, 250], "M 8 8 L 9 9 Z"));
            }

            #[test]
            fn distant_colors_pass_through() {
                let input = vec![
                    layer([0, 0, 0], "M 0 0 Z"),
                    layer([120, 0, 0], "M 1 1 Z"),
                    layer([0, 120, 0], "M 2 2 Z"),
                ];
                assert_eq!(merge_similar_layers(input.clone()), input);
            }

            #[test]
            fn members_compare_against_the_first_member_only() {
                // 30 apart from the first is inside the group, 60 apart is not,
                // even though it is only 30 apart from the second member.
                let merged = merge_similar_layers(vec![
                    layer([100, 100, 100], "M 0 0 Z"),
                    layer([130, 100, 100], "M 1 1 Z"),
                    layer([160, 100, 100], "M 2 2 Z"),
                ]);
                assert_eq!(merged.len(), 2);
                assert_eq!(merged[1].color, Rgb([160, 100, 100]));
            }

            #[test]
            fn multi_path_members_are_flattened() {
                let mut first = layer([0, 0, 0], "M 0 0 Z");
                first.paths.push("M 1 1 Z".into());
                let merged = merge_similar_layers(vec![first, layer([1, 1, 1], "M 2 2 Z")]);
                assert_eq!(merged[0].paths, vec!["M 0 0 Z M 1 1 Z M 2 2 Z"]);
            }

            #[test]
            fn empty_input_stays_empty() {
                assert!(merge_similar_layers(Vec::new()).is_empty());
            }
        }

        mod prop {
            use super::*;
            use proptest::prelude::*;

            proptest! {
                /// Merging never adds layers.
                #[test]
                fn never_increases_layer_count(
                    colors in proptest::collection::vec(proptest::array::uniform3(proptest::num::u8::ANY), 0..12)
                ) {
                    let layers: Vec<ColorLayer> = colors.iter().map(|c| layer(*c, "M 0 0 Z")).collect();
                    let count = layers.len();
                    prop_assert!(merge_similar_layers(layers).len() <= count);
                }

                /// Colors within a few steps of one representative collapse to one layer.
                #[test]
                fn close_colors_collapse_to_one(
                    base in proptest::array::uniform3(10u8..240),
                    offsets in proptest::collection::vec(proptest::array::uniform3(0u8..10), 1..8)
                ) {
                    let mut layers = vec![layer(base, "M 0 0 Z")];
                    for o in &offsets {
                        let c = [base[0] + o[0], base[1] + o[1], base[2] + o[2]];
                        layers.push(layer(c, "M 1 1 Z"));
                    }
                    prop_assert_eq!(merge_similar_layers(layers).len(), 1);
                }
            }
        }
    }
}

use std::path::{Path, PathBuf};

use vectorize::{ImageAnalysis, ProcessingOptions};

/// Derive an SVG file path by changing the extension to "svg".
pub fn derive_svg_path(input: &Path) -> PathBuf {
    let mut path = input.to_path_buf();
    path.set_extension("svg");
    path
}

/// Print the options a run will use.
pub fn print_options(options: &ProcessingOptions) {
    println!("  color precision:       {}", options.color_precision);
    println!("  path precision:        {}", options.path_precision);
    println!("  line threshold:        {}", options.line_threshold);
    println!("  path smoothing:        {}", options.path_smoothing);
    println!("  gradient optimization: {}", options.gradient_optimization);
}

/// Print an analysis summary followed by its recommended options.
pub fn print_analysis(analysis: &ImageAnalysis) {
    println!("Entropy:        {:.3} bits", analysis.entropy);
    println!("Complexity:     {:.3}", analysis.complexity);
    println!("Text-like:      {}", analysis.text_like);
    println!("Suggested mode: {}", analysis.suggested_mode);
    println!("Recommended options:");
    print_options(&analysis.options);
}

use vectorize::{VectorizeResult, analyze_image, open_rgba};

use crate::cli::AnalyzeCommand;

use super::utils::print_analysis;

/// The main function to run the analyze command.
pub fn run(cmd: AnalyzeCommand) -> VectorizeResult<()> {
    let image = open_rgba(&cmd.input)?;
    let (width, height) = image.dimensions();
    println!("{} ({width}x{height})", cmd.input.display());
    print_analysis(&analyze_image(&image));
    Ok(())
}

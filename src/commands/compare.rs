use vectorize::{VectorizeResult, open_rgba, structural_similarity};

use crate::cli::CompareCommand;

/// The main function to run the compare command.
pub fn run(cmd: CompareCommand) -> VectorizeResult<()> {
    let original = open_rgba(&cmd.original)?;
    let converted = open_rgba(&cmd.converted)?;
    let score = structural_similarity(&original, &converted)?;
    println!("SSIM: {score:.4}");
    Ok(())
}

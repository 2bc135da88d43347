use vectorize::VectorizeError;

pub fn report_error(err: &VectorizeError) {
    match err {
        VectorizeError::DimensionMismatch { expected, found } => {
            eprintln!(
                "Cannot compare a {}x{} image against a {}x{} image.",
                found.0, found.1, expected.0, expected.1
            );
            eprintln!();
            eprintln!("Render the converted SVG at the original resolution and try again.");
        }
        VectorizeError::InvalidOption(message) => {
            eprintln!("Invalid option: {message}");
            eprintln!();
            eprintln!("Run `vectorize trace --help` for accepted values.");
        }
        _ => {
            eprintln!("{err}");
        }
    }
}

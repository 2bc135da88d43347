use vectorize::{
    ProcessingOptions, QuantizingTracer, RasterTracer, VectorizeResult, VtracerTracer,
    analyze_image, open_rgba,
};

use crate::cli::{BackendArg, TraceCommand};

use super::utils::{derive_svg_path, print_analysis};

/// The main function to run the trace command.
pub fn run(cmd: TraceCommand) -> VectorizeResult<()> {
    let image = open_rgba(&cmd.input)?;
    let output_path = cmd
        .output
        .clone()
        .unwrap_or_else(|| derive_svg_path(&cmd.input));

    let options = if cmd.auto {
        let analysis = analyze_image(&image);
        print_analysis(&analysis);
        analysis.options
    } else {
        ProcessingOptions::from(&cmd.options)
    };

    let tracer: Box<dyn RasterTracer> = match cmd.backend {
        BackendArg::Native => Box::new(QuantizingTracer),
        BackendArg::Vtracer => Box::new(VtracerTracer::default()),
    };
    let result = tracer.trace(&image, &options)?;

    result.save_svg(&output_path)?;
    println!(
        "{} layers, {} paths",
        result.layers.len(),
        result.path_count()
    );
    println!("SVG saved to {}", output_path.display());

    Ok(())
}

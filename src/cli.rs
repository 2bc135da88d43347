use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use vectorize::{BoundaryPolicy, PathSmoothing, ProcessingOptions};

/// Command line interface definition.
#[derive(Parser, Debug)]
#[command(author, version, about, propagate_version = true)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOptions,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Debug)]
pub struct GlobalOptions {
    /// Worker thread count for per-color tracing (None to let rayon decide)
    #[arg(long, global = true, env = "VECTORIZE_THREADS")]
    pub threads: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Convert a raster image into an SVG of flat color layers
    Trace(TraceCommand),
    /// Print the image analysis and the options it recommends
    Analyze(AnalyzeCommand),
    /// Print the structural similarity between two rasters of equal size
    Compare(CompareCommand),
}

/// Tracing backends.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum BackendArg {
    Native,
    Vtracer,
}

/// Path smoothing levels.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum SmoothingArg {
    High,
    Balanced,
    Minimal,
}

impl From<SmoothingArg> for PathSmoothing {
    fn from(value: SmoothingArg) -> Self {
        match value {
            SmoothingArg::High => PathSmoothing::High,
            SmoothingArg::Balanced => PathSmoothing::Balanced,
            SmoothingArg::Minimal => PathSmoothing::Minimal,
        }
    }
}

#[derive(Args, Debug)]
pub struct TraceCommand {
    /// Input image path
    pub input: PathBuf,
    /// Output SVG path (defaults to input name with `.svg`)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    /// Pick options from the image analysis, ignoring the option flags
    #[arg(long)]
    pub auto: bool,
    /// Backend that performs the tracing
    #[arg(long, value_enum, default_value_t = BackendArg::Native)]
    pub backend: BackendArg,
    #[command(flatten)]
    pub options: ProcessingArgs,
}

#[derive(Args, Debug)]
pub struct ProcessingArgs {
    /// Quantization levels per channel (at least 2)
    #[arg(long = "color-precision", default_value_t = 8, value_parser = clap::value_parser!(u32).range(2..))]
    pub color_precision: u32,
    /// Path precision; simplification tolerance is `6 - value`
    #[arg(long = "path-precision", default_value_t = 2.0)]
    pub path_precision: f64,
    /// Line threshold, kept in the result metadata
    #[arg(long = "line-threshold", default_value_t = 0.1)]
    pub line_threshold: f64,
    /// Path smoothing level
    #[arg(long, value_enum, default_value_t = SmoothingArg::Balanced)]
    pub smoothing: SmoothingArg,
    /// Keep similar colors as separate layers
    #[arg(long = "no-merge")]
    pub no_merge: bool,
    /// Trace shapes touching the image border
    #[arg(long = "include-edges")]
    pub include_edges: bool,
}

impl From<&ProcessingArgs> for ProcessingOptions {
    fn from(args: &ProcessingArgs) -> Self {
        let boundary_policy = if args.include_edges {
            BoundaryPolicy::IncludeImageEdges
        } else {
            BoundaryPolicy::InteriorOnly
        };
        ProcessingOptions::default()
            .with_color_precision(args.color_precision)
            .with_path_precision(args.path_precision)
            .with_line_threshold(args.line_threshold)
            .with_path_smoothing(args.smoothing.into())
            .with_gradient_optimization(!args.no_merge)
            .with_boundary_policy(boundary_policy)
    }
}

#[derive(Args, Debug)]
pub struct AnalyzeCommand {
    /// Input image path
    pub input: PathBuf,
}

#[derive(Args, Debug)]
pub struct CompareCommand {
    /// Reference image path
    pub original: PathBuf,
    /// Image to score against the reference
    pub converted: PathBuf,
}

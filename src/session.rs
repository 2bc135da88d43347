//! Run coordination for interactive use.
//!
//! Every run takes a ticket from a monotonic generation counter. Starting a
//! new run makes all older tickets stale: stale runs stop between buckets and
//! never publish, so the published slot always holds the newest finished run.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use image::RgbaImage;
use tracing::{debug, info};

use crate::analysis::{ImageAnalysis, analyze_image};
use crate::config::ProcessingOptions;
use crate::layer::ProcessingResult;
use crate::vectorizer::{QuantizingTracer, RasterTracer};
use crate::{VectorizeError, VectorizeResult};

/// Where the options of the next run come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProcessingMode {
    /// Options are recommended by the image analyzer on every load.
    #[default]
    Automatic,
    /// Options are supplied by the caller.
    Manual,
}

/// Proof of having started a run; stale once a newer run starts.
#[derive(Debug, Clone)]
pub struct RunTicket {
    generation: u64,
    counter: Arc<AtomicU64>,
}

impl RunTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_current(&self) -> bool {
        self.counter.load(Ordering::Acquire) == self.generation
    }
}

#[derive(Debug, Default)]
struct SessionState {
    image: Option<Arc<RgbaImage>>,
    options: ProcessingOptions,
    mode: ProcessingMode,
    analysis: Option<ImageAnalysis>,
}

#[derive(Debug, Default)]
struct Published {
    generation: u64,
    result: Option<Arc<ProcessingResult>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Holds the loaded image, the active options and the latest published result.
#[derive(Debug)]
pub struct TraceSession<T = QuantizingTracer> {
    tracer: T,
    counter: Arc<AtomicU64>,
    state: Mutex<SessionState>,
    published: Mutex<Published>,
}

impl Default for TraceSession<QuantizingTracer> {
    fn default() -> Self {
        Self::new(QuantizingTracer)
    }
}

impl<T: RasterTracer> TraceSession<T> {
    pub fn new(tracer: T) -> Self {
        Self {
            tracer,
            counter: Arc::new(AtomicU64::new(0)),
            state: Mutex::new(SessionState::default()),
            published: Mutex::new(Published::default()),
        }
    }

    pub fn mode(&self) -> ProcessingMode {
        lock(&self.state).mode
    }

    pub fn options(&self) -> ProcessingOptions {
        lock(&self.state).options.clone()
    }

    /// Analysis of the current image, if automatic mode produced one.
    pub fn analysis(&self) -> Option<ImageAnalysis> {
        lock(&self.state).analysis.clone()
    }

    /// The newest finished, non-superseded result.
    pub fn latest(&self) -> Option<Arc<ProcessingResult>> {
        lock(&self.published).result.clone()
    }

    /// Start a run, invalidating every earlier ticket.
    pub fn begin_run(&self) -> RunTicket {
        let generation = self.counter.fetch_add(1, Ordering::AcqRel) + 1;
        RunTicket {
            generation,
            counter: Arc::clone(&self.counter),
        }
    }

    /// Store `result` unless `ticket` has been superseded, returning the stored
    /// result or `None` when it was discarded.
    pub fn publish(&self, ticket: &RunTicket, result: ProcessingResult) -> Option<Arc<ProcessingResult>> {
        let mut published = lock(&self.published);
        if !ticket.is_current() || ticket.generation <= published.generation {
            debug!(generation = ticket.generation, "discarding superseded result");
            return None;
        }
        let result = Arc::new(result);
        published.generation = ticket.generation;
        published.result = Some(Arc::clone(&result));
        Some(result)
    }

    /// Replace the image. In automatic mode the image is analyzed and traced.
    pub fn load_image(&self, image: RgbaImage) -> VectorizeResult<Option<Arc<ProcessingResult>>> {
        let image = Arc::new(image);
        let mode = {
            let mut state = lock(&self.state);
            state.image = Some(Arc::clone(&image));
            state.analysis = None;
            state.mode
        };
        match mode {
            ProcessingMode::Automatic => self.analyze_and_run(image),
            ProcessingMode::Manual => Ok(None),
        }
    }

    /// Use caller-supplied options, switching to manual mode, and re-trace.
    pub fn update_options(
        &self,
        options: ProcessingOptions,
    ) -> VectorizeResult<Option<Arc<ProcessingResult>>> {
        options.validate()?;
        let (image, ticket) = {
            let mut state = lock(&self.state);
            state.options = options.clone();
            state.mode = ProcessingMode::Manual;
            (state.image.clone(), self.begin_run())
        };
        match image {
            Some(image) => self.run(&ticket, &image, &options),
            None => Ok(None),
        }
    }

    /// Switch modes. Returning to automatic re-analyzes and re-traces the image.
    pub fn set_mode(&self, mode: ProcessingMode) -> VectorizeResult<Option<Arc<ProcessingResult>>> {
        let image = {
            let mut state = lock(&self.state);
            state.mode = mode;
            state.image.clone()
        };
        match (mode, image) {
            (ProcessingMode::Automatic, Some(image)) => self.analyze_and_run(image),
            _ => Ok(None),
        }
    }

    /// Trace the current image with the current options.
    pub fn rerun(&self) -> VectorizeResult<Option<Arc<ProcessingResult>>> {
        let (image, options, ticket) = {
            let state = lock(&self.state);
            (state.image.clone(), state.options.clone(), self.begin_run())
        };
        let image = image.ok_or(VectorizeError::NoImage)?;
        self.run(&ticket, &image, &options)
    }

    fn analyze_and_run(&self, image: Arc<RgbaImage>) -> VectorizeResult<Option<Arc<ProcessingResult>>> {
        let ticket = self.begin_run();
        let analysis = analyze_image(&image);
        info!(
            entropy = analysis.entropy,
            text_like = analysis.text_like,
            mode = %analysis.suggested_mode,
            color_precision = analysis.options.color_precision,
            "image analyzed"
        );
        match self.apply_analysis(&ticket, analysis) {
            Some(options) => self.run(&ticket, &image, &options),
            None => {
                debug!(generation = ticket.generation, "analysis superseded");
                Ok(None)
            }
        }
    }

    /// Adopt the recommended options unless a newer run started meanwhile.
    fn apply_analysis(&self, ticket: &RunTicket, analysis: ImageAnalysis) -> Option<ProcessingOptions> {
        let mut state = lock(&self.state);
        if !ticket.is_current() {
            return None;
        }
        state.options = analysis.options.clone();
        state.analysis = Some(analysis);
        Some(state.options.clone())
    }

    fn run(
        &self,
        ticket: &RunTicket,
        image: &RgbaImage,
        options: &ProcessingOptions,
    ) -> VectorizeResult<Option<Arc<ProcessingResult>>> {
        debug!(generation = ticket.generation, "run started");

        let traced = self
            .tracer
            .trace_unless_stale(image, options, &|| !ticket.is_current())?;
        match traced {
            Some(result) => Ok(self.publish(ticket, result)),
            None => {
                debug!(generation = ticket.generation, "run superseded");
                Ok(None)
            }
        }
    }
}

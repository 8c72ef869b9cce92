//! Runs conversions off the interactive thread and hands results back in order.
//!
//! Each request spawns one fire-and-forget worker thread. The worker only
//! talks to the caller through an unbounded channel; the caller drains that
//! channel on its own thread ([`Orchestrator::dispatch_pending`] from a UI
//! poll loop, [`Orchestrator::next_event`] from async code), so
//! [`ConversionHandler`] hooks never run concurrently with caller state.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::thread;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, warn};

use worldbook_shared::{ConversionOutput, ConvertOptions, Result, WorldBookError};

use crate::pipeline::{self, ProgressReporter};
use crate::status::ConversionState;

/// Notification produced by a conversion, delivered in enqueue order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversionEvent {
    /// The conversion entered a new state.
    Status(ConversionState),
    /// Final JSON and entry count, delivered together.
    Succeeded(ConversionOutput),
    /// Human-readable failure message. No partial document accompanies it.
    Failed(String),
}

impl ConversionEvent {
    /// Whether this is the last event of its conversion.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded(_) | Self::Failed(_))
    }
}

/// Caller-side hooks, invoked on the thread that drains the orchestrator.
pub trait ConversionHandler {
    fn on_status(&mut self, label: &str);
    fn on_success(&mut self, json: String, entry_count: usize);
    fn on_failure(&mut self, message: &str);
}

/// Forwards pipeline phases into the event channel.
struct ChannelProgress {
    tx: UnboundedSender<ConversionEvent>,
}

impl ChannelProgress {
    fn send(&self, event: ConversionEvent) {
        // The receiver lives as long as the orchestrator; if it is gone
        // nobody is listening and the event can be dropped.
        let _ = self.tx.send(event);
    }
}

impl ProgressReporter for ChannelProgress {
    fn phase(&self, state: ConversionState) {
        self.send(ConversionEvent::Status(state));
    }
}

/// Single-slot conversion runner.
pub struct Orchestrator {
    options: ConvertOptions,
    tx: UnboundedSender<ConversionEvent>,
    rx: UnboundedReceiver<ConversionEvent>,
    state: ConversionState,
    in_flight: bool,
}

impl Orchestrator {
    pub fn new(options: ConvertOptions) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            options,
            tx,
            rx,
            state: ConversionState::Idle,
            in_flight: false,
        }
    }

    /// Last state observed on the caller's side of the channel.
    pub fn state(&self) -> ConversionState {
        self.state
    }

    /// Whether a conversion has been started and its final event not yet drained.
    pub fn is_busy(&self) -> bool {
        self.in_flight
    }

    /// Start converting `raw` on a worker thread.
    ///
    /// Empty or whitespace-only input fails here with
    /// [`WorldBookError::EmptyInput`] and no worker is spawned, as do
    /// options the formatter cannot honour. A second request while one is
    /// in flight fails with [`WorldBookError::Busy`].
    pub fn request_conversion(&mut self, raw: impl Into<String>) -> Result<()> {
        let raw = raw.into();
        pipeline::validate_input(&raw)?;
        self.options.validate()?;
        if self.in_flight {
            return Err(WorldBookError::Busy);
        }

        let options = self.options.clone();
        self.spawn_worker(move |progress| pipeline::convert(&raw, &options, progress))
    }

    /// Run `job` on a fresh worker thread and mark the slot as taken.
    fn spawn_worker<F>(&mut self, job: F) -> Result<()>
    where
        F: FnOnce(&ChannelProgress) -> Result<ConversionOutput> + Send + 'static,
    {
        let progress = ChannelProgress {
            tx: self.tx.clone(),
        };

        thread::Builder::new()
            .name("worldbook-convert".into())
            .spawn(move || run_worker(job, &progress))
            .map_err(|e| WorldBookError::unexpected(format!("failed to start worker: {e}")))?;

        debug!("conversion worker started");
        self.in_flight = true;
        Ok(())
    }

    /// Deliver every queued event to `handler`, without blocking.
    /// Returns how many events were delivered.
    pub fn dispatch_pending(&mut self, handler: &mut dyn ConversionHandler) -> usize {
        let mut delivered = 0;
        while let Ok(event) = self.rx.try_recv() {
            self.deliver(event, handler);
            delivered += 1;
        }
        delivered
    }

    /// Wait for the next event of the in-flight conversion.
    ///
    /// Returns `None` when nothing is in flight and nothing is queued.
    pub async fn next_event(&mut self) -> Option<ConversionEvent> {
        let event = if self.in_flight {
            self.rx.recv().await?
        } else {
            self.rx.try_recv().ok()?
        };
        self.observe(&event);
        Some(event)
    }

    /// Deliver events to `handler` until the in-flight conversion finishes.
    pub async fn run_to_completion(&mut self, handler: &mut dyn ConversionHandler) {
        while let Some(event) = self.next_event().await {
            let terminal = event.is_terminal();
            dispatch(event, handler);
            if terminal {
                break;
            }
        }
    }

    fn deliver(&mut self, event: ConversionEvent, handler: &mut dyn ConversionHandler) {
        self.observe(&event);
        dispatch(event, handler);
    }

    fn observe(&mut self, event: &ConversionEvent) {
        match event {
            ConversionEvent::Status(state) => self.state = *state,
            ConversionEvent::Succeeded(_) | ConversionEvent::Failed(_) => self.in_flight = false,
        }
    }
}

fn dispatch(event: ConversionEvent, handler: &mut dyn ConversionHandler) {
    match event {
        ConversionEvent::Status(state) => handler.on_status(state.label()),
        ConversionEvent::Succeeded(output) => handler.on_success(output.json, output.entry_count),
        ConversionEvent::Failed(message) => handler.on_failure(&message),
    }
}

/// Worker body: run the job and post the terminal status and result.
/// A panic inside the job is reported as [`WorldBookError::Unexpected`].
fn run_worker<F>(job: F, progress: &ChannelProgress)
where
    F: FnOnce(&ChannelProgress) -> Result<ConversionOutput>,
{
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| job(progress)))
    .unwrap_or_else(|payload| Err(WorldBookError::unexpected(panic_message(payload.as_ref()))));

    match outcome {
        Ok(output) => {
            progress.send(ConversionEvent::Status(ConversionState::Done));
            progress.send(ConversionEvent::Succeeded(output));
        }
        Err(err) => {
            warn!(error = %err, "conversion failed");
            progress.send(ConversionEvent::Status(ConversionState::Failed));
            progress.send(ConversionEvent::Failed(err.to_string()));
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "worker panicked".to_string()
    }
}

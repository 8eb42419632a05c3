//! Watch Use Case implementation

use tracing::{debug, info, warn};

use crate::application::sync::{SyncPass, SyncState};
use crate::domain::ports::{ArtifactWriter, HighlightSource, WatermarkStore};

use super::coalescer::{Coalescer, SyncTrigger};
use super::event::{WatchEvent, WatchTiming};
use super::signal::{Clock, EventSource, Signal, Wake};

/// How the watch loop ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchExit {
    /// A shutdown signal was received
    Cancelled,
    /// The signal channel closed
    Disconnected,
}

/// Watch Use Case
///
/// Runs a startup pass, then waits for change notifications and ticks.
/// Passes run on the calling thread, so at most one is ever in flight and
/// signals that arrive meanwhile queue up for the next wait.
pub struct WatchUseCase<S, W, M> {
    pass: SyncPass<S, W, M>,
    timing: WatchTiming,
    vault_label: String,
}

impl<S, W, M> WatchUseCase<S, W, M>
where
    S: HighlightSource,
    W: ArtifactWriter,
    M: WatermarkStore,
{
    pub fn new(pass: SyncPass<S, W, M>, timing: WatchTiming) -> Self {
        Self {
            pass,
            timing,
            vault_label: String::new(),
        }
    }

    /// Vault path reported in the `watch_started` event
    pub fn with_vault_label(mut self, vault: impl Into<String>) -> Self {
        self.vault_label = vault.into();
        self
    }

    pub fn timing(&self) -> WatchTiming {
        self.timing
    }

    /// Run until cancelled (blocking).
    ///
    /// Pass failures are reported through `on_event` and never end the loop.
    pub fn run<E, C, F>(
        &self,
        state: &mut SyncState,
        events: &mut E,
        clock: &C,
        mut on_event: F,
    ) -> WatchExit
    where
        E: EventSource,
        C: Clock,
        F: FnMut(WatchEvent),
    {
        let source = state
            .watched_path()
            .map(|path| path.display().to_string())
            .unwrap_or_default();
        info!(%source, watermark = %state.watermark(), "watch started");
        on_event(WatchEvent::WatchStarted {
            source,
            vault: self.vault_label.clone(),
            watermark: state.watermark().position(),
        });

        let mut coalescer = Coalescer::new(self.timing, clock.now());
        self.run_pass(SyncTrigger::Startup, state, &mut on_event);

        loop {
            match events.wait(coalescer.next_deadline()) {
                Wake::Signal(Signal::SourceChanged(path)) => {
                    debug!(path = %path.display(), "source changed");
                    coalescer.source_changed(clock.now());
                    on_event(WatchEvent::SourceChanged {
                        path: path.display().to_string(),
                    });
                }
                Wake::Signal(Signal::WatcherError(message)) => {
                    warn!(error = %message, "watcher error");
                    on_event(WatchEvent::Error { message });
                }
                Wake::Signal(Signal::Shutdown) => {
                    coalescer.shutdown();
                    info!("shutdown requested");
                    on_event(WatchEvent::Shutdown);
                    return WatchExit::Cancelled;
                }
                Wake::Disconnected => {
                    coalescer.shutdown();
                    info!("signal channel closed");
                    on_event(WatchEvent::Shutdown);
                    return WatchExit::Disconnected;
                }
                Wake::DeadlineReached => {}
            }

            if let Some(trigger) = coalescer.poll(clock.now()) {
                self.run_pass(trigger, state, &mut on_event);
            }
        }
    }

    fn run_pass<F>(&self, trigger: SyncTrigger, state: &mut SyncState, on_event: &mut F)
    where
        F: FnMut(WatchEvent),
    {
        on_event(WatchEvent::SyncStarted { trigger });
        match self.pass.run(state) {
            Ok(report) => on_event(WatchEvent::from_report(trigger, &report)),
            Err(e) => {
                warn!(?trigger, error = %e, "sync pass failed");
                on_event(WatchEvent::SyncFailed {
                    trigger,
                    message: e.to_string(),
                    records: 0,
                    books: 0,
                    errors: 1,
                });
            }
        }
    }
}

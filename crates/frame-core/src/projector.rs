//! # Readiness and Error Projection
//!
//! Folds card-frame events into two pieces of page state: whether submit is
//! enabled and what the single error slot shows. The latest message always
//! replaces the previous one.

use crate::page::PageView;
use crate::widget::FrameEvent;
use tracing::debug;

/// Prefix the page puts in front of field validation errors
pub const VALIDATION_ERROR_PREFIX: &str = "Validation error: ";

/// Submit and error-slot state of one page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReadinessProjector {
    card_ready: bool,
    in_flight: bool,
    error: Option<String>,
}

impl ReadinessProjector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn submit_enabled(&self) -> bool {
        self.card_ready && !self.in_flight
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn in_flight(&self) -> bool {
        self.in_flight
    }

    /// Fold one widget event into the state
    pub fn apply(&mut self, event: &FrameEvent) {
        match event {
            FrameEvent::Ready => debug!("card frame ready"),
            FrameEvent::CardReady(ready) => {
                debug!(ready, "card readiness changed");
                self.card_ready = *ready;
                if *ready {
                    self.error = None;
                }
            }
            FrameEvent::ShowError(message) => {
                self.error = Some(format!("{}{}", VALIDATION_ERROR_PREFIX, message));
            }
            FrameEvent::Error(message) => self.error = Some(message.clone()),
            FrameEvent::ClearError(_) => self.error = None,
        }
    }

    /// Apply an event and write only the parts of the page it touches
    pub fn project(&mut self, event: &FrameEvent, view: &dyn PageView) {
        self.apply(event);
        match event {
            FrameEvent::Ready => {}
            FrameEvent::CardReady(ready) => {
                view.set_submit_enabled(self.submit_enabled());
                if *ready {
                    view.clear_error();
                }
            }
            FrameEvent::ShowError(_) | FrameEvent::Error(_) => {
                if let Some(message) = &self.error {
                    view.show_error(message);
                }
            }
            FrameEvent::ClearError(_) => view.clear_error(),
        }
    }

    /// Error raised by the flow itself
    pub fn report(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    /// Claim the submit control; `false` when the card is not ready or a
    /// submission is already running.
    pub fn begin_submission(&mut self) -> bool {
        if !self.submit_enabled() {
            return false;
        }
        self.in_flight = true;
        true
    }

    /// Release the submit control after a submission that did not leave the page
    pub fn end_submission(&mut self) {
        self.in_flight = false;
    }

    /// Push the whole state onto the page
    pub fn render(&self, view: &dyn PageView) {
        view.set_submit_enabled(self.submit_enabled());
        match &self.error {
            Some(message) => view.show_error(message),
            None => view.clear_error(),
        }
    }
}

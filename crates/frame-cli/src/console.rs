//! # Console Page
//!
//! Stand-ins for the page surface: the error slot goes to stderr and
//! navigations are printed instead of followed.

use frame_core::{Navigator, PageView};
use std::cell::RefCell;
use tracing::debug;

#[derive(Debug, Default)]
pub struct ConsoleView {
    last_error: RefCell<Option<String>>,
}

impl ConsoleView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_error(&self) -> Option<String> {
        self.last_error.borrow().clone()
    }
}

impl PageView for ConsoleView {
    fn set_submit_enabled(&self, enabled: bool) {
        debug!(enabled, "submit control");
    }

    fn show_error(&self, message: &str) {
        eprintln!("error: {}", message);
        *self.last_error.borrow_mut() = Some(message.to_string());
    }

    fn clear_error(&self) {
        self.last_error.borrow_mut().take();
    }

    fn show_busy(&self) {
        debug!("request in flight");
    }

    fn hide_busy(&self) {
        debug!("request settled");
    }
}

/// Records the destination and prints it
#[derive(Debug, Default)]
pub struct ConsoleNavigator {
    visited: RefCell<Vec<String>>,
}

impl ConsoleNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn visited(&self) -> Vec<String> {
        self.visited.borrow().clone()
    }
}

impl Navigator for ConsoleNavigator {
    fn navigate(&self, url: &str) {
        println!("destination: {}", url);
        self.visited.borrow_mut().push(url.to_string());
    }
}

//! # Page Surface
//!
//! What the orchestration is allowed to touch on the hosting page: the
//! submit control, the single error slot, the busy indicator and navigation.

/// Visible page state driven by the checkout flow
pub trait PageView {
    fn set_submit_enabled(&self, enabled: bool);

    /// Replace whatever the error slot shows
    fn show_error(&self, message: &str);

    fn clear_error(&self);

    fn show_busy(&self);

    fn hide_busy(&self);
}

/// Leaves the page for a terminal destination
pub trait Navigator {
    fn navigate(&self, url: &str);
}

/// Busy indicator held for the lifetime of the guard.
///
/// Dropping it hides the indicator on every exit path, including `?` returns.
pub struct BusyGuard<'a> {
    view: &'a dyn PageView,
}

impl<'a> BusyGuard<'a> {
    pub fn show(view: &'a dyn PageView) -> Self {
        view.show_busy();
        Self { view }
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.view.hide_busy();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[derive(Default)]
    struct Log(RefCell<Vec<&'static str>>);

    impl PageView for Log {
        fn set_submit_enabled(&self, _enabled: bool) {}
        fn show_error(&self, _message: &str) {}
        fn clear_error(&self) {}
        fn show_busy(&self) {
            self.0.borrow_mut().push("show");
        }
        fn hide_busy(&self) {
            self.0.borrow_mut().push("hide");
        }
    }

    fn fallible(view: &dyn PageView, fail: bool) -> Result<(), ()> {
        let _busy = BusyGuard::show(view);
        if fail {
            return Err(());
        }
        Ok(())
    }

    #[test]
    fn test_busy_guard_released_on_both_paths() {
        let log = Log::default();
        assert!(fallible(&log, false).is_ok());
        assert!(fallible(&log, true).is_err());
        assert_eq!(*log.0.borrow(), ["show", "hide", "show", "hide"]);
    }
}

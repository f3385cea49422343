use std::cell::RefCell;
use std::collections::HashMap;

use gloo::timers::callback::{Interval, Timeout};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) enum TimerSlot {
    AlertDismiss(usize),
    SubmitGuard(usize),
    Rainbow,
}

/// One pending timeout per slot plus the progress interval. Re-arming a slot
/// cancels whatever was pending there; `cancel_all` clears everything.
#[derive(Default)]
pub(crate) struct PageTimers {
    slots: RefCell<HashMap<TimerSlot, Timeout>>,
    progress: RefCell<Option<Interval>>,
}

impl PageTimers {
    pub(crate) fn arm<F>(&self, slot: TimerSlot, millis: u32, callback: F)
    where
        F: FnOnce() + 'static,
    {
        let timeout = Timeout::new(millis, callback);
        if let Some(previous) = self.slots.borrow_mut().insert(slot, timeout) {
            previous.cancel();
        }
    }

    #[cfg(test)]
    pub(crate) fn is_armed(&self, slot: TimerSlot) -> bool {
        self.slots.borrow().contains_key(&slot)
    }

    pub(crate) fn start_progress(&self, interval: Interval) -> bool {
        let mut progress = self.progress.borrow_mut();
        if progress.is_some() {
            return false;
        }
        *progress = Some(interval);
        true
    }

    pub(crate) fn progress_running(&self) -> bool {
        self.progress.borrow().is_some()
    }

    pub(crate) fn cancel_all(&self) {
        let drained: Vec<Timeout> = self.slots.borrow_mut().drain().map(|(_, t)| t).collect();
        for timeout in drained {
            timeout.cancel();
        }
        if let Some(interval) = self.progress.borrow_mut().take() {
            interval.cancel();
        }
    }
}

//! # Settle
//!
//! Decides when drawing activity has gone quiet, so a snapshot can be handed off once and only once per burst.
//!
//! This is a debouncer over caller-supplied instants rather than a timer. The host's event loop asks for
//! [`Quiescence::deadline`], sleeps until then (or until the next input, whichever comes first), and calls
//! [`Quiescence::poll`]. Starting a new stroke [`cancel`](Quiescence::cancel)s the pending deadline, so a half-drawn
//! stroke is never exported.

use std::time::{Duration, Instant};

#[derive(Debug, Default, Clone)]
pub struct Quiescence {
    deadline: Option<Instant>,
}
impl Quiescence {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
    /// Fire `delay` after `now`, replacing any earlier arming.
    pub fn arm(&mut self, now: Instant, delay: Duration) {
        self.deadline = Some(now + delay);
    }
    /// Forget any pending deadline.
    pub fn cancel(&mut self) {
        self.deadline = None;
    }
    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }
    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }
    /// Returns true exactly once when `now` reaches the armed deadline, disarming it.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod test {
    use super::Quiescence;
    use std::time::{Duration, Instant};

    const DELAY: Duration = Duration::from_millis(1000);

    #[test]
    fn fires_once_after_delay() {
        let start = Instant::now();
        let mut settle = Quiescence::new();
        assert!(!settle.poll(start));

        settle.arm(start, DELAY);
        assert!(!settle.poll(start + Duration::from_millis(999)));
        assert!(settle.poll(start + DELAY));
        assert!(!settle.poll(start + DELAY * 2));
        assert!(!settle.is_armed());
    }
    #[test]
    fn rearm_pushes_deadline_back() {
        let start = Instant::now();
        let mut settle = Quiescence::new();
        settle.arm(start, DELAY);
        settle.arm(start + Duration::from_millis(600), DELAY);
        assert!(!settle.poll(start + DELAY));
        assert_eq!(
            settle.deadline(),
            Some(start + Duration::from_millis(1600))
        );
        assert!(settle.poll(start + Duration::from_millis(1600)));
    }
    #[test]
    fn cancel_suppresses() {
        let start = Instant::now();
        let mut settle = Quiescence::new();
        settle.arm(start, DELAY);
        // A new stroke begins before the delay elapses.
        settle.cancel();
        assert!(!settle.poll(start + DELAY * 5));
        assert_eq!(settle.deadline(), None);
    }
}

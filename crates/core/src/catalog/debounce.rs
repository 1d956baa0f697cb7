//! Settle-delay debouncing for typed input.

use std::time::{Duration, Instant};

/// Default settle delay for the catalog search box.
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

/// A value that only takes effect after its input has been quiet for
/// `delay`.
///
/// Callers pass the current instant, which keeps this deterministic and
/// free of timers: the settled value is promoted lazily on the next read.
#[derive(Debug, Clone)]
pub struct Debounced<T> {
    settled: T,
    pending: Option<(T, Instant)>,
    delay: Duration,
}

impl<T: Clone + PartialEq> Debounced<T> {
    pub const fn new(initial: T, delay: Duration) -> Self {
        Self {
            settled: initial,
            pending: None,
            delay,
        }
    }

    /// Record new input at `now`. Each call restarts the delay.
    pub fn set(&mut self, value: T, now: Instant) {
        if self.pending.is_none() && value == self.settled {
            return;
        }
        self.pending = Some((value, now));
    }

    /// Replace the settled value immediately, dropping pending input.
    pub fn set_now(&mut self, value: T) {
        self.pending = None;
        self.settled = value;
    }

    /// Promote pending input if it has been quiet long enough, then return
    /// the settled value.
    pub fn poll(&mut self, now: Instant) -> &T {
        let quiet = self
            .pending
            .as_ref()
            .is_some_and(|(_, changed_at)| now.saturating_duration_since(*changed_at) >= self.delay);
        if quiet && let Some((value, _)) = self.pending.take() {
            self.settled = value;
        }
        &self.settled
    }

    /// The settled value, without promoting pending input.
    #[must_use]
    pub const fn settled(&self) -> &T {
        &self.settled
    }

    /// Whether input is waiting out the delay.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_settles_after_delay() {
        let start = Instant::now();
        let mut term = Debounced::new(String::new(), SEARCH_DEBOUNCE);

        term.set("mou".to_owned(), start);
        assert_eq!(term.poll(start + Duration::from_millis(100)), "");
        assert!(term.is_pending());

        assert_eq!(term.poll(start + Duration::from_millis(300)), "mou");
        assert!(!term.is_pending());
    }

    #[test]
    fn test_each_keystroke_restarts_delay() {
        let start = Instant::now();
        let mut term = Debounced::new(String::new(), SEARCH_DEBOUNCE);

        term.set("m".to_owned(), start);
        term.set("mo".to_owned(), start + Duration::from_millis(200));
        term.set("mouse".to_owned(), start + Duration::from_millis(400));

        assert_eq!(term.poll(start + Duration::from_millis(650)), "");
        assert_eq!(term.poll(start + Duration::from_millis(700)), "mouse");
    }

    #[test]
    fn test_set_now_skips_delay() {
        let start = Instant::now();
        let mut term = Debounced::new(String::new(), SEARCH_DEBOUNCE);
        term.set("a".to_owned(), start);
        term.set_now("laptop".to_owned());
        assert_eq!(term.settled(), "laptop");
        assert!(!term.is_pending());
    }
}

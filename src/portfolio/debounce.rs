use std::time::{Duration, Instant};

/// Default quiet period before a search filter is applied.
pub const DEFAULT_SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

/// Debounces the loan search box.
///
/// Each keystroke restarts the quiet period; the filter only settles once
/// no input has arrived for the whole delay. Time is supplied by the caller,
/// so the debouncer never sleeps or spawns anything.
///
/// # Examples
///
/// ```
/// use loan_desk::portfolio::debounce::SearchDebouncer;
/// use std::time::{Duration, Instant};
///
/// let start = Instant::now();
/// let mut search = SearchDebouncer::new("", Duration::from_millis(300));
/// search.input("to", start);
/// search.input("tom", start + Duration::from_millis(100));
///
/// assert_eq!(search.poll(start + Duration::from_millis(350)), None);
/// assert_eq!(search.poll(start + Duration::from_millis(400)), Some("tom"));
/// ```
#[derive(Debug, Clone)]
pub struct SearchDebouncer {
    delay: Duration,
    settled: String,
    pending: Option<(String, Instant)>,
}

impl SearchDebouncer {
    pub fn new(initial: impl Into<String>, delay: Duration) -> Self {
        Self {
            delay,
            settled: initial.into(),
            pending: None,
        }
    }

    /// Record new search text typed at `at`.
    pub fn input(&mut self, text: impl Into<String>, at: Instant) {
        self.pending = Some((text.into(), at));
    }

    /// Settle the pending text if the quiet period has elapsed.
    ///
    /// Returns the new filter only when it differs from the last settled one.
    pub fn poll(&mut self, at: Instant) -> Option<&str> {
        let ready = matches!(&self.pending, Some((_, typed)) if at.saturating_duration_since(*typed) >= self.delay);
        if !ready {
            return None;
        }
        let (text, _) = self.pending.take()?;
        if text == self.settled {
            return None;
        }
        log::debug!("search filter settled on {:?}", text);
        self.settled = text;
        Some(&self.settled)
    }

    /// The filter currently in effect.
    pub fn settled(&self) -> &str {
        &self.settled
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

impl Default for SearchDebouncer {
    fn default() -> Self {
        Self::new("", DEFAULT_SEARCH_DEBOUNCE)
    }
}

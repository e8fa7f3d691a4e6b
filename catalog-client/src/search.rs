//! Debounced search input

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Debounce delay of the gallery picker search box
pub const PICKER_DEBOUNCE: Duration = Duration::from_millis(300);

/// Each submitted term supersedes the previous one; a term settles only if
/// nothing newer arrives within the delay
#[derive(Debug)]
pub struct DebouncedSearch {
    delay: Duration,
    generation: AtomicU64,
}

impl DebouncedSearch {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            generation: AtomicU64::new(0),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Wait out the delay; `Some(term)` if it is still the latest submission
    pub async fn submit(&self, term: impl Into<String>) -> Option<String> {
        let term = term.into();
        let ticket = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        tokio::time::sleep(self.delay).await;
        if self.generation.load(Ordering::SeqCst) == ticket {
            Some(term)
        } else {
            tracing::trace!(%term, "search term superseded");
            None
        }
    }

    /// Supersede whatever is pending
    pub fn cancel(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }
}

impl Default for DebouncedSearch {
    fn default() -> Self {
        Self::new(PICKER_DEBOUNCE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::sleep;

    #[tokio::test(start_paused = true)]
    async fn test_newer_term_supersedes_pending_one() {
        let search = DebouncedSearch::default();
        let first = search.submit("sh");
        let second = async {
            sleep(Duration::from_millis(100)).await;
            search.submit("shoe").await
        };
        let (first, second) = tokio::join!(first, second);
        assert_eq!(first, None);
        assert_eq!(second.as_deref(), Some("shoe"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_spaced_terms_both_settle() {
        let search = DebouncedSearch::new(Duration::from_millis(300));
        assert_eq!(search.submit("a").await.as_deref(), Some("a"));
        sleep(Duration::from_millis(50)).await;
        assert_eq!(search.submit("ab").await.as_deref(), Some("ab"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_drops_pending_term() {
        let search = DebouncedSearch::default();
        let pending = search.submit("boots");
        let cancel = async {
            sleep(Duration::from_millis(10)).await;
            search.cancel();
        };
        let (settled, ()) = tokio::join!(pending, cancel);
        assert_eq!(settled, None);
    }
}

// Best-effort attempt limiting for credential endpoints
// Process-local and non-durable; abuse mitigation, not a correctness mechanism

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Attempt limiter keyed by client address
pub trait RateLimiter: Send + Sync {
    /// Record an attempt for `key`; returns false when the key has exhausted
    /// its window
    fn check(&self, key: &str) -> bool;
}

struct WindowEntry {
    window_start: Instant,
    count: u32,
}

/// In-memory sliding-window limiter: at most `max_attempts` per `window`
/// per key, counter reset when the window expires
pub struct InMemoryRateLimiter {
    max_attempts: u32,
    window: Duration,
    entries: Mutex<HashMap<String, WindowEntry>>,
}

impl InMemoryRateLimiter {
    /// Default policy: 5 attempts per 15-minute window
    pub fn new() -> Self {
        Self::with_limits(5, Duration::from_secs(15 * 60))
    }

    pub fn with_limits(max_attempts: u32, window: Duration) -> Self {
        Self {
            max_attempts,
            window,
            entries: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryRateLimiter {
    fn default() -> Self {
        Self::new()
    }
}

impl RateLimiter for InMemoryRateLimiter {
    fn check(&self, key: &str) -> bool {
        // A poisoned lock only loses best-effort counts; keep serving
        let mut entries = self
            .entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let now = Instant::now();
        let entry = entries.entry(key.to_string()).or_insert(WindowEntry {
            window_start: now,
            count: 0,
        });

        if now.duration_since(entry.window_start) >= self.window {
            entry.window_start = now;
            entry.count = 0;
        }

        if entry.count >= self.max_attempts {
            false
        } else {
            entry.count += 1;
            true
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_allows_up_to_the_limit() {
        let limiter = InMemoryRateLimiter::with_limits(5, Duration::from_secs(60));
        for _ in 0..5 {
            assert!(limiter.check("1.2.3.4"));
        }
        assert!(!limiter.check("1.2.3.4"));
    }

    #[test]
    fn test_keys_are_independent() {
        let limiter = InMemoryRateLimiter::with_limits(1, Duration::from_secs(60));
        assert!(limiter.check("1.2.3.4"));
        assert!(!limiter.check("1.2.3.4"));
        assert!(limiter.check("5.6.7.8"));
    }

    #[test]
    fn test_window_expiry_resets_the_counter() {
        let limiter = InMemoryRateLimiter::with_limits(1, Duration::from_millis(20));
        assert!(limiter.check("1.2.3.4"));
        assert!(!limiter.check("1.2.3.4"));

        std::thread::sleep(Duration::from_millis(30));
        assert!(limiter.check("1.2.3.4"));
    }

    #[test]
    fn test_concurrent_increments_never_exceed_the_limit() {
        let limiter = Arc::new(InMemoryRateLimiter::with_limits(50, Duration::from_secs(60)));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let limiter = Arc::clone(&limiter);
                std::thread::spawn(move || {
                    (0..25).filter(|_| limiter.check("shared")).count()
                })
            })
            .collect();

        let allowed: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
        assert_eq!(allowed, 50);
    }
}

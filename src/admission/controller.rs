use std::{
    collections::HashMap,
    time::{Duration, Instant},
};

use parking_lot::Mutex;

use crate::config::AdmissionConfig;

pub const ANONYMOUS_CLIENT: &str = "anonymous";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Admitted { remaining: u32 },
    Rejected { retry_after: Duration },
}

#[derive(Debug, Clone, Copy)]
struct AdmissionWindow {
    count: u32,
    started_at: Instant,
}

// A window restarts on the first request at or after `started_at + window`.
#[derive(Debug)]
pub struct AdmissionController {
    window: Duration,
    max_requests: u32,
    entries: Mutex<HashMap<String, AdmissionWindow>>,
}

impl AdmissionController {
    pub fn new(config: &AdmissionConfig) -> Self {
        Self {
            window: config.window,
            max_requests: config.max_requests.max(1),
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    pub fn admit(&self, client_key: &str, now: Instant) -> Decision {
        let key = normalize_key(client_key);
        let mut entries = self.entries.lock();

        if let Some(entry) = entries.get_mut(key) {
            let elapsed = now.saturating_duration_since(entry.started_at);
            if elapsed < self.window {
                if entry.count < self.max_requests {
                    entry.count += 1;
                    return Decision::Admitted {
                        remaining: self.max_requests - entry.count,
                    };
                }
                return Decision::Rejected {
                    retry_after: self.window - elapsed,
                };
            }
        }

        entries.insert(
            key.to_string(),
            AdmissionWindow {
                count: 1,
                started_at: now,
            },
        );
        Decision::Admitted {
            remaining: self.max_requests - 1,
        }
    }

    pub fn sweep(&self, now: Instant) -> usize {
        let mut entries = self.entries.lock();
        let before = entries.len();
        entries.retain(|_, entry| now.saturating_duration_since(entry.started_at) <= self.window);
        before - entries.len()
    }

    pub fn tracked_clients(&self) -> usize {
        self.entries.lock().len()
    }
}

fn normalize_key(client_key: &str) -> &str {
    let trimmed = client_key.trim();
    if trimmed.is_empty() {
        ANONYMOUS_CLIENT
    } else {
        trimmed
    }
}

#[cfg(test)]
mod tests {
    use std::{
        sync::{
            atomic::{AtomicUsize, Ordering},
            Arc, Barrier,
        },
        thread,
    };

    use super::*;

    impl Decision {
        fn is_allowed(&self) -> bool {
            matches!(self, Decision::Admitted { .. })
        }
    }

    fn controller(max_requests: u32, window_secs: u64) -> AdmissionController {
        AdmissionController::new(&AdmissionConfig {
            window: Duration::from_secs(window_secs),
            max_requests,
        })
    }

    #[test]
    fn admits_up_to_quota_then_rejects() {
        let limiter = controller(3, 60);
        let start = Instant::now();
        for i in 0..3 {
            let decision = limiter.admit("10.0.0.1", start + Duration::from_secs(i));
            assert_eq!(decision, Decision::Admitted { remaining: 2 - i as u32 });
        }
        let rejected = limiter.admit("10.0.0.1", start + Duration::from_secs(10));
        assert_eq!(
            rejected,
            Decision::Rejected {
                retry_after: Duration::from_secs(50)
            }
        );
    }

    #[test]
    fn window_reopens_exactly_at_boundary() {
        let limiter = controller(1, 60);
        let start = Instant::now();
        assert!(limiter.admit("client", start).is_allowed());
        assert!(!limiter
            .admit("client", start + Duration::from_millis(59_999))
            .is_allowed());
        assert_eq!(
            limiter.admit("client", start + Duration::from_secs(60)),
            Decision::Admitted { remaining: 0 }
        );
    }

    #[test]
    fn clients_are_counted_separately() {
        let limiter = controller(1, 60);
        let now = Instant::now();
        assert!(limiter.admit("a", now).is_allowed());
        assert!(limiter.admit("b", now).is_allowed());
        assert!(!limiter.admit("a", now).is_allowed());
    }

    #[test]
    fn blank_keys_share_the_anonymous_bucket() {
        let limiter = controller(2, 60);
        let now = Instant::now();
        assert!(limiter.admit("", now).is_allowed());
        assert!(limiter.admit("   ", now).is_allowed());
        assert!(!limiter.admit(ANONYMOUS_CLIENT, now).is_allowed());
        assert_eq!(limiter.tracked_clients(), 1);
    }

    #[test]
    fn rejection_does_not_extend_the_window() {
        let limiter = controller(1, 10);
        let start = Instant::now();
        assert!(limiter.admit("c", start).is_allowed());
        for s in 1..10 {
            assert!(!limiter.admit("c", start + Duration::from_secs(s)).is_allowed());
        }
        assert!(limiter.admit("c", start + Duration::from_secs(10)).is_allowed());
    }

    #[test]
    fn sweep_drops_only_expired_windows() {
        let limiter = controller(5, 60);
        let start = Instant::now();
        limiter.admit("old", start);
        limiter.admit("fresh", start + Duration::from_secs(30));

        assert_eq!(limiter.sweep(start + Duration::from_secs(60)), 0);
        assert_eq!(limiter.sweep(start + Duration::from_secs(61)), 1);
        assert_eq!(limiter.tracked_clients(), 1);
    }

    #[test]
    fn parallel_admissions_never_exceed_quota() {
        const THREADS: usize = 32;
        let limiter = Arc::new(controller(10, 60));
        let admitted = Arc::new(AtomicUsize::new(0));
        let barrier = Arc::new(Barrier::new(THREADS));
        let now = Instant::now();

        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                let limiter = limiter.clone();
                let admitted = admitted.clone();
                let barrier = barrier.clone();
                thread::spawn(move || {
                    barrier.wait();
                    if limiter.admit("shared", now).is_allowed() {
                        admitted.fetch_add(1, Ordering::SeqCst);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(admitted.load(Ordering::SeqCst), 10);
    }
}

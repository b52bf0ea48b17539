//! Single-flight guard for scan requests.
//!
//! One scan may be in flight at a time. Starting over (a retake or a new
//! capture) invalidates the in-flight request, and its result is dropped
//! when it arrives.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;
use tracing::debug;

use crate::error::{CartaError, Result};

const BUSY: u64 = 1;

/// Identifies one scan request. Later requests have larger tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct RequestToken(u64);

impl RequestToken {
    pub fn id(&self) -> u64 {
        self.0
    }
}

impl From<u64> for RequestToken {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// Tracks the in-flight scan and the latest issued token.
///
/// Both live in one word (`generation << 1 | busy`) so that starting a scan
/// and resetting can never interleave halfway.
#[derive(Debug, Default)]
pub struct RequestGuard {
    state: AtomicU64,
}

impl RequestGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a scan as started. Fails with [`CartaError::Busy`] while one is in flight.
    ///
    /// The returned ticket releases the guard when dropped, so a scan future
    /// cancelled mid-await does not leave the guard busy.
    pub fn begin(&self) -> Result<RequestTicket<'_>> {
        let previous = self
            .state
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |state| {
                if state & BUSY != 0 {
                    None
                } else {
                    Some(((generation(state) + 1) << 1) | BUSY)
                }
            })
            .map_err(|_| CartaError::Busy)?;

        let token = RequestToken(generation(previous) + 1);
        debug!("Scan request {} started", token.0);
        Ok(RequestTicket {
            guard: self,
            token,
            armed: true,
        })
    }

    /// Start over: clear the busy flag and make any in-flight token stale.
    ///
    /// The in-flight call itself keeps running; only its result is ignored.
    pub fn reset(&self) {
        let previous = self
            .state
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |state| {
                Some((generation(state) + 1) << 1)
            })
            .unwrap_or_else(|state| state);
        debug!(
            "Scan session reset, request {} is now stale",
            generation(previous)
        );
    }

    /// Finish the request by token. Returns `false` when the token is stale
    /// and its result must be discarded.
    ///
    /// For callers that cannot hold a [`RequestTicket`] across the model
    /// call, such as a JS page passing the id back later.
    pub fn complete(&self, token: RequestToken) -> bool {
        if self.release(token) {
            true
        } else {
            debug!("Dropping result of superseded request {}", token.0);
            false
        }
    }

    fn release(&self, token: RequestToken) -> bool {
        self.state
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |state| {
                (generation(state) == token.0).then_some(state & !BUSY)
            })
            .is_ok()
    }

    pub fn is_busy(&self) -> bool {
        self.state.load(Ordering::Acquire) & BUSY != 0
    }

    /// Latest issued generation.
    pub fn current(&self) -> RequestToken {
        RequestToken(generation(self.state.load(Ordering::Acquire)))
    }

    pub fn is_current(&self, token: RequestToken) -> bool {
        self.current() == token
    }
}

fn generation(state: u64) -> u64 {
    state >> 1
}

/// A started scan. Completing it consumes the ticket; dropping it releases
/// the guard if the request is still current.
#[must_use = "dropping the ticket immediately releases the guard"]
#[derive(Debug)]
pub struct RequestTicket<'a> {
    guard: &'a RequestGuard,
    token: RequestToken,
    armed: bool,
}

impl RequestTicket<'_> {
    pub fn token(&self) -> RequestToken {
        self.token
    }

    /// Finish the request. Returns `false` when it was superseded.
    pub fn complete(mut self) -> bool {
        self.armed = false;
        self.guard.complete(self.token)
    }

    /// Hand the token to a caller that will complete it later by id.
    pub fn detach(mut self) -> RequestToken {
        self.armed = false;
        self.token
    }
}

impl Drop for RequestTicket<'_> {
    fn drop(&mut self) {
        if self.armed && self.guard.release(self.token) {
            debug!("Scan request {} abandoned, guard released", self.token.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashSet;
    use std::sync::Arc;

    #[test]
    fn test_single_flight() {
        let guard = RequestGuard::new();
        let ticket = guard.begin().unwrap();
        let token = ticket.token();
        assert!(guard.is_busy());
        assert!(matches!(guard.begin(), Err(CartaError::Busy)));

        assert!(ticket.complete());
        assert!(!guard.is_busy());
        assert!(guard.begin().unwrap().token() > token);
    }

    #[test]
    fn test_reset_makes_in_flight_stale() {
        let guard = RequestGuard::new();
        let first = guard.begin().unwrap();
        guard.reset();
        assert!(!guard.is_busy());

        let second = guard.begin().unwrap();
        assert!(!first.complete());
        assert!(guard.is_busy());
        assert!(second.complete());
        assert!(!guard.is_busy());
    }

    #[test]
    fn test_stale_result_after_reset_without_new_scan() {
        let guard = RequestGuard::new();
        let ticket = guard.begin().unwrap();
        guard.reset();
        assert!(!ticket.complete());
        assert_eq!(guard.current().id(), 2);
    }

    #[test]
    fn test_dropped_ticket_releases_guard() {
        let guard = RequestGuard::new();
        {
            let _ticket = guard.begin().unwrap();
            assert!(guard.is_busy());
        }
        assert!(!guard.is_busy());
        assert_eq!(guard.begin().unwrap().token().id(), 2);
    }

    #[test]
    fn test_dropped_stale_ticket_keeps_newer_scan_busy() {
        let guard = RequestGuard::new();
        let first = guard.begin().unwrap();
        guard.reset();
        let second = guard.begin().unwrap();

        drop(first);
        assert!(guard.is_busy());
        assert!(second.complete());
    }

    #[test]
    fn test_detached_token_completes_by_id() {
        let guard = RequestGuard::new();
        let id = guard.begin().unwrap().detach().id();
        assert!(guard.is_busy());
        assert!(guard.complete(RequestToken::from(id)));
        assert!(!guard.is_busy());
    }

    #[test]
    fn test_only_one_thread_wins() {
        let guard = Arc::new(RequestGuard::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let guard = Arc::clone(&guard);
                std::thread::spawn(move || guard.begin().map(RequestTicket::detach).is_ok())
            })
            .collect();

        let winners = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|ok| *ok)
            .count();
        assert_eq!(winners, 1);
    }

    #[test]
    fn test_concurrent_begin_and_reset_stay_consistent() {
        let guard = Arc::new(RequestGuard::new());
        let resetter = {
            let guard = Arc::clone(&guard);
            std::thread::spawn(move || {
                for _ in 0..1000 {
                    guard.reset();
                }
            })
        };
        let workers: Vec<_> = (0..4)
            .map(|_| {
                let guard = Arc::clone(&guard);
                std::thread::spawn(move || {
                    let mut tokens = Vec::new();
                    for _ in 0..1000 {
                        if let Ok(ticket) = guard.begin() {
                            tokens.push(ticket.token());
                            ticket.complete();
                        }
                    }
                    tokens
                })
            })
            .collect();

        resetter.join().unwrap();
        let tokens: Vec<RequestToken> = workers
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect();

        let unique: HashSet<_> = tokens.iter().copied().collect();
        assert_eq!(unique.len(), tokens.len());
        assert_eq!(guard.current().id(), tokens.len() as u64 + 1000);
        assert!(!guard.is_busy());
    }
}

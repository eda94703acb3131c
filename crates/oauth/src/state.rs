use std::time::{Duration, Instant};

use {
    base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD},
    dashmap::DashMap,
    rand::RngCore,
    tracing::debug,
};

/// Upper bound on outstanding authorization attempts.
pub const MAX_PENDING_STATES: usize = 10_000;

/// Generate a 256-bit random `state` value, base64url-encoded.
pub fn generate_state() -> String {
    let mut bytes = [0u8; 32];
    rand::rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Outstanding `state` nonces, one per authorization attempt.
///
/// A nonce is redeemable once and only within `ttl` of being issued.
///
/// Issuing is unauthenticated, so the map is bounded: once `capacity` live
/// nonces exist, each new one evicts the oldest. A client that floods
/// `/authorize` faster than users finish logging in can therefore push their
/// nonces out. Put a per-client rate limit in front of the gateway when it is
/// exposed beyond local use.
pub struct PendingStates {
    entries: DashMap<String, Instant>,
    ttl: Duration,
    capacity: usize,
}

impl PendingStates {
    pub fn new(ttl: Duration) -> Self {
        Self::with_capacity(ttl, MAX_PENDING_STATES)
    }

    pub fn with_capacity(ttl: Duration, capacity: usize) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
            capacity: capacity.max(1),
        }
    }

    /// Issue and remember a fresh nonce.
    ///
    /// Expired entries are swept only when the map is full, so the common
    /// path stays O(1).
    pub fn issue(&self) -> String {
        if self.entries.len() >= self.capacity {
            self.prune();
            if self.entries.len() >= self.capacity {
                self.evict_oldest();
            }
        }
        let state = generate_state();
        self.entries.insert(state.clone(), Instant::now());
        state
    }

    /// Redeem `state`. Returns `false` for unknown, reused, or expired nonces.
    pub fn consume(&self, state: &str) -> bool {
        match self.entries.remove(state) {
            Some((_, issued)) => {
                let fresh = issued.elapsed() <= self.ttl;
                if !fresh {
                    debug!("authorization state expired");
                }
                fresh
            },
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn prune(&self) {
        let ttl = self.ttl;
        self.entries.retain(|_, issued| issued.elapsed() <= ttl);
    }

    fn evict_oldest(&self) {
        let oldest = self
            .entries
            .iter()
            .min_by_key(|entry| *entry.value())
            .map(|entry| entry.key().clone());
        if let Some(key) = oldest {
            self.entries.remove(&key);
        }
    }
}

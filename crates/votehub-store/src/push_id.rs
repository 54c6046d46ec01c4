//! Time-ordered child keys for ordered insertion.
//!
//! Keys are 20 characters: 8 encode the millisecond timestamp, 12 are
//! random. The alphabet is in ascending ASCII order, so lexical order of
//! keys matches creation order. Keys created within the same millisecond
//! increment the random part instead of drawing a new one.

use std::sync::Mutex;

use uuid::Uuid;

use votehub_core::types::time::{EpochMillis, now_millis};

const PUSH_CHARS: &[u8; 64] = b"-0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ_abcdefghijklmnopqrstuvwxyz";

#[derive(Debug, Default)]
struct State {
    last_timestamp: EpochMillis,
    last_random: [u8; 12],
}

/// Generates time-ordered, collision-resistant child keys.
#[derive(Debug, Default)]
pub struct PushIdGenerator {
    state: Mutex<State>,
}

impl PushIdGenerator {
    /// Create a generator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Generate a key for the current time.
    pub fn next_id(&self) -> String {
        self.next_id_at(now_millis())
    }

    /// Generate a key for the given time.
    pub fn next_id_at(&self, timestamp: EpochMillis) -> String {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());

        if timestamp == state.last_timestamp {
            increment(&mut state.last_random);
        } else {
            let entropy = Uuid::new_v4();
            for (slot, byte) in state.last_random.iter_mut().zip(entropy.as_bytes()) {
                *slot = byte % 64;
            }
            state.last_timestamp = timestamp;
        }

        let mut id = String::with_capacity(20);
        let mut remaining = timestamp.max(0) as u64;
        let mut time_chars = [0u8; 8];
        for slot in time_chars.iter_mut().rev() {
            *slot = PUSH_CHARS[(remaining % 64) as usize];
            remaining /= 64;
        }
        id.extend(time_chars.iter().map(|b| *b as char));
        id.extend(
            state
                .last_random
                .iter()
                .map(|b| PUSH_CHARS[*b as usize] as char),
        );
        id
    }
}

fn increment(random: &mut [u8; 12]) {
    for digit in random.iter_mut().rev() {
        if *digit == 63 {
            *digit = 0;
        } else {
            *digit += 1;
            return;
        }
    }
}

//! Benchmark profiles and utilities for the tether ledger.
//!
//! - [`populated_ledger`]: a ledger holding `n` boxed payloads, grown from
//!   a one-slot initial capacity so every doubling step is exercised.

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use tether_ledger::{Ledger, LedgerConfig, Tracked};

/// Size of each benchmark payload in `u64` words.
pub const PAYLOAD_WORDS: usize = 8;

/// Benchmark payload: a small heap allocation, like a typical subsystem.
pub type Payload = Box<[u64; PAYLOAD_WORDS]>;

/// Build a ledger holding `n` payloads, plus their tokens in order.
pub fn populated_ledger(n: usize) -> (Ledger, Vec<Tracked<Payload>>) {
    let mut ledger =
        Ledger::with_config(LedgerConfig::new(1)).expect("one-slot config is valid");
    let tokens = (0..n)
        .map(|i| {
            ledger
                .register(Box::new([i as u64; PAYLOAD_WORDS]), drop)
                .expect("unbounded ledger accepts every payload")
        })
        .collect();
    (ledger, tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn populated_ledger_tracks_every_payload() {
        let (ledger, tokens) = populated_ledger(100);
        assert_eq!(ledger.len(), 100);
        assert_eq!(ledger.capacity(), 128);
        assert_eq!(ledger.get(tokens[42]).map(|p| p[0]), Some(42));
        assert_eq!(ledger.destroy_all(), 100);
    }
}

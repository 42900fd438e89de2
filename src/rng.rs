//! Seeded random number streams, one per habitat.

use std::collections::HashMap;

use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Derives reproducible, independent random streams from one seed.
///
/// Streams are created on first use in the order they are requested, so a
/// fixed habitat order gives identical runs for identical seeds.
pub struct RngManager {
    master: ChaCha8Rng,
    streams: HashMap<String, ChaCha8Rng>,
}

impl RngManager {
    pub fn new(seed: u64) -> Self {
        Self {
            master: ChaCha8Rng::seed_from_u64(seed),
            streams: HashMap::new(),
        }
    }

    /// The stream of habitat `name`, created from the master seed on first
    /// request.
    pub fn stream(&mut self, name: &str) -> &mut ChaCha8Rng {
        let master = &mut self.master;
        self.streams
            .entry(name.to_string())
            .or_insert_with(|| ChaCha8Rng::seed_from_u64(master.next_u64()))
    }
}

use rand::RngCore;
use tracing::debug;
use crate::tensor::constant::UNASSIGNED_SEQUENCE_ID;

/// Issues sequence ids from a counter seeded once with a random `u64`.
///
/// Ids are unique among the currently registered sequences and never `0`.
#[derive(Debug, Clone)]
pub(crate) struct IdGenerator {
    counter: u64,
}

impl IdGenerator {
    pub(crate) fn seeded(rng: &mut impl RngCore) -> Self {
        Self::starting_at(rng.next_u64())
    }

    /// The first candidate is the value after `counter`
    pub(crate) fn starting_at(counter: u64) -> Self {
        Self { counter }
    }

    /// Advance the counter until it lands on a usable id
    pub(crate) fn next_unique(&mut self, taken: impl Fn(u64) -> bool) -> u64 {
        loop {
            self.counter = self.counter.wrapping_add(1);
            if self.counter != UNASSIGNED_SEQUENCE_ID && !taken(self.counter) {
                debug!(sequence_id = self.counter, "generated sequence id");
                return self.counter;
            }
        }
    }
}

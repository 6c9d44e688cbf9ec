use tokio::time::Instant;
use crate::tensor::MemoryState;

/// One conversation with a stateful model.
///
/// A sequence is `ACTIVE` from creation until it receives its end signal,
/// after which it is `TERMINATED` until removed. `last_activity` starts at
/// creation and moves forward whenever the memory state is replaced.
#[derive(Debug, Clone)]
pub struct Sequence {
    id: u64,
    last_activity: Instant,
    terminated: bool,
    memory_state: MemoryState,
}

impl Sequence {
    pub(crate) fn new(id: u64) -> Self {
        Self {
            id,
            last_activity: Instant::now(),
            terminated: false,
            memory_state: MemoryState::new(),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn last_activity(&self) -> Instant {
        self.last_activity
    }

    pub fn is_terminated(&self) -> bool {
        self.terminated
    }

    pub fn memory_state(&self) -> &MemoryState {
        &self.memory_state
    }

    /// Replace the carried state and mark the sequence as active now
    pub fn update_memory_state(&mut self, memory_state: MemoryState) {
        self.memory_state = memory_state;
        self.last_activity = Instant::now();
    }

    pub(crate) fn set_terminated(&mut self) {
        self.terminated = true;
    }

    /// Whole seconds elapsed since the last activity, as of `now`
    pub(crate) fn idle_seconds(&self, now: Instant) -> u64 {
        now.saturating_duration_since(self.last_activity).as_secs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use crate::tensor::TensorBuffer;

    #[tokio::test(start_paused = true)]
    async fn test_update_refreshes_activity() {
        let mut sequence = Sequence::new(9);
        let created = sequence.last_activity();
        assert!(!sequence.is_terminated());
        assert!(sequence.memory_state().is_empty());

        tokio::time::advance(Duration::from_millis(2500)).await;
        assert_eq!(sequence.idle_seconds(Instant::now()), 2);

        let mut state = MemoryState::new();
        state.insert("h".to_string(), TensorBuffer::from_vec(vec![1], vec![0.5f32]).unwrap());
        sequence.update_memory_state(state);

        assert!(sequence.last_activity() > created);
        assert_eq!(sequence.idle_seconds(Instant::now()), 0);
        assert_eq!(sequence.memory_state().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_idle_seconds_never_negative() {
        let sequence = Sequence::new(1);
        assert_eq!(sequence.idle_seconds(Instant::now() - Duration::from_secs(5)), 0);
    }
}

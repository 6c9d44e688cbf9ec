use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use rand::RngCore;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::time::Instant;
use tracing::debug;
use crate::config::StatefulConfig;
use crate::error::SequenceError;
use crate::tensor::MemoryState;
use super::entry::Sequence;
use super::id::IdGenerator;
use super::spec::{ControlInput, SequenceProcessingSpec};

/// Everything guarded by the manager's lock.
struct Registry {
    sequences: HashMap<u64, Sequence>,
    ids: IdGenerator,
    timeout_seconds: u64,
    max_sequence_number: u32,
}

impl Registry {
    fn has_sequence(&self, id: u64) -> Result<(), SequenceError> {
        match self.sequences.get(&id) {
            None => Err(SequenceError::Missing(id)),
            Some(sequence) if sequence.is_terminated() => Err(SequenceError::Terminated(id)),
            Some(_) => Ok(()),
        }
    }

    fn create_sequence(&mut self, spec: &mut SequenceProcessingSpec) -> Result<(), SequenceError> {
        let id = if spec.needs_id() {
            let sequences = &self.sequences;
            let id = self.ids.next_unique(|candidate| sequences.contains_key(&candidate));
            spec.set_sequence_id(id);
            id
        } else {
            let id = spec.sequence_id();
            if self.sequences.contains_key(&id) {
                debug!(sequence_id = id, "sequence already exists");
                return Err(SequenceError::AlreadyExists(id));
            }
            id
        };
        self.sequences.insert(id, Sequence::new(id));
        debug!(sequence_id = id, count = self.sequences.len(), "sequence started");
        Ok(())
    }

    fn terminate_sequence(&mut self, id: u64) -> Result<(), SequenceError> {
        self.has_sequence(id)?;
        if let Some(sequence) = self.sequences.get_mut(&id) {
            sequence.set_terminated();
        }
        debug!(sequence_id = id, "sequence terminated");
        Ok(())
    }

    fn remove_sequence(&mut self, id: u64) -> Result<Sequence, SequenceError> {
        let removed = self.sequences.remove(&id).ok_or(SequenceError::Missing(id))?;
        debug!(sequence_id = id, count = self.sequences.len(), "sequence removed");
        Ok(removed)
    }

    fn process_requested_spec(&mut self, spec: &mut SequenceProcessingSpec) -> Result<(), SequenceError> {
        match spec.control() {
            ControlInput::Start => self.create_sequence(spec),
            ControlInput::NoControl => self.has_sequence(spec.sequence_id()),
            ControlInput::End => self.terminate_sequence(spec.sequence_id()),
        }
    }

    fn sequence_mut(&mut self, id: u64) -> Result<&mut Sequence, SequenceError> {
        self.sequences.get_mut(&id).ok_or(SequenceError::Missing(id))
    }
}

/// Registry of live sequences for one stateful model.
///
/// All state sits behind a single lock; every method holds it for its own
/// duration only. Operations that must observe and change the registry in
/// one step ([`admit`](Self::admit), [`update_memory_state`](Self::update_memory_state),
/// [`with_sequence`](Self::with_sequence)) are offered as single calls, so a
/// caller never holds the lock across its own work.
///
/// # Example
///
/// ```
/// use hearth::sequence::{ControlInput, SequenceManager, SequenceProcessingSpec};
///
/// let manager = SequenceManager::new(60, 24);
/// let mut spec = SequenceProcessingSpec::new(ControlInput::Start, 0);
/// manager.process_requested_spec(&mut spec).unwrap();
///
/// // the manager picked an id and wrote it back
/// assert_ne!(spec.sequence_id(), 0);
/// assert!(manager.sequence_exists(spec.sequence_id()));
/// ```
pub struct SequenceManager {
    registry: Mutex<Registry>,
}

impl SequenceManager {
    /// A manager whose id counter is seeded from OS entropy
    pub fn new(timeout_seconds: u64, max_sequence_number: u32) -> Self {
        Self::with_rng(timeout_seconds, max_sequence_number, &mut StdRng::from_entropy())
    }

    /// A manager whose id counter is seeded from `rng`
    pub fn with_rng(timeout_seconds: u64, max_sequence_number: u32, rng: &mut impl RngCore) -> Self {
        Self {
            registry: Mutex::new(Registry {
                sequences: HashMap::new(),
                ids: IdGenerator::seeded(rng),
                timeout_seconds,
                max_sequence_number,
            }),
        }
    }

    /// A manager using the configured timeout and sequence limit
    pub fn from_config(config: &StatefulConfig) -> Self {
        Self::new(config.sequence_timeout_seconds, config.max_sequence_number)
    }

    // Every operation leaves the registry consistent before anything that can
    // panic, so a poisoned lock still guards valid data.
    fn lock(&self) -> MutexGuard<'_, Registry> {
        self.registry.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Number of registered sequences, terminated ones included
    pub fn sequences_count(&self) -> usize {
        self.lock().sequences.len()
    }

    /// Most sequences [`admit`](Self::admit) lets exist at once
    pub fn max_sequence_number(&self) -> u32 {
        self.lock().max_sequence_number
    }

    /// Change the sequence limit.
    ///
    /// Lowering it below the current count removes nothing; starts are
    /// refused until enough sequences end or time out.
    pub fn set_max_sequence_number(&self, max_sequence_number: u32) {
        self.lock().max_sequence_number = max_sequence_number;
    }

    /// Idle seconds after which a sequence is removed by a sweep
    pub fn timeout(&self) -> u64 {
        self.lock().timeout_seconds
    }

    /// Change the idle timeout; applies from the next sweep
    pub fn set_timeout(&self, timeout_seconds: u64) {
        self.lock().timeout_seconds = timeout_seconds;
    }

    /// Whether `id` is registered, in any state
    pub fn sequence_exists(&self, id: u64) -> bool {
        self.lock().sequences.contains_key(&id)
    }

    /// Succeeds only when `id` is registered and not terminated
    pub fn has_sequence(&self, id: u64) -> Result<(), SequenceError> {
        self.lock().has_sequence(id)
    }

    /// Register a new active sequence.
    ///
    /// With an id of `0` a fresh id is generated and written back into `spec`;
    /// this cannot fail. An explicit id that is already registered, in any
    /// state, fails with [`SequenceError::AlreadyExists`] and leaves the
    /// existing sequence untouched.
    pub fn create_sequence(&self, spec: &mut SequenceProcessingSpec) -> Result<(), SequenceError> {
        self.lock().create_sequence(spec)
    }

    /// Mark `id` as terminated. Fails like [`has_sequence`](Self::has_sequence) otherwise.
    pub fn terminate_sequence(&self, id: u64) -> Result<(), SequenceError> {
        self.lock().terminate_sequence(id)
    }

    /// Drop `id` whatever its state
    pub fn remove_sequence(&self, id: u64) -> Result<(), SequenceError> {
        self.lock().remove_sequence(id).map(|_| ())
    }

    /// Drop every sequence idle for more whole seconds than the timeout.
    ///
    /// Terminated sequences are treated like active ones. Returns how many
    /// sequences were removed.
    pub fn remove_timed_out_sequences(&self, now: Instant) -> usize {
        let mut registry = self.lock();
        let timeout = registry.timeout_seconds;
        let before = registry.sequences.len();
        registry.sequences.retain(|id, sequence| {
            let idle = sequence.idle_seconds(now);
            let keep = idle <= timeout;
            if !keep {
                debug!(sequence_id = *id, idle, timeout, "sequence timed out");
            }
            keep
        });
        before - registry.sequences.len()
    }

    /// Apply the lifecycle transition a request asks for.
    ///
    /// | control | action |
    /// |---|---|
    /// | [`ControlInput::Start`] | [`create_sequence`](Self::create_sequence) |
    /// | [`ControlInput::NoControl`] | [`has_sequence`](Self::has_sequence) |
    /// | [`ControlInput::End`] | [`terminate_sequence`](Self::terminate_sequence) |
    pub fn process_requested_spec(&self, spec: &mut SequenceProcessingSpec) -> Result<(), SequenceError> {
        self.lock().process_requested_spec(spec)
    }

    /// Admit a request in one step: enforce the sequence limit on start, apply
    /// the lifecycle transition, and snapshot the sequence's memory state.
    ///
    /// A freshly started sequence yields an empty state.
    ///
    /// # Errors
    ///
    /// - [`SequenceError::AlreadyExists`] for a start with an explicit id that
    ///   is registered, whether or not the limit is reached
    /// - [`SequenceError::MaxSequenceNumberReached`] when any other start would
    ///   exceed the limit
    /// - otherwise whatever [`process_requested_spec`](Self::process_requested_spec) fails with
    pub fn admit(&self, spec: &mut SequenceProcessingSpec) -> Result<MemoryState, SequenceError> {
        let mut registry = self.lock();
        // a duplicate explicit id is reported as such even at capacity
        let duplicate = !spec.needs_id() && registry.sequences.contains_key(&spec.sequence_id());
        if spec.control() == ControlInput::Start
            && !duplicate
            && registry.sequences.len() >= registry.max_sequence_number as usize
        {
            debug!(max = registry.max_sequence_number, "refusing to start sequence at capacity");
            return Err(SequenceError::MaxSequenceNumberReached(registry.max_sequence_number));
        }
        registry.process_requested_spec(spec)?;
        let sequence = registry.sequence_mut(spec.sequence_id())?;
        Ok(sequence.memory_state().clone())
    }

    /// Copy of the memory state carried by `id`
    pub fn memory_state(&self, id: u64) -> Result<MemoryState, SequenceError> {
        Ok(self.lock().sequence_mut(id)?.memory_state().clone())
    }

    /// Replace the memory state of `id` and mark it active now
    pub fn update_memory_state(&self, id: u64, memory_state: MemoryState) -> Result<(), SequenceError> {
        self.lock().sequence_mut(id)?.update_memory_state(memory_state);
        Ok(())
    }

    /// Run `f` against sequence `id` under the manager's lock.
    ///
    /// `f` must not call back into this manager.
    pub fn with_sequence<R>(&self, id: u64, f: impl FnOnce(&mut Sequence) -> R) -> Result<R, SequenceError> {
        let mut registry = self.lock();
        Ok(f(registry.sequence_mut(id)?))
    }
}

impl std::fmt::Debug for SequenceManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let registry = self.lock();
        f.debug_struct("SequenceManager")
            .field("sequences", &registry.sequences.len())
            .field("timeout_seconds", &registry.timeout_seconds)
            .field("max_sequence_number", &registry.max_sequence_number)
            .finish()
    }
}

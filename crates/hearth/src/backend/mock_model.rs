use std::sync::atomic::{AtomicUsize, Ordering};
use async_trait::async_trait;
use crate::backend::{InferenceOutput, StatefulModel};
use crate::error::BackendError;
use crate::tensor::{MemoryState, TensorBuffer, TensorMap};

pub(crate) const COUNT_KEY: &str = "count";

// Counts the requests seen by each sequence and echoes the inputs back
#[derive(Debug, Default)]
pub(crate) struct CountingModel {
    pub(crate) calls: AtomicUsize,
}

#[async_trait]
impl StatefulModel for CountingModel {
    async fn infer(&self, inputs: &TensorMap, state: &MemoryState) -> Result<InferenceOutput, BackendError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let previous = state
            .get(COUNT_KEY)
            .and_then(|count| count.as_slice::<i64>())
            .and_then(|values| values.first().copied())
            .unwrap_or(0);
        let count = TensorBuffer::from_vec(vec![1], vec![previous + 1])
            .map_err(|e| BackendError(e.to_string()))?;

        let mut outputs = inputs.clone();
        outputs.insert(COUNT_KEY.to_string(), count.clone());
        let mut memory_state = MemoryState::new();
        memory_state.insert(COUNT_KEY.to_string(), count);
        Ok(InferenceOutput { outputs, memory_state })
    }
}

#[derive(Debug, Default)]
pub(crate) struct FailingModel;

#[async_trait]
impl StatefulModel for FailingModel {
    async fn infer(&self, _inputs: &TensorMap, _state: &MemoryState) -> Result<InferenceOutput, BackendError> {
        Err(BackendError("out of device memory".to_string()))
    }
}

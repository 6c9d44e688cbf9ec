use async_trait::async_trait;
use crate::error::BackendError;
use crate::tensor::{MemoryState, TensorMap};

/// What a stateful model produces for one request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InferenceOutput {
    /// Tensors returned to the caller
    pub outputs: TensorMap,

    /// State to carry into the sequence's next request
    pub memory_state: MemoryState,
}

/// # StatefulModel
///
/// A model whose output depends on state carried between the requests of one
/// sequence. The state is owned by the sequence manager; the model receives a
/// copy of the current state and returns the next one.
///
/// ```rust
/// use async_trait::async_trait;
/// use hearth::backend::{InferenceOutput, StatefulModel};
/// use hearth::error::BackendError;
/// use hearth::tensor::{MemoryState, TensorMap};
///
/// /// Echoes its inputs and remembers them as state
/// pub struct Echo;
///
/// #[async_trait]
/// impl StatefulModel for Echo {
///     async fn infer(&self, inputs: &TensorMap, _state: &MemoryState) -> Result<InferenceOutput, BackendError> {
///         Ok(InferenceOutput {
///             outputs: inputs.clone(),
///             memory_state: inputs.clone(),
///         })
///     }
/// }
/// ```
///
/// ## Implementation Notes
///
/// - `state` is empty on the first request of a sequence
/// - implementations should not block the executor for long; hand heavy
///   compute to a dedicated thread pool and await it
#[async_trait]
pub trait StatefulModel: Send + Sync + 'static {
    /// Run one request of a sequence
    async fn infer(&self, inputs: &TensorMap, state: &MemoryState) -> Result<InferenceOutput, BackendError>;
}

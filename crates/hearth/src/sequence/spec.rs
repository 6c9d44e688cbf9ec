use crate::error::SequenceError;
use crate::tensor::constant::UNASSIGNED_SEQUENCE_ID;

/// Lifecycle signal carried by a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u32)]
pub enum ControlInput {
    /// Continue an existing sequence
    #[default]
    NoControl = 0,
    /// Begin a new sequence
    Start = 1,
    /// Finish an existing sequence
    End = 2,
}

impl TryFrom<u32> for ControlInput {
    type Error = SequenceError;

    fn try_from(code: u32) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(ControlInput::NoControl),
            1 => Ok(ControlInput::Start),
            2 => Ok(ControlInput::End),
            other => Err(SequenceError::InvalidControlInput(other)),
        }
    }
}

/// What a request asks of the sequence manager.
///
/// A `sequence_id` of `0` is only meaningful alongside [`ControlInput::Start`],
/// where it asks the manager to assign an id. The manager writes the assigned
/// id back into this value so the caller can report it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SequenceProcessingSpec {
    control: ControlInput,
    sequence_id: u64,
}

impl SequenceProcessingSpec {
    pub fn new(control: ControlInput, sequence_id: u64) -> Self {
        Self { control, sequence_id }
    }

    /// Build a spec from the raw wire codes.
    ///
    /// # Errors
    ///
    /// [`SequenceError::InvalidControlInput`] for any control code other than 0, 1 or 2
    pub fn from_codes(control: u32, sequence_id: u64) -> Result<Self, SequenceError> {
        Ok(Self::new(ControlInput::try_from(control)?, sequence_id))
    }

    pub fn control(&self) -> ControlInput {
        self.control
    }

    pub fn sequence_id(&self) -> u64 {
        self.sequence_id
    }

    /// Whether the manager is expected to pick the id
    pub fn needs_id(&self) -> bool {
        self.sequence_id == UNASSIGNED_SEQUENCE_ID
    }

    pub(crate) fn set_sequence_id(&mut self, sequence_id: u64) {
        self.sequence_id = sequence_id;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_control_codes() {
        assert_eq!(ControlInput::try_from(0), Ok(ControlInput::NoControl));
        assert_eq!(ControlInput::try_from(1), Ok(ControlInput::Start));
        assert_eq!(ControlInput::try_from(2), Ok(ControlInput::End));
        assert_eq!(ControlInput::try_from(3), Err(SequenceError::InvalidControlInput(3)));
        assert_eq!(ControlInput::End as u32, 2);
    }

    #[test]
    fn test_from_codes() {
        let spec = SequenceProcessingSpec::from_codes(1, 0).unwrap();
        assert_eq!(spec.control(), ControlInput::Start);
        assert!(spec.needs_id());

        let spec = SequenceProcessingSpec::from_codes(0, 42).unwrap();
        assert_eq!(spec.sequence_id(), 42);
        assert!(!spec.needs_id());

        assert_eq!(
            SequenceProcessingSpec::from_codes(7, 42),
            Err(SequenceError::InvalidControlInput(7))
        );
    }
}

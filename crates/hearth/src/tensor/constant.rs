/// # Constants with reserved meanings in Hearth

/// In a declared tensor shape, Hearth reserves the `0th` dimension for batching.
/// It is the only dimension a request body may choose freely.
pub const BATCH_DIM: usize = 0;

/// Top level key of a column ordered request body
pub const INPUTS_KEY: &str = "inputs";

/// Top level key of a row ordered request body
pub const INSTANCES_KEY: &str = "instances";

/// Optional top level key naming the model signature a request targets
pub const SIGNATURE_NAME_KEY: &str = "signature_name";

/// Sequence id meaning "assign one for me" on a sequence start
pub const UNASSIGNED_SEQUENCE_ID: u64 = 0;

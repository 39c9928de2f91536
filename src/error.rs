use thiserror::Error;

/// Failure to obtain or accept the initial dataset.
///
/// Kept `Clone` so the controller can hold on to it in its failed state.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LoadError {
    #[error("transport error fetching {source_name}: {message}")]
    Transport {
        source_name: String,
        message: String,
    },

    #[error("{source_name} responded with status {status}")]
    Status { source_name: String, status: u16 },

    #[error("payload is not valid JSON: {0}")]
    Malformed(String),

    #[error("payload is not a sequence of game records")]
    NotASequence,

    #[error("record {index} is invalid: {reason}")]
    InvalidRecord { index: usize, reason: String },

    #[error("dataset has already been loaded")]
    AlreadyLoaded,
}

/// Selecting a row that is not in the visible subset.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("row {index} is out of range ({len} visible rows)")]
    OutOfRange { index: usize, len: usize },
}

/// Failure of a dispatched dashboard command.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error(transparent)]
    Selection(#[from] SelectionError),
}

use thiserror::Error;

/// Shape errors raised while building model values.
///
/// These are contract violations: the data cannot be turned into a
/// well-formed fact list and nothing downstream should try to guess.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("invalid standard ladder: {message}")]
    InvalidLadder { message: String },

    #[error("unknown standard: {name}")]
    UnknownStandard { name: String },

    #[error("invalid option {spelling}: {message}")]
    InvalidOption { spelling: String, message: String },

    #[error("value {value} names both `since` ({since}) and a defect report against {dr_against}")]
    ConflictingStandards {
        value: u32,
        since: String,
        dr_against: String,
    },

    #[error("value {value}: `pedantic` may only be false")]
    PedanticEnabled { value: u32 },

    #[error("values out of order: {value} follows {previous}")]
    UnsortedValues { previous: u32, value: u32 },

    #[error("unconditional value {value} is not the lowest-priority entry")]
    UnconditionalNotLast { value: u32 },

    #[error("removal marker must be the last entry")]
    MisplacedRemoval,

    #[error("entry {index} has no value")]
    MissingValue { index: usize },
}

pub type Result<T> = std::result::Result<T, ModelError>;

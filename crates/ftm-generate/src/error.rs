use thiserror::Error;

use ftm_model::ModelError;

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error(transparent)]
    Model(#[from] ModelError),

    #[error("option split requested for a value without option tokens")]
    EmptyToggle,

    #[error("unconditional value {value} shadows {remaining} lower-priority value(s)")]
    UnreachableFacts { value: u32, remaining: usize },

    #[error("unbalanced conditional blocks (depth {depth} at end of feature)")]
    UnbalancedBlocks { depth: usize },

    #[error("block terminator without an open block")]
    UnopenedBlock,

    #[error("{feature}: {source}")]
    Feature {
        feature: String,
        #[source]
        source: Box<GenerateError>,
    },
}

impl GenerateError {
    /// Attach the feature being generated when the error happened.
    pub fn in_feature(self, feature: &str) -> Self {
        match self {
            already @ GenerateError::Feature { .. } => already,
            other => GenerateError::Feature {
                feature: feature.to_string(),
                source: Box::new(other),
            },
        }
    }
}

pub type Result<T> = std::result::Result<T, GenerateError>;

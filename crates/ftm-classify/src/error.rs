use thiserror::Error;

use ftm_model::ModelError;

/// Contract violations detected while classifying.
///
/// Inconsistent but well-formed data is reported through
/// [`crate::ClassificationWarning`] instead.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ClassifyError {
    #[error("{feature}: {source}")]
    Model {
        feature: String,
        #[source]
        source: ModelError,
    },

    #[error("{feature}: values out of order: {value} follows {previous}")]
    Unsorted {
        feature: String,
        previous: u32,
        value: u32,
    },
}

impl ClassifyError {
    pub(crate) fn model(feature: &str, source: ModelError) -> Self {
        ClassifyError::Model {
            feature: feature.to_string(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, ClassifyError>;

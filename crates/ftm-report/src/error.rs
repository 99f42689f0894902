use ftm_classify::ClassifyError;
use ftm_model::Kind;

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("{kind} tables are not supported")]
    UnsupportedKind { kind: Kind },

    #[error(transparent)]
    Classify(#[from] ClassifyError),
}

pub type Result<T> = std::result::Result<T, ReportError>;

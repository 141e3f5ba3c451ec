use thiserror::Error;

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Invalid job ID: {0}")]
    InvalidJobId(String),

    #[error("Invalid job status: {0}")]
    InvalidStatus(String),

    #[error("Invalid state transition from {from} to {to}: {reason}")]
    InvalidStateTransition {
        from: String,
        to: String,
        reason: String,
    },

    #[error("Sync run task terminated without signalling finish")]
    FinishSignalLost,
}

pub type Result<T> = std::result::Result<T, SyncError>;

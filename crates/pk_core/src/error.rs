use thiserror::Error;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Missing collaborator: {name}")]
    MissingCollaborator { name: &'static str },

    #[error("No session in progress")]
    NotRunning,

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl SessionError {
    /// Whether a later command can succeed on the same controller. A failed
    /// build or an out-of-order command leaves nothing poisoned.
    pub fn is_recoverable(&self) -> bool {
        match self {
            SessionError::MissingCollaborator { .. } => true,
            SessionError::NotRunning => true,
            SessionError::Serialization(_) => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, SessionError>;

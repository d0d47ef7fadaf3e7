use serde::{Deserialize, Serialize};

use super::domain::IntakeSnapshot;
use super::session::WizardSession;

/// Identifier wrapper for wizard sessions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub String);

/// Storage abstraction for live sessions so the service facade can be
/// exercised in isolation. Sessions live in memory for the session's
/// lifetime and are discarded on abandonment.
pub trait SessionStore: Send + Sync {
    fn insert(&self, id: SessionId, session: WizardSession) -> Result<(), StoreError>;
    fn update(&self, id: &SessionId, session: WizardSession) -> Result<(), StoreError>;
    fn fetch(&self, id: &SessionId) -> Result<Option<WizardSession>, StoreError>;
    fn discard(&self, id: &SessionId) -> Result<(), StoreError>;
}

/// Error enumeration for session store failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("session already exists")]
    Conflict,
    #[error("session not found")]
    NotFound,
    #[error("session store unavailable: {0}")]
    Unavailable(String),
}

/// Outbound seam for the external submission endpoint. The core guarantees
/// the snapshot is fully valid; transport, retry, and persistence are the
/// collaborator's concern.
pub trait SubmissionGateway: Send + Sync {
    fn deliver(&self, session_id: &SessionId, snapshot: &IntakeSnapshot)
        -> Result<(), GatewayError>;
}

/// Submission dispatch error.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("submission transport unavailable: {0}")]
    Transport(String),
}

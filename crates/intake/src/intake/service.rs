use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tracing::info;

use super::catalog::FieldCatalog;
use super::domain::{FieldValue, IntakeSnapshot, IntakeStep};
use super::session::{FieldView, WizardError, WizardSession};
use super::store::{GatewayError, SessionId, SessionStore, StoreError, SubmissionGateway};
use super::summary::{self, IntakeSummary};

static SESSION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_session_id() -> SessionId {
    let id = SESSION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    SessionId(format!("intake-{id:06}"))
}

/// Service facade composing the field catalog, the session store, and the
/// submission gateway. Each call follows fetch -> mutate -> update so the
/// store always holds the state any later validation query will see.
pub struct IntakeWizardService<S, G> {
    catalog: Arc<FieldCatalog>,
    store: Arc<S>,
    gateway: Arc<G>,
}

impl<S, G> IntakeWizardService<S, G>
where
    S: SessionStore + 'static,
    G: SubmissionGateway + 'static,
{
    pub fn new(store: Arc<S>, gateway: Arc<G>) -> Self {
        Self::with_catalog(Arc::new(FieldCatalog::standard()), store, gateway)
    }

    pub fn with_catalog(catalog: Arc<FieldCatalog>, store: Arc<S>, gateway: Arc<G>) -> Self {
        Self {
            catalog,
            store,
            gateway,
        }
    }

    pub fn catalog(&self) -> &FieldCatalog {
        &self.catalog
    }

    /// Open a fresh session at the first step and return its field surface.
    pub fn start(&self) -> Result<(SessionId, Vec<FieldView>), IntakeServiceError> {
        let id = next_session_id();
        let session = WizardSession::new(self.catalog.clone());
        let surface = session.field_surface(session.current_step());
        self.store.insert(id.clone(), session)?;
        info!(session = %id.0, "intake session opened");
        Ok((id, surface))
    }

    /// Current step and its field surface.
    pub fn fields(
        &self,
        id: &SessionId,
        step: Option<IntakeStep>,
    ) -> Result<(IntakeStep, Vec<FieldView>), IntakeServiceError> {
        let session = self.fetch(id)?;
        let step = step.unwrap_or_else(|| session.current_step());
        Ok((step, session.field_surface(step)))
    }

    /// Store one field update and return the owning step's re-derived
    /// surface, errors included, so the caller renders fresh state.
    pub fn update_field(
        &self,
        id: &SessionId,
        key: &str,
        value: FieldValue,
    ) -> Result<Vec<FieldView>, IntakeServiceError> {
        let mut session = self.fetch(id)?;
        session.set_field(key, value)?;
        let step = session
            .catalog()
            .contract(key)
            .map(|contract| contract.step)
            .unwrap_or_else(|| session.current_step());
        let surface = session.field_surface(step);
        self.store.update(id, session)?;
        Ok(surface)
    }

    /// Remove a stored value.
    pub fn clear_field(&self, id: &SessionId, key: &str) -> Result<(), IntakeServiceError> {
        let mut session = self.fetch(id)?;
        session.clear_field(key)?;
        self.store.update(id, session)?;
        Ok(())
    }

    pub fn advance(&self, id: &SessionId) -> Result<(IntakeStep, Vec<FieldView>), IntakeServiceError> {
        self.navigate(id, WizardSession::next)
    }

    pub fn go_back(&self, id: &SessionId) -> Result<(IntakeStep, Vec<FieldView>), IntakeServiceError> {
        self.navigate(id, WizardSession::back)
    }

    pub fn jump(
        &self,
        id: &SessionId,
        step: IntakeStep,
    ) -> Result<(IntakeStep, Vec<FieldView>), IntakeServiceError> {
        self.navigate(id, move |session| session.jump_to_step(step))
    }

    /// Redacted review summary for the session's current form state.
    pub fn summary(&self, id: &SessionId) -> Result<IntakeSummary, IntakeServiceError> {
        let session = self.fetch(id)?;
        Ok(summary::summarize(session.catalog(), session.form()))
    }

    /// Submit from the summary step: freeze the snapshot, hand it to the
    /// gateway, and mark the stored session submitted. A gating refusal
    /// leaves the stored session untouched.
    pub fn submit(&self, id: &SessionId) -> Result<IntakeSnapshot, IntakeServiceError> {
        let mut session = self.fetch(id)?;
        let snapshot = session.submit()?;
        self.gateway.deliver(id, &snapshot)?;
        self.store.update(id, session)?;
        info!(session = %id.0, "intake session submitted");
        Ok(snapshot)
    }

    /// Discard a session without submitting; entered values are dropped.
    pub fn abandon(&self, id: &SessionId) -> Result<(), IntakeServiceError> {
        self.store.discard(id)?;
        info!(session = %id.0, "intake session abandoned");
        Ok(())
    }

    fn navigate(
        &self,
        id: &SessionId,
        transition: impl FnOnce(&mut WizardSession) -> Result<IntakeStep, WizardError>,
    ) -> Result<(IntakeStep, Vec<FieldView>), IntakeServiceError> {
        let mut session = self.fetch(id)?;
        let step = transition(&mut session)?;
        let surface = session.field_surface(step);
        self.store.update(id, session)?;
        Ok((step, surface))
    }

    fn fetch(&self, id: &SessionId) -> Result<WizardSession, IntakeServiceError> {
        let session = self.store.fetch(id)?.ok_or(StoreError::NotFound)?;
        Ok(session)
    }
}

/// Error raised by the wizard service facade.
#[derive(Debug, thiserror::Error)]
pub enum IntakeServiceError {
    #[error(transparent)]
    Wizard(#[from] WizardError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

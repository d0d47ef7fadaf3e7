use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use taxmate_intake::intake::{
    GatewayError, IntakeSnapshot, SessionId, SessionStore, StoreError, SubmissionGateway,
    WizardSession,
};
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemorySessionStore {
    sessions: Arc<Mutex<HashMap<SessionId, WizardSession>>>,
}

impl SessionStore for InMemorySessionStore {
    fn insert(&self, id: SessionId, session: WizardSession) -> Result<(), StoreError> {
        let mut guard = self.sessions.lock().expect("session store mutex poisoned");
        if guard.contains_key(&id) {
            return Err(StoreError::Conflict);
        }
        guard.insert(id, session);
        Ok(())
    }

    fn update(&self, id: &SessionId, session: WizardSession) -> Result<(), StoreError> {
        let mut guard = self.sessions.lock().expect("session store mutex poisoned");
        if guard.contains_key(id) {
            guard.insert(id.clone(), session);
            Ok(())
        } else {
            Err(StoreError::NotFound)
        }
    }

    fn fetch(&self, id: &SessionId) -> Result<Option<WizardSession>, StoreError> {
        let guard = self.sessions.lock().expect("session store mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn discard(&self, id: &SessionId) -> Result<(), StoreError> {
        let mut guard = self.sessions.lock().expect("session store mutex poisoned");
        guard.remove(id).map(|_| ()).ok_or(StoreError::NotFound)
    }
}

/// Gateway that records deliveries locally and logs the handoff. Stands in
/// for the tax filing backend until that integration lands.
#[derive(Default, Clone)]
pub(crate) struct RecordingSubmissionGateway {
    deliveries: Arc<Mutex<Vec<(SessionId, IntakeSnapshot)>>>,
}

impl SubmissionGateway for RecordingSubmissionGateway {
    fn deliver(
        &self,
        session_id: &SessionId,
        snapshot: &IntakeSnapshot,
    ) -> Result<(), GatewayError> {
        let mut guard = self.deliveries.lock().expect("gateway mutex poisoned");
        guard.push((session_id.clone(), snapshot.clone()));
        info!(
            session = %session_id.0,
            fields = snapshot.values().len(),
            "intake snapshot accepted for filing"
        );
        Ok(())
    }
}

impl RecordingSubmissionGateway {
    pub(crate) fn deliveries(&self) -> Vec<(SessionId, IntakeSnapshot)> {
        self.deliveries
            .lock()
            .expect("gateway mutex poisoned")
            .clone()
    }
}

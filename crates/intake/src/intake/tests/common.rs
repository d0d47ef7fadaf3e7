use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::intake::catalog::FieldCatalog;
use crate::intake::domain::{FieldValue, IntakeSnapshot, IntakeStep};
use crate::intake::service::IntakeWizardService;
use crate::intake::session::WizardSession;
use crate::intake::store::{
    GatewayError, SessionId, SessionStore, StoreError, SubmissionGateway,
};

pub(super) fn catalog() -> Arc<FieldCatalog> {
    Arc::new(FieldCatalog::standard())
}

pub(super) fn session() -> WizardSession {
    WizardSession::new(catalog())
}

pub(super) fn fill_basic_details(session: &mut WizardSession) {
    session
        .set_field("fullName", FieldValue::Text("Asha Verma".to_string()))
        .expect("known field");
    session
        .set_field("age", FieldValue::Number(34.0))
        .expect("known field");
    session
        .set_field("mobileNumber", FieldValue::Text("9876543210".to_string()))
        .expect("known field");
    session
        .set_field("password", FieldValue::Text("correct-horse".to_string()))
        .expect("known field");
}

pub(super) fn fill_official_details(session: &mut WizardSession) {
    session
        .set_field(
            "aadhaarNumber",
            FieldValue::Text("1234 5678 9012".to_string()),
        )
        .expect("known field");
    session
        .set_field("panNumber", FieldValue::Text("ABCDE1234F".to_string()))
        .expect("known field");
    session
        .set_field(
            "employmentType",
            FieldValue::Selection("salaried".to_string()),
        )
        .expect("known field");
    session
        .set_field(
            "stateOfResidence",
            FieldValue::Selection("Karnataka".to_string()),
        )
        .expect("known field");
    session
        .set_field("disabilityStatus", FieldValue::Toggle(false))
        .expect("known field");
}

pub(super) fn fill_financial(session: &mut WizardSession) {
    session
        .set_field("annualIncome", FieldValue::Number(1_250_000.0))
        .expect("known field");
    session
        .set_field("monthlyEmi", FieldValue::Number(18_000.0))
        .expect("known field");
    session
        .set_field("investmentsFdSavings", FieldValue::Number(300_000.0))
        .expect("known field");
    session
        .set_field("bankStatement", FieldValue::Files(1))
        .expect("known field");
    session
        .set_field("salarySlip", FieldValue::Files(1))
        .expect("known field");
}

/// A session navigated to the summary step with every active field valid.
pub(super) fn session_at_summary() -> WizardSession {
    let mut session = session();
    fill_basic_details(&mut session);
    session.next().expect("basic details complete");
    fill_official_details(&mut session);
    session.next().expect("official details complete");
    fill_financial(&mut session);
    session.next().expect("financial step complete");
    assert_eq!(session.current_step(), IntakeStep::Summary);
    session
}

#[derive(Default, Clone)]
pub(super) struct MemoryStore {
    pub(super) sessions: Arc<Mutex<HashMap<SessionId, WizardSession>>>,
}

impl SessionStore for MemoryStore {
    fn insert(&self, id: SessionId, session: WizardSession) -> Result<(), StoreError> {
        let mut guard = self.sessions.lock().expect("store mutex poisoned");
        if guard.contains_key(&id) {
            return Err(StoreError::Conflict);
        }
        guard.insert(id, session);
        Ok(())
    }

    fn update(&self, id: &SessionId, session: WizardSession) -> Result<(), StoreError> {
        let mut guard = self.sessions.lock().expect("store mutex poisoned");
        if !guard.contains_key(id) {
            return Err(StoreError::NotFound);
        }
        guard.insert(id.clone(), session);
        Ok(())
    }

    fn fetch(&self, id: &SessionId) -> Result<Option<WizardSession>, StoreError> {
        let guard = self.sessions.lock().expect("store mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn discard(&self, id: &SessionId) -> Result<(), StoreError> {
        let mut guard = self.sessions.lock().expect("store mutex poisoned");
        guard.remove(id).map(|_| ()).ok_or(StoreError::NotFound)
    }
}

#[derive(Default, Clone)]
pub(super) struct RecordingGateway {
    deliveries: Arc<Mutex<Vec<(SessionId, IntakeSnapshot)>>>,
}

impl RecordingGateway {
    pub(super) fn deliveries(&self) -> Vec<(SessionId, IntakeSnapshot)> {
        self.deliveries.lock().expect("gateway mutex poisoned").clone()
    }
}

impl SubmissionGateway for RecordingGateway {
    fn deliver(
        &self,
        session_id: &SessionId,
        snapshot: &IntakeSnapshot,
    ) -> Result<(), GatewayError> {
        self.deliveries
            .lock()
            .expect("gateway mutex poisoned")
            .push((session_id.clone(), snapshot.clone()));
        Ok(())
    }
}

pub(super) async fn read_json_body(response: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("valid json body")
}

pub(super) fn build_service() -> (
    IntakeWizardService<MemoryStore, RecordingGateway>,
    Arc<MemoryStore>,
    Arc<RecordingGateway>,
) {
    let store = Arc::new(MemoryStore::default());
    let gateway = Arc::new(RecordingGateway::default());
    let service = IntakeWizardService::new(store.clone(), gateway.clone());
    (service, store, gateway)
}

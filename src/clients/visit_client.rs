use tracing::{debug, info, instrument, warn};
use crate::actor_framework::ResourceClient;
use crate::clients::PatientClient;
use crate::domain::{PatientVisit, VisitCreate, VisitUpdate};
use crate::visit_actor::VisitError;

/// Client for the Visit actor. Checks the patient before recording a visit.
#[derive(Clone)]
pub struct VisitClient {
    inner: ResourceClient<PatientVisit>,
    patients: PatientClient,
}

impl_client_methods!(VisitClient, PatientVisit, VisitError, visit);

impl VisitClient {
    pub fn new(inner: ResourceClient<PatientVisit>, patients: PatientClient) -> Self {
        Self { inner, patients }
    }

    #[instrument(skip(self, params), fields(patient_id = %params.patient_id, doctor_id = %params.doctor_id))]
    pub async fn record_visit(&self, params: VisitCreate) -> Result<String, VisitError> {
        match self.patients.get_patient(params.patient_id.clone()).await {
            Ok(Some(_)) => debug!("Patient validation successful"),
            Ok(None) => {
                warn!("Patient not found");
                return Err(VisitError::PatientNotFound(params.patient_id));
            }
            Err(e) => return Err(VisitError::ActorCommunicationError(e.to_string())),
        }

        let id = self.inner.create(params).await.map_err(VisitError::from)?;
        info!(visit_id = %id, "Visit recorded");
        Ok(id)
    }

    #[instrument(skip(self))]
    pub async fn update_visit(&self, id: String, update: VisitUpdate) -> Result<PatientVisit, VisitError> {
        debug!("Sending request");
        self.inner.update(id, update).await.map_err(VisitError::from)
    }

    /// Visits of one doctor, latest first.
    #[instrument(skip(self))]
    pub async fn visits_for_doctor(&self, doctor_id: String) -> Result<Vec<PatientVisit>, VisitError> {
        let mut visits: Vec<PatientVisit> = self
            .list_visits()
            .await?
            .into_iter()
            .filter(|visit| visit.doctor_id == doctor_id)
            .collect();
        visits.sort_by(|a, b| b.visit_date.cmp(&a.visit_date));
        Ok(visits)
    }
}

use tracing::{debug, error, info, instrument, warn};
use crate::actor_framework::{id_order, ResourceClient};
use crate::clients::InventoryClient;
use crate::domain::{Patient, PatientCreate, PatientUpdate};
use crate::patient_actor::PatientError;

/// Client for the patient registry.
///
/// Registered ids are enrolled with the inventory service, which is where sales check
/// them. Deletion withdraws the id there first, so no sale commits against a patient
/// whose removal has started.
#[derive(Clone)]
pub struct PatientClient {
    inner: ResourceClient<Patient>,
    inventory: InventoryClient,
}

impl PatientClient {
    pub fn new(inner: ResourceClient<Patient>, inventory: InventoryClient) -> Self {
        Self { inner, inventory }
    }

    #[instrument(skip(self, params), fields(nik = %params.nik))]
    pub async fn register_patient(&self, params: PatientCreate) -> Result<String, PatientError> {
        debug!("Sending request");
        let id = self.inner.create(params).await.map_err(PatientError::from)?;

        if let Err(e) = self.inventory.enroll_patient(id.clone()).await {
            error!(patient_id = %id, error = %e, "Enrollment failed, removing patient");
            let _ = self.inner.delete(id).await;
            return Err(e);
        }
        info!(patient_id = %id, "Patient registered");
        Ok(id)
    }

    #[instrument(skip(self))]
    pub async fn get_patient(&self, id: String) -> Result<Option<Patient>, PatientError> {
        debug!("Sending request");
        self.inner.get(id).await.map_err(PatientError::from)
    }

    #[instrument(skip(self))]
    pub async fn update_patient(&self, id: String, update: PatientUpdate) -> Result<Patient, PatientError> {
        debug!("Sending request");
        self.inner.update(id, update).await.map_err(PatientError::from)
    }

    #[instrument(skip(self))]
    pub async fn delete_patient(&self, id: String) -> Result<(), PatientError> {
        if !self.inventory.withdraw_patient(id.clone()).await? {
            warn!("Patient was not enrolled for sales");
        }
        self.inner.delete(id).await.map_err(PatientError::from)
    }

    #[instrument(skip(self))]
    pub async fn list_patients(&self) -> Result<Vec<Patient>, PatientError> {
        debug!("Sending request");
        self.inner.list().await.map_err(PatientError::from)
    }

    /// All patients, alphabetical by full name.
    #[instrument(skip(self))]
    pub async fn list_patients_by_name(&self) -> Result<Vec<Patient>, PatientError> {
        let mut patients = self.list_patients().await?;
        patients.sort_by(|a, b| a.full_name.cmp(&b.full_name).then_with(|| id_order(&a.id, &b.id)));
        Ok(patients)
    }

    /// The `limit` most recently registered patients, newest first.
    #[instrument(skip(self))]
    pub async fn recent_patients(&self, limit: usize) -> Result<Vec<Patient>, PatientError> {
        let mut patients = self.list_patients().await?;
        patients.sort_by(|a, b| b.registered_at.cmp(&a.registered_at).then_with(|| id_order(&b.id, &a.id)));
        patients.truncate(limit);
        Ok(patients)
    }
}

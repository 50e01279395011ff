use chrono::Utc;
use crate::actor_framework::ActorEntity;
use crate::domain::{Patient, PatientCreate, PatientUpdate};

impl ActorEntity for Patient {
    type Id = String;
    type CreateParams = PatientCreate;
    type UpdateParams = PatientUpdate;
    type Action = ();
    type ActionResult = ();

    fn id(&self) -> &String {
        &self.id
    }

    /// Registers the patient now; the date of birth must lie before today (UTC).
    fn from_create_params(id: String, params: PatientCreate) -> Result<Self, String> {
        let registered_at = Utc::now();
        let patient = Self {
            id,
            full_name: params.full_name,
            nik: params.nik,
            date_of_birth: params.date_of_birth,
            gender: params.gender,
            address: params.address,
            phone_number: params.phone_number,
            registered_at,
        };
        patient.validate(registered_at.date_naive())?;
        Ok(patient)
    }

    fn unique_key(&self) -> Option<String> {
        Some(self.nik.trim().to_string())
    }

    fn on_update(&mut self, update: PatientUpdate) -> Result<(), String> {
        self.apply(update);
        self.validate(Utc::now().date_naive())
    }

    fn handle_action(&mut self, _action: ()) -> Result<(), String> {
        Ok(())
    }
}

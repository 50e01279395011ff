use crate::actor_framework::ActorEntity;
use crate::domain::{PatientVisit, VisitCreate, VisitUpdate};

impl ActorEntity for PatientVisit {
    type Id = String;
    type CreateParams = VisitCreate;
    type UpdateParams = VisitUpdate;
    type Action = ();
    type ActionResult = ();

    fn id(&self) -> &String {
        &self.id
    }

    fn from_create_params(id: String, params: VisitCreate) -> Result<Self, String> {
        if params.patient_id.trim().is_empty() || params.doctor_id.trim().is_empty() {
            return Err("A visit needs both a patient and a doctor.".to_string());
        }
        Ok(Self {
            id,
            patient_id: params.patient_id,
            doctor_id: params.doctor_id,
            visit_date: params.visit_date,
            notes: params.notes.filter(|notes| !notes.trim().is_empty()),
        })
    }

    fn on_update(&mut self, update: VisitUpdate) -> Result<(), String> {
        if let Some(visit_date) = update.visit_date {
            self.visit_date = visit_date;
        }
        if let Some(notes) = update.notes {
            self.notes = Some(notes).filter(|notes| !notes.trim().is_empty());
        }
        Ok(())
    }

    fn handle_action(&mut self, _action: ()) -> Result<(), String> {
        Ok(())
    }
}

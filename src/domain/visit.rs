use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use super::{PatientId, UserId, VisitId};

/// A consultation of a patient with a doctor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientVisit {
    pub id: VisitId,
    pub patient_id: PatientId,
    pub doctor_id: UserId,
    pub visit_date: DateTime<Utc>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone)]
pub struct VisitCreate {
    pub patient_id: PatientId,
    pub doctor_id: UserId,
    pub visit_date: DateTime<Utc>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct VisitUpdate {
    pub visit_date: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

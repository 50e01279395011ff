use chrono::{NaiveTime, Weekday};
use serde::{Deserialize, Serialize};
use super::{require_text, ScheduleId, UserId};

/// Weekly availability of a doctor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoctorSchedule {
    pub id: ScheduleId,
    pub doctor_id: UserId,
    pub day: Weekday,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub specialization: String,
}

#[derive(Debug, Clone)]
pub struct ScheduleCreate {
    pub doctor_id: UserId,
    pub day: Weekday,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub specialization: String,
}

#[derive(Debug, Clone, Default)]
pub struct ScheduleUpdate {
    pub day: Option<Weekday>,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub specialization: Option<String>,
}

impl DoctorSchedule {
    pub fn validate(&self) -> Result<(), String> {
        if self.start_time >= self.end_time {
            return Err("Start time must be before end time.".to_string());
        }
        require_text("Specialization", &self.specialization, Some(255))
    }
}

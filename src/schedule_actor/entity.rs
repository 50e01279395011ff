use crate::actor_framework::ActorEntity;
use crate::domain::{DoctorSchedule, ScheduleCreate, ScheduleUpdate};

impl ActorEntity for DoctorSchedule {
    type Id = String;
    type CreateParams = ScheduleCreate;
    type UpdateParams = ScheduleUpdate;
    type Action = ();
    type ActionResult = ();

    fn id(&self) -> &String {
        &self.id
    }

    fn from_create_params(id: String, params: ScheduleCreate) -> Result<Self, String> {
        let schedule = Self {
            id,
            doctor_id: params.doctor_id,
            day: params.day,
            start_time: params.start_time,
            end_time: params.end_time,
            specialization: params.specialization,
        };
        schedule.validate()?;
        Ok(schedule)
    }

    fn on_update(&mut self, update: ScheduleUpdate) -> Result<(), String> {
        if let Some(day) = update.day {
            self.day = day;
        }
        if let Some(start_time) = update.start_time {
            self.start_time = start_time;
        }
        if let Some(end_time) = update.end_time {
            self.end_time = end_time;
        }
        if let Some(specialization) = update.specialization {
            self.specialization = specialization;
        }
        self.validate()
    }

    fn handle_action(&mut self, _action: ()) -> Result<(), String> {
        Ok(())
    }
}

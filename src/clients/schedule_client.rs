use chrono::Weekday;
use tracing::{debug, info, instrument, warn};
use crate::access::Role;
use crate::actor_framework::{id_order, ResourceClient};
use crate::clients::UserClient;
use crate::domain::{DoctorSchedule, ScheduleCreate, ScheduleUpdate};
use crate::schedule_actor::ScheduleError;
use crate::user_actor::UserError;

/// Client for the Schedule actor.
#[derive(Clone)]
pub struct ScheduleClient {
    inner: ResourceClient<DoctorSchedule>,
    users: UserClient,
}

impl_client_methods!(ScheduleClient, DoctorSchedule, ScheduleError, schedule);

impl ScheduleClient {
    pub fn new(inner: ResourceClient<DoctorSchedule>, users: UserClient) -> Self {
        Self { inner, users }
    }

    /// Adds a weekly slot. The referenced user must exist and hold the doctor role.
    #[instrument(skip(self, params), fields(doctor_id = %params.doctor_id, day = %params.day))]
    pub async fn add_schedule(&self, params: ScheduleCreate) -> Result<String, ScheduleError> {
        let doctor = match self.users.require_user(params.doctor_id.clone()).await {
            Ok(user) => user,
            Err(UserError::NotFound(id)) => {
                warn!("Doctor not found");
                return Err(ScheduleError::DoctorNotFound(id));
            }
            Err(e) => return Err(ScheduleError::ActorCommunicationError(e.to_string())),
        };
        if doctor.role != Role::Doctor {
            warn!(role = %doctor.role, "Schedule owner is not a doctor");
            return Err(ScheduleError::NotADoctor(doctor.id));
        }

        let id = self.inner.create(params).await.map_err(ScheduleError::from)?;
        info!(schedule_id = %id, "Schedule added");
        Ok(id)
    }

    #[instrument(skip(self))]
    pub async fn update_schedule(&self, id: String, update: ScheduleUpdate) -> Result<DoctorSchedule, ScheduleError> {
        debug!("Sending request");
        self.inner.update(id, update).await.map_err(ScheduleError::from)
    }

    /// Slots on `day`, earliest start first.
    #[instrument(skip(self))]
    pub async fn schedules_for_day(&self, day: Weekday) -> Result<Vec<DoctorSchedule>, ScheduleError> {
        let mut schedules: Vec<DoctorSchedule> = self
            .list_schedules()
            .await?
            .into_iter()
            .filter(|schedule| schedule.day == day)
            .collect();
        schedules.sort_by(|a, b| a.start_time.cmp(&b.start_time).then_with(|| id_order(&a.id, &b.id)));
        Ok(schedules)
    }
}

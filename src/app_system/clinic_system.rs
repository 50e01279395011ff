use chrono::{DateTime, Utc, Weekday};
use tokio::task::JoinHandle;
use tracing::{error, info, instrument};
use crate::access::{AccessPolicy, Permission, Session};
use crate::clients::{
    InventoryClient, PatientClient, PrescriptionClient, SalesClient, ScheduleClient, UserClient, VisitClient,
};
use crate::domain::{
    BasketLine, DoctorSchedule, Page, Patient, PatientCreate, PatientId, PatientUpdate, PatientVisit, Prescription,
    PrescriptionCreate, Product, ProductCreate, ProductUpdate, SaleRecord, SaleRequest, SalesTransaction,
    ScheduleCreate, ScheduleUpdate, User, UserCreate, UserUpdate, VisitCreate, VisitUpdate,
};
use crate::inventory::SalesReport;
use super::{ClinicConfig, ClinicError};

/// The running clinic: every actor plus the clients wired between them.
///
/// Each `Session`-taking method checks the role permission table before touching
/// any actor.
pub struct ClinicSystem {
    config: ClinicConfig,
    pub users: UserClient,
    pub patients: PatientClient,
    pub visits: VisitClient,
    pub prescriptions: PrescriptionClient,
    pub schedules: ScheduleClient,
    pub inventory: InventoryClient,
    pub sales: SalesClient,
    handles: Vec<JoinHandle<()>>,
}

impl ClinicSystem {
    /// Spawns all actors. Fails only if an existing inventory snapshot cannot be read.
    pub fn start(config: ClinicConfig) -> Result<Self, ClinicError> {
        let capacity = config.mailbox_capacity;

        let (user_actor, users) = crate::user_actor::new(capacity);
        let (inventory_service, inventory) = crate::inventory::new(capacity, config.snapshot_path.clone())?;
        let (patient_actor, patients) = crate::patient_actor::new(capacity, inventory.clone());
        let (visit_actor, visits) = crate::visit_actor::new(capacity, patients.clone());
        let (prescription_actor, prescriptions) =
            crate::prescription_actor::new(capacity, visits.clone(), inventory.clone());
        let (schedule_actor, schedules) = crate::schedule_actor::new(capacity, users.clone());
        let sales = SalesClient::new(inventory.clone());

        let handles = vec![
            tokio::spawn(user_actor.run()),
            tokio::spawn(patient_actor.run()),
            tokio::spawn(inventory_service.run()),
            tokio::spawn(visit_actor.run()),
            tokio::spawn(prescription_actor.run()),
            tokio::spawn(schedule_actor.run()),
        ];
        info!(actors = handles.len(), "Clinic system started");

        Ok(Self {
            config,
            users,
            patients,
            visits,
            prescriptions,
            schedules,
            inventory,
            sales,
            handles,
        })
    }

    pub fn config(&self) -> &ClinicConfig {
        &self.config
    }

    /// Stops the inventory service, closes every actor channel and waits for the tasks.
    pub async fn shutdown(self) -> Result<(), ClinicError> {
        info!("Shutting down clinic system...");
        let ClinicSystem { users, patients, visits, prescriptions, schedules, inventory, sales, handles, .. } = self;

        inventory.shutdown().await?;
        // Resource actors stop once every client clone is gone.
        drop((users, patients, visits, prescriptions, schedules, inventory, sales));

        for handle in handles {
            if let Err(e) = handle.await {
                error!(error = %e, "Actor task failed");
                return Err(ClinicError::TaskFailed(e.to_string()));
            }
        }

        info!("Clinic system shutdown complete.");
        Ok(())
    }

    /// Opens a session for an existing staff user.
    #[instrument(skip(self))]
    pub async fn login(&self, user_id: String) -> Result<Session, ClinicError> {
        let user = self.users.require_user(user_id).await?;
        info!(role = %user.role, "Session opened");
        Ok(Session::for_user(&user))
    }

    // --- Sales ---

    /// Sells `basket` on behalf of the session user.
    #[instrument(skip(self, session, basket), fields(user_id = %session.user_id, lines = basket.len()))]
    pub async fn record_sale(
        &self,
        session: &Session,
        patient_id: Option<PatientId>,
        basket: Vec<BasketLine>,
    ) -> Result<SaleRecord, ClinicError> {
        AccessPolicy::authorize(session, Permission::RecordSales)?;
        let request = SaleRequest::new(session.user_id.clone(), patient_id, basket);
        Ok(self.sales.record_sale_with_retry(request, self.config.max_commit_attempts).await?)
    }

    pub async fn get_sale(&self, session: &Session, id: String) -> Result<Option<SaleRecord>, ClinicError> {
        AccessPolicy::authorize(session, Permission::ViewSales)?;
        Ok(self.sales.get_sale(id).await?)
    }

    /// One page of sales, newest first, `page_size` per page.
    pub async fn list_sales(&self, session: &Session, page: usize) -> Result<Page<SalesTransaction>, ClinicError> {
        AccessPolicy::authorize(session, Permission::ViewSales)?;
        Ok(self.sales.list_sales(page, self.config.page_size).await?)
    }

    pub async fn sales_report(&self, session: &Session, now: DateTime<Utc>) -> Result<SalesReport, ClinicError> {
        AccessPolicy::authorize(session, Permission::ViewReports)?;
        Ok(self.sales.sales_report(now, self.config.low_stock_threshold).await?)
    }

    // --- Products ---

    pub async fn create_product(&self, session: &Session, params: ProductCreate) -> Result<Product, ClinicError> {
        AccessPolicy::authorize(session, Permission::ManageProducts)?;
        Ok(self.inventory.create_product(params).await?)
    }

    pub async fn update_product(
        &self,
        session: &Session,
        id: String,
        update: ProductUpdate,
    ) -> Result<Product, ClinicError> {
        AccessPolicy::authorize(session, Permission::ManageProducts)?;
        Ok(self.inventory.update_product(id, update).await?)
    }

    pub async fn delete_product(&self, session: &Session, id: String) -> Result<(), ClinicError> {
        AccessPolicy::authorize(session, Permission::ManageProducts)?;
        Ok(self.inventory.delete_product(id).await?)
    }

    pub async fn get_product(&self, session: &Session, id: String) -> Result<Product, ClinicError> {
        AccessPolicy::authorize(session, Permission::ViewProducts)?;
        Ok(self.inventory.get_product(id).await?)
    }

    pub async fn list_products(&self, session: &Session) -> Result<Vec<Product>, ClinicError> {
        AccessPolicy::authorize(session, Permission::ViewProducts)?;
        Ok(self.inventory.list_products().await?)
    }

    /// Products that can go into a basket.
    pub async fn available_products(&self, session: &Session) -> Result<Vec<Product>, ClinicError> {
        AccessPolicy::authorize(session, Permission::ViewProducts)?;
        Ok(self.inventory.list_available().await?)
    }

    pub async fn low_stock_products(&self, session: &Session) -> Result<Vec<Product>, ClinicError> {
        AccessPolicy::authorize(session, Permission::ViewProducts)?;
        Ok(self.inventory.list_low_stock(self.config.low_stock_threshold).await?)
    }

    // --- Patients ---

    pub async fn register_patient(&self, session: &Session, params: PatientCreate) -> Result<String, ClinicError> {
        AccessPolicy::authorize(session, Permission::ManagePatients)?;
        Ok(self.patients.register_patient(params).await?)
    }

    pub async fn update_patient(
        &self,
        session: &Session,
        id: String,
        update: PatientUpdate,
    ) -> Result<Patient, ClinicError> {
        AccessPolicy::authorize(session, Permission::ManagePatients)?;
        Ok(self.patients.update_patient(id, update).await?)
    }

    /// Removes the patient record. Recorded sales keep the patient id.
    pub async fn delete_patient(&self, session: &Session, id: String) -> Result<(), ClinicError> {
        AccessPolicy::authorize(session, Permission::ManagePatients)?;
        Ok(self.patients.delete_patient(id).await?)
    }

    pub async fn get_patient(&self, session: &Session, id: String) -> Result<Option<Patient>, ClinicError> {
        AccessPolicy::authorize(session, Permission::ManagePatients)?;
        Ok(self.patients.get_patient(id).await?)
    }

    pub async fn list_patients(&self, session: &Session) -> Result<Vec<Patient>, ClinicError> {
        AccessPolicy::authorize(session, Permission::ManagePatients)?;
        Ok(self.patients.list_patients_by_name().await?)
    }

    // --- Visits & prescriptions ---

    /// Records a visit with the session user as the doctor.
    pub async fn record_visit(
        &self,
        session: &Session,
        patient_id: PatientId,
        visit_date: DateTime<Utc>,
        notes: Option<String>,
    ) -> Result<String, ClinicError> {
        AccessPolicy::authorize(session, Permission::RecordVisits)?;
        let params = VisitCreate { patient_id, doctor_id: session.user_id.clone(), visit_date, notes };
        Ok(self.visits.record_visit(params).await?)
    }

    pub async fn my_visits(&self, session: &Session) -> Result<Vec<PatientVisit>, ClinicError> {
        AccessPolicy::authorize(session, Permission::RecordVisits)?;
        Ok(self.visits.visits_for_doctor(session.user_id.clone()).await?)
    }

    pub async fn get_visit(&self, session: &Session, id: String) -> Result<Option<PatientVisit>, ClinicError> {
        AccessPolicy::authorize(session, Permission::RecordVisits)?;
        Ok(self.visits.get_visit(id).await?)
    }

    pub async fn update_visit(
        &self,
        session: &Session,
        id: String,
        update: VisitUpdate,
    ) -> Result<PatientVisit, ClinicError> {
        AccessPolicy::authorize(session, Permission::RecordVisits)?;
        Ok(self.visits.update_visit(id, update).await?)
    }

    pub async fn prescribe(&self, session: &Session, params: PrescriptionCreate) -> Result<String, ClinicError> {
        AccessPolicy::authorize(session, Permission::ManagePrescriptions)?;
        Ok(self.prescriptions.prescribe(params).await?)
    }

    pub async fn set_prescription_redeemed(
        &self,
        session: &Session,
        id: String,
        redeemed: bool,
    ) -> Result<bool, ClinicError> {
        AccessPolicy::authorize(session, Permission::ManagePrescriptions)?;
        Ok(self.prescriptions.set_redeemed(id, redeemed).await?)
    }

    pub async fn delete_prescription(&self, session: &Session, id: String) -> Result<(), ClinicError> {
        AccessPolicy::authorize(session, Permission::ManagePrescriptions)?;
        Ok(self.prescriptions.delete_prescription(id).await?)
    }

    pub async fn prescriptions_for_visit(
        &self,
        session: &Session,
        visit_id: String,
    ) -> Result<Vec<Prescription>, ClinicError> {
        AccessPolicy::authorize(session, Permission::ManagePrescriptions)?;
        Ok(self.prescriptions.prescriptions_for_visit(visit_id).await?)
    }

    // --- Schedules & staff ---

    pub async fn add_schedule(&self, session: &Session, params: ScheduleCreate) -> Result<String, ClinicError> {
        AccessPolicy::authorize(session, Permission::ManageSchedules)?;
        Ok(self.schedules.add_schedule(params).await?)
    }

    pub async fn update_schedule(
        &self,
        session: &Session,
        id: String,
        update: ScheduleUpdate,
    ) -> Result<DoctorSchedule, ClinicError> {
        AccessPolicy::authorize(session, Permission::ManageSchedules)?;
        Ok(self.schedules.update_schedule(id, update).await?)
    }

    pub async fn schedules_for_day(&self, session: &Session, day: Weekday) -> Result<Vec<DoctorSchedule>, ClinicError> {
        AccessPolicy::authorize(session, Permission::ViewSchedules)?;
        Ok(self.schedules.schedules_for_day(day).await?)
    }

    pub async fn create_user(&self, session: &Session, params: UserCreate) -> Result<String, ClinicError> {
        AccessPolicy::authorize(session, Permission::ManageUsers)?;
        Ok(self.users.create_user(params).await?)
    }

    /// Email stays unique across staff after the change.
    pub async fn update_user(&self, session: &Session, id: String, update: UserUpdate) -> Result<User, ClinicError> {
        AccessPolicy::authorize(session, Permission::ManageUsers)?;
        Ok(self.users.update_user(id, update).await?)
    }

    pub async fn list_users(&self, session: &Session) -> Result<Vec<User>, ClinicError> {
        AccessPolicy::authorize(session, Permission::ManageUsers)?;
        Ok(self.users.list_users().await?)
    }
}

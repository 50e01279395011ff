//! Cloneable handles to the actors. Orchestration across actors lives here.

#[macro_use]
mod macros;

mod inventory_client;
mod patient_client;
mod prescription_client;
mod sales_client;
mod schedule_client;
mod user_client;
mod visit_client;

pub use inventory_client::InventoryClient;
pub use patient_client::PatientClient;
pub use prescription_client::PrescriptionClient;
pub use sales_client::SalesClient;
pub use schedule_client::ScheduleClient;
pub use user_client::UserClient;
pub use visit_client::VisitClient;

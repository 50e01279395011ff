//! Business domain entities. Pure data structures with no actor-specific concerns.

pub mod money;
pub mod user;
pub mod product;
pub mod patient;
pub mod sale;
pub mod visit;
pub mod prescription;
pub mod schedule;

pub use money::*;
pub use user::*;
pub use product::*;
pub use patient::*;
pub use sale::*;
pub use visit::*;
pub use prescription::*;
pub use schedule::*;

pub type UserId = String;
pub type ProductId = String;
pub type PatientId = String;
pub type SaleId = String;
pub type VisitId = String;
pub type PrescriptionId = String;
pub type ScheduleId = String;

/// Checks a required text field against a maximum length in characters.
pub(crate) fn require_text(field: &str, value: &str, max_len: Option<usize>) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err(format!("{} is required.", field));
    }
    if let Some(max) = max_len {
        if value.chars().count() > max {
            return Err(format!("{} may not be longer than {} characters.", field, max));
        }
    }
    Ok(())
}

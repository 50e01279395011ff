use chrono::{NaiveDate, NaiveTime, Weekday};
use rust_decimal::Decimal;
use tracing::{info, instrument};
use crate::access::Role;
use crate::domain::{Gender, PatientCreate, ProductCreate, ScheduleCreate, UserCreate};
use super::{ClinicError, ClinicSystem};

/// Ids of the records created by [`ClinicSystem::seed`].
#[derive(Debug, Clone)]
pub struct SeedSummary {
    pub admin_id: String,
    pub doctor_id: String,
    pub receptionist_id: String,
    pub product_ids: Vec<String>,
    pub patient_ids: Vec<String>,
    pub schedule_ids: Vec<String>,
}

const PRODUCTS: [(&str, u32, &str, i64, i64); 8] = [
    ("Paracetamol 500mg", 100, "tablet", 500, 1000),
    ("Amoxicillin 250mg", 50, "capsule", 1500, 2500),
    ("Ibuprofen 400mg", 75, "tablet", 800, 1500),
    ("Vitamin C 1000mg", 5, "tablet", 2000, 3500),
    ("Cough Syrup", 30, "bottle", 15000, 25000),
    ("Antiseptic", 20, "bottle", 8000, 15000),
    ("Bandage", 40, "roll", 5000, 10000),
    ("Aspirin 100mg", 60, "tablet", 600, 1200),
];

const PATIENTS: [(&str, &str, (i32, u32, u32), Gender, &str, &str); 5] = [
    ("John Doe", "1234567890123456", (1985, 3, 15), Gender::Male, "Jl. Merdeka No. 123, Jakarta", "081234567890"),
    ("Jane Smith", "1234567890123457", (1990, 7, 22), Gender::Female, "Jl. Sudirman No. 456, Jakarta", "081234567891"),
    ("Robert Wilson", "1234567890123458", (1978, 11, 8), Gender::Male, "Jl. Gatot Subroto No. 789, Jakarta", "081234567892"),
    ("Maria Garcia", "1234567890123459", (1992, 5, 14), Gender::Female, "Jl. Thamrin No. 321, Jakarta", "081234567893"),
    ("Ahmad Sari", "1234567890123460", (1987, 9, 30), Gender::Male, "Jl. Kuningan No. 654, Jakarta", "081234567894"),
];

const CLINIC_DAYS: [Weekday; 5] = [Weekday::Mon, Weekday::Tue, Weekday::Wed, Weekday::Thu, Weekday::Fri];

impl ClinicSystem {
    /// Loads the demo staff, catalog, patients and the doctor's weekday schedule.
    /// Products are skipped when the catalog is already populated from a snapshot.
    #[instrument(skip(self))]
    pub async fn seed(&self) -> Result<SeedSummary, ClinicError> {
        let admin_id = self.users.create_user(staff("Admin User", "admin@mediclinic.com", Role::Admin)).await?;
        let doctor_id =
            self.users.create_user(staff("Dr. Sarah Johnson", "doctor@mediclinic.com", Role::Doctor)).await?;
        let receptionist_id = self
            .users
            .create_user(staff("Maria Lopez", "receptionist@mediclinic.com", Role::Receptionist))
            .await?;

        let mut product_ids = Vec::new();
        if self.inventory.list_products().await?.is_empty() {
            for (name, stock, unit, purchase, selling) in PRODUCTS {
                let params = ProductCreate {
                    name: name.to_string(),
                    stock,
                    unit: unit.to_string(),
                    purchase_price: Decimal::new(purchase, 0),
                    selling_price: Decimal::new(selling, 0),
                };
                product_ids.push(self.inventory.create_product(params).await?.id);
            }
        }

        let mut patient_ids = Vec::new();
        for (full_name, nik, (year, month, day), gender, address, phone) in PATIENTS {
            let date_of_birth = NaiveDate::from_ymd_opt(year, month, day)
                .ok_or_else(|| ClinicError::Seed(format!("invalid date of birth for {}", full_name)))?;
            let params = PatientCreate {
                full_name: full_name.to_string(),
                nik: nik.to_string(),
                date_of_birth,
                gender,
                address: address.to_string(),
                phone_number: phone.to_string(),
            };
            patient_ids.push(self.patients.register_patient(params).await?);
        }

        let start_time = NaiveTime::from_hms_opt(8, 0, 0).ok_or_else(|| ClinicError::Seed("start time".into()))?;
        let end_time = NaiveTime::from_hms_opt(12, 0, 0).ok_or_else(|| ClinicError::Seed("end time".into()))?;
        let mut schedule_ids = Vec::new();
        for day in CLINIC_DAYS {
            let params = ScheduleCreate {
                doctor_id: doctor_id.clone(),
                day,
                start_time,
                end_time,
                specialization: "General Medicine".to_string(),
            };
            schedule_ids.push(self.schedules.add_schedule(params).await?);
        }

        info!(
            products = product_ids.len(),
            patients = patient_ids.len(),
            schedules = schedule_ids.len(),
            "Seed data loaded"
        );
        Ok(SeedSummary { admin_id, doctor_id, receptionist_id, product_ids, patient_ids, schedule_ids })
    }
}

fn staff(name: &str, email: &str, role: Role) -> UserCreate {
    UserCreate { name: name.to_string(), email: email.to_string(), role }
}

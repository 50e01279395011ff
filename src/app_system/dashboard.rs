use std::collections::HashSet;
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::Serialize;
use tracing::instrument;
use crate::access::{Role, Session};
use crate::domain::{DoctorSchedule, Patient, PatientVisit};
use crate::inventory::{SalesReport, SalesSummary, TopProduct};
use super::{ClinicError, ClinicSystem};

pub const RECENT_LIMIT: usize = 5;

/// Role-specific landing data.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum Dashboard {
    Admin(AdminDashboard),
    Doctor(DoctorDashboard),
    Receptionist(ReceptionistDashboard),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdminDashboard {
    pub product_count: usize,
    pub user_count: usize,
    pub low_stock_count: usize,
    pub sales: SalesSummary,
    pub top_products: Vec<TopProduct>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DoctorDashboard {
    pub patients_seen: usize,
    pub todays_visits: usize,
    pub recent_visits: Vec<PatientVisit>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReceptionistDashboard {
    pub patient_count: usize,
    pub todays_visits: usize,
    pub todays_schedules: Vec<DoctorSchedule>,
    pub recent_patients: Vec<Patient>,
}

impl AdminDashboard {
    fn from_report(report: SalesReport, user_count: usize) -> Self {
        Self {
            product_count: report.product_count,
            user_count,
            low_stock_count: report.low_stock_count,
            sales: report.summary,
            top_products: report.top_products,
        }
    }
}

impl DoctorDashboard {
    /// `visits` must already be limited to one doctor.
    pub fn from_visits(mut visits: Vec<PatientVisit>, today: NaiveDate) -> Self {
        let patients_seen = visits.iter().map(|v| v.patient_id.as_str()).collect::<HashSet<_>>().len();
        let todays_visits = visits.iter().filter(|v| v.visit_date.date_naive() == today).count();
        visits.sort_by(|a, b| b.visit_date.cmp(&a.visit_date));
        visits.truncate(RECENT_LIMIT);
        Self { patients_seen, todays_visits, recent_visits: visits }
    }
}

impl ReceptionistDashboard {
    /// `recent_patients` is expected newest first; `todays_schedules` already filtered by weekday.
    pub fn new(
        patient_count: usize,
        visits: &[PatientVisit],
        todays_schedules: Vec<DoctorSchedule>,
        mut recent_patients: Vec<Patient>,
        today: NaiveDate,
    ) -> Self {
        recent_patients.truncate(RECENT_LIMIT);
        Self {
            patient_count,
            todays_visits: visits.iter().filter(|v| v.visit_date.date_naive() == today).count(),
            todays_schedules,
            recent_patients,
        }
    }
}

impl ClinicSystem {
    /// Dashboard for the session's role as of `now`. Dates are UTC.
    #[instrument(skip(self, session), fields(user_id = %session.user_id, role = %session.role))]
    pub async fn dashboard(&self, session: &Session, now: DateTime<Utc>) -> Result<Dashboard, ClinicError> {
        let today = now.date_naive();
        let dashboard = match session.role {
            Role::Admin => {
                let report = self.sales_report(session, now).await?;
                let user_count = self.users.list_users().await?.len();
                Dashboard::Admin(AdminDashboard::from_report(report, user_count))
            }
            Role::Doctor => {
                let visits = self.visits.visits_for_doctor(session.user_id.clone()).await?;
                Dashboard::Doctor(DoctorDashboard::from_visits(visits, today))
            }
            Role::Receptionist => {
                let patients = self.patients.recent_patients(usize::MAX).await?;
                let visits = self.visits.list_visits().await?;
                let schedules = self.schedules.schedules_for_day(today.weekday()).await?;
                Dashboard::Receptionist(ReceptionistDashboard::new(
                    patients.len(),
                    &visits,
                    schedules,
                    patients,
                    today,
                ))
            }
        };
        Ok(dashboard)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn visit(id: u32, patient: &str, day: u32) -> PatientVisit {
        PatientVisit {
            id: format!("visit_{}", id),
            patient_id: patient.into(),
            doctor_id: "user_2".into(),
            visit_date: Utc.with_ymd_and_hms(2024, 6, day, 9, 0, 0).unwrap(),
            notes: None,
        }
    }

    #[test]
    fn doctor_dashboard_counts_distinct_patients() {
        let visits = vec![
            visit(1, "patient_1", 3),
            visit(2, "patient_2", 10),
            visit(3, "patient_1", 12),
            visit(4, "patient_3", 12),
            visit(5, "patient_1", 1),
            visit(6, "patient_2", 11),
        ];
        let today = NaiveDate::from_ymd_opt(2024, 6, 12).unwrap();
        let dashboard = DoctorDashboard::from_visits(visits, today);

        assert_eq!(dashboard.patients_seen, 3);
        assert_eq!(dashboard.todays_visits, 2);
        assert_eq!(dashboard.recent_visits.len(), RECENT_LIMIT);
        assert_eq!(dashboard.recent_visits[0].visit_date.date_naive(), today);
        assert!(dashboard.recent_visits.iter().all(|v| v.id != "visit_5"));
    }

    #[test]
    fn dashboard_serializes_with_role_tag() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 12).unwrap();
        let dashboard = Dashboard::Doctor(DoctorDashboard::from_visits(vec![], today));
        let json = serde_json::to_value(&dashboard).unwrap();
        assert_eq!(json["role"], "doctor");
        assert_eq!(json["patients_seen"], 0);
    }
}

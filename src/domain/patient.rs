use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use super::{require_text, PatientId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gender::Male => write!(f, "male"),
            Gender::Female => write!(f, "female"),
        }
    }
}

impl FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "male" => Ok(Gender::Male),
            "female" => Ok(Gender::Female),
            other => Err(format!("Gender must be male or female, got '{}'.", other)),
        }
    }
}

/// A registered clinic patient, identified nationally by `nik`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patient {
    pub id: PatientId,
    pub full_name: String,
    pub nik: String,
    pub date_of_birth: NaiveDate,
    pub gender: Gender,
    pub address: String,
    pub phone_number: String,
    pub registered_at: DateTime<Utc>,
}

/// Payload for registering a patient.
#[derive(Debug, Clone)]
pub struct PatientCreate {
    pub full_name: String,
    pub nik: String,
    pub date_of_birth: NaiveDate,
    pub gender: Gender,
    pub address: String,
    pub phone_number: String,
}

/// Demographic fields a patient record allows to change.
#[derive(Debug, Clone, Default)]
pub struct PatientUpdate {
    pub full_name: Option<String>,
    pub nik: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<Gender>,
    pub address: Option<String>,
    pub phone_number: Option<String>,
}

impl Patient {
    pub fn validate(&self, today: NaiveDate) -> Result<(), String> {
        require_text("Full name", &self.full_name, Some(255))?;
        require_text("NIK", &self.nik, Some(20))?;
        if self.date_of_birth >= today {
            return Err("Date of birth must be in the past.".to_string());
        }
        require_text("Address", &self.address, None)?;
        require_text("Phone number", &self.phone_number, Some(20))?;
        Ok(())
    }

    pub fn apply(&mut self, update: PatientUpdate) {
        if let Some(full_name) = update.full_name {
            self.full_name = full_name;
        }
        if let Some(nik) = update.nik {
            self.nik = nik;
        }
        if let Some(date_of_birth) = update.date_of_birth {
            self.date_of_birth = date_of_birth;
        }
        if let Some(gender) = update.gender {
            self.gender = gender;
        }
        if let Some(address) = update.address {
            self.address = address;
        }
        if let Some(phone_number) = update.phone_number {
            self.phone_number = phone_number;
        }
    }

    /// Age in completed years on `on`.
    pub fn age_on(&self, on: NaiveDate) -> u32 {
        let mut years = on.year() - self.date_of_birth.year();
        if (on.month(), on.day()) < (self.date_of_birth.month(), self.date_of_birth.day()) {
            years -= 1;
        }
        years.max(0) as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn patient() -> Patient {
        Patient {
            id: "patient_1".into(),
            full_name: "John Doe".into(),
            nik: "1234567890123456".into(),
            date_of_birth: NaiveDate::from_ymd_opt(1985, 3, 15).unwrap(),
            gender: Gender::Male,
            address: "Jl. Merdeka No. 123, Jakarta".into(),
            phone_number: "081234567890".into(),
            registered_at: Utc::now(),
        }
    }

    #[test]
    fn age_counts_completed_years() {
        let p = patient();
        assert_eq!(p.age_on(NaiveDate::from_ymd_opt(2024, 3, 14).unwrap()), 38);
        assert_eq!(p.age_on(NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()), 39);
    }

    #[test]
    fn validation_rules() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        assert!(patient().validate(today).is_ok());

        let mut unborn = patient();
        unborn.date_of_birth = today;
        assert_eq!(unborn.validate(today), Err("Date of birth must be in the past.".to_string()));

        let mut long_nik = patient();
        long_nik.nik = "1".repeat(21);
        assert!(long_nik.validate(today).is_err());

        let mut no_phone = patient();
        no_phone.phone_number = String::new();
        assert_eq!(no_phone.validate(today), Err("Phone number is required.".to_string()));
    }

    #[test]
    fn gender_parses_case_insensitively() {
        assert_eq!("Female".parse::<Gender>(), Ok(Gender::Female));
        assert!("other".parse::<Gender>().is_err());
    }
}

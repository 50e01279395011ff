//! Patient ids a sale may reference.
//!
//! The patient actor owns patient records; the inventory service keeps this roster so
//! the existence check runs in the same serialized scope as the commit that relies on it.

use std::collections::BTreeSet;
use crate::domain::PatientId;

/// Read access to the roster for a transaction scope.
pub trait PatientDirectory {
    fn has_patient(&self, id: &str) -> bool;
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PatientRoster {
    ids: BTreeSet<PatientId>,
}

impl PatientRoster {
    /// Returns false when the id was already enrolled.
    pub fn enroll(&mut self, id: PatientId) -> bool {
        self.ids.insert(id)
    }

    /// Returns false when the id was not enrolled.
    pub fn withdraw(&mut self, id: &str) -> bool {
        self.ids.remove(id)
    }
}

impl PatientDirectory for PatientRoster {
    fn has_patient(&self, id: &str) -> bool {
        self.ids.contains(id)
    }
}

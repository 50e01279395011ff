use serde::{Deserialize, Serialize};
use super::{require_text, PrescriptionId, ProductId, VisitId};

/// A product prescribed during a visit. Redemption does not touch stock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prescription {
    pub id: PrescriptionId,
    pub visit_id: VisitId,
    pub product_id: ProductId,
    pub dosage: String,
    pub quantity: u32,
    pub usage_instructions: String,
    pub redeemed: bool,
}

#[derive(Debug, Clone)]
pub struct PrescriptionCreate {
    pub visit_id: VisitId,
    pub product_id: ProductId,
    pub dosage: String,
    pub quantity: u32,
    pub usage_instructions: String,
}

impl Prescription {
    pub fn validate(&self) -> Result<(), String> {
        require_text("Dosage", &self.dosage, Some(255))?;
        if self.quantity < 1 {
            return Err("Quantity must be at least 1.".to_string());
        }
        require_text("Usage instructions", &self.usage_instructions, None)?;
        Ok(())
    }
}

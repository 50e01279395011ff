use std::convert::Infallible;
use crate::actor_framework::ActorEntity;
use crate::domain::{Prescription, PrescriptionCreate};
use super::actions::{PrescriptionAction, PrescriptionActionResult};

impl ActorEntity for Prescription {
    type Id = String;
    type CreateParams = PrescriptionCreate;
    // Only the redeemed flag changes, through `SetRedeemed`.
    type UpdateParams = Infallible;
    type Action = PrescriptionAction;
    type ActionResult = PrescriptionActionResult;

    fn id(&self) -> &String {
        &self.id
    }

    /// New prescriptions start unredeemed.
    fn from_create_params(id: String, params: PrescriptionCreate) -> Result<Self, String> {
        let prescription = Self {
            id,
            visit_id: params.visit_id,
            product_id: params.product_id,
            dosage: params.dosage,
            quantity: params.quantity,
            usage_instructions: params.usage_instructions,
            redeemed: false,
        };
        prescription.validate()?;
        Ok(prescription)
    }

    fn on_update(&mut self, update: Infallible) -> Result<(), String> {
        match update {}
    }

    fn handle_action(&mut self, action: PrescriptionAction) -> Result<PrescriptionActionResult, String> {
        match action {
            PrescriptionAction::SetRedeemed(redeemed) => {
                let was_redeemed = self.redeemed;
                self.redeemed = redeemed;
                Ok(PrescriptionActionResult::SetRedeemed { was_redeemed })
            }
        }
    }
}

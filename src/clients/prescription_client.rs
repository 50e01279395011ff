use tracing::{debug, info, instrument, warn};
use crate::actor_framework::{id_order, ResourceClient};
use crate::clients::{InventoryClient, VisitClient};
use crate::domain::{Prescription, PrescriptionCreate};
use crate::inventory::CatalogError;
use crate::prescription_actor::{PrescriptionAction, PrescriptionActionResult, PrescriptionError};

/// Client for the Prescription actor. A prescription needs an existing visit and
/// catalog product; writing one never touches stock.
#[derive(Clone)]
pub struct PrescriptionClient {
    inner: ResourceClient<Prescription>,
    visits: VisitClient,
    inventory: InventoryClient,
}

impl_client_methods!(PrescriptionClient, Prescription, PrescriptionError, prescription);

impl PrescriptionClient {
    pub fn new(inner: ResourceClient<Prescription>, visits: VisitClient, inventory: InventoryClient) -> Self {
        Self { inner, visits, inventory }
    }

    #[instrument(skip(self, params), fields(visit_id = %params.visit_id, product_id = %params.product_id))]
    pub async fn prescribe(&self, params: PrescriptionCreate) -> Result<String, PrescriptionError> {
        match self.visits.get_visit(params.visit_id.clone()).await {
            Ok(Some(_)) => debug!("Visit validation successful"),
            Ok(None) => {
                warn!("Visit not found");
                return Err(PrescriptionError::VisitNotFound(params.visit_id));
            }
            Err(e) => return Err(PrescriptionError::ActorCommunicationError(e.to_string())),
        }

        match self.inventory.get_product(params.product_id.clone()).await {
            Ok(product) => debug!(product_name = %product.name, "Product validation successful"),
            Err(CatalogError::NotFound(id)) => {
                warn!("Product not found");
                return Err(PrescriptionError::ProductNotFound(id));
            }
            Err(e) => return Err(PrescriptionError::ActorCommunicationError(e.to_string())),
        }

        let id = self.inner.create(params).await.map_err(PrescriptionError::from)?;
        info!(prescription_id = %id, "Prescription written");
        Ok(id)
    }

    /// Sets the redeemed flag and returns its previous value.
    #[instrument(skip(self))]
    pub async fn set_redeemed(&self, id: String, redeemed: bool) -> Result<bool, PrescriptionError> {
        debug!("Sending request");
        match self
            .inner
            .perform_action(id, PrescriptionAction::SetRedeemed(redeemed))
            .await
            .map_err(PrescriptionError::from)?
        {
            PrescriptionActionResult::SetRedeemed { was_redeemed } => Ok(was_redeemed),
        }
    }

    #[instrument(skip(self))]
    pub async fn prescriptions_for_visit(&self, visit_id: String) -> Result<Vec<Prescription>, PrescriptionError> {
        let mut prescriptions: Vec<Prescription> = self
            .list_prescriptions()
            .await?
            .into_iter()
            .filter(|p| p.visit_id == visit_id)
            .collect();
        prescriptions.sort_by(|a, b| id_order(&a.id, &b.id));
        Ok(prescriptions)
    }
}

mod access;
mod domain;
mod messages;
mod inventory;

mod clients;
mod app_system;

#[cfg(test)]
mod mock_framework;

mod actor_framework;
mod user_actor;
mod patient_actor;
mod visit_actor;
mod prescription_actor;
mod schedule_actor;

use anyhow::Context;
use chrono::Utc;
use tracing::{info, warn, Instrument};
use crate::app_system::{setup_tracing, ClinicConfig, ClinicSystem};
use crate::domain::BasketLine;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ClinicConfig::load().context("loading clinic configuration")?;

    // Setup tracing once for the entire application
    setup_tracing(&config.log_filter);

    info!(?config, "Starting clinic system");
    let system = ClinicSystem::start(config).context("starting clinic system")?;
    let seeded = system.seed().await.context("seeding demo data")?;

    let receptionist = system.login(seeded.receptionist_id.clone()).await?;
    let paracetamol = seeded.product_ids.first().cloned().unwrap_or_else(|| "product_1".to_string());
    let vitamin_c = seeded.product_ids.get(3).cloned().unwrap_or_else(|| "product_4".to_string());

    let span = tracing::info_span!("demo_sale");
    let record = async {
        info!("Selling paracetamol to the first patient");
        system
            .record_sale(&receptionist, seeded.patient_ids.first().cloned(), vec![BasketLine::new(paracetamol, 5)])
            .await
    }
    .instrument(span)
    .await
    .context("recording demo sale")?;
    info!(
        sale_id = %record.transaction.id,
        total_amount = %record.transaction.total_amount,
        items = record.items.len(),
        "Sale recorded"
    );

    let span = tracing::info_span!("rejected_sale");
    let rejected = async {
        info!("Trying to sell more vitamin C than is in stock");
        system.record_sale(&receptionist, None, vec![BasketLine::new(vitamin_c, 10)]).await
    }
    .instrument(span)
    .await;
    match rejected {
        Ok(record) => warn!(sale_id = %record.transaction.id, "Oversell unexpectedly succeeded"),
        Err(e) => info!(error = %e, "Sale rejected as expected"),
    }

    let admin = system.login(seeded.admin_id.clone()).await?;
    let dashboard = system.dashboard(&admin, Utc::now()).await?;
    println!("{}", serde_json::to_string_pretty(&dashboard)?);

    // Shutdown system gracefully
    system.shutdown().await?;

    info!("Application completed successfully");
    Ok(())
}

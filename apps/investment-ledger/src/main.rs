//! Investment Ledger Binary
//!
//! Runs a demonstration pass over the ledger: creates a share class, takes
//! deposit requests, approves and issues an epoch, and claims the resulting
//! shares. All adapters are in-memory.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin investment-ledger
//! ```
//!
//! # Configuration
//!
//! An optional `config.toml` in the working directory, overlaid by
//! `LEDGER_*` environment variables (e.g. `LEDGER_LOGGING__LEVEL=debug`).

use rust_decimal::Decimal;

use investment_ledger::domain::investment::value_objects::EpochId;
use investment_ledger::domain::share_class::value_objects::Salt;
use investment_ledger::infrastructure::config::{InMemoryContainer, Settings};
use investment_ledger::{AssetAmount, AssetId, AtomAmount, InvestorId, PoolId, Price};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load(None)?;
    init_tracing(&settings.logging.level);

    tracing::info!("Starting investment ledger demo");

    let container = InMemoryContainer::in_memory();

    let pool = PoolId::new(&settings.demo.pool_id);
    let asset = AssetId::new(&settings.demo.asset_id);
    container
        .registry()
        .register_asset(asset.clone(), settings.demo.asset_decimals);
    container
        .registry()
        .register_pool(pool.clone(), settings.demo.pool_decimals);

    let manage = container.manage_share_classes_use_case();
    let share_class = manage
        .create_share_class(pool, "Senior Tranche", "SNR", Salt::from_seed(1)?)
        .await?;
    let sc_id = share_class.id().clone();
    tracing::info!(share_class_id = %sc_id, "share class created");

    // One deposit epoch: request, approve at par, issue at NAV 1.05, claim.
    let investor = InvestorId::new("investor-1");
    let amount = AssetAmount::new(1_000_000_000);

    let submit = container.submit_requests_use_case();
    submit
        .request_deposit(&sc_id, &asset, &investor, amount)
        .await?;
    tracing::info!(investor = %investor, amount = amount.atoms(), "deposit requested");

    let approve = container.approve_epochs_use_case();
    let remainder = approve
        .approve_deposits(&sc_id, &asset, EpochId::FIRST, amount, Price::new(Decimal::ONE))
        .await?;
    tracing::info!(remainder = remainder.atoms(), "deposit epoch approved");

    let process = container.process_epochs_use_case();
    let nav = Price::new(Decimal::new(105, 2));
    let issuance = process
        .issue_shares(&sc_id, &asset, EpochId::FIRST, nav)
        .await?;
    tracing::info!(issued_shares = issuance.issued_shares.atoms(), "shares issued");

    let claims = container.claim_orders_use_case();
    let claim = claims.claim_deposit(&sc_id, &asset, &investor).await?;
    tracing::info!(
        payout_shares = claim.payout_shares.atoms(),
        can_claim_again = claim.can_claim_again,
        "deposit claimed"
    );

    let queries = container.queries_use_case();
    let view = queries.share_class(&sc_id).await?;
    tracing::info!(
        total_issuance = view.total_issuance.atoms(),
        open_journal_scopes = container.journal().open_scopes(),
        "demo complete"
    );

    Ok(())
}

/// Initialize the tracing subscriber from the configured filter directive.
fn init_tracing(level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_new(level)
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
}

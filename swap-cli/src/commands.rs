//! The handlers of each subcommand

use std::{str::FromStr, sync::Arc};

use alloy::signers::local::PrivateKeySigner;
use swap_client::{
    assets::format_base_units,
    countdown::format_duration,
    notifications::{BalanceRefresh, TracingNotifier},
    settlement::SettlementId,
    status::SwapPhase,
    thornode::{quote::Quote, ThornodeClient},
    wallet::provider::ProviderWallet,
    SwapClientConfig, SwapClientError, SwapOrchestrator, SwapSession,
};
use tokio::sync::broadcast::error::RecvError;
use tracing::{info, warn};

use crate::cli::{QuoteArgs, SwapArgs, TrackArgs};

/// Fetch and print a quote
pub async fn quote(config: &SwapClientConfig, args: &QuoteArgs) -> Result<(), SwapClientError> {
    let client = ThornodeClient::new(config)?;
    let quote = client.get_swap_quote(&args.to_request()).await?;
    log_quote(&quote);
    Ok(())
}

/// Quote and execute a swap, then follow it to settlement
pub async fn swap(config: SwapClientConfig, args: &SwapArgs) -> Result<(), SwapClientError> {
    let signer =
        PrivateKeySigner::from_str(&args.private_key).map_err(SwapClientError::validation)?;
    let wallet = ProviderWallet::new(&args.rpc_url, Some(signer))?;

    let balance_refresh = BalanceRefresh::new();
    spawn_balance_logger(&balance_refresh);

    let orchestrator = SwapOrchestrator::new(
        config,
        Arc::new(wallet),
        Arc::new(TracingNotifier),
        balance_refresh,
    )?;

    let quote = orchestrator.request_quote(args.quote.to_request()).await?;
    log_quote(&quote);

    let Some(session) = orchestrator.execute_active_swap().await? else {
        return Err(SwapClientError::wallet("no quote or connected wallet to swap with"));
    };
    if let Some(receipt) = session.receipt() {
        info!(
            block = ?receipt.block_number,
            gas_used = receipt.gas_used,
            "deposit confirmed: {:#x}",
            receipt.transaction_hash
        );
    }

    follow(session).await
}

/// Follow an existing settlement
pub async fn track(config: &SwapClientConfig, args: &TrackArgs) -> Result<(), SwapClientError> {
    let settlement_id = SettlementId::from_str(&args.id)?;
    let session = SwapSession::track(
        ThornodeClient::new(config)?,
        settlement_id,
        config.poll_interval,
        args.estimated_seconds,
        Arc::new(TracingNotifier),
    );

    follow(session).await
}

/// Print the inbound addresses of every chain
pub async fn inbound(config: &SwapClientConfig) -> Result<(), SwapClientError> {
    let client = ThornodeClient::new(config)?;
    for inbound in client.get_inbound_addresses().await? {
        let router = inbound.router.as_deref().unwrap_or("-");
        if inbound.is_trading_halted() {
            warn!("{}: vault {} router {router} (halted)", inbound.chain, inbound.address);
        } else {
            info!("{}: vault {} router {router}", inbound.chain, inbound.address);
        }
    }

    Ok(())
}

// -----------
// | Helpers |
// -----------

/// Log the details of a quote
fn log_quote(quote: &Quote) {
    info!(
        "quote: {} {} for {} {} (minimum {}), estimated time {}",
        format_base_units(quote.input_amount),
        quote.from_asset,
        format_base_units(quote.expected_amount_out),
        quote.to_asset,
        format_base_units(quote.min_amount_out),
        format_duration(quote.total_swap_seconds),
    );
    info!("memo: {}", quote.memo);

    if let Some(total) = quote.fees.as_ref().and_then(|f| f.total.as_deref()) {
        info!("total fees: {total}");
    }
    if let Some(min) = quote.recommended_min_amount_in {
        info!("recommended minimum input: {}", format_base_units(min));
    }
    if let Some(warning) = &quote.warning {
        warn!("{warning}");
    }
}

/// Log every balance refresh request
fn spawn_balance_logger(balance_refresh: &BalanceRefresh) {
    let mut requests = balance_refresh.subscribe();
    tokio::spawn(async move {
        loop {
            match requests.recv().await {
                Ok(()) | Err(RecvError::Lagged(_)) => info!("wallet balances changed"),
                Err(RecvError::Closed) => break,
            }
        }
    });
}

/// Log phase changes of a session until it settles
async fn follow(session: SwapSession) -> Result<(), SwapClientError> {
    info!("tracking {}", session.tracker_url());

    let mut updates = session.updates();
    let mut last_phase: Option<SwapPhase> = None;
    let mut last_streaming = None;
    loop {
        let update = updates.borrow_and_update().clone();
        if let Some(e) = &update.error {
            warn!("status update failed: {e}");
        }

        if last_phase != Some(update.phase) {
            let remaining = format_duration(session.remaining_seconds());
            info!(remaining = %remaining, "{}", update.phase);
            last_phase = Some(update.phase);
        }

        let streaming = update.status.as_ref().and_then(|s| s.streaming_progress());
        if let Some((count, quantity)) = streaming.filter(|_| streaming != last_streaming) {
            info!("streaming swap {count}/{quantity}");
        }
        last_streaming = streaming;

        if update.completed || updates.changed().await.is_err() {
            break;
        }
    }

    session.settle().await.map(|_| ())
}

//! The swap orchestrator
//!
//! Owns the active quote and sequences a swap: vault resolution, approval,
//! deposit and settlement tracking. Each attempt runs its steps strictly in
//! order; once the deposit hash is known, tracking continues in the
//! background through a [`SwapSession`]

use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::Duration,
};

use alloy_primitives::{Address, TxHash, U256};
use chrono::Utc;
use tokio::{
    sync::{watch, RwLock},
    task::JoinHandle,
};
use tracing::{error, info, instrument, warn};

use crate::{
    approval::{ApprovalManager, ApprovalOutcome, ApprovalRequest},
    assets::{convert_decimals, SupportedAsset, THORCHAIN_DECIMALS},
    config::SwapClientConfig,
    countdown::Countdown,
    deposit::{DepositEvent, DepositExecutor, TransactionParams},
    error::SwapClientError,
    notifications::{BalanceRefresh, Notification, Notifier},
    poller::{self, PollUpdate, PollerHandle, StatusPoller},
    settlement::SettlementId,
    thornode::{
        quote::{Quote, QuoteRequest},
        ThornodeClient,
    },
    wallet::{TxReceipt, WalletClient},
};

// -----------
// | Session |
// -----------

/// A submitted swap being tracked to settlement
///
/// Dropping the session stops its poller and countdown
#[derive(Debug)]
pub struct SwapSession {
    /// The settlement being tracked
    settlement_id: SettlementId,
    /// The deposit receipt, absent when tracking an existing settlement
    receipt: Option<TxReceipt>,
    /// The poller's updates
    updates: watch::Receiver<PollUpdate>,
    /// The countdown's remaining seconds
    remaining: watch::Receiver<u64>,
    /// The task owning the poller and countdown
    completion_task: JoinHandle<()>,
}

impl SwapSession {
    /// Start tracking with a running poller and countdown
    fn start(
        settlement_id: SettlementId,
        receipt: Option<TxReceipt>,
        poller: PollerHandle,
        countdown: Countdown,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let updates = poller.subscribe();
        let remaining = countdown.subscribe();
        let completion_task =
            tokio::spawn(watch_completion(settlement_id.clone(), poller, countdown, notifier));

        Self { settlement_id, receipt, updates, remaining, completion_task }
    }

    /// Track an existing settlement with a fresh poller and countdown
    pub fn track(
        client: ThornodeClient,
        settlement_id: SettlementId,
        poll_interval: Duration,
        estimated_seconds: u64,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let poller = StatusPoller::new(client, settlement_id.clone(), poll_interval).spawn();
        let countdown = Countdown::start(estimated_seconds);
        Self::start(settlement_id, None, poller, countdown, notifier)
    }

    /// The settlement being tracked
    pub fn settlement_id(&self) -> &SettlementId {
        &self.settlement_id
    }

    /// The deposit transaction's hash, if this session made the deposit
    pub fn tx_hash(&self) -> Option<TxHash> {
        self.receipt.as_ref().map(|r| r.transaction_hash)
    }

    /// The deposit receipt, if this session made the deposit
    pub fn receipt(&self) -> Option<&TxReceipt> {
        self.receipt.as_ref()
    }

    /// The public tracker url
    pub fn tracker_url(&self) -> String {
        self.settlement_id.tracker_url()
    }

    /// Subscribe to status updates
    pub fn updates(&self) -> watch::Receiver<PollUpdate> {
        self.updates.clone()
    }

    /// The latest status update
    pub fn latest(&self) -> PollUpdate {
        self.updates.borrow().clone()
    }

    /// Subscribe to the countdown
    pub fn countdown(&self) -> watch::Receiver<u64> {
        self.remaining.clone()
    }

    /// The remaining estimated seconds
    pub fn remaining_seconds(&self) -> u64 {
        *self.remaining.borrow()
    }

    /// Wait for the settlement to complete
    pub async fn wait_for_completion(&self) -> Result<PollUpdate, SwapClientError> {
        let mut updates = self.updates.clone();
        poller::wait_for_completion(&mut updates).await
    }

    /// Wait for the settlement to complete and for its completion effects to
    /// run
    pub async fn settle(mut self) -> Result<PollUpdate, SwapClientError> {
        let update = self.wait_for_completion().await?;
        if let Err(e) = (&mut self.completion_task).await {
            warn!("completion task for {} failed: {e}", self.settlement_id);
        }

        Ok(update)
    }
}

impl Drop for SwapSession {
    fn drop(&mut self) {
        self.completion_task.abort();
    }
}

/// Run the one-time completion effects once the poller reports completion
async fn watch_completion(
    settlement_id: SettlementId,
    mut poller: PollerHandle,
    countdown: Countdown,
    notifier: Arc<dyn Notifier>,
) {
    match poller.wait_for_completion().await {
        Ok(_) => {
            countdown.stop();
            info!("swap {settlement_id} settled");
            notifier.notify(Notification::success(
                "Swap Completed",
                format!("Your swap has settled: {}", settlement_id.tracker_url()),
            ));
        },
        Err(e) => warn!("stopped tracking {settlement_id}: {e}"),
    }
}

// ----------------
// | Orchestrator |
// ----------------

/// Resets the in-flight flag when a swap attempt ends
struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Sequences swaps from Base into THORChain
pub struct SwapOrchestrator {
    /// The client configuration
    config: SwapClientConfig,
    /// The THORNode client
    thornode: ThornodeClient,
    /// The connected wallet
    wallet: Arc<dyn WalletClient>,
    /// The notification sink
    notifier: Arc<dyn Notifier>,
    /// The balance refresh channel
    balance_refresh: BalanceRefresh,
    /// The single active quote
    active_quote: RwLock<Option<Quote>>,
    /// Whether a swap attempt is in flight
    in_flight: AtomicBool,
}

impl SwapOrchestrator {
    /// Constructor
    pub fn new(
        config: SwapClientConfig,
        wallet: Arc<dyn WalletClient>,
        notifier: Arc<dyn Notifier>,
        balance_refresh: BalanceRefresh,
    ) -> Result<Self, SwapClientError> {
        let thornode = ThornodeClient::new(&config)?;
        Ok(Self {
            config,
            thornode,
            wallet,
            notifier,
            balance_refresh,
            active_quote: RwLock::new(None),
            in_flight: AtomicBool::new(false),
        })
    }

    /// The THORNode client
    pub fn thornode(&self) -> &ThornodeClient {
        &self.thornode
    }

    /// The balance refresh channel
    pub fn balance_refresh(&self) -> &BalanceRefresh {
        &self.balance_refresh
    }

    // --- Quotes --- //

    /// Request a quote, replacing the active one
    ///
    /// The previous quote is invalidated before the request is sent, so a
    /// failed request leaves no quote active
    pub async fn request_quote(&self, request: QuoteRequest) -> Result<Quote, SwapClientError> {
        self.clear_quote().await;
        match self.thornode.get_swap_quote(&request).await {
            Ok(quote) => {
                *self.active_quote.write().await = Some(quote.clone());
                Ok(quote)
            },
            Err(e) => {
                error!("failed to fetch quote: {e}");
                self.notifier.notify(Notification::from_error(&e));
                Err(e)
            },
        }
    }

    /// The active quote
    pub async fn active_quote(&self) -> Option<Quote> {
        self.active_quote.read().await.clone()
    }

    /// Invalidate the active quote
    pub async fn clear_quote(&self) {
        self.active_quote.write().await.take();
    }

    /// Record a change of source asset, invalidating a quote issued for
    /// another asset
    pub async fn select_asset(&self, asset: SupportedAsset) {
        let mut active = self.active_quote.write().await;
        if active.as_ref().is_some_and(|q| q.from_asset != asset) {
            active.take();
        }
    }

    // --- Swaps --- //

    /// Execute the active quote
    pub async fn execute_active_swap(&self) -> Result<Option<SwapSession>, SwapClientError> {
        let quote = self.active_quote().await;
        self.execute_swap(quote.as_ref()).await
    }

    /// Execute a quote
    ///
    /// Returns `Ok(None)` without side effects when there is no quote or no
    /// connected wallet. A second call while one is in flight is rejected
    pub async fn execute_swap(
        &self,
        quote: Option<&Quote>,
    ) -> Result<Option<SwapSession>, SwapClientError> {
        let (Some(quote), Some(sender)) = (quote, self.wallet.address()) else {
            return Ok(None);
        };

        if self.in_flight.swap(true, Ordering::AcqRel) {
            return Err(SwapClientError::validation("a swap is already in progress"));
        }
        let _guard = InFlightGuard(&self.in_flight);

        match self.run_swap(quote, sender).await {
            Ok(session) => Ok(Some(session)),
            Err(e) => {
                error!("swap failed: {e}");
                self.notifier.notify(Notification::from_error(&e));
                Err(e)
            },
        }
    }

    /// Track an existing settlement
    pub fn track(&self, settlement_id: SettlementId, estimated_seconds: u64) -> SwapSession {
        SwapSession::track(
            self.thornode.clone(),
            settlement_id,
            self.config.poll_interval,
            estimated_seconds,
            self.notifier.clone(),
        )
    }

    /// Run the steps of a swap attempt
    #[instrument(skip_all, fields(asset = %quote.from_asset, sender = %sender))]
    async fn run_swap(&self, quote: &Quote, sender: Address) -> Result<SwapSession, SwapClientError> {
        let now = u64::try_from(Utc::now().timestamp()).unwrap_or_default();
        if quote.is_expired(now) {
            return Err(SwapClientError::validation("quote has expired, request a new quote"));
        }

        let metadata = self.thornode.get_chain_metadata(&self.config.chain).await?;

        let asset = quote.from_asset;
        let amount = convert_decimals(quote.input_amount, THORCHAIN_DECIMALS, asset.decimals());
        if amount.is_zero() {
            return Err(SwapClientError::validation("amount must be greater than 0"));
        }

        if !asset.is_native() {
            self.approve(asset.address(), sender, metadata.router, amount).await?;
        }

        self.notifier.notify(Notification::info(
            "Sending Transaction",
            "Please confirm the transaction in your wallet",
        ));

        let params = TransactionParams::new(
            metadata.vault,
            metadata.router,
            asset.address(),
            amount,
            quote.memo.clone(),
            sender,
        );

        let executor = DepositExecutor::new(self.wallet.clone(), &self.config);
        let mut tracking: Option<(SettlementId, PollerHandle, Countdown)> = None;
        let result = executor
            .execute(params, |event| match event {
                DepositEvent::Sending => self.notifier.notify(Notification::info(
                    "Transaction Initiated",
                    "Waiting for the transaction to be broadcast",
                )),
                DepositEvent::TransactionHash(tx_hash) => {
                    tracking = Some(self.on_transaction_hash(tx_hash, quote.total_swap_seconds));
                },
                DepositEvent::Receipt(receipt) => {
                    info!("deposit mined in block {:?}", receipt.block_number);
                },
            })
            .await;

        // A failed deposit drops any poller and countdown it started
        let receipt = result?;
        let (settlement_id, poller, countdown) = tracking
            .ok_or_else(|| SwapClientError::deposit("no transaction hash was observed"))?;

        Ok(SwapSession::start(settlement_id, Some(receipt), poller, countdown, self.notifier.clone()))
    }

    /// Ensure the router's allowance, refreshing balances after a real
    /// approval
    async fn approve(
        &self,
        token: Address,
        owner: Address,
        spender: Address,
        amount: U256,
    ) -> Result<(), SwapClientError> {
        self.notifier.notify(Notification::info(
            "Approval Required",
            "Please approve the token spend in your wallet",
        ));

        let manager = ApprovalManager::new(self.wallet.clone(), self.config.gas_buffer_percent);
        let request = ApprovalRequest { token, owner, spender, amount };
        match manager.ensure_allowance(request).await? {
            ApprovalOutcome::AlreadySufficient => info!("sufficient allowance already exists"),
            ApprovalOutcome::Approved(receipt) => {
                info!("approval mined in block {:?}", receipt.block_number);
                self.balance_refresh.trigger_after(self.config.balance_refresh_delay);
            },
        }

        Ok(())
    }

    /// Start tracking once the deposit hash is known
    fn on_transaction_hash(
        &self,
        tx_hash: TxHash,
        total_swap_seconds: u64,
    ) -> (SettlementId, PollerHandle, Countdown) {
        let settlement_id = SettlementId::from_tx_hash(&tx_hash);
        info!("deposit broadcast, tracking {}", settlement_id.tracker_url());

        let countdown = Countdown::start(total_swap_seconds);
        let poller = self.spawn_poller(settlement_id.clone());
        self.balance_refresh.trigger_after(self.config.balance_refresh_delay);

        self.notifier.notify(Notification::info(
            "Transaction Submitted",
            format!(
                "Transaction hash: {}, Estimated time: {} minutes",
                short_hash(&tx_hash),
                total_swap_seconds.div_ceil(60)
            ),
        ));

        (settlement_id, poller, countdown)
    }

    /// Spawn a poller for a settlement
    fn spawn_poller(&self, settlement_id: SettlementId) -> PollerHandle {
        StatusPoller::new(self.thornode.clone(), settlement_id, self.config.poll_interval).spawn()
    }
}

/// Shorten a hash to `0x1234...abcd`
fn short_hash(tx_hash: &TxHash) -> String {
    let hex = format!("{tx_hash:#x}");
    format!("{}...{}", &hex[..6], &hex[hex.len() - 4..])
}

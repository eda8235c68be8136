//! Test helpers for the swap client

use std::sync::Mutex;

use alloy::rpc::types::TransactionRequest;
use alloy_primitives::{Address, Bytes, TxHash, U256};
use alloy_sol_types::SolCall;
use async_trait::async_trait;

use crate::{
    error::SwapClientError,
    wallet::{abi::IERC20, TxReceipt, WalletClient},
};

/// The gas estimate the mock returns
pub const MOCK_GAS_ESTIMATE: u64 = 100_000;
/// The gas price the mock returns, 0.005 gwei
pub const MOCK_GAS_PRICE: u128 = 5_000_000;

/// A call made against the mock wallet
#[derive(Clone, Debug)]
pub enum WalletCall {
    /// A read-only call
    Call(TransactionRequest),
    /// A gas estimate
    EstimateGas(TransactionRequest),
    /// A gas price lookup
    GasPrice,
    /// A submitted transaction
    Send(TransactionRequest),
    /// A receipt lookup
    WaitForReceipt(TxHash),
}

impl WalletCall {
    /// The transaction attached to the call, if any
    pub fn tx(&self) -> Option<&TransactionRequest> {
        match self {
            WalletCall::Call(tx) | WalletCall::EstimateGas(tx) | WalletCall::Send(tx) => Some(tx),
            _ => None,
        }
    }
}

/// The mutable state of the mock
#[derive(Default)]
struct MockState {
    /// The allowance reported for any owner and spender
    allowance: U256,
    /// Every call made, in order
    calls: Vec<WalletCall>,
    /// Whether gas estimation fails
    fail_estimate: bool,
    /// Whether submissions are rejected
    reject_send: bool,
    /// Whether mined transactions revert
    revert: bool,
    /// The last byte of the next transaction hash
    next_hash: u8,
}

/// A wallet that records its calls and tracks a single ERC-20 allowance
pub struct MockWallet {
    /// The connected account
    address: Option<Address>,
    /// The mutable state
    state: Mutex<MockState>,
}

impl MockWallet {
    /// A connected wallet
    pub fn new(address: Address) -> Self {
        Self { address: Some(address), state: Mutex::new(MockState::default()) }
    }

    /// A wallet with no connected account
    pub fn disconnected() -> Self {
        Self { address: None, state: Mutex::new(MockState::default()) }
    }

    /// Set the reported allowance
    pub fn with_allowance(self, allowance: U256) -> Self {
        self.state.lock().unwrap().allowance = allowance;
        self
    }

    /// Fail every gas estimate
    pub fn failing_estimate(self) -> Self {
        self.state.lock().unwrap().fail_estimate = true;
        self
    }

    /// Reject every submission
    pub fn rejecting(self) -> Self {
        self.state.lock().unwrap().reject_send = true;
        self
    }

    /// Revert every mined transaction
    pub fn reverting(self) -> Self {
        self.state.lock().unwrap().revert = true;
        self
    }

    /// The current allowance
    pub fn allowance(&self) -> U256 {
        self.state.lock().unwrap().allowance
    }

    /// Every call made, in order
    pub fn calls(&self) -> Vec<WalletCall> {
        self.state.lock().unwrap().calls.clone()
    }

    /// Every submitted transaction, in order
    pub fn sent(&self) -> Vec<TransactionRequest> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                WalletCall::Send(tx) => Some(tx),
                _ => None,
            })
            .collect()
    }

    /// The number of calls carrying ERC-20 `allowance` or `approve` calldata
    pub fn erc20_call_count(&self) -> usize {
        self.calls()
            .iter()
            .filter_map(|c| c.tx().and_then(selector))
            .filter(|s| *s == IERC20::allowanceCall::SELECTOR || *s == IERC20::approveCall::SELECTOR)
            .count()
    }

    /// Record a call
    fn record(&self, call: WalletCall) {
        self.state.lock().unwrap().calls.push(call);
    }
}

/// The function selector of a transaction's calldata
pub fn selector(tx: &TransactionRequest) -> Option<[u8; 4]> {
    let input = tx.input.input()?;
    input.get(..4).and_then(|s| s.try_into().ok())
}

#[async_trait]
impl WalletClient for MockWallet {
    fn address(&self) -> Option<Address> {
        self.address
    }

    async fn call(&self, tx: TransactionRequest) -> Result<Bytes, SwapClientError> {
        self.record(WalletCall::Call(tx.clone()));
        if selector(&tx) == Some(IERC20::allowanceCall::SELECTOR) {
            let allowance = self.allowance();
            return Ok(Bytes::from(allowance.to_be_bytes::<32>().to_vec()));
        }

        Ok(Bytes::new())
    }

    async fn estimate_gas(&self, tx: TransactionRequest) -> Result<u64, SwapClientError> {
        self.record(WalletCall::EstimateGas(tx));
        if self.state.lock().unwrap().fail_estimate {
            return Err(SwapClientError::wallet("execution reverted"));
        }

        Ok(MOCK_GAS_ESTIMATE)
    }

    async fn gas_price(&self) -> Result<u128, SwapClientError> {
        self.record(WalletCall::GasPrice);
        Ok(MOCK_GAS_PRICE)
    }

    async fn send_transaction(&self, tx: TransactionRequest) -> Result<TxHash, SwapClientError> {
        self.record(WalletCall::Send(tx.clone()));
        let mut state = self.state.lock().unwrap();
        if state.reject_send {
            return Err(SwapClientError::wallet("user rejected the request"));
        }

        let input = tx.input.input().cloned().unwrap_or_default();
        if selector(&tx) == Some(IERC20::approveCall::SELECTOR) {
            let call = IERC20::approveCall::abi_decode(&input).unwrap();
            state.allowance = call.amount;
        }

        state.next_hash += 1;
        Ok(TxHash::with_last_byte(state.next_hash))
    }

    async fn wait_for_receipt(&self, tx_hash: TxHash) -> Result<TxReceipt, SwapClientError> {
        self.record(WalletCall::WaitForReceipt(tx_hash));
        let revert = self.state.lock().unwrap().revert;
        Ok(TxReceipt {
            transaction_hash: tx_hash,
            block_number: Some(1),
            gas_used: MOCK_GAS_ESTIMATE,
            status: !revert,
        })
    }
}

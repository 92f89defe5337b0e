//! Shared in-memory doubles for exercising the trade pipeline without a
//! network, a database, or a Telegram connection.

use crate::entity::{
    AssetInfo, ExecutionReport, QuoteError, ResolveError, SwapOutcome, TradeIntent, TradeSide,
    UserTradeConfig,
};
use crate::market::PriceLookup;
use crate::solana::custody::WalletStore;
use crate::solana::jupiter::models::QuoteResponse;
use crate::solana::jupiter::{SwapRouter, UnsignedSwapTx};
use crate::solana::ledger::{Ledger, TxStatus};
use crate::storage::{ConfigStore, TradeHistory};
use crate::view::TradeView;
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use solana_sdk::hash::Hash;
use solana_sdk::message::{Message, VersionedMessage};
use solana_sdk::signature::Signature;
use solana_sdk::transaction::VersionedTransaction;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

pub const MINT: &str = "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v";

pub fn asset() -> AssetInfo {
    AssetInfo {
        mint: MINT.to_string(),
        symbol: "USDC".to_string(),
        name: "USD Coin".to_string(),
        decimals: 6,
        price_usd: 1.0,
        market_cap_usd: 32_000_000_000.0,
        change_5m: 0.0,
        change_1h: 0.01,
        change_6h: -0.02,
        change_24h: 0.05,
        image_url: None,
    }
}

pub fn dummy_transaction() -> VersionedTransaction {
    VersionedTransaction {
        signatures: vec![Signature::default()],
        message: VersionedMessage::Legacy(Message::default()),
    }
}

/// Price lookup that serves a single fixed asset.
pub struct StaticLookup {
    pub asset: AssetInfo,
}

#[async_trait]
impl PriceLookup for StaticLookup {
    async fn get(&self, mint: &str) -> Result<AssetInfo, ResolveError> {
        if mint == self.asset.mint {
            Ok(self.asset.clone())
        } else {
            Err(ResolveError::UnknownAsset)
        }
    }
}

/// Router double returning a canned route and recording what was asked.
pub struct MockRouter {
    out_amount: u64,
    price_impact: f64,
    fail_build: bool,
    quote_requests: Mutex<Vec<(String, String, u64, u16)>>,
    build_calls: AtomicU32,
}

impl MockRouter {
    pub fn quoting(out_amount: u64, price_impact: f64) -> Self {
        Self {
            out_amount,
            price_impact,
            fail_build: false,
            quote_requests: Mutex::new(Vec::new()),
            build_calls: AtomicU32::new(0),
        }
    }

    pub fn failing_build(out_amount: u64) -> Self {
        Self {
            fail_build: true,
            ..Self::quoting(out_amount, 0.001)
        }
    }

    pub fn last_quote_request(&self) -> (String, String, u64, u16) {
        self.quote_requests
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("no quote requested")
    }

    pub fn build_calls(&self) -> u32 {
        self.build_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SwapRouter for MockRouter {
    async fn quote(
        &self,
        input_mint: &str,
        output_mint: &str,
        amount: u64,
        slippage_bps: u16,
    ) -> Result<QuoteResponse, QuoteError> {
        self.quote_requests.lock().unwrap().push((
            input_mint.to_string(),
            output_mint.to_string(),
            amount,
            slippage_bps,
        ));

        Ok(QuoteResponse {
            input_mint: input_mint.to_string(),
            output_mint: output_mint.to_string(),
            in_amount: amount.to_string(),
            out_amount: self.out_amount.to_string(),
            other_amount_threshold: self.out_amount.to_string(),
            swap_mode: "ExactIn".to_string(),
            slippage_bps: slippage_bps as u64,
            price_impact_pct: self.price_impact,
            route_plan: vec![],
            context_slot: None,
            time_taken: None,
        })
    }

    async fn build_tx(
        &self,
        _route: &QuoteResponse,
        _user_public_key: &str,
        _priority_fee_lamports: u64,
    ) -> Result<UnsignedSwapTx> {
        self.build_calls.fetch_add(1, Ordering::SeqCst);

        if self.fail_build {
            return Err(anyhow!("swap endpoint returned 500"));
        }

        Ok(UnsignedSwapTx {
            transaction: dummy_transaction(),
            last_valid_block_height: 1000,
        })
    }
}

/// Wallet double with a fixed balance and an optional signing failure.
pub struct MockWallet {
    holdings: u64,
    fail_sign: bool,
    sign_calls: AtomicU32,
}

impl MockWallet {
    pub fn with_holdings(holdings: u64) -> Self {
        Self {
            holdings,
            fail_sign: false,
            sign_calls: AtomicU32::new(0),
        }
    }

    pub fn failing_sign() -> Self {
        Self {
            fail_sign: true,
            ..Self::with_holdings(0)
        }
    }

    pub fn sign_calls(&self) -> u32 {
        self.sign_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WalletStore for MockWallet {
    async fn address(&self, _user_id: i64) -> Result<String> {
        Ok("7xKXtg2CW87d97TXJSDpbD5jBkheTqA83TZRuJosgAsU".to_string())
    }

    async fn holdings(&self, _user_id: i64, _mint: &str) -> Result<u64> {
        Ok(self.holdings)
    }

    async fn sign(&self, _user_id: i64, message: VersionedMessage) -> Result<VersionedTransaction> {
        self.sign_calls.fetch_add(1, Ordering::SeqCst);

        if self.fail_sign {
            return Err(anyhow!("no key material on file"));
        }

        Ok(VersionedTransaction {
            signatures: vec![Signature::default()],
            message,
        })
    }
}

/// Config store double serving the stock defaults.
pub struct StaticConfig;

#[async_trait]
impl ConfigStore for StaticConfig {
    async fn get(&self, _user_id: i64) -> Result<UserTradeConfig> {
        Ok(UserTradeConfig::default())
    }
}

pub fn outcome_tag(outcome: &SwapOutcome) -> &'static str {
    match outcome {
        SwapOutcome::Confirmed { .. } => "confirmed",
        SwapOutcome::Expired { .. } => "expired",
        SwapOutcome::Failed { .. } => "failed",
        SwapOutcome::SubmissionExhausted { .. } => "exhausted",
        SwapOutcome::NotSubmitted { .. } => "not_submitted",
    }
}

/// History double capturing the outcome kinds it was asked to record.
#[derive(Default)]
pub struct CountingHistory {
    outcomes: Mutex<Vec<&'static str>>,
}

impl CountingHistory {
    pub fn records(&self) -> u32 {
        self.outcomes.lock().unwrap().len() as u32
    }

    pub fn last_outcome(&self) -> Option<&'static str> {
        self.outcomes.lock().unwrap().last().copied()
    }
}

#[async_trait]
impl TradeHistory for CountingHistory {
    async fn record(&self, _user_id: i64, _intent: &TradeIntent, outcome: &SwapOutcome) {
        self.outcomes.lock().unwrap().push(outcome_tag(outcome));
    }
}

/// View double recording which messages were sent, as short tags.
#[derive(Default)]
pub struct RecordingView {
    events: Mutex<Vec<String>>,
}

impl RecordingView {
    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    pub fn count(&self, tag: &str) -> usize {
        self.events()
            .iter()
            .filter(|e| e.starts_with(tag))
            .count()
    }

    fn push(&self, event: String) {
        self.events.lock().unwrap().push(event);
    }
}

#[async_trait]
impl TradeView for RecordingView {
    async fn show_asset_card(&self, asset: &AssetInfo, _config: &UserTradeConfig) -> Result<()> {
        self.push(format!("card:{}", asset.symbol));
        Ok(())
    }

    async fn prompt_custom_amount(&self, side: TradeSide) -> Result<()> {
        self.push(format!("prompt_custom:{}", side));
        Ok(())
    }

    async fn prompt_confirmation(&self, _intent: &TradeIntent) -> Result<()> {
        self.push("prompt_confirm".to_string());
        Ok(())
    }

    async fn show_executing(&self, _intent: &TradeIntent) -> Result<()> {
        self.push("executing".to_string());
        Ok(())
    }

    async fn show_report(&self, _intent: &TradeIntent, report: &ExecutionReport) -> Result<()> {
        self.push(format!("report:{}", outcome_tag(&report.outcome)));
        Ok(())
    }

    async fn show_cancelled(&self) -> Result<()> {
        self.push("cancelled".to_string());
        Ok(())
    }

    async fn show_unrecognized(&self) -> Result<()> {
        self.push("unrecognized".to_string());
        Ok(())
    }

    async fn show_error(&self, message: &str) -> Result<()> {
        self.push(format!("error:{message}"));
        Ok(())
    }
}

/// What the ledger double reports once a submission was accepted.
#[derive(Clone, Copy)]
pub enum StatusScript {
    /// Pending forever
    NeverConfirm,
    /// Pending for `n` polls, then confirmed
    ConfirmAfter(u32),
    /// Immediate on-chain failure
    FailOnChain,
}

/// Ledger double scripting submission failures and confirmation behavior.
pub struct MockLedger {
    fail_submits: u32,
    status: StatusScript,
    submit_calls: AtomicU32,
    status_calls: AtomicU32,
}

impl MockLedger {
    pub fn confirming() -> Self {
        Self::scripted(0, StatusScript::ConfirmAfter(0))
    }

    pub fn scripted(fail_submits: u32, status: StatusScript) -> Self {
        Self {
            fail_submits,
            status,
            submit_calls: AtomicU32::new(0),
            status_calls: AtomicU32::new(0),
        }
    }

    pub fn submit_calls(&self) -> u32 {
        self.submit_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Ledger for MockLedger {
    async fn latest_blockhash(&self) -> Result<Hash> {
        Ok(Hash::new_unique())
    }

    async fn submit(&self, _tx: &VersionedTransaction) -> Result<Signature> {
        let call = self.submit_calls.fetch_add(1, Ordering::SeqCst);

        if call < self.fail_submits {
            return Err(anyhow!("blockhash not found"));
        }

        Ok(Signature::from([7u8; 64]))
    }

    async fn get_status(&self, _signature: &Signature) -> Result<TxStatus> {
        let call = self.status_calls.fetch_add(1, Ordering::SeqCst);

        match self.status {
            StatusScript::NeverConfirm => Ok(TxStatus::Pending),
            StatusScript::ConfirmAfter(n) if call >= n => Ok(TxStatus::Confirmed),
            StatusScript::ConfirmAfter(_) => Ok(TxStatus::Pending),
            StatusScript::FailOnChain => {
                Ok(TxStatus::Failed("custom program error: 0x1771".to_string()))
            }
        }
    }
}

use crate::entity::{AttemptOutcome, ExecutionReport, SwapAttempt, SwapError, SwapOutcome, SwapQuote};
use crate::retry::{self, Attempt, RetryError};
use crate::solana::custody::WalletStore;
use crate::solana::jupiter::SwapRouter;
use crate::solana::ledger::{Ledger, TxStatus};
use log::{info, warn};
use solana_sdk::signature::Signature;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

/// Tunable execution bounds. Production uses the defaults; tests inject
/// tighter ones.
#[derive(Debug, Clone)]
pub struct EngineSettings {
    /// Submission tries before giving up without anything on the network
    pub max_submit_attempts: u32,
    pub poll_interval: Duration,
    /// Status polls before an accepted submission is declared expired
    pub max_status_polls: u32,
    /// How long a frozen quote stays executable
    pub quote_ttl: Duration,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            max_submit_attempts: 5,
            poll_interval: Duration::from_secs(2),
            max_status_polls: 15,
            quote_ttl: Duration::from_secs(30),
        }
    }
}

/// Drives a frozen quote through build, sign, submit, and confirmation.
///
/// Errors returned from `execute` mean nothing reached the network; once a
/// submission is accepted every outcome, including the ambiguous expired
/// one, comes back inside the `ExecutionReport`.
pub struct SwapEngine {
    router: Arc<dyn SwapRouter>,
    wallet: Arc<dyn WalletStore>,
    ledger: Arc<dyn Ledger>,
    settings: EngineSettings,
}

impl SwapEngine {
    pub fn new(
        router: Arc<dyn SwapRouter>,
        wallet: Arc<dyn WalletStore>,
        ledger: Arc<dyn Ledger>,
        settings: EngineSettings,
    ) -> Self {
        Self {
            router,
            wallet,
            ledger,
            settings,
        }
    }

    pub async fn execute(
        &self,
        user_id: i64,
        quote: &SwapQuote,
    ) -> Result<ExecutionReport, SwapError> {
        if !quote.is_fresh(self.settings.quote_ttl) {
            return Err(SwapError::StaleQuote(quote.age().as_secs()));
        }

        let address = self
            .wallet
            .address(user_id)
            .await
            .map_err(|e| SwapError::TxBuild(e.to_string()))?;

        let unsigned = self
            .router
            .build_tx(&quote.route, &address, quote.priority_fee_lamports)
            .await
            .map_err(|e| SwapError::TxBuild(e.to_string()))?;

        info!(
            "Executing swap for user {}: {} {} -> {} {}",
            user_id, quote.in_amount, quote.input_mint, quote.out_amount, quote.output_mint
        );

        // Each try re-fetches the blockhash and re-signs; a stale hash on
        // one attempt must not poison the next.
        let ledger = self.ledger.clone();
        let wallet = self.wallet.clone();
        let message_template = unsigned.transaction.message.clone();

        let submission = retry::bounded(self.settings.max_submit_attempts, move |attempt| {
            let ledger = ledger.clone();
            let wallet = wallet.clone();
            let mut message = message_template.clone();

            async move {
                let blockhash = ledger
                    .latest_blockhash()
                    .await
                    .map_err(|e| Attempt::Transient(e.to_string()))?;
                message.set_recent_blockhash(blockhash);

                let signed = wallet
                    .sign(user_id, message)
                    .await
                    .map_err(|e| Attempt::Fatal(e.to_string()))?;

                match ledger.submit(&signed).await {
                    Ok(signature) => Ok(signature),
                    Err(e) => {
                        warn!("Submission attempt {} failed: {}", attempt, e);
                        Err(Attempt::Transient(e.to_string()))
                    }
                }
            }
        })
        .await;

        let (signature, attempts) = match submission {
            Ok(retried) => {
                let mut attempts = failed_attempts(&retried.failures);
                attempts.push(SwapAttempt {
                    attempt: retried.attempt,
                    signature: Some(retried.value),
                    outcome: AttemptOutcome::Submitted,
                });
                (retried.value, attempts)
            }
            Err(RetryError::Fatal(reason)) => return Err(SwapError::Signing(reason)),
            Err(RetryError::Exhausted { failures }) => {
                let last_error = failures.last().cloned().unwrap_or_default();
                warn!(
                    "Giving up after {} submission attempts for user {}: {}",
                    failures.len(),
                    user_id,
                    last_error
                );
                return Ok(ExecutionReport {
                    attempts: failed_attempts(&failures),
                    outcome: SwapOutcome::SubmissionExhausted { last_error },
                });
            }
        };

        info!("Swap submitted: {}", signature);
        let outcome = self.await_confirmation(signature).await;

        Ok(ExecutionReport { attempts, outcome })
    }

    /// Polls until the signature confirms, fails, or the poll budget runs
    /// out. A run-out is `Expired`, never `Failed`: the transaction may
    /// still land after we stop looking.
    async fn await_confirmation(&self, signature: Signature) -> SwapOutcome {
        for poll in 0..self.settings.max_status_polls {
            match self.ledger.get_status(&signature).await {
                Ok(TxStatus::Confirmed) => {
                    info!("Swap confirmed: {}", signature);
                    return SwapOutcome::Confirmed { signature };
                }
                Ok(TxStatus::Failed(reason)) => {
                    warn!("Swap failed on-chain: {} ({})", signature, reason);
                    return SwapOutcome::Failed { signature, reason };
                }
                Ok(TxStatus::Pending) => {}
                // A flaky status endpoint is not evidence of failure.
                Err(e) => warn!("Status poll {} errored: {}", poll, e),
            }

            sleep(self.settings.poll_interval).await;
        }

        warn!("Swap did not confirm within the poll budget: {}", signature);
        SwapOutcome::Expired { signature }
    }
}

fn failed_attempts(failures: &[String]) -> Vec<SwapAttempt> {
    failures
        .iter()
        .enumerate()
        .map(|(i, reason)| SwapAttempt {
            attempt: i as u32 + 1,
            signature: None,
            outcome: AttemptOutcome::Failed(reason.clone()),
        })
        .collect()
}

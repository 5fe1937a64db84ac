//! The apply → authority call → commit/rollback round trip.
//!
//! This is the only place where the optimistic ledger and the remote
//! authority meet. The invariant: whatever the network does, the ledger ends
//! settled — either committed to the server-reported balance or rolled back
//! to the exact pre-apply state. Partial rollback is not possible because the
//! ledger stores the exact applied amount in its pending slot.

use std::fmt;
use std::time::Duration;

use tracing::warn;

use gdk_ledger::{AppliedAdjustment, BalanceKind, BalanceLedger, LedgerError, Micros};

use crate::authority::LedgerAuthority;
use crate::retry::RetryPolicy;

// ---------------------------------------------------------------------------
// Errors / outcome
// ---------------------------------------------------------------------------

/// Why a submission did not take effect.
#[derive(Debug)]
pub enum SubmitError {
    /// The ledger refused the apply (invalid amount, busy slot) — nothing was
    /// mutated.
    Ledger(LedgerError),
    /// The authority rejected the adjustment, the transport failed, or the
    /// caller timeout expired. The optimistic state has been rolled back;
    /// `reverted_balance` is the restored pre-apply value.
    CommitFailed {
        reason: String,
        reverted_balance: Micros,
    },
}

impl fmt::Display for SubmitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmitError::Ledger(e) => write!(f, "{e}"),
            SubmitError::CommitFailed { reason, .. } => {
                write!(f, "adjustment did not take effect: {reason}")
            }
        }
    }
}

impl std::error::Error for SubmitError {}

impl From<LedgerError> for SubmitError {
    fn from(e: LedgerError) -> Self {
        SubmitError::Ledger(e)
    }
}

/// A successfully settled adjustment.
#[derive(Clone, Debug, PartialEq)]
pub struct SettledAdjustment {
    /// The server-reported balance now held by the ledger.
    pub confirmed_balance: Micros,
    /// Id of the pending transaction that the server record replaces.
    pub replaced_pending_id: String,
}

// ---------------------------------------------------------------------------
// Round trips
// ---------------------------------------------------------------------------

/// Submit a signed cash/gold adjustment end to end.
pub async fn submit_adjustment<A: LedgerAuthority + ?Sized>(
    ledger: &mut BalanceLedger,
    authority: &A,
    policy: RetryPolicy,
    timeout: Duration,
    owner_id: &str,
    kind: BalanceKind,
    amount: Micros,
) -> Result<SettledAdjustment, SubmitError> {
    let applied = ledger.apply(owner_id, kind, amount)?;
    settle(ledger, authority, policy, timeout, owner_id, kind, amount, applied).await
}

/// Submit a gold receipt expressed as weight + fineness code.
pub async fn submit_gold_receipt<A: LedgerAuthority + ?Sized>(
    ledger: &mut BalanceLedger,
    authority: &A,
    policy: RetryPolicy,
    timeout: Duration,
    owner_id: &str,
    weight_grams: f64,
    purity: u32,
) -> Result<SettledAdjustment, SubmitError> {
    let applied = ledger.apply_gold_receipt(owner_id, weight_grams, purity)?;
    let amount = applied.pending.signed_amount();
    settle(
        ledger,
        authority,
        policy,
        timeout,
        owner_id,
        BalanceKind::Gold,
        amount,
        applied,
    )
    .await
}

#[allow(clippy::too_many_arguments)]
async fn settle<A: LedgerAuthority + ?Sized>(
    ledger: &mut BalanceLedger,
    authority: &A,
    policy: RetryPolicy,
    timeout: Duration,
    owner_id: &str,
    kind: BalanceKind,
    amount: Micros,
    applied: AppliedAdjustment,
) -> Result<SettledAdjustment, SubmitError> {
    let call = policy.run(|| authority.apply_adjustment(owner_id, kind, amount));

    let failure_reason = match tokio::time::timeout(timeout, call).await {
        Ok(Ok(ack)) if ack.success => {
            let confirmed = ledger.commit(owner_id, kind, ack.new_balance)?;
            return Ok(SettledAdjustment {
                confirmed_balance: confirmed,
                replaced_pending_id: applied.pending.id,
            });
        }
        Ok(Ok(ack)) => ack
            .message
            .unwrap_or_else(|| "authority reported failure".to_string()),
        Ok(Err(e)) => e.to_string(),
        Err(_) => format!("authority call timed out after {timeout:?}"),
    };

    let reverted_balance = ledger.rollback(owner_id, kind)?;
    warn!(
        owner_id,
        kind = kind.as_str(),
        reason = %failure_reason,
        "adjustment rolled back"
    );
    Err(SubmitError::CommitFailed {
        reason: failure_reason,
        reverted_balance,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

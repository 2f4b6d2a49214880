//! Ledger mutation engine
//!
//! Orchestrates balance-changing operations: authenticated peer-to-peer
//! transfers and privileged administrative adjustments. Every operation either
//! commits fully (both balance sides plus a history entry) or rejects with no
//! observable mutation. Preconditions are checked in a fixed order, first
//! failure wins, and the funds check is repeated inside the store's atomic
//! section so a concurrent debit between the precheck and the commit cannot
//! drive a balance negative.

use crate::core::auth::Principal;
use crate::core::traits::{AccountStore, TransactionLog};
use crate::types::{
    Account, AccountId, LedgerError, TransactionDraft, TransactionRecord, TxKind,
};
use rust_decimal::Decimal;
use std::sync::Arc;

/// Smallest representable ledger unit is 10^-4
const LEDGER_SCALE: u32 = 4;

/// Outcome of a successful transfer
#[derive(Debug, Clone, PartialEq)]
pub struct TransferResult {
    /// Sender snapshot after the debit
    pub from: Account,
    /// Recipient snapshot after the credit
    pub to: Account,
    /// Amount moved
    pub amount: Decimal,
    /// History entry, when the append succeeded
    pub record: Option<TransactionRecord>,
    /// Set when the balance mutation committed but the log append failed;
    /// the transfer itself stands
    pub log_degraded: bool,
}

/// Outcome of a successful administrative adjustment
#[derive(Debug, Clone, PartialEq)]
pub struct AdjustResult {
    /// Target snapshot after the adjustment
    pub account: Account,
    /// Delta the administrator asked for
    pub requested: Decimal,
    /// Amount actually applied after clamping at zero
    pub applied: Decimal,
    /// Mint for positive deltas, Burn for negative
    pub kind: TxKind,
    /// History entry; absent for a fully clamped burn (nothing applied) or a
    /// degraded append
    pub record: Option<TransactionRecord>,
    /// Set when the balance mutation committed but the log append failed
    pub log_degraded: bool,
}

/// The state machine at the heart of the ledger
pub struct LedgerEngine<S, L> {
    store: Arc<S>,
    log: Arc<L>,
}

impl<S, L> LedgerEngine<S, L>
where
    S: AccountStore,
    L: TransactionLog,
{
    pub fn new(store: Arc<S>, log: Arc<L>) -> Self {
        LedgerEngine { store, log }
    }

    /// Transfer funds between two accounts
    ///
    /// Precondition order, first failure wins:
    /// 1. `principal` is the standard principal bound to `from` (`Forbidden`)
    /// 2. `to` exists (`RecipientNotFound`)
    /// 3. `from != to` (`SelfTransfer`)
    /// 4. `amount` is positive and representable in the ledger unit
    ///    (`InvalidAmount`)
    /// 5. sender balance covers `amount` (`InsufficientFunds`, re-checked
    ///    inside the atomic section)
    ///
    /// Debit and credit commit in one atomic section; the history entry is
    /// appended afterwards, best-effort (see `log_degraded`).
    pub fn transfer(
        &self,
        principal: &Principal,
        from: &AccountId,
        to: &AccountId,
        amount: Decimal,
    ) -> Result<TransferResult, LedgerError> {
        if principal.account() != Some(from) {
            return Err(LedgerError::Forbidden);
        }
        if self.store.get(to).is_none() {
            return Err(LedgerError::RecipientNotFound { id: to.clone() });
        }
        if from == to {
            return Err(LedgerError::SelfTransfer { id: from.clone() });
        }
        validate_amount(amount, "transfer")?;

        let sender = self
            .store
            .get(from)
            .ok_or_else(|| LedgerError::account_not_found(from))?;
        if sender.balance < amount {
            return Err(LedgerError::insufficient_funds(from, sender.balance, amount));
        }

        let (from_account, to_account) = self.store.update_pair(from, to, |sender, recipient| {
            // Balance may have moved since the precheck; re-validate under
            // the section's lock.
            if sender.balance < amount {
                return Err(LedgerError::insufficient_funds(
                    &sender.id,
                    sender.balance,
                    amount,
                ));
            }
            sender.balance = sender
                .balance
                .checked_sub(amount)
                .ok_or_else(|| LedgerError::arithmetic_overflow("transfer", &sender.id))?;
            recipient.balance = recipient
                .balance
                .checked_add(amount)
                .ok_or_else(|| LedgerError::arithmetic_overflow("transfer", &recipient.id))?;
            Ok(())
        })?;

        let draft = TransactionDraft::transfer(from.clone(), to.clone(), amount);
        let (record, log_degraded) = self.record(draft);
        tracing::info!(
            from = %from,
            to = %to,
            %amount,
            degraded = log_degraded,
            "transfer committed"
        );

        Ok(TransferResult {
            from: from_account,
            to: to_account,
            amount,
            record,
            log_degraded,
        })
    }

    /// Administratively adjust a single balance (mint or burn)
    ///
    /// Requires an administrator principal. The new balance is clamped at
    /// zero, silently: burning more than the balance zeroes it. The recorded
    /// amount is what was actually applied, not the requested delta.
    pub fn adjust(
        &self,
        principal: &Principal,
        target: &AccountId,
        delta: Decimal,
    ) -> Result<AdjustResult, LedgerError> {
        if !principal.is_admin() {
            return Err(LedgerError::Forbidden);
        }
        if delta.is_zero() {
            return Err(LedgerError::NoOpAdjustment { id: target.clone() });
        }
        validate_scale(delta, "adjust")?;

        let mut applied = Decimal::ZERO;
        let account = self.store.update(target, |acct| {
            let new_balance = acct
                .balance
                .checked_add(delta)
                .ok_or_else(|| LedgerError::arithmetic_overflow("adjust", &acct.id))?
                .max(Decimal::ZERO);
            applied = (new_balance - acct.balance).abs();
            acct.balance = new_balance;
            Ok(())
        })?;

        let kind = if delta > Decimal::ZERO {
            TxKind::Mint
        } else {
            TxKind::Burn
        };
        // A fully clamped burn applies nothing; records carry positive
        // amounts only, so there is nothing to append.
        let (record, log_degraded) = if applied > Decimal::ZERO {
            let draft = match kind {
                TxKind::Mint => TransactionDraft::mint(target.clone(), applied),
                _ => TransactionDraft::burn(target.clone(), applied),
            };
            self.record(draft)
        } else {
            (None, false)
        };
        tracing::info!(
            target = %target,
            %delta,
            %applied,
            degraded = log_degraded,
            "adjustment committed"
        );

        Ok(AdjustResult {
            account,
            requested: delta,
            applied,
            kind,
            record,
            log_degraded,
        })
    }

    /// Best-effort history append after a committed mutation
    fn record(&self, draft: TransactionDraft) -> (Option<TransactionRecord>, bool) {
        match self.log.append(draft) {
            Ok(record) => (Some(record), false),
            Err(err) => {
                tracing::warn!(error = %err, "mutation committed but log append failed");
                (None, true)
            }
        }
    }
}

fn validate_amount(amount: Decimal, operation: &str) -> Result<(), LedgerError> {
    if amount <= Decimal::ZERO {
        return Err(LedgerError::invalid_amount(amount, operation));
    }
    validate_scale(amount, operation)
}

fn validate_scale(amount: Decimal, operation: &str) -> Result<(), LedgerError> {
    if amount.normalize().scale() > LEDGER_SCALE {
        return Err(LedgerError::invalid_amount(amount, operation));
    }
    Ok(())
}

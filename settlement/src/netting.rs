//! Pairwise netting of group expenses
//!
//! # Algorithm
//!
//! 1. Build the gross directional ledger: for every participant of every
//!    expense (payer excluded) accrue the participant's share to
//!    `owed[participant][payer]`
//! 2. Cancel reciprocal debts for every unordered member pair
//! 3. Emit, per member, the remaining debts and credits above the
//!    materiality threshold
//!
//! # Example
//!
//! ```text
//! Expenses:
//!   A pays 100 for [A, B]  → B owes A 50
//!   B pays  40 for [A, B]  → A owes B 20
//!
//! Cancellation:
//!   min(50, 20) = 20 removed from both directions
//!
//! Result:
//!   B owes A 30
//!   A owes B  0
//! ```
//!
//! Every call builds its own ledger from the full expense snapshot. The
//! engine holds configuration only, so concurrent and repeated calls on the
//! same input produce identical output.

use crate::{
    expense::Expense,
    types::*,
    Error, Result,
};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use split_core::config::NettingConfig;
use split_core::money::{is_material, round_for_display, split_evenly};
use split_core::{Config, MemberId, Roster, SplitPolicy, StaleReferencePolicy};
use std::collections::HashMap;

/// Gross directional ledger: `(debtor, creditor) → amount`
#[derive(Debug, Clone, Default)]
pub struct GrossLedger {
    owed: HashMap<(MemberId, MemberId), Decimal>,
}

impl GrossLedger {
    /// Empty ledger
    pub fn new() -> Self {
        Self::default()
    }

    /// Accumulate every participant share of every expense
    pub fn from_expenses(expenses: &[Expense], policy: SplitPolicy) -> Result<Self> {
        let mut ledger = Self::new();

        for expense in expenses {
            if expense.participants.is_empty() {
                tracing::debug!(expense = %expense.id, "Expense without participants skipped");
                continue;
            }

            let shares = split_evenly(expense.total_amount, expense.participants.len(), policy)?;
            for (participant, share) in expense.participants.iter().zip(shares) {
                if participant.member_id != expense.payer_id {
                    ledger.accrue(&participant.member_id, &expense.payer_id, share)?;
                }
            }
        }

        Ok(ledger)
    }

    /// Add `amount` to what `debtor` owes `creditor`
    pub fn accrue(
        &mut self,
        debtor: &MemberId,
        creditor: &MemberId,
        amount: Decimal,
    ) -> Result<()> {
        let entry = self
            .owed
            .entry((debtor.clone(), creditor.clone()))
            .or_insert(Decimal::ZERO);

        *entry = entry.checked_add(amount).ok_or_else(|| {
            Error::Validation(format!(
                "Amount owed by {} to {} overflows",
                debtor, creditor
            ))
        })?;
        Ok(())
    }

    /// What `debtor` owes `creditor`
    pub fn owed(&self, debtor: &MemberId, creditor: &MemberId) -> Decimal {
        self.owed
            .get(&(debtor.clone(), creditor.clone()))
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    fn set(&mut self, debtor: &MemberId, creditor: &MemberId, amount: Decimal) {
        if let Some(entry) = self.owed.get_mut(&(debtor.clone(), creditor.clone())) {
            *entry = amount;
        }
    }

    /// Sum of all directed amounts between roster members
    pub fn total_among(&self, roster: &Roster) -> Result<Decimal> {
        let ids = roster.ids();
        let mut total = Decimal::ZERO;
        for debtor in ids {
            for creditor in ids {
                if debtor != creditor {
                    total = total
                        .checked_add(self.owed(debtor, creditor))
                        .ok_or_else(|| Error::Validation("Ledger total overflows".into()))?;
                }
            }
        }
        Ok(total)
    }

    /// Cancel reciprocal debts for every unordered roster pair
    ///
    /// Afterwards at least one direction of every pair is exactly zero.
    pub fn cancel_reciprocal(&mut self, roster: &Roster) {
        let ids = roster.ids();
        for (i, x) in ids.iter().enumerate() {
            for y in &ids[i + 1..] {
                let x_to_y = self.owed(x, y);
                let y_to_x = self.owed(y, x);
                let common = x_to_y.min(y_to_x);

                if common > Decimal::ZERO {
                    self.set(x, y, x_to_y - common);
                    self.set(y, x, y_to_x - common);
                }
            }
        }
    }
}

/// Netting engine
#[derive(Debug, Clone, Default)]
pub struct NettingEngine {
    /// Threshold, display scale, stale reference handling
    config: NettingConfig,

    /// Share computation
    split: SplitPolicy,
}

impl NettingEngine {
    /// Create new netting engine
    pub fn new(config: NettingConfig, split: SplitPolicy) -> Self {
        Self { config, split }
    }

    /// Create from workspace configuration
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.netting.clone(), config.split)
    }

    /// Compute netted balances for every roster member, in roster order
    pub fn net_balances(&self, expenses: &[Expense], roster: &Roster) -> Result<Vec<MemberBalance>> {
        Ok(self.report(expenses, roster)?.balances)
    }

    /// Compute netted balances together with gross/net statistics
    pub fn report(&self, expenses: &[Expense], roster: &Roster) -> Result<NettingReport> {
        self.check_references(expenses, roster)?;

        // Step 1: Gross ledger
        let mut ledger = GrossLedger::from_expenses(expenses, self.split)?;
        let gross_total = ledger.total_among(roster)?;

        // Step 2: Reciprocal cancellation
        ledger.cancel_reciprocal(roster);
        let net_total = ledger.total_among(roster)?;

        // Step 3: Per-member entries
        let balances = self.emit_balances(&ledger, roster);

        let netting_efficiency = if gross_total > Decimal::ZERO {
            ((gross_total - net_total) / gross_total).to_f64().unwrap_or(0.0)
        } else {
            0.0
        };

        tracing::info!(
            expenses = expenses.len(),
            members = roster.len(),
            "Netting complete: {} gross → {} net ({:.1}% efficiency)",
            gross_total,
            net_total,
            netting_efficiency * 100.0
        );

        Ok(NettingReport {
            balances,
            expense_count: expenses.len(),
            gross_total,
            net_total,
            netting_efficiency,
        })
    }

    /// Apply the stale reference policy to ids outside the roster
    fn check_references(&self, expenses: &[Expense], roster: &Roster) -> Result<()> {
        let unknown = roster.unknown(expenses.iter().flat_map(Expense::referenced_members));
        if unknown.is_empty() {
            return Ok(());
        }

        let listed = unknown
            .iter()
            .map(MemberId::as_str)
            .collect::<Vec<_>>()
            .join(", ");

        match self.config.stale_references {
            StaleReferencePolicy::Tolerate => {
                tracing::warn!(
                    count = unknown.len(),
                    "Expenses reference members outside the roster, excluded from output: {}",
                    listed
                );
                Ok(())
            }
            StaleReferencePolicy::Reject => Err(Error::InconsistentReference(format!(
                "Members not in group roster: {}",
                listed
            ))),
        }
    }

    /// Turn the netted ledger into per-member entries
    fn emit_balances(&self, ledger: &GrossLedger, roster: &Roster) -> Vec<MemberBalance> {
        let ids = roster.ids();
        let mut balances = Vec::with_capacity(ids.len());

        for member in ids {
            let mut balance = MemberBalance::settled(
                member.clone(),
                roster.nickname(member).map(str::to_string),
            );

            for other in ids {
                if other == member {
                    continue;
                }

                if let Some(amount) = self.presentable(ledger.owed(member, other)) {
                    balance.debts.push(DebtEntry {
                        to: other.clone(),
                        amount,
                    });
                }

                if let Some(amount) = self.presentable(ledger.owed(other, member)) {
                    balance.credits.push(CreditEntry {
                        from: other.clone(),
                        amount,
                    });
                }
            }

            balances.push(balance);
        }

        balances
    }

    /// Rounded amount, or `None` when it counts as settled
    fn presentable(&self, amount: Decimal) -> Option<Decimal> {
        if !is_material(amount, self.config.materiality_threshold) {
            return None;
        }

        let rounded = round_for_display(amount, self.config.display_scale);
        (rounded > Decimal::ZERO).then_some(rounded)
    }
}

/// Net balances with default configuration
pub fn net_balances(expenses: &[Expense], members: &[MemberId]) -> Result<Vec<MemberBalance>> {
    let roster = Roster::from_ids(members.iter().cloned());
    NettingEngine::default().net_balances(expenses, &roster)
}

//! Main settlement engine
//!
//! Ties together boundary validation, expense recording and netting for a
//! single group snapshot. Stateless apart from configuration.

use crate::{
    document::{expenses_from_documents, ExpenseDocument},
    expense::Expense,
    netting::NettingEngine,
    types::*,
    Result,
};
use split_core::money::parse_amount;
use split_core::{Config, Member, MemberId, Roster};

/// Settlement engine
#[derive(Debug, Clone)]
pub struct SettlementEngine {
    /// Netting engine
    netting: NettingEngine,

    /// Configuration
    config: Config,
}

impl SettlementEngine {
    /// Create new settlement engine
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let netting = NettingEngine::from_config(&config);

        Ok(Self { netting, config })
    }

    /// Configuration in use
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Netted balances for every roster member
    ///
    /// Members without a resolved profile get the configured placeholder
    /// nickname when the roster carries nicknames at all.
    pub fn balances(&self, expenses: &[Expense], roster: &Roster) -> Result<Vec<MemberBalance>> {
        Ok(self.report(expenses, roster)?.balances)
    }

    /// Netted balances with gross/net statistics
    pub fn report(&self, expenses: &[Expense], roster: &Roster) -> Result<NettingReport> {
        let mut report = self.netting.report(expenses, roster)?;

        let has_profiles = roster.ids().iter().any(|id| roster.nickname(id).is_some());
        if has_profiles {
            let fallback = self.config.unknown_member_nickname.as_str();
            for balance in report.balances.iter_mut() {
                let name = roster.display_name(&balance.member_id, fallback);
                balance.nickname = Some(name.to_string());
            }
        }

        Ok(report)
    }

    /// Validate a raw document snapshot and net it
    pub fn balances_from_documents(
        &self,
        documents: Vec<ExpenseDocument>,
        roster: &Roster,
    ) -> Result<Vec<MemberBalance>> {
        let expenses = expenses_from_documents(documents)?;
        tracing::debug!(expenses = expenses.len(), "Expense snapshot validated");

        self.balances(&expenses, roster)
    }

    /// Record a new expense from user input
    ///
    /// `amount` is the raw text the user typed (`,` or `.` separator).
    pub fn record_expense(
        &self,
        description: &str,
        amount: &str,
        payer: &Member,
        participants: &[Member],
    ) -> Result<Expense> {
        let total = parse_amount(amount)?;
        Expense::create(description, total, payer, participants, self.config.split)
    }

    /// Check that `requester` may delete `expense`
    ///
    /// The delete itself is performed by the storage collaborator; the next
    /// snapshot it hands over no longer contains the expense.
    pub fn authorize_expense_deletion(&self, expense: &Expense, requester: &MemberId) -> Result<()> {
        expense.authorize_delete(requester)?;
        tracing::info!(expense = %expense.id, "Expense deletion authorized");
        Ok(())
    }
}

impl Default for SettlementEngine {
    fn default() -> Self {
        Self {
            netting: NettingEngine::default(),
            config: Config::default(),
        }
    }
}

//! Output types of the netting engine

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use split_core::MemberId;

/// Amount a member owes another member after netting
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebtEntry {
    /// Creditor
    pub to: MemberId,

    /// Amount owed
    pub amount: Decimal,
}

/// Amount a member is owed by another member after netting
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditEntry {
    /// Debtor
    pub from: MemberId,

    /// Amount receivable
    pub amount: Decimal,
}

/// Netted position of one member
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberBalance {
    /// Member ID
    pub member_id: MemberId,

    /// Nickname (only when the roster carried profiles)
    pub nickname: Option<String>,

    /// What this member still has to pay, by creditor
    pub debts: Vec<DebtEntry>,

    /// What this member still has to receive, by debtor
    pub credits: Vec<CreditEntry>,
}

impl MemberBalance {
    /// Balance with nothing outstanding
    pub fn settled(member_id: MemberId, nickname: Option<String>) -> Self {
        Self {
            member_id,
            nickname,
            debts: Vec::new(),
            credits: Vec::new(),
        }
    }

    /// Nothing to pay and nothing to receive
    pub fn is_settled(&self) -> bool {
        self.debts.is_empty() && self.credits.is_empty()
    }

    /// Total still to pay
    pub fn total_debts(&self) -> Decimal {
        self.debts.iter().map(|d| d.amount).sum()
    }

    /// Total still to receive
    pub fn total_credits(&self) -> Decimal {
        self.credits.iter().map(|c| c.amount).sum()
    }

    /// Credits minus debts (positive = net receiver)
    pub fn net_position(&self) -> Decimal {
        self.total_credits() - self.total_debts()
    }

    /// Amount owed to `creditor`, zero when none
    pub fn owes(&self, creditor: &MemberId) -> Decimal {
        self.debts
            .iter()
            .find(|d| d.to == *creditor)
            .map(|d| d.amount)
            .unwrap_or(Decimal::ZERO)
    }
}

/// Result of a netting run with gross/net statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NettingReport {
    /// Per-member balances, roster order
    pub balances: Vec<MemberBalance>,

    /// Expenses considered
    pub expense_count: usize,

    /// Total owed among roster members before reciprocal cancellation
    pub gross_total: Decimal,

    /// Total owed among roster members after cancellation
    pub net_total: Decimal,

    /// Share of the gross amount removed by netting (0.0 - 1.0)
    pub netting_efficiency: f64,
}

impl NettingReport {
    /// Amount removed by cancellation
    pub fn amount_saved(&self) -> Decimal {
        self.gross_total - self.net_total
    }

    /// Balance of a single member
    pub fn balance_of(&self, member: &MemberId) -> Option<&MemberBalance> {
        self.balances.iter().find(|b| b.member_id == *member)
    }
}

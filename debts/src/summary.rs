//! Per-member view over all debts

use crate::types::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use split_core::{MemberId, ParticipationStatus};

/// One outstanding item from a member's point of view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DebtSummaryLine {
    /// The member paid and others still owe them
    OwedToMe {
        /// Debt ID
        debt_id: DebtId,
        /// Debt description
        description: String,
        /// Sum still unpaid by the debtors
        outstanding: Decimal,
    },
    /// The member owes the payer their share
    IOwe {
        /// Debt ID
        debt_id: DebtId,
        /// Debt description
        description: String,
        /// Who is owed
        payer_id: MemberId,
        /// Payer nickname, when known
        payer_nickname: Option<String>,
        /// The member's share
        amount: Decimal,
    },
}

/// Everything still open for one member
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebtSummary {
    /// Open items, in the order the debts were supplied
    pub lines: Vec<DebtSummaryLine>,

    /// Total others owe the member
    pub total_receivable: Decimal,

    /// Total the member owes others
    pub total_payable: Decimal,
}

impl DebtSummary {
    /// Nothing open in either direction
    pub fn is_clear(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Summarize the debts `member` pays for or takes part in
///
/// Paid-off shares and fully collected debts are left out.
pub fn summarize_for(member: &MemberId, debts: &[Debt]) -> DebtSummary {
    let mut summary = DebtSummary::default();

    for debt in debts {
        if debt.is_payer(member) {
            let outstanding = debt.outstanding_total();
            if outstanding > Decimal::ZERO {
                summary.total_receivable += outstanding;
                summary.lines.push(DebtSummaryLine::OwedToMe {
                    debt_id: debt.id.clone(),
                    description: debt.description.clone(),
                    outstanding,
                });
            }
            continue;
        }

        if let Some(entry) = debt.debtors.get(member) {
            if entry.status == ParticipationStatus::Unpaid {
                summary.total_payable += entry.amount_owed;
                summary.lines.push(DebtSummaryLine::IOwe {
                    debt_id: debt.id.clone(),
                    description: debt.description.clone(),
                    payer_id: debt.payer_id.clone(),
                    payer_nickname: debt.payer_nickname.clone(),
                    amount: entry.amount_owed,
                });
            }
        }
    }

    tracing::debug!(
        member = %member,
        lines = summary.lines.len(),
        "Debt summary built"
    );

    summary
}

//! Netted group expenses
//!
//! An expense is immutable once created. The only lifecycle step after
//! creation is deletion, which only the payer may request.

use crate::{Error, Result};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use split_core::money::{split_evenly, validate_amount};
use split_core::{Member, MemberId, ParticipationStatus, SplitPolicy};
use std::collections::HashSet;
use std::fmt;
use uuid::Uuid;

/// Expense identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExpenseId(String);

impl ExpenseId {
    /// Create from an existing storage id
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a fresh time-ordered id
    pub fn generate() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    /// Get as string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ExpenseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Member taking part in an expense
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    /// Member ID
    pub member_id: MemberId,

    /// Nickname at the time the expense was recorded
    pub nickname: Option<String>,

    /// Share of the total this member owes
    pub amount_owed: Decimal,

    /// Payment status (the payer's own share is always paid)
    pub status: ParticipationStatus,
}

/// Shared group expense
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    /// Expense ID
    pub id: ExpenseId,

    /// What the money was spent on
    pub description: String,

    /// Member who paid
    pub payer_id: MemberId,

    /// Payer nickname at the time the expense was recorded
    pub payer_nickname: Option<String>,

    /// Total amount paid
    pub total_amount: Decimal,

    /// Members sharing the cost
    pub participants: Vec<Participant>,

    /// Creation timestamp (set by storage for imported records)
    pub created_at: Option<DateTime<Utc>>,
}

impl Expense {
    /// Record a new expense paid by `payer` and split among `participants`
    pub fn create(
        description: &str,
        total_amount: Decimal,
        payer: &Member,
        participants: &[Member],
        policy: SplitPolicy,
    ) -> Result<Self> {
        let description = description.trim();
        if description.is_empty() {
            return Err(Error::Validation("Expense description is required".into()));
        }
        validate_amount(total_amount)?;
        if payer.id.is_blank() {
            return Err(Error::Validation("Expense payer is required".into()));
        }
        if participants.is_empty() {
            return Err(Error::Validation(
                "Select at least one participant for the split".into(),
            ));
        }
        ensure_distinct(participants.iter().map(|m| &m.id))?;

        let shares = split_evenly(total_amount, participants.len(), policy)?;
        let participants = participants
            .iter()
            .zip(shares)
            .map(|(member, share)| Participant {
                member_id: member.id.clone(),
                nickname: Some(member.nickname.clone()),
                amount_owed: share,
                status: if member.id == payer.id {
                    ParticipationStatus::Paid
                } else {
                    ParticipationStatus::Unpaid
                },
            })
            .collect();

        let expense = Self {
            id: ExpenseId::generate(),
            description: description.to_string(),
            payer_id: payer.id.clone(),
            payer_nickname: Some(payer.nickname.clone()),
            total_amount,
            participants,
            created_at: Some(Utc::now()),
        };

        tracing::debug!(
            expense = %expense.id,
            payer = %expense.payer_id,
            total = %expense.total_amount,
            participants = expense.participants.len(),
            "Expense recorded"
        );

        Ok(expense)
    }

    /// Check that `requester` may delete this expense
    pub fn authorize_delete(&self, requester: &MemberId) -> Result<()> {
        if *requester != self.payer_id {
            tracing::warn!(
                expense = %self.id,
                requester = %requester,
                "Rejected expense deletion by non-payer"
            );
            return Err(Error::Unauthorized {
                expense_id: self.id.to_string(),
                requester: requester.to_string(),
            });
        }
        Ok(())
    }

    /// Participants still owing their share, payer excluded
    pub fn outstanding_debtors(&self) -> impl Iterator<Item = &Participant> {
        self.participants.iter().filter(move |p| {
            p.status == ParticipationStatus::Unpaid && p.member_id != self.payer_id
        })
    }

    /// Every member id the expense references (payer first)
    pub fn referenced_members(&self) -> impl Iterator<Item = &MemberId> {
        std::iter::once(&self.payer_id).chain(self.participants.iter().map(|p| &p.member_id))
    }
}

/// Order an expense history newest first; undated records go last
pub fn sort_newest_first(expenses: &mut [Expense]) {
    expenses.sort_by(|a, b| match (a.created_at, b.created_at) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });
}

/// Reject blank or repeated member ids
pub(crate) fn ensure_distinct<'a, I>(ids: I) -> Result<()>
where
    I: IntoIterator<Item = &'a MemberId>,
{
    let mut seen = HashSet::new();
    for id in ids {
        if id.is_blank() {
            return Err(Error::Validation("Participant id must not be empty".into()));
        }
        if !seen.insert(id) {
            return Err(Error::Validation(format!(
                "Participant {} listed more than once",
                id
            )));
        }
    }
    Ok(())
}

//! Debt record types

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use split_core::{MemberId, ParticipationStatus};
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

/// Debt identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DebtId(String);

impl DebtId {
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

impl fmt::Display for DebtId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What a single debtor owes on a debt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebtorEntry {
    /// Amount owed to the payer
    pub amount_owed: Decimal,

    /// Payment status
    pub status: ParticipationStatus,
}

/// Peer-to-peer debt shared inside a group
///
/// Unlike netted expenses, debts are tracked one by one and settled as a
/// whole by the payer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Debt {
    /// Debt ID
    pub id: DebtId,

    /// What the debt is for
    pub description: String,

    /// Total amount
    pub total_amount: Decimal,

    /// Member who paid and is owed
    pub payer_id: MemberId,

    /// Payer nickname at the time of creation
    pub payer_nickname: Option<String>,

    /// Everyone sharing the cost (may include the payer)
    pub members_involved: Vec<MemberId>,

    /// `total_amount / members_involved.len()`
    pub amount_per_person: Decimal,

    /// Debtors (payer excluded), ordered by member id
    pub debtors: BTreeMap<MemberId, DebtorEntry>,

    /// Creation timestamp
    pub created_at: Option<DateTime<Utc>>,
}

impl Debt {
    /// Attach the payer's nickname
    pub fn with_payer_nickname(mut self, nickname: impl Into<String>) -> Self {
        self.payer_nickname = Some(nickname.into());
        self
    }

    /// Every debtor has paid (vacuously true without debtors)
    pub fn is_fully_settled(&self) -> bool {
        self.debtors
            .values()
            .all(|d| d.status == ParticipationStatus::Paid)
    }

    /// True when `member` owes a share of this debt
    pub fn is_debtor(&self, member: &MemberId) -> bool {
        self.debtors.contains_key(member)
    }

    /// True when `member` is the payer
    pub fn is_payer(&self, member: &MemberId) -> bool {
        self.payer_id == *member
    }

    /// Status of a debtor
    pub fn debtor_status(&self, member: &MemberId) -> Option<ParticipationStatus> {
        self.debtors.get(member).map(|d| d.status)
    }

    /// Sum still unpaid across all debtors
    pub fn outstanding_total(&self) -> Decimal {
        self.debtors
            .values()
            .filter(|d| d.status == ParticipationStatus::Unpaid)
            .map(|d| d.amount_owed)
            .sum()
    }
}

//! Storage document shape for debts

use crate::{types::*, Error, Result};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use split_core::money::ensure_within_limit;
use split_core::{MemberId, ParticipationStatus};
use std::collections::{BTreeMap, HashSet};

/// Raw debt document
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DebtDocument {
    /// Document ID
    pub id: String,

    /// Description
    pub description: String,

    /// Total amount
    #[serde(with = "rust_decimal::serde::float")]
    pub total_amount: Decimal,

    /// Payer member ID
    pub payer_id: String,

    /// Payer nickname
    #[serde(default)]
    pub payer_nickname: Option<String>,

    /// Members sharing the debt
    #[serde(default)]
    pub members_involved: Vec<String>,

    /// Per-person amount
    #[serde(with = "rust_decimal::serde::float")]
    pub amount_per_person: Decimal,

    /// Debtors keyed by member ID
    #[serde(default)]
    pub debtors: BTreeMap<String, DebtorDocument>,

    /// Creation timestamp
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Raw debtor entry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DebtorDocument {
    /// Member ID (duplicated from the map key)
    #[serde(default)]
    pub uid: Option<String>,

    /// Amount owed
    #[serde(with = "rust_decimal::serde::float")]
    pub amount_owed: Decimal,

    /// "paid" or "unpaid"
    pub status: String,
}

impl DebtDocument {
    /// Parse a JSON document
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::Core(split_core::Error::Serialization(e)))
    }
}

impl TryFrom<DebtDocument> for Debt {
    type Error = Error;

    fn try_from(doc: DebtDocument) -> Result<Self> {
        let invalid = |msg: String| Error::Validation(format!("Debt {}: {}", doc.id, msg));

        if doc.id.trim().is_empty() {
            return Err(Error::Validation("Debt document without id".into()));
        }
        if doc.total_amount <= Decimal::ZERO {
            return Err(invalid(format!("non-positive total {}", doc.total_amount)));
        }
        ensure_within_limit(doc.total_amount)?;
        ensure_within_limit(doc.amount_per_person)?;
        if doc.payer_id.trim().is_empty() {
            return Err(invalid("no payer".into()));
        }
        if doc.members_involved.is_empty() {
            return Err(invalid("no members involved".into()));
        }

        let involved: HashSet<&str> = doc.members_involved.iter().map(String::as_str).collect();
        if involved.len() != doc.members_involved.len() {
            return Err(invalid("members involved contains duplicates".into()));
        }

        let mut debtors = BTreeMap::new();
        for (uid, entry) in &doc.debtors {
            if *uid == doc.payer_id {
                return Err(invalid("payer listed as debtor".into()));
            }
            if !involved.contains(uid.as_str()) {
                return Err(invalid(format!("debtor {} is not involved", uid)));
            }
            let status = ParticipationStatus::from_code(&entry.status)
                .ok_or_else(|| invalid(format!("debtor {} has unknown status '{}'", uid, entry.status)))?;
            if entry.amount_owed < Decimal::ZERO {
                return Err(invalid(format!("debtor {} has negative amount", uid)));
            }
            ensure_within_limit(entry.amount_owed)?;

            debtors.insert(
                MemberId::new(uid.clone()),
                DebtorEntry {
                    amount_owed: entry.amount_owed,
                    status,
                },
            );
        }

        Ok(Debt {
            id: DebtId::new(doc.id.clone()),
            description: doc.description.clone(),
            total_amount: doc.total_amount,
            payer_id: MemberId::new(doc.payer_id.clone()),
            payer_nickname: doc.payer_nickname.clone(),
            members_involved: doc.members_involved.iter().cloned().map(MemberId::new).collect(),
            amount_per_person: doc.amount_per_person,
            debtors,
            created_at: doc.created_at,
        })
    }
}

impl From<&Debt> for DebtDocument {
    fn from(debt: &Debt) -> Self {
        Self {
            id: debt.id.to_string(),
            description: debt.description.clone(),
            total_amount: debt.total_amount,
            payer_id: debt.payer_id.to_string(),
            payer_nickname: debt.payer_nickname.clone(),
            members_involved: debt.members_involved.iter().map(MemberId::to_string).collect(),
            amount_per_person: debt.amount_per_person,
            debtors: debt
                .debtors
                .iter()
                .map(|(uid, entry)| {
                    (
                        uid.to_string(),
                        DebtorDocument {
                            uid: Some(uid.to_string()),
                            amount_owed: entry.amount_owed,
                            status: entry.status.code().to_string(),
                        },
                    )
                })
                .collect(),
            created_at: debt.created_at,
        }
    }
}

//! Storage document shapes for expenses
//!
//! The document store hands expenses over as loosely typed JSON. These
//! structs mirror that shape (camelCase, JS numbers) and are converted into
//! `Expense` at the boundary so the engine only ever sees validated data.

use crate::expense::{ensure_distinct, Expense, ExpenseId, Participant};
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use split_core::money::ensure_within_limit;
use split_core::{MemberId, ParticipationStatus};

/// Raw expense document
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseDocument {
    /// Document ID
    pub id: String,

    /// Description
    #[serde(default)]
    pub description: String,

    /// Payer member ID
    pub payer_id: String,

    /// Payer nickname
    #[serde(default)]
    pub payer_nickname: Option<String>,

    /// Total amount
    #[serde(with = "rust_decimal::serde::float")]
    pub total_amount: Decimal,

    /// Participants
    #[serde(default)]
    pub participants: Vec<ParticipantDocument>,

    /// Creation timestamp
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Raw participant entry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantDocument {
    /// Member ID
    pub uid: String,

    /// Nickname
    #[serde(default)]
    pub nickname: Option<String>,

    /// Share owed
    #[serde(with = "rust_decimal::serde::float")]
    pub amount_owed: Decimal,

    /// "paid" or "unpaid"
    pub status: String,
}

impl ExpenseDocument {
    /// Parse a JSON document
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::Core(split_core::Error::Serialization(e)))
    }
}

impl TryFrom<ExpenseDocument> for Expense {
    type Error = Error;

    fn try_from(doc: ExpenseDocument) -> Result<Self> {
        if doc.id.trim().is_empty() {
            return Err(Error::Validation("Expense document without id".into()));
        }
        if doc.total_amount <= Decimal::ZERO {
            return Err(Error::Validation(format!(
                "Expense {} has non-positive total {}",
                doc.id, doc.total_amount
            )));
        }
        ensure_within_limit(doc.total_amount)?;

        let payer_id = MemberId::new(doc.payer_id);
        if payer_id.is_blank() {
            return Err(Error::Validation(format!("Expense {} has no payer", doc.id)));
        }

        let participants = doc
            .participants
            .into_iter()
            .map(|p| {
                let status = ParticipationStatus::from_code(&p.status).ok_or_else(|| {
                    Error::Validation(format!(
                        "Expense {} participant {} has unknown status '{}'",
                        doc.id, p.uid, p.status
                    ))
                })?;
                ensure_within_limit(p.amount_owed)?;
                Ok(Participant {
                    member_id: MemberId::new(p.uid),
                    nickname: p.nickname,
                    amount_owed: p.amount_owed,
                    status,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        ensure_distinct(participants.iter().map(|p| &p.member_id))?;

        Ok(Expense {
            id: ExpenseId::new(doc.id),
            description: doc.description,
            payer_id,
            payer_nickname: doc.payer_nickname,
            total_amount: doc.total_amount,
            participants,
            created_at: doc.created_at,
        })
    }
}

impl From<&Expense> for ExpenseDocument {
    fn from(expense: &Expense) -> Self {
        Self {
            id: expense.id.to_string(),
            description: expense.description.clone(),
            payer_id: expense.payer_id.to_string(),
            payer_nickname: expense.payer_nickname.clone(),
            total_amount: expense.total_amount,
            participants: expense
                .participants
                .iter()
                .map(|p| ParticipantDocument {
                    uid: p.member_id.to_string(),
                    nickname: p.nickname.clone(),
                    amount_owed: p.amount_owed,
                    status: p.status.code().to_string(),
                })
                .collect(),
            created_at: expense.created_at,
        }
    }
}

/// Validate a snapshot of documents, failing on the first bad one
pub fn expenses_from_documents<I>(documents: I) -> Result<Vec<Expense>>
where
    I: IntoIterator<Item = ExpenseDocument>,
{
    documents.into_iter().map(Expense::try_from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const DINNER: &str = r#"{
        "id": "exp-1",
        "description": "Dinner",
        "payerId": "p",
        "payerNickname": "Paula",
        "totalAmount": 90.5,
        "participants": [
            {"uid": "p", "nickname": "Paula", "amountOwed": 45.25, "status": "paid"},
            {"uid": "a", "nickname": "Artur", "amountOwed": 45.25, "status": "unpaid"}
        ]
    }"#;

    #[test]
    fn test_document_to_expense() {
        let doc = ExpenseDocument::from_json(DINNER).unwrap();
        let expense = Expense::try_from(doc).unwrap();

        assert_eq!(expense.id.as_str(), "exp-1");
        assert_eq!(expense.total_amount, dec!(90.5));
        assert_eq!(expense.participants[1].status, ParticipationStatus::Unpaid);
        assert!(expense.created_at.is_none());
    }

    #[test]
    fn test_document_rejects_unknown_status() {
        let json = DINNER.replace("\"unpaid\"", "\"pending\"");
        let doc = ExpenseDocument::from_json(&json).unwrap();

        assert!(matches!(Expense::try_from(doc), Err(Error::Validation(_))));
    }

    #[test]
    fn test_document_rejects_non_positive_total() {
        let json = DINNER.replace("90.5", "0");
        let doc = ExpenseDocument::from_json(&json).unwrap();

        assert!(matches!(Expense::try_from(doc), Err(Error::Validation(_))));
    }

    #[test]
    fn test_document_rejects_oversized_total() {
        let mut doc = ExpenseDocument::from_json(DINNER).unwrap();
        doc.total_amount = Decimal::MAX / dec!(2);

        let err = Expense::try_from(doc).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_document_requires_payer() {
        let json = DINNER.replace("\"payerId\": \"p\"", "\"payerId\": \"\"");
        let doc = ExpenseDocument::from_json(&json).unwrap();

        assert!(matches!(Expense::try_from(doc), Err(Error::Validation(_))));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            ExpenseDocument::from_json("{\"id\": 1"),
            Err(Error::Core(split_core::Error::Serialization(_)))
        ));
    }
}

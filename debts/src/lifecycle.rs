//! Debt record lifecycle
//!
//! ```text
//! create ──► unpaid debtors ──mark_fully_settled──► all debtors paid
//!               ▲     │
//!               └─edit┘   (payment state reset)
//! ```
//!
//! Settlement is all-or-nothing: there is no operation that
//! marks a single debtor as paid. Settle, edit and delete are payer-only.
//! Every transition validates before touching the record, so a rejected
//! call leaves the debt exactly as it was.

use crate::{types::*, Error, Result};
use chrono::Utc;
use rust_decimal::Decimal;
use split_core::money::{ensure_within_limit, per_person, split_evenly};
use split_core::{Config, MemberId, ParticipationStatus, SplitPolicy};
use std::collections::{BTreeMap, HashSet};

/// Debt lifecycle manager
#[derive(Debug, Clone, Default)]
pub struct DebtManager {
    split: SplitPolicy,
}

/// Validated description, total and member set
struct DebtTerms {
    description: String,
    total_amount: Decimal,
    members_involved: Vec<MemberId>,
}

impl DebtManager {
    /// Create new debt manager
    pub fn new(split: SplitPolicy) -> Self {
        Self { split }
    }

    /// Create from workspace configuration
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.split)
    }

    /// Record a new debt paid by `payer_id`
    pub fn create(
        &self,
        description: &str,
        total_amount: Decimal,
        payer_id: &MemberId,
        involved_member_ids: &[MemberId],
    ) -> Result<Debt> {
        if payer_id.is_blank() {
            return Err(Error::Validation("Debt payer is required".into()));
        }
        let terms = validate_terms(description, total_amount, involved_member_ids)?;
        let (amount_per_person, debtors) = self.split_debtors(&terms, payer_id)?;

        let debt = Debt {
            id: DebtId::generate(),
            description: terms.description,
            total_amount: terms.total_amount,
            payer_id: payer_id.clone(),
            payer_nickname: None,
            members_involved: terms.members_involved,
            amount_per_person,
            debtors,
            created_at: Some(Utc::now()),
        };

        tracing::info!(
            debt = %debt.id,
            payer = %debt.payer_id,
            total = %debt.total_amount,
            debtors = debt.debtors.len(),
            "Debt created"
        );

        Ok(debt)
    }

    /// Mark every debtor as paid
    pub fn mark_fully_settled(&self, debt: &mut Debt, requester: &MemberId) -> Result<()> {
        authorize(debt, requester, "settle")?;

        for entry in debt.debtors.values_mut() {
            entry.status = ParticipationStatus::Paid;
        }

        tracing::info!(debt = %debt.id, debtors = debt.debtors.len(), "Debt fully settled");
        Ok(())
    }

    /// Replace description, total and member set
    ///
    /// Per-person amount is recomputed and every debtor of the new member set
    /// starts out unpaid again.
    pub fn edit(
        &self,
        debt: &mut Debt,
        requester: &MemberId,
        new_description: &str,
        new_total_amount: Decimal,
        new_involved_member_ids: &[MemberId],
    ) -> Result<()> {
        authorize(debt, requester, "edit")?;
        let terms = validate_terms(new_description, new_total_amount, new_involved_member_ids)?;
        let (amount_per_person, debtors) = self.split_debtors(&terms, &debt.payer_id)?;

        let had_payments = debt
            .debtors
            .values()
            .any(|d| d.status == ParticipationStatus::Paid);
        if had_payments {
            tracing::debug!(debt = %debt.id, "Edit discards recorded payments");
        }

        debt.description = terms.description;
        debt.total_amount = terms.total_amount;
        debt.members_involved = terms.members_involved;
        debt.amount_per_person = amount_per_person;
        debt.debtors = debtors;

        tracing::info!(debt = %debt.id, total = %debt.total_amount, "Debt edited");
        Ok(())
    }

    /// Authorize removal, returning the id the storage layer should delete
    pub fn delete(&self, debt: &Debt, requester: &MemberId) -> Result<DebtId> {
        authorize(debt, requester, "delete")?;

        tracing::info!(debt = %debt.id, "Debt deleted");
        Ok(debt.id.clone())
    }

    /// Per-person amount and unpaid debtor map (payer excluded)
    fn split_debtors(
        &self,
        terms: &DebtTerms,
        payer_id: &MemberId,
    ) -> Result<(Decimal, BTreeMap<MemberId, DebtorEntry>)> {
        let count = terms.members_involved.len();
        let amount_per_person = per_person(terms.total_amount, count)?;
        let shares = split_evenly(terms.total_amount, count, self.split)?;

        let debtors = terms
            .members_involved
            .iter()
            .zip(shares)
            .filter(|(member, _)| *member != payer_id)
            .map(|(member, share)| {
                (
                    member.clone(),
                    DebtorEntry {
                        amount_owed: share,
                        status: ParticipationStatus::Unpaid,
                    },
                )
            })
            .collect();

        Ok((amount_per_person, debtors))
    }
}

fn authorize(debt: &Debt, requester: &MemberId, action: &str) -> Result<()> {
    if debt.is_payer(requester) {
        return Ok(());
    }

    tracing::warn!(
        debt = %debt.id,
        requester = %requester,
        action,
        "Rejected debt action by non-payer"
    );
    Err(Error::Unauthorized {
        debt_id: debt.id.to_string(),
        requester: requester.to_string(),
    })
}

fn validate_terms(
    description: &str,
    total_amount: Decimal,
    involved_member_ids: &[MemberId],
) -> Result<DebtTerms> {
    let description = description.trim();
    if description.is_empty() {
        return Err(Error::Validation("Debt description is required".into()));
    }

    if total_amount <= Decimal::ZERO {
        return Err(Error::Validation(format!(
            "Debt amount must be positive, got {}",
            total_amount
        )));
    }
    ensure_within_limit(total_amount)?;

    if involved_member_ids.is_empty() {
        return Err(Error::Validation(
            "Select at least one member to share the debt".into(),
        ));
    }

    let mut seen = HashSet::new();
    for member in involved_member_ids {
        if member.is_blank() {
            return Err(Error::Validation("Member id must not be empty".into()));
        }
        if !seen.insert(member) {
            return Err(Error::Validation(format!(
                "Member {} listed more than once",
                member
            )));
        }
    }

    Ok(DebtTerms {
        description: description.to_string(),
        total_amount,
        members_involved: involved_member_ids.to_vec(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn ids(ids: &[&str]) -> Vec<MemberId> {
        ids.iter().map(|id| MemberId::new(*id)).collect()
    }

    fn dinner(manager: &DebtManager) -> Debt {
        manager
            .create("Dinner", dec!(90.00), &MemberId::new("P"), &ids(&["P", "A", "B", "C"]))
            .unwrap()
    }

    #[test]
    fn test_even_split_excludes_payer() {
        let manager = DebtManager::default();
        let debt = manager
            .create("Dinner", dec!(90.00), &MemberId::new("P"), &ids(&["P", "A", "B"]))
            .unwrap();

        assert_eq!(debt.amount_per_person, dec!(30.00));
        assert_eq!(debt.debtors.len(), 2);
        assert!(!debt.is_debtor(&MemberId::new("P")));
        assert_eq!(debt.debtor_status(&MemberId::new("A")), Some(ParticipationStatus::Unpaid));
        assert_eq!(debt.outstanding_total(), dec!(60.00));
        assert!(!debt.is_fully_settled());
    }

    #[test]
    fn test_payer_counts_toward_split() {
        let debt = dinner(&DebtManager::default());

        assert_eq!(debt.amount_per_person, dec!(22.50));
        assert_eq!(debt.debtors.keys().cloned().collect::<Vec<_>>(), ids(&["A", "B", "C"]));
        assert_eq!(debt.outstanding_total(), dec!(67.50));
    }

    #[test]
    fn test_payer_not_involved() {
        let manager = DebtManager::default();
        let debt = manager
            .create("Gift", dec!(50), &MemberId::new("P"), &ids(&["A", "B"]))
            .unwrap();

        assert_eq!(debt.amount_per_person, dec!(25));
        assert_eq!(debt.outstanding_total(), dec!(50));
    }

    #[test]
    fn test_create_validation() {
        let manager = DebtManager::default();
        let payer = MemberId::new("P");

        for (description, amount, involved) in [
            ("", dec!(10), ids(&["A"])),
            ("   ", dec!(10), ids(&["A"])),
            ("Taxi", dec!(0), ids(&["A"])),
            ("Taxi", dec!(-3), ids(&["A"])),
            ("Taxi", dec!(10), vec![]),
            ("Taxi", dec!(10), ids(&["A", "A"])),
        ] {
            let result = manager.create(description, amount, &payer, &involved);
            assert!(matches!(result, Err(Error::Validation(_))), "{:?}", description);
        }
    }

    #[test]
    fn test_oversized_total_rejected() {
        let manager = DebtManager::default();
        let payer = MemberId::new("P");

        let result = manager.create("Yacht", Decimal::MAX, &payer, &ids(&["P", "A"]));
        assert!(matches!(result, Err(Error::Core(split_core::Error::Validation(_)))));

        let mut debt = dinner(&manager);
        let before = debt.clone();
        assert!(manager
            .edit(&mut debt, &payer, "Yacht", Decimal::MAX, &ids(&["P", "A"]))
            .is_err());
        assert_eq!(debt, before);
    }

    #[test]
    fn test_mark_fully_settled() {
        let manager = DebtManager::default();
        let mut debt = dinner(&manager);

        manager
            .mark_fully_settled(&mut debt, &MemberId::new("P"))
            .unwrap();

        assert!(debt.is_fully_settled());
        assert_eq!(debt.outstanding_total(), Decimal::ZERO);
        assert!(debt
            .debtors
            .values()
            .all(|d| d.status == ParticipationStatus::Paid));
    }

    #[test]
    fn test_non_payer_cannot_settle() {
        let manager = DebtManager::default();
        let mut debt = dinner(&manager);
        let before = debt.clone();

        let result = manager.mark_fully_settled(&mut debt, &MemberId::new("A"));

        assert!(matches!(result, Err(Error::Unauthorized { .. })));
        assert_eq!(debt, before);
    }

    #[test]
    fn test_edit_resets_payments() {
        let manager = DebtManager::default();
        let payer = MemberId::new("P");
        let mut debt = dinner(&manager);
        manager.mark_fully_settled(&mut debt, &payer).unwrap();

        manager
            .edit(&mut debt, &payer, "Dinner + dessert", dec!(120), &ids(&["P", "A", "D"]))
            .unwrap();

        assert_eq!(debt.description, "Dinner + dessert");
        assert_eq!(debt.amount_per_person, dec!(40));
        assert_eq!(debt.debtors.keys().cloned().collect::<Vec<_>>(), ids(&["A", "D"]));
        assert!(debt
            .debtors
            .values()
            .all(|d| d.status == ParticipationStatus::Unpaid));
    }

    #[test]
    fn test_edit_rejections_leave_debt_unchanged() {
        let manager = DebtManager::default();
        let mut debt = dinner(&manager);
        let before = debt.clone();

        let result = manager.edit(&mut debt, &MemberId::new("A"), "Hack", dec!(1), &ids(&["A"]));
        assert!(matches!(result, Err(Error::Unauthorized { .. })));

        let result = manager.edit(&mut debt, &MemberId::new("P"), "Dinner", dec!(0), &ids(&["A"]));
        assert!(matches!(result, Err(Error::Validation(_))));

        assert_eq!(debt, before);
    }

    #[test]
    fn test_delete_is_payer_only() {
        let manager = DebtManager::default();
        let debt = dinner(&manager);

        assert_eq!(manager.delete(&debt, &MemberId::new("P")).unwrap(), debt.id);
        assert!(matches!(
            manager.delete(&debt, &MemberId::new("B")),
            Err(Error::Unauthorized { .. })
        ));
    }

    #[test]
    fn test_largest_remainder_debtor_shares() {
        let manager = DebtManager::new(SplitPolicy::LargestRemainder { scale: 2 });
        let debt = manager
            .create("Taxi", dec!(10.00), &MemberId::new("C"), &ids(&["A", "B", "C"]))
            .unwrap();

        assert_eq!(debt.debtors[&MemberId::new("A")].amount_owed, dec!(3.34));
        assert_eq!(debt.debtors[&MemberId::new("B")].amount_owed, dec!(3.33));
        assert_eq!(debt.outstanding_total(), dec!(6.67));
    }
}

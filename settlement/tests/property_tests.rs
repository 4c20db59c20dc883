//! Property-based tests for netting invariants
//!
//! These tests use proptest to verify:
//! - Conservation: Σ(credits − debts) == 0 over all members
//! - Mutual exclusivity: at most one direction per pair is non-zero
//! - Idempotence: same snapshot → same balances
//! - Completeness: every roster member appears exactly once

use proptest::prelude::*;
use rust_decimal::Decimal;
use settlement::{net_balances, Expense, ExpenseId, MemberBalance, NettingEngine, Participant};
use split_core::{config::NettingConfig, MemberId, ParticipationStatus, Roster, SplitPolicy};

const POOL: [&str; 5] = ["ana", "beto", "caio", "duda", "edu"];

/// Strategy for generating valid amounts (positive decimals)
fn amount_strategy() -> impl Strategy<Value = Decimal> {
    (1i64..1_000_00i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy for generating expenses over the member pool
fn expense_strategy() -> impl Strategy<Value = Expense> {
    (
        0usize..POOL.len(),
        amount_strategy(),
        prop::sample::subsequence(POOL.to_vec(), 1..=POOL.len()),
    )
        .prop_map(|(payer, total, participants)| {
            let payer_id = MemberId::new(POOL[payer]);
            let share = total / Decimal::from(participants.len());
            Expense {
                id: ExpenseId::generate(),
                description: "generated".to_string(),
                payer_id: payer_id.clone(),
                payer_nickname: None,
                total_amount: total,
                participants: participants
                    .into_iter()
                    .map(|uid| Participant {
                        member_id: MemberId::new(uid),
                        nickname: None,
                        amount_owed: share,
                        status: if uid == payer_id.as_str() {
                            ParticipationStatus::Paid
                        } else {
                            ParticipationStatus::Unpaid
                        },
                    })
                    .collect(),
                created_at: None,
            }
        })
}

fn roster_ids() -> Vec<MemberId> {
    POOL.iter().map(|id| MemberId::new(*id)).collect()
}

fn find<'a>(balances: &'a [MemberBalance], id: &MemberId) -> &'a MemberBalance {
    balances.iter().find(|b| b.member_id == *id).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Property: money is neither created nor destroyed by netting
    #[test]
    fn prop_netting_conserves_money(expenses in prop::collection::vec(expense_strategy(), 0..30)) {
        let balances = net_balances(&expenses, &roster_ids()).unwrap();
        let total: Decimal = balances.iter().map(MemberBalance::net_position).sum();

        prop_assert_eq!(total, Decimal::ZERO);
    }

    /// Property: a pair never owes in both directions
    #[test]
    fn prop_mutual_exclusivity(expenses in prop::collection::vec(expense_strategy(), 0..30)) {
        let balances = net_balances(&expenses, &roster_ids()).unwrap();

        for balance in &balances {
            for debt in &balance.debts {
                prop_assert!(debt.amount > Decimal::ZERO);
                let counterpart = find(&balances, &debt.to);
                prop_assert_eq!(counterpart.owes(&balance.member_id), Decimal::ZERO);
            }
        }
    }

    /// Property: every debt has a matching credit on the other side
    #[test]
    fn prop_debts_mirror_credits(expenses in prop::collection::vec(expense_strategy(), 0..30)) {
        let balances = net_balances(&expenses, &roster_ids()).unwrap();

        for balance in &balances {
            for debt in &balance.debts {
                let creditor = find(&balances, &debt.to);
                let credit = creditor
                    .credits
                    .iter()
                    .find(|c| c.from == balance.member_id)
                    .map(|c| c.amount);
                prop_assert_eq!(credit, Some(debt.amount));
            }
        }
    }

    /// Property: running twice on the same snapshot gives identical output
    #[test]
    fn prop_idempotent(expenses in prop::collection::vec(expense_strategy(), 0..30)) {
        let engine = NettingEngine::default();
        let roster = Roster::from_ids(roster_ids());

        let first = engine.net_balances(&expenses, &roster).unwrap();
        let second = engine.net_balances(&expenses, &roster).unwrap();

        prop_assert_eq!(first, second);
    }

    /// Property: each roster member is reported exactly once, in roster order
    #[test]
    fn prop_every_member_reported_once(
        expenses in prop::collection::vec(expense_strategy(), 0..30),
        roster in prop::sample::subsequence(POOL.to_vec(), 0..=POOL.len()),
    ) {
        let ids: Vec<MemberId> = roster.iter().map(|id| MemberId::new(*id)).collect();
        let balances = net_balances(&expenses, &ids).unwrap();

        let reported: Vec<MemberId> = balances.iter().map(|b| b.member_id.clone()).collect();
        prop_assert_eq!(reported, ids);
    }

    /// Property: the largest-remainder policy also conserves money
    #[test]
    fn prop_largest_remainder_conserves(expenses in prop::collection::vec(expense_strategy(), 0..30)) {
        let engine = NettingEngine::new(
            NettingConfig::default(),
            SplitPolicy::LargestRemainder { scale: 2 },
        );
        let balances = engine
            .net_balances(&expenses, &Roster::from_ids(roster_ids()))
            .unwrap();
        let total: Decimal = balances.iter().map(MemberBalance::net_position).sum();

        prop_assert_eq!(total, Decimal::ZERO);
    }
}

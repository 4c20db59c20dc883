//! Netting throughput for growing groups

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rust_decimal::Decimal;
use settlement::{Expense, ExpenseId, NettingEngine, Participant};
use split_core::{MemberId, ParticipationStatus, Roster};

fn group_history(members: usize, expenses: usize) -> (Roster, Vec<Expense>) {
    let ids: Vec<MemberId> = (0..members).map(|i| MemberId::new(format!("m{}", i))).collect();

    let history = (0..expenses)
        .map(|n| {
            let payer = ids[n % members].clone();
            let total = Decimal::new(1_000 + (n as i64 * 37) % 50_000, 2);
            let share = total / Decimal::from(members);
            Expense {
                id: ExpenseId::new(format!("e{}", n)),
                description: "bench".to_string(),
                payer_id: payer.clone(),
                payer_nickname: None,
                total_amount: total,
                participants: ids
                    .iter()
                    .map(|id| Participant {
                        member_id: id.clone(),
                        nickname: None,
                        amount_owed: share,
                        status: if *id == payer {
                            ParticipationStatus::Paid
                        } else {
                            ParticipationStatus::Unpaid
                        },
                    })
                    .collect(),
                created_at: None,
            }
        })
        .collect();

    (Roster::from_ids(ids), history)
}

fn bench_net_balances(c: &mut Criterion) {
    let engine = NettingEngine::default();
    let mut group = c.benchmark_group("net_balances");

    for members in [4usize, 12, 30] {
        let (roster, history) = group_history(members, 500);
        group.bench_with_input(BenchmarkId::from_parameter(members), &members, |b, _| {
            b.iter(|| engine.net_balances(black_box(&history), black_box(&roster)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_net_balances);
criterion_main!(benches);

//! Money arithmetic
//!
//! Shares are computed in exact decimal. Two split policies exist:
//!
//! - `FullPrecision`: every participant owes `total / count`, kept at full
//!   precision (28 significant digits). Rounding happens only at display.
//! - `LargestRemainder`: shares are cut to `scale` decimal places and the
//!   leftover minor units are handed out one by one. All shares carry the
//!   same fractional remainder, so the leftover goes to the first
//!   participants in input order. Shares sum exactly to the total.
//!
//! ```text
//! 100.00 / 3, FullPrecision      → 33.333..., 33.333..., 33.333...
//! 100.00 / 3, LargestRemainder 2 → 33.34, 33.33, 33.33
//! ```

use crate::{Error, Result};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Default currency scale (cents)
pub const CURRENCY_SCALE: u32 = 2;

/// Largest single amount accepted at the boundary (one trillion)
///
/// Sums over any realistic number of expenses or debts stay far below
/// `Decimal::MAX` with this cap.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(0xD4A5_1000, 0xE8, 0, false, 0);

/// How a total is divided among participants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum SplitPolicy {
    /// Exact quotient, rounded only for display
    FullPrecision,
    /// Minor-unit shares, remainder distributed in participant order
    LargestRemainder {
        /// Decimal places of the minor unit
        scale: u32,
    },
}

impl Default for SplitPolicy {
    fn default() -> Self {
        SplitPolicy::FullPrecision
    }
}

/// Parse a user-entered amount
///
/// Accepts `,` or `.` as decimal separator. The result must be positive
/// and no larger than [`MAX_AMOUNT`].
pub fn parse_amount(input: &str) -> Result<Decimal> {
    let normalized = input.trim().replace(',', ".");
    if normalized.is_empty() {
        return Err(Error::Validation("Amount is required".into()));
    }

    let amount = Decimal::from_str(&normalized)
        .map_err(|e| Error::Validation(format!("Invalid amount '{}': {}", input.trim(), e)))?;

    validate_amount(amount)?;
    Ok(amount)
}

/// Reject zero, negative and oversized amounts
pub fn validate_amount(amount: Decimal) -> Result<()> {
    if amount <= Decimal::ZERO {
        return Err(Error::Validation(format!(
            "Amount must be positive, got {}",
            amount
        )));
    }
    ensure_within_limit(amount)
}

/// Reject amounts above [`MAX_AMOUNT`]
pub fn ensure_within_limit(amount: Decimal) -> Result<()> {
    if amount > MAX_AMOUNT {
        return Err(Error::Validation(format!(
            "Amount {} exceeds maximum {}",
            amount, MAX_AMOUNT
        )));
    }
    Ok(())
}

/// Nominal per-person share: `total / count` at full precision
pub fn per_person(total: Decimal, count: usize) -> Result<Decimal> {
    if count == 0 {
        return Err(Error::Validation(
            "Cannot split an amount among zero participants".into(),
        ));
    }

    total
        .checked_div(Decimal::from(count))
        .ok_or_else(|| Error::Validation(format!("Cannot divide {} by {}", total, count)))
}

/// Divide `total` into `count` shares according to `policy`
pub fn split_evenly(total: Decimal, count: usize, policy: SplitPolicy) -> Result<Vec<Decimal>> {
    let share = per_person(total, count)?;

    match policy {
        SplitPolicy::FullPrecision => Ok(vec![share; count]),
        SplitPolicy::LargestRemainder { scale } => {
            let base = share.round_dp_with_strategy(scale, RoundingStrategy::ToZero);
            let unit = Decimal::new(1, scale);
            let remainder = total - base * Decimal::from(count);

            // Whole minor units left over after truncation (always < count)
            let extra_units = (remainder / unit)
                .trunc()
                .to_usize()
                .unwrap_or(0)
                .min(count);

            let mut shares: Vec<Decimal> = (0..count)
                .map(|i| if i < extra_units { base + unit } else { base })
                .collect();

            // Sub-unit residue only exists when total has more places than scale
            let residue = total - shares.iter().copied().sum::<Decimal>();
            if residue != Decimal::ZERO {
                shares[0] += residue;
            }

            Ok(shares)
        }
    }
}

/// Round an amount for presentation (midpoint away from zero)
pub fn round_for_display(amount: Decimal, scale: u32) -> Decimal {
    amount.round_dp_with_strategy(scale, RoundingStrategy::MidpointAwayFromZero)
}

/// True when the amount exceeds the materiality threshold
///
/// Anything at or below the threshold is treated as settled.
pub fn is_material(amount: Decimal, threshold: Decimal) -> bool {
    amount > threshold
}

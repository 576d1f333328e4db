use crate::core::models::recommendation::CardAccount;
use crate::core::models::split::PaymentSplitEntry;
use crate::core::money::{round_cents, sum_amounts};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use utoipa::ToSchema;

const MONTHS_PER_YEAR: Decimal = Decimal::from_parts(12, 0, 0, false, 0);

/// Card utilization in percent, before and after the split is paid.
#[derive(Clone, Debug, Serialize, ToSchema, PartialEq)]
pub struct UtilizationChange {
    pub before: Decimal,
    pub after: Decimal,
}

#[derive(Clone, Debug, Serialize, ToSchema, PartialEq)]
pub struct SplitSummary {
    pub total: Decimal,
    pub estimated_monthly_interest_saved: Decimal,
    pub utilization: UtilizationChange,
}

impl SplitSummary {
    pub fn new(entries: &[PaymentSplitEntry], cards: &[CardAccount]) -> Self {
        SplitSummary {
            total: sum_amounts(entries.iter().map(|e| &e.amount)),
            estimated_monthly_interest_saved: estimated_monthly_interest_saved(entries),
            utilization: utilization_change(entries, cards),
        }
    }
}

/// One month of interest avoided on each paid amount at its card's APR.
pub fn estimated_monthly_interest_saved(entries: &[PaymentSplitEntry]) -> Decimal {
    let yearly = entries
        .iter()
        .map(|entry| entry.amount.saturating_mul(entry.apr))
        .fold(Decimal::ZERO, Decimal::saturating_add);
    round_cents(yearly / MONTHS_PER_YEAR / Decimal::ONE_HUNDRED)
}

/// Overall utilization across `cards`, before and after paying `entries`.
/// Zero when no card reports a limit.
pub fn utilization_change(entries: &[PaymentSplitEntry], cards: &[CardAccount]) -> UtilizationChange {
    let total_limit = sum_amounts(cards.iter().filter_map(|card| card.credit_limit.as_ref()));
    if total_limit <= Decimal::ZERO {
        return UtilizationChange {
            before: Decimal::ZERO,
            after: Decimal::ZERO,
        };
    }
    let total_balance = sum_amounts(cards.iter().map(|card| &card.balance));
    let total_payment = sum_amounts(entries.iter().map(|e| &e.amount));
    UtilizationChange {
        before: percent(total_balance, total_limit),
        after: percent(total_balance.saturating_sub(total_payment), total_limit),
    }
}

fn percent(part: Decimal, whole: Decimal) -> Decimal {
    part.checked_div(whole)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .unwrap_or(Decimal::MAX)
        .round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
}

use crate::core::errors::NexusError;
use crate::core::models::split::{PaymentSplit, PaymentSplitEntry};
use crate::core::money::{ONE_MINOR_UNIT, round_cents, sum_amounts};
use log::{debug, warn};
use rust_decimal::Decimal;

/// Sets one card's amount and rebalances the other cards so the total stays at
/// `original_total`.
///
/// The edited card can grow only as far as the rest of the pool can pay for it.
/// The difference is taken from, or handed to, the other cards in descending APR
/// order (ties keep their split order). No amount drops below zero and none
/// rises above `original_total`.
///
/// # Errors
/// Fails on an empty split, an index out of range, negative amounts, or a split
/// that is already off its total by more than one minor unit.
pub fn redistribute(
    split: &[PaymentSplitEntry],
    original_total: Decimal,
    edited_index: usize,
    requested_amount: Decimal,
) -> Result<Vec<PaymentSplitEntry>, NexusError> {
    check_preconditions(split, original_total, edited_index)?;

    let mut entries = split.to_vec();
    let requested = round_cents(requested_amount.max(Decimal::ZERO));
    let old_value = entries[edited_index].amount;

    let headroom = (original_total - old_value).max(Decimal::ZERO);
    let delta = (requested - old_value).min(headroom);
    entries[edited_index].amount = old_value + delta;

    let order = priority_order(&entries, edited_index);
    let mut remaining = -delta;
    for &index in &order {
        if remaining.is_zero() {
            break;
        }
        let entry = &mut entries[index];
        if remaining < Decimal::ZERO {
            let adjust = (-remaining).min(entry.amount);
            entry.amount -= adjust;
            remaining += adjust;
        } else {
            let room = (original_total - entry.amount).max(Decimal::ZERO);
            let adjust = remaining.min(room);
            entry.amount += adjust;
            remaining -= adjust;
        }
    }

    absorb_residual(&mut entries, original_total, edited_index, &order);

    debug!(
        "Redistributed card {}: {} -> {} (delta {}), total {}",
        entries[edited_index].card_id,
        old_value,
        entries[edited_index].amount,
        delta,
        original_total
    );
    Ok(entries)
}

/// Indices of every entry but the edited one, highest APR first, stable on ties.
fn priority_order(entries: &[PaymentSplitEntry], edited_index: usize) -> Vec<usize> {
    let mut order: Vec<usize> = (0..entries.len()).filter(|&i| i != edited_index).collect();
    order.sort_by(|&a, &b| entries[b].apr.cmp(&entries[a].apr));
    order
}

/// Puts whatever is left between the sum and the fixed total on the edited entry.
/// If that would push it below zero the shortfall comes off the others.
fn absorb_residual(entries: &mut [PaymentSplitEntry], original_total: Decimal, edited_index: usize, order: &[usize]) {
    let residual = original_total - sum_amounts(entries.iter().map(|e| &e.amount));
    if residual.is_zero() {
        return;
    }
    warn!(
        "Split drifted {} from its total {}, settling on card {}",
        residual, original_total, entries[edited_index].card_id
    );

    let edited = &mut entries[edited_index];
    let absorbed = residual.max(-edited.amount);
    edited.amount += absorbed;

    let mut shortfall = absorbed - residual;
    for &index in order {
        if shortfall.is_zero() {
            break;
        }
        let take = shortfall.min(entries[index].amount);
        entries[index].amount -= take;
        shortfall -= take;
    }
}

fn check_preconditions(
    split: &[PaymentSplitEntry],
    original_total: Decimal,
    edited_index: usize,
) -> Result<(), NexusError> {
    if split.is_empty() {
        return Err(NexusError::EmptySplit);
    }
    if edited_index >= split.len() {
        return Err(NexusError::InvalidSplitIndex {
            index: edited_index,
            len: split.len(),
        });
    }
    if original_total < Decimal::ZERO {
        return Err(NexusError::invalid_input(
            "original_total",
            "Invalid Amount",
            "Original total cannot be negative",
        ));
    }
    if let Some(entry) = split.iter().find(|e| e.amount < Decimal::ZERO) {
        return Err(NexusError::invalid_input(
            "amount",
            "Invalid Amount",
            format!("Amount for card {} cannot be negative", entry.card_id),
        ));
    }
    let actual = sum_amounts(split.iter().map(|e| &e.amount));
    if (actual - original_total).abs() > ONE_MINOR_UNIT {
        return Err(NexusError::SplitOutOfBalance {
            expected: original_total,
            actual,
        });
    }
    Ok(())
}

impl PaymentSplit {
    /// Applies a confirmed edit to one entry, rebalancing the rest.
    pub fn redistribute(&mut self, edited_index: usize, requested_amount: Decimal) -> Result<&[PaymentSplitEntry], NexusError> {
        let updated = redistribute(self.entries(), self.original_total(), edited_index, requested_amount)?;
        self.replace_entries(updated);
        Ok(self.entries())
    }
}

use super::recommendation::{CardAccount, CustomSplitItem, PlanSplitItem, default_card_type};
use crate::core::errors::NexusError;
use crate::core::money::{ONE_MINOR_UNIT, check_amount, check_apr, round_cents, sum_amounts};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use utoipa::ToSchema;

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct PaymentSplitEntry {
    pub card_id: String,
    pub amount: Decimal,
    /// Priority key for redistribution. Never changed by it.
    #[serde(default)]
    pub apr: Decimal,
    #[serde(default = "default_card_type")]
    pub card_type: String,
}

impl PaymentSplitEntry {
    pub fn new(card_id: impl Into<String>, amount: Decimal, apr: Decimal) -> Self {
        PaymentSplitEntry {
            card_id: card_id.into(),
            amount,
            apr,
            card_type: default_card_type(),
        }
    }
}

/// A payment spread across cards whose total stays fixed while the user edits it.
///
/// `original_total` and `recommended` are captured once, when the split is built,
/// and only a fresh split replaces them.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct PaymentSplit {
    entries: Vec<PaymentSplitEntry>,
    original_total: Decimal,
    recommended: Vec<PaymentSplitEntry>,
}

impl PaymentSplit {
    /// Builds a split from entries chosen by hand or already joined with card data.
    pub fn manual(entries: Vec<PaymentSplitEntry>) -> Result<Self, NexusError> {
        let entries: Vec<PaymentSplitEntry> = entries
            .into_iter()
            .map(|entry| PaymentSplitEntry {
                amount: round_cents(entry.amount),
                ..entry
            })
            .collect();
        validate_entries(&entries)?;
        let original_total = sum_amounts(entries.iter().map(|e| &e.amount));
        Ok(PaymentSplit {
            recommended: entries.clone(),
            entries,
            original_total,
        })
    }

    /// Accepts an optimizer plan: zero lines are dropped and APR and card type
    /// are joined from `cards` by card id.
    pub fn from_recommendation(plan_split: &[PlanSplitItem], cards: &[CardAccount]) -> Result<Self, NexusError> {
        let entries = plan_split
            .iter()
            .filter(|item| item.amount > Decimal::ZERO)
            .map(|item| {
                let card = cards.iter().find(|c| c.id == item.card_id);
                PaymentSplitEntry {
                    card_id: item.card_id.clone(),
                    amount: item.amount,
                    apr: card.and_then(|c| c.apr).unwrap_or(Decimal::ZERO),
                    card_type: card.map(|c| c.card_type.clone()).unwrap_or_else(default_card_type),
                }
            })
            .collect();
        Self::manual(entries)
    }

    pub fn entries(&self) -> &[PaymentSplitEntry] {
        &self.entries
    }

    pub fn recommended(&self) -> &[PaymentSplitEntry] {
        &self.recommended
    }

    pub fn original_total(&self) -> Decimal {
        self.original_total
    }

    pub fn total(&self) -> Decimal {
        sum_amounts(self.entries.iter().map(|e| &e.amount))
    }

    pub fn is_balanced(&self) -> bool {
        self.total() == self.original_total
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Restores the values the split was created with, dropping every edit.
    pub fn reset(&mut self) {
        self.entries = self.recommended.clone();
    }

    /// Re-checks a split that came back from a client.
    ///
    /// `recommended` must cover the same cards in the same order and add up to
    /// `original_total` exactly, or a reset could change the total.
    pub fn validate(&self) -> Result<(), NexusError> {
        check_amount("original_total", "Split total", self.original_total)?;
        validate_entries(&self.entries)?;
        validate_entries(&self.recommended)?;
        let same_cards = self.entries.len() == self.recommended.len()
            && self
                .entries
                .iter()
                .zip(&self.recommended)
                .all(|(entry, recommended)| entry.card_id == recommended.card_id);
        if !same_cards {
            return Err(NexusError::invalid_input(
                "recommended",
                "Invalid Split",
                "Recommended amounts must list the same cards as the split",
            ));
        }
        let recommended_total = sum_amounts(self.recommended.iter().map(|e| &e.amount));
        if recommended_total != self.original_total {
            return Err(NexusError::SplitOutOfBalance {
                expected: self.original_total,
                actual: recommended_total,
            });
        }
        let actual = self.total();
        if (actual - self.original_total).abs() > ONE_MINOR_UNIT {
            return Err(NexusError::SplitOutOfBalance {
                expected: self.original_total,
                actual,
            });
        }
        Ok(())
    }

    pub(crate) fn replace_entries(&mut self, entries: Vec<PaymentSplitEntry>) {
        self.entries = entries;
    }

    /// Shape expected by the re-explain collaborator.
    pub fn custom_split(&self, cards: &[CardAccount]) -> Vec<CustomSplitItem> {
        self.entries
            .iter()
            .map(|entry| CustomSplitItem {
                card_id: entry.card_id.clone(),
                card_name: cards
                    .iter()
                    .find(|c| c.id == entry.card_id)
                    .map(|c| c.name.clone())
                    .unwrap_or_default(),
                amount: entry.amount,
                split_type: "custom".to_string(),
            })
            .collect()
    }
}

fn validate_entries(entries: &[PaymentSplitEntry]) -> Result<(), NexusError> {
    if entries.is_empty() {
        return Err(NexusError::EmptySplit);
    }
    let mut seen = HashSet::new();
    for entry in entries {
        if entry.card_id.trim().is_empty() {
            return Err(NexusError::invalid_input(
                "card_id",
                "Invalid card",
                "Card id cannot be empty",
            ));
        }
        if !seen.insert(entry.card_id.as_str()) {
            return Err(NexusError::DuplicateCard(entry.card_id.clone()));
        }
        if entry.amount < Decimal::ZERO {
            return Err(NexusError::invalid_input(
                "amount",
                "Invalid Amount",
                format!("Amount for card {} cannot be negative", entry.card_id),
            ));
        }
        if entry.apr < Decimal::ZERO {
            return Err(NexusError::invalid_input(
                "apr",
                "Invalid APR",
                format!("APR for card {} cannot be negative", entry.card_id),
            ));
        }
        check_amount("amount", &format!("Amount for card {}", entry.card_id), entry.amount)?;
        check_apr("apr", &format!("card {}", entry.card_id), entry.apr)?;
    }
    Ok(())
}

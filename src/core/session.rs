use crate::core::errors::NexusError;
use crate::core::models::recommendation::Narrative;
use crate::core::models::split::{PaymentSplit, PaymentSplitEntry};
use crate::core::money::parse_amount_input;
use log::debug;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    #[default]
    Idle,
    Editing,
    Cancelled,
}

/// Request for fresh narrative text after a settled edit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReExplainTicket {
    pub sequence: u64,
    pub entries: Vec<PaymentSplitEntry>,
}

/// Editing state of the pay screen.
///
/// Keystrokes only update drafts. Amounts move when an edit is confirmed, and the
/// narrative shown is the one answering the most recent confirmed edit.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PaySession {
    split: Option<PaymentSplit>,
    drafts: BTreeMap<usize, String>,
    status: SessionStatus,
    narrative: Option<Narrative>,
    recommended_narrative: Option<Narrative>,
    explain_sequence: u64,
}

impl PaySession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn split(&self) -> Option<&PaymentSplit> {
        self.split.as_ref()
    }

    pub fn narrative(&self) -> Option<&Narrative> {
        self.narrative.as_ref()
    }

    /// Starts editing a freshly recommended split, replacing any previous one.
    pub fn apply_recommendation(&mut self, split: PaymentSplit, narrative: Option<Narrative>) {
        debug!(
            "Applying recommended split of {} cards totalling {}",
            split.len(),
            split.original_total()
        );
        self.split = Some(split);
        self.drafts.clear();
        self.recommended_narrative = narrative.clone();
        self.narrative = narrative;
        self.explain_sequence += 1;
        self.status = SessionStatus::Editing;
    }

    /// Records raw text typed into a card's field without touching the split.
    pub fn edit_input(&mut self, index: usize, text: &str) -> Result<(), NexusError> {
        self.check_index(index)?;
        self.drafts.insert(index, text.to_string());
        Ok(())
    }

    /// Amount to show for a card: the draft while typing, else the settled value.
    pub fn display_amount(&self, index: usize) -> Option<Decimal> {
        match self.drafts.get(&index) {
            Some(text) => Some(parse_amount_input(text)),
            None => self
                .split
                .as_ref()
                .and_then(|split| split.entries().get(index))
                .map(|entry| entry.amount),
        }
    }

    /// Settles the draft for `index` (blur, submit or apply) and rebalances the split.
    ///
    /// Returns a ticket for the re-explain call when the amounts changed.
    pub fn confirm_edit(&mut self, index: usize) -> Result<Option<ReExplainTicket>, NexusError> {
        self.check_index(index)?;
        let Some(text) = self.drafts.remove(&index) else {
            return Ok(None);
        };
        let split = self.split.as_mut().ok_or(NexusError::NoActiveSplit)?;
        let before = split.entries().to_vec();
        split.redistribute(index, parse_amount_input(&text))?;
        if split.entries() == before.as_slice() {
            return Ok(None);
        }

        self.explain_sequence += 1;
        Ok(Some(ReExplainTicket {
            sequence: self.explain_sequence,
            entries: split.entries().to_vec(),
        }))
    }

    /// Takes a re-explain answer. Answers to superseded edits are dropped.
    pub fn apply_narrative(&mut self, sequence: u64, narrative: Narrative) -> bool {
        if self.split.is_none() || sequence != self.explain_sequence {
            debug!(
                "Dropping narrative for sequence {} (latest {})",
                sequence, self.explain_sequence
            );
            return false;
        }
        self.narrative = Some(narrative);
        true
    }

    /// Back to the recommended values, discarding drafts and edits.
    pub fn reset(&mut self) -> Result<(), NexusError> {
        let split = self.split.as_mut().ok_or(NexusError::NoActiveSplit)?;
        split.reset();
        self.drafts.clear();
        self.narrative = self.recommended_narrative.clone();
        self.explain_sequence += 1;
        Ok(())
    }

    /// Drops the split entirely, back to the pre-recommendation state.
    pub fn cancel(&mut self) {
        self.discard();
        self.status = SessionStatus::Cancelled;
    }

    /// Drops the split after the payment went through.
    pub fn complete(&mut self) {
        self.discard();
        self.status = SessionStatus::Idle;
    }

    fn discard(&mut self) {
        self.split = None;
        self.drafts.clear();
        self.narrative = None;
        self.recommended_narrative = None;
        self.explain_sequence += 1;
    }

    fn check_index(&self, index: usize) -> Result<(), NexusError> {
        let split = self.split.as_ref().ok_or(NexusError::NoActiveSplit)?;
        if index >= split.len() {
            return Err(NexusError::InvalidSplitIndex {
                index,
                len: split.len(),
            });
        }
        Ok(())
    }
}

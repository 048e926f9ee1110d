// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, bail};
use dashkit_app::RefundInput;
use std::collections::BTreeMap;
use tracing::{debug, info};

use crate::record::Record;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalMode {
    View,
    Edit,
    DeleteConfirm,
    Refund,
}

impl ModalMode {
    pub const fn label(self) -> &'static str {
        match self {
            Self::View => "view",
            Self::Edit => "edit",
            Self::DeleteConfirm => "delete",
            Self::Refund => "refund",
        }
    }
}

/// Raw text edits keyed by field name, as typed into the form.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FieldEdits(BTreeMap<String, String>);

impl FieldEdits {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.0.insert(field.into(), value.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn merge(&mut self, other: FieldEdits) {
        self.0.extend(other.0);
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FieldEdits {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    Edit(FieldEdits),
    ConfirmDelete,
    /// `None` submits the amount already staged in the modal.
    Refund(Option<String>),
}

/// The single-record change a successful submit hands back to the owning list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowMutation<R> {
    Replace(R),
    Remove(String),
    RefundIssued { id: String, amount_cents: i64 },
}

/// Per-record-type capabilities of the row action modal.
pub trait RowActions: Record + Clone {
    fn supports(mode: ModalMode) -> bool;

    /// Eligibility check run before the modal opens.
    fn check_open(&self, _mode: ModalMode) -> Result<()> {
        Ok(())
    }

    fn editable_fields() -> &'static [&'static str] {
        &[]
    }

    fn apply_edits(&self, _edits: &FieldEdits) -> Result<Self> {
        bail!("this record cannot be edited")
    }

    fn refundable_cents(&self) -> Option<i64> {
        None
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Draft {
    Empty,
    Edits(FieldEdits),
    Refund(RefundInput),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct OpenModal<R> {
    record: R,
    mode: ModalMode,
    draft: Draft,
}

/// One overlay at a time; opening another replaces whatever was open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowActionModal<R> {
    slot: Option<OpenModal<R>>,
}

impl<R> Default for RowActionModal<R> {
    fn default() -> Self {
        Self { slot: None }
    }
}

impl<R: RowActions> RowActionModal<R> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.slot.is_some()
    }

    pub fn mode(&self) -> Option<ModalMode> {
        self.slot.as_ref().map(|open| open.mode)
    }

    pub fn record(&self) -> Option<&R> {
        self.slot.as_ref().map(|open| &open.record)
    }

    pub fn staged_refund_amount(&self) -> Option<&str> {
        match self.slot.as_ref().map(|open| &open.draft) {
            Some(Draft::Refund(input)) => Some(&input.amount),
            _ => None,
        }
    }

    pub fn staged_edits(&self) -> Option<&FieldEdits> {
        match self.slot.as_ref().map(|open| &open.draft) {
            Some(Draft::Edits(edits)) => Some(edits),
            _ => None,
        }
    }

    /// Refused openings leave the current slot untouched.
    pub fn open(&mut self, record: R, mode: ModalMode) -> Result<()> {
        if !R::supports(mode) {
            bail!("{} is not available for this record", mode.label());
        }
        record.check_open(mode)?;

        let draft = match mode {
            ModalMode::Edit => Draft::Edits(FieldEdits::new()),
            ModalMode::Refund => {
                let Some(cents) = record.refundable_cents() else {
                    bail!("record {} has no refundable amount", record.id());
                };
                Draft::Refund(RefundInput::new(cents))
            }
            ModalMode::View | ModalMode::DeleteConfirm => Draft::Empty,
        };
        debug!(id = record.id(), mode = mode.label(), "modal opened");
        self.slot = Some(OpenModal {
            record,
            mode,
            draft,
        });
        Ok(())
    }

    pub fn stage_edit(&mut self, field: &str, value: impl Into<String>) -> Result<()> {
        let Some(open) = self.slot.as_mut() else {
            bail!("no modal is open");
        };
        let Draft::Edits(edits) = &mut open.draft else {
            bail!("the {} modal has no editable fields", open.mode.label());
        };
        if !is_editable::<R>(field) {
            bail!("field {field:?} is read-only");
        }
        edits.set(field, value);
        Ok(())
    }

    pub fn stage_refund_amount(&mut self, amount: impl Into<String>) -> Result<()> {
        match self.slot.as_mut().map(|open| &mut open.draft) {
            Some(Draft::Refund(input)) => {
                input.amount = amount.into();
                Ok(())
            }
            _ => bail!("no refund is open"),
        }
    }

    /// On error the modal stays open and nothing is handed back.
    pub fn submit(&mut self, submission: Submission) -> Result<RowMutation<R>> {
        let Some(open) = self.slot.as_ref() else {
            bail!("no modal is open");
        };

        let mutation = match (open.mode, submission, &open.draft) {
            (ModalMode::Edit, Submission::Edit(submitted), Draft::Edits(staged)) => {
                let mut edits = staged.clone();
                edits.merge(submitted);
                if let Some(field) = edits
                    .fields()
                    .find(|field| !is_editable::<R>(field))
                {
                    bail!("field {field:?} is read-only");
                }
                let updated = open.record.apply_edits(&edits)?;
                if updated.id() != open.record.id() {
                    bail!("edits may not change the record id");
                }
                RowMutation::Replace(updated)
            }
            (ModalMode::DeleteConfirm, Submission::ConfirmDelete, _) => {
                RowMutation::Remove(open.record.id().to_owned())
            }
            (ModalMode::Refund, Submission::Refund(amount), Draft::Refund(staged)) => {
                let input = RefundInput {
                    amount: amount.unwrap_or_else(|| staged.amount.clone()),
                    original_cents: staged.original_cents,
                };
                RowMutation::RefundIssued {
                    id: open.record.id().to_owned(),
                    amount_cents: input.cents()?,
                }
            }
            (ModalMode::View, _, _) => bail!("view is read-only; close it instead"),
            (mode, _, _) => bail!("that action does not match the open {} modal", mode.label()),
        };

        info!(id = open.record.id(), mode = open.mode.label(), "modal submitted");
        self.slot = None;
        Ok(mutation)
    }

    /// Drops the record and any staged input.
    pub fn close(&mut self) -> bool {
        let was_open = self.slot.take().is_some();
        if was_open {
            debug!("modal closed");
        }
        was_open
    }
}

fn is_editable<R: RowActions>(field: &str) -> bool {
    R::editable_fields().iter().any(|editable| *editable == field)
}

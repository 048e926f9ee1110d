// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! Table wiring for the two record types the dashboard lists.

use anyhow::{Result, anyhow, bail};
use dashkit_app::{SortDirection, Transaction, User, UserEditInput, UserRole, UserStatus};

use crate::modal::{FieldEdits, ModalMode, RowActions};
use crate::record::{FieldValue, Record};
use crate::view::{SortSpec, ViewConfig};

pub const USER_FIELDS: [&str; 6] = ["id", "name", "email", "role", "status", "created_at"];
pub const USER_SEARCHABLE_FIELDS: [&str; 3] = ["name", "email", "role"];
pub const USER_SORTABLE_FIELDS: [&str; 5] = ["name", "email", "role", "status", "created_at"];
pub const USER_EDITABLE_FIELDS: [&str; 4] = ["name", "email", "role", "status"];

pub const TRANSACTION_FIELDS: [&str; 7] = [
    "id",
    "user_id",
    "amount",
    "kind",
    "status",
    "description",
    "date",
];
pub const TRANSACTION_SEARCHABLE_FIELDS: [&str; 3] = ["description", "id", "status"];
pub const TRANSACTION_SORTABLE_FIELDS: [&str; 6] =
    ["id", "description", "amount", "kind", "status", "date"];

pub fn user_view_config(page_size: usize) -> ViewConfig {
    ViewConfig {
        searchable_fields: USER_SEARCHABLE_FIELDS.to_vec(),
        sortable_fields: USER_SORTABLE_FIELDS.to_vec(),
        page_size,
        default_sort: Some(SortSpec {
            field: "name",
            direction: SortDirection::Asc,
        }),
    }
}

pub fn transaction_view_config(page_size: usize) -> ViewConfig {
    ViewConfig {
        searchable_fields: TRANSACTION_SEARCHABLE_FIELDS.to_vec(),
        sortable_fields: TRANSACTION_SORTABLE_FIELDS.to_vec(),
        page_size,
        default_sort: Some(SortSpec {
            field: "date",
            direction: SortDirection::Desc,
        }),
    }
}

impl Record for User {
    fn id(&self) -> &str {
        self.id.as_str()
    }

    fn field(&self, name: &str) -> Option<FieldValue> {
        let value = match name {
            "id" => FieldValue::Text(self.id.to_string()),
            "name" => FieldValue::Text(self.name.clone()),
            "email" => FieldValue::Text(self.email.clone()),
            "role" => FieldValue::Category(self.role.as_str()),
            "status" => FieldValue::Category(self.status.as_str()),
            "created_at" => FieldValue::Date(self.created_at),
            _ => return None,
        };
        Some(value)
    }
}

impl RowActions for User {
    fn supports(mode: ModalMode) -> bool {
        matches!(
            mode,
            ModalMode::View | ModalMode::Edit | ModalMode::DeleteConfirm
        )
    }

    fn editable_fields() -> &'static [&'static str] {
        &USER_EDITABLE_FIELDS
    }

    fn apply_edits(&self, edits: &FieldEdits) -> Result<Self> {
        let role = match edits.get("role") {
            Some(raw) => UserRole::parse(raw)
                .ok_or_else(|| anyhow!("unknown role {raw:?}; choose Admin, User or Manager"))?,
            None => self.role,
        };
        let status = match edits.get("status") {
            Some(raw) => UserStatus::parse(raw).ok_or_else(|| {
                anyhow!("unknown status {raw:?}; choose Active, Inactive or Pending")
            })?,
            None => self.status,
        };
        let input = UserEditInput {
            name: edits.get("name").unwrap_or(&self.name).to_owned(),
            email: edits.get("email").unwrap_or(&self.email).to_owned(),
            role,
            status,
        };
        input.validate()?;

        Ok(Self {
            id: self.id.clone(),
            name: input.name.trim().to_owned(),
            email: input.email.trim().to_owned(),
            role: input.role,
            status: input.status,
            created_at: self.created_at,
        })
    }
}

impl Record for Transaction {
    fn id(&self) -> &str {
        self.id.as_str()
    }

    fn field(&self, name: &str) -> Option<FieldValue> {
        let value = match name {
            "id" => FieldValue::Text(self.id.to_string()),
            "user_id" => FieldValue::Text(self.user_id.to_string()),
            "amount" => FieldValue::Money(self.amount_cents),
            "kind" => FieldValue::Category(self.kind.as_str()),
            "status" => FieldValue::Category(self.status.as_str()),
            "description" => FieldValue::Text(self.description.clone()),
            "date" => FieldValue::Date(self.date),
            _ => return None,
        };
        Some(value)
    }
}

impl RowActions for Transaction {
    fn supports(mode: ModalMode) -> bool {
        matches!(mode, ModalMode::View | ModalMode::Refund)
    }

    fn check_open(&self, mode: ModalMode) -> Result<()> {
        if mode == ModalMode::Refund && !self.is_refundable() {
            bail!("refunds are only available for completed credit transactions");
        }
        Ok(())
    }

    fn refundable_cents(&self) -> Option<i64> {
        self.is_refundable().then_some(self.amount_cents)
    }
}

// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::Result;
use dashkit_app::{SortDirection, Transaction, User, UserRole};
use dashkit_testkit::{AdminFaker, mock_transactions, mock_users};
use dashkit_view::{
    DEFAULT_PAGE_SIZE, FieldEdits, ModalMode, Record, RowActionModal, RowMutation, Submission,
    TRANSACTION_SEARCHABLE_FIELDS, TabularDataView, USER_SEARCHABLE_FIELDS, ViewStatus,
    transaction_view_config, user_view_config,
};

fn users_view() -> Result<TabularDataView<User>> {
    TabularDataView::new(mock_users(), user_view_config(DEFAULT_PAGE_SIZE))
}

fn transactions_view() -> Result<TabularDataView<Transaction>> {
    TabularDataView::new(
        mock_transactions(),
        transaction_view_config(DEFAULT_PAGE_SIZE),
    )
}

fn visible_ids<R: Record>(view: &TabularDataView<R>) -> Vec<String> {
    view.visible_rows()
        .map(|record| record.id().to_owned())
        .collect()
}

#[test]
fn eight_users_split_five_then_three_and_page_three_clamps() -> Result<()> {
    let mut view = users_view()?;
    assert_eq!(view.total_pages(), 2);
    assert_eq!(view.visible_rows().len(), 5);
    let window = view.page_window();
    assert_eq!((window.first, window.last, window.total), (1, 5, 8));

    assert_eq!(view.next_page(), ViewStatus::PageChanged(2));
    assert_eq!(view.visible_rows().len(), 3);
    assert_eq!(
        view.set_page(3),
        ViewStatus::PageClamped {
            requested: 3,
            page: 2
        }
    );
    assert_eq!(view.current_page(), 2);
    Ok(())
}

#[test]
fn users_default_to_name_ascending() -> Result<()> {
    let view = users_view()?;
    let names = view
        .visible_rows()
        .map(|user| user.name.as_str())
        .collect::<Vec<_>>();
    assert_eq!(
        names,
        vec![
            "Chris Lee",
            "David Brown",
            "Emily Davis",
            "Jane Smith",
            "John Doe"
        ]
    );
    Ok(())
}

#[test]
fn pending_filter_shows_only_pending_rows_from_page_one() -> Result<()> {
    let mut view = transactions_view()?;
    view.set_page(2);

    let status = view.set_filter_text("pending");
    assert_eq!(status, ViewStatus::Filtered { matches: 2 });
    assert_eq!(view.current_page(), 1);
    assert_eq!(visible_ids(&view), vec!["txn_002", "txn_006"]);

    assert_eq!(view.set_filter_text(""), ViewStatus::FilterCleared);
    assert_eq!(view.filtered_count(), 8);
    Ok(())
}

#[test]
fn every_visible_row_matches_the_filter() -> Result<()> {
    let (users, _) = AdminFaker::new(11).dataset(60);
    let mut view = TabularDataView::new(users, user_view_config(7))?;
    for needle in ["a", "Admin", "EXAMPLE", "ri", "zzz"] {
        view.set_filter_text(needle);
        let lowered = needle.to_lowercase();
        for user in view.filtered() {
            let hit = USER_SEARCHABLE_FIELDS.iter().any(|field| {
                user.field(field)
                    .is_some_and(|value| value.display().to_lowercase().contains(&lowered))
            });
            assert!(hit, "{} should not match {needle:?}", user.id);
        }
    }
    Ok(())
}

#[test]
fn transaction_filter_covers_description_id_and_status() -> Result<()> {
    assert_eq!(TRANSACTION_SEARCHABLE_FIELDS, ["description", "id", "status"]);
    let mut view = transactions_view()?;
    view.set_filter_text("TXN_00");
    assert_eq!(view.filtered_count(), 8);
    view.set_filter_text("subscription");
    assert_eq!(visible_ids(&view), vec!["txn_002", "txn_006"]);
    view.set_filter_text("failed");
    assert_eq!(visible_ids(&view), vec!["txn_004"]);
    Ok(())
}

#[test]
fn sorting_twice_reverses_the_order() -> Result<()> {
    let mut view = transactions_view()?;
    view.set_page_size(8)?;

    assert_eq!(view.set_sort("amount"), ViewStatus::SortAsc("amount"));
    let ascending = visible_ids(&view);
    assert_eq!(ascending.first().map(String::as_str), Some("txn_006"));

    assert_eq!(view.set_sort("amount"), ViewStatus::SortDesc("amount"));
    let mut descending = visible_ids(&view);
    descending.reverse();
    assert_eq!(descending, ascending);
    Ok(())
}

#[test]
fn sort_change_keeps_the_current_page() -> Result<()> {
    let mut view = users_view()?;
    view.set_page(2);
    view.set_sort("email");
    assert_eq!(view.current_page(), 2);
    assert_eq!(
        view.sort().map(|sort| sort.direction),
        Some(SortDirection::Asc)
    );
    Ok(())
}

#[test]
fn deleting_the_last_page_reclamps() -> Result<()> {
    let mut view = users_view()?;
    let mut modal = RowActionModal::new();
    view.set_page(2);

    let last_page = visible_ids(&view);
    assert_eq!(last_page.len(), 3);
    for id in &last_page {
        let user = view
            .get(id)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("missing {id}"))?;
        modal.open(user, ModalMode::DeleteConfirm)?;
        let mutation = modal.submit(Submission::ConfirmDelete)?;
        assert_eq!(mutation, RowMutation::Remove(id.clone()));
        view.apply(mutation)?;
    }

    assert_eq!(view.records().len(), 5);
    assert_eq!(view.total_pages(), 1);
    assert_eq!(view.current_page(), 1);
    assert!(!modal.is_open());
    Ok(())
}

#[test]
fn refund_on_a_debit_is_refused_before_opening() -> Result<()> {
    let view = transactions_view()?;
    let mut modal = RowActionModal::new();
    let debit = view
        .get("txn_002")
        .cloned()
        .ok_or_else(|| anyhow::anyhow!("fixture txn_002 missing"))?;

    let error = modal
        .open(debit, ModalMode::Refund)
        .expect_err("debits are not refundable");
    assert!(error.to_string().contains("completed credit"));
    assert!(!modal.is_open());
    Ok(())
}

#[test]
fn refund_is_prefilled_and_bounded_by_the_original_amount() -> Result<()> {
    let mut view = transactions_view()?;
    let mut modal = RowActionModal::new();
    let credit = view
        .get("txn_001")
        .cloned()
        .ok_or_else(|| anyhow::anyhow!("fixture txn_001 missing"))?;

    modal.open(credit, ModalMode::Refund)?;
    assert_eq!(modal.staged_refund_amount(), Some("1250.50"));

    assert!(modal.submit(Submission::Refund(Some("2000".to_owned()))).is_err());
    assert!(modal.submit(Submission::Refund(Some("0".to_owned()))).is_err());
    assert_eq!(modal.mode(), Some(ModalMode::Refund));

    modal.stage_refund_amount("100")?;
    let mutation = modal.submit(Submission::Refund(None))?;
    assert_eq!(
        mutation,
        RowMutation::RefundIssued {
            id: "txn_001".to_owned(),
            amount_cents: 10_000
        }
    );

    let before = view.records().to_vec();
    view.apply(mutation)?;
    assert_eq!(view.records(), before.as_slice());
    Ok(())
}

#[test]
fn users_cannot_be_refunded_and_transactions_cannot_be_edited() -> Result<()> {
    let mut users = RowActionModal::<User>::new();
    assert!(users.open(mock_users()[0].clone(), ModalMode::Refund).is_err());

    let mut transactions = RowActionModal::<Transaction>::new();
    assert!(
        transactions
            .open(mock_transactions()[0].clone(), ModalMode::Edit)
            .is_err()
    );
    assert!(
        transactions
            .open(mock_transactions()[0].clone(), ModalMode::DeleteConfirm)
            .is_err()
    );
    Ok(())
}

#[test]
fn edit_with_empty_name_is_refused_and_record_unchanged() -> Result<()> {
    let view = users_view()?;
    let mut modal = RowActionModal::new();
    let john = view
        .get("1")
        .cloned()
        .ok_or_else(|| anyhow::anyhow!("fixture user 1 missing"))?;

    modal.open(john.clone(), ModalMode::Edit)?;
    let edits = [("name", "   ")].into_iter().collect::<FieldEdits>();
    assert!(modal.submit(Submission::Edit(edits)).is_err());
    assert_eq!(modal.mode(), Some(ModalMode::Edit));
    assert_eq!(view.get("1"), Some(&john));
    Ok(())
}

#[test]
fn edit_replaces_the_record_in_place() -> Result<()> {
    let mut view = users_view()?;
    let mut modal = RowActionModal::new();
    let jane = view
        .get("2")
        .cloned()
        .ok_or_else(|| anyhow::anyhow!("fixture user 2 missing"))?;

    modal.open(jane, ModalMode::Edit)?;
    modal.stage_edit("role", "manager")?;
    assert!(modal.stage_edit("created_at", "2020-01-01").is_err());

    let bad_role = [("role", "owner")].into_iter().collect::<FieldEdits>();
    assert!(modal.submit(Submission::Edit(bad_role)).is_err());

    let mutation = modal.submit(Submission::Edit(FieldEdits::new()))?;
    view.apply(mutation)?;
    let updated = view
        .get("2")
        .ok_or_else(|| anyhow::anyhow!("user 2 vanished"))?;
    assert_eq!(updated.role, UserRole::Manager);
    assert_eq!(updated.name, "Jane Smith");
    assert_eq!(view.records().len(), 8);
    Ok(())
}

// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::Result;
use dashkit_app::{
    Settings, Transaction, TransactionId, TransactionKind, TransactionStatus, User, UserId,
    UserRole, UserStatus,
};
use time::{Date, Month};

fn sample_user() -> Result<User> {
    Ok(User {
        id: UserId::new("1"),
        name: "John Doe".to_owned(),
        email: "john.doe@example.com".to_owned(),
        role: UserRole::Admin,
        status: UserStatus::Active,
        created_at: Date::from_calendar_date(2024, Month::January, 15)?,
    })
}

#[test]
fn user_serializes_dates_as_iso_strings_and_enums_as_labels() -> Result<()> {
    let value = serde_json::to_value(sample_user()?)?;
    assert_eq!(value["id"], "1");
    assert_eq!(value["role"], "Admin");
    assert_eq!(value["status"], "Active");
    assert_eq!(value["created_at"], "2024-01-15");
    Ok(())
}

#[test]
fn transaction_json_round_trips() -> Result<()> {
    let transaction = Transaction {
        id: TransactionId::new("txn_001"),
        user_id: UserId::new("1"),
        amount_cents: 125_050,
        kind: TransactionKind::Credit,
        status: TransactionStatus::Completed,
        description: "Payment received".to_owned(),
        date: Date::from_calendar_date(2024, Month::March, 15)?,
    };
    let raw = serde_json::to_string(&transaction)?;
    assert!(raw.contains("\"date\":\"2024-03-15\""));
    let parsed: Transaction = serde_json::from_str(&raw)?;
    assert_eq!(parsed, transaction);
    Ok(())
}

#[test]
fn malformed_date_is_rejected() {
    let raw = r#"{"id":"1","name":"x","email":"x@y.z","role":"User","status":"Active","created_at":"15/01/2024"}"#;
    assert!(serde_json::from_str::<User>(raw).is_err());
}

#[test]
fn settings_round_trip() -> Result<()> {
    let settings = Settings::default();
    let parsed: Settings = serde_json::from_str(&serde_json::to_string(&settings)?)?;
    assert_eq!(parsed, settings);
    Ok(())
}

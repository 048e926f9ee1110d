// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};
use time::Date;

use crate::ids::*;

time::serde::format_description!(iso_date, Date, "[year]-[month]-[day]");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserRole {
    Admin,
    User,
    Manager,
}

impl UserRole {
    pub const ALL: [Self; 3] = [Self::Admin, Self::User, Self::Manager];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "Admin",
            Self::User => "User",
            Self::Manager => "Manager",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "admin" => Some(Self::Admin),
            "user" => Some(Self::User),
            "manager" => Some(Self::Manager),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserStatus {
    Active,
    Inactive,
    Pending,
}

impl UserStatus {
    pub const ALL: [Self; 3] = [Self::Active, Self::Inactive, Self::Pending];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Inactive => "Inactive",
            Self::Pending => "Pending",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "active" => Some(Self::Active),
            "inactive" => Some(Self::Inactive),
            "pending" => Some(Self::Pending),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionKind {
    Credit,
    Debit,
}

impl TransactionKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Credit => "Credit",
            Self::Debit => "Debit",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "credit" => Some(Self::Credit),
            "debit" => Some(Self::Debit),
            _ => None,
        }
    }

    pub const fn sign(self) -> &'static str {
        match self {
            Self::Credit => "+",
            Self::Debit => "-",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionStatus {
    Completed,
    Pending,
    Failed,
}

impl TransactionStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Completed => "Completed",
            Self::Pending => "Pending",
            Self::Failed => "Failed",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "completed" => Some(Self::Completed),
            "pending" => Some(Self::Pending),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub status: UserStatus,
    #[serde(with = "iso_date")]
    pub created_at: Date,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    pub user_id: UserId,
    pub amount_cents: i64,
    pub kind: TransactionKind,
    pub status: TransactionStatus,
    pub description: String,
    #[serde(with = "iso_date")]
    pub date: Date,
}

impl Transaction {
    /// Refunds only apply to money that actually arrived.
    pub fn is_refundable(&self) -> bool {
        self.kind == TransactionKind::Credit && self.status == TransactionStatus::Completed
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageKind {
    Dashboard,
    Users,
    AddUser,
    Transactions,
    Settings,
}

impl PageKind {
    /// Sidebar entries, in display order. `AddUser` is reached from the users page.
    pub const NAV: [Self; 4] = [
        Self::Dashboard,
        Self::Users,
        Self::Transactions,
        Self::Settings,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Dashboard => "dashboard",
            Self::Users => "users",
            Self::AddUser => "add user",
            Self::Transactions => "transactions",
            Self::Settings => "settings",
        }
    }

    pub const fn route(self) -> &'static str {
        match self {
            Self::Dashboard => "/",
            Self::Users => "/users",
            Self::AddUser => "/users/add",
            Self::Transactions => "/transactions",
            Self::Settings => "/settings",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "dashboard" | "/" => Some(Self::Dashboard),
            "users" | "/users" => Some(Self::Users),
            "add" | "add-user" | "/users/add" => Some(Self::AddUser),
            "transactions" | "/transactions" => Some(Self::Transactions),
            "settings" | "/settings" => Some(Self::Settings),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub const fn flipped(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }

    pub const fn arrow(self) -> &'static str {
        match self {
            Self::Asc => "↑",
            Self::Desc => "↓",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Language {
    En,
    Es,
    Fr,
    De,
}

impl Language {
    pub const ALL: [Self; 4] = [Self::En, Self::Es, Self::Fr, Self::De];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Es => "es",
            Self::Fr => "fr",
            Self::De => "de",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::En => "English",
            Self::Es => "Spanish",
            Self::Fr => "French",
            Self::De => "German",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|language| language.as_str().eq_ignore_ascii_case(value.trim()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Timezone {
    Utc,
    Est,
    Pst,
    Gmt,
}

impl Timezone {
    pub const ALL: [Self; 4] = [Self::Utc, Self::Est, Self::Pst, Self::Gmt];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Utc => "UTC",
            Self::Est => "EST",
            Self::Pst => "PST",
            Self::Gmt => "GMT",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|zone| zone.as_str().eq_ignore_ascii_case(value.trim()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SettingKey {
    SiteName,
    AdminEmail,
    Notifications,
    DarkMode,
    Language,
    Timezone,
    MaintenanceMode,
}

impl SettingKey {
    pub const ALL: [Self; 7] = [
        Self::SiteName,
        Self::AdminEmail,
        Self::Notifications,
        Self::DarkMode,
        Self::Language,
        Self::Timezone,
        Self::MaintenanceMode,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SiteName => "site_name",
            Self::AdminEmail => "admin_email",
            Self::Notifications => "notifications",
            Self::DarkMode => "dark_mode",
            Self::Language => "language",
            Self::Timezone => "timezone",
            Self::MaintenanceMode => "maintenance_mode",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|key| key.as_str() == value.trim())
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::SiteName => "site name",
            Self::AdminEmail => "admin email",
            Self::Notifications => "email notifications",
            Self::DarkMode => "dark mode",
            Self::Language => "language",
            Self::Timezone => "timezone",
            Self::MaintenanceMode => "maintenance mode",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub site_name: String,
    pub admin_email: String,
    pub notifications: bool,
    pub dark_mode: bool,
    pub language: Language,
    pub timezone: Timezone,
    pub maintenance_mode: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            site_name: "Admin Dashboard".to_owned(),
            admin_email: "admin@example.com".to_owned(),
            notifications: true,
            dark_mode: false,
            language: Language::En,
            timezone: Timezone::Utc,
            maintenance_mode: false,
        }
    }
}

impl Settings {
    pub fn display(&self, key: SettingKey) -> String {
        let flag = |value: bool| if value { "on" } else { "off" }.to_owned();
        match key {
            SettingKey::SiteName => self.site_name.clone(),
            SettingKey::AdminEmail => self.admin_email.clone(),
            SettingKey::Notifications => flag(self.notifications),
            SettingKey::DarkMode => flag(self.dark_mode),
            SettingKey::Language => self.language.label().to_owned(),
            SettingKey::Timezone => self.timezone.as_str().to_owned(),
            SettingKey::MaintenanceMode => flag(self.maintenance_mode),
        }
    }
}

pub fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Some(true),
        "0" | "false" | "off" | "no" => Some(false),
        _ => None,
    }
}

pub fn format_cents(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let absolute = cents.unsigned_abs();
    format!("{sign}{}.{:02}", absolute / 100, absolute % 100)
}

#[cfg(test)]
mod tests {
    use super::{
        Language, PageKind, SettingKey, Settings, Timezone, Transaction, TransactionKind,
        TransactionStatus, UserRole, format_cents, parse_flag,
    };
    use crate::{TransactionId, UserId};
    use time::{Date, Month};

    #[test]
    fn enum_labels_parse_case_insensitively() {
        assert_eq!(UserRole::parse("manager"), Some(UserRole::Manager));
        assert_eq!(UserRole::parse("ADMIN"), Some(UserRole::Admin));
        assert_eq!(
            TransactionStatus::parse("pending"),
            Some(TransactionStatus::Pending)
        );
        assert_eq!(Language::parse("FR"), Some(Language::Fr));
        assert_eq!(Timezone::parse("pst"), Some(Timezone::Pst));
        assert!(UserRole::parse("owner").is_none());
    }

    #[test]
    fn page_parse_accepts_labels_and_routes() {
        assert_eq!(PageKind::parse("/"), Some(PageKind::Dashboard));
        assert_eq!(PageKind::parse("transactions"), Some(PageKind::Transactions));
        assert_eq!(PageKind::parse("/users/add"), Some(PageKind::AddUser));
        assert!(PageKind::parse("/login").is_none());
    }

    #[test]
    fn setting_keys_round_trip_through_storage_names() {
        for key in SettingKey::ALL {
            assert_eq!(SettingKey::parse(key.as_str()), Some(key));
        }
    }

    #[test]
    fn settings_display_uses_on_off_for_flags() {
        let settings = Settings::default();
        assert_eq!(settings.display(SettingKey::Notifications), "on");
        assert_eq!(settings.display(SettingKey::DarkMode), "off");
        assert_eq!(settings.display(SettingKey::Language), "English");
    }

    #[test]
    fn only_completed_credits_are_refundable() {
        let mut transaction = Transaction {
            id: TransactionId::new("txn_x"),
            user_id: UserId::new("1"),
            amount_cents: 100,
            kind: TransactionKind::Credit,
            status: TransactionStatus::Completed,
            description: String::new(),
            date: Date::from_calendar_date(2024, Month::March, 1).expect("valid date"),
        };
        assert!(transaction.is_refundable());

        transaction.status = TransactionStatus::Pending;
        assert!(!transaction.is_refundable());

        transaction.status = TransactionStatus::Completed;
        transaction.kind = TransactionKind::Debit;
        assert!(!transaction.is_refundable());
    }

    #[test]
    fn flags_and_money_format() {
        assert_eq!(parse_flag("Yes"), Some(true));
        assert_eq!(parse_flag("off"), Some(false));
        assert_eq!(parse_flag("maybe"), None);
        assert_eq!(format_cents(125_050), "1250.50");
        assert_eq!(format_cents(-5), "-0.05");
    }
}

// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, anyhow, bail};

use crate::{Language, SettingKey, Settings, Timezone, UserRole, UserStatus, parse_flag};

const MIN_NAME_CHARS: usize = 2;
const MIN_PASSWORD_CHARS: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserEditInput {
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub status: UserStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUserInput {
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub status: UserStatus,
    pub password: String,
    pub confirm_password: String,
}

impl Default for NewUserInput {
    fn default() -> Self {
        Self {
            name: String::new(),
            email: String::new(),
            role: UserRole::User,
            status: UserStatus::Active,
            password: String::new(),
            confirm_password: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefundInput {
    pub amount: String,
    pub original_cents: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NewUserField {
    Name,
    Email,
    Password,
    ConfirmPassword,
}

impl NewUserField {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Password => "password",
            Self::ConfirmPassword => "confirm password",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: NewUserField,
    pub message: &'static str,
}

impl UserEditInput {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            bail!("user name is required -- enter a name and retry");
        }
        if self.email.trim().is_empty() {
            bail!("user email is required -- enter an email and retry");
        }
        if !is_valid_email(self.email.trim()) {
            bail!("user email {:?} is not a valid address", self.email.trim());
        }
        Ok(())
    }
}

impl NewUserInput {
    /// Every failing field, in form order, so all messages can be shown at once.
    pub fn field_errors(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        let mut push = |field: NewUserField, message: &'static str| {
            errors.push(FieldError { field, message });
        };

        let name = self.name.trim();
        if name.is_empty() {
            push(NewUserField::Name, "Name is required");
        } else if name.chars().count() < MIN_NAME_CHARS {
            push(NewUserField::Name, "Name must be at least 2 characters");
        }

        if self.email.trim().is_empty() {
            push(NewUserField::Email, "Email is required");
        } else if !is_valid_email(&self.email) {
            push(NewUserField::Email, "Please enter a valid email address");
        }

        if self.password.is_empty() {
            push(NewUserField::Password, "Password is required");
        } else if self.password.chars().count() < MIN_PASSWORD_CHARS {
            push(
                NewUserField::Password,
                "Password must be at least 6 characters",
            );
        }

        if self.confirm_password.is_empty() {
            push(NewUserField::ConfirmPassword, "Please confirm your password");
        } else if self.password != self.confirm_password {
            push(NewUserField::ConfirmPassword, "Passwords do not match");
        }

        errors
    }

    pub fn validate(&self) -> Result<()> {
        let errors = self.field_errors();
        if errors.is_empty() {
            return Ok(());
        }
        let joined = errors
            .iter()
            .map(|error| format!("{}: {}", error.field.label(), error.message))
            .collect::<Vec<_>>()
            .join("; ");
        bail!("new user form has errors -- {joined}")
    }
}

impl RefundInput {
    pub fn new(original_cents: i64) -> Self {
        Self {
            amount: crate::format_cents(original_cents),
            original_cents,
        }
    }

    pub fn cents(&self) -> Result<i64> {
        let cents = parse_amount_cents(&self.amount)?;
        if cents <= 0 {
            bail!("refund amount must be positive");
        }
        if cents > self.original_cents {
            bail!(
                "refund amount {} exceeds the original {}",
                crate::format_cents(cents),
                crate::format_cents(self.original_cents)
            );
        }
        Ok(cents)
    }
}

pub fn apply_setting(settings: &mut Settings, key: SettingKey, raw: &str) -> Result<()> {
    let flag = || {
        parse_flag(raw).ok_or_else(|| anyhow!("{} expects on/off, got {raw:?}", key.label()))
    };
    match key {
        SettingKey::SiteName => settings.site_name = raw.to_owned(),
        SettingKey::AdminEmail => settings.admin_email = raw.trim().to_owned(),
        SettingKey::Notifications => settings.notifications = flag()?,
        SettingKey::DarkMode => settings.dark_mode = flag()?,
        SettingKey::MaintenanceMode => settings.maintenance_mode = flag()?,
        SettingKey::Language => {
            settings.language = Language::parse(raw).ok_or_else(|| {
                anyhow!("unknown language {raw:?}; choose one of en, es, fr, de")
            })?;
        }
        SettingKey::Timezone => {
            settings.timezone = Timezone::parse(raw).ok_or_else(|| {
                anyhow!("unknown timezone {raw:?}; choose one of UTC, EST, PST, GMT")
            })?;
        }
    }
    Ok(())
}

pub fn validate_settings(settings: &Settings) -> Result<()> {
    if settings.site_name.trim().is_empty() {
        bail!("site name is required -- enter a site name and retry");
    }
    if !is_valid_email(settings.admin_email.trim()) {
        bail!(
            "admin email {:?} is not a valid address",
            settings.admin_email
        );
    }
    Ok(())
}

/// Accepts `local@domain.tld` with no whitespace and exactly one `@`.
pub fn is_valid_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    domain
        .char_indices()
        .any(|(index, ch)| ch == '.' && index > 0 && index + 1 < domain.len())
}

/// Parses a decimal amount with at most two fractional digits into cents.
pub fn parse_amount_cents(raw: &str) -> Result<i64> {
    let trimmed = raw.trim().trim_start_matches('$');
    if trimmed.is_empty() {
        bail!("amount is required");
    }
    let (negative, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed),
    };
    let (whole, fraction) = digits.split_once('.').unwrap_or((digits, ""));
    if whole.is_empty() && fraction.is_empty() {
        bail!("invalid amount {raw:?}");
    }
    if !whole.chars().all(|ch| ch.is_ascii_digit())
        || !fraction.chars().all(|ch| ch.is_ascii_digit())
    {
        bail!("invalid amount {raw:?}; use digits like 750 or 750.50");
    }
    if fraction.len() > 2 {
        bail!("invalid amount {raw:?}; at most two decimal places");
    }

    let whole_cents = if whole.is_empty() {
        0
    } else {
        whole
            .parse::<i64>()
            .ok()
            .and_then(|value| value.checked_mul(100))
            .ok_or_else(|| anyhow!("amount {raw:?} is out of range"))?
    };
    let fraction_cents = match fraction.len() {
        0 => 0,
        1 => fraction.parse::<i64>()? * 10,
        _ => fraction.parse::<i64>()?,
    };
    let cents = whole_cents
        .checked_add(fraction_cents)
        .ok_or_else(|| anyhow!("amount {raw:?} is out of range"))?;
    Ok(if negative { -cents } else { cents })
}

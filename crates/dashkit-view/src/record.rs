// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use dashkit_app::format_cents;
use std::cmp::Ordering;
use time::Date;

/// One comparable scalar pulled out of a record by field name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Number(i64),
    Money(i64),
    Date(Date),
    Category(&'static str),
}

impl FieldValue {
    pub fn display(&self) -> String {
        match self {
            Self::Text(value) => value.clone(),
            Self::Number(value) => value.to_string(),
            Self::Money(cents) => format_cents(*cents),
            Self::Date(value) => value.to_string(),
            Self::Category(label) => (*label).to_owned(),
        }
    }

    /// Natural order within a kind; mixed kinds fall back to their display text.
    pub fn cmp_value(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Text(left), Self::Text(right)) => left.cmp(right),
            (Self::Number(left), Self::Number(right)) => left.cmp(right),
            (Self::Money(left), Self::Money(right)) => left.cmp(right),
            (Self::Date(left), Self::Date(right)) => left.cmp(right),
            (Self::Category(left), Self::Category(right)) => left.cmp(right),
            _ => self.display().cmp(&other.display()),
        }
    }

    /// `needle` must already be lowercased.
    pub fn contains_lowercase(&self, needle: &str) -> bool {
        if needle.is_empty() {
            return true;
        }
        match self {
            Self::Text(value) => value.to_lowercase().contains(needle),
            Self::Category(label) => label.to_lowercase().contains(needle),
            _ => self.display().to_lowercase().contains(needle),
        }
    }
}

/// An identified row the table view can filter, sort and export.
pub trait Record {
    fn id(&self) -> &str;

    /// `None` for names the record does not carry.
    fn field(&self, name: &str) -> Option<FieldValue>;
}

#[cfg(test)]
mod tests {
    use super::FieldValue;
    use std::cmp::Ordering;
    use time::{Date, Month};

    #[test]
    fn money_and_dates_display_in_export_shape() {
        assert_eq!(FieldValue::Money(75_000).display(), "750.00");
        let date = Date::from_calendar_date(2024, Month::March, 5).expect("valid date");
        assert_eq!(FieldValue::Date(date).display(), "2024-03-05");
    }

    #[test]
    fn numbers_compare_numerically_not_lexically() {
        assert_eq!(
            FieldValue::Money(95_000).cmp_value(&FieldValue::Money(125_050)),
            Ordering::Less
        );
        assert_eq!(
            FieldValue::Number(9).cmp_value(&FieldValue::Number(10)),
            Ordering::Less
        );
    }

    #[test]
    fn text_compares_ordinally() {
        assert_eq!(
            FieldValue::Text("Zed".to_owned()).cmp_value(&FieldValue::Text("abe".to_owned())),
            Ordering::Less
        );
    }

    #[test]
    fn containment_is_case_insensitive() {
        let value = FieldValue::Category("Pending");
        assert!(value.contains_lowercase("pend"));
        assert!(value.contains_lowercase(""));
        assert!(!FieldValue::Text("Refund processed".to_owned()).contains_lowercase("pending"));
    }
}

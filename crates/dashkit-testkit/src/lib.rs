// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use dashkit_app::{
    RevenuePoint, Transaction, TransactionId, TransactionKind, TransactionStatus, User, UserId,
    UserRole, UserStatus,
};
use std::path::PathBuf;
use time::macros::date;
use time::{Date, Duration};

const FIRST_NAMES: [&str; 16] = [
    "Avery", "Jordan", "Taylor", "Riley", "Morgan", "Casey", "Alex", "Quinn", "Parker", "Drew",
    "Kai", "Elliot", "Robin", "Cameron", "Hayden", "Rowan",
];
const LAST_NAMES: [&str; 18] = [
    "Walker", "Martin", "Hill", "Evans", "Lopez", "Gray", "Ward", "Young", "Diaz", "Reed",
    "Campbell", "Turner", "Flores", "Bennett", "Price", "Morris", "Foster", "Brooks",
];
const EMAIL_DOMAINS: [&str; 4] = ["example.com", "example.org", "mail.test", "corp.test"];

const CREDIT_DESCRIPTIONS: [&str; 5] = [
    "Payment received",
    "Invoice payment",
    "Bonus payment",
    "Refund processed",
    "Deposit",
];
const DEBIT_DESCRIPTIONS: [&str; 5] = [
    "Subscription renewal",
    "Monthly subscription",
    "Purchase order",
    "Payment declined",
    "Service fee",
];

/// Days before [`reference_date`] a generated record may fall on.
const GENERATED_SPAN_DAYS: i64 = 120;

/// The 2024-03-15 "today" the fixtures are written against.
pub const fn reference_date() -> Date {
    date!(2024 - 03 - 15)
}

fn user(
    id: &str,
    name: &str,
    role: UserRole,
    status: UserStatus,
    created_at: Date,
) -> User {
    let email = format!("{}@example.com", name.to_lowercase().replace(' ', "."));
    User {
        id: UserId::new(id),
        name: name.to_owned(),
        email,
        role,
        status,
        created_at,
    }
}

fn transaction(
    id: &str,
    user_id: &str,
    amount_cents: i64,
    kind: TransactionKind,
    status: TransactionStatus,
    description: &str,
    date: Date,
) -> Transaction {
    Transaction {
        id: TransactionId::new(id),
        user_id: UserId::new(user_id),
        amount_cents,
        kind,
        status,
        description: description.to_owned(),
        date,
    }
}

/// The eight users the dashboard ships with.
pub fn mock_users() -> Vec<User> {
    use UserRole::{Admin, Manager, User as Member};
    use UserStatus::{Active, Inactive, Pending};

    vec![
        user("1", "John Doe", Admin, Active, date!(2024 - 01 - 15)),
        user("2", "Jane Smith", Member, Active, date!(2024 - 02 - 10)),
        user("3", "Mike Johnson", Manager, Pending, date!(2024 - 03 - 05)),
        user("4", "Sarah Wilson", Member, Inactive, date!(2024 - 01 - 22)),
        user("5", "David Brown", Manager, Active, date!(2024 - 02 - 18)),
        user("6", "Emily Davis", Member, Active, date!(2024 - 03 - 01)),
        user("7", "Chris Lee", Admin, Active, date!(2024 - 02 - 28)),
        user("8", "Lisa Garcia", Member, Pending, date!(2024 - 03 - 10)),
    ]
}

/// The eight transactions the dashboard ships with.
pub fn mock_transactions() -> Vec<Transaction> {
    use TransactionKind::{Credit, Debit};
    use TransactionStatus::{Completed, Failed, Pending};

    vec![
        transaction(
            "txn_001",
            "1",
            125_050,
            Credit,
            Completed,
            "Payment received",
            date!(2024 - 03 - 15),
        ),
        transaction(
            "txn_002",
            "2",
            75_000,
            Debit,
            Pending,
            "Subscription renewal",
            date!(2024 - 03 - 14),
        ),
        transaction(
            "txn_003",
            "3",
            210_025,
            Credit,
            Completed,
            "Refund processed",
            date!(2024 - 03 - 13),
        ),
        transaction(
            "txn_004",
            "4",
            50_000,
            Debit,
            Failed,
            "Payment declined",
            date!(2024 - 03 - 12),
        ),
        transaction(
            "txn_005",
            "5",
            180_075,
            Credit,
            Completed,
            "Invoice payment",
            date!(2024 - 03 - 11),
        ),
        transaction(
            "txn_006",
            "6",
            32_550,
            Debit,
            Pending,
            "Monthly subscription",
            date!(2024 - 03 - 10),
        ),
        transaction(
            "txn_007",
            "1",
            95_000,
            Credit,
            Completed,
            "Bonus payment",
            date!(2024 - 03 - 09),
        ),
        transaction(
            "txn_008",
            "2",
            120_030,
            Debit,
            Completed,
            "Purchase order",
            date!(2024 - 03 - 08),
        ),
    ]
}

/// Monthly revenue for the dashboard chart, January through June.
pub fn revenue_series() -> Vec<RevenuePoint> {
    [
        ("Jan", 12_500),
        ("Feb", 18_750),
        ("Mar", 15_200),
        ("Apr", 22_100),
        ("May", 19_800),
        ("Jun", 25_300),
    ]
    .into_iter()
    .map(|(month, revenue)| RevenuePoint {
        month: month.to_owned(),
        revenue,
    })
    .collect()
}

#[derive(Debug, Clone)]
struct DeterministicRng {
    state: u64,
}

impl DeterministicRng {
    fn new(seed: u64) -> Self {
        let mut state = seed ^ 0x9E37_79B9_7F4A_7C15;
        if state == 0 {
            state = 0xA409_3822_299F_31D0;
        }
        Self { state }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);

        let mut x = self.state;
        x ^= x >> 13;
        x ^= x << 7;
        x ^= x >> 17;
        x
    }

    fn int_n(&mut self, n: usize) -> usize {
        if n <= 1 {
            return 0;
        }
        (self.next_u64() % (n as u64)) as usize
    }

    fn bool(&mut self) -> bool {
        (self.next_u64() & 1) == 1
    }
}

/// Seeded generator for data sets larger than the built-in fixtures.
#[derive(Debug, Clone)]
pub struct AdminFaker {
    rng: DeterministicRng,
    seed: u64,
}

impl AdminFaker {
    pub fn new(seed: u64) -> Self {
        let normalized = if seed == 0 { 1 } else { seed };
        Self {
            rng: DeterministicRng::new(normalized),
            seed: normalized,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn int_n(&mut self, n: usize) -> usize {
        self.rng.int_n(n)
    }

    /// `index` becomes the id, so ids stay unique within one data set.
    pub fn user(&mut self, index: usize) -> User {
        let first = self.pick(&FIRST_NAMES);
        let last = self.pick(&LAST_NAMES);
        let domain = self.pick(&EMAIL_DOMAINS);
        User {
            id: UserId::new((index + 1).to_string()),
            name: format!("{first} {last}"),
            email: format!(
                "{}.{}{}@{domain}",
                first.to_lowercase(),
                last.to_lowercase(),
                index + 1
            ),
            role: *self.pick_of(&UserRole::ALL),
            status: *self.pick_of(&UserStatus::ALL),
            created_at: self.recent_date(),
        }
    }

    pub fn transaction(&mut self, index: usize, owner: &UserId) -> Transaction {
        let kind = if self.rng.bool() {
            TransactionKind::Credit
        } else {
            TransactionKind::Debit
        };
        let description = match kind {
            TransactionKind::Credit => self.pick(&CREDIT_DESCRIPTIONS),
            TransactionKind::Debit => self.pick(&DEBIT_DESCRIPTIONS),
        };
        let status = match self.rng.int_n(6) {
            0 => TransactionStatus::Failed,
            1 | 2 => TransactionStatus::Pending,
            _ => TransactionStatus::Completed,
        };
        Transaction {
            id: TransactionId::new(format!("txn_{:03}", index + 1)),
            user_id: owner.clone(),
            amount_cents: self.int_range_i64(1_000, 300_000),
            kind,
            status,
            description: description.to_owned(),
            date: self.recent_date(),
        }
    }

    /// `count` users and `count` transactions spread across them.
    pub fn dataset(&mut self, count: usize) -> (Vec<User>, Vec<Transaction>) {
        let users = (0..count).map(|index| self.user(index)).collect::<Vec<_>>();
        let transactions = (0..count)
            .map(|index| {
                let owner = users[self.rng.int_n(users.len())].id.clone();
                self.transaction(index, &owner)
            })
            .collect();
        (users, transactions)
    }

    fn pick<'a>(&mut self, items: &'a [&'a str]) -> &'a str {
        items[self.rng.int_n(items.len())]
    }

    fn pick_of<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[self.rng.int_n(items.len())]
    }

    fn int_range_i64(&mut self, min: i64, max: i64) -> i64 {
        if max <= min {
            return min;
        }
        let span = max - min + 1;
        min + (self.rng.next_u64() % (span as u64)) as i64
    }

    fn recent_date(&mut self) -> Date {
        let back = self.int_range_i64(0, GENERATED_SPAN_DAYS);
        reference_date().saturating_sub(Duration::days(back))
    }
}

pub fn temp_export_dir() -> Result<(tempfile::TempDir, PathBuf)> {
    let dir = tempfile::tempdir().context("create temp dir")?;
    let export_dir = dir.path().join("exports");
    Ok((dir, export_dir))
}

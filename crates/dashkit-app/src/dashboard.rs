// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};

use crate::{Transaction, TransactionKind, TransactionStatus, User, UserRole, UserStatus};

pub const RECENT_TRANSACTION_LIMIT: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct DashboardStats {
    pub total_users: usize,
    pub active_users: usize,
    pub pending_transactions: usize,
    pub revenue_cents: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct UserSummary {
    pub active: usize,
    pub pending: usize,
    pub admins: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevenuePoint {
    pub month: String,
    pub revenue: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RevenueBar {
    pub month: String,
    pub revenue: i64,
    pub width_percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSnapshot {
    pub stats: DashboardStats,
    pub revenue: Vec<RevenueBar>,
    pub recent: Vec<Transaction>,
}

impl DashboardSnapshot {
    pub fn build(users: &[User], transactions: &[Transaction], revenue: &[RevenuePoint]) -> Self {
        Self {
            stats: DashboardStats::compute(users, transactions),
            revenue: revenue_bars(revenue),
            recent: recent_transactions(transactions, RECENT_TRANSACTION_LIMIT),
        }
    }
}

impl DashboardStats {
    /// Revenue counts completed credits only; pending and failed money never landed.
    pub fn compute(users: &[User], transactions: &[Transaction]) -> Self {
        Self {
            total_users: users.len(),
            active_users: users
                .iter()
                .filter(|user| user.status == UserStatus::Active)
                .count(),
            pending_transactions: transactions
                .iter()
                .filter(|transaction| transaction.status == TransactionStatus::Pending)
                .count(),
            revenue_cents: transactions
                .iter()
                .filter(|transaction| {
                    transaction.kind == TransactionKind::Credit
                        && transaction.status == TransactionStatus::Completed
                })
                .map(|transaction| transaction.amount_cents)
                .sum(),
        }
    }
}

impl UserSummary {
    pub fn compute(users: &[User]) -> Self {
        let mut summary = Self::default();
        for user in users {
            match user.status {
                UserStatus::Active => summary.active += 1,
                UserStatus::Pending => summary.pending += 1,
                UserStatus::Inactive => {}
            }
            if user.role == UserRole::Admin {
                summary.admins += 1;
            }
        }
        summary
    }
}

pub fn revenue_bars(points: &[RevenuePoint]) -> Vec<RevenueBar> {
    let max = points.iter().map(|point| point.revenue).max().unwrap_or(0);
    points
        .iter()
        .map(|point| RevenueBar {
            month: point.month.clone(),
            revenue: point.revenue,
            width_percent: if max <= 0 {
                0.0
            } else {
                (point.revenue as f64 / max as f64) * 100.0
            },
        })
        .collect()
}

/// Newest first; equal dates keep their list order.
pub fn recent_transactions(transactions: &[Transaction], limit: usize) -> Vec<Transaction> {
    let mut sorted = transactions.to_vec();
    sorted.sort_by(|left, right| right.date.cmp(&left.date));
    sorted.truncate(limit);
    sorted
}

// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, bail};

use crate::PageKind;

pub const MOBILE_WIDTH_THRESHOLD: u16 = 768;

/// Layout flags shared by every page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LayoutContext {
    pub sidebar_collapsed: bool,
    pub is_mobile: bool,
}

impl LayoutContext {
    pub fn resize(&mut self, width: u16) {
        self.is_mobile = width < MOBILE_WIDTH_THRESHOLD;
        if self.is_mobile {
            self.sidebar_collapsed = true;
        }
    }

    /// Mobile layouts have no toggle; the sidebar stays collapsed.
    pub fn toggle_sidebar(&mut self) -> bool {
        if self.is_mobile {
            return false;
        }
        self.sidebar_collapsed = !self.sidebar_collapsed;
        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Error,
}

/// Non-blocking message shown until the next notice replaces it or it is cleared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

/// Single in-flight slot for a create operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingCreate<T> {
    Idle,
    Pending,
    Succeeded(T),
    Failed(String),
}

impl<T> Default for PendingCreate<T> {
    fn default() -> Self {
        Self::Idle
    }
}

impl<T> PendingCreate<T> {
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    pub fn begin(&mut self) -> Result<()> {
        if self.is_pending() {
            bail!("a create is already in progress -- wait for it to finish");
        }
        *self = Self::Pending;
        Ok(())
    }

    pub fn resolve(&mut self, outcome: Result<T>) -> Result<()> {
        if !self.is_pending() {
            bail!("no create is in progress");
        }
        *self = match outcome {
            Ok(created) => Self::Succeeded(created),
            Err(error) => Self::Failed(format!("{error:#}")),
        };
        Ok(())
    }

    pub fn reset(&mut self) {
        *self = Self::Idle;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    pub active_page: PageKind,
    pub layout: LayoutContext,
    pub notice: Option<Notice>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            active_page: PageKind::Dashboard,
            layout: LayoutContext::default(),
            notice: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppCommand {
    NextPage,
    PrevPage,
    Navigate(PageKind),
    ToggleSidebar,
    Resize(u16),
    Notify(Notice),
    ClearNotice,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    PageChanged(PageKind),
    LayoutChanged(LayoutContext),
    NoticeShown(Notice),
    NoticeCleared,
}

impl AppState {
    pub fn dispatch(&mut self, command: AppCommand) -> Vec<AppEvent> {
        match command {
            AppCommand::NextPage => self.rotate_page(1),
            AppCommand::PrevPage => self.rotate_page(-1),
            AppCommand::Navigate(page) => {
                if self.active_page == page {
                    return Vec::new();
                }
                self.active_page = page;
                vec![AppEvent::PageChanged(page)]
            }
            AppCommand::ToggleSidebar => {
                if self.layout.toggle_sidebar() {
                    vec![AppEvent::LayoutChanged(self.layout)]
                } else {
                    Vec::new()
                }
            }
            AppCommand::Resize(width) => {
                let before = self.layout;
                self.layout.resize(width);
                if before == self.layout {
                    Vec::new()
                } else {
                    vec![AppEvent::LayoutChanged(self.layout)]
                }
            }
            AppCommand::Notify(notice) => {
                self.notice = Some(notice.clone());
                vec![AppEvent::NoticeShown(notice)]
            }
            AppCommand::ClearNotice => {
                self.notice = None;
                vec![AppEvent::NoticeCleared]
            }
        }
    }

    fn rotate_page(&mut self, delta: isize) -> Vec<AppEvent> {
        let pages = PageKind::NAV;
        // The add-user form sits under the users entry.
        let anchor = match self.active_page {
            PageKind::AddUser => PageKind::Users,
            page => page,
        };
        let current = pages
            .iter()
            .position(|page| *page == anchor)
            .unwrap_or(0) as isize;
        let len = pages.len() as isize;
        let next = (current + delta).rem_euclid(len) as usize;
        self.active_page = pages[next];
        vec![AppEvent::PageChanged(self.active_page)]
    }
}

// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use dashkit_app::{
    AppCommand, AppState, DashboardSnapshot, NewUserInput, Notice, NoticeLevel, PageKind,
    PendingCreate, RevenuePoint, SettingKey, Settings, Transaction, User, UserId, UserRole,
    UserStatus, UserSummary, apply_setting, format_cents, validate_settings,
};
use dashkit_view::{
    ExportFormat, ExportScope, ExportSink, Exporter, ModalMode, Record, RowActionModal,
    RowActions, RowMutation, Submission, TRANSACTION_FIELDS, TabularDataView, USER_FIELDS,
    ViewStatus, transaction_view_config, user_view_config,
};
use std::io::{BufRead, Write};
use time::Date;
use tracing::{debug, info, warn};

const TRANSACTION_COLUMNS: [&str; 6] = ["id", "description", "amount", "kind", "status", "date"];
const BAR_WIDTH: f64 = 20.0;

pub const HELP: &str = "\
commands:
  pages                         list pages
  go <page>|next|prev           switch page (dashboard, users, add, transactions, settings)
  show                          redraw the current page
  search [text]                 filter the table; empty clears
  sort <field>                  sort by field; again to flip direction
  page <n> | next | prev        move between table pages
  view|delete|refund <id>       open a row action
  edit <id> [field=value ...]   open the edit form and stage changes
  submit [args]                 submit the open action (field=value, or a refund amount)
  close                         close the open action, discarding changes
  export csv|json [all]         export the filtered rows, or every row with `all`
  add field=value ...           create a user (name, email, role, status, password, confirm)
  set <key> <value>             change a setting in the draft
  save                          save the settings draft
  sidebar                       toggle the sidebar
  resize <width>                report a new terminal width
  stats                         dashboard numbers
  help                          this text
  quit                          leave";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageTarget {
    Page(PageKind),
    Next,
    Prev,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    Show,
    Pages,
    Go(PageTarget),
    Search(String),
    Sort(String),
    Page(usize),
    Next,
    Prev,
    Open {
        id: String,
        mode: ModalMode,
        edits: Vec<(String, String)>,
    },
    Submit(Vec<String>),
    Close,
    Export {
        format: ExportFormat,
        scope: ExportScope,
    },
    Add(Vec<(String, String)>),
    Set {
        key: SettingKey,
        value: String,
    },
    Save,
    Sidebar,
    Resize(u16),
    Stats,
    Help,
    Quit,
}

impl ConsoleCommand {
    pub fn parse(line: &str) -> Result<Self> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };
        let name = word.to_ascii_lowercase();

        let command = match name.as_str() {
            "" | "show" => Self::Show,
            "pages" => Self::Pages,
            "go" => Self::Go(parse_page_target(rest)?),
            "search" => Self::Search(unquote(rest).to_owned()),
            "sort" => Self::Sort(required(rest, "sort <field>")?.to_owned()),
            "page" => {
                let raw = required(rest, "page <n>")?;
                let page = raw
                    .parse::<usize>()
                    .with_context(|| format!("page {raw:?} is not a page number"))?;
                Self::Page(page)
            }
            "next" => Self::Next,
            "prev" => Self::Prev,
            "view" | "edit" | "delete" | "refund" => {
                let mode = match name.as_str() {
                    "view" => ModalMode::View,
                    "edit" => ModalMode::Edit,
                    "delete" => ModalMode::DeleteConfirm,
                    _ => ModalMode::Refund,
                };
                let words = split_words(rest)?;
                let Some((id, assignments)) = words.split_first() else {
                    bail!("{name} needs a record id -- for example `{name} 1`");
                };
                if mode != ModalMode::Edit && !assignments.is_empty() {
                    bail!("{name} takes only a record id");
                }
                Self::Open {
                    id: id.clone(),
                    mode,
                    edits: parse_assignments(assignments)?,
                }
            }
            "submit" => Self::Submit(split_words(rest)?),
            "close" => Self::Close,
            "export" => {
                let words = split_words(rest)?;
                let format = words
                    .first()
                    .and_then(|raw| ExportFormat::parse(raw))
                    .ok_or_else(|| anyhow!("export needs a format -- `export csv` or `export json`"))?;
                let scope = match words.get(1).map(String::as_str) {
                    None => ExportScope::Filtered,
                    Some("all") => ExportScope::All,
                    Some(other) => bail!("unknown export scope {other:?}; add `all` or nothing"),
                };
                if words.len() > 2 {
                    bail!("export takes a format and an optional `all`");
                }
                Self::Export { format, scope }
            }
            "add" => Self::Add(parse_assignments(&split_words(rest)?)?),
            "set" => {
                let (raw_key, value) = match rest.split_once(char::is_whitespace) {
                    Some((key, value)) => (key, value.trim()),
                    None => (rest, ""),
                };
                let key = SettingKey::parse(raw_key).ok_or_else(|| {
                    anyhow!(
                        "unknown setting {raw_key:?}; choose one of {}",
                        SettingKey::ALL.map(SettingKey::as_str).join(", ")
                    )
                })?;
                Self::Set {
                    key,
                    value: unquote(value).to_owned(),
                }
            }
            "save" => Self::Save,
            "sidebar" => Self::Sidebar,
            "resize" => {
                let raw = required(rest, "resize <width>")?;
                let width = raw
                    .parse::<u16>()
                    .with_context(|| format!("width {raw:?} is not a column count"))?;
                Self::Resize(width)
            }
            "stats" => Self::Stats,
            "help" | "?" => Self::Help,
            "quit" | "exit" => Self::Quit,
            other => bail!("unknown command {other:?}; type `help` for the list"),
        };
        Ok(command)
    }
}

fn parse_page_target(raw: &str) -> Result<PageTarget> {
    match raw.to_ascii_lowercase().as_str() {
        "next" => Ok(PageTarget::Next),
        "prev" => Ok(PageTarget::Prev),
        other => PageKind::parse(other).map(PageTarget::Page).ok_or_else(|| {
            anyhow!("unknown page {other:?}; try dashboard, users, add, transactions or settings")
        }),
    }
}

fn required<'a>(raw: &'a str, usage: &str) -> Result<&'a str> {
    if raw.is_empty() {
        bail!("missing argument -- usage: {usage}");
    }
    Ok(raw)
}

fn unquote(raw: &str) -> &str {
    raw.strip_prefix('"')
        .and_then(|inner| inner.strip_suffix('"'))
        .unwrap_or(raw)
}

/// Whitespace-separated words; double quotes group words and are dropped.
fn split_words(raw: &str) -> Result<Vec<String>> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut started = false;
    let mut quoted = false;
    for ch in raw.chars() {
        match ch {
            '"' => {
                quoted = !quoted;
                started = true;
            }
            ch if ch.is_whitespace() && !quoted => {
                if started {
                    words.push(std::mem::take(&mut current));
                    started = false;
                }
            }
            ch => {
                current.push(ch);
                started = true;
            }
        }
    }
    if quoted {
        bail!("unterminated quote in {raw:?}");
    }
    if started {
        words.push(current);
    }
    Ok(words)
}

fn parse_assignments(words: &[String]) -> Result<Vec<(String, String)>> {
    words
        .iter()
        .map(|word| {
            word.split_once('=')
                .map(|(field, value)| (field.trim().to_ascii_lowercase(), value.to_owned()))
                .ok_or_else(|| anyhow!("expected field=value, got {word:?}"))
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TableKind {
    Users,
    Transactions,
}

/// Runs `$body` against whichever table the active page shows.
macro_rules! with_table {
    ($console:expr, $view:ident => $body:expr) => {
        match $console.active_table()? {
            TableKind::Users => {
                let $view = &mut $console.users;
                $body
            }
            TableKind::Transactions => {
                let $view = &mut $console.transactions;
                $body
            }
        }
    };
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Continue(String),
    Quit,
}

/// Records the console starts from.
#[derive(Debug, Clone, Default)]
pub struct ConsoleData {
    pub users: Vec<User>,
    pub transactions: Vec<Transaction>,
    pub revenue: Vec<RevenuePoint>,
}

/// Line-driven front end over the dashboard state.
pub struct Console<S> {
    state: AppState,
    users: TabularDataView<User>,
    transactions: TabularDataView<Transaction>,
    user_modal: RowActionModal<User>,
    transaction_modal: RowActionModal<Transaction>,
    settings: Settings,
    settings_draft: Settings,
    create: PendingCreate<User>,
    revenue: Vec<RevenuePoint>,
    exporter: Exporter<S>,
    today: Date,
}

impl<S: ExportSink> Console<S> {
    pub fn new(data: ConsoleData, page_size: usize, sink: S, today: Date) -> Result<Self> {
        Ok(Self {
            state: AppState::default(),
            users: TabularDataView::new(data.users, user_view_config(page_size))?,
            transactions: TabularDataView::new(
                data.transactions,
                transaction_view_config(page_size),
            )?,
            user_modal: RowActionModal::new(),
            transaction_modal: RowActionModal::new(),
            settings: Settings::default(),
            settings_draft: Settings::default(),
            create: PendingCreate::default(),
            revenue: data.revenue,
            exporter: Exporter::new(sink),
            today,
        })
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn users(&self) -> &TabularDataView<User> {
        &self.users
    }

    pub fn transactions(&self) -> &TabularDataView<Transaction> {
        &self.transactions
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn sink(&self) -> &S {
        self.exporter.sink()
    }

    pub fn run<I: BufRead, W: Write>(&mut self, input: I, output: &mut W) -> Result<()> {
        writeln!(output, "{}", self.render()).context("write console output")?;
        for line in input.lines() {
            let line = line.context("read console input")?;
            match self.execute(&line) {
                Step::Continue(text) => {
                    writeln!(output, "{text}").context("write console output")?;
                    output.flush().context("flush console output")?;
                }
                Step::Quit => break,
            }
        }
        info!("console closed");
        Ok(())
    }

    /// Refused commands leave the data untouched and surface as an error notice.
    pub fn execute(&mut self, line: &str) -> Step {
        if self.state.notice.is_some() {
            self.state.dispatch(AppCommand::ClearNotice);
        }
        let outcome = ConsoleCommand::parse(line).and_then(|command| {
            if command == ConsoleCommand::Quit {
                return Ok(None);
            }
            debug!(?command, "console command");
            self.apply(command).map(Some)
        });
        match outcome {
            Ok(None) => Step::Quit,
            Ok(Some(output)) => Step::Continue(self.with_notice(output)),
            Err(error) => {
                warn!(error = %format!("{error:#}"), "command refused");
                self.notify(Notice::error(format!("{error:#}")));
                Step::Continue(self.with_notice(String::new()))
            }
        }
    }

    fn apply(&mut self, command: ConsoleCommand) -> Result<String> {
        match command {
            ConsoleCommand::Show => {}
            ConsoleCommand::Pages => return Ok(self.render_pages()),
            ConsoleCommand::Go(target) => {
                let command = match target {
                    PageTarget::Page(page) => AppCommand::Navigate(page),
                    PageTarget::Next => AppCommand::NextPage,
                    PageTarget::Prev => AppCommand::PrevPage,
                };
                self.state.dispatch(command);
            }
            ConsoleCommand::Search(text) => {
                let status = with_table!(self, view => view.set_filter_text(text));
                self.notify_status(&status);
            }
            ConsoleCommand::Sort(field) => {
                let status = with_table!(self, view => view.set_sort(&field));
                self.notify_status(&status);
            }
            ConsoleCommand::Page(page) => {
                let status = with_table!(self, view => view.set_page(page));
                self.notify_status(&status);
            }
            ConsoleCommand::Next => {
                let status = with_table!(self, view => view.next_page());
                self.notify_status(&status);
            }
            ConsoleCommand::Prev => {
                let status = with_table!(self, view => view.prev_page());
                self.notify_status(&status);
            }
            ConsoleCommand::Open { id, mode, edits } => self.open(&id, mode, edits)?,
            ConsoleCommand::Submit(args) => self.submit(args)?,
            ConsoleCommand::Close => {
                let closed = match self.active_table()? {
                    TableKind::Users => self.user_modal.close(),
                    TableKind::Transactions => self.transaction_modal.close(),
                };
                if !closed {
                    self.notify(Notice::info("nothing to close"));
                }
            }
            ConsoleCommand::Export { format, scope } => self.export(format, scope)?,
            ConsoleCommand::Add(fields) => self.add_user(fields)?,
            ConsoleCommand::Set { key, value } => {
                self.state.dispatch(AppCommand::Navigate(PageKind::Settings));
                apply_setting(&mut self.settings_draft, key, &value)?;
                self.notify(Notice::info(format!("{} changed; `save` to keep it", key.label())));
            }
            ConsoleCommand::Save => {
                self.state.dispatch(AppCommand::Navigate(PageKind::Settings));
                validate_settings(&self.settings_draft)?;
                self.settings = self.settings_draft.clone();
                info!(site_name = %self.settings.site_name, "settings saved");
                self.notify(Notice::success("Settings saved successfully!"));
            }
            ConsoleCommand::Sidebar => {
                if self.state.dispatch(AppCommand::ToggleSidebar).is_empty() {
                    self.notify(Notice::info("the sidebar stays collapsed on narrow screens"));
                }
            }
            ConsoleCommand::Resize(width) => {
                self.state.dispatch(AppCommand::Resize(width));
            }
            ConsoleCommand::Stats => return Ok(self.render_stats()),
            ConsoleCommand::Help => return Ok(HELP.to_owned()),
            ConsoleCommand::Quit => {}
        }
        Ok(self.render())
    }

    fn active_table(&self) -> Result<TableKind> {
        match self.state.active_page {
            PageKind::Users => Ok(TableKind::Users),
            PageKind::Transactions => Ok(TableKind::Transactions),
            page => bail!(
                "the {} page has no table -- `go users` or `go transactions` first",
                page.label()
            ),
        }
    }

    fn open(&mut self, id: &str, mode: ModalMode, edits: Vec<(String, String)>) -> Result<()> {
        match self.active_table()? {
            TableKind::Users => {
                let user = self
                    .users
                    .get(id)
                    .cloned()
                    .ok_or_else(|| anyhow!("no user with id {id:?}"))?;
                // Staged on a fresh modal so a refused edit keeps the open one.
                let mut modal = RowActionModal::new();
                modal.open(user, mode)?;
                for (field, value) in edits {
                    modal.stage_edit(&field, value)?;
                }
                self.user_modal = modal;
            }
            TableKind::Transactions => {
                let transaction = self
                    .transactions
                    .get(id)
                    .cloned()
                    .ok_or_else(|| anyhow!("no transaction with id {id:?}"))?;
                self.transaction_modal.open(transaction, mode)?;
            }
        }
        Ok(())
    }

    fn submit(&mut self, args: Vec<String>) -> Result<()> {
        let message = match self.active_table()? {
            TableKind::Users => {
                let mode = open_mode(&self.user_modal)?;
                let mutation = self.user_modal.submit(submission_for(mode, args)?)?;
                let message = describe(&mutation, "user");
                self.users.apply(mutation)?;
                message
            }
            TableKind::Transactions => {
                let mode = open_mode(&self.transaction_modal)?;
                let mutation = self.transaction_modal.submit(submission_for(mode, args)?)?;
                let message = describe(&mutation, "transaction");
                self.transactions.apply(mutation)?;
                message
            }
        };
        self.notify(Notice::success(message));
        Ok(())
    }

    fn export(&mut self, format: ExportFormat, scope: ExportScope) -> Result<()> {
        let blob = match self.active_table()? {
            TableKind::Users => self.exporter.export_view(
                "users",
                &self.users,
                scope,
                &USER_FIELDS,
                format,
                self.today,
            )?,
            TableKind::Transactions => self.exporter.export_view(
                "transactions",
                &self.transactions,
                scope,
                &TRANSACTION_FIELDS,
                format,
                self.today,
            )?,
        };
        self.notify(Notice::success(format!("saved {}", blob.file_name)));
        Ok(())
    }

    fn add_user(&mut self, fields: Vec<(String, String)>) -> Result<()> {
        self.state.dispatch(AppCommand::Navigate(PageKind::AddUser));

        let mut input = NewUserInput::default();
        for (field, value) in fields {
            match field.as_str() {
                "name" => input.name = value,
                "email" => input.email = value,
                "role" => {
                    input.role = UserRole::parse(&value)
                        .ok_or_else(|| anyhow!("unknown role {value:?}; choose Admin, User or Manager"))?;
                }
                "status" => {
                    input.status = UserStatus::parse(&value).ok_or_else(|| {
                        anyhow!("unknown status {value:?}; choose Active, Inactive or Pending")
                    })?;
                }
                "password" => input.password = value,
                "confirm" | "confirm_password" => input.confirm_password = value,
                other => bail!(
                    "unknown field {other:?}; use name, email, role, status, password and confirm"
                ),
            }
        }
        input.validate()?;

        self.create.begin()?;
        let outcome = self.create_user(&input);
        self.create.resolve(outcome)?;
        let result = match &self.create {
            PendingCreate::Succeeded(user) => Ok(user.name.clone()),
            PendingCreate::Failed(message) => Err(anyhow!("{message}")),
            PendingCreate::Idle | PendingCreate::Pending => {
                Err(anyhow!("the create did not finish"))
            }
        };
        self.create.reset();

        let name = result?;
        self.state.dispatch(AppCommand::Navigate(PageKind::Users));
        self.notify(Notice::success(format!("User {name} created successfully!")));
        Ok(())
    }

    fn create_user(&mut self, input: &NewUserInput) -> Result<User> {
        let email = input.email.trim();
        if self
            .users
            .records()
            .iter()
            .any(|user| user.email.eq_ignore_ascii_case(email))
        {
            bail!("a user with email {email} already exists");
        }
        let user = User {
            id: next_user_id(self.users.records()),
            name: input.name.trim().to_owned(),
            email: email.to_owned(),
            role: input.role,
            status: input.status,
            created_at: self.today,
        };
        self.users.insert(user.clone())?;
        info!(id = %user.id, "user created");
        Ok(user)
    }

    fn notify(&mut self, notice: Notice) {
        self.state.dispatch(AppCommand::Notify(notice));
    }

    fn notify_status(&mut self, status: &ViewStatus) {
        let notice = match status {
            ViewStatus::SortUnavailable(_) => Notice::error(status.message()),
            _ => Notice::info(status.message()),
        };
        self.notify(notice);
    }

    fn with_notice(&self, output: String) -> String {
        let Some(notice) = &self.state.notice else {
            return output;
        };
        let tag = match notice.level {
            NoticeLevel::Info => "info",
            NoticeLevel::Success => "ok",
            NoticeLevel::Error => "error",
        };
        if output.is_empty() {
            format!("[{tag}] {}", notice.message)
        } else {
            format!("{output}\n[{tag}] {}", notice.message)
        }
    }

    pub fn render(&self) -> String {
        let mut lines = self.render_header();
        match self.state.active_page {
            PageKind::Dashboard => lines.extend(self.render_dashboard()),
            PageKind::Users => {
                lines.extend(render_table(&self.users, &USER_FIELDS));
                lines.extend(render_modal(&self.user_modal, &USER_FIELDS));
            }
            PageKind::Transactions => {
                lines.extend(render_table(&self.transactions, &TRANSACTION_COLUMNS));
                lines.extend(render_modal(&self.transaction_modal, &TRANSACTION_FIELDS));
            }
            PageKind::AddUser => lines.extend(self.render_add_user()),
            PageKind::Settings => lines.extend(self.render_settings()),
        }
        lines.join("\n")
    }

    fn render_header(&self) -> Vec<String> {
        let layout = self.state.layout;
        let mut flags = vec![if layout.sidebar_collapsed {
            "sidebar collapsed"
        } else {
            "sidebar open"
        }];
        if layout.is_mobile {
            flags.push("mobile");
        }
        let mut lines = vec![format!(
            "== {} | {} ({}) ==",
            self.settings.site_name,
            self.state.active_page.label(),
            flags.join(", ")
        )];
        if !layout.sidebar_collapsed {
            lines.push(self.nav_line());
        }
        lines
    }

    fn nav_line(&self) -> String {
        let active = match self.state.active_page {
            PageKind::AddUser => PageKind::Users,
            page => page,
        };
        PageKind::NAV
            .iter()
            .map(|page| {
                if *page == active {
                    format!("[{}]", page.label())
                } else {
                    page.label().to_owned()
                }
            })
            .collect::<Vec<_>>()
            .join("  ")
    }

    fn render_pages(&self) -> String {
        PageKind::NAV
            .iter()
            .chain([PageKind::AddUser].iter())
            .map(|page| {
                let marker = if *page == self.state.active_page { "*" } else { " " };
                format!("{marker} {:<13} {}", page.label(), page.route())
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn render_dashboard(&self) -> Vec<String> {
        let snapshot = DashboardSnapshot::build(
            self.users.records(),
            self.transactions.records(),
            &self.revenue,
        );
        let mut lines = self.stats_lines();
        lines.push(String::new());
        lines.push("revenue".to_owned());
        for bar in &snapshot.revenue {
            let filled = ((bar.width_percent / 100.0) * BAR_WIDTH).round() as usize;
            lines.push(format!(
                "  {:<4} {:<20} {}",
                bar.month,
                "#".repeat(filled),
                bar.revenue
            ));
        }
        lines.push(String::new());
        lines.push("recent transactions".to_owned());
        for transaction in &snapshot.recent {
            lines.push(format!(
                "  {}  {}  {:<22} {}{}  {}",
                transaction.id,
                transaction.date,
                transaction.description,
                transaction.kind.sign(),
                format_cents(transaction.amount_cents),
                transaction.status.as_str()
            ));
        }
        lines
    }

    fn stats_lines(&self) -> Vec<String> {
        let snapshot = DashboardSnapshot::build(
            self.users.records(),
            self.transactions.records(),
            &self.revenue,
        );
        let stats = snapshot.stats;
        let summary = UserSummary::compute(self.users.records());
        vec![
            format!("  total users           {}", stats.total_users),
            format!("  active users          {}", stats.active_users),
            format!("  pending transactions  {}", stats.pending_transactions),
            format!("  revenue               {}", format_cents(stats.revenue_cents)),
            format!(
                "  users: {} active, {} pending, {} admins",
                summary.active, summary.pending, summary.admins
            ),
        ]
    }

    fn render_stats(&self) -> String {
        self.stats_lines().join("\n")
    }

    fn render_add_user(&self) -> Vec<String> {
        let roles = UserRole::ALL.map(UserRole::as_str).join("|");
        let statuses = UserStatus::ALL.map(UserStatus::as_str).join("|");
        vec![
            "new user".to_owned(),
            format!(
                "  add name=\"Full Name\" email=user@example.com role={roles} status={statuses} password=... confirm=..."
            ),
            format!(
                "  defaults: role {}, status {}",
                UserRole::User.as_str(),
                UserStatus::Active.as_str()
            ),
        ]
    }

    fn render_settings(&self) -> Vec<String> {
        let mut lines = vec!["settings (* = unsaved)".to_owned()];
        for key in SettingKey::ALL {
            let draft = self.settings_draft.display(key);
            let marker = if draft == self.settings.display(key) {
                " "
            } else {
                "*"
            };
            lines.push(format!("{marker} {:<17} {:<20} {draft}", key.as_str(), key.label()));
        }
        lines
    }
}

fn open_mode<R: RowActions>(modal: &RowActionModal<R>) -> Result<ModalMode> {
    modal
        .mode()
        .ok_or_else(|| anyhow!("nothing is open -- use view, edit, delete or refund first"))
}

fn submission_for(mode: ModalMode, args: Vec<String>) -> Result<Submission> {
    match mode {
        ModalMode::Edit => Ok(Submission::Edit(
            parse_assignments(&args)?.into_iter().collect(),
        )),
        // The modal refuses submits in view mode itself.
        ModalMode::View | ModalMode::DeleteConfirm => {
            if !args.is_empty() {
                bail!("{} takes no arguments; `submit` alone confirms it", mode.label());
            }
            Ok(Submission::ConfirmDelete)
        }
        ModalMode::Refund => match args.as_slice() {
            [] => Ok(Submission::Refund(None)),
            [amount] => Ok(Submission::Refund(Some(amount.clone()))),
            _ => bail!("refund takes at most one amount"),
        },
    }
}

fn describe<R: Record>(mutation: &RowMutation<R>, noun: &str) -> String {
    match mutation {
        RowMutation::Replace(record) => format!("{noun} {} updated", record.id()),
        RowMutation::Remove(id) => format!("{noun} {id} deleted"),
        RowMutation::RefundIssued { id, amount_cents } => {
            format!("refund of {} issued for {id}", format_cents(*amount_cents))
        }
    }
}

fn next_user_id(users: &[User]) -> UserId {
    let highest = users
        .iter()
        .filter_map(|user| user.id.as_str().parse::<u64>().ok())
        .max()
        .unwrap_or(0);
    UserId::new((highest + 1).to_string())
}

fn render_table<R: Record>(view: &TabularDataView<R>, columns: &[&str]) -> Vec<String> {
    let sort = view.sort();
    let headers = columns
        .iter()
        .map(|field| match sort {
            Some(sort) if sort.field == *field => format!("{field} {}", sort.direction.arrow()),
            _ => (*field).to_owned(),
        })
        .collect::<Vec<_>>();
    let rows = view
        .visible_rows()
        .map(|record| {
            columns
                .iter()
                .map(|field| {
                    record
                        .field(field)
                        .map(|value| value.display())
                        .unwrap_or_default()
                })
                .collect::<Vec<_>>()
        })
        .collect::<Vec<_>>();
    let widths = headers
        .iter()
        .enumerate()
        .map(|(index, header)| {
            rows.iter()
                .map(|row| row[index].chars().count())
                .chain([header.chars().count()])
                .max()
                .unwrap_or(0)
        })
        .collect::<Vec<_>>();

    let format_row = |cells: &[String]| {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{cell:<width$}", width = *width))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_owned()
    };

    let mut lines = Vec::new();
    if !view.filter_text().is_empty() {
        lines.push(format!("search: {}", view.filter_text()));
    }
    lines.push(format_row(headers.as_slice()));
    if rows.is_empty() {
        lines.push("(no results)".to_owned());
    }
    lines.extend(rows.iter().map(|row| format_row(row.as_slice())));

    let window = view.page_window();
    lines.push(format!(
        "Showing {} to {} of {} | page {} of {}",
        window.first,
        window.last,
        window.total,
        view.current_page(),
        view.total_pages()
    ));
    lines
}

fn render_modal<R: RowActions>(modal: &RowActionModal<R>, fields: &[&str]) -> Vec<String> {
    let (Some(record), Some(mode)) = (modal.record(), modal.mode()) else {
        return Vec::new();
    };
    let mut lines = vec![String::new(), format!("-- {} {} --", mode.label(), record.id())];
    for field in fields {
        let value = record
            .field(field)
            .map(|value| value.display())
            .unwrap_or_default();
        lines.push(format!("  {field:<12} {value}"));
    }
    match mode {
        ModalMode::View => lines.push("  `close` when done".to_owned()),
        ModalMode::Edit => {
            if let Some(edits) = modal.staged_edits() {
                for field in edits.fields() {
                    lines.push(format!(
                        "  {field:<12} -> {}",
                        edits.get(field).unwrap_or_default()
                    ));
                }
            }
            lines.push(format!(
                "  editable: {}; `submit field=value ...` to save",
                R::editable_fields().join(", ")
            ));
        }
        ModalMode::DeleteConfirm => {
            lines.push("  `submit` deletes this record, `close` keeps it".to_owned());
        }
        ModalMode::Refund => {
            lines.push(format!(
                "  refund amount {}; `submit [amount]` to issue",
                modal.staged_refund_amount().unwrap_or_default()
            ));
        }
    }
    lines
}

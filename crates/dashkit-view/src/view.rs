// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, anyhow, bail};
use dashkit_app::SortDirection;
use std::iter::FusedIterator;
use tracing::debug;

use crate::modal::RowMutation;
use crate::record::Record;

pub const DEFAULT_PAGE_SIZE: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub field: &'static str,
    pub direction: SortDirection,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewConfig {
    pub searchable_fields: Vec<&'static str>,
    pub sortable_fields: Vec<&'static str>,
    pub page_size: usize,
    pub default_sort: Option<SortSpec>,
}

/// "Showing `first` to `last` of `total`"; `first` is 0 when nothing matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub first: usize,
    pub last: usize,
    pub total: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewStatus {
    Filtered { matches: usize },
    FilterCleared,
    SortAsc(&'static str),
    SortDesc(&'static str),
    SortUnavailable(String),
    PageChanged(usize),
    PageClamped { requested: usize, page: usize },
    PageUnchanged(usize),
}

impl ViewStatus {
    pub fn message(&self) -> String {
        match self {
            Self::Filtered { matches: 0 } => "no results".to_owned(),
            Self::Filtered { matches: 1 } => "1 match".to_owned(),
            Self::Filtered { matches } => format!("{matches} matches"),
            Self::FilterCleared => "search cleared".to_owned(),
            Self::SortAsc(field) => format!("sort {field} asc"),
            Self::SortDesc(field) => format!("sort {field} desc"),
            Self::SortUnavailable(field) => format!("cannot sort by {field}"),
            Self::PageChanged(page) => format!("page {page}"),
            Self::PageClamped { requested, page } => {
                format!("page {requested} out of range, showing page {page}")
            }
            Self::PageUnchanged(page) => format!("already on page {page}"),
        }
    }
}

/// Search, sort and pagination state over an owned record list.
///
/// Everything visible is derived on demand from `(records, filter, sort, page)`,
/// so a mutation of the list is reflected by the next read.
#[derive(Debug, Clone)]
pub struct TabularDataView<R> {
    records: Vec<R>,
    searchable_fields: Vec<&'static str>,
    sortable_fields: Vec<&'static str>,
    page_size: usize,
    filter_text: String,
    sort: Option<SortSpec>,
    current_page: usize,
}

impl<R: Record> TabularDataView<R> {
    pub fn new(records: Vec<R>, config: ViewConfig) -> Result<Self> {
        if config.page_size == 0 {
            bail!("page size must be positive");
        }
        if let Some(sort) = config.default_sort
            && !config.sortable_fields.contains(&sort.field)
        {
            bail!(
                "default sort field {:?} is not one of the sortable fields {:?}",
                sort.field,
                config.sortable_fields
            );
        }
        Ok(Self {
            records,
            searchable_fields: config.searchable_fields,
            sortable_fields: config.sortable_fields,
            page_size: config.page_size,
            filter_text: String::new(),
            sort: config.default_sort,
            current_page: 1,
        })
    }

    pub fn records(&self) -> &[R] {
        &self.records
    }

    pub fn get(&self, id: &str) -> Option<&R> {
        self.records.iter().find(|record| record.id() == id)
    }

    pub fn filter_text(&self) -> &str {
        &self.filter_text
    }

    pub fn sort(&self) -> Option<SortSpec> {
        self.sort
    }

    pub fn sortable_fields(&self) -> &[&'static str] {
        &self.sortable_fields
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn set_filter_text(&mut self, text: impl Into<String>) -> ViewStatus {
        self.filter_text = text.into();
        self.current_page = 1;
        let matches = self.filtered_count();
        debug!(filter = %self.filter_text, matches, "filter updated");
        if self.filter_text.is_empty() {
            ViewStatus::FilterCleared
        } else {
            ViewStatus::Filtered { matches }
        }
    }

    /// Same field flips direction; a different field starts ascending.
    pub fn set_sort(&mut self, field: &str) -> ViewStatus {
        let Some(field) = self
            .sortable_fields
            .iter()
            .copied()
            .find(|candidate| *candidate == field)
        else {
            return ViewStatus::SortUnavailable(field.to_owned());
        };

        let direction = match self.sort {
            Some(current) if current.field == field => current.direction.flipped(),
            _ => SortDirection::Asc,
        };
        self.sort = Some(SortSpec { field, direction });
        debug!(field, ?direction, "sort updated");
        match direction {
            SortDirection::Asc => ViewStatus::SortAsc(field),
            SortDirection::Desc => ViewStatus::SortDesc(field),
        }
    }

    pub fn set_page(&mut self, page: usize) -> ViewStatus {
        let clamped = page.clamp(1, self.total_pages());
        let previous = self.current_page;
        self.current_page = clamped;
        if clamped != page {
            ViewStatus::PageClamped {
                requested: page,
                page: clamped,
            }
        } else if clamped == previous {
            ViewStatus::PageUnchanged(clamped)
        } else {
            ViewStatus::PageChanged(clamped)
        }
    }

    pub fn next_page(&mut self) -> ViewStatus {
        if self.current_page >= self.total_pages() {
            return ViewStatus::PageUnchanged(self.current_page);
        }
        self.set_page(self.current_page + 1)
    }

    pub fn prev_page(&mut self) -> ViewStatus {
        if self.current_page <= 1 {
            return ViewStatus::PageUnchanged(self.current_page);
        }
        self.set_page(self.current_page - 1)
    }

    pub fn set_page_size(&mut self, page_size: usize) -> Result<()> {
        if page_size == 0 {
            bail!("page size must be positive");
        }
        self.page_size = page_size;
        self.clamp_page();
        Ok(())
    }

    pub fn filtered_count(&self) -> usize {
        let needle = self.filter_text.to_lowercase();
        self.records
            .iter()
            .filter(|record| self.matches(record, &needle))
            .count()
    }

    /// Never below 1, even with nothing to show.
    pub fn total_pages(&self) -> usize {
        self.filtered_count().div_ceil(self.page_size).max(1)
    }

    pub fn page_window(&self) -> PageWindow {
        let total = self.filtered_count();
        let start = (self.current_page - 1) * self.page_size;
        let last = (start + self.page_size).min(total);
        PageWindow {
            first: if total == 0 { 0 } else { start + 1 },
            last,
            total,
        }
    }

    /// The whole filtered and sorted set, ignoring pagination.
    pub fn filtered(&self) -> Vec<&R> {
        self.ordered_indices()
            .into_iter()
            .map(|index| &self.records[index])
            .collect()
    }

    pub fn visible_rows(&self) -> VisibleRows<'_, R> {
        let start = (self.current_page - 1) * self.page_size;
        let indices = self
            .ordered_indices()
            .into_iter()
            .skip(start)
            .take(self.page_size)
            .collect::<Vec<_>>();
        VisibleRows {
            records: &self.records,
            indices: indices.into_iter(),
        }
    }

    pub fn insert(&mut self, record: R) -> Result<()> {
        if self.get(record.id()).is_some() {
            bail!("record {} already exists", record.id());
        }
        debug!(id = record.id(), "record inserted");
        self.records.push(record);
        self.clamp_page();
        Ok(())
    }

    /// Replaces in place so the record keeps its position for tie-breaking.
    pub fn replace(&mut self, record: R) -> Result<()> {
        let slot = self
            .records
            .iter_mut()
            .find(|existing| existing.id() == record.id())
            .ok_or_else(|| anyhow!("record {} not found", record.id()))?;
        debug!(id = record.id(), "record replaced");
        *slot = record;
        self.clamp_page();
        Ok(())
    }

    pub fn remove(&mut self, id: &str) -> Result<R> {
        let index = self
            .records
            .iter()
            .position(|record| record.id() == id)
            .ok_or_else(|| anyhow!("record {id} not found"))?;
        let removed = self.records.remove(index);
        debug!(id, "record removed");
        self.clamp_page();
        Ok(removed)
    }

    pub fn apply(&mut self, mutation: RowMutation<R>) -> Result<()> {
        match mutation {
            RowMutation::Replace(record) => self.replace(record),
            RowMutation::Remove(id) => self.remove(&id).map(|_| ()),
            RowMutation::RefundIssued { id, .. } => {
                if self.get(&id).is_none() {
                    bail!("record {id} not found");
                }
                Ok(())
            }
        }
    }

    fn matches(&self, record: &R, needle: &str) -> bool {
        if needle.is_empty() {
            return true;
        }
        self.searchable_fields.iter().any(|field| {
            record
                .field(field)
                .is_some_and(|value| value.contains_lowercase(needle))
        })
    }

    fn ordered_indices(&self) -> Vec<usize> {
        let needle = self.filter_text.to_lowercase();
        let mut indices = self
            .records
            .iter()
            .enumerate()
            .filter(|(_, record)| self.matches(record, &needle))
            .map(|(index, _)| index)
            .collect::<Vec<_>>();

        if let Some(sort) = self.sort {
            // `sort_by` is stable, so equal keys keep their list order.
            indices.sort_by(|left, right| {
                let left_value = self.records[*left].field(sort.field);
                let right_value = self.records[*right].field(sort.field);
                let order = match (&left_value, &right_value) {
                    (Some(left), Some(right)) => left.cmp_value(right),
                    (None, Some(_)) => std::cmp::Ordering::Greater,
                    (Some(_), None) => std::cmp::Ordering::Less,
                    (None, None) => std::cmp::Ordering::Equal,
                };
                match sort.direction {
                    SortDirection::Asc => order,
                    SortDirection::Desc => order.reverse(),
                }
            });
        }
        indices
    }

    fn clamp_page(&mut self) {
        let total_pages = self.total_pages();
        if self.current_page > total_pages {
            debug!(
                from = self.current_page,
                to = total_pages,
                "page clamped after list change"
            );
            self.current_page = total_pages;
        }
        self.current_page = self.current_page.max(1);
    }
}

/// Rows of the current page, in display order. Built once per call.
#[derive(Debug)]
pub struct VisibleRows<'a, R> {
    records: &'a [R],
    indices: std::vec::IntoIter<usize>,
}

impl<'a, R> Iterator for VisibleRows<'a, R> {
    type Item = &'a R;

    fn next(&mut self) -> Option<Self::Item> {
        self.indices.next().map(|index| &self.records[index])
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.indices.size_hint()
    }
}

impl<R> ExactSizeIterator for VisibleRows<'_, R> {}

impl<R> FusedIterator for VisibleRows<'_, R> {}

#[cfg(test)]
mod tests {
    use super::{SortSpec, TabularDataView, ViewConfig, ViewStatus};
    use crate::record::{FieldValue, Record};
    use dashkit_app::SortDirection;

    #[derive(Debug, Clone, PartialEq)]
    struct Row {
        id: String,
        label: String,
        score: i64,
    }

    impl Record for Row {
        fn id(&self) -> &str {
            &self.id
        }

        fn field(&self, name: &str) -> Option<FieldValue> {
            match name {
                "id" => Some(FieldValue::Text(self.id.clone())),
                "label" => Some(FieldValue::Text(self.label.clone())),
                "score" => Some(FieldValue::Number(self.score)),
                _ => None,
            }
        }
    }

    fn rows(count: usize) -> Vec<Row> {
        (1..=count)
            .map(|index| Row {
                id: format!("r{index}"),
                label: format!("row {index}"),
                score: (index % 3) as i64,
            })
            .collect()
    }

    fn view(count: usize, page_size: usize) -> TabularDataView<Row> {
        TabularDataView::new(
            rows(count),
            ViewConfig {
                searchable_fields: vec!["label"],
                sortable_fields: vec!["label", "score"],
                page_size,
                default_sort: None,
            },
        )
        .expect("valid config")
    }

    fn ids<'a>(rows: impl Iterator<Item = &'a Row>) -> Vec<&'a str> {
        rows.map(|row| row.id.as_str()).collect()
    }

    #[test]
    fn zero_page_size_is_rejected() {
        let error = TabularDataView::new(
            rows(1),
            ViewConfig {
                searchable_fields: vec![],
                sortable_fields: vec![],
                page_size: 0,
                default_sort: None,
            },
        )
        .expect_err("zero page size should fail");
        assert!(error.to_string().contains("page size must be positive"));
    }

    #[test]
    fn default_sort_must_be_sortable() {
        let result = TabularDataView::new(
            rows(1),
            ViewConfig {
                searchable_fields: vec![],
                sortable_fields: vec!["label"],
                page_size: 5,
                default_sort: Some(SortSpec {
                    field: "score",
                    direction: SortDirection::Asc,
                }),
            },
        );
        assert!(result.is_err());
    }

    #[test]
    fn empty_view_has_one_page_and_no_rows() {
        let view = view(0, 5);
        assert_eq!(view.total_pages(), 1);
        assert_eq!(view.visible_rows().len(), 0);
        let window = view.page_window();
        assert_eq!((window.first, window.last, window.total), (0, 0, 0));
    }

    #[test]
    fn sort_ties_keep_insertion_order_in_both_directions() {
        let mut view = view(6, 10);
        view.set_sort("score");
        // scores: r1=1 r2=2 r3=0 r4=1 r5=2 r6=0
        assert_eq!(
            ids(view.visible_rows()),
            vec!["r3", "r6", "r1", "r4", "r2", "r5"]
        );
        assert_eq!(view.set_sort("score"), ViewStatus::SortDesc("score"));
        assert_eq!(
            ids(view.visible_rows()),
            vec!["r2", "r5", "r1", "r4", "r3", "r6"]
        );
    }

    #[test]
    fn unknown_sort_field_leaves_state_alone() {
        let mut view = view(3, 5);
        view.set_sort("label");
        let status = view.set_sort("secret");
        assert_eq!(status, ViewStatus::SortUnavailable("secret".to_owned()));
        assert_eq!(view.sort().map(|sort| sort.field), Some("label"));
    }

    #[test]
    fn next_and_prev_stop_at_the_ends() {
        let mut view = view(7, 5);
        assert_eq!(view.prev_page(), ViewStatus::PageUnchanged(1));
        assert_eq!(view.next_page(), ViewStatus::PageChanged(2));
        assert_eq!(view.next_page(), ViewStatus::PageUnchanged(2));
        assert_eq!(view.set_page(0), ViewStatus::PageClamped { requested: 0, page: 1 });
    }

    #[test]
    fn shrinking_page_count_via_page_size_reclamps() {
        let mut view = view(10, 2);
        view.set_page(5);
        view.set_page_size(5).expect("positive size");
        assert_eq!(view.current_page(), 2);
        assert!(view.set_page_size(0).is_err());
        assert_eq!(view.page_size(), 5);
    }

    #[test]
    fn visible_rows_is_exact_size_and_fused() {
        let view = view(7, 5);
        let mut rows = view.visible_rows();
        assert_eq!(rows.len(), 5);
        for _ in 0..5 {
            assert!(rows.next().is_some());
        }
        assert!(rows.next().is_none());
        assert!(rows.next().is_none());
    }

    #[test]
    fn duplicate_insert_and_unknown_replace_fail() {
        let mut view = view(2, 5);
        let duplicate = view.records()[0].clone();
        assert!(view.insert(duplicate).is_err());

        let stranger = Row {
            id: "nope".to_owned(),
            label: String::new(),
            score: 0,
        };
        assert!(view.replace(stranger).is_err());
        assert!(view.remove("nope").is_err());
        assert_eq!(view.records().len(), 2);
    }
}

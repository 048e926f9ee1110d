// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use time::Date;
use tracing::info;

use crate::record::Record;
use crate::view::TabularDataView;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
        }
    }

    pub const fn mime_type(self) -> &'static str {
        match self {
            Self::Csv => "text/csv",
            Self::Json => "application/json",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "csv" => Some(Self::Csv),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Which rows of a view an export covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportScope {
    #[default]
    Filtered,
    All,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportBlob {
    pub file_name: String,
    pub mime_type: &'static str,
    pub bytes: Vec<u8>,
}

/// Receives finished exports. The only side effect an export has.
pub trait ExportSink {
    fn save(&mut self, blob: &ExportBlob) -> Result<()>;
}

/// Writes each blob as a file under one directory.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    /// Creates the directory when missing.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .with_context(|| format!("create export directory {}", dir.display()))?;
        if !dir.is_dir() {
            bail!(
                "export path {} is not a directory -- point [export].dir at a directory",
                dir.display()
            );
        }
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, blob: &ExportBlob) -> PathBuf {
        self.dir.join(&blob.file_name)
    }
}

impl ExportSink for DirectorySink {
    fn save(&mut self, blob: &ExportBlob) -> Result<()> {
        let path = self.path_for(blob);
        fs::write(&path, &blob.bytes).with_context(|| format!("write {}", path.display()))?;
        info!(path = %path.display(), bytes = blob.bytes.len(), "export written");
        Ok(())
    }
}

/// Keeps every saved blob in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    pub saved: Vec<ExportBlob>,
}

impl ExportSink for MemorySink {
    fn save(&mut self, blob: &ExportBlob) -> Result<()> {
        self.saved.push(blob.clone());
        Ok(())
    }
}

impl<S: ExportSink + ?Sized> ExportSink for &mut S {
    fn save(&mut self, blob: &ExportBlob) -> Result<()> {
        (**self).save(blob)
    }
}

/// Header row is `field_order`; missing fields export as empty cells.
pub fn to_csv<R: Record>(records: &[&R], field_order: &[&str]) -> Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Necessary)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    writer.write_record(field_order).context("write csv header")?;
    for record in records {
        let row = field_order.iter().map(|field| {
            record
                .field(field)
                .map(|value| value.display())
                .unwrap_or_default()
        });
        writer
            .write_record(row)
            .with_context(|| format!("write csv row for {}", record.id()))?;
    }
    writer
        .into_inner()
        .map_err(|error| anyhow!("flush csv buffer: {}", error.error()))
}

pub fn to_json<T: Serialize>(records: &[T]) -> Result<Vec<u8>> {
    serde_json::to_vec_pretty(records).context("serialize export as json")
}

/// `<subject>-<YYYY-MM-DD>.<ext>`
pub fn export_file_name(subject: &str, date: Date, format: ExportFormat) -> String {
    format!("{subject}-{date}.{}", format.extension())
}

pub fn build_blob<R: Record + Serialize>(
    subject: &str,
    records: &[&R],
    field_order: &[&str],
    format: ExportFormat,
    date: Date,
) -> Result<ExportBlob> {
    let bytes = match format {
        ExportFormat::Csv => to_csv(records, field_order)?,
        ExportFormat::Json => to_json(records)?,
    };
    Ok(ExportBlob {
        file_name: export_file_name(subject, date, format),
        mime_type: format.mime_type(),
        bytes,
    })
}

/// Turns record sets into blobs and hands them to a sink.
#[derive(Debug)]
pub struct Exporter<S> {
    sink: S,
}

impl<S: ExportSink> Exporter<S> {
    pub fn new(sink: S) -> Self {
        Self { sink }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Exports the view's filtered and sorted rows, or every record for
    /// [`ExportScope::All`], and returns what was saved.
    pub fn export_view<R: Record + Serialize>(
        &mut self,
        subject: &str,
        view: &TabularDataView<R>,
        scope: ExportScope,
        field_order: &[&str],
        format: ExportFormat,
        date: Date,
    ) -> Result<ExportBlob> {
        let records = match scope {
            ExportScope::Filtered => view.filtered(),
            ExportScope::All => view.records().iter().collect(),
        };
        let blob = build_blob(subject, &records, field_order, format, date)?;
        self.sink
            .save(&blob)
            .with_context(|| format!("save {}", blob.file_name))?;
        info!(
            file = %blob.file_name,
            rows = records.len(),
            ?scope,
            "export saved"
        );
        Ok(blob)
    }
}

#[cfg(test)]
mod tests {
    use super::{
        DirectorySink, ExportBlob, ExportFormat, ExportSink, export_file_name, to_csv, to_json,
    };
    use crate::record::{FieldValue, Record};
    use anyhow::Result;
    use serde::{Deserialize, Serialize};
    use time::{Date, Month};

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Line {
        id: String,
        memo: String,
        cents: i64,
    }

    impl Record for Line {
        fn id(&self) -> &str {
            &self.id
        }

        fn field(&self, name: &str) -> Option<FieldValue> {
            match name {
                "id" => Some(FieldValue::Text(self.id.clone())),
                "memo" => Some(FieldValue::Text(self.memo.clone())),
                "cents" => Some(FieldValue::Money(self.cents)),
                _ => None,
            }
        }
    }

    fn line(id: &str, memo: &str, cents: i64) -> Line {
        Line {
            id: id.to_owned(),
            memo: memo.to_owned(),
            cents,
        }
    }

    #[test]
    fn csv_quotes_unsafe_fields_and_a_reader_recovers_them() -> Result<()> {
        let lines = [
            line("1", "plain", 125_050),
            line("2", "comma, inside", 5),
            line("3", "say \"hi\"\nthen leave", -100),
        ];
        let refs = lines.iter().collect::<Vec<_>>();
        let bytes = to_csv(&refs, &["id", "memo", "cents"])?;

        let text = String::from_utf8(bytes.clone())?;
        assert!(text.starts_with("id,memo,cents\n1,plain,1250.50\n"));
        assert!(text.contains("\"comma, inside\""));
        assert!(text.contains("\"say \"\"hi\"\""));

        let mut reader = csv::Reader::from_reader(bytes.as_slice());
        let rows = reader
            .records()
            .map(|row| row.map(|row| row.iter().map(str::to_owned).collect::<Vec<_>>()))
            .collect::<Result<Vec<_>, _>>()?;
        assert_eq!(rows[1], vec!["2", "comma, inside", "0.05"]);
        assert_eq!(rows[2], vec!["3", "say \"hi\"\nthen leave", "-1.00"]);
        Ok(())
    }

    #[test]
    fn csv_leaves_unknown_fields_blank() -> Result<()> {
        let lines = [line("1", "x", 0)];
        let refs = lines.iter().collect::<Vec<_>>();
        let text = String::from_utf8(to_csv(&refs, &["id", "nope"])?)?;
        assert_eq!(text, "id,nope\n1,\n");
        Ok(())
    }

    #[test]
    fn json_is_pretty_and_round_trips() -> Result<()> {
        let lines = vec![line("1", "a", 1), line("2", "b", 2)];
        let bytes = to_json(&lines)?;
        assert!(String::from_utf8(bytes.clone())?.contains("\n  {"));
        let parsed: Vec<Line> = serde_json::from_slice(&bytes)?;
        assert_eq!(parsed, lines);
        Ok(())
    }

    #[test]
    fn file_name_uses_iso_date() -> Result<()> {
        let date = Date::from_calendar_date(2024, Month::March, 5)?;
        assert_eq!(
            export_file_name("transactions", date, ExportFormat::Csv),
            "transactions-2024-03-05.csv"
        );
        assert_eq!(ExportFormat::parse(" JSON "), Some(ExportFormat::Json));
        assert_eq!(ExportFormat::parse("xml"), None);
        Ok(())
    }

    #[test]
    fn directory_sink_writes_into_nested_dir() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let mut sink = DirectorySink::open(temp.path().join("exports"))?;
        let blob = ExportBlob {
            file_name: "users-2024-03-05.json".to_owned(),
            mime_type: ExportFormat::Json.mime_type(),
            bytes: b"[]".to_vec(),
        };
        sink.save(&blob)?;
        assert_eq!(std::fs::read(sink.path_for(&blob))?, b"[]");
        Ok(())
    }

    #[test]
    fn directory_sink_refuses_a_file_path() -> Result<()> {
        let temp = tempfile::NamedTempFile::new()?;
        assert!(DirectorySink::open(temp.path()).is_err());
        Ok(())
    }
}

//! Result table: one column per (subgroup × method) run.
//!
//! # CSV layout
//!
//! ```text
//! ,fungideg,bactideg,lipiddeg
//! 0,"[0.0, 0.25, 0.5, 0.75]","[0.0, 0.5]",...
//! 1,"[1.0, 0.75, 0.5, 0.25]","[2.0, 1.5]",...
//! 2,0.125,-0.25,...
//! ```
//!
//! Row `0` holds each run's removal fractions, row `1` its largest-component
//! fractions, row `2` its vulnerability index (empty for an empty
//! subgroup). Curves of different subgroups have different lengths, so each
//! curve is kept whole in a single quoted cell rather than spread over rows.
//!
//! # JSON layout
//!
//! `{"rows": [{"key": "fungideg", "x": [...], "y": [...], "vulnerability": 0.125}]}`

use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::error::TableError;
use crate::removal::RemovalOutcome;

// ---------------------------------------------------------------------------
// Rows and table
// ---------------------------------------------------------------------------

/// One run's curve and index under its column key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRow {
    pub key: String,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub vulnerability: Option<f64>,
}

impl ResultRow {
    #[must_use]
    pub fn from_outcome(key: impl Into<String>, outcome: RemovalOutcome) -> Self {
        Self {
            key: key.into(),
            x: outcome.curve.x,
            y: outcome.curve.y,
            vulnerability: outcome.vulnerability,
        }
    }
}

/// Ordered, key-unique collection of [`ResultRow`]s.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ResultTable {
    rows: Vec<ResultRow>,
}

impl ResultTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a row.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::DuplicateKey`] if the key is already present.
    pub fn push(&mut self, row: ResultRow) -> Result<(), TableError> {
        if self.get(&row.key).is_some() {
            return Err(TableError::DuplicateKey(row.key));
        }
        self.rows.push(row);
        Ok(())
    }

    /// Append every row of `other`, keeping its order.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::DuplicateKey`] on the first clashing key; rows
    /// before it have already been appended.
    pub fn merge(&mut self, other: Self) -> Result<(), TableError> {
        for row in other.rows {
            self.push(row)?;
        }
        Ok(())
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&ResultRow> {
        self.rows.iter().find(|row| row.key == key)
    }

    #[must_use]
    pub fn rows(&self) -> &[ResultRow] {
        &self.rows
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().map(|row| row.key.as_str())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    // -----------------------------------------------------------------------
    // CSV
    // -----------------------------------------------------------------------

    /// Render the table in the CSV layout described in the module docs.
    #[must_use]
    pub fn to_csv(&self) -> String {
        let mut lines: Vec<Vec<String>> = vec![
            vec![String::new()],
            vec!["0".to_string()],
            vec!["1".to_string()],
            vec!["2".to_string()],
        ];

        for row in &self.rows {
            lines[0].push(csv_field(&row.key));
            lines[1].push(csv_field(&format_list(&row.x)));
            lines[2].push(csv_field(&format_list(&row.y)));
            lines[3].push(row.vulnerability.map(|v| format!("{v:?}")).unwrap_or_default());
        }

        let mut out = String::new();
        for line in lines {
            out.push_str(&line.join(","));
            out.push('\n');
        }
        out
    }

    /// Parse the output of [`ResultTable::to_csv`].
    ///
    /// # Errors
    ///
    /// Returns [`TableError::Malformed`] if the layout or any number is
    /// invalid, and [`TableError::DuplicateKey`] for repeated column keys.
    pub fn from_csv(src: &str) -> Result<Self, TableError> {
        let records = parse_records(src)?;
        let [header, xs, ys, indices] = records.as_slice() else {
            return Err(malformed(1, format!("expected 4 rows, found {}", records.len())));
        };
        if !header[0].is_empty() {
            return Err(malformed(
                1,
                format!("expected an empty first header cell, found {:?}", header[0]),
            ));
        }

        for (line, (record, label)) in [(xs, "0"), (ys, "1"), (indices, "2")]
            .into_iter()
            .enumerate()
        {
            let line = line + 2;
            if record.len() != header.len() {
                return Err(malformed(
                    line,
                    format!("expected {} cells, found {}", header.len(), record.len()),
                ));
            }
            if record[0] != label {
                return Err(malformed(line, format!("expected row label {label:?}")));
            }
        }

        let mut table = Self::new();
        for col in 1..header.len() {
            let x = parse_list(&xs[col]).map_err(|m| malformed(2, m))?;
            let y = parse_list(&ys[col]).map_err(|m| malformed(3, m))?;
            if x.len() != y.len() {
                return Err(malformed(
                    3,
                    format!("column {:?} has {} x values but {} y values", header[col], x.len(), y.len()),
                ));
            }
            let cell = indices[col].trim();
            let vulnerability = if cell.is_empty() {
                None
            } else {
                Some(
                    cell.parse::<f64>()
                        .map_err(|_| malformed(4, format!("invalid index {cell:?}")))?,
                )
            };
            table.push(ResultRow {
                key: header[col].clone(),
                x,
                y,
                vulnerability,
            })?;
        }
        Ok(table)
    }

    // -----------------------------------------------------------------------
    // Files
    // -----------------------------------------------------------------------

    /// Write the table to `path` in `format`.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    #[instrument(skip(self), fields(columns = self.len()))]
    pub fn export(&self, path: &Path, format: TableFormat) -> Result<()> {
        let body = match format {
            TableFormat::Csv => self.to_csv(),
            TableFormat::Json => {
                serde_json::to_string_pretty(self).context("failed to serialize result table")?
            }
        };
        fs::write(path, body)
            .with_context(|| format!("failed to write results to {}", path.display()))?;
        info!(path = %path.display(), %format, "exported result table");
        Ok(())
    }

    /// Read a table previously written by [`ResultTable::export`].
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn read(path: &Path, format: TableFormat) -> Result<Self> {
        let src = fs::read_to_string(path)
            .with_context(|| format!("failed to read results from {}", path.display()))?;
        let table = match format {
            TableFormat::Csv => Self::from_csv(&src)?,
            TableFormat::Json => serde_json::from_str::<Self>(&src)
                .with_context(|| format!("failed to parse results in {}", path.display()))?,
        };
        Ok(table)
    }
}

// ---------------------------------------------------------------------------
// Format
// ---------------------------------------------------------------------------

/// On-disk layout of a [`ResultTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableFormat {
    Csv,
    Json,
}

impl TableFormat {
    /// `.json` files are JSON; everything else is CSV.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        if path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
        {
            Self::Json
        } else {
            Self::Csv
        }
    }
}

impl fmt::Display for TableFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Csv => "csv",
            Self::Json => "json",
        })
    }
}

impl FromStr for TableFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown table format {other:?}; expected csv or json")),
        }
    }
}

// ---------------------------------------------------------------------------
// CSV helpers
// ---------------------------------------------------------------------------

fn malformed(line: usize, message: impl Into<String>) -> TableError {
    TableError::Malformed {
        line,
        message: message.into(),
    }
}

fn format_list(values: &[f64]) -> String {
    let items: Vec<String> = values.iter().map(|v| format!("{v:?}")).collect();
    format!("[{}]", items.join(", "))
}

fn parse_list(cell: &str) -> Result<Vec<f64>, String> {
    let inner = cell
        .trim()
        .strip_prefix('[')
        .and_then(|s| s.strip_suffix(']'))
        .ok_or_else(|| format!("expected a [..] list, found {cell:?}"))?;
    if inner.trim().is_empty() {
        return Ok(Vec::new());
    }
    inner
        .split(',')
        .map(|item| {
            let item = item.trim();
            item.parse::<f64>()
                .map_err(|_| format!("invalid number {item:?}"))
        })
        .collect()
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Split CSV text into records, honoring quoted fields.
fn parse_records(src: &str) -> Result<Vec<Vec<String>>, TableError> {
    let mut records = Vec::new();
    let mut record = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut line = 1;
    let mut chars = src.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    field.push('"');
                }
                '"' => in_quotes = false,
                '\n' => {
                    line += 1;
                    field.push(c);
                }
                _ => field.push(c),
            }
            continue;
        }

        match c {
            '"' => in_quotes = true,
            ',' => record.push(std::mem::take(&mut field)),
            '\r' => {}
            '\n' => {
                line += 1;
                record.push(std::mem::take(&mut field));
                records.push(std::mem::take(&mut record));
            }
            _ => field.push(c),
        }
    }

    if in_quotes {
        return Err(malformed(line, "unterminated quoted field"));
    }
    if !field.is_empty() || !record.is_empty() {
        record.push(field);
        records.push(record);
    }
    Ok(records)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

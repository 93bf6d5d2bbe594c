//! CSV dataset loading.
//!
//! The scanner handles quoted fields (with `""` escapes and embedded line
//! breaks), `\n` and `\r\n` record terminators and a leading UTF-8 BOM.
//! Header cells are matched to schema level names with all whitespace
//! removed, so `"Subcounty/\rDivision"` resolves to `Subcounty/Division`.

use crate::index::build::RawRow;
use crate::index::types::LevelSchema;
use anyhow::{bail, Context, Result};
use memchr::{memchr, memchr2};
use memmap2::Mmap;
use rayon::prelude::*;
use std::fs::File;
use std::path::Path;
use tracing::{debug, warn};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// How the first line of the file was interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderMode {
    /// Columns located by header name
    Named,
    /// No header cell matched a level name; columns read in order
    Positional,
}

/// Rows of a dataset, already projected onto the schema's column order
#[derive(Debug, Clone)]
pub struct Dataset {
    rows: Vec<RawRow>,
    header_mode: HeaderMode,
}

impl Dataset {
    /// Memory-map and parse a CSV file
    pub fn open(path: &Path, schema: &LevelSchema) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("Failed to open dataset {}", path.display()))?;
        let len = file.metadata()?.len();
        if len == 0 {
            warn!(path = %path.display(), "dataset is empty");
            return Ok(Self {
                rows: Vec::new(),
                header_mode: HeaderMode::Positional,
            });
        }

        let mmap = unsafe { Mmap::map(&file) }
            .with_context(|| format!("Failed to map dataset {}", path.display()))?;
        Self::parse(&mmap, schema)
            .with_context(|| format!("Failed to read dataset {}", path.display()))
    }

    /// Parse CSV bytes
    pub fn parse(data: &[u8], schema: &LevelSchema) -> Result<Self> {
        let data = data.strip_prefix(UTF8_BOM).unwrap_or(data);
        let mut records = CsvScanner::new(data);

        let Some(first) = records.next() else {
            return Ok(Self {
                rows: Vec::new(),
                header_mode: HeaderMode::Positional,
            });
        };

        let (columns, header_mode, leading) = match ColumnMap::resolve(&first, schema)? {
            Some(columns) => (columns, HeaderMode::Named, None),
            None => {
                warn!("no header matched the schema level names, reading columns positionally");
                (ColumnMap::positional(schema), HeaderMode::Positional, Some(first))
            }
        };

        let raw: Vec<Vec<String>> = leading.into_iter().chain(records).collect();
        let rows: Vec<RawRow> = raw
            .into_par_iter()
            .map(|record| columns.project(record))
            .collect();

        debug!(rows = rows.len(), ?header_mode, "dataset parsed");
        Ok(Self { rows, header_mode })
    }

    pub fn rows(&self) -> &[RawRow] {
        &self.rows
    }

    pub fn header_mode(&self) -> HeaderMode {
        self.header_mode
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Header name comparison form: whitespace removed, lowercased
fn header_key(name: &str) -> String {
    name.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Position of each schema level within a CSV record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMap {
    columns: Vec<usize>,
}

impl ColumnMap {
    /// Match header cells to level names. `None` when nothing matched.
    pub fn resolve(header: &[String], schema: &LevelSchema) -> Result<Option<Self>> {
        let keys: Vec<String> = header.iter().map(|h| header_key(h)).collect();
        let found: Vec<Option<usize>> = schema
            .levels
            .iter()
            .map(|level| {
                let wanted = header_key(level);
                keys.iter().position(|k| *k == wanted)
            })
            .collect();

        if found.iter().all(Option::is_none) {
            return Ok(None);
        }

        let missing: Vec<&str> = schema
            .levels
            .iter()
            .zip(&found)
            .filter(|(_, f)| f.is_none())
            .map(|(level, _)| level.as_str())
            .collect();
        if !missing.is_empty() {
            bail!("dataset header is missing columns: {}", missing.join(", "));
        }

        Ok(Some(Self {
            columns: found.into_iter().flatten().collect(),
        }))
    }

    /// First `depth` columns in order
    pub fn positional(schema: &LevelSchema) -> Self {
        Self {
            columns: (0..schema.depth()).collect(),
        }
    }

    /// Reorder a record into schema order; absent cells become blank
    pub fn project(&self, mut record: Vec<String>) -> RawRow {
        let fields = self
            .columns
            .iter()
            .map(|&i| record.get_mut(i).map(std::mem::take).unwrap_or_default())
            .collect::<Vec<_>>();
        RawRow { fields }
    }
}

/// How a field was terminated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldEnd {
    Comma,
    Record,
    Eof,
}

/// Iterator over CSV records
pub struct CsvScanner<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> CsvScanner<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    fn read_field(&mut self) -> (String, FieldEnd) {
        if self.data.get(self.pos) == Some(&b'"') {
            self.read_quoted()
        } else {
            self.read_bare()
        }
    }

    fn read_bare(&mut self) -> (String, FieldEnd) {
        let rest = &self.data[self.pos..];
        match memchr2(b',', b'\n', rest) {
            Some(off) => {
                let end = if rest[off] == b',' {
                    FieldEnd::Comma
                } else {
                    FieldEnd::Record
                };
                self.pos += off + 1;
                (decode(strip_cr(&rest[..off])), end)
            }
            None => {
                self.pos = self.data.len();
                (decode(strip_cr(rest)), FieldEnd::Eof)
            }
        }
    }

    fn read_quoted(&mut self) -> (String, FieldEnd) {
        self.pos += 1;
        let mut buf = Vec::new();
        loop {
            let rest = &self.data[self.pos..];
            match memchr(b'"', rest) {
                Some(off) => {
                    buf.extend_from_slice(&rest[..off]);
                    self.pos += off + 1;
                    if self.data.get(self.pos) == Some(&b'"') {
                        buf.push(b'"');
                        self.pos += 1;
                        continue;
                    }
                    break;
                }
                None => {
                    // Unterminated quote: take the rest of the input
                    buf.extend_from_slice(rest);
                    self.pos = self.data.len();
                    return (decode(&buf), FieldEnd::Eof);
                }
            }
        }

        // Stray bytes between the closing quote and the delimiter are dropped
        let rest = &self.data[self.pos..];
        let end = match memchr2(b',', b'\n', rest) {
            Some(off) => {
                self.pos += off + 1;
                if rest[off] == b',' {
                    FieldEnd::Comma
                } else {
                    FieldEnd::Record
                }
            }
            None => {
                self.pos = self.data.len();
                FieldEnd::Eof
            }
        };
        (decode(&buf), end)
    }
}

impl Iterator for CsvScanner<'_> {
    type Item = Vec<String>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos >= self.data.len() {
            return None;
        }

        let mut fields = Vec::new();
        loop {
            let (field, end) = self.read_field();
            fields.push(field);
            match end {
                FieldEnd::Comma if self.pos < self.data.len() => continue,
                FieldEnd::Comma => {
                    // Trailing comma at end of input
                    fields.push(String::new());
                    return Some(fields);
                }
                FieldEnd::Record | FieldEnd::Eof => return Some(fields),
            }
        }
    }
}

fn strip_cr(bytes: &[u8]) -> &[u8] {
    bytes.strip_suffix(b"\r").unwrap_or(bytes)
}

fn decode(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

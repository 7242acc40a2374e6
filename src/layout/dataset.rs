//! Delimited dataset reading and row classification.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use csv::{Reader, ReaderBuilder, StringRecord, Trim};

use crate::error::Result;

/// Dimensions of a dataset, taken before streaming.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DatasetSummary {
    /// Number of records, headers included
    pub row_count: usize,
    /// Field count of the first record
    pub column_count: usize,
}

impl DatasetSummary {
    /// Count the records of a dataset file.
    pub fn scan(path: &Path, delimiter: u8) -> Result<Self> {
        let mut summary = Self::default();
        for (index, record) in RecordStream::open(path, delimiter)?.enumerate() {
            let record = record?;
            if index == 0 {
                summary.column_count = record.len();
            }
            summary.row_count += 1;
        }
        Ok(summary)
    }
}

/// Builds a reader with the dataset conventions: no header line, fields
/// trimmed, ragged records allowed.
fn reader_builder(delimiter: u8) -> ReaderBuilder {
    let mut builder = ReaderBuilder::new();
    builder
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .delimiter(delimiter);
    builder
}

/// Drops blanks between a field boundary and an opening quote.
///
/// The csv tokenizer only treats a field as quoted when the quote is its
/// first byte, and `Trim::All` runs after tokenizing. Without this,
/// `1, "Bolt, M8"` splits inside the quotes.
struct QuoteAlign<R> {
    inner: R,
    delimiter: u8,
    raw: Vec<u8>,
    out: Vec<u8>,
    pos: usize,
    pending: Vec<u8>,
    field_start: bool,
    quoted: bool,
    in_quotes: bool,
}

impl<R: Read> QuoteAlign<R> {
    fn new(inner: R, delimiter: u8) -> Self {
        Self {
            inner,
            delimiter,
            raw: vec![0; 8 * 1024],
            out: Vec::new(),
            pos: 0,
            pending: Vec::new(),
            field_start: true,
            quoted: false,
            in_quotes: false,
        }
    }

    fn push(&mut self, byte: u8) {
        if self.quoted && (self.in_quotes || byte == b'"') {
            if byte == b'"' {
                self.in_quotes = !self.in_quotes;
            }
            self.out.push(byte);
            return;
        }

        if self.field_start && byte != self.delimiter && (byte == b' ' || byte == b'\t') {
            self.pending.push(byte);
            return;
        }
        if self.field_start && byte == b'"' {
            self.pending.clear();
            self.field_start = false;
            self.quoted = true;
            self.in_quotes = true;
            self.out.push(byte);
            return;
        }

        self.out.append(&mut self.pending);
        self.out.push(byte);
        self.field_start = byte == self.delimiter || byte == b'\n' || byte == b'\r';
        if self.field_start {
            self.quoted = false;
        }
    }
}

impl<R: Read> Read for QuoteAlign<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        while self.pos == self.out.len() {
            self.out.clear();
            self.pos = 0;
            let read = self.inner.read(&mut self.raw)?;
            if read == 0 {
                self.out.append(&mut self.pending);
                if self.out.is_empty() {
                    return Ok(0);
                }
                break;
            }
            for index in 0..read {
                let byte = self.raw[index];
                self.push(byte);
            }
        }

        let count = buf.len().min(self.out.len() - self.pos);
        buf[..count].copy_from_slice(&self.out[self.pos..self.pos + count]);
        self.pos += count;
        Ok(count)
    }
}

/// Iterator over the records of a dataset, one `Vec<String>` per record.
pub struct RecordStream<R> {
    reader: Reader<QuoteAlign<R>>,
    record: StringRecord,
}

impl RecordStream<File> {
    /// Open a dataset file.
    pub fn open(path: &Path, delimiter: u8) -> Result<Self> {
        Ok(Self::from_reader(File::open(path)?, delimiter))
    }
}

impl<R: Read> RecordStream<R> {
    /// Stream records from any reader.
    ///
    /// Blanks before an opening quote are ignored, so a quoted field keeps
    /// its embedded delimiters.
    pub fn from_reader(input: R, delimiter: u8) -> Self {
        Self {
            reader: reader_builder(delimiter).from_reader(QuoteAlign::new(input, delimiter)),
            record: StringRecord::new(),
        }
    }
}

impl<R: Read> Iterator for RecordStream<R> {
    type Item = Result<Vec<String>>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.reader.read_record(&mut self.record) {
            Ok(true) => Some(Ok(self.record.iter().map(str::to_string).collect())),
            Ok(false) => None,
            Err(e) => Some(Err(e.into())),
        }
    }
}

/// How a record is laid out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowKind {
    /// Group label spanning the whole table width
    Header(String),
    /// Ordinary record, one field per column
    Data,
}

impl RowKind {
    /// Classify a record by its content.
    ///
    /// A record is a header when its first field has text and every other
    /// field is blank. Position in the dataset plays no part.
    pub fn classify(fields: &[String]) -> Self {
        match fields.split_first() {
            Some((label, rest))
                if !label.trim().is_empty() && rest.iter().all(|f| f.trim().is_empty()) =>
            {
                RowKind::Header(label.trim().to_string())
            }
            _ => RowKind::Data,
        }
    }
}

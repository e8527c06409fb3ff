//! Listings rendered as a terminal table, JSON lines or CSV.
use std::path::PathBuf;

use csv_core::WriteResult;

#[derive(clap::ValueEnum, Clone, Debug)]
pub enum Format {
    Table,
    Jsonl,
    Csv,
}

#[derive(clap::Parser, Clone, Debug)]
#[group(id = "output::Args")]
pub struct Args {
    /// Write the listing to this file instead of the terminal.
    #[arg(long, short = 'o')]
    output: Option<PathBuf>,
    #[arg(long, short='f', value_enum, default_value_t = Format::Table)]
    format: Format,
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("could not open the specified output file at {1:?}")]
    OpenOutputFile(#[source] std::io::Error, PathBuf),
    #[error("could not write data to the output file at {1:?}")]
    WriteFile(#[source] std::io::Error, PathBuf),
    #[error("could not write data to the terminal")]
    WriteStdout(#[source] std::io::Error),
    #[error("could not serialize a record to JSON")]
    SerializeJson(#[source] serde_json::Error),
}

impl Args {
    /// Start a listing with the given column names.
    ///
    /// CSV gets its header line right away, tables keep the names until [`Listing::finish`].
    pub fn open(self, columns: &[&'static str]) -> Result<Listing, Error> {
        let io = match &self.output {
            None => Box::new(std::io::stdout().lock()) as Box<_>,
            Some(path) => Box::new(
                std::fs::OpenOptions::new()
                    .write(true)
                    .create(true)
                    .truncate(true)
                    .open(path)
                    .map_err(|e| Error::OpenOutputFile(e, path.clone()))?,
            ) as Box<_>,
        };
        let kind = match self.format {
            Format::Table => {
                let mut table = comfy_table::Table::new();
                table
                    .set_header(columns.to_vec())
                    .set_content_arrangement(comfy_table::ContentArrangement::Dynamic);
                Kind::Table(table)
            }
            Format::Jsonl => Kind::Jsonl,
            Format::Csv => Kind::Csv,
        };
        let mut listing = Listing { destination: self.output, io, kind };
        if let Kind::Csv = listing.kind {
            listing.write(&csv_record(columns))?;
        }
        Ok(listing)
    }
}

pub struct Listing {
    destination: Option<PathBuf>,
    io: Box<dyn std::io::Write>,
    kind: Kind,
}

enum Kind {
    Table(comfy_table::Table),
    Jsonl,
    Csv,
}

impl Listing {
    /// Add one entry. Only the representation the chosen format needs is built.
    pub fn row<R: serde::Serialize>(
        &mut self,
        cells: impl FnOnce() -> Vec<String>,
        record: impl FnOnce() -> R,
    ) -> Result<(), Error> {
        let bytes = match &mut self.kind {
            Kind::Table(table) => {
                table.add_row(cells());
                return Ok(());
            }
            Kind::Csv => csv_record(&cells()),
            Kind::Jsonl => {
                let mut line = serde_json::to_vec(&record()).map_err(Error::SerializeJson)?;
                line.push(b'\n');
                line
            }
        };
        self.write(&bytes)
    }

    pub fn finish(mut self) -> Result<(), Error> {
        if let Kind::Table(table) = &self.kind {
            let rendered = format!("{table}\n");
            self.write(rendered.as_bytes())?;
        }
        self.io.flush().map_err(|e| self.write_error(e))
    }

    fn write(&mut self, bytes: &[u8]) -> Result<(), Error> {
        self.io.write_all(bytes).map_err(|e| self.write_error(e))
    }

    fn write_error(&self, e: std::io::Error) -> Error {
        match &self.destination {
            None => Error::WriteStdout(e),
            Some(p) => Error::WriteFile(e, p.clone()),
        }
    }
}

/// Encode one CSV record, terminator included.
pub fn csv_record<S: AsRef<str>>(fields: &[S]) -> Vec<u8> {
    // Enough for a field made entirely of quotes, or for a closing quote plus delimiter.
    let longest = fields.iter().map(|f| f.as_ref().len()).max().unwrap_or(0);
    let mut buffer = vec![0; 2 + 2 * longest];
    let mut record = Vec::new();
    let mut writer = csv_core::Writer::new();
    for (index, field) in fields.iter().enumerate() {
        if index != 0 {
            let (result, n) = writer.delimiter(&mut buffer);
            debug_assert_eq!(result, WriteResult::InputEmpty);
            record.extend_from_slice(&buffer[..n]);
        }
        let field = field.as_ref().as_bytes();
        let (result, read, n) = writer.field(field, &mut buffer);
        debug_assert_eq!((result, read), (WriteResult::InputEmpty, field.len()));
        record.extend_from_slice(&buffer[..n]);
    }
    let (result, n) = writer.terminator(&mut buffer);
    debug_assert_eq!(result, WriteResult::InputEmpty);
    record.extend_from_slice(&buffer[..n]);
    record
}

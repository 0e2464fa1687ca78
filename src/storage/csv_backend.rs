use std::{
    fs::{self, File, OpenOptions},
    io::{Read, Seek, SeekFrom, Write},
    path::{Path, PathBuf},
};

use csv::{ByteRecord, ReaderBuilder, StringRecord, WriterBuilder};
use tracing::{debug, info, warn};

use crate::{
    domain::{record::FIELD_NAMES, Record},
    errors::{LedgerError, Result},
    utils::persistence::replace_file,
};

use super::{LedgerRow, LedgerStorage};

const BOM: char = '\u{feff}';

/// Comma-separated file with a mandatory `Date,Category,Amount,Type,Description`
/// header row.
#[derive(Debug, Clone)]
pub struct CsvLedgerStorage {
    path: PathBuf,
}

impl CsvLedgerStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn create_with_header(&self) -> Result<File> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let file = OpenOptions::new()
            .create_new(true)
            .write(true)
            .open(&self.path)?;
        write_header(&file)?;
        info!(path = %self.path.display(), "created ledger file");
        Ok(file)
    }

    /// Opens an existing file for appending. An empty file, such as one left by
    /// an interrupted creation, gets its header first.
    fn open_for_append(&self) -> Result<File> {
        let mut file = OpenOptions::new()
            .read(true)
            .append(true)
            .open(&self.path)?;
        if file.metadata()?.len() == 0 {
            write_header(&file)?;
            warn!(path = %self.path.display(), "ledger file was empty, wrote header");
        } else if !ends_with_newline(&mut file)? {
            file.write_all(b"\n")?;
        }
        Ok(file)
    }
}

impl LedgerStorage for CsvLedgerStorage {
    fn location(&self) -> String {
        self.path.display().to_string()
    }

    fn exists(&self) -> bool {
        self.path.is_file()
    }

    fn read_rows(&self) -> Result<Vec<LedgerRow>> {
        if !self.exists() {
            return Err(LedgerError::StoreNotFound(self.location()));
        }
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(&self.path)?;

        let mut records = reader.byte_records();
        match records.next() {
            Some(header) => check_header(header?)?,
            None => return Ok(Vec::new()),
        }

        let mut rows = Vec::new();
        for result in records {
            rows.push(decode_row(result?));
        }
        debug!(path = %self.path.display(), rows = rows.len(), "read ledger rows");
        Ok(rows)
    }

    fn append_row(&self, record: &Record) -> Result<()> {
        let file = if self.exists() {
            self.open_for_append()?
        } else {
            self.create_with_header()?
        };
        {
            let mut writer = WriterBuilder::new().from_writer(&file);
            writer.write_record(record.to_fields())?;
            writer.flush()?;
        }
        file.sync_all()?;
        Ok(())
    }

    fn rewrite(&self, rows: &[LedgerRow]) -> Result<()> {
        replace_file(&self.path, |file| write_rows(file, rows))?;
        info!(path = %self.path.display(), rows = rows.len(), "rewrote ledger file");
        Ok(())
    }
}

fn check_header(header: ByteRecord) -> Result<()> {
    let header = StringRecord::from_byte_record(header)
        .map_err(|_| LedgerError::MalformedStore("header is not valid UTF-8".into()))?;
    let found: Vec<&str> = header
        .iter()
        .enumerate()
        .map(|(idx, field)| {
            let field = field.trim();
            if idx == 0 {
                field.trim_start_matches(BOM)
            } else {
                field
            }
        })
        .collect();
    if found == FIELD_NAMES {
        Ok(())
    } else {
        Err(LedgerError::MalformedStore(format!(
            "unexpected header `{}`, expected `{}`",
            found.join(","),
            FIELD_NAMES.join(",")
        )))
    }
}

fn ends_with_newline(file: &mut File) -> Result<bool> {
    let len = file.metadata()?.len();
    if len == 0 {
        return Ok(true);
    }
    let mut last = [0u8; 1];
    file.seek(SeekFrom::Start(len - 1))?;
    file.read_exact(&mut last)?;
    Ok(last[0] == b'\n')
}

fn write_header(file: &File) -> Result<()> {
    let mut writer = WriterBuilder::new().from_writer(file);
    writer.write_record(FIELD_NAMES)?;
    writer.flush()?;
    Ok(())
}

/// Rows that are not valid UTF-8 keep their bytes so a rewrite can carry them over.
fn decode_row(record: ByteRecord) -> LedgerRow {
    let line = record.position().map(|pos| pos.line()).unwrap_or(0);
    match StringRecord::from_byte_record(record) {
        Ok(record) => LedgerRow::new(line, record.iter().map(str::to_string).collect()),
        Err(err) => LedgerRow::undecodable(
            line,
            err.into_byte_record().iter().map(<[u8]>::to_vec).collect(),
        ),
    }
}

fn write_rows(file: &File, rows: &[LedgerRow]) -> Result<()> {
    let mut writer = WriterBuilder::new().flexible(true).from_writer(file);
    writer.write_record(FIELD_NAMES)?;
    for row in rows {
        match &row.raw {
            Some(raw) => writer.write_record(raw)?,
            None => writer.write_record(&row.fields)?,
        }
    }
    writer.flush()?;
    Ok(())
}

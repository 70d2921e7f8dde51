// store/csv_store.rs
use crate::domain::ListingRecord;
use crate::store::{RecordStore, Rows, StoreError, HEADER};
use csv::{ByteRecord, ReaderBuilder, StringRecord, WriterBuilder};
use std::fs::{self, File, OpenOptions};
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::PathBuf;
use tracing::{debug, warn};

/// CSV-backed store. File handles are opened per call and closed on return.
#[derive(Debug, Clone)]
pub struct CsvStore {
    path: PathBuf,
}

impl CsvStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[cfg(test)]
    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    fn io_err(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn csv_err(&self, source: csv::Error) -> StoreError {
        StoreError::Csv {
            path: self.path.clone(),
            source,
        }
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn open_reader(&self) -> Result<csv::Reader<BufReader<File>>, StoreError> {
        let file = File::open(&self.path).map_err(|e| self.io_err(e))?;
        Ok(ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(BufReader::new(file)))
    }

    /// Only the last row decides the index. Earlier rows may be undecodable
    /// text without affecting resume.
    fn try_last_index(&self) -> Result<Option<u64>, String> {
        let mut reader = self.open_reader().map_err(|e| e.to_string())?;
        let mut last: Option<ByteRecord> = None;
        for row in reader.byte_records() {
            match row {
                Ok(row) => last = Some(row),
                Err(e) if e.is_io_error() => return Err(e.to_string()),
                Err(e) => {
                    debug!(path = %self.path.display(), error = %e, "skipping unreadable row");
                }
            }
        }

        match last {
            None => Ok(None),
            Some(row) => {
                let raw = String::from_utf8_lossy(row.get(0).unwrap_or_default()).into_owned();
                raw.trim()
                    .parse::<u64>()
                    .map(Some)
                    .map_err(|_| format!("last row has non-integer index '{raw}'"))
            }
        }
    }

    /// Drops a final line left without its newline by an interrupted append,
    /// so the next append starts on a fresh line. Returns the bytes removed.
    fn truncate_torn_tail(&self) -> Result<u64, StoreError> {
        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(&self.path)
            .map_err(|e| self.io_err(e))?;

        let len = file.metadata().map_err(|e| self.io_err(e))?.len();
        if len == 0 {
            return Ok(0);
        }

        let mut last = [0u8; 1];
        file.seek(SeekFrom::End(-1)).map_err(|e| self.io_err(e))?;
        file.read_exact(&mut last).map_err(|e| self.io_err(e))?;
        if last[0] == b'\n' {
            return Ok(0);
        }

        file.seek(SeekFrom::Start(0)).map_err(|e| self.io_err(e))?;
        let mut content = Vec::with_capacity(len as usize);
        file.read_to_end(&mut content).map_err(|e| self.io_err(e))?;
        let keep = content
            .iter()
            .rposition(|b| *b == b'\n')
            .map(|i| i as u64 + 1)
            .unwrap_or(0);

        file.set_len(keep).map_err(|e| self.io_err(e))?;
        file.sync_all().map_err(|e| self.io_err(e))?;
        Ok(len - keep)
    }
}

/// Positional decode so that a renamed header never breaks resume.
pub fn decode_row(row: &StringRecord, line: u64) -> Result<ListingRecord, StoreError> {
    if row.len() != HEADER.len() {
        return Err(StoreError::MalformedRow {
            line,
            reason: format!("expected {} fields, found {}", HEADER.len(), row.len()),
        });
    }

    let index = row[0]
        .trim()
        .parse::<u64>()
        .map_err(|_| StoreError::MalformedRow {
            line,
            reason: format!("non-integer index '{}'", &row[0]),
        })?;

    Ok(ListingRecord {
        index,
        name: row[1].to_string(),
        price: row[2].to_string(),
        area: row[3].to_string(),
        location: row[4].to_string(),
    })
}

impl RecordStore for CsvStore {
    fn initialize(&mut self) -> Result<(), StoreError> {
        // A zero-byte file has no header yet and is treated as missing.
        match fs::metadata(&self.path) {
            Ok(meta) if meta.len() > 0 => {
                let removed = self.truncate_torn_tail()?;
                if removed > 0 {
                    warn!(
                        path = %self.path.display(),
                        bytes = removed,
                        "dropped incomplete last row left by an interrupted append"
                    );
                }
                if removed < meta.len() {
                    return Ok(());
                }
            }
            Ok(_) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(self.io_err(e)),
        }

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.io_err(e))?;
        }

        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&self.path)
            .map_err(|e| self.io_err(e))?;

        let mut writer = WriterBuilder::new().has_headers(false).from_writer(file);
        writer.write_record(HEADER).map_err(|e| self.csv_err(e))?;
        let file = writer
            .into_inner()
            .map_err(|e| self.io_err(e.into_error()))?;
        file.sync_all().map_err(|e| self.io_err(e))?;

        debug!(path = %self.path.display(), "created record store");
        Ok(())
    }

    fn last_index(&self) -> u64 {
        if !self.path.exists() {
            return 0;
        }

        match self.try_last_index() {
            Ok(index) => index.unwrap_or(0),
            Err(reason) => {
                warn!(
                    path = %self.path.display(),
                    %reason,
                    "cannot resume from store tail, restarting index at 0"
                );
                0
            }
        }
    }

    fn append(&mut self, record: &ListingRecord) -> Result<(), StoreError> {
        let file = OpenOptions::new()
            .append(true)
            .open(&self.path)
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => StoreError::NotInitialized,
                _ => self.io_err(e),
            })?;

        let mut writer = WriterBuilder::new().has_headers(false).from_writer(file);
        writer.serialize(record).map_err(|e| self.csv_err(e))?;
        let file = writer
            .into_inner()
            .map_err(|e| self.io_err(e.into_error()))?;
        file.sync_data().map_err(|e| self.io_err(e))?;
        Ok(())
    }

    fn read_all(&self) -> Result<Rows<'_>, StoreError> {
        let reader = self.open_reader()?;
        let path = self.path.clone();

        let rows = reader.into_records().map(move |row| {
            let row = row.map_err(|source| StoreError::Csv {
                path: path.clone(),
                source,
            })?;
            let line = row.position().map(|p| p.line()).unwrap_or_default();
            decode_row(&row, line)
        });

        Ok(Box::new(rows))
    }

    fn rewrite(&mut self, rows: &[ListingRecord]) -> Result<(), StoreError> {
        let temp = self.temp_path();
        let file = File::create(&temp).map_err(|e| self.io_err(e))?;

        let mut writer = WriterBuilder::new().has_headers(false).from_writer(file);
        writer.write_record(HEADER).map_err(|e| self.csv_err(e))?;
        for row in rows {
            writer.serialize(row).map_err(|e| self.csv_err(e))?;
        }
        let file = writer
            .into_inner()
            .map_err(|e| self.io_err(e.into_error()))?;
        file.sync_all().map_err(|e| self.io_err(e))?;
        drop(file);

        fs::rename(&temp, &self.path).map_err(|e| self.io_err(e))?;
        debug!(path = %self.path.display(), rows = rows.len(), "rewrote record store");
        Ok(())
    }
}

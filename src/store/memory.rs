use crate::domain::ListingRecord;
use crate::store::{RecordStore, Rows, StoreError};

/// In-memory store for exercising the pipeline without touching disk.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    initialized: bool,
    rows: Vec<ListingRecord>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rows(rows: Vec<ListingRecord>) -> Self {
        Self {
            initialized: true,
            rows,
        }
    }

    pub fn rows(&self) -> &[ListingRecord] {
        &self.rows
    }
}

impl RecordStore for MemoryStore {
    fn initialize(&mut self) -> Result<(), StoreError> {
        self.initialized = true;
        Ok(())
    }

    fn last_index(&self) -> u64 {
        self.rows.last().map(|r| r.index).unwrap_or(0)
    }

    fn append(&mut self, record: &ListingRecord) -> Result<(), StoreError> {
        if !self.initialized {
            return Err(StoreError::NotInitialized);
        }
        self.rows.push(record.clone());
        Ok(())
    }

    fn read_all(&self) -> Result<Rows<'_>, StoreError> {
        if !self.initialized {
            return Err(StoreError::NotInitialized);
        }
        Ok(Box::new(self.rows.iter().cloned().map(Ok)))
    }

    fn rewrite(&mut self, rows: &[ListingRecord]) -> Result<(), StoreError> {
        self.initialized = true;
        self.rows = rows.to_vec();
        Ok(())
    }
}

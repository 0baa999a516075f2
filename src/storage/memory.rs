use super::{RecordStore, SessionLog, StoreData, StoreStats};
use crate::error::Result;
use becas_common::{ComparisonRecord, Record};

/// プロセス内だけで保持する保存先
#[derive(Debug, Default)]
pub struct MemoryStore {
    data: StoreData,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RecordStore for MemoryStore {
    fn store_candidates(&mut self, source: &str, records: &[Record]) -> Result<usize> {
        Ok(self.data.insert_candidates(source, records))
    }

    fn all_candidates(&self) -> Vec<Record> {
        self.data.candidates.clone()
    }

    fn candidates_by_source(&self, source: &str) -> Vec<Record> {
        self.data.by_source(source)
    }

    fn replace_baseline(&mut self, records: &[Record]) -> Result<()> {
        self.data.baseline = records.to_vec();
        Ok(())
    }

    fn baseline(&self) -> Vec<Record> {
        self.data.baseline.clone()
    }

    fn replace_comparisons(&mut self, comparisons: &[ComparisonRecord]) -> Result<()> {
        self.data.comparisons = comparisons.to_vec();
        Ok(())
    }

    fn comparisons(&self) -> Vec<ComparisonRecord> {
        self.data.comparisons.clone()
    }

    fn log_session(&mut self, log: SessionLog) -> Result<()> {
        self.data.sessions.push(log);
        Ok(())
    }

    fn stats(&self) -> StoreStats {
        self.data.stats()
    }
}

//! Where raw work-order rows come from.
//!
//! A source hands back the full row set on every call. The poll loop owns
//! the cadence; a source only knows how to fetch.

use std::future::Future;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::model::RawRecord;

/// A read-only supplier of raw work-order rows.
pub trait OrderSource: Send + Sync {
    /// Fetch every row for this cycle.
    fn fetch(&self) -> impl Future<Output = Result<Vec<RawRecord>>> + Send;

    /// Short name for logs.
    fn describe(&self) -> String;
}

/// Rows from a JSON file holding an array of objects. Re-read on every fetch.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl OrderSource for JsonFileSource {
    async fn fetch(&self) -> Result<Vec<RawRecord>> {
        let content = tokio::fs::read_to_string(&self.path).await?;
        let records: Vec<RawRecord> = serde_json::from_str(&content)?;
        Ok(records)
    }

    fn describe(&self) -> String {
        format!("file:{}", self.path.display())
    }
}

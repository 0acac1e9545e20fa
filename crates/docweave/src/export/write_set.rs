//! Destinations for rendered output units.

use std::path::PathBuf;

use indexmap::IndexMap;
use log::{debug, error, trace};
use tokio::task::JoinSet;

use super::Error;

/// Receives rendered output units while a tree is being rendered.
pub trait OutputSink {
    /// Hands over the content of the output unit `file_name`.
    fn schedule(&mut self, file_name: String, content: String);
}

/// Writes every scheduled unit on its own task.
///
/// Must be created and used inside a tokio runtime. Nothing is guaranteed to
/// be on disk until [`WriteSet::join`] returned.
#[derive(Debug)]
pub struct WriteSet {
    directory: PathBuf,
    tasks: JoinSet<Result<PathBuf, Error>>,
}

impl WriteSet {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            tasks: JoinSet::new(),
        }
    }

    /// Number of writes not yet joined.
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Waits for every scheduled write.
    ///
    /// All tasks are drained even after a failure. Returns the number of
    /// written files.
    ///
    /// # Errors
    ///
    /// Returns the first write error, or [`Error::Join`] for a task that
    /// panicked.
    pub async fn join(mut self) -> Result<usize, Error> {
        let mut written = 0;
        let mut first_error = None;

        while let Some(result) = self.tasks.join_next().await {
            match result {
                Ok(Ok(path)) => {
                    trace!(path:?; "Output unit written");
                    written += 1;
                }
                Ok(Err(err)) => {
                    error!(err:%; "Failed to write output unit");
                    first_error.get_or_insert(err);
                }
                Err(err) => {
                    error!(err:%; "Write task failed");
                    first_error.get_or_insert(Error::Join(err.to_string()));
                }
            }
        }

        match first_error {
            Some(err) => Err(err),
            None => {
                debug!(directory:? = self.directory, written; "All output units written");
                Ok(written)
            }
        }
    }
}

impl OutputSink for WriteSet {
    fn schedule(&mut self, file_name: String, content: String) {
        let path = self.directory.join(file_name);
        trace!(path:?, bytes = content.len(); "Scheduling output unit");
        self.tasks.spawn(async move {
            match tokio::fs::write(&path, content).await {
                Ok(()) => Ok(path),
                Err(source) => Err(Error::Io { path, source }),
            }
        });
    }
}

/// Keeps output units in memory, in the order they were scheduled.
#[derive(Debug, Default)]
pub struct MemorySink {
    units: IndexMap<String, String>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, file_name: &str) -> Option<&str> {
        self.units.get(file_name).map(String::as_str)
    }

    pub fn into_units(self) -> IndexMap<String, String> {
        self.units
    }
}

impl OutputSink for MemorySink {
    fn schedule(&mut self, file_name: String, content: String) {
        self.units.insert(file_name, content);
    }
}

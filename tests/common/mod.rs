//! Common test utilities for propconf integration tests
//!
//! Provides mock collaborators, property fixtures, and helper functions.

#![allow(dead_code)]

use propconf::facade::{Facades, FilesFacade, MicrosecondClock, MillisecondClock};
use propconf::{Properties, ServerConfiguration};
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use tempfile::TempDir;

/// Route `log` output through the test harness
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

// =============================================================================
// Mock Collaborators
// =============================================================================

/// Clock that only moves when told to
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicI64,
}

impl ManualClock {
    pub fn at(ticks: i64) -> Arc<Self> {
        Arc::new(Self {
            now: AtomicI64::new(ticks),
        })
    }

    pub fn advance(&self, by: i64) {
        self.now.fetch_add(by, Ordering::SeqCst);
    }
}

impl MillisecondClock for ManualClock {
    fn ticks(&self) -> i64 {
        self.now.load(Ordering::SeqCst)
    }
}

impl MicrosecondClock for ManualClock {
    fn ticks(&self) -> i64 {
        self.now.load(Ordering::SeqCst) * 1000
    }
}

/// In-memory filesystem that counts reads
#[derive(Debug, Default)]
pub struct MemoryFiles {
    files: HashMap<PathBuf, String>,
    reads: AtomicUsize,
}

impl MemoryFiles {
    pub fn with_file(mut self, path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        self.files.insert(path.into(), content.into());
        self
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

impl FilesFacade for MemoryFiles {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, path.display().to_string()))
    }
}

/// Default collaborators with a manual clock swapped in
pub fn facades_with_clock(clock: Arc<ManualClock>) -> Facades {
    Facades {
        millisecond_clock: clock.clone(),
        microsecond_clock: clock,
        ..Facades::default()
    }
}

// =============================================================================
// Property Fixtures
// =============================================================================

/// Properties from `(key, value)` pairs
pub fn props(pairs: &[(&str, &str)]) -> Properties {
    pairs.iter().copied().collect()
}

/// Build a configuration from pairs, panicking on failure
pub fn build(pairs: &[(&str, &str)]) -> ServerConfiguration {
    ServerConfiguration::from_properties("/var/lib/db", &props(pairs))
        .expect("configuration should resolve")
}

/// A temp directory holding a `server.conf` with the given content
pub struct ConfDir {
    pub temp_dir: TempDir,
}

impl ConfDir {
    pub fn with_server_conf(content: &str) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        std::fs::write(temp_dir.path().join("server.conf"), content)
            .expect("Failed to write server.conf");
        Self { temp_dir }
    }

    pub fn server_conf(&self) -> PathBuf {
        self.temp_dir.path().join("server.conf")
    }

    pub fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        std::fs::write(&path, content).expect("Failed to write file");
        path
    }
}

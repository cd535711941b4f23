//! MIME type lookup for static content
//!
//! Reads the common `mime.types` format:
//!
//! ```text
//! # comment
//! text/html    html htm
//! image/png    png
//! ```

use crate::error::{Error, Result};
use crate::facade::FilesFacade;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Well-known location of the default table
pub const DEFAULT_RESOURCE: &str = "/site/conf/mime.types";

const BUNDLED_TABLE: &str = include_str!("../resources/site/conf/mime.types");

/// File extension to MIME type table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MimeTypesCache {
    by_extension: HashMap<String, String>,
}

impl MimeTypesCache {
    /// Parse `mime.types` text
    ///
    /// # Errors
    ///
    /// Returns [`Error::MimeTypes`] for an entry whose type is not `type/subtype`.
    pub fn parse(content: &str) -> Result<Self> {
        Self::parse_from(Path::new(DEFAULT_RESOURCE), content)
    }

    /// The table embedded in the crate for [`DEFAULT_RESOURCE`]
    ///
    /// # Errors
    ///
    /// Only fails if the embedded table is malformed.
    pub fn bundled() -> Result<Self> {
        Self::parse(BUNDLED_TABLE)
    }

    /// Read and parse a table through `files`
    ///
    /// # Errors
    ///
    /// Returns [`Error::ResourceRead`] if the file cannot be read, or
    /// [`Error::MimeTypes`] if an entry is malformed.
    pub fn load(files: &dyn FilesFacade, path: &Path) -> Result<Self> {
        let content = files.read_to_string(path).map_err(|e| Error::ResourceRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse_from(path, &content)
    }

    fn parse_from(origin: &Path, content: &str) -> Result<Self> {
        let mut by_extension = HashMap::new();

        for (index, line) in content.lines().enumerate() {
            let line = line.split('#').next().unwrap_or_default();
            let mut fields = line.split_whitespace();
            let Some(mime_type) = fields.next() else {
                continue;
            };

            let valid = mime_type
                .split_once('/')
                .is_some_and(|(t, sub)| !t.is_empty() && !sub.is_empty() && !sub.contains('/'));
            if !valid {
                return Err(Error::MimeTypes {
                    path: origin.to_path_buf(),
                    line: index + 1,
                    reason: format!("'{mime_type}' is not a type/subtype pair"),
                });
            }

            for ext in fields {
                let ext = ext.trim_start_matches('.').to_ascii_lowercase();
                if let Some(previous) = by_extension.insert(ext.clone(), mime_type.to_string()) {
                    log::warn!(
                        "{}:{}: extension '{ext}' remapped from {previous} to {mime_type}",
                        origin.display(),
                        index + 1
                    );
                }
            }
        }

        log::debug!(
            "Loaded {} MIME extensions from {}",
            by_extension.len(),
            origin.display()
        );
        Ok(Self { by_extension })
    }

    /// MIME type for a file extension (case-insensitive, leading dot optional)
    pub fn get(&self, extension: &str) -> Option<&str> {
        let ext = extension.trim_start_matches('.').to_ascii_lowercase();
        self.by_extension.get(&ext).map(String::as_str)
    }

    /// MIME type for a file name, by its extension
    pub fn for_path(&self, path: &Path) -> Option<&str> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(|e| self.get(e))
    }

    pub fn len(&self) -> usize {
        self.by_extension.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_extension.is_empty()
    }
}

// =============================================================================
// Table Source
// =============================================================================

/// Operating system family, for resource path conventions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OsFamily {
    Windows,
    Unix,
}

impl OsFamily {
    pub fn current() -> Self {
        if cfg!(windows) {
            OsFamily::Windows
        } else {
            OsFamily::Unix
        }
    }
}

/// Convert a resource locator path into a filesystem path
///
/// Resource locators on Windows come back as `/C:/dir/file`; the leading
/// slash before the drive letter is not a valid file path there and is
/// removed. Every other path is returned unchanged.
///
/// # Example
/// ```rust
/// use propconf::mime::{normalize_resource_path, OsFamily};
/// use std::path::PathBuf;
///
/// assert_eq!(
///     normalize_resource_path("/C:/db/conf/mime.types", OsFamily::Windows),
///     PathBuf::from("C:/db/conf/mime.types")
/// );
/// assert_eq!(
///     normalize_resource_path("/C:/db/conf/mime.types", OsFamily::Unix),
///     PathBuf::from("/C:/db/conf/mime.types")
/// );
/// ```
pub fn normalize_resource_path(raw: &str, os: OsFamily) -> PathBuf {
    if os == OsFamily::Windows {
        let bytes = raw.as_bytes();
        let has_drive = bytes.len() >= 3
            && bytes[0] == b'/'
            && bytes[1].is_ascii_alphabetic()
            && bytes[2] == b':';
        if has_drive {
            return PathBuf::from(&raw[1..]);
        }
    }
    PathBuf::from(raw)
}

/// Where the MIME table comes from
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum MimeSource {
    /// Table embedded in the crate
    #[default]
    Bundled,
    /// Plain filesystem path
    File(PathBuf),
    /// Path produced by a resource locator, normalized for the current OS
    Resource(String),
}

impl MimeSource {
    pub(crate) fn load(&self, files: &dyn FilesFacade) -> Result<MimeTypesCache> {
        match self {
            MimeSource::Bundled => MimeTypesCache::bundled(),
            MimeSource::File(path) => MimeTypesCache::load(files, path),
            MimeSource::Resource(raw) => {
                let path = normalize_resource_path(raw, OsFamily::current());
                MimeTypesCache::load(files, &path)
            }
        }
    }
}

//! Raw configuration input
//!
//! A [`PropertySource`] is the flat key/value mapping that resolution reads
//! from. The resolver only ever asks for the keys it knows about, so a source
//! never needs to be iterated except for diagnostics.
//!
//! Provided sources:
//! - `HashMap<String, String>` / `BTreeMap<String, String>`
//! - [`Properties`] - parsed `.properties` text
//! - [`EnvOverlay`] - environment variables layered over another source

use crate::error::{Error, Result};
use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::Arc;

/// Read-only key/value mapping consumed by the resolver
pub trait PropertySource {
    /// Look up the raw value for a key. Keys are case-sensitive.
    fn get(&self, key: &str) -> Option<Cow<'_, str>>;

    /// Keys present in this source, if it can enumerate them
    fn keys(&self) -> Vec<String> {
        Vec::new()
    }
}

impl<S: PropertySource + ?Sized> PropertySource for &S {
    fn get(&self, key: &str) -> Option<Cow<'_, str>> {
        (**self).get(key)
    }

    fn keys(&self) -> Vec<String> {
        (**self).keys()
    }
}

impl<H: std::hash::BuildHasher> PropertySource for HashMap<String, String, H> {
    fn get(&self, key: &str) -> Option<Cow<'_, str>> {
        HashMap::get(self, key).map(|v| Cow::Borrowed(v.as_str()))
    }

    fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = HashMap::keys(self).cloned().collect();
        keys.sort();
        keys
    }
}

impl PropertySource for BTreeMap<String, String> {
    fn get(&self, key: &str) -> Option<Cow<'_, str>> {
        BTreeMap::get(self, key).map(|v| Cow::Borrowed(v.as_str()))
    }

    fn keys(&self) -> Vec<String> {
        BTreeMap::keys(self).cloned().collect()
    }
}

// =============================================================================
// Properties
// =============================================================================

/// Key/value pairs parsed from `.properties` text
///
/// Supported syntax:
/// - `#` and `!` start a comment line
/// - a key ends at the first unescaped `=`, `:` or whitespace; one separator is consumed
/// - leading whitespace is dropped from keys and values, trailing whitespace is kept
/// - a trailing backslash continues the value on the next line
/// - `\t`, `\n`, `\r`, `\f`, `\uXXXX` and `\\` escapes; any other escaped
///   character stands for itself, so `\=`, `\:` and `\ ` can appear in keys
/// - when a key repeats, the last occurrence wins
///
/// # Example
/// ```rust
/// use propconf::{Properties, PropertySource};
///
/// let props = Properties::parse("http.worker.count = 4\n# comment\nline.udp.join=224.1.1.1");
/// assert_eq!(props.get("http.worker.count").as_deref(), Some("4"));
/// assert_eq!(props.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Properties {
    entries: BTreeMap<String, String>,
}

impl Properties {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse properties text. Parsing never fails; lines without a key are skipped.
    pub fn parse(content: &str) -> Self {
        let mut entries = BTreeMap::new();
        let mut pending = String::new();
        let mut in_continuation = false;

        for line in content.lines() {
            let line = line.trim_start_matches(is_blank);
            if !in_continuation && (line.is_empty() || line.starts_with(['#', '!'])) {
                continue;
            }

            match continued(line) {
                Some(head) => {
                    pending.push_str(head);
                    in_continuation = true;
                    continue;
                }
                None => {
                    pending.push_str(line);
                    in_continuation = false;
                }
            }

            let logical = std::mem::take(&mut pending);
            if let Some((key, value)) = split_entry(&logical) {
                log::trace!("property '{key}' = '{value}'");
                entries.insert(key, value);
            }
        }

        // Continuation on the final line
        if let Some((key, value)) = split_entry(&pending) {
            entries.insert(key, value);
        }

        Self { entries }
    }

    /// Read and parse a `.properties` file
    ///
    /// # Errors
    ///
    /// Returns [`Error::ResourceRead`] if the file cannot be read.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::ResourceRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let props = Self::parse(&content);
        log::debug!("Loaded {} properties from {}", props.len(), path.display());
        Ok(props)
    }

    /// Set a property, returning the previous value
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.entries.insert(key.into(), value.into())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

fn is_blank(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\x0c')
}

/// Line content without its continuation backslash, if it has one.
/// An even run of trailing backslashes is an escaped backslash, not a continuation.
fn continued(line: &str) -> Option<&str> {
    let backslashes = line.bytes().rev().take_while(|b| *b == b'\\').count();
    if backslashes % 2 == 1 {
        Some(&line[..line.len() - 1])
    } else {
        None
    }
}

/// Split a logical line into its unescaped key and value
fn split_entry(line: &str) -> Option<(String, String)> {
    let line = line.trim_start_matches(is_blank);

    let mut key_end = line.len();
    let mut escaped = false;
    for (i, c) in line.char_indices() {
        if escaped {
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == '=' || c == ':' || is_blank(c) {
            key_end = i;
            break;
        }
    }

    let (key, rest) = line.split_at(key_end);
    if key.is_empty() {
        return None;
    }

    let rest = rest.trim_start_matches(is_blank);
    let value = rest
        .strip_prefix(['=', ':'])
        .map_or(rest, |r| r.trim_start_matches(is_blank));

    Some((unescape(key), unescape(value)))
}

fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    // UTF-16 units from consecutive \u escapes, so surrogate pairs combine
    let mut units: Vec<u16> = Vec::new();
    let mut chars = raw.chars();

    while let Some(c) = chars.next() {
        if c == '\\' && chars.as_str().starts_with('u') {
            chars.next();
            if let Some(unit) = take_hex4(&mut chars) {
                units.push(unit);
                continue;
            }
            log::warn!("Malformed \\u escape in '{raw}', keeping it as written");
            flush_utf16(&mut out, &mut units);
            out.push_str("\\u");
            continue;
        }

        flush_utf16(&mut out, &mut units);
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('f') => out.push('\x0c'),
            Some(other) => out.push(other),
            None => {}
        }
    }

    flush_utf16(&mut out, &mut units);
    out
}

fn take_hex4(chars: &mut std::str::Chars<'_>) -> Option<u16> {
    let rest = chars.as_str();
    let digits = rest
        .get(..4)
        .filter(|d| d.bytes().all(|b| b.is_ascii_hexdigit()))?;
    let unit = u16::from_str_radix(digits, 16).ok()?;
    *chars = rest[4..].chars();
    Some(unit)
}

fn flush_utf16(out: &mut String, units: &mut Vec<u16>) {
    out.extend(
        char::decode_utf16(units.drain(..)).map(|r| r.unwrap_or(char::REPLACEMENT_CHARACTER)),
    );
}

impl PropertySource for Properties {
    fn get(&self, key: &str) -> Option<Cow<'_, str>> {
        self.entries.get(key).map(|v| Cow::Borrowed(v.as_str()))
    }

    fn keys(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Properties {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

// =============================================================================
// Environment Overlay
// =============================================================================

/// Source of environment variables
///
/// Injectable so tests do not have to mutate the process environment.
pub trait EnvSource: Send + Sync {
    fn var(&self, name: &str) -> std::result::Result<String, std::env::VarError>;
}

/// Reads the real process environment
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultEnvSource;

impl EnvSource for DefaultEnvSource {
    fn var(&self, name: &str) -> std::result::Result<String, std::env::VarError> {
        std::env::var(name)
    }
}

impl<H: std::hash::BuildHasher + Send + Sync> EnvSource for HashMap<String, String, H> {
    fn var(&self, name: &str) -> std::result::Result<String, std::env::VarError> {
        HashMap::get(self, name)
            .cloned()
            .ok_or(std::env::VarError::NotPresent)
    }
}

/// Environment variables layered over another source
///
/// A key such as `http.worker.count` is looked up first as
/// `{PREFIX}_HTTP_WORKER_COUNT`, then in the inner source.
///
/// # Example
/// ```rust
/// use propconf::{EnvOverlay, Properties, PropertySource};
/// use std::collections::HashMap;
/// use std::sync::Arc;
///
/// let env: HashMap<String, String> =
///     [("QDB_HTTP_WORKER_COUNT".to_string(), "8".to_string())].into();
/// let overlay = EnvOverlay::new("qdb", Properties::parse("http.worker.count=4"))
///     .with_env_source(Arc::new(env));
///
/// assert_eq!(overlay.get("http.worker.count").as_deref(), Some("8"));
/// ```
pub struct EnvOverlay<S> {
    prefix: String,
    env: Arc<dyn EnvSource>,
    inner: S,
}

impl<S: PropertySource> EnvOverlay<S> {
    pub fn new(prefix: impl Into<String>, inner: S) -> Self {
        Self {
            prefix: prefix.into(),
            env: Arc::new(DefaultEnvSource),
            inner,
        }
    }

    /// Replace the environment lookup (defaults to the process environment)
    #[must_use]
    pub fn with_env_source(mut self, env: Arc<dyn EnvSource>) -> Self {
        self.env = env;
        self
    }

    /// Environment variable name consulted for a key
    ///
    /// Format: `{PREFIX}_{KEY}` (all uppercase, dots become underscores)
    pub fn env_var_name(&self, key: &str) -> String {
        let env_key = key.replace('.', "_").to_uppercase();
        format!("{}_{}", self.prefix.to_uppercase(), env_key)
    }
}

impl<S: PropertySource> PropertySource for EnvOverlay<S> {
    fn get(&self, key: &str) -> Option<Cow<'_, str>> {
        let name = self.env_var_name(key);
        match self.env.var(&name) {
            Ok(value) => {
                log::debug!("'{key}' overridden by environment variable {name}");
                Some(Cow::Owned(value))
            }
            Err(_) => self.inner.get(key),
        }
    }

    fn keys(&self) -> Vec<String> {
        self.inner.keys()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_separators_and_comments() {
        let props = Properties::parse(
            "# header\n\
             ! bang comment\n\
             a=1\n\
             b : 2\n\
             c 3\n\
             d=\n\
             \n\
             e = spaced value  \n",
        );

        assert_eq!(props.get("a").as_deref(), Some("1"));
        assert_eq!(props.get("b").as_deref(), Some("2"));
        assert_eq!(props.get("c").as_deref(), Some("3"));
        assert_eq!(props.get("d").as_deref(), Some(""));
        assert_eq!(props.get("e").as_deref(), Some("spaced value  "));
        assert_eq!(props.len(), 5);
    }

    #[test]
    fn test_parse_continuation() {
        let props = Properties::parse("list=a,\\\n    b,\\\n    c\nnext=1");

        assert_eq!(props.get("list").as_deref(), Some("a,b,c"));
        assert_eq!(props.get("next").as_deref(), Some("1"));
    }

    #[test]
    fn test_escaped_backslash_is_not_continuation() {
        let props = Properties::parse("path=C:\\\\\nnext=1");

        assert_eq!(props.get("path").as_deref(), Some("C:\\"));
        assert_eq!(props.get("next").as_deref(), Some("1"));
    }

    #[test]
    fn test_escaped_backslashes_in_windows_path() {
        let props = Properties::parse("http.static.pubic.directory=C:\\\\www\\\\public\n");
        assert_eq!(
            props.get("http.static.pubic.directory").as_deref(),
            Some("C:\\www\\public")
        );
    }

    #[test]
    fn test_escaped_separators_stay_in_key() {
        let props = Properties::parse("key\\=x=1\na\\ b = c\nport\\:1 : 2\n");

        assert_eq!(props.get("key=x").as_deref(), Some("1"));
        assert_eq!(props.get("a b").as_deref(), Some("c"));
        assert_eq!(props.get("port:1").as_deref(), Some("2"));
        assert_eq!(props.len(), 3);
    }

    #[test]
    fn test_unicode_escapes() {
        let props = Properties::parse(
            "unicode=caf\\u00e9\n\
             smile=\\ud83d\\ude00\n\
             lone=x\\ud83dy\n\
             broken=\\u00zz\n",
        );

        assert_eq!(props.get("unicode").as_deref(), Some("café"));
        assert_eq!(props.get("smile").as_deref(), Some("\u{1F600}"));
        assert_eq!(props.get("lone").as_deref(), Some("x\u{FFFD}y"));
        assert_eq!(props.get("broken").as_deref(), Some("\\u00zz"));
    }

    #[test]
    fn test_control_escapes() {
        let props = Properties::parse("sep=a\\tb\\nc\\rd\\fe\nplain=\\q\n");

        assert_eq!(props.get("sep").as_deref(), Some("a\tb\nc\rd\x0ce"));
        assert_eq!(props.get("plain").as_deref(), Some("q"));
    }

    #[test]
    fn test_trailing_escaped_space_is_kept() {
        let props = Properties::parse("pad=x\\ \nnext=1");
        assert_eq!(props.get("pad").as_deref(), Some("x "));
        assert_eq!(props.get("next").as_deref(), Some("1"));
    }

    #[test]
    fn test_last_duplicate_wins() {
        let props = Properties::parse("k=1\nk=2");
        assert_eq!(props.get("k").as_deref(), Some("2"));
    }

    #[test]
    fn test_keys_are_case_sensitive() {
        let props: Properties = [("Http.Worker.Count", "3")].into_iter().collect();
        assert!(props.get("http.worker.count").is_none());
        assert_eq!(props.keys(), vec!["Http.Worker.Count".to_string()]);
    }

    #[test]
    fn test_env_var_name() {
        let overlay = EnvOverlay::new("qdb", Properties::new());
        assert_eq!(
            overlay.env_var_name("cairo.sql.map.page.size"),
            "QDB_CAIRO_SQL_MAP_PAGE_SIZE"
        );
    }

    #[test]
    fn test_env_overlay_falls_back_to_inner() {
        let env: HashMap<String, String> = HashMap::new();
        let overlay = EnvOverlay::new("app", Properties::parse("x.y=inner"))
            .with_env_source(Arc::new(env));

        assert_eq!(overlay.get("x.y").as_deref(), Some("inner"));
        assert!(overlay.get("x.z").is_none());
        assert_eq!(overlay.keys(), vec!["x.y".to_string()]);
    }
}

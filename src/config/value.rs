//! Typed value parsers
//!
//! Each semantic kind of setting is a marker type implementing
//! [`ValueParser`]. All parsers share one shape: an absent key yields the
//! default, a present key is parsed strictly and a bad literal becomes
//! [`ConfigError::MalformedValue`] naming the key and the raw text.
//! Numbers may carry a leading `-` but never an explicit `+`.
//!
//! The boolean parser is the exception: any text other than a
//! case-insensitive `true` is `false`, and it never fails.

use crate::config::schema::{DefaultValue, SettingKind};
use crate::error::ConfigError;
use crate::source::PropertySource;
use std::net::Ipv4Addr;

/// Largest byte size accepted, kept to the range of a signed 32-bit size field
pub const MAX_BYTE_SIZE: usize = i32::MAX as usize;

/// Conversion from raw text to one semantic kind
pub trait ValueParser {
    /// Resolved Rust type
    type Output;

    /// Type of the default as written in the key table
    type Default: Copy;

    const KIND: SettingKind;

    /// Parse a present raw value
    fn parse(key: &str, raw: &str) -> Result<Self::Output, ConfigError>;

    /// Produce the value for an absent key
    fn from_default(key: &str, default: Self::Default) -> Result<Self::Output, ConfigError>;

    /// Default as shown in the key catalog
    fn describe_default(default: Self::Default) -> DefaultValue;

    /// Resolve already looked-up text, falling back to `default` when absent
    fn from_raw(
        key: &str,
        raw: Option<&str>,
        default: Self::Default,
    ) -> Result<Self::Output, ConfigError> {
        match raw {
            Some(raw) => {
                log::debug!("{key} = '{raw}'");
                Self::parse(key, raw)
            }
            None => Self::from_default(key, default),
        }
    }

    /// Look up `key` in `source`, falling back to `default` when absent
    fn get<S: PropertySource + ?Sized>(
        source: &S,
        key: &str,
        default: Self::Default,
    ) -> Result<Self::Output, ConfigError> {
        Self::from_raw(key, source.get(key).as_deref(), default)
    }
}

/// Base-10 signed 32-bit integer
#[derive(Debug, Clone, Copy)]
pub struct Int;

/// Base-10 signed 64-bit integer
#[derive(Debug, Clone, Copy)]
pub struct Long;

/// Byte count with an optional `k`, `m` or `g` suffix (case-insensitive, powers of 1024)
#[derive(Debug, Clone, Copy)]
pub struct Size;

/// Finite base-10 floating point
#[derive(Debug, Clone, Copy)]
pub struct Double;

/// Permissive boolean
#[derive(Debug, Clone, Copy)]
pub struct Bool;

/// Dotted-quad IPv4 address; the default is itself a dotted-quad string
#[derive(Debug, Clone, Copy)]
pub struct Ipv4;

/// Free-form text, used verbatim
#[derive(Debug, Clone, Copy)]
pub struct Str;

impl ValueParser for Int {
    type Output = i32;
    type Default = i32;
    const KIND: SettingKind = SettingKind::Int;

    fn parse(key: &str, raw: &str) -> Result<i32, ConfigError> {
        parse_signed(raw).ok_or_else(|| ConfigError::malformed(key, raw))
    }

    fn from_default(_key: &str, default: i32) -> Result<i32, ConfigError> {
        Ok(default)
    }

    fn describe_default(default: i32) -> DefaultValue {
        DefaultValue::Int(default.into())
    }
}

impl ValueParser for Long {
    type Output = i64;
    type Default = i64;
    const KIND: SettingKind = SettingKind::Long;

    fn parse(key: &str, raw: &str) -> Result<i64, ConfigError> {
        parse_signed(raw).ok_or_else(|| ConfigError::malformed(key, raw))
    }

    fn from_default(_key: &str, default: i64) -> Result<i64, ConfigError> {
        Ok(default)
    }

    fn describe_default(default: i64) -> DefaultValue {
        DefaultValue::Int(default)
    }
}

impl ValueParser for Size {
    type Output = usize;
    type Default = usize;
    const KIND: SettingKind = SettingKind::Size;

    fn parse(key: &str, raw: &str) -> Result<usize, ConfigError> {
        parse_byte_size(raw).ok_or_else(|| ConfigError::malformed(key, raw))
    }

    fn from_default(_key: &str, default: usize) -> Result<usize, ConfigError> {
        Ok(default)
    }

    fn describe_default(default: usize) -> DefaultValue {
        DefaultValue::Size(default)
    }
}

impl ValueParser for Double {
    type Output = f64;
    type Default = f64;
    const KIND: SettingKind = SettingKind::Double;

    fn parse(key: &str, raw: &str) -> Result<f64, ConfigError> {
        parse_signed::<f64>(raw)
            .filter(|v| v.is_finite())
            .ok_or_else(|| ConfigError::malformed(key, raw))
    }

    fn from_default(_key: &str, default: f64) -> Result<f64, ConfigError> {
        Ok(default)
    }

    fn describe_default(default: f64) -> DefaultValue {
        DefaultValue::Double(default)
    }
}

impl ValueParser for Bool {
    type Output = bool;
    type Default = bool;
    const KIND: SettingKind = SettingKind::Bool;

    fn parse(_key: &str, raw: &str) -> Result<bool, ConfigError> {
        Ok(parse_bool(raw))
    }

    fn from_default(_key: &str, default: bool) -> Result<bool, ConfigError> {
        Ok(default)
    }

    fn describe_default(default: bool) -> DefaultValue {
        DefaultValue::Bool(default)
    }
}

impl ValueParser for Ipv4 {
    type Output = Ipv4Addr;
    type Default = &'static str;
    const KIND: SettingKind = SettingKind::Ipv4;

    fn parse(key: &str, raw: &str) -> Result<Ipv4Addr, ConfigError> {
        raw.parse().map_err(|_| ConfigError::malformed(key, raw))
    }

    fn from_default(key: &str, default: &'static str) -> Result<Ipv4Addr, ConfigError> {
        Self::parse(key, default)
    }

    fn describe_default(default: &'static str) -> DefaultValue {
        DefaultValue::Text(default)
    }
}

impl ValueParser for Str {
    type Output = String;
    type Default = &'static str;
    const KIND: SettingKind = SettingKind::Str;

    fn parse(_key: &str, raw: &str) -> Result<String, ConfigError> {
        Ok(raw.to_string())
    }

    fn from_default(_key: &str, default: &'static str) -> Result<String, ConfigError> {
        Ok(default.to_string())
    }

    fn describe_default(default: &'static str) -> DefaultValue {
        DefaultValue::Text(default)
    }
}

// =============================================================================
// Raw text parsers
// =============================================================================

/// Parse a byte size such as `512`, `4k`, `2M` or `1g`
///
/// Returns `None` for negative, empty, overflowing or otherwise malformed input.
///
/// # Example
/// ```rust
/// use propconf::config::parse_byte_size;
///
/// assert_eq!(parse_byte_size("4k"), Some(4096));
/// assert_eq!(parse_byte_size("2M"), Some(2 * 1024 * 1024));
/// assert_eq!(parse_byte_size("-1"), None);
/// ```
pub fn parse_byte_size(raw: &str) -> Option<usize> {
    let (digits, multiplier) = match raw.as_bytes().last()? {
        b'k' | b'K' => (&raw[..raw.len() - 1], 1024),
        b'm' | b'M' => (&raw[..raw.len() - 1], 1024 * 1024),
        b'g' | b'G' => (&raw[..raw.len() - 1], 1024 * 1024 * 1024),
        _ => (raw, 1),
    };

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let bytes = digits.parse::<usize>().ok()?.checked_mul(multiplier)?;
    (bytes <= MAX_BYTE_SIZE).then_some(bytes)
}

/// Numeric text with an optional leading `-`; an explicit `+` is malformed,
/// as it is for byte sizes.
fn parse_signed<T: std::str::FromStr>(raw: &str) -> Option<T> {
    if raw.starts_with('+') {
        return None;
    }
    raw.parse().ok()
}

/// `true` for a case-insensitive `"true"`, `false` for anything else
pub fn parse_bool(raw: &str) -> bool {
    raw.eq_ignore_ascii_case("true")
}

// =============================================================================
// Lookup helpers
// =============================================================================

/// Resolve a 32-bit integer setting
pub fn get_int<S: PropertySource + ?Sized>(
    source: &S,
    key: &str,
    default: i32,
) -> Result<i32, ConfigError> {
    Int::get(source, key, default)
}

/// Resolve a 64-bit integer setting
pub fn get_long<S: PropertySource + ?Sized>(
    source: &S,
    key: &str,
    default: i64,
) -> Result<i64, ConfigError> {
    Long::get(source, key, default)
}

/// Resolve a byte size setting
pub fn get_byte_size<S: PropertySource + ?Sized>(
    source: &S,
    key: &str,
    default: usize,
) -> Result<usize, ConfigError> {
    Size::get(source, key, default)
}

/// Resolve a floating point setting
pub fn get_double<S: PropertySource + ?Sized>(
    source: &S,
    key: &str,
    default: f64,
) -> Result<f64, ConfigError> {
    Double::get(source, key, default)
}

/// Resolve a boolean setting. Never fails.
pub fn get_bool<S: PropertySource + ?Sized>(source: &S, key: &str, default: bool) -> bool {
    source.get(key).map_or(default, |raw| parse_bool(&raw))
}

/// Resolve an IPv4 address setting
pub fn get_ipv4<S: PropertySource + ?Sized>(
    source: &S,
    key: &str,
    default: &'static str,
) -> Result<Ipv4Addr, ConfigError> {
    Ipv4::get(source, key, default)
}

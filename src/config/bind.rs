//! `host:port` address specs
//!
//! A bind spec encodes an IPv4 host and a port in one value, e.g.
//! `0.0.0.0:9000`. The text is split at the first `:`; each half is validated
//! on its own so the error carries only the half that is wrong.

use crate::config::schema::{DefaultValue, SettingKind};
use crate::config::value::ValueParser;
use crate::error::ConfigError;
use crate::source::PropertySource;
use std::net::{Ipv4Addr, SocketAddrV4};

/// IPv4 host and port resolved from a single key
#[derive(Debug, Clone, Copy)]
pub struct Bind;

impl ValueParser for Bind {
    type Output = SocketAddrV4;
    type Default = &'static str;
    const KIND: SettingKind = SettingKind::Bind;

    fn parse(key: &str, raw: &str) -> Result<SocketAddrV4, ConfigError> {
        parse_bind_spec(key, raw)
    }

    fn from_default(key: &str, default: &'static str) -> Result<SocketAddrV4, ConfigError> {
        parse_bind_spec(key, default)
    }

    fn describe_default(default: &'static str) -> DefaultValue {
        DefaultValue::Text(default)
    }
}

/// Parse a `host:port` spec for `key`
///
/// # Errors
///
/// - [`ConfigError::MissingSeparator`] with the whole spec when there is no `:`
/// - [`ConfigError::InvalidHost`] with the host text when it is not a dotted quad
/// - [`ConfigError::InvalidPort`] with the port text when it is not an integer in `0..=65535`
///
/// # Example
/// ```rust
/// use propconf::config::parse_bind_spec;
/// use std::net::{Ipv4Addr, SocketAddrV4};
///
/// let addr = parse_bind_spec("http.bind.to", "192.168.1.5:8080").unwrap();
/// assert_eq!(addr, SocketAddrV4::new(Ipv4Addr::new(192, 168, 1, 5), 8080));
/// ```
pub fn parse_bind_spec(key: &str, spec: &str) -> Result<SocketAddrV4, ConfigError> {
    let Some((host, port)) = spec.split_once(':') else {
        return Err(ConfigError::MissingSeparator {
            key: key.to_string(),
            value: spec.to_string(),
        });
    };

    let ip: Ipv4Addr = host.parse().map_err(|_| ConfigError::InvalidHost {
        key: key.to_string(),
        value: host.to_string(),
    })?;

    let port: u16 = port.parse().map_err(|_| ConfigError::InvalidPort {
        key: key.to_string(),
        value: port.to_string(),
    })?;

    Ok(SocketAddrV4::new(ip, port))
}

/// Resolve a bind spec setting, parsing `default` when the key is absent
pub fn get_bind_spec<S: PropertySource + ?Sized>(
    source: &S,
    key: &str,
    default: &'static str,
) -> Result<SocketAddrV4, ConfigError> {
    Bind::get(source, key, default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const KEY: &str = "http.bind.to";

    #[test]
    fn test_valid_specs() {
        assert_eq!(
            parse_bind_spec(KEY, "0.0.0.0:9000").unwrap(),
            SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, 9000)
        );
        assert_eq!(
            parse_bind_spec(KEY, "192.168.1.5:8080").unwrap(),
            SocketAddrV4::new(Ipv4Addr::new(192, 168, 1, 5), 8080)
        );
        assert_eq!(parse_bind_spec(KEY, "127.0.0.1:0").unwrap().port(), 0);
        assert_eq!(parse_bind_spec(KEY, "127.0.0.1:65535").unwrap().port(), 65535);
    }

    #[test]
    fn test_missing_separator_reports_whole_spec() {
        assert_eq!(
            parse_bind_spec(KEY, "9000").unwrap_err(),
            ConfigError::MissingSeparator {
                key: KEY.into(),
                value: "9000".into()
            }
        );
    }

    #[test]
    fn test_invalid_host_reports_host_only() {
        assert_eq!(
            parse_bind_spec(KEY, "999.0.0.1:9000").unwrap_err(),
            ConfigError::InvalidHost {
                key: KEY.into(),
                value: "999.0.0.1".into()
            }
        );
        assert_eq!(parse_bind_spec(KEY, ":9000").unwrap_err().value(), "");
        assert_eq!(parse_bind_spec(KEY, "localhost:9000").unwrap_err().value(), "localhost");
    }

    #[test]
    fn test_invalid_port_reports_port_only() {
        assert_eq!(
            parse_bind_spec(KEY, "0.0.0.0:abc").unwrap_err(),
            ConfigError::InvalidPort {
                key: KEY.into(),
                value: "abc".into()
            }
        );
        for (spec, port) in [
            ("0.0.0.0:65536", "65536"),
            ("0.0.0.0:-1", "-1"),
            ("0.0.0.0:", ""),
            ("0.0.0.0:80:81", "80:81"),
        ] {
            let err = parse_bind_spec(KEY, spec).unwrap_err();
            assert!(matches!(err, ConfigError::InvalidPort { .. }), "{spec}");
            assert_eq!(err.value(), port);
        }
    }

    #[test]
    fn test_absent_key_parses_default() {
        let empty: HashMap<String, String> = HashMap::new();
        assert_eq!(
            get_bind_spec(&empty, "line.udp.bind.to", "0.0.0.0:9009").unwrap(),
            SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, 9009)
        );
    }
}

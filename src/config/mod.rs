//! Settings resolution
//!
//! This module contains the resolution pipeline:
//! - `value` - typed parsers for each semantic kind (int, size, bool, ...)
//! - `bind` - `host:port` address specs
//! - `schema` - the recognized-key table and [`ResolvedSettings`]
//! - `types` - [`ServerConfiguration`] and its builder

mod bind;
mod schema;
mod types;
mod value;

pub use bind::{Bind, get_bind_spec, parse_bind_spec};

pub use schema::{
    DefaultValue, KEYS, NAMESPACES, PostRule, ResolvedSettings, SettingKind, SettingMetadata,
    catalog, lookup, unknown_keys,
};

pub use types::{ServerConfiguration, ServerConfigurationBuilder};

pub use value::{
    Bool, Double, Int, Ipv4, Long, MAX_BYTE_SIZE, Size, Str, ValueParser, get_bool,
    get_byte_size, get_double, get_int, get_ipv4, get_long, parse_bool, parse_byte_size,
};

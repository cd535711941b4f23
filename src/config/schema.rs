//! Recognized settings and their resolution
//!
//! # Overview
//!
//! The set of recognized keys is closed. It is declared once, in order, in the
//! `settings_table!` invocation below; each row names the field, the semantic
//! kind, the property key, the default and an optional post-processing rule.
//! From that single table the macro generates:
//!
//! - [`ResolvedSettings`], one typed field per row
//! - the resolver, which walks the rows in declaration order and looks each
//!   key up in the input (keys present in the input but not in the table are
//!   never read)
//! - [`catalog()`] and [`KEYS`], the same rows as data for tooling and docs
//!
//! # Resolution
//!
//! Resolution is all-or-nothing. The first key that fails to parse aborts it
//! and its [`ConfigError`] is returned unchanged; no partially populated
//! record exists at any point because the struct is only assembled after
//! every row has parsed.
//!
//! ```rust
//! use propconf::{Properties, ResolvedSettings};
//!
//! let props = Properties::parse("http.worker.count=4\ncairo.index.value.block.size=200");
//! let settings = ResolvedSettings::resolve(&props, "/var/lib/db").unwrap();
//! assert_eq!(settings.root(), "/var/lib/db");
//!
//! let bad = Properties::parse("http.worker.count=four");
//! let err = ResolvedSettings::resolve(&bad, "/var/lib/db").unwrap_err();
//! assert_eq!(err.key(), "http.worker.count");
//! ```

use crate::config::bind::Bind;
use crate::config::value::{Bool, Double, Int, Ipv4, Long, MAX_BYTE_SIZE, Size, Str, ValueParser};
use crate::error::ConfigError;
use crate::source::PropertySource;
use serde::Serialize;
use std::fmt;

// =============================================================================
// Catalog Types
// =============================================================================

/// Semantic type of a setting
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SettingKind {
    /// 32-bit signed integer
    Int,
    /// 64-bit signed integer
    Long,
    /// Byte count with optional k/m/g suffix
    Size,
    /// Floating point
    Double,
    /// Boolean, `true` case-insensitively, anything else is false
    Bool,
    /// Dotted-quad IPv4 address
    Ipv4,
    /// `host:port` address spec
    Bind,
    /// Free-form text
    Str,
}

impl fmt::Display for SettingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SettingKind::Int => "int",
            SettingKind::Long => "long",
            SettingKind::Size => "size",
            SettingKind::Double => "double",
            SettingKind::Bool => "bool",
            SettingKind::Ipv4 => "ipv4",
            SettingKind::Bind => "bind",
            SettingKind::Str => "string",
        };
        f.write_str(name)
    }
}

/// Default value of a setting as written in the table
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
#[serde(untagged)]
pub enum DefaultValue {
    Int(i64),
    Size(usize),
    Double(f64),
    Bool(bool),
    Text(&'static str),
}

impl fmt::Display for DefaultValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DefaultValue::Int(v) => write!(f, "{v}"),
            DefaultValue::Size(v) => write!(f, "{v}"),
            DefaultValue::Double(v) => write!(f, "{v}"),
            DefaultValue::Bool(v) => write!(f, "{v}"),
            DefaultValue::Text(v) => f.write_str(v),
        }
    }
}

/// Transformation applied after a value parses
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PostRule {
    /// Round up to the next power of two
    CeilPow2,
}

impl PostRule {
    /// Apply the rule to a parsed byte size
    ///
    /// Returns `None` when the result would exceed [`MAX_BYTE_SIZE`], i.e. for
    /// any input above 2^30.
    #[must_use]
    pub fn apply(self, value: usize) -> Option<usize> {
        match self {
            PostRule::CeilPow2 => value
                .checked_next_power_of_two()
                .filter(|v| *v <= MAX_BYTE_SIZE),
        }
    }
}

/// One row of the recognized-key table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SettingMetadata {
    pub key: &'static str,

    #[serde(rename = "type")]
    pub kind: SettingKind,

    pub default: DefaultValue,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub rule: Option<PostRule>,

    pub description: &'static str,
}

impl SettingMetadata {
    /// Subsystem namespace this key belongs to (e.g. `http.net`)
    #[must_use]
    pub fn namespace(&self) -> &'static str {
        namespace_of(self.key).unwrap_or("")
    }
}

/// Key prefixes owned by this configuration, most specific first
pub const NAMESPACES: &[&str] = &["http.net", "http.text", "http", "cairo", "line.udp"];

fn namespace_of(key: &str) -> Option<&'static str> {
    NAMESPACES.iter().copied().find(|ns| {
        key.strip_prefix(ns)
            .is_some_and(|rest| rest.starts_with('.'))
    })
}

// =============================================================================
// The Table
// =============================================================================

macro_rules! settings_table {
    (@rule) => { None };
    (@rule $rule:ident) => { Some(PostRule::$rule) };
    (
        $(
            $(#[doc = $doc:literal])*
            $field:ident: $kind:ident($key:literal, $default:expr) $(=> $rule:ident)?;
        )*
    ) => {
        /// Fully typed result of one resolution pass
        ///
        /// Immutable once built. Subsystems read it through the capability views,
        /// which share it behind an `Arc`.
        #[derive(Debug, Clone, PartialEq)]
        pub struct ResolvedSettings {
            $(
                $(#[doc = $doc])*
                pub(crate) $field: <$kind as ValueParser>::Output,
            )*
            /// Storage root, stored verbatim
            pub(crate) root: String,
        }

        impl ResolvedSettings {
            /// Walk the table once; also returns how many keys came from `source`
            fn resolve_table<S: PropertySource + ?Sized>(
                source: &S,
                root: String,
            ) -> Result<(Self, usize), ConfigError> {
                let mut overridden = 0;
                $(
                    let raw = source.get($key);
                    if raw.is_some() {
                        overridden += 1;
                    }
                    let $field = <$kind as ValueParser>::from_raw($key, raw.as_deref(), $default)?;
                    $(
                        let $field = PostRule::$rule.apply($field).ok_or_else(|| {
                            ConfigError::malformed($key, raw.as_deref().unwrap_or_default())
                        })?;
                    )?
                )*
                Ok((Self { $($field,)* root }, overridden))
            }
        }

        /// Every recognized key, in resolution order
        pub const KEYS: &[&str] = &[$($key),*];

        /// Metadata for every recognized setting, in resolution order
        #[must_use]
        pub fn catalog() -> Vec<SettingMetadata> {
            vec![
                $(
                    SettingMetadata {
                        key: $key,
                        kind: <$kind as ValueParser>::KIND,
                        default: <$kind as ValueParser>::describe_default($default),
                        rule: settings_table!(@rule $($rule)?),
                        description: concat!($($doc),*).trim_ascii(),
                    },
                )*
            ]
        }
    };
}

settings_table! {
    // --- http -------------------------------------------------------------
    /// Initial capacity of the HTTP connection context pool.
    connection_pool_initial_capacity: Int("http.connection.pool.initial.capacity", 16);
    /// Capacity of the per-connection string pool.
    connection_string_pool_capacity: Int("http.connection.string.pool.capacity", 128);
    /// Buffer for multipart part headers.
    multipart_header_buffer_size: Size("http.multipart.header.buffer.size", 512);
    /// Spins before a multipart upload yields while waiting for data.
    multipart_idle_spin_count: Long("http.multipart.idle.spin.count", 10_000);
    /// HTTP receive buffer.
    recv_buffer_size: Size("http.receive.buffer.size", 1024 * 1024);
    /// Buffer for request headers.
    request_header_buffer_size: Size("http.request.header.buffer.size", 1024);
    /// Buffer for response headers.
    response_header_buffer_size: Size("http.response.header.buffer.size", 1024 * 1024);
    /// Number of HTTP worker threads.
    worker_count: Int("http.worker.count", 2);
    /// HTTP send buffer.
    send_buffer_size: Size("http.send.buffer.size", 2 * 1024 * 1024);
    /// File served for directory requests.
    index_file_name: Str("http.static.index.file.name", "index.html");
    /// Directory static content is served from.
    public_directory: Str("http.static.pubic.directory", "public");
    /// Abort uploads that fail to parse instead of skipping bad rows.
    abort_broken_uploads: Bool("http.text.abort.broken.uploads", true);

    // --- http.net ---------------------------------------------------------
    /// Maximum concurrently open connections.
    active_connection_limit: Int("http.net.active.connection.limit", 256);
    /// Capacity of the dispatcher event buffer.
    event_capacity: Int("http.net.event.capacity", 1024);
    /// Capacity of the IO queue.
    io_queue_capacity: Int("http.net.io.queue.capacity", 1024);
    /// Milliseconds before an idle connection is closed.
    idle_connection_timeout: Long("http.net.idle.connection.timeout", 5 * 60 * 1000);
    /// Capacity of the interest queue.
    interest_queue_capacity: Int("http.net.interest.queue.capacity", 1024);
    /// Listen socket backlog.
    listen_backlog: Int("http.net.listen.backlog", 256);
    /// Socket send buffer (SO_SNDBUF).
    snd_buf_size: Size("http.net.snd.buf.size", 2 * 1024 * 1024);
    /// Socket receive buffer (SO_RCVBUF).
    rcv_buf_size: Size("http.net.rcv.buf.size", 2 * 1024 * 1024);

    // --- http.text --------------------------------------------------------
    /// Resource describing the text import type adapters.
    adapter_set_configuration_file_name: Str("http.text.adapter.set.config", "/text_loader.json");
    /// Capacity of the date adapter pool.
    date_adapter_pool_capacity: Int("http.text.date.adapter.pool.capacity", 16);
    /// Upper bound of the JSON metadata cache.
    json_cache_limit: Size("http.text.json.cache.limit", 16384);
    /// Initial JSON metadata cache.
    json_cache_size: Size("http.text.json.cache.size", 8192);
    /// Largest delimiter standard deviation accepted when detecting the format.
    max_required_delimiter_std_dev: Double("http.text.max.required.delimiter.stddev", 0.1222);
    /// Capacity of the metadata string pool.
    metadata_string_pool_capacity: Int("http.text.metadata.string.pool.capacity", 128);
    /// Upper bound of the roll buffer.
    roll_buffer_limit: Size("http.text.roll.buffer.limit", 4096);
    /// Initial roll buffer.
    roll_buffer_size: Size("http.text.roll.buffer.size", 1024);
    /// Lines sampled when analysing an import.
    text_analysis_max_lines: Int("http.text.analysis.max.lines", 1000);
    /// Capacity of the lexer string pool.
    text_lexer_string_pool_capacity: Int("http.text.lexer.string.pool.capacity", 64);
    /// Capacity of the timestamp adapter pool.
    timestamp_adapter_pool_capacity: Int("http.text.timestamp.adapter.pool.capacity", 64);
    /// UTF-8 decoding sink.
    utf8_sink_size: Size("http.text.utf8.sink.size", 4096);

    /// Address and port the HTTP server listens on.
    http_bind: Bind("http.bind.to", "0.0.0.0:9000");

    // --- cairo ------------------------------------------------------------
    /// Retries for CREATE TABLE AS SELECT.
    create_as_select_retry_count: Int("cairo.create.as.select.retry.count", 5);
    /// Map implementation used by default.
    default_map_type: Str("cairo.default.map.type", "fast");
    /// Whether symbol columns are cached by default.
    default_symbol_cache_flag: Bool("cairo.default.symbol.cache.flag", false);
    /// Default symbol column capacity.
    default_symbol_capacity: Int("cairo.default.symbol.capacity", 256);
    /// Retries for failed file operations.
    file_operation_retry_count: Int("cairo.file.operation.retry.count", 30);
    /// Interval between idle resource checks.
    idle_check_interval: Long("cairo.idle.check.interval", 100);
    /// Time-to-live of inactive readers.
    inactive_reader_ttl: Long("cairo.inactive.reader.ttl", -10_000);
    /// Time-to-live of inactive writers.
    inactive_writer_ttl: Long("cairo.inactive.writer.ttl", -10_000);
    /// Index value block, rounded up to a power of two.
    index_value_block_size: Size("cairo.index.value.block.size", 256) => CeilPow2;
    /// Maximum swap files per table.
    max_swap_file_count: Int("cairo.max.swap.file.count", 30);
    /// Mode for created directories (509 is 0775).
    mkdir_mode: Int("cairo.mkdir.mode", 509);
    /// Row count above which indexing runs in parallel.
    parallel_index_threshold: Int("cairo.parallel.index.threshold", 100_000);
    /// Maximum reader pool segments.
    reader_pool_max_segments: Int("cairo.reader.pool.max.segments", 5);
    /// Spin lock timeout in microseconds.
    spin_lock_timeout_us: Long("cairo.spin.lock.timeout", 1_000_000);
    /// Rows per SQL cache block.
    sql_cache_rows: Int("cairo.cache.rows", 16);
    /// SQL cache blocks.
    sql_cache_blocks: Size("cairo.cache.blocks", 4);
    /// Capacity of the SQL character store.
    sql_character_store_capacity: Int("cairo.character.store.capacity", 1024);
    /// Capacity of the SQL character sequence pool.
    sql_character_store_sequence_pool_capacity: Int("cairo.character.store.sequence.pool.capacity", 64);
    /// Capacity of the SQL column pool.
    sql_column_pool_capacity: Int("cairo.column.pool.capacity", 4096);
    /// Load factor of compact maps.
    sql_compact_map_load_factor: Double("cairo.compact.map.load.factor", 0.7);
    /// Capacity of the SQL expression pool.
    sql_expression_pool_capacity: Int("cairo.expression.pool.capacity", 8192);
    /// Load factor of fast maps.
    sql_fast_map_load_factor: Double("cairo.fast.map.load.factor", 0.5);
    /// Capacity of the SQL join context pool.
    sql_join_context_pool_capacity: Int("cairo.sql.join.context.pool.capacity", 64);
    /// Capacity of the SQL lexer pool.
    sql_lexer_pool_capacity: Int("cairo.lexer.pool.capacity", 2048);
    /// Initial key capacity of SQL maps.
    sql_map_key_capacity: Int("cairo.sql.map.key.capacity", 2048);
    /// Page size of SQL maps.
    sql_map_page_size: Size("cairo.sql.map.page.size", 4 * 1024 * 1024);
    /// Capacity of the SQL model pool.
    sql_model_pool_capacity: Int("cairo.model.pool.capacity", 1024);
    /// Page size of sort keys.
    sql_sort_key_page_size: Size("cairo.sql.sort.key.page.size", 4 * 1024 * 1024);
    /// Page size of light sort values.
    sql_sort_light_value_page_size: Size("cairo.sql.sort.light.value.page.size", 1_048_576);
    /// Page size of hash join values.
    sql_hash_join_value_page_size: Size("cairo.sql.hash.join.value.page.size", 16_777_216);
    /// Page size of SQL trees.
    sql_tree_page_size: Size("cairo.sql.tree.page.size", 4 * 1024 * 1024);
    /// Page size of light hash join values.
    sql_hash_join_light_value_page_size: Size("cairo.sql.hash.join.light.value.page.size", 1_048_576);
    /// Page size of sort values.
    sql_sort_value_page_size: Size("cairo.sql.sort.value.page.size", 16_777_216);
    /// Work stealing timeout in nanoseconds.
    work_steal_timeout_nanos: Long("cairo.work.steal.timeout.nanos", 10_000);
    /// Whether indexes are built in parallel.
    parallel_indexing_enabled: Bool("cairo.parallel.indexing.enabled", true);
    /// Page size of join metadata.
    sql_join_metadata_page_size: Size("cairo.sql.join.metadata.page.size", 16384);

    // --- line.udp ---------------------------------------------------------
    /// Address and port the line protocol receiver binds to.
    line_udp_bind: Bind("line.udp.bind.to", "0.0.0.0:9009");
    /// Multicast group joined by the receiver.
    line_udp_group_ipv4_address: Ipv4("line.udp.join", "232.1.2.3");
    /// Messages received between commits.
    line_udp_commit_rate: Int("line.udp.commit.rate", 10_000);
    /// Message buffer.
    line_udp_msg_buffer_size: Size("line.udp.msg.buffer.size", 1024 * 1024);
    /// Messages read per batch.
    line_udp_msg_count: Int("line.udp.msg.count", 10_000);
    /// Socket receive buffer.
    line_udp_receive_buffer_size: Size("line.udp.receive.buffer.size", 2048);
}

// =============================================================================
// Resolution
// =============================================================================

impl ResolvedSettings {
    /// Resolve every recognized setting from `source`
    ///
    /// `root` is the storage root directory; it is stored as given and not
    /// checked for existence.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] in key declaration order.
    pub fn resolve<S: PropertySource + ?Sized>(
        source: &S,
        root: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let root = root.into();
        let (settings, overridden) = Self::resolve_table(source, root).inspect_err(|e| {
            log::error!("Configuration rejected: {e}");
        })?;

        log::info!(
            "Resolved {} settings ({} overridden, {} defaulted)",
            KEYS.len(),
            overridden,
            KEYS.len() - overridden
        );

        Ok(settings)
    }

    /// Storage root directory
    pub fn root(&self) -> &str {
        &self.root
    }
}

/// Keys in `source` under a recognized namespace that no setting reads
///
/// These are ignored by resolution; the list exists for diagnostics
/// (typically a misspelled key).
pub fn unknown_keys<S: PropertySource + ?Sized>(source: &S) -> Vec<String> {
    source
        .keys()
        .into_iter()
        .filter(|k| namespace_of(k).is_some() && !KEYS.contains(&k.as_str()))
        .collect()
}

/// Metadata for a single recognized key
#[must_use]
pub fn lookup(key: &str) -> Option<SettingMetadata> {
    catalog().into_iter().find(|m| m.key == key)
}

// =============================================================================
// Tests
// =============================================================================

//! Capability View Integration Tests
//!
//! Tests for the per-subsystem views:
//! - Views built from one resolution agree forever
//! - Concurrent reads from worker threads
//! - Collaborators injected through the builder
//! - MIME table loading through the files facade

mod common;

use common::{ConfDir, MemoryFiles, ManualClock, build, facades_with_clock, init_logging, props};
use propconf::views::{
    CairoConfiguration, HttpServerConfiguration, IoDispatcherConfiguration, IoOperation,
    LineUdpReceiverConfiguration, StaticContentProcessorConfiguration, TextConfiguration,
    TextImportProcessorConfiguration,
};
use propconf::{Error, ServerConfiguration};
use std::path::Path;
use std::sync::Arc;
use std::thread;

// =============================================================================
// Shared Record
// =============================================================================

#[test]
fn test_views_share_one_record() {
    let config = build(&[("http.worker.count", "6")]);

    let http = config.http_server().clone();
    let cairo = config.cairo().clone();

    // One record, referenced by the configuration and every view it handed out
    assert!(Arc::strong_count(config.settings()) >= 4);
    assert_eq!(http.worker_count(), 6);
    drop(config);

    assert_eq!(http.worker_count(), 6);
    assert_eq!(cairo.index_value_block_size(), 256);
}

#[test]
fn test_repeated_reads_are_stable() {
    let config = build(&[("http.net.rcv.buf.size", "64k"), ("line.udp.commit.rate", "7")]);

    let first = config.http_server().dispatcher_configuration().rcv_buf_size();
    let copy = config.clone();
    for _ in 0..100 {
        assert_eq!(copy.http_server().dispatcher_configuration().rcv_buf_size(), first);
        assert_eq!(config.line_udp_receiver().commit_rate(), 7);
    }
    assert_eq!(first, 65_536);
}

#[test]
fn test_views_are_readable_from_many_threads() {
    init_logging();
    let config = build(&[("http.worker.count", "12"), ("cairo.cache.rows", "64")]);

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let http = config.http_server().clone();
            let cairo = config.cairo().clone();
            let udp = config.line_udp_receiver().clone();
            thread::spawn(move || {
                for _ in 0..1000 {
                    assert_eq!(http.worker_count(), 12);
                    assert_eq!(cairo.sql_cache_rows(), 64);
                    assert_eq!(udp.port(), 9009);
                }
                i
            })
        })
        .collect();

    let mut finished: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    finished.sort_unstable();
    assert_eq!(finished, (0..8).collect::<Vec<_>>());
}

#[test]
fn test_views_usable_as_trait_objects() {
    let config = build(&[]);

    let subsystems: Vec<Box<dyn HttpServerConfiguration>> =
        vec![Box::new(config.http_server().clone())];
    let storage: Arc<dyn CairoConfiguration> = Arc::new(config.cairo().clone());

    assert_eq!(subsystems[0].worker_count(), 2);
    assert_eq!(storage.root(), "/var/lib/db");
}

// =============================================================================
// Nested HTTP Views
// =============================================================================

#[test]
fn test_http_nested_views() {
    let config = build(&[
        ("http.net.listen.backlog", "64"),
        ("http.static.index.file.name", "home.html"),
        ("http.static.pubic.directory", "/srv/www"),
        ("http.text.abort.broken.uploads", "false"),
        ("http.text.analysis.max.lines", "50"),
        ("http.text.roll.buffer.limit", "8k"),
    ]);
    let http = config.http_server();

    let dispatcher = http.dispatcher_configuration();
    assert_eq!(dispatcher.listen_backlog(), 64);
    assert_eq!(dispatcher.initial_bias(), IoOperation::Read);

    let static_content = http.static_content_processor_configuration();
    assert_eq!(static_content.index_file_name(), "home.html");
    assert_eq!(static_content.public_directory(), "/srv/www");
    assert_eq!(
        static_content.mime_types_cache().for_path(Path::new("home.html")),
        Some("text/html")
    );

    let import = http.text_import_processor_configuration();
    assert!(!import.abort_broken_uploads());
    assert_eq!(import.text_configuration().text_analysis_max_lines(), 50);
    assert_eq!(import.text_configuration().roll_buffer_limit(), 8192);
}

// =============================================================================
// Collaborators
// =============================================================================

#[test]
fn test_clock_is_shared_by_every_view() {
    let clock = ManualClock::at(1_000);
    let config = ServerConfiguration::builder("/db")
        .with_facades(facades_with_clock(Arc::clone(&clock)))
        .build(&props(&[]))
        .unwrap();

    assert_eq!(config.http_server().clock().ticks(), 1_000);
    assert_eq!(
        config.http_server().dispatcher_configuration().clock().ticks(),
        1_000
    );

    clock.advance(5);
    assert_eq!(config.cairo().millisecond_clock().ticks(), 1_005);
    assert_eq!(config.cairo().microsecond_clock().ticks(), 1_005_000);
}

#[test]
fn test_mime_table_read_through_files_facade() {
    let files = Arc::new(
        MemoryFiles::default().with_file("/conf/mime.types", "application/x-custom cst\n"),
    );
    let config = ServerConfiguration::builder("/db")
        .with_files_facade(files.clone())
        .mime_types_file("/conf/mime.types")
        .build(&props(&[]))
        .unwrap();

    assert_eq!(files.reads(), 1);
    let static_content = config.http_server().static_content_processor_configuration();
    assert_eq!(static_content.mime_types_cache().get("CST"), Some("application/x-custom"));
    // every view shares the same facade
    let shared = Path::new("/conf/mime.types");
    assert!(static_content.files_facade().read_to_string(shared).is_ok());
    assert!(config.cairo().files_facade().read_to_string(shared).is_ok());
    assert_eq!(files.reads(), 3);
}

#[test]
fn test_mime_table_not_read_when_settings_fail() {
    let files = Arc::new(MemoryFiles::default().with_file("/conf/mime.types", "text/plain txt\n"));
    let err = ServerConfiguration::builder("/db")
        .with_files_facade(files.clone())
        .mime_types_file("/conf/mime.types")
        .build(&props(&[("cairo.cache.blocks", "many")]))
        .unwrap_err();

    assert!(matches!(err, Error::Config(_)));
    assert_eq!(files.reads(), 0);
}

#[test]
fn test_malformed_mime_table_fails_build() {
    let dir = ConfDir::with_server_conf("");
    let mime = dir.write("mime.types", "text/plain txt\nnot-a-type foo\n");

    let err = ServerConfiguration::builder("/db")
        .mime_types_file(&mime)
        .build(&props(&[]))
        .unwrap_err();

    assert!(err.as_config_error().is_none());
    match err {
        Error::MimeTypes { path, line, .. } => {
            assert_eq!(path, mime);
            assert_eq!(line, 2);
        }
        other => panic!("expected MIME error, got {other:?}"),
    }
}

#[test]
fn test_udp_view() {
    let config = build(&[
        ("line.udp.join", "239.0.0.1"),
        ("line.udp.msg.buffer.size", "2m"),
        ("line.udp.msg.count", "128"),
    ]);
    let udp = config.line_udp_receiver();

    assert_eq!(udp.group_ipv4_address().to_string(), "239.0.0.1");
    assert!(udp.group_ipv4_address().is_multicast());
    assert_eq!(udp.msg_buffer_size(), 2 * 1024 * 1024);
    assert_eq!(udp.msg_count(), 128);
}

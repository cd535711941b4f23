//! Capability views
//!
//! Each subsystem sees its settings through one narrow trait instead of the
//! whole [`ResolvedSettings`](crate::ResolvedSettings) record:
//!
//! | Subsystem | Trait |
//! |---|---|
//! | HTTP server | [`HttpServerConfiguration`] |
//! | Connection dispatcher | [`IoDispatcherConfiguration`] |
//! | Static content | [`StaticContentProcessorConfiguration`] |
//! | Text import | [`TextImportProcessorConfiguration`], [`TextConfiguration`] |
//! | Storage engine | [`CairoConfiguration`] |
//! | UDP line receiver | [`LineUdpReceiverConfiguration`] |
//!
//! The `Prop*` adapters implement these traits over a shared
//! `Arc<ResolvedSettings>`. They hold no state of their own, never re-parse,
//! and are `Clone + Send + Sync`, so they can be handed to any number of
//! worker threads.

mod cairo;
mod dispatcher;
mod http;
mod line_udp;
mod static_content;
mod text;

pub use cairo::{CairoConfiguration, PropCairoConfiguration};
pub use dispatcher::{IoDispatcherConfiguration, IoOperation, PropIoDispatcherConfiguration};
pub use http::{HttpServerConfiguration, PropHttpServerConfiguration};
pub use line_udp::{LineUdpReceiverConfiguration, PropLineUdpReceiverConfiguration};
pub use static_content::{PropStaticContentProcessorConfiguration, StaticContentProcessorConfiguration};
pub use text::{
    PropTextConfiguration, PropTextImportProcessorConfiguration, TextConfiguration,
    TextImportProcessorConfiguration,
};

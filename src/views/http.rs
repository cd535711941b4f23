//! HTTP server view

use crate::config::ResolvedSettings;
use crate::facade::{Facades, MillisecondClock};
use crate::mime::MimeTypesCache;
use crate::views::dispatcher::{IoDispatcherConfiguration, PropIoDispatcherConfiguration};
use crate::views::static_content::{
    PropStaticContentProcessorConfiguration, StaticContentProcessorConfiguration,
};
use crate::views::text::{PropTextImportProcessorConfiguration, TextImportProcessorConfiguration};
use std::sync::Arc;

/// Settings for the HTTP server and the processors it hosts
///
/// Buffer sizes are in bytes.
pub trait HttpServerConfiguration: Send + Sync {
    fn connection_pool_initial_capacity(&self) -> i32;

    fn connection_string_pool_capacity(&self) -> i32;

    fn multipart_header_buffer_size(&self) -> usize;

    /// Spins before a multipart upload yields while waiting for data
    fn multipart_idle_spin_count(&self) -> i64;

    fn recv_buffer_size(&self) -> usize;

    fn request_header_buffer_size(&self) -> usize;

    fn response_header_buffer_size(&self) -> usize;

    fn clock(&self) -> &dyn MillisecondClock;

    fn dispatcher_configuration(&self) -> &dyn IoDispatcherConfiguration;

    fn static_content_processor_configuration(&self) -> &dyn StaticContentProcessorConfiguration;

    fn text_import_processor_configuration(&self) -> &dyn TextImportProcessorConfiguration;

    /// Number of worker threads
    fn worker_count(&self) -> i32;

    fn send_buffer_size(&self) -> usize;
}

/// [`HttpServerConfiguration`] over resolved settings
#[derive(Debug, Clone)]
pub struct PropHttpServerConfiguration {
    settings: Arc<ResolvedSettings>,
    facades: Facades,
    dispatcher: PropIoDispatcherConfiguration,
    static_content: PropStaticContentProcessorConfiguration,
    text_import: PropTextImportProcessorConfiguration,
}

impl PropHttpServerConfiguration {
    pub(crate) fn new(
        settings: Arc<ResolvedSettings>,
        mime_types: Arc<MimeTypesCache>,
        facades: Facades,
    ) -> Self {
        Self {
            dispatcher: PropIoDispatcherConfiguration::new(Arc::clone(&settings), facades.clone()),
            static_content: PropStaticContentProcessorConfiguration::new(
                Arc::clone(&settings),
                mime_types,
                facades.clone(),
            ),
            text_import: PropTextImportProcessorConfiguration::new(Arc::clone(&settings)),
            settings,
            facades,
        }
    }
}

impl HttpServerConfiguration for PropHttpServerConfiguration {
    fn connection_pool_initial_capacity(&self) -> i32 {
        self.settings.connection_pool_initial_capacity
    }

    fn connection_string_pool_capacity(&self) -> i32 {
        self.settings.connection_string_pool_capacity
    }

    fn multipart_header_buffer_size(&self) -> usize {
        self.settings.multipart_header_buffer_size
    }

    fn multipart_idle_spin_count(&self) -> i64 {
        self.settings.multipart_idle_spin_count
    }

    fn recv_buffer_size(&self) -> usize {
        self.settings.recv_buffer_size
    }

    fn request_header_buffer_size(&self) -> usize {
        self.settings.request_header_buffer_size
    }

    fn response_header_buffer_size(&self) -> usize {
        self.settings.response_header_buffer_size
    }

    fn clock(&self) -> &dyn MillisecondClock {
        self.facades.millisecond_clock.as_ref()
    }

    fn dispatcher_configuration(&self) -> &dyn IoDispatcherConfiguration {
        &self.dispatcher
    }

    fn static_content_processor_configuration(&self) -> &dyn StaticContentProcessorConfiguration {
        &self.static_content
    }

    fn text_import_processor_configuration(&self) -> &dyn TextImportProcessorConfiguration {
        &self.text_import
    }

    fn worker_count(&self) -> i32 {
        self.settings.worker_count
    }

    fn send_buffer_size(&self) -> usize {
        self.settings.send_buffer_size
    }
}

//! Text import views (`http.text.*`)

use crate::config::ResolvedSettings;
use std::sync::Arc;

/// Settings for the delimited-text parser
pub trait TextConfiguration: Send + Sync {
    /// Resource describing the column type adapters
    fn adapter_set_configuration_file_name(&self) -> &str;

    fn date_adapter_pool_capacity(&self) -> i32;

    fn json_cache_limit(&self) -> usize;

    fn json_cache_size(&self) -> usize;

    /// Largest delimiter standard deviation accepted when detecting the format
    fn max_required_delimiter_std_dev(&self) -> f64;

    fn metadata_string_pool_capacity(&self) -> i32;

    fn roll_buffer_limit(&self) -> usize;

    fn roll_buffer_size(&self) -> usize;

    /// Lines sampled before the format is decided
    fn text_analysis_max_lines(&self) -> i32;

    fn text_lexer_string_pool_capacity(&self) -> i32;

    fn timestamp_adapter_pool_capacity(&self) -> i32;

    fn utf8_sink_size(&self) -> usize;
}

/// Settings for the HTTP text import endpoint
pub trait TextImportProcessorConfiguration: Send + Sync {
    /// Whether a malformed upload aborts instead of skipping bad rows
    fn abort_broken_uploads(&self) -> bool;

    fn text_configuration(&self) -> &dyn TextConfiguration;
}

/// [`TextConfiguration`] over resolved settings
#[derive(Debug, Clone)]
pub struct PropTextConfiguration {
    settings: Arc<ResolvedSettings>,
}

impl PropTextConfiguration {
    pub(crate) fn new(settings: Arc<ResolvedSettings>) -> Self {
        Self { settings }
    }
}

impl TextConfiguration for PropTextConfiguration {
    fn adapter_set_configuration_file_name(&self) -> &str {
        &self.settings.adapter_set_configuration_file_name
    }

    fn date_adapter_pool_capacity(&self) -> i32 {
        self.settings.date_adapter_pool_capacity
    }

    fn json_cache_limit(&self) -> usize {
        self.settings.json_cache_limit
    }

    fn json_cache_size(&self) -> usize {
        self.settings.json_cache_size
    }

    fn max_required_delimiter_std_dev(&self) -> f64 {
        self.settings.max_required_delimiter_std_dev
    }

    fn metadata_string_pool_capacity(&self) -> i32 {
        self.settings.metadata_string_pool_capacity
    }

    fn roll_buffer_limit(&self) -> usize {
        self.settings.roll_buffer_limit
    }

    fn roll_buffer_size(&self) -> usize {
        self.settings.roll_buffer_size
    }

    fn text_analysis_max_lines(&self) -> i32 {
        self.settings.text_analysis_max_lines
    }

    fn text_lexer_string_pool_capacity(&self) -> i32 {
        self.settings.text_lexer_string_pool_capacity
    }

    fn timestamp_adapter_pool_capacity(&self) -> i32 {
        self.settings.timestamp_adapter_pool_capacity
    }

    fn utf8_sink_size(&self) -> usize {
        self.settings.utf8_sink_size
    }
}

/// [`TextImportProcessorConfiguration`] over resolved settings
#[derive(Debug, Clone)]
pub struct PropTextImportProcessorConfiguration {
    settings: Arc<ResolvedSettings>,
    text: PropTextConfiguration,
}

impl PropTextImportProcessorConfiguration {
    pub(crate) fn new(settings: Arc<ResolvedSettings>) -> Self {
        let text = PropTextConfiguration::new(Arc::clone(&settings));
        Self { settings, text }
    }
}

impl TextImportProcessorConfiguration for PropTextImportProcessorConfiguration {
    fn abort_broken_uploads(&self) -> bool {
        self.settings.abort_broken_uploads
    }

    fn text_configuration(&self) -> &dyn TextConfiguration {
        &self.text
    }
}

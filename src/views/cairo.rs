//! Storage engine view (`cairo.*`)

use crate::config::ResolvedSettings;
use crate::facade::{Facades, FilesFacade, MicrosecondClock, MillisecondClock};
use std::sync::Arc;

/// Settings for the storage engine
pub trait CairoConfiguration: Send + Sync {
    fn create_as_select_retry_count(&self) -> i32;

    fn default_map_type(&self) -> &str;

    fn default_symbol_cache_flag(&self) -> bool;

    fn default_symbol_capacity(&self) -> i32;

    fn file_operation_retry_count(&self) -> i32;

    fn files_facade(&self) -> &dyn FilesFacade;

    fn idle_check_interval(&self) -> i64;

    fn inactive_reader_ttl(&self) -> i64;

    fn inactive_writer_ttl(&self) -> i64;

    /// Always a power of two
    fn index_value_block_size(&self) -> usize;

    fn max_swap_file_count(&self) -> i32;

    fn microsecond_clock(&self) -> &dyn MicrosecondClock;

    fn millisecond_clock(&self) -> &dyn MillisecondClock;

    fn mkdir_mode(&self) -> i32;

    fn parallel_index_threshold(&self) -> i32;

    fn reader_pool_max_segments(&self) -> i32;

    /// Database root directory, as supplied at startup
    fn root(&self) -> &str;

    fn spin_lock_timeout_us(&self) -> i64;

    fn sql_cache_blocks(&self) -> usize;

    fn sql_cache_rows(&self) -> i32;

    fn sql_character_store_capacity(&self) -> i32;

    fn sql_character_store_sequence_pool_capacity(&self) -> i32;

    fn sql_column_pool_capacity(&self) -> i32;

    fn sql_compact_map_load_factor(&self) -> f64;

    fn sql_expression_pool_capacity(&self) -> i32;

    fn sql_fast_map_load_factor(&self) -> f64;

    fn sql_join_context_pool_capacity(&self) -> i32;

    fn sql_lexer_pool_capacity(&self) -> i32;

    fn sql_map_key_capacity(&self) -> i32;

    fn sql_map_page_size(&self) -> usize;

    fn sql_model_pool_capacity(&self) -> i32;

    fn sql_sort_key_page_size(&self) -> usize;

    fn sql_sort_light_value_page_size(&self) -> usize;

    fn sql_hash_join_value_page_size(&self) -> usize;

    fn sql_tree_page_size(&self) -> usize;

    fn sql_hash_join_light_value_page_size(&self) -> usize;

    fn sql_sort_value_page_size(&self) -> usize;

    fn work_steal_timeout_nanos(&self) -> i64;

    fn is_parallel_indexing_enabled(&self) -> bool;

    fn sql_join_metadata_page_size(&self) -> usize;
}

/// [`CairoConfiguration`] over resolved settings
#[derive(Debug, Clone)]
pub struct PropCairoConfiguration {
    settings: Arc<ResolvedSettings>,
    facades: Facades,
}

impl PropCairoConfiguration {
    pub(crate) fn new(settings: Arc<ResolvedSettings>, facades: Facades) -> Self {
        Self { settings, facades }
    }
}

impl CairoConfiguration for PropCairoConfiguration {
    fn create_as_select_retry_count(&self) -> i32 {
        self.settings.create_as_select_retry_count
    }

    fn default_map_type(&self) -> &str {
        &self.settings.default_map_type
    }

    fn default_symbol_cache_flag(&self) -> bool {
        self.settings.default_symbol_cache_flag
    }

    fn default_symbol_capacity(&self) -> i32 {
        self.settings.default_symbol_capacity
    }

    fn file_operation_retry_count(&self) -> i32 {
        self.settings.file_operation_retry_count
    }

    fn files_facade(&self) -> &dyn FilesFacade {
        self.facades.files.as_ref()
    }

    fn idle_check_interval(&self) -> i64 {
        self.settings.idle_check_interval
    }

    fn inactive_reader_ttl(&self) -> i64 {
        self.settings.inactive_reader_ttl
    }

    fn inactive_writer_ttl(&self) -> i64 {
        self.settings.inactive_writer_ttl
    }

    fn index_value_block_size(&self) -> usize {
        self.settings.index_value_block_size
    }

    fn max_swap_file_count(&self) -> i32 {
        self.settings.max_swap_file_count
    }

    fn microsecond_clock(&self) -> &dyn MicrosecondClock {
        self.facades.microsecond_clock.as_ref()
    }

    fn millisecond_clock(&self) -> &dyn MillisecondClock {
        self.facades.millisecond_clock.as_ref()
    }

    fn mkdir_mode(&self) -> i32 {
        self.settings.mkdir_mode
    }

    fn parallel_index_threshold(&self) -> i32 {
        self.settings.parallel_index_threshold
    }

    fn reader_pool_max_segments(&self) -> i32 {
        self.settings.reader_pool_max_segments
    }

    fn root(&self) -> &str {
        self.settings.root()
    }

    fn spin_lock_timeout_us(&self) -> i64 {
        self.settings.spin_lock_timeout_us
    }

    fn sql_cache_blocks(&self) -> usize {
        self.settings.sql_cache_blocks
    }

    fn sql_cache_rows(&self) -> i32 {
        self.settings.sql_cache_rows
    }

    fn sql_character_store_capacity(&self) -> i32 {
        self.settings.sql_character_store_capacity
    }

    fn sql_character_store_sequence_pool_capacity(&self) -> i32 {
        self.settings.sql_character_store_sequence_pool_capacity
    }

    fn sql_column_pool_capacity(&self) -> i32 {
        self.settings.sql_column_pool_capacity
    }

    fn sql_compact_map_load_factor(&self) -> f64 {
        self.settings.sql_compact_map_load_factor
    }

    fn sql_expression_pool_capacity(&self) -> i32 {
        self.settings.sql_expression_pool_capacity
    }

    fn sql_fast_map_load_factor(&self) -> f64 {
        self.settings.sql_fast_map_load_factor
    }

    fn sql_join_context_pool_capacity(&self) -> i32 {
        self.settings.sql_join_context_pool_capacity
    }

    fn sql_lexer_pool_capacity(&self) -> i32 {
        self.settings.sql_lexer_pool_capacity
    }

    fn sql_map_key_capacity(&self) -> i32 {
        self.settings.sql_map_key_capacity
    }

    fn sql_map_page_size(&self) -> usize {
        self.settings.sql_map_page_size
    }

    fn sql_model_pool_capacity(&self) -> i32 {
        self.settings.sql_model_pool_capacity
    }

    fn sql_sort_key_page_size(&self) -> usize {
        self.settings.sql_sort_key_page_size
    }

    fn sql_sort_light_value_page_size(&self) -> usize {
        self.settings.sql_sort_light_value_page_size
    }

    fn sql_hash_join_value_page_size(&self) -> usize {
        self.settings.sql_hash_join_value_page_size
    }

    fn sql_tree_page_size(&self) -> usize {
        self.settings.sql_tree_page_size
    }

    fn sql_hash_join_light_value_page_size(&self) -> usize {
        self.settings.sql_hash_join_light_value_page_size
    }

    fn sql_sort_value_page_size(&self) -> usize {
        self.settings.sql_sort_value_page_size
    }

    fn work_steal_timeout_nanos(&self) -> i64 {
        self.settings.work_steal_timeout_nanos
    }

    fn is_parallel_indexing_enabled(&self) -> bool {
        self.settings.parallel_indexing_enabled
    }

    fn sql_join_metadata_page_size(&self) -> usize {
        self.settings.sql_join_metadata_page_size
    }
}

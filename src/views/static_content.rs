//! Static content processor view

use crate::config::ResolvedSettings;
use crate::facade::{Facades, FilesFacade};
use crate::mime::MimeTypesCache;
use std::sync::Arc;

/// Settings and collaborators for serving files from the public directory
pub trait StaticContentProcessorConfiguration: Send + Sync {
    fn files_facade(&self) -> &dyn FilesFacade;

    /// File served when a directory is requested
    fn index_file_name(&self) -> &str;

    fn mime_types_cache(&self) -> &MimeTypesCache;

    /// Directory files are served from
    fn public_directory(&self) -> &str;
}

/// [`StaticContentProcessorConfiguration`] over resolved settings
#[derive(Debug, Clone)]
pub struct PropStaticContentProcessorConfiguration {
    settings: Arc<ResolvedSettings>,
    mime_types: Arc<MimeTypesCache>,
    facades: Facades,
}

impl PropStaticContentProcessorConfiguration {
    pub(crate) fn new(
        settings: Arc<ResolvedSettings>,
        mime_types: Arc<MimeTypesCache>,
        facades: Facades,
    ) -> Self {
        Self {
            settings,
            mime_types,
            facades,
        }
    }
}

impl StaticContentProcessorConfiguration for PropStaticContentProcessorConfiguration {
    fn files_facade(&self) -> &dyn FilesFacade {
        self.facades.files.as_ref()
    }

    fn index_file_name(&self) -> &str {
        &self.settings.index_file_name
    }

    fn mime_types_cache(&self) -> &MimeTypesCache {
        &self.mime_types
    }

    fn public_directory(&self) -> &str {
        &self.settings.public_directory
    }
}

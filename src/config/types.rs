//! Server configuration assembly

use std::path::PathBuf;
use std::sync::Arc;

use crate::config::schema::{ResolvedSettings, unknown_keys};
use crate::error::Result;
use crate::facade::{Facades, FilesFacade, MicrosecondClock, MillisecondClock, NetworkFacade};
use crate::mime::MimeSource;
use crate::source::PropertySource;
use crate::views::{
    PropCairoConfiguration, PropHttpServerConfiguration, PropLineUdpReceiverConfiguration,
};

/// Resolved configuration for the whole server
///
/// Built once at startup. Hands each subsystem its capability view; the
/// views share one immutable [`ResolvedSettings`].
///
/// # Example
///
/// ```rust
/// use propconf::{Properties, ServerConfiguration};
/// use propconf::views::{HttpServerConfiguration, IoDispatcherConfiguration};
///
/// let props = Properties::parse("http.worker.count=4\nhttp.bind.to=127.0.0.1:8080");
/// let config = ServerConfiguration::builder("/var/lib/db").build(&props)?;
///
/// let http = config.http_server();
/// assert_eq!(http.worker_count(), 4);
/// assert_eq!(http.dispatcher_configuration().bind_port(), 8080);
/// # Ok::<(), propconf::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct ServerConfiguration {
    settings: Arc<ResolvedSettings>,
    http_server: PropHttpServerConfiguration,
    cairo: PropCairoConfiguration,
    line_udp_receiver: PropLineUdpReceiverConfiguration,
}

impl ServerConfiguration {
    /// Create a new builder for a server rooted at `root`
    pub fn builder(root: impl Into<String>) -> ServerConfigurationBuilder {
        ServerConfigurationBuilder::new(root)
    }

    /// Resolve `source` with the default collaborators and the bundled MIME table
    ///
    /// # Errors
    ///
    /// Returns the first setting that fails to resolve.
    pub fn from_properties<S: PropertySource + ?Sized>(
        root: impl Into<String>,
        source: &S,
    ) -> Result<Self> {
        Self::builder(root).build(source)
    }

    /// The shared resolved record
    pub fn settings(&self) -> &Arc<ResolvedSettings> {
        &self.settings
    }

    pub fn http_server(&self) -> &PropHttpServerConfiguration {
        &self.http_server
    }

    pub fn cairo(&self) -> &PropCairoConfiguration {
        &self.cairo
    }

    pub fn line_udp_receiver(&self) -> &PropLineUdpReceiverConfiguration {
        &self.line_udp_receiver
    }
}

/// Builder for [`ServerConfiguration`] with a fluent API
#[derive(Debug, Clone)]
pub struct ServerConfigurationBuilder {
    root: String,
    facades: Facades,
    mime_source: MimeSource,
}

impl ServerConfigurationBuilder {
    /// Create a new builder with the storage root
    pub fn new(root: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            facades: Facades::default(),
            mime_source: MimeSource::default(),
        }
    }

    /// Replace all collaborators at once
    #[must_use]
    pub fn with_facades(mut self, facades: Facades) -> Self {
        self.facades = facades;
        self
    }

    #[must_use]
    pub fn with_files_facade(mut self, files: Arc<dyn FilesFacade>) -> Self {
        self.facades.files = files;
        self
    }

    #[must_use]
    pub fn with_network_facade(mut self, network: Arc<dyn NetworkFacade>) -> Self {
        self.facades.network = network;
        self
    }

    #[must_use]
    pub fn with_millisecond_clock(mut self, clock: Arc<dyn MillisecondClock>) -> Self {
        self.facades.millisecond_clock = clock;
        self
    }

    #[must_use]
    pub fn with_microsecond_clock(mut self, clock: Arc<dyn MicrosecondClock>) -> Self {
        self.facades.microsecond_clock = clock;
        self
    }

    /// Read the MIME table from a file instead of the bundled one
    #[must_use]
    pub fn mime_types_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.mime_source = MimeSource::File(path.into());
        self
    }

    /// Read the MIME table from a resource locator path
    ///
    /// The path is normalized for the current OS before it is opened
    /// (see [`normalize_resource_path`](crate::mime::normalize_resource_path)).
    #[must_use]
    pub fn mime_types_resource(mut self, locator: impl Into<String>) -> Self {
        self.mime_source = MimeSource::Resource(locator.into());
        self
    }

    /// Resolve `source` and construct every view
    ///
    /// Settings are resolved first; the MIME table is only read once every
    /// setting has parsed. Nothing is constructed if either step fails.
    ///
    /// # Errors
    ///
    /// - [`Error::Config`](crate::Error::Config) for the first setting that fails to parse
    /// - [`Error::ResourceRead`](crate::Error::ResourceRead) or
    ///   [`Error::MimeTypes`](crate::Error::MimeTypes) if the MIME table cannot be loaded
    pub fn build<S: PropertySource + ?Sized>(self, source: &S) -> Result<ServerConfiguration> {
        for key in unknown_keys(source) {
            log::warn!("Ignoring unrecognized setting '{key}'");
        }

        let settings = Arc::new(ResolvedSettings::resolve(source, self.root)?);
        let mime_types = Arc::new(self.mime_source.load(self.facades.files.as_ref())?);

        Ok(ServerConfiguration {
            http_server: PropHttpServerConfiguration::new(
                Arc::clone(&settings),
                mime_types,
                self.facades.clone(),
            ),
            cairo: PropCairoConfiguration::new(Arc::clone(&settings), self.facades.clone()),
            line_udp_receiver: PropLineUdpReceiverConfiguration::new(
                Arc::clone(&settings),
                self.facades,
            ),
            settings,
        })
    }
}

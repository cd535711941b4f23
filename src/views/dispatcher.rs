//! Network connection dispatcher view

use crate::config::ResolvedSettings;
use crate::facade::{Facades, MillisecondClock, NetworkFacade};
use std::net::{Ipv4Addr, SocketAddrV4};
use std::sync::Arc;

/// Operation a newly accepted connection is first registered for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IoOperation {
    Read,
}

/// Settings for the connection dispatcher (`http.net.*` and `http.bind.to`)
pub trait IoDispatcherConfiguration: Send + Sync {
    /// Maximum concurrently open connections
    fn active_connection_limit(&self) -> i32;

    /// Address the listener binds to
    fn bind_ipv4_address(&self) -> Ipv4Addr;

    /// Port the listener binds to
    fn bind_port(&self) -> u16;

    /// Address and port together
    fn bind_address(&self) -> SocketAddrV4 {
        SocketAddrV4::new(self.bind_ipv4_address(), self.bind_port())
    }

    fn clock(&self) -> &dyn MillisecondClock;

    fn event_capacity(&self) -> i32;

    fn io_queue_capacity(&self) -> i32;

    /// Milliseconds before an idle connection is closed
    fn idle_connection_timeout(&self) -> i64;

    fn interest_queue_capacity(&self) -> i32;

    fn listen_backlog(&self) -> i32;

    fn network_facade(&self) -> &dyn NetworkFacade;

    /// Operation new connections are registered for
    fn initial_bias(&self) -> IoOperation;

    /// Socket send buffer in bytes
    fn snd_buf_size(&self) -> usize;

    /// Socket receive buffer in bytes
    fn rcv_buf_size(&self) -> usize;
}

/// [`IoDispatcherConfiguration`] over resolved settings
#[derive(Debug, Clone)]
pub struct PropIoDispatcherConfiguration {
    settings: Arc<ResolvedSettings>,
    facades: Facades,
}

impl PropIoDispatcherConfiguration {
    pub(crate) fn new(settings: Arc<ResolvedSettings>, facades: Facades) -> Self {
        Self { settings, facades }
    }
}

impl IoDispatcherConfiguration for PropIoDispatcherConfiguration {
    fn active_connection_limit(&self) -> i32 {
        self.settings.active_connection_limit
    }

    fn bind_ipv4_address(&self) -> Ipv4Addr {
        *self.settings.http_bind.ip()
    }

    fn bind_port(&self) -> u16 {
        self.settings.http_bind.port()
    }

    fn clock(&self) -> &dyn MillisecondClock {
        self.facades.millisecond_clock.as_ref()
    }

    fn event_capacity(&self) -> i32 {
        self.settings.event_capacity
    }

    fn io_queue_capacity(&self) -> i32 {
        self.settings.io_queue_capacity
    }

    fn idle_connection_timeout(&self) -> i64 {
        self.settings.idle_connection_timeout
    }

    fn interest_queue_capacity(&self) -> i32 {
        self.settings.interest_queue_capacity
    }

    fn listen_backlog(&self) -> i32 {
        self.settings.listen_backlog
    }

    fn network_facade(&self) -> &dyn NetworkFacade {
        self.facades.network.as_ref()
    }

    fn initial_bias(&self) -> IoOperation {
        IoOperation::Read
    }

    fn snd_buf_size(&self) -> usize {
        self.settings.snd_buf_size
    }

    fn rcv_buf_size(&self) -> usize {
        self.settings.rcv_buf_size
    }
}

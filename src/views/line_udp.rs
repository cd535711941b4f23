//! UDP line protocol receiver view

use crate::config::ResolvedSettings;
use crate::facade::{Facades, NetworkFacade};
use std::net::{Ipv4Addr, SocketAddrV4};
use std::sync::Arc;

/// Settings for the UDP line protocol receiver (`line.udp.*`)
pub trait LineUdpReceiverConfiguration: Send + Sync {
    fn bind_ipv4_address(&self) -> Ipv4Addr;

    fn port(&self) -> u16;

    fn bind_address(&self) -> SocketAddrV4 {
        SocketAddrV4::new(self.bind_ipv4_address(), self.port())
    }

    /// Messages received between commits
    fn commit_rate(&self) -> i32;

    /// Multicast group to join
    fn group_ipv4_address(&self) -> Ipv4Addr;

    fn msg_buffer_size(&self) -> usize;

    fn msg_count(&self) -> i32;

    fn network_facade(&self) -> &dyn NetworkFacade;

    fn receive_buffer_size(&self) -> usize;
}

/// [`LineUdpReceiverConfiguration`] over resolved settings
#[derive(Debug, Clone)]
pub struct PropLineUdpReceiverConfiguration {
    settings: Arc<ResolvedSettings>,
    facades: Facades,
}

impl PropLineUdpReceiverConfiguration {
    pub(crate) fn new(settings: Arc<ResolvedSettings>, facades: Facades) -> Self {
        Self { settings, facades }
    }
}

impl LineUdpReceiverConfiguration for PropLineUdpReceiverConfiguration {
    fn bind_ipv4_address(&self) -> Ipv4Addr {
        *self.settings.line_udp_bind.ip()
    }

    fn port(&self) -> u16 {
        self.settings.line_udp_bind.port()
    }

    fn commit_rate(&self) -> i32 {
        self.settings.line_udp_commit_rate
    }

    fn group_ipv4_address(&self) -> Ipv4Addr {
        self.settings.line_udp_group_ipv4_address
    }

    fn msg_buffer_size(&self) -> usize {
        self.settings.line_udp_msg_buffer_size
    }

    fn msg_count(&self) -> i32 {
        self.settings.line_udp_msg_count
    }

    fn network_facade(&self) -> &dyn NetworkFacade {
        self.facades.network.as_ref()
    }

    fn receive_buffer_size(&self) -> usize {
        self.settings.line_udp_receive_buffer_size
    }
}

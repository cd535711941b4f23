//! Collaborator interfaces handed to subsystems alongside their settings
//!
//! These are owned by the process, not by the configuration. The views only
//! carry shared handles to them.

use std::fmt;
use std::io;
use std::net::{Ipv4Addr, SocketAddrV4, TcpListener, UdpSocket};
use std::path::Path;
use std::sync::Arc;
use time::OffsetDateTime;

/// Filesystem access used by the storage engine and static content processor
pub trait FilesFacade: Send + Sync {
    fn read_to_string(&self, path: &Path) -> io::Result<String>;
}

/// Socket access used by the connection dispatcher and UDP receiver
pub trait NetworkFacade: Send + Sync {
    fn bind_tcp(&self, addr: SocketAddrV4) -> io::Result<TcpListener>;

    fn bind_udp(&self, addr: SocketAddrV4) -> io::Result<UdpSocket>;

    fn join_multicast_v4(
        &self,
        socket: &UdpSocket,
        group: Ipv4Addr,
        interface: Ipv4Addr,
    ) -> io::Result<()>;
}

/// Wall clock with millisecond resolution
pub trait MillisecondClock: Send + Sync {
    fn ticks(&self) -> i64;
}

/// Wall clock with microsecond resolution
pub trait MicrosecondClock: Send + Sync {
    fn ticks(&self) -> i64;
}

/// Direct filesystem access
#[derive(Debug, Clone, Copy, Default)]
pub struct OsFilesFacade;

impl FilesFacade for OsFilesFacade {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }
}

/// Direct socket access
#[derive(Debug, Clone, Copy, Default)]
pub struct OsNetworkFacade;

impl NetworkFacade for OsNetworkFacade {
    fn bind_tcp(&self, addr: SocketAddrV4) -> io::Result<TcpListener> {
        TcpListener::bind(addr)
    }

    fn bind_udp(&self, addr: SocketAddrV4) -> io::Result<UdpSocket> {
        UdpSocket::bind(addr)
    }

    fn join_multicast_v4(
        &self,
        socket: &UdpSocket,
        group: Ipv4Addr,
        interface: Ipv4Addr,
    ) -> io::Result<()> {
        socket.join_multicast_v4(&group, &interface)
    }
}

/// UTC system clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl SystemClock {
    fn now_nanos() -> i128 {
        OffsetDateTime::now_utc().unix_timestamp_nanos()
    }
}

impl MillisecondClock for SystemClock {
    fn ticks(&self) -> i64 {
        i64::try_from(Self::now_nanos() / 1_000_000).unwrap_or(i64::MAX)
    }
}

impl MicrosecondClock for SystemClock {
    fn ticks(&self) -> i64 {
        i64::try_from(Self::now_nanos() / 1_000).unwrap_or(i64::MAX)
    }
}

/// Shared collaborator handles
///
/// Cloning is cheap; every view holds a clone.
#[derive(Clone)]
pub struct Facades {
    pub files: Arc<dyn FilesFacade>,
    pub network: Arc<dyn NetworkFacade>,
    pub millisecond_clock: Arc<dyn MillisecondClock>,
    pub microsecond_clock: Arc<dyn MicrosecondClock>,
}

impl Default for Facades {
    fn default() -> Self {
        Self {
            files: Arc::new(OsFilesFacade),
            network: Arc::new(OsNetworkFacade),
            millisecond_clock: Arc::new(SystemClock),
            microsecond_clock: Arc::new(SystemClock),
        }
    }
}

impl fmt::Debug for Facades {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Facades").finish_non_exhaustive()
    }
}

//! UDP transport carrying encapsulated tunnel traffic.

use crate::buf::PacketBuf;
use crate::device::Device;
use crate::error::{Error, Result};
use crate::raw;
use nix::sys::socket::{self, AddressFamily, SockFlag, SockProtocol, SockType, SockaddrIn};
use std::mem::ManuallyDrop;
use std::net::{Ipv4Addr, SocketAddrV4};
use std::os::fd::{AsFd, AsRawFd, BorrowedFd, OwnedFd, RawFd};
use tracing::debug;

/// A UDP socket bound to a local port, optionally connected to a
/// fixed remote peer. Owns its descriptor exclusively.
pub struct Udp {
    fd: ManuallyDrop<OwnedFd>,
    local_port: u16,
    peer: Option<SocketAddrV4>,
}

impl Udp {
    /// Open a UDP socket and bind it to `INADDR_ANY` on `port`.
    ///
    /// Port 0 asks the kernel for an ephemeral port; [`Udp::local_port`]
    /// reports whatever was actually assigned.
    pub fn bind(port: u16) -> Result<Self> {
        let fd = socket::socket(
            AddressFamily::Inet,
            SockType::Datagram,
            SockFlag::empty(),
            SockProtocol::Udp,
        )
        .map_err(|err| Error::ResourceUnavailable(err.into()))?;

        let any = SockaddrIn::new(0, 0, 0, 0, port);
        socket::bind(fd.as_raw_fd(), &any).map_err(|err| Error::BindFailed(err.into()))?;
        let bound: SockaddrIn =
            socket::getsockname(fd.as_raw_fd()).map_err(|err| Error::BindFailed(err.into()))?;

        debug!(port = bound.port(), "udp transport bound");
        Ok(Udp {
            fd: ManuallyDrop::new(fd),
            local_port: bound.port(),
            peer: None,
        })
    }

    /// Fix the remote peer for subsequent sends.
    ///
    /// The address text must be a dotted-quad IPv4 address; anything
    /// else fails with [`Error::InvalidAddress`] before the socket is
    /// touched. The peer can be set at most once per transport.
    pub fn connect(&mut self, addr: &str, port: u16) -> Result<()> {
        if self.peer.is_some() {
            return Err(Error::PeerAlreadySet);
        }
        let ip: Ipv4Addr = addr
            .parse()
            .map_err(|_| Error::InvalidAddress(addr.to_string()))?;
        let peer = SocketAddrV4::new(ip, port);
        socket::connect(self.fd.as_raw_fd(), &SockaddrIn::from(peer))
            .map_err(|err| Error::ConnectFailed(err.into()))?;
        self.peer = Some(peer);
        Ok(())
    }

    /// The port the socket is bound to.
    pub fn local_port(&self) -> u16 {
        self.local_port
    }

    /// The fixed remote peer, if `connect` has been called.
    pub fn peer(&self) -> Option<SocketAddrV4> {
        self.peer
    }
}

impl Device for Udp {
    /// Receive one datagram.
    ///
    /// Receives stay permissive: any sender reaching the bound port
    /// delivers data, connected or not. Callers wanting a
    /// single-source tunnel must filter above this layer.
    fn recv(&self, buf: &mut PacketBuf) -> Result<usize> {
        raw::read(self.fd.as_fd(), buf)
    }

    /// Send one datagram to the connected peer.
    fn send(&self, buf: &PacketBuf) -> Result<()> {
        raw::write_all(self.fd.as_fd(), buf)
    }
}

impl AsRawFd for Udp {
    fn as_raw_fd(&self) -> RawFd {
        self.fd.as_raw_fd()
    }
}

impl AsFd for Udp {
    fn as_fd(&self) -> BorrowedFd<'_> {
        self.fd.as_fd()
    }
}

impl Drop for Udp {
    fn drop(&mut self) {
        // SAFETY: fd is taken exactly once, here.
        let fd = unsafe { ManuallyDrop::take(&mut self.fd) };
        raw::close_reporting(fd, "udp socket");
    }
}

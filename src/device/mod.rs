mod tun;

// Import and re-export
pub use self::tun::Tun;

#[cfg(test)]
pub use self::mock::MockDevice;

use crate::buf::PacketBuf;
use crate::error::Result;

/// A trait for tunnel endpoint I/O.
///
/// Both ends of a forwarding loop (the TUN side and the UDP side)
/// implement this, so the loop itself never cares which is which.
pub trait Device: Send {
    /// Receive one packet into `buf`, returning its length.
    fn recv(&self, buf: &mut PacketBuf) -> Result<usize>;

    /// Send the packet held in `buf`.
    fn send(&self, buf: &PacketBuf) -> Result<()>;
}

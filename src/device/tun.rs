use crate::buf::PacketBuf;
use crate::device::Device;
use crate::error::{Error, Result};
use crate::raw;
use std::fs::OpenOptions;
use std::io;
use std::mem::{self, ManuallyDrop};
use std::os::fd::{AsFd, AsRawFd, BorrowedFd, OwnedFd, RawFd};
use tracing::debug;

const TUN_CONTROL: &str = "/dev/net/tun";

/// Interface names are at most IFNAMSIZ - 1 bytes plus the terminator.
const IFNAMSIZ: usize = 16;

// linux/if_tun.h
const TUNSETIFF: libc::c_ulong = 0x4004_54ca;
const IFF_TUN: libc::c_short = 0x0001;
const IFF_NO_PI: libc::c_short = 0x1000;

/// A TUN-mode virtual network interface.
///
/// Owns the descriptor exclusively; the kernel tears the interface
/// down when the descriptor closes, which happens exactly once, on
/// drop.
pub struct Tun {
    fd: ManuallyDrop<OwnedFd>,
    name: String,
}

impl Tun {
    /// Open the tunnel control device and register a TUN interface
    /// with no packet-info framing.
    ///
    /// Pass `None` to let the kernel pick a `tun<N>` name. A requested
    /// name that is empty, 16 bytes or longer, or contains a NUL byte
    /// is rejected with [`Error::InvalidName`] before any resource is
    /// touched.
    pub fn create(requested: Option<&str>) -> Result<Self> {
        if let Some(name) = requested {
            validate_name(name)?;
        }

        let control = OpenOptions::new()
            .read(true)
            .write(true)
            .open(TUN_CONTROL)
            .map_err(Error::ResourceUnavailable)?;
        let fd: OwnedFd = control.into();

        let mut req: libc::ifreq = unsafe { mem::zeroed() };
        req.ifr_ifru.ifru_flags = IFF_TUN | IFF_NO_PI;
        if let Some(name) = requested {
            for (dst, src) in req.ifr_name.iter_mut().zip(name.as_bytes()) {
                *dst = *src as libc::c_char;
            }
        }

        // SAFETY: fd is open and req is a zero-initialized ifreq the
        // kernel reads and writes back in full.
        let res = unsafe { libc::ioctl(fd.as_raw_fd(), TUNSETIFF as _, &mut req) };
        if res < 0 {
            return Err(Error::RegistrationFailed(io::Error::last_os_error()));
        }

        // The kernel wrote the confirmed (possibly auto-assigned) name back.
        let name = name_from_ifreq(&req);
        debug!(device = %name, "registered tun interface");
        Ok(Tun {
            fd: ManuallyDrop::new(fd),
            name,
        })
    }

    /// The kernel-confirmed interface name, recorded at creation.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Device for Tun {
    /// One read transfers exactly one raw IP packet.
    fn recv(&self, buf: &mut PacketBuf) -> Result<usize> {
        raw::read(self.fd.as_fd(), buf)
    }

    fn send(&self, buf: &PacketBuf) -> Result<()> {
        raw::write_all(self.fd.as_fd(), buf)
    }
}

impl AsRawFd for Tun {
    fn as_raw_fd(&self) -> RawFd {
        self.fd.as_raw_fd()
    }
}

impl AsFd for Tun {
    fn as_fd(&self) -> BorrowedFd<'_> {
        self.fd.as_fd()
    }
}

impl Drop for Tun {
    fn drop(&mut self) {
        // SAFETY: fd is taken exactly once, here.
        let fd = unsafe { ManuallyDrop::take(&mut self.fd) };
        raw::close_reporting(fd, "tun device");
    }
}

fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() || name.len() >= IFNAMSIZ || name.as_bytes().contains(&0) {
        return Err(Error::InvalidName(name.to_string()));
    }
    Ok(())
}

fn name_from_ifreq(req: &libc::ifreq) -> String {
    let bytes: Vec<u8> = req
        .ifr_name
        .iter()
        .take_while(|&&c| c != 0)
        .map(|&c| c as u8)
        .collect();
    String::from_utf8_lossy(&bytes).into_owned()
}

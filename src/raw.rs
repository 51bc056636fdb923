//! Raw descriptor I/O: one blocking syscall per packet, no buffering.

use crate::buf::PacketBuf;
use crate::error::{Error, Result};
use nix::errno::Errno;
use std::os::fd::{AsRawFd, BorrowedFd, IntoRawFd, OwnedFd};
use tracing::warn;

/// Issue a single `read(2)` into `buf`, up to its capacity.
///
/// On success the buffer's valid length is the byte count actually
/// read, which may be anything from zero to the capacity. Interrupted
/// reads are retried; a non-blocking descriptor with nothing pending
/// yields [`Error::WouldBlock`].
pub fn read(fd: BorrowedFd<'_>, buf: &mut PacketBuf) -> Result<usize> {
    loop {
        let res = {
            let storage = buf.storage_mut();
            // SAFETY: pointer and length come from buf's owned storage.
            unsafe { libc::read(fd.as_raw_fd(), storage.as_mut_ptr().cast(), storage.len()) }
        };
        match Errno::result(res) {
            Ok(n) => {
                let n = n as usize;
                buf.set_len(n);
                return Ok(n);
            }
            Err(Errno::EINTR) => continue,
            Err(Errno::EAGAIN) => return Err(Error::WouldBlock),
            Err(err) => {
                return Err(Error::Io {
                    op: "read",
                    source: err.into(),
                })
            }
        }
    }
}

/// Write the buffer's valid-length prefix, reissuing `write(2)` for
/// the unwritten suffix until every byte is accepted.
///
/// A zero-progress write with bytes still pending surfaces as
/// [`Error::PartialWrite`] rather than looping forever. On a
/// non-blocking descriptor, `EAGAIN` after partial progress is also
/// [`Error::PartialWrite`] so the caller knows how much of a stream
/// prefix already reached the kernel; bare [`Error::WouldBlock`]
/// means nothing was written.
pub fn write_all(fd: BorrowedFd<'_>, buf: &PacketBuf) -> Result<()> {
    let data = buf.as_slice();
    let mut written = 0;
    while written < data.len() {
        let remaining = &data[written..];
        // SAFETY: the slice is in bounds of buf's valid prefix.
        let res =
            unsafe { libc::write(fd.as_raw_fd(), remaining.as_ptr().cast(), remaining.len()) };
        match Errno::result(res) {
            Ok(0) => {
                return Err(Error::PartialWrite {
                    written,
                    requested: data.len(),
                })
            }
            Ok(n) => written += n as usize,
            Err(Errno::EINTR) => continue,
            Err(Errno::EAGAIN) if written == 0 => return Err(Error::WouldBlock),
            Err(Errno::EAGAIN) => {
                return Err(Error::PartialWrite {
                    written,
                    requested: data.len(),
                })
            }
            Err(err) => {
                return Err(Error::Io {
                    op: "write",
                    source: err.into(),
                })
            }
        }
    }
    Ok(())
}

/// Close a descriptor, reporting failure instead of propagating it.
/// Teardown must always finish; a failed close is a log line, not an
/// error the destructor can do anything about.
pub(crate) fn close_reporting(fd: OwnedFd, what: &str) {
    if let Err(err) = nix::unistd::close(fd.into_raw_fd()) {
        warn!("closing {what}: {err}");
    }
}

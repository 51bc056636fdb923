//! Fixed-capacity packet buffer shared by all raw I/O paths.

/// A byte buffer with a capacity fixed at construction and a valid
/// length tracked separately.
///
/// Reads fill the storage up to capacity and set the valid length to
/// the bytes actually received; writes consume exactly the
/// valid-length prefix. The capacity never changes after construction.
#[derive(Debug, Clone)]
pub struct PacketBuf {
    storage: Box<[u8]>,
    len: usize,
}

impl PacketBuf {
    /// An empty buffer able to hold up to `capacity` bytes.
    pub fn with_capacity(capacity: usize) -> Self {
        PacketBuf {
            storage: vec![0u8; capacity].into_boxed_slice(),
            len: 0,
        }
    }

    /// A buffer holding exactly the bytes of `data`, full.
    pub fn from_slice(data: &[u8]) -> Self {
        PacketBuf {
            storage: data.to_vec().into_boxed_slice(),
            len: data.len(),
        }
    }

    /// The exact UTF-8 bytes of `text`, no terminator appended.
    pub fn from_text(text: &str) -> Self {
        Self::from_slice(text.as_bytes())
    }

    pub fn capacity(&self) -> usize {
        self.storage.len()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The valid-length prefix.
    pub fn as_slice(&self) -> &[u8] {
        &self.storage[..self.len]
    }

    /// Copy as much of `data` as fits, returning the bytes taken.
    /// The valid length becomes the copied count.
    pub fn fill_from(&mut self, data: &[u8]) -> usize {
        let n = data.len().min(self.storage.len());
        self.storage[..n].copy_from_slice(&data[..n]);
        self.len = n;
        n
    }

    pub fn clear(&mut self) {
        self.len = 0;
    }

    /// Full-capacity storage for read syscalls to fill.
    pub(crate) fn storage_mut(&mut self) -> &mut [u8] {
        &mut self.storage
    }

    /// Declare `len` bytes of the storage valid after a read.
    pub(crate) fn set_len(&mut self, len: usize) {
        debug_assert!(len <= self.storage.len());
        self.len = len.min(self.storage.len());
    }
}

impl From<&str> for PacketBuf {
    fn from(text: &str) -> Self {
        PacketBuf::from_text(text)
    }
}

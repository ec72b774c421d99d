//! SHA-256 file hasher with streaming support.
//!
//! # Overview
//!
//! This module provides the [`Hasher`] struct for computing SHA-256 checksums
//! of file contents. Files are read through a fixed-size buffer so memory use
//! stays constant regardless of file size.
//!
//! # Example
//!
//! ```no_run
//! use copycure::scanner::Hasher;
//! use std::path::Path;
//!
//! let hasher = Hasher::new();
//! let checksum = hasher.hash_file(Path::new("photo.jpg")).unwrap();
//! println!("{checksum}");
//! ```

use std::fmt;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use sha2::{Digest, Sha256};

use super::HashError;

/// Default read buffer size (64 KiB).
pub const DEFAULT_BUFFER_SIZE: usize = 64 * 1024;

/// Length of a rendered checksum in hex characters.
pub const CHECKSUM_HEX_LEN: usize = 64;

/// A SHA-256 digest rendered as lowercase hexadecimal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Checksum(String);

impl Checksum {
    fn from_digest(digest: Sha256) -> Self {
        Self(format!("{:x}", digest.finalize()))
    }

    /// Parse a checksum from its hex form.
    ///
    /// Returns `None` unless the input is exactly 64 hex digits.
    /// Uppercase input is normalized to lowercase.
    #[must_use]
    pub fn from_hex(hex: &str) -> Option<Self> {
        if hex.len() != CHECKSUM_HEX_LEN || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        Some(Self(hex.to_ascii_lowercase()))
    }

    /// The hex string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Checksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Checksum {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Streaming SHA-256 hasher.
#[derive(Debug, Clone)]
pub struct Hasher {
    buffer_size: usize,
}

impl Default for Hasher {
    fn default() -> Self {
        Self::new()
    }
}

impl Hasher {
    /// Create a hasher with the default buffer size.
    #[must_use]
    pub fn new() -> Self {
        Self {
            buffer_size: DEFAULT_BUFFER_SIZE,
        }
    }

    /// Use a custom read buffer size. Zero is bumped to one byte.
    #[must_use]
    pub fn with_buffer_size(mut self, size: usize) -> Self {
        self.buffer_size = size.max(1);
        self
    }

    /// Hash the entire content of a file.
    ///
    /// # Errors
    ///
    /// Returns [`HashError`] if the file cannot be opened or a read fails
    /// part-way through.
    pub fn hash_file(&self, path: &Path) -> Result<Checksum, HashError> {
        let file = File::open(path).map_err(|e| HashError::from_io(path, e))?;
        self.hash_reader(file).map_err(|e| HashError::from_io(path, e))
    }

    /// Hash everything a reader yields until EOF.
    ///
    /// # Errors
    ///
    /// Propagates any read error other than `Interrupted`.
    pub fn hash_reader<R: Read>(&self, mut reader: R) -> io::Result<Checksum> {
        let mut digest = Sha256::new();
        let mut buffer = vec![0u8; self.buffer_size];
        loop {
            let read = match reader.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            digest.update(&buffer[..read]);
        }
        Ok(Checksum::from_digest(digest))
    }

    /// Hash an in-memory byte slice.
    #[must_use]
    pub fn hash_bytes(&self, data: &[u8]) -> Checksum {
        Checksum::from_digest(Sha256::new_with_prefix(data))
    }
}

//! File hashing: algorithm registry and streaming digesters.

use anyhow::{Context, Result};
use md5::Md5;
use sha1::Sha1;
use sha2::{Digest, Sha224, Sha256, Sha512};
use std::fmt;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use std::str::FromStr;

/// Supported digest algorithms. Unknown names are rejected at startup.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum HashAlgorithm {
    /// CRC-32, IEEE polynomial. Digest is the big-endian checksum.
    Crc32,
    Md5,
    Sha1,
    Sha224,
    #[default]
    Sha256,
    Sha512,
}

impl HashAlgorithm {
    pub const ALL: [HashAlgorithm; 6] = [
        HashAlgorithm::Crc32,
        HashAlgorithm::Md5,
        HashAlgorithm::Sha1,
        HashAlgorithm::Sha224,
        HashAlgorithm::Sha256,
        HashAlgorithm::Sha512,
    ];

    pub fn name(self) -> &'static str {
        match self {
            HashAlgorithm::Crc32 => "crc32",
            HashAlgorithm::Md5 => "md5",
            HashAlgorithm::Sha1 => "sha1",
            HashAlgorithm::Sha224 => "sha224",
            HashAlgorithm::Sha256 => "sha256",
            HashAlgorithm::Sha512 => "sha512",
        }
    }

    /// Digest length in bytes.
    pub fn output_len(self) -> usize {
        match self {
            HashAlgorithm::Crc32 => 4,
            HashAlgorithm::Md5 => 16,
            HashAlgorithm::Sha1 => 20,
            HashAlgorithm::Sha224 => 28,
            HashAlgorithm::Sha256 => 32,
            HashAlgorithm::Sha512 => 64,
        }
    }

    /// Fresh accumulator for one task. Never shared or reused.
    pub fn digester(self) -> Digester {
        match self {
            HashAlgorithm::Crc32 => Digester::Crc32(crc32fast::Hasher::new()),
            HashAlgorithm::Md5 => Digester::Md5(Md5::new()),
            HashAlgorithm::Sha1 => Digester::Sha1(Sha1::new()),
            HashAlgorithm::Sha224 => Digester::Sha224(Sha224::new()),
            HashAlgorithm::Sha256 => Digester::Sha256(Sha256::new()),
            HashAlgorithm::Sha512 => Digester::Sha512(Sha512::new()),
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for HashAlgorithm {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        HashAlgorithm::ALL
            .into_iter()
            .find(|a| a.name() == s)
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "hash function not supported: {s} (options: crc32, md5, sha1, sha224, sha256, sha512)"
                )
            })
    }
}

/// Running digest state for a single file.
#[derive(Clone)]
pub enum Digester {
    Crc32(crc32fast::Hasher),
    Md5(Md5),
    Sha1(Sha1),
    Sha224(Sha224),
    Sha256(Sha256),
    Sha512(Sha512),
}

impl Digester {
    pub fn update(&mut self, data: &[u8]) {
        match self {
            Digester::Crc32(h) => h.update(data),
            Digester::Md5(h) => Digest::update(h, data),
            Digester::Sha1(h) => Digest::update(h, data),
            Digester::Sha224(h) => Digest::update(h, data),
            Digester::Sha256(h) => Digest::update(h, data),
            Digester::Sha512(h) => Digest::update(h, data),
        }
    }

    /// Digest of everything written so far. Does not consume the state, so calling it twice
    /// returns the same bytes.
    pub fn sum(&self) -> Vec<u8> {
        self.clone().finalize()
    }

    pub fn finalize(self) -> Vec<u8> {
        match self {
            Digester::Crc32(h) => h.finalize().to_be_bytes().to_vec(),
            Digester::Md5(h) => h.finalize().to_vec(),
            Digester::Sha1(h) => h.finalize().to_vec(),
            Digester::Sha224(h) => h.finalize().to_vec(),
            Digester::Sha256(h) => h.finalize().to_vec(),
            Digester::Sha512(h) => h.finalize().to_vec(),
        }
    }
}

/// Stream `reader` through a fresh digester, `buf.len()` bytes at a time, in order.
pub fn hash_reader<R: Read>(
    algorithm: HashAlgorithm,
    reader: &mut R,
    buf: &mut [u8],
) -> io::Result<Vec<u8>> {
    let mut digester = algorithm.digester();
    loop {
        let n = match reader.read(buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        digester.update(&buf[..n]);
    }
    Ok(digester.finalize())
}

/// Open `path` and hash its full contents, reusing the caller's read buffer.
pub fn hash_file(path: &Path, algorithm: HashAlgorithm, buf: &mut [u8]) -> Result<Vec<u8>> {
    let mut file = File::open(path).with_context(|| format!("open {}", path.display()))?;
    hash_reader(algorithm, &mut file, buf).with_context(|| format!("read {}", path.display()))
}

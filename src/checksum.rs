//! Content hashes for the registry index

use std::fmt;
use std::fs;
use std::path::Path;

use md5::Md5;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::Result;

/// Digest used for index content hashes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChecksumAlgorithm {
    /// What index consumers verify against unless configured otherwise
    #[default]
    Md5,
    Sha256,
}

/// Hex-encoded content hash
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Checksum(String);

impl Checksum {
    /// Compute checksum from raw bytes
    pub fn from_bytes(algorithm: ChecksumAlgorithm, data: &[u8]) -> Self {
        match algorithm {
            ChecksumAlgorithm::Md5 => Self(format!("{:x}", Md5::digest(data))),
            ChecksumAlgorithm::Sha256 => Self(format!("{:x}", Sha256::digest(data))),
        }
    }

    /// Get the hex string representation
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Verify that content matches this checksum
    pub fn verify(&self, algorithm: ChecksumAlgorithm, data: &[u8]) -> bool {
        Self::from_bytes(algorithm, data) == *self
    }
}

impl fmt::Display for Checksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for Checksum {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Hashes files for change detection. Not meant for security.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChecksumService {
    algorithm: ChecksumAlgorithm,
}

impl ChecksumService {
    pub fn new(algorithm: ChecksumAlgorithm) -> Self {
        Self { algorithm }
    }

    /// Hash the full byte content of the file at `path`
    pub fn create_hash(&self, path: &Path) -> Result<Checksum> {
        let data = fs::read(path)?;
        Ok(Checksum::from_bytes(self.algorithm, &data))
    }
}

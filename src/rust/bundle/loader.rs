use std::fs;
use std::path::Path;

use sha2::{Digest, Sha256};

use super::{BundleError, BundleFile, ModelBundle, ModelBundleBuilder};
use crate::runtime::RuntimeConfig;

/// Reads a bundle file from disk, optionally checking its SHA-256 first.
#[derive(Debug, Clone, Default)]
pub struct BundleLoader {
    expected_sha256: Option<String>,
    runtime_config: RuntimeConfig,
}

impl BundleLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requires the bundle's SHA-256 (hex, case-insensitive) to match before parsing.
    pub fn with_expected_sha256(mut self, hash: Option<String>) -> Self {
        self.expected_sha256 = hash.map(|h| h.trim().to_ascii_lowercase());
        self
    }

    pub fn with_runtime_config(mut self, config: RuntimeConfig) -> Self {
        self.runtime_config = config;
        self
    }

    pub fn load<P: AsRef<Path>>(&self, path: P) -> Result<ModelBundle, BundleError> {
        let path = path.as_ref();
        log::info!("Loading bundle from {:?}", path);
        if !path.exists() {
            return Err(BundleError::NotFound(path.to_path_buf()));
        }

        let bytes = fs::read(path)?;
        log::info!("Read {} bytes", bytes.len());

        if let Some(expected) = &self.expected_sha256 {
            let actual = sha256_hex(&bytes);
            log::info!("Calculated hash: {}", actual);
            log::info!("Expected hash:   {}", expected);
            if &actual != expected {
                return Err(BundleError::HashMismatch {
                    expected: expected.clone(),
                    actual,
                });
            }
        }

        let file: BundleFile = serde_json::from_slice(&bytes)?;
        ModelBundleBuilder::from_file(file)?
            .with_source(path)
            .with_runtime_config(self.runtime_config.clone())
            .build()
    }

    /// Checks a file against an expected SHA-256 without parsing it.
    pub fn verify_file(path: &Path, expected_hash: &str) -> Result<bool, BundleError> {
        log::info!("Verifying file: {:?}", path);
        let bytes = fs::read(path)?;
        Ok(sha256_hex(&bytes) == expected_hash.trim().to_ascii_lowercase())
    }
}

fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

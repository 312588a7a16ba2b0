use std::env;
use std::path::PathBuf;

use clap::Parser;

use crate::bundle::BundleLoader;
use crate::runtime::RuntimeConfig;

/// File name looked up in the default bundle locations.
pub const BUNDLE_FILE_NAME: &str = "model_with_encoders.json";

#[derive(Parser, Debug, Clone, Default)]
#[command(
    author,
    version,
    about = "Predict whether a mushroom is edible or poisonous",
    long_about = None
)]
pub struct Args {
    /// Path to the model bundle (feature columns, encoders and classifier)
    #[arg(short, long, env = "MUSHROOM_BUNDLE")]
    pub bundle: Option<PathBuf>,

    /// Refuse to start unless the bundle file has this SHA-256
    #[arg(long, env = "MUSHROOM_BUNDLE_SHA256")]
    pub bundle_sha256: Option<String>,

    /// ONNX Runtime intra-op threads (0 lets the runtime decide)
    #[arg(long, default_value_t = 0)]
    pub intra_threads: usize,

    /// ONNX Runtime inter-op threads (0 lets the runtime decide)
    #[arg(long, default_value_t = 0)]
    pub inter_threads: usize,
}

impl Args {
    pub fn bundle_path(&self) -> PathBuf {
        self.bundle.clone().unwrap_or_else(default_bundle_path)
    }

    pub fn runtime_config(&self) -> RuntimeConfig {
        RuntimeConfig {
            inter_threads: self.inter_threads,
            intra_threads: self.intra_threads,
            ..RuntimeConfig::default()
        }
    }

    pub fn loader(&self) -> BundleLoader {
        BundleLoader::new()
            .with_expected_sha256(self.bundle_sha256.clone())
            .with_runtime_config(self.runtime_config())
    }
}

/// Returns the bundle path used when none is configured
pub fn default_bundle_path() -> PathBuf {
    // 1. Check environment variable
    if let Ok(path) = env::var("MUSHROOM_HOME") {
        return PathBuf::from(path).join(BUNDLE_FILE_NAME);
    }

    // 2. Use platform-specific data directory
    if let Some(data_dir) = dirs::data_dir() {
        return data_dir.join("mushroom-classifier").join(BUNDLE_FILE_NAME);
    }

    // 3. Fallback to user's home directory
    if let Some(home_dir) = dirs::home_dir() {
        return home_dir
            .join(".local")
            .join("share")
            .join("mushroom-classifier")
            .join(BUNDLE_FILE_NAME);
    }

    // 4. Working directory
    PathBuf::from(BUNDLE_FILE_NAME)
}

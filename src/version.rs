// Version information for the MiniLM embedding service

/// Semantic version number
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub const SERVICE_NAME: &str = env!("CARGO_PKG_NAME");

/// Supported features in this version
pub const FEATURES: &[&str] = &[
    "sentence-embeddings",
    "cosine-similarity",
    "mean-pooling",
    "l2-normalization",
    "hub-download",
];

/// Get formatted version string for logging
pub fn get_version_string() -> String {
    format!("{} {}", SERVICE_NAME, VERSION)
}

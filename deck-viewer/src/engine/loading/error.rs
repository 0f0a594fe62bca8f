use thiserror::Error;

/// A case asset that could not be fetched or decoded. The viewer keeps its
/// loading overlay up and does not retry.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AssetLoadError {
    #[error("failed to load texture `{path}`: {reason}")]
    Texture { path: String, reason: String },
    #[error("failed to load mesh `{path}`: {reason}")]
    Mesh { path: String, reason: String },
}

impl AssetLoadError {
    pub fn path(&self) -> &str {
        match self {
            Self::Texture { path, .. } | Self::Mesh { path, .. } => path,
        }
    }
}

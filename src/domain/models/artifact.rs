//! On-disk encodings of an index artifact.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Magic bytes at the start of every binary artifact.
pub const ARTIFACT_MAGIC: &[u8; 8] = b"RAGINDEX";

/// Version of the binary payload layout following the magic bytes.
pub const ARTIFACT_VERSION: u16 = 1;

/// Encoding used for an index artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactFormat {
    /// Magic header, version, then a bincode payload
    #[default]
    Binary,
    /// The same aggregate as a JSON object
    Json,
}

impl fmt::Display for ArtifactFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Binary => write!(f, "binary"),
            Self::Json => write!(f, "json"),
        }
    }
}

impl FromStr for ArtifactFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "binary" | "bin" => Ok(Self::Binary),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown artifact format '{other}' (expected binary or json)")),
        }
    }
}

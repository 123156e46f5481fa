//! Index artifact persistence
//!
//! Binary layout: `RAGINDEX` magic, little-endian `u16` format version, then a
//! bincode payload of `{model, entries, embeddings, norms}`. A JSON rendition
//! of the same object is also accepted; its numeric entry fields may be
//! integers, floats or numeric strings.
//!
//! Every write goes to a temporary file in the destination directory that
//! is renamed over the target, so readers never observe a half-written file.

use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{
    ArtifactFormat, IndexEntry, IndexManifest, RagIndex, ARTIFACT_MAGIC, ARTIFACT_VERSION,
};

const HEADER_LEN: usize = ARTIFACT_MAGIC.len() + std::mem::size_of::<u16>();

#[derive(Serialize)]
struct PayloadRef<'a> {
    model: &'a str,
    entries: &'a [IndexEntry],
    embeddings: &'a [Vec<f32>],
    norms: Option<&'a [f32]>,
}

#[derive(Deserialize)]
struct BinaryPayload {
    model: String,
    entries: Vec<IndexEntry>,
    embeddings: Vec<Vec<f32>>,
    norms: Option<Vec<f32>>,
}

#[derive(Deserialize)]
struct JsonPayload {
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    entries: Vec<LooseEntry>,
    #[serde(default)]
    embeddings: Vec<Vec<f32>>,
    #[serde(default)]
    norms: Option<Vec<f32>>,
}

#[derive(Deserialize)]
struct LooseEntry {
    text: String,
    #[serde(default)]
    source: String,
    #[serde(default, deserialize_with = "loose_usize")]
    chunk_id: usize,
    #[serde(default, deserialize_with = "loose_usize")]
    start: usize,
    /// Absent offsets cover the chunk text from `start`
    #[serde(default, deserialize_with = "loose_usize_opt")]
    end: Option<usize>,
}

impl From<LooseEntry> for IndexEntry {
    fn from(entry: LooseEntry) -> Self {
        let end = entry
            .end
            .unwrap_or_else(|| entry.start + entry.text.chars().count());
        Self {
            text: entry.text,
            source: entry.source,
            chunk_id: entry.chunk_id,
            start: entry.start,
            end,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LooseNumber {
    Int(u64),
    Float(f64),
    Text(String),
}

/// Accept `3`, `3.0` or `"3"` for an unsigned integer field.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn loose_usize<'de, D>(deserializer: D) -> Result<usize, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    let float_to_usize = |value: f64| {
        if value.is_finite() && value >= 0.0 && value <= usize::MAX as f64 {
            Ok(value.trunc() as usize)
        } else {
            Err(D::Error::custom(format!("{value} is not a valid offset")))
        }
    };

    match LooseNumber::deserialize(deserializer)? {
        LooseNumber::Int(value) => usize::try_from(value).map_err(D::Error::custom),
        LooseNumber::Float(value) => float_to_usize(value),
        LooseNumber::Text(text) => {
            let text = text.trim();
            match text.parse::<u64>() {
                Ok(value) => usize::try_from(value).map_err(D::Error::custom),
                Err(_) => text
                    .parse::<f64>()
                    .map_err(|_| D::Error::custom(format!("'{text}' is not a number")))
                    .and_then(float_to_usize),
            }
        }
    }
}

fn loose_usize_opt<'de, D>(deserializer: D) -> Result<Option<usize>, D::Error>
where
    D: Deserializer<'de>,
{
    loose_usize(deserializer).map(Some)
}

/// Reads and writes index artifacts and their manifests.
pub struct IndexStore;

impl IndexStore {
    /// Serialize `index` to `path` in the given format.
    pub fn save(index: &RagIndex, path: &Path, format: ArtifactFormat) -> DomainResult<()> {
        let payload = PayloadRef {
            model: index.model(),
            entries: index.entries(),
            embeddings: index.embeddings(),
            norms: Some(index.norms()),
        };

        let bytes = match format {
            ArtifactFormat::Binary => {
                let body = bincode::serialize(&payload)?;
                let mut bytes = Vec::with_capacity(HEADER_LEN + body.len());
                bytes.extend_from_slice(ARTIFACT_MAGIC);
                bytes.extend_from_slice(&ARTIFACT_VERSION.to_le_bytes());
                bytes.extend_from_slice(&body);
                bytes
            }
            ArtifactFormat::Json => serde_json::to_vec(&payload)?,
        };

        write_atomic(path, &bytes)?;
        tracing::debug!(path = %path.display(), bytes = bytes.len(), %format, "index artifact written");
        Ok(())
    }

    /// Load an artifact, failing if its JSON form omits the model name.
    pub fn load(path: &Path) -> DomainResult<RagIndex> {
        Self::load_inner(path, None)
    }

    /// Load an artifact, using `default_model` when a JSON artifact does not
    /// record one.
    pub fn load_with_default_model(path: &Path, default_model: &str) -> DomainResult<RagIndex> {
        Self::load_inner(path, Some(default_model))
    }

    fn load_inner(path: &Path, default_model: Option<&str>) -> DomainResult<RagIndex> {
        let bytes = std::fs::read(path).map_err(|e| DomainError::index_load(path, e))?;
        Self::decode(&bytes, default_model).map_err(|e| match e {
            DomainError::IndexLoad { .. } => e,
            other => DomainError::index_load(path, other),
        })
    }

    fn decode(bytes: &[u8], default_model: Option<&str>) -> DomainResult<RagIndex> {
        match detect_format(bytes)? {
            ArtifactFormat::Binary => {
                let version = u16::from_le_bytes([bytes[ARTIFACT_MAGIC.len()], bytes[ARTIFACT_MAGIC.len() + 1]]);
                if version != ARTIFACT_VERSION {
                    return Err(DomainError::InvalidIndex(format!(
                        "unsupported artifact version {version} (expected {ARTIFACT_VERSION})"
                    )));
                }
                let payload: BinaryPayload = bincode::deserialize(&bytes[HEADER_LEN..])?;
                RagIndex::new(payload.model, payload.entries, payload.embeddings, payload.norms)
            }
            ArtifactFormat::Json => {
                let payload: JsonPayload = serde_json::from_slice(bytes)?;
                let model = payload
                    .model
                    .filter(|m| !m.trim().is_empty())
                    .or_else(|| default_model.map(str::to_string))
                    .ok_or_else(|| DomainError::InvalidIndex("artifact does not name its model".to_string()))?;
                let entries = payload.entries.into_iter().map(IndexEntry::from).collect();
                RagIndex::new(model, entries, payload.embeddings, payload.norms)
            }
        }
    }

    /// Write the manifest as pretty-printed JSON.
    pub fn save_manifest(manifest: &IndexManifest, path: &Path) -> DomainResult<()> {
        let json = serde_json::to_vec_pretty(manifest)?;
        write_atomic(path, &json)
    }
}

/// Sniff the artifact encoding from its first bytes.
pub fn detect_format(bytes: &[u8]) -> DomainResult<ArtifactFormat> {
    if bytes.len() >= HEADER_LEN && bytes.starts_with(ARTIFACT_MAGIC) {
        return Ok(ArtifactFormat::Binary);
    }
    match bytes.iter().find(|b| !b.is_ascii_whitespace()) {
        Some(b'{') => Ok(ArtifactFormat::Json),
        _ => Err(DomainError::InvalidIndex(
            "unrecognized artifact format".to_string(),
        )),
    }
}

/// Sibling path for the manifest of the artifact at `output`.
///
/// `index.bin` gets `index.json`; an artifact already named `*.json` gets
/// `*.manifest.json` instead of being overwritten.
pub fn manifest_path_for(output: &Path) -> PathBuf {
    let candidate = output.with_extension("json");
    if candidate == output {
        output.with_extension("manifest.json")
    } else {
        candidate
    }
}

fn write_atomic(path: &Path, bytes: &[u8]) -> DomainResult<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    std::fs::create_dir_all(&parent)?;

    let mut file = tempfile::NamedTempFile::new_in(&parent)?;
    file.write_all(bytes)?;
    file.as_file().sync_all()?;
    file.persist(path).map_err(|e| DomainError::Io(e.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample_index() -> RagIndex {
        let entries = vec![
            IndexEntry {
                text: "The robot greets visitors.".to_string(),
                source: "faq.txt".to_string(),
                chunk_id: 0,
                start: 0,
                end: 26,
            },
            IndexEntry {
                text: "It answers questions.".to_string(),
                source: "faq.txt".to_string(),
                chunk_id: 1,
                start: 20,
                end: 41,
            },
        ];
        RagIndex::new("nomic-embed-text", entries, vec![vec![1.0, 2.0], vec![2.0, 0.5]], None).unwrap()
    }

    #[test]
    fn test_binary_artifact_starts_with_header() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("index.bin");
        IndexStore::save(&sample_index(), &path, ArtifactFormat::Binary).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(ARTIFACT_MAGIC));
        assert_eq!(detect_format(&bytes).unwrap(), ArtifactFormat::Binary);
    }

    #[test]
    fn test_binary_and_json_load_identically() {
        let dir = TempDir::new().unwrap();
        let index = sample_index();

        let bin = dir.path().join("index.bin");
        let json = dir.path().join("index.json");
        IndexStore::save(&index, &bin, ArtifactFormat::Binary).unwrap();
        IndexStore::save(&index, &json, ArtifactFormat::Json).unwrap();

        assert_eq!(IndexStore::load(&bin).unwrap(), index);
        assert_eq!(IndexStore::load(&json).unwrap(), index);
    }

    #[test]
    fn test_save_creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/deeper/index.bin");
        IndexStore::save(&sample_index(), &path, ArtifactFormat::Binary).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_json_numeric_fields_are_coerced() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("loose.json");
        std::fs::write(
            &path,
            r#"{
                "model": "nomic-embed-text",
                "entries": [
                    {"text": "alpha", "source": "a.txt", "chunk_id": "0", "start": 0.0, "end": "5"},
                    {"text": "beta", "start": 3, "end": 7.9}
                ],
                "embeddings": [[1.0, 0.0], [0.0, 2.0]]
            }"#,
        )
        .unwrap();

        let index = IndexStore::load(&path).unwrap();
        assert_eq!(index.entries()[0].end, 5);
        assert_eq!(index.entries()[1].chunk_id, 0);
        assert_eq!(index.entries()[1].source, "");
        assert_eq!(index.entries()[1].end, 7);
        // Norms were absent and recomputed
        assert_eq!(index.norms(), &[1.0, 2.0]);
    }

    #[test]
    fn test_json_entries_without_offsets_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nooffsets.json");
        std::fs::write(
            &path,
            r#"{
                "model": "nomic-embed-text",
                "entries": [
                    {"text": "gallery hours", "source": "faq.txt"},
                    {"text": "gift shop", "start": "20"}
                ],
                "embeddings": [[1.0, 0.0], [0.0, 1.0]]
            }"#,
        )
        .unwrap();

        let index = IndexStore::load(&path).unwrap();
        let ranges: Vec<(usize, usize)> = index.entries().iter().map(|e| (e.start, e.end)).collect();
        assert_eq!(ranges, vec![(0, 13), (20, 29)]);
    }

    #[test]
    fn test_json_without_model_uses_default() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nomodel.json");
        std::fs::write(&path, r#"{"entries": [], "embeddings": []}"#).unwrap();

        assert!(IndexStore::load(&path).is_err());
        let index = IndexStore::load_with_default_model(&path, "fallback").unwrap();
        assert_eq!(index.model(), "fallback");
        assert!(index.is_empty());
    }

    #[test]
    fn test_corrupt_artifacts_are_load_errors() {
        let dir = TempDir::new().unwrap();

        let garbage = dir.path().join("garbage.bin");
        std::fs::write(&garbage, b"not an index at all").unwrap();
        assert!(matches!(IndexStore::load(&garbage), Err(DomainError::IndexLoad { .. })));

        let truncated = dir.path().join("truncated.bin");
        let mut bytes = ARTIFACT_MAGIC.to_vec();
        bytes.extend_from_slice(&ARTIFACT_VERSION.to_le_bytes());
        bytes.extend_from_slice(&[1, 2, 3]);
        std::fs::write(&truncated, bytes).unwrap();
        assert!(matches!(IndexStore::load(&truncated), Err(DomainError::IndexLoad { .. })));

        let misaligned = dir.path().join("misaligned.json");
        std::fs::write(
            &misaligned,
            r#"{"model": "m", "entries": [{"text": "x", "start": 0, "end": 1}], "embeddings": []}"#,
        )
        .unwrap();
        assert!(matches!(IndexStore::load(&misaligned), Err(DomainError::IndexLoad { .. })));
    }

    #[test]
    fn test_unknown_version_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("future.bin");
        let mut bytes = ARTIFACT_MAGIC.to_vec();
        bytes.extend_from_slice(&99u16.to_le_bytes());
        std::fs::write(&path, bytes).unwrap();

        let err = IndexStore::load(&path).unwrap_err();
        assert!(err.to_string().contains("version 99"));
    }

    #[test]
    fn test_missing_file_is_load_error() {
        let dir = TempDir::new().unwrap();
        let result = IndexStore::load(&dir.path().join("absent.bin"));
        assert!(matches!(result, Err(DomainError::IndexLoad { .. })));
    }

    #[test]
    fn test_manifest_path_for() {
        assert_eq!(manifest_path_for(Path::new("data/rag_index.bin")), PathBuf::from("data/rag_index.json"));
        assert_eq!(manifest_path_for(Path::new("data/index.json")), PathBuf::from("data/index.manifest.json"));
        assert_eq!(manifest_path_for(Path::new("index")), PathBuf::from("index.json"));
    }
}

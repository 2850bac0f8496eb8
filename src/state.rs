use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("IO error: {0}")]
    Io(std::io::Error),
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
    #[error("Unsupported state file version: {0}")]
    UnsupportedVersion(u32),
}

/// Last observed result for one watch label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StateEntry {
    /// SHA-256 of the condensed content, lowercase hex.
    pub fingerprint: String,
    /// RFC 3339 timestamp of the check that recorded this fingerprint.
    pub checked_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct Metadata {
    version: u32,
}

/// Helper struct to extract only the metadata section from a TOML file,
/// ignoring all other content. Used to check version before parsing the full
/// file. Note: no deny_unknown_fields here; this struct's purpose is to
/// ignore everything except metadata.
#[derive(Debug, Deserialize)]
struct MetadataOnly {
    metadata: Metadata,
}

/// The persisted mapping from watch label to last-seen fingerprint.
///
/// At most one entry per label; last write wins; no history is retained.
/// The store is read at the start of each watch check and rewritten in full
/// at the end. There is no cross-process locking: concurrent invocations
/// against the same file are last-writer-wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StateStore {
    metadata: Metadata,
    pub entries: BTreeMap<String, StateEntry>,
}

impl StateStore {
    const SUPPORTED_VERSION: u32 = 1;

    pub fn new() -> Self {
        StateStore {
            metadata: Metadata {
                version: Self::SUPPORTED_VERSION,
            },
            entries: BTreeMap::new(),
        }
    }

    pub fn fingerprint_of(&self, label: &str) -> Option<&str> {
        self.entries.get(label).map(|e| e.fingerprint.as_str())
    }

    pub fn record(&mut self, label: &str, fingerprint: String, checked_at: String) {
        self.entries.insert(
            label.to_string(),
            StateEntry {
                fingerprint,
                checked_at,
            },
        );
    }

    /// Parse a TOML string into a StateStore structure
    pub fn from_toml(content: &str) -> Result<Self, StateError> {
        // First, extract only the metadata to check version. Otherwise
        // we would fail on unexpected *other* input (which could just be
        // due to a future version), without being able to provide a sensible
        // explanation.
        let metadata_only: MetadataOnly = toml::from_str(content)?;

        if metadata_only.metadata.version != Self::SUPPORTED_VERSION {
            return Err(StateError::UnsupportedVersion(
                metadata_only.metadata.version,
            ));
        }

        let store: StateStore = toml::from_str(content)?;
        Ok(store)
    }

    /// Serialize a StateStore structure to TOML string
    pub fn to_toml(&self) -> Result<String, StateError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Load a StateStore from the filesystem. A missing file is not an
    /// error: it means no prior watches, and loads as an empty store.
    pub fn load_or_default(path: &Path) -> Result<Self, StateError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::new()),
            Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
                return Err(StateError::PermissionDenied(path.to_path_buf()));
            }
            Err(e) => return Err(StateError::Io(e)),
        };

        Self::from_toml(&content)
    }

    /// Save a StateStore to the filesystem atomically.
    ///
    /// Writes to a temporary file, fsyncs it, then atomically renames it
    /// into place.
    pub fn save(&self, path: &Path) -> Result<(), StateError> {
        use std::io::Write;

        let content = self.to_toml()?;

        let parent = path.parent().unwrap_or(Path::new("."));

        let mut temp_file = tempfile::NamedTempFile::new_in(parent).map_err(|e| {
            if e.kind() == std::io::ErrorKind::PermissionDenied {
                StateError::PermissionDenied(parent.to_path_buf())
            } else {
                StateError::Io(e)
            }
        })?;

        temp_file.write_all(content.as_bytes()).map_err(|e| {
            if e.kind() == std::io::ErrorKind::PermissionDenied {
                StateError::PermissionDenied(path.to_path_buf())
            } else {
                StateError::Io(e)
            }
        })?;

        temp_file.as_file().sync_all().map_err(StateError::Io)?;

        temp_file.persist(path).map_err(|e| {
            if e.error.kind() == std::io::ErrorKind::PermissionDenied {
                StateError::PermissionDenied(path.to_path_buf())
            } else {
                StateError::Io(e.error)
            }
        })?;

        Ok(())
    }
}

impl Default for StateStore {
    fn default() -> Self {
        Self::new()
    }
}

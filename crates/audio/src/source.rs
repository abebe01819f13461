//! Where variant bytes come from.
//!
//! Embedded assets are looked up by string path through a [`ResourceLookup`];
//! loose files are read straight from disk.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Failure to obtain bytes for a variant.
#[derive(Debug, Error)]
pub enum SourceError {
    /// No embedded resource under that path.
    #[error("embedded resource not found: {0}")]
    ResourceMissing(String),
    /// Reading a file failed.
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        /// File that could not be read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },
    /// The source exists but holds no bytes.
    #[error("byte source {0} is empty")]
    Empty(String),
}

/// Lookup of embedded resources by string path.
pub trait ResourceLookup {
    /// Bytes stored under `path`, if any.
    fn read_resource(&self, path: &str) -> Option<Vec<u8>>;

    /// All known resource paths, for diagnostics.
    fn resource_names(&self) -> Vec<String> {
        Vec::new()
    }
}

/// In-memory resource table.
#[derive(Debug, Clone, Default)]
pub struct ResourceMap {
    entries: BTreeMap<String, Vec<u8>>,
}

impl ResourceMap {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `bytes` under `path`, replacing any previous entry.
    pub fn insert(&mut self, path: impl Into<String>, bytes: Vec<u8>) {
        self.entries.insert(path.into(), bytes);
    }

    /// Number of stored resources.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ResourceLookup for ResourceMap {
    fn read_resource(&self, path: &str) -> Option<Vec<u8>> {
        self.entries.get(path).cloned()
    }

    fn resource_names(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }
}

/// Resources stored as files below a root directory.
#[derive(Debug, Clone)]
pub struct ResourceDir {
    root: PathBuf,
}

impl ResourceDir {
    /// Resolve resource paths relative to `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl ResourceLookup for ResourceDir {
    fn read_resource(&self, path: &str) -> Option<Vec<u8>> {
        let full = self.root.join(path);
        match fs::read(&full) {
            Ok(bytes) => Some(bytes),
            Err(err) => {
                debug!(path = %full.display(), %err, "resource unreadable");
                None
            }
        }
    }

    fn resource_names(&self) -> Vec<String> {
        WalkDir::new(&self.root)
            .sort_by_file_name()
            .into_iter()
            .filter_map(Result::ok)
            .filter(|entry| entry.file_type().is_file())
            .filter_map(|entry| {
                entry
                    .path()
                    .strip_prefix(&self.root)
                    .ok()
                    .map(|rel| rel.to_string_lossy().replace('\\', "/"))
            })
            .collect()
    }
}

/// Origin of a variant's bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ByteSource {
    /// Resource bundled with the application.
    Embedded {
        /// Lookup path, e.g. `Resources/hockey-shot-1.wav`.
        path: String,
    },
    /// Loose file on disk.
    File {
        /// Path to the file.
        path: PathBuf,
    },
}

impl ByteSource {
    /// Embedded resource source.
    pub fn embedded(path: impl Into<String>) -> Self {
        ByteSource::Embedded { path: path.into() }
    }

    /// Filesystem source.
    pub fn file(path: impl Into<PathBuf>) -> Self {
        ByteSource::File { path: path.into() }
    }

    /// Human-readable location for logs.
    pub fn describe(&self) -> String {
        match self {
            ByteSource::Embedded { path } => format!("embedded:{path}"),
            ByteSource::File { path } => path.display().to_string(),
        }
    }

    /// Read the full contents of the source.
    pub fn read(&self, resources: &dyn ResourceLookup) -> Result<Vec<u8>, SourceError> {
        let bytes = match self {
            ByteSource::Embedded { path } => match resources.read_resource(path) {
                Some(bytes) => bytes,
                None => {
                    warn!(
                        resource = %path,
                        available = ?resources.resource_names(),
                        "embedded resource missing"
                    );
                    return Err(SourceError::ResourceMissing(path.clone()));
                }
            },
            ByteSource::File { path } => fs::read(path).map_err(|source| SourceError::Io {
                path: path.clone(),
                source,
            })?,
        };

        if bytes.is_empty() {
            return Err(SourceError::Empty(self.describe()));
        }
        Ok(bytes)
    }
}

/// Container kinds accepted in the external sounds directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExternalFormat {
    /// RIFF/WAVE, decodable.
    Wav,
    /// MPEG audio, discovered but not decodable.
    Mp3,
}

/// Audio file found in the external sounds directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalSound {
    /// Full path to the file.
    pub path: PathBuf,
    /// Container kind from the extension.
    pub format: ExternalFormat,
}

impl ExternalSound {
    /// File stem, lowercased.
    pub fn stem(&self) -> String {
        self.path
            .file_stem()
            .map(|s| s.to_string_lossy().to_lowercase())
            .unwrap_or_default()
    }
}

/// List `.wav`/`.mp3` files directly inside `dir`, sorted by path.
///
/// A missing directory yields an empty list.
pub fn discover_external_sounds(dir: &Path) -> Vec<ExternalSound> {
    if !dir.is_dir() {
        debug!(dir = %dir.display(), "no external sounds directory");
        return Vec::new();
    }

    let sounds: Vec<ExternalSound> = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(err) => {
                warn!(%err, "skipping unreadable entry in external sounds directory");
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .filter_map(|entry| {
            let ext = entry.path().extension()?.to_string_lossy().to_lowercase();
            let format = match ext.as_str() {
                "wav" => ExternalFormat::Wav,
                "mp3" => ExternalFormat::Mp3,
                _ => return None,
            };
            Some(ExternalSound {
                path: entry.into_path(),
                format,
            })
        })
        .collect();

    debug!(dir = %dir.display(), count = sounds.len(), "discovered external sounds");
    sounds
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_source_reads_from_lookup() {
        let mut resources = ResourceMap::new();
        resources.insert("Resources/a.wav", vec![1, 2, 3]);
        let source = ByteSource::embedded("Resources/a.wav");
        assert_eq!(source.read(&resources).unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn missing_and_empty_resources_fail() {
        let mut resources = ResourceMap::new();
        resources.insert("Resources/empty.wav", Vec::new());

        let missing = ByteSource::embedded("Resources/nope.wav").read(&resources);
        assert!(matches!(missing, Err(SourceError::ResourceMissing(p)) if p == "Resources/nope.wav"));

        let empty = ByteSource::embedded("Resources/empty.wav").read(&resources);
        assert!(matches!(empty, Err(SourceError::Empty(_))));
    }

    #[test]
    fn file_source_reports_io_errors() {
        let dir = tempfile::tempdir().unwrap();
        let source = ByteSource::file(dir.path().join("missing.wav"));
        assert!(matches!(
            source.read(&ResourceMap::new()),
            Err(SourceError::Io { .. })
        ));
    }

    #[test]
    fn resource_dir_resolves_relative_paths() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("Resources")).unwrap();
        fs::write(dir.path().join("Resources/x.wav"), b"abc").unwrap();

        let resources = ResourceDir::new(dir.path());
        assert_eq!(resources.root(), dir.path());
        assert_eq!(resources.read_resource("Resources/x.wav"), Some(b"abc".to_vec()));
        assert_eq!(resources.read_resource("Resources/y.wav"), None);
        assert_eq!(resources.resource_names(), vec!["Resources/x.wav".to_string()]);
    }

    #[test]
    fn discovers_only_audio_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b_sound.mp3"), b"x").unwrap();
        fs::write(dir.path().join("a_sound.WAV"), b"x").unwrap();
        fs::write(dir.path().join("notes.txt"), b"x").unwrap();
        fs::create_dir_all(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("nested/deep.wav"), b"x").unwrap();

        let found = discover_external_sounds(dir.path());
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].format, ExternalFormat::Wav);
        assert_eq!(found[0].stem(), "a_sound");
        assert_eq!(found[1].format, ExternalFormat::Mp3);
    }

    #[test]
    fn missing_directory_discovers_nothing() {
        let dir = tempfile::tempdir().unwrap();
        assert!(discover_external_sounds(&dir.path().join("Sounds")).is_empty());
    }
}

//! Relation sources: per-frame relations read from trial files.
//!
//! A trial file lists one binary relation per line:
//!
//! ```text
//! # frame subject predicate object [ignored...]
//! 0 pan on stove
//! 0 shell_egg in bowl
//! 1 pan on stove
//! ```
//!
//! Frames are the distinct indices present in the file, in ascending order.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::SourceError;
use crate::relation::{Frame, Relation};

pub type SourceResult<T> = std::result::Result<T, SourceError>;

/// Read-only access to the relations of one recipe trial.
pub trait RelationSource {
    /// Number of frames holding at least one relation.
    fn nb_frames(&self) -> usize;

    /// Relations at a frame index, or `None` if the frame is absent.
    fn relations_at(&self, index: u64) -> Option<&[Relation]>;

    /// Frames in ascending index order.
    fn frames(&self) -> Box<dyn Iterator<Item = (u64, &[Relation])> + '_>;

    /// The highest-indexed frame, which holds the end state of the trial.
    fn last_frame(&self) -> Option<(u64, &[Relation])> {
        self.frames().last()
    }
}

/// An in-memory relation source, usually parsed from a trial file.
#[derive(Debug, Clone, Default)]
pub struct RelationFile {
    path: Option<PathBuf>,
    frames: BTreeMap<u64, Vec<Relation>>,
}

impl RelationFile {
    /// Read and parse a trial file.
    pub fn open(path: &Path) -> SourceResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| SourceError::Read {
            path: path.display().to_string(),
            source: e,
        })?;
        let mut file = Self::parse(&content).map_err(|(line, message)| SourceError::Malformed {
            path: path.display().to_string(),
            line,
            message,
        })?;
        file.path = Some(path.to_path_buf());
        tracing::debug!(
            path = %path.display(),
            frames = file.nb_frames(),
            "loaded relation file"
        );
        Ok(file)
    }

    /// Parse trial text. Errors carry the 1-based line number.
    pub fn parse(content: &str) -> Result<Self, (usize, String)> {
        let mut frames: BTreeMap<u64, Vec<Relation>> = BTreeMap::new();
        for (i, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let fields: Vec<&str> = line.split_whitespace().collect();
            let [frame, subject, predicate, object, ..] = fields.as_slice() else {
                return Err((
                    i + 1,
                    format!("expected at least 4 fields, got {}", fields.len()),
                ));
            };
            let index: u64 = frame
                .parse()
                .map_err(|_| (i + 1, format!("frame index \"{frame}\" is not an integer")))?;
            frames
                .entry(index)
                .or_default()
                .push(Relation::binary(*subject, *predicate, *object));
        }
        Ok(Self { path: None, frames })
    }

    /// Build a source directly from frames. Later frames with a repeated index
    /// replace earlier ones.
    pub fn from_frames(frames: impl IntoIterator<Item = Frame>) -> Self {
        Self {
            path: None,
            frames: frames
                .into_iter()
                .map(|f| (f.index, f.relations))
                .collect(),
        }
    }

    /// Path this source was read from, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

impl RelationSource for RelationFile {
    fn nb_frames(&self) -> usize {
        self.frames.len()
    }

    fn relations_at(&self, index: u64) -> Option<&[Relation]> {
        self.frames.get(&index).map(Vec::as_slice)
    }

    fn frames(&self) -> Box<dyn Iterator<Item = (u64, &[Relation])> + '_> {
        Box::new(self.frames.iter().map(|(i, rels)| (*i, rels.as_slice())))
    }

    fn last_frame(&self) -> Option<(u64, &[Relation])> {
        self.frames
            .last_key_value()
            .map(|(i, rels)| (*i, rels.as_slice()))
    }
}

/// Recipe name from a trial file name following `<index>-<name>.<ext>`.
///
/// `3-boiledegg.txt` belongs to recipe `boiledegg`. A stem without `-` is its
/// own recipe name.
pub fn recipe_name(path: &Path) -> String {
    let stem = file_stem(path);
    match stem.split_once('-') {
        Some((_, name)) if !name.is_empty() => name.to_string(),
        _ => stem,
    }
}

/// File name without its extension.
pub fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Regular, non-hidden files in a folder, sorted by path.
pub fn list_files(folder: &Path) -> SourceResult<Vec<PathBuf>> {
    let entries = std::fs::read_dir(folder).map_err(|e| SourceError::ListFolder {
        path: folder.display().to_string(),
        source: e,
    })?;
    let mut files: Vec<PathBuf> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_file())
        .filter(|p| {
            !p.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with('.'))
        })
        .collect();
    files.sort();
    Ok(files)
}

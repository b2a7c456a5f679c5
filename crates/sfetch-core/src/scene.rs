//! The host side of a fetch: where loaded models end up.
//!
//! A viewer embedding sfetch implements [`Host`]. [`Scene`] is the in-process
//! implementation used by the CLI: it keeps per-object model states and atom
//! counts, which is enough to report what was loaded.

use crate::naming;
use crate::source::FileType;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SceneError {
    #[error("read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("no ATOM/HETATM records in {format} data for '{name}'")]
    NoAtoms { name: String, format: FileType },
}

/// What a load produced: object name, 1-based state index and atom count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadSummary {
    pub object: String,
    pub state: usize,
    pub atom_count: usize,
}

/// Scene operations a fetch needs from its host application.
pub trait Host {
    /// Makes `name` acceptable as an object name.
    fn legal_name(&self, name: &str) -> String {
        naming::legalize_object_name(name)
    }

    /// Loads a model from in-memory file contents.
    ///
    /// With `discrete`, loading into an existing object adds a state;
    /// otherwise the object is replaced.
    fn load_bytes(
        &mut self,
        contents: &[u8],
        name: &str,
        format: FileType,
        discrete: bool,
    ) -> Result<LoadSummary, SceneError>;

    /// Loads a model from a file on disk.
    fn load_file(
        &mut self,
        path: &Path,
        name: &str,
        format: FileType,
        discrete: bool,
    ) -> Result<LoadSummary, SceneError> {
        let contents = fs::read(path).map_err(|source| SceneError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        self.load_bytes(&contents, name, format, discrete)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SceneObject {
    pub format: FileType,
    /// Atom count of each model state, in load order.
    pub states: Vec<usize>,
}

#[derive(Debug, Default)]
pub struct Scene {
    objects: BTreeMap<String, SceneObject>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&SceneObject> {
        self.objects.get(name)
    }

    pub fn objects(&self) -> impl Iterator<Item = (&str, &SceneObject)> {
        self.objects.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

impl Host for Scene {
    fn load_bytes(
        &mut self,
        contents: &[u8],
        name: &str,
        format: FileType,
        discrete: bool,
    ) -> Result<LoadSummary, SceneError> {
        let atom_count = count_atom_records(contents);
        if atom_count == 0 {
            return Err(SceneError::NoAtoms {
                name: name.to_string(),
                format,
            });
        }

        let object = self
            .objects
            .entry(name.to_string())
            .or_insert_with(|| SceneObject {
                format,
                states: Vec::new(),
            });
        if !discrete {
            object.states.clear();
        }
        object.format = format;
        object.states.push(atom_count);

        tracing::debug!(
            "loaded {} atoms into '{}' state {}",
            atom_count,
            name,
            object.states.len()
        );
        Ok(LoadSummary {
            object: name.to_string(),
            state: object.states.len(),
            atom_count,
        })
    }
}

/// Counts `ATOM`/`HETATM` records. mmCIF `_atom_site` rows start with the
/// same group tokens, so the count holds for both formats.
pub fn count_atom_records(contents: &[u8]) -> usize {
    contents
        .split(|&b| b == b'\n')
        .filter(|line| line.starts_with(b"ATOM") || line.starts_with(b"HETATM"))
        .count()
}

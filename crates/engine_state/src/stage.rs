//! Persistent object store.
//!
//! The application keeps windows, workspaces, screens, areas and scenes as
//! prims on a stage. The window manager only needs a handful of operations
//! from it: path-addressed attribute access, relationship targets, loading
//! state and a dirty flag. [`Stage`] is that surface; [`MemoryStage`] is the
//! in-process implementation used by background sessions and tests.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::path::PrimPath;

#[derive(Debug, Error)]
pub enum StageError {
    #[error("No prim at {0}")]
    MissingPrim(PrimPath),

    #[error("Stage has no file to save to")]
    NoFilePath,

    #[error("Failed to write stage to {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read stage from {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to encode stage: {0}")]
    Encode(#[from] toml::ser::Error),

    #[error("Failed to decode stage: {0}")]
    Decode(#[from] toml::de::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Token(String),
    Int2([i32; 2]),
}

impl AttrValue {
    pub fn as_token(&self) -> Option<&str> {
        match self {
            AttrValue::Token(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_int2(&self) -> Option<[i32; 2]> {
        match self {
            AttrValue::Int2(v) => Some(*v),
            _ => None,
        }
    }
}

pub trait Stage {
    fn has_prim(&self, path: &PrimPath) -> bool;

    /// Defines a prim (and any missing ancestors). Redefining keeps existing data.
    fn define_prim(&mut self, path: &PrimPath, type_name: &str);

    fn remove_prim(&mut self, path: &PrimPath);

    fn attribute(&self, path: &PrimPath, name: &str) -> Option<AttrValue>;

    fn set_attribute(&mut self, path: &PrimPath, name: &str, value: AttrValue) -> Result<(), StageError>;

    fn relationship_targets(&self, path: &PrimPath, name: &str) -> Vec<PrimPath>;

    fn add_relationship_target(&mut self, path: &PrimPath, name: &str, target: PrimPath) -> Result<(), StageError>;

    /// Unloads a prim's payload without deleting its definition.
    fn unload(&mut self, path: &PrimPath);

    fn is_loaded(&self, path: &PrimPath) -> bool;

    fn is_dirty(&self) -> bool;

    fn save(&mut self) -> Result<(), StageError>;
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct Prim {
    type_name: String,
    #[serde(default)]
    attributes: BTreeMap<String, AttrValue>,
    #[serde(default)]
    relationships: BTreeMap<String, Vec<PrimPath>>,
    #[serde(skip)]
    unloaded: bool,
}

/// In-memory stage, optionally backed by a TOML file for saving.
#[derive(Debug, Default)]
pub struct MemoryStage {
    prims: BTreeMap<PrimPath, Prim>,
    file_path: Option<PathBuf>,
    dirty: bool,
}

impl MemoryStage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage backed by `path`, loaded from it when the file already exists.
    ///
    /// A loaded stage starts clean.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StageError> {
        let path = path.into();
        if !path.exists() {
            return Ok(Self::new().with_file_path(path));
        }

        let text = std::fs::read_to_string(&path).map_err(|source| StageError::Read {
            path: path.clone(),
            source,
        })?;
        let decoded: BTreeMap<String, Prim> = toml::from_str(&text)?;
        let prims = decoded
            .into_iter()
            .map(|(p, prim)| (PrimPath::new(p), prim))
            .collect::<BTreeMap<_, _>>();
        tracing::info!("Loaded {} prims from {}", prims.len(), path.display());
        Ok(Self {
            prims,
            file_path: Some(path),
            dirty: false,
        })
    }

    pub fn with_file_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.file_path = Some(path.into());
        self
    }

    pub fn file_path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }

    pub fn prim_count(&self) -> usize {
        self.prims.len()
    }

    /// Clears the dirty flag without writing, used after building default content.
    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    fn prim_mut(&mut self, path: &PrimPath) -> Result<&mut Prim, StageError> {
        self.prims
            .get_mut(path)
            .ok_or_else(|| StageError::MissingPrim(path.clone()))
    }
}

impl Stage for MemoryStage {
    fn has_prim(&self, path: &PrimPath) -> bool {
        self.prims.contains_key(path)
    }

    fn define_prim(&mut self, path: &PrimPath, type_name: &str) {
        let mut cursor = path.parent();
        while let Some(ancestor) = cursor {
            if ancestor.is_root() {
                break;
            }
            self.prims.entry(ancestor.clone()).or_default();
            cursor = ancestor.parent();
        }
        let prim = self.prims.entry(path.clone()).or_default();
        if prim.type_name.is_empty() {
            prim.type_name = type_name.to_owned();
        }
        self.dirty = true;
    }

    fn remove_prim(&mut self, path: &PrimPath) {
        let before = self.prims.len();
        self.prims.retain(|p, _| !p.has_prefix(path));
        if self.prims.len() != before {
            self.dirty = true;
        }
    }

    fn attribute(&self, path: &PrimPath, name: &str) -> Option<AttrValue> {
        self.prims.get(path)?.attributes.get(name).cloned()
    }

    fn set_attribute(&mut self, path: &PrimPath, name: &str, value: AttrValue) -> Result<(), StageError> {
        self.prim_mut(path)?.attributes.insert(name.to_owned(), value);
        self.dirty = true;
        Ok(())
    }

    fn relationship_targets(&self, path: &PrimPath, name: &str) -> Vec<PrimPath> {
        self.prims
            .get(path)
            .and_then(|p| p.relationships.get(name))
            .cloned()
            .unwrap_or_default()
    }

    fn add_relationship_target(&mut self, path: &PrimPath, name: &str, target: PrimPath) -> Result<(), StageError> {
        let targets = self
            .prim_mut(path)?
            .relationships
            .entry(name.to_owned())
            .or_default();
        if !targets.contains(&target) {
            targets.push(target);
        }
        self.dirty = true;
        Ok(())
    }

    fn unload(&mut self, path: &PrimPath) {
        match self.prims.get_mut(path) {
            Some(prim) => prim.unloaded = true,
            None => tracing::debug!("Unload of missing prim {path} ignored"),
        }
    }

    fn is_loaded(&self, path: &PrimPath) -> bool {
        self.prims.get(path).is_some_and(|p| !p.unloaded)
    }

    fn is_dirty(&self) -> bool {
        self.dirty
    }

    fn save(&mut self) -> Result<(), StageError> {
        let path = self.file_path.clone().ok_or(StageError::NoFilePath)?;
        let encoded: BTreeMap<String, &Prim> = self
            .prims
            .iter()
            .map(|(p, prim)| (p.to_string(), prim))
            .collect();
        let text = toml::to_string_pretty(&encoded)?;
        let io_err = |source| StageError::Io {
            path: path.clone(),
            source,
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        std::fs::write(&path, text).map_err(io_err)?;
        tracing::info!("Saved stage to {}", path.display());
        self.dirty = false;
        Ok(())
    }
}

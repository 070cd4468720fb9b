//! Persistence lifecycle: load, save, reload.
//!
//! A [`Persister`] binds one object to one file and owns the degraded-default
//! and atomic-write semantics. Callers normally hold a [`Persistent<T>`],
//! which couples the loaded instance with its persister and derefs to the
//! instance.
//!
//! The degradation policy in one place:
//!
//! - missing file: `load_initial` creates it from defaults, `reload` no-ops;
//! - empty or data-free file: defaults/current values kept, file untouched;
//! - unparseable file: logged, defaults/current values kept, file untouched;
//! - single bad field: logged, that field keeps its prior value, the rest of
//!   the document still loads;
//! - save-path I/O failure: surfaced as one [`PersistError`], and the target
//!   file is never left half-written because all writes land in a sibling
//!   temp file that is renamed over the target only once complete.

use std::{
    fs,
    ops::{Deref, DerefMut},
    path::{Path, PathBuf},
    sync::Arc,
};

use log::{debug, warn};
use serde_json::{Map, Value};

use crate::{
    backend::{DocComments, DocumentBackend, KeyDocs},
    coerce,
    error::{PersistError, Result},
    object::Persisted,
    walker,
};

/// Rendering mode for saved documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SaveMode {
    /// Minimal values-only dump.
    #[default]
    Simple,
    /// Class header, per-field documentation and group separators.
    Decorated,
}

/// One key paired with its current value and documentation for a write pass.
///
/// Rebuilt on every save, never persisted.
#[derive(Debug, Clone)]
pub struct ConfigOption {
    /// Resolved document key.
    pub key: String,
    /// Current field value.
    pub value: Value,
    /// Documentation lines for decorated rendering.
    pub docs: Vec<String>,
    /// Whether the key starts a new logical group.
    pub group_start: bool,
}

/// Lifecycle controller for one (object, file) pair.
#[derive(Debug, Clone)]
pub struct Persister {
    path: PathBuf,
    backend: Arc<dyn DocumentBackend>,
    mode: SaveMode,
}

impl Persister {
    pub(crate) fn new(path: PathBuf, backend: Arc<dyn DocumentBackend>, mode: SaveMode) -> Self {
        Self {
            path,
            backend,
            mode,
        }
    }

    /// Target file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Save rendering mode chosen at load time.
    pub fn mode(&self) -> SaveMode {
        self.mode
    }

    /// Encode the object and atomically replace the target file.
    pub fn save(&self, object: &dyn Persisted) -> Result<()> {
        let (tree, docs) = collect(object);
        let text = match self.mode {
            SaveMode::Simple => self.backend.encode_simple(&tree)?,
            SaveMode::Decorated => self.backend.encode_decorated(&tree, &docs)?,
        };
        write_atomic(&self.path, text.as_bytes())
    }

    /// Populate the object in place from the file, if it holds data.
    ///
    /// Missing, empty, and unparseable files leave the object's current
    /// values untouched; only a successful population runs `after_load`.
    pub fn reload(&self, object: &mut dyn Persisted) -> Result<()> {
        if !self.path.exists() {
            debug!("{} does not exist, keeping in-memory values", self.path.display());
            return Ok(());
        }
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) => {
                warn!("cannot read {}: {err}", self.path.display());
                return Ok(());
            }
        };
        match self.backend.decode(&bytes) {
            Ok(Some(Value::Object(map))) if !map.is_empty() => {
                populate(object, &map);
                object.after_load();
            }
            Ok(Some(Value::Object(_))) | Ok(None) => {
                debug!("{} holds no data, keeping in-memory values", self.path.display());
            }
            Ok(Some(other)) => {
                warn!(
                    "{}: document root is {other}, expected a table; keeping in-memory values",
                    self.path.display()
                );
            }
            Err(err) => {
                warn!(
                    "cannot decode {} as {}: {err}; keeping in-memory values",
                    self.path.display(),
                    self.backend.name()
                );
            }
        }
        Ok(())
    }
}

/// A persisted instance coupled with the persister that loaded it.
///
/// Derefs to the instance, so field access reads naturally. Constructed
/// either by [`BackendRegistry::load_initial`](crate::BackendRegistry::load_initial)
/// (bound) or by [`Persistent::detached`] (unbound; `save`/`reload` fail
/// with [`PersistError::NotInitialized`] until the instance goes through
/// `load_initial`).
#[derive(Debug)]
pub struct Persistent<T: Persisted> {
    value: T,
    persister: Option<Persister>,
}

impl<T: Persisted> Persistent<T> {
    /// Wrap an instance with no file binding.
    pub fn detached(value: T) -> Self {
        Self {
            value,
            persister: None,
        }
    }

    pub(crate) fn bound(value: T, persister: Persister) -> Self {
        Self {
            value,
            persister: Some(persister),
        }
    }

    /// The persister this instance is bound to, if it was loaded.
    pub fn persister(&self) -> Option<&Persister> {
        self.persister.as_ref()
    }

    /// Save the instance to its bound file.
    pub fn save(&self) -> Result<()> {
        let persister = self.persister.as_ref().ok_or(PersistError::NotInitialized)?;
        persister.save(&self.value)
    }

    /// Re-read the bound file into the instance.
    pub fn reload(&mut self) -> Result<()> {
        let persister = self.persister.as_ref().ok_or(PersistError::NotInitialized)?;
        persister.reload(&mut self.value)
    }

    /// Unwrap the instance, dropping the binding.
    pub fn into_inner(self) -> T {
        self.value
    }
}

impl<T: Persisted> Deref for Persistent<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.value
    }
}

impl<T: Persisted> DerefMut for Persistent<T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.value
    }
}

/// Assign decoded values into the object, depth-first through sections.
///
/// Individual field failures are absorbed: the field keeps its prior value
/// and the rest of the document still loads.
pub(crate) fn populate(object: &mut dyn Persisted, map: &Map<String, Value>) {
    let layout = walker::layout(object);

    for field in &layout.plain {
        let Some(raw) = map.get(field.key()) else {
            continue;
        };
        let value = coerce::coerce(raw.clone(), field.kind());
        if let Err(err) = object.set(field.key(), value) {
            warn!("field {:?} keeps its previous value: {err}", field.key());
        }
    }

    for field in &layout.sections {
        match map.get(field.section_name()) {
            None => {}
            Some(Value::Object(sub)) => match object.section_mut(field.key()) {
                Some(child) => populate(child, sub),
                None => warn!(
                    "no nested object registered for section field {:?}, ignoring",
                    field.key()
                ),
            },
            Some(other) => warn!(
                "section {:?} holds {other}, expected a table; ignoring",
                field.section_name()
            ),
        }
    }
}

/// Read the object's current state into a value tree plus its decoration.
pub(crate) fn collect(object: &dyn Persisted) -> (Value, DocComments) {
    let layout = walker::layout(object);
    let mut map = Map::new();
    let mut docs = DocComments {
        header: object.header_docs(),
        entries: Vec::new(),
    };

    let mut options: Vec<ConfigOption> = Vec::new();
    for field in &layout.plain {
        let Some(value) = object.get(field.key()) else {
            continue;
        };
        if value.is_null() {
            // Null has no TOML rendering; an omitted key falls back to the
            // field's default on the next load.
            continue;
        }
        options.push(ConfigOption {
            key: field.key().to_string(),
            value,
            docs: field.doc_lines().to_vec(),
            group_start: field.starts_group(),
        });
    }
    for option in options {
        docs.entries.push(KeyDocs {
            key: option.key.clone(),
            lines: option.docs,
            group_start: option.group_start,
            nested: None,
        });
        map.insert(option.key, option.value);
    }

    for field in &layout.sections {
        let Some(child) = object.section(field.key()) else {
            warn!(
                "no nested object registered for section field {:?}, omitting",
                field.key()
            );
            continue;
        };
        let (sub_tree, mut sub_docs) = collect(child);
        // The class header renders at the document root only.
        sub_docs.header.clear();
        docs.entries.push(KeyDocs {
            key: field.section_name().to_string(),
            lines: field.doc_lines().to_vec(),
            group_start: field.starts_group(),
            nested: Some(sub_docs),
        });
        map.insert(field.section_name().to_string(), sub_tree);
    }

    (Value::Object(map), docs)
}

/// Write bytes to a sibling temp file, then rename it over the target.
///
/// The temp file lives in the target's directory so the rename stays on one
/// filesystem. A drop guard removes the temp file on every exit path; after
/// a successful rename the removal is a no-op.
fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|err| PersistError::io(parent, err))?;
        }
    }

    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "config".to_string());
    let tmp = path.with_file_name(format!(".{file_name}.tmp"));

    let _guard = TempGuard(tmp.clone());
    fs::write(&tmp, bytes).map_err(|err| PersistError::io(&tmp, err))?;
    fs::rename(&tmp, path).map_err(|err| PersistError::io(path, err))?;
    Ok(())
}

struct TempGuard(PathBuf);

impl Drop for TempGuard {
    fn drop(&mut self) {
        // Best-effort; a failed removal must not mask the real outcome.
        let _ = fs::remove_file(&self.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_atomic_creates_parents_and_replaces() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deep/nested/config.toml");

        write_atomic(&path, b"a = 1\n").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "a = 1\n");

        write_atomic(&path, b"a = 2\n").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "a = 2\n");

        // No temp file left behind.
        let stray: Vec<_> = fs::read_dir(path.parent().unwrap())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(stray.is_empty());
    }
}

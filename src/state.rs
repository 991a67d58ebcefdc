//! State Module
//!
//! The owned state store that coordinates the tree and its JSON mirror.
//!
//! ## Responsibilities
//! - Build the tree from a JSON snapshot or from the default skeleton
//! - Serialize mutations and keep the mirror in step with the tree
//! - Route validated requests to the variable operations
//! - Save snapshots and dump the tree to the debug directory

use std::fs;
use std::path::{Path, PathBuf};

use parking_lot::{Mutex, RwLock};
use serde_json::{json, Map, Value};

use crate::config::{path_string, Config};
use crate::error::{Result, StateError};
use crate::ops::{self, ReplaceReport, Replacement, SetPayload};
use crate::protocol::{Operator, VarRequest};
use crate::tree::Tree;

/// The process state: one tree plus its JSON mirror
///
/// ## Concurrency Model: Single-Writer / Multiple-Reader (SWMR)
///
/// - **Writes** (set/valueReplace/substitute): Serialized by `write_lock`
///   - Only ONE mutation at a time
///   - Must acquire: write_lock → tree (write) → mirror (write)
///   - Readers never see a half-merged structured `set`
///
/// - **Reads** (get/snapshot): Concurrent
///   - No write_lock needed
///   - Tree and mirror each sit behind an RwLock
pub struct StateStore {
    /// Store configuration
    config: Config,

    /// The state tree every operation acts on
    tree: RwLock<Tree>,

    /// Plain JSON copy of the tree, re-exported after every mutation
    mirror: RwLock<Value>,

    /// Serializes mutations
    write_lock: Mutex<()>,
}

impl StateStore {
    // =========================================================================
    // Well-known Paths
    // =========================================================================
    pub const NAME_PATH: &'static str = "/this/name";
    pub const DEBUG_DIR_PATH: &'static str = "/this/debugToDir";

    /// Open a store with the given config
    ///
    /// On startup:
    /// 1. Load the snapshot named by `config_file_load`, if it exists
    /// 2. Otherwise seed the default `/this` skeleton
    /// 3. Build the tree and its mirror from the resulting state
    /// 4. Create the debug directory if one is configured
    pub fn open(config: Config) -> Result<Self> {
        // Step 1 + 2: Pick the initial state
        let initial = match Self::load_snapshot(&config)? {
            Some(snapshot) => snapshot,
            None => Self::default_state(&config),
        };

        // Step 3: Materialize the tree; the mirror is always the tree's export
        let tree = Tree::from_json(&initial).map_err(|e| StateError::ConfigLoad(e.to_string()))?;
        let mirror = tree.to_json();

        // Step 4: Debug directory, as recorded in the tree
        if let Ok(dir) = tree.cat(Self::DEBUG_DIR_PATH) {
            if !dir.is_empty() && !Path::new(&dir).exists() {
                tracing::info!("Creating debug directory {}", dir);
                fs::create_dir_all(&dir)?;
            }
        }

        tracing::info!("State tree ready with {} leaves", tree.leaf_count());

        Ok(Self {
            config,
            tree: RwLock::new(tree),
            mirror: RwLock::new(mirror),
            write_lock: Mutex::new(()),
        })
    }

    /// Open from a snapshot file (convenience method)
    ///
    /// Uses default config with the specified load path
    pub fn open_snapshot(path: &Path) -> Result<Self> {
        Self::open(Config::builder().config_file_load(path).build())
    }

    /// The default state skeleton for a config
    pub fn default_state(config: &Config) -> Value {
        json!({
            "this": {
                "name": config.name,
                "version": config.version,
                "desc": config.desc,
                "verbosity": config.verbosity.to_string(),
                "debugToDir": path_string(&config.debug_to_dir),
                "configFileLoad": path_string(&config.config_file_load),
                "configFileSave": path_string(&config.config_file_save),
                "args": config.launch_args(),
            }
        })
    }

    /// Read the configured snapshot.
    ///
    /// `Ok(None)` when no load path is set or the file does not exist.
    fn load_snapshot(config: &Config) -> Result<Option<Value>> {
        let path = match &config.config_file_load {
            Some(path) if !path.as_os_str().is_empty() => path,
            _ => return Ok(None),
        };

        if !path.is_file() {
            tracing::warn!(
                "Snapshot {} not found, starting from defaults",
                path.display()
            );
            return Ok(None);
        }

        let text = fs::read_to_string(path)?;
        let snapshot: Value = serde_json::from_str(&text)
            .map_err(|e| StateError::ConfigLoad(format!("{}: {}", path.display(), e)))?;

        if !snapshot.is_object() {
            return Err(StateError::ConfigLoad(format!(
                "{}: top level must be a JSON object",
                path.display()
            )));
        }

        tracing::info!("Loaded state snapshot from {}", path.display());
        Ok(Some(snapshot))
    }

    // =========================================================================
    // Operations
    // =========================================================================

    /// Execute a validated request
    ///
    /// Routes the operator to its handler and returns the result mapping
    pub fn execute(&self, request: &VarRequest) -> Result<Value> {
        match &request.op {
            Operator::Get => Ok(Value::Object(self.get(&request.var)?)),
            Operator::Set(payload) => Ok(Value::Object(self.set(&request.var, payload)?)),
            Operator::ValueReplace(replacement) => {
                let report = self.value_replace(&request.var, replacement)?;
                Ok(serde_json::to_value(report)?)
            }
        }
    }

    /// Read a leaf or directory
    pub fn get(&self, var: &str) -> Result<Map<String, Value>> {
        let tree = self.tree.read();
        ops::get(&tree, var)
    }

    /// Write a scalar or merge a structure
    pub fn set(&self, var: &str, payload: &SetPayload) -> Result<Map<String, Value>> {
        self.mutate(|tree| ops::set(tree, var, payload))
    }

    /// Rewrite every leaf equal to `target`
    pub fn value_replace(&self, target: &str, replacement: &Replacement) -> Result<ReplaceReport> {
        self.mutate(|tree| ops::value_replace(tree, target, replacement))
    }

    /// Replace a substring inside one leaf
    pub fn substitute(&self, path: &str, target: &str, new_value: &str) -> Result<String> {
        self.mutate(|tree| ops::substitute(tree, path, target, new_value))
    }

    /// Run a mutation with the write lock held, then refresh the mirror.
    ///
    /// The mirror is refreshed even when the mutation fails, since partial
    /// writes stay applied to the tree.
    fn mutate<R>(&self, apply: impl FnOnce(&mut Tree) -> Result<R>) -> Result<R> {
        let _write_guard = self.write_lock.lock();

        let mut tree = self.tree.write();
        let result = apply(&mut *tree);
        *self.mirror.write() = tree.to_json();

        result
    }

    // =========================================================================
    // Persistence
    // =========================================================================

    /// The mirror as JSON
    pub fn snapshot(&self) -> Value {
        self.mirror.read().clone()
    }

    /// Write the mirror to `path` as pretty JSON
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(&*self.mirror.read())?;

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, json)?;

        tracing::info!("Saved state snapshot to {}", path.display());
        Ok(())
    }

    /// Save to `config_file_save`, if one is configured
    pub fn save_configured(&self) -> Result<Option<PathBuf>> {
        match &self.config.config_file_save {
            Some(path) if !path.as_os_str().is_empty() => {
                self.save(path)?;
                Ok(Some(path.clone()))
            }
            _ => Ok(None),
        }
    }

    /// Copy the whole tree onto disk under the debug directory.
    ///
    /// The directory is read from `/this/debugToDir`, so a `set` on that
    /// leaf redirects later dumps. Returns the directory and file count.
    pub fn dump_debug(&self) -> Result<Option<(PathBuf, usize)>> {
        let tree = self.tree.read();
        let dir = match tree.cat(Self::DEBUG_DIR_PATH) {
            Ok(dir) if !dir.is_empty() => PathBuf::from(dir),
            _ => return Ok(None),
        };

        let written = tree.write_to_disk("/", &dir)?;
        tracing::debug!("Dumped {} leaves to {}", written, dir.display());
        Ok(Some((dir, written)))
    }

    // =========================================================================
    // Accessors (for testing and debugging)
    // =========================================================================

    /// Run a closure against the tree under the read lock
    pub fn with_tree<R>(&self, read: impl FnOnce(&Tree) -> R) -> R {
        let tree = self.tree.read();
        read(&*tree)
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }
}

//! Configuration for statetree
//!
//! Run metadata and launch parameters. The values seed the `/this` branch
//! of a freshly built state tree.

use std::collections::BTreeMap;
use std::path::PathBuf;

/// Main configuration for a state store instance
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Run Metadata
    // -------------------------------------------------------------------------
    /// Service name, stored at `/this/name`
    pub name: String,

    /// Service version, stored at `/this/version`
    pub version: String,

    /// Free-form description, stored at `/this/desc`
    pub desc: String,

    /// Diagnostic verbosity, stored at `/this/verbosity`
    pub verbosity: u8,

    // -------------------------------------------------------------------------
    // File Configuration
    // -------------------------------------------------------------------------
    /// Directory the tree is dumped into for debugging (created on open)
    pub debug_to_dir: Option<PathBuf>,

    /// JSON snapshot to initialize from; replaces the default skeleton
    pub config_file_load: Option<PathBuf>,

    /// JSON snapshot to write the state to on save
    pub config_file_save: Option<PathBuf>,

    // -------------------------------------------------------------------------
    // Launch Parameters
    // -------------------------------------------------------------------------
    /// Extra launch parameters, stored verbatim under `/this/args`
    pub args: BTreeMap<String, String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            name: "statetree".to_string(),
            version: crate::VERSION.to_string(),
            desc: String::new(),
            verbosity: 0,
            debug_to_dir: None,
            config_file_load: None,
            config_file_save: None,
            args: BTreeMap::new(),
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Every launch parameter rendered as strings.
    ///
    /// Named settings keep their `str_` keys; extra args never shadow them.
    pub fn launch_args(&self) -> BTreeMap<String, String> {
        let mut args = BTreeMap::new();
        args.insert("verbosity".to_string(), self.verbosity.to_string());
        args.insert("str_desc".to_string(), self.desc.clone());
        args.insert("str_debugToDir".to_string(), path_string(&self.debug_to_dir));
        args.insert("str_configFileLoad".to_string(), path_string(&self.config_file_load));
        args.insert("str_configFileSave".to_string(), path_string(&self.config_file_save));
        for (key, value) in &self.args {
            args.entry(key.clone()).or_insert_with(|| value.clone());
        }
        args
    }
}

/// Render an optional path the way the tree stores it (empty when unset)
pub(crate) fn path_string(path: &Option<PathBuf>) -> String {
    path.as_ref()
        .map(|p| p.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the service name
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.config.name = name.into();
        self
    }

    /// Set the service version
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.config.version = version.into();
        self
    }

    /// Set the description
    pub fn desc(mut self, desc: impl Into<String>) -> Self {
        self.config.desc = desc.into();
        self
    }

    /// Set the verbosity level
    pub fn verbosity(mut self, verbosity: u8) -> Self {
        self.config.verbosity = verbosity;
        self
    }

    /// Set the debug dump directory
    pub fn debug_to_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.debug_to_dir = Some(path.into());
        self
    }

    /// Set the snapshot to load on open
    pub fn config_file_load(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.config_file_load = Some(path.into());
        self
    }

    /// Set the snapshot to write on save
    pub fn config_file_save(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.config_file_save = Some(path.into());
        self
    }

    /// Add one extra launch parameter
    pub fn arg(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.args.insert(key.into(), value.into());
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}

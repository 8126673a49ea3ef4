//! Coordinator options
//!
//! Resolved in three layers: built-in defaults, an optional config file
//! named by `CHAIN_CORE_CONFIG_FILE`, then `CHAIN_CORE_*` environment
//! variables (a `.env` file is loaded first when present).

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

use crate::shared::constants::{CONFIG_FILE_ENV, ENV_PREFIX, NAMES_SUPPORTED_CHAIN_NAMESPACES};
use crate::shared::error::CoordinatorError;
use crate::shared::types::ChainNamespace;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CoordinatorOptions {
    /// Networks may be switched from inside the app
    pub enable_network_switch: bool,
    /// Networks the app does not request may still be switched to
    pub allow_unsupported_chain: bool,
    /// Basic pairing mode; chain changes from the wallet are taken as-is
    pub wc_basic: bool,
    /// Where `FileStorage` keeps the active selection, memory when unset
    pub storage_path: Option<PathBuf>,
    pub names_supported_namespaces: Vec<ChainNamespace>,
}

impl Default for CoordinatorOptions {
    fn default() -> Self {
        Self {
            enable_network_switch: true,
            allow_unsupported_chain: false,
            wc_basic: false,
            storage_path: None,
            names_supported_namespaces: NAMES_SUPPORTED_CHAIN_NAMESPACES.to_vec(),
        }
    }
}

impl CoordinatorOptions {
    /// Load options from `.env`, the optional config file and the environment
    pub fn load() -> Result<Self, CoordinatorError> {
        dotenv::dotenv().ok();
        let file = env::var(CONFIG_FILE_ENV).ok().map(PathBuf::from);
        Self::load_from(file.as_deref())
    }

    pub fn load_from(file: Option<&Path>) -> Result<Self, CoordinatorError> {
        let mut builder = Config::builder();
        if let Some(path) = file {
            log::info!("Loading coordinator options from {}", path.display());
            builder = builder.add_source(File::from(path).required(true));
        }
        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("names_supported_namespaces"),
        );

        let options: CoordinatorOptions = builder.build()?.try_deserialize()?;
        log::debug!("Resolved coordinator options: {:?}", options);
        Ok(options)
    }

    pub fn with_network_switch(mut self, enabled: bool) -> Self {
        self.enable_network_switch = enabled;
        self
    }

    pub fn with_unsupported_chain(mut self, allowed: bool) -> Self {
        self.allow_unsupported_chain = allowed;
        self
    }

    pub fn with_wc_basic(mut self, wc_basic: bool) -> Self {
        self.wc_basic = wc_basic;
        self
    }

    pub fn with_storage_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.storage_path = Some(path.into());
        self
    }

    /// Switching to a network the app never requested is allowed
    pub fn permits_unsupported_switch(&self) -> bool {
        self.allow_unsupported_chain && self.enable_network_switch
    }
}

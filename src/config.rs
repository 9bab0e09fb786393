// SPDX-FileCopyrightText: 2025 UnionTech Software Technology Co., Ltd.
//
// SPDX-License-Identifier: MIT

// Configuration file format (INI):
//
// [main]
// podirectory = /srv/pootle/po
// state_file = /var/lib/transtree/state.json
// parse_pool_size = 40
// diff_strategy = semantic
// log_level = info

use std::{fs, path::{Path, PathBuf}};
use clap::ValueEnum;
use configparser::ini::Ini;
use directories::ProjectDirs;
use thiserror::Error as TeError;
use tracing::Level;

use crate::highlight::DiffStrategy;
use crate::terminology::DEFAULT_PARSE_POOL_SIZE;

const MAIN_SECTION: &str = "main";

#[derive(TeError, Debug)]
pub enum ConfigLoadError {
    #[error("Config file {0:?} not found")]
    FileNotFound(PathBuf),
    #[error("Can not read config file {0:?}: {1}")]
    ReadFile(PathBuf, #[source] std::io::Error),
    #[error("Fail to parse config file: {0}")]
    ParseError(String),
    #[error("Invalid value {value:?} for key {key}")]
    InvalidValue { key: &'static str, value: String },
    #[error("Not able to get project directories")]
    NoProjectDirs,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Translation root holding one directory per project.
    pub podirectory: PathBuf,
    pub state_file: PathBuf,
    /// Capacity of the terminology matcher cache.
    pub parse_pool_size: usize,
    pub diff_strategy: DiffStrategy,
    pub log_level: Level,
}

impl Settings {
    fn with_base_dir(base: &Path) -> Self {
        Settings {
            podirectory: base.join("po"),
            state_file: base.join("state.json"),
            parse_pool_size: DEFAULT_PARSE_POOL_SIZE,
            diff_strategy: DiffStrategy::default(),
            log_level: Level::INFO,
        }
    }

    pub fn from_str(content: &str, base: &Path) -> Result<Self, ConfigLoadError> {
        let mut config = Ini::new();
        config.read(content.to_string())
            .map_err(ConfigLoadError::ParseError)?;
        let mut settings = Self::with_base_dir(base);

        if let Some(podirectory) = config.get(MAIN_SECTION, "podirectory") {
            settings.podirectory = base.join(podirectory);
        }
        if let Some(state_file) = config.get(MAIN_SECTION, "state_file") {
            settings.state_file = base.join(state_file);
        }
        if let Some(size) = config.get(MAIN_SECTION, "parse_pool_size") {
            settings.parse_pool_size = size.parse()
                .ok()
                .filter(|size| *size > 0)
                .ok_or(ConfigLoadError::InvalidValue { key: "parse_pool_size", value: size })?;
        }
        if let Some(strategy) = config.get(MAIN_SECTION, "diff_strategy") {
            settings.diff_strategy = DiffStrategy::from_str(&strategy, true)
                .map_err(|_| ConfigLoadError::InvalidValue { key: "diff_strategy", value: strategy })?;
        }
        if let Some(level) = config.get(MAIN_SECTION, "log_level") {
            settings.log_level = level.parse()
                .map_err(|_| ConfigLoadError::InvalidValue { key: "log_level", value: level })?;
        }
        Ok(settings)
    }

    /// Relative paths in the file resolve against the file's directory.
    pub fn load(config_file: &Path) -> Result<Self, ConfigLoadError> {
        if !config_file.is_file() {
            return Err(ConfigLoadError::FileNotFound(config_file.to_path_buf()));
        }
        let content = fs::read_to_string(config_file)
            .map_err(|e| ConfigLoadError::ReadFile(config_file.to_path_buf(), e))?;
        let base = config_file.parent().unwrap_or(Path::new("."));
        Self::from_str(&content, base)
    }

    /// Load `config_file`, or `transtree.ini` in the user config directory when not given.
    ///
    /// Without any config file, data lives in the user data directory.
    pub fn locate(config_file: Option<&Path>) -> Result<Self, ConfigLoadError> {
        if let Some(config_file) = config_file {
            return Self::load(config_file);
        }
        let xdg_proj_dirs = ProjectDirs::from("", "", "transtree").ok_or(ConfigLoadError::NoProjectDirs)?;
        let default_file = xdg_proj_dirs.config_dir().join("transtree.ini");
        if default_file.is_file() {
            Self::load(&default_file)
        } else {
            Ok(Self::with_base_dir(xdg_proj_dirs.data_dir()))
        }
    }
}

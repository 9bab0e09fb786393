// SPDX-FileCopyrightText: 2025 UnionTech Software Technology Co., Ltd.
//
// SPDX-License-Identifier: MIT

pub mod check;
pub mod diff;
pub mod initdb;
pub mod manage;
pub mod stats;
pub mod terms;
pub mod unit;
pub mod update;

pub use self::check::subcmd_check;
pub use self::diff::subcmd_diff;
pub use self::initdb::subcmd_initdb;
pub use self::manage::{subcmd_add_language, subcmd_add_project, subcmd_delete_tp};
pub use self::stats::subcmd_stats;
pub use self::terms::subcmd_terms;
pub use self::unit::subcmd_unit;
pub use self::update::{subcmd_sync_stores, subcmd_update_stores};

use std::collections::HashSet;
use thiserror::Error as TeError;

use crate::config::Settings;
use crate::database::{Database, DbError};
use crate::i18n_file::DiskFileIo;
use crate::models::Id;
use crate::registry::Registry;
use crate::terminology::MatcherCache;

#[derive(TeError, Debug)]
pub enum ContextError {
    #[error("Fail to load the database: {0}")]
    Load(#[source] DbError),
    #[error("Fail to save the database: {0}")]
    Save(#[source] DbError),
}

/// Everything a subcommand needs: settings, the loaded database and the matcher cache.
pub struct Context {
    pub settings: Settings,
    pub db: Database,
    term_cache: MatcherCache,
}

impl Context {
    pub fn load(settings: Settings) -> Result<Self, ContextError> {
        let db = Database::load_or_default(&settings.state_file).map_err(ContextError::Load)?;
        let term_cache = MatcherCache::new(settings.parse_pool_size);
        Ok(Context { settings, db, term_cache })
    }

    pub fn registry(&mut self) -> Registry<'_> {
        Registry::new(&mut self.db, &self.settings.podirectory, &DiskFileIo, &self.term_cache)
    }

    pub fn save(&self) -> Result<(), ContextError> {
        self.db.save(&self.settings.state_file).map_err(ContextError::Save)
    }
}

/// Live translation projects of enabled projects, restricted to the given codes when not empty.
pub fn select_translation_projects(db: &Database, languages: &[String], projects: &[String]) -> Vec<Id> {
    let disabled: HashSet<Id> = db.disabled_translation_projects().map(|tp| tp.id).collect();
    db.live_translation_projects()
        .filter(|tp| !disabled.contains(&tp.id))
        .filter(|tp| {
            let language_ok = languages.is_empty()
                || db.languages.get(&tp.language_id).is_some_and(|l| languages.contains(&l.code));
            let project_ok = projects.is_empty()
                || db.projects.get(&tp.project_id).is_some_and(|p| projects.contains(&p.code));
            language_ok && project_ok
        })
        .map(|tp| tp.id)
        .collect()
}

#[derive(TeError, Debug)]
pub enum LookupError {
    #[error("Language {0:?} does not exist")]
    UnknownLanguage(String),
    #[error("Project {0:?} does not exist")]
    UnknownProject(String),
    #[error("There is no translation project for language {0:?} in project {1:?}")]
    NoTranslationProject(String, String),
    #[error("There is no store at {0:?}")]
    UnknownStore(String),
    #[error("Store {0:?} has no unit at index {1}")]
    UnknownUnit(String, usize),
}

pub fn find_translation_project(db: &Database, language_code: &str, project_code: &str) -> Result<Id, LookupError> {
    let language = db.language_by_code(language_code)
        .ok_or(LookupError::UnknownLanguage(language_code.to_string()))?;
    let project = db.project_by_code(project_code)
        .ok_or(LookupError::UnknownProject(project_code.to_string()))?;
    db.translation_project_for(language.id, project.id)
        .map(|tp| tp.id)
        .ok_or(LookupError::NoTranslationProject(language_code.to_string(), project_code.to_string()))
}

// SPDX-FileCopyrightText: 2025 UnionTech Software Technology Co., Ltd.
//
// SPDX-License-Identifier: MIT

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};
use thiserror::Error as TeError;

use crate::models::{Directory, Id, Language, Project, Store, TranslationProject, Unit};

#[derive(TeError, Debug)]
pub enum DbError {
    #[error("Integrity error: {0}")]
    Integrity(String),
    #[error("{kind} with id {id} does not exist")]
    NotFound { kind: &'static str, id: Id },
    #[error("Can not access state file {0:?}: {1}")]
    Io(PathBuf, #[source] std::io::Error),
    #[error("Fail to (de)serialize state file {0:?}: {1}")]
    Serde(PathBuf, #[source] serde_json::Error),
}

/// Registry of every record, persisted as one JSON document.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Database {
    next_id: Id,
    revision: u64,
    pub languages: BTreeMap<Id, Language>,
    pub projects: BTreeMap<Id, Project>,
    pub directories: BTreeMap<Id, Directory>,
    pub translation_projects: BTreeMap<Id, TranslationProject>,
    pub stores: BTreeMap<Id, Store>,
    pub units: BTreeMap<Id, Unit>,
}

// ===== Load & Save =====

impl Database {
    pub fn load(state_file: &Path) -> Result<Self, DbError> {
        let content = fs::read_to_string(state_file).map_err(|e| DbError::Io(state_file.to_path_buf(), e))?;
        serde_json::from_str(&content).map_err(|e| DbError::Serde(state_file.to_path_buf(), e))
    }

    /// Load `state_file`, or start from an empty registry when it does not exist yet.
    pub fn load_or_default(state_file: &Path) -> Result<Self, DbError> {
        if state_file.exists() {
            Self::load(state_file)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self, state_file: &Path) -> Result<(), DbError> {
        if let Some(parent) = state_file.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| DbError::Io(parent.to_path_buf(), e))?;
        }
        let content = serde_json::to_string_pretty(self).map_err(|e| DbError::Serde(state_file.to_path_buf(), e))?;
        fs::write(state_file, content).map_err(|e| DbError::Io(state_file.to_path_buf(), e))
    }
}

// ===== Counters =====

impl Database {
    pub fn next_id(&mut self) -> Id {
        self.next_id += 1;
        self.next_id
    }

    pub fn next_revision(&mut self) -> u64 {
        self.revision += 1;
        self.revision
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }
}

// ===== Directories =====

impl Database {
    pub fn directory(&self, id: Id) -> Result<&Directory, DbError> {
        self.directories.get(&id).ok_or(DbError::NotFound { kind: "Directory", id })
    }

    pub fn directory_mut(&mut self, id: Id) -> Result<&mut Directory, DbError> {
        self.directories.get_mut(&id).ok_or(DbError::NotFound { kind: "Directory", id })
    }

    pub fn directory_by_path(&self, pootle_path: &str) -> Option<&Directory> {
        self.directories.values().find(|d| d.pootle_path == pootle_path)
    }

    /// The `/` directory, created on first use.
    pub fn root_directory(&mut self) -> Id {
        if let Some(root) = self.directory_by_path("/") {
            return root.id;
        }
        let id = self.next_id();
        self.directories.insert(id, Directory {
            id,
            name: String::new(),
            parent_id: None,
            pootle_path: "/".to_string(),
            obsolete: false,
        });
        id
    }

    pub fn get_or_make_subdir(&mut self, parent_id: Id, name: &str) -> Result<Id, DbError> {
        let pootle_path = self.directory(parent_id)?.child_path(name);
        if let Some(existing) = self.directory_by_path(&pootle_path) {
            return Ok(existing.id);
        }
        let id = self.next_id();
        self.directories.insert(id, Directory {
            id,
            name: name.to_string(),
            parent_id: Some(parent_id),
            pootle_path,
            obsolete: false,
        });
        Ok(id)
    }

    pub fn child_directories(&self, parent_id: Id) -> impl Iterator<Item = &Directory> {
        self.directories.values().filter(move |d| d.parent_id == Some(parent_id))
    }

    fn remove_directory_tree(&mut self, id: Id) {
        let children: Vec<Id> = self.child_directories(id).map(|d| d.id).collect();
        for child in children {
            self.remove_directory_tree(child);
        }
        self.directories.remove(&id);
    }
}

// ===== Languages & Projects =====

impl Database {
    pub fn language(&self, id: Id) -> Result<&Language, DbError> {
        self.languages.get(&id).ok_or(DbError::NotFound { kind: "Language", id })
    }

    pub fn language_by_code(&self, code: &str) -> Option<&Language> {
        self.languages.values().find(|l| l.code == code)
    }

    pub fn project(&self, id: Id) -> Result<&Project, DbError> {
        self.projects.get(&id).ok_or(DbError::NotFound { kind: "Project", id })
    }

    pub fn project_mut(&mut self, id: Id) -> Result<&mut Project, DbError> {
        self.projects.get_mut(&id).ok_or(DbError::NotFound { kind: "Project", id })
    }

    pub fn project_by_code(&self, code: &str) -> Option<&Project> {
        self.projects.values().find(|p| p.code == code)
    }

    /// Insert `language`, assigning its id and `/<code>/` directory.
    pub fn insert_language(&mut self, mut language: Language) -> Result<Id, DbError> {
        if self.language_by_code(&language.code).is_some() {
            return Err(DbError::Integrity(format!("language {:?} already exists", language.code)));
        }
        let root = self.root_directory();
        language.directory_id = self.get_or_make_subdir(root, &language.code)?;
        language.id = self.next_id();
        let id = language.id;
        self.languages.insert(id, language);
        Ok(id)
    }

    /// Insert `project`, assigning its id and `/projects/<code>/` directory.
    pub fn insert_project(&mut self, mut project: Project) -> Result<Id, DbError> {
        if self.project_by_code(&project.code).is_some() {
            return Err(DbError::Integrity(format!("project {:?} already exists", project.code)));
        }
        let root = self.root_directory();
        let projects_dir = self.get_or_make_subdir(root, "projects")?;
        project.directory_id = self.get_or_make_subdir(projects_dir, &project.code)?;
        project.id = self.next_id();
        let id = project.id;
        self.projects.insert(id, project);
        Ok(id)
    }
}

// ===== Translation Projects =====

impl Database {
    pub fn translation_project(&self, id: Id) -> Result<&TranslationProject, DbError> {
        self.translation_projects.get(&id).ok_or(DbError::NotFound { kind: "TranslationProject", id })
    }

    pub fn translation_project_mut(&mut self, id: Id) -> Result<&mut TranslationProject, DbError> {
        self.translation_projects.get_mut(&id).ok_or(DbError::NotFound { kind: "TranslationProject", id })
    }

    pub fn translation_project_for(&self, language_id: Id, project_id: Id) -> Option<&TranslationProject> {
        self.translation_projects.values()
            .find(|tp| tp.language_id == language_id && tp.project_id == project_id)
    }

    pub fn insert_translation_project(&mut self, tp: TranslationProject) -> Result<Id, DbError> {
        if self.translation_project_for(tp.language_id, tp.project_id).is_some() {
            return Err(DbError::Integrity("language and project must be unique together".to_string()));
        }
        if self.translation_projects.values().any(|other| other.pootle_path == tp.pootle_path) {
            return Err(DbError::Integrity(format!("pootle_path {:?} already taken", tp.pootle_path)));
        }
        let id = tp.id;
        self.translation_projects.insert(id, tp);
        Ok(id)
    }

    fn is_live(&self, tp: &TranslationProject) -> bool {
        self.directories.get(&tp.directory_id).is_some_and(|d| !d.obsolete)
    }

    /// Translation projects whose directory is not obsolete.
    pub fn live_translation_projects(&self) -> impl Iterator<Item = &TranslationProject> {
        self.translation_projects.values().filter(move |tp| self.is_live(tp))
    }

    /// Translation projects belonging to disabled projects.
    pub fn disabled_translation_projects(&self) -> impl Iterator<Item = &TranslationProject> {
        self.translation_projects.values()
            .filter(move |tp| self.projects.get(&tp.project_id).is_some_and(|p| p.disabled))
    }

    /// Remove the translation project together with its directory tree, stores and units.
    pub fn delete_translation_project(&mut self, id: Id) -> Result<(), DbError> {
        let tp = self.translation_projects.remove(&id).ok_or(DbError::NotFound { kind: "TranslationProject", id })?;
        let store_ids: Vec<Id> = self.stores.values()
            .filter(|s| s.translation_project_id == id)
            .map(|s| s.id)
            .collect();
        self.units.retain(|_, u| !store_ids.contains(&u.store_id));
        self.stores.retain(|_, s| s.translation_project_id != id);
        self.remove_directory_tree(tp.directory_id);
        Ok(())
    }
}

// ===== Stores & Units =====

impl Database {
    pub fn store(&self, id: Id) -> Result<&Store, DbError> {
        self.stores.get(&id).ok_or(DbError::NotFound { kind: "Store", id })
    }

    pub fn store_mut(&mut self, id: Id) -> Result<&mut Store, DbError> {
        self.stores.get_mut(&id).ok_or(DbError::NotFound { kind: "Store", id })
    }

    pub fn stores_of(&self, tp_id: Id) -> impl Iterator<Item = &Store> {
        self.stores.values().filter(move |s| s.translation_project_id == tp_id)
    }

    pub fn live_stores_of(&self, tp_id: Id) -> impl Iterator<Item = &Store> {
        self.stores_of(tp_id).filter(|s| !s.obsolete)
    }

    pub fn stores_in_directory(&self, directory_id: Id) -> impl Iterator<Item = &Store> {
        self.stores.values().filter(move |s| s.parent_id == directory_id)
    }

    pub fn units_of(&self, store_id: Id) -> Vec<&Unit> {
        let mut units: Vec<&Unit> = self.units.values().filter(|u| u.store_id == store_id).collect();
        units.sort_by_key(|u| u.index);
        units
    }

    pub fn unit(&self, id: Id) -> Result<&Unit, DbError> {
        self.units.get(&id).ok_or(DbError::NotFound { kind: "Unit", id })
    }

    pub fn unit_mut(&mut self, id: Id) -> Result<&mut Unit, DbError> {
        self.units.get_mut(&id).ok_or(DbError::NotFound { kind: "Unit", id })
    }
}

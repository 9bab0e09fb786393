// SPDX-FileCopyrightText: 2025 UnionTech Software Technology Co., Ltd.
//
// SPDX-License-Identifier: MIT

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error as TeError;
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::database::{Database, DbError};
use crate::models::{Id, Language, Project, Store, StoreState, TreeStyle};
use crate::models::translation_project::relative_real_path;

#[derive(TeError, Debug)]
pub enum ProjectTreeError {
    #[error("Translation project {0} has no real path")]
    NoRealPath(Id),
    #[error("Failed to read directory {0:?}: {1}")]
    ReadDir(PathBuf, #[source] walkdir::Error),
    #[error("Failed to create directory {0:?}: {1}")]
    CreateDir(PathBuf, #[source] std::io::Error),
    #[error(transparent)]
    Db(#[from] DbError),
}

pub fn does_not_exist(path: &Path) -> bool {
    !path.exists()
}

/// Resolve `auto` tree style by looking for language directories below the project directory.
pub fn get_tree_style(project: &Project, project_dir: &Path, known_codes: &[&str]) -> TreeStyle {
    if project.treestyle != TreeStyle::Auto {
        return project.treestyle;
    }
    let has_language_dir = WalkDir::new(project_dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_dir())
        .any(|e| {
            let name = e.file_name().to_string_lossy();
            name == crate::models::language::TEMPLATES_CODE
                || known_codes.contains(&name.as_ref())
        });
    if has_language_dir { TreeStyle::NonGnu } else { TreeStyle::Gnu }
}

/// Decides which files on disk belong to one translation project.
#[derive(Debug, Clone)]
pub struct FileMatcher {
    style: TreeStyle,
    language_code: String,
    is_template: bool,
    extension: &'static str,
    template_extension: &'static str,
}

impl FileMatcher {
    pub fn new(language: &Language, project: &Project, style: TreeStyle) -> Self {
        FileMatcher {
            style,
            language_code: language.code.clone(),
            is_template: language.is_template(),
            extension: project.localfiletype.extension(),
            template_extension: project.localfiletype.template_extension(),
        }
    }

    pub fn accepts(&self, file_name: &str) -> bool {
        let path = Path::new(file_name);
        let (Some(stem), Some(ext)) = (
            path.file_stem().and_then(|s| s.to_str()),
            path.extension().and_then(|e| e.to_str()),
        ) else {
            return false;
        };
        let ext_ok = ext == self.extension || (self.is_template && ext == self.template_extension);
        if !ext_ok {
            return false;
        }
        match self.style {
            TreeStyle::Gnu if self.is_template => ext == self.template_extension,
            TreeStyle::Gnu => {
                let code = self.language_code.as_str();
                stem == code
                    || [format!("-{code}"), format!("_{code}"), format!(".{code}")]
                        .iter()
                        .any(|suffix| stem.ends_with(suffix.as_str()))
            }
            _ => true,
        }
    }
}

pub fn get_translation_project_dir(
    language: &Language,
    project_dir: &Path,
    style: TreeStyle,
    make_dirs: bool,
) -> Result<PathBuf, ProjectTreeError> {
    let path = match style {
        TreeStyle::Gnu => project_dir.to_path_buf(),
        _ => project_dir.join(&language.code),
    };
    if make_dirs && !path.exists() {
        fs::create_dir_all(&path).map_err(|e| ProjectTreeError::CreateDir(path.clone(), e))?;
    }
    Ok(path)
}

pub fn translation_project_dir_exists(language: &Language, project: &Project, project_dir: &Path, style: TreeStyle) -> bool {
    match style {
        TreeStyle::Gnu => {
            let matcher = FileMatcher::new(language, project, style);
            WalkDir::new(project_dir)
                .into_iter()
                .filter_map(|e| e.ok())
                .filter(|e| e.file_type().is_file())
                .any(|e| matcher.accepts(&e.file_name().to_string_lossy()))
        }
        _ => project_dir.join(&language.code).is_dir(),
    }
}

/// Files found by [`add_files`].
#[derive(Debug, Default)]
pub struct ScanResult {
    pub all_files: Vec<PathBuf>,
    pub new_stores: Vec<Id>,
    pub obsoleted_stores: Vec<Id>,
}

struct ScanContext<'a> {
    podirectory: &'a Path,
    tp_id: Id,
    matcher: FileMatcher,
}

/// Mirror the files below the translation project's real path into directories and stores.
pub fn add_files(db: &mut Database, podirectory: &Path, tp_id: Id, matcher: FileMatcher) -> Result<ScanResult, ProjectTreeError> {
    let tp = db.translation_project(tp_id)?;
    let real_path = tp.abs_real_path(podirectory).ok_or(ProjectTreeError::NoRealPath(tp_id))?;
    let directory_id = tp.directory_id;
    let ctx = ScanContext { podirectory, tp_id, matcher };
    let mut result = ScanResult::default();
    add_items(db, &ctx, &real_path, directory_id, &mut result)?;
    Ok(result)
}

/// Returns the number of files found below `fs_dir`.
fn add_items(
    db: &mut Database,
    ctx: &ScanContext,
    fs_dir: &Path,
    directory_id: Id,
    result: &mut ScanResult,
) -> Result<usize, ProjectTreeError> {
    let mut file_names = Vec::new();
    let mut dir_names = Vec::new();
    for entry in WalkDir::new(fs_dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(false)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| ProjectTreeError::ReadDir(fs_dir.to_path_buf(), e))?;
        let name = entry.file_name().to_string_lossy().to_string();
        if name.starts_with('.') {
            continue;
        }
        if entry.file_type().is_dir() {
            dir_names.push(name);
        } else if entry.file_type().is_file() && ctx.matcher.accepts(&name) {
            file_names.push(name);
        }
    }

    let mut found = file_names.len();
    let wanted: HashSet<&str> = file_names.iter().map(String::as_str).collect();
    let existing: Vec<(Id, String, bool)> = db.stores_in_directory(directory_id)
        .map(|s| (s.id, s.name.clone(), s.obsolete))
        .collect();

    for (id, name, obsolete) in &existing {
        if wanted.contains(name.as_str()) {
            if *obsolete {
                db.store_mut(*id)?.obsolete = false;
                info!("Resurrected store {}", db.store(*id)?.pootle_path);
            }
        } else if !*obsolete {
            db.store_mut(*id)?.obsolete = true;
            result.obsoleted_stores.push(*id);
            info!("Marked store {} as obsolete", db.store(*id)?.pootle_path);
        }
    }

    let dir_path = db.directory(directory_id)?.pootle_path.clone();
    for name in &file_names {
        let path = fs_dir.join(name);
        if !existing.iter().any(|(_, existing_name, _)| existing_name == name) {
            let id = db.next_id();
            db.stores.insert(id, Store {
                id,
                translation_project_id: ctx.tp_id,
                parent_id: directory_id,
                name: name.clone(),
                pootle_path: format!("{dir_path}{name}"),
                file: relative_real_path(ctx.podirectory, &path),
                file_mtime: None,
                state: StoreState::New,
                obsolete: false,
                mtime: None,
                last_sync_revision: 0,
            });
            debug!("Created store {dir_path}{name}");
            result.new_stores.push(id);
        }
        result.all_files.push(path);
    }

    let existing_dirs: Vec<(Id, String)> = db.child_directories(directory_id)
        .map(|d| (d.id, d.name.clone()))
        .collect();
    for name in &dir_names {
        let is_new = !existing_dirs.iter().any(|(_, existing_name)| existing_name == name);
        let child_id = db.get_or_make_subdir(directory_id, name)?;
        let child_found = add_items(db, ctx, &fs_dir.join(name), child_id, result)?;
        if child_found == 0 && is_new {
            db.directories.remove(&child_id);
            continue;
        }
        db.directory_mut(child_id)?.obsolete = child_found == 0;
        found += child_found;
    }
    for (id, name) in &existing_dirs {
        if !dir_names.contains(name) {
            obsolete_directory(db, *id, result)?;
        }
    }

    Ok(found)
}

fn obsolete_directory(db: &mut Database, directory_id: Id, result: &mut ScanResult) -> Result<(), ProjectTreeError> {
    let directory = db.directory_mut(directory_id)?;
    if !directory.obsolete {
        directory.obsolete = true;
        info!("Marked directory {} as obsolete", directory.pootle_path);
    }
    let stores: Vec<Id> = db.stores_in_directory(directory_id)
        .filter(|s| !s.obsolete)
        .map(|s| s.id)
        .collect();
    for id in stores {
        db.store_mut(id)?.obsolete = true;
        result.obsoleted_stores.push(id);
    }
    let children: Vec<Id> = db.child_directories(directory_id).map(|d| d.id).collect();
    for child in children {
        obsolete_directory(db, child, result)?;
    }
    Ok(())
}

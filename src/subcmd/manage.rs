// SPDX-FileCopyrightText: 2025 UnionTech Software Technology Co., Ltd.
//
// SPDX-License-Identifier: MIT

use thiserror::Error as TeError;

use crate::config::Settings;
use crate::i18n_file::common::I18nFileKind;
use crate::models::{Language, Project, TreeStyle};
use crate::registry::{CreateMode, RegistryError};
use super::{Context, ContextError, LookupError, find_translation_project};

#[derive(TeError, Debug)]
pub enum CmdError {
    #[error(transparent)]
    Context(#[from] ContextError),
    #[error("Fail to update the registry because: {0}")]
    Registry(#[from] RegistryError),
    #[error(transparent)]
    Lookup(#[from] LookupError),
}

fn create_mode(raw: bool) -> CreateMode {
    if raw { CreateMode::Raw } else { CreateMode::Scan }
}

#[allow(clippy::too_many_arguments)]
pub fn subcmd_add_project(
    settings: Settings,
    code: String,
    fullname: Option<String>,
    checkstyle: String,
    filetype: I18nFileKind,
    treestyle: TreeStyle,
    source_language: String,
    raw: bool,
) -> Result<(), CmdError> {
    let mut context = Context::load(settings)?;
    let project = Project {
        id: 0,
        fullname: fullname.unwrap_or_else(|| code.clone()),
        code,
        checkstyle,
        localfiletype: filetype,
        treestyle,
        source_language,
        disabled: false,
        directory_id: 0,
    };
    let project_id = context.registry().create_project(project, create_mode(raw))?;
    context.save()?;

    let linked = context.db.translation_projects.values().filter(|tp| tp.project_id == project_id).count();
    println!("Created project with {linked} translation projects.");
    Ok(())
}

pub fn subcmd_add_language(
    settings: Settings,
    code: String,
    fullname: Option<String>,
    nplurals: Option<usize>,
    plural_equation: String,
    raw: bool,
) -> Result<(), CmdError> {
    let mut context = Context::load(settings)?;
    let language = Language {
        id: 0,
        fullname: fullname.unwrap_or_else(|| code.clone()),
        code,
        nplurals,
        plural_equation,
        directory_id: 0,
    };
    let language_id = context.registry().create_language(language, create_mode(raw))?;
    context.save()?;

    let linked = context.db.translation_projects.values().filter(|tp| tp.language_id == language_id).count();
    println!("Created language with {linked} translation projects.");
    Ok(())
}

pub fn subcmd_delete_tp(settings: Settings, language_code: &str, project_code: &str) -> Result<(), CmdError> {
    let mut context = Context::load(settings)?;
    let tp_id = find_translation_project(&context.db, language_code, project_code)?;
    context.registry().delete_translation_project(tp_id)?;
    context.save()?;
    Ok(())
}

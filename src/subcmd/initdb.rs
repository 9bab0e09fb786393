// SPDX-FileCopyrightText: 2025 UnionTech Software Technology Co., Ltd.
//
// SPDX-License-Identifier: MIT

use thiserror::Error as TeError;

use crate::config::Settings;
use crate::initdb::initdb;
use crate::registry::RegistryError;
use super::{Context, ContextError};

#[derive(TeError, Debug)]
pub enum CmdError {
    #[error(transparent)]
    Context(#[from] ContextError),
    #[error("Fail to populate the database because: {0}")]
    Populate(#[from] RegistryError),
}

pub fn subcmd_initdb(settings: Settings, no_projects: bool) -> Result<(), CmdError> {
    let mut context = Context::load(settings)?;
    let report = initdb(&mut context.registry(), no_projects)?;
    context.save()?;

    if !report.created_languages.is_empty() {
        println!("Created languages: {}", report.created_languages.join(", "));
    }
    if !report.created_projects.is_empty() {
        println!("Created projects: {}", report.created_projects.join(", "));
    }
    println!("Successfully populated the database.");
    Ok(())
}

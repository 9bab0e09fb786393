// SPDX-FileCopyrightText: 2025 UnionTech Software Technology Co., Ltd.
//
// SPDX-License-Identifier: MIT

use thiserror::Error as TeError;

use crate::config::Settings;
use crate::registry::RegistryError;
use super::{Context, ContextError, select_translation_projects};

#[derive(TeError, Debug)]
pub enum CmdError {
    #[error(transparent)]
    Context(#[from] ContextError),
    #[error("Fail to synchronize with disk because: {0}")]
    Registry(#[from] RegistryError),
}

fn code_filter(codes: &[String]) -> Option<&[String]> {
    (!codes.is_empty()).then_some(codes)
}

pub fn subcmd_update_stores(settings: Settings, languages: &[String], projects: &[String], force: bool, overwrite: bool) -> Result<(), CmdError> {
    let mut context = Context::load(settings)?;
    let mut registry = context.registry();
    registry.scan_translation_projects(code_filter(languages), code_filter(projects))?;

    let tp_ids = select_translation_projects(registry.db, languages, projects);
    let mut changed = 0;
    for tp_id in &tp_ids {
        if registry.update_from_disk(*tp_id, force, overwrite)? {
            changed += 1;
        }
    }
    context.save()?;
    println!("Updated {changed} of {} translation projects from disk.", tp_ids.len());
    Ok(())
}

pub fn subcmd_sync_stores(settings: Settings, languages: &[String], projects: &[String], overwrite: bool, skip_missing: bool, force: bool) -> Result<(), CmdError> {
    let mut context = Context::load(settings)?;
    let mut registry = context.registry();

    let tp_ids = select_translation_projects(registry.db, languages, projects);
    let mut written = 0;
    for tp_id in tp_ids {
        written += registry.sync(tp_id, !overwrite, skip_missing, !force)?;
    }
    context.save()?;
    println!("Wrote {written} files.");
    Ok(())
}

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
    #[error("Fail to run checks because: {0}")]
    Registry(#[from] RegistryError),
}

pub fn subcmd_check(settings: Settings, languages: &[String], projects: &[String]) -> Result<(), CmdError> {
    let mut context = Context::load(settings)?;
    let registry = context.registry();

    let mut total_failed = 0;
    for tp_id in select_translation_projects(registry.db, languages, projects) {
        let failed = registry.check(tp_id)?;
        if failed.is_empty() {
            continue;
        }
        let tp = registry.db.translation_project(tp_id).map_err(RegistryError::from)?;
        println!("{} ({} units failing, {}):", registry.tp_code(tp_id).map_err(RegistryError::from)?,
            failed.len(), tp.translate_url(Some("checks")));
        for (unit_id, report) in &failed {
            let unit = registry.db.unit(*unit_id).map_err(RegistryError::from)?;
            println!("  #{} {:?}: {}", unit.index, unit.source.as_str(), report.failures.join(", "));
        }
        total_failed += failed.len();
    }
    println!("{total_failed} units failed quality checks.");
    Ok(())
}

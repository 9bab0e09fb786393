// SPDX-FileCopyrightText: 2025 UnionTech Software Technology Co., Ltd.
//
// SPDX-License-Identifier: MIT

use thiserror::Error as TeError;

use crate::config::Settings;
use crate::registry::RegistryError;
use super::{Context, ContextError, LookupError, find_translation_project};

#[derive(TeError, Debug)]
pub enum CmdError {
    #[error(transparent)]
    Context(#[from] ContextError),
    #[error(transparent)]
    Lookup(#[from] LookupError),
    #[error("Fail to load terminology because: {0}")]
    Registry(#[from] RegistryError),
}

pub fn subcmd_terms(settings: Settings, language_code: &str, project_code: &str, text: &str) -> Result<(), CmdError> {
    let mut context = Context::load(settings)?;
    let tp_id = find_translation_project(&context.db, language_code, project_code)?;
    let registry = context.registry();

    let Some(matcher) = registry.term_matcher(tp_id)? else {
        println!("No terminology available for {language_code}-{project_code}.");
        return Ok(());
    };
    if matcher.is_empty() {
        println!("The terminology for {language_code}-{project_code} has no translated terms yet.");
        return Ok(());
    }
    let terms = matcher.matches(text);
    println!("Found {} of {} terms:", terms.len(), matcher.len());
    for term in terms {
        println!("  {} -> {}", term.source, term.target);
    }
    Ok(())
}

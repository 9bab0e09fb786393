// SPDX-FileCopyrightText: 2025 UnionTech Software Technology Co., Ltd.
//
// SPDX-License-Identifier: MIT

use serde::Serialize;
use thiserror::Error as TeError;

use crate::config::Settings;
use crate::database::{Database, DbError};
use crate::highlight::{DiffStrategy, highlighter_for};
use crate::i18n_file::common::UnitState;
use crate::models::{Id, Unit};
use crate::store_tags::{PluralForm, SuggestionForm, find_altsrcs, get_sugg_list, pluralize_diff_sugg, pluralize_source};
use super::{Context, ContextError, LookupError};

#[derive(TeError, Debug)]
pub enum CmdError {
    #[error(transparent)]
    Context(#[from] ContextError),
    #[error(transparent)]
    Lookup(#[from] LookupError),
    #[error("Fail to read the unit: {0}")]
    Db(#[from] DbError),
    #[error("Fail to serialize the unit: {0}")]
    Serde(#[from] serde_yml::Error),
}

#[derive(Serialize)]
struct SuggestionView {
    score: Option<i64>,
    forms: Vec<SuggestionForm>,
}

#[derive(Serialize)]
struct AltSrcView {
    language: String,
    target: String,
}

#[derive(Serialize)]
struct UnitView {
    pootle_path: String,
    index: usize,
    unitid: String,
    state: UnitState,
    source: Vec<PluralForm>,
    target: Vec<PluralForm>,
    suggestions: Vec<SuggestionView>,
    altsrcs: Vec<AltSrcView>,
}

fn find_unit<'a>(db: &'a Database, pootle_path: &str, index: usize) -> Result<&'a Unit, LookupError> {
    let store = db.stores.values()
        .find(|s| s.pootle_path == pootle_path && !s.obsolete)
        .ok_or(LookupError::UnknownStore(pootle_path.to_string()))?;
    db.units_of(store.id)
        .into_iter()
        .find(|u| u.index == index)
        .ok_or(LookupError::UnknownUnit(pootle_path.to_string(), index))
}

fn language_ids(db: &Database, codes: &[String]) -> Result<Vec<Id>, LookupError> {
    codes.iter()
        .map(|code| db.language_by_code(code)
            .map(|l| l.id)
            .ok_or(LookupError::UnknownLanguage(code.clone())))
        .collect()
}

fn language_code_of(db: &Database, unit: &Unit) -> Result<String, DbError> {
    let store = db.store(unit.store_id)?;
    let tp = db.translation_project(store.translation_project_id)?;
    Ok(db.language(tp.language_id)?.code.clone())
}

pub fn subcmd_unit(settings: Settings, pootle_path: &str, index: usize, alt_src_langs: &[String], strategy: DiffStrategy) -> Result<(), CmdError> {
    let mut context = Context::load(settings)?;
    let registry = context.registry();
    let db: &Database = &*registry.db;

    let unit = find_unit(db, pootle_path, index)?;
    let alt_src_ids = language_ids(db, alt_src_langs)?;
    let highlighter = highlighter_for(strategy);

    let suggestions = get_sugg_list(db, unit)?
        .into_iter()
        .map(|(sugg, score)| SuggestionView {
            score,
            forms: pluralize_diff_sugg(&*highlighter, unit, sugg),
        })
        .collect();
    let mut altsrcs = Vec::new();
    for alt in find_altsrcs(db, registry.podirectory(), unit, &alt_src_ids)? {
        altsrcs.push(AltSrcView {
            language: language_code_of(db, alt)?,
            target: alt.target.to_string(),
        });
    }

    let view = UnitView {
        pootle_path: pootle_path.to_string(),
        index: unit.index,
        unitid: unit.unitid.clone(),
        state: unit.state,
        source: pluralize_source(unit),
        target: registry.pluralize_target(unit, None),
        suggestions,
        altsrcs,
    };
    println!("{}", serde_yml::to_string(&view)?);
    Ok(())
}

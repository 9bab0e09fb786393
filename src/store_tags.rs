// SPDX-FileCopyrightText: 2025 UnionTech Software Technology Co., Ltd.
//
// SPDX-License-Identifier: MIT

use serde::Serialize;

use crate::database::{Database, DbError};
use crate::highlight::{DiffHighlighter, call_highlight};
use crate::models::{Id, QuickStats, Suggestion, TreeStyle, Unit};
use crate::project_tree::get_tree_style;

/// One form of a possibly plural string, as shown to translators.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PluralForm {
    pub index: usize,
    pub text: String,
    pub label: Option<String>,
}

impl PluralForm {
    fn new(index: usize, text: &str, label: Option<String>) -> Self {
        PluralForm { index, text: text.to_string(), label }
    }
}

fn plural_form_label(index: usize) -> Option<String> {
    Some(format!("Plural Form {index}"))
}

pub fn stat_summary(stats: &QuickStats) -> String {
    let word_stats = format!(
        "Words Translated: {}/{} - {}%",
        stats.translatedsourcewords, stats.totalsourcewords, stats.translated_percentage(),
    );
    let string_stats = format!(
        "Strings Translated: {}/{} - {}%",
        stats.translated, stats.total, stats.str_translated_percentage(),
    );
    format!(
        "<span class=\"word-statistics\">{word_stats}</span> &nbsp;&nbsp; <span class=\"string-statistics\">{string_stats}</span>"
    )
}

pub fn pluralize_source(unit: &Unit) -> Vec<PluralForm> {
    if !unit.has_plural() {
        return vec![PluralForm::new(0, unit.source.as_str(), None)];
    }
    let sources = &unit.source.strings;
    match sources.len() {
        1 => vec![PluralForm::new(0, &sources[0], Some("Singular+Plural".to_string()))],
        2 => vec![
            PluralForm::new(0, &sources[0], Some("Singular".to_string())),
            PluralForm::new(1, &sources[1], Some("Plural".to_string())),
        ],
        _ => sources.iter()
            .enumerate()
            .map(|(i, source)| PluralForm::new(i, source, plural_form_label(i)))
            .collect(),
    }
}

/// Target forms of `unit`; with `nplurals` known, exactly that many forms padded with empty strings.
pub fn pluralize_target(unit: &Unit, nplurals: Option<usize>) -> Vec<PluralForm> {
    if !unit.has_plural() {
        return vec![PluralForm::new(0, unit.target.as_str(), None)];
    }
    let targets = &unit.target.strings;
    match nplurals {
        Some(nplurals) => (0..nplurals)
            .map(|i| PluralForm::new(i, targets.get(i).map(String::as_str).unwrap_or_default(), plural_form_label(i)))
            .collect(),
        None => targets.iter()
            .enumerate()
            .map(|(i, target)| PluralForm::new(i, target, plural_form_label(i)))
            .collect(),
    }
}

/// A suggestion form next to its highlighted difference from the current translation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SuggestionForm {
    pub index: usize,
    pub text: String,
    pub highlighted: String,
    pub label: Option<String>,
}

pub fn pluralize_diff_sugg(highlighter: &dyn DiffHighlighter, unit: &Unit, suggestion: &Suggestion) -> Vec<SuggestionForm> {
    if !unit.has_plural() {
        let text = suggestion.target.as_str();
        return vec![SuggestionForm {
            index: 0,
            text: text.to_string(),
            highlighted: call_highlight(highlighter, &unit.target.strings, text),
            label: None,
        }];
    }
    suggestion.target.strings.iter()
        .enumerate()
        .map(|(i, text)| {
            let old = unit.target.strings.get(i).map(std::slice::from_ref).unwrap_or_default();
            SuggestionForm {
                index: i,
                text: text.clone(),
                highlighted: call_highlight(highlighter, old, text),
                label: plural_form_label(i),
            }
        })
        .collect()
}

/// Translated units with the same unitid in other languages of the unit's project.
pub fn find_altsrcs<'a>(db: &'a Database, podirectory: &std::path::Path, unit: &Unit, alt_src_langs: &[Id]) -> Result<Vec<&'a Unit>, DbError> {
    let store = db.store(unit.store_id)?;
    let tp = db.translation_project(store.translation_project_id)?;
    let project = db.project(tp.project_id)?;
    let known_codes: Vec<&str> = db.languages.values().map(|l| l.code.as_str()).collect();
    let same_name_only = get_tree_style(project, &project.real_path(podirectory), &known_codes) == TreeStyle::NonGnu;

    let altsrcs = db.units.values()
        .filter(|u| u.unitid == unit.unitid && u.is_translated())
        .filter(|u| {
            let Some(alt_store) = db.stores.get(&u.store_id) else {
                return false;
            };
            let Some(alt_tp) = db.translation_projects.get(&alt_store.translation_project_id) else {
                return false;
            };
            alt_tp.project_id == project.id
                && alt_src_langs.contains(&alt_tp.language_id)
                && (!same_name_only || alt_store.name == store.name)
        })
        .collect();
    Ok(altsrcs)
}

/// Suggestions of `unit` with their vote score, only scored for terminology.
pub fn get_sugg_list<'a>(db: &Database, unit: &'a Unit) -> Result<Vec<(&'a Suggestion, Option<i64>)>, DbError> {
    if unit.suggestions.is_empty() {
        return Ok(Vec::new());
    }
    let store = db.store(unit.store_id)?;
    let tp = db.translation_project(store.translation_project_id)?;
    let scored = store.is_terminology() || db.project(tp.project_id)?.is_terminology();
    Ok(unit.suggestions.iter()
        .map(|sugg| (sugg, scored.then_some(sugg.score)))
        .collect())
}

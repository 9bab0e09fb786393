// SPDX-FileCopyrightText: 2025 UnionTech Software Technology Co., Ltd.
//
// SPDX-License-Identifier: MIT

use std::collections::BTreeSet;
use std::sync::LazyLock;
use regex::Regex;
use serde::Serialize;
use thiserror::Error as TeError;
use tracing::error;

use crate::models::{Project, Unit};

static PRINTF_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"%(\d+\$)?(\([\w]+\))?[-+ #0]*(\d+|\*)?(\.\d+)?(hh|h|ll|l|L|z|j|t)?[diouxXeEfFgGcsp%]").unwrap()
});
static NAMED_START_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"%\(").unwrap());
static BRACE_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\{\w*\}").unwrap());

#[derive(TeError, Debug)]
pub enum FilterError {
    #[error("Malformed placeholder in {0:?}")]
    MalformedPlaceholder(String),
}

type Filter = fn(source: &str, target: &str) -> Result<bool, FilterError>;

const STANDARD_FILTERS: &[(&str, Filter)] = &[
    ("untranslated", untranslated),
    ("printf", printf),
    ("braces", braces),
    ("endpunc", endpunc),
    ("doublespacing", doublespacing),
    ("newlines", newlines),
];

/// Glossary entries are fragments, punctuation and spacing rules do not apply.
const TERMINOLOGY_FILTERS: &[(&str, Filter)] = &[
    ("untranslated", untranslated),
    ("printf", printf),
];

fn untranslated(_source: &str, target: &str) -> Result<bool, FilterError> {
    Ok(!target.trim().is_empty())
}

fn placeholders(regex: &Regex, text: &str) -> BTreeSet<String> {
    regex.find_iter(text)
        .map(|m| m.as_str().to_string())
        .filter(|p| p != "%%")
        .collect()
}

fn check_named_placeholders(text: &str) -> Result<(), FilterError> {
    let opened = NAMED_START_REGEX.find_iter(text).count();
    let complete = PRINTF_REGEX.find_iter(text).filter(|m| m.as_str().contains('(')).count();
    if opened != complete {
        return Err(FilterError::MalformedPlaceholder(text.to_string()));
    }
    Ok(())
}

fn printf(source: &str, target: &str) -> Result<bool, FilterError> {
    check_named_placeholders(source)?;
    check_named_placeholders(target)?;
    Ok(placeholders(&PRINTF_REGEX, source) == placeholders(&PRINTF_REGEX, target))
}

fn braces(source: &str, target: &str) -> Result<bool, FilterError> {
    Ok(placeholders(&BRACE_REGEX, source) == placeholders(&BRACE_REGEX, target))
}

fn endpunc(source: &str, target: &str) -> Result<bool, FilterError> {
    const PUNCTUATION: &[char] = &['.', '!', '?', ':', '。', '！', '？', '：'];
    let source_end = source.trim_end().chars().last().filter(|c| PUNCTUATION.contains(c));
    let target_end = target.trim_end().chars().last().filter(|c| PUNCTUATION.contains(c));
    Ok(source_end.is_some() == target_end.is_some())
}

fn doublespacing(source: &str, target: &str) -> Result<bool, FilterError> {
    Ok(source.contains("  ") == target.contains("  "))
}

fn newlines(source: &str, target: &str) -> Result<bool, FilterError> {
    Ok(source.matches('\n').count() == target.matches('\n').count())
}

/// Result of running a checker over one unit.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct CheckReport {
    pub failures: Vec<&'static str>,
}

impl CheckReport {
    pub fn passed(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Named quality filters chosen by the project's checkstyle.
#[derive(Debug, Clone, Copy)]
pub struct Checker {
    filters: &'static [(&'static str, Filter)],
}

impl Checker {
    pub fn for_project(project: &Project) -> Self {
        if project.is_terminology() {
            Checker { filters: TERMINOLOGY_FILTERS }
        } else {
            Checker { filters: STANDARD_FILTERS }
        }
    }

    pub fn filter_names(&self) -> impl Iterator<Item = &'static str> {
        self.filters.iter().map(|(name, _)| *name)
    }

    /// Run every filter over each form of `unit`, sending filter errors through `on_error`.
    pub fn run(&self, unit: &Unit, on_error: impl Fn(&'static str, &FilterError) -> bool) -> CheckReport {
        let mut report = CheckReport::default();
        for &(name, filter) in self.filters {
            let forms = unit.source.strings.iter().zip(unit.target.strings.iter());
            let mut passed = true;
            for (source, target) in forms {
                passed &= match filter(source, target) {
                    Ok(ok) => ok,
                    Err(e) => on_error(name, &e),
                };
            }
            if unit.target.strings.is_empty() {
                passed = false;
            }
            if !passed {
                report.failures.push(name);
            }
        }
        report
    }
}

/// Log a filter error of translation project `tp_code` and count it as a failed check.
pub fn filter_error_handler(tp_code: &str, filter_name: &str, err: &FilterError) -> bool {
    error!("Error in filter {filter_name} of {tp_code}: {err}");
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n_file::common::{I18nFileKind, UnitState};
    use crate::models::{Multistring, TreeStyle};

    fn project(checkstyle: &str) -> Project {
        Project {
            id: 1,
            code: "tutorial".to_string(),
            fullname: "Tutorial".to_string(),
            checkstyle: checkstyle.to_string(),
            localfiletype: I18nFileKind::Gettext,
            treestyle: TreeStyle::Auto,
            source_language: "en".to_string(),
            disabled: false,
            directory_id: 1,
        }
    }

    fn unit(source: &str, target: &str) -> Unit {
        Unit {
            id: 1,
            store_id: 1,
            index: 0,
            unitid: source.to_string(),
            context: String::new(),
            source: Multistring::single(source),
            target: Multistring::single(target),
            plural: false,
            disambiguation: String::new(),
            state: UnitState::Translated,
            locations: Vec::new(),
            notes: None,
            revision: 1,
            suggestions: Vec::new(),
        }
    }

    fn no_errors(_: &'static str, _: &FilterError) -> bool {
        panic!("no filter should fail with an error");
    }

    #[test]
    fn tst_standard_checker() {
        let checker = Checker::for_project(&project("standard"));
        assert!(checker.run(&unit("Copied %d files.", "%d Dateien kopiert."), no_errors).passed());

        let report = checker.run(&unit("Copied %d files.", "Dateien kopiert"), no_errors);
        assert_eq!(report.failures, vec!["printf", "endpunc"]);

        let report = checker.run(&unit("Hello {name}", ""), no_errors);
        assert_eq!(report.failures, vec!["untranslated", "braces"]);
    }

    #[test]
    fn tst_terminology_checker_ignores_punctuation() {
        let checker = Checker::for_project(&project("terminology"));
        assert!(checker.filter_names().all(|name| name != "endpunc"));
        assert!(checker.run(&unit("file.", "Datei"), no_errors).passed());
    }

    #[test]
    fn tst_filter_error_counts_as_failure() {
        let checker = Checker::for_project(&project("standard"));
        let report = checker.run(&unit("Copy %(count files", "Kopiere %(count Dateien"), |name, e| {
            filter_error_handler("de-tutorial", name, e)
        });
        assert_eq!(report.failures, vec!["printf"]);
    }
}

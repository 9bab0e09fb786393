// SPDX-FileCopyrightText: 2025 UnionTech Software Technology Co., Ltd.
//
// SPDX-License-Identifier: MIT

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error as TeError;

#[derive(clap::ValueEnum, Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum I18nFileKind {
    /// GNU Gettext translation file format (.po)
    #[default]
    #[value(name = "po")]
    #[serde(rename = "po")]
    Gettext,
    /// Qt Linguist translation file format (.ts)
    #[value(name = "ts")]
    #[serde(rename = "ts")]
    Linguist,
}

#[derive(TeError, Debug)]
#[error("Unknow translation file extension {ext:?}")]
pub struct UnknownI18nFileExtError {
    ext: String,
}

impl I18nFileKind {
    /// Try detecting translation file kind from given file path.
    ///
    /// If file extension is `ts`, return Qt Linguist.
    /// If file extension is `po` or `pot`, return GNU Gettext.
    /// Otherwise return error.
    pub fn from_ext_hint(path_hint: &Path) -> Result<Self, UnknownI18nFileExtError> {
        let ext = path_hint.extension().map(|e| e.to_ascii_lowercase());
        let ext = match ext {
            Some(ref e) => e.to_str(),
            None => None,
        };
        match ext {
            Some("ts") => Ok(Self::Linguist),
            Some("po") | Some("pot") => Ok(Self::Gettext),
            Some(s) => Err(UnknownI18nFileExtError { ext: s.to_string() }),
            None => Err(UnknownI18nFileExtError { ext: String::new() }),
        }
    }

    /// Extension used by translated files of this kind.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Gettext => "po",
            Self::Linguist => "ts",
        }
    }

    /// Extension used by template files of this kind.
    ///
    /// Qt Linguist has no dedicated template extension.
    pub fn template_extension(&self) -> &'static str {
        match self {
            Self::Gettext => "pot",
            Self::Linguist => "ts",
        }
    }
}

/// Translation state of a single unit, ordered from "least" to "most" done.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitState {
    /// The source text of this entry no longer exists.
    ///
    /// Covers both Qt "vanished" and "obsolete" entries, and `#~` entries in PO files.
    Obsolete,
    #[default]
    Untranslated,
    /// Translated, but the source changed slightly so the translation needs review.
    Fuzzy,
    Translated,
}

/// One message of a translation file, independent of the on-disk format.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct FileUnit {
    /// `msgctxt` for PO files, the context name for TS files.
    pub context: String,
    /// Singular source first, plural source second when present.
    pub source: Vec<String>,
    pub target: Vec<String>,
    /// Qt Linguist numerus messages carry a single source form.
    pub plural: bool,
    /// TS `<comment>`, telling apart messages with the same context and source.
    pub disambiguation: String,
    pub state: UnitState,
    pub locations: Vec<String>,
    pub notes: Option<String>,
}

impl FileUnit {
    /// Identity of the unit inside its file.
    pub fn unitid(&self) -> String {
        make_unitid(&self.context, self.source.first().map(String::as_str).unwrap_or_default(), &self.disambiguation)
    }

    pub fn has_plural(&self) -> bool {
        self.plural
    }
}

pub fn make_unitid(context: &str, source: &str, disambiguation: &str) -> String {
    let mut unitid = if context.is_empty() {
        source.to_string()
    } else {
        format!("{context}\u{4}{source}")
    };
    if !disambiguation.is_empty() {
        unitid.push('\u{4}');
        unitid.push_str(disambiguation);
    }
    unitid
}

/// Format independent content of one translation file.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct TranslationFile {
    pub language: Option<String>,
    pub units: Vec<FileUnit>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tst_file_kind_from_ext() {
        assert_eq!(I18nFileKind::from_ext_hint(Path::new("po/zh_CN.po")).unwrap(), I18nFileKind::Gettext);
        assert_eq!(I18nFileKind::from_ext_hint(Path::new("po/app.POT")).unwrap(), I18nFileKind::Gettext);
        assert_eq!(I18nFileKind::from_ext_hint(Path::new("app_de.ts")).unwrap(), I18nFileKind::Linguist);
        assert!(I18nFileKind::from_ext_hint(Path::new("README")).is_err());
        assert!(I18nFileKind::from_ext_hint(Path::new("notes.txt")).is_err());
    }

    #[test]
    fn tst_unit_state_order() {
        assert!(UnitState::Obsolete < UnitState::Untranslated);
        assert!(UnitState::Fuzzy < UnitState::Translated);
    }

    #[test]
    fn tst_unitid() {
        let mut unit = FileUnit {
            source: vec!["File".to_string()],
            ..FileUnit::default()
        };
        assert_eq!(unit.unitid(), "File");
        unit.context = "menu".to_string();
        assert_eq!(unit.unitid(), "menu\u{4}File");
        unit.disambiguation = "verb".to_string();
        assert_eq!(unit.unitid(), "menu\u{4}File\u{4}verb");
    }
}

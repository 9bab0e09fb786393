// SPDX-FileCopyrightText: 2025 UnionTech Software Technology Co., Ltd.
//
// SPDX-License-Identifier: MIT

use std::path::Path;
use polib::catalog::Catalog;
use polib::message::{Message, MessageFlags, MessageView};
use polib::metadata::CatalogMetadata;
use polib::po_file::{self, POParseError};
use thiserror::Error as TeError;
use super::common::{FileUnit, TranslationFile, UnitState};

// ===== PO Basic =====

#[derive(Debug, Clone)]
pub struct Po {
    pub inner: Catalog,
}

impl Po {
    pub fn get_language(&self) -> String {
        self.inner.metadata.language.clone()
    }

    pub fn set_language(&mut self, language: &str) {
        self.inner.metadata.language = language.to_string();
    }
}

// ===== PO <-> TranslationFile =====

fn message_state(message: &dyn MessageView) -> UnitState {
    if message.is_translated() && message.is_fuzzy() {
        UnitState::Fuzzy
    } else if message.is_translated() {
        UnitState::Translated
    } else {
        UnitState::Untranslated
    }
}

impl Po {
    pub fn to_translation_file(&self) -> TranslationFile {
        let language = Some(self.get_language()).filter(|l| !l.is_empty());
        let mut units = Vec::new();
        for message in self.inner.messages() {
            let (source, target) = if message.is_plural() {
                let plural = message.msgid_plural().unwrap_or_default().to_string();
                let targets = message.msgstr_plural().map(|v| v.clone()).unwrap_or_default();
                (vec![message.msgid().to_string(), plural], targets)
            } else {
                (
                    vec![message.msgid().to_string()],
                    vec![message.msgstr().unwrap_or_default().to_string()],
                )
            };
            let locations = message.source()
                .split_whitespace()
                .map(str::to_string)
                .collect();
            let notes = Some(message.translator_comments().to_string()).filter(|c| !c.is_empty());
            units.push(FileUnit {
                context: message.msgctxt().unwrap_or_default().to_string(),
                source,
                target,
                plural: message.is_plural(),
                disambiguation: String::new(),
                state: message_state(message),
                locations,
                notes,
            });
        }
        TranslationFile { language, units }
    }

    /// Build a catalog out of `file`, keeping the header of `base` when given.
    ///
    /// Obsolete units are not written.
    pub fn from_translation_file(file: &TranslationFile, base: Option<&Po>) -> Po {
        let metadata = match base {
            Some(po) => po.inner.metadata.clone(),
            None => CatalogMetadata::new(),
        };
        let mut po = Po { inner: Catalog::new(metadata) };
        if let Some(language) = &file.language {
            po.set_language(language);
        }
        for unit in &file.units {
            if unit.state == UnitState::Obsolete {
                continue;
            }
            let mut flags = MessageFlags::new();
            if unit.state == UnitState::Fuzzy {
                flags.add_flag("fuzzy");
            }
            let source = unit.source.first().cloned().unwrap_or_default();
            let message = if unit.has_plural() {
                let plural_source = unit.source.get(1).cloned().unwrap_or_else(|| source.clone());
                Message::build_plural()
                    .with_msgctxt(unit.context.clone())
                    .with_msgid(source)
                    .with_msgid_plural(plural_source)
                    .with_msgstr_plural(unit.target.clone())
                    .with_source(unit.locations.join(" "))
                    .with_translator_comments(unit.notes.clone().unwrap_or_default())
                    .with_flags(flags)
                    .done()
            } else {
                Message::build_singular()
                    .with_msgctxt(unit.context.clone())
                    .with_msgid(source)
                    .with_msgstr(unit.target.first().cloned().unwrap_or_default())
                    .with_source(unit.locations.join(" "))
                    .with_translator_comments(unit.notes.clone().unwrap_or_default())
                    .with_flags(flags)
                    .done()
            };
            po.inner.append_or_update(message);
        }
        po
    }
}

// ===== PO Load & Save =====

#[derive(TeError, Debug)]
pub enum PoLoadError {
    #[error("Fail to parse PO file: {0}")]
    ParsePo(#[from] POParseError),
}

#[derive(TeError, Debug)]
pub enum PoSaveError {
    #[error("Fail to save PO file: {0}")]
    WritePo(#[from] std::io::Error),
}

impl Po {
    pub fn load_from_file(po_file: &Path) -> Result<Po, PoLoadError> {
        Ok(Po {
            inner: po_file::parse(po_file)?,
        })
    }

    #[cfg(test)]
    pub fn load_from_str(content: &str) -> Result<Po, PoLoadError> {
        let reader = std::io::Cursor::new(content.as_bytes());
        Ok(Po {
            inner: po_file::parse_from_reader(reader)?
        })
    }

    pub fn save_into_file(&self, po_file: &Path) -> Result<(), PoSaveError> {
        po_file::write_to_file(&self.inner, po_file)?;
        Ok(())
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;

    pub const TEST_DE_PO_CONTENT: &str = r#"msgid ""
msgstr ""
"MIME-Version: 1.0\n"
"Content-Type: text/plain; charset=UTF-8\n"
"Content-Transfer-Encoding: 8bit\n"
"Plural-Forms: nplurals=2; plural=(n != 1);\n"
"Language: de\n"

# Shown on the first page
#: tutorial.py:10
msgid "Welcome to the tutorial"
msgstr "Willkommen zum Tutorial"

#: tutorial.py:12
msgctxt "menu"
msgid "File"
msgstr ""

#, fuzzy
msgid "Open a file"
msgstr "Datei öffnen"

msgid "%d file"
msgid_plural "%d files"
msgstr[0] "%d Datei"
msgstr[1] "%d Dateien"
"#;

    #[test]
    fn tst_po_to_translation_file() {
        let po = Po::load_from_str(TEST_DE_PO_CONTENT).unwrap();
        assert_eq!(po.get_language(), "de");
        let file = po.to_translation_file();
        assert_eq!(file.language.as_deref(), Some("de"));
        assert_eq!(file.units.len(), 4);
        assert_eq!(file.units[0].state, UnitState::Translated);
        assert_eq!(file.units[0].locations, vec!["tutorial.py:10".to_string()]);
        assert_eq!(file.units[1].context, "menu");
        assert_eq!(file.units[1].state, UnitState::Untranslated);
        assert_eq!(file.units[2].state, UnitState::Fuzzy);
        assert!(file.units[3].has_plural());
        assert_eq!(file.units[3].target, vec!["%d Datei".to_string(), "%d Dateien".to_string()]);
    }

    #[test]
    fn tst_po_rebuild_keeps_units() {
        let po = Po::load_from_str(TEST_DE_PO_CONTENT).unwrap();
        let mut file = po.to_translation_file();
        file.units[1].target = vec!["Datei".to_string()];
        file.units[1].state = UnitState::Translated;
        file.units[2].state = UnitState::Obsolete;

        let rebuilt = Po::from_translation_file(&file, Some(&po));
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("de.po");
        rebuilt.save_into_file(&path).unwrap();

        let reloaded = Po::load_from_file(&path).unwrap().to_translation_file();
        assert_eq!(reloaded.language.as_deref(), Some("de"));
        assert_eq!(reloaded.units.len(), 3);
        assert_eq!(reloaded.units[1].target, vec!["Datei".to_string()]);
        assert_eq!(reloaded.units[1].state, UnitState::Translated);
        assert!(reloaded.units[2].has_plural());
    }

    #[test]
    fn tst_po_keeps_context_and_translator_comments() {
        let po = Po::load_from_str(TEST_DE_PO_CONTENT).unwrap();
        let file = po.to_translation_file();
        assert_eq!(file.units[0].notes.as_deref(), Some("Shown on the first page"));
        assert_eq!(file.units[0].context, "");
        assert_eq!(file.units[2].notes, None);

        let rebuilt = Po::from_translation_file(&file, Some(&po));
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("de.po");
        rebuilt.save_into_file(&path).unwrap();

        let reloaded = Po::load_from_file(&path).unwrap().to_translation_file();
        assert_eq!(reloaded.units[0].notes.as_deref(), Some("Shown on the first page"));
        assert_eq!(reloaded.units[1].context, "menu");
        assert_eq!(reloaded.units[1].source, vec!["File".to_string()]);
    }
}

// SPDX-FileCopyrightText: 2025 UnionTech Software Technology Co., Ltd.
//
// SPDX-License-Identifier: MIT

// Linguist .ts XML file spec: https://doc.qt.io/qt-6/linguist-ts-file-format.html

use std::fs::File;
use std::path::Path;
use thiserror::Error as TeError;
use serde::{Deserialize, Serialize};
use quick_xml::DeError;
use quick_xml::se::SeError;
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesText, Event};
use super::common::{FileUnit, TranslationFile, UnitState};

// ===== TS Basic =====

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename = "TS")]
pub struct Ts {
    #[serde(rename = "@language")]
    pub language: Option<String>,
    #[serde(rename = "@version")]
    pub version: String,
    #[serde(rename = "context", default)]
    pub contexts: Vec<Context>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Context {
    #[serde(rename = "name")]
    pub name: String,
    #[serde(rename = "message", default)]
    pub messages: Vec<Message>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Message {
    #[serde(rename = "location", default)]
    pub location: Vec<Location>,
    #[serde(rename = "source")]
    pub source: String,
    #[serde(rename = "translation")]
    pub translation: Translation,
    #[serde(rename = "comment", skip_serializing_if = "Option::is_none", default)]
    pub comment: Option<String>,
    #[serde(rename = "extracomment", skip_serializing_if = "Option::is_none", default)]
    pub extracomment: Option<String>,
    #[serde(rename = "@numerus", skip_serializing_if = "Option::is_none", default)]
    pub numerus: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum TranslationType {
    Unfinished,
    Vanished,
    Obsolete,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Translation {
    #[serde(rename = "@type", skip_serializing_if = "Option::is_none", default)]
    pub type_attr: Option<TranslationType>,
    #[serde(rename = "$value")]
    pub value: Option<String>,
    #[serde(rename = "numerusform", default)]
    pub numerus_forms: Vec<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Location {
    #[serde(rename = "@filename", skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(rename = "@line")]
    pub line: String,
}

// ===== TS <-> TranslationFile =====

impl Message {
    fn is_numerus(&self) -> bool {
        self.numerus.as_deref() == Some("yes")
    }

    fn state(&self) -> UnitState {
        let has_text = self.translation.value.as_deref().is_some_and(|v| !v.is_empty())
            || self.translation.numerus_forms.iter().any(|f| !f.is_empty());
        match self.translation.type_attr {
            Some(TranslationType::Vanished) | Some(TranslationType::Obsolete) => UnitState::Obsolete,
            Some(TranslationType::Unfinished) if has_text => UnitState::Fuzzy,
            Some(TranslationType::Unfinished) => UnitState::Untranslated,
            None => UnitState::Translated,
        }
    }

    fn to_file_unit(&self, context: &str) -> FileUnit {
        let (source, target) = if self.is_numerus() {
            (vec![self.source.clone()], self.translation.numerus_forms.clone())
        } else {
            (vec![self.source.clone()], vec![self.translation.value.clone().unwrap_or_default()])
        };
        let locations = self.location.iter()
            .map(|l| match &l.filename {
                Some(filename) => format!("{filename}:{}", l.line),
                None => l.line.clone(),
            })
            .collect();
        FileUnit {
            context: context.to_string(),
            source,
            target,
            plural: self.is_numerus(),
            disambiguation: self.comment.clone().unwrap_or_default(),
            state: self.state(),
            locations,
            notes: self.extracomment.clone(),
        }
    }

    fn from_file_unit(unit: &FileUnit) -> Message {
        let type_attr = match unit.state {
            UnitState::Translated => None,
            UnitState::Fuzzy | UnitState::Untranslated => Some(TranslationType::Unfinished),
            UnitState::Obsolete => Some(TranslationType::Obsolete),
        };
        let translation = if unit.has_plural() {
            Translation { type_attr, value: None, numerus_forms: unit.target.clone() }
        } else {
            let value = unit.target.first().cloned().filter(|v| !v.is_empty());
            Translation { type_attr, value, numerus_forms: Vec::new() }
        };
        let location = unit.locations.iter()
            .map(|l| match l.rsplit_once(':') {
                Some((filename, line)) => Location { filename: Some(filename.to_string()), line: line.to_string() },
                None => Location { filename: None, line: l.clone() },
            })
            .collect();
        Message {
            location,
            source: unit.source.first().cloned().unwrap_or_default(),
            translation,
            comment: Some(unit.disambiguation.clone()).filter(|c| !c.is_empty()),
            extracomment: unit.notes.clone(),
            numerus: unit.has_plural().then(|| "yes".to_string()),
        }
    }
}

impl Ts {
    pub fn to_translation_file(&self) -> TranslationFile {
        let units = self.contexts.iter()
            .flat_map(|context| context.messages.iter().map(|m| m.to_file_unit(&context.name)))
            .collect();
        TranslationFile { language: self.language.clone(), units }
    }

    /// Build a TS document out of `file`, grouping units by context in first-seen order.
    ///
    /// Unlike PO files, obsolete units are kept and marked `obsolete`.
    pub fn from_translation_file(file: &TranslationFile, base: Option<&Ts>) -> Ts {
        let mut contexts: Vec<Context> = Vec::new();
        for unit in &file.units {
            let message = Message::from_file_unit(unit);
            match contexts.iter_mut().find(|c| c.name == unit.context) {
                Some(context) => context.messages.push(message),
                None => contexts.push(Context { name: unit.context.clone(), messages: vec![message] }),
            }
        }
        Ts {
            language: file.language.clone().or_else(|| base.and_then(|ts| ts.language.clone())),
            version: base.map(|ts| ts.version.clone()).unwrap_or_else(|| "2.1".to_string()),
            contexts,
        }
    }
}

// ===== TS Load & Save =====

pub trait WriterExt {
    fn write_linguist_ts_file(
        &mut self,
        content: &Ts,
    ) -> Result<(), SeError>;
}

impl<W: std::io::Write> WriterExt for Writer<W> {
    fn write_linguist_ts_file(
        &mut self,
        content: &Ts,
    ) -> Result<(), SeError> {
        self.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        self.write_event(Event::DocType(BytesText::new("TS")))?;
        self.write_serializable("TS", content)
    }
}

#[derive(TeError, Debug)]
pub enum TsLoadError {
    #[error("Can not open file")]
    ReadFile(#[from] std::io::Error),
    #[error("Fail to deserialize file because: {0}")]
    Serde(#[from] DeError),
}

#[derive(TeError, Debug)]
pub enum TsSaveError {
    #[error("Can not create file")]
    CreateFile(#[from] std::io::Error),
    #[error("Fail to serialize file because: {0}")]
    Serde(#[from] SeError),
}

impl Ts {
    pub fn load_from_file(linguist_ts_file: &Path) -> Result<Ts, TsLoadError> {
        let file = File::open(linguist_ts_file)?;
        let file_reader = std::io::BufReader::new(file);
        Ok(quick_xml::de::from_reader::<_, Ts>(file_reader)?)
    }

    #[cfg(test)]
    pub fn load_from_str(content: &str) -> Result<Ts, TsLoadError> {
        Ok(quick_xml::de::from_str(content)?)
    }

    pub fn save_into_file(&self, linguist_ts_file: &Path) -> Result<(), TsSaveError> {
        let target_file = File::create(linguist_ts_file)?;
        let mut writer = Writer::new_with_indent(&target_file, b' ', 4);
        writer.write_linguist_ts_file(self)?;
        Ok(())
    }
}

// SPDX-FileCopyrightText: 2025 UnionTech Software Technology Co., Ltd.
//
// SPDX-License-Identifier: MIT

use std::time::SystemTime;
use serde::{Deserialize, Serialize};
use super::Id;
use crate::i18n_file::common::{FileUnit, UnitState, make_unitid};

/// Store names starting with this prefix hold terminology inside regular projects.
pub const TERMINOLOGY_STORE_PREFIX: &str = "pootle-terminology";

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreState {
    /// Discovered on disk, never parsed.
    #[default]
    New,
    Parsed,
}

/// Database side of one translation file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Store {
    pub id: Id,
    pub translation_project_id: Id,
    pub parent_id: Id,
    pub name: String,
    pub pootle_path: String,
    /// Path relative to the translation root, empty for stores without a file.
    #[serde(default)]
    pub file: String,
    /// Disk modification time at the last parse or sync.
    pub file_mtime: Option<SystemTime>,
    #[serde(default)]
    pub state: StoreState,
    #[serde(default)]
    pub obsolete: bool,
    /// Last time the content of this store changed.
    pub mtime: Option<SystemTime>,
    /// Database revision the file on disk reflects.
    #[serde(default)]
    pub last_sync_revision: u64,
}

impl Store {
    pub fn has_file(&self) -> bool {
        !self.file.is_empty()
    }

    pub fn is_terminology(&self) -> bool {
        self.name.starts_with(TERMINOLOGY_STORE_PREFIX)
    }
}

/// Ordered list of plural forms.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Multistring {
    pub strings: Vec<String>,
}

impl Multistring {
    pub fn new(strings: Vec<String>) -> Self {
        Multistring { strings }
    }

    pub fn single(text: &str) -> Self {
        Multistring { strings: vec![text.to_string()] }
    }

    /// First form, the one shown when plurals do not matter.
    pub fn as_str(&self) -> &str {
        self.strings.first().map(String::as_str).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.iter().all(|s| s.is_empty())
    }
}

impl std::fmt::Display for Multistring {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub id: Id,
    pub target: Multistring,
    #[serde(default)]
    pub score: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Unit {
    pub id: Id,
    pub store_id: Id,
    pub index: usize,
    pub unitid: String,
    #[serde(default)]
    pub context: String,
    pub source: Multistring,
    pub target: Multistring,
    #[serde(default)]
    pub plural: bool,
    #[serde(default)]
    pub disambiguation: String,
    pub state: UnitState,
    #[serde(default)]
    pub locations: Vec<String>,
    pub notes: Option<String>,
    /// Database revision of the last change.
    pub revision: u64,
    #[serde(default)]
    pub suggestions: Vec<Suggestion>,
}

impl Unit {
    pub fn has_plural(&self) -> bool {
        self.plural
    }

    pub fn is_translated(&self) -> bool {
        self.state == UnitState::Translated
    }

    pub fn is_obsolete(&self) -> bool {
        self.state == UnitState::Obsolete
    }

    pub fn source_wordcount(&self) -> u64 {
        count_words(self.source.as_str())
    }

    pub fn to_file_unit(&self) -> FileUnit {
        FileUnit {
            context: self.context.clone(),
            source: self.source.strings.clone(),
            target: self.target.strings.clone(),
            plural: self.plural,
            disambiguation: self.disambiguation.clone(),
            state: self.state,
            locations: self.locations.clone(),
            notes: self.notes.clone(),
        }
    }

    /// Copy the translatable content of `unit`, returns whether anything differed.
    pub fn update_source(&mut self, unit: &FileUnit) -> bool {
        let source = Multistring::new(unit.source.clone());
        let changed = self.source != source
            || self.context != unit.context
            || self.plural != unit.plural
            || self.disambiguation != unit.disambiguation
            || self.locations != unit.locations
            || self.notes != unit.notes;
        self.source = source;
        self.context = unit.context.clone();
        self.plural = unit.plural;
        self.disambiguation = unit.disambiguation.clone();
        self.unitid = make_unitid(&unit.context, self.source.as_str(), &unit.disambiguation);
        self.locations = unit.locations.clone();
        self.notes = unit.notes.clone();
        changed
    }

    /// Take the translation of `unit`, returns whether anything differed.
    pub fn update_target(&mut self, unit: &FileUnit) -> bool {
        let target = Multistring::new(unit.target.clone());
        let changed = self.target != target || self.state != unit.state;
        self.target = target;
        self.state = unit.state;
        changed
    }
}

fn count_words(text: &str) -> u64 {
    text.split_whitespace().count() as u64
}

/// Unit and source word counts of a store or translation project.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct QuickStats {
    pub total: u64,
    pub translated: u64,
    pub fuzzy: u64,
    pub untranslated: u64,
    pub totalsourcewords: u64,
    pub translatedsourcewords: u64,
    pub fuzzysourcewords: u64,
    pub untranslatedsourcewords: u64,
}

impl QuickStats {
    pub fn add_unit(&mut self, unit: &Unit) {
        let words = unit.source_wordcount();
        match unit.state {
            UnitState::Obsolete => return,
            UnitState::Translated => {
                self.translated += 1;
                self.translatedsourcewords += words;
            }
            UnitState::Fuzzy => {
                self.fuzzy += 1;
                self.fuzzysourcewords += words;
            }
            UnitState::Untranslated => {
                self.untranslated += 1;
                self.untranslatedsourcewords += words;
            }
        }
        self.total += 1;
        self.totalsourcewords += words;
    }

    /// Share of translated source words, truncated.
    pub fn translated_percentage(&self) -> u64 {
        percentage(self.translatedsourcewords, self.totalsourcewords)
    }

    /// Share of translated units, truncated.
    pub fn str_translated_percentage(&self) -> u64 {
        percentage(self.translated, self.total)
    }

    /// Completeness value used for sorting statistics.
    pub fn completeness(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.translated as f64 / self.total as f64 * 100.0
        }
    }
}

fn percentage(part: u64, total: u64) -> u64 {
    part * 100 / total.max(1)
}

impl std::ops::AddAssign<&Self> for QuickStats {
    fn add_assign(&mut self, rhs: &Self) {
        self.total += rhs.total;
        self.translated += rhs.translated;
        self.fuzzy += rhs.fuzzy;
        self.untranslated += rhs.untranslated;
        self.totalsourcewords += rhs.totalsourcewords;
        self.translatedsourcewords += rhs.translatedsourcewords;
        self.fuzzysourcewords += rhs.fuzzysourcewords;
        self.untranslatedsourcewords += rhs.untranslatedsourcewords;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit(source: &str, state: UnitState) -> Unit {
        Unit {
            id: 1,
            store_id: 1,
            index: 0,
            unitid: source.to_string(),
            context: String::new(),
            source: Multistring::single(source),
            target: Multistring::single(""),
            plural: false,
            disambiguation: String::new(),
            state,
            locations: Vec::new(),
            notes: None,
            revision: 1,
            suggestions: Vec::new(),
        }
    }

    #[test]
    fn tst_quick_stats() {
        let mut stats = QuickStats::default();
        stats.add_unit(&unit("Open the file", UnitState::Translated));
        stats.add_unit(&unit("Close", UnitState::Fuzzy));
        stats.add_unit(&unit("Save all files now", UnitState::Untranslated));
        stats.add_unit(&unit("Gone", UnitState::Obsolete));
        assert_eq!(stats.total, 3);
        assert_eq!(stats.totalsourcewords, 8);
        assert_eq!(stats.translatedsourcewords, 3);
        assert_eq!(stats.translated_percentage(), 37);
        assert_eq!(stats.str_translated_percentage(), 33);
    }

    #[test]
    fn tst_empty_stats_percentage() {
        let stats = QuickStats::default();
        assert_eq!(stats.translated_percentage(), 0);
        assert_eq!(stats.completeness(), 0.0);
    }
}

// SPDX-FileCopyrightText: 2025 UnionTech Software Technology Co., Ltd.
//
// SPDX-License-Identifier: MIT

use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::SystemTime;
use lru::LruCache;
use regex::Regex;
use serde::Serialize;
use tracing::debug;

use crate::models::{Id, Unit};

/// Default number of translation projects whose matcher is kept around.
pub const DEFAULT_PARSE_POOL_SIZE: usize = 40;

/// One glossary entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Term {
    pub unit_id: Id,
    pub source: String,
    pub target: String,
}

/// Finds glossary terms inside a text.
#[derive(Debug)]
pub struct Matcher {
    word_regex: Regex,
    /// First normalized word of a term -> (normalized words, term)
    index: HashMap<String, Vec<(Vec<String>, Term)>>,
}

impl Matcher {
    pub fn new<'a>(units: impl Iterator<Item = &'a Unit>) -> Self {
        let word_regex = Regex::new(r"\w+").unwrap();
        let mut index: HashMap<String, Vec<(Vec<String>, Term)>> = HashMap::new();
        for unit in units.filter(|u| u.is_translated()) {
            let words = normalized_words(&word_regex, unit.source.as_str());
            let Some(first) = words.first().cloned() else {
                continue;
            };
            let term = Term {
                unit_id: unit.id,
                source: unit.source.as_str().to_string(),
                target: unit.target.as_str().to_string(),
            };
            index.entry(first).or_default().push((words, term));
        }
        for candidates in index.values_mut() {
            // Longest terms first so "file manager" wins over "file".
            candidates.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
        }
        Matcher { word_regex, index }
    }

    pub fn len(&self) -> usize {
        self.index.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Terms occurring in `text` as whole-word sequences, longest first.
    pub fn matches(&self, text: &str) -> Vec<Term> {
        let words = normalized_words(&self.word_regex, text);
        let mut found: Vec<(usize, Term)> = Vec::new();
        for (pos, word) in words.iter().enumerate() {
            let Some(candidates) = self.index.get(word) else {
                continue;
            };
            for (term_words, term) in candidates {
                let end = pos + term_words.len();
                if end <= words.len()
                    && words[pos..end] == term_words[..]
                    && !found.iter().any(|(_, t)| t.unit_id == term.unit_id)
                {
                    found.push((term_words.len(), term.clone()));
                }
            }
        }
        found.sort_by(|a, b| b.0.cmp(&a.0));
        found.into_iter().map(|(_, term)| term).collect()
    }
}

fn normalized_words(word_regex: &Regex, text: &str) -> Vec<String> {
    word_regex.find_iter(text)
        .map(|m| fold_plural(&m.as_str().to_lowercase()))
        .collect()
}

/// Crude English plural folding, enough for glossary lookups.
fn fold_plural(word: &str) -> String {
    if word.chars().count() > 3 && word.ends_with("ies") {
        format!("{}y", &word[..word.len() - 3])
    } else if word.chars().count() > 3 && word.ends_with('s') && !word.ends_with("ss") {
        word[..word.len() - 1].to_string()
    } else {
        word.to_string()
    }
}

/// Non-persistent state of one translation project.
#[derive(Debug, Clone, Default)]
struct TermMatcherState {
    matcher: Option<Arc<Matcher>>,
    mtime: Option<SystemTime>,
}

/// Bounded cache of terminology matchers keyed by translation project id.
///
/// Entries are replaced whole, so concurrent callers can at worst build the same matcher twice.
pub struct MatcherCache {
    entries: Mutex<LruCache<Id, TermMatcherState>>,
}

impl MatcherCache {
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        MatcherCache {
            entries: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Matcher for `tp_id` built from a terminology project at modification time `mtime`.
    ///
    /// Calls `build` only when no matcher exists for that exact `mtime`.
    pub fn get_or_build(&self, tp_id: Id, mtime: SystemTime, build: impl FnOnce() -> Matcher) -> Arc<Matcher> {
        {
            let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
            if let Some(state) = entries.get(&tp_id) {
                if let (Some(matcher), Some(cached_mtime)) = (&state.matcher, state.mtime) {
                    if cached_mtime == mtime {
                        return Arc::clone(matcher);
                    }
                }
            }
        }

        debug!("Building terminology matcher for translation project {tp_id}");
        let matcher = Arc::new(build());
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.put(tp_id, TermMatcherState {
            matcher: Some(Arc::clone(&matcher)),
            mtime: Some(mtime),
        });
        matcher
    }

    #[cfg(test)]
    pub fn contains(&self, tp_id: Id) -> bool {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner).contains(&tp_id)
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}

impl Default for MatcherCache {
    fn default() -> Self {
        Self::new(DEFAULT_PARSE_POOL_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use crate::i18n_file::common::UnitState;
    use crate::models::Multistring;

    fn term(id: Id, source: &str, target: &str) -> Unit {
        Unit {
            id,
            store_id: 1,
            index: id as usize,
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

    #[test]
    fn tst_matcher_finds_whole_words() {
        let units = vec![
            term(1, "file", "Datei"),
            term(2, "file manager", "Dateiverwaltung"),
            term(3, "pile", "Stapel"),
        ];
        let matcher = Matcher::new(units.iter());
        assert_eq!(matcher.len(), 3);

        let found = matcher.matches("Open the File Manager to copy files");
        let sources: Vec<&str> = found.iter().map(|t| t.source.as_str()).collect();
        assert_eq!(sources, vec!["file manager", "file"]);
        assert!(matcher.matches("profile").is_empty());
    }

    #[test]
    fn tst_matcher_skips_untranslated_terms() {
        let mut untranslated = term(1, "folder", "");
        untranslated.state = UnitState::Untranslated;
        let matcher = Matcher::new([untranslated].iter());
        assert_eq!(matcher.len(), 0);
    }

    #[test]
    fn tst_plural_folding() {
        assert_eq!(fold_plural("files"), "file");
        assert_eq!(fold_plural("libraries"), "library");
        assert_eq!(fold_plural("class"), "class");
        assert_eq!(fold_plural("is"), "is");
    }

    #[test]
    fn tst_cache_hit_and_refill() {
        let cache = MatcherCache::new(4);
        let units = vec![term(1, "file", "Datei")];
        let t0 = SystemTime::UNIX_EPOCH + Duration::from_secs(100);
        let t1 = t0 + Duration::from_secs(1);

        let first = cache.get_or_build(7, t0, || Matcher::new(units.iter()));
        let second = cache.get_or_build(7, t0, || panic!("matcher must come from the cache"));
        assert!(Arc::ptr_eq(&first, &second));

        let third = cache.get_or_build(7, t1, || Matcher::new(units.iter()));
        assert!(!Arc::ptr_eq(&first, &third));
    }

    #[test]
    fn tst_cache_evicts_least_recently_used() {
        let cache = MatcherCache::new(2);
        let t0 = SystemTime::UNIX_EPOCH;
        cache.get_or_build(1, t0, || Matcher::new(std::iter::empty()));
        cache.get_or_build(2, t0, || Matcher::new(std::iter::empty()));
        // Touch 1 so 2 becomes the eviction candidate.
        cache.get_or_build(1, t0, || panic!("cached"));
        cache.get_or_build(3, t0, || Matcher::new(std::iter::empty()));
        assert_eq!(cache.len(), 2);
        assert!(cache.contains(1));
        assert!(!cache.contains(2));
        assert!(cache.contains(3));
    }
}

// SPDX-FileCopyrightText: 2025 UnionTech Software Technology Co., Ltd.
//
// SPDX-License-Identifier: MIT

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;
use std::time::SystemTime;
use thiserror::Error as TeError;
use tracing::{debug, error, info, warn};

use crate::checks::{CheckReport, Checker, filter_error_handler};
use crate::database::{Database, DbError};
use crate::i18n_file::TranslationFileIo;
use crate::models::{Id, Language, Project, QuickStats, StoreState, TranslationProject, TreeStyle, Unit};
use crate::project_tree::{self, FileMatcher, ProjectTreeError, ScanResult, does_not_exist};
use crate::store_tags::{self, PluralForm};
use crate::terminology::{Matcher, MatcherCache};
use crate::updater::{self, SyncOptions, UpdateError};

#[derive(TeError, Debug)]
pub enum RegistryError {
    #[error(transparent)]
    Db(#[from] DbError),
    #[error(transparent)]
    ProjectTree(#[from] ProjectTreeError),
    #[error(transparent)]
    Update(#[from] UpdateError),
}

/// Whether creating a project or language triggers the scan of its counterparts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateMode {
    /// Link to every existing language/project found on disk and import the files.
    Scan,
    /// Only insert the record, as done when loading fixtures.
    Raw,
}

/// Operations over the registry that need the translation tree on disk.
pub struct Registry<'a> {
    pub db: &'a mut Database,
    podirectory: &'a Path,
    io: &'a dyn TranslationFileIo,
    term_cache: &'a MatcherCache,
}

impl<'a> Registry<'a> {
    pub fn new(db: &'a mut Database, podirectory: &'a Path, io: &'a dyn TranslationFileIo, term_cache: &'a MatcherCache) -> Self {
        Registry { db, podirectory, io, term_cache }
    }

    pub fn podirectory(&self) -> &Path {
        self.podirectory
    }

    fn tree_style(&self, project: &Project) -> TreeStyle {
        let known_codes: Vec<&str> = self.db.languages.values().map(|l| l.code.as_str()).collect();
        project_tree::get_tree_style(project, &project.real_path(self.podirectory), &known_codes)
    }

    fn language_and_project(&self, tp: &TranslationProject) -> Result<(&Language, &Project), DbError> {
        Ok((self.db.language(tp.language_id)?, self.db.project(tp.project_id)?))
    }

    pub fn tp_code(&self, tp_id: Id) -> Result<String, DbError> {
        let tp = self.db.translation_project(tp_id)?;
        let (language, project) = self.language_and_project(tp)?;
        Ok(TranslationProject::code(language, project))
    }

    pub fn tp_fullname(&self, tp_id: Id) -> Result<String, DbError> {
        let tp = self.db.translation_project(tp_id)?;
        let (language, project) = self.language_and_project(tp)?;
        Ok(TranslationProject::fullname(language, project))
    }
}

// ===== Translation project lifecycle =====

impl Registry<'_> {
    /// Get or create the translation project of `language_id` and `project_id` when its files exist on disk.
    ///
    /// Failures are logged and reported as `None`.
    pub fn create_translation_project(&mut self, language_id: Id, project_id: Id) -> Option<Id> {
        match self.try_create_translation_project(language_id, project_id) {
            Ok(tp_id) => tp_id,
            Err(e) => {
                warn!("Fail to create translation project: {e}");
                None
            }
        }
    }

    fn try_create_translation_project(&mut self, language_id: Id, project_id: Id) -> Result<Option<Id>, RegistryError> {
        let language = self.db.language(language_id)?.clone();
        let project = self.db.project(project_id)?.clone();
        let project_dir = project.real_path(self.podirectory);
        let style = self.tree_style(&project);
        if !project_tree::translation_project_dir_exists(&language, &project, &project_dir, style) {
            return Ok(None);
        }
        if let Some(tp) = self.db.translation_project_for(language_id, project_id) {
            return Ok(Some(tp.id));
        }

        let directory_id = self.db.get_or_make_subdir(language.directory_id, &project.code)?;
        let directory = self.db.directory(directory_id)?;
        let pootle_path = directory.pootle_path.clone();
        let make_dirs = !directory.obsolete;
        let real_path = project_tree::get_translation_project_dir(&language, &project_dir, style, make_dirs)?;

        let mut tp = TranslationProject {
            id: self.db.next_id(),
            language_id,
            project_id,
            directory_id,
            pootle_path,
            real_path: None,
            creation_time: SystemTime::now(),
            cached_mtime: None,
        };
        tp.set_abs_real_path(self.podirectory, Some(&real_path));
        Ok(Some(self.db.insert_translation_project(tp)?))
    }

    /// Like [`Self::create_translation_project`], bringing back a translation project whose directory was obsoleted.
    pub fn create_or_resurrect_translation_project(&mut self, language_id: Id, project_id: Id) -> Result<Option<Id>, RegistryError> {
        let Some(tp_id) = self.create_translation_project(language_id, project_id) else {
            return Ok(None);
        };
        let tp = self.db.translation_project(tp_id)?;
        let pootle_path = tp.pootle_path.clone();
        let directory_id = tp.directory_id;
        let directory = self.db.directory_mut(directory_id)?;
        if directory.obsolete {
            directory.obsolete = false;
            info!("Resurrected {pootle_path}");
        } else {
            info!("Created {pootle_path}");
        }
        Ok(Some(tp_id))
    }

    /// Disable projects without a directory on disk, link the others to every language lacking a live translation project.
    ///
    /// `languages` and `projects` restrict the scan to the given codes.
    pub fn scan_translation_projects(&mut self, languages: Option<&[String]>, projects: Option<&[String]>) -> Result<(), RegistryError> {
        let project_ids: Vec<Id> = self.db.projects.values()
            .filter(|p| projects.is_none_or(|codes| codes.contains(&p.code)))
            .map(|p| p.id)
            .collect();

        for project_id in project_ids {
            let project = self.db.project(project_id)?;
            if does_not_exist(&project.real_path(self.podirectory)) {
                info!("Disabling {}", project.code);
                self.db.project_mut(project_id)?.disabled = true;
                continue;
            }

            let linked: HashSet<Id> = self.db.live_translation_projects()
                .filter(|tp| tp.project_id == project_id)
                .map(|tp| tp.language_id)
                .collect();
            let language_ids: Vec<Id> = self.db.languages.values()
                .filter(|l| !linked.contains(&l.id))
                .filter(|l| languages.is_none_or(|codes| codes.contains(&l.code)))
                .map(|l| l.id)
                .collect();
            for language_id in language_ids {
                self.create_or_resurrect_translation_project(language_id, project_id)?;
            }
        }
        Ok(())
    }

    pub fn create_project(&mut self, project: Project, mode: CreateMode) -> Result<Id, RegistryError> {
        let project_id = self.db.insert_project(project)?;
        if mode == CreateMode::Scan {
            self.scan_languages(project_id)?;
        }
        Ok(project_id)
    }

    pub fn create_language(&mut self, language: Language, mode: CreateMode) -> Result<Id, RegistryError> {
        let language_id = self.db.insert_language(language)?;
        if mode == CreateMode::Scan {
            self.scan_projects(language_id)?;
        }
        Ok(language_id)
    }

    /// Link a newly created project to every language found on disk.
    fn scan_languages(&mut self, project_id: Id) -> Result<(), RegistryError> {
        if self.db.project(project_id)?.disabled {
            return Ok(());
        }
        let language_ids: Vec<Id> = self.db.languages.keys().copied().collect();
        for language_id in language_ids {
            if let Some(tp_id) = self.create_translation_project(language_id, project_id) {
                self.update_from_disk(tp_id, false, false)?;
            }
        }
        Ok(())
    }

    /// Link a newly created language to every enabled project having files for it.
    fn scan_projects(&mut self, language_id: Id) -> Result<(), RegistryError> {
        let project_ids: Vec<Id> = self.db.projects.values()
            .filter(|p| !p.disabled)
            .map(|p| p.id)
            .collect();
        for project_id in project_ids {
            if let Some(tp_id) = self.create_translation_project(language_id, project_id) {
                self.update_from_disk(tp_id, false, false)?;
            }
        }
        Ok(())
    }

    /// The terminology translation project of `language_id`, if there is one.
    pub fn get_terminology_project(&self, language_id: Id) -> Option<&TranslationProject> {
        self.db.translation_projects.values()
            .filter(|tp| tp.language_id == language_id)
            .find(|tp| self.db.projects.get(&tp.project_id).is_some_and(Project::is_terminology))
    }

    pub fn delete_translation_project(&mut self, tp_id: Id) -> Result<(), RegistryError> {
        let pootle_path = self.db.translation_project(tp_id)?.pootle_path.clone();
        self.db.delete_translation_project(tp_id)?;
        info!("Deleted {pootle_path}");
        Ok(())
    }
}

// ===== Disk synchronization =====

impl Registry<'_> {
    /// Mirror the files of the translation project into directories and stores.
    pub fn scan_files(&mut self, tp_id: Id) -> Result<ScanResult, RegistryError> {
        let tp = self.db.translation_project(tp_id)?;
        let (language, project) = self.language_and_project(tp)?;
        let style = self.tree_style(project);
        let matcher = FileMatcher::new(language, project, style);
        Ok(project_tree::add_files(self.db, self.podirectory, tp_id, matcher)?)
    }

    /// Update all stores to reflect the state on disk.
    ///
    /// Returns whether any store content changed. Stores obsoleted by the scan are not
    /// reported, so the result is `false` when obsolescence was the only change.
    pub fn update_from_disk(&mut self, tp_id: Id, force: bool, overwrite: bool) -> Result<bool, RegistryError> {
        info!("Scanning for new files in {}", self.db.translation_project(tp_id)?.pootle_path);
        let scan = self.scan_files(tp_id)?;
        debug!(
            "Found {} files, {} new stores, {} obsoleted stores",
            scan.all_files.len(), scan.new_stores.len(), scan.obsoleted_stores.len(),
        );

        let stores: Vec<(Id, String, String, Option<SystemTime>)> = self.db.live_stores_of(tp_id)
            .filter(|s| s.has_file())
            .map(|s| (s.id, s.pootle_path.clone(), s.file.clone(), s.file_mtime))
            .collect();

        let mut changed = false;
        for (store_id, pootle_path, file, file_mtime) in &stores {
            let disk_mtime = match self.io.mtime(&self.podirectory.join(file)) {
                Ok(mtime) => mtime,
                Err(e) => {
                    error!("{e}");
                    continue;
                }
            };
            if !force && disk_mtime == *file_mtime {
                debug!("File didn't change since last sync, skipping {pootle_path}");
                continue;
            }
            match updater::update_store_from_disk(self.db, self.io, self.podirectory, *store_id, overwrite) {
                Ok(store_changed) => changed |= store_changed,
                Err(e) => error!("Fail to update {pootle_path} from disk: {e}"),
            }
        }

        if changed || stores.is_empty() {
            self.refresh_cached_mtime(tp_id)?;
        }
        Ok(changed)
    }

    fn refresh_cached_mtime(&mut self, tp_id: Id) -> Result<(), DbError> {
        let mtime = self.db.live_stores_of(tp_id).filter_map(|s| s.mtime).max();
        self.db.translation_project_mut(tp_id)?.cached_mtime = mtime;
        Ok(())
    }

    /// Write unsaved work of all parsed stores to disk, returns how many files were written.
    pub fn sync(&mut self, tp_id: Id, conservative: bool, skip_missing: bool, only_newer: bool) -> Result<usize, RegistryError> {
        let options = SyncOptions {
            update_structure: !conservative,
            conservative,
            skip_missing,
            only_newer,
        };
        let store_ids: Vec<Id> = self.db.live_stores_of(tp_id)
            .filter(|s| s.has_file() && s.state >= StoreState::Parsed)
            .map(|s| s.id)
            .collect();
        let mut written = 0;
        for store_id in store_ids {
            if updater::sync_store(self.db, self.io, self.podirectory, store_id, options)? {
                written += 1;
            }
        }
        Ok(written)
    }
}

// ===== Terminology, statistics & checks =====

impl Registry<'_> {
    /// Matcher over the terminology of the translation project's language.
    ///
    /// `None` for the terminology project itself, or when the language has no parsed terminology.
    pub fn term_matcher(&self, tp_id: Id) -> Result<Option<Arc<Matcher>>, RegistryError> {
        let tp = self.db.translation_project(tp_id)?;
        if self.db.project(tp.project_id)?.is_terminology() {
            return Ok(None);
        }
        let Some(term_tp) = self.get_terminology_project(tp.language_id) else {
            return Ok(None);
        };
        let Some(mtime) = term_tp.cached_mtime else {
            return Ok(None);
        };
        let term_tp_id = term_tp.id;
        let matcher = self.term_cache.get_or_build(tp_id, mtime, || {
            let store_ids: HashSet<Id> = self.db.live_stores_of(term_tp_id).map(|s| s.id).collect();
            Matcher::new(self.db.units.values().filter(|u| store_ids.contains(&u.store_id) && !u.is_obsolete()))
        });
        Ok(Some(matcher))
    }

    pub fn stats(&self, tp_id: Id) -> QuickStats {
        let mut stats = QuickStats::default();
        for store in self.db.live_stores_of(tp_id) {
            stats += &self.store_stats(store.id);
        }
        stats
    }

    pub fn store_stats(&self, store_id: Id) -> QuickStats {
        let mut stats = QuickStats::default();
        for unit in self.db.units_of(store_id) {
            stats.add_unit(unit);
        }
        stats
    }

    /// Target forms of `unit`, using the plural count of its language when `nplurals` is not given.
    pub fn pluralize_target(&self, unit: &Unit, nplurals: Option<usize>) -> Vec<PluralForm> {
        let nplurals = nplurals.or_else(|| {
            let store = self.db.stores.get(&unit.store_id)?;
            let tp = self.db.translation_projects.get(&store.translation_project_id)?;
            self.db.languages.get(&tp.language_id)?.nplurals
        });
        store_tags::pluralize_target(unit, nplurals)
    }

    /// Run the project's quality checks over every live unit; only units with failures are returned.
    pub fn check(&self, tp_id: Id) -> Result<Vec<(Id, CheckReport)>, RegistryError> {
        let tp = self.db.translation_project(tp_id)?;
        let checker = Checker::for_project(self.db.project(tp.project_id)?);
        let tp_code = self.tp_code(tp_id)?;
        debug!("Checking {tp_code} with {}", checker.filter_names().collect::<Vec<_>>().join(", "));
        let mut failed = Vec::new();
        for store in self.db.live_stores_of(tp_id) {
            for unit in self.db.units_of(store.id).into_iter().filter(|u| !u.is_obsolete()) {
                let report = checker.run(unit, |name, e| filter_error_handler(&tp_code, name, e));
                if !report.passed() {
                    failed.push((unit.id, report));
                }
            }
        }
        Ok(failed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::fs;
    use std::path::PathBuf;
    use std::time::Duration;
    use crate::i18n_file::common::{I18nFileKind, TranslationFile, UnitState};
    use crate::i18n_file::{DiskFileIo, FileIoError};
    use crate::models::Multistring;

    /// Disk I/O that counts how often files get parsed.
    #[derive(Default)]
    struct CountingIo {
        loads: Cell<usize>,
    }

    impl TranslationFileIo for CountingIo {
        fn load(&self, path: &Path) -> Result<TranslationFile, FileIoError> {
            self.loads.set(self.loads.get() + 1);
            DiskFileIo.load(path)
        }

        fn save(&self, path: &Path, content: &TranslationFile) -> Result<(), FileIoError> {
            DiskFileIo.save(path, content)
        }
    }

    fn po_content(entries: &[(&str, &str)]) -> String {
        let mut content = String::from("msgid \"\"\nmsgstr \"\"\n\"Content-Type: text/plain; charset=UTF-8\\n\"\n\"Language: de\\n\"\n");
        for (msgid, msgstr) in entries {
            content.push_str(&format!("\nmsgid \"{msgid}\"\nmsgstr \"{msgstr}\"\n"));
        }
        content
    }

    /// Write `path` and move its modification time `secs` seconds after the epoch.
    fn write_po(path: &Path, entries: &[(&str, &str)], secs: u64) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, po_content(entries)).unwrap();
        set_mtime(path, secs);
    }

    fn set_mtime(path: &Path, secs: u64) {
        let file = fs::File::options().write(true).open(path).unwrap();
        file.set_modified(SystemTime::UNIX_EPOCH + Duration::from_secs(secs)).unwrap();
    }

    fn language(code: &str) -> Language {
        Language {
            id: 0,
            code: code.to_string(),
            fullname: code.to_uppercase(),
            nplurals: Some(2),
            plural_equation: "(n != 1)".to_string(),
            directory_id: 0,
        }
    }

    fn project(code: &str, checkstyle: &str) -> Project {
        Project {
            id: 0,
            code: code.to_string(),
            fullname: code.to_string(),
            checkstyle: checkstyle.to_string(),
            localfiletype: I18nFileKind::Gettext,
            treestyle: TreeStyle::Auto,
            source_language: "en".to_string(),
            disabled: false,
            directory_id: 0,
        }
    }

    struct Fixture {
        _dir: tempfile::TempDir,
        podir: PathBuf,
        db: Database,
        io: CountingIo,
        cache: MatcherCache,
    }

    impl Fixture {
        fn new() -> Self {
            let dir = tempfile::tempdir().unwrap();
            let podir = dir.path().join("po");
            fs::create_dir_all(&podir).unwrap();
            Fixture {
                _dir: dir,
                podir,
                db: Database::default(),
                io: CountingIo::default(),
                cache: MatcherCache::new(4),
            }
        }

        fn registry(&mut self) -> Registry<'_> {
            Registry::new(&mut self.db, &self.podir, &self.io, &self.cache)
        }
    }

    /// `de` language plus a `tutorial` project with one file, linked and parsed.
    fn tutorial_fixture() -> (Fixture, Id) {
        let mut fixture = Fixture::new();
        write_po(&fixture.podir.join("tutorial/de/app.po"), &[("Open", "Öffnen"), ("Close", "")], 100);
        let mut registry = fixture.registry();
        let de = registry.create_language(language("de"), CreateMode::Raw).unwrap();
        let tutorial = registry.create_project(project("tutorial", "standard"), CreateMode::Scan).unwrap();
        let tp_id = registry.db.translation_project_for(de, tutorial).unwrap().id;
        (fixture, tp_id)
    }

    #[test]
    fn tst_create_project_scans_languages() {
        let (fixture, tp_id) = tutorial_fixture();
        let tp = fixture.db.translation_project(tp_id).unwrap();
        assert_eq!(tp.pootle_path, "/de/tutorial/");
        assert_eq!(tp.real_path.as_deref(), Some("tutorial/de"));
        assert_eq!(fixture.io.loads.get(), 1);

        let stores: Vec<_> = fixture.db.live_stores_of(tp_id).collect();
        assert_eq!(stores.len(), 1);
        assert_eq!(stores[0].pootle_path, "/de/tutorial/app.po");
        assert_eq!(stores[0].state, StoreState::Parsed);
        assert_eq!(fixture.db.units_of(stores[0].id).len(), 2);
    }

    #[test]
    fn tst_unchanged_file_is_not_reparsed() {
        let (mut fixture, tp_id) = tutorial_fixture();
        let changed = fixture.registry().update_from_disk(tp_id, false, false).unwrap();
        assert!(!changed);
        assert_eq!(fixture.io.loads.get(), 1);

        // Forced updates reparse regardless of the watermark.
        fixture.registry().update_from_disk(tp_id, true, false).unwrap();
        assert_eq!(fixture.io.loads.get(), 2);
    }

    #[test]
    fn tst_changed_file_is_reparsed_once() {
        let (mut fixture, tp_id) = tutorial_fixture();
        write_po(&fixture.podir.join("tutorial/de/app.po"), &[("Open", "Öffnen"), ("Close", "Schließen")], 200);

        let changed = fixture.registry().update_from_disk(tp_id, false, false).unwrap();
        assert!(changed);
        assert_eq!(fixture.io.loads.get(), 2);
        assert_eq!(fixture.registry().stats(tp_id).translated, 2);

        assert!(!fixture.registry().update_from_disk(tp_id, false, false).unwrap());
        assert_eq!(fixture.io.loads.get(), 2);
    }

    #[test]
    fn tst_removed_file_only_obsoletes_store() {
        let (mut fixture, tp_id) = tutorial_fixture();
        write_po(&fixture.podir.join("tutorial/de/help.po"), &[("Help", "Hilfe")], 100);
        fixture.registry().update_from_disk(tp_id, false, false).unwrap();
        assert_eq!(fixture.db.live_stores_of(tp_id).count(), 2);

        fs::remove_file(fixture.podir.join("tutorial/de/help.po")).unwrap();
        let changed = fixture.registry().update_from_disk(tp_id, false, false).unwrap();
        assert!(!changed);
        assert_eq!(fixture.db.live_stores_of(tp_id).count(), 1);
        assert_eq!(fixture.db.stores_of(tp_id).count(), 2);

        // The file coming back resurrects the store.
        write_po(&fixture.podir.join("tutorial/de/help.po"), &[("Help", "Hilfe")], 300);
        fixture.registry().update_from_disk(tp_id, false, false).unwrap();
        assert_eq!(fixture.db.live_stores_of(tp_id).count(), 2);
    }

    #[test]
    fn tst_scan_files_reports_found_files() {
        let (mut fixture, tp_id) = tutorial_fixture();
        write_po(&fixture.podir.join("tutorial/de/help.po"), &[("Help", "Hilfe")], 100);

        let scan = fixture.registry().scan_files(tp_id).unwrap();
        assert_eq!(scan.all_files.len(), 2);
        assert!(scan.all_files.contains(&fixture.podir.join("tutorial/de/help.po")));
        assert_eq!(scan.new_stores.len(), 1);
        assert_eq!(fixture.db.store(scan.new_stores[0]).unwrap().pootle_path, "/de/tutorial/help.po");
        assert!(scan.obsoleted_stores.is_empty());

        let help_id = scan.new_stores[0];
        fs::remove_file(fixture.podir.join("tutorial/de/help.po")).unwrap();
        let scan = fixture.registry().scan_files(tp_id).unwrap();
        assert_eq!(scan.all_files, vec![fixture.podir.join("tutorial/de/app.po")]);
        assert!(scan.new_stores.is_empty());
        assert_eq!(scan.obsoleted_stores, vec![help_id]);
    }

    #[test]
    fn tst_ts_messages_told_apart_by_comment_keep_their_units() {
        let mut fixture = Fixture::new();
        let path = fixture.podir.join("desktop/de/app.ts");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE TS><TS language="de" version="2.1">
<context>
    <name>Menu</name>
    <message>
        <source>Open</source>
        <comment>verb</comment>
        <translation>Öffnen</translation>
    </message>
    <message>
        <source>Open</source>
        <comment>adjective</comment>
        <translation>Offen</translation>
    </message>
    <message>
        <source>Close</source>
        <translation>Schließen</translation>
    </message>
    <message>
        <source>Close</source>
        <translation>Zumachen</translation>
    </message>
</context>
</TS>"#).unwrap();
        set_mtime(&path, 100);

        let mut registry = fixture.registry();
        let de = registry.create_language(language("de"), CreateMode::Raw).unwrap();
        let desktop = Project { localfiletype: I18nFileKind::Linguist, ..project("desktop", "standard") };
        let desktop = registry.create_project(desktop, CreateMode::Scan).unwrap();
        let tp_id = registry.db.translation_project_for(de, desktop).unwrap().id;

        for _ in 0..3 {
            registry.update_from_disk(tp_id, true, false).unwrap();
        }
        let store_id = registry.db.live_stores_of(tp_id).next().unwrap().id;
        let units = registry.db.units_of(store_id);
        assert_eq!(units.len(), 4);
        assert_eq!(units[0].target.as_str(), "Öffnen");
        assert_eq!(units[1].target.as_str(), "Offen");
        assert_eq!(units[2].target.as_str(), "Schließen");
        assert_eq!(units[3].target.as_str(), "Zumachen");
        assert_eq!(registry.stats(tp_id).translated, 4);

        registry.sync(tp_id, false, false, false).unwrap();
        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("<comment>verb</comment>"));
        assert!(content.contains("Offen"));
        assert!(content.contains("Öffnen"));
        assert!(content.contains("Zumachen"));
    }

    #[test]
    fn tst_empty_translation_project_refreshes_cached_mtime() {
        let mut fixture = Fixture::new();
        fs::create_dir_all(fixture.podir.join("tutorial/de")).unwrap();
        let mut registry = fixture.registry();
        let de = registry.create_language(language("de"), CreateMode::Raw).unwrap();
        let tutorial = registry.create_project(project("tutorial", "standard"), CreateMode::Raw).unwrap();
        let tp_id = registry.create_translation_project(de, tutorial).unwrap();
        registry.db.translation_project_mut(tp_id).unwrap().cached_mtime = Some(SystemTime::UNIX_EPOCH);

        assert!(!registry.update_from_disk(tp_id, false, false).unwrap());
        assert_eq!(registry.db.translation_project(tp_id).unwrap().cached_mtime, None);
    }

    fn translate_close(db: &mut Database, tp_id: Id) {
        let store_id = db.live_stores_of(tp_id).next().unwrap().id;
        let unit_id = db.units_of(store_id).iter().find(|u| u.source.as_str() == "Close").unwrap().id;
        let revision = db.next_revision();
        let unit = db.unit_mut(unit_id).unwrap();
        unit.target = Multistring::single("Schließen");
        unit.state = UnitState::Translated;
        unit.revision = revision;
    }

    #[test]
    fn tst_sync_writes_changes() {
        let (mut fixture, tp_id) = tutorial_fixture();
        let path = fixture.podir.join("tutorial/de/app.po");
        assert_eq!(fixture.registry().sync(tp_id, true, false, true).unwrap(), 0);

        translate_close(&mut fixture.db, tp_id);
        assert_eq!(fixture.registry().sync(tp_id, true, false, true).unwrap(), 1);
        let on_disk = DiskFileIo.load(&path).unwrap();
        assert_eq!(on_disk.units[1].target, vec!["Schließen".to_string()]);

        // The written file is the new watermark, nothing to reparse.
        let loads = fixture.io.loads.get();
        assert!(!fixture.registry().update_from_disk(tp_id, false, false).unwrap());
        assert_eq!(fixture.io.loads.get(), loads);
    }

    #[test]
    fn tst_sync_skip_missing() {
        let (mut fixture, tp_id) = tutorial_fixture();
        let path = fixture.podir.join("tutorial/de/app.po");
        translate_close(&mut fixture.db, tp_id);
        fs::remove_file(&path).unwrap();

        assert_eq!(fixture.registry().sync(tp_id, true, true, true).unwrap(), 0);
        assert!(!path.exists());

        assert_eq!(fixture.registry().sync(tp_id, true, false, true).unwrap(), 1);
        assert_eq!(DiskFileIo.load(&path).unwrap().units.len(), 2);
    }

    #[test]
    fn tst_scan_disables_missing_project() {
        let (mut fixture, _) = tutorial_fixture();
        let mut registry = fixture.registry();
        let ghost = registry.create_project(project("ghost", "standard"), CreateMode::Raw).unwrap();
        registry.scan_translation_projects(None, None).unwrap();
        assert!(registry.db.project(ghost).unwrap().disabled);
        assert!(!registry.db.project_by_code("tutorial").unwrap().disabled);
        assert_eq!(registry.db.disabled_translation_projects().count(), 0);
    }

    #[test]
    fn tst_create_language_links_existing_projects() {
        let (mut fixture, _) = tutorial_fixture();
        write_po(&fixture.podir.join("tutorial/fr/app.po"), &[("Open", "Ouvrir")], 100);
        let mut registry = fixture.registry();
        let fr = registry.create_language(language("fr"), CreateMode::Scan).unwrap();
        let tutorial = registry.db.project_by_code("tutorial").unwrap().id;
        let tp_id = registry.db.translation_project_for(fr, tutorial).unwrap().id;
        assert_eq!(registry.stats(tp_id).translated, 1);
        assert_eq!(registry.tp_code(tp_id).unwrap(), "fr-tutorial");
        assert_eq!(registry.tp_fullname(tp_id).unwrap(), "tutorial [FR]");

        // Languages without files get no translation project.
        let it = registry.create_language(language("it"), CreateMode::Scan).unwrap();
        assert!(registry.db.translation_project_for(it, tutorial).is_none());
    }

    #[test]
    fn tst_resurrect_obsolete_translation_project() {
        let (mut fixture, tp_id) = tutorial_fixture();
        let directory_id = fixture.db.translation_project(tp_id).unwrap().directory_id;
        fixture.db.directory_mut(directory_id).unwrap().obsolete = true;
        assert_eq!(fixture.db.live_translation_projects().count(), 0);

        fixture.registry().scan_translation_projects(Some(&["de".to_string()][..]), None).unwrap();
        assert!(!fixture.db.directory(directory_id).unwrap().obsolete);
        assert_eq!(fixture.db.live_translation_projects().count(), 1);
    }

    #[test]
    fn tst_delete_translation_project() {
        let (mut fixture, tp_id) = tutorial_fixture();
        fixture.registry().delete_translation_project(tp_id).unwrap();
        assert!(fixture.db.translation_projects.is_empty());
        assert!(fixture.db.stores.is_empty());
        assert!(fixture.db.units.is_empty());
        assert!(fixture.db.directory_by_path("/de/tutorial/").is_none());
    }

    #[test]
    fn tst_term_matcher_cache() {
        let (mut fixture, tp_id) = tutorial_fixture();
        let term_file = fixture.podir.join("terminology/de/pootle-terminology.po");
        write_po(&term_file, &[("file", "Datei")], 100);
        let terminology = fixture.registry().create_project(project("terminology", "terminology"), CreateMode::Scan).unwrap();
        let de = fixture.db.language_by_code("de").unwrap().id;
        let term_tp_id = fixture.db.translation_project_for(de, terminology).unwrap().id;

        let registry = fixture.registry();
        assert_eq!(registry.get_terminology_project(de).map(|tp| tp.id), Some(term_tp_id));
        assert!(registry.term_matcher(term_tp_id).unwrap().is_none());
        let first = registry.term_matcher(tp_id).unwrap().unwrap();
        let second = registry.term_matcher(tp_id).unwrap().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.matches("Open the file").len(), 1);

        write_po(&term_file, &[("file", "Datei"), ("folder", "Ordner")], 200);
        assert!(fixture.registry().update_from_disk(term_tp_id, false, false).unwrap());
        let third = fixture.registry().term_matcher(tp_id).unwrap().unwrap();
        assert!(!Arc::ptr_eq(&first, &third));
        assert_eq!(third.len(), 2);
    }

    #[test]
    fn tst_pluralize_target_falls_back_to_language() {
        let (mut fixture, tp_id) = tutorial_fixture();
        let store_id = fixture.db.live_stores_of(tp_id).next().unwrap().id;
        let mut unit = fixture.db.units_of(store_id)[0].clone();
        unit.source = Multistring::new(vec!["%d file".to_string(), "%d files".to_string()]);
        unit.target = Multistring::single("%d Datei");
        let registry = fixture.registry();
        assert_eq!(registry.pluralize_target(&unit, None).len(), 2);
        assert_eq!(registry.pluralize_target(&unit, Some(3)).len(), 3);
    }

    #[test]
    fn tst_check_reports_failures() {
        let (mut fixture, tp_id) = tutorial_fixture();
        let failed = fixture.registry().check(tp_id).unwrap();
        assert_eq!(failed.len(), 1);
        assert_eq!(failed[0].1.failures, vec!["untranslated"]);
    }

    #[test]
    fn tst_find_altsrcs_and_suggestions() {
        let (mut fixture, de_tp) = tutorial_fixture();
        write_po(&fixture.podir.join("tutorial/fr/app.po"), &[("Open", "Ouvrir")], 100);
        let fr = fixture.registry().create_language(language("fr"), CreateMode::Scan).unwrap();
        let store_id = fixture.db.live_stores_of(de_tp).next().unwrap().id;
        let open = fixture.db.units_of(store_id)[0].clone();

        let altsrcs = store_tags::find_altsrcs(&fixture.db, &fixture.podir, &open, &[fr]).unwrap();
        assert_eq!(altsrcs.len(), 1);
        assert_eq!(altsrcs[0].target.as_str(), "Ouvrir");

        let mut suggested = open.clone();
        suggested.suggestions.push(crate::models::Suggestion {
            id: 99,
            target: Multistring::single("Aufmachen"),
            score: 3,
        });
        let suggestions = store_tags::get_sugg_list(&fixture.db, &suggested).unwrap();
        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].1, None);
    }
}

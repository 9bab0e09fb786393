// SPDX-FileCopyrightText: 2025 UnionTech Software Technology Co., Ltd.
//
// SPDX-License-Identifier: MIT

use std::collections::{HashMap, VecDeque};
use std::path::Path;
use std::time::SystemTime;
use thiserror::Error as TeError;
use tracing::{debug, info};

use crate::database::{Database, DbError};
use crate::i18n_file::common::{FileUnit, TranslationFile, UnitState};
use crate::i18n_file::{FileIoError, TranslationFileIo};
use crate::models::{Id, Multistring, StoreState, Unit};

#[derive(TeError, Debug)]
pub enum UpdateError {
    #[error(transparent)]
    FileIo(#[from] FileIoError),
    #[error(transparent)]
    Db(#[from] DbError),
}

/// Options of [`sync_store`].
#[derive(Debug, Clone, Copy)]
pub struct SyncOptions {
    /// Add new units to the file and drop obsolete ones.
    pub update_structure: bool,
    /// Never replace a translation that is already translated on disk.
    pub conservative: bool,
    /// Leave vanished files alone instead of recreating them.
    pub skip_missing: bool,
    /// Skip the store when nothing changed in the database since the last sync.
    pub only_newer: bool,
}

/// Reparse the store's file and merge it into the database.
///
/// With `overwrite`, disk translations replace database translations even when those
/// changed after the last sync. Returns whether any unit changed.
pub fn update_store_from_disk(
    db: &mut Database,
    io: &dyn TranslationFileIo,
    podirectory: &Path,
    store_id: Id,
    overwrite: bool,
) -> Result<bool, UpdateError> {
    let store = db.store(store_id)?;
    let path = podirectory.join(&store.file);
    let last_sync_revision = store.last_sync_revision;
    let disk_mtime = io.mtime(&path)?;
    let content = io.load(&path)?;

    // Units sharing a unitid are paired with the file units in order, live ones first.
    let mut existing: HashMap<String, VecDeque<Id>> = HashMap::new();
    for unit in group_by_unitid(&db.units_of(store_id)).into_values().flatten() {
        existing.entry(unit.unitid.clone()).or_default().push_back(unit.id);
    }
    let mut changed = false;

    for (index, file_unit) in content.units.iter().enumerate() {
        let unitid = file_unit.unitid();
        match existing.get_mut(&unitid).and_then(VecDeque::pop_front) {
            Some(unit_id) => {
                let unit = db.unit(unit_id)?;
                let db_changed_since_sync = unit.revision > last_sync_revision;
                let mut candidate = unit.clone();
                candidate.index = index;
                let mut unit_changed = candidate.update_source(file_unit);
                if overwrite || !db_changed_since_sync || unit.is_obsolete() {
                    unit_changed |= candidate.update_target(file_unit);
                }
                if unit_changed {
                    candidate.revision = db.next_revision();
                    changed = true;
                }
                *db.unit_mut(unit_id)? = candidate;
            }
            None => {
                let id = db.next_id();
                let revision = db.next_revision();
                db.units.insert(id, new_unit(id, store_id, index, file_unit, revision));
                changed = true;
            }
        }
    }

    // Units that vanished from the file.
    for unit_id in existing.into_values().flatten() {
        if db.unit(unit_id)?.is_obsolete() {
            continue;
        }
        let revision = db.next_revision();
        let unit = db.unit_mut(unit_id)?;
        unit.state = UnitState::Obsolete;
        unit.revision = revision;
        changed = true;
    }

    let revision = db.revision();
    let store = db.store_mut(store_id)?;
    store.file_mtime = disk_mtime;
    store.state = StoreState::Parsed;
    store.last_sync_revision = revision;
    if changed {
        store.mtime = Some(SystemTime::now());
        info!("Updated {} from disk", store.pootle_path);
    }
    Ok(changed)
}

fn new_unit(id: Id, store_id: Id, index: usize, file_unit: &FileUnit, revision: u64) -> Unit {
    Unit {
        id,
        store_id,
        index,
        unitid: file_unit.unitid(),
        context: file_unit.context.clone(),
        source: Multistring::new(file_unit.source.clone()),
        target: Multistring::new(file_unit.target.clone()),
        plural: file_unit.plural,
        disambiguation: file_unit.disambiguation.clone(),
        state: file_unit.state,
        locations: file_unit.locations.clone(),
        notes: file_unit.notes.clone(),
        revision,
        suggestions: Vec::new(),
    }
}

/// Write the database content of a store back to its file.
///
/// Returns whether the file was written.
pub fn sync_store(
    db: &mut Database,
    io: &dyn TranslationFileIo,
    podirectory: &Path,
    store_id: Id,
    options: SyncOptions,
) -> Result<bool, UpdateError> {
    let store = db.store(store_id)?;
    let path = podirectory.join(&store.file);
    let last_sync_revision = store.last_sync_revision;
    let pootle_path = store.pootle_path.clone();
    let units = db.units_of(store_id);

    if options.only_newer && units.iter().all(|u| u.revision <= last_sync_revision) {
        debug!("No new changes in {pootle_path}, skipping sync");
        return Ok(false);
    }

    let on_disk = if path.exists() {
        Some(io.load(&path)?)
    } else if options.skip_missing {
        debug!("File of {pootle_path} is missing, skipping sync");
        return Ok(false);
    } else {
        None
    };

    let content = match on_disk {
        Some(disk) => merge_into_disk(disk, &units, last_sync_revision, options),
        None => TranslationFile {
            language: None,
            units: units.iter().filter(|u| !u.is_obsolete()).map(|u| u.to_file_unit()).collect(),
        },
    };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| FileIoError::CreateDir(parent.to_path_buf(), e))?;
    }
    io.save(&path, &content)?;

    let disk_mtime = io.mtime(&path)?;
    let revision = db.revision();
    let store = db.store_mut(store_id)?;
    store.file_mtime = disk_mtime;
    store.last_sync_revision = revision;
    info!("Synced {pootle_path} to disk");
    Ok(true)
}

/// Units by unitid, each group in file order with live units before obsolete ones.
fn group_by_unitid<'a>(units: &[&'a Unit]) -> HashMap<&'a str, Vec<&'a Unit>> {
    let mut groups: HashMap<&str, Vec<&Unit>> = HashMap::new();
    for unit in units {
        groups.entry(unit.unitid.as_str()).or_default().push(*unit);
    }
    for group in groups.values_mut() {
        group.sort_by_key(|u| (u.is_obsolete(), u.index));
    }
    groups
}

fn merge_into_disk(mut disk: TranslationFile, units: &[&Unit], last_sync_revision: u64, options: SyncOptions) -> TranslationFile {
    let by_unitid = group_by_unitid(units);
    let mut on_disk: HashMap<String, usize> = HashMap::new();

    for file_unit in disk.units.iter_mut() {
        let occurrence = on_disk.entry(file_unit.unitid()).or_default();
        let nth = *occurrence;
        *occurrence += 1;
        let Some(unit) = by_unitid.get(file_unit.unitid().as_str()).and_then(|group| group.get(nth)) else {
            continue;
        };
        if unit.is_obsolete() {
            if options.update_structure {
                file_unit.state = UnitState::Obsolete;
            }
            continue;
        }
        if options.only_newer && unit.revision <= last_sync_revision {
            continue;
        }
        if options.conservative && file_unit.state == UnitState::Translated {
            continue;
        }
        file_unit.target = unit.target.strings.clone();
        file_unit.state = unit.state;
    }

    if options.update_structure {
        disk.units.retain(|u| u.state != UnitState::Obsolete || !by_unitid.contains_key(u.unitid().as_str()));
        for unit in units.iter().filter(|u| !u.is_obsolete()) {
            let nth = by_unitid[unit.unitid.as_str()].iter().position(|u| u.id == unit.id).unwrap_or_default();
            if nth >= on_disk.get(&unit.unitid).copied().unwrap_or_default() {
                disk.units.push(unit.to_file_unit());
            }
        }
    }
    disk
}

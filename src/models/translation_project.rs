// SPDX-FileCopyrightText: 2025 UnionTech Software Technology Co., Ltd.
//
// SPDX-License-Identifier: MIT

use std::path::{Path, PathBuf};
use std::time::SystemTime;
use serde::{Deserialize, Serialize};
use super::{Id, Language, Project};

/// One language of one project.
///
/// `pootle_path` is always copied from the owned directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationProject {
    pub id: Id,
    pub language_id: Id,
    pub project_id: Id,
    pub directory_id: Id,
    pub pootle_path: String,
    /// Relative to the translation root.
    pub real_path: Option<String>,
    pub creation_time: SystemTime,
    /// Latest store modification time, refreshed after disk updates.
    pub cached_mtime: Option<SystemTime>,
}

impl TranslationProject {
    pub fn code(language: &Language, project: &Project) -> String {
        format!("{}-{}", language.code, project.code)
    }

    pub fn fullname(language: &Language, project: &Project) -> String {
        format!("{} [{}]", project.fullname, language.fullname)
    }

    pub fn abs_real_path(&self, podirectory: &Path) -> Option<PathBuf> {
        self.real_path.as_ref().map(|p| podirectory.join(p))
    }

    pub fn set_abs_real_path(&mut self, podirectory: &Path, value: Option<&Path>) {
        self.real_path = value.map(|p| relative_real_path(podirectory, p));
    }

    /// `/<lang>/<project>/`
    pub fn browse_url(&self) -> String {
        self.pootle_path.clone()
    }

    /// `/<lang>/<project>/translate/` followed by an optional editor filter.
    pub fn translate_url(&self, filter: Option<&str>) -> String {
        match filter {
            Some(filter) if !filter.is_empty() => format!("{}translate/#filter={filter}", self.pootle_path),
            _ => format!("{}translate/", self.pootle_path),
        }
    }
}

pub fn relative_real_path(podirectory: &Path, path: &Path) -> String {
    path.strip_prefix(podirectory)
        .unwrap_or(path)
        .to_string_lossy()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tst_real_path_is_relative() {
        let mut tp = TranslationProject {
            id: 1,
            language_id: 1,
            project_id: 1,
            directory_id: 1,
            pootle_path: "/de/tutorial/".to_string(),
            real_path: None,
            creation_time: SystemTime::UNIX_EPOCH,
            cached_mtime: None,
        };
        let podir = Path::new("/srv/po");
        tp.set_abs_real_path(podir, Some(Path::new("/srv/po/tutorial/de")));
        assert_eq!(tp.real_path.as_deref(), Some("tutorial/de"));
        assert_eq!(tp.abs_real_path(podir), Some(PathBuf::from("/srv/po/tutorial/de")));
        assert_eq!(tp.translate_url(Some("untranslated")), "/de/tutorial/translate/#filter=untranslated");
        assert_eq!(tp.translate_url(None), "/de/tutorial/translate/");
    }
}

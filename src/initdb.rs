// SPDX-FileCopyrightText: 2025 UnionTech Software Technology Co., Ltd.
//
// SPDX-License-Identifier: MIT

use tracing::info;

use crate::i18n_file::common::I18nFileKind;
use crate::models::{Language, Project, TreeStyle};
use crate::models::language::TEMPLATES_CODE;
use crate::models::project::TERMINOLOGY_CHECKSTYLE;
use crate::registry::{CreateMode, Registry, RegistryError};

/// Languages seeded on initialization: code, name, plural forms and plural equation.
const DEFAULT_LANGUAGES: &[(&str, &str, usize, &str)] = &[
    ("ar", "Arabic", 6, "n==0 ? 0 : n==1 ? 1 : n==2 ? 2 : n%100>=3 && n%100<=10 ? 3 : n%100>=11 ? 4 : 5"),
    ("cs", "Czech", 3, "(n==1) ? 0 : (n>=2 && n<=4) ? 1 : 2"),
    ("de", "German", 2, "(n != 1)"),
    ("en", "English", 2, "(n != 1)"),
    ("es", "Spanish", 2, "(n != 1)"),
    ("fr", "French", 2, "(n > 1)"),
    ("it", "Italian", 2, "(n != 1)"),
    ("ja", "Japanese", 1, "0"),
    ("ko", "Korean", 1, "0"),
    ("pl", "Polish", 3, "(n==1 ? 0 : n%10>=2 && n%10<=4 && (n%100<10 || n%100>=20) ? 1 : 2)"),
    ("pt_BR", "Portuguese (Brazil)", 2, "(n > 1)"),
    ("ru", "Russian", 3, "(n%10==1 && n%100!=11 ? 0 : n%10>=2 && n%10<=4 && (n%100<10 || n%100>=20) ? 1 : 2)"),
    ("zh_CN", "Chinese (China)", 1, "0"),
    ("zh_TW", "Chinese (Taiwan)", 1, "0"),
];

/// Projects seeded on initialization: code, name and checkstyle.
const DEFAULT_PROJECTS: &[(&str, &str, &str)] = &[
    ("terminology", "Terminology", TERMINOLOGY_CHECKSTYLE),
    ("tutorial", "Tutorial", "standard"),
];

/// Records created by [`initdb`].
#[derive(Debug, Default)]
pub struct InitdbReport {
    pub created_languages: Vec<String>,
    pub created_projects: Vec<String>,
}

/// Populate the registry with the root directories, the default languages and,
/// unless `no_projects`, the default projects. Existing records are kept.
pub fn initdb(registry: &mut Registry<'_>, no_projects: bool) -> Result<InitdbReport, RegistryError> {
    let mut report = InitdbReport::default();

    let root = registry.db.root_directory();
    registry.db.get_or_make_subdir(root, "projects")?;

    let templates = std::iter::once((TEMPLATES_CODE, "Templates", None, ""));
    let languages = DEFAULT_LANGUAGES.iter()
        .map(|&(code, fullname, nplurals, equation)| (code, fullname, Some(nplurals), equation));
    for (code, fullname, nplurals, plural_equation) in templates.chain(languages) {
        if registry.db.language_by_code(code).is_some() {
            continue;
        }
        registry.create_language(Language {
            id: 0,
            code: code.to_string(),
            fullname: fullname.to_string(),
            nplurals,
            plural_equation: plural_equation.to_string(),
            directory_id: 0,
        }, CreateMode::Scan)?;
        info!("Created Language: '{code}'");
        report.created_languages.push(code.to_string());
    }

    if no_projects {
        return Ok(report);
    }
    for &(code, fullname, checkstyle) in DEFAULT_PROJECTS {
        if registry.db.project_by_code(code).is_some() {
            continue;
        }
        registry.create_project(Project {
            id: 0,
            code: code.to_string(),
            fullname: fullname.to_string(),
            checkstyle: checkstyle.to_string(),
            localfiletype: I18nFileKind::Gettext,
            treestyle: TreeStyle::Auto,
            source_language: "en".to_string(),
            disabled: false,
            directory_id: 0,
        }, CreateMode::Scan)?;
        info!("Created Project: '{code}'");
        report.created_projects.push(code.to_string());
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::Database;
    use crate::i18n_file::DiskFileIo;
    use crate::terminology::MatcherCache;

    #[test]
    fn tst_initdb_creates_default_projects() {
        let dir = tempfile::tempdir().unwrap();
        let mut db = Database::default();
        let cache = MatcherCache::default();
        let mut registry = Registry::new(&mut db, dir.path(), &DiskFileIo, &cache);

        let report = initdb(&mut registry, false).unwrap();
        assert_eq!(report.created_projects, vec!["terminology", "tutorial"]);
        assert_eq!(report.created_languages.len(), DEFAULT_LANGUAGES.len() + 1);

        let mut codes: Vec<&str> = db.projects.values().map(|p| p.code.as_str()).collect();
        codes.sort();
        assert_eq!(codes, vec!["terminology", "tutorial"]);
        assert!(db.project_by_code("terminology").unwrap().is_terminology());
        assert!(db.language_by_code(TEMPLATES_CODE).unwrap().nplurals.is_none());
        assert!(db.directory_by_path("/projects/").is_some());
        assert!(db.directory_by_path("/").is_some());
    }

    #[test]
    fn tst_initdb_no_projects_is_repeatable() {
        let dir = tempfile::tempdir().unwrap();
        let mut db = Database::default();
        let cache = MatcherCache::default();
        let mut registry = Registry::new(&mut db, dir.path(), &DiskFileIo, &cache);

        let report = initdb(&mut registry, true).unwrap();
        assert!(report.created_projects.is_empty());
        let again = initdb(&mut registry, true).unwrap();
        assert!(again.created_languages.is_empty());
        assert!(db.projects.is_empty());
    }
}

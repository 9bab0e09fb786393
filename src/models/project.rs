// SPDX-FileCopyrightText: 2025 UnionTech Software Technology Co., Ltd.
//
// SPDX-License-Identifier: MIT

use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};
use super::Id;
use crate::i18n_file::common::I18nFileKind;

pub const TERMINOLOGY_CHECKSTYLE: &str = "terminology";

/// How translation files of a project are laid out on disk.
#[derive(clap::ValueEnum, Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TreeStyle {
    /// Detect from the project directory content.
    #[default]
    Auto,
    /// `project/de.po`, `project/sub/app-de.po`
    Gnu,
    /// `project/de/app.po`
    #[value(name = "nongnu")]
    NonGnu,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: Id,
    pub code: String,
    pub fullname: String,
    pub checkstyle: String,
    pub localfiletype: I18nFileKind,
    pub treestyle: TreeStyle,
    pub source_language: String,
    #[serde(default)]
    pub disabled: bool,
    pub directory_id: Id,
}

impl Project {
    pub fn is_terminology(&self) -> bool {
        self.checkstyle == TERMINOLOGY_CHECKSTYLE
    }

    pub fn real_path(&self, podirectory: &Path) -> PathBuf {
        podirectory.join(&self.code)
    }
}

// SPDX-FileCopyrightText: 2025 UnionTech Software Technology Co., Ltd.
//
// SPDX-License-Identifier: MIT

use serde::{Deserialize, Serialize};
use super::Id;

/// Code of the pseudo-language holding translation templates.
pub const TEMPLATES_CODE: &str = "templates";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Language {
    pub id: Id,
    pub code: String,
    pub fullname: String,
    /// Number of plural forms, unknown for the templates language.
    pub nplurals: Option<usize>,
    #[serde(default)]
    pub plural_equation: String,
    pub directory_id: Id,
}

impl Language {
    pub fn is_template(&self) -> bool {
        self.code == TEMPLATES_CODE
    }
}

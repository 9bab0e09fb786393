// SPDX-FileCopyrightText: 2025 UnionTech Software Technology Co., Ltd.
//
// SPDX-License-Identifier: MIT

use serde::{Deserialize, Serialize};
use super::Id;

/// Node of the `/lang/project/sub/` hierarchy.
///
/// Directories are never removed while they have history; they are marked obsolete instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Directory {
    pub id: Id,
    pub name: String,
    pub parent_id: Option<Id>,
    pub pootle_path: String,
    #[serde(default)]
    pub obsolete: bool,
}

impl Directory {
    pub fn child_path(&self, name: &str) -> String {
        format!("{}{}/", self.pootle_path, name)
    }
}

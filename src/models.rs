// SPDX-FileCopyrightText: 2025 UnionTech Software Technology Co., Ltd.
//
// SPDX-License-Identifier: MIT

pub mod directory;
pub mod language;
pub mod project;
pub mod store;
pub mod translation_project;

/// Primary key shared by every table of the registry.
pub type Id = u64;

pub use self::directory::Directory;
pub use self::language::Language;
pub use self::project::{Project, TreeStyle};
pub use self::store::{Multistring, QuickStats, Store, StoreState, Suggestion, Unit};
pub use self::translation_project::TranslationProject;

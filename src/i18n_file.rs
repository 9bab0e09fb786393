// SPDX-FileCopyrightText: 2025 UnionTech Software Technology Co., Ltd.
//
// SPDX-License-Identifier: MIT

pub mod common;
pub mod gettext;
pub mod linguist;

use std::path::{Path, PathBuf};
use std::time::SystemTime;
use thiserror::Error as TeError;

use self::common::{I18nFileKind, TranslationFile, UnknownI18nFileExtError};
use self::gettext::{Po, PoLoadError, PoSaveError};
use self::linguist::{Ts, TsLoadError, TsSaveError};

#[derive(TeError, Debug)]
pub enum FileIoError {
    #[error("Can not guess translation file kind from path {0:?} because: {1}")]
    GuessI18nFileType(PathBuf, #[source] UnknownI18nFileExtError),
    #[error("Fail to load {0:?} because: {1}")]
    LoadPo(PathBuf, #[source] PoLoadError),
    #[error("Fail to load {0:?} because: {1}")]
    LoadTs(PathBuf, #[source] TsLoadError),
    #[error("Fail to save {0:?} because: {1}")]
    SavePo(PathBuf, #[source] PoSaveError),
    #[error("Fail to save {0:?} because: {1}")]
    SaveTs(PathBuf, #[source] TsSaveError),
    #[error("Can not create directory {0:?}: {1}")]
    CreateDir(PathBuf, #[source] std::io::Error),
    #[error("Can not read modification time of {0:?}: {1}")]
    Mtime(PathBuf, #[source] std::io::Error),
}

/// Parser/serializer invoked for each store.
pub trait TranslationFileIo {
    fn load(&self, path: &Path) -> Result<TranslationFile, FileIoError>;

    fn save(&self, path: &Path, content: &TranslationFile) -> Result<(), FileIoError>;

    /// Modification time of the file on disk, `None` when it does not exist.
    fn mtime(&self, path: &Path) -> Result<Option<SystemTime>, FileIoError> {
        match std::fs::metadata(path) {
            Ok(metadata) => metadata.modified()
                .map(Some)
                .map_err(|e| FileIoError::Mtime(path.to_path_buf(), e)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(FileIoError::Mtime(path.to_path_buf(), e)),
        }
    }
}

/// Reads and writes PO and TS files, picking the format by extension.
#[derive(Debug, Default, Clone, Copy)]
pub struct DiskFileIo;

fn guess_kind(path: &Path) -> Result<I18nFileKind, FileIoError> {
    I18nFileKind::from_ext_hint(path).map_err(|e| FileIoError::GuessI18nFileType(path.to_path_buf(), e))
}

impl TranslationFileIo for DiskFileIo {
    fn load(&self, path: &Path) -> Result<TranslationFile, FileIoError> {
        match guess_kind(path)? {
            I18nFileKind::Gettext => {
                let po = Po::load_from_file(path).map_err(|e| FileIoError::LoadPo(path.to_path_buf(), e))?;
                Ok(po.to_translation_file())
            }
            I18nFileKind::Linguist => {
                let ts = Ts::load_from_file(path).map_err(|e| FileIoError::LoadTs(path.to_path_buf(), e))?;
                Ok(ts.to_translation_file())
            }
        }
    }

    fn save(&self, path: &Path, content: &TranslationFile) -> Result<(), FileIoError> {
        match guess_kind(path)? {
            I18nFileKind::Gettext => {
                // Keep the existing header when there is one.
                let base = Po::load_from_file(path).ok();
                Po::from_translation_file(content, base.as_ref())
                    .save_into_file(path)
                    .map_err(|e| FileIoError::SavePo(path.to_path_buf(), e))
            }
            I18nFileKind::Linguist => {
                let base = Ts::load_from_file(path).ok();
                Ts::from_translation_file(content, base.as_ref())
                    .save_into_file(path)
                    .map_err(|e| FileIoError::SaveTs(path.to_path_buf(), e))
            }
        }
    }
}

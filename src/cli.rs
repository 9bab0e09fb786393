// SPDX-FileCopyrightText: 2025 UnionTech Software Technology Co., Ltd.
//
// SPDX-License-Identifier: MIT

use std::path::PathBuf;
use clap::{Parser, Subcommand};
use thiserror::Error as TeError;
use tracing::Level;

use crate::config::{ConfigLoadError, Settings};
use crate::highlight::DiffStrategy;
use crate::i18n_file::common::I18nFileKind;
use crate::models::TreeStyle;

#[derive(Debug, Parser)]
#[command(
    version = env!("TRANSTREE_VERSION"),
    about = "A commandline tool to keep a translation server registry in sync with translation files on disk."
)]
pub struct Cli {
    /// Configuration file, defaults to transtree.ini in the user config directory.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
    /// Log debug messages regardless of the configured level.
    #[arg(short, long, global = true, action = clap::ArgAction::SetTrue, default_value_t = false)]
    pub verbose: bool,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    #[command(name = "initdb")]
    #[command(
        about = "Populate the database with default languages and projects",
        long_about = "Populate the database with the root directories, the templates language, a set of default languages \
            and the terminology and tutorial projects.\n\n\
            Records that already exist are left untouched, so it is safe to run it again.",
    )]
    Initdb {
        /// Do not create the default projects.
        #[clap(long, action = clap::ArgAction::SetTrue, default_value_t = false)]
        no_projects: bool,
    },

    #[command(name = "add-project")]
    #[command(
        about = "Register a project and import its translation files",
        long_about = "Register a project whose files live in <podirectory>/<code>.\n\n\
            Unless --raw is given, every language having files in the project directory gets a translation project \
            and its files are imported.",
    )]
    AddProject {
        code: String,
        #[arg(short, long)]
        fullname: Option<String>,
        #[arg(long, default_value = "standard")]
        checkstyle: String,
        #[clap(long, default_value_t, value_enum)]
        filetype: I18nFileKind,
        #[clap(long, default_value_t, value_enum)]
        treestyle: TreeStyle,
        #[arg(long, default_value = "en")]
        source_language: String,
        /// Only create the record, do not scan languages.
        #[clap(long, action = clap::ArgAction::SetTrue, default_value_t = false)]
        raw: bool,
    },

    #[command(name = "add-language")]
    #[command(about = "Register a language and link it to every enabled project having files for it")]
    AddLanguage {
        code: String,
        #[arg(short, long)]
        fullname: Option<String>,
        #[arg(short, long)]
        nplurals: Option<usize>,
        #[arg(long, default_value = "")]
        plural_equation: String,
        /// Only create the record, do not scan projects.
        #[clap(long, action = clap::ArgAction::SetTrue, default_value_t = false)]
        raw: bool,
    },

    #[command(name = "delete-tp")]
    #[command(about = "Remove a translation project with its directories, stores and units from the database")]
    DeleteTp {
        #[arg(short, long)]
        language: String,
        #[arg(short, long)]
        project: String,
    },

    #[command(name = "update-stores")]
    #[command(
        about = "Update the database from translation files on disk",
        long_about = "Discover new translation projects and files, then reparse every file modified since the last sync.\n\n\
            Projects whose directory is gone are disabled.",
    )]
    UpdateStores {
        #[arg(short, long, value_delimiter = ',')]
        language: Vec<String>,
        #[arg(short, long, value_delimiter = ',')]
        project: Vec<String>,
        /// Reparse files even when their modification time did not change.
        #[clap(long, action = clap::ArgAction::SetTrue, default_value_t = false)]
        force: bool,
        /// Let translations on disk replace translations changed in the database.
        #[clap(long, action = clap::ArgAction::SetTrue, default_value_t = false)]
        overwrite: bool,
    },

    #[command(name = "sync-stores")]
    #[command(
        about = "Write database translations back to the files on disk",
        long_about = "Write database translations back to the files on disk.\n\n\
            By default only translations changed since the last sync are written, translations that are \
            already translated on disk are kept, and the file structure is not changed.",
    )]
    SyncStores {
        #[arg(short, long, value_delimiter = ',')]
        language: Vec<String>,
        #[arg(short, long, value_delimiter = ',')]
        project: Vec<String>,
        /// Replace translations on disk and update the file structure.
        #[clap(long, action = clap::ArgAction::SetTrue, default_value_t = false)]
        overwrite: bool,
        /// Do not recreate files that vanished from disk.
        #[clap(long, action = clap::ArgAction::SetTrue, default_value_t = false)]
        skip_missing: bool,
        /// Also write stores without changes since the last sync.
        #[clap(long, action = clap::ArgAction::SetTrue, default_value_t = false)]
        force: bool,
    },

    #[command(name = "stats")]
    #[command(about = "Prints translation statistics of the translation projects")]
    Stats {
        #[arg(short, long, value_delimiter = ',')]
        language: Vec<String>,
        #[arg(short, long, value_delimiter = ',')]
        project: Vec<String>,
        #[clap(short, long, default_value_t, value_enum)]
        format: crate::subcmd::stats::StatsFormat,
        #[clap(short, long, default_value_t, value_enum)]
        sort_by: crate::subcmd::stats::StatsSortBy,
    },

    #[command(name = "terms")]
    #[command(about = "Prints the terminology entries found in the given text")]
    Terms {
        #[arg(short, long)]
        language: String,
        #[arg(short, long)]
        project: String,
        text: String,
    },

    #[command(name = "unit")]
    #[command(
        about = "Prints a unit the way the translation editor shows it",
        long_about = "Prints the source and target forms of a unit, its suggestions highlighted against the current \
            translation and its translations in alternative source languages, as YAML.",
    )]
    Unit {
        /// Store path, e.g. /de/tutorial/app.po
        store: String,
        index: usize,
        #[arg(short, long, value_delimiter = ',')]
        alt_src_langs: Vec<String>,
        /// Overrides the diff_strategy configuration.
        #[clap(short, long, value_enum)]
        strategy: Option<DiffStrategy>,
    },

    #[command(name = "check")]
    #[command(about = "Runs quality checks over the translations of the translation projects")]
    Check {
        #[arg(short, long, value_delimiter = ',')]
        language: Vec<String>,
        #[arg(short, long, value_delimiter = ',')]
        project: Vec<String>,
    },

    #[command(name = "diff")]
    #[command(about = "Prints the HTML highlighting of the changes from <OLD> to <NEW>")]
    Diff {
        old: String,
        new: String,
        /// Overrides the diff_strategy configuration.
        #[clap(short, long, value_enum)]
        strategy: Option<DiffStrategy>,
    },
}

#[derive(TeError, Debug)]
#[error("{0}")]
pub enum CliError {
    Config(#[from] ConfigLoadError),
    Context(#[from] crate::subcmd::ContextError),
    Initdb(#[from] crate::subcmd::initdb::CmdError),
    Manage(#[from] crate::subcmd::manage::CmdError),
    Update(#[from] crate::subcmd::update::CmdError),
    Stats(#[from] crate::subcmd::stats::CmdError),
    Terms(#[from] crate::subcmd::terms::CmdError),
    Unit(#[from] crate::subcmd::unit::CmdError),
    Check(#[from] crate::subcmd::check::CmdError),
}

pub fn execute() -> Result<(), CliError> {
    let args = Cli::parse();

    let settings = Settings::locate(args.config.as_deref())?;
    let max_level = if args.verbose { Level::DEBUG } else { settings.log_level };
    tracing_subscriber::fmt()
        .with_max_level(max_level)
        .with_writer(std::io::stderr)
        .init();

    use crate::subcmd;
    match args.command {
        Commands::Initdb { no_projects } => {
            subcmd::subcmd_initdb(settings, no_projects)?;
        },
        Commands::AddProject { code, fullname, checkstyle, filetype, treestyle, source_language, raw } => {
            subcmd::subcmd_add_project(settings, code, fullname, checkstyle, filetype, treestyle, source_language, raw)?;
        },
        Commands::AddLanguage { code, fullname, nplurals, plural_equation, raw } => {
            subcmd::subcmd_add_language(settings, code, fullname, nplurals, plural_equation, raw)?;
        },
        Commands::DeleteTp { language, project } => {
            subcmd::subcmd_delete_tp(settings, &language, &project)?;
        },
        Commands::UpdateStores { language, project, force, overwrite } => {
            subcmd::subcmd_update_stores(settings, &language, &project, force, overwrite)?;
        },
        Commands::SyncStores { language, project, overwrite, skip_missing, force } => {
            subcmd::subcmd_sync_stores(settings, &language, &project, overwrite, skip_missing, force)?;
        },
        Commands::Stats { language, project, format, sort_by } => {
            subcmd::subcmd_stats(settings, &language, &project, format, sort_by)?;
        },
        Commands::Terms { language, project, text } => {
            subcmd::subcmd_terms(settings, &language, &project, &text)?;
        },
        Commands::Unit { store, index, alt_src_langs, strategy } => {
            let strategy = strategy.unwrap_or(settings.diff_strategy);
            subcmd::subcmd_unit(settings, &store, index, &alt_src_langs, strategy)?;
        },
        Commands::Check { language, project } => {
            subcmd::subcmd_check(settings, &language, &project)?;
        },
        Commands::Diff { old, new, strategy } => {
            subcmd::subcmd_diff(strategy.unwrap_or(settings.diff_strategy), &old, &new);
        },
    }

    Ok(())
}

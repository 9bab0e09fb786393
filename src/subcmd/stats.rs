// SPDX-FileCopyrightText: 2025 UnionTech Software Technology Co., Ltd.
//
// SPDX-License-Identifier: MIT

use serde::Serialize;
use thiserror::Error as TeError;

use crate::config::Settings;
use crate::database::DbError;
use crate::models::QuickStats;
use crate::store_tags::stat_summary;
use super::{Context, ContextError, select_translation_projects};

#[derive(TeError, Debug)]
pub enum CmdError {
    #[error(transparent)]
    Context(#[from] ContextError),
    #[error("Fail to collect stats: {0}")]
    Db(#[from] DbError),
    #[error("Fail to serialize stats: {0}")]
    Serde(#[from] serde_yml::Error),
}

#[derive(clap::ValueEnum, Clone, Default, Copy, Debug)]
pub enum StatsFormat {
    #[default]
    PlainTable,
    Yaml,
    Html,
}

#[derive(clap::ValueEnum, Clone, Default, Copy, Debug)]
pub enum StatsSortBy {
    Code,
    #[default]
    Completeness,
}

#[derive(Serialize)]
struct TranslationProjectStats {
    code: String,
    fullname: String,
    browse_url: String,
    translate_url: String,
    stats: QuickStats,
}

#[derive(Default, Serialize)]
struct RegistryStats {
    translation_projects: Vec<TranslationProjectStats>,
    total: QuickStats,
}

impl RegistryStats {
    fn sort(&mut self, sort_by: StatsSortBy) {
        match sort_by {
            StatsSortBy::Code => self.translation_projects.sort_by(|a, b| a.code.cmp(&b.code)),
            StatsSortBy::Completeness => self.translation_projects.sort_by(|a, b| {
                b.stats.completeness().total_cmp(&a.stats.completeness())
            }),
        }
    }

    fn print_stats_plain_table(&self) {
        println!("| No. | Translation project  | Completeness |    Words | Strings | Fuzzy |");
        println!("| --- | -------------------- | ------------ | -------- | ------- | ----- |");
        for (idx, tp) in self.translation_projects.iter().enumerate() {
            println!("| {0:3} | {1:20} | {2:>11.2}% | {3:8} | {4:7} | {5:5} |",
                idx + 1, tp.code, tp.stats.completeness(), tp.stats.totalsourcewords, tp.stats.total, tp.stats.fuzzy);
        }
        println!("|     | {0:20} | {1:>11.2}% | {2:8} | {3:7} | {4:5} |",
            "Total", self.total.completeness(), self.total.totalsourcewords, self.total.total, self.total.fuzzy);
    }

    fn print_stats_yaml(&self) -> Result<(), serde_yml::Error> {
        let yaml_str = serde_yml::to_string::<Self>(self)?;
        println!("{}", yaml_str);
        Ok(())
    }

    fn print_stats_html(&self) {
        for tp in &self.translation_projects {
            println!("<a href=\"{}\">{}</a> {}", tp.browse_url, tp.fullname, stat_summary(&tp.stats));
        }
    }
}

pub fn subcmd_stats(settings: Settings, languages: &[String], projects: &[String], format: StatsFormat, sort_by: StatsSortBy) -> Result<(), CmdError> {
    let mut context = Context::load(settings)?;
    let registry = context.registry();

    let mut registry_stats = RegistryStats::default();
    for tp_id in select_translation_projects(registry.db, languages, projects) {
        let tp = registry.db.translation_project(tp_id)?;
        let stats = registry.stats(tp_id);
        registry_stats.total += &stats;
        registry_stats.translation_projects.push(TranslationProjectStats {
            code: registry.tp_code(tp_id)?,
            fullname: registry.tp_fullname(tp_id)?,
            browse_url: tp.browse_url(),
            translate_url: tp.translate_url(None),
            stats,
        });
    }
    registry_stats.sort(sort_by);

    match format {
        StatsFormat::PlainTable => registry_stats.print_stats_plain_table(),
        StatsFormat::Yaml => registry_stats.print_stats_yaml()?,
        StatsFormat::Html => registry_stats.print_stats_html(),
    }
    Ok(())
}

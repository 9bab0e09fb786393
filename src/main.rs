// SPDX-FileCopyrightText: 2025 UnionTech Software Technology Co., Ltd.
//
// SPDX-License-Identifier: MIT

mod checks;
mod cli;
mod config;
mod database;
mod highlight;
mod i18n_file;
mod initdb;
mod models;
mod project_tree;
mod registry;
mod store_tags;
mod subcmd;
mod terminology;
mod updater;

fn main() {
    cli::execute().unwrap_or_else(|err| {
        eprintln!("\x1B[31m{0}\x1B[0m", err);
        std::process::exit(1);
    });
}

// SPDX-FileCopyrightText: 2025 UnionTech Software Technology Co., Ltd.
//
// SPDX-License-Identifier: MIT

use crate::highlight::{DiffStrategy, call_highlight, highlighter_for};

pub fn subcmd_diff(strategy: DiffStrategy, old: &str, new: &str) {
    let highlighter = highlighter_for(strategy);
    println!("{}", call_highlight(&*highlighter, &[old.to_string()], new));
}

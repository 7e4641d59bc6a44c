// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//
//! Command implementations

pub mod changes;
pub mod clients;
pub mod completions;
pub mod config;
pub mod export;
pub mod hash;
pub mod projects;
pub mod resolve;
pub mod scan;
pub mod search;

use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use serde::Serialize;
use std::io::Write;

/// How command results are written to stdout
#[derive(Debug, Clone, Copy, Default)]
pub struct Output {
    /// Machine-readable JSON instead of text
    pub json: bool,
    /// ANSI colours in text output
    pub color: bool,
}

impl Output {
    /// Write `value` as pretty JSON followed by a newline
    pub fn print_json<T: Serialize + ?Sized>(&self, value: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(json.as_bytes())?;
        stdout.write_all(b"\n")?;
        Ok(())
    }

    /// Bold heading
    #[must_use]
    pub fn heading(&self, text: &str) -> String {
        if self.color {
            text.bold().to_string()
        } else {
            text.to_string()
        }
    }

    /// Node or project identifier
    #[must_use]
    pub fn ident(&self, text: &str) -> String {
        if self.color {
            text.cyan().to_string()
        } else {
            text.to_string()
        }
    }

    /// Secondary detail
    #[must_use]
    pub fn dim(&self, text: &str) -> String {
        if self.color {
            text.dimmed().to_string()
        } else {
            text.to_string()
        }
    }

    /// Warning line on stderr
    pub fn warn(&self, text: &str) {
        if self.color {
            eprintln!("{} {text}", "warning:".yellow().bold());
        } else {
            eprintln!("warning: {text}");
        }
    }

    /// Success marker
    #[must_use]
    pub fn ok(&self, text: &str) -> String {
        if self.color {
            text.green().to_string()
        } else {
            text.to_string()
        }
    }
}

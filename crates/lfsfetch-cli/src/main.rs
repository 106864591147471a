// MediaGit - Git for Media Files
// Copyright (C) 2025 MediaGit Contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published
// by the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.

//! `lfsfetch`: download the Git LFS objects a repository's revisions need

mod commands;
mod output;
mod progress;

use anyhow::Result;
use clap::{ArgAction, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use commands::FetchCmd;
use lfsfetch_observability::{init_tracing_with_config, LogConfig, LogFormat};
use std::io;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "lfsfetch")]
#[command(version, about = "Fetch Git LFS objects referenced by repository revisions")]
#[command(propagate_version = true)]
#[command(author = "MediaGit Contributors")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// More log output (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Suppress output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Colored output
    #[arg(long, global = true, value_name = "WHEN", value_enum, default_value_t = ColorWhen::Auto)]
    color: ColorWhen,

    /// Log line format (pretty, compact, json)
    #[arg(long, global = true, value_name = "FORMAT", default_value_t = LogFormat::Compact)]
    log_format: LogFormat,

    /// Run as if started in PATH
    #[arg(short = 'C', long, global = true, value_name = "PATH")]
    repository: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ColorWhen {
    Always,
    Auto,
    Never,
}

#[derive(Subcommand)]
enum Commands {
    /// Download missing LFS objects for the given revisions
    Fetch(FetchCmd),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.color {
        ColorWhen::Always => console::set_colors_enabled(true),
        ColorWhen::Never => console::set_colors_enabled(false),
        ColorWhen::Auto => {}
    }

    init_logging(&cli);

    let result = match &cli.command {
        Commands::Fetch(cmd) => match &cli.repository {
            Some(path) => cmd.execute(path, cli.quiet),
            None => std::env::current_dir()
                .map_err(anyhow::Error::from)
                .and_then(|cwd| cmd.execute(&cwd, cli.quiet)),
        },
        Commands::Completions { shell } => {
            generate_completions(*shell);
            Ok(())
        }
    };

    if let Err(e) = result {
        output::error(&format!("Error: {:#}", e));
        std::process::exit(1);
    }

    Ok(())
}

fn init_logging(cli: &Cli) {
    let level = match (cli.quiet, cli.verbose) {
        (true, _) => Some("error"),
        (false, 0) => None,
        (false, 1) => Some("info"),
        (false, _) => Some("debug"),
    };

    let mut config = LogConfig::new()
        .with_format(cli.log_format)
        .with_color(cli.color != ColorWhen::Never && console::colors_enabled_stderr());
    if let Some(level) = level {
        config = config.with_level(level);
    }

    if let Err(e) = init_tracing_with_config(&config) {
        output::warning(&format!("Logging disabled: {}", e));
    }
}

fn generate_completions(shell: Shell) {
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, "lfsfetch", &mut io::stdout());
}

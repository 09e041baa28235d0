// Copyright (c) 2023 the glyph-grid contributors.
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::fmt::Display;
use std::path::PathBuf;
use std::process::exit;

use clap::Parser;
use glyph_grid::error::AtlasError;
use glyph_grid::BakeReport;
use tracing::{debug, Level};
use tracing_subscriber::prelude::*;
use yacexits::{EX_CANTCREAT, EX_CONFIG, EX_NOINPUT, EX_OK, EX_SOFTWARE};

mod config;

pub struct CommandError {
    message: String,
    exit_code: u32,
}

trait ToCommandError<T, E> {
    fn to_command_error<C: Display>(self, context: C, exit_code: u32) -> Result<T, CommandError>;
}

impl<T, E> ToCommandError<T, E> for Result<T, E>
where
    E: Display,
{
    fn to_command_error<C: Display>(self, context: C, exit_code: u32) -> Result<T, CommandError> {
        match self {
            Ok(ok) => Ok(ok),
            Err(e) => Err(CommandError {
                message: format!("{}: {}", context, e),
                exit_code,
            }),
        }
    }
}

impl From<AtlasError> for CommandError {
    fn from(err: AtlasError) -> Self {
        let exit_code = match &err {
            AtlasError::ResourceLoad(_) => EX_NOINPUT,
            AtlasError::Io { .. } => EX_CANTCREAT,
            AtlasError::InvalidGrid(_) => EX_CONFIG,
            AtlasError::OutOfRange { .. } => EX_SOFTWARE,
        };

        CommandError {
            message: err.to_string(),
            exit_code,
        }
    }
}

pub type CommandResult<T> = Result<T, CommandError>;

/// Renders the 256 characters of a single-byte code page into a 16x16 PNG
/// font atlas.
#[derive(Debug, Default, Parser)]
#[clap(name = "glyph-grid", version)]
pub struct Args {
    /// TrueType or OpenType font to render. Defaults to a system monospace font.
    #[clap(short, long, env = "GLYPH_GRID_FONT")]
    pub font: Option<PathBuf>,

    /// Font size in pixels per em.
    #[clap(short, long)]
    pub size: Option<f32>,

    /// Path of the PNG to write.
    #[clap(short, long)]
    pub output: Option<PathBuf>,

    /// Also write a JSON manifest describing every cell to this path.
    #[clap(short, long)]
    pub manifest: Option<PathBuf>,

    /// A configuration file to use if not the default one.
    #[clap(short, long)]
    pub config: Option<PathBuf>,

    /// Leave cells empty for characters the font has no glyph for.
    #[clap(long)]
    pub skip_missing: bool,

    /// Log every step.
    #[clap(short, long)]
    pub verbose: bool,
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    match run(args) {
        Ok(report) => {
            println!("saved {}", report.output.display());
            exit(EX_OK as i32)
        }
        Err(e) => {
            eprintln!("ERROR: {}", e.message);
            exit(e.exit_code as i32)
        }
    }
}

fn run(args: Args) -> CommandResult<BakeReport> {
    let config = match args.config.as_ref() {
        Some(path) => config::load_config(path).to_command_error("loading config", EX_CONFIG)?,
        None => match config::get_config_path().filter(|path| path.is_file()) {
            Some(path) => config::load_config(&path).to_command_error("loading config", EX_CONFIG)?,
            None => {
                debug!("No configuration file; using defaults");
                config::ConfigFile::default()
            }
        },
    };

    let options = config::resolve_options(&args, &config)?;
    debug!("Resolved options: {:?}", options);

    Ok(glyph_grid::bake(&options)?)
}

/// Sets up logging to stderr, leaving stdout for the confirmation line.
fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let filter = tracing_subscriber::filter::Targets::new()
        .with_target("glyph_grid", level)
        .with_default(Level::WARN);

    let format = tracing_subscriber::fmt::layer()
        .compact()
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(filter)
        .with(format)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use glyph_grid::error::ResourceLoadError;

    #[test]
    fn exit_codes() {
        let no_font = AtlasError::ResourceLoad(ResourceLoadError::NoDefaultFont(vec![]));
        assert_eq!(CommandError::from(no_font).exit_code, EX_NOINPUT);

        let grid = AtlasError::InvalidGrid("too big".into());
        assert_eq!(CommandError::from(grid).exit_code, EX_CONFIG);

        let io = AtlasError::Io {
            path: "assets".into(),
            message: "denied".into(),
        };
        let err = CommandError::from(io);
        assert_eq!(err.exit_code, EX_CANTCREAT);
        assert_eq!(err.message, "failed to write assets: denied");
    }
}

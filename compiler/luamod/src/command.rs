//! Command line parsing.

use std::path::PathBuf;
use std::str::FromStr;

use luamod_deob::DeobfuscateOptions;
use luamod_fmt::FormatConfig;
use luamod_minify::MinifyOptions;

use crate::error::DriverError;

/// What to do with each input file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    Format(FormatConfig),
    Minify { options: MinifyOptions, stats: bool },
    Deobfuscate(DeobfuscateOptions),
    Lint,
    Help,
}

/// A parsed command line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Command {
    pub action: Action,
    pub paths: Vec<PathBuf>,
    /// Overrides the per-action default output directory.
    pub out_dir: Option<PathBuf>,
}

impl Command {
    pub fn help() -> Self {
        Self {
            action: Action::Help,
            paths: Vec::new(),
            out_dir: None,
        }
    }

    /// Parse the arguments after the program name.
    pub fn parse(args: &[String]) -> Result<Self, DriverError> {
        let Some((name, rest)) = args.split_first() else {
            return Ok(Self::help());
        };
        let mut action = match name.as_str() {
            "fmt" => Action::Format(FormatConfig::default()),
            "minify" => Action::Minify {
                options: MinifyOptions::default(),
                stats: false,
            },
            // deobfuscated output is always reformatted unless asked not to
            "deob" => Action::Deobfuscate(DeobfuscateOptions {
                reformat: Some(FormatConfig::default()),
                ..DeobfuscateOptions::default()
            }),
            "lint" => Action::Lint,
            "help" | "--help" | "-h" => return Ok(Self::help()),
            other => return Err(DriverError::UnknownCommand(other.to_owned())),
        };

        let mut paths = Vec::new();
        let mut out_dir = None;
        let mut args = rest.iter();
        while let Some(arg) = args.next() {
            match (arg.as_str(), &mut action) {
                ("--spaces", Action::Format(config)) => {
                    *config = FormatConfig::spaces(value("--spaces", args.next())?);
                }
                ("--spaces", Action::Deobfuscate(options)) => {
                    options.reformat = Some(FormatConfig::spaces(value("--spaces", args.next())?));
                }
                ("--no-format", Action::Deobfuscate(options)) => options.reformat = None,
                ("--rename", Action::Deobfuscate(options)) => options.rename_vars = true,
                ("--depth", Action::Deobfuscate(options)) => {
                    options.max_inline_depth = value("--depth", args.next())?;
                }
                ("--no-rename", Action::Minify { options, .. }) => options.rename_locals = false,
                ("--basic", Action::Minify { options, .. }) => options.aggressive = false,
                ("--stats", Action::Minify { stats, .. }) => *stats = true,
                ("--out-dir", _) => {
                    let dir = args.next().ok_or(DriverError::MissingValue("--out-dir"))?;
                    out_dir = Some(PathBuf::from(dir));
                }
                (flag, _) if flag.starts_with('-') => {
                    return Err(DriverError::UnknownOption {
                        command: name.clone(),
                        option: flag.to_owned(),
                    });
                }
                (path, _) => paths.push(PathBuf::from(path)),
            }
        }
        if paths.is_empty() {
            return Err(DriverError::MissingInput(name.clone()));
        }
        Ok(Self {
            action,
            paths,
            out_dir,
        })
    }
}

fn value<T: FromStr>(flag: &'static str, arg: Option<&String>) -> Result<T, DriverError> {
    let arg = arg.ok_or(DriverError::MissingValue(flag))?;
    arg.parse().map_err(|_| DriverError::InvalidValue {
        flag,
        value: arg.clone(),
    })
}

pub const USAGE: &str = "\
Usage: luamod <command> <files...> [options]

Commands:
  fmt      Reformat source            -> beautified_scripts/<name>.beaut.lua
  minify   Minify source              -> minified_scripts/<name>.min.lua
  deob     Deobfuscate and reformat   -> deobfuscated_scripts/<name>.deob.lua
  lint     Check source before obfuscating it
  help     Show this message

Options:
  --out-dir DIR   Write outputs to DIR
  --spaces N      fmt, deob: indent with N spaces instead of a tab
  --no-rename     minify: keep local names
  --basic         minify: skip literal and semicolon rewrites
  --stats         minify: print size statistics
  --rename        deob: rename machine-generated names
  --depth N       deob: inline at most N nested load() payloads (default 3)
  --no-format     deob: skip reformatting

Set RUST_LOG (e.g. RUST_LOG=luamod_deob=debug) for pass-level logs.";

#[cfg(test)]
mod tests;

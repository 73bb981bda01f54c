//! Per-file processing.

use std::fs;
use std::path::{Path, PathBuf};

use luamod_deob::deobfuscate_with;
use luamod_fmt::format_source;
use luamod_lexer::{tokenize, NameTables};
use luamod_lint::{validate, Validation};
use luamod_minify::{minify_with, MinifyStats};

use crate::command::{Action, Command};
use crate::error::DriverError;

/// What processing one input produced.
#[derive(Debug)]
pub struct FileOutcome {
    pub input: PathBuf,
    /// File written, for actions that write one.
    pub output: Option<PathBuf>,
    pub stats: MinifyStats,
    /// Lint report, for [`Action::Lint`].
    pub validation: Option<Validation>,
}

/// The rewritten text for `source`; `None` for actions that do not
/// rewrite.
pub fn transform(action: &Action, source: &str) -> Option<String> {
    match action {
        Action::Format(config) => Some(format_source(source, config)),
        Action::Minify { options, .. } => Some(minify_with(&tokenize(source), *options, NameTables::lua())),
        Action::Deobfuscate(options) => Some(deobfuscate_with(source, options)),
        Action::Lint | Action::Help => None,
    }
}

/// Where the output for `input` goes: `<dir>/<stem>.<suffix>`.
pub fn output_path(action: &Action, input: &Path, out_dir: Option<&Path>) -> Option<PathBuf> {
    let (default_dir, suffix) = match action {
        Action::Format(_) => ("beautified_scripts", "beaut.lua"),
        Action::Minify { .. } => ("minified_scripts", "min.lua"),
        Action::Deobfuscate(_) => ("deobfuscated_scripts", "deob.lua"),
        Action::Lint | Action::Help => return None,
    };
    let stem = input.file_stem()?.to_string_lossy();
    let dir = out_dir.map_or_else(|| PathBuf::from(default_dir), Path::to_path_buf);
    Some(dir.join(format!("{stem}.{suffix}")))
}

/// Read `input`, apply the command's action and write the result.
#[tracing::instrument(level = "debug", skip_all, fields(path = %input.display()))]
pub fn process_file(command: &Command, input: &Path) -> Result<FileOutcome, DriverError> {
    let source = read_source(input)?;
    let mut outcome = FileOutcome {
        input: input.to_path_buf(),
        output: None,
        stats: MinifyStats::new(&source, &source),
        validation: None,
    };
    if command.action == Action::Lint {
        outcome.validation = Some(validate(&source));
        return Ok(outcome);
    }
    let Some(text) = transform(&command.action, &source) else {
        return Ok(outcome);
    };
    outcome.stats = MinifyStats::new(&source, &text);
    if let Some(path) = output_path(&command.action, input, command.out_dir.as_deref()) {
        write_output(&path, &text)?;
        tracing::debug!(bytes_in = source.len(), bytes_out = text.len(), output = %path.display(), "written");
        outcome.output = Some(path);
    }
    Ok(outcome)
}

fn read_source(path: &Path) -> Result<String, DriverError> {
    let bytes = fs::read(path).map_err(|source| DriverError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    String::from_utf8(bytes).map_err(|_| DriverError::InvalidUtf8 {
        path: path.to_path_buf(),
    })
}

fn write_output(path: &Path, text: &str) -> Result<(), DriverError> {
    let write_error = |source| DriverError::Write {
        path: path.to_path_buf(),
        source,
    };
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).map_err(write_error)?;
    }
    fs::write(path, text).map_err(write_error)
}

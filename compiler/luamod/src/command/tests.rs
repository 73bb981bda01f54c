#![allow(clippy::unwrap_used, reason = "Tests can panic")]

use std::path::PathBuf;

use luamod_deob::DeobfuscateOptions;
use luamod_fmt::FormatConfig;
use luamod_minify::MinifyOptions;
use pretty_assertions::assert_eq;

use super::{Action, Command};
use crate::error::DriverError;

fn parse(args: &[&str]) -> Result<Command, DriverError> {
    let args: Vec<String> = args.iter().map(|&a| a.to_owned()).collect();
    Command::parse(&args)
}

// === Commands ===

#[test]
fn no_arguments_is_help() {
    assert_eq!(parse(&[]).unwrap(), Command::help());
    assert_eq!(parse(&["--help"]).unwrap().action, Action::Help);
}

#[test]
fn fmt_defaults_to_tabs() {
    let command = parse(&["fmt", "a.lua", "b.lua"]).unwrap();
    assert_eq!(command.action, Action::Format(FormatConfig::default()));
    assert_eq!(command.paths, [PathBuf::from("a.lua"), PathBuf::from("b.lua")]);
    assert_eq!(command.out_dir, None);
}

#[test]
fn deob_reformats_by_default() {
    let Action::Deobfuscate(options) = parse(&["deob", "x.lua"]).unwrap().action else {
        panic!("expected deob");
    };
    assert_eq!(options.reformat, Some(FormatConfig::default()));
    assert_eq!(options.max_inline_depth, DeobfuscateOptions::default().max_inline_depth);
    assert!(!options.rename_vars);
}

// === Options ===

#[test]
fn deob_flags() {
    let command = parse(&["deob", "--rename", "--depth", "5", "--no-format", "x.lua"]).unwrap();
    assert_eq!(
        command.action,
        Action::Deobfuscate(DeobfuscateOptions {
            max_inline_depth: 5,
            rename_vars: true,
            reformat: None,
        })
    );
}

#[test]
fn spaces_apply_to_fmt_and_deob() {
    let fmt = parse(&["fmt", "--spaces", "2", "x.lua"]).unwrap();
    assert_eq!(fmt.action, Action::Format(FormatConfig::spaces(2)));
    let Action::Deobfuscate(options) = parse(&["deob", "x.lua", "--spaces", "4"]).unwrap().action else {
        panic!("expected deob");
    };
    assert_eq!(options.reformat, Some(FormatConfig::spaces(4)));
}

#[test]
fn minify_flags() {
    let command = parse(&["minify", "--no-rename", "--basic", "--stats", "x.lua"]).unwrap();
    assert_eq!(
        command.action,
        Action::Minify {
            options: MinifyOptions {
                rename_locals: false,
                aggressive: false,
            },
            stats: true,
        }
    );
}

#[test]
fn out_dir_applies_to_every_command() {
    let command = parse(&["minify", "x.lua", "--out-dir", "build"]).unwrap();
    assert_eq!(command.out_dir, Some(PathBuf::from("build")));
}

// === Errors ===

#[test]
fn unknown_command() {
    assert!(matches!(parse(&["compile", "x.lua"]), Err(DriverError::UnknownCommand(c)) if c == "compile"));
}

#[test]
fn option_of_another_command_is_unknown() {
    let err = parse(&["fmt", "--rename", "x.lua"]).unwrap_err();
    assert!(matches!(err, DriverError::UnknownOption { ref option, .. } if option == "--rename"));
    assert_eq!(err.to_string(), "unknown option '--rename' for 'fmt'");
}

#[test]
fn flag_values_are_checked() {
    assert!(matches!(parse(&["deob", "x.lua", "--depth"]), Err(DriverError::MissingValue("--depth"))));
    assert!(matches!(
        parse(&["fmt", "--spaces", "wide", "x.lua"]),
        Err(DriverError::InvalidValue { flag: "--spaces", .. })
    ));
    assert!(matches!(parse(&["lint", "--out-dir"]), Err(DriverError::MissingValue("--out-dir"))));
}

#[test]
fn inputs_are_required() {
    assert!(matches!(parse(&["lint"]), Err(DriverError::MissingInput(c)) if c == "lint"));
}

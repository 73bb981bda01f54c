//! luamod CLI

use std::process::ExitCode;

use luamod::{init_tracing, process_file, Action, Command, FileOutcome, USAGE};

fn main() -> ExitCode {
    init_tracing();
    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = match Command::parse(&args) {
        Ok(command) => command,
        Err(err) => {
            eprintln!("error: {err}");
            eprintln!("Run 'luamod help' for usage");
            return ExitCode::FAILURE;
        }
    };
    if command.action == Action::Help {
        println!("{USAGE}");
        return ExitCode::SUCCESS;
    }

    let mut failed = 0usize;
    let mut lint_errors = 0usize;
    for path in &command.paths {
        match process_file(&command, path) {
            Ok(outcome) => lint_errors += report(&command.action, &outcome),
            Err(err) => {
                eprintln!("error: {err}");
                failed += 1;
            }
        }
    }
    if failed > 0 {
        eprintln!("{failed} of {} file(s) skipped", command.paths.len());
    }
    if failed > 0 || lint_errors > 0 {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

/// Print what happened to one file; returns its lint error count.
fn report(action: &Action, outcome: &FileOutcome) -> usize {
    let input = outcome.input.display();
    if let Some(validation) = &outcome.validation {
        let (warnings, errors) = validation.messages();
        for message in errors.iter().chain(&warnings) {
            println!("{input}: {message}");
        }
        if validation.is_clean() {
            println!("{input}: ok");
        }
        return errors.len();
    }
    if let Some(output) = &outcome.output {
        println!("{input} -> {}", output.display());
    }
    if let Action::Minify { stats: true, .. } = action {
        let stats = outcome.stats;
        println!("  Original:  {} bytes", stats.original_bytes);
        println!("  Minified:  {} bytes", stats.minified_bytes);
        println!("  Reduction: {:.1}%", stats.reduction_percent());
        println!(
            "  Saved:     {} bytes",
            stats.original_bytes.saturating_sub(stats.minified_bytes)
        );
    }
    0
}

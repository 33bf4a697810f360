//! `xcoord patterns`: list the catalog or run its self-test.

use xcoord::{Family, PatternSet};

use crate::exit_codes::EXIT_SELF_TEST_FAILED;
use crate::CliError;

pub fn cmd_patterns(family: Option<Family>, self_test: bool) -> Result<(), CliError> {
    if self_test {
        return run_self_test();
    }

    let catalog = PatternSet::shared();
    for p in catalog.iter().filter(|p| family.map_or(true, |f| p.family == f)) {
        println!("{:<8} {:<5} {}", p.id, p.family.as_str(), p.description);
        log::debug!("{} regex: {}", p.id, p.regex.as_str());
    }
    Ok(())
}

fn run_self_test() -> Result<(), CliError> {
    let (catalog, errors) = PatternSet::compile();
    for e in &errors {
        eprintln!("compile: {e}");
    }

    let failures = catalog.self_test();
    for f in &failures {
        match &f.matched {
            Some(m) => eprintln!("{}: '{}' matched only '{}'", f.id, f.example, m),
            None => eprintln!("{}: '{}' did not match", f.id, f.example),
        }
    }

    let examples: usize = catalog.iter().map(|p| p.examples.len()).sum();
    let broken = errors.len() + failures.len();
    if broken > 0 {
        return Err(CliError {
            code: EXIT_SELF_TEST_FAILED,
            message: format!("{broken} self-test failure(s) across {} pattern(s)", catalog.len()),
            hint: None,
        });
    }
    eprintln!("ok: {} patterns, {} examples", catalog.len(), examples);
    Ok(())
}

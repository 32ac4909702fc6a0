// vihje-cli: shared utilities for the CLI tools.

use std::path::Path;
use std::process;

use vihje_core::config::BiasConfig;
use vihje_core::symbols::{SymbolTable, Vocabulary};

/// Load a vocabulary file: one symbol per line, ids assigned in line order
/// starting at 1 (id 0 stays reserved). Blank lines are skipped.
pub fn load_vocabulary(path: &str) -> Result<SymbolTable, String> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| format!("failed to read {path}: {e}"))?;
    let mut table = SymbolTable::new();
    for line in contents.lines() {
        let symbol = line.trim_end();
        if symbol.is_empty() {
            continue;
        }
        table.add_symbol(symbol);
    }
    if table.is_empty() {
        return Err(format!("vocabulary file {path} contains no symbols"));
    }
    Ok(table)
}

/// Read non-empty lines from a file (phrase lists, word streams).
pub fn read_lines(path: &Path) -> Result<Vec<String>, String> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| format!("failed to read {}: {e}", path.display()))?;
    Ok(contents
        .lines()
        .map(str::trim_end)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect())
}

/// Parse one `--NAME=VALUE` / `--NAME VALUE` / `-SHORT VALUE` option out of
/// `args`. Returns `(value, remaining_args)`.
pub fn parse_value_arg(args: &[String], long: &str, short: &str) -> (Option<String>, Vec<String>) {
    let prefix = format!("{long}=");
    let mut value = None;
    let mut remaining = Vec::new();
    let mut skip_next = false;

    for (i, arg) in args.iter().enumerate() {
        if skip_next {
            skip_next = false;
            continue;
        }
        if let Some(v) = arg.strip_prefix(&prefix) {
            value = Some(v.to_string());
        } else if arg == long || arg == short {
            if i + 1 < args.len() {
                value = Some(args[i + 1].clone());
                skip_next = true;
            } else {
                eprintln!("error: {arg} requires a value");
                process::exit(1);
            }
        } else {
            remaining.push(arg.clone());
        }
    }

    (value, remaining)
}

/// Parse the shared scoring/cap options into a [`BiasConfig`], consuming
/// them from `args`.
pub fn parse_config(args: &[String]) -> (BiasConfig, Vec<String>) {
    let mut config = BiasConfig::new();

    let (base, args) = parse_value_arg(args, "--base-score", "-b");
    if let Some(v) = base {
        config.base_score = parse_or_die(&v, "--base-score");
    }
    let (incremental, args) = parse_value_arg(&args, "--incremental-score", "-i");
    if let Some(v) = incremental {
        config.incremental_score = parse_or_die(&v, "--incremental-score");
    }
    let (max_phrases, args) = parse_value_arg(&args, "--max-phrases", "-n");
    if let Some(v) = max_phrases {
        config.max_phrases = parse_or_die(&v, "--max-phrases");
    }

    (config, args)
}

fn parse_or_die<T: std::str::FromStr>(value: &str, option: &str) -> T {
    value
        .parse()
        .unwrap_or_else(|_| fatal(&format!("invalid value {value:?} for {option}")))
}

/// Print an error message and exit with code 1.
pub fn fatal(msg: &str) -> ! {
    eprintln!("error: {msg}");
    process::exit(1);
}

/// Check if `--help` or `-h` is in the args.
pub fn wants_help(args: &[String]) -> bool {
    args.iter().any(|a| a == "--help" || a == "-h")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parse_value_arg_equals_form() {
        let (value, rest) = parse_value_arg(&args(&["--vocab=words.txt", "x"]), "--vocab", "-v");
        assert_eq!(value.as_deref(), Some("words.txt"));
        assert_eq!(rest, args(&["x"]));
    }

    #[test]
    fn parse_value_arg_separate_form() {
        let (value, rest) = parse_value_arg(&args(&["-v", "words.txt", "x"]), "--vocab", "-v");
        assert_eq!(value.as_deref(), Some("words.txt"));
        assert_eq!(rest, args(&["x"]));
    }

    #[test]
    fn parse_value_arg_absent() {
        let (value, rest) = parse_value_arg(&args(&["x", "y"]), "--vocab", "-v");
        assert_eq!(value, None);
        assert_eq!(rest, args(&["x", "y"]));
    }

    #[test]
    fn parse_config_overrides() {
        let (config, rest) = parse_config(&args(&[
            "--base-score=2.5",
            "--incremental-score",
            "0.5",
            "--max-phrases=3",
            "other",
        ]));
        assert!((config.base_score - 2.5).abs() < f32::EPSILON);
        assert!((config.incremental_score - 0.5).abs() < f32::EPSILON);
        assert_eq!(config.max_phrases, 3);
        assert_eq!(rest, args(&["other"]));
    }

    #[test]
    fn wants_help_finds_either_flag() {
        assert!(wants_help(&args(&["-h"])));
        assert!(wants_help(&args(&["x", "--help"])));
        assert!(!wants_help(&args(&["x"])));
    }
}

//! Command line interface.

use std::ffi::OsString;
use std::path::PathBuf;

use clap::{ArgAction, CommandFactory, Parser};

use crate::observability::logging::LogFormat;

#[derive(Debug, Parser)]
#[command(name = "skycoin-explorer")]
#[command(version, about = "Serves the explorer web app and proxies its API to a skycoin node", long_about = None)]
pub struct Cli {
    /// Only run the API, don't serve static content
    #[arg(
        long = "api-only",
        num_args = 0..=1,
        default_value_t = false,
        default_missing_value = "true",
        action = ArgAction::Set
    )]
    pub api_only: bool,

    /// Directory containing the built web app
    #[arg(long, default_value = "./dist", allow_hyphen_values = true)]
    pub dist_dir: PathBuf,

    /// Maximum number of concurrent client connections
    #[arg(long, default_value_t = 10_000)]
    pub max_connections: usize,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,
}

impl Cli {
    /// Parse the process arguments, accepting single-dash long flags.
    pub fn from_env() -> Self {
        Self::parse_from(normalize_args(std::env::args_os()))
    }
}

/// Rewrite single-dash long flags (`-api-only`) into their double-dash form.
///
/// Only names that `Cli` declares are rewritten, and the value following a
/// flag that requires one is left alone, so `--dist-dir -odd` keeps its
/// value. The first item is the program name and is passed through, as is
/// everything after a bare `--`.
pub fn normalize_args<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let flags = long_flags();
    let mut normalized = Vec::new();
    let mut terminated = false;
    let mut value_pending = false;

    for (i, arg) in args.into_iter().map(Into::into).enumerate() {
        if i == 0 || terminated || std::mem::take(&mut value_pending) {
            normalized.push(arg);
            continue;
        }

        let rewritten = match arg.to_str() {
            Some("--") => {
                terminated = true;
                None
            }
            Some(s) => {
                let name = match s.strip_prefix("--") {
                    Some(name) => Some(name),
                    None => s.strip_prefix('-').filter(|name| name.len() > 1),
                };
                name.and_then(|name| {
                    let (flag, inline_value) = match name.split_once('=') {
                        Some((flag, value)) => (flag, Some(value)),
                        None => (name, None),
                    };
                    let (_, needs_value) = flags.iter().find(|(long, _)| long == flag)?;
                    value_pending = *needs_value && inline_value.is_none();
                    Some(OsString::from(format!("--{name}")))
                })
            }
            None => None,
        };
        normalized.push(rewritten.unwrap_or(arg));
    }
    normalized
}

/// Long flag names declared by `Cli`, and whether each requires a value.
fn long_flags() -> Vec<(String, bool)> {
    let mut command = Cli::command();
    command.build();
    command
        .get_arguments()
        .filter_map(|arg| {
            let long = arg.get_long()?;
            let needs_value = arg.get_num_args().is_some_and(|n| n.min_values() > 0);
            Some((long.to_owned(), needs_value))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::parse_from(normalize_args(
            std::iter::once("skycoin-explorer").chain(args.iter().copied()),
        ))
    }

    #[test]
    fn test_defaults() {
        let cli = parse(&[]);
        assert!(!cli.api_only);
        assert_eq!(cli.dist_dir, PathBuf::from("./dist"));
        assert_eq!(cli.max_connections, 10_000);
        assert_eq!(cli.log_format, LogFormat::Pretty);
    }

    #[test]
    fn test_go_style_flag() {
        assert!(parse(&["-api-only"]).api_only);
        assert!(parse(&["--api-only"]).api_only);
        assert!(!parse(&["-api-only=false"]).api_only);
    }

    #[test]
    fn test_other_flags() {
        let cli = parse(&["-dist-dir", "/srv/dist", "--log-format", "json"]);
        assert_eq!(cli.dist_dir, PathBuf::from("/srv/dist"));
        assert_eq!(cli.log_format, LogFormat::Json);
    }

    #[test]
    fn test_normalize_leaves_short_flags_and_values() {
        let args = normalize_args(["prog", "-h", "--api-only", "-api-only", "--", "-x-y"]);
        let args: Vec<_> = args.iter().map(|a| a.to_str().unwrap()).collect();
        assert_eq!(args, ["prog", "-h", "--api-only", "--api-only", "--", "-x-y"]);
    }

    #[test]
    fn test_normalize_keeps_dash_values() {
        let args = normalize_args(["prog", "--dist-dir", "-odd", "-dist-dir", "-api-only", "-unknown"]);
        let args: Vec<_> = args.iter().map(|a| a.to_str().unwrap()).collect();
        assert_eq!(args, ["prog", "--dist-dir", "-odd", "--dist-dir", "-api-only", "-unknown"]);

        let args = normalize_args(["prog", "-api-only", "-dist-dir=-odd", "-log-format", "json"]);
        let args: Vec<_> = args.iter().map(|a| a.to_str().unwrap()).collect();
        assert_eq!(args, ["prog", "--api-only", "--dist-dir=-odd", "--log-format", "json"]);
    }

    #[test]
    fn test_dist_dir_may_start_with_dash() {
        let cli = parse(&["--dist-dir", "-odd"]);
        assert_eq!(cli.dist_dir, PathBuf::from("-odd"));
        assert!(!cli.api_only);

        let cli = parse(&["-api-only", "-dist-dir", "-odd"]);
        assert_eq!(cli.dist_dir, PathBuf::from("-odd"));
        assert!(cli.api_only);
    }
}

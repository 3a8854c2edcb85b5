//! Command-line arguments.

use std::path::PathBuf;

use clap::Parser;

use crate::error::CliError;

#[derive(Debug, Clone, Default, PartialEq, Eq, Parser)]
#[command(name = "feedscope")]
#[command(about = "Show where GBFS validation errors sit in the feed document", long_about = None)]
pub struct CliArgs {
    /// TOML configuration (falls back to FEEDSCOPE_CONFIG)
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Validation report JSON (default: stdin)
    #[arg(short, long, value_name = "PATH")]
    pub report: Option<PathBuf>,

    /// Sweep the document cache and exit
    #[arg(long)]
    pub sweep_only: bool,

    /// Feed document the report was produced for
    #[arg(value_name = "FEED_URL")]
    pub url: Option<String>,
}

impl CliArgs {
    /// The feed URL, required unless only sweeping.
    pub fn require_url(&self) -> Result<&str, CliError> {
        self.url
            .as_deref()
            .ok_or_else(|| CliError::Usage("missing FEED_URL (see --help)".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<CliArgs, clap::Error> {
        CliArgs::try_parse_from(std::iter::once("feedscope").chain(args.iter().copied()))
    }

    #[test]
    fn test_parse_full() {
        let args = parse(&["--config", "fs.toml", "-r", "r.json", "https://x/gbfs.json"])
            .expect("args should parse");
        assert_eq!(args.config, Some(PathBuf::from("fs.toml")));
        assert_eq!(args.report, Some(PathBuf::from("r.json")));
        assert_eq!(args.require_url().ok(), Some("https://x/gbfs.json"));
        assert!(!args.sweep_only);
    }

    #[test]
    fn test_config_flag_without_path() {
        let err = parse(&["--config"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::InvalidValue);
    }

    #[test]
    fn test_sweep_only_needs_no_url() {
        let args = parse(&["--sweep-only"]).expect("args should parse");
        assert!(args.sweep_only);
        assert!(matches!(args.require_url(), Err(CliError::Usage(_))));
    }

    #[test]
    fn test_rejects_unknown_flag_and_extra_url() {
        assert_eq!(
            parse(&["--verbose"]).unwrap_err().kind(),
            clap::error::ErrorKind::UnknownArgument
        );
        assert!(parse(&["a", "b"]).is_err());
    }

    #[test]
    fn test_command_definition() {
        use clap::CommandFactory;
        CliArgs::command().debug_assert();
    }
}

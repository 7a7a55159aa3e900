use std::path::PathBuf;

use clap::Parser;

/// Upload a parliamentary bill (PDF) and show its analysis.
#[derive(Debug, Parser)]
#[command(name = "analyser_app", version)]
pub struct Cli {
    /// PDF to analyse. Without one the app starts in interactive mode.
    pub file: Option<PathBuf>,

    /// Read commands from stdin even when a file is given.
    #[arg(short, long)]
    pub interactive: bool,

    /// Config file (RON). Defaults to ./analyser.ron when present.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Base URL of the analysis service.
    #[arg(long, env = "ANALYSER_BASE_URL")]
    pub base_url: Option<String>,

    /// Request timeout in seconds.
    #[arg(long, value_name = "SECS")]
    pub timeout_secs: Option<u64>,

    /// Directory to save text reports of successful analyses into.
    #[arg(long, value_name = "DIR")]
    pub save_dir: Option<PathBuf>,

    /// Raise log verbosity (repeatable).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn is_interactive(&self) -> bool {
        self.interactive || self.file.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_argument_runs_once() {
        let cli = Cli::parse_from(["analyser_app", "bill.pdf", "--timeout-secs", "180"]);
        assert_eq!(cli.file, Some(PathBuf::from("bill.pdf")));
        assert_eq!(cli.timeout_secs, Some(180));
        assert!(!cli.is_interactive());
    }

    #[test]
    fn no_file_is_interactive() {
        let cli = Cli::parse_from(["analyser_app", "-vv"]);
        assert!(cli.is_interactive());
        assert_eq!(cli.verbose, 2);
    }
}

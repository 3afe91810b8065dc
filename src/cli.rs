use clap::{CommandFactory, Parser, ValueHint};
use clap_complete::{generate, Shell};
use log::LevelFilter;
use std::io;
use std::path::PathBuf;

/// commit-html - Export a git commit as a self-contained side-by-side HTML diff
#[derive(Parser, Debug)]
#[command(name = "commit-html", version, about, long_about = None)]
pub struct Args {
    /// Commit to export: hash, branch, tag or any revision git understands.
    /// If omitted, the latest commit on the current branch is used.
    #[arg(value_hint = ValueHint::Other)]
    pub commit: Option<String>,

    /// Pre-render the diff and write a document without any script
    #[arg(long = "static")]
    pub static_mode: bool,

    /// Download the viewer assets into the asset cache and exit
    #[arg(long)]
    pub fetch_assets: bool,

    /// Directory holding the cached viewer assets
    #[arg(long, value_hint = ValueHint::DirPath)]
    pub asset_dir: Option<PathBuf>,

    /// How long static rendering waits for the diff to appear, in milliseconds
    #[arg(long, value_name = "MS")]
    pub timeout: Option<u64>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Generate shell completions
    #[arg(long, value_enum)]
    pub completions: Option<Shell>,
}

impl Args {
    pub fn log_level(&self) -> LevelFilter {
        match self.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }

    pub fn render_mode(&self) -> RenderMode {
        if self.static_mode {
            RenderMode::Static
        } else {
            RenderMode::Interactive
        }
    }
}

/// Which commit the user asked for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitTarget {
    /// Most recent commit on the current branch
    Latest,
    /// Any revision, passed to git as-is
    Ref(String),
}

impl CommitTarget {
    /// Parse the commit argument into a CommitTarget
    pub fn parse(commit: Option<&str>) -> Self {
        match commit.map(str::trim) {
            None | Some("") => CommitTarget::Latest,
            Some(s) => CommitTarget::Ref(s.to_string()),
        }
    }
}

/// Whether the output keeps the live viewer script or is pre-rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    Interactive,
    Static,
}

/// Generate shell completions to stdout
pub fn generate_completions(shell: Shell) {
    let mut cmd = Args::command();
    generate(shell, &mut cmd, "commit-html", &mut io::stdout());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_latest() {
        assert_eq!(CommitTarget::parse(None), CommitTarget::Latest);
        assert_eq!(CommitTarget::parse(Some("  ")), CommitTarget::Latest);
    }

    #[test]
    fn test_parse_ref() {
        assert_eq!(
            CommitTarget::parse(Some("abc123")),
            CommitTarget::Ref("abc123".to_string())
        );
        assert_eq!(
            CommitTarget::parse(Some("HEAD~2")),
            CommitTarget::Ref("HEAD~2".to_string())
        );
    }

    #[test]
    fn test_static_flag_selects_mode() {
        let args = Args::parse_from(["commit-html", "--static", "main"]);
        assert_eq!(args.render_mode(), RenderMode::Static);
        assert_eq!(args.commit.as_deref(), Some("main"));

        let args = Args::parse_from(["commit-html"]);
        assert_eq!(args.render_mode(), RenderMode::Interactive);
        assert!(args.commit.is_none());
    }

    #[test]
    fn test_verbosity_levels() {
        let args = Args::parse_from(["commit-html", "-vv"]);
        assert_eq!(args.log_level(), LevelFilter::Debug);
    }

    #[test]
    fn test_cli_definition_is_valid() {
        Args::command().debug_assert();
    }
}

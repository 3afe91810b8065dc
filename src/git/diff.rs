use super::repository::Repository;
use crate::error::Result;

/// Options that make the diff text independent of the user's git config:
/// no colors, no external diff drivers, fixed context, a named algorithm,
/// explicit rename/copy detection and CR-at-EOL noise suppressed.
pub const DIFF_FLAGS: &[&str] = &[
    "--no-color",
    "--no-ext-diff",
    "--unified=3",
    "--diff-algorithm=histogram",
    "--find-renames",
    "--find-copies",
    "--ignore-cr-at-eol",
];

/// Everything the document needs to know about one commit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitDiff {
    pub commit: String,
    pub message: String,
    pub diff: String,
}

impl Repository {
    /// Unified diff text of `commit` against its parent
    pub fn diff_text(&self, commit: &str) -> Result<String> {
        let peeled = Self::peeled(commit);
        let mut args = vec!["show", "--format="];
        args.extend_from_slice(DIFF_FLAGS);
        args.extend_from_slice(&["--end-of-options", peeled.as_str()]);

        let stdout = self.git(&args)?;
        // Invalid UTF-8 cannot survive embedding in a JS string anyway.
        Ok(String::from_utf8_lossy(&stdout).into_owned())
    }

    /// Extract the diff, then the message. Either failure aborts the run.
    pub fn commit_diff(&self, commit: &str) -> Result<CommitDiff> {
        let diff = self.diff_text(commit)?;
        let message = self.commit_message(commit)?;
        Ok(CommitDiff {
            commit: commit.to_string(),
            message,
            diff,
        })
    }
}

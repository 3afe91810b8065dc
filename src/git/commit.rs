use super::repository::Repository;
use crate::cli::CommitTarget;
use crate::error::Result;

impl Repository {
    /// Turn the user's target into the ref every later git call will use.
    ///
    /// `Latest` asks git for the newest commit on the current branch and
    /// returns its abbreviated hash. An explicit ref is passed through
    /// unvalidated; a bad ref surfaces when the diff is extracted.
    pub fn resolve_commit(&self, target: &CommitTarget) -> Result<String> {
        match target {
            CommitTarget::Latest => self.latest_commit(),
            CommitTarget::Ref(r) => Ok(r.clone()),
        }
    }

    /// Abbreviated hash of the most recent commit on the current branch
    pub fn latest_commit(&self) -> Result<String> {
        let stdout = self.git(&["log", "-1", "--format=%h"])?;
        Ok(String::from_utf8_lossy(&stdout).trim().to_string())
    }

    /// Full commit message (subject and body), exactly as git prints `%B`
    pub fn commit_message(&self, commit: &str) -> Result<String> {
        let peeled = Self::peeled(commit);
        let stdout = self.git(&[
            "show",
            "--no-patch",
            "--no-color",
            "--format=%B",
            "--end-of-options",
            peeled.as_str(),
        ])?;
        Ok(String::from_utf8_lossy(&stdout).into_owned())
    }
}

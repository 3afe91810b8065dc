use crate::error::{Error, Result};
use git2::Repository as Git2Repo;
use log::debug;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Explicit repository context. Every git invocation runs against `workdir`
/// instead of whatever the process's current directory happens to be.
#[derive(Debug, Clone)]
pub struct Repository {
    workdir: PathBuf,
}

impl Repository {
    /// Open the repository containing the current directory
    pub fn open_current_dir() -> Result<Self> {
        Self::discover(".")
    }

    /// Open the repository containing `path`
    pub fn discover<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Git2Repo::discover(path)?;
        // Bare repositories have no work tree; git still accepts its git dir.
        let workdir = repo
            .workdir()
            .unwrap_or_else(|| repo.path())
            .to_path_buf();
        Ok(Self { workdir })
    }

    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    /// `commit` peeled to the commit it names, so annotated tags never
    /// contribute their own object to `git show` output
    pub(crate) fn peeled(commit: &str) -> String {
        format!("{}^{{commit}}", commit)
    }

    /// Run git with `args` and return its stdout. A non-zero exit becomes
    /// `Error::Git` carrying git's own stderr.
    pub(crate) fn git(&self, args: &[&str]) -> Result<Vec<u8>> {
        debug!("git {}", args.join(" "));
        let output = Command::new("git")
            .args(args)
            .current_dir(&self.workdir)
            .output()
            .map_err(Error::GitSpawn)?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(Error::Git {
                args: args.join(" "),
                stderr,
            });
        }

        Ok(output.stdout)
    }
}

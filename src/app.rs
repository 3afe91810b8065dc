use crate::assets::{self, AssetBundle};
use crate::cli::{Args, CommitTarget, RenderMode};
use crate::config::Config;
use crate::git::{CommitDiff, Repository};
use crate::html;
use crate::render::{ChromeDom, HeadlessDom, StaticRenderer};
use anyhow::{Context, Result};
use log::{debug, info};
use std::fs;
use std::path::{Path, PathBuf};

pub struct App {
    repo: Repository,
    target: CommitTarget,
    mode: RenderMode,
    config: Config,
    out_dir: PathBuf,
}

impl App {
    /// Work on the repository around the current directory and write the
    /// document there
    pub fn new(args: &Args, config: Config) -> Result<Self> {
        let repo = Repository::open_current_dir()?;
        debug!("Repository at {}", repo.workdir().display());
        let out_dir = std::env::current_dir().context("Failed to read current directory")?;
        Ok(Self::with_repository(
            repo,
            CommitTarget::parse(args.commit.as_deref()),
            args.render_mode(),
            config,
            out_dir,
        ))
    }

    pub fn with_repository(
        repo: Repository,
        target: CommitTarget,
        mode: RenderMode,
        config: Config,
        out_dir: PathBuf,
    ) -> Self {
        Self {
            repo,
            target,
            mode,
            config,
            out_dir,
        }
    }

    /// Resolve, extract, compose, optionally pre-render, then write.
    /// Returns the path of the written document.
    pub fn run(&self) -> Result<PathBuf> {
        let commit = self.repo.resolve_commit(&self.target)?;
        info!("Exporting commit {}", commit);

        let data = self.repo.commit_diff(&commit)?;
        let assets = AssetBundle::load(&self.config.asset_dir())?;

        let document = match self.mode {
            RenderMode::Interactive => html::compose(&data, &assets),
            RenderMode::Static => {
                let dom = ChromeDom::launch(&self.config)?;
                render_static(&data, &assets, dom, &self.config)?
            }
        };

        write_document(&self.out_dir, &commit, &document)
    }
}

/// Compose the interactive document and run it through `dom` to get the
/// script-free version
pub fn render_static<D: HeadlessDom>(
    data: &CommitDiff,
    assets: &AssetBundle,
    dom: D,
    config: &Config,
) -> crate::error::Result<String> {
    let interactive = html::compose(data, assets);
    StaticRenderer::new(dom, config.render_timeout()).render(&interactive)
}

/// `commit-<ref>-diff.html`, with path separators in the ref flattened so
/// refs like `origin/main` stay inside `dir`
pub fn output_file_name(commit: &str) -> String {
    let safe: String = commit
        .chars()
        .map(|c| if matches!(c, '/' | '\\') { '-' } else { c })
        .collect();
    format!("commit-{}-diff.html", safe)
}

/// Write the finished document, replacing any previous file of that name
pub fn write_document(dir: &Path, commit: &str, document: &str) -> Result<PathBuf> {
    let path = dir.join(output_file_name(commit));
    fs::write(&path, document)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    debug!("Document is {} bytes", document.len());
    Ok(path)
}

/// Populate the asset cache from the pinned upstream locations
pub fn fetch_assets(config: &Config) -> Result<()> {
    let dir = config.asset_dir();
    let written = assets::fetch_all(&dir)?;
    for path in written {
        info!("Saved {}", path.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::git::fixture::Fixture;
    use std::cell::RefCell;
    use std::time::Duration;
    use tempfile::TempDir;

    #[test]
    fn test_output_file_name() {
        assert_eq!(output_file_name("abc1234"), "commit-abc1234-diff.html");
        assert_eq!(
            output_file_name("origin/feature"),
            "commit-origin-feature-diff.html"
        );
    }

    #[test]
    fn test_write_document_overwrites() {
        let dir = TempDir::new().unwrap();
        write_document(dir.path(), "abc", "first").unwrap();
        let path = write_document(dir.path(), "abc", "second").unwrap();

        assert_eq!(path, dir.path().join("commit-abc-diff.html"));
        assert_eq!(fs::read_to_string(path).unwrap(), "second");
    }

    /// Browser stand-in that keeps the page as the composer produced it,
    /// apart from dropping scripts.
    struct PassthroughDom;

    impl HeadlessDom for PassthroughDom {
        type Page = RefCell<String>;

        fn load(&self, html: &str) -> crate::error::Result<Self::Page> {
            Ok(RefCell::new(html.to_string()))
        }

        fn wait_for_selector_non_empty(
            &self,
            _page: &Self::Page,
            _selector: &str,
            _timeout: Duration,
        ) -> crate::error::Result<bool> {
            Ok(false)
        }

        fn strip_scripts(&self, page: &Self::Page) -> crate::error::Result<()> {
            let mut html = page.borrow().clone();
            while let Some(start) = html.find("<script>") {
                let end = start + html[start..].find("</script>").unwrap() + "</script>".len();
                html.replace_range(start..end, "");
            }
            *page.borrow_mut() = html;
            Ok(())
        }

        fn serialize(&self, page: &Self::Page) -> crate::error::Result<String> {
            Ok(page.borrow().clone())
        }
    }

    #[test]
    fn test_static_document_has_no_scripts() {
        let data = CommitDiff {
            commit: "abc1234".to_string(),
            message: "Fix </script> handling".to_string(),
            diff: "+let s = \"</script>\";\n".to_string(),
        };
        let assets = AssetBundle {
            highlight_theme: String::new(),
            diff_viewer_styles: String::new(),
            diff_viewer_script: "var t = '</script>';".to_string(),
        };
        let config = Config {
            render_timeout_ms: 10,
            ..Config::default()
        };

        let html = render_static(&data, &assets, PassthroughDom, &config).unwrap();
        assert!(!html.to_ascii_lowercase().contains("<script"));
        assert!(html.contains("Fix &lt;/script&gt; handling"));
    }

    fn populated_asset_dir() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("highlight-theme.css"), ".hljs {}").unwrap();
        fs::write(dir.path().join("diff2html.min.css"), ".d2h-wrapper {}").unwrap();
        fs::write(dir.path().join("diff2html-ui.min.js"), "var Diff2HtmlUI;").unwrap();
        dir
    }

    fn app(fixture: &Fixture, target: CommitTarget, asset_dir: &Path, out_dir: &Path) -> App {
        let config = Config {
            asset_dir: Some(asset_dir.to_path_buf()),
            ..Config::default()
        };
        App::with_repository(
            Repository::discover(fixture.path()).unwrap(),
            target,
            RenderMode::Interactive,
            config,
            out_dir.to_path_buf(),
        )
    }

    #[test]
    fn test_run_exports_latest_commit() {
        let fixture = Fixture::new();
        fixture.write("a.txt", "one\n");
        fixture.commit("first");
        fixture.write("a.txt", "two\n");
        let newest = fixture.commit("second & last");

        let assets = populated_asset_dir();
        let out = TempDir::new().unwrap();
        let path = app(&fixture, CommitTarget::Latest, assets.path(), out.path())
            .run()
            .unwrap();

        let name = path.file_name().unwrap().to_str().unwrap().to_string();
        let short = name
            .strip_prefix("commit-")
            .and_then(|n| n.strip_suffix("-diff.html"))
            .unwrap();
        assert!(newest.to_string().starts_with(short));

        let html = fs::read_to_string(&path).unwrap();
        assert!(html.contains("second &amp; last"));
        assert!(html.contains("+two"));
    }

    #[test]
    fn test_bad_ref_writes_nothing() {
        let fixture = Fixture::new();
        fixture.write("a.txt", "one\n");
        fixture.commit("first");

        let assets = populated_asset_dir();
        let out = TempDir::new().unwrap();
        let target = CommitTarget::Ref("no-such-commit".to_string());
        let result = app(&fixture, target, assets.path(), out.path()).run();

        assert!(result.is_err());
        assert_eq!(fs::read_dir(out.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_missing_assets_write_nothing() {
        let fixture = Fixture::new();
        fixture.write("a.txt", "one\n");
        fixture.commit("first");

        let empty = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        let err = app(&fixture, CommitTarget::Latest, empty.path(), out.path())
            .run()
            .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<Error>(),
            Some(Error::MissingAsset { .. })
        ));
        assert_eq!(fs::read_dir(out.path()).unwrap().count(), 0);
    }
}

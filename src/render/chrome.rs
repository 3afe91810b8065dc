use super::{race_render, HeadlessDom, WaitTiming};
use crate::config::Config;
use crate::error::{Error, Result};
use headless_chrome::{Browser, LaunchOptions, Tab};
use log::{debug, trace};
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;
use tempfile::NamedTempFile;
use url::Url;

const STRIP_SCRIPTS: &str =
    "document.querySelectorAll('script').forEach(function (s) { s.remove(); }); true";

const SERIALIZE: &str = r#"(function () {
  var doctype = document.doctype ? new XMLSerializer().serializeToString(document.doctype) + '\n' : '';
  return doctype + document.documentElement.outerHTML;
})()"#;

/// Headless Chrome/Chromium as the document environment
pub struct ChromeDom {
    browser: Browser,
    timing: WaitTiming,
}

/// A loaded tab. The temporary file backing its `file://` URL lives as long
/// as the page.
pub struct ChromePage {
    tab: Arc<Tab>,
    _source: NamedTempFile,
}

impl ChromeDom {
    /// Launch a headless browser with the configured viewport
    pub fn launch(config: &Config) -> Result<Self> {
        let options = LaunchOptions::default_builder()
            .headless(true)
            .window_size(Some((config.viewport_width, config.viewport_height)))
            .path(config.chrome_path.clone())
            .sandbox(config.chrome_sandbox)
            .build()
            .map_err(Error::render)?;

        debug!(
            "Launching headless browser (sandbox: {})",
            config.chrome_sandbox
        );
        let browser = Browser::new(options).map_err(Error::render)?;

        Ok(Self {
            browser,
            timing: WaitTiming::default(),
        })
    }

    fn evaluate(&self, page: &ChromePage, expression: &str) -> Result<Option<serde_json::Value>> {
        let object = page
            .tab
            .evaluate(expression, false)
            .map_err(Error::render)?;
        Ok(object.value)
    }
}

impl HeadlessDom for ChromeDom {
    type Page = ChromePage;

    fn load(&self, html: &str) -> Result<ChromePage> {
        let mut source = tempfile::Builder::new()
            .prefix("commit-html-")
            .suffix(".html")
            .tempfile()?;
        source.write_all(html.as_bytes())?;
        source.flush()?;

        let url = Url::from_file_path(source.path()).map_err(|_| {
            Error::Render(format!(
                "Cannot build a file URL for {}",
                source.path().display()
            ))
        })?;

        let tab = self.browser.new_tab().map_err(Error::render)?;
        tab.navigate_to(url.as_str()).map_err(Error::render)?;

        Ok(ChromePage {
            tab,
            _source: source,
        })
    }

    fn wait_for_selector_non_empty(
        &self,
        page: &ChromePage,
        selector: &str,
        timeout: Duration,
    ) -> Result<bool> {
        let expression = non_empty_expression(selector);

        let probe_tab = Arc::clone(&page.tab);
        let probe = move || match probe_tab.evaluate(&expression, false) {
            Ok(object) => object
                .value
                .as_ref()
                .and_then(serde_json::Value::as_bool)
                .unwrap_or(false),
            Err(e) => {
                trace!("Render probe failed: {:#}", e);
                false
            }
        };

        let load_tab = Arc::clone(&page.tab);
        let wait_loaded = move || load_tab.wait_until_navigated().is_ok();

        Ok(race_render(wait_loaded, probe, timeout, self.timing))
    }

    fn strip_scripts(&self, page: &ChromePage) -> Result<()> {
        self.evaluate(page, STRIP_SCRIPTS)?;
        Ok(())
    }

    fn serialize(&self, page: &ChromePage) -> Result<String> {
        self.evaluate(page, SERIALIZE)?
            .and_then(|value| value.as_str().map(str::to_owned))
            .ok_or_else(|| Error::Render("Browser returned no document markup".to_string()))
    }
}

/// JS expression that is true once `selector` matches an element with
/// child elements
fn non_empty_expression(selector: &str) -> String {
    let quoted = serde_json::Value::from(selector).to_string();
    format!(
        "(function () {{ var el = document.querySelector({}); return !!el && el.children.length > 0; }})()",
        quoted
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_empty_expression_quotes_selector() {
        let expr = non_empty_expression("#diff");
        assert!(expr.contains(r##"document.querySelector("#diff")"##));

        let expr = non_empty_expression(r#"a[title="x"]"#);
        assert!(expr.contains(r#"document.querySelector("a[title=\"x\"]")"#));
    }
}

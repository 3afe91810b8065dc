use super::escape::{escape_closing_tag, escape_html, escape_js_string};
use crate::assets::AssetBundle;
use crate::git::CommitDiff;

/// Id of the element the viewer renders into
pub const DIFF_CONTAINER_ID: &str = "diff";

pub const EMPTY_MESSAGE_PLACEHOLDER: &str = "No commit message";

const PAGE_STYLES: &str = r#"
body { margin: 0; font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Helvetica, Arial, sans-serif; }
.commit-header { padding: 16px 24px; border-bottom: 1px solid #d0d7de; }
.commit-header h1 { margin: 0 0 8px; font-size: 18px; font-weight: 600; }
.commit-message { margin: 0; white-space: pre-wrap; word-break: break-word; font-size: 13px; }
.commit-message.empty { font-style: italic; opacity: 0.6; }
#diff { padding: 16px 24px; }
@media (prefers-color-scheme: dark) {
  body { background: #0d1117; color: #e6edf3; }
  .commit-header { border-bottom-color: #30363d; }
}
"#;

/// Viewer bootstrap. `__DIFF__` is replaced with the escaped diff text.
const BOOTSTRAP_TEMPLATE: &str = r#"
document.addEventListener('DOMContentLoaded', function () {
  var diffString = '__DIFF__';
  var targetElement = document.getElementById('__CONTAINER__');
  var configuration = {
    outputFormat: 'side-by-side',
    drawFileList: true,
    fileListToggle: true,
    fileListStartVisible: false,
    fileContentToggle: false,
    matching: 'lines',
    highlight: true,
    synchronisedScroll: true,
    stickyFileHeaders: true,
    colorScheme: 'auto'
  };
  var diff2htmlUi = new Diff2HtmlUI(targetElement, diffString, configuration);
  diff2htmlUi.draw();
  diff2htmlUi.highlightCode();
});
"#;

/// Build the interactive document for `commit`.
///
/// Static output starts from this same document; the static renderer runs
/// it and strips the scripts afterwards.
pub fn compose(commit: &CommitDiff, assets: &AssetBundle) -> String {
    let title = escape_html(&commit.commit);
    let message = message_block(&commit.message);

    let html = format!(
        r#"
<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Commit {title}</title>
{highlight_theme}
{viewer_styles}
{page_styles}
{viewer_script}
{bootstrap}
</head>
<body>
<header class="commit-header">
<h1>Commit <code>{title}</code></h1>
{message}
</header>
<main id="{container}"></main>
</body>
</html>
"#,
        highlight_theme = style_block(&assets.highlight_theme),
        viewer_styles = style_block(&assets.diff_viewer_styles),
        page_styles = style_block(PAGE_STYLES),
        viewer_script = script_block(&assets.diff_viewer_script),
        bootstrap = script_block(&bootstrap_script(&commit.diff)),
        container = DIFF_CONTAINER_ID,
    );

    html.trim().to_string()
}

fn message_block(message: &str) -> String {
    if message.trim().is_empty() {
        format!(
            r#"<pre class="commit-message empty">{}</pre>"#,
            EMPTY_MESSAGE_PLACEHOLDER
        )
    } else {
        format!(
            r#"<pre class="commit-message">{}</pre>"#,
            escape_html(message.trim_end())
        )
    }
}

fn bootstrap_script(diff: &str) -> String {
    BOOTSTRAP_TEMPLATE
        .replace("__CONTAINER__", DIFF_CONTAINER_ID)
        .replace("__DIFF__", &escape_js_string(diff))
}

fn style_block(css: &str) -> String {
    format!("<style>\n{}\n</style>", escape_closing_tag(css, "style"))
}

fn script_block(js: &str) -> String {
    format!("<script>\n{}\n</script>", escape_closing_tag(js, "script"))
}

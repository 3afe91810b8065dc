//! Context-specific escaping for text embedded into the document.

use std::borrow::Cow;

/// Escape text for HTML element content or a quoted attribute value
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Escape text for the inside of a single-quoted JS string literal.
///
/// Backslash, single quote, LF and CR are rewritten so the literal stays on
/// one line. `<` becomes `\x3C`, so no `<!--`, `<script` or `</script` can
/// reach the HTML tokenizer from inside the enclosing script element.
/// Backslash is handled as its own character, so escapes introduced here
/// are never escaped a second time.
pub fn escape_js_string(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + text.len() / 8);
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '<' => out.push_str("\\x3C"),
            _ => out.push(c),
        }
    }
    out
}

/// Neutralize every `</tag` (ASCII case-insensitive) so embedded text cannot
/// close the element it sits in. `</` becomes `<\/`, which is still `</`
/// inside JS strings and CSS.
pub fn escape_closing_tag<'a>(text: &'a str, tag: &str) -> Cow<'a, str> {
    let needle = format!("</{}", tag);
    let needle = needle.as_bytes();
    let bytes = text.as_bytes();

    let mut out: Option<String> = None;
    let mut copied = 0;
    let mut i = 0;
    while i + needle.len() <= bytes.len() {
        if bytes[i..i + needle.len()].eq_ignore_ascii_case(needle) {
            let buf = out.get_or_insert_with(|| String::with_capacity(text.len() + 8));
            // `i` sits on '<', an ASCII byte, so it is a char boundary.
            buf.push_str(&text[copied..i]);
            buf.push_str("<\\/");
            copied = i + 2;
            i += needle.len();
        } else {
            i += 1;
        }
    }

    match out {
        Some(mut buf) => {
            buf.push_str(&text[copied..]);
            Cow::Owned(buf)
        }
        None => Cow::Borrowed(text),
    }
}

//! Render an edit script as HTML.

use crate::Diff;

/// Render `diffs` as a pretty HTML fragment: insertions green, deletions
/// red, newlines shown as a pilcrow plus `<br>`.
pub fn diff_pretty_html(diffs: &[Diff]) -> String {
    let mut html = String::new();
    for diff in diffs {
        let text = diff
            .text()
            .replace('&', "&amp;")
            .replace('<', "&lt;")
            .replace('>', "&gt;")
            .replace('\n', "&para;<br>");
        match diff {
            Diff::Insert(_) => {
                html.push_str("<ins style=\"background:#e6ffe6;\">");
                html.push_str(&text);
                html.push_str("</ins>");
            }
            Diff::Delete(_) => {
                html.push_str("<del style=\"background:#ffe6e6;\">");
                html.push_str(&text);
                html.push_str("</del>");
            }
            Diff::Equal(_) => {
                html.push_str("<span>");
                html.push_str(&text);
                html.push_str("</span>");
            }
        }
    }
    html
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_and_wraps() {
        let diffs = vec![
            Diff::equal("a\n"),
            Diff::delete("<B>b</B>"),
            Diff::insert("c&d"),
        ];
        assert_eq!(
            diff_pretty_html(&diffs),
            "<span>a&para;<br></span>\
             <del style=\"background:#ffe6e6;\">&lt;B&gt;b&lt;/B&gt;</del>\
             <ins style=\"background:#e6ffe6;\">c&amp;d</ins>"
        );
    }
}

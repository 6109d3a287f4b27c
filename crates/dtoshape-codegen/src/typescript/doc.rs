//! Doc comment cleanup for emitted declarations.

/// Reduce a raw documentation comment to its descriptive lines.
///
/// Comment delimiters and leading `*` gutters are removed, and the text is
/// cut at the first block tag (`@param`, `@author`, ...). Returns no lines
/// when nothing descriptive remains.
pub fn clean_doc(raw: &str) -> Vec<String> {
    let body = raw.trim();
    let body = body.strip_prefix("/**").unwrap_or(body);
    let body = body.strip_suffix("*/").unwrap_or(body);

    let mut lines = Vec::new();
    for line in body.lines() {
        let line = line.trim();
        let line = line.strip_prefix('*').unwrap_or(line).trim();
        if line.starts_with('@') {
            break;
        }
        lines.push(line.replace("*/", "*\\/"));
    }

    while lines.first().is_some_and(|l| l.is_empty()) {
        lines.remove(0);
    }
    while lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }
    lines
}

/// Render a `/** */` block at the given indentation, or nothing.
pub fn render_doc(raw: Option<&str>, indent: &str, out: &mut String) {
    let Some(raw) = raw else {
        return;
    };
    let lines = clean_doc(raw);
    if lines.is_empty() {
        return;
    }

    out.push_str(indent);
    out.push_str("/**\n");
    for line in lines {
        out.push_str(indent);
        if line.is_empty() {
            out.push_str(" *\n");
        } else {
            out.push_str(" * ");
            out.push_str(&line);
            out.push('\n');
        }
    }
    out.push_str(indent);
    out.push_str(" */\n");
}

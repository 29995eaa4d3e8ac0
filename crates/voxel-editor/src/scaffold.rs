//! Textual removal of the injected editor style block.
//!
//! This works on the markup string, not the tree, so it also cleans documents
//! that were saved by older builds or edited by hand. The block is matched by
//! its exact `id`; its content can be anything up to the next `</style>`.

/// Remove every `<style>` element whose `id` equals `style_id`.
///
/// Matching is ASCII case-insensitive on tag and attribute names and accepts
/// double-quoted, single-quoted or unquoted values. An unterminated block is
/// left in place, so a missing marker never corrupts the output. Running the
/// strip on clean markup returns it unchanged.
#[must_use]
pub fn strip_editor_styles(markup: &str, style_id: &str) -> String {
    let mut out = markup.to_string();
    while let Some((start, end)) = find_style_block(&out, style_id) {
        out.replace_range(start..end, "");
    }
    out
}

/// Byte range of the first matching style block, if any.
fn find_style_block(markup: &str, style_id: &str) -> Option<(usize, usize)> {
    let lower = markup.to_ascii_lowercase();
    let mut from = 0;
    while let Some(offset) = lower[from..].find("<style") {
        let start = from + offset;
        let after_name = start + "<style".len();
        from = after_name;

        // `<styles>` or `<style-x>` are different elements.
        if !lower[after_name..]
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_whitespace() || c == '>' || c == '/')
        {
            continue;
        }
        let Some(tag_len) = lower[after_name..].find('>') else {
            return None;
        };
        let tag_end = after_name + tag_len;
        if id_attribute(&markup[after_name..tag_end]) != Some(style_id) {
            continue;
        }
        let close = lower[tag_end..].find("</style")?;
        let close_start = tag_end + close;
        let close_end = lower[close_start..]
            .find('>')
            .map_or(markup.len(), |i| close_start + i + 1);
        return Some((start, close_end));
    }
    None
}

/// Value of the `id` attribute inside a start tag's attribute text.
fn id_attribute(attrs: &str) -> Option<&str> {
    let mut rest = attrs;
    loop {
        rest = rest.trim_start_matches(|c: char| c.is_ascii_whitespace() || c == '/');
        if rest.is_empty() {
            return None;
        }
        let name_len = rest
            .find(|c: char| c.is_ascii_whitespace() || c == '=' || c == '/')
            .unwrap_or(rest.len());
        let name = &rest[..name_len];
        rest = rest[name_len..].trim_start();

        let value = if let Some(after_eq) = rest.strip_prefix('=') {
            let after_eq = after_eq.trim_start();
            let (value, remainder) = match after_eq.chars().next() {
                Some(quote @ ('"' | '\'')) => {
                    let body = &after_eq[1..];
                    let end = body.find(quote).unwrap_or(body.len());
                    (&body[..end], body.get(end + 1..).unwrap_or(""))
                }
                _ => {
                    let end = after_eq
                        .find(|c: char| c.is_ascii_whitespace())
                        .unwrap_or(after_eq.len());
                    (&after_eq[..end], &after_eq[end..])
                }
            };
            rest = remainder;
            value
        } else {
            ""
        };

        if name.eq_ignore_ascii_case("id") {
            return Some(value);
        }
    }
}

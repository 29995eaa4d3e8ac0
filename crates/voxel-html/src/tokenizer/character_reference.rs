//! Character reference decoding for the HTML tokenizer.
//!
//! [§ 13.2.5.72 Character reference state](https://html.spec.whatwg.org/multipage/parsing.html#character-reference-state)
//!
//! The full spec defines 2,231 named entities; we carry the ones authored
//! pages actually use. An unknown reference is left in the text verbatim,
//! which is also what browsers do.

/// Named references, without the leading `&`.
///
/// Entries without a trailing semicolon are the legacy forms browsers accept.
const NAMED_ENTITIES: &[(&str, &str)] = &[
    ("amp;", "&"),
    ("amp", "&"),
    ("lt;", "<"),
    ("lt", "<"),
    ("gt;", ">"),
    ("gt", ">"),
    ("quot;", "\""),
    ("quot", "\""),
    ("apos;", "'"),
    ("nbsp;", "\u{00A0}"),
    ("nbsp", "\u{00A0}"),
    ("copy;", "\u{00A9}"),
    ("copy", "\u{00A9}"),
    ("reg;", "\u{00AE}"),
    ("trade;", "\u{2122}"),
    ("mdash;", "\u{2014}"),
    ("ndash;", "\u{2013}"),
    ("hellip;", "\u{2026}"),
    ("bull;", "\u{2022}"),
    ("middot;", "\u{00B7}"),
    ("lsquo;", "\u{2018}"),
    ("rsquo;", "\u{2019}"),
    ("ldquo;", "\u{201C}"),
    ("rdquo;", "\u{201D}"),
    ("laquo;", "\u{00AB}"),
    ("raquo;", "\u{00BB}"),
    ("cent;", "\u{00A2}"),
    ("pound;", "\u{00A3}"),
    ("euro;", "\u{20AC}"),
    ("yen;", "\u{00A5}"),
    ("times;", "\u{00D7}"),
    ("divide;", "\u{00F7}"),
    ("plusmn;", "\u{00B1}"),
    ("deg;", "\u{00B0}"),
    ("larr;", "\u{2190}"),
    ("rarr;", "\u{2192}"),
    ("uarr;", "\u{2191}"),
    ("darr;", "\u{2193}"),
    ("check;", "\u{2713}"),
    ("star;", "\u{2606}"),
    ("hearts;", "\u{2665}"),
    ("eacute;", "\u{00E9}"),
    ("egrave;", "\u{00E8}"),
    ("agrave;", "\u{00E0}"),
    ("ccedil;", "\u{00E7}"),
    ("ntilde;", "\u{00F1}"),
    ("ouml;", "\u{00F6}"),
    ("uuml;", "\u{00FC}"),
    ("auml;", "\u{00E4}"),
    ("szlig;", "\u{00DF}"),
    ("zwj;", "\u{200D}"),
    ("zwnj;", "\u{200C}"),
    ("ensp;", "\u{2002}"),
    ("emsp;", "\u{2003}"),
    ("thinsp;", "\u{2009}"),
];

/// Look up a named character reference by its exact name (no leading `&`).
#[must_use]
pub fn lookup_entity(name: &str) -> Option<&'static str> {
    NAMED_ENTITIES
        .iter()
        .find(|(entity, _)| *entity == name)
        .map(|(_, value)| *value)
}

/// [§ 13.2.5.72 Character reference state](https://html.spec.whatwg.org/multipage/parsing.html#character-reference-state)
///
/// Try to decode a character reference at the start of `input`, which is the
/// text immediately after a `&`. Returns the decoded text and the number of
/// bytes consumed, or `None` if `input` does not begin a recognised reference.
///
/// `in_attribute` applies the historical rule from
/// [§ 13.2.5.73](https://html.spec.whatwg.org/multipage/parsing.html#named-character-reference-state):
/// "If the character reference was consumed as part of an attribute, and the
/// last character matched is not a U+003B SEMICOLON character (;), and the
/// next input character is either a U+003D EQUALS SIGN character (=) or an
/// ASCII alphanumeric, then ... flush code points consumed as a character
/// reference" (i.e. leave it undecoded).
#[must_use]
pub fn decode_at(input: &str, in_attribute: bool) -> Option<(String, usize)> {
    if let Some(rest) = input.strip_prefix('#') {
        return decode_numeric(rest).map(|(text, used)| (text, used + 1));
    }

    // "Consume the maximum number of characters possible, where the consumed
    // characters are one of the identifiers in the named character references table."
    let (name, value) = NAMED_ENTITIES
        .iter()
        .filter(|(entity, _)| input.starts_with(entity))
        .max_by_key(|(entity, _)| entity.len())?;

    if in_attribute && !name.ends_with(';') {
        let next = input[name.len()..].chars().next();
        if next.is_some_and(|c| c == '=' || c.is_ascii_alphanumeric()) {
            return None;
        }
    }

    Some(((*value).to_string(), name.len()))
}

/// [§ 13.2.5.75 Numeric character reference state](https://html.spec.whatwg.org/multipage/parsing.html#numeric-character-reference-state)
///
/// `input` is the text after `&#`.
fn decode_numeric(input: &str) -> Option<(String, usize)> {
    let (digits_start, radix) = match input.chars().next() {
        Some('x' | 'X') => (1, 16),
        _ => (0, 10),
    };
    let digits: String = input[digits_start..]
        .chars()
        .take_while(|c| c.is_digit(radix))
        .collect();
    if digits.is_empty() {
        // "absence-of-digits-in-numeric-character-reference parse error"
        return None;
    }

    let mut used = digits_start + digits.len();
    if input[used..].starts_with(';') {
        used += 1;
    }

    // [§ 13.2.5.80 Numeric character reference end state](https://html.spec.whatwg.org/multipage/parsing.html#numeric-character-reference-end-state)
    // "If the number is 0x00 ... or greater than 0x10FFFF ... or a surrogate,
    // set the character reference code to 0xFFFD."
    let code = u32::from_str_radix(&digits, radix).unwrap_or(0x0011_0000);
    let c = match code {
        0 => '\u{FFFD}',
        _ => char::from_u32(code).unwrap_or('\u{FFFD}'),
    };
    Some((c.to_string(), used))
}

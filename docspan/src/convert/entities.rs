//! HTML character reference decoding for info strings.

use std::borrow::Cow;

/// Decode named and numeric character references.
///
/// Named references use the full HTML5 table and, as in CommonMark, need their
/// closing `;`. Unknown or malformed references are left untouched.
pub fn decode_entities(input: &str) -> Cow<'_, str> {
    if !input.contains('&') {
        return Cow::Borrowed(input);
    }

    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];
        match tail.find(';').and_then(|semi| Some((decode_one(&tail[..=semi])?, semi))) {
            Some((decoded, semi)) => {
                out.push_str(&decoded);
                rest = &tail[semi + 1..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    Cow::Owned(out)
}

/// Decode one `&...;` reference.
fn decode_one(reference: &str) -> Option<Cow<'_, str>> {
    let body = &reference[1..reference.len() - 1];
    if let Some(numeric) = body.strip_prefix('#') {
        let code = match numeric.strip_prefix(&['x', 'X'][..]) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => numeric.parse::<u32>().ok()?,
        };
        let ch = match char::from_u32(code) {
            Some('\0') | None => '\u{fffd}',
            Some(ch) => ch,
        };
        return Some(Cow::Owned(ch.to_string()));
    }
    if body.is_empty() || !body.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }
    // A decoded reference never keeps its `;` unless it is `&semi;`; anything
    // else is a legacy prefix match such as `&amp` in `&ampx;`.
    match html_escape::decode_html_entities(reference) {
        Cow::Owned(decoded) if !decoded.ends_with(';') || body == "semi" => {
            Some(Cow::Owned(decoded))
        }
        _ => None,
    }
}

//! String literal contents: escape processing and interpolation holes.
//!
//! Literals reach this module without their quotes. Plain literals are
//! cooked once by the lexer; literals with `$` holes stay raw in the token
//! and the parser splits them with [`split_template`], cooking each text
//! piece on the way.

use crate::LexErrorKind;

/// Resolve backslash escapes.
///
/// Supported: `\n \t \r \0 \" \' \\ \$`. On failure returns the offending
/// escape character and its byte offset in `raw`.
pub fn cook_escapes(raw: &str) -> Result<String, (LexErrorKind, usize)> {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.char_indices();

    while let Some((i, c)) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some((_, 'n')) => out.push('\n'),
            Some((_, 't')) => out.push('\t'),
            Some((_, 'r')) => out.push('\r'),
            Some((_, '0')) => out.push('\0'),
            Some((_, '"')) => out.push('"'),
            Some((_, '\'')) => out.push('\''),
            Some((_, '\\')) => out.push('\\'),
            Some((_, '$')) => out.push('$'),
            Some((_, other)) => return Err((LexErrorKind::InvalidEscape(other), i)),
            None => return Err((LexErrorKind::InvalidEscape('\\'), i)),
        }
    }

    Ok(out)
}

/// Whether `raw` contains an unescaped `$name` or `${` hole.
pub fn has_interpolation(raw: &str) -> bool {
    let bytes = raw.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'$' => {
                if let Some(&next) = bytes.get(i + 1) {
                    if next == b'{' || is_ident_start(next) {
                        return true;
                    }
                }
                i += 1;
            }
            _ => i += 1,
        }
    }
    false
}

/// Piece of a split template literal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TemplatePiece {
    /// Cooked literal text.
    Text(String),
    /// `$name` or `${a.b}`: the dotted path segments, the raw spelling, and
    /// the byte offset of the `$` within the literal body.
    Hole {
        path: Vec<String>,
        raw: String,
        offset: usize,
    },
}

/// Split a raw template body into text and holes.
///
/// `$` not followed by an identifier or `{` is literal text.
pub fn split_template(raw: &str) -> Result<Vec<TemplatePiece>, (LexErrorKind, usize)> {
    let bytes = raw.as_bytes();
    let mut pieces = Vec::new();
    let mut text_start = 0;
    let mut i = 0;

    let flush = |pieces: &mut Vec<TemplatePiece>, from: usize, to: usize| {
        if from < to {
            let cooked = cook_escapes(&raw[from..to]).map_err(|(kind, at)| (kind, from + at))?;
            pieces.push(TemplatePiece::Text(cooked));
        }
        Ok::<(), (LexErrorKind, usize)>(())
    };

    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'$' if bytes.get(i + 1) == Some(&b'{') => {
                let body_start = i + 2;
                let Some(close) = raw[body_start..].find('}') else {
                    return Err((
                        LexErrorKind::BadInterpolation("missing `}`".to_owned()),
                        i,
                    ));
                };
                let body = &raw[body_start..body_start + close];
                let path = parse_path(body).ok_or_else(|| {
                    (
                        LexErrorKind::BadInterpolation(format!("`{body}` is not a name")),
                        i,
                    )
                })?;
                flush(&mut pieces, text_start, i)?;
                let end = body_start + close + 1;
                pieces.push(TemplatePiece::Hole {
                    path,
                    raw: raw[i..end].to_owned(),
                    offset: i,
                });
                i = end;
                text_start = end;
            }
            b'$' if bytes.get(i + 1).is_some_and(|&b| is_ident_start(b)) => {
                let name_start = i + 1;
                let name_end = raw[name_start..]
                    .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
                    .map_or(raw.len(), |len| name_start + len);
                flush(&mut pieces, text_start, i)?;
                pieces.push(TemplatePiece::Hole {
                    path: vec![raw[name_start..name_end].to_owned()],
                    raw: raw[i..name_end].to_owned(),
                    offset: i,
                });
                i = name_end;
                text_start = name_end;
            }
            _ => i += 1,
        }
    }
    flush(&mut pieces, text_start, raw.len())?;

    Ok(pieces)
}

fn is_ident_start(byte: u8) -> bool {
    byte.is_ascii_alphabetic() || byte == b'_'
}

/// `a.b.c` to `["a", "b", "c"]`; `None` unless every segment is an identifier.
fn parse_path(body: &str) -> Option<Vec<String>> {
    let segments: Vec<String> = body.split('.').map(|s| s.trim().to_owned()).collect();
    let valid = segments.iter().all(|s| {
        s.as_bytes().first().is_some_and(|&b| is_ident_start(b))
            && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
    });
    valid.then_some(segments)
}

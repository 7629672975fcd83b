use pretty_assertions::assert_eq;
use vlang_ir::{StringInterner, TokenKind};

use super::*;

fn kinds(source: &str, interner: &StringInterner) -> Vec<TokenKind> {
    lex(source, interner).tokens.iter().map(|t| t.kind).collect()
}

#[test]
fn declaration() {
    let interner = StringInterner::new();
    let x = interner.intern("x");
    let int = interner.intern("int");
    assert_eq!(
        kinds("mut x int = 5", &interner),
        vec![
            TokenKind::Mut,
            TokenKind::Ident(x),
            TokenKind::Ident(int),
            TokenKind::Eq,
            TokenKind::Int(5),
            TokenKind::Eof,
        ]
    );
}

#[test]
fn compound_operators_win_over_prefixes() {
    let interner = StringInterner::new();
    assert_eq!(
        kinds("++ -- += -= == != <= >= && ||", &interner),
        vec![
            TokenKind::PlusPlus,
            TokenKind::MinusMinus,
            TokenKind::PlusEq,
            TokenKind::MinusEq,
            TokenKind::EqEq,
            TokenKind::NotEq,
            TokenKind::LtEq,
            TokenKind::GtEq,
            TokenKind::AmpAmp,
            TokenKind::PipePipe,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn floats_keep_their_bits() {
    let interner = StringInterner::new();
    assert_eq!(
        kinds("3.25 7", &interner),
        vec![
            TokenKind::Float(3.25f64.to_bits()),
            TokenKind::Int(7),
            TokenKind::Eof
        ]
    );
}

#[test]
fn comments_are_skipped() {
    let interner = StringInterner::new();
    let source = "a // line\n/* block\n spanning */ b";
    let a = interner.intern("a");
    let b = interner.intern("b");
    assert_eq!(
        kinds(source, &interner),
        vec![TokenKind::Ident(a), TokenKind::Ident(b), TokenKind::Eof]
    );
}

#[test]
fn block_comment_with_stars_ends_at_first_close() {
    let interner = StringInterner::new();
    let source = "/** a * b **/ x /* y */ / z";
    let x = interner.intern("x");
    let z = interner.intern("z");
    assert_eq!(
        kinds(source, &interner),
        vec![
            TokenKind::Ident(x),
            TokenKind::Slash,
            TokenKind::Ident(z),
            TokenKind::Eof
        ]
    );
}

#[test]
fn string_escapes_are_cooked() {
    let interner = StringInterner::new();
    let output = lex(r#""a\tb\n""#, &interner);
    let TokenKind::String(name) = output.tokens[0].kind else {
        panic!("expected string, got {:?}", output.tokens[0].kind);
    };
    assert_eq!(interner.lookup(name), "a\tb\n");
    assert!(!output.has_errors());
}

#[test]
fn interpolated_string_stays_raw() {
    let interner = StringInterner::new();
    let output = lex(r#""x = $x, p = ${p.y}""#, &interner);
    let TokenKind::Template(name) = output.tokens[0].kind else {
        panic!("expected template, got {:?}", output.tokens[0].kind);
    };
    assert_eq!(interner.lookup(name), "x = $x, p = ${p.y}");
}

#[test]
fn escaped_dollar_is_not_a_hole() {
    let interner = StringInterner::new();
    let output = lex(r#""cost: \$5""#, &interner);
    let TokenKind::String(name) = output.tokens[0].kind else {
        panic!("expected plain string");
    };
    assert_eq!(interner.lookup(name), "cost: $5");
}

#[test]
fn invalid_escape_is_reported() {
    let interner = StringInterner::new();
    let output = lex(r#"s := "a\qb""#, &interner);
    assert_eq!(output.errors.len(), 1);
    assert_eq!(output.errors[0].kind, LexErrorKind::InvalidEscape('q'));
    assert_eq!(output.errors[0].span.start, 7);
}

#[test]
fn unterminated_string_swallows_line() {
    let interner = StringInterner::new();
    let output = lex("\"abc def\nx", &interner);
    assert_eq!(output.errors[0].kind, LexErrorKind::UnterminatedString);
    let x = interner.intern("x");
    let kinds: Vec<TokenKind> = output.tokens.iter().map(|t| t.kind).collect();
    assert_eq!(
        kinds,
        vec![TokenKind::Error, TokenKind::Ident(x), TokenKind::Eof]
    );
}

#[test]
fn unterminated_comment_stops_lexing() {
    let interner = StringInterner::new();
    let output = lex("a /* never closed", &interner);
    assert_eq!(output.errors[0].kind, LexErrorKind::UnterminatedComment);
    assert_eq!(output.tokens.len(), 2);
}

#[test]
fn integer_overflow() {
    let interner = StringInterner::new();
    let output = lex("99999999999999999999", &interner);
    assert!(matches!(
        output.errors[0].kind,
        LexErrorKind::IntegerOverflow(_)
    ));
}

#[test]
fn unexpected_character() {
    let interner = StringInterner::new();
    let output = lex("a @ b", &interner);
    assert_eq!(output.errors[0].kind, LexErrorKind::UnexpectedChar('@'));
    assert_eq!(output.tokens.len(), 4);
}

#[test]
fn split_template_pieces() {
    let pieces = split_template("x=$x!${p.y}").unwrap_or_default();
    assert_eq!(
        pieces,
        vec![
            TemplatePiece::Text("x=".into()),
            TemplatePiece::Hole {
                path: vec!["x".into()],
                raw: "$x".into(),
                offset: 2,
            },
            TemplatePiece::Text("!".into()),
            TemplatePiece::Hole {
                path: vec!["p".into(), "y".into()],
                raw: "${p.y}".into(),
                offset: 5,
            },
        ]
    );
}

#[test]
fn lone_dollar_is_text() {
    assert!(!has_interpolation("5 $ each"));
    assert!(has_interpolation("$a"));
    assert!(!has_interpolation(r"\$a"));
}

#[test]
fn bad_interpolation() {
    assert!(matches!(
        split_template("${a b}"),
        Err((LexErrorKind::BadInterpolation(_), 0))
    ));
    assert!(matches!(
        split_template("${a"),
        Err((LexErrorKind::BadInterpolation(_), 0))
    ));
}

//! Interpolated string literals.

use vlang_ir::{ExprId, ExprKind, Name, Span, TemplatePart};
use vlang_lexer::TemplatePiece;

use crate::{ErrorContext, ParseError, Parser};

impl Parser<'_> {
    /// Split the raw literal into text and holes. Each hole becomes an
    /// identifier or field chain spanning its `$...` spelling.
    pub(crate) fn parse_template(&mut self, raw: Name, span: Span) -> Result<ExprId, ParseError> {
        let body = self.interner().lookup(raw);
        let pieces = vlang_lexer::split_template(body).map_err(|(kind, _)| {
            ParseError::new(kind.to_string(), span).with_context(ErrorContext::StringInterpolation)
        })?;

        let mut parts = Vec::with_capacity(pieces.len());
        for piece in pieces {
            match piece {
                TemplatePiece::Text(text) => {
                    parts.push(TemplatePart::Text(self.interner().intern(&text)));
                }
                TemplatePiece::Hole { path, raw, offset } => {
                    // +1 skips the opening quote.
                    let start = span.start + 1 + u32::try_from(offset).unwrap_or(0);
                    let end = start + u32::try_from(raw.len()).unwrap_or(0);
                    let hole_span = Span::new(start, end);
                    let expr = self.alloc_path(&path, hole_span);
                    parts.push(TemplatePart::Hole {
                        expr,
                        raw: self.interner().intern(&raw),
                    });
                }
            }
        }

        let parts = self.arena.alloc_template_parts(parts);
        Ok(self.alloc_expr(ExprKind::Template(parts), span))
    }

    /// `a.b.c` as `Field(Field(Ident(a), b), c)`.
    fn alloc_path(&mut self, path: &[String], span: Span) -> ExprId {
        let interner = self.interner();
        let mut segments = path.iter().map(|segment| interner.intern(segment));
        let root = segments.next().unwrap_or(Name::EMPTY);
        let mut expr = self.alloc_expr(ExprKind::Ident(root), span);
        for field in segments {
            expr = self.alloc_expr(
                ExprKind::Field {
                    receiver: expr,
                    field,
                },
                span,
            );
        }
        expr
    }
}

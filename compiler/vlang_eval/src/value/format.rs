//! Text rendering of values.
//!
//! Two styles: the `print` style (`[ 1 2 3 ]`, floats at a fixed
//! precision) and the interpolation style used inside string templates
//! (`[1, 2, 3]`, shortest float form).

use std::fmt::Write;

use vlang_ir::StringInterner;

use super::{Value, VectorValue};

#[derive(Copy, Clone, Eq, PartialEq)]
enum Style {
    Print { precision: usize },
    Interpolate,
}

/// Render `value` the way `print` shows it.
pub fn display(value: &Value, interner: &StringInterner, precision: usize) -> String {
    let mut out = String::new();
    write_value(&mut out, value, interner, Style::Print { precision });
    out
}

/// Render `value` for a `$name` hole.
pub fn interpolate(value: &Value, interner: &StringInterner) -> String {
    let mut out = String::new();
    write_value(&mut out, value, interner, Style::Interpolate);
    out
}

fn write_float(out: &mut String, f: f64, style: Style) {
    let _ = match style {
        Style::Print { precision } => write!(out, "{f:.precision$}"),
        Style::Interpolate => write!(out, "{f}"),
    };
}

fn write_items(out: &mut String, vector: &VectorValue, interner: &StringInterner, style: Style) {
    match style {
        Style::Print { .. } => {
            out.push('[');
            for item in &vector.items {
                out.push(' ');
                write_value(out, item, interner, style);
            }
            out.push_str(" ]");
        }
        Style::Interpolate => {
            out.push('[');
            for (i, item) in vector.items.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_value(out, item, interner, style);
            }
            out.push(']');
        }
    }
}

/// Field values inside a struct: strings and runes quoted.
fn write_field(out: &mut String, value: &Value, interner: &StringInterner, style: Style) {
    match value {
        Value::Str(s) => {
            let _ = write!(out, "{:?}", &**s);
        }
        Value::Rune(c) => {
            let _ = write!(out, "{c:?}");
        }
        _ => write_value(out, value, interner, style),
    }
}

fn write_value(out: &mut String, value: &Value, interner: &StringInterner, style: Style) {
    match value {
        Value::Int(i) => {
            let _ = write!(out, "{i}");
        }
        Value::Float(f) => write_float(out, *f, style),
        Value::Str(s) => out.push_str(s),
        Value::Rune(c) => out.push(*c),
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Nil => out.push_str("nil"),
        Value::Vector(v) => write_items(out, v, interner, style),
        Value::Matrix(m) => match style {
            Style::Print { .. } => {
                out.push('[');
                for row in &m.rows {
                    out.push(' ');
                    write_items(out, row, interner, style);
                }
                out.push_str(" ]");
            }
            Style::Interpolate => {
                out.push('[');
                for (i, row) in m.rows.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    write_items(out, row, interner, style);
                }
                out.push(']');
            }
        },
        Value::Struct(s) => {
            out.push_str(interner.lookup(s.name));
            out.push('{');
            for (i, field) in s.fields.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                out.push_str(interner.lookup(field.name));
                out.push_str(": ");
                write_field(out, &field.value, interner, style);
            }
            out.push('}');
        }
        Value::Pointer(_) => out.push_str("pointer"),
        Value::Function { name, .. } => {
            let _ = write!(out, "fn {}", interner.lookup(*name));
        }
        Value::Builtin(builtin) => {
            let _ = write!(out, "builtin {}", builtin.name());
        }
        Value::BoundMethod(bound) => {
            let _ = write!(
                out,
                "fn {}.{}",
                interner.lookup(bound.receiver.name),
                interner.lookup(bound.name)
            );
        }
    }
}

//! Native functions available to every program.
//!
//! The [`BuiltinRegistry`] maps names to [`Builtin`]s; each builtin knows
//! its arity and its native implementation. Implementations check their
//! own argument types and report problems as plain messages, which the
//! evaluator records as semantic errors.

use rustc_hash::FxHashMap;
use vlang_diagnostic::Console;
use vlang_ir::{Name, StringInterner};

use crate::value::{conform, display, parse_int, Value, ValueType, VectorValue};

/// Everything a native implementation may touch.
pub struct BuiltinContext<'a> {
    pub console: &'a Console,
    pub interner: &'a StringInterner,
    pub float_precision: usize,
    /// Line of the call, attached to console output.
    pub line: u32,
}

/// Native implementation signature.
pub type BuiltinFn = fn(&BuiltinContext<'_>, &[Value]) -> Result<Value, String>;

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Builtin {
    Print,
    Println,
    Len,
    Append,
    Join,
    IndexOf,
    Atoi,
    ParseFloat,
    TypeOf,
}

impl Builtin {
    pub const ALL: [Builtin; 9] = [
        Builtin::Print,
        Builtin::Println,
        Builtin::Len,
        Builtin::Append,
        Builtin::Join,
        Builtin::IndexOf,
        Builtin::Atoi,
        Builtin::ParseFloat,
        Builtin::TypeOf,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Builtin::Print => "print",
            Builtin::Println => "println",
            Builtin::Len => "len",
            Builtin::Append => "append",
            Builtin::Join => "join",
            Builtin::IndexOf => "indexOf",
            Builtin::Atoi => "atoi",
            Builtin::ParseFloat => "parseFloat",
            Builtin::TypeOf => "TypeOf",
        }
    }

    /// Exact argument count; `None` for variadic builtins.
    pub const fn arity(self) -> Option<usize> {
        match self {
            Builtin::Print | Builtin::Println => None,
            Builtin::Len | Builtin::Atoi | Builtin::ParseFloat | Builtin::TypeOf => Some(1),
            Builtin::Append | Builtin::Join | Builtin::IndexOf => Some(2),
        }
    }

    pub fn implementation(self) -> BuiltinFn {
        match self {
            Builtin::Print => print,
            Builtin::Println => println,
            Builtin::Len => len,
            Builtin::Append => append,
            Builtin::Join => join,
            Builtin::IndexOf => index_of,
            Builtin::Atoi => atoi,
            Builtin::ParseFloat => parse_float,
            Builtin::TypeOf => type_of,
        }
    }

    #[inline]
    pub fn call(self, ctx: &BuiltinContext<'_>, args: &[Value]) -> Result<Value, String> {
        (self.implementation())(ctx, args)
    }
}

/// Name to builtin lookup, built once per interpreter.
pub struct BuiltinRegistry {
    by_name: FxHashMap<Name, Builtin>,
}

impl BuiltinRegistry {
    pub fn new(interner: &StringInterner) -> Self {
        let by_name = Builtin::ALL
            .iter()
            .map(|&builtin| (interner.intern(builtin.name()), builtin))
            .collect();
        BuiltinRegistry { by_name }
    }

    #[inline]
    pub fn get(&self, name: Name) -> Option<Builtin> {
        self.by_name.get(&name).copied()
    }

    #[inline]
    pub fn contains(&self, name: Name) -> bool {
        self.by_name.contains_key(&name)
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

fn type_name(ctx: &BuiltinContext<'_>, value: &Value) -> String {
    value.type_name(ctx.interner)
}

fn render_args(ctx: &BuiltinContext<'_>, args: &[Value]) -> String {
    args.iter()
        .map(|arg| display(arg, ctx.interner, ctx.float_precision))
        .collect::<Vec<_>>()
        .join(" ")
}

fn print(ctx: &BuiltinContext<'_>, args: &[Value]) -> Result<Value, String> {
    ctx.console.print_at(&render_args(ctx, args), ctx.line);
    Ok(Value::Nil)
}

fn println(ctx: &BuiltinContext<'_>, args: &[Value]) -> Result<Value, String> {
    let mut text = render_args(ctx, args);
    text.push('\n');
    ctx.console.print_at(&text, ctx.line);
    Ok(Value::Nil)
}

fn one(args: &[Value]) -> Result<&Value, String> {
    match args {
        [value] => Ok(value),
        _ => Err(format!("expected 1 argument, found {}", args.len())),
    }
}

fn two(args: &[Value]) -> Result<(&Value, &Value), String> {
    match args {
        [first, second] => Ok((first, second)),
        _ => Err(format!("expected 2 arguments, found {}", args.len())),
    }
}

fn to_int(len: usize) -> Value {
    Value::Int(i64::try_from(len).unwrap_or(i64::MAX))
}

fn len(ctx: &BuiltinContext<'_>, args: &[Value]) -> Result<Value, String> {
    match one(args)? {
        Value::Vector(v) => Ok(to_int(v.len())),
        Value::Matrix(m) => Ok(to_int(m.len())),
        Value::Str(s) => Ok(to_int(s.chars().count())),
        other => Err(format!(
            "expected a vector, matrix or string, found {}",
            type_name(ctx, other)
        )),
    }
}

fn append(ctx: &BuiltinContext<'_>, args: &[Value]) -> Result<Value, String> {
    let (target, value) = two(args)?;
    let mismatch = || {
        format!(
            "cannot append {} to {}",
            type_name(ctx, value),
            type_name(ctx, target)
        )
    };
    match target {
        Value::Vector(vector) => {
            let item = match vector.item {
                Some(item) => item,
                None => value.value_type().as_base().ok_or_else(|| {
                    format!("cannot infer item type from {}", type_name(ctx, value))
                })?,
            };
            let item_ty = ValueType::from_base(item);
            let value = conform(value.clone(), item_ty, item_ty.allows_nil())
                .map_err(|_| mismatch())?;
            Ok(Value::Vector(vector.appended(item, value)))
        }
        Value::Matrix(matrix) => {
            let row = conform(value.clone(), ValueType::Vector(Some(matrix.item)), false)
                .map_err(|_| mismatch())?;
            match row {
                Value::Vector(row) => Ok(Value::Matrix(matrix.appended(row))),
                _ => Err(mismatch()),
            }
        }
        _ => Err(format!(
            "expected a vector or matrix, found {}",
            type_name(ctx, target)
        )),
    }
}

fn text_of(value: &Value) -> Option<String> {
    match value {
        Value::Str(s) => Some(s.to_string()),
        Value::Rune(c) => Some(c.to_string()),
        _ => None,
    }
}

fn join(ctx: &BuiltinContext<'_>, args: &[Value]) -> Result<Value, String> {
    let (target, separator) = two(args)?;
    let separator = text_of(separator).ok_or_else(|| {
        format!(
            "separator must be a string or rune, found {}",
            type_name(ctx, separator)
        )
    })?;
    let Value::Vector(VectorValue { items, .. }) = target else {
        return Err(format!(
            "expected []string or []rune, found {}",
            type_name(ctx, target)
        ));
    };
    let parts = items
        .iter()
        .map(text_of)
        .collect::<Option<Vec<_>>>()
        .ok_or_else(|| {
            format!(
                "expected []string or []rune, found {}",
                type_name(ctx, target)
            )
        })?;
    Ok(Value::Str(parts.join(&separator).into()))
}

fn index_of(ctx: &BuiltinContext<'_>, args: &[Value]) -> Result<Value, String> {
    match two(args)? {
        (Value::Vector(v), needle) => Ok(v
            .items
            .iter()
            .position(|item| item.loosely_equals(needle))
            .map_or(Value::Int(-1), to_int)),
        (Value::Str(haystack), needle) => {
            let needle = text_of(needle)
                .ok_or_else(|| format!("cannot search a string for {}", type_name(ctx, needle)))?;
            Ok(haystack.find(&needle).map_or(Value::Int(-1), |byte| {
                to_int(haystack[..byte].chars().count())
            }))
        }
        (other, _) => Err(format!(
            "expected a vector or string, found {}",
            type_name(ctx, other)
        )),
    }
}

#[allow(
    clippy::cast_possible_truncation,
    reason = "float to int conversion truncates by definition"
)]
fn atoi(ctx: &BuiltinContext<'_>, args: &[Value]) -> Result<Value, String> {
    match one(args)? {
        Value::Int(i) => Ok(Value::Int(*i)),
        Value::Float(f) if f.is_finite() => Ok(Value::Int(f.trunc() as i64)),
        Value::Str(s) => parse_int(s)
            .map(Value::Int)
            .ok_or_else(|| format!("cannot convert {:?} to int", &**s)),
        other => Err(format!("cannot convert {} to int", type_name(ctx, other))),
    }
}

#[allow(
    clippy::cast_precision_loss,
    reason = "int to float conversion widens by definition"
)]
fn parse_float(ctx: &BuiltinContext<'_>, args: &[Value]) -> Result<Value, String> {
    match one(args)? {
        Value::Float(f) => Ok(Value::Float(*f)),
        Value::Int(i) => Ok(Value::Float(*i as f64)),
        Value::Str(s) => s
            .trim()
            .parse::<f64>()
            .map(Value::Float)
            .map_err(|_| format!("cannot convert {:?} to float", &**s)),
        other => Err(format!("cannot convert {} to float", type_name(ctx, other))),
    }
}

fn type_of(ctx: &BuiltinContext<'_>, args: &[Value]) -> Result<Value, String> {
    Ok(Value::string(&type_name(ctx, one(args)?)))
}

#[cfg(test)]
mod tests;

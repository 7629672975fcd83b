//! Report of every declaration made during a run.
//!
//! Entries outlive the scopes they were declared in, so the report shows
//! locals of functions that have already returned. A declaration executed
//! repeatedly (a local inside a loop body) is listed once.

use std::fmt;

use rustc_hash::FxHashSet;

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum SymbolKind {
    Variable,
    Constant,
    Function,
    Struct,
    Parameter,
}

impl SymbolKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            SymbolKind::Variable => "variable",
            SymbolKind::Constant => "constant",
            SymbolKind::Function => "function",
            SymbolKind::Struct => "struct",
            SymbolKind::Parameter => "parameter",
        }
    }
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Symbol {
    pub name: String,
    pub kind: SymbolKind,
    /// Declared or inferred type, as shown by `TypeOf`.
    pub ty: String,
    /// Scope names joined with `/`, global first.
    pub scope: String,
    pub line: u32,
    pub column: u32,
}

#[derive(Clone, Default, Debug)]
pub struct SymbolTable {
    symbols: Vec<Symbol>,
    seen: FxHashSet<Symbol>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `symbol` unless an identical entry exists.
    pub fn record(&mut self, symbol: Symbol) {
        if self.seen.insert(symbol.clone()) {
            self.symbols.push(symbol);
        }
    }

    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn find<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Symbol> + 'a {
        self.symbols.iter().filter(move |s| s.name == name)
    }

    /// Fixed-width listing, one symbol per line.
    pub fn render(&self) -> String {
        use std::fmt::Write;

        let mut out = String::new();
        let _ = writeln!(
            out,
            "{:<16} {:<10} {:<12} {:>5} {:>6}  SCOPE",
            "NAME", "KIND", "TYPE", "LINE", "COLUMN"
        );
        for symbol in &self.symbols {
            let _ = writeln!(
                out,
                "{:<16} {:<10} {:<12} {:>5} {:>6}  {}",
                symbol.name,
                symbol.kind.as_str(),
                symbol.ty,
                symbol.line,
                symbol.column,
                symbol.scope
            );
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn symbol(name: &str, line: u32) -> Symbol {
        Symbol {
            name: name.to_owned(),
            kind: SymbolKind::Variable,
            ty: "int".to_owned(),
            scope: "global/main".to_owned(),
            line,
            column: 5,
        }
    }

    #[test]
    fn duplicates_are_recorded_once() {
        let mut table = SymbolTable::new();
        table.record(symbol("i", 3));
        table.record(symbol("i", 3));
        table.record(symbol("i", 9));
        assert_eq!(table.len(), 2);
        assert_eq!(table.find("i").count(), 2);
    }

    #[test]
    fn render_has_header_and_rows() {
        let mut table = SymbolTable::new();
        table.record(symbol("count", 1));
        let rendered = table.render();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("NAME"));
        assert!(lines[1].starts_with("count"));
        assert!(lines[1].ends_with("global/main"));
    }
}

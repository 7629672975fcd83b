//! Scope chain.
//!
//! Scopes live in one arena and refer to each other by [`ScopeId`]; the
//! parent link is a handle, so there are no ownership cycles. Popping a
//! scope frees its slot for reuse and bumps its generation, which turns
//! any [`VarRef`] still pointing into it into a detectable dangling
//! reference instead of a silent alias of an unrelated variable.

use std::fmt;

use bitflags::bitflags;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use vlang_ir::{FunctionId, Name, Span, StructId};

use crate::value::{Value, ValueType};

/// Pointer chains longer than this are treated as dangling.
const MAX_POINTER_HOPS: usize = 64;

/// Index of a scope in the arena.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
#[repr(transparent)]
pub struct ScopeId(u32);

impl ScopeId {
    pub const GLOBAL: ScopeId = ScopeId(0);

    #[inline]
    const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for ScopeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ScopeId({})", self.0)
    }
}

/// Handle to one variable slot.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct VarRef {
    scope: ScopeId,
    slot: u32,
    generation: u32,
}

impl VarRef {
    #[inline]
    pub fn scope(self) -> ScopeId {
        self.scope
    }
}

/// Whether a variable can be reassigned.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mutability {
    Mutable,
    Immutable,
}

impl Mutability {
    #[inline]
    pub fn is_mutable(self) -> bool {
        matches!(self, Mutability::Mutable)
    }
}

bitflags! {
    /// Properties of a scope.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct ScopeFlags: u8 {
        /// Holds the fields of a struct instance while one of its methods runs.
        const STRUCT = 1 << 0;
        /// Fields may be assigned (the running method is `mut fn`).
        const MUTATING = 1 << 1;
    }
}

/// A declared variable.
#[derive(Clone, Debug, PartialEq)]
pub struct Variable {
    pub name: Name,
    pub ty: ValueType,
    pub value: Value,
    pub mutability: Mutability,
    pub allow_nil: bool,
    pub span: Span,
}

impl Variable {
    pub fn new(
        name: Name,
        ty: ValueType,
        value: Value,
        mutability: Mutability,
        span: Span,
    ) -> Self {
        Variable {
            name,
            ty,
            value,
            mutability,
            allow_nil: ty.allows_nil(),
            span,
        }
    }
}

/// Failure of an environment operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnvError {
    /// The name is already bound in the current scope.
    AlreadyDeclared,
    /// The handle points into a scope that has been popped.
    Dangling,
}

#[derive(Debug)]
struct Scope {
    name: Name,
    parent: Option<ScopeId>,
    children: SmallVec<[ScopeId; 4]>,
    flags: ScopeFlags,
    generation: u32,
    live: bool,
    variables: Vec<Variable>,
    by_name: FxHashMap<Name, u32>,
    functions: FxHashMap<Name, FunctionId>,
    structs: FxHashMap<Name, StructId>,
}

impl Scope {
    fn new(name: Name, parent: Option<ScopeId>, flags: ScopeFlags, generation: u32) -> Self {
        Scope {
            name,
            parent,
            children: SmallVec::new(),
            flags,
            generation,
            live: true,
            variables: Vec::new(),
            by_name: FxHashMap::default(),
            functions: FxHashMap::default(),
            structs: FxHashMap::default(),
        }
    }
}

/// Arena of scopes plus the stack of active ones.
pub struct Environment {
    scopes: Vec<Scope>,
    free: Vec<ScopeId>,
    current: ScopeId,
    /// Scope to return to on each pop.
    saved: Vec<ScopeId>,
}

impl Environment {
    /// Environment holding only the global scope, named `global_name`.
    pub fn new(global_name: Name) -> Self {
        Environment {
            scopes: vec![Scope::new(global_name, None, ScopeFlags::empty(), 0)],
            free: Vec::new(),
            current: ScopeId::GLOBAL,
            saved: Vec::new(),
        }
    }

    #[inline]
    pub fn current(&self) -> ScopeId {
        self.current
    }

    /// Number of scopes above the global one.
    #[inline]
    pub fn depth(&self) -> usize {
        self.saved.len()
    }

    #[inline]
    pub fn is_global(&self) -> bool {
        self.current == ScopeId::GLOBAL
    }

    /// Enter a child of the current scope.
    pub fn push_scope(&mut self, name: Name) -> ScopeId {
        self.push_scope_in(name, self.current, ScopeFlags::empty())
    }

    /// Enter a new scope whose lexical parent is `parent`.
    ///
    /// Function bodies use this to hang off the scope they were declared
    /// in rather than the caller's.
    pub fn push_scope_in(&mut self, name: Name, parent: ScopeId, flags: ScopeFlags) -> ScopeId {
        let id = if let Some(id) = self.free.pop() {
            let generation = self.scopes[id.index()].generation.wrapping_add(1);
            self.scopes[id.index()] = Scope::new(name, Some(parent), flags, generation);
            id
        } else {
            let id = ScopeId(u32::try_from(self.scopes.len()).unwrap_or(u32::MAX));
            self.scopes.push(Scope::new(name, Some(parent), flags, 0));
            id
        };
        self.scopes[parent.index()].children.push(id);
        self.saved.push(self.current);
        self.current = id;
        tracing::trace!(scope = ?id, parent = ?parent, depth = self.saved.len(), "push scope");
        id
    }

    /// Leave the current scope, discarding its bindings. The global scope
    /// is never popped.
    pub fn pop_scope(&mut self) {
        let Some(previous) = self.saved.pop() else {
            return;
        };
        let id = self.current;
        let scope = &mut self.scopes[id.index()];
        scope.live = false;
        scope.variables.clear();
        scope.by_name.clear();
        scope.functions.clear();
        scope.structs.clear();
        scope.children.clear();
        if let Some(parent) = scope.parent {
            self.scopes[parent.index()].children.retain(|child| *child != id);
        }
        self.free.push(id);
        self.current = previous;
        tracing::trace!(scope = ?id, depth = self.saved.len(), "pop scope");
    }

    pub fn flags(&self, scope: ScopeId) -> ScopeFlags {
        self.scopes
            .get(scope.index())
            .map_or(ScopeFlags::empty(), |s| s.flags)
    }

    pub fn name(&self, scope: ScopeId) -> Name {
        self.scopes
            .get(scope.index())
            .map_or(Name::EMPTY, |s| s.name)
    }

    pub fn parent(&self, scope: ScopeId) -> Option<ScopeId> {
        self.scopes.get(scope.index()).and_then(|s| s.parent)
    }

    pub fn children(&self, scope: ScopeId) -> &[ScopeId] {
        self.scopes
            .get(scope.index())
            .map_or(&[][..], |s| s.children.as_slice())
    }

    /// Scope names from the global scope down to `scope`.
    pub fn path(&self, scope: ScopeId) -> Vec<Name> {
        let mut names: Vec<Name> = self
            .ancestors(scope)
            .map(|s| self.scopes[s.index()].name)
            .collect();
        names.reverse();
        names
    }

    /// `scope` followed by each of its ancestors.
    fn ancestors(&self, scope: ScopeId) -> impl Iterator<Item = ScopeId> + '_ {
        std::iter::successors(Some(scope), |s| self.parent(*s))
    }

    /// Nearest enclosing struct scope, if a method is running.
    pub fn enclosing_struct_scope(&self) -> Option<ScopeId> {
        self.ancestors(self.current)
            .find(|s| self.flags(*s).contains(ScopeFlags::STRUCT))
    }

    // Variables

    /// Bind a new variable in the current scope. Shadowing an outer
    /// binding is fine; rebinding a name of this scope is not.
    pub fn declare(&mut self, variable: Variable) -> Result<VarRef, EnvError> {
        let id = self.current;
        let scope = &mut self.scopes[id.index()];
        if scope.by_name.contains_key(&variable.name) {
            return Err(EnvError::AlreadyDeclared);
        }
        let slot = u32::try_from(scope.variables.len()).unwrap_or(u32::MAX);
        scope.by_name.insert(variable.name, slot);
        scope.variables.push(variable);
        Ok(VarRef {
            scope: id,
            slot,
            generation: scope.generation,
        })
    }

    /// Find `name` walking outward from the current scope, following
    /// pointer variables to the variable they alias.
    pub fn lookup(&self, name: Name) -> Option<VarRef> {
        let found = self.lookup_binding(name)?;
        Some(self.resolve(found))
    }

    /// Find `name` without following pointers.
    pub fn lookup_binding(&self, name: Name) -> Option<VarRef> {
        self.ancestors(self.current).find_map(|id| {
            let scope = &self.scopes[id.index()];
            scope.by_name.get(&name).map(|&slot| VarRef {
                scope: id,
                slot,
                generation: scope.generation,
            })
        })
    }

    /// Find `name` bound directly in `scope`.
    pub fn lookup_in(&self, scope: ScopeId, name: Name) -> Option<VarRef> {
        let data = self.scopes.get(scope.index()).filter(|s| s.live)?;
        data.by_name.get(&name).map(|&slot| VarRef {
            scope,
            slot,
            generation: data.generation,
        })
    }

    /// Follow a chain of pointer variables to its end.
    pub fn resolve(&self, mut var: VarRef) -> VarRef {
        for _ in 0..MAX_POINTER_HOPS {
            match self.get(var) {
                Ok(Variable {
                    value: Value::Pointer(target),
                    ..
                }) => var = *target,
                _ => break,
            }
        }
        var
    }

    pub fn get(&self, var: VarRef) -> Result<&Variable, EnvError> {
        let scope = self
            .scopes
            .get(var.scope.index())
            .filter(|s| s.live && s.generation == var.generation)
            .ok_or(EnvError::Dangling)?;
        scope
            .variables
            .get(var.slot as usize)
            .ok_or(EnvError::Dangling)
    }

    pub fn get_mut(&mut self, var: VarRef) -> Result<&mut Variable, EnvError> {
        let scope = self
            .scopes
            .get_mut(var.scope.index())
            .filter(|s| s.live && s.generation == var.generation)
            .ok_or(EnvError::Dangling)?;
        scope
            .variables
            .get_mut(var.slot as usize)
            .ok_or(EnvError::Dangling)
    }

    /// Variables of `scope` in declaration order.
    pub fn variables(&self, scope: ScopeId) -> &[Variable] {
        self.scopes
            .get(scope.index())
            .filter(|s| s.live)
            .map_or(&[][..], |s| s.variables.as_slice())
    }

    // Functions and structs

    pub fn declare_function(&mut self, name: Name, id: FunctionId) -> Result<(), EnvError> {
        let scope = &mut self.scopes[self.current.index()];
        if scope.functions.contains_key(&name) {
            return Err(EnvError::AlreadyDeclared);
        }
        scope.functions.insert(name, id);
        Ok(())
    }

    /// Find a function and the scope that declares it.
    pub fn lookup_function(&self, name: Name) -> Option<(FunctionId, ScopeId)> {
        self.ancestors(self.current).find_map(|id| {
            self.scopes[id.index()]
                .functions
                .get(&name)
                .map(|&function| (function, id))
        })
    }

    pub fn declare_struct(&mut self, name: Name, id: StructId) -> Result<(), EnvError> {
        let scope = &mut self.scopes[self.current.index()];
        if scope.structs.contains_key(&name) {
            return Err(EnvError::AlreadyDeclared);
        }
        scope.structs.insert(name, id);
        Ok(())
    }

    pub fn lookup_struct(&self, name: Name) -> Option<StructId> {
        self.ancestors(self.current)
            .find_map(|id| self.scopes[id.index()].structs.get(&name).copied())
    }
}

#[cfg(test)]
mod tests;

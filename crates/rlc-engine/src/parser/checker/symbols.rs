//! Symbol table implementation for name resolution
//!
//! Tracks which names have been defined. Values are not tracked; the only
//! question the checker asks is "has this name ever been assigned".

use rustc_hash::FxHashMap;
use crate::parser::Span;

/// Scope identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeId(pub u32);

/// Scope in the scope tree
#[derive(Debug, Clone)]
pub struct Scope {
    /// Scope ID
    pub id: ScopeId,
    /// Parent scope (None for global scope)
    pub parent: Option<ScopeId>,
    /// Defined names and the location of their first definition
    pub symbols: FxHashMap<String, Span>,
}

impl Scope {
    /// Create a new scope
    pub fn new(id: ScopeId, parent: Option<ScopeId>) -> Self {
        Scope {
            id,
            parent,
            symbols: FxHashMap::default(),
        }
    }
}

/// Symbol table with scope tree
///
/// The source language has a single scope, so only the global scope is
/// populated in practice; nested scopes resolve through their parent chain.
pub struct SymbolTable {
    /// All scopes (indexed by ScopeId)
    scopes: Vec<Scope>,
    /// Current scope ID
    current: ScopeId,
}

impl SymbolTable {
    /// Create a symbol table holding only the global scope
    pub fn new() -> Self {
        SymbolTable {
            scopes: vec![Scope::new(ScopeId(0), None)],
            current: ScopeId(0),
        }
    }

    /// Enter a new child scope of the current scope
    pub fn push_scope(&mut self) -> ScopeId {
        let id = ScopeId(self.scopes.len() as u32);
        self.scopes.push(Scope::new(id, Some(self.current)));
        self.current = id;
        id
    }

    /// Return to the parent of the current scope
    pub fn pop_scope(&mut self) {
        if let Some(parent) = self.scopes[self.current.0 as usize].parent {
            self.current = parent;
        }
    }

    /// Current scope ID
    pub fn current_scope(&self) -> ScopeId {
        self.current
    }

    /// Define (or re-define) a name in the current scope
    pub fn define(&mut self, name: &str, span: Span) {
        self.scopes[self.current.0 as usize]
            .symbols
            .entry(name.to_string())
            .or_insert(span);
    }

    /// Check whether a name is defined in the current scope or any ancestor
    pub fn is_defined(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    /// Location of the first definition of `name`, walking parent scopes
    pub fn lookup(&self, name: &str) -> Option<Span> {
        let mut scope_id = Some(self.current);
        while let Some(id) = scope_id {
            let scope = &self.scopes[id.0 as usize];
            if let Some(span) = scope.symbols.get(name) {
                return Some(*span);
            }
            scope_id = scope.parent;
        }
        None
    }

    /// Number of names defined in the global scope
    pub fn global_len(&self) -> usize {
        self.scopes[0].symbols.len()
    }
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

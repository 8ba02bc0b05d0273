//! Nested symbol tables.
//!
//! Every scope the resolver opens is kept in an arena, in creation order,
//! so the table still knows every local after the resolver has popped the
//! scope again. Declarations are stamped with a sequence number; together
//! with the creation order this lets a later pass replay the exact
//! visibility the resolver saw at each point of the walk (see
//! [`ScopeCursor`]).

use std::{collections::HashMap, fmt::Write};

use crate::{ast::types::Type, errors::errors::ErrorImpl};

use super::history::ScopeHistory;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScopeId(pub usize);

pub const GLOBAL_SCOPE: ScopeId = ScopeId(0);

#[derive(Debug, Clone, PartialEq)]
pub struct VarInfo {
    pub ty: Type,
    /// Depth of the declaring scope; the global scope is depth 0.
    pub depth: usize,
    /// Sequence number of the declaration attempt that created the binding.
    pub seq: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FuncInfo {
    pub param_types: Vec<Type>,
    pub return_type: Type,
}

impl FuncInfo {
    pub fn arity(&self) -> usize {
        self.param_types.len()
    }

    /// `(int, float) -> bool`
    pub fn signature(&self) -> String {
        let params: Vec<&str> = self.param_types.iter().map(Type::name).collect();
        format!("({}) -> {}", params.join(", "), self.return_type)
    }
}

#[derive(Debug, Clone)]
pub struct Scope {
    pub id: ScopeId,
    pub parent: Option<ScopeId>,
    pub depth: usize,
    variables: HashMap<String, VarInfo>,
}

impl Scope {
    pub fn get(&self, name: &str) -> Option<&VarInfo> {
        self.variables.get(name)
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    /// Bindings in declaration order.
    pub fn variables(&self) -> Vec<(&str, &VarInfo)> {
        let mut variables: Vec<(&str, &VarInfo)> = self
            .variables
            .iter()
            .map(|(name, info)| (name.as_str(), info))
            .collect();
        variables.sort_by_key(|(_, info)| info.seq);
        variables
    }
}

#[derive(Debug, Clone)]
pub struct SymbolTable {
    scopes: Vec<Scope>,
    /// Scopes open at this point of the walk, global first. Never empty.
    active: Vec<ScopeId>,
    functions: HashMap<String, FuncInfo>,
    function_order: Vec<String>,
    declarations: usize,
    history: Option<ScopeHistory>,
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolTable {
    pub fn new() -> Self {
        SymbolTable {
            scopes: vec![Scope {
                id: GLOBAL_SCOPE,
                parent: None,
                depth: 0,
                variables: HashMap::new(),
            }],
            active: vec![GLOBAL_SCOPE],
            functions: HashMap::new(),
            function_order: vec![],
            declarations: 0,
            history: None,
        }
    }

    /// A table that records a snapshot after every mutation.
    pub fn with_history() -> Self {
        SymbolTable {
            history: Some(ScopeHistory::default()),
            ..Self::new()
        }
    }

    pub fn current_scope(&self) -> ScopeId {
        self.active[self.active.len() - 1]
    }

    /// Depth of the innermost open scope.
    pub fn depth(&self) -> usize {
        self.active.len() - 1
    }

    pub fn enter_scope(&mut self) -> ScopeId {
        let id = ScopeId(self.scopes.len());
        self.scopes.push(Scope {
            id,
            parent: Some(self.current_scope()),
            depth: self.active.len(),
            variables: HashMap::new(),
        });
        self.active.push(id);

        log::trace!("enter scope {} at depth {}", id.0, self.depth());
        self.record("enter scope");
        id
    }

    pub fn exit_scope(&mut self) {
        debug_assert!(self.active.len() > 1, "exit_scope on the global scope");
        if self.active.len() <= 1 {
            return;
        }

        self.record("exit scope");
        let id = self.current_scope();
        self.active.pop();
        log::trace!("exit scope {}", id.0);
    }

    /// Binds `name` in the innermost scope. Every call counts as a
    /// declaration attempt, whether it succeeds or not.
    pub fn declare_variable(&mut self, name: &str, ty: Type) -> Result<(), ErrorImpl> {
        let seq = self.declarations;
        self.declarations += 1;

        let depth = self.depth();
        let current = self.current_scope().0;
        let scope = &mut self.scopes[current];
        if scope.variables.contains_key(name) {
            return Err(ErrorImpl::VariableAlreadyDeclared {
                variable: name.to_string(),
            });
        }
        scope
            .variables
            .insert(name.to_string(), VarInfo { ty, depth, seq });

        log::trace!("declare {} {} at depth {}", ty, name, depth);
        self.record(&format!("declare variable '{}'", name));
        Ok(())
    }

    /// Registers a function signature. The first registration wins.
    pub fn declare_function(&mut self, name: &str, info: FuncInfo) -> Result<(), ErrorImpl> {
        if self.functions.contains_key(name) {
            return Err(ErrorImpl::FunctionAlreadyDeclared {
                function: name.to_string(),
            });
        }

        log::trace!("declare function {}{}", name, info.signature());
        self.functions.insert(name.to_string(), info);
        self.function_order.push(name.to_string());
        self.record(&format!("declare function '{}'", name));
        Ok(())
    }

    /// Innermost binding of `name` among the open scopes.
    pub fn lookup_variable(&self, name: &str) -> Option<&VarInfo> {
        self.active
            .iter()
            .rev()
            .find_map(|id| self.scopes[id.0].get(name))
    }

    pub fn lookup_function(&self, name: &str) -> Option<&FuncInfo> {
        self.functions.get(name)
    }

    pub fn scope(&self, id: ScopeId) -> Option<&Scope> {
        self.scopes.get(id.0)
    }

    /// Every scope ever opened, in creation order.
    pub fn scopes(&self) -> &[Scope] {
        &self.scopes
    }

    /// Registered functions in registration order.
    pub fn functions(&self) -> impl Iterator<Item = (&str, &FuncInfo)> {
        self.function_order
            .iter()
            .filter_map(|name| self.functions.get(name).map(|info| (name.as_str(), info)))
    }

    pub fn history(&self) -> Option<&ScopeHistory> {
        self.history.as_ref()
    }

    /// A fresh read-only replay of the walk that built this table.
    pub fn cursor(&self) -> ScopeCursor<'_> {
        ScopeCursor {
            table: self,
            stack: vec![GLOBAL_SCOPE],
            next_scope: 1,
            declarations: 0,
        }
    }

    fn record(&mut self, action: &str) {
        if self.history.is_none() {
            return;
        }

        let scopes: Vec<Vec<(String, Type)>> = self
            .active
            .iter()
            .map(|id| {
                self.scopes[id.0]
                    .variables()
                    .into_iter()
                    .map(|(name, info)| (name.to_string(), info.ty))
                    .collect()
            })
            .collect();
        let functions = self.function_order.clone();

        if let Some(history) = self.history.as_mut() {
            history.record(action, scopes, functions);
        }
    }

    /// Functions with their signatures, then every scope with its bindings.
    pub fn report(&self) -> String {
        let mut out = String::from("=== SYMBOL TABLE ===\n\nFunctions:\n");

        if self.function_order.is_empty() {
            out.push_str("  (none)\n");
        }
        for (name, info) in self.functions() {
            let _ = writeln!(out, "  {}{}", name, info.signature());
        }

        out.push_str("\nScopes:\n");
        for scope in &self.scopes {
            let label = match scope.parent {
                None => String::from("global"),
                Some(parent) => format!("in #{}", parent.0),
            };
            let variables: Vec<String> = scope
                .variables()
                .into_iter()
                .map(|(name, info)| format!("{}: {}", name, info.ty))
                .collect();
            let variables = if variables.is_empty() {
                String::from("(empty)")
            } else {
                variables.join(", ")
            };

            let _ = writeln!(
                out,
                "  #{} {} (depth {}): {}",
                scope.id.0, label, scope.depth, variables
            );
        }

        out
    }
}

/// Read-only replay of a resolved [`SymbolTable`].
///
/// A walker that enters scopes and passes declaration sites in the same
/// order as the resolver did sees exactly the bindings the resolver saw.
/// A cursor over a table built from a different program never panics; it
/// just finds fewer names.
#[derive(Debug, Clone)]
pub struct ScopeCursor<'a> {
    table: &'a SymbolTable,
    stack: Vec<ScopeId>,
    next_scope: usize,
    declarations: usize,
}

impl<'a> ScopeCursor<'a> {
    pub fn enter_scope(&mut self) -> ScopeId {
        let id = ScopeId(self.next_scope);
        self.next_scope += 1;
        self.stack.push(id);
        id
    }

    pub fn exit_scope(&mut self) {
        if self.stack.len() > 1 {
            self.stack.pop();
        }
    }

    /// Passes one declaration site (variable or parameter).
    pub fn declare(&mut self) {
        self.declarations += 1;
    }

    pub fn depth(&self) -> usize {
        self.stack.len() - 1
    }

    pub fn lookup_variable(&self, name: &str) -> Option<&'a VarInfo> {
        let table = self.table;
        let visible = self.declarations;

        self.stack.iter().rev().find_map(|id| {
            table
                .scope(*id)
                .and_then(|scope| scope.get(name))
                .filter(|info| info.seq < visible)
        })
    }

    pub fn lookup_function(&self, name: &str) -> Option<&'a FuncInfo> {
        self.table.lookup_function(name)
    }
}

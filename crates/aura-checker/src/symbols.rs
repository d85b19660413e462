//! Namespaced symbol table with lexically scoped bindings.
//!
//! Every module gets its own [`Namespace`], keyed by the package it belongs
//! to and its module name. A namespace is a stack of scopes; lookups search
//! innermost first. Imported namespaces belong to the file that imported
//! them and are found by alias through that file only.
//! Misses are `None`: deciding whether a miss is fatal is the caller's job.

use std::collections::HashMap;

use aura_types::{ModuleType, Type};

/// A resolved name.
#[derive(Debug, Clone, PartialEq)]
pub struct Symbol {
    pub name: String,
    pub kind: Type,
    pub namespace: String,
}

impl Symbol {
    pub fn new(name: impl Into<String>, kind: Type, namespace: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind,
            namespace: namespace.into(),
        }
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Namespace
// ══════════════════════════════════════════════════════════════════════════════

#[derive(Debug)]
struct Namespace {
    scopes: Vec<HashMap<String, Symbol>>,
}

impl Namespace {
    fn new() -> Self {
        Self {
            scopes: vec![HashMap::new()],
        }
    }

    fn lookup(&self, name: &str) -> Option<&Symbol> {
        self.scopes.iter().rev().find_map(|scope| scope.get(name))
    }
}

/// Read access to an imported namespace.
#[derive(Debug, Clone, Copy)]
pub struct NamespaceHandle<'t> {
    name: &'t str,
    namespace: &'t Namespace,
}

impl<'t> NamespaceHandle<'t> {
    pub fn name(&self) -> &'t str {
        self.name
    }

    pub fn get(&self, name: &str) -> Option<&'t Symbol> {
        self.namespace.lookup(name)
    }

    /// Reassemble the namespace's root scope as a module type.
    pub fn to_module(&self) -> ModuleType {
        let mut module = ModuleType::new(self.name);
        let mut symbols: Vec<&Symbol> = self.namespace.scopes[0].values().collect();
        symbols.sort_by(|a, b| a.name.cmp(&b.name));
        for symbol in symbols {
            match &symbol.kind {
                Type::NamedFunction(f) => module.functions.push(f.clone()),
                Type::Class(c) => module.classes.push(c.clone()),
                other => module.variables.push((symbol.name.clone(), other.clone())),
            }
        }
        module
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// SymbolsTable
// ══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Default)]
pub struct SymbolsTable {
    namespaces: HashMap<String, Namespace>,
    /// Importing file, then alias.
    imports: HashMap<String, HashMap<String, Namespace>>,
}

impl SymbolsTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert into the innermost scope of the symbol's namespace.
    ///
    /// Redeclaring a name in the same scope shadows it; returns `false` when
    /// an existing binding was replaced.
    pub fn try_add_symbol(&mut self, symbol: Symbol) -> bool {
        let namespace = self
            .namespaces
            .entry(symbol.namespace.clone())
            .or_insert_with(Namespace::new);
        let scope = namespace
            .scopes
            .last_mut()
            .expect("a namespace always keeps its root scope");
        tracing::trace!(name = %symbol.name, namespace = %symbol.namespace, kind = %symbol.kind, "symbol");
        scope.insert(symbol.name.clone(), symbol).is_none()
    }

    /// Search `namespace` from the innermost scope outward.
    pub fn get_symbol(&self, name: &str, namespace: &str) -> Option<&Symbol> {
        self.namespaces.get(namespace)?.lookup(name)
    }

    pub fn add_scope(&mut self, namespace: &str) {
        self.namespaces
            .entry(namespace.to_string())
            .or_insert_with(Namespace::new)
            .scopes
            .push(HashMap::new());
    }

    pub fn exit_scope(&mut self, namespace: &str) {
        if let Some(ns) = self.namespaces.get_mut(namespace) {
            debug_assert!(ns.scopes.len() > 1, "cannot pop the root scope");
            if ns.scopes.len() > 1 {
                ns.scopes.pop();
            }
        }
    }

    /// Number of scopes currently open in `namespace`, root included.
    pub fn scope_depth(&self, namespace: &str) -> usize {
        self.namespaces.get(namespace).map_or(0, |ns| ns.scopes.len())
    }

    /// Register a module's exports under `alias` for `importer` only,
    /// replacing whatever a previous import of that file put there.
    pub fn add_module(&mut self, importer: &str, alias: &str, module: &ModuleType) {
        let mut ns = Namespace::new();
        for (name, kind) in module.members() {
            ns.scopes[0].insert(name.to_string(), Symbol::new(name, kind, alias));
        }
        self.imports
            .entry(importer.to_string())
            .or_default()
            .insert(alias.to_string(), ns);
    }

    /// A namespace `importer` imported under `alias`. Module-local
    /// namespaces are never returned, so `x.y` on a module's own name stays
    /// an attribute access.
    pub fn get_namespace(&self, importer: &str, alias: &str) -> Option<NamespaceHandle<'_>> {
        let (name, namespace) = self.imports.get(importer)?.get_key_value(alias)?;
        Some(NamespaceHandle {
            name: name.as_str(),
            namespace,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aura_types::{FunctionSig, NamedFunction, Param, Visibility};

    fn int(name: &str, ns: &str) -> Symbol {
        Symbol::new(name, Type::Int, ns)
    }

    #[test]
    fn test_lookup_innermost_first() {
        let mut table = SymbolsTable::new();
        table.try_add_symbol(Symbol::new("x", Type::String, "main"));
        table.add_scope("main");
        table.try_add_symbol(int("x", "main"));
        assert_eq!(table.get_symbol("x", "main").unwrap().kind, Type::Int);
        table.exit_scope("main");
        assert_eq!(table.get_symbol("x", "main").unwrap().kind, Type::String);
    }

    #[test]
    fn test_shadowing_in_same_scope_last_write_wins() {
        let mut table = SymbolsTable::new();
        assert!(table.try_add_symbol(int("a", "main")));
        assert!(!table.try_add_symbol(Symbol::new("a", Type::Bool, "main")));
        assert_eq!(table.get_symbol("a", "main").unwrap().kind, Type::Bool);
    }

    #[test]
    fn test_miss_is_none_not_error() {
        let table = SymbolsTable::new();
        assert!(table.get_symbol("nope", "main").is_none());
        assert!(table.get_symbol("nope", "missing").is_none());
    }

    #[test]
    fn test_namespaces_are_isolated() {
        let mut table = SymbolsTable::new();
        table.try_add_symbol(int("x", "a"));
        assert!(table.get_symbol("x", "b").is_none());
    }

    #[test]
    fn test_scope_depth_tracks_push_and_pop() {
        let mut table = SymbolsTable::new();
        table.add_scope("main");
        table.add_scope("main");
        assert_eq!(table.scope_depth("main"), 3);
        table.exit_scope("main");
        table.exit_scope("main");
        assert_eq!(table.scope_depth("main"), 1);
    }

    #[test]
    fn test_add_module_registers_imported_namespace() {
        let mut module = ModuleType::new("geometry");
        module.functions.push(NamedFunction::new(
            "area",
            Visibility::Public,
            FunctionSig::new(vec![Param::new("r", Type::Float)], Type::Float),
        ));
        module.variables.push(("PI".into(), Type::Float));

        let mut table = SymbolsTable::new();
        table.add_module("main.aura", "geo", &module);

        let handle = table.get_namespace("main.aura", "geo").expect("imported namespace");
        assert_eq!(handle.name(), "geo");
        assert!(matches!(handle.get("area").unwrap().kind, Type::NamedFunction(_)));
        let rebuilt = handle.to_module();
        assert_eq!(rebuilt.functions.len(), 1);
        assert_eq!(rebuilt.variables, vec![("PI".to_string(), Type::Float)]);
    }

    #[test]
    fn test_local_namespace_is_not_an_import() {
        let mut table = SymbolsTable::new();
        table.try_add_symbol(int("x", "main"));
        assert!(table.get_namespace("main.aura", "main").is_none());
    }

    #[test]
    fn test_imports_are_visible_to_the_importer_only() {
        let mut table = SymbolsTable::new();
        table.add_module("a.aura", "geo", &ModuleType::new("geometry"));
        assert!(table.get_namespace("a.aura", "geo").is_some());
        assert!(table.get_namespace("b.aura", "geo").is_none());
    }
}

//! Module compilation: one [`CheckContext`] per compilation, shared by the
//! entry file and every package it imports.

use std::collections::HashMap;

use aura_types::ast::Stmt;
use aura_types::typed_ast::{TypedStmt, TypedStmtKind};
use aura_types::{Diagnostics, ModuleType, Visibility};
use thiserror::Error;

use crate::checker::TypeChecker;
use crate::config::CheckerConfig;
use crate::prelude;
use crate::stdlib::StdlibRegistry;
use crate::symbols::SymbolsTable;

// ══════════════════════════════════════════════════════════════════════════════
// Resolution
// ══════════════════════════════════════════════════════════════════════════════

/// One parsed source file of a package.
#[derive(Debug, Clone, PartialEq)]
pub struct ModuleSource {
    pub path: String,
    pub stmts: Vec<Stmt>,
}

impl ModuleSource {
    pub fn new(path: impl Into<String>, stmts: Vec<Stmt>) -> Self {
        Self {
            path: path.into(),
            stmts,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("no module found at '{0}'")]
    NotFound(String),
    #[error("failed to load '{path}': {message}")]
    Unreadable { path: String, message: String },
}

/// Produces the untyped AST of every file under a package path.
pub trait ModuleResolver {
    fn resolve(&self, path: &str) -> Result<Vec<ModuleSource>, ResolveError>;
}

/// Resolves nothing; only stdlib packages can be imported.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoResolver;

impl ModuleResolver for NoResolver {
    fn resolve(&self, path: &str) -> Result<Vec<ModuleSource>, ResolveError> {
        Err(ResolveError::NotFound(path.to_string()))
    }
}

/// Serves pre-parsed packages from memory, keyed by resolved path.
#[derive(Debug, Clone, Default)]
pub struct InMemoryResolver {
    packages: HashMap<String, Vec<ModuleSource>>,
}

impl InMemoryResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<String>, files: Vec<ModuleSource>) {
        self.packages.insert(path.into(), files);
    }

    pub fn with(mut self, path: impl Into<String>, files: Vec<ModuleSource>) -> Self {
        self.insert(path, files);
        self
    }
}

impl ModuleResolver for InMemoryResolver {
    fn resolve(&self, path: &str) -> Result<Vec<ModuleSource>, ResolveError> {
        match self.packages.get(path) {
            Some(files) if !files.is_empty() => Ok(files.clone()),
            _ => Err(ResolveError::NotFound(path.to_string())),
        }
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// CheckedFile
// ══════════════════════════════════════════════════════════════════════════════

/// The typed output for one source file.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckedFile {
    pub path: String,
    /// The name declared by the file's `mod` statement.
    pub module: String,
    pub stmts: Vec<TypedStmt>,
}

impl CheckedFile {
    /// Public functions and classes plus every top-level variable.
    pub fn exports(&self) -> ModuleType {
        let mut module = ModuleType::new(self.module.clone());
        for stmt in &self.stmts {
            match &stmt.kind {
                TypedStmtKind::NamedFunction(f) if f.signature.visibility == Visibility::Public => {
                    module.functions.push(f.signature.clone());
                }
                TypedStmtKind::Class(c) if c.signature.visibility == Visibility::Public => {
                    module.classes.push(c.signature.clone());
                }
                TypedStmtKind::Let(l) => module.variables.push((l.name.name.clone(), l.var_ty.clone())),
                _ => {}
            }
        }
        module
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// CheckContext
// ══════════════════════════════════════════════════════════════════════════════

/// State shared by every file checked in one compilation.
pub struct CheckContext {
    pub(crate) symbols: SymbolsTable,
    pub(crate) stdlib: StdlibRegistry,
    pub(crate) config: CheckerConfig,
    resolver: Box<dyn ModuleResolver>,
    /// Packages whose compilation has started but not finished.
    in_flight: Vec<String>,
    /// Exports of every package compiled so far, by package path.
    compiled: HashMap<String, ModuleType>,
}

/// Why an imported package produced no module.
#[derive(Debug)]
pub(crate) enum ImportFailure {
    Cycle,
    Unresolved(ResolveError),
    Failed(Diagnostics),
}

impl CheckContext {
    pub fn new(config: CheckerConfig, resolver: impl ModuleResolver + 'static) -> Self {
        let mut symbols = SymbolsTable::new();
        prelude::register(&mut symbols, &config.prelude_namespace);
        Self {
            symbols,
            stdlib: StdlibRegistry::new(),
            config,
            resolver: Box::new(resolver),
            in_flight: Vec::new(),
            compiled: HashMap::new(),
        }
    }

    pub fn symbols(&self) -> &SymbolsTable {
        &self.symbols
    }

    pub fn config(&self) -> &CheckerConfig {
        &self.config
    }

    /// Pre-pass then full check of one file. Pre-pass errors are returned
    /// without checking any body.
    pub fn check_file(&mut self, path: &str, stmts: &[Stmt]) -> Result<CheckedFile, Diagnostics> {
        let mut checker = TypeChecker::new(self, path);
        let items = checker.build_symbols_table(stmts)?;
        let typed = checker.check_types(items)?;
        Ok(CheckedFile {
            path: path.to_string(),
            module: checker.module_name().to_string(),
            stmts: typed,
        })
    }

    /// Symbol namespace for a file declaring `mod module`. Files of one
    /// package share it; the entry file's namespace is its bare module name.
    pub(crate) fn local_namespace(&self, module: &str) -> String {
        match self.in_flight.last() {
            Some(package) => format!("{package}::{module}"),
            None => module.to_string(),
        }
    }

    /// Exports of `package`, compiling it on first use.
    #[tracing::instrument(skip_all, fields(package = %package))]
    pub(crate) fn import_package(&mut self, package: &str) -> Result<ModuleType, ImportFailure> {
        if let Some(module) = self.stdlib.try_get_module(package) {
            return Ok(module.clone());
        }
        if let Some(module) = self.compiled.get(package) {
            return Ok(module.clone());
        }
        if self.in_flight.iter().any(|p| p == package) {
            tracing::warn!(in_flight = ?self.in_flight, "import cycle");
            return Err(ImportFailure::Cycle);
        }

        let path = self.config.package_path(package);
        let files = self
            .resolver
            .resolve(&path)
            .map_err(ImportFailure::Unresolved)?;
        tracing::debug!(%path, files = files.len(), "compiling package");

        self.in_flight.push(package.to_string());
        let result = self.compile_files(&files);
        self.in_flight.pop();

        let module = result.map_err(|errors| {
            tracing::warn!(errors = errors.total_errors, "package failed to type check");
            ImportFailure::Failed(errors)
        })?;
        self.compiled.insert(package.to_string(), module.clone());
        Ok(module)
    }

    /// Check every file of a package; exports are merged across files.
    fn compile_files(&mut self, files: &[ModuleSource]) -> Result<ModuleType, Diagnostics> {
        let mut errors = Diagnostics::with_limit(self.config.max_errors);
        let mut merged: Option<ModuleType> = None;
        for file in files {
            match self.check_file(&file.path, &file.stmts) {
                Ok(checked) => {
                    let exports = checked.exports();
                    match merged.as_mut() {
                        Some(module) => {
                            module.functions.extend(exports.functions);
                            module.classes.extend(exports.classes);
                            module.variables.extend(exports.variables);
                        }
                        None => merged = Some(exports),
                    }
                }
                Err(file_errors) => errors.extend(file_errors),
            }
        }
        match merged {
            Some(module) if !errors.has_errors() => Ok(module),
            _ => Err(errors),
        }
    }
}

impl Default for CheckContext {
    fn default() -> Self {
        Self::new(CheckerConfig::default(), NoResolver)
    }
}

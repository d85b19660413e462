//! Standard library module registry.
//!
//! Every `aura/*` package is pre-typed here, so importing one never reads
//! source. The string, list and error packages double as the method tables
//! of the builtin `String`, list and `Error` types: their functions take the
//! receiver as the first parameter.

use std::collections::HashMap;

use aura_types::{FunctionSig, ModuleType, NamedFunction, Param, Type, Visibility};

/// Registry mapping a package path (`aura/strings`) to its exports.
#[derive(Debug)]
pub struct StdlibRegistry {
    modules: HashMap<String, ModuleType>,
}

impl StdlibRegistry {
    /// Create a registry with every builtin package.
    pub fn new() -> Self {
        let mut reg = Self {
            modules: HashMap::new(),
        };
        reg.register_io();
        reg.register_strings();
        reg.register_lists();
        reg.register_maps();
        reg.register_errors();
        reg.register_math();
        reg
    }

    /// Pure lookup by package path.
    pub fn try_get_module(&self, package: &str) -> Option<&ModuleType> {
        self.modules.get(package)
    }

    // ──────────────────────────────────────────────────────────────────────
    // Registration helpers
    // ──────────────────────────────────────────────────────────────────────

    fn add(&mut self, package: &str, name: &str, sig: FunctionSig) {
        let module_name = package.rsplit('/').next().unwrap_or(package);
        self.modules
            .entry(package.to_string())
            .or_insert_with(|| ModuleType::new(module_name))
            .functions
            .push(NamedFunction::new(name, Visibility::Public, sig));
    }

    fn add_const(&mut self, package: &str, name: &str, ty: Type) {
        if let Some(module) = self.modules.get_mut(package) {
            module.variables.push((name.to_string(), ty));
        }
    }

    // ══════════════════════════════════════════════════════════════════════
    // Packages
    // ══════════════════════════════════════════════════════════════════════

    fn register_io(&mut self) {
        use Type::*;
        self.add("aura/io", "print", sig(vec![("s", String)], Nil));
        self.add("aura/io", "println", sig(vec![("s", String)], Nil));
        self.add(
            "aura/io",
            "printf",
            variadic_sig(vec![("format", String), ("args", Any)], Nil),
        );
        self.add("aura/io", "eprintln", sig(vec![("s", String)], Nil));
        self.add("aura/io", "readln", sig(vec![], String));
        self.add("aura/io", "read_file", sig(vec![("path", String)], String));
        self.add(
            "aura/io",
            "write_file",
            sig(vec![("path", String), ("content", String)], Nil),
        );
    }

    fn register_strings(&mut self) {
        use Type::*;
        let p = "aura/strings";
        self.add(p, "length", sig(vec![("s", String)], Int));
        self.add(p, "to_lower", sig(vec![("s", String)], String));
        self.add(p, "to_upper", sig(vec![("s", String)], String));
        self.add(p, "trim", sig(vec![("s", String)], String));
        self.add(
            p,
            "contains",
            sig(vec![("s", String), ("sub", String)], Bool),
        );
        self.add(
            p,
            "has_prefix",
            sig(vec![("s", String), ("prefix", String)], Bool),
        );
        self.add(
            p,
            "has_suffix",
            sig(vec![("s", String), ("suffix", String)], Bool),
        );
        self.add(
            p,
            "index",
            sig(vec![("s", String), ("sub", String)], Int),
        );
        self.add(
            p,
            "split",
            sig(
                vec![("s", String), ("sep", String)],
                List(Box::new(String)),
            ),
        );
        self.add(
            p,
            "replace",
            sig(vec![("s", String), ("old", String), ("new", String)], String),
        );
        self.add(p, "to_int", sig(vec![("s", String)], Int));
        self.add(p, "to_float", sig(vec![("s", String)], Float));
    }

    fn register_lists(&mut self) {
        use Type::*;
        let p = "aura/lists";
        let any_list = || List(Box::new(Any));
        self.add(p, "length", sig(vec![("items", any_list())], Int));
        self.add(p, "is_empty", sig(vec![("items", any_list())], Bool));
        self.add(
            p,
            "contains",
            sig(vec![("items", any_list()), ("item", Any)], Bool),
        );
        self.add(
            p,
            "index_of",
            sig(vec![("items", any_list()), ("item", Any)], Int),
        );
        self.add(p, "reverse", sig(vec![("items", any_list())], any_list()));
        self.add(
            p,
            "join",
            sig(
                vec![("items", List(Box::new(String))), ("sep", String)],
                String,
            ),
        );
        self.add(p, "sum", sig(vec![("items", List(Box::new(Int)))], Int));
        self.add(p, "min", sig(vec![("items", List(Box::new(Int)))], Int));
        self.add(p, "max", sig(vec![("items", List(Box::new(Int)))], Int));
    }

    fn register_maps(&mut self) {
        use Type::*;
        let p = "aura/maps";
        let any_map = || Map(Box::new(Any), Box::new(Any));
        self.add(p, "length", sig(vec![("m", any_map())], Int));
        self.add(
            p,
            "contains",
            sig(vec![("m", any_map()), ("key", Any)], Bool),
        );
        self.add(p, "keys", sig(vec![("m", any_map())], List(Box::new(Any))));
        self.add(p, "values", sig(vec![("m", any_map())], List(Box::new(Any))));
    }

    fn register_errors(&mut self) {
        use Type::*;
        self.add("aura/errors", "message", sig(vec![("err", Error)], String));
        self.add("aura/errors", "wrap", sig(vec![("err", Error), ("context", String)], Error));
    }

    fn register_math(&mut self) {
        use Type::*;
        let p = "aura/math";
        self.add(p, "abs", sig(vec![("x", Int)], Int));
        self.add(p, "min", sig(vec![("a", Int), ("b", Int)], Int));
        self.add(p, "max", sig(vec![("a", Int), ("b", Int)], Int));
        self.add(p, "sqrt", sig(vec![("x", Float)], Float));
        self.add(p, "pow", sig(vec![("base", Float), ("exp", Float)], Float));
        self.add(p, "floor", sig(vec![("x", Float)], Int));

        self.add_const(p, "PI", Float);
        self.add_const(p, "E", Float);
    }
}

impl Default for StdlibRegistry {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) fn sig(params: Vec<(&str, Type)>, ret: Type) -> FunctionSig {
    FunctionSig::new(
        params
            .into_iter()
            .map(|(name, ty)| Param::new(name, ty))
            .collect(),
        ret,
    )
}

/// The last parameter absorbs every trailing argument.
pub(crate) fn variadic_sig(params: Vec<(&str, Type)>, ret: Type) -> FunctionSig {
    let mut sig = sig(params, ret);
    if let Some(last) = sig.params.last_mut() {
        last.variadic = true;
    }
    sig
}

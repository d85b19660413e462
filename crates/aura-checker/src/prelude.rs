//! Builtin globals, visible from every module without an import.

use aura_types::{NamedFunction, Type, Visibility};

use crate::stdlib::{sig, variadic_sig};
use crate::symbols::{Symbol, SymbolsTable};

/// The prelude's functions.
pub fn functions() -> Vec<NamedFunction> {
    use Type::*;
    let public = |name: &str, signature| aura_types::NamedFunction::new(name, Visibility::Public, signature);
    vec![
        public("print", sig(vec![("s", String)], Nil)),
        public("println", sig(vec![("s", String)], Nil)),
        public(
            "printf",
            variadic_sig(vec![("format", String), ("args", Any)], Nil),
        ),
        public("to_string", sig(vec![("value", Any)], String)),
        public("err", sig(vec![("message", String)], Error)),
        public("exit", sig(vec![("code", Int)], Nil)),
    ]
}

/// Register every builtin under `namespace`.
pub fn register(symbols: &mut SymbolsTable, namespace: &str) {
    for function in functions() {
        let name = function.name.clone();
        symbols.try_add_symbol(Symbol::new(name, Type::NamedFunction(function), namespace));
    }
}

//! Builtins and special forms, and the root environment they populate.
//!
//! Each submodule registers its functions with `inventory::submit!` at
//! load time rather than through an explicit `register_*` call list — the
//! root environment is built by iterating whatever got submitted, the
//! same "collect everything tagged for this purpose" shape the rest of
//! the crate's global state (the value pool, the strict-mode flag) uses.

use std::rc::Rc;

use crate::env::Environment;
use crate::value::{BuiltinFn, SpecialFormFn, Value};

pub mod arithmetic;
pub mod comparison;
pub mod core;
pub mod lists;
pub mod types;

/// A builtin registered for collection into the root environment.
/// Arguments are pre-evaluated by the evaluator before the host function
/// sees them (§4.G).
pub struct BuiltinReg {
    pub name: &'static str,
    pub func: BuiltinFn,
}
inventory::collect!(BuiltinReg);

/// A special form registered for collection into the root environment.
/// The evaluator passes its argument forms unevaluated (§4.E).
pub struct SpecialFormReg {
    pub name: &'static str,
    pub func: SpecialFormFn,
}
inventory::collect!(SpecialFormReg);

const TAG_SYMBOLS: &[&str] = &[
    "#nil",
    "#number",
    "#string",
    "#boolean",
    "#procedure",
    "#special-form",
    "#builtin",
    "#symbol",
    "#list",
    "#macro",
];

/// Builds a fresh root environment: every collected builtin and special
/// form, the `t`/`f`/`nil` constants, and the tag symbols each bound to
/// themselves (§6's "root-env preloaded names").
pub fn root_env() -> Rc<Environment> {
    let env = Environment::new();

    for reg in inventory::iter::<BuiltinReg> {
        env.define(reg.name.to_string(), Value::builtin(reg.func));
    }
    for reg in inventory::iter::<SpecialFormReg> {
        env.define(reg.name.to_string(), Value::special_form(reg.func));
    }

    env.define("t".to_string(), Value::boolean(true));
    env.define("f".to_string(), Value::boolean(false));
    env.define("nil".to_string(), Value::nil());

    for tag in TAG_SYMBOLS {
        let sym = Value::symbol(*tag).expect("tag symbol names are static and well-formed");
        env.define(tag.to_string(), sym);
    }

    env
}

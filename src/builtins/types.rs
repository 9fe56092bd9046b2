//! Type predicates: `nil? number? string? boolean? procedure? special-form?
//! builtin? symbol? list? macro?` — one per §3 variant, matching the tags
//! `tag` (in `core.rs`) returns.

use std::rc::Rc;

use crate::builtins::BuiltinReg;
use crate::env::Environment;
use crate::error::{EvalError, ARITY_ONE};
use crate::value::{Value, ValueKind};

fn predicate(name: &str, args: &[Value], test: impl Fn(&ValueKind) -> bool) -> Result<Value, EvalError> {
    match args {
        [v] => Ok(Value::boolean(test(&v.kind))),
        _ => Err(EvalError::arity(name, ARITY_ONE, args.len())),
    }
}

pub fn builtin_nil_p(args: &[Value], _env: &Rc<Environment>) -> Result<Value, EvalError> {
    predicate("nil?", args, |k| matches!(k, ValueKind::Nil))
}

pub fn builtin_number_p(args: &[Value], _env: &Rc<Environment>) -> Result<Value, EvalError> {
    predicate("number?", args, |k| matches!(k, ValueKind::Number(_)))
}

pub fn builtin_string_p(args: &[Value], _env: &Rc<Environment>) -> Result<Value, EvalError> {
    predicate("string?", args, |k| matches!(k, ValueKind::String(_)))
}

pub fn builtin_boolean_p(args: &[Value], _env: &Rc<Environment>) -> Result<Value, EvalError> {
    predicate("boolean?", args, |k| matches!(k, ValueKind::Boolean(_)))
}

pub fn builtin_procedure_p(args: &[Value], _env: &Rc<Environment>) -> Result<Value, EvalError> {
    predicate("procedure?", args, |k| matches!(k, ValueKind::Procedure(_)))
}

pub fn builtin_special_form_p(args: &[Value], _env: &Rc<Environment>) -> Result<Value, EvalError> {
    predicate("special-form?", args, |k| matches!(k, ValueKind::SpecialForm(_)))
}

pub fn builtin_builtin_p(args: &[Value], _env: &Rc<Environment>) -> Result<Value, EvalError> {
    predicate("builtin?", args, |k| matches!(k, ValueKind::Builtin(_)))
}

pub fn builtin_symbol_p(args: &[Value], _env: &Rc<Environment>) -> Result<Value, EvalError> {
    predicate("symbol?", args, |k| matches!(k, ValueKind::Symbol(_)))
}

/// Nil counts as a (empty) list, same as `tag`'s `#list`/`#nil` split does
/// not preclude `'() ` from being list-shaped in the conventional sense.
pub fn builtin_list_p(args: &[Value], _env: &Rc<Environment>) -> Result<Value, EvalError> {
    predicate("list?", args, |k| matches!(k, ValueKind::Nil | ValueKind::Cons(_)))
}

pub fn builtin_macro_p(args: &[Value], _env: &Rc<Environment>) -> Result<Value, EvalError> {
    predicate("macro?", args, |k| matches!(k, ValueKind::Macro(_)))
}

inventory::submit! { BuiltinReg { name: "nil?", func: builtin_nil_p } }
inventory::submit! { BuiltinReg { name: "number?", func: builtin_number_p } }
inventory::submit! { BuiltinReg { name: "string?", func: builtin_string_p } }
inventory::submit! { BuiltinReg { name: "boolean?", func: builtin_boolean_p } }
inventory::submit! { BuiltinReg { name: "procedure?", func: builtin_procedure_p } }
inventory::submit! { BuiltinReg { name: "special-form?", func: builtin_special_form_p } }
inventory::submit! { BuiltinReg { name: "builtin?", func: builtin_builtin_p } }
inventory::submit! { BuiltinReg { name: "symbol?", func: builtin_symbol_p } }
inventory::submit! { BuiltinReg { name: "list?", func: builtin_list_p } }
inventory::submit! { BuiltinReg { name: "macro?", func: builtin_macro_p } }

#[cfg(test)]
mod tests {
    use super::*;

    fn env() -> Rc<Environment> {
        Environment::new()
    }

    #[test]
    fn nil_and_number_predicates() {
        assert_eq!(builtin_nil_p(&[Value::nil()], &env()).unwrap().as_boolean(), Some(true));
        assert_eq!(builtin_nil_p(&[Value::number(0.0)], &env()).unwrap().as_boolean(), Some(false));
        assert_eq!(builtin_number_p(&[Value::number(1.0)], &env()).unwrap().as_boolean(), Some(true));
    }

    #[test]
    fn list_predicate_accepts_nil_and_cons() {
        assert_eq!(builtin_list_p(&[Value::nil()], &env()).unwrap().as_boolean(), Some(true));
        let list = Value::list_owned(vec![Value::number(1.0)]).unwrap();
        assert_eq!(builtin_list_p(&[list], &env()).unwrap().as_boolean(), Some(true));
        assert_eq!(builtin_list_p(&[Value::number(1.0)], &env()).unwrap().as_boolean(), Some(false));
    }

    #[test]
    fn symbol_string_boolean_predicates() {
        assert_eq!(
            builtin_symbol_p(&[Value::symbol("x").unwrap()], &env()).unwrap().as_boolean(),
            Some(true)
        );
        assert_eq!(
            builtin_string_p(&[Value::string("x").unwrap()], &env()).unwrap().as_boolean(),
            Some(true)
        );
        assert_eq!(
            builtin_boolean_p(&[Value::boolean(true)], &env()).unwrap().as_boolean(),
            Some(true)
        );
    }

    #[test]
    fn callable_predicates_distinguish_builtin_and_special_form() {
        let env_rc = crate::builtins::root_env();
        let builtin = env_rc.get("car").unwrap();
        let special_form = env_rc.get("if").unwrap();
        assert_eq!(builtin_builtin_p(&[builtin.clone()], &env()).unwrap().as_boolean(), Some(true));
        assert_eq!(builtin_special_form_p(&[builtin], &env()).unwrap().as_boolean(), Some(false));
        assert_eq!(builtin_special_form_p(&[special_form], &env()).unwrap().as_boolean(), Some(true));
    }

    #[test]
    fn wrong_arity_is_an_error() {
        assert!(matches!(builtin_nil_p(&[], &env()), Err(EvalError::ArityError { .. })));
    }
}

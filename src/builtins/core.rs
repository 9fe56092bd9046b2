//! Self-consistent surface builtins: `display`, `eval`, `tag`.

use std::rc::Rc;

use crate::builtins::BuiltinReg;
use crate::env::Environment;
use crate::error::{EvalError, ARITY_ONE};
use crate::eval::eval as eval_value;
use crate::value::Value;

/// `(display x)` — prints `x` via the canonical printer and returns it
/// unchanged, so `display` can sit inline in an expression without
/// disturbing its value.
pub fn builtin_display(args: &[Value], _env: &Rc<Environment>) -> Result<Value, EvalError> {
    match args {
        [v] => {
            println!("{}", v);
            Ok(v.clone())
        }
        _ => Err(EvalError::arity("display", ARITY_ONE, args.len())),
    }
}

/// `(eval x)` — evaluates `x` again under the current environment. `x`
/// arrives already evaluated once (every builtin's arguments are), so this
/// is a second pass: a bound variable holding constructed code actually
/// runs, while a value still carrying a quote level simply loses one more
/// layer rather than being looked up or applied (§9 open question 4).
pub fn builtin_eval(args: &[Value], env: &Rc<Environment>) -> Result<Value, EvalError> {
    match args {
        [v] => eval_value(v.clone(), env),
        _ => Err(EvalError::arity("eval", ARITY_ONE, args.len())),
    }
}

/// `(tag x)` — the canonical tag symbol for `x`'s variant (§6), e.g.
/// `(tag 1)` => `#number`, `(tag car)` => `#builtin`.
pub fn builtin_tag(args: &[Value], _env: &Rc<Environment>) -> Result<Value, EvalError> {
    match args {
        [v] => Value::symbol(v.tag_name()),
        _ => Err(EvalError::arity("tag", ARITY_ONE, args.len())),
    }
}

inventory::submit! { BuiltinReg { name: "display", func: builtin_display } }
inventory::submit! { BuiltinReg { name: "eval", func: builtin_eval } }
inventory::submit! { BuiltinReg { name: "tag", func: builtin_tag } }

#[cfg(test)]
mod tests {
    use super::*;

    fn env() -> Rc<Environment> {
        Environment::new()
    }

    #[test]
    fn display_returns_its_argument() {
        let args = vec![Value::number(5.0)];
        assert_eq!(builtin_display(&args, &env()).unwrap().as_number(), Some(5.0));
    }

    #[test]
    fn eval_on_bound_constructed_code_runs_it() {
        let env = crate::builtins::root_env();
        crate::eval::eval(crate::parser::parse("(define code (list '+ 1 2))").unwrap(), &env).unwrap();
        let v = crate::eval::eval(crate::parser::parse("(eval code)").unwrap(), &env).unwrap();
        assert_eq!(v.as_number(), Some(3.0));
    }

    #[test]
    fn eval_on_a_single_quoted_symbol_looks_it_up() {
        let env = crate::builtins::root_env();
        crate::eval::eval(crate::parser::parse("(define x 99)").unwrap(), &env).unwrap();
        let v = crate::eval::eval(crate::parser::parse("(eval 'x)").unwrap(), &env).unwrap();
        assert_eq!(v.as_number(), Some(99.0));
    }

    #[test]
    fn tag_names_match_section_6() {
        let args = vec![Value::number(1.0)];
        assert_eq!(builtin_tag(&args, &env()).unwrap().as_symbol(), Some("#number"));
        let args = vec![Value::nil()];
        assert_eq!(builtin_tag(&args, &env()).unwrap().as_symbol(), Some("#nil"));
    }

    #[test]
    fn wrong_arity_is_an_error() {
        assert!(matches!(
            builtin_eval(&[], &env()),
            Err(EvalError::ArityError { .. })
        ));
    }
}

//! Arithmetic builtins: `+ - * / %`.
//!
//! All five fold left over at least one Number argument, the first operand
//! acting as seed rather than an operator identity (§9 open question 3):
//! `(- 10 1 2) = 7`, not `10 - (1 - 2)`.

use std::rc::Rc;

use crate::builtins::BuiltinReg;
use crate::env::Environment;
use crate::error::{EvalError, ARITY_AT_LEAST_ONE};
use crate::value::Value;

fn numbers(name: &str, args: &[Value]) -> Result<Vec<f64>, EvalError> {
    if args.is_empty() {
        return Err(EvalError::arity(name, ARITY_AT_LEAST_ONE, 0));
    }
    args.iter()
        .map(|v| v.as_number().ok_or_else(|| EvalError::type_error(name, "expected a number")))
        .collect()
}

fn fold(name: &str, args: &[Value], op: impl Fn(f64, f64) -> f64) -> Result<Value, EvalError> {
    let nums = numbers(name, args)?;
    let mut acc = nums[0];
    for n in &nums[1..] {
        acc = op(acc, *n);
    }
    Ok(Value::number(acc))
}

/// `(+ 1 2 3) => 6`, `(+ 10) => 10`.
pub fn builtin_add(args: &[Value], _env: &Rc<Environment>) -> Result<Value, EvalError> {
    fold("+", args, |a, b| a + b)
}

/// `(- 10 3 2) => 5`, `(- 5) => 5` (single argument is the fold seed, not a negation).
pub fn builtin_sub(args: &[Value], _env: &Rc<Environment>) -> Result<Value, EvalError> {
    fold("-", args, |a, b| a - b)
}

/// `(* 2 3 4) => 24`, `(*) ` is an arity error (≥1 required, unlike many Lisps' nullary identity).
pub fn builtin_mul(args: &[Value], _env: &Rc<Environment>) -> Result<Value, EvalError> {
    fold("*", args, |a, b| a * b)
}

/// `(/ 20 4) => 5`, `(/ 100 2 5) => 10`.
pub fn builtin_div(args: &[Value], _env: &Rc<Environment>) -> Result<Value, EvalError> {
    fold("/", args, |a, b| a / b)
}

/// `(% 17 5) => 2`. IEEE-754 remainder via Rust's `%`.
pub fn builtin_mod(args: &[Value], _env: &Rc<Environment>) -> Result<Value, EvalError> {
    fold("%", args, |a, b| a % b)
}

inventory::submit! { BuiltinReg { name: "+", func: builtin_add } }
inventory::submit! { BuiltinReg { name: "-", func: builtin_sub } }
inventory::submit! { BuiltinReg { name: "*", func: builtin_mul } }
inventory::submit! { BuiltinReg { name: "/", func: builtin_div } }
inventory::submit! { BuiltinReg { name: "%", func: builtin_mod } }

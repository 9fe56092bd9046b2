//! Comparison builtins: `< > = <= >= != symbol-eq string-eq`.
//!
//! The ordering operators (`< > <= >=`) are numbers-only; `=`/`!=` also
//! accept a pair of booleans. `symbol-eq`/`string-eq` compare by name and
//! by byte content respectively — there is no generic `eq`/`equal` in
//! §4.G's table, only these tag-specific comparisons.

use std::rc::Rc;

use crate::builtins::BuiltinReg;
use crate::env::Environment;
use crate::error::{EvalError, ARITY_TWO};
use crate::value::Value;

fn two_numbers(name: &str, args: &[Value]) -> Result<(f64, f64), EvalError> {
    match args {
        [a, b] => {
            let a = a.as_number().ok_or_else(|| EvalError::type_error(name, "expected a number"))?;
            let b = b.as_number().ok_or_else(|| EvalError::type_error(name, "expected a number"))?;
            Ok((a, b))
        }
        _ => Err(EvalError::arity(name, ARITY_TWO, args.len())),
    }
}

fn numeric_cmp(name: &str, args: &[Value], op: impl Fn(f64, f64) -> bool) -> Result<Value, EvalError> {
    let (a, b) = two_numbers(name, args)?;
    Ok(Value::boolean(op(a, b)))
}

/// `=` and `!=` accept two numbers or two booleans; any other pairing, or
/// mismatched tags, is a type error.
fn eq_like(name: &str, args: &[Value], negate: bool) -> Result<Value, EvalError> {
    match args {
        [a, b] => {
            let equal = match (a.as_number(), b.as_number()) {
                (Some(x), Some(y)) => x == y,
                _ => match (a.as_boolean(), b.as_boolean()) {
                    (Some(x), Some(y)) => x == y,
                    _ => return Err(EvalError::type_error(name, "expected two numbers or two booleans")),
                },
            };
            Ok(Value::boolean(equal != negate))
        }
        _ => Err(EvalError::arity(name, ARITY_TWO, args.len())),
    }
}

pub fn builtin_lt(args: &[Value], _env: &Rc<Environment>) -> Result<Value, EvalError> {
    numeric_cmp("<", args, |a, b| a < b)
}

pub fn builtin_gt(args: &[Value], _env: &Rc<Environment>) -> Result<Value, EvalError> {
    numeric_cmp(">", args, |a, b| a > b)
}

pub fn builtin_le(args: &[Value], _env: &Rc<Environment>) -> Result<Value, EvalError> {
    numeric_cmp("<=", args, |a, b| a <= b)
}

pub fn builtin_ge(args: &[Value], _env: &Rc<Environment>) -> Result<Value, EvalError> {
    numeric_cmp(">=", args, |a, b| a >= b)
}

pub fn builtin_eq(args: &[Value], _env: &Rc<Environment>) -> Result<Value, EvalError> {
    eq_like("=", args, false)
}

pub fn builtin_ne(args: &[Value], _env: &Rc<Environment>) -> Result<Value, EvalError> {
    eq_like("!=", args, true)
}

/// `(symbol-eq 'a 'a) => t` — compares two symbols by name.
pub fn builtin_symbol_eq(args: &[Value], _env: &Rc<Environment>) -> Result<Value, EvalError> {
    match args {
        [a, b] => {
            let a = a.as_symbol().ok_or_else(|| EvalError::type_error("symbol-eq", "expected a symbol"))?;
            let b = b.as_symbol().ok_or_else(|| EvalError::type_error("symbol-eq", "expected a symbol"))?;
            Ok(Value::boolean(a == b))
        }
        _ => Err(EvalError::arity("symbol-eq", ARITY_TWO, args.len())),
    }
}

/// `(string-eq "a" "a") => t` — compares two strings byte-for-byte.
pub fn builtin_string_eq(args: &[Value], _env: &Rc<Environment>) -> Result<Value, EvalError> {
    match args {
        [a, b] => {
            let a = a.as_string().ok_or_else(|| EvalError::type_error("string-eq", "expected a string"))?;
            let b = b.as_string().ok_or_else(|| EvalError::type_error("string-eq", "expected a string"))?;
            Ok(Value::boolean(a == b))
        }
        _ => Err(EvalError::arity("string-eq", ARITY_TWO, args.len())),
    }
}

inventory::submit! { BuiltinReg { name: "<", func: builtin_lt } }
inventory::submit! { BuiltinReg { name: ">", func: builtin_gt } }
inventory::submit! { BuiltinReg { name: "<=", func: builtin_le } }
inventory::submit! { BuiltinReg { name: ">=", func: builtin_ge } }
inventory::submit! { BuiltinReg { name: "=", func: builtin_eq } }
inventory::submit! { BuiltinReg { name: "!=", func: builtin_ne } }
inventory::submit! { BuiltinReg { name: "symbol-eq", func: builtin_symbol_eq } }
inventory::submit! { BuiltinReg { name: "string-eq", func: builtin_string_eq } }

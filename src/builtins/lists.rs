//! List builtins: `cons car cdr list prepend append`.
//!
//! `length` and `empty?` are deliberately absent — the builtin surface
//! stops exactly at §4.G's table, not at "every convenience a Lisp usually
//! ships with".

use std::rc::Rc;

use crate::builtins::BuiltinReg;
use crate::env::Environment;
use crate::error::{EvalError, ARITY_ONE, ARITY_TWO};
use crate::eval::list_elements;
use crate::value::Value;

fn as_list(name: &str, v: &Value) -> Result<Vec<Value>, EvalError> {
    list_elements(v).map_err(|_| EvalError::type_error(name, "expected a proper list"))
}

/// `(cons a b) => (a . b)`. Unlike `list`/`prepend`/`append`, the result
/// need not terminate in Nil — `cons` builds any pair.
pub fn builtin_cons(args: &[Value], _env: &Rc<Environment>) -> Result<Value, EvalError> {
    match args {
        [car, cdr] => Value::cons(car.clone(), cdr.clone()),
        _ => Err(EvalError::arity("cons", ARITY_TWO, args.len())),
    }
}

/// `(car (a b c)) => a`. Nil has no first element.
pub fn builtin_car(args: &[Value], _env: &Rc<Environment>) -> Result<Value, EvalError> {
    match args {
        [v] => match v.as_cons() {
            Some(cell) => Ok(cell.car.clone()),
            None if v.is_nil() => Err(EvalError::type_error("car", "empty list has no first element")),
            None => Err(EvalError::type_error("car", "expected a list")),
        },
        _ => Err(EvalError::arity("car", ARITY_ONE, args.len())),
    }
}

/// `(cdr (a b c)) => (b c)`; `(cdr (a)) => nil`.
pub fn builtin_cdr(args: &[Value], _env: &Rc<Environment>) -> Result<Value, EvalError> {
    match args {
        [v] => match v.as_cons() {
            Some(cell) => Ok(cell.cdr.clone()),
            None if v.is_nil() => Err(EvalError::type_error("cdr", "empty list has no rest")),
            None => Err(EvalError::type_error("cdr", "expected a list")),
        },
        _ => Err(EvalError::arity("cdr", ARITY_ONE, args.len())),
    }
}

/// `(list 1 2 3) => (1 2 3)`; `(list) => nil`.
pub fn builtin_list(args: &[Value], _env: &Rc<Environment>) -> Result<Value, EvalError> {
    Value::list_owned(args.to_vec())
}

/// `(prepend (2 3) 1) => (1 2 3)` — `x` becomes the new first element.
pub fn builtin_prepend(args: &[Value], _env: &Rc<Environment>) -> Result<Value, EvalError> {
    match args {
        [list, x] => {
            as_list("prepend", list)?;
            Value::cons(x.clone(), list.clone())
        }
        _ => Err(EvalError::arity("prepend", ARITY_TWO, args.len())),
    }
}

/// `(append (1 2) 3) => (1 2 3)` — `x` becomes the new last element.
pub fn builtin_append(args: &[Value], _env: &Rc<Environment>) -> Result<Value, EvalError> {
    match args {
        [list, x] => {
            let mut items = as_list("append", list)?;
            items.push(x.clone());
            Value::list_owned(items)
        }
        _ => Err(EvalError::arity("append", ARITY_TWO, args.len())),
    }
}

inventory::submit! { BuiltinReg { name: "cons", func: builtin_cons } }
inventory::submit! { BuiltinReg { name: "car", func: builtin_car } }
inventory::submit! { BuiltinReg { name: "cdr", func: builtin_cdr } }
inventory::submit! { BuiltinReg { name: "list", func: builtin_list } }
inventory::submit! { BuiltinReg { name: "prepend", func: builtin_prepend } }
inventory::submit! { BuiltinReg { name: "append", func: builtin_append } }

#[cfg(test)]
mod tests {
    use super::*;

    fn env() -> Rc<Environment> {
        Environment::new()
    }

    #[test]
    fn cons_builds_a_pair_that_may_be_improper() {
        let args = vec![Value::number(1.0), Value::number(2.0)];
        let pair = builtin_cons(&args, &env()).unwrap();
        assert_eq!(format!("{}", pair), "(1 . 2)");
    }

    #[test]
    fn car_and_cdr_split_a_list() {
        let list = Value::list_owned(vec![Value::number(1.0), Value::number(2.0), Value::number(3.0)]).unwrap();
        let args = vec![list.clone()];
        assert_eq!(builtin_car(&args, &env()).unwrap().as_number(), Some(1.0));
        let rest = builtin_cdr(&args, &env()).unwrap();
        assert_eq!(format!("{}", rest), "(2 3)");
    }

    #[test]
    fn cdr_of_singleton_is_nil() {
        let list = Value::list_owned(vec![Value::number(1.0)]).unwrap();
        let args = vec![list];
        assert!(builtin_cdr(&args, &env()).unwrap().is_nil());
    }

    #[test]
    fn car_of_nil_is_a_type_error() {
        let args = vec![Value::nil()];
        assert!(matches!(builtin_car(&args, &env()), Err(EvalError::TypeError { .. })));
    }

    #[test]
    fn list_builds_a_proper_list_from_its_arguments() {
        let args = vec![Value::number(1.0), Value::number(2.0)];
        let list = builtin_list(&args, &env()).unwrap();
        assert_eq!(format!("{}", list), "(1 2)");

        let empty = builtin_list(&[], &env()).unwrap();
        assert!(empty.is_nil());
    }

    #[test]
    fn prepend_adds_to_the_front() {
        let list = Value::list_owned(vec![Value::number(2.0), Value::number(3.0)]).unwrap();
        let args = vec![list, Value::number(1.0)];
        let result = builtin_prepend(&args, &env()).unwrap();
        assert_eq!(format!("{}", result), "(1 2 3)");
    }

    #[test]
    fn append_adds_to_the_back() {
        let list = Value::list_owned(vec![Value::number(1.0), Value::number(2.0)]).unwrap();
        let args = vec![list, Value::number(3.0)];
        let result = builtin_append(&args, &env()).unwrap();
        assert_eq!(format!("{}", result), "(1 2 3)");
    }

    #[test]
    fn prepend_rejects_a_non_list_first_argument() {
        let args = vec![Value::number(1.0), Value::number(2.0)];
        assert!(matches!(builtin_prepend(&args, &env()), Err(EvalError::TypeError { .. })));
    }
}

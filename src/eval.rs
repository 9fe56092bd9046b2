// ABOUTME: Evaluator — dispatches on value tag, applies special forms,
// procedures, macros and builtins, and carries out `&rest` parameter binding.

use std::rc::Rc;

use crate::builtins::SpecialFormReg;
use crate::config;
use crate::env::Environment;
use crate::error::{EvalError, ARITY_ONE, ARITY_THREE, ARITY_TWO};
use crate::value::{ConsCell, Heap, Value, ValueKind};

/// `eval(v, env)` per §4.D: a positive quote level suppresses evaluation
/// and is consumed one layer before any tag dispatch happens.
pub fn eval(value: Value, env: &Rc<Environment>) -> Result<Value, EvalError> {
    if value.quote_level > 0 {
        return Ok(value.quoted(value.quote_level - 1));
    }

    match &value.kind {
        ValueKind::Nil
        | ValueKind::Number(_)
        | ValueKind::String(_)
        | ValueKind::Boolean(_)
        | ValueKind::Procedure(_)
        | ValueKind::Macro(_)
        | ValueKind::Builtin(_)
        | ValueKind::SpecialForm(_) => Ok(value.clone()),

        ValueKind::Symbol(name) => match env.get(name.as_str()) {
            Some(bound) => Ok(bound),
            None if config::is_strict() => {
                Err(EvalError::UnboundSymbol(name.as_str().to_string()))
            }
            None => Ok(Value::nil()),
        },

        ValueKind::Cons(cell) => eval_combination(cell, env),
    }
}

fn eval_combination(cell: &Heap<ConsCell>, env: &Rc<Environment>) -> Result<Value, EvalError> {
    let callee = eval(cell.car.clone(), env)?;
    let rest = list_elements(&cell.cdr)?;

    match &callee.kind {
        ValueKind::SpecialForm(f) => f(&rest, env),

        ValueKind::Builtin(f) => {
            let args = rest
                .into_iter()
                .map(|form| eval(form, env))
                .collect::<Result<Vec<_>, _>>()?;
            f(&args, env)
        }

        ValueKind::Procedure(data) => {
            let call_env = bind_params(&data.params, &rest, env, data.env.clone(), true, "procedure")?;
            eval(data.body.clone(), &call_env)
        }

        ValueKind::Macro(data) => {
            let call_env = bind_params(&data.params, &rest, env, data.env.clone(), false, "macro")?;
            let expansion = eval(data.body.clone(), &call_env)?;
            eval(expansion, env)
        }

        _ => Err(EvalError::NotCallable(format!("{}", callee))),
    }
}

/// Walks a proper cons-list Value (`Nil`-terminated) into its elements.
/// Used both to read the unevaluated rest-forms of a combination and to
/// decompose list-shaped syntax (parameter lists, `cond` clauses).
pub fn list_elements(v: &Value) -> Result<Vec<Value>, EvalError> {
    let mut items = Vec::new();
    let mut cursor = v.clone();
    loop {
        match cursor.kind {
            ValueKind::Nil => break,
            ValueKind::Cons(cell) => {
                items.push(cell.car.clone());
                cursor = cell.cdr.clone();
            }
            _ => return Err(EvalError::type_error("eval", "expected a proper list")),
        }
    }
    Ok(items)
}

fn parse_param_list(v: &Value, form: &str) -> Result<Vec<String>, EvalError> {
    list_elements(v)?
        .into_iter()
        .map(|p| {
            p.as_symbol()
                .map(|s| s.to_string())
                .ok_or_else(|| EvalError::type_error(form, "parameter must be a symbol"))
        })
        .collect()
}

/// Binds `arg_forms` to `params` under a fresh child of `captured_env`, per
/// §4.F's lockstep walk. Fixed parameters are paired with argument forms
/// one at a time and, when `evaluate` is set (Procedures; Macros pass
/// `false`), evaluated under `caller_env` exactly as each pair is
/// consumed — never gathered up front. A length mismatch with no `&rest`
/// is therefore detected without ever evaluating an argument form past the
/// last one a parameter could claim: this mirrors the original source's
/// lambda-binding loop (`while (!value_isnil(args) &&
/// !value_isnil(arg_names))`), which walks both lists in lockstep and
/// simply never reaches an argument beyond the last bound parameter.
fn bind_params(
    params: &[String],
    arg_forms: &[Value],
    caller_env: &Rc<Environment>,
    captured_env: Rc<Environment>,
    evaluate: bool,
    form: &str,
) -> Result<Rc<Environment>, EvalError> {
    let call_env = Environment::with_parent(captured_env);
    let rest_pos = params.iter().position(|p| p == "&rest");
    let fixed = match rest_pos {
        Some(pos) => &params[..pos],
        None => params,
    };

    // Pair and bind only as many fixed parameters as both sides have —
    // this is the lockstep walk, and it's what keeps an unconsumed extra
    // argument form from ever reaching `eval`.
    let paired = fixed.len().min(arg_forms.len());
    for (name, form_value) in fixed[..paired].iter().zip(&arg_forms[..paired]) {
        let value = if evaluate {
            eval(form_value.clone(), caller_env)?
        } else {
            form_value.clone()
        };
        call_env.define(name.clone(), value);
    }

    match rest_pos {
        Some(pos) => {
            if arg_forms.len() < fixed.len() {
                return Err(EvalError::arity(
                    form,
                    format!("at least {}", fixed.len()),
                    arg_forms.len(),
                ));
            }
            let rest_name = params.get(pos + 1).ok_or_else(|| {
                EvalError::type_error(form, "&rest must be followed by exactly one name")
            })?;
            let remaining = &arg_forms[fixed.len()..];
            let rest_items = if evaluate {
                remaining
                    .iter()
                    .cloned()
                    .map(|f| eval(f, caller_env))
                    .collect::<Result<Vec<_>, _>>()?
            } else {
                remaining.to_vec()
            };
            let rest_value = if rest_items.is_empty() {
                Value::nil()
            } else {
                Value::list_owned(rest_items)?
            };
            call_env.define(rest_name.clone(), rest_value);
        }
        None => {
            if arg_forms.len() != fixed.len() {
                return Err(EvalError::arity(form, fixed.len().to_string(), arg_forms.len()));
            }
        }
    }

    Ok(call_env)
}

/// Not in §4.E's special-form table — added so the reader's leading-`'`
/// sugar has a runtime counterpart a macro expansion can construct (see
/// scenario 5: `(list 'quote a)` builds a `(quote ...)` form that is later
/// evaluated as part of the macro's expansion). Returns its single
/// argument exactly as written, the same value a leading `'` would have
/// produced.
fn sf_quote(args: &[Value], _env: &Rc<Environment>) -> Result<Value, EvalError> {
    match args {
        [v] => Ok(v.clone()),
        _ => Err(EvalError::arity("quote", ARITY_ONE, args.len())),
    }
}

/// `(define NAME EXPR)` or `(define (NAME PARAM*) BODY)`.
fn sf_define(args: &[Value], env: &Rc<Environment>) -> Result<Value, EvalError> {
    if args.len() != 2 {
        return Err(EvalError::arity("define", ARITY_TWO, args.len()));
    }
    match &args[0].kind {
        ValueKind::Symbol(name) => {
            let value = eval(args[1].clone(), env)?;
            env.define(name.as_str().to_string(), value.clone());
            Ok(value)
        }
        ValueKind::Cons(_) => {
            let header = list_elements(&args[0])?;
            let (name_val, param_vals) = header
                .split_first()
                .ok_or_else(|| EvalError::type_error("define", "function form requires a name"))?;
            let name = name_val
                .as_symbol()
                .ok_or_else(|| EvalError::type_error("define", "function name must be a symbol"))?
                .to_string();
            let params = param_vals
                .iter()
                .map(|p| {
                    p.as_symbol()
                        .map(|s| s.to_string())
                        .ok_or_else(|| EvalError::type_error("define", "parameter must be a symbol"))
                })
                .collect::<Result<Vec<_>, _>>()?;
            let procedure = Value::procedure(params, args[1].clone(), env.clone())?;
            env.define(name, procedure.clone());
            Ok(procedure)
        }
        _ => Err(EvalError::type_error(
            "define",
            "first argument must be a symbol or a (name param*) list",
        )),
    }
}

/// `(define-macro (NAME PARAM*) BODY)`.
fn sf_define_macro(args: &[Value], env: &Rc<Environment>) -> Result<Value, EvalError> {
    if args.len() != 2 {
        return Err(EvalError::arity("define-macro", ARITY_TWO, args.len()));
    }
    let header = list_elements(&args[0])?;
    let (name_val, param_vals) = header
        .split_first()
        .ok_or_else(|| EvalError::type_error("define-macro", "macro form requires a name"))?;
    let name = name_val
        .as_symbol()
        .ok_or_else(|| EvalError::type_error("define-macro", "macro name must be a symbol"))?
        .to_string();
    let params = param_vals
        .iter()
        .map(|p| {
            p.as_symbol()
                .map(|s| s.to_string())
                .ok_or_else(|| EvalError::type_error("define-macro", "parameter must be a symbol"))
        })
        .collect::<Result<Vec<_>, _>>()?;
    let macro_value = Value::macro_(params, args[1].clone(), env.clone())?;
    env.define(name, macro_value.clone());
    Ok(macro_value)
}

fn sf_if(args: &[Value], env: &Rc<Environment>) -> Result<Value, EvalError> {
    match args {
        [cond, then, else_] => {
            if eval(cond.clone(), env)?.is_truthy() {
                eval(then.clone(), env)
            } else {
                eval(else_.clone(), env)
            }
        }
        _ => Err(EvalError::arity("if", ARITY_THREE, args.len())),
    }
}

fn sf_cond(args: &[Value], env: &Rc<Environment>) -> Result<Value, EvalError> {
    for clause in args {
        let parts = list_elements(clause)?;
        let (test, body) = match parts.as_slice() {
            [test, body] => (test, body),
            _ => return Err(EvalError::type_error("cond", "each clause is (test expr)")),
        };
        if eval(test.clone(), env)?.is_truthy() {
            return eval(body.clone(), env);
        }
    }
    Ok(Value::nil())
}

fn sf_and(args: &[Value], env: &Rc<Environment>) -> Result<Value, EvalError> {
    for form in args {
        if !eval(form.clone(), env)?.is_truthy() {
            return Ok(Value::boolean(false));
        }
    }
    Ok(Value::boolean(true))
}

fn sf_or(args: &[Value], env: &Rc<Environment>) -> Result<Value, EvalError> {
    for form in args {
        if eval(form.clone(), env)?.is_truthy() {
            return Ok(Value::boolean(true));
        }
    }
    Ok(Value::boolean(false))
}

fn sf_progn(args: &[Value], env: &Rc<Environment>) -> Result<Value, EvalError> {
    let mut result = Value::nil();
    for form in args {
        result = eval(form.clone(), env)?;
    }
    Ok(result)
}

inventory::submit! { SpecialFormReg { name: "quote", func: sf_quote } }
inventory::submit! { SpecialFormReg { name: "define", func: sf_define } }
inventory::submit! { SpecialFormReg { name: "define-macro", func: sf_define_macro } }
inventory::submit! { SpecialFormReg { name: "if", func: sf_if } }
inventory::submit! { SpecialFormReg { name: "cond", func: sf_cond } }
inventory::submit! { SpecialFormReg { name: "and", func: sf_and } }
inventory::submit! { SpecialFormReg { name: "or", func: sf_or } }
inventory::submit! { SpecialFormReg { name: "progn", func: sf_progn } }

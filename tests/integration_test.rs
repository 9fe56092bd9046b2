// ABOUTME: Integration tests verifying the reader, evaluator, and builtin
// surface work together end to end, per the documented scenarios and
// universal properties.

use lisp_core::env::Environment;
use lisp_core::error::EvalError;
use lisp_core::eval::eval;
use lisp_core::parser::parse;
use lisp_core::value::Value;
use lisp_core::{builtins, pool};
use std::rc::Rc;

fn run(code: &str, env: &Rc<Environment>) -> Value {
    eval(parse(code).unwrap(), env).unwrap()
}

// ===== End-to-end scenarios =====

#[test]
fn scenario_arithmetic_with_nested_folds_and_remainder() {
    let env = builtins::root_env();
    let result = run(
        "(+ 1 2 (+ 3 4) (/ 1 2) 5 (% 15.5 0.269) (+ (+ 1 2) 1))",
        &env,
    );
    let n = result.as_number().unwrap();
    assert!((n - 19.667).abs() < 1e-3, "got {}", n);
}

#[test]
fn scenario_recursive_factorial() {
    let env = builtins::root_env();
    let result = run(
        "(progn (define (factorial x) (if (> x 1) (* x (factorial (- x 1))) 1)) (factorial 5))",
        &env,
    );
    assert_eq!(result.as_number(), Some(120.0));
}

#[test]
fn scenario_hand_built_map_over_a_quoted_list() {
    let env = builtins::root_env();
    let result = run(
        "(progn \
           (define (map f l) (if (cdr l) (prepend (map f (cdr l)) (f (car l))) (list (f (car l))))) \
           (define (add1 x) (+ 1 x)) \
           (map add1 '(3 6 9)))",
        &env,
    );
    assert_eq!(format!("{}", result), "(4 7 10)");
    assert_eq!(result.format_top_level(), "'(4 7 10)");
}

#[test]
fn scenario_cond_falls_to_the_matching_clause() {
    let env = builtins::root_env();
    let result = run("(cond (f 15) ((> 15 2) 41) (t 42))", &env);
    assert_eq!(result.as_number(), Some(41.0));
}

#[test]
fn scenario_macro_builds_and_runs_a_symbol_eq_check() {
    let env = builtins::root_env();
    let result = run(
        "(progn \
           (define-macro (test a b) (list 'symbol-eq (list 'quote a) (list 'quote b))) \
           (test x x))",
        &env,
    );
    assert_eq!(result.as_boolean(), Some(true));
}

#[test]
fn scenario_rest_args_bundle_into_a_printable_list() {
    let env = builtins::root_env();
    let result = run("(progn (define (f &rest xs) xs) (f 1 2 3))", &env);
    assert_eq!(result.format_top_level(), "'(1 2 3)");
}

// ===== Universal properties (§8) =====

#[test]
fn reader_round_trips_through_print() {
    for src in ["42", "-2.5", "\"hi\"", "foo", "(1 2 3)", "'(1 2 3)", "nil", "t", "f"] {
        let v = parse(src).unwrap();
        let printed = format!("{}", v);
        let reparsed = parse(&printed).unwrap();
        assert_eq!(printed, format!("{}", reparsed));
    }
}

#[test]
fn quote_identity_round_trips_through_eval() {
    let env = builtins::root_env();
    let v = parse("(1 2 3)").unwrap();
    let printed = format!("{}", v);
    let requoted = parse(&format!("'{}", printed)).unwrap();
    let evaluated = eval(requoted, &env).unwrap();
    assert_eq!(format!("{}", evaluated), printed);
}

#[test]
fn atoms_are_idempotent_under_eval() {
    let env = builtins::root_env();
    for src in ["42", "\"hi\"", "t", "f", "nil"] {
        let v = parse(src).unwrap();
        let once = eval(v.clone(), &env).unwrap();
        assert_eq!(format!("{}", once), format!("{}", v));
    }
}

#[test]
fn truthiness_agrees_with_if() {
    let env = builtins::root_env();
    let truthy = ["1", "\"x\"", "t", "(1 2)", "unbound-symbol-is-truthy"];
    for src in truthy {
        let result = eval(parse(&format!("(if {} t f)", src)).unwrap(), &env).unwrap();
        assert_eq!(result.as_boolean(), Some(true), "expected {} to be truthy", src);
    }
    let falsy = ["0", "\"\"", "f", "nil"];
    for src in falsy {
        let result = eval(parse(&format!("(if {} t f)", src)).unwrap(), &env).unwrap();
        assert_eq!(result.as_boolean(), Some(false), "expected {} to be falsy", src);
    }
}

#[test]
fn pool_in_use_returns_to_baseline_after_a_closed_expression() {
    let env = builtins::root_env();
    pool::reset();
    let baseline = pool::in_use();
    // The list and its elements are temporaries of this one expression;
    // once its result is dropped, in-use falls back to the baseline.
    let result = run("(car (list 1 2 3))", &env);
    drop(result);
    assert_eq!(pool::in_use(), baseline);
}

#[test]
fn lexical_scope_is_fixed_at_definition_not_call_site() {
    let env = builtins::root_env();
    run("(define y 1)", &env);
    run("(define (f) y)", &env);
    let caller = Environment::with_parent(env.clone());
    caller.define("y".to_string(), Value::number(999.0));
    let result = eval(parse("(f)").unwrap(), &caller).unwrap();
    assert_eq!(result.as_number(), Some(1.0));
}

#[test]
fn arity_mismatch_does_not_corrupt_the_environment() {
    let env = builtins::root_env();
    run("(define (f a b) (+ a b))", &env);
    let result = eval(parse("(f 1)").unwrap(), &env);
    assert!(matches!(result, Err(EvalError::ArityError { .. })));
    // The environment is still usable for a correct call after the failure.
    let result = run("(f 1 2)", &env);
    assert_eq!(result.as_number(), Some(3.0));
}

#[test]
fn extra_argument_beyond_fixed_arity_is_rejected_without_evaluating_it() {
    // A fixed-arity procedure called with one argument too many must fail
    // with ArityError without ever evaluating the unconsumed extra form —
    // §4.F binds parameters in lockstep with argument forms and only
    // checks the count once parameters run out. A malformed extra
    // argument (`(+ 1 "two")` raises TypeError if evaluated) proves the
    // point: surfacing TypeError here would mean the implementation
    // evaluated past the last bound parameter before reporting arity.
    let env = builtins::root_env();
    run("(define (f x) x)", &env);
    let result = eval(parse("(f 1 (+ 1 \"two\"))").unwrap(), &env);
    match result {
        Err(EvalError::ArityError { expected, actual, .. }) => {
            assert_eq!(expected, "1");
            assert_eq!(actual, 2);
        }
        other => panic!("expected ArityError, got {:?}", other),
    }
}

// ===== Error handling (§7) =====

#[test]
fn unbound_symbols_resolve_to_nil_by_default() {
    let env = builtins::root_env();
    assert!(run("totally-undefined-name", &env).is_nil());
}

#[test]
fn type_errors_abort_evaluation_cleanly() {
    let env = builtins::root_env();
    let result = eval(parse("(+ 1 \"two\")").unwrap(), &env);
    assert!(matches!(result, Err(EvalError::TypeError { .. })));
}

#[test]
fn calling_a_non_callable_head_is_not_callable() {
    let env = builtins::root_env();
    let result = eval(parse("(42 1 2)").unwrap(), &env);
    assert!(matches!(result, Err(EvalError::NotCallable(_))));
}

// ===== Builtin surface (§4.G), exercised together rather than in isolation =====

#[test]
fn list_and_predicate_builtins_compose() {
    let env = builtins::root_env();
    assert_eq!(run("(list? (list 1 2 3))", &env).as_boolean(), Some(true));
    assert_eq!(run("(list? 5)", &env).as_boolean(), Some(false));
    assert_eq!(run("(car (cons 1 (list 2 3)))", &env).as_number(), Some(1.0));
    assert_eq!(
        format!("{}", run("(append (prepend (list 2 3) 1) 4)", &env)),
        "(1 2 3 4)"
    );
}

#[test]
fn tag_and_type_predicates_agree() {
    let env = builtins::root_env();
    assert_eq!(run("(tag 1)", &env).as_symbol(), Some("#number"));
    assert_eq!(run("(number? 1)", &env).as_boolean(), Some(true));
    assert_eq!(run("(tag car)", &env).as_symbol(), Some("#builtin"));
    assert_eq!(run("(builtin? car)", &env).as_boolean(), Some(true));
    assert_eq!(run("(tag if)", &env).as_symbol(), Some("#special-form"));
    assert_eq!(run("(special-form? if)", &env).as_boolean(), Some(true));
}

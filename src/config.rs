// ABOUTME: Configuration and constants for the Lisp evaluation core
// This module contains version info, welcome messages, and evaluator tunables

pub const VERSION: &str = "0.1.0";
pub const WELCOME_MESSAGE: &str = "lisp-core v0.1";
pub const WELCOME_SUBTITLE: &str = "A small Lisp evaluation core: reader, environment, evaluator";

/// Default capacity of the value pool (component A). The exploratory
/// drafts this design consolidates used 10,000 slots.
pub const DEFAULT_POOL_CAPACITY: usize = 10_000;

use std::cell::Cell;

thread_local! {
    static STRICT: Cell<bool> = Cell::new(false);
}

/// Toggles strict symbol resolution for the current thread. When strict,
/// an unbound symbol raises `EvalError::UnboundSymbol`; otherwise (the
/// default) it resolves to Nil, matching the documented quirk.
pub fn set_strict(strict: bool) {
    STRICT.with(|s| s.set(strict));
}

pub fn is_strict() -> bool {
    STRICT.with(|s| s.get())
}

pub const HELP_TEXT: &str = r#"
Available commands:
  (quit) or (exit)     - Exit the REPL
  (clear)               - Clear the screen
  (help)                - Show this message

Type any Lisp expression to evaluate it. Use Ctrl-D or (quit) to exit.
"#;

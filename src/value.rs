// ABOUTME: Value types representing Lisp data and code: the tagged sum of
// component A, its bounded-pool allocation via `Heap<T>`, and the printer.

use std::fmt;
use std::rc::Rc;

use crate::env::Environment;
use crate::error::EvalError;
use crate::pool::Slot;

/// A host function bridging into a builtin. Arguments are pre-evaluated by
/// the evaluator before the call.
pub type BuiltinFn = fn(&[Value], &Rc<Environment>) -> Result<Value, EvalError>;

/// A host function implementing a special form. The evaluator passes its
/// arguments unevaluated.
pub type SpecialFormFn = fn(&[Value], &Rc<Environment>) -> Result<Value, EvalError>;

/// A heap-resident payload, reference-counted and accounted against the
/// bounded pool (component A). Cloning a `Heap<T>` is a cheap `Rc::clone`
/// that does not consume additional pool capacity — this is how Cons's
/// "shared by increment" clone rule is realized.
pub struct Heap<T>(Rc<HeapInner<T>>);

struct HeapInner<T> {
    _slot: Slot,
    payload: T,
}

impl<T> Heap<T> {
    pub fn new(payload: T) -> Result<Self, EvalError> {
        let slot = Slot::acquire()?;
        Ok(Heap(Rc::new(HeapInner {
            _slot: slot,
            payload,
        })))
    }
}

impl<T> Clone for Heap<T> {
    fn clone(&self) -> Self {
        Heap(Rc::clone(&self.0))
    }
}

impl<T> std::ops::Deref for Heap<T> {
    type Target = T;
    fn deref(&self) -> &T {
        &self.0.payload
    }
}

/// Two cons cells are the same Value if their payloads hold the same
/// address — used only internally (e.g. cycle-free traversal is assumed,
/// see §3); structural equality is `structural_eq`, not this.
impl<T> Heap<T> {
    pub fn ptr_eq(a: &Heap<T>, b: &Heap<T>) -> bool {
        Rc::ptr_eq(&a.0, &b.0)
    }
}

pub struct ConsCell {
    pub car: Value,
    pub cdr: Value,
}

pub struct ProcedureData {
    /// Flat parameter names, optionally containing the sentinel `&rest`
    /// immediately before the final name.
    pub params: Vec<String>,
    pub body: Value,
    pub env: Rc<Environment>,
}

pub struct MacroData {
    pub params: Vec<String>,
    pub body: Value,
    pub env: Rc<Environment>,
}

#[derive(Clone)]
pub enum ValueKind {
    Nil,
    Number(f64),
    String(Heap<String>),
    Boolean(bool),
    Symbol(Heap<String>),
    Cons(Heap<ConsCell>),
    Procedure(Heap<ProcedureData>),
    Macro(Heap<MacroData>),
    Builtin(BuiltinFn),
    SpecialForm(SpecialFormFn),
}

/// Every Value carries a quote level alongside its tagged-sum payload
/// (§3): a positive level suppresses evaluation and is consumed one layer
/// per `eval` call. Only the reader (leading `'` characters) and the
/// `quote` special form ever produce a positive level — see `eval::eval`
/// for the consuming step.
#[derive(Clone)]
pub struct Value {
    pub kind: ValueKind,
    pub quote_level: u32,
}

impl Value {
    pub fn nil() -> Value {
        Value {
            kind: ValueKind::Nil,
            quote_level: 0,
        }
    }

    pub fn number(n: f64) -> Value {
        Value {
            kind: ValueKind::Number(n),
            quote_level: 0,
        }
    }

    pub fn boolean(b: bool) -> Value {
        Value {
            kind: ValueKind::Boolean(b),
            quote_level: 0,
        }
    }

    pub fn string(s: impl Into<String>) -> Result<Value, EvalError> {
        Ok(Value {
            kind: ValueKind::String(Heap::new(s.into())?),
            quote_level: 0,
        })
    }

    pub fn symbol(name: impl Into<String>) -> Result<Value, EvalError> {
        Ok(Value {
            kind: ValueKind::Symbol(Heap::new(name.into())?),
            quote_level: 0,
        })
    }

    pub fn cons(car: Value, cdr: Value) -> Result<Value, EvalError> {
        Ok(Value {
            kind: ValueKind::Cons(Heap::new(ConsCell { car, cdr })?),
            quote_level: 0,
        })
    }

    pub fn procedure(params: Vec<String>, body: Value, env: Rc<Environment>) -> Result<Value, EvalError> {
        Ok(Value {
            kind: ValueKind::Procedure(Heap::new(ProcedureData { params, body, env })?),
            quote_level: 0,
        })
    }

    pub fn macro_(params: Vec<String>, body: Value, env: Rc<Environment>) -> Result<Value, EvalError> {
        Ok(Value {
            kind: ValueKind::Macro(Heap::new(MacroData { params, body, env })?),
            quote_level: 0,
        })
    }

    pub fn builtin(f: BuiltinFn) -> Value {
        Value {
            kind: ValueKind::Builtin(f),
            quote_level: 0,
        }
    }

    pub fn special_form(f: SpecialFormFn) -> Value {
        Value {
            kind: ValueKind::SpecialForm(f),
            quote_level: 0,
        }
    }

    /// Returns a copy of self with the quote level set explicitly. Cheap —
    /// heap payloads are shared via `Heap::clone`, not duplicated.
    pub fn quoted(&self, level: u32) -> Value {
        Value {
            kind: self.kind.clone(),
            quote_level: level,
        }
    }

    /// Builds a right-nested cons chain from `items`, terminated in Nil —
    /// the same shape the reader produces for `(a b c)`, just assembled
    /// from already-built Values instead of text. Quote level 0, like any
    /// other freshly constructed Value: a list built by `list`/`prepend`/
    /// `append` or `&rest` bundling is exactly as evaluable as one the
    /// reader parsed, which is what lets `define-macro` expansions built
    /// with `(list 'some-head ...)` actually run as code (§8 scenario 5).
    pub fn list_owned(items: Vec<Value>) -> Result<Value, EvalError> {
        let mut acc = Value::nil();
        for item in items.into_iter().rev() {
            acc = Value::cons(item, acc)?;
        }
        Ok(acc)
    }

    pub fn is_nil(&self) -> bool {
        matches!(self.kind, ValueKind::Nil)
    }

    pub fn as_cons(&self) -> Option<&Heap<ConsCell>> {
        match &self.kind {
            ValueKind::Cons(cell) => Some(cell),
            _ => None,
        }
    }

    pub fn as_symbol(&self) -> Option<&str> {
        match &self.kind {
            ValueKind::Symbol(name) => Some(name.as_str()),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self.kind {
            ValueKind::Number(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_boolean(&self) -> Option<bool> {
        match self.kind {
            ValueKind::Boolean(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_string(&self) -> Option<&str> {
        match &self.kind {
            ValueKind::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Truthiness per §4.E: falsy iff Nil, `f`, the number 0, the empty
    /// string, the empty list, or the symbol named `f`; everything else is
    /// truthy.
    pub fn is_truthy(&self) -> bool {
        match &self.kind {
            ValueKind::Nil => false,
            ValueKind::Boolean(b) => *b,
            ValueKind::Number(n) => *n != 0.0,
            ValueKind::String(s) => !s.is_empty(),
            ValueKind::Symbol(name) => name.as_str() != "f",
            ValueKind::Cons(_) => true,
            ValueKind::Procedure(_)
            | ValueKind::Macro(_)
            | ValueKind::Builtin(_)
            | ValueKind::SpecialForm(_) => true,
        }
    }

    /// Renders a top-level result the way the REPL echoes it: a Cons or
    /// Symbol that isn't already quoted gets one quote prepended, so pasting
    /// the output back in reproduces the same value instead of invoking it
    /// as a combination or variable lookup. Self-evaluating kinds (numbers,
    /// strings, booleans, Nil) print exactly as `Display` already renders
    /// them. This is a display-time convenience only — it does not affect
    /// the value's actual `quote_level`, and nested elements of a printed
    /// list are never auto-quoted, only the outermost result.
    pub fn format_top_level(&self) -> String {
        if self.quote_level == 0 && matches!(self.kind, ValueKind::Cons(_) | ValueKind::Symbol(_)) {
            format!("'{}", self)
        } else {
            format!("{}", self)
        }
    }

    /// The canonical tag symbol for this value's variant (§6).
    pub fn tag_name(&self) -> &'static str {
        match &self.kind {
            ValueKind::Nil => "#nil",
            ValueKind::Number(_) => "#number",
            ValueKind::String(_) => "#string",
            ValueKind::Boolean(_) => "#boolean",
            ValueKind::Symbol(_) => "#symbol",
            ValueKind::Cons(_) => "#list",
            ValueKind::Procedure(_) => "#procedure",
            ValueKind::Macro(_) => "#macro",
            ValueKind::Builtin(_) => "#builtin",
            ValueKind::SpecialForm(_) => "#special-form",
        }
    }
}

/// Structural equality over Nil/Number/String/Boolean/Symbol and
/// recursively via (car, cdr) on Cons (§3). Callables compare by identity
/// of their function pointer; Procedures/Macros are never structurally
/// equal to anything but themselves by pointer (not specified by §3,
/// which defines `eq` only for the data variants — this is a conservative
/// extension so `eq` never panics on a callable argument).
pub fn structural_eq(a: &Value, b: &Value) -> bool {
    match (&a.kind, &b.kind) {
        (ValueKind::Nil, ValueKind::Nil) => true,
        (ValueKind::Number(x), ValueKind::Number(y)) => x == y,
        (ValueKind::String(x), ValueKind::String(y)) => x.as_str() == y.as_str(),
        (ValueKind::Boolean(x), ValueKind::Boolean(y)) => x == y,
        (ValueKind::Symbol(x), ValueKind::Symbol(y)) => x.as_str() == y.as_str(),
        (ValueKind::Cons(x), ValueKind::Cons(y)) => {
            structural_eq(&x.car, &y.car) && structural_eq(&x.cdr, &y.cdr)
        }
        (ValueKind::Builtin(x), ValueKind::Builtin(y)) => std::ptr::eq(*x as *const (), *y as *const ()),
        (ValueKind::SpecialForm(x), ValueKind::SpecialForm(y)) => {
            std::ptr::eq(*x as *const (), *y as *const ())
        }
        (ValueKind::Procedure(x), ValueKind::Procedure(y)) => Heap::ptr_eq(x, y),
        (ValueKind::Macro(x), ValueKind::Macro(y)) => Heap::ptr_eq(x, y),
        _ => false,
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for _ in 0..self.quote_level {
            write!(f, "'")?;
        }
        match &self.kind {
            ValueKind::Nil => write!(f, "nil"),
            ValueKind::Number(n) => {
                if n.fract() == 0.0 && n.is_finite() && n.abs() < 1e15 {
                    write!(f, "{}", *n as i64)
                } else {
                    write!(f, "{}", n)
                }
            }
            ValueKind::Boolean(b) => write!(f, "{}", if *b { "t" } else { "f" }),
            ValueKind::Symbol(s) => write!(f, "{}", s.as_str()),
            ValueKind::String(s) => write_quoted_string(f, s.as_str()),
            ValueKind::Cons(cell) => write_cons(f, cell),
            ValueKind::Procedure(_) => write!(f, "#<procedure>"),
            ValueKind::Macro(_) => write!(f, "#<macro>"),
            ValueKind::Builtin(_) => write!(f, "#<builtin>"),
            ValueKind::SpecialForm(_) => write!(f, "#<special-form>"),
        }
    }
}

fn write_quoted_string(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
    write!(f, "\"")?;
    for c in s.chars() {
        match c {
            '"' => write!(f, "\\\"")?,
            '\\' => write!(f, "\\\\")?,
            other => write!(f, "{}", other)?,
        }
    }
    write!(f, "\"")
}

fn write_cons(f: &mut fmt::Formatter<'_>, cell: &Heap<ConsCell>) -> fmt::Result {
    write!(f, "(")?;
    write!(f, "{}", cell.car)?;
    let mut cursor = cell.cdr.clone();
    loop {
        match &cursor.kind {
            ValueKind::Nil => break,
            ValueKind::Cons(next) => {
                write!(f, " {}", next.car)?;
                let tail = next.cdr.clone();
                cursor = tail;
            }
            _ => {
                write!(f, " . {}", cursor)?;
                break;
            }
        }
    }
    write!(f, ")")
}

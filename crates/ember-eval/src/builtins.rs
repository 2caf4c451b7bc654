//! Built-in functions.
//!
//! Builtins are injected into the global scope at interpreter creation.
//! Their names start with `$` so they cannot collide with user
//! identifiers that would otherwise shadow them.

use std::sync::OnceLock;
use std::time::Instant;

use crate::error::Signal;
use crate::interp::Interpreter;
use crate::value::Value;

/// A host function exposed to Ember code.
#[derive(Debug)]
pub struct Builtin {
    pub name: &'static str,
    pub arity: u8,
    pub invoke: fn(&mut Interpreter, &[Value]) -> Result<Value, Signal>,
}

/// The builtins registered into every global scope.
pub static BUILTINS: &[Builtin] = &[
    Builtin {
        name: "$clock",
        arity: 0,
        invoke: builtin_clock,
    },
    Builtin {
        name: "$print",
        arity: 1,
        invoke: builtin_print,
    },
    Builtin {
        name: "$println",
        arity: 1,
        invoke: builtin_println,
    },
    Builtin {
        name: "$str",
        arity: 1,
        invoke: builtin_str,
    },
];

/// Monotonic seconds since the first `$clock` call in this process.
fn builtin_clock(_interp: &mut Interpreter, _args: &[Value]) -> Result<Value, Signal> {
    static START: OnceLock<Instant> = OnceLock::new();
    let start = START.get_or_init(Instant::now);
    Ok(Value::Number(start.elapsed().as_secs_f64()))
}

/// Prints the stringified argument with no trailing newline.
fn builtin_print(interp: &mut Interpreter, args: &[Value]) -> Result<Value, Signal> {
    interp.write_out(&args[0].to_string())?;
    Ok(Value::Null)
}

/// Prints the stringified argument with a trailing newline.
fn builtin_println(interp: &mut Interpreter, args: &[Value]) -> Result<Value, Signal> {
    interp.write_out(&args[0].to_string())?;
    interp.write_out("\n")?;
    Ok(Value::Null)
}

/// Returns the string form of the argument.
fn builtin_str(_interp: &mut Interpreter, args: &[Value]) -> Result<Value, Signal> {
    Ok(Value::Str(args[0].to_string().into()))
}

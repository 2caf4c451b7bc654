//! The tree-walking interpreter.
//!
//! Statements execute against an environment arena rooted at a globals
//! scope pre-populated with the builtins. Non-local control flow
//! (`break`/`continue`/`return`) travels through the `Result` channel as
//! [`Signal`] values and is consumed by the innermost matching loop or
//! call frame; it crosses call frames that do not consume it.

use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;

use ember_lex::{Token, TokenKind};
use ember_par::ast::*;
use indexmap::IndexMap;

use crate::builtins::BUILTINS;
use crate::env::{EnvArena, EnvId};
use crate::error::{RuntimeError, Signal};
use crate::object::{ClassInfo, Function, Instance};
use crate::value::Value;

/// Interpreter state: the environment arena, the globals scope, and the
/// output sink used by `echo`, `$print`, and `$println`.
pub struct Interpreter {
    arena: EnvArena,
    globals: EnvId,
    out: Box<dyn Write>,
}

impl Interpreter {
    /// An interpreter writing to stdout.
    pub fn new() -> Self {
        Self::with_output(Box::new(io::stdout()))
    }

    /// An interpreter writing to the given sink. Tests use this to
    /// capture program output.
    pub fn with_output(out: Box<dyn Write>) -> Self {
        let mut arena = EnvArena::new();
        let globals = arena.alloc(None);
        for builtin in BUILTINS {
            arena.define(globals, builtin.name, Value::Builtin(builtin));
        }
        Self {
            arena,
            globals,
            out,
        }
    }

    /// Reads a name from the global scope (without walking, since the
    /// global scope has no enclosing scope).
    pub fn global(&self, name: &str) -> Option<Value> {
        self.arena.get_local(self.globals, name)
    }

    /// Executes a program: all top-level statements in order, then the
    /// `$main` entry point if the global scope defines one.
    pub fn run(&mut self, program: &[Stmt]) -> Result<(), RuntimeError> {
        for stmt in program {
            self.exec_stmt(stmt, self.globals)
                .map_err(Self::signal_to_error)?;
        }

        if let Some(main) = self.global("$main") {
            let arity = self
                .arity_of(&main)
                .ok_or(RuntimeError::MainNotCallable)?;
            if arity != 0 {
                return Err(RuntimeError::MainArity);
            }
            self.invoke(&main, Vec::new())
                .map_err(Self::signal_to_error)?;
        }

        self.out.flush().ok();
        Ok(())
    }

    /// A signal that unwinds past the whole program is a runtime error.
    fn signal_to_error(signal: Signal) -> RuntimeError {
        match signal {
            Signal::Break(token) => RuntimeError::BreakOutsideLoop { line: token.line },
            Signal::Continue(token) => RuntimeError::ContinueOutsideLoop { line: token.line },
            Signal::Return { keyword, .. } => RuntimeError::ReturnOutsideFunction {
                line: keyword.line,
            },
            Signal::Error(error) => error,
        }
    }

    pub(crate) fn write_out(&mut self, text: &str) -> Result<(), Signal> {
        self.out.write_all(text.as_bytes()).map_err(|e| {
            Signal::from(RuntimeError::Io {
                message: e.to_string(),
            })
        })
    }

    // ----------------------------------------------------------------------
    // Statements
    // ----------------------------------------------------------------------

    fn exec_stmt(&mut self, stmt: &Stmt, env: EnvId) -> Result<(), Signal> {
        match stmt {
            Stmt::Expr(expr) => {
                self.eval_expr(expr, env)?;
                Ok(())
            }
            Stmt::VarDecl(decl) => self.exec_var_decl(decl, env),
            Stmt::Block(block) => self.exec_block(block, env),
            Stmt::Echo(echo) => self.exec_echo(echo, env),
            Stmt::If(if_stmt) => self.exec_if(if_stmt, env),
            Stmt::While(while_stmt) => self.exec_while(while_stmt, env),
            Stmt::For(for_stmt) => self.exec_for(for_stmt, env),
            Stmt::Break(token) => Err(Signal::Break(token.clone())),
            Stmt::Continue(token) => Err(Signal::Continue(token.clone())),
            Stmt::Return(ret) => self.exec_return(ret, env),
            Stmt::Function(decl) => {
                let function = Function {
                    decl: decl.clone(),
                    env,
                };
                self.arena.define(
                    env,
                    decl.name.lexeme.clone(),
                    Value::Function(Rc::new(function)),
                );
                Ok(())
            }
            Stmt::Class(decl) => self.exec_class_decl(decl, env),
        }
    }

    /// `var x = e;` evaluates `e` in the current scope before defining
    /// `x`, so `var x = x;` reads any outer `x`.
    fn exec_var_decl(&mut self, decl: &VarDecl, env: EnvId) -> Result<(), Signal> {
        let value = match &decl.initializer {
            Some(expr) => self.eval_expr(expr, env)?,
            None => Value::Null,
        };
        self.arena.define(env, decl.name.lexeme.clone(), value);
        Ok(())
    }

    /// Blocks run their statements in a fresh child scope.
    fn exec_block(&mut self, block: &Block, env: EnvId) -> Result<(), Signal> {
        let block_env = self.arena.alloc(Some(env));
        for stmt in &block.statements {
            self.exec_stmt(stmt, block_env)?;
        }
        Ok(())
    }

    fn exec_echo(&mut self, echo: &EchoStmt, env: EnvId) -> Result<(), Signal> {
        let mut parts = Vec::with_capacity(echo.exprs.len());
        for expr in &echo.exprs {
            parts.push(self.eval_expr(expr, env)?.to_string());
        }
        self.write_out(&parts.join(" "))?;
        self.write_out("\n")
    }

    fn exec_if(&mut self, if_stmt: &IfStmt, env: EnvId) -> Result<(), Signal> {
        if self.eval_expr(&if_stmt.cond, env)?.is_truthy() {
            self.exec_block(&if_stmt.then_block, env)
        } else if let Some(else_stmt) = &if_stmt.else_stmt {
            self.exec_stmt(else_stmt, env)
        } else {
            Ok(())
        }
    }

    fn exec_while(&mut self, while_stmt: &WhileStmt, env: EnvId) -> Result<(), Signal> {
        while self.eval_expr(&while_stmt.cond, env)?.is_truthy() {
            match self.exec_block(&while_stmt.body, env) {
                Ok(()) | Err(Signal::Continue(_)) => {}
                Err(Signal::Break(_)) => break,
                Err(signal) => return Err(signal),
            }
        }
        Ok(())
    }

    /// `for` is not desugared into `while`: after a `continue`, the
    /// increment expression still runs before the next condition check.
    fn exec_for(&mut self, for_stmt: &ForStmt, env: EnvId) -> Result<(), Signal> {
        let loop_env = match &for_stmt.initializer {
            Some(initializer) => {
                let loop_env = self.arena.alloc(Some(env));
                self.exec_stmt(initializer, loop_env)?;
                loop_env
            }
            None => env,
        };

        while self.eval_expr(&for_stmt.cond, loop_env)?.is_truthy() {
            match self.exec_block(&for_stmt.body, loop_env) {
                Ok(()) | Err(Signal::Continue(_)) => {}
                Err(Signal::Break(_)) => break,
                Err(signal) => return Err(signal),
            }
            if let Some(increment) = &for_stmt.increment {
                self.eval_expr(increment, loop_env)?;
            }
        }
        Ok(())
    }

    fn exec_return(&mut self, ret: &ReturnStmt, env: EnvId) -> Result<(), Signal> {
        let value = match &ret.value {
            Some(expr) => self.eval_expr(expr, env)?,
            None => Value::Null,
        };
        Err(Signal::Return {
            keyword: ret.keyword.clone(),
            value,
        })
    }

    /// Creating a class: resolve the superclass, build the class-body
    /// environment (binding `super` when inheriting), capture every
    /// method over that environment, and precompute the ancestor chain.
    fn exec_class_decl(&mut self, decl: &Rc<ClassDecl>, env: EnvId) -> Result<(), Signal> {
        let superclass = match &decl.superclass {
            Some(name) => {
                let value = self.arena.get(env, &name.lexeme).ok_or_else(|| {
                    Signal::from(RuntimeError::UndefinedVariable {
                        name: name.lexeme.clone(),
                        line: name.line,
                    })
                })?;
                match value {
                    Value::Class(class) => Some(class),
                    _ => {
                        return Err(RuntimeError::InvalidSuperclass {
                            name: name.lexeme.clone(),
                            line: name.line,
                        }
                        .into())
                    }
                }
            }
            None => None,
        };

        let class_env = self.arena.alloc(Some(env));
        if let Some(superclass) = &superclass {
            self.arena
                .define(class_env, "super", Value::Class(superclass.clone()));
        }

        let mut methods = IndexMap::new();
        for method_decl in &decl.methods {
            let function = Function {
                decl: method_decl.clone(),
                env: class_env,
            };
            methods.insert(method_decl.name.lexeme.clone(), Rc::new(function));
        }

        let ancestors = match &superclass {
            Some(superclass) => {
                let mut ancestors = Vec::with_capacity(1 + superclass.ancestors.len());
                ancestors.push(superclass.clone());
                ancestors.extend(superclass.ancestors.iter().cloned());
                ancestors
            }
            None => Vec::new(),
        };

        let class = Rc::new(ClassInfo {
            decl: decl.clone(),
            superclass,
            methods,
            env: class_env,
            ancestors,
        });
        self.arena
            .define(env, decl.name.lexeme.clone(), Value::Class(class));
        Ok(())
    }

    // ----------------------------------------------------------------------
    // Expressions
    // ----------------------------------------------------------------------

    fn eval_expr(&mut self, expr: &Expr, env: EnvId) -> Result<Value, Signal> {
        match expr {
            Expr::Literal(lit) => Ok(match &lit.value {
                Lit::Null => Value::Null,
                Lit::Bool(b) => Value::Bool(*b),
                Lit::Number(n) => Value::Number(*n),
                Lit::Str(s) => Value::Str(s.as_str().into()),
            }),
            Expr::Grouping(inner) => self.eval_expr(inner, env),
            Expr::Unary(unary) => self.eval_unary(unary, env),
            Expr::Binary(binary) => self.eval_binary(binary, env),
            Expr::Logical(logical) => self.eval_logical(logical, env),
            Expr::Conditional(cond) => {
                if self.eval_expr(&cond.cond, env)?.is_truthy() {
                    self.eval_expr(&cond.then_branch, env)
                } else {
                    self.eval_expr(&cond.else_branch, env)
                }
            }
            Expr::Variable(name) => self.arena.get(env, &name.lexeme).ok_or_else(|| {
                Signal::from(RuntimeError::UndefinedVariable {
                    name: name.lexeme.clone(),
                    line: name.line,
                })
            }),
            Expr::Assign(assign) => {
                let value = self.eval_expr(&assign.value, env)?;
                if !self.arena.assign(env, &assign.name.lexeme, value.clone()) {
                    return Err(RuntimeError::UndefinedVariableSet {
                        name: assign.name.lexeme.clone(),
                        line: assign.name.line,
                    }
                    .into());
                }
                Ok(value)
            }
            Expr::Call(call) => self.eval_call(call, env),
            Expr::GetAttr(get) => {
                let object = self.eval_expr(&get.object, env)?;
                match object {
                    Value::Instance(instance) => self.get_attr(&instance, &get.name),
                    _ => Err(RuntimeError::NotAnInstance {
                        name: get.name.lexeme.clone(),
                        line: get.name.line,
                    }
                    .into()),
                }
            }
            Expr::SetAttr(set) => self.eval_set_attr(set, env),
            Expr::SelfRef(token) => self.arena.get(env, "self").ok_or_else(|| {
                Signal::from(RuntimeError::UndefinedVariable {
                    name: "self".to_string(),
                    line: token.line,
                })
            }),
            Expr::Super(super_expr) => self.eval_super(super_expr, env),
        }
    }

    fn eval_unary(&mut self, unary: &UnaryExpr, env: EnvId) -> Result<Value, Signal> {
        let value = self.eval_expr(&unary.operand, env)?;
        match unary.op.kind {
            TokenKind::Minus => {
                let n = value.as_number().ok_or_else(|| {
                    Signal::from(RuntimeError::IncompatibleOperand {
                        op: unary.op.lexeme.clone(),
                        line: unary.op.line,
                    })
                })?;
                Ok(Value::Number(-n))
            }
            TokenKind::Bang => Ok(Value::Bool(!value.is_truthy())),
            kind => unreachable!("non-unary operator {kind:?}"),
        }
    }

    fn eval_binary(&mut self, binary: &BinaryExpr, env: EnvId) -> Result<Value, Signal> {
        let left = self.eval_expr(&binary.left, env)?;
        let right = self.eval_expr(&binary.right, env)?;
        let op = &binary.op;

        let incompatible = || {
            Signal::from(RuntimeError::IncompatibleOperands {
                op: op.lexeme.clone(),
                line: op.line,
            })
        };

        match op.kind {
            // Comparison accepts two numbers or two strings
            // (lexicographic); equality below accepts any pair.
            TokenKind::Greater => match (&left, &right) {
                (Value::Number(a), Value::Number(b)) => Ok(Value::Bool(a > b)),
                (Value::Str(a), Value::Str(b)) => Ok(Value::Bool(a > b)),
                _ => Err(incompatible()),
            },
            TokenKind::GreaterEqual => match (&left, &right) {
                (Value::Number(a), Value::Number(b)) => Ok(Value::Bool(a >= b)),
                (Value::Str(a), Value::Str(b)) => Ok(Value::Bool(a >= b)),
                _ => Err(incompatible()),
            },
            TokenKind::Less => match (&left, &right) {
                (Value::Number(a), Value::Number(b)) => Ok(Value::Bool(a < b)),
                (Value::Str(a), Value::Str(b)) => Ok(Value::Bool(a < b)),
                _ => Err(incompatible()),
            },
            TokenKind::LessEqual => match (&left, &right) {
                (Value::Number(a), Value::Number(b)) => Ok(Value::Bool(a <= b)),
                (Value::Str(a), Value::Str(b)) => Ok(Value::Bool(a <= b)),
                _ => Err(incompatible()),
            },
            TokenKind::Plus | TokenKind::PlusEqual => match (&left, &right) {
                (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a + b)),
                (Value::Str(a), Value::Str(b)) => {
                    Ok(Value::Str(format!("{a}{b}").into()))
                }
                _ => Err(incompatible()),
            },
            TokenKind::Minus | TokenKind::MinusEqual => match (&left, &right) {
                (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a - b)),
                _ => Err(incompatible()),
            },
            TokenKind::Star => match (&left, &right) {
                (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a * b)),
                _ => Err(incompatible()),
            },
            // Division follows IEEE-754; dividing by zero yields an
            // infinity or NaN, not a diagnostic.
            TokenKind::Slash => match (&left, &right) {
                (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a / b)),
                _ => Err(incompatible()),
            },
            TokenKind::EqualEqual => Ok(Value::Bool(left == right)),
            TokenKind::BangEqual => Ok(Value::Bool(left != right)),
            kind => unreachable!("non-binary operator {kind:?}"),
        }
    }

    /// Short-circuit: the left operand is returned when its truthiness
    /// decides the result.
    fn eval_logical(&mut self, logical: &LogicalExpr, env: EnvId) -> Result<Value, Signal> {
        let left = self.eval_expr(&logical.left, env)?;
        match logical.op.kind {
            TokenKind::Or if left.is_truthy() => Ok(left),
            TokenKind::And if !left.is_truthy() => Ok(left),
            _ => self.eval_expr(&logical.right, env),
        }
    }

    // ----------------------------------------------------------------------
    // Calls and instantiation
    // ----------------------------------------------------------------------

    /// Callee first, then the callable and arity checks, then the
    /// arguments left to right, then the invocation.
    fn eval_call(&mut self, call: &CallExpr, env: EnvId) -> Result<Value, Signal> {
        let callee = self.eval_expr(&call.callee, env)?;
        let line = call.paren.line;

        let arity = self
            .arity_of(&callee)
            .ok_or(Signal::from(RuntimeError::NotCallable { line }))?;
        if call.args.len() != arity {
            return Err(RuntimeError::ArityMismatch { line }.into());
        }

        let mut args = Vec::with_capacity(call.args.len());
        for arg in &call.args {
            args.push(self.eval_expr(arg, env)?);
        }

        self.invoke(&callee, args)
    }

    /// The arity of a callable value, or `None` when it is not callable.
    fn arity_of(&self, callee: &Value) -> Option<usize> {
        match callee {
            Value::Builtin(builtin) => Some(builtin.arity as usize),
            Value::Function(function) => Some(function.arity()),
            Value::Class(class) => Some(class.arity()),
            _ => None,
        }
    }

    fn invoke(&mut self, callee: &Value, args: Vec<Value>) -> Result<Value, Signal> {
        match callee {
            Value::Builtin(builtin) => (builtin.invoke)(self, &args),
            Value::Function(function) => {
                let function = function.clone();
                self.call_function(&function, args)
            }
            Value::Class(class) => {
                let class = class.clone();
                self.instantiate(&class, args)
            }
            _ => unreachable!("checked callable in eval_call"),
        }
    }

    /// Calls a user function: parameters bind in a fresh child of the
    /// captured environment, the body runs as a block, and a `return`
    /// unwind yields its value (normal completion yields null).
    /// `break`/`continue` signals pass through to any enclosing loop.
    fn call_function(&mut self, function: &Function, args: Vec<Value>) -> Result<Value, Signal> {
        let call_env = self.arena.alloc(Some(function.env));
        for (param, arg) in function.decl.params.iter().zip(args) {
            self.arena.define(call_env, param.lexeme.clone(), arg);
        }
        match self.exec_block(&function.decl.body, call_env) {
            Ok(()) => Ok(Value::Null),
            Err(Signal::Return { value, .. }) => Ok(value),
            Err(signal) => Err(signal),
        }
    }

    /// Instantiation: allocate an instance with a fresh fields map, run
    /// every declared field initializer most-base class first (derived
    /// declarations of the same name shadow the base's initial value),
    /// then call the chain-resolved `$init` bound to the instance.
    fn instantiate(&mut self, class: &Rc<ClassInfo>, args: Vec<Value>) -> Result<Value, Signal> {
        let instance = Rc::new(RefCell::new(Instance {
            class: class.clone(),
            fields: IndexMap::new(),
        }));

        let mut resolution = Vec::with_capacity(1 + class.ancestors.len());
        resolution.push(class.clone());
        resolution.extend(class.ancestors.iter().cloned());

        for cls in resolution.iter().rev() {
            for field in &cls.decl.fields {
                let value = match &field.initializer {
                    Some(expr) => self.eval_expr(expr, cls.env)?,
                    None => Value::Null,
                };
                instance
                    .borrow_mut()
                    .fields
                    .insert(field.name.lexeme.clone(), value);
            }
        }

        if let Some(init) = class.find_method("$init") {
            let bound = self.bind_method(&init, &instance);
            self.call_function(&bound, args)?;
        }

        Ok(Value::Instance(instance))
    }

    /// A bound method is a fresh function whose captured environment is a
    /// child of the method's original environment with `self` defined.
    fn bind_method(
        &mut self,
        method: &Rc<Function>,
        instance: &Rc<RefCell<Instance>>,
    ) -> Rc<Function> {
        let bound_env = self.arena.alloc(Some(method.env));
        self.arena
            .define(bound_env, "self", Value::Instance(instance.clone()));
        Rc::new(Function {
            decl: method.decl.clone(),
            env: bound_env,
        })
    }

    // ----------------------------------------------------------------------
    // Attributes
    // ----------------------------------------------------------------------

    /// Fields take priority over methods; method hits return a bound
    /// copy, so `self` is captured at attribute-get time.
    fn get_attr(
        &mut self,
        instance: &Rc<RefCell<Instance>>,
        name: &Token,
    ) -> Result<Value, Signal> {
        let field = instance.borrow().fields.get(&name.lexeme).cloned();
        if let Some(value) = field {
            return Ok(value);
        }
        let class = instance.borrow().class.clone();
        if let Some(method) = class.find_method(&name.lexeme) {
            return Ok(Value::Function(self.bind_method(&method, instance)));
        }
        Err(RuntimeError::UndefinedAttribute {
            name: name.lexeme.clone(),
            line: name.line,
        }
        .into())
    }

    /// Setting may only update an existing field; it never creates one.
    fn eval_set_attr(&mut self, set: &SetAttrExpr, env: EnvId) -> Result<Value, Signal> {
        let object = self.eval_expr(&set.object, env)?;
        let Value::Instance(instance) = object else {
            return Err(RuntimeError::NotAnInstance {
                name: set.name.lexeme.clone(),
                line: set.name.line,
            }
            .into());
        };

        let value = self.eval_expr(&set.value, env)?;
        let mut borrowed = instance.borrow_mut();
        match borrowed.fields.get_mut(&set.name.lexeme) {
            Some(slot) => {
                *slot = value.clone();
                Ok(value)
            }
            None => Err(RuntimeError::UndefinedAttributeSet {
                name: set.name.lexeme.clone(),
                line: set.name.line,
            }
            .into()),
        }
    }

    /// `super.attr`: resolve `super` and `self` in the current
    /// environment, look the method up through the superclass's chain,
    /// and bind it to `self`.
    fn eval_super(&mut self, super_expr: &SuperExpr, env: EnvId) -> Result<Value, Signal> {
        let superclass = self.arena.get(env, "super").ok_or_else(|| {
            Signal::from(RuntimeError::UndefinedVariable {
                name: "super".to_string(),
                line: super_expr.super_token.line,
            })
        })?;
        let Value::Class(superclass) = superclass else {
            unreachable!("'super' is only ever bound to a class");
        };

        let instance = self.arena.get(env, "self").ok_or_else(|| {
            Signal::from(RuntimeError::UndefinedName {
                name: "self".to_string(),
            })
        })?;
        let Value::Instance(instance) = instance else {
            unreachable!("'self' is only ever bound to an instance");
        };

        match superclass.find_method(&super_expr.attr.lexeme) {
            Some(method) => Ok(Value::Function(self.bind_method(&method, &instance))),
            None => Err(RuntimeError::UndefinedSuperMethod {
                name: super_expr.attr.lexeme.clone(),
                line: super_expr.attr.line,
            }
            .into()),
        }
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

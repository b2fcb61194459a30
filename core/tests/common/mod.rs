#![allow(dead_code)]

use std::collections::HashMap;

use angl_core::ast::{Expr, FileNode, Stmt};
use angl_core::lower::LoweringContext;
use angl_core::scope::{AccessClass, BindingRef, ScopeId, ScopeKind, ScopeTree, StorageClass, Variable};
use angl_core::{AnglResult, CompileOptions, GlobalRegistry, allocate_target_identifiers, create_global_scope, lower_file};

/// Lines every lowered file starts with under the default options.
pub const HEADER: &str = "define(function(require) {\n    \"use strict\";\n    var $G = require(\"angl/globals\");\n    var $R = require(\"angl/runtime\");\n";
pub const FOOTER: &str = "});";

pub fn small_registry() -> GlobalRegistry {
    let mut registry = GlobalRegistry::new();
    for name in ["instance_destroy", "show_debug_message", "room_speed"] {
        registry.insert(name, serde_json::json!({ "kind": "function" }));
    }
    registry
}

/// A global scope from `small_registry` with one file-level function scope
/// below it. The file scope binds `self` and `other` to `this`.
pub struct Fixture {
    pub tree: ScopeTree,
    pub file_scope: ScopeId,
    pub options: CompileOptions,
}

impl Fixture {
    pub fn new() -> Self {
        let options = CompileOptions::default();
        let mut tree = create_global_scope(&small_registry(), &[], &options.runtime.globals_identifier)
            .expect("global scope");
        let file_scope = tree.push_scope(ScopeTree::GLOBAL, ScopeKind::Function).expect("file scope");
        tree.add(file_scope, self_binding()).expect("self");
        tree.add(file_scope, unmaterialized("other", "this")).expect("other");
        Fixture { tree, file_scope, options }
    }

    /// Script scope with the implicit `other` argument and `self` as `this`.
    pub fn function_scope(&mut self, parent: ScopeId, args: &[&str]) -> ScopeId {
        let scope = self.tree.push_scope(parent, ScopeKind::Function).expect("function scope");
        self.tree.add(scope, Variable::argument("other")).expect("other");
        self.tree.add(scope, self_binding()).expect("self");
        for arg in args {
            self.tree.add(scope, Variable::argument(arg)).expect("argument");
        }
        scope
    }

    pub fn block_scope(&mut self, parent: ScopeId) -> ScopeId {
        self.tree.push_scope(parent, ScopeKind::Block).expect("block scope")
    }

    pub fn local(&mut self, scope: ScopeId, name: &str) -> BindingRef {
        self.tree.add(scope, Variable::local(name)).expect("local");
        BindingRef::named(scope, name)
    }

    /// Identifier expression bound to `name` in `scope`.
    pub fn ident(&self, scope: ScopeId, name: &str) -> Expr {
        Expr::ident(name, Some(BindingRef::named(scope, name)))
    }

    pub fn global(&self, name: &str) -> Expr {
        self.ident(ScopeTree::GLOBAL, name)
    }

    pub fn lower(&mut self, stmts: Vec<Stmt>) -> AnglResult<String> {
        allocate_target_identifiers(&mut self.tree)?;
        let file = FileNode { stmts, scope: self.file_scope };
        lower_file(&file, &self.tree, &self.options)
    }

    pub fn expr_text(&mut self, expr: &Expr) -> AnglResult<String> {
        allocate_target_identifiers(&mut self.tree)?;
        let mut ctx = LoweringContext::new(&self.tree, &self.options.runtime, &self.options.indent);
        ctx.lower_expr(expr)?;
        Ok(ctx.finish())
    }
}

pub fn self_binding() -> Variable {
    unmaterialized("self", "this")
}

pub fn unmaterialized(name: &str, target: &str) -> Variable {
    Variable::new(Some(name.to_string()), StorageClass::Unmaterialized, AccessClass::Direct).with_target(target)
}

/// The statements of a lowered file, without the envelope.
pub fn body(out: &str) -> &str {
    out.strip_prefix(HEADER)
        .and_then(|rest| rest.strip_suffix(FOOTER))
        .unwrap_or_else(|| panic!("output lacks the module envelope:\n{}", out))
}

/// ====================================================================
/// Evaluator for the arithmetic/boolean subset of emitted expressions.
///
/// Understands numbers, parentheses, `! - + ~` prefixes, `* / % + - |`,
/// the comparisons, and zero-argument calls of named counters such as
/// `(a)()`. Each counter call returns its configured value and is counted.

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    Num(f64),
    Bool(bool),
    Func(usize),
}

impl Value {
    pub fn num(self) -> f64 {
        match self {
            Value::Num(n) => n,
            Value::Bool(b) => {
                if b {
                    1.0
                } else {
                    0.0
                }
            }
            Value::Func(_) => f64::NAN,
        }
    }

    pub fn truthy(self) -> bool {
        match self {
            Value::Num(n) => n != 0.0 && !n.is_nan(),
            Value::Bool(b) => b,
            Value::Func(_) => true,
        }
    }
}

/// ECMAScript ToInt32.
pub fn to_int32(n: f64) -> i32 {
    if !n.is_finite() {
        return 0;
    }
    let m = n.trunc().rem_euclid(4294967296.0);
    if m >= 2147483648.0 { (m - 4294967296.0) as i32 } else { m as i32 }
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Num(f64),
    Ident(String),
    Punct(&'static str),
}

fn tokenize(src: &str) -> Vec<Token> {
    const PUNCT: [&str; 16] = ["<=", ">=", "==", "!=", "(", ")", "!", "+", "-", "*", "/", "%", "|", "~", "<", ">"];
    let chars: Vec<char> = src.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        if c.is_whitespace() {
            i += 1;
        } else if c.is_ascii_digit() || (c == '.' && chars.get(i + 1).is_some_and(|d| d.is_ascii_digit())) {
            let start = i;
            while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
                i += 1;
            }
            let text: String = chars[start..i].iter().collect();
            tokens.push(Token::Num(text.parse().expect("number literal")));
        } else if c.is_alphabetic() || c == '_' || c == '$' {
            let start = i;
            while i < chars.len() && (chars[i].is_alphanumeric() || chars[i] == '_' || chars[i] == '$') {
                i += 1;
            }
            tokens.push(Token::Ident(chars[start..i].iter().collect()));
        } else {
            let rest: String = chars[i..].iter().take(2).collect();
            let p = PUNCT
                .iter()
                .find(|p| rest.starts_with(**p))
                .unwrap_or_else(|| panic!("unexpected character {:?} in {:?}", c, src));
            tokens.push(Token::Punct(*p));
            i += p.len();
        }
    }
    tokens
}

pub struct Evaluator {
    functions: Vec<(String, Value)>,
    calls: HashMap<String, usize>,
    tokens: Vec<Token>,
    pos: usize,
}

impl Evaluator {
    pub fn new() -> Self {
        Evaluator { functions: Vec::new(), calls: HashMap::new(), tokens: Vec::new(), pos: 0 }
    }

    /// Register a counter `name` returning `value` when called.
    pub fn with_function(mut self, name: &str, value: Value) -> Self {
        self.functions.push((name.to_string(), value));
        self
    }

    pub fn calls(&self, name: &str) -> usize {
        self.calls.get(name).copied().unwrap_or(0)
    }

    pub fn eval(&mut self, src: &str) -> Value {
        self.tokens = tokenize(src);
        self.pos = 0;
        let v = self.bit_or();
        assert_eq!(self.pos, self.tokens.len(), "trailing tokens in {:?}", src);
        v
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn eat(&mut self, p: &str) -> bool {
        if let Some(Token::Punct(q)) = self.peek() {
            if *q == p {
                self.pos += 1;
                return true;
            }
        }
        false
    }

    fn bit_or(&mut self) -> Value {
        let mut left = self.equality();
        while self.eat("|") {
            let right = self.equality();
            left = Value::Num((to_int32(left.num()) | to_int32(right.num())) as f64);
        }
        left
    }

    fn equality(&mut self) -> Value {
        let mut left = self.relational();
        loop {
            if self.eat("==") {
                let right = self.relational();
                left = Value::Bool(left.num() == right.num());
            } else if self.eat("!=") {
                let right = self.relational();
                left = Value::Bool(left.num() != right.num());
            } else {
                return left;
            }
        }
    }

    fn relational(&mut self) -> Value {
        let mut left = self.additive();
        loop {
            let op = match self.peek() {
                Some(Token::Punct(p)) if ["<", "<=", ">", ">="].contains(p) => *p,
                _ => return left,
            };
            self.pos += 1;
            let right = self.additive();
            let (a, b) = (left.num(), right.num());
            left = Value::Bool(match op {
                "<" => a < b,
                "<=" => a <= b,
                ">" => a > b,
                _ => a >= b,
            });
        }
    }

    fn additive(&mut self) -> Value {
        let mut left = self.multiplicative();
        loop {
            if self.eat("+") {
                let right = self.multiplicative();
                left = Value::Num(left.num() + right.num());
            } else if self.eat("-") {
                let right = self.multiplicative();
                left = Value::Num(left.num() - right.num());
            } else {
                return left;
            }
        }
    }

    fn multiplicative(&mut self) -> Value {
        let mut left = self.unary();
        loop {
            if self.eat("*") {
                let right = self.unary();
                left = Value::Num(left.num() * right.num());
            } else if self.eat("/") {
                let right = self.unary();
                left = Value::Num(left.num() / right.num());
            } else if self.eat("%") {
                let right = self.unary();
                left = Value::Num(left.num() % right.num());
            } else {
                return left;
            }
        }
    }

    fn unary(&mut self) -> Value {
        if self.eat("!") {
            return Value::Bool(!self.unary().truthy());
        }
        if self.eat("-") {
            return Value::Num(-self.unary().num());
        }
        if self.eat("+") {
            return Value::Num(self.unary().num());
        }
        if self.eat("~") {
            return Value::Num(!to_int32(self.unary().num()) as f64);
        }
        self.postfix()
    }

    fn postfix(&mut self) -> Value {
        let mut value = self.primary();
        while self.eat("(") {
            assert!(self.eat(")"), "only zero-argument calls are supported");
            value = match value {
                Value::Func(i) => {
                    let (name, result) = self.functions[i].clone();
                    *self.calls.entry(name).or_insert(0) += 1;
                    result
                }
                other => panic!("call of non-function {:?}", other),
            };
        }
        value
    }

    fn primary(&mut self) -> Value {
        match self.tokens.get(self.pos).cloned() {
            Some(Token::Num(n)) => {
                self.pos += 1;
                Value::Num(n)
            }
            Some(Token::Ident(name)) => {
                self.pos += 1;
                match name.as_str() {
                    "true" => Value::Bool(true),
                    "false" => Value::Bool(false),
                    _ => {
                        let i = self
                            .functions
                            .iter()
                            .position(|(n, _)| *n == name)
                            .unwrap_or_else(|| panic!("unknown name {}", name));
                        Value::Func(i)
                    }
                }
            }
            Some(Token::Punct("(")) => {
                self.pos += 1;
                let v = self.bit_or();
                assert!(self.eat(")"), "unbalanced parentheses");
                v
            }
            other => panic!("unexpected token {:?}", other),
        }
    }
}

use std::sync::LazyLock;

use pest::Parser;
use pest::iterators::{Pair, Pairs};
use pest::pratt_parser::{Assoc, Op, PrattParser};
use serde::Serialize;
use tracing::trace;

use crate::error::ExpressionError;

#[derive(pest_derive::Parser)]
#[grammar = "expression.pest"]
struct ExpressionParser;

static PRATT: LazyLock<PrattParser<Rule>> = LazyLock::new(|| {
    PrattParser::new()
        .op(Op::infix(Rule::or_op, Assoc::Left))
        .op(Op::infix(Rule::and_op, Assoc::Left))
        .op(Op::infix(Rule::strict_eq_op, Assoc::Left)
            | Op::infix(Rule::strict_ne_op, Assoc::Left)
            | Op::infix(Rule::eq_op, Assoc::Left)
            | Op::infix(Rule::ne_op, Assoc::Left))
        .op(Op::infix(Rule::lt_op, Assoc::Left)
            | Op::infix(Rule::gt_op, Assoc::Left)
            | Op::infix(Rule::le_op, Assoc::Left)
            | Op::infix(Rule::ge_op, Assoc::Left))
        .op(Op::infix(Rule::add_op, Assoc::Left) | Op::infix(Rule::sub_op, Assoc::Left))
        .op(Op::infix(Rule::mul_op, Assoc::Left)
            | Op::infix(Rule::div_op, Assoc::Left)
            | Op::infix(Rule::rem_op, Assoc::Left))
        .op(Op::prefix(Rule::not_op) | Op::prefix(Rule::neg_op) | Op::prefix(Rule::plus_op))
        .op(Op::postfix(Rule::member) | Op::postfix(Rule::index))
});

/// How compiled code refers to the runtime scope and the filter hook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeStyle {
    pub scope: String,
    pub filter_fn: String,
}

impl Default for CodeStyle {
    fn default() -> Self {
        Self {
            scope: "_scope".to_string(),
            filter_fn: "_that.applyFilter".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum Literal {
    Number(f64),
    String(String),
    Bool(bool),
    Null,
    Undefined,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum UnaryOp {
    #[serde(rename = "!")]
    Not,
    #[serde(rename = "-")]
    Neg,
    #[serde(rename = "+")]
    Plus,
}

impl UnaryOp {
    pub fn as_str(self) -> &'static str {
        match self {
            UnaryOp::Not => "!",
            UnaryOp::Neg => "-",
            UnaryOp::Plus => "+",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BinaryOp {
    #[serde(rename = "||")]
    Or,
    #[serde(rename = "&&")]
    And,
    #[serde(rename = "===")]
    StrictEq,
    #[serde(rename = "!==")]
    StrictNe,
    #[serde(rename = "==")]
    Eq,
    #[serde(rename = "!=")]
    Ne,
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = "<=")]
    Le,
    #[serde(rename = ">=")]
    Ge,
    #[serde(rename = "+")]
    Add,
    #[serde(rename = "-")]
    Sub,
    #[serde(rename = "*")]
    Mul,
    #[serde(rename = "/")]
    Div,
    #[serde(rename = "%")]
    Rem,
}

impl BinaryOp {
    pub fn as_str(self) -> &'static str {
        match self {
            BinaryOp::Or => "||",
            BinaryOp::And => "&&",
            BinaryOp::StrictEq => "===",
            BinaryOp::StrictNe => "!==",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::Gt => ">",
            BinaryOp::Le => "<=",
            BinaryOp::Ge => ">=",
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Rem => "%",
        }
    }

    fn precedence(self) -> u8 {
        match self {
            BinaryOp::Or => 2,
            BinaryOp::And => 3,
            BinaryOp::StrictEq | BinaryOp::StrictNe | BinaryOp::Eq | BinaryOp::Ne => 4,
            BinaryOp::Lt | BinaryOp::Gt | BinaryOp::Le | BinaryOp::Ge => 5,
            BinaryOp::Add | BinaryOp::Sub => 6,
            BinaryOp::Mul | BinaryOp::Div | BinaryOp::Rem => 7,
        }
    }
}

const PREC_CONDITIONAL: u8 = 1;
const PREC_CONCAT: u8 = 6;
const PREC_UNARY: u8 = 8;
const PREC_POSTFIX: u8 = 9;

/// Compiled binding expression.
///
/// Every bare identifier is a [`Expr::Scope`] lookup; nothing else can reach
/// outside the scope object.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Expr {
    Literal {
        value: Literal,
    },
    Scope {
        name: String,
    },
    Member {
        object: Box<Expr>,
        property: String,
    },
    Index {
        object: Box<Expr>,
        index: Box<Expr>,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Conditional {
        test: Box<Expr>,
        consequent: Box<Expr>,
        alternate: Box<Expr>,
    },
    /// `expression | name`; the filter hook receives the compiled source of
    /// `expression`, not its value.
    Filter {
        expression: Box<Expr>,
        name: String,
    },
    /// Interpolated attribute text, joined left to right.
    Concat {
        parts: Vec<Expr>,
    },
}

impl Expr {
    pub fn string(value: impl Into<String>) -> Self {
        Expr::Literal {
            value: Literal::String(value.into()),
        }
    }

    pub fn scope(name: impl Into<String>) -> Self {
        Expr::Scope { name: name.into() }
    }

    fn precedence(&self) -> u8 {
        match self {
            Expr::Literal { .. }
            | Expr::Scope { .. }
            | Expr::Member { .. }
            | Expr::Index { .. }
            | Expr::Filter { .. } => PREC_POSTFIX,
            Expr::Unary { .. } => PREC_UNARY,
            Expr::Binary { op, .. } => op.precedence(),
            Expr::Conditional { .. } => PREC_CONDITIONAL,
            Expr::Concat { .. } => PREC_CONCAT,
        }
    }

    /// Renders the tree as evaluable code rooted at `style.scope`.
    pub fn to_code(&self, style: &CodeStyle) -> String {
        let mut out = String::new();
        self.write_code(style, &mut out);
        out
    }

    fn write_code(&self, style: &CodeStyle, out: &mut String) {
        match self {
            Expr::Literal { value } => write_literal(value, out),
            Expr::Scope { name } => {
                out.push_str(&style.scope);
                out.push('.');
                out.push_str(name);
            }
            Expr::Member { object, property } => {
                if matches!(**object, Expr::Literal { value: Literal::Number(_) }) {
                    object.write_wrapped(style, out);
                } else {
                    object.write_at(PREC_POSTFIX, style, out);
                }
                out.push('.');
                out.push_str(property);
            }
            Expr::Index { object, index } => {
                object.write_at(PREC_POSTFIX, style, out);
                out.push('[');
                index.write_code(style, out);
                out.push(']');
            }
            Expr::Unary { op, operand } => {
                out.push_str(op.as_str());
                // `- -a` must not collapse into `--a`
                let signed = matches!(
                    **operand,
                    Expr::Unary {
                        op: UnaryOp::Neg | UnaryOp::Plus,
                        ..
                    }
                );
                if signed {
                    operand.write_wrapped(style, out);
                } else {
                    operand.write_at(PREC_UNARY, style, out);
                }
            }
            Expr::Binary { op, left, right } => {
                let prec = op.precedence();
                left.write_at(prec, style, out);
                out.push(' ');
                out.push_str(op.as_str());
                out.push(' ');
                right.write_at(prec + 1, style, out);
            }
            Expr::Conditional {
                test,
                consequent,
                alternate,
            } => {
                test.write_at(PREC_CONDITIONAL + 1, style, out);
                out.push_str(" ? ");
                consequent.write_at(PREC_CONDITIONAL, style, out);
                out.push_str(" : ");
                alternate.write_at(PREC_CONDITIONAL, style, out);
            }
            Expr::Filter { expression, name } => {
                out.push_str(&style.filter_fn);
                out.push('(');
                out.push_str(&string_lit(&expression.to_code(style)));
                out.push_str(", ");
                out.push_str(&string_lit(name));
                out.push(')');
            }
            Expr::Concat { parts } => {
                // `+` only joins as text once the left side is a string
                let leading_string = matches!(
                    parts.first(),
                    Some(Expr::Literal {
                        value: Literal::String(_)
                    })
                );
                if !leading_string {
                    out.push_str("\"\"");
                }
                for (i, part) in parts.iter().enumerate() {
                    if i > 0 || !leading_string {
                        out.push_str(" + ");
                    }
                    part.write_at(PREC_CONCAT + 1, style, out);
                }
            }
        }
    }

    fn write_at(&self, min: u8, style: &CodeStyle, out: &mut String) {
        if self.precedence() < min {
            self.write_wrapped(style, out);
        } else {
            self.write_code(style, out);
        }
    }

    fn write_wrapped(&self, style: &CodeStyle, out: &mut String) {
        out.push('(');
        self.write_code(style, out);
        out.push(')');
    }
}

fn write_literal(value: &Literal, out: &mut String) {
    match value {
        Literal::Number(n) => out.push_str(&n.to_string()),
        Literal::String(s) => out.push_str(&string_lit(s)),
        Literal::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Literal::Null => out.push_str("null"),
        Literal::Undefined => out.push_str("undefined"),
    }
}

/// Double-quoted string literal with quotes, backslashes and control
/// characters escaped.
pub(crate) fn string_lit(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for ch in s.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            c if (c as u32) < 0x20 => out.push_str(&format!("\\u{:04x}", c as u32)),
            _ => out.push(ch),
        }
    }
    out.push('"');
    out
}

/// Parses `head ( "|" filter )?` into a tree.
pub fn parse_expression(text: &str) -> Result<Expr, ExpressionError> {
    let source = text.trim();
    if source.is_empty() {
        return Err(ExpressionError::Empty);
    }
    if let Some(op) = find_unsupported_operator(source) {
        return Err(ExpressionError::Unsupported {
            op,
            expression: source.to_string(),
        });
    }

    let syntax = |message: String| ExpressionError::Syntax {
        expression: source.to_string(),
        message,
    };

    let mut pairs = ExpressionParser::parse(Rule::input, source).map_err(|e| syntax(e.to_string()))?;
    let input = pairs
        .next()
        .ok_or_else(|| syntax("empty parse".to_string()))?;

    let mut head = None;
    let mut filter = None;
    for pair in input.into_inner() {
        match pair.as_rule() {
            Rule::expression => head = Some(build_expression(pair)?),
            Rule::filter => filter = pair.into_inner().next().map(|p| p.as_str().to_string()),
            _ => {}
        }
    }
    let head = head.ok_or_else(|| syntax("missing expression".to_string()))?;

    trace!(expression = source, filter = ?filter, "parsed expression");
    Ok(match filter {
        Some(name) => Expr::Filter {
            expression: Box::new(head),
            name,
        },
        None => head,
    })
}

/// Parses and renders in one step.
pub fn compile_expression(text: &str, style: &CodeStyle) -> Result<String, ExpressionError> {
    Ok(parse_expression(text)?.to_code(style))
}

fn build_expression(pair: Pair<Rule>) -> Result<Expr, ExpressionError> {
    let expression = pair.as_str().to_string();
    let mut inner = pair.into_inner();
    let Some(binary) = inner.next() else {
        return Err(ExpressionError::Syntax {
            expression,
            message: "missing operand".to_string(),
        });
    };
    let head = build_binary(binary.into_inner())?;

    match (inner.next(), inner.next()) {
        (Some(consequent), Some(alternate)) => Ok(Expr::Conditional {
            test: Box::new(head),
            consequent: Box::new(build_expression(consequent)?),
            alternate: Box::new(build_expression(alternate)?),
        }),
        _ => Ok(head),
    }
}

fn build_binary(pairs: Pairs<Rule>) -> Result<Expr, ExpressionError> {
    PRATT
        .map_primary(build_primary)
        .map_prefix(|op, operand| {
            let op = match op.as_rule() {
                Rule::not_op => UnaryOp::Not,
                Rule::neg_op => UnaryOp::Neg,
                Rule::plus_op => UnaryOp::Plus,
                rule => unreachable!("unexpected prefix {rule:?}"),
            };
            Ok(Expr::Unary {
                op,
                operand: Box::new(operand?),
            })
        })
        .map_postfix(|object, op| {
            let object = Box::new(object?);
            match op.as_rule() {
                Rule::member => Ok(Expr::Member {
                    object,
                    property: op.into_inner().as_str().to_string(),
                }),
                Rule::index => {
                    let text = op.as_str().to_string();
                    let index = op.into_inner().next().ok_or(ExpressionError::Syntax {
                        expression: text,
                        message: "empty index".to_string(),
                    })?;
                    Ok(Expr::Index {
                        object,
                        index: Box::new(build_expression(index)?),
                    })
                }
                rule => unreachable!("unexpected postfix {rule:?}"),
            }
        })
        .map_infix(|left, op, right| {
            let op = match op.as_rule() {
                Rule::or_op => BinaryOp::Or,
                Rule::and_op => BinaryOp::And,
                Rule::strict_eq_op => BinaryOp::StrictEq,
                Rule::strict_ne_op => BinaryOp::StrictNe,
                Rule::eq_op => BinaryOp::Eq,
                Rule::ne_op => BinaryOp::Ne,
                Rule::lt_op => BinaryOp::Lt,
                Rule::gt_op => BinaryOp::Gt,
                Rule::le_op => BinaryOp::Le,
                Rule::ge_op => BinaryOp::Ge,
                Rule::add_op => BinaryOp::Add,
                Rule::sub_op => BinaryOp::Sub,
                Rule::mul_op => BinaryOp::Mul,
                Rule::div_op => BinaryOp::Div,
                Rule::rem_op => BinaryOp::Rem,
                rule => unreachable!("unexpected infix {rule:?}"),
            };
            Ok(Expr::Binary {
                op,
                left: Box::new(left?),
                right: Box::new(right?),
            })
        })
        .parse(pairs)
}

fn build_primary(pair: Pair<Rule>) -> Result<Expr, ExpressionError> {
    let literal = |value| Ok(Expr::Literal { value });
    match pair.as_rule() {
        Rule::number => {
            let raw = pair.as_str();
            match raw.parse::<f64>() {
                Ok(n) if n.is_finite() => literal(Literal::Number(n)),
                _ => Err(ExpressionError::Number(raw.to_string())),
            }
        }
        Rule::string => {
            let chars = pair.into_inner().as_str();
            literal(Literal::String(unescape(chars)))
        }
        Rule::boolean => literal(Literal::Bool(pair.as_str() == "true")),
        Rule::null => literal(Literal::Null),
        Rule::undefined => literal(Literal::Undefined),
        Rule::ident => Ok(Expr::scope(pair.as_str())),
        Rule::paren => {
            let text = pair.as_str().to_string();
            let inner = pair.into_inner().next().ok_or(ExpressionError::Syntax {
                expression: text,
                message: "empty parentheses".to_string(),
            })?;
            build_expression(inner)
        }
        rule => unreachable!("unexpected primary {rule:?}"),
    }
}

fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('b') => out.push('\u{8}'),
            Some('f') => out.push('\u{c}'),
            Some('v') => out.push('\u{b}'),
            Some('0') => out.push('\0'),
            Some(other) => out.push(other),
            None => {}
        }
    }
    out
}

/// Finds the first assignment, compound assignment, `++` or `--` outside of
/// string literals.
fn find_unsupported_operator(source: &str) -> Option<String> {
    let bytes = source.as_bytes();
    let mut quote: Option<u8> = None;
    let mut i = 0usize;

    while i < bytes.len() {
        let b = bytes[i];
        if let Some(q) = quote {
            if b == b'\\' {
                i += 2;
                continue;
            }
            if b == q {
                quote = None;
            }
            i += 1;
            continue;
        }

        match b {
            b'"' | b'\'' => quote = Some(b),
            b'+' | b'-' if bytes.get(i + 1) == Some(&b) => {
                return Some(if b == b'+' { "++" } else { "--" }.to_string());
            }
            b'=' => {
                let prev = if i > 0 { bytes[i - 1] } else { 0 };
                let comparison = bytes.get(i + 1) == Some(&b'=') || matches!(prev, b'!' | b'<' | b'>');
                if !comparison {
                    return Some(match prev {
                        b'+' | b'-' | b'*' | b'/' | b'%' | b'&' | b'|' | b'^' => {
                            format!("{}=", prev as char)
                        }
                        _ => "=".to_string(),
                    });
                }
                while bytes.get(i) == Some(&b'=') {
                    i += 1;
                }
                continue;
            }
            _ => {}
        }
        i += 1;
    }
    None
}

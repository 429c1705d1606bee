use serde::Serialize;
use tracing::debug;

use crate::compiler::Compiler;
use crate::error::{DirectiveError, ExpressionError};
use crate::expression::{Expr, parse_expression};
use crate::text::{Token, scan_text};

/// Compiled description of one attribute, handed to the renderer as is.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Descriptor {
    pub name: String,
    pub value: String,
    pub directive: String,
    pub args: Vec<String>,
    pub one_time: bool,
    pub html: bool,
    pub expression: String,
    pub tree: Expr,
    /// Set when the descriptor came from `{{ }}` text rather than a
    /// prefixed directive attribute.
    pub is_interpolation: bool,
}

/// Compiles one attribute.
///
/// Values containing interpolation become a `bind` descriptor for the
/// attribute itself (`id="J_{{name}}"`). Everything else must be a prefixed
/// directive (`sk-for:item|once="list"`).
pub fn parse_directive(
    compiler: &Compiler,
    name: &str,
    value: &str,
) -> Result<Descriptor, DirectiveError> {
    if compiler.has_interpolation(value) {
        if compiler.is_directive_name(name) {
            return Err(DirectiveError::MixedDirective {
                name: name.to_string(),
                value: value.to_string(),
            });
        }
        return parse_interpolation(compiler, name, value);
    }

    let prefix = &compiler.config().prefix;
    let mismatch = || DirectiveError::NamingMismatch {
        name: name.to_string(),
        prefix: prefix.clone(),
    };
    let kind = compiler.directive_kind(name).ok_or_else(mismatch)?;

    let (directive, args) = match kind.split_once(':') {
        Some((directive, "")) => (directive, Vec::new()),
        Some((directive, rest)) => (directive, rest.split('|').map(str::to_string).collect()),
        None => (kind, Vec::new()),
    };
    if directive.is_empty() {
        return Err(mismatch());
    }

    let tree = parse_expression(value).map_err(|source| attribute_error(name, source))?;
    debug!(name, directive, args = ?args, "compiled directive");

    Ok(Descriptor {
        name: name.to_string(),
        value: value.to_string(),
        directive: directive.to_string(),
        args,
        one_time: false,
        html: false,
        expression: tree.to_code(compiler.style()),
        tree,
        is_interpolation: false,
    })
}

fn parse_interpolation(
    compiler: &Compiler,
    name: &str,
    value: &str,
) -> Result<Descriptor, DirectiveError> {
    let tokens = scan_text(compiler.patterns(), value);

    let (html, all_once, bindings) =
        tokens
            .iter()
            .fold((false, true, 0usize), |(html, once, n), token| match token {
                Token::Binding {
                    html: raw,
                    one_time,
                    ..
                } => (html || *raw, once && *one_time, n + 1),
                Token::Text { .. } => (html, once, n),
            });

    let tree = merge_tokens(&tokens).map_err(|source| attribute_error(name, source))?;
    debug!(name, bindings, html, "compiled interpolation");

    Ok(Descriptor {
        name: name.to_string(),
        value: value.to_string(),
        directive: "bind".to_string(),
        args: vec![name.to_string()],
        one_time: all_once && bindings > 0,
        html,
        expression: tree.to_code(compiler.style()),
        tree,
        is_interpolation: true,
    })
}

/// Joins the tokens of one value into a single expression. A lone binding
/// stays as is; anything else becomes a left-to-right concatenation.
pub fn merge_tokens(tokens: &[Token]) -> Result<Expr, ExpressionError> {
    let mut parts = tokens
        .iter()
        .map(|token| match token {
            Token::Text { value } => Ok(Expr::string(value.as_str())),
            Token::Binding { value, .. } => parse_expression(value),
        })
        .collect::<Result<Vec<_>, _>>()?;

    if parts.len() == 1 {
        return Ok(parts.remove(0));
    }
    Ok(Expr::Concat { parts })
}

fn attribute_error(name: &str, source: ExpressionError) -> DirectiveError {
    DirectiveError::Expression {
        name: name.to_string(),
        source,
    }
}

use serde::Serialize;
use tracing::debug;

use crate::compiler::Compiler;
use crate::directive::Descriptor;
use crate::error::TemplateError;
use crate::template_ast::{Node, TemplateAttr};
use crate::template_parse::parse_template_to_ast;
use crate::text::Token;

/// A text token plus, for bindings, its compiled code.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompiledToken {
    #[serde(flatten)]
    pub token: Token,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expression: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum CompiledNode {
    Element {
        tag: String,
        /// Attributes with neither a directive prefix nor interpolation.
        attrs: Vec<TemplateAttr>,
        directives: Vec<Descriptor>,
        children: Vec<CompiledNode>,
    },
    Text {
        tokens: Vec<CompiledToken>,
    },
}

/// Parses `source` and compiles every directive attribute, interpolated
/// attribute and text node in it.
pub fn compile_template(compiler: &Compiler, source: &str) -> Result<Vec<CompiledNode>, TemplateError> {
    let nodes = parse_template_to_ast(source)?;
    debug!(roots = nodes.len(), "parsed template");
    nodes.iter().map(|n| compile_node(compiler, n)).collect()
}

fn compile_node(compiler: &Compiler, node: &Node) -> Result<CompiledNode, TemplateError> {
    match node {
        Node::Text(text) => compile_text(compiler, text),
        Node::Element {
            tag,
            attrs,
            children,
            ..
        } => {
            let mut statics = Vec::new();
            let mut directives = Vec::new();
            for attr in attrs {
                let value = attr.value.as_deref().unwrap_or("");
                if compiler.is_directive_name(&attr.name) || compiler.has_interpolation(value) {
                    let descriptor = compiler.parse_directive(&attr.name, value).map_err(|source| {
                        TemplateError::Attribute {
                            tag: tag.clone(),
                            source,
                        }
                    })?;
                    directives.push(descriptor);
                } else {
                    statics.push(attr.clone());
                }
            }
            let children = children
                .iter()
                .map(|c| compile_node(compiler, c))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(CompiledNode::Element {
                tag: tag.clone(),
                attrs: statics,
                directives,
                children,
            })
        }
    }
}

fn compile_text(compiler: &Compiler, text: &str) -> Result<CompiledNode, TemplateError> {
    let tokens = compiler
        .scan_text(text)
        .into_iter()
        .map(|token| -> Result<CompiledToken, TemplateError> {
            let expression = match &token {
                Token::Binding { value, .. } => Some(compiler.compile_expression(value).map_err(
                    |source| TemplateError::Text {
                        text: text.to_string(),
                        source,
                    },
                )?),
                Token::Text { .. } => None,
            };
            Ok(CompiledToken { token, expression })
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(CompiledNode::Text { tokens })
}

pub mod compiler;
pub mod config;
pub mod delimiters;
pub mod directive;
pub mod error;
pub mod expression;
pub mod template_ast;
pub mod template_compile;
pub mod template_parse;
pub mod text;

pub use compiler::Compiler;
pub use config::CompilerConfig;
pub use delimiters::{Delimiters, Patterns};
pub use directive::{Descriptor, merge_tokens, parse_directive};
pub use error::{ConfigError, DirectiveError, ExpressionError, TemplateError};
pub use expression::{BinaryOp, CodeStyle, Expr, Literal, UnaryOp, compile_expression, parse_expression};
pub use template_ast::{Node, TemplateAttr};
pub use template_compile::{CompiledNode, CompiledToken, compile_template};
pub use template_parse::parse_template_to_ast;
pub use text::{Token, scan_text};

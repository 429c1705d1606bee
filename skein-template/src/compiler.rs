use regex::Regex;
use tracing::debug;

use crate::config::CompilerConfig;
use crate::delimiters::Patterns;
use crate::directive::{self, Descriptor};
use crate::error::{ConfigError, DirectiveError, ExpressionError, TemplateError};
use crate::expression::{self, CodeStyle, Expr};
use crate::template_compile::{self, CompiledNode};
use crate::text::{self, Token};

/// A validated configuration together with the patterns built from it.
///
/// Holds no mutable state; share it freely across threads.
#[derive(Debug, Clone)]
pub struct Compiler {
    config: CompilerConfig,
    patterns: Patterns,
    directive_name: Regex,
    style: CodeStyle,
}

impl Compiler {
    pub fn new(config: CompilerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let patterns = Patterns::build(&config.delimiters, &config.unsafe_delimiters)?;
        let directive_name = Regex::new(&format!("^{}-([^=]+)", regex::escape(&config.prefix)))?;
        let style = CodeStyle {
            scope: config.scope.clone(),
            filter_fn: config.filter_fn.clone(),
        };
        debug!(prefix = %config.prefix, "compiler ready");
        Ok(Self {
            config,
            patterns,
            directive_name,
            style,
        })
    }

    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    pub fn patterns(&self) -> &Patterns {
        &self.patterns
    }

    pub fn style(&self) -> &CodeStyle {
        &self.style
    }

    pub fn has_interpolation(&self, text: &str) -> bool {
        self.patterns.has_interpolation(text)
    }

    pub fn is_directive_name(&self, name: &str) -> bool {
        self.directive_name.is_match(name)
    }

    /// `sk-for:item` -> `for:item`
    pub(crate) fn directive_kind<'a>(&self, name: &'a str) -> Option<&'a str> {
        self.directive_name
            .captures(name)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
    }

    pub fn scan_text(&self, text: &str) -> Vec<Token> {
        text::scan_text(&self.patterns, text)
    }

    pub fn parse_expression(&self, text: &str) -> Result<Expr, ExpressionError> {
        expression::parse_expression(text)
    }

    pub fn compile_expression(&self, text: &str) -> Result<String, ExpressionError> {
        expression::compile_expression(text, &self.style)
    }

    pub fn parse_directive(&self, name: &str, value: &str) -> Result<Descriptor, DirectiveError> {
        directive::parse_directive(self, name, value)
    }

    pub fn compile_template(&self, source: &str) -> Result<Vec<CompiledNode>, TemplateError> {
        template_compile::compile_template(self, source)
    }
}

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use skein_template::{Compiler, CompilerConfig};
use tracing::{debug, info};

pub mod logging;

/// Loads a JSON compiler config, or the defaults when no path is given.
pub fn load_config(path: Option<&Path>) -> Result<CompilerConfig> {
    let Some(path) = path else {
        return Ok(CompilerConfig::default());
    };
    let src =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    let config = CompilerConfig::from_json(&src)
        .with_context(|| format!("invalid config {}", path.display()))?;
    debug!(path = %path.display(), prefix = %config.prefix, "loaded config");
    Ok(config)
}

pub fn compiler(config: Option<&Path>) -> Result<Compiler> {
    let config = load_config(config)?;
    Compiler::new(config).context("invalid compiler configuration")
}

/// Compile a template file into JSON. Writes to `out` when given and returns
/// the JSON either way.
pub fn compile_cmd(compiler: &Compiler, input: &Path, out: Option<&Path>) -> Result<String> {
    let src =
        fs::read_to_string(input).with_context(|| format!("failed to read {}", input.display()))?;

    let nodes = compiler
        .compile_template(&src)
        .with_context(|| format!("failed to compile {}", input.display()))?;
    let json = serde_json::to_string_pretty(&nodes)?;

    if let Some(out_path) = out {
        if let Some(dir) = out_path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)
                .with_context(|| format!("failed to create {}", dir.display()))?;
        }
        fs::write(out_path, &json)
            .with_context(|| format!("failed to write {}", out_path.display()))?;
        info!(path = %out_path.display(), "wrote compiled template");
    }
    Ok(json)
}

pub fn expr_cmd(compiler: &Compiler, text: &str, tree: bool) -> Result<String> {
    if tree {
        let expr = compiler.parse_expression(text)?;
        return Ok(serde_json::to_string_pretty(&expr)?);
    }
    Ok(compiler.compile_expression(text)?)
}

pub fn text_cmd(compiler: &Compiler, text: &str) -> Result<String> {
    Ok(serde_json::to_string_pretty(&compiler.scan_text(text))?)
}

pub fn directive_cmd(compiler: &Compiler, name: &str, value: &str) -> Result<String> {
    let descriptor = compiler
        .parse_directive(name, value)
        .with_context(|| format!("failed to compile attribute {name}"))?;
    Ok(serde_json::to_string_pretty(&descriptor)?)
}

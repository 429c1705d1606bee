use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use skein_cli::{compile_cmd, compiler, directive_cmd, expr_cmd, logging, text_cmd};

#[derive(Parser)]
#[command(name = "skein", version, about = "Skein template compiler")]
struct Cli {
    /// JSON compiler config (prefix, delimiters, unsafeDelimiters, scope, filterFn)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// More logging (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a template file into JSON descriptors.
    Compile {
        /// Path to the template
        input: PathBuf,
        /// Output file (default: stdout)
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Compile a single binding expression.
    Expr {
        text: String,
        /// Print the expression tree instead of code
        #[arg(long)]
        tree: bool,
    },
    /// Split text into literal and binding tokens.
    Text { text: String },
    /// Compile one attribute into a directive descriptor.
    Directive { name: String, value: String },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    if let Err(err) = logging::init(cli.verbose) {
        eprintln!("warning: {err}");
    }
    let compiler = compiler(cli.config.as_deref())?;

    match cli.command {
        Commands::Compile { input, out } => {
            let json = compile_cmd(&compiler, &input, out.as_deref())?;
            if out.is_none() {
                println!("{json}");
            }
        }
        Commands::Expr { text, tree } => println!("{}", expr_cmd(&compiler, &text, tree)?),
        Commands::Text { text } => println!("{}", text_cmd(&compiler, &text)?),
        Commands::Directive { name, value } => {
            println!("{}", directive_cmd(&compiler, &name, &value)?)
        }
    }
    Ok(())
}

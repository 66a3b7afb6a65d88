use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use cjsify_driver::diagnostics::write_parse_errors;
use cjsify_driver::{compile_source, load_options, logging, CompileError, OptionOverrides};
use cjsify_lexer::{Lexer, TokenKind};
use cjsify_modules::module_name;
use std::fs;
use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser)]
#[command(
    name = "cjsify",
    version,
    about = "Lowers ES modules to CommonJS",
    long_about = "Rewrites import/export declarations into require() calls and\nwrites to `exports`, keeping exported bindings live."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile an ES module to a CommonJS script
    Compile {
        /// Input JavaScript file
        input: PathBuf,

        /// Output file path (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        options: OptionArgs,

        /// Enable verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Parse a file and show the AST (debug)
    Parse {
        /// Input JavaScript file
        input: PathBuf,
    },

    /// Lex a file and show tokens (debug)
    Lex {
        /// Input JavaScript file
        input: PathBuf,

        /// Show token positions
        #[arg(short, long)]
        positions: bool,
    },

    /// Print the module name derived for a file
    ModuleName {
        /// Input JavaScript file
        input: PathBuf,

        #[command(flatten)]
        options: OptionArgs,
    },
}

#[derive(Args)]
struct OptionArgs {
    /// JSON file with module options (camelCase keys)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Prefix for derived module names
    #[arg(long)]
    module_root: Option<String>,

    /// Directory stripped from relative filenames
    #[arg(long)]
    source_root: Option<String>,

    /// Omit the "use strict" directive
    #[arg(long)]
    no_strict: bool,

    /// Omit the __esModule marker
    #[arg(long)]
    no_es_module_marker: bool,
}

impl OptionArgs {
    fn overrides(&self) -> OptionOverrides {
        OptionOverrides {
            module_root: self.module_root.clone(),
            source_root: self.source_root.clone(),
            no_strict: self.no_strict,
            no_es_module_marker: self.no_es_module_marker,
        }
    }
}

fn main() -> ExitCode {
    logging::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Compile {
            input,
            output,
            options,
            verbose,
        } => compile_command(&input, output.as_deref(), &options, verbose),
        Commands::Parse { input } => parse_command(&input),
        Commands::Lex { input, positions } => lex_command(&input, positions),
        Commands::ModuleName { input, options } => module_name_command(&input, &options),
    };

    match result {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn compile_command(input: &Path, output: Option<&Path>, args: &OptionArgs, verbose: bool) -> Result<ExitCode> {
    let options = load_options(input, args.config.as_deref(), &args.overrides())?;
    if verbose {
        eprintln!("Compiling: {}", input.display());
        eprintln!("Module name: {}", module_name(&options));
    }

    let source = read_source_file(input)?;
    let compiled = match compile_source(&source, &options) {
        Ok(compiled) => compiled,
        Err(CompileError::Parse(errors)) => {
            report_parse_errors(&errors, input, &source)?;
            return Ok(ExitCode::FAILURE);
        }
        Err(err) => return Err(err).with_context(|| format!("failed to lower {}", input.display())),
    };

    match output {
        Some(path) => {
            fs::write(path, &compiled).with_context(|| format!("failed to write {}", path.display()))?;
            if verbose {
                eprintln!("Output written to: {}", path.display());
            }
        }
        None => print!("{}", compiled),
    }
    Ok(ExitCode::SUCCESS)
}

fn parse_command(input: &Path) -> Result<ExitCode> {
    let source = read_source_file(input)?;
    match cjsify_parser::parse_source(&source, 0) {
        Ok(program) => {
            println!("{:#?}", program);
            Ok(ExitCode::SUCCESS)
        }
        Err(errors) => {
            report_parse_errors(&errors, input, &source)?;
            Ok(ExitCode::FAILURE)
        }
    }
}

fn lex_command(input: &Path, positions: bool) -> Result<ExitCode> {
    let source = read_source_file(input)?;
    let tokens = Lexer::new(&source).tokenize();

    println!("Tokens for {}:\n", input.display());
    println!("{}", "=".repeat(80));
    for (i, token) in tokens.iter().enumerate() {
        if token.kind == TokenKind::Eof {
            println!("\n{:4} | {:?}", i, token.kind);
            break;
        }
        if positions {
            println!(
                "{:4} | {:20?} | {:?} | {}..{}",
                i, token.kind, token.value, token.span.start, token.span.end
            );
        } else {
            println!("{:4} | {:20?} | {:?}", i, token.kind, token.value);
        }
    }
    println!("{}", "=".repeat(80));
    println!("\nTotal tokens: {}", tokens.len());

    let error_count = tokens.iter().filter(|t| t.kind == TokenKind::Error).count();
    if error_count > 0 {
        println!("\nLexer errors found: {}", error_count);
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

fn module_name_command(input: &Path, args: &OptionArgs) -> Result<ExitCode> {
    let options = load_options(input, args.config.as_deref(), &args.overrides())?;
    println!("{}", module_name(&options));
    Ok(ExitCode::SUCCESS)
}

fn read_source_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn report_parse_errors(errors: &[cjsify_parser::ParseError], input: &Path, source: &str) -> Result<()> {
    let filename = input.to_string_lossy();
    let stderr = io::stderr();
    let color = stderr.is_terminal();
    write_parse_errors(errors, &filename, source, color, stderr.lock()).context("failed to print diagnostics")
}

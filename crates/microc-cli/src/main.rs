//! `microc` — drives the lex -> parse -> reduce -> analyze -> build-IR
//! pipeline over a source file and renders whichever stages `--emit` asks
//! for, either as plain text or as JSON.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use serde_json::json;

use microc_core::grammar::{load_grammar_from_str, Grammar};
use microc_core::ir::print_quads;
use microc_core::lexer::Backend;
use microc_core::pipeline::{compile, PipelineConfig, Status};
use microc_core::token::token_to_terminal;

#[derive(Parser)]
#[command(name = "microc", version, about = "Front end for a small C-like educational language")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the full pipeline over a source file.
    Compile {
        file: PathBuf,

        #[arg(long, value_enum, default_value_t = LexBackend::Manual)]
        backend: LexBackend,

        #[arg(long, value_enum, value_delimiter = ',', default_values_t = [Emit::Quads])]
        emit: Vec<Emit>,

        /// Load a grammar description instead of the built-in default grammar.
        #[arg(long)]
        grammar: Option<PathBuf>,

        /// Print the selected sections as a single JSON object.
        #[arg(long)]
        json: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum LexBackend {
    Manual,
    Auto,
}

impl From<LexBackend> for Backend {
    fn from(backend: LexBackend) -> Backend {
        match backend {
            LexBackend::Manual => Backend::Manual,
            LexBackend::Auto => Backend::Auto,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Emit {
    Tokens,
    Cst,
    Ast,
    Symbols,
    Quads,
}

fn main() -> ExitCode {
    match Cli::parse().command {
        Command::Compile {
            file,
            backend,
            emit,
            grammar,
            json,
        } => run_compile(&file, backend, &emit, grammar.as_deref(), json),
    }
}

fn run_compile(file: &PathBuf, backend: LexBackend, emit: &[Emit], grammar_path: Option<&std::path::Path>, json: bool) -> ExitCode {
    let source = match fs::read_to_string(file) {
        Ok(source) => source,
        Err(err) => {
            eprintln!("error: could not read {}: {err}", file.display());
            return ExitCode::FAILURE;
        }
    };

    let grammar = match grammar_path {
        Some(path) => match fs::read_to_string(path) {
            Ok(text) => {
                let mut grammar = Grammar::new();
                load_grammar_from_str(&text, &mut grammar);
                Some(grammar)
            }
            Err(err) => {
                eprintln!("error: could not read grammar {}: {err}", path.display());
                return ExitCode::FAILURE;
            }
        },
        None => None,
    };

    let config = PipelineConfig {
        backend: backend.into(),
        grammar,
        ..PipelineConfig::default()
    };

    let result = compile(&source, &config);

    if json {
        print_json(&result, emit);
    } else {
        print_plain(&result, emit);
    }

    if !result.parse_table_is_ll1 {
        eprintln!("warning: grammar is not LL(1); the parse table has unresolved conflicts");
    }

    match result.status {
        Status::Ok => ExitCode::SUCCESS,
        _ => ExitCode::FAILURE,
    }
}

fn print_plain(result: &microc_core::pipeline::PipelineResult, emit: &[Emit]) {
    if !result.lex_errors.is_empty() {
        println!("-- lexical errors --");
        for err in &result.lex_errors {
            println!("{err}");
        }
    }

    for selection in emit {
        match selection {
            Emit::Tokens => {
                println!("-- tokens --");
                for token in &result.tokens {
                    println!("{:>5}  {:<14} {}", token.line, token_to_terminal(token), token.lexeme);
                }
            }
            Emit::Cst => {
                if let Some(cst) = &result.cst {
                    println!("-- concrete syntax tree --");
                    let mut out = String::new();
                    cst.print_tree(0, &mut out);
                    print!("{out}");
                }
            }
            Emit::Ast => {
                if let Some(ast) = &result.ast {
                    println!("-- abstract syntax tree --");
                    let mut out = String::new();
                    ast.print_tree(0, &mut out);
                    print!("{out}");
                }
            }
            Emit::Symbols => {
                println!("-- constants --");
                for (name, value) in &result.constants {
                    println!("{name} = {value}");
                }
                if let Some(symbols) = &result.symbols {
                    println!("-- symbol table --");
                    println!("{symbols:#?}");
                }
            }
            Emit::Quads => {
                println!("-- quadruples --");
                println!("{}", print_quads(&result.quadruples));
            }
        }
    }

    if !result.semantic_errors.is_empty() {
        println!("-- semantic errors --");
        for err in &result.semantic_errors {
            println!("{err}");
        }
    }
}

fn print_json(result: &microc_core::pipeline::PipelineResult, emit: &[Emit]) {
    let mut sections = serde_json::Map::new();
    for selection in emit {
        match selection {
            Emit::Tokens => {
                sections.insert("tokens".to_string(), json!(result.tokens));
            }
            Emit::Cst => {
                sections.insert("cst".to_string(), json!(result.cst));
            }
            Emit::Ast => {
                sections.insert("ast".to_string(), json!(result.ast));
            }
            Emit::Symbols => {
                sections.insert("constants".to_string(), json!(result.constants));
            }
            Emit::Quads => {
                sections.insert("quadruples".to_string(), json!(result.quadruples));
            }
        }
    }

    let status = match result.status {
        Status::Ok => "ok",
        Status::LexErrors => "lex_errors",
        Status::ParseError => "parse_error",
        Status::SemanticErrors => "semantic_errors",
    };

    let payload = json!({
        "status": status,
        "lex_errors": result.lex_errors,
        "semantic_errors": result.semantic_errors,
        "parse_table_is_ll1": result.parse_table_is_ll1,
        "sections": sections,
    });
    println!("{}", serde_json::to_string_pretty(&payload).unwrap_or_else(|_| "{}".to_string()));
}

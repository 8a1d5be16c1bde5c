//! javasym CLI

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::rc::Rc;

use javasym::ast::{Ast, NodeKind};
use javasym::decl::library::core_types;
use javasym::error::report_error;
use javasym::solver::{AstTypeSolver, CombinedTypeSolver, LibraryTypeSolver};
use javasym::SymbolResolver;

#[derive(Parser)]
#[command(
    name = "javasym",
    version,
    about = "Symbol and type resolution for Java syntax trees"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Resolve the type of every expression in a serialized syntax tree
    Resolve {
        /// Syntax tree (JSON) to resolve
        file: PathBuf,
        /// Original source file, for rich diagnostics
        #[arg(long)]
        source: Option<PathBuf>,
        /// Skip the built-in core-library registry
        #[arg(long)]
        no_lib: bool,
    },
    /// Parse and pretty-print a serialized syntax tree (debug)
    Dump {
        /// Syntax tree (JSON) to print
        file: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Resolve {
            file,
            source,
            no_lib,
        } => resolve_file(&file, source.as_deref(), no_lib),
        Command::Dump { file } => dump_file(&file),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn load_ast(path: &Path) -> Result<Ast, Box<dyn std::error::Error>> {
    let json = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&json)?)
}

fn resolve_file(
    path: &Path,
    source: Option<&Path>,
    no_lib: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let ast = Rc::new(load_ast(path)?);

    let mut solver = CombinedTypeSolver::new();
    solver.add(AstTypeSolver::new(Rc::clone(&ast)));
    if !no_lib {
        solver.add(LibraryTypeSolver::new(core_types()));
    }
    let resolver = SymbolResolver::new(&solver);

    let source_text = source.map(std::fs::read_to_string).transpose()?;

    let mut failures = 0usize;
    for id in ast.ids() {
        // Every expression that stands on its own: statement expressions,
        // returned values, and initializers.
        let expr = match ast.kind(id) {
            NodeKind::ExprStmt { expr } => *expr,
            NodeKind::Return { expr: Some(expr) } => *expr,
            NodeKind::VarDeclarator {
                init: Some(init), ..
            } => *init,
            _ => continue,
        };
        match resolver.get_type(&ast, expr) {
            Ok(usage) => println!("{}  {}", ast.span(expr), usage),
            Err(e) => {
                failures += 1;
                match (&source_text, source) {
                    (Some(text), Some(name)) => {
                        report_error(&name.display().to_string(), text, &e);
                    }
                    _ => eprintln!("{}: {e}", ast.span(expr)),
                }
            }
        }
    }

    if failures > 0 {
        return Err(format!("{failures} expression(s) failed to resolve").into());
    }
    Ok(())
}

fn dump_file(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let ast = load_ast(path)?;
    println!("{}", serde_json::to_string_pretty(&ast)?);
    Ok(())
}

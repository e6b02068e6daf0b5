//! cellflow CLI - formula evaluation and sheet file tool

use anyhow::{Context, Result};
use cellflow::prelude::*;
use cellflow::{evaluate, parse_formula, NoCells};
use clap::{Parser, Subcommand};
use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "cellflow")]
#[command(author, version, about = "Spreadsheet formula evaluation tool")]
struct Cli {
    /// Log recalculation details to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate a formula that reads no cells
    Eval {
        /// Formula text, e.g. "=POW(2, 10) / 4"
        formula: String,
    },

    /// Print the expression tree of a formula
    Tree {
        /// Formula text
        formula: String,
    },

    /// Load a sheet file and print every cell with its value
    Show {
        /// Input .sheets file
        input: PathBuf,
    },

    /// Set one cell of a sheet file and save it
    Set {
        /// Sheet file to edit (created if missing)
        file: PathBuf,

        /// Cell identifier, e.g. B3
        reference: String,

        /// New cell text; empty clears the cell
        text: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Eval { formula } => eval(&formula),
        Commands::Tree { formula } => tree(&formula),
        Commands::Show { input } => show(&input),
        Commands::Set {
            file,
            reference,
            text,
        } => set(&file, &reference, &text),
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn eval(formula: &str) -> Result<()> {
    let ast = parse_formula(formula).with_context(|| format!("Failed to parse '{}'", formula))?;
    let value =
        evaluate(&ast, &NoCells).with_context(|| format!("Failed to evaluate '{}'", formula))?;
    println!("{}", value);
    Ok(())
}

fn tree(formula: &str) -> Result<()> {
    let ast = parse_formula(formula).with_context(|| format!("Failed to parse '{}'", formula))?;
    print!("{}", ast.pretty_print());
    Ok(())
}

fn show(input: &Path) -> Result<()> {
    let sheet =
        Sheet::open(input).with_context(|| format!("Failed to open '{}'", input.display()))?;

    for (reference, cell) in sheet.iter() {
        println!("{}\t{}\t{}", reference, cell.text(), cell.display_value());
    }

    let errors = sheet.iter().filter(|(_, cell)| cell.is_error()).count();
    eprintln!("{} cells ({} errors)", sheet.len(), errors);
    Ok(())
}

fn set(file: &Path, identifier: &str, text: &str) -> Result<()> {
    let reference: CellReference = identifier
        .parse()
        .with_context(|| format!("Invalid cell reference '{}'", identifier))?;

    let mut sheet = if file.exists() {
        Sheet::open(file).with_context(|| format!("Failed to open '{}'", file.display()))?
    } else {
        debug!(path = %file.display(), "creating new sheet");
        Sheet::new()
    };

    let changed = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&changed);
    sheet.set_listener(Box::new(move |r: CellReference| sink.borrow_mut().push(r)));
    sheet.set(reference, text);

    sheet
        .save(file)
        .with_context(|| format!("Failed to write '{}'", file.display()))?;

    for r in changed.borrow().iter() {
        let shown = sheet
            .cell(r)
            .map(Cell::display_value)
            .unwrap_or_default();
        println!("{}\t{}", r, shown);
    }
    Ok(())
}

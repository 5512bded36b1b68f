// src/main.rs
//
// tagtree — edit one-tag-per-line HTML documents
//
// Input is one token per line: an opening tag `<name>`, a closing tag `</name>`
// or a line of text. The first line opens the document element. Edits run in
// the order given and the result is written back in the same shape.
//
// Edits (-e/--edit, repeatable):
//   replace:OLD:NEW : rename every OLD element to NEW
//   bold-row:N      : wrap each column of row N of the first table in <b>
//   remove:TAG      : drop p/em/b (content moves up) or ol/ul (items become <p>)
//   add:WORD:TAG    : wrap whole-word occurrences of WORD in <em> or <b>
//
// Output goes to OUTPUT, back to INPUT with --in-place, or to stdout.

use clap::{ArgAction, Parser};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use tagtree::{BuildOptions, DocumentTree, Edit, Error, Result};

/// CLI flags
#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    /// Edit to apply; repeat to apply several, in order
    #[arg(short, long = "edit", value_name = "EDIT")]
    edits: Vec<Edit>,

    /// Reject mismatched closing tags, empty elements and unclosed elements
    #[arg(long, action = ArgAction::SetTrue)]
    strict: bool,

    /// Overwrite the input file with the result
    #[arg(short, long, action = ArgAction::SetTrue, conflicts_with = "output")]
    in_place: bool,

    /// Log more (-v info, -vv debug, -vvv trace); RUST_LOG overrides
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Input file
    input: PathBuf,

    /// Output file (default: stdout)
    output: Option<PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("tagtree: {err}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn run(cli: &Cli) -> Result<()> {
    let src = fs::read_to_string(&cli.input).map_err(|source| io_error(&cli.input, source))?;
    let options = BuildOptions { strict: cli.strict };
    let mut tree = DocumentTree::build_with(src.lines(), options)?;
    log::info!(
        "{}: {} node(s)",
        cli.input.display(),
        tree.descendants().count()
    );

    for edit in &cli.edits {
        let changed = edit.apply(&mut tree)?;
        log::info!("{edit}: {changed} change(s)");
    }

    let out = tree.render();
    let out_path = if cli.in_place {
        Some(&cli.input)
    } else {
        cli.output.as_ref()
    };
    match out_path {
        Some(path) => fs::write(path, out).map_err(|source| io_error(path, source)),
        None => io::stdout()
            .lock()
            .write_all(out.as_bytes())
            .map_err(|source| io_error(Path::new("<stdout>"), source)),
    }
}

fn io_error(path: &Path, source: io::Error) -> Error {
    Error::Io {
        path: path.to_path_buf(),
        source,
    }
}

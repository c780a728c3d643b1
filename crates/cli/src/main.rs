// ABOUTME: CLI for cleaning HTML exported by MS Word using wordclean-core.
// ABOUTME: Edits files, folders or a file list in place and prints a JSON summary; "-" filters stdin to stdout.

use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::Parser;
use serde_json::json;
use tracing::debug;
use tracing_subscriber::EnvFilter;
use wordclean_core::editor::decode;
use wordclean_core::{CleanOptions, Cleaner, EditSummary, Editor};

/// Strip MS Word artifacts from HTML files.
#[derive(Parser, Debug)]
#[command(name = "wordclean")]
#[command(about = "Clean HTML exported by MS Word and rebuild its table of contents", long_about = None)]
struct Args {
    /// HTML files or folders to edit in place. Use "-" to filter stdin to stdout.
    targets: Vec<String>,

    /// File listing one path per line; lines starting with '#' are ignored.
    #[arg(short = 'l', long = "list")]
    list: Option<PathBuf>,

    /// Write the cleaned document here instead of in place (single file or "-" only).
    #[arg(short = 'o', long = "output")]
    output: Option<PathBuf>,

    /// JSON file with cleaning options; flags below override it.
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Leave the MsoToc paragraphs as they are.
    #[arg(long = "no-toc")]
    no_toc: bool,

    /// Drop <del> and unwrap <ins>.
    #[arg(long = "accept-changes")]
    accept_changes: bool,

    /// Shift h1-h5 one level down.
    #[arg(long = "demote-headings")]
    demote_headings: bool,

    /// Remove <br> directly after headings, paragraphs, divs and tables.
    #[arg(long = "remove-block-breaks")]
    remove_block_breaks: bool,

    /// Remove <script> elements from <head>.
    #[arg(long = "strip-head-scripts")]
    strip_head_scripts: bool,

    /// Append <!-- TEXT --> to every cleaned document.
    #[arg(long = "signature")]
    signature: Option<String>,

    /// Encoding of the input files, or "auto" to detect it.
    #[arg(long = "input-encoding")]
    input_encoding: Option<String>,

    /// Encoding to write.
    #[arg(long = "output-encoding")]
    output_encoding: Option<String>,

    /// Output compact JSON instead of pretty.
    #[arg(long, default_value_t = false)]
    compact: bool,

    /// Log progress to stderr; repeat for more detail.
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn build_options(args: &Args) -> Result<CleanOptions> {
    let mut opts = match &args.config {
        Some(path) => CleanOptions::load(path)?,
        None => CleanOptions::default(),
    };
    if args.no_toc {
        opts.artifacts.rebuild_toc = false;
    }
    opts.accept_tracked_changes |= args.accept_changes;
    opts.demote_headings |= args.demote_headings;
    opts.remove_breaks_after_blocks |= args.remove_block_breaks;
    opts.remove_header_scripts |= args.strip_head_scripts;
    if let Some(signature) = &args.signature {
        opts.signature = Some(signature.clone());
    }
    if let Some(label) = &args.input_encoding {
        opts.input_encoding = label.clone();
    }
    if let Some(label) = &args.output_encoding {
        opts.output_encoding = label.clone();
    }
    debug!(?opts, "options");
    Ok(opts)
}

fn validate(args: &Args) -> Result<()> {
    if args.targets.is_empty() && args.list.is_none() {
        bail!("at least one file or folder is required, or use --list");
    }
    let stdin = args.targets.iter().any(|t| t == "-");
    if stdin && (args.targets.len() > 1 || args.list.is_some()) {
        bail!("\"-\" cannot be combined with other targets");
    }
    if args.output.is_some() {
        let single_file =
            args.list.is_none() && args.targets.len() == 1 && !Path::new(&args.targets[0]).is_dir();
        if !single_file {
            bail!("--output is only valid with a single file target");
        }
    }
    Ok(())
}

/// Reads a document from stdin and writes the cleaned result to stdout or `output`.
fn filter_stdin(cleaner: &Cleaner, output: Option<&Path>) -> Result<()> {
    let opts = cleaner.options();
    let mut bytes = Vec::new();
    io::stdin().read_to_end(&mut bytes)?;

    let (html, _) = decode(&bytes, &opts.input_encoding, Path::new("-"))?;
    let target = output.unwrap_or(Path::new("-"));
    let mut editor = Editor::from_html(target, &html);
    let report = editor.clean(opts);
    debug!(?report, "cleaned stdin");

    let encoded = editor.to_bytes(&opts.output_encoding)?;
    match output {
        Some(path) => fs::write(path, encoded).with_context(|| format!("writing {}", path.display()))?,
        None => io::stdout().write_all(&encoded)?,
    }
    Ok(())
}

fn edit_targets(cleaner: &Cleaner, args: &Args) -> Result<EditSummary> {
    let mut summary = EditSummary::default();

    if let Some(list) = &args.list {
        summary.merge(cleaner.bulk_edit(list)?);
    }

    for target in &args.targets {
        let path = Path::new(target);
        if path.is_dir() {
            match cleaner.edit_folder(path) {
                Ok(folder) => summary.merge(folder),
                Err(e) => summary.record(path, Err(e)),
            }
        } else if let Some(output) = &args.output {
            summary.record(path, cleaner.edit_file_as(path, output));
        } else {
            summary.record(path, cleaner.edit_file(path));
        }
    }
    Ok(summary)
}

fn run(args: &Args) -> Result<bool> {
    validate(args)?;
    let cleaner = Cleaner::new(build_options(args)?);

    if args.targets.iter().any(|t| t == "-") {
        filter_stdin(&cleaner, args.output.as_deref())?;
        return Ok(true);
    }

    let summary = edit_targets(&cleaner, args)?;
    let output = json!({
        "files": summary.files,
        "total_files": summary.files.len(),
        "edited": summary.edited,
        "skipped": summary.skipped,
        "failed": summary.failed
    });

    if args.compact {
        println!("{}", serde_json::to_string(&output)?);
    } else {
        println!("{}", serde_json::to_string_pretty(&output)?);
    }

    Ok(summary.failed == 0)
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    match run(&args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::from(1)
        }
    }
}

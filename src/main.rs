use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use clap::{Parser, ValueEnum};
use esm_catalogue::{Catalogue, LoadOptions, parse_encoding};

mod logging;

#[derive(Parser, Debug)]
#[command(name = "esm-inspect")]
#[command(version, about = "Load a plugin load order and summarise its records")]
struct Cli {
    /// Plugin files in load order (masters first)
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Text encoding of the plugins' strings
    #[arg(long, default_value = "windows-1252")]
    encoding: String,

    /// Treat references to undefined records as errors
    #[arg(long, default_value_t = false)]
    strict_references: bool,

    /// Treat duplicate identifiers, including overrides, as errors
    #[arg(long, default_value_t = false)]
    strict_uniqueness: bool,

    /// Drop records with unknown sub-chunks instead of rejecting the file
    #[arg(long, default_value_t = false)]
    skip_unknown: bool,

    /// Stop at the first file that fails to load
    #[arg(long, default_value_t = false)]
    stop_on_error: bool,

    /// Print the identifiers of one record kind
    #[arg(long, value_enum)]
    list: Option<Kind>,

    /// Increase logging verbosity (use together with RUST_LOG for fine control)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Kind {
    Doors,
    Books,
    Creatures,
    Scripts,
    Sounds,
    Statics,
    Skills,
    MagicEffects,
    Attributes,
    Lands,
    Cells,
    Pathgrids,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("{:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose)?;

    let encoding = parse_encoding(&cli.encoding)
        .ok_or_else(|| anyhow!("unknown encoding '{}'", cli.encoding))?;
    let options = LoadOptions::default()
        .with_encoding(encoding)
        .with_strict_references(cli.strict_references)
        .with_strict_uniqueness(cli.strict_uniqueness)
        .with_skip_unknown_records(cli.skip_unknown)
        .with_stop_on_first_error(cli.stop_on_error);

    let mut catalogue = Catalogue::new(options);
    let report = catalogue
        .load_all(&cli.files)
        .context("loading plugins")?;
    catalogue.set_up().context("setting up catalogue")?;

    println!("Load order:");
    for (index, file) in catalogue.files().iter().enumerate() {
        println!(
            "  [{:02X}] {} (version {:.2}, {} masters{})",
            index,
            file.name,
            file.version,
            file.masters.len(),
            if file.is_master() { ", master" } else { "" }
        );
    }
    for (path, error) in &report.failed {
        println!("  FAILED {}: {}", path.display(), error);
    }

    println!("\nRecords:");
    for (name, count) in catalogue.counts() {
        println!("  {:<16}{}", name, count);
    }

    let diagnostics: Vec<_> = catalogue.diagnostics().collect();
    if !diagnostics.is_empty() {
        println!("\nDiagnostics ({}):", diagnostics.len());
        for diagnostic in diagnostics.iter().take(50) {
            println!("  {}", diagnostic);
        }
        if diagnostics.len() > 50 {
            println!("  ... and {} more", diagnostics.len() - 50);
        }
    }

    if let Some(kind) = cli.list {
        println!("\n{:?}:", kind);
        for id in identifiers(&catalogue, kind) {
            println!("  {}", id);
        }
    }

    if report.is_clean() {
        Ok(())
    } else {
        Err(anyhow!("{} of {} files failed to load", report.failed.len(), cli.files.len()))
    }
}

fn identifiers(catalogue: &Catalogue, kind: Kind) -> Vec<String> {
    match kind {
        Kind::Doors => catalogue.doors().list_identifiers(),
        Kind::Books => catalogue.books().list_identifiers(),
        Kind::Creatures => catalogue.creatures().list_identifiers(),
        Kind::Scripts => catalogue.scripts().list_identifiers(),
        Kind::Sounds => catalogue.sounds().list_identifiers(),
        Kind::Statics => catalogue.statics().list_identifiers(),
        Kind::Skills => catalogue.skills().list_identifiers(),
        Kind::MagicEffects => catalogue.magic_effects().list_identifiers(),
        Kind::Attributes => catalogue
            .attributes()
            .iter()
            .map(|attribute| attribute.name_setting.to_string())
            .collect(),
        Kind::Lands => catalogue.lands().list_identifiers(),
        Kind::Cells => catalogue.cells().list_identifiers(),
        Kind::Pathgrids => catalogue.pathgrids().list_identifiers(),
    }
}

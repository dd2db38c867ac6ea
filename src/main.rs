//! Command-line interface for pagexml

#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};

#[cfg(feature = "cli")]
use std::fs;
#[cfg(feature = "cli")]
use std::path::{Path, PathBuf};

#[cfg(feature = "cli")]
use pagexml::loaders::Location;
#[cfg(feature = "cli")]
use pagexml::{
    probe_document_kind, serialize_document, Document, Limits, Loader, NamespaceMap, PcGts,
};

#[cfg(feature = "cli")]
#[derive(Parser, Debug)]
#[command(name = "pagexml")]
#[command(author, version, about = "PAGE-XML checking and conversion tool", long_about = None)]
struct Cli {
    /// Use strict input limits (depth 100, 10 MB)
    #[arg(long, global = true)]
    strict: bool,

    #[command(subcommand)]
    command: Commands,
}

#[cfg(feature = "cli")]
#[derive(Subcommand, Debug)]
enum Commands {
    /// Parse a PAGE document and print a summary
    Check {
        /// Path to the PAGE-XML file
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Parse a PAGE document and write it back out
    Roundtrip {
        /// Path to the PAGE-XML file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Convert a PAGE document to JSON
    Json {
        /// Path to the PAGE-XML file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Pretty print the output
        #[arg(short, long)]
        pretty: bool,
    },
}

#[cfg(feature = "cli")]
fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let limits = if cli.strict { Limits::strict() } else { Limits::default() };
    let loader = Loader::new().with_limits(limits);

    let result = match cli.command {
        Commands::Check { file } => cmd_check(&loader, &file),
        Commands::Roundtrip { file, output } => cmd_roundtrip(&loader, &file, output),
        Commands::Json { file, pretty } => cmd_json(&loader, &file, pretty),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Parse `file`, returning the document and the namespace it was written in
#[cfg(feature = "cli")]
fn load(loader: &Loader, file: &Path) -> Result<(PcGts, NamespaceMap), Box<dyn std::error::Error>> {
    let document: Document = loader.load_document(&Location::from(file))?;
    let root = document.root().ok_or("XML document has no root element")?;

    let ns = match root.namespace() {
        Some(uri) => NamespaceMap::with_default(uri),
        None => NamespaceMap::new(),
    };

    let pcgts = probe_document_kind(root)?.ok_or_else(|| {
        format!(
            "{} is not a PAGE document (root is {})",
            file.display(),
            root.qname
        )
    })?;
    Ok((pcgts, ns))
}

#[cfg(feature = "cli")]
fn cmd_check(loader: &Loader, file: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let (pcgts, ns) = load(loader, file)?;
    let page = &pcgts.page;

    println!("pagexml v{}", pagexml::VERSION);
    println!();
    println!("Document: {}", file.display());
    println!("  Id: {}", pcgts.pc_gts_id.as_deref().unwrap_or("(none)"));
    println!("  Namespace: {}", ns.get_default_namespace().unwrap_or("(none)"));
    println!("  Creator: {}", pcgts.metadata.creator);
    println!("  Last change: {}", pcgts.metadata.last_change);
    println!();
    println!("Page:");
    println!("  Image: {} ({}x{})", page.image_filename, page.image_width, page.image_height);
    println!("  Top-level regions: {}", page.regions.len());
    println!("  All regions: {}", page.all_regions().count());
    println!("  Lines: {}", page.lines().count());

    if let Some(ref reading_order) = page.reading_order {
        println!("  Reading order: {} references", reading_order.region_refs().len());
        for region_ref in page.unresolved_region_refs() {
            println!("  ! unresolved region reference '{}'", region_ref.region_ref);
        }
    }

    println!();
    println!("✓ Document is well-formed PAGE");
    Ok(())
}

#[cfg(feature = "cli")]
fn cmd_roundtrip(
    loader: &Loader,
    file: &Path,
    output: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let (pcgts, ns) = load(loader, file)?;
    let xml = Document::with_root(serialize_document(&pcgts, &ns)).to_xml_string()?;

    if let Some(output_path) = output {
        fs::write(output_path, &xml)?;
    } else {
        println!("{}", xml);
    }
    Ok(())
}

#[cfg(feature = "cli")]
fn cmd_json(loader: &Loader, file: &Path, pretty: bool) -> Result<(), Box<dyn std::error::Error>> {
    let (pcgts, _) = load(loader, file)?;

    let json_str = if pretty {
        serde_json::to_string_pretty(&pcgts)?
    } else {
        serde_json::to_string(&pcgts)?
    };
    println!("{}", json_str);
    Ok(())
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("CLI feature not enabled. Rebuild with --features cli");
    std::process::exit(1);
}

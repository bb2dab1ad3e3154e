//! pagechunk CLI - structure-aware document chunking tool

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;

use pagechunk::config::{CHUNK_OVERLAP_LIST_ENV, CHUNK_SIZE_LIST_ENV, DOC_SUM_NUM_ENV};
use pagechunk::{
    load_pages, ChunkConfig, ChunkOptions, ElementConsolidator, ElementKind, ElementValue,
    JsonFormat, MultiScaleChunker, TableFormat,
};

#[derive(Parser)]
#[command(name = "pagechunk")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Split page-structured documents into retrieval-ready chunks", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Chunk a page JSON file at one or more resolutions
    Chunk {
        /// Input page JSON file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Single chunk size; overlap is a fifth of it
        #[arg(short = 's', long, value_name = "N")]
        chunk_size: Option<usize>,

        /// Chunk sizes, one per resolution (e.g., "200,400,800")
        #[arg(long, env = "CHUNK_SIZE_LIST", value_name = "LIST")]
        chunk_sizes: Option<String>,

        /// Chunk overlaps paired with the chunk sizes (e.g., "40,80,160")
        #[arg(long, env = "CHUNK_OVERLAP_LIST", value_name = "LIST")]
        chunk_overlaps: Option<String>,

        /// Table rendering inside chunks
        #[arg(long, value_enum, ignore_case = true, env = "TABLE_FORMAT", default_value = "markdown")]
        table_format: TableMode,

        /// Maximum number of pages per batch
        #[arg(long, env = "DOC_SUM_NUM", value_name = "N")]
        summary_pages: Option<usize>,

        /// Extra separator appended to the splitting cascade (repeatable)
        #[arg(long = "separator", value_name = "SEP")]
        separators: Vec<String>,

        /// Fail on placeholders without a rendering
        #[arg(long)]
        strict: bool,

        /// Disable parallel processing
        #[arg(long)]
        sequential: bool,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Consolidate pages and print their elements as JSON
    Elements {
        /// Input page JSON file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Consolidate pages and write a plain text dump
    Dump {
        /// Input page JSON file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Show document information
    Info {
        /// Input page JSON file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Show version information
    Version,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum TableMode {
    /// Markdown pipe tables
    Markdown,
    /// HTML tables
    Html,
}

impl From<TableMode> for TableFormat {
    fn from(mode: TableMode) -> Self {
        match mode {
            TableMode::Markdown => TableFormat::Markdown,
            TableMode::Html => TableFormat::Html,
        }
    }
}

struct ChunkArgs {
    chunk_size: Option<usize>,
    chunk_sizes: Option<String>,
    chunk_overlaps: Option<String>,
    table_format: TableMode,
    summary_pages: Option<usize>,
    separators: Vec<String>,
    strict: bool,
    sequential: bool,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Chunk {
            input,
            output,
            chunk_size,
            chunk_sizes,
            chunk_overlaps,
            table_format,
            summary_pages,
            separators,
            strict,
            sequential,
            compact,
        }) => {
            let args = ChunkArgs {
                chunk_size,
                chunk_sizes,
                chunk_overlaps,
                table_format,
                summary_pages,
                separators,
                strict,
                sequential,
            };
            cmd_chunk(&input, output.as_deref(), args, json_format(compact))
        }
        Some(Commands::Elements {
            input,
            output,
            compact,
        }) => cmd_elements(&input, output.as_deref(), json_format(compact)),
        Some(Commands::Dump { input, output }) => cmd_dump(&input, output.as_deref()),
        Some(Commands::Info { input }) => cmd_info(&input),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            println!("{}", "Usage: pagechunk <COMMAND> <FILE>".yellow());
            println!("       pagechunk --help for more information");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn json_format(compact: bool) -> JsonFormat {
    if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    }
}

fn write_output(output: Option<&Path>, content: &str) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(path) = output {
        fs::write(path, content)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", content);
    }
    Ok(())
}

fn build_options(args: ChunkArgs) -> Result<ChunkOptions, Box<dyn std::error::Error>> {
    let summary_pages = args.summary_pages.map(|n| n.to_string());
    let config = ChunkConfig::from_lookup(|name| match name {
        CHUNK_SIZE_LIST_ENV => args.chunk_sizes.clone(),
        CHUNK_OVERLAP_LIST_ENV => args.chunk_overlaps.clone(),
        DOC_SUM_NUM_ENV => summary_pages.clone(),
        _ => None,
    })?;
    let config = ChunkConfig {
        table_format: args.table_format.into(),
        ..config
    };

    let mut options = ChunkOptions::from_config(&config)?.with_separators(args.separators);
    if let Some(size) = args.chunk_size {
        options = options.with_chunk_size(size);
    }
    if args.strict {
        options = options.strict();
    }
    if args.sequential {
        options = options.sequential();
    }
    Ok(options)
}

fn cmd_chunk(
    input: &Path,
    output: Option<&Path>,
    args: ChunkArgs,
    format: JsonFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let options = build_options(args)?;
    let parallel = options.parallel;
    let chunker = MultiScaleChunker::new(options)?;

    let raw = load_pages(input)?;
    let pages = ElementConsolidator::new()
        .with_parallel(parallel)
        .consolidate_all(&raw)?;
    let chunks = chunker.chunk(&pages)?;

    log::info!("{} chunks from {} pages", chunks.len(), pages.len());
    let json = pagechunk::render::to_json(&chunks, format)?;
    write_output(output, &json)
}

fn cmd_elements(
    input: &Path,
    output: Option<&Path>,
    format: JsonFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let pages = pagechunk::consolidate_pages(&load_pages(input)?)?;
    let json = pagechunk::render::to_json(&pages, format)?;
    write_output(output, &json)
}

fn cmd_dump(input: &Path, output: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let pages = pagechunk::consolidate_pages(&load_pages(input)?)?;

    if let Some(path) = output {
        let file = fs::File::create(path)?;
        pagechunk::render::write_text(&pages, std::io::BufWriter::new(file))?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        print!("{}", pagechunk::render::to_text(&pages));
    }

    Ok(())
}

fn cmd_info(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let raw = load_pages(input)?;
    let pages = pagechunk::consolidate_pages(&raw)?;

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    println!("{}: {}", "Pages".bold(), raw.len());
    println!(
        "{}: {}",
        "Raw blocks".bold(),
        raw.iter().map(|p| p.blocks.len()).sum::<usize>()
    );
    println!(
        "{}: {}",
        "Raw tables".bold(),
        raw.iter().map(|p| p.tables.len()).sum::<usize>()
    );

    println!();
    println!("{}", "Element Statistics".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    for kind in [ElementKind::Text, ElementKind::Table, ElementKind::Image] {
        let count: usize = pages.iter().map(|p| p.count_kind(kind)).sum();
        println!("{}: {}", kind.as_str().bold(), count);
    }

    let image_bytes: usize = pages
        .iter()
        .flat_map(|p| &p.elements)
        .filter_map(|e| match &e.value {
            ElementValue::Image(image) => Some(image.size()),
            _ => None,
        })
        .sum();
    println!("{}: {}", "Image bytes".bold(), image_bytes);

    let chars: usize = pagechunk::render::to_text(&pages).chars().count();
    println!("{}: {}", "Characters".bold(), chars);

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "pagechunk".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Structure-aware document chunking tool");
    println!();
    println!("License: MIT");
}

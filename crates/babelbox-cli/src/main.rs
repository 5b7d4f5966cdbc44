//! Babelbox CLI
//!
//! Command-line tool for generating per-language JSON files from CSV translation tables.

use babelbox_core::config::PROJECT_FILE_NAME;
use babelbox_core::dialect::SAMPLE_SIZE;
use babelbox_core::{
    convert, parse_file, resolve_sources, sniff_sample, Dialect, DialectOptions, LogSink,
    NamedDialect, ProjectConfig,
};
use clap::{Args, Parser, Subcommand};
use std::fs::File;
use std::io::Read;
use std::path::PathBuf;
use tracing::Level;

#[derive(Parser)]
#[command(name = "babelbox")]
#[command(about = "Create language localization files from CSV files", long_about = None)]
#[command(version)]
struct Cli {
    /// Increase verbosity (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Only output errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate one JSON file per language from CSV files
    Convert {
        /// Files or directories containing translation tables
        #[arg(required_unless_present = "config")]
        sources: Vec<PathBuf>,

        /// The output directory of the generated files
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Prefix identifiers with their path relative to their source directory
        #[arg(short, long)]
        prefix_identifiers: bool,

        #[command(flatten)]
        dialect: DialectArgs,

        /// Minify generated files
        #[arg(short, long)]
        minify: bool,

        /// Indentation used when generating files [default: tab]
        #[arg(short, long)]
        indent: Option<String>,

        /// Dry run, don't generate any files
        #[arg(long)]
        dry: bool,

        /// Skip sources that cannot be read instead of failing
        #[arg(long)]
        skip_bad_sources: bool,

        /// Project file (JSON) with default settings
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Parse a single CSV file and print its languages as JSON
    Parse {
        /// Path to CSV file
        #[arg(short, long)]
        file: PathBuf,

        #[command(flatten)]
        dialect: DialectArgs,
    },

    /// Detect the CSV dialect of a file
    Sniff {
        /// Path to CSV file
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Create a project file template
    Init {
        /// Files or directories containing translation tables
        sources: Vec<PathBuf>,

        /// Output path for the project file
        #[arg(long, default_value = PROJECT_FILE_NAME)]
        file: PathBuf,

        /// The output directory of the generated files
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Prefix identifiers with their path relative to their source directory
        #[arg(short, long)]
        prefix_identifiers: bool,

        #[command(flatten)]
        dialect: DialectArgs,
    },

    /// List the tables a set of sources resolves to
    List {
        /// Files or directories containing translation tables
        #[arg(required = true)]
        sources: Vec<PathBuf>,

        /// Show the identifier prefix of each table
        #[arg(short, long)]
        prefix_identifiers: bool,
    },
}

#[derive(Args)]
struct DialectArgs {
    /// CSV dialect used to parse tables (excel, excel-tab, unix), detected if omitted
    #[arg(long)]
    dialect: Option<NamedDialect>,

    /// CSV delimiter overwrite
    #[arg(short, long)]
    delimiter: Option<char>,

    /// CSV quote char overwrite
    #[arg(long)]
    quotechar: Option<char>,
}

impl DialectArgs {
    fn options(&self) -> DialectOptions {
        DialectOptions {
            named: self.dialect,
            delimiter: self.delimiter,
            quote: self.quotechar,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    if let Err(e) = run(cli.command) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = if quiet {
        Level::ERROR
    } else {
        match verbose {
            0 => Level::WARN,
            1 => Level::INFO,
            _ => Level::DEBUG,
        }
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}

fn run(command: Commands) -> babelbox_core::Result<()> {
    match command {
        Commands::Convert {
            sources,
            out,
            prefix_identifiers,
            dialect,
            minify,
            indent,
            dry,
            skip_bad_sources,
            config,
        } => {
            let mut project = match config {
                Some(path) => ProjectConfig::load(path)?,
                None => ProjectConfig::default(),
            };

            // Flags given on the command line win over the project file
            if !sources.is_empty() {
                project.sources = sources;
            }
            if out.is_some() {
                project.out = out;
            }
            if dialect.dialect.is_some() {
                project.dialect = dialect.dialect;
            }
            if dialect.delimiter.is_some() {
                project.delimiter = dialect.delimiter;
            }
            if dialect.quotechar.is_some() {
                project.quotechar = dialect.quotechar;
            }
            if indent.is_some() {
                project.indent = indent;
            }
            project.prefix_identifiers |= prefix_identifiers;
            project.minify |= minify;
            project.skip_bad_sources |= skip_bad_sources;

            cmd_convert(&project, dry)
        }
        Commands::Parse { file, dialect } => cmd_parse(&file, &dialect.options()),
        Commands::Sniff { file } => cmd_sniff(&file),
        Commands::Init {
            sources,
            file,
            out,
            prefix_identifiers,
            dialect,
        } => {
            let project = ProjectConfig {
                sources,
                out,
                prefix_identifiers,
                dialect: dialect.dialect,
                delimiter: dialect.delimiter,
                quotechar: dialect.quotechar,
                ..Default::default()
            };
            cmd_init(&file, &project)
        }
        Commands::List {
            sources,
            prefix_identifiers,
        } => cmd_list(&sources, prefix_identifiers),
    }
}

fn cmd_convert(project: &ProjectConfig, dry: bool) -> babelbox_core::Result<()> {
    let mut options = project.to_options();
    options.dry_run = dry;

    let report = convert(&project.sources, &options, &mut LogSink)?;

    if dry {
        println!("Dry run, would write to {}:", report.output_dir.display());
        for (code, keys) in &report.languages {
            println!("  {}.json ({} keys)", code, keys);
        }
        println!("Total: {} keys", report.key_count);
    } else {
        println!(
            "Wrote {} language file(s) with {} keys to {}",
            report.files_written.len(),
            report.key_count,
            report.output_dir.display()
        );
    }

    if !report.skipped_sources.is_empty() {
        println!("\nSkipped sources ({}):", report.skipped_sources.len());
        for path in &report.skipped_sources {
            println!("  {}", path.display());
        }
    }

    Ok(())
}

fn cmd_parse(file: &PathBuf, dialect: &DialectOptions) -> babelbox_core::Result<()> {
    let dialect = dialect.resolve()?;
    let languages = parse_file(file, dialect.as_ref(), "", &mut LogSink)?;

    println!("{}", serde_json::to_string_pretty(&languages)?);

    Ok(())
}

fn cmd_sniff(file: &PathBuf) -> babelbox_core::Result<()> {
    let read_err = |e| babelbox_core::Error::FileRead {
        path: file.clone(),
        source: e,
    };

    // One byte past the sample tells whether the table goes on
    let mut sample = Vec::with_capacity(SAMPLE_SIZE + 1);
    File::open(file)
        .map_err(read_err)?
        .take(SAMPLE_SIZE as u64 + 1)
        .read_to_end(&mut sample)
        .map_err(read_err)?;
    let truncated = sample.len() > SAMPLE_SIZE;
    sample.truncate(SAMPLE_SIZE);

    println!("File: {}", file.display());
    match sniff_sample(&String::from_utf8_lossy(&sample), truncated) {
        Some(dialect) => println!("Dialect: {}", dialect),
        None => println!("Dialect: {} (default, detection failed)", Dialect::default()),
    }

    Ok(())
}

fn cmd_init(file: &PathBuf, project: &ProjectConfig) -> babelbox_core::Result<()> {
    project.save(file)?;
    println!("Created project file: {}", file.display());
    println!();
    println!("Edit the file to configure your sources, then run:");
    println!("  babelbox convert --config {}", file.display());

    Ok(())
}

fn cmd_list(sources: &[PathBuf], prefix_identifiers: bool) -> babelbox_core::Result<()> {
    let files = resolve_sources(sources, prefix_identifiers)?;

    println!("Tables ({}):", files.len());
    for file in &files {
        if file.prefix.is_empty() {
            println!("  {}", file.path.display());
        } else {
            println!("  {} [{}]", file.path.display(), file.prefix);
        }
    }

    Ok(())
}

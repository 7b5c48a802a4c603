//! Rentpanel CLI - reshape wide rent files into long panels
//!
//! ```bash
//! rentpanel transform Zip_ZORI.csv -o panel.csv             # basic layout
//! rentpanel transform Zip_Zri.csv --variant metro -f json   # metro counties only
//! rentpanel inspect Zip_ZORI.csv                            # show columns and months
//! rentpanel counties                                        # list the allow-list
//! ```

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use rentpanel::logs::{log_error, log_success, LOGGER};
use rentpanel::transform::pipeline::format_delimiter;
use rentpanel::{
    inspect_file, transform_file, write_panel, OutputFormat, PanelLayout, TransformOptions,
    METRO_AREAS,
};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "rentpanel")]
#[command(about = "Reshape wide rent panel files into tidy long panels", long_about = None)]
struct Cli {
    /// Suppress progress output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Emit progress as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Variant {
    /// 4 identifier columns, every geography
    Basic,
    /// 7 identifier columns, metro counties only
    Metro,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Csv,
    Json,
}

impl From<Format> for OutputFormat {
    fn from(f: Format) -> Self {
        match f {
            Format::Csv => OutputFormat::Csv,
            Format::Json => OutputFormat::Json,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Transform a wide rent file into a long panel
    Transform {
        /// Input file
        input: PathBuf,

        /// Column layout
        #[arg(long, value_enum, default_value = "basic", env = "RENTPANEL_VARIANT")]
        variant: Variant,

        /// Override the number of identifier columns
        #[arg(long)]
        leading_columns: Option<usize>,

        /// First month kept (YYYY-MM-DD)
        #[arg(long, default_value = "2015-01-01", env = "RENTPANEL_CUTOFF")]
        cutoff: NaiveDate,

        /// Delimiter (auto-detect if not specified)
        #[arg(short, long)]
        delimiter: Option<char>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "csv")]
        format: Format,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show the columns and months of a wide rent file
    Inspect {
        /// Input file
        input: PathBuf,

        /// Column layout
        #[arg(long, value_enum, default_value = "basic", env = "RENTPANEL_VARIANT")]
        variant: Variant,

        /// Override the number of identifier columns
        #[arg(long)]
        leading_columns: Option<usize>,

        /// Delimiter (auto-detect if not specified)
        #[arg(short, long)]
        delimiter: Option<char>,
    },

    /// List the metro county allow-list
    Counties,
}

fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    LOGGER.set_quiet(cli.quiet);
    LOGGER.set_json(cli.log_json);

    let result = match cli.command {
        Commands::Transform {
            input,
            variant,
            leading_columns,
            cutoff,
            delimiter,
            format,
            output,
        } => {
            let options = TransformOptions {
                layout: layout_for(variant, leading_columns),
                cutoff,
                delimiter,
                format: format.into(),
            };
            cmd_transform(&input, &options, output.as_deref())
        }

        Commands::Inspect {
            input,
            variant,
            leading_columns,
            delimiter,
        } => cmd_inspect(&input, &layout_for(variant, leading_columns), delimiter),

        Commands::Counties => cmd_counties(),
    };

    if let Err(e) = result {
        log_error(format!("Error: {}", e));
        std::process::exit(1);
    }
}

fn layout_for(variant: Variant, leading_columns: Option<usize>) -> PanelLayout {
    let layout = match variant {
        Variant::Basic => PanelLayout::basic(),
        Variant::Metro => PanelLayout::metro(),
    };
    match leading_columns {
        Some(n) => layout.with_leading_columns(n),
        None => layout,
    }
}

fn cmd_transform(
    input: &Path,
    options: &TransformOptions,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let result = transform_file(input, options)?;
    write_panel(&result.panel, options.format, output)?;

    if let Some(p) = output {
        log_success(format!("💾 Output written to: {}", p.display()));
    }
    Ok(())
}

fn cmd_inspect(
    input: &Path,
    layout: &PanelLayout,
    delimiter: Option<char>,
) -> Result<(), Box<dyn std::error::Error>> {
    let info = inspect_file(input, layout, delimiter)?;

    println!("📄 {}", input.display());
    println!("   Encoding: {}", info.csv_info.encoding);
    println!("   Delimiter: '{}'", format_delimiter(info.csv_info.delimiter));
    println!("   Geographies: {}", info.csv_info.row_count);
    println!("   Identifier columns: {}", info.id_columns.join(", "));
    match (info.first_month, info.last_month) {
        (Some(first), Some(last)) => println!(
            "   Months: {} ({} to {})",
            info.date_columns,
            first.format("%Y-%m"),
            last.format("%Y-%m")
        ),
        _ => println!("   Months: {}", info.date_columns),
    }
    Ok(())
}

fn cmd_counties() -> Result<(), Box<dyn std::error::Error>> {
    for metro in METRO_AREAS {
        println!("📍 {} ({})", metro.name, metro.state);
        for key in metro.keys() {
            println!("     {}", key);
        }
    }
    Ok(())
}

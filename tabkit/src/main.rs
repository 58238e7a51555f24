//! tabkit CLI
//!
//! ```bash
//! tabkit generate                          # 20-row sine table in sin.csv
//! tabkit generate --rows 50 --domain period -o wave.csv
//! tabkit reindex sample.csv -o days.csv    # Date column -> leading day counter
//! tabkit reindex sample.csv --overwrite    # same, rewriting sample.csv in place
//! tabkit inspect sin.csv                   # training data as JSON
//! tabkit inspect sin.csv --inputs y        # predict x from y instead
//! tabkit train sin.csv --hidden 8 --epochs 300 --activation tanh
//! ```

use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use tabkit::generate::DEFAULT_ROWS;
use tabkit::logs::LOG_BROADCASTER;
use tabkit::{
    load_training_data, reindex_csv, train_csv, write_sine_csv, Activation, Domain, GeneratorOptions,
    ModelOptions, ReindexOptions,
};

#[derive(Parser)]
#[command(name = "tabkit")]
#[command(about = "Generate sine-wave CSV tables and reindex dated CSV files", long_about = None)]
struct Cli {
    /// Don't echo progress logs to stderr
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write an x,y table where y = sin(x)
    Generate {
        /// Output file (replaced if it exists)
        #[arg(short, long, default_value = "sin.csv")]
        output: PathBuf,

        /// Number of data rows
        #[arg(short, long, default_value_t = DEFAULT_ROWS)]
        rows: usize,

        /// How row indices map to x
        #[arg(short, long, value_enum, default_value_t = Domain::Index)]
        domain: Domain,
    },

    /// Replace the Date column with a leading 1-based day column
    Reindex {
        /// Input CSV file
        input: PathBuf,

        /// Output file (default: the input itself)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Allow replacing an existing output, including the input
        #[arg(long)]
        overwrite: bool,
    },

    /// Load a CSV as numeric training data and print it as JSON
    Inspect {
        /// Input CSV file
        input: PathBuf,

        #[command(flatten)]
        roles: RoleArgs,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Train a feed-forward network on a CSV and print the report as JSON
    Train {
        /// Input CSV file
        input: PathBuf,

        #[command(flatten)]
        roles: RoleArgs,

        /// Neurons per hidden layer, comma separated
        #[arg(long, value_delimiter = ',', default_value = "4,4")]
        hidden: Vec<usize>,

        /// Passes over the data set
        #[arg(long, default_value_t = 100)]
        epochs: usize,

        #[arg(long, default_value_t = 0.01)]
        learning_rate: f64,

        #[arg(long, value_enum, default_value_t = Activation::Relu)]
        activation: Activation,

        /// Seed for weight initialisation and shuffling
        #[arg(long)]
        seed: Option<u64>,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Column role overrides. Columns named in neither list take the remaining
/// role, or are ignored when both lists are given.
#[derive(clap::Args)]
struct RoleArgs {
    /// Input columns, comma separated
    #[arg(long, value_delimiter = ',')]
    inputs: Vec<String>,

    /// Output columns, comma separated
    #[arg(long, value_delimiter = ',')]
    outputs: Vec<String>,
}

fn main() {
    let cli = Cli::parse();
    LOG_BROADCASTER.set_echo(!cli.quiet);

    let result = match cli.command {
        Commands::Generate {
            output,
            rows,
            domain,
        } => cmd_generate(&output, GeneratorOptions { rows, domain }),

        Commands::Reindex {
            input,
            output,
            overwrite,
        } => cmd_reindex(&input, ReindexOptions { output, overwrite }),

        Commands::Inspect {
            input,
            roles,
            output,
        } => cmd_inspect(&input, &roles, output.as_deref()),

        Commands::Train {
            input,
            roles,
            hidden,
            epochs,
            learning_rate,
            activation,
            seed,
            output,
        } => {
            let options = ModelOptions {
                hidden_layers: hidden,
                learning_rate,
                epochs,
                activation,
                seed,
            };
            cmd_train(&input, &roles, &options, output.as_deref())
        }
    };

    if let Err(e) = result {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

fn cmd_generate(output: &Path, options: GeneratorOptions) -> Result<(), Box<dyn std::error::Error>> {
    let summary = write_sine_csv(output, &options)?;
    eprintln!("✨ {} rows written to {}", summary.rows, summary.path.display());
    Ok(())
}

fn cmd_reindex(input: &Path, options: ReindexOptions) -> Result<(), Box<dyn std::error::Error>> {
    let summary = reindex_csv(input, &options)?;
    eprintln!("✨ Done: {} ({})", summary.output.display(), summary.columns.join(", "));
    Ok(())
}

fn cmd_inspect(
    input: &Path,
    roles: &RoleArgs,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut data = load_training_data(input)?;
    data.assign_roles(&roles.inputs, &roles.outputs)?;
    let json = serde_json::to_string_pretty(&data)?;
    write_output(&json, output)
}

fn cmd_train(
    input: &Path,
    roles: &RoleArgs,
    options: &ModelOptions,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let report = train_csv(input, &roles.inputs, &roles.outputs, options)?;
    let json = serde_json::to_string_pretty(&report)?;
    write_output(&json, output)
}

fn write_output(content: &str, path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    match path {
        Some(p) => {
            fs::write(p, content)?;
            eprintln!("💾 Output written to: {}", p.display());
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}

//! gradewise CLI — the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "gradewise",
    version,
    about = "Automated grading of free-text answer sheets"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Grade student answer sheets against a model answer
    Grade {
        /// Assessment whose stored model answer to grade against
        #[arg(long)]
        name: Option<String>,

        /// Student answer sheet (.pdf or .txt) or a directory of sheets
        #[arg(long)]
        student: PathBuf,

        /// Grade against this model answer file instead of the stored one
        #[arg(long)]
        model: Option<PathBuf>,

        /// Scoring strategy: tfidf_cosine or word_overlap
        #[arg(long)]
        strategy: Option<String>,

        /// Marks for questions without a "(N Marks)" annotation
        #[arg(long)]
        default_marks: Option<f64>,

        /// Output format: text, json, markdown
        #[arg(long, default_value = "text")]
        format: String,

        /// Directory for the per-sheet JSON reports [default: output_dir from config]
        #[arg(long)]
        output: Option<PathBuf>,

        /// Max sheets graded concurrently
        #[arg(long)]
        parallelism: Option<usize>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Store a model answer sheet as the current one for an assessment
    UploadModel {
        /// Assessment name (letters, digits, '-' or '_')
        #[arg(long)]
        name: String,

        /// Model answer sheet (.pdf or .txt)
        #[arg(long)]
        file: PathBuf,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Show how an answer sheet is split into questions
    Inspect {
        /// Answer sheet (.pdf or .txt)
        #[arg(long)]
        file: PathBuf,
    },

    /// List stored model answers
    ListModels {
        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Create a starter config and sample answer sheets
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("gradewise=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Grade {
            name,
            student,
            model,
            strategy,
            default_marks,
            format,
            output,
            parallelism,
            config,
        } => {
            commands::grade::execute(
                name,
                student,
                model,
                strategy,
                default_marks,
                format,
                output,
                parallelism,
                config,
            )
            .await
        }
        Commands::UploadModel { name, file, config } => {
            commands::upload_model::execute(name, file, config).await
        }
        Commands::Inspect { file } => commands::inspect::execute(file).await,
        Commands::ListModels { config } => commands::list_models::execute(config),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

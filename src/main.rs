//! sigdrift CLI: run the detection pipeline over a readings CSV, or generate
//! a synthetic dataset to try it on.

use clap::{Parser, Subcommand};
use sigdrift::{
    config::PipelineConfig,
    diagnosis,
    ingest::{load_notes, read_readings, write_notes, write_readings},
    report::{digest_bytes, note_links, write_report, RunSummary},
    synth::{generate, SynthConfig},
    Pipeline, StructuredLogger,
};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(
    name = "sigdrift",
    about = "Detect anomalous intervals in asynchronous multi-sensor time series",
    version
)]
struct Cli {
    /// JSON config file; defaults apply when absent
    #[arg(long, global = true, env = "SIGDRIFT_CONFIG", default_value = "sigdrift.json")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the pipeline and write a report directory
    Run {
        /// Readings CSV (signal_id,timestamp,value)
        #[arg(long)]
        readings: PathBuf,

        /// Operator notes CSV (timestamp,log)
        #[arg(long)]
        notes: Option<PathBuf>,

        /// Output directory
        #[arg(long, default_value = "sigdrift-report")]
        out: PathBuf,

        /// Produce a narrative diagnosis per event with the configured provider
        #[arg(long)]
        diagnose: bool,
    },

    /// Write a synthetic readings/notes pair
    Generate {
        #[arg(long, default_value = "data")]
        out: PathBuf,

        #[arg(long, default_value = "60")]
        minutes: u32,

        #[arg(long, default_value = "42")]
        seed: u64,

        /// Per-signal sampling periods instead of one sample per minute
        #[arg(long)]
        multi_rate: bool,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let cli = Cli::parse();
    let config = PipelineConfig::load(&cli.config)?;
    StructuredLogger::init(config.log.json, &config.log.level);

    match cli.command {
        Commands::Run {
            readings,
            notes,
            out,
            diagnose,
        } => {
            let bytes = std::fs::read(&readings)?;
            let parsed = read_readings(bytes.as_slice())?;
            info!(path = %readings.display(), readings = parsed.len(), "readings loaded");

            let pipeline = Pipeline::new(config)?;
            let output = pipeline.run(&parsed)?;
            let summary = RunSummary::from_output(&output, Some(digest_bytes(&bytes)));

            let notes = match &notes {
                Some(path) => load_notes(path)?,
                None => Vec::new(),
            };
            let links = if notes.is_empty() {
                Vec::new()
            } else {
                note_links(&output, &notes, pipeline.config().notes.margin_minutes)
            };

            let diagnoses = if diagnose {
                let provider = diagnosis::from_config(&pipeline.config().diagnosis)?;
                pipeline.diagnose(&output, &notes, provider.as_ref())
            } else {
                Vec::new()
            };

            write_report(&out, &output, &summary, &links, &diagnoses)?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        Commands::Generate {
            out,
            minutes,
            seed,
            multi_rate,
        } => {
            let dataset = generate(&SynthConfig {
                minutes,
                seed,
                multi_rate,
                ..SynthConfig::default()
            });
            std::fs::create_dir_all(&out)?;
            write_readings(std::fs::File::create(out.join("timeseries.csv"))?, &dataset.readings)?;
            write_notes(std::fs::File::create(out.join("operator_logs.csv"))?, &dataset.notes)?;
            info!(
                dir = %out.display(),
                readings = dataset.readings.len(),
                notes = dataset.notes.len(),
                "synthetic dataset written"
            );
        }
    }

    Ok(())
}

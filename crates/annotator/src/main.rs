mod config;
mod dataset;
mod model;
mod orchestrator;

use annotate_analysis::{MultiLineAnalyzer, StockfishAnalyzer};
use annotate_core::{render_board, Fen, PromptComposer};
use anyhow::Context;
use clap::{Parser, Subcommand};
use config::AnnotatorConfig;
use model::OllamaClient;
use orchestrator::Orchestrator;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "annotator")]
#[command(about = "Generate move-reasoning annotations from FEN datasets")]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "annotator.toml")]
    config: PathBuf,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Annotate a seeded sample of positions from a CSV dataset
    Run {
        /// Input CSV with a FEN column
        input: PathBuf,
        /// Output CSV path
        #[arg(short, long, default_value = "annotations.csv")]
        output: PathBuf,
        /// Number of positions to sample
        #[arg(short = 'n', long, default_value = "5")]
        sample: usize,
        /// Sampling seed
        #[arg(long, default_value = "42")]
        seed: u64,
    },
    /// Analyze one position and print the composed prompt (no model call)
    Prompt {
        /// Position in FEN notation
        fen: String,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config = AnnotatorConfig::load_from(&cli.config)
        .with_context(|| format!("loading config from {}", cli.config.display()))?;

    let analyzer = StockfishAnalyzer::new(
        &config.engine.path,
        config.engine.limits(),
        config.engine.options(),
    );
    let composer = PromptComposer {
        lines_shown: config.engine.lines,
        ..PromptComposer::default()
    };

    match cli.command {
        Commands::Run {
            input,
            output,
            sample,
            seed,
        } => {
            // Preflight: a bad engine path must fail the run before any
            // position is processed.
            let engine_name = analyzer
                .probe()
                .with_context(|| format!("engine preflight failed for '{}'", config.engine.path))?;
            log::info!("using engine: {}", engine_name);

            let positions = dataset::read_fens(&input)
                .with_context(|| format!("reading positions from {}", input.display()))?;
            anyhow::ensure!(
                !positions.is_empty(),
                "input dataset {} contains no positions",
                input.display()
            );

            let model = OllamaClient::new(
                &config.model.url,
                &config.model.name,
                config.model.sampling,
            );

            let report = Orchestrator::new(analyzer, model, composer).run(&positions, sample, seed);

            dataset::write_records(&output, &report.records)
                .with_context(|| format!("writing {}", output.display()))?;

            println!(
                "Annotated {} position(s) ({} skipped), wrote {}",
                report.records.len(),
                report.failures.len(),
                output.display()
            );
        }
        Commands::Prompt { fen } => {
            let fen = Fen::parse(&fen)?;
            let lines = analyzer.analyze(fen.as_str())?;
            let board = render_board(fen.placement())?;
            let prompt = composer.compose(fen.as_str(), &board, &lines)?;
            println!("{}", prompt);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parses_run_with_defaults() {
        let cli = Cli::try_parse_from(["annotator", "run", "positions.csv"]).unwrap();
        match cli.command {
            Commands::Run {
                input,
                output,
                sample,
                seed,
            } => {
                assert_eq!(input, PathBuf::from("positions.csv"));
                assert_eq!(output, PathBuf::from("annotations.csv"));
                assert_eq!(sample, 5);
                assert_eq!(seed, 42);
            }
            _ => panic!("Expected Run command"),
        }
    }

    #[test]
    fn cli_parses_run_with_overrides() {
        let cli = Cli::try_parse_from([
            "annotator",
            "run",
            "in.csv",
            "-o",
            "out.csv",
            "-n",
            "100",
            "--seed",
            "7",
        ])
        .unwrap();
        match cli.command {
            Commands::Run {
                output,
                sample,
                seed,
                ..
            } => {
                assert_eq!(output, PathBuf::from("out.csv"));
                assert_eq!(sample, 100);
                assert_eq!(seed, 7);
            }
            _ => panic!("Expected Run command"),
        }
    }

    #[test]
    fn cli_parses_prompt_command() {
        let cli =
            Cli::try_parse_from(["annotator", "prompt", Fen::STARTPOS]).unwrap();
        match cli.command {
            Commands::Prompt { fen } => assert_eq!(fen, Fen::STARTPOS),
            _ => panic!("Expected Prompt command"),
        }
    }

    #[test]
    fn cli_parses_config_override() {
        let cli = Cli::try_parse_from([
            "annotator",
            "--config",
            "/etc/annotator.toml",
            "prompt",
            Fen::STARTPOS,
        ])
        .unwrap();
        assert_eq!(cli.config, PathBuf::from("/etc/annotator.toml"));
    }
}

// Drumgen CLI - Generate drum patterns and write them as MIDI files
// Config file values are the base; command-line flags override them

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

use drumgen_lib::config::{load_config, GeneratorConfig};
use drumgen_lib::patterns;
use drumgen_lib::{run_genre, ExportReport, GenerateRequest, Genre};

/// Procedural drum pattern generator for house, breaks, UK garage and drum & bass
#[derive(Parser)]
#[command(name = "drumgen")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Genre to generate (house, breaks, ukg, dnb or all); repeatable, default all
    #[arg(short, long = "genre", value_name = "GENRE")]
    genres: Vec<String>,

    /// Output directory (default ./midi)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Number of four-bar variations per genre
    #[arg(short = 'n', long)]
    variations: Option<u32>,

    /// Tempo in BPM for every selected genre (default per genre)
    #[arg(short, long)]
    tempo: Option<f64>,

    /// Base seed for reproducible output
    #[arg(short, long)]
    seed: Option<u64>,

    /// Maximum velocity change per hit
    #[arg(long)]
    velocity_variation: Option<u8>,

    /// Maximum timing change per hit, in beats
    #[arg(long)]
    timing_variation: Option<f64>,

    /// Write each variation to its own folder
    #[arg(long, conflicts_with = "single_file")]
    per_variation: bool,

    /// Write all variations into one file per instrument
    #[arg(long)]
    single_file: bool,

    /// Write into a YYYY_MM_DD sub-folder
    #[arg(long)]
    dated: bool,

    /// Skip the manifest.jsonl entry
    #[arg(long)]
    no_manifest: bool,

    /// JSON config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Catalog pattern to use as the theme bar
    #[arg(long)]
    theme: Option<String>,

    /// List catalog patterns and exit
    #[arg(long)]
    list_patterns: bool,

    /// Print results as JSON
    #[arg(long)]
    json: bool,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::from(1)
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    if cli.list_patterns {
        return list_patterns(cli.json);
    }

    let config = resolve_config(&cli)?;
    let genres = resolve_genres(&cli.genres)?;
    let options = config.export_options();

    let mut reports: Vec<ExportReport> = Vec::new();
    for genre in genres {
        let tempo = cli.tempo.unwrap_or_else(|| config.tempo_for(genre));

        let request = GenerateRequest::new(genre, config.variations)
            .with_seed(config.seed)
            .with_humanize(config.humanize_settings())
            .with_theme(cli.theme.clone());

        let genre_reports = run_genre(&request, &config.output_dir, tempo, config.per_variation, &options)
            .with_context(|| format!("Failed to generate {}", genre.display_name()))?;
        reports.extend(genre_reports);
    }

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        let files: usize = reports.iter().map(|r| r.files.len()).sum();
        println!(
            "Wrote {} MIDI files to {}",
            files,
            config.output_dir.display()
        );
    }

    Ok(())
}

/// Config file (or defaults) with command-line overrides applied
fn resolve_config(cli: &Cli) -> Result<GeneratorConfig> {
    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => GeneratorConfig::default(),
    };

    if let Some(output) = &cli.output {
        config.output_dir = output.clone();
    }
    if let Some(variations) = cli.variations {
        config.variations = variations;
    }
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }
    if let Some(velocity) = cli.velocity_variation {
        config.velocity_variation = velocity;
    }
    if let Some(timing) = cli.timing_variation {
        config.timing_variation = timing;
    }
    if cli.per_variation {
        config.per_variation = true;
    }
    if cli.single_file {
        config.per_variation = false;
    }
    if cli.dated {
        config.dated = true;
    }
    if cli.no_manifest {
        config.manifest = false;
    }

    Ok(config)
}

/// Genres named on the command line, in order, without duplicates
fn resolve_genres(names: &[String]) -> Result<Vec<Genre>> {
    if names.is_empty() || names.iter().any(|n| n.eq_ignore_ascii_case("all")) {
        return Ok(Genre::ALL.to_vec());
    }

    let mut genres = Vec::new();
    for name in names {
        let genre: Genre = name.parse()?;
        if !genres.contains(&genre) {
            genres.push(genre);
        }
    }

    Ok(genres)
}

fn list_patterns(json: bool) -> Result<()> {
    let summaries = patterns::list_patterns();

    if json {
        println!("{}", serde_json::to_string_pretty(&summaries)?);
        return Ok(());
    }

    for summary in summaries {
        println!(
            "{:<18} {:<7} {:>3} hits  {}",
            summary.name,
            summary.genre.as_str(),
            summary.hit_count,
            summary.description
        );
    }

    Ok(())
}

//! Robovoice CLI: speak random utterances or render word sequences to WAV.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use robovoice::config::{self, VoiceConfig};
use robovoice::{parse_words, RobotVoice, Symbol, VoiceResult};

/// Procedural robot-speech generator
#[derive(Parser)]
#[command(name = "robovoice")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Config file (default: ~/.robovoice/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// More logging (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate random utterances and write them as WAV files
    Speak {
        /// Seed for reproducible output
        #[arg(short, long)]
        seed: Option<u64>,

        /// Number of utterances
        #[arg(short = 'n', long, default_value_t = 1)]
        count: usize,

        /// Output file, or directory when count > 1
        #[arg(short, long, default_value = "robovoice.wav")]
        out: PathBuf,

        /// Print the baked sequence as YAML
        #[arg(long)]
        dump: bool,
    },

    /// Render a word sequence such as "z1 z1 _2 B3"
    Render {
        /// Whitespace-separated words
        words: String,

        /// Seed for reproducible output
        #[arg(short, long)]
        seed: Option<u64>,

        /// Output file
        #[arg(short, long, default_value = "robovoice.wav")]
        out: PathBuf,
    },

    /// List the symbol catalog
    Symbols,
}

fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("robovoice=debug"),
        _ => EnvFilter::new("robovoice=trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load(path: Option<&Path>, seed: Option<u64>) -> VoiceResult<VoiceConfig> {
    let mut config = match path {
        Some(p) => config::load_config(p)?,
        None => config::load_or_default(&config::default_config_path())?,
    };
    if seed.is_some() {
        config.seed = seed;
    }
    Ok(config)
}

fn write_wav(path: &Path, wav: &[u8]) -> VoiceResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(path, wav)?;
    info!(path = %path.display(), bytes = wav.len(), "wrote wav");
    Ok(())
}

fn speak(config: &VoiceConfig, count: usize, out: &Path, dump: bool) -> VoiceResult<()> {
    let mut voice = RobotVoice::from_config(config)?;
    for i in 0..count {
        let utterance = voice.speak()?;
        let path = if count > 1 {
            out.join(format!("utterance_{i:03}.wav"))
        } else {
            out.to_path_buf()
        };
        println!("{}", robovoice::format_words(&utterance.words));
        if dump {
            print!("{}", serde_yaml::to_string(&utterance.baked)?);
        }
        write_wav(&path, &utterance.wav)?;
    }
    Ok(())
}

fn render(config: &VoiceConfig, words: &str, out: &Path) -> VoiceResult<()> {
    let words = parse_words(words)?;
    let mut voice = RobotVoice::from_config(config)?;
    let utterance = voice.voice_words(words)?;
    write_wav(out, &utterance.wav)
}

fn symbols(config: &VoiceConfig) -> VoiceResult<()> {
    let voice = RobotVoice::from_config(config)?;
    for symbol in Symbol::ALL {
        let description = match voice.baker().range_for(symbol) {
            Some(def) => def.name.clone(),
            None if symbol.is_silence() => "wait".to_string(),
            None => "(no ranges)".to_string(),
        };
        println!("{}  {:<14} {}", symbol.code(), symbol.name(), description);
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match &cli.command {
        Commands::Speak {
            seed,
            count,
            out,
            dump,
        } => load(cli.config.as_deref(), *seed).and_then(|c| speak(&c, *count, out, *dump)),
        Commands::Render { words, seed, out } => {
            load(cli.config.as_deref(), *seed).and_then(|c| render(&c, words, out))
        }
        Commands::Symbols => load(cli.config.as_deref(), None).and_then(|c| symbols(&c)),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::from(1)
        }
    }
}

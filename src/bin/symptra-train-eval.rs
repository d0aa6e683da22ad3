//! Developer utility that trains the pattern classifier, prints the evaluation
//! payload as JSON and stores the model in the registry.

use std::path::{Path, PathBuf};

use symptra::config;
use symptra::dataset::{TrainingSample, builtin_corpus};
use symptra::registry::{MemoryRegistry, ModelRegistry};
use symptra::{logging, service};

fn main() {
    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

#[derive(Debug, Clone, Default)]
struct CliOptions {
    config_path: Option<PathBuf>,
    corpus_path: Option<PathBuf>,
    database_path: Option<PathBuf>,
    in_memory: bool,
    seed: Option<u64>,
    split_ratio: Option<f64>,
}

fn run() -> Result<(), String> {
    let options = parse_args(std::env::args().skip(1).collect())?;
    if let Err(err) = logging::init() {
        logging::init_stderr_only();
        tracing::warn!("File logging disabled: {err}");
    }
    let mut config = match &options.config_path {
        Some(path) => config::load_from(path),
        None => config::load_or_default(),
    }
    .map_err(|err| err.to_string())?;
    if let Some(seed) = options.seed {
        config.evaluation.seed = Some(seed);
    }
    if let Some(ratio) = options.split_ratio {
        config.evaluation.split_ratio = ratio;
    }
    if let Some(path) = &options.database_path {
        config.registry.database_path = Some(path.clone());
    }

    let corpus = match &options.corpus_path {
        Some(path) => load_corpus(path)?,
        None => builtin_corpus(),
    };
    let registry: Box<dyn ModelRegistry> = if options.in_memory {
        Box::new(MemoryRegistry::with_default_mappings())
    } else {
        service::open_registry(&config)
    };

    match service::train_evaluate(&corpus, &config, registry.as_ref()) {
        Ok(response) => print_json(&response),
        Err(err) => {
            print_json(&err.to_payload())?;
            Err(err.to_string())
        }
    }
}

fn load_corpus(path: &Path) -> Result<Vec<TrainingSample>, String> {
    let text = std::fs::read_to_string(path)
        .map_err(|err| format!("Failed to read {}: {err}", path.display()))?;
    serde_json::from_str(&text).map_err(|err| format!("Invalid corpus {}: {err}", path.display()))
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), String> {
    let text = serde_json::to_string_pretty(value).map_err(|err| err.to_string())?;
    println!("{text}");
    Ok(())
}

fn parse_args(args: Vec<String>) -> Result<CliOptions, String> {
    let mut options = CliOptions::default();
    let mut idx = 0usize;
    while idx < args.len() {
        match args[idx].as_str() {
            "-h" | "--help" => return Err(help_text()),
            "--config" => {
                idx += 1;
                let value = args.get(idx).ok_or_else(|| "--config requires a value".to_string())?;
                options.config_path = Some(PathBuf::from(value));
            }
            "--corpus" => {
                idx += 1;
                let value = args.get(idx).ok_or_else(|| "--corpus requires a value".to_string())?;
                options.corpus_path = Some(PathBuf::from(value));
            }
            "--db" => {
                idx += 1;
                let value = args.get(idx).ok_or_else(|| "--db requires a value".to_string())?;
                options.database_path = Some(PathBuf::from(value));
            }
            "--memory" => options.in_memory = true,
            "--seed" => {
                idx += 1;
                let value = args.get(idx).ok_or_else(|| "--seed requires a value".to_string())?;
                options.seed = Some(
                    value
                        .parse::<u64>()
                        .map_err(|_| format!("Invalid --seed value: {value}"))?,
                );
            }
            "--split" => {
                idx += 1;
                let value = args.get(idx).ok_or_else(|| "--split requires a value".to_string())?;
                options.split_ratio = Some(
                    value
                        .parse::<f64>()
                        .map_err(|_| format!("Invalid --split value: {value}"))?,
                );
            }
            unknown => return Err(format!("Unknown argument: {unknown}\n\n{}", help_text())),
        }
        idx += 1;
    }
    Ok(options)
}

fn help_text() -> String {
    [
        "symptra-train-eval",
        "",
        "Usage:",
        "  symptra-train-eval [options]",
        "",
        "Options:",
        "  --config <path>   Config file (default: <app dir>/config.toml).",
        "  --corpus <path>   JSON array of {symptoms, label} samples (default: built-in corpus).",
        "  --db <path>       SQLite registry file (default: <app dir>/symptra.db).",
        "  --memory          Use an in-memory registry instead of SQLite.",
        "  --seed <n>        Fixed shuffle seed.",
        "  --split <ratio>   Training share in (0, 1) (default: 0.8).",
    ]
    .join("\n")
}

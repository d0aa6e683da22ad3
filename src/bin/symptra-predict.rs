//! Developer utility that scores symptoms with the keyword predictor and
//! prints the prediction payload as JSON.

use std::path::PathBuf;

use symptra::config::{self, SymptraConfig};
use symptra::labeling::{KeywordPredictor, KeywordTable};
use symptra::logging;
use symptra::registry::{MemoryRegistry, ModelRegistry};
use symptra::service::{self, FrequencyFallback, PredictRequest};

fn main() {
    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

#[derive(Debug, Clone, Default)]
struct CliOptions {
    config_path: Option<PathBuf>,
    database_path: Option<PathBuf>,
    in_memory: bool,
    request_json: Option<String>,
    user_id: Option<String>,
    symptoms: Vec<String>,
}

fn run() -> Result<(), String> {
    let options = parse_args(std::env::args().skip(1).collect())?;
    if let Err(err) = logging::init() {
        logging::init_stderr_only();
        tracing::warn!("File logging disabled: {err}");
    }
    let mut config: SymptraConfig = match &options.config_path {
        Some(path) => config::load_from(path),
        None => config::load_or_default(),
    }
    .map_err(|err| err.to_string())?;
    if let Some(path) = &options.database_path {
        config.registry.database_path = Some(path.clone());
    }

    let request = match &options.request_json {
        Some(body) => PredictRequest::from_json(body),
        None => Ok(PredictRequest {
            symptoms: options.symptoms.clone(),
            user_id: options.user_id.clone(),
        }),
    };
    let registry: Box<dyn ModelRegistry> = if options.in_memory {
        Box::new(MemoryRegistry::with_default_mappings())
    } else {
        service::open_registry(&config)
    };
    let predictor = KeywordPredictor::new(
        KeywordTable::from_app_dir_or_builtin(),
        config.predictor.settings(),
    );
    let fallback = FrequencyFallback::from(&config.predictor);

    let result = request.and_then(|request| {
        service::predict(&request, &predictor, &fallback, registry.as_ref())
    });
    match result {
        Ok(response) => print_json(&response),
        Err(err) => {
            print_json(&err.to_payload())?;
            Err(err.to_string())
        }
    }
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
            "--db" => {
                idx += 1;
                let value = args.get(idx).ok_or_else(|| "--db requires a value".to_string())?;
                options.database_path = Some(PathBuf::from(value));
            }
            "--memory" => options.in_memory = true,
            "--json" => {
                idx += 1;
                let value = args.get(idx).ok_or_else(|| "--json requires a value".to_string())?;
                options.request_json = Some(value.to_string());
            }
            "--user" => {
                idx += 1;
                let value = args.get(idx).ok_or_else(|| "--user requires a value".to_string())?;
                options.user_id = Some(value.to_string());
            }
            flag if flag.starts_with("--") => {
                return Err(format!("Unknown argument: {flag}\n\n{}", help_text()));
            }
            symptom => options.symptoms.push(symptom.to_string()),
        }
        idx += 1;
    }
    Ok(options)
}

fn help_text() -> String {
    [
        "symptra-predict",
        "",
        "Usage:",
        "  symptra-predict [options] <symptom>...",
        "  symptra-predict [options] --json '{\"symptoms\": [...], \"userId\": \"...\"}'",
        "",
        "Options:",
        "  --config <path>  Config file (default: <app dir>/config.toml).",
        "  --db <path>      SQLite registry file (default: <app dir>/symptra.db).",
        "  --json <body>    Request body with `symptoms` and optional `userId`.",
        "  --memory         Use an in-memory registry instead of SQLite.",
        "  --user <id>      User id stored with the prediction.",
    ]
    .join("\n")
}

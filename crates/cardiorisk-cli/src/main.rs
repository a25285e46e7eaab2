use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Arg, ArgMatches, Command, ValueHint};
use log::LevelFilter;

use cardiorisk_classifiers::predictor::RiskPredictor;
use cardiorisk_cli::batch::run_batch_predict;
use cardiorisk_cli::config::ServeConfig;
use cardiorisk_cli::server;

fn config_arg() -> Arg {
    Arg::new("config")
        .help("Path to a JSON configuration file. Defaults are used when omitted.")
        .required(false)
        .value_parser(clap::value_parser!(PathBuf))
        .value_hint(ValueHint::FilePath)
}

fn model_dir_arg() -> Arg {
    Arg::new("model_dir")
        .short('m')
        .long("model-dir")
        .help("Folder holding model_uci.json, model_fram.json and meta_model.json. Overrides the configuration file.")
        .value_parser(clap::value_parser!(PathBuf))
        .value_hint(ValueHint::DirPath)
}

fn top_n_arg() -> Arg {
    Arg::new("top_n")
        .short('n')
        .long("top-n")
        .help("Number of ranked features shown with each result. Overrides the configuration file.")
        .value_parser(clap::value_parser!(usize))
}

fn main() -> Result<()> {
    env_logger::Builder::default()
        .filter_level(LevelFilter::Error)
        .parse_env(env_logger::Env::default().filter_or("CARDIORISK_LOG", "error,cardiorisk=info"))
        .init();

    let matches = Command::new("cardiorisk")
        .version(clap::crate_version!())
        .about("\u{2764} cardiorisk - two-stage cardiovascular risk estimation")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("serve")
                .about("Serve the input form and prediction endpoint over HTTP")
                .arg(config_arg())
                .arg(model_dir_arg())
                .arg(top_n_arg())
                .arg(
                    Arg::new("host")
                        .long("host")
                        .help("Address to bind. Overrides the configuration file.")
                        .value_parser(clap::builder::NonEmptyStringValueParser::new())
                        .value_hint(ValueHint::Hostname),
                )
                .arg(
                    Arg::new("port")
                        .short('p')
                        .long("port")
                        .help("Port to bind. Overrides the configuration file.")
                        .value_parser(clap::value_parser!(u16)),
                ),
        )
        .subcommand(
            Command::new("predict")
                .about("Score every row of a CSV/TSV file of form or model-column values")
                .arg(
                    Arg::new("input")
                        .help("Input file (*.csv or *.tsv) with one record per row")
                        .required(true)
                        .value_parser(clap::value_parser!(PathBuf))
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("output_file")
                        .short('o')
                        .long("output_file")
                        .help("Where to write the scored CSV. Defaults to stdout.")
                        .value_parser(clap::value_parser!(PathBuf))
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("config")
                        .short('c')
                        .long("config")
                        .help("Path to a JSON configuration file. Defaults are used when omitted.")
                        .value_parser(clap::value_parser!(PathBuf))
                        .value_hint(ValueHint::FilePath),
                )
                .arg(model_dir_arg())
                .arg(top_n_arg()),
        )
        .get_matches();

    match matches.subcommand() {
        Some(("serve", sub_m)) => handle_serve(sub_m),
        Some(("predict", sub_m)) => handle_predict(sub_m),
        _ => unreachable!("Subcommand is required by CLI configuration"),
    }
}

fn resolve_config(matches: &ArgMatches) -> Result<ServeConfig> {
    let config_path = matches.get_one::<PathBuf>("config");
    match config_path {
        Some(path) => log::info!("[cardiorisk] Using config: {:?}", path),
        None => log::info!("[cardiorisk] No config provided; using defaults."),
    }
    let config = ServeConfig::from_arguments(config_path, matches)?;
    if config_path.is_none() {
        let default_json = serde_json::to_string_pretty(&config).unwrap_or_default();
        eprintln!("[cardiorisk] Default config:\n{}", default_json);
    }
    Ok(config)
}

fn handle_serve(matches: &ArgMatches) -> Result<()> {
    let config = resolve_config(matches)?;

    let predictor = match RiskPredictor::load(&config.predictor) {
        Ok(predictor) => Arc::new(predictor),
        Err(e) => {
            log::error!("Failed to load models: {:#}", e);
            std::process::exit(1)
        }
    };

    let runtime = tokio::runtime::Runtime::new()?;
    match runtime.block_on(server::serve(predictor, &config.address())) {
        Ok(_) => Ok(()),
        Err(e) => {
            log::error!("Server failed: {:#}", e);
            std::process::exit(1)
        }
    }
}

fn handle_predict(matches: &ArgMatches) -> Result<()> {
    let input: &PathBuf = matches
        .get_one("input")
        .ok_or_else(|| anyhow::anyhow!("missing input file"))?;
    let output: Option<&PathBuf> = matches.get_one("output_file");
    let config = resolve_config(matches)?;

    match run_batch_predict(input, output.map(PathBuf::as_path), &config.predictor) {
        Ok(rows) => {
            eprintln!("[cardiorisk] Completed scoring {} rows.", rows);
            Ok(())
        }
        Err(e) => {
            log::error!("Prediction failed: {:#}", e);
            std::process::exit(1)
        }
    }
}

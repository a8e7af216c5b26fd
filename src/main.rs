use browsafe::config::Config;
use browsafe::safe_browsing::SafeBrowsingClient;
use browsafe::server::{self, ApiState};
use browsafe::{UrlAnalyzer, VerdictAggregator};
use clap::{Arg, Command};
use log::LevelFilter;
use std::process;
use std::sync::Arc;

#[tokio::main]
async fn main() {
    let matches = Command::new("browsafe")
        .version(env!("CARGO_PKG_VERSION"))
        .about("URL safety lookup service combining Safe Browsing with URL heuristics")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file path")
                .default_value("/etc/browsafe.yaml"),
        )
        .arg(
            Arg::new("generate-config")
                .long("generate-config")
                .value_name("FILE")
                .help("Generate a default configuration file")
                .action(clap::ArgAction::Set),
        )
        .arg(
            Arg::new("test-config")
                .long("test-config")
                .help("Test configuration validity")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("score")
                .long("score")
                .value_name("URL")
                .help("Print the offline heuristic score for a URL")
                .action(clap::ArgAction::Set),
        )
        .arg(
            Arg::new("check")
                .long("check")
                .value_name("URL")
                .help("Run a full safety check for a URL and print the verdict")
                .action(clap::ArgAction::Set),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose logging")
                .action(clap::ArgAction::SetTrue),
        )
        .get_matches();

    let log_level = if matches.get_flag("verbose") {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();

    if let Some(generate_path) = matches.get_one::<String>("generate-config") {
        generate_default_config(generate_path);
        return;
    }

    if let Some(url) = matches.get_one::<String>("score") {
        print_score(url);
        return;
    }

    let config_path = matches
        .get_one::<String>("config")
        .map(String::as_str)
        .unwrap_or("/etc/browsafe.yaml");

    let config = match load_config(config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading configuration: {e:#}");
            process::exit(1);
        }
    };

    if let Err(e) = config.validate() {
        eprintln!("❌ Configuration validation failed: {e}");
        process::exit(1);
    }

    if matches.get_flag("test-config") {
        println!("✅ Configuration is valid");
        println!("   Listen address: {}", config.bind_addr());
        println!("   Static files: {}", config.server.static_dir);
        println!("   Safe Browsing endpoint: {}", config.safe_browsing.endpoint);
        println!("   Lookup timeout: {} ms", config.safe_browsing.timeout_ms);
        return;
    }

    let aggregator = match build_aggregator(&config) {
        Ok(aggregator) => Arc::new(aggregator),
        Err(e) => {
            eprintln!("Error creating Safe Browsing client: {e}");
            process::exit(1);
        }
    };

    if let Some(url) = matches.get_one::<String>("check") {
        let verdict = aggregator.evaluate(url).await;
        match serde_json::to_string_pretty(&verdict) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("Error encoding verdict: {e}");
                process::exit(1);
            }
        }
        return;
    }

    log::info!("Starting browsafe...");
    if let Err(e) = server::serve(ApiState { aggregator }, &config.server).await {
        log::error!("Server error: {e:#}");
        process::exit(1);
    }
}

fn build_aggregator(config: &Config) -> Result<VerdictAggregator, reqwest::Error> {
    let client = SafeBrowsingClient::new(&config.safe_browsing)?;
    Ok(VerdictAggregator::new(Arc::new(client)))
}

fn load_config(path: &str) -> anyhow::Result<Config> {
    let mut config = if std::path::Path::new(path).exists() {
        Config::from_file(path)?
    } else {
        log::warn!("Configuration file '{path}' not found, using default configuration");
        Config::default()
    };
    config.apply_env()?;
    Ok(config)
}

fn generate_default_config(path: &str) {
    let config = Config::default();
    match config.to_file(path) {
        Ok(()) => {
            println!("Default configuration written to: {path}");
            println!("Set safe_browsing.api_key or export GOOGLE_API_KEY before starting.");
        }
        Err(e) => {
            eprintln!("Error writing configuration file: {e:#}");
            process::exit(1);
        }
    }
}

fn print_score(url: &str) {
    let analyzer = UrlAnalyzer::new();
    let features = analyzer.extract(url);

    println!("🔍 URL: {url}");
    println!("   Length: {}", features.length);
    println!("   Special characters: {}", features.special_chars);
    println!("   Subdomains: {}", features.subdomains);
    println!("   HTTPS: {}", features.https);
    println!("   Suspicious keywords: {}", features.suspicious_keywords);
    println!("   Heuristic score: {}", UrlAnalyzer::score_features(&features));
}

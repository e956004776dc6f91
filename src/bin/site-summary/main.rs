use clap::Parser;
use site_digest::output::print_summary;
use site_digest::{ApiKey, DigestConfig, OpenAiClient, Summarizer};
use std::process::ExitCode;

mod args;
use args::Args;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let base = DigestConfig::for_summary();
    let mut config = match DigestConfig::load(args.config.as_deref(), base) {
        Ok(config) => config,
        Err(e) => {
            ::log::error!("Failed to load configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };
    if let Some(model) = args.model {
        config.model = model;
    }
    if let Some(mode) = args.fetch_mode {
        config.fetch.mode = mode.into();
    }

    let api_key = match ApiKey::from_env() {
        Ok(api_key) => api_key,
        Err(e) => {
            ::log::error!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    let client = OpenAiClient::new(api_key).with_base_url(&config.api_base_url);
    let summarizer = Summarizer::from_config(&client, &config);

    ::log::info!(
        "Summarizing {} page(s) with {} ({:?} fetch)",
        args.urls.len(),
        config.model,
        config.fetch.mode
    );

    for url in &args.urls {
        let summary = summarizer.summarize(url).await;
        print_summary(url, &summary);
    }

    ExitCode::SUCCESS
}

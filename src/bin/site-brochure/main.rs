use clap::Parser;
use site_digest::output::{print_brochure, print_delta, save_brochure};
use site_digest::{ApiKey, BrochureGenerator, DigestConfig, OpenAiClient};
use std::path::Path;
use std::process::ExitCode;

mod args;
use args::Args;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let base = DigestConfig::for_brochure();
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
    let generator = BrochureGenerator::from_config(&client, &config);

    println!(
        "Starting brochure generation for {} from {}...",
        args.company_name, args.url
    );

    let result = if args.no_stream {
        generator
            .generate(&args.company_name, &args.url, None)
            .await
            .inspect(|brochure| print_brochure(brochure))
    } else {
        println!("\n--- Streaming Generated Brochure ---");
        let on_delta: &mut (dyn for<'s> FnMut(&'s str) + Send) =
            &mut |delta: &str| print_delta(delta);
        let result = generator
            .generate(&args.company_name, &args.url, Some(on_delta))
            .await;
        println!("\n------------------------------------");
        result
    };

    match result {
        Ok(brochure) => {
            if !args.no_save {
                if let Err(e) = save_brochure(
                    Path::new("."),
                    &args.company_name,
                    args.filename.as_deref(),
                    &brochure,
                ) {
                    ::log::error!("Error saving brochure: {}", e);
                }
            }
        }
        Err(e) => {
            ::log::error!("Cannot create brochure: {}", e);
        }
    }

    println!("\nBrochure generation process completed.");
    ExitCode::SUCCESS
}

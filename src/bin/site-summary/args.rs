use clap::{Parser, ValueEnum};
use site_digest::FetchMode;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "site-summary")]
#[command(about = "Summarize web pages with a chat model")]
#[command(version)]
pub struct Args {
    /// URLs to summarize
    #[arg(default_values_t = vec!["https://edwarddonner.com".to_string()])]
    pub urls: Vec<String>,

    /// Chat model id
    #[arg(short, long)]
    pub model: Option<String>,

    /// How pages are retrieved
    #[arg(short, long, value_enum)]
    pub fetch_mode: Option<FetchModeArg>,

    /// JSON configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum FetchModeArg {
    Http,
    Browser,
}

impl From<FetchModeArg> for FetchMode {
    fn from(arg: FetchModeArg) -> Self {
        match arg {
            FetchModeArg::Http => FetchMode::Http,
            FetchModeArg::Browser => FetchMode::Browser,
        }
    }
}

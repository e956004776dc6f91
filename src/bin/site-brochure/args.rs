use clap::{Parser, ValueEnum};
use site_digest::FetchMode;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "site-brochure")]
#[command(about = "Generate a company brochure from its website with a chat model")]
#[command(version)]
pub struct Args {
    /// Name of the company
    pub company_name: String,

    /// Landing page URL of the company website
    pub url: String,

    /// Do not save the brochure to a file
    #[arg(long)]
    pub no_save: bool,

    /// Output filename (defaults to {company_name}_brochure.md)
    #[arg(long)]
    pub filename: Option<String>,

    /// Chat model id
    #[arg(short, long)]
    pub model: Option<String>,

    /// How pages are retrieved (default: browser, or the config file's mode)
    #[arg(short, long, value_enum)]
    pub fetch_mode: Option<FetchModeArg>,

    /// Wait for the whole brochure instead of printing it as it arrives
    #[arg(long)]
    pub no_stream: bool,

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

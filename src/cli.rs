//! Command-line interface definitions.
//!
//! All options have defaults matching the public country-leaders API and the
//! conventional `./output/` export locations, so a bare invocation performs
//! the full fetch-scrape-export run.

use clap::Parser;

/// Command-line arguments for the leaders scraper.
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Root URL of the country-leaders API
    #[arg(long, env = "LEADERS_API_ROOT", default_value = "https://country-leaders.onrender.com")]
    pub api_root: String,

    /// Output path for the JSON export
    #[arg(short, long, default_value = "./output/leaders_per_country.json")]
    pub json_output: String,

    /// Output path for the CSV export
    #[arg(short, long, default_value = "./output/leaders_per_country.csv")]
    pub csv_output: String,

    /// Timeout in seconds applied to every HTTP request
    #[arg(long, default_value_t = 10)]
    pub timeout_secs: u64,

    /// Print a one-line summary of every leader after fetching
    #[arg(short, long)]
    pub print_leaders: bool,
}

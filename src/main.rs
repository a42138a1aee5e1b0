//! wp2md - convert a WordPress post into a Markdown file with front matter

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use wp2md::config::DEFAULT_API_BASE;
use wp2md::{Config, HttpConfig, Source};

#[derive(Parser)]
#[command(name = "wp2md")]
#[command(version, about = "Convert a WordPress post into a Markdown file with front matter", long_about = None)]
#[command(after_help = "EXAMPLES:
    wp2md https://example.com/2024/01/hello/       Convert by public URL
    wp2md 1234 --apiurl https://example.com/wp-json/wp/v2/posts
    wp2md 1234 --dest_path content --no_download")]
struct Cli {
    /// The public URL of the post OR the numeric post ID
    #[arg(value_name = "URL_OR_ID")]
    url_or_id: String,

    /// Base URL of the WordPress posts API, used when a post ID is given
    #[arg(long = "apiurl", default_value = DEFAULT_API_BASE)]
    apiurl: String,

    /// Directory to save the Markdown file to
    #[arg(long = "dest_path", default_value = ".")]
    dest_path: PathBuf,

    /// Name of the Markdown file (default: the post slug + ".md")
    #[arg(long = "dest_file")]
    dest_file: Option<String>,

    /// Do not download images; keep the remote image URLs
    #[arg(long = "no_download")]
    no_download: bool,

    /// Append the source file extension to downloaded image names
    #[arg(long = "keep_extensions")]
    keep_extensions: bool,

    /// Number of images downloaded at once
    #[arg(short, long, default_value_t = 1, value_parser = clap::value_parser!(u16).range(1..))]
    jobs: u16,

    /// Per-request timeout in seconds (default: none)
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// More log output (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn into_config(self) -> Config {
        Config {
            source: Source::parse(&self.url_or_id),
            api_base: self.apiurl,
            dest_dir: self.dest_path,
            dest_file: self.dest_file,
            download_images: !self.no_download,
            http: HttpConfig {
                timeout: self.timeout.map(Duration::from_secs),
                image_concurrency: usize::from(self.jobs),
                keep_extensions: self.keep_extensions,
                ..HttpConfig::default()
            },
        }
    }
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "wp2md=info",
        _ => "wp2md=debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = cli.into_config();
    match wp2md::convert(&config).await {
        Ok(path) => {
            println!("Writing: {}", path.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::debug!(code = e.error_code(), retryable = e.is_retryable(), "conversion failed");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

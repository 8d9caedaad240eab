use clap::{ArgAction, Parser};
use klaus::config::{self, OnError, PublishConfig};
use klaus::{output, publish};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::EnvFilter;

fn version_string() -> &'static str {
    let hash = env!("KLAUS_GIT_HASH");
    if hash.is_empty() {
        env!("CARGO_PKG_VERSION")
    } else {
        // Leaked once at startup
        Box::leak(format!("{}@{hash}", env!("CARGO_PKG_VERSION")).into_boxed_str())
    }
}

#[derive(Parser)]
#[command(name = "klaus")]
#[command(about = "Publish a directory of markdown, photos and files as a static site")]
#[command(long_about = "\
Publish a directory of markdown, photos and files as a static site

Every entry under the source directory is mirrored into the output directory:

  content/                         published/
  ├── hello.md            →        ├── hello.html      (rendered into main.html)
  ├── photos/pic.jpg      →        ├── photos/pic.jpg  (fit into 1000x1000)
  └── data/file.bin       →        ├── data/file.bin   (copied as-is)
                                   └── main.css        (from templates/)

Markdown files must start with a preamble:

  ---
  title: Hello
  ---
  # Body in markdown

Run 'klaus --gen-config' to print a documented klaus.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Content directory [default: content]
    #[arg(long)]
    source: Option<PathBuf>,

    /// Output directory [default: published]
    #[arg(long)]
    output: Option<PathBuf>,

    /// Directory holding main.html and main.css [default: templates]
    #[arg(long)]
    templates: Option<PathBuf>,

    /// Config file; ignored if it does not exist
    #[arg(long, default_value = config::CONFIG_FILE)]
    config: PathBuf,

    /// Enlarge JPEGs smaller than the bounding box
    #[arg(long)]
    upscale: bool,

    /// Stop at the first entry that fails to publish
    #[arg(long)]
    abort_on_error: bool,

    /// Log more (-v info, -vv debug); RUST_LOG takes precedence
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Print a stock klaus.toml with all options documented
    #[arg(long)]
    gen_config: bool,
}

impl Cli {
    /// Flags override whatever the config file set.
    fn apply_overrides(&self, config: &mut PublishConfig) {
        if let Some(source) = &self.source {
            config.source = source.clone();
        }
        if let Some(output) = &self.output {
            config.output = output.clone();
        }
        if let Some(templates) = &self.templates {
            config.templates = templates.clone();
        }
        if self.upscale {
            config.images.upscale = true;
        }
        if self.abort_on_error {
            config.on_error = OnError::Abort;
        }
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        _ => tracing::Level::DEBUG,
    };
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.gen_config {
        print!("{}", config::stock_config_toml());
        return ExitCode::SUCCESS;
    }

    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            error!("{e}");
            eprintln!("klaus: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Returns whether every entry was published.
fn run(cli: &Cli) -> Result<bool, Box<dyn std::error::Error>> {
    let mut config = config::load_config(&cli.config)?;
    cli.apply_overrides(&mut config);
    config.validate()?;

    output::print_banner(env!("CARGO_PKG_VERSION"));
    let report = publish::publish(&config, output::print_event)?;
    output::print_summary(&report.stats, report.elapsed);
    output::print_failures(&report.stats.failed);

    Ok(!report.stats.has_failures())
}

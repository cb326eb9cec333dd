use anyhow::Result;
use clap::Parser;
use codegen_resources::{DEFAULT_INLINE_LIMIT, Manifest, PackOptions, pack_directory};
use std::path::PathBuf;
use std::time::Instant;
use tracing_subscriber::prelude::*;

#[derive(Parser, Debug)]
#[command(
    name = "codegen-resources",
    version,
    about = "Pack a directory into a sorted, immutable resource container"
)]
struct Cli {
    /// Directory whose files become resources
    root: PathBuf,

    /// Display name of the container (defaults to the directory name)
    #[arg(long)]
    name: Option<String>,

    /// Leave the container open instead of closed
    #[arg(long)]
    open: bool,

    /// Largest file size, in bytes, embedded inline; bigger files are streamed
    #[arg(long, default_value_t = DEFAULT_INLINE_LIMIT)]
    inline_limit: u64,

    /// Include files and directories starting with '.'
    #[arg(long)]
    include_hidden: bool,

    /// Follow symbolic links while walking
    #[arg(long)]
    follow_links: bool,

    /// Print the manifest as JSON
    #[arg(long)]
    json: bool,

    /// Log level used when RUST_LOG is not set
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn main() {
    let cli = Cli::parse();

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = run(cli) {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let start_time = Instant::now();

    let display_name = match cli.name {
        Some(name) => name,
        None => cli
            .root
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("resources")
            .to_string(),
    };

    let options = PackOptions::new()
        .inline_limit(cli.inline_limit)
        .include_hidden(cli.include_hidden)
        .follow_links(cli.follow_links)
        .closed(!cli.open);

    let container = pack_directory(&cli.root, &display_name, &options)?;
    let manifest = Manifest::from_container(&container)?;

    if cli.json {
        println!("{}", manifest.to_json()?);
        return Ok(());
    }

    for entry in &manifest.resources {
        println!(
            "{:<14} {:>10}  {}  {}",
            entry.kind.to_string(),
            entry.size_bytes,
            &entry.sha256[..12],
            entry.path
        );
    }
    println!(
        "\n✓ {} ({}): {} resources, {} bytes [{:.2}s]",
        manifest.display_name,
        if manifest.closed { "closed" } else { "open" },
        manifest.resource_count,
        manifest.total_size_bytes,
        start_time.elapsed().as_secs_f64()
    );

    Ok(())
}

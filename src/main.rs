use clap::{Parser, Subcommand};
use marquee::{assets, config, generate, output, scan};
use std::path::PathBuf;

/// Shared flags for commands that stage assets.
#[derive(clap::Args, Clone)]
struct CacheArgs {
    /// Disable the staging cache — force re-copying of all assets
    #[arg(long)]
    no_cache: bool,
}

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup — trivial, called exactly once
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "marquee")]
#[command(about = "Static site generator for game-studio marketing sites")]
#[command(long_about = "\
Static site generator for game-studio marketing sites

Your filesystem is the data source. TOML files describe the games, news,
roles, and team; markdown files become legal pages; which files exist
decides which pages exist. Every page hides behind a loading overlay until
its images (and animation players, where tracked) have settled.

Content structure:

  content/
  ├── config.toml              # Site config (optional, stock defaults apply)
  ├── games.toml               # Games catalogue (hero, grid, promo pages)
  ├── news.toml                # News & events articles
  ├── careers.toml             # Open roles
  ├── team.toml                # Story, leadership, commitments
  ├── pages/                   # Markdown pages, linked from the footer
  │   ├── terms-of-service.md
  │   └── privacy.md
  └── assets/                  # Images: logo, covers, news art, icons
      └── logo.png

Run 'marquee gen-config' to generate a documented config.toml.
Run 'marquee check' to validate content and prove every page reveals.")]
#[command(version = version_string())]
struct Cli {
    /// Content directory
    #[arg(long, default_value = "content", global = true)]
    source: PathBuf,

    /// Output directory
    #[arg(long, default_value = "dist", global = true)]
    output: PathBuf,

    /// Directory for intermediate files (manifests, staged assets)
    #[arg(long, default_value = ".marquee-temp", global = true)]
    temp_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Scan the content directory into a manifest
    Scan,
    /// Stage assets: probe dimensions, fingerprint, copy
    Process(CacheArgs),
    /// Produce the final HTML site from staged assets
    Generate,
    /// Run the full pipeline: scan → process → generate
    Build(CacheArgs),
    /// Validate content and simulate every page's reveal without building
    Check,
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Scan => {
            let manifest = scan::scan(&cli.source)?;
            std::fs::create_dir_all(&cli.temp_dir)?;
            let manifest_path = cli.temp_dir.join("manifest.json");
            let json = serde_json::to_string_pretty(&manifest)?;
            std::fs::write(&manifest_path, json)?;
            output::print_scan_output(&manifest);
        }
        Command::Process(cache_args) => {
            let scan_manifest_path = cli.temp_dir.join("manifest.json");
            let staged_dir = cli.temp_dir.join("staged");
            run_process(
                &scan_manifest_path,
                &cli.source,
                &staged_dir,
                !cache_args.no_cache,
            )?;
        }
        Command::Generate => {
            let staged_dir = cli.temp_dir.join("staged");
            let staged_manifest_path = staged_dir.join("manifest.json");
            generate::generate(&staged_manifest_path, &staged_dir, &cli.output)?;
            let manifest_content = std::fs::read_to_string(&staged_manifest_path)?;
            let manifest: assets::Manifest = serde_json::from_str(&manifest_content)?;
            output::print_generate_output(&generate::assemble_pages(&manifest));
        }
        Command::Build(cache_args) => {
            std::fs::create_dir_all(&cli.temp_dir)?;

            println!("==> Stage 1: Scanning {}", cli.source.display());
            let manifest = scan::scan(&cli.source)?;
            let scan_manifest_path = cli.temp_dir.join("manifest.json");
            let json = serde_json::to_string_pretty(&manifest)?;
            std::fs::write(&scan_manifest_path, json)?;
            output::print_scan_output(&manifest);

            println!("==> Stage 2: Staging assets");
            let staged_dir = cli.temp_dir.join("staged");
            let staged = run_process(
                &scan_manifest_path,
                &cli.source,
                &staged_dir,
                !cache_args.no_cache,
            )?;

            println!("==> Stage 3: Generating HTML → {}", cli.output.display());
            let staged_manifest_path = staged_dir.join("manifest.json");
            generate::generate(&staged_manifest_path, &staged_dir, &cli.output)?;
            output::print_generate_output(&generate::assemble_pages(&staged));

            println!("==> Build complete: {}", cli.output.display());
        }
        Command::Check => {
            println!("==> Checking {}", cli.source.display());
            let manifest = scan::scan(&cli.source)?;
            output::print_scan_output(&manifest);

            let pages = generate::assemble_pages(&assets::Manifest::unstaged(manifest));
            let checks = generate::check_pages(&pages);
            output::print_check_output(&checks);

            let stuck = checks.iter().filter(|c| !c.ok()).count();
            if stuck > 0 {
                return Err(format!("{stuck} page(s) would hang behind the overlay").into());
            }
            println!("==> Content is valid");
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Run the staging stage with a progress printer thread, write its manifest,
/// and report cache stats.
fn run_process(
    scan_manifest_path: &std::path::Path,
    source: &std::path::Path,
    staged_dir: &std::path::Path,
    use_cache: bool,
) -> Result<assets::Manifest, Box<dyn std::error::Error>> {
    let (tx, rx) = std::sync::mpsc::channel();
    let printer = std::thread::spawn(move || {
        for event in rx {
            println!("{}", output::format_asset_event(&event));
        }
    });
    let result = assets::process(scan_manifest_path, source, staged_dir, use_cache, Some(tx))?;
    printer.join().expect("printer thread panicked");

    let manifest_path = staged_dir.join("manifest.json");
    let json = serde_json::to_string_pretty(&result.manifest)?;
    std::fs::write(&manifest_path, &json)?;
    println!("Cache: {}", result.stats);
    Ok(result.manifest)
}

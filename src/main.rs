use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use nbpages::config::{self, OverwritePolicy, SiteConfig};
use nbpages::render::BasicRenderer;
use nbpages::{output, pipeline};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "nbpages")]
#[command(about = "Convert Jupyter notebooks into templated static HTML pages")]
#[command(long_about = "\
Convert Jupyter notebooks into templated static HTML pages

Every notebook in the notebook directory becomes one page for a Jekyll-style
site, with a front matter header, prev/next navigation and the rendered
notebook body. Asset links such as src=\"images/plot.png\" are rewritten to
{{ \"/assets/images/plot.png\" | relative_url }}.

Layout:

  notebooks/
  ├── 01-intro.ipynb        # → docs/_notebooks/01-intro.html
  ├── 02-pandas.ipynb       # → docs/_notebooks/02-pandas.html
  └── images/               # → docs/assets/images/
      └── plot.png

Metadata (from the first heading cell and the first cell):
  Title:      first '# heading' line, punctuation removed
  Permalink:  title lowercased, spaces → hyphens
  Topics:     '* item' bullets after **Topics Covered**

Run 'nbpages gen-config' to generate a documented nbpages.toml.")]
#[command(version)]
struct Cli {
    /// Config file (missing file = stock defaults)
    #[arg(long, default_value = config::CONFIG_FILE, global = true)]
    config: PathBuf,

    /// Notebook directory (overrides paths.notebooks)
    #[arg(long, global = true)]
    notebooks: Option<PathBuf>,

    /// Page output directory (overrides paths.pages)
    #[arg(long, global = true)]
    output: Option<PathBuf>,

    /// Asset output directory (overrides paths.assets)
    #[arg(long, global = true)]
    assets_output: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

/// Shared flag for commands that copy assets.
#[derive(clap::Args, Clone)]
struct OverwriteArgs {
    /// What to do with assets that already exist (default: from config)
    #[arg(long, value_enum)]
    overwrite: Option<OverwritePolicy>,
}

#[derive(Subcommand)]
enum Command {
    /// Build every page, then copy assets
    Build {
        /// Delete existing files in the output directory first
        #[arg(long)]
        clean: bool,
        /// Don't copy asset directories
        #[arg(long)]
        no_assets: bool,
        /// Exit with an error if any page has metadata warnings
        #[arg(long)]
        strict: bool,
        #[command(flatten)]
        overwrite: OverwriteArgs,
    },
    /// Run the pipeline without writing and show what would be built
    Check,
    /// Delete the files in the output directory
    Clean {
        /// Actually delete (otherwise only list)
        #[arg(long)]
        yes: bool,
    },
    /// Copy asset directories only
    Assets(OverwriteArgs),
    /// Print a stock nbpages.toml with all options documented
    GenConfig,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;
    run(&cli)
}

/// Dispatch a parsed command line. Only commands that touch the site load config.
fn run(cli: &Cli) -> anyhow::Result<()> {
    match &cli.command {
        Command::Build {
            clean,
            no_assets,
            strict,
            overwrite,
        } => {
            let site_config = load_site_config(cli)?;
            if *clean {
                let removed = pipeline::clean_output_dir(&site_config.paths.pages)?;
                output::print_clean_output(&removed, true);
            }
            let report = pipeline::build_all(&site_config, &BasicRenderer)?;
            output::print_build_output(&report);

            if !*no_assets {
                let policy = overwrite.overwrite.unwrap_or(site_config.assets.overwrite);
                let copied = pipeline::copy_assets(&site_config, policy)?;
                output::print_copy_output(&copied);
            }

            if *strict && report.has_warnings() {
                bail!(
                    "{} metadata warning(s) with --strict",
                    report.warnings.len()
                );
            }
        }
        Command::Check => {
            let site_config = load_site_config(cli)?;
            let pages = pipeline::prepare_pages(&site_config, &BasicRenderer)?;
            output::print_check_output(&pages);
        }
        Command::Clean { yes } => {
            let site_config = load_site_config(cli)?;
            if *yes {
                let removed = pipeline::clean_output_dir(&site_config.paths.pages)?;
                output::print_clean_output(&removed, true);
            } else {
                let files = pipeline::discover_outputs(&site_config.paths.pages)?;
                output::print_clean_output(&files, false);
            }
        }
        Command::Assets(args) => {
            let site_config = load_site_config(cli)?;
            let policy = args.overwrite.unwrap_or(site_config.assets.overwrite);
            let copied = pipeline::copy_assets(&site_config, policy)?;
            output::print_copy_output(&copied);
        }
        Command::GenConfig => print!("{}", config::stock_config_toml()),
    }

    Ok(())
}

/// Install the global `tracing` subscriber. `RUST_LOG` refines the default level.
fn init_tracing(verbose: bool) -> anyhow::Result<()> {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

/// Load `nbpages.toml` and apply command-line path overrides.
fn load_site_config(cli: &Cli) -> anyhow::Result<SiteConfig> {
    let mut site_config = config::load_config(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?;

    if let Some(notebooks) = &cli.notebooks {
        site_config.paths.notebooks = notebooks.clone();
    }
    if let Some(pages) = &cli.output {
        site_config.paths.pages = pages.clone();
    }
    if let Some(assets) = &cli.assets_output {
        site_config.paths.assets = assets.clone();
    }
    site_config.validate()?;
    Ok(site_config)
}

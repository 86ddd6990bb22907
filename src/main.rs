//! termfolio - An interactive portfolio terminal
//!
//! termfolio boots a fake system log, then drops you at a prompt where you
//! can explore the portfolio owner's profile with shell-like commands.
//! A handful of easter eggs are hidden along the way.
//!
//! # Features
//!
//! - **Boot Sequence**: Timed boot log before the prompt appears
//! - **Commands**: `help`, `about`, `projects`, `skills`, `contact`, ...
//! - **History**: Up/Down to recall previous commands, Tab to complete
//! - **Easter Eggs**: Five to find, including the Konami code
//! - **Color Schemes**: 5 built-in themes
//!
//! # Quick Start
//!
//! ```text
//! termfolio              # Start with the boot sequence
//! termfolio --no-boot    # Straight to the prompt
//! termfolio --demo       # Print a scripted session and exit
//! ```
//!
//! # Keys
//!
//! | Key | Action |
//! |-----|--------|
//! | Enter | Run command |
//! | Up/Down | Recall history |
//! | Tab | Complete command |
//! | Ctrl+L | Clear screen |
//! | Ctrl+V | Paste |
//! | Esc / Ctrl+C | Quit |

mod app;
mod config;
mod core;
mod history;
mod profile;
mod ui;

use std::env;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use crate::app::{App, AppOptions};
use crate::config::{ColorScheme, Config};
use crate::profile::Profile;
use crate::ui::{DebugRenderer, Renderer};

/// Version string from Cargo.toml
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Commands played by `--demo`
const DEMO_SCRIPT: [&str; 6] = ["help", "whoami", "projects", "ls -la", "secret", "unknowncmd"];

/// Command line options
#[derive(Debug, Default)]
struct CliArgs {
    /// Skip the boot sequence
    no_boot: bool,
    /// Color scheme override
    theme: Option<String>,
    /// Profile file override
    profile: Option<PathBuf>,
    /// Print a scripted session instead of running interactively
    demo: bool,
}

fn print_version() {
    eprintln!("termfolio {}", VERSION);
}

fn print_help() {
    eprintln!("termfolio {} - An interactive portfolio terminal", VERSION);
    eprintln!();
    eprintln!("Usage: termfolio [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --no-boot             Skip the boot sequence");
    eprintln!("  -t, --theme <NAME>    Color scheme");
    eprintln!("  -p, --profile <PATH>  Profile data file (TOML)");
    eprintln!("  --demo                Print a scripted session and exit");
    eprintln!("  -v, --version         Show version");
    eprintln!("  -h, --help            Show this help");
    eprintln!();
    eprintln!("Keys:");
    eprintln!("  Enter                 Run command");
    eprintln!("  Up/Down               Recall history");
    eprintln!("  Tab                   Complete command");
    eprintln!("  Ctrl+U                Clear input");
    eprintln!("  Ctrl+L                Clear screen");
    eprintln!("  Ctrl+V                Paste");
    eprintln!("  Esc, Ctrl+C           Quit");
    eprintln!();
    eprintln!("Configuration: ~/.termfolio/config.toml");
    eprintln!("Profile:       ~/.termfolio/profile.toml");
    eprintln!("Log file:      ~/.termfolio/termfolio.log (level via TERMFOLIO_LOG)");
    eprintln!();
    eprintln!("Color schemes: {}", ColorScheme::list().join(", "));
}

fn parse_args(args: &[String]) -> Result<CliArgs, String> {
    let mut cli = CliArgs::default();
    let mut i = 1;

    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            "-v" | "--version" => {
                print_version();
                std::process::exit(0);
            }
            "--no-boot" => {
                cli.no_boot = true;
            }
            "--demo" => {
                cli.demo = true;
            }
            "-t" | "--theme" => {
                i += 1;
                let name = args.get(i).ok_or("Missing theme argument")?;
                cli.theme = Some(name.clone());
            }
            "-p" | "--profile" => {
                i += 1;
                let path = args.get(i).ok_or("Missing profile argument")?;
                cli.profile = Some(PathBuf::from(path));
            }
            arg => {
                return Err(format!("Unknown argument: {}. Use -h for help.", arg));
            }
        }
        i += 1;
    }

    Ok(cli)
}

/// Log to ~/.termfolio/termfolio.log; the screen belongs to the UI
fn init_logging() {
    let log_path = config::config_dir()
        .map(|dir| dir.join("termfolio.log"))
        .unwrap_or_else(|| PathBuf::from("termfolio.log"));

    // Create log directory if needed
    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    // Open log file (append mode)
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .ok();

    if let Some(file) = log_file {
        let filter = EnvFilter::try_from_env("TERMFOLIO_LOG")
            .unwrap_or_else(|_| EnvFilter::new("info"));
        let subscriber = FmtSubscriber::builder()
            .with_env_filter(filter)
            .with_writer(std::sync::Mutex::new(file))
            .with_ansi(false)
            .finish();
        let _ = tracing::subscriber::set_global_default(subscriber);
    }
}

/// Merge config file and command line into app options
fn resolve_options(config: &Config, cli: &CliArgs) -> AppOptions {
    let scheme = match &cli.theme {
        Some(name) => ColorScheme::by_name(name),
        None => config.get_color_scheme(),
    };

    let profile_path = cli.profile.clone().or_else(|| config.profile_path());
    let profile = match profile_path {
        Some(path) => match Profile::load_from(&path) {
            Ok(profile) => {
                info!("Loaded profile from {}", path.display());
                profile
            }
            Err(e) => {
                warn!("{}; using built-in profile", e);
                Profile::default()
            }
        },
        None => Profile::default(),
    };

    AppOptions {
        scheme,
        prompt: config.prompt.render(),
        profile,
        boot: config.boot.enabled && !cli.no_boot,
    }
}

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = env::args().collect();
    let cli = match parse_args(&args) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!("Use --help for usage information");
            std::process::exit(1);
        }
    };

    init_logging();
    info!("termfolio {} starting...", VERSION);

    let config = Config::load();
    let options = resolve_options(&config, &cli);
    info!("Color scheme: {}", options.scheme.name);

    if cli.demo {
        return run_demo(options);
    }

    let mut app = App::new(options, Instant::now());
    let mut renderer = Renderer::new();
    renderer.init().context("failed to initialize terminal")?;

    let result = app.run(&mut renderer);

    // Restore the terminal before reporting any error
    renderer.cleanup().context("failed to restore terminal")?;
    result
}

/// Play the boot log instantly, run the demo script and print the transcript
fn run_demo(options: AppOptions) -> anyhow::Result<()> {
    let start = Instant::now();
    let mut app = App::new(options, start);

    // Far enough in the future for every boot step to be due
    let boot_end = start + Duration::from_secs(60);
    app.tick(boot_end);

    for line in DEMO_SCRIPT {
        app.submit_line(line, boot_end);
    }

    println!("{}", DebugRenderer::render(app.session(), app.prompt()));
    println!();
    println!(
        "Easter eggs found: {}/{}",
        app.eggs().found_count(),
        app.eggs().total()
    );
    Ok(())
}

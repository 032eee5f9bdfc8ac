// flowtty: watch program execution unfold, one step at a time

use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing_subscriber::EnvFilter;

use flowtty::config::{Config, DEFAULT_POLL_INTERVAL_MS};
use flowtty::engine::policy::{DEFAULT_PLAYBACK_RATE, DEFAULT_SPEED_MS};
use flowtty::headless;
use flowtty::loader::Scenario;
use flowtty::session::Session;
use flowtty::ui::App;

/// Step through a timeline or control-flow diagram at a chosen pace.
#[derive(Parser)]
#[command(name = "flowtty", version, about)]
struct Cli {
    /// Scenario document (JSON) holding a timeline or a diagram
    scenario: PathBuf,

    /// Per-step delay in milliseconds for diagrams
    #[arg(long, env = "FLOWTTY_SPEED_MS", default_value_t = DEFAULT_SPEED_MS)]
    speed_ms: u64,

    /// Multiplier applied to authored timeline durations
    #[arg(long, env = "FLOWTTY_RATE", default_value_t = DEFAULT_PLAYBACK_RATE)]
    rate: f64,

    /// Seed for reproducible branch outcomes
    #[arg(long, env = "FLOWTTY_SEED")]
    seed: Option<u64>,

    /// Print one line per step instead of starting the TUI
    #[arg(long)]
    headless: bool,

    /// Write logs here (TUI mode logs nowhere otherwise)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Longest wait for input before checking the step timer, in milliseconds
    #[arg(long, default_value_t = DEFAULT_POLL_INTERVAL_MS)]
    poll_interval_ms: u64,
}

impl From<Cli> for Config {
    fn from(cli: Cli) -> Self {
        Config {
            speed_ms: cli.speed_ms,
            playback_rate: cli.rate,
            seed: cli.seed,
            headless: cli.headless,
            log_file: cli.log_file,
            poll_interval_ms: cli.poll_interval_ms,
        }
    }
}

fn init_logging(config: &Config) -> io::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if let Some(path) = &config.log_file {
        let file = File::create(path)?;
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .init();
    } else if config.headless {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .init();
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let scenario_path = cli.scenario.clone();
    let config = Config::from(cli);

    if let Err(e) = config.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(2);
    }
    init_logging(&config)?;

    let scenario = match Scenario::from_path(&scenario_path) {
        Ok(scenario) => scenario,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };
    tracing::info!(
        kind = scenario.kind(),
        steps = scenario.len(),
        path = %scenario_path.display(),
        "scenario loaded"
    );

    let mut session = Session::from_scenario(scenario, &config);

    if config.headless {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        let steps = headless::run(&mut session, &mut out)?;
        tracing::info!(steps, "headless replay finished");
        return Ok(());
    }

    // Set up terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create and run app
    let mut app = App::new(session, config.poll_interval());
    let res = app.run(&mut terminal);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}

use anyhow::Result;
use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::{Shell, generate};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::io;
use std::path::{Path, PathBuf};
use termfolio_core::{AppConfig, ContentStore};
use termfolio_observe::Observer;
use termfolio_shell::{Session, SessionOptions, SystemClock, vocabulary};
use termfolio_store::{MemoryPreferences, PreferenceStore, SqlitePreferences};
use termfolio_ui::{TuiOptions, run_tui};
use tracing::{debug, info};

mod output;

use output::{print_json, session_report, transcript};

#[derive(Parser)]
#[command(name = "termfolio", version)]
#[command(about = "Interactive terminal-style developer portfolio", long_about = None)]
struct Cli {
    /// Directory holding `.termfolio/` settings, preferences and logs.
    #[arg(long, global = true)]
    workspace: Option<PathBuf>,

    #[arg(long, global = true)]
    json: bool,

    /// Mirror log output to stderr.
    #[arg(short = 'v', long, global = true)]
    verbose: bool,

    /// Portfolio content JSON replacing the built-in data.
    #[arg(long, global = true)]
    content: Option<PathBuf>,

    /// Keep theme and history in memory only.
    #[arg(long = "no-persist", global = true)]
    no_persist: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Submit each line to a fresh session and print the output log.
    Run(RunArgs),
    /// Print a shell completion script.
    Completions(CompletionsArgs),
    /// List the command names offered by tab completion.
    Vocabulary,
    /// Show the effective configuration.
    Config(ConfigArgs),
}

#[derive(Args)]
struct RunArgs {
    #[arg(required = true)]
    lines: Vec<String>,
}

#[derive(Args)]
struct CompletionsArgs {
    #[arg(value_enum)]
    shell: Shell,
}

#[derive(Args)]
struct ConfigArgs {
    /// Write the effective configuration to the project settings file.
    #[arg(long)]
    save: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match &cli.command {
        Some(Commands::Completions(args)) => return run_completions(args),
        Some(Commands::Vocabulary) => return run_vocabulary(cli.json),
        _ => {}
    }

    let workspace = match &cli.workspace {
        Some(path) => path.clone(),
        None => std::env::current_dir()?,
    };
    let observer = Observer::new(&workspace, cli.verbose)?;
    debug!(log = %observer.log_path().display(), "logging ready");
    let config = AppConfig::load(&workspace)?;

    if let Some(Commands::Config(args)) = &cli.command {
        return run_config(&config, &workspace, args, cli.json);
    }

    let content = load_content(&cli, &config, &workspace)?;
    let store: Box<dyn PreferenceStore> = if cli.no_persist {
        Box::new(MemoryPreferences::new())
    } else {
        Box::new(SqlitePreferences::new(&workspace)?)
    };
    info!(
        workspace = %workspace.display(),
        persist = !cli.no_persist,
        "starting termfolio"
    );
    let mut session = Session::new(
        content,
        store,
        Box::new(SystemClock),
        Box::new(StdRng::from_entropy()),
        SessionOptions::from(&config),
    );

    match cli.command {
        Some(Commands::Run(args)) => run_lines(&mut session, &args.lines, cli.json),
        _ => {
            let options = TuiOptions::from_config(&config.ui, &workspace)?;
            run_tui(&mut session, &options)
        }
    }
}

fn load_content(cli: &Cli, config: &AppConfig, workspace: &Path) -> Result<ContentStore> {
    let path = cli
        .content
        .clone()
        .or_else(|| config.resolved_content_path(workspace));
    match path {
        Some(path) => {
            debug!(path = %path.display(), "loading portfolio content");
            ContentStore::load(&path)
        }
        None => Ok(ContentStore::builtin()),
    }
}

fn run_lines(session: &mut Session, lines: &[String], json_mode: bool) -> Result<()> {
    session.boot();
    for line in lines {
        session.submit_line(line);
    }
    if json_mode {
        print_json(&session_report(session))
    } else {
        for entry in transcript(session) {
            println!("{entry}");
        }
        Ok(())
    }
}

fn run_completions(args: &CompletionsArgs) -> Result<()> {
    let mut cmd = Cli::command();
    generate(args.shell, &mut cmd, "termfolio", &mut io::stdout());
    Ok(())
}

fn run_vocabulary(json_mode: bool) -> Result<()> {
    let names = vocabulary();
    if json_mode {
        print_json(&names)
    } else {
        for name in names {
            println!("{name}");
        }
        Ok(())
    }
}

fn run_config(config: &AppConfig, workspace: &Path, args: &ConfigArgs, json_mode: bool) -> Result<()> {
    if args.save {
        config.save(workspace)?;
        info!(path = %AppConfig::project_settings_path(workspace).display(), "settings saved");
    }
    if json_mode {
        print_json(config)
    } else {
        println!("{}", serde_json::to_string_pretty(config)?);
        Ok(())
    }
}

mod commands;
mod config;
mod paths;

use std::fs;
use std::fs::File;

use salesgrid_lib::Grid;
use salesgrid_lib::ServerApi;
use salesgrid_lib::plugins::editing::SubmitOutcome;
use salesgrid_lib::view::to_text;
use simplelog::Config;
use simplelog::LevelFilter;
use simplelog::WriteLogger;
use thiserror::Error;
use tokio::io::AsyncBufReadExt;
use tokio::io::BufReader;

use crate::commands::Command;
use crate::commands::HELP;
use crate::config::ConfigError;
use crate::config::Settings;

#[derive(Debug, Error)]
enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Grid(#[from] salesgrid_lib::error::Error),
    #[error("terminal error: {0}")]
    Io(#[from] std::io::Error),
}

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();

    let settings = match Settings::load(paths::config_file().as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(settings.log_level());

    if let Err(e) = run(settings).await {
        log::error!("{}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_logging(level: LevelFilter) {
    paths::rotate_logs();
    let Some(path) = paths::log_file() else {
        eprintln!("No home directory; logging disabled");
        return;
    };
    if let Some(dir) = path.parent() {
        let _ = fs::create_dir_all(dir);
    }
    match File::create(&path) {
        Ok(file) => {
            if let Err(e) = WriteLogger::init(level, Config::default(), file) {
                eprintln!("Failed to initialize logger: {}", e);
            }
        }
        Err(e) => eprintln!("Failed to create log file {}: {}", path.display(), e),
    }
}

async fn run(settings: Settings) -> Result<(), AppError> {
    let schema = settings.schema()?;

    let mut builder = ServerApi::builder().base_url(settings.base_url.as_str());
    if let Some(timeout) = settings.timeout() {
        builder = builder.timeout(timeout);
    }
    let api = builder.build()?;
    log::info!("Using API at {}", api.base_url());

    let mut grid = Grid::new(api, &schema, settings.grid_config());
    grid.start().await?;
    draw(&grid);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let command = match Command::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                eprintln!("{}", e);
                continue;
            }
        };

        if command == Command::Quit {
            break;
        }
        if command == Command::Help {
            println!("{}", HELP);
            continue;
        }

        // Failed fetches leave the previous rows on screen.
        match execute(&mut grid, command).await {
            Ok(()) => draw(&grid),
            Err(e) => {
                log::error!("{}", e);
                eprintln!("Error: {}", e);
            }
        }
    }

    log::info!("Exiting");
    Ok(())
}

async fn execute(grid: &mut Grid, command: Command) -> Result<(), salesgrid_lib::error::Error> {
    log::debug!("command: {:?}", command);
    match command {
        Command::Sort(field) => {
            if !grid.toggle_sort(&field).await? {
                eprintln!("'{}' is not sortable", field);
            }
        }
        Command::Page(page) => grid.goto_page(page).await?,
        Command::First => grid.first_page().await?,
        Command::Prev => grid.prev_page().await?,
        Command::Next => grid.next_page().await?,
        Command::Last => grid.last_page().await?,
        Command::Limit(limit) => {
            grid.set_limit(limit).await?;
        }
        Command::Filter { key, value } => {
            if !grid.filtering().accepts(&key) {
                eprintln!("unknown filter '{}', expected one of: {}", key, grid.filtering().keys().join(", "));
            } else {
                grid.set_filter(&key, &value).await?;
            }
        }
        Command::Clear(key) => {
            grid.clear_filter(&key).await?;
        }
        Command::Search(term) => {
            grid.search(&term).await?;
        }
        Command::Reset => grid.reset_all().await?,
        Command::Add => grid.open_add(),
        Command::Edit(id) => {
            if !grid.open_edit(&id) {
                eprintln!("no record '{}' on this page", id);
            }
        }
        Command::Delete(id) => {
            if !grid.open_delete(&id) {
                eprintln!("no record '{}' on this page", id);
            }
        }
        Command::Set { field, value } => {
            if !grid.set_form_field(&field, &value) {
                eprintln!("no form field '{}'", field);
            }
        }
        Command::Submit => {
            if grid.submit_modal().await? == SubmitOutcome::Idle {
                eprintln!("nothing to submit");
            }
        }
        Command::Escape => {
            grid.escape();
        }
        Command::Refresh => grid.refresh().await?,
        Command::Help | Command::Quit => {}
    }
    Ok(())
}

fn draw(grid: &Grid) {
    println!("{}", to_text(&grid.container()));
    if let Some(modal) = grid.modal_view() {
        println!();
        println!("{}", to_text(&modal));
    }
    println!();
}

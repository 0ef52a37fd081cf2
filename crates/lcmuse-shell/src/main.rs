mod command;
mod helper;
mod session;
mod view;

use std::sync::{Arc, Mutex};

use anyhow::Result;
use colored::Colorize;
use rustyline::Editor;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;

use lcmuse_application::{BackgroundProcess, ShellBridge, bootstrap};
use lcmuse_core::shell::ShellModel;
use lcmuse_core::suggestion::SuggestionResult;
use lcmuse_infrastructure::ConfigService;
use lcmuse_infrastructure::logging::init_logging;

use crate::command::Command;
use crate::helper::CliHelper;
use crate::session::{SharedModel, lock, pump_notifications, schedule_status_expiry};

/// Entry point of the lcmuse shell.
///
/// Loads configuration, starts logging and the background process, then runs
/// the REPL until `/quit` or end of input. The OSC channels are closed before
/// the process exits.
#[tokio::main]
async fn main() -> Result<()> {
    let config = ConfigService::load()?;
    let _log_guard = init_logging(&config.logs_dir, &config.log_filter)?;
    tracing::info!("[Shell] Starting lcmuse {}", env!("CARGO_PKG_VERSION"));
    for diagnostic in &config.diagnostics {
        tracing::error!("[Config] {}", diagnostic);
    }

    let context = bootstrap(config).await?;
    let (process, bridge, notifications) = BackgroundProcess::new(context);
    let background = tokio::spawn(process.run());

    let model: SharedModel = Arc::new(Mutex::new(ShellModel::new()));
    let notifier = tokio::spawn(pump_notifications(model.clone(), notifications));

    if let Err(e) = bridge.request_user_id() {
        tracing::warn!("[Shell] Could not request the user id: {}", e);
    }

    let repl_result = run_repl(&model, &bridge).await;

    // Dropping the last bridge ends the background loop, which closes the channels
    drop(bridge);
    if let Err(e) = background.await {
        tracing::error!("[Shell] Background process ended abnormally: {}", e);
    }
    let _ = notifier.await;

    repl_result
}

async fn run_repl(model: &SharedModel, bridge: &ShellBridge) -> Result<()> {
    let mut rl: Editor<CliHelper, DefaultHistory> = Editor::new()?;
    rl.set_helper(Some(CliHelper));

    println!("{}", view::banner());
    println!();

    loop {
        let line = match rl.readline("♪ ") {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type /quit to exit.".yellow());
                continue;
            }
            Err(ReadlineError::Eof) => break,
            Err(err) => {
                eprintln!("{}", format!("Error: {:?}", err).red());
                break;
            }
        };
        if !line.trim().is_empty() {
            let _ = rl.add_history_entry(line.as_str());
        }

        match Command::parse(&line) {
            Command::Prompt(text) => submit(model, bridge, &text).await,
            Command::Send => send(model, bridge),
            Command::Clear => {
                lock(model).clear();
                println!("{}", "Cleared.".bright_black());
            }
            Command::Show => println!("{}", view::show(&lock(model))),
            Command::WhoAmI => println!("{}", view::user_id(&lock(model))),
            Command::Help => println!("{}", view::help()),
            Command::Quit => break,
            Command::Unknown(cmd) => {
                println!("{}", format!("Unknown command: {cmd} (try /help)").bright_black());
            }
        }
    }

    println!("{}", "Goodbye!".bright_green());
    Ok(())
}

/// Runs one generation; input is blocked until the reply arrives.
async fn submit(model: &SharedModel, bridge: &ShellBridge, text: &str) {
    let request = lock(model).submit(text);
    let Some(request) = request else {
        println!("{}", view::error(lock(model).error()));
        return;
    };

    println!("{}", view::loading());
    let reply = bridge.generate_musical_response(request.prompt_text).await;

    let mut model = lock(model);
    model.apply_result(SuggestionResult::from(reply));
    println!("{}", view::result(&model));
}

fn send(model: &SharedModel, bridge: &ShellBridge) {
    let prepared = lock(model).prepare_send();
    let Some((response_text, ticket)) = prepared else {
        println!("{}", view::error(lock(model).error()));
        return;
    };

    if let Some(text) = lock(model).status() {
        println!("{}", view::status(text));
    }
    schedule_status_expiry(model.clone(), ticket);

    if let Err(e) = bridge.send_sc_code(response_text) {
        tracing::error!("[Shell] send-sc-code failed: {}", e);
        let ticket = lock(model).set_status(e.to_string());
        schedule_status_expiry(model.clone(), ticket);
    }
}

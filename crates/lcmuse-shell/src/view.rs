//! Terminal rendering of the shell model.

use colored::Colorize;
use lcmuse_core::shell::{ShellModel, ShellPhase};

pub fn banner() -> String {
    format!(
        "{}\n{}",
        "=== lcmuse: live-coding muse for SuperCollider ===".bright_magenta().bold(),
        "Describe what you are playing. /send sends the suggestion, /help lists commands."
            .bright_black()
    )
}

pub fn help() -> String {
    [
        ("<text>", "ask for a complementary sound"),
        ("/send", "save the suggested code and send it to SuperCollider"),
        ("/clear", "discard prompt, suggestion and messages"),
        ("/show", "show the current suggestion and status"),
        ("/whoami", "show your user id"),
        ("/quit", "exit"),
    ]
    .iter()
    .map(|(cmd, text)| format!("  {} {}", format!("{cmd:<8}").bright_cyan(), text))
    .collect::<Vec<_>>()
    .join("\n")
}

pub fn loading() -> String {
    "Generating...".bright_black().to_string()
}

/// The suggestion or the error, whichever the model currently shows.
pub fn result(model: &ShellModel) -> String {
    match model.phase() {
        ShellPhase::ShownSuccess => code(model),
        ShellPhase::ShownError => error(model.error()),
        ShellPhase::Loading => loading(),
        ShellPhase::Idle => "Nothing to show yet.".bright_black().to_string(),
    }
}

fn code(model: &ShellModel) -> String {
    let mut out = vec!["AI suggestion (SuperCollider code):".bright_green().to_string()];
    out.extend(model.display_code().lines().map(|line| line.bright_blue().to_string()));
    out.join("\n")
}

pub fn error(message: &str) -> String {
    message.red().to_string()
}

pub fn status(text: &str) -> String {
    text.yellow().to_string()
}

pub fn user_id(model: &ShellModel) -> String {
    if model.user_id().is_empty() {
        "User ID: (not yet known)".bright_black().to_string()
    } else {
        format!("User ID: {}", model.user_id()).bright_black().to_string()
    }
}

/// Everything on screen: prompt, result, status line, identity.
pub fn show(model: &ShellModel) -> String {
    let mut out = Vec::new();
    if !model.prompt().is_empty() {
        out.push(format!("{} {}", "Prompt:".bold(), model.prompt()));
    }
    out.push(result(model));
    if let Some(text) = model.status() {
        out.push(status(text));
    }
    out.push(user_id(model));
    out.join("\n")
}

use anyhow::Result;
use serde::Serialize;
use serde_json::json;
use termfolio_shell::Session;

pub(crate) fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string(value)?);
    Ok(())
}

/// Plain-text rendering of every log entry, one entry per element.
pub(crate) fn transcript(session: &Session) -> Vec<String> {
    session
        .output()
        .entries()
        .iter()
        .map(|entry| entry.to_plain_string())
        .collect()
}

pub(crate) fn session_report(session: &Session) -> serde_json::Value {
    json!({
        "theme": session.theme(),
        "history": session.history().entries(),
        "exit_requested": session.exit_requested(),
        "transcript": transcript(session),
        "output": session.output(),
    })
}

/// User-facing command failures. None of these end a session; the dispatcher
/// renders the `Display` text as an error entry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ShellError {
    #[error("Command not found: {name}. Type 'help' for available commands.")]
    UnknownCommand { name: String },
    #[error("Theme '{name}' not found. Available themes: {}", .available.join(", "))]
    UnknownTheme {
        name: String,
        available: Vec<String>,
    },
    #[error("{command}: missing {what}")]
    MissingArgument { command: String, what: String },
    #[error("{command}: {target}: No such file or directory")]
    FileNotFound { command: String, target: String },
}

impl ShellError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UnknownCommand { .. } => "unknown_command",
            Self::UnknownTheme { .. } => "unknown_theme",
            Self::MissingArgument { .. } => "missing_argument",
            Self::FileNotFound { .. } => "file_not_found",
        }
    }
}

use rand::Rng;
use rand::rngs::StdRng;
use termfolio_core::{ContentStore, ProjectStatus, RichText, ShellError};
use tracing::{debug, warn};
use unicode_width::UnicodeWidthStr;

use crate::clock::{Clock, format_local_datetime};
use crate::theme::ThemeState;

/// Chooses an index in `0..len`; injected so farewell messages are testable.
pub trait Picker {
    fn pick(&mut self, len: usize) -> usize;
}

impl Picker for StdRng {
    fn pick(&mut self, len: usize) -> usize {
        if len == 0 { 0 } else { self.gen_range(0..len) }
    }
}

/// Everything a handler may read, plus the theme it may switch.
pub struct CommandContext<'a> {
    pub content: &'a ContentStore,
    pub theme: &'a mut ThemeState,
    pub clock: &'a dyn Clock,
    pub picker: &'a mut dyn Picker,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Print(RichText),
    /// Wipe the output log.
    Clear,
    /// Theme already switched on the context; the caller persists it.
    ThemeChanged { theme: String, message: RichText },
    Exit(RichText),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Portfolio,
    System,
    Customization,
    Utilities,
    /// Dispatchable but left out of help and completion.
    Hidden,
}

impl Section {
    fn heading(self) -> &'static str {
        match self {
            Self::Portfolio => "Portfolio Commands:",
            Self::System => "System Commands:",
            Self::Customization => "Customization:",
            Self::Utilities => "Utilities:",
            Self::Hidden => "",
        }
    }
}

type Handler = fn(&mut CommandContext<'_>, &[String]) -> Result<Outcome, ShellError>;

pub struct CommandSpec {
    pub name: &'static str,
    pub summary: &'static str,
    pub section: Section,
    handler: Handler,
}

pub const COMMANDS: &[CommandSpec] = &[
    CommandSpec { name: "help", summary: "Show this help message", section: Section::System, handler: help },
    CommandSpec { name: "about", summary: "Learn more about me", section: Section::Portfolio, handler: about },
    CommandSpec { name: "skills", summary: "View my technical skills", section: Section::Portfolio, handler: skills },
    CommandSpec { name: "projects", summary: "Browse my portfolio projects", section: Section::Portfolio, handler: projects },
    CommandSpec { name: "contact", summary: "Get my contact information", section: Section::Portfolio, handler: contact },
    CommandSpec { name: "clear", summary: "Clear the terminal screen", section: Section::System, handler: clear },
    CommandSpec { name: "whoami", summary: "Display current user info", section: Section::System, handler: whoami },
    CommandSpec { name: "ls", summary: "List available sections", section: Section::System, handler: ls },
    CommandSpec { name: "theme", summary: "Change color theme", section: Section::Customization, handler: theme },
    CommandSpec { name: "neofetch", summary: "Show system information with ASCII art", section: Section::System, handler: neofetch },
    CommandSpec { name: "exit", summary: "Exit the terminal", section: Section::Utilities, handler: exit },
    CommandSpec { name: "date", summary: "Show current date and time", section: Section::Utilities, handler: date },
    CommandSpec { name: "pwd", summary: "Print working directory", section: Section::Utilities, handler: pwd },
    CommandSpec { name: "cat", summary: "Display file contents", section: Section::Utilities, handler: cat },
    CommandSpec { name: "echo", summary: "Display text", section: Section::Utilities, handler: echo },
    CommandSpec { name: "sudo", summary: "", section: Section::Hidden, handler: sudo },
    CommandSpec { name: "hack", summary: "", section: Section::Hidden, handler: hack },
];

pub const FAREWELLS: &[&str] = &[
    "Thanks for visiting my portfolio! 👋",
    "Connection closed by remote host.",
    "Come back anytime! The terminal is always open.",
    "Goodbye! May your code compile on the first try. 🚀",
];

const RULE_WIDTH: usize = 50;

const NEOFETCH_ART: &[&str] = &[
    "██████╗  ██████╗ ██████╗ ████████╗███████╗ ██████╗ ██╗     ██╗ ██████╗",
    "██╔══██╗██╔═══██╗██╔══██╗╚══██╔══╝██╔════╝██╔═══██╗██║     ██║██╔═══██╗",
    "██████╔╝██║   ██║██████╔╝   ██║   █████╗  ██║   ██║██║     ██║██║   ██║",
    "██╔═══╝ ██║   ██║██╔══██╗   ██║   ██╔══╝  ██║   ██║██║     ██║██║   ██║",
    "██║     ╚██████╔╝██║  ██║   ██║   ██║     ╚██████╔╝███████╗██║╚██████╔╝",
    "╚═╝      ╚═════╝ ╚═╝  ╚═╝   ╚═╝   ╚═╝      ╚═════╝ ╚══════╝╚═╝ ╚═════╝",
];

/// Command names offered by completion and help, in declaration order.
pub fn vocabulary() -> Vec<&'static str> {
    COMMANDS
        .iter()
        .filter(|spec| spec.section != Section::Hidden)
        .map(|spec| spec.name)
        .collect()
}

pub fn lookup(name: &str) -> Option<&'static CommandSpec> {
    COMMANDS.iter().find(|spec| spec.name == name)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedLine {
    pub name: String,
    pub args: Vec<String>,
}

/// Lowercases the line and splits it on single spaces, so repeated spaces
/// produce empty arguments.
pub fn parse_line(line: &str) -> ParsedLine {
    let lowered = line.trim().to_lowercase();
    let mut parts = lowered.split(' ').map(ToString::to_string);
    let name = parts.next().unwrap_or_default();
    ParsedLine {
        name,
        args: parts.collect(),
    }
}

pub fn dispatch(ctx: &mut CommandContext<'_>, line: &str) -> Result<Outcome, ShellError> {
    let parsed = parse_line(line);
    let Some(spec) = lookup(&parsed.name) else {
        return Err(ShellError::UnknownCommand { name: parsed.name });
    };
    debug!(command = spec.name, args = parsed.args.len(), "dispatch");
    (spec.handler)(ctx, &parsed.args)
}

fn first_arg(args: &[String]) -> Option<&str> {
    args.first().map(String::as_str).filter(|arg| !arg.is_empty())
}

fn rule() -> String {
    "━".repeat(RULE_WIDTH)
}

fn pad_display(text: &str, width: usize) -> String {
    let used = text.width();
    format!("{text}{}", " ".repeat(width.saturating_sub(used)))
}

fn help(ctx: &mut CommandContext<'_>, _args: &[String]) -> Result<Outcome, ShellError> {
    let mut out = RichText::plain_text("Available commands:\n");
    for section in [
        Section::Portfolio,
        Section::System,
        Section::Customization,
        Section::Utilities,
    ] {
        out = out.newline().highlight(section.heading()).newline();
        for spec in COMMANDS.iter().filter(|spec| spec.section == section) {
            let summary = if spec.name == "theme" {
                format!("{} ({})", spec.summary, ctx.theme.available().join(", "))
            } else {
                spec.summary.to_string()
            };
            out = out.plain(format!("  {} - {summary}\n", pad_display(spec.name, 10)));
        }
    }
    out = out
        .newline()
        .highlight("Navigation Tips:")
        .newline()
        .plain("  • Use ↑↓ arrow keys for command history\n")
        .plain("  • Use Tab for command completion\n")
        .plain("  • Press Ctrl+C to discard the current line\n")
        .newline()
        .plain("Try typing any command above!");
    Ok(Outcome::Print(out))
}

fn about_text(content: &ContentStore) -> RichText {
    let profile = &content.profile;
    let mut out = RichText::new()
        .highlight(&profile.name)
        .newline()
        .highlight(&profile.title)
        .newline()
        .plain(format!("📍 {}\n\n{}\n", profile.location, profile.bio));
    if !profile.highlights.is_empty() {
        out = out.newline().highlight("Quick Stats:").newline();
        for line in &profile.highlights {
            out = out.plain(format!("• {line}\n"));
        }
    }
    out.newline()
        .plain("Type 'skills' to see my technical expertise\n")
        .plain("Type 'projects' to view my portfolio")
}

fn about(ctx: &mut CommandContext<'_>, _args: &[String]) -> Result<Outcome, ShellError> {
    Ok(Outcome::Print(about_text(ctx.content)))
}

fn skills(ctx: &mut CommandContext<'_>, _args: &[String]) -> Result<Outcome, ShellError> {
    let mut out = RichText::new()
        .highlight("Technical Skills")
        .newline()
        .plain(rule())
        .newline();
    for (category, members) in ctx.content.skill_categories() {
        out = out.newline().highlight(format!("{category}:")).newline();
        for skill in members {
            let filled = skill.filled_cells();
            let bar = format!("{}{}", "█".repeat(filled), "░".repeat(10 - filled));
            out = out.plain(format!(
                "  {} [{bar}] {}%\n",
                pad_display(&skill.name, 15),
                skill.level
            ));
        }
    }
    Ok(Outcome::Print(out))
}

fn projects(ctx: &mut CommandContext<'_>, _args: &[String]) -> Result<Outcome, ShellError> {
    let mut out = RichText::new()
        .highlight("Portfolio Projects")
        .newline()
        .plain(rule())
        .newline();
    for (index, project) in ctx.content.projects.iter().enumerate() {
        out = out
            .newline()
            .highlight(format!("{}. {}", index + 1, project.name))
            .plain(format!("\n   {}\n\n   ", project.description))
            .highlight("Tech Stack:")
            .plain(format!(" {}\n   ", project.tech.join(", ")))
            .highlight("Status:")
            .plain(" ");
        let status = project.status.to_string();
        out = match project.status {
            ProjectStatus::Complete => out.success(status),
            ProjectStatus::Beta => out.warning(status),
            _ => out.highlight(status),
        };
        out = out.newline();
        if !project.links.is_empty() {
            out = out.plain("   ").highlight("Links:").plain(" ");
            for (i, link) in project.links.iter().enumerate() {
                if i > 0 {
                    out = out.plain(" | ");
                }
                out = out.link(&link.label, &link.url);
            }
            out = out.newline();
        }
    }
    out = out
        .newline()
        .plain("Type 'contact' to get in touch about these projects!");
    Ok(Outcome::Print(out))
}

fn contact_icon(label: &str) -> &'static str {
    match label.to_ascii_lowercase().as_str() {
        "github" => "🐙",
        "linkedin" => "💼",
        "twitter" | "x" => "🐦",
        "website" => "🌐",
        _ => "🔗",
    }
}

fn contact_text(content: &ContentStore) -> RichText {
    let info = &content.contact;
    let mut out = RichText::new()
        .highlight("Get In Touch")
        .newline()
        .plain(rule())
        .plain("\n\n📧 ")
        .highlight(pad_display("Email:", 10))
        .link(&info.email, format!("mailto:{}", info.email))
        .newline();
    for link in &info.links {
        out = out
            .plain(format!("{} ", contact_icon(&link.label)))
            .highlight(pad_display(&format!("{}:", link.label), 10))
            .link(&link.display, &link.url)
            .newline();
    }
    out.plain("📍 ")
        .highlight(pad_display("Location:", 10))
        .plain(format!("{}\n\n", info.location))
        .success("Feel free to reach out for collaborations, opportunities, or just to say hello!")
}

fn contact(ctx: &mut CommandContext<'_>, _args: &[String]) -> Result<Outcome, ShellError> {
    Ok(Outcome::Print(contact_text(ctx.content)))
}

fn clear(_ctx: &mut CommandContext<'_>, _args: &[String]) -> Result<Outcome, ShellError> {
    Ok(Outcome::Clear)
}

fn whoami(ctx: &mut CommandContext<'_>, _args: &[String]) -> Result<Outcome, ShellError> {
    Ok(Outcome::Print(RichText::plain_text(ctx.content.username())))
}

fn ls(_ctx: &mut CommandContext<'_>, _args: &[String]) -> Result<Outcome, ShellError> {
    Ok(Outcome::Print(RichText::plain_text(
        "about.txt    skills.json    projects/    contact.info    themes/",
    )))
}

fn theme(ctx: &mut CommandContext<'_>, args: &[String]) -> Result<Outcome, ShellError> {
    let Some(name) = first_arg(args) else {
        return Ok(Outcome::Print(RichText::plain_text(format!(
            "Available themes: {}\nUsage: theme <name>",
            ctx.theme.available().join(", ")
        ))));
    };
    ctx.theme.set(name)?;
    Ok(Outcome::ThemeChanged {
        theme: name.to_string(),
        message: RichText::success_text(format!("Theme changed to: {name}")),
    })
}

fn neofetch(ctx: &mut CommandContext<'_>, _args: &[String]) -> Result<Outcome, ShellError> {
    let content = ctx.content;
    let skills = content.skills.len();
    let projects = content.projects.len();
    let rows = [
        ("OS:", format!("Termfolio v{}", env!("CARGO_PKG_VERSION"))),
        ("Host:", content.profile.title.clone()),
        ("Kernel:", "Rust 2024 edition".to_string()),
        ("Uptime:", "5+ years".to_string()),
        ("Packages:", format!("{skills} skills, {projects} projects")),
        ("Shell:", "/bin/portfolio".to_string()),
        ("Theme:", ctx.theme.current().to_string()),
        ("Terminal:", format!("{}-terminal", content.prompt_user())),
        ("CPU:", "Brain.rs (Multi-core)".to_string()),
        ("Memory:", "Unlimited creativity".to_string()),
        ("Disk:", format!("{projects} projects, {skills} skills")),
        ("Colors:", ctx.theme.available().join(", ")),
    ];
    let mut out = RichText::new()
        .accent(format!("{}@portfolio", content.profile.name))
        .newline()
        .plain("━".repeat(NEOFETCH_ART[0].width()))
        .newline();
    for (label, value) in rows {
        out = out
            .highlight(pad_display(label, 10))
            .plain(format!("{value}\n"));
    }
    out = out.newline().accent(NEOFETCH_ART.join("\n"));
    Ok(Outcome::Print(out))
}

fn exit(ctx: &mut CommandContext<'_>, _args: &[String]) -> Result<Outcome, ShellError> {
    let index = ctx.picker.pick(FAREWELLS.len()).min(FAREWELLS.len() - 1);
    Ok(Outcome::Exit(RichText::success_text(FAREWELLS[index])))
}

fn date(ctx: &mut CommandContext<'_>, _args: &[String]) -> Result<Outcome, ShellError> {
    Ok(Outcome::Print(RichText::plain_text(format_local_datetime(
        ctx.clock,
    ))))
}

fn pwd(ctx: &mut CommandContext<'_>, _args: &[String]) -> Result<Outcome, ShellError> {
    Ok(Outcome::Print(RichText::plain_text(format!(
        "/home/{}/portfolio",
        ctx.content.prompt_user()
    ))))
}

fn cat(ctx: &mut CommandContext<'_>, args: &[String]) -> Result<Outcome, ShellError> {
    let Some(file) = first_arg(args) else {
        return Err(ShellError::MissingArgument {
            command: "cat".to_string(),
            what: "file name".to_string(),
        });
    };
    let text = match file {
        "about.txt" => about_text(ctx.content),
        "skills.json" => match serde_json::to_string_pretty(&ctx.content.skills) {
            Ok(raw) => RichText::plain_text(raw),
            Err(err) => {
                warn!(error = %err, "failed to encode skills");
                RichText::plain_text("[]")
            }
        },
        "contact.info" => contact_text(ctx.content),
        other => {
            return Err(ShellError::FileNotFound {
                command: "cat".to_string(),
                target: other.to_string(),
            });
        }
    };
    Ok(Outcome::Print(text))
}

fn echo(_ctx: &mut CommandContext<'_>, args: &[String]) -> Result<Outcome, ShellError> {
    Ok(Outcome::Print(RichText::plain_text(args.join(" "))))
}

fn sudo(_ctx: &mut CommandContext<'_>, _args: &[String]) -> Result<Outcome, ShellError> {
    Ok(Outcome::Print(RichText::error_text(
        "Permission denied. Nice try though! 😏",
    )))
}

fn hack(_ctx: &mut CommandContext<'_>, _args: &[String]) -> Result<Outcome, ShellError> {
    Ok(Outcome::Print(RichText::success_text(
        "Access granted. Welcome to the matrix! 😎",
    )))
}

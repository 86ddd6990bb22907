//! Command registry and handlers
//!
//! Commands are literal strings, some of them several words long
//! (`ls -la`, `sudo rm -rf /`). Input is split on whitespace and matched
//! token-by-token against every literal; the longest matching literal wins,
//! so multi-word commands take precedence over first-token dispatch.
//! Matching is case-sensitive. Tokens after the literal become `args`.

use tracing::debug;

use super::eggs::EasterEgg;
use super::line::HistoryLine;
use crate::profile::Profile;

/// Side effects a handler asks the session to apply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Truncate the transcript
    Clear,
    /// Report an easter egg
    Discover(EasterEgg),
}

/// What a command produced
#[derive(Debug, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub lines: Vec<HistoryLine>,
    pub effects: Vec<Effect>,
}

impl CommandOutput {
    fn lines(lines: Vec<HistoryLine>) -> Self {
        Self {
            lines,
            effects: Vec::new(),
        }
    }

    fn line(line: HistoryLine) -> Self {
        Self::lines(vec![line])
    }

    fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }
}

/// Read-only data handed to a handler
pub struct CommandContext<'a> {
    pub args: &'a [&'a str],
    pub profile: &'a Profile,
    /// Previously submitted commands, oldest first
    pub history: &'a [String],
    pub registry: &'a CommandRegistry,
}

type Handler = fn(&CommandContext<'_>) -> CommandOutput;

/// A registered command
pub struct CommandSpec {
    pub name: &'static str,
    pub summary: &'static str,
    /// Hidden commands are not listed by `help` or offered by completion
    pub hidden: bool,
    tokens: Vec<&'static str>,
    handler: Handler,
}

impl CommandSpec {
    fn new(name: &'static str, summary: &'static str, handler: Handler) -> Self {
        Self {
            name,
            summary,
            hidden: false,
            tokens: name.split_whitespace().collect(),
            handler,
        }
    }

    fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    fn matches(&self, tokens: &[&str]) -> bool {
        tokens.len() >= self.tokens.len() && tokens[..self.tokens.len()] == self.tokens[..]
    }
}

/// Ordered mapping from command literal to handler
pub struct CommandRegistry {
    commands: Vec<CommandSpec>,
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

impl CommandRegistry {
    /// The portfolio terminal's command set
    pub fn standard() -> Self {
        Self {
            commands: vec![
                CommandSpec::new("help", "Show available commands", cmd_help),
                CommandSpec::new("clear", "Clear the terminal", cmd_clear),
                CommandSpec::new("about", "Who am I?", cmd_about),
                CommandSpec::new("projects", "List projects ('projects <n>' for details)", cmd_projects),
                CommandSpec::new("skills", "Technologies I work with", cmd_skills),
                CommandSpec::new("resume", "Get my resume", cmd_resume),
                CommandSpec::new("contact", "How to reach me", cmd_contact),
                CommandSpec::new("ls -la", "List files", cmd_ls),
                CommandSpec::new("pwd", "Print working directory", cmd_pwd),
                CommandSpec::new("whoami", "Print current user", cmd_whoami),
                CommandSpec::new("echo", "Print the arguments", cmd_echo),
                CommandSpec::new("history", "Show command history", cmd_history),
                CommandSpec::new("sudo rm -rf /", "", cmd_sudo_rm).hidden(),
                CommandSpec::new("secret", "", cmd_secret).hidden(),
                CommandSpec::new("vim", "", cmd_vim).hidden(),
                CommandSpec::new("matrix", "", cmd_matrix).hidden(),
                CommandSpec::new("coffee", "", cmd_coffee).hidden(),
                CommandSpec::new("rickroll", "", cmd_rickroll).hidden(),
            ],
        }
    }

    /// Find the longest literal matching the start of `input`, plus its args
    pub fn resolve<'i>(&self, input: &'i str) -> Option<(&CommandSpec, Vec<&'i str>)> {
        let tokens: Vec<&str> = input.split_whitespace().collect();
        let spec = self
            .commands
            .iter()
            .filter(|spec| spec.matches(&tokens))
            .max_by_key(|spec| spec.tokens.len())?;
        let args = tokens[spec.tokens.len()..].to_vec();
        Some((spec, args))
    }

    /// Run one trimmed, non-empty input line
    pub fn run(&self, input: &str, profile: &Profile, history: &[String]) -> CommandOutput {
        match self.resolve(input) {
            Some((spec, args)) => {
                debug!("Dispatching '{}' with {} args", spec.name, args.len());
                let ctx = CommandContext {
                    args: &args,
                    profile,
                    history,
                    registry: self,
                };
                (spec.handler)(&ctx)
            }
            None => {
                let name = input.split_whitespace().next().unwrap_or(input);
                debug!("Unknown command '{}'", name);
                CommandOutput::line(HistoryLine::error(format!(
                    "Command not found: {}. Type 'help' for available commands.",
                    name
                )))
            }
        }
    }

    /// Visible command names starting with `prefix`, in registry order
    pub fn complete(&self, prefix: &str) -> Vec<&'static str> {
        self.visible()
            .filter(|spec| spec.name.starts_with(prefix))
            .map(|spec| spec.name)
            .collect()
    }

    /// Commands listed by `help`
    pub fn visible(&self) -> impl Iterator<Item = &CommandSpec> {
        self.commands.iter().filter(|spec| !spec.hidden)
    }
}

fn cmd_help(ctx: &CommandContext<'_>) -> CommandOutput {
    let width = ctx.registry.visible().map(|s| s.name.len()).max().unwrap_or(0);
    let mut text = String::from("Available commands:");
    for spec in ctx.registry.visible() {
        text.push_str(&format!("\n  {:<width$}  {}", spec.name, spec.summary, width = width));
    }
    CommandOutput::line(HistoryLine::output(text))
}

fn cmd_clear(_ctx: &CommandContext<'_>) -> CommandOutput {
    CommandOutput::default().with_effect(Effect::Clear)
}

fn cmd_about(ctx: &CommandContext<'_>) -> CommandOutput {
    let p = ctx.profile;
    let headline = [p.title.as_str(), p.location.as_str()]
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" | ");
    let text = [p.name.as_str(), headline.as_str()]
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("\n");
    let text = match (text.is_empty(), p.bio.is_empty()) {
        (true, true) => return CommandOutput::line(HistoryLine::output("Nothing here yet.")),
        (true, false) => p.bio.clone(),
        (false, true) => text,
        (false, false) => format!("{}\n\n{}", text, p.bio),
    };
    CommandOutput::line(HistoryLine::output(text))
}

fn cmd_projects(ctx: &CommandContext<'_>) -> CommandOutput {
    let projects = &ctx.profile.projects;
    if projects.is_empty() {
        return CommandOutput::line(HistoryLine::output("No projects yet."));
    }

    if let Some(arg) = ctx.args.first() {
        let project = arg
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|idx| projects.get(idx));
        return match project {
            Some(project) => {
                let mut text = format!("{}\n  {}", project.name, project.description);
                if !project.tech.is_empty() {
                    text.push_str(&format!("\n  Tech: {}", project.tech.join(", ")));
                }
                if let Some(url) = &project.url {
                    text.push_str(&format!("\n  URL:  {}", url));
                }
                CommandOutput::line(HistoryLine::output(text))
            }
            None => CommandOutput::line(HistoryLine::error(format!(
                "projects: no project numbered '{}' (1-{})",
                arg,
                projects.len()
            ))),
        };
    }

    let mut text = String::from("Projects:");
    for (i, project) in projects.iter().enumerate() {
        text.push_str(&format!("\n  {}. {} - {}", i + 1, project.name, project.description));
        if !project.tech.is_empty() {
            text.push_str(&format!(" [{}]", project.tech.join(", ")));
        }
    }
    CommandOutput::lines(vec![
        HistoryLine::output(text),
        HistoryLine::system("Run 'projects <n>' for details."),
    ])
}

fn cmd_skills(ctx: &CommandContext<'_>) -> CommandOutput {
    let groups = &ctx.profile.skills;
    if groups.is_empty() {
        return CommandOutput::line(HistoryLine::output("No skills listed."));
    }
    let width = groups.iter().map(|g| g.category.len()).max().unwrap_or(0);
    let text = groups
        .iter()
        .map(|g| format!("{:<width$}  {}", g.category, g.items.join(", "), width = width))
        .collect::<Vec<_>>()
        .join("\n");
    CommandOutput::line(HistoryLine::output(text))
}

fn cmd_resume(ctx: &CommandContext<'_>) -> CommandOutput {
    if ctx.profile.resume_url.is_empty() {
        return CommandOutput::line(HistoryLine::output("No resume available."));
    }
    CommandOutput::line(HistoryLine::output(format!(
        "Download my resume: {}",
        ctx.profile.resume_url
    )))
}

fn cmd_contact(ctx: &CommandContext<'_>) -> CommandOutput {
    let entries = ctx.profile.contact_entries();
    if entries.is_empty() {
        return CommandOutput::line(HistoryLine::output("No contact channels configured."));
    }
    let text = entries
        .iter()
        .map(|(label, value)| format!("{:<9} {}", format!("{}:", label), value))
        .collect::<Vec<_>>()
        .join("\n");
    CommandOutput::line(HistoryLine::output(text))
}

fn cmd_ls(ctx: &CommandContext<'_>) -> CommandOutput {
    let user = &ctx.profile.username;
    let entries = [
        ("drwxr-xr-x", user.as_str(), 4096, "."),
        ("drwxr-xr-x", "root", 4096, ".."),
        ("-rw-------", user.as_str(), 42, ".secret"),
        ("-rw-r--r--", user.as_str(), 1337, "about.txt"),
        ("-rw-r--r--", user.as_str(), 512, "contact.md"),
        ("drwxr-xr-x", user.as_str(), 4096, "projects/"),
        ("-rw-r--r--", user.as_str(), 90210, "resume.pdf"),
        ("-rw-r--r--", user.as_str(), 2048, "skills.json"),
    ];
    let owner_width = entries.iter().map(|e| e.1.len()).max().unwrap_or(0);
    let mut text = format!("total {}", entries.len());
    for (mode, owner, size, name) in entries {
        text.push_str(&format!(
            "\n{} {:<ow$} {:<ow$} {:>6} {}",
            mode,
            owner,
            owner,
            size,
            name,
            ow = owner_width
        ));
    }
    CommandOutput::line(HistoryLine::output(text))
}

fn cmd_pwd(ctx: &CommandContext<'_>) -> CommandOutput {
    CommandOutput::line(HistoryLine::output(ctx.profile.home.clone()))
}

fn cmd_whoami(ctx: &CommandContext<'_>) -> CommandOutput {
    CommandOutput::line(HistoryLine::output(ctx.profile.username.clone()))
}

fn cmd_echo(ctx: &CommandContext<'_>) -> CommandOutput {
    CommandOutput::line(HistoryLine::output(ctx.args.join(" ")))
}

fn cmd_history(ctx: &CommandContext<'_>) -> CommandOutput {
    if ctx.history.is_empty() {
        return CommandOutput::default();
    }
    let text = ctx
        .history
        .iter()
        .enumerate()
        .map(|(i, cmd)| format!("{:>4}  {}", i + 1, cmd))
        .collect::<Vec<_>>()
        .join("\n");
    CommandOutput::line(HistoryLine::output(text))
}

fn cmd_sudo_rm(_ctx: &CommandContext<'_>) -> CommandOutput {
    CommandOutput::lines(vec![
        HistoryLine::error("rm: cannot remove '/': Permission denied"),
        HistoryLine::output("Nice try. This portfolio is protected by good vibes."),
    ])
}

fn cmd_secret(_ctx: &CommandContext<'_>) -> CommandOutput {
    CommandOutput::line(HistoryLine::output(
        "You found the secret command!\nThere are more hidden things around here. Keep looking.",
    ))
    .with_effect(Effect::Discover(EasterEgg::Secret))
}

fn cmd_vim(_ctx: &CommandContext<'_>) -> CommandOutput {
    CommandOutput::line(HistoryLine::output(
        "Opening vim...\nJust kidding. You would never find your way out.\nHint: ':q!'",
    ))
}

fn cmd_matrix(_ctx: &CommandContext<'_>) -> CommandOutput {
    CommandOutput::line(HistoryLine::output(
        "Wake up, Neo...\nThe Matrix has you...\nFollow the white rabbit.",
    ))
    .with_effect(Effect::Discover(EasterEgg::Matrix))
}

fn cmd_coffee(_ctx: &CommandContext<'_>) -> CommandOutput {
    CommandOutput::line(HistoryLine::error(
        "Error 418: I'm a teapot. Refusing to brew coffee.",
    ))
    .with_effect(Effect::Discover(EasterEgg::Coffee))
}

fn cmd_rickroll(_ctx: &CommandContext<'_>) -> CommandOutput {
    CommandOutput::line(HistoryLine::output(
        "Never gonna give you up\nNever gonna let you down\nNever gonna run around and desert you",
    ))
    .with_effect(Effect::Discover(EasterEgg::Rickroll))
}

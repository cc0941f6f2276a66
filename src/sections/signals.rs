//! Heuristic boundary signals.
//!
//! Each signal looks at the clean document on its own and proposes lines
//! where a new section could start. The detector combines proposals by
//! rank; signals never see each other's output.

use crate::config::SectionConfig;
use crate::terminal::Line;

/// Names accepted in `sections.signals`.
pub const SIGNAL_NAMES: &[&str] = &["prompt", "command", "blank_run"];

/// A proposed section start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Proposal {
    /// Index into the lines passed to [`BoundarySignal::propose`]
    pub line: usize,
    /// Label suggested by the signal, if it knows a better one than the line itself
    pub label: Option<String>,
}

/// A boundary-proposing predicate.
pub trait BoundarySignal: Send + Sync {
    /// Name used in configuration
    fn name(&self) -> &'static str;

    /// Precedence when proposals collide; lower wins.
    fn rank(&self) -> u8;

    fn propose(&self, lines: &[Line]) -> Vec<Proposal>;
}

/// Shell prompts followed by a command.
///
/// Recognises `$ `, `% `, `# `, `❯ `, `➜ ` prefixes as well as
/// `user@host:dir$ ` and `[user@host dir]$ ` prompts.
#[derive(Debug, Clone, Copy, Default)]
pub struct PromptSignal;

const PROMPT_PREFIXES: &[&str] = &["$ ", "% ", "# ", "❯ ", "➜ "];

impl PromptSignal {
    /// The command typed after the prompt, if `text` starts with one.
    pub fn command(text: &str) -> Option<&str> {
        let command = PROMPT_PREFIXES
            .iter()
            .find_map(|p| text.strip_prefix(p))
            .or_else(|| bracketed_prompt(text))
            .or_else(|| user_host_prompt(text))?
            .trim();
        (!command.is_empty()).then_some(command)
    }
}

fn bracketed_prompt(text: &str) -> Option<&str> {
    if !text.starts_with('[') {
        return None;
    }
    let end = text.find("]$ ").or_else(|| text.find("]# "))?;
    text[..end].contains('@').then(|| &text[end + 3..])
}

fn user_host_prompt(text: &str) -> Option<&str> {
    let colon = text.find(':')?;
    let (who, after) = text.split_at(colon);
    if !who.contains('@') || who.contains(char::is_whitespace) {
        return None;
    }
    let end = after.find("$ ").or_else(|| after.find("# "))?;
    Some(&after[end + 2..])
}

impl BoundarySignal for PromptSignal {
    fn name(&self) -> &'static str {
        "prompt"
    }

    fn rank(&self) -> u8 {
        1
    }

    fn propose(&self, lines: &[Line]) -> Vec<Proposal> {
        lines
            .iter()
            .enumerate()
            .filter_map(|(line, l)| {
                let text = l.text();
                Self::command(&text).map(|cmd| Proposal {
                    line,
                    label: Some(cmd.to_string()),
                })
            })
            .collect()
    }
}

/// Input lines of interactive agents (`> prompt`, `⏺ action`).
#[derive(Debug, Clone, Copy, Default)]
pub struct CommandStartSignal;

impl BoundarySignal for CommandStartSignal {
    fn name(&self) -> &'static str {
        "command"
    }

    fn rank(&self) -> u8 {
        2
    }

    fn propose(&self, lines: &[Line]) -> Vec<Proposal> {
        let mut proposals = Vec::new();
        for (line, l) in lines.iter().enumerate() {
            let text = l.text();
            let rest = text
                .trim_start()
                .strip_prefix("> ")
                .or_else(|| text.trim_start().strip_prefix("⏺ "))
                .map(str::trim);
            if let Some(rest) = rest.filter(|r| !r.is_empty()) {
                proposals.push(Proposal {
                    line,
                    label: Some(rest.to_string()),
                });
            }
        }
        proposals
    }
}

/// A run of blank lines; the boundary is the first line after it.
#[derive(Debug, Clone, Copy)]
pub struct BlankRunSignal {
    pub min_run: usize,
}

impl Default for BlankRunSignal {
    fn default() -> Self {
        Self { min_run: 3 }
    }
}

impl BoundarySignal for BlankRunSignal {
    fn name(&self) -> &'static str {
        "blank_run"
    }

    fn rank(&self) -> u8 {
        3
    }

    fn propose(&self, lines: &[Line]) -> Vec<Proposal> {
        let min_run = self.min_run.max(1);
        let mut proposals = Vec::new();
        let mut run = 0;
        for (line, l) in lines.iter().enumerate() {
            if l.is_blank() {
                run += 1;
                continue;
            }
            if run >= min_run {
                proposals.push(Proposal { line, label: None });
            }
            run = 0;
        }
        proposals
    }
}

/// Build a signal by its configuration name.
pub fn signal_by_name(name: &str, config: &SectionConfig) -> Option<Box<dyn BoundarySignal>> {
    match name {
        "prompt" => Some(Box::new(PromptSignal)),
        "command" => Some(Box::new(CommandStartSignal)),
        "blank_run" => Some(Box::new(BlankRunSignal {
            min_run: config.blank_run_length,
        })),
        _ => None,
    }
}

/// The signals enabled in `config`, best rank first. Unknown names are skipped.
pub fn configured_signals(config: &SectionConfig) -> Vec<Box<dyn BoundarySignal>> {
    let mut signals: Vec<Box<dyn BoundarySignal>> = Vec::new();
    for name in &config.signals {
        match signal_by_name(name, config) {
            Some(signal) => signals.push(signal),
            None => tracing::warn!(signal = %name, "unknown section signal, ignoring"),
        }
    }
    signals.sort_by_key(|s| s.rank());
    signals
}

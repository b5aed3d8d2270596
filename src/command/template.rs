use std::path::Path;

use anyhow::{bail, Result};

/// How a template delivers the system prompt, decided once at parse time.
/// `{system}` beats `{system_file}` beats neither.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateKind {
    /// `{system}` appears; the system prompt rides inline as an argument.
    SystemInline,
    /// `{system_file}` appears; the system prompt is delivered by file path.
    SystemFile,
    /// No system placeholder; a present system prompt folds into the
    /// prompt argument itself.
    PromptOnly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Placeholder {
    Prompt,
    System,
    SystemFile,
}

#[derive(Debug, Clone, PartialEq)]
enum Segment {
    Literal(String),
    Placeholder(Placeholder),
}

/// An operator-supplied command line with `{prompt}`, `{system}` and
/// `{system_file}` slots. The template itself is trusted configuration and
/// may use arbitrary shell syntax; only the substituted values are escaped.
///
/// Parsed and validated at startup; rendering a request against a parsed
/// template cannot fail.
#[derive(Debug, Clone)]
pub struct CommandTemplate {
    raw: String,
    segments: Vec<Segment>,
    kind: TemplateKind,
}

impl CommandTemplate {
    pub fn parse(raw: &str) -> Result<Self> {
        let mut segments = Vec::new();
        let mut rest = raw;

        while let Some(open) = rest.find('{') {
            let (literal, tail) = rest.split_at(open);
            if !literal.is_empty() {
                segments.push(Segment::Literal(literal.to_string()));
            }
            let Some(close) = tail.find('}') else {
                bail!("unclosed '{{' in command template");
            };
            let placeholder = match &tail[1..close] {
                "prompt" => Placeholder::Prompt,
                "system" => Placeholder::System,
                "system_file" => Placeholder::SystemFile,
                other => bail!("unknown placeholder {{{other}}} in command template"),
            };
            segments.push(Segment::Placeholder(placeholder));
            rest = &tail[close + 1..];
        }
        if !rest.is_empty() {
            segments.push(Segment::Literal(rest.to_string()));
        }

        let has = |wanted: Placeholder| {
            segments
                .iter()
                .any(|s| matches!(s, Segment::Placeholder(p) if *p == wanted))
        };
        let kind = if has(Placeholder::System) {
            TemplateKind::SystemInline
        } else if has(Placeholder::SystemFile) {
            TemplateKind::SystemFile
        } else {
            TemplateKind::PromptOnly
        };

        Ok(Self {
            raw: raw.to_string(),
            segments,
            kind,
        })
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn kind(&self) -> TemplateKind {
        self.kind
    }

    /// Whether a system prompt should be staged into a temporary file
    /// before rendering. True whenever the template mentions
    /// `{system_file}`, even if `{system}` takes precedence for the kind.
    pub fn wants_system_file(&self) -> bool {
        self.segments
            .iter()
            .any(|s| matches!(s, Segment::Placeholder(Placeholder::SystemFile)))
    }

    /// Substitute the request's values into the template, quoting each one
    /// so the shell sees a single literal token. Substitution is one pass
    /// over the parsed segments, so placeholder-shaped text inside a value
    /// is never re-interpreted.
    pub fn render(
        &self,
        user_prompt: &str,
        system_prompt: Option<&str>,
        system_file: Option<&Path>,
    ) -> String {
        let prompt_value = match self.kind {
            TemplateKind::SystemInline | TemplateKind::SystemFile => sh_quote(user_prompt),
            // No explicit system slot: fold the system prompt into the
            // prompt argument itself.
            TemplateKind::PromptOnly => match system_prompt {
                Some(system) => sh_quote(&format!("System: {system}\nUser: {user_prompt}")),
                None => sh_quote(user_prompt),
            },
        };
        let system_value = sh_quote(system_prompt.unwrap_or(""));
        let file_value = sh_quote(
            &system_file
                .map(|p| p.display().to_string())
                .unwrap_or_default(),
        );

        let mut command = String::with_capacity(self.raw.len() + prompt_value.len());
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => command.push_str(text),
                Segment::Placeholder(Placeholder::Prompt) => command.push_str(&prompt_value),
                Segment::Placeholder(Placeholder::System) => command.push_str(&system_value),
                Segment::Placeholder(Placeholder::SystemFile) => command.push_str(&file_value),
            }
        }
        command
    }
}

/// POSIX single-quote escaping of an arbitrary value, so the shell treats
/// it as exactly one literal word. Plain-safe strings pass through bare.
pub fn sh_quote(value: &str) -> String {
    if value.is_empty() {
        return "''".to_string();
    }

    let safe = value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || "@%+=:,./-_".contains(c));
    if safe {
        return value.to_string();
    }

    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('\'');
    for ch in value.chars() {
        if ch == '\'' {
            // Close the quote, emit an escaped quote, reopen.
            quoted.push_str("'\\''");
        } else {
            quoted.push(ch);
        }
    }
    quoted.push('\'');
    quoted
}

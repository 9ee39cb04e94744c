use std::time::Duration;

use thiserror::Error;
use tracing::info;

use super::themes::Theme;
use crate::speech::synthesis::Sentence;

/// Fixed simulated backend latency. Generation is single-flight: the
/// session's loading flag blocks re-entry while this runs.
pub const GENERATION_DELAY: Duration = Duration::from_millis(2500);

#[derive(Debug, Clone, Error)]
pub enum ScriptError {
    #[error("script template for {0:?} is empty")]
    EmptyTemplate(Theme),
}

/// A labelled run of the script, e.g. `[Intro]` followed by its sentences.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub label: Option<String>,
    pub sentences: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Script {
    pub theme: Theme,
    pub sections: Vec<Section>,
}

impl Script {
    /// Flatten to the synthesis order: each section label is spoken first,
    /// then its sentences, with queue-wide sequential ids.
    pub fn sentences(&self) -> Vec<Sentence> {
        let mut out = Vec::new();
        let mut id = 0;
        for section in &self.sections {
            if let Some(label) = &section.label {
                out.push(Sentence {
                    id,
                    text: label.clone(),
                });
                id += 1;
            }
            for s in &section.sentences {
                out.push(Sentence {
                    id,
                    text: s.clone(),
                });
                id += 1;
            }
        }
        out
    }
}

/// Split body text into sentences on terminal punctuation runs. A trailing
/// fragment without punctuation still counts as a sentence.
pub fn split_sentences(text: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut current = String::new();
    let mut in_terminator = false;
    for ch in text.chars() {
        let is_term = matches!(ch, '.' | '!' | '?');
        if in_terminator && !is_term {
            let s = current.trim();
            if !s.is_empty() {
                out.push(s.to_string());
            }
            current.clear();
        }
        current.push(ch);
        in_terminator = is_term;
    }
    let s = current.trim();
    if !s.is_empty() {
        out.push(s.to_string());
    }
    out
}

/// Parse a template into labelled sections. A line of the form `[Header]`
/// opens a section; anything after the closing bracket on the same line
/// belongs to its body.
pub fn parse_script(theme: Theme, text: &str) -> Script {
    let mut sections = Vec::new();
    let mut label: Option<String> = None;
    let mut buffer = String::new();

    let mut flush = |label: &mut Option<String>, buffer: &mut String, sections: &mut Vec<Section>| {
        if buffer.trim().is_empty() {
            return;
        }
        sections.push(Section {
            label: label.take(),
            sentences: split_sentences(buffer),
        });
        buffer.clear();
    };

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if let Some(rest) = line.strip_prefix('[') {
            if let Some(close) = rest.find(']') {
                flush(&mut label, &mut buffer, &mut sections);
                label = Some(rest[..close].to_string());
                let remainder = rest[close + 1..].trim();
                if !remainder.is_empty() {
                    buffer.push_str(remainder);
                    buffer.push(' ');
                }
                continue;
            }
        }
        buffer.push_str(line);
        buffer.push(' ');
    }
    flush(&mut label, &mut buffer, &mut sections);

    Script { theme, sections }
}

/// Simulated generation call: fixed delay, then the canned template for the
/// theme. Failure leaves recording and transcript state untouched; the
/// caller surfaces an inline message and nothing else.
pub async fn generate(theme: Theme) -> Result<Script, ScriptError> {
    info!("generating script for theme {:?}", theme);
    tokio::time::sleep(GENERATION_DELAY).await;

    let template = theme.template();
    if template.trim().is_empty() {
        return Err(ScriptError::EmptyTemplate(theme));
    }
    Ok(parse_script(theme, template))
}

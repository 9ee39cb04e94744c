/// Static keyword-list matching over the transcript. No real extraction or
/// AI; these lists are the whole model.
pub const DATE_KEYWORDS: &[&str] = &[
    "today",
    "tomorrow",
    "yesterday",
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
    "sunday",
    "weekend",
];

pub const EVENT_KEYWORDS: &[&str] = &[
    "meeting",
    "call",
    "seminar",
    "workshop",
    "conference",
    "interview",
    "sync",
    "standup",
    "brainstorm",
];

pub const WORK_KEYWORDS: &[&str] = &[
    "project",
    "deadline",
    "client",
    "budget",
    "report",
    "presentation",
    "proposal",
    "contract",
    "thesis",
    "design",
    "code",
    "bug",
    "feature",
];

pub const MAX_KEYWORDS: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordSummary {
    pub title: String,
    /// Title-cased, at most `MAX_KEYWORDS`, with a generic fallback when
    /// nothing matched.
    pub keywords: Vec<String>,
    /// `#`-prefixed first keyword.
    pub tag: String,
}

fn matches_in<'a>(text: &str, list: &[&'a str]) -> Vec<&'a str> {
    list.iter().copied().filter(|w| text.contains(w)).collect()
}

fn title_case(word: &str) -> String {
    let mut out = String::with_capacity(word.len());
    for part in word.split_whitespace() {
        if !out.is_empty() {
            out.push(' ');
        }
        let mut chars = part.chars();
        if let Some(first) = chars.next() {
            out.extend(first.to_uppercase());
            out.push_str(&chars.as_str().to_lowercase());
        }
    }
    out
}

/// Build the info-card summary for a transcript: derived title, up to three
/// keyword chips, and a tag.
pub fn extract(full_text: &str) -> KeywordSummary {
    let lower = full_text.to_lowercase();

    let date_matches = matches_in(&lower, DATE_KEYWORDS);
    let event_matches = matches_in(&lower, EVENT_KEYWORDS);
    let work_matches = matches_in(&lower, WORK_KEYWORDS);

    let mut unique: Vec<&str> = Vec::new();
    for w in event_matches
        .iter()
        .chain(work_matches.iter())
        .chain(date_matches.iter())
    {
        if !unique.contains(w) {
            unique.push(w);
        }
    }

    let title = if let Some(event) = event_matches.first() {
        let main = title_case(event);
        if let Some(work) = work_matches.first() {
            format!("{} {}", title_case(work), main)
        } else {
            format!("{} Focus", main)
        }
    } else if let Some(work) = work_matches.first() {
        format!("{} Update", title_case(work))
    } else if let Some(date) = date_matches.first() {
        format!("{}'s Journal", title_case(date))
    } else {
        "Daily Insight".to_string()
    };

    let mut keywords: Vec<String> = unique
        .iter()
        .take(MAX_KEYWORDS)
        .map(|w| title_case(w))
        .collect();
    if keywords.is_empty() {
        keywords = vec!["General".to_string(), "Memo".to_string()];
    }

    let tag = format!("#{}", keywords[0]);

    KeywordSummary {
        title,
        keywords,
        tag,
    }
}

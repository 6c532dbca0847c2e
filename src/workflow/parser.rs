//! Line-oriented parser turning provider free text into a [`TicketRecord`].
//!
//! The walk is a small state machine: every line is first classified (single-line
//! field, section header, or body text), the classification drives the section
//! transition, and body text is captured according to the section it lands in.
//! Parsing never fails; missing Story content is replaced with defaults.

use tracing::debug;

use crate::domain::ticket::{TicketBody, TicketKind, TicketRecord};
use crate::workflow::fallback::{default_bullets, default_gherkin, default_story_description};

const MIN_STORY_CRITERIA: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    None,
    Steps,
    Expected,
    Actual,
    Bullets,
    Gherkin,
}

const BUG_HEADERS: &[(&str, Section)] = &[
    ("steps to reproduce", Section::Steps),
    ("expected result", Section::Expected),
    ("actual result", Section::Actual),
];

const STORY_HEADERS: &[(&str, Section)] = &[
    ("acceptance criteria (bullets)", Section::Bullets),
    ("acceptance criteria (gherkin)", Section::Gherkin),
];

const GHERKIN_KEYWORDS: [&str; 3] = ["given", "when", "then"];

#[derive(Debug, PartialEq, Eq)]
enum Line<'a> {
    Title(&'a str),
    Description(&'a str),
    Header(Section),
    Body(&'a str),
}

fn headers(kind: TicketKind) -> &'static [(&'static str, Section)] {
    match kind {
        TicketKind::Bug => BUG_HEADERS,
        TicketKind::Story => STORY_HEADERS,
    }
}

/// First match wins: single-line fields, then headers, then body.
fn classify(line: &str, kind: TicketKind) -> Line<'_> {
    if let Some(value) = labelled_value(line, "title:") {
        return Line::Title(value);
    }
    if let Some(value) = labelled_value(line, "description:") {
        return Line::Description(value);
    }
    let lowered = line.to_lowercase();
    headers(kind)
        .iter()
        .find(|(label, _)| lowered.contains(label))
        .map(|(_, section)| Line::Header(*section))
        .unwrap_or(Line::Body(line))
}

fn transition(current: Section, line: &Line<'_>) -> Section {
    match line {
        Line::Title(_) | Line::Description(_) => Section::None,
        Line::Header(section) => *section,
        Line::Body(_) => current,
    }
}

/// Case-insensitive `label` prefix (leading whitespace ignored); returns the trimmed remainder.
fn labelled_value<'a>(line: &'a str, label: &str) -> Option<&'a str> {
    let line = line.trim_start();
    let head = line.get(..label.len())?;
    if head.eq_ignore_ascii_case(label) {
        Some(line[label.len()..].trim())
    } else {
        None
    }
}

fn numbered_item(text: &str) -> Option<&str> {
    let text = text.trim();
    let rest = text.trim_start_matches(|c: char| c.is_ascii_digit());
    if rest.len() == text.len() {
        return None;
    }
    rest.strip_prefix('.').map(str::trim)
}

fn bullet_item(text: &str) -> Option<&str> {
    text.trim().strip_prefix("- ").map(str::trim)
}

fn gherkin_item(text: &str) -> Option<&str> {
    let text = text.trim();
    let lowered = text.to_lowercase();
    GHERKIN_KEYWORDS
        .iter()
        .any(|keyword| lowered.starts_with(keyword))
        .then_some(text)
}

#[derive(Default)]
struct Captured {
    title: String,
    description: String,
    steps: Vec<String>,
    expected: Vec<String>,
    actual: Vec<String>,
    bullets: Vec<String>,
    gherkin: Vec<String>,
}

impl Captured {
    fn absorb(&mut self, section: Section, line: Line<'_>) {
        match line {
            Line::Title(value) => self.title = value.to_string(),
            Line::Description(value) => self.description = value.to_string(),
            Line::Header(_) => {}
            Line::Body(text) => self.capture_body(section, text),
        }
    }

    fn capture_body(&mut self, section: Section, text: &str) {
        let (target, item) = match section {
            Section::None => return,
            Section::Steps => (&mut self.steps, numbered_item(text)),
            Section::Expected => (&mut self.expected, Some(text.trim())),
            Section::Actual => (&mut self.actual, Some(text.trim())),
            Section::Bullets => (&mut self.bullets, bullet_item(text)),
            Section::Gherkin => (&mut self.gherkin, gherkin_item(text)),
        };
        if let Some(item) = item.filter(|item| !item.is_empty() || section == Section::Steps) {
            target.push(item.to_string());
        }
    }

    fn into_record(self, kind: TicketKind, task: &str) -> TicketRecord {
        match kind {
            TicketKind::Bug => TicketRecord {
                title: self.title,
                description: self.description,
                body: TicketBody::Bug {
                    steps: self.steps,
                    expected_result: self.expected.join(" "),
                    actual_result: self.actual.join(" "),
                },
            },
            TicketKind::Story => {
                let description = if self.description.is_empty() {
                    default_story_description(task)
                } else {
                    self.description
                };
                let acceptance_bullets = if self.bullets.len() < MIN_STORY_CRITERIA {
                    default_bullets(task)
                } else {
                    self.bullets
                };
                let acceptance_gherkin = if self.gherkin.len() < MIN_STORY_CRITERIA {
                    default_gherkin(task)
                } else {
                    self.gherkin
                };
                TicketRecord {
                    title: self.title,
                    description,
                    body: TicketBody::Story {
                        acceptance_bullets,
                        acceptance_gherkin,
                    },
                }
            }
        }
    }
}

/// Parses raw provider text for a ticket of `kind`. `task` feeds the Story defaults.
pub fn parse_response(raw: &str, kind: TicketKind, task: &str) -> TicketRecord {
    let mut section = Section::None;
    let mut captured = Captured::default();

    for line in raw.lines() {
        let line = classify(line, kind);
        section = transition(section, &line);
        captured.absorb(section, line);
    }

    debug!(
        kind = kind.as_str(),
        steps = captured.steps.len(),
        bullets = captured.bullets.len(),
        gherkin = captured.gherkin.len(),
        "parsed provider response"
    );

    captured.into_record(kind, task)
}

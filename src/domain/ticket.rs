use clap::ValueEnum;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TicketKind {
    Story,
    Bug,
}

impl TicketKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TicketKind::Story => "Story",
            TicketKind::Bug => "Bug",
        }
    }
}

/// A generated ticket. Title and description are shared; the rest depends on the kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TicketRecord {
    pub title: String,
    pub description: String,
    #[serde(flatten)]
    pub body: TicketBody,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind")]
pub enum TicketBody {
    #[serde(rename_all = "camelCase")]
    Story {
        acceptance_bullets: Vec<String>,
        acceptance_gherkin: Vec<String>,
    },
    #[serde(rename_all = "camelCase")]
    Bug {
        steps: Vec<String>,
        expected_result: String,
        actual_result: String,
    },
}

impl TicketRecord {
    pub fn kind(&self) -> TicketKind {
        match self.body {
            TicketBody::Story { .. } => TicketKind::Story,
            TicketBody::Bug { .. } => TicketKind::Bug,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_follows_body_variant() {
        let record = TicketRecord {
            title: "Bug: crash".to_string(),
            description: "crash".to_string(),
            body: TicketBody::Bug {
                steps: Vec::new(),
                expected_result: String::new(),
                actual_result: String::new(),
            },
        };
        assert_eq!(record.kind(), TicketKind::Bug);
        assert_eq!(record.kind().as_str(), "Bug");
    }

    #[test]
    fn serializes_with_kind_tag() {
        let record = TicketRecord {
            title: "Implement: search".to_string(),
            description: "As a user".to_string(),
            body: TicketBody::Story {
                acceptance_bullets: vec!["a".to_string()],
                acceptance_gherkin: vec!["Given a".to_string()],
            },
        };
        let value = serde_json::to_value(&record).expect("serializes");
        assert_eq!(value["kind"], "Story");
        assert_eq!(value["title"], "Implement: search");
        assert_eq!(value["acceptanceBullets"][0], "a");
        assert_eq!(value["acceptanceGherkin"][0], "Given a");
    }
}

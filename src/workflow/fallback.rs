use crate::domain::ticket::{TicketBody, TicketKind, TicketRecord};

const BUG_STEPS: [&str; 2] = ["Step 1 to reproduce the bug.", "Step 2 to reproduce the bug."];
const BUG_EXPECTED: &str = "The feature works as intended.";
const BUG_ACTUAL: &str = "The bug occurs as described.";

/// Synthesizes a complete ticket from the task text alone. Used when no provider is
/// configured or the provider call fails.
pub fn fallback_ticket(task: &str, kind: TicketKind) -> TicketRecord {
    match kind {
        TicketKind::Bug => TicketRecord {
            title: format!("Bug: {task}"),
            description: format!("There is a bug related to: {task}"),
            body: TicketBody::Bug {
                steps: BUG_STEPS.iter().map(|s| s.to_string()).collect(),
                expected_result: BUG_EXPECTED.to_string(),
                actual_result: BUG_ACTUAL.to_string(),
            },
        },
        TicketKind::Story => {
            let mut bullets = default_bullets(task);
            bullets.push("The feature is tested and documented.".to_string());
            TicketRecord {
                title: format!("Implement: {task}"),
                description: default_story_description(task),
                body: TicketBody::Story {
                    acceptance_bullets: bullets,
                    acceptance_gherkin: default_gherkin(task),
                },
            }
        }
    }
}

pub(crate) fn default_story_description(task: &str) -> String {
    format!("As a user, I want to {task}, so that I can achieve my goal.")
}

pub(crate) fn default_bullets(task: &str) -> Vec<String> {
    vec![
        format!("The feature allows the user to {}.", task.to_lowercase()),
        "The implementation meets the described requirements.".to_string(),
        "All edge cases are handled.".to_string(),
    ]
}

pub(crate) fn default_gherkin(task: &str) -> Vec<String> {
    let feature = task.to_lowercase();
    vec![
        format!("Given the user wants to {feature},"),
        "When the user performs the necessary actions,".to_string(),
        format!("Then the system should allow the user to {feature} successfully."),
    ]
}

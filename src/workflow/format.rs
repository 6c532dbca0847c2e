use crate::domain::ticket::{TicketBody, TicketRecord};

/// Renders a ticket as the plain text used for copy and export. The labels match what
/// the parser recognises. Stories show either the Gherkin or the bullet criteria.
pub fn format_ticket(record: &TicketRecord, show_gherkin: bool) -> String {
    let header = format!(
        "Title: {}\nDescription: {}\n",
        record.title, record.description
    );

    match &record.body {
        TicketBody::Bug {
            steps,
            expected_result,
            actual_result,
        } => {
            let steps = steps
                .iter()
                .enumerate()
                .map(|(index, step)| format!("{}. {step}", index + 1))
                .collect::<Vec<_>>()
                .join("\n");
            format!(
                "{header}Steps to Reproduce:\n{steps}\nExpected Result:\n{expected_result}\nActual Result:\n{actual_result}"
            )
        }
        TicketBody::Story {
            acceptance_gherkin, ..
        } if show_gherkin => {
            format!(
                "{header}Acceptance Criteria (Gherkin):\n{}",
                acceptance_gherkin.join("\n")
            )
        }
        TicketBody::Story {
            acceptance_bullets, ..
        } => {
            let bullets = acceptance_bullets
                .iter()
                .map(|bullet| format!("- {bullet}"))
                .collect::<Vec<_>>()
                .join("\n");
            format!("{header}Acceptance Criteria (bullets):\n{bullets}")
        }
    }
}

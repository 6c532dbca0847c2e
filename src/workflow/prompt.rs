use crate::domain::ticket::TicketKind;

const BUG_FORMAT: &str = "You are a Jira expert. Given the following bug report, generate a Jira bug in this format:

Title: <short title>
Description: <detailed bug description>
Steps to Reproduce:
1. ...
2. ...
Expected Result:
...
Actual Result:
...";

const STORY_FORMAT: &str = "You are a Jira expert. Given the following task, generate a Jira story in this format:

Title: <short title>
Description: As a <role>, I want <feature>, so that <benefit>.
Acceptance Criteria (bullets):
- ...
- ...
- ...
Acceptance Criteria (Gherkin):
Given ...
When ...
Then ...

ALWAYS use the 'As a <role>, I want <feature>, so that <benefit>.' format for the description.
ALWAYS provide at least 3 acceptance criteria in both bullet and Gherkin formats.";

/// Builds the instruction sent to the completion provider. `task` is expected to be trimmed.
pub fn build_prompt(task: &str, kind: TicketKind) -> String {
    match kind {
        TicketKind::Bug => format!("{BUG_FORMAT}\n\nBug: {task}"),
        TicketKind::Story => format!("{STORY_FORMAT}\n\nTask: {task}"),
    }
}

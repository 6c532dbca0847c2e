use tracing::{info, warn};

use crate::context::AppContext;
use crate::domain::ticket::{TicketKind, TicketRecord};
use crate::workflow::fallback::fallback_ticket;
use crate::workflow::parser::parse_response;
use crate::workflow::prompt::build_prompt;

pub const PROVIDER_FAILURE_NOTICE: &str =
    "Failed to generate story. Please check your OpenAI API key and network.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TicketSource {
    Provider,
    Fallback,
}

#[derive(Debug)]
pub struct GenerationOutcome {
    pub record: TicketRecord,
    pub source: TicketSource,
    /// User-facing message when the provider failed and the fallback was used instead.
    pub notice: Option<&'static str>,
}

/// Produces exactly one complete ticket for `task`, or `None` when the task is blank.
/// Provider failures are logged and masked by the fallback ticket.
pub async fn generate_ticket(
    ctx: &AppContext,
    task: &str,
    kind: TicketKind,
) -> Option<GenerationOutcome> {
    let task = task.trim();
    if task.is_empty() {
        return None;
    }

    let Some(provider) = ctx.completion.as_ref() else {
        info!(kind = kind.as_str(), "no provider credential, using fallback ticket");
        return Some(GenerationOutcome {
            record: fallback_ticket(task, kind),
            source: TicketSource::Fallback,
            notice: None,
        });
    };

    info!(
        kind = kind.as_str(),
        model = %ctx.config.provider.model,
        "generating ticket with provider"
    );
    let prompt = build_prompt(task, kind);
    let outcome = match provider.complete(&prompt).await {
        Ok(raw) => GenerationOutcome {
            record: parse_response(&raw, kind, task),
            source: TicketSource::Provider,
            notice: None,
        },
        Err(err) => {
            warn!(error = %err, "provider call failed, using fallback ticket");
            GenerationOutcome {
                record: fallback_ticket(task, kind),
                source: TicketSource::Fallback,
                notice: Some(PROVIDER_FAILURE_NOTICE),
            }
        }
    };
    Some(outcome)
}

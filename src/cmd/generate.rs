use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use clap::Args;
use tracing::info;

use crate::context::AppContext;
use crate::domain::export::export_file_name;
use crate::domain::ticket::{TicketKind, TicketRecord};
use crate::error::{AppError, AppResult};
use crate::workflow::format::format_ticket;
use crate::workflow::ticket::generate_ticket;

#[derive(Args, Debug, Clone)]
pub struct GenerateArgs {
    /// Task or bug description. Read from stdin when omitted.
    pub task: Vec<String>,
    /// Kind of ticket to generate.
    #[arg(short = 't', long = "type", value_enum, default_value_t = TicketKind::Story)]
    pub kind: TicketKind,
    /// Show Gherkin acceptance criteria instead of bullets (stories only).
    #[arg(short, long)]
    pub gherkin: bool,
    /// Also write the ticket text to a file in this directory.
    #[arg(short, long, value_name = "DIR")]
    pub export: Option<PathBuf>,
    /// Print the ticket record as JSON.
    #[arg(long)]
    pub json: bool,
}

pub async fn run(ctx: &AppContext, args: GenerateArgs) -> AppResult<()> {
    let task = if args.task.is_empty() {
        let mut input = String::new();
        io::stdin().read_to_string(&mut input)?;
        input
    } else {
        args.task.join(" ")
    };

    let Some(outcome) = generate_ticket(ctx, &task, args.kind).await else {
        eprintln!("Nothing to generate: the task description is empty.");
        return Ok(());
    };

    info!(source = ?outcome.source, "ticket ready");
    if let Some(notice) = outcome.notice {
        eprintln!("{notice}");
    }

    let text = format_ticket(&outcome.record, args.gherkin);
    if args.json {
        println!("{}", render_json(&outcome.record)?);
    } else {
        println!("{text}");
    }

    if let Some(dir) = &args.export {
        let path = export_ticket(dir, &outcome.record, &text)?;
        eprintln!("Exported to {}", path.display());
    }

    Ok(())
}

fn render_json(record: &TicketRecord) -> AppResult<String> {
    serde_json::to_string_pretty(record)
        .map_err(|err| AppError::Serialization(format!("failed to encode ticket: {err}")))
}

fn export_ticket(dir: &Path, record: &TicketRecord, text: &str) -> AppResult<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(export_file_name(&record.title));
    fs::write(&path, text)?;
    info!(kind = record.kind().as_str(), path = %path.display(), "exported ticket");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::fallback::fallback_ticket;

    #[test]
    fn exports_formatted_text_under_title_name() {
        let dir = tempfile::tempdir().expect("tempdir");
        let record = fallback_ticket("the app crashes on login", TicketKind::Bug);
        let text = format_ticket(&record, false);

        let path = export_ticket(&dir.path().join("out"), &record, &text).expect("export");

        assert_eq!(
            path.file_name().and_then(|n| n.to_str()),
            Some("bug__the_app_crashes_on_login.txt")
        );
        assert_eq!(fs::read_to_string(&path).expect("read"), text);
    }

    #[test]
    fn json_output_includes_kind() {
        let record = fallback_ticket("share files", TicketKind::Story);
        let json = render_json(&record).expect("json");
        assert!(json.contains("\"kind\": \"Story\""));
        assert!(json.contains("\"acceptanceGherkin\""));
    }
}

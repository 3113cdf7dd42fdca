use anyhow::Context;
use tokio::io::{AsyncBufReadExt, BufReader};

use rae_core::entities::{ChatMessage, ReportMatch};
use rae_sync::{AppContext, ChatSession, ProjectChat, Refresh, ReportsState};

use crate::cli::root_commands::ChatArgs;
use crate::cli::{GlobalFlags, OutputFormat};
use crate::commands::project;
use crate::output::output;
use crate::progress::Progress;

enum Target {
    Reports(ChatSession),
    Project(ProjectChat),
}

impl Target {
    async fn send(&self, text: &str) -> anyhow::Result<ChatMessage> {
        let reply = match self {
            Self::Reports(chat) => chat.send_turn(text).await?,
            Self::Project(chat) => chat.send_turn(text).await?,
        };
        Ok(reply)
    }
}

/// Handle `rae chat`.
pub async fn handle(args: &ChatArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let target = match (&args.project, &args.report) {
        (Some(project_id), _) => {
            let detail = project::open(project_id, ctx).await?;
            Target::Project(ProjectChat::new(ctx, project_id, detail.document_ids()))
        }
        (None, Some(report_id)) => {
            let chat = ChatSession::new(ctx);
            chat.select_report(find_report(report_id, ctx).await?);
            Target::Reports(chat)
        }
        (None, None) => Target::Reports(ChatSession::new(ctx)),
    };

    if let Some(query) = &args.query {
        return ask(&target, query, flags).await;
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("failed to read stdin")? {
        if line.trim().is_empty() {
            continue;
        }
        ask(&target, &line, flags).await?;
    }
    Ok(())
}

async fn ask(target: &Target, text: &str, flags: &GlobalFlags) -> anyhow::Result<()> {
    let spinner = Progress::spinner("waiting for the assistant");
    let reply = target.send(text).await;
    spinner.finish_clear();
    print_reply(&reply?, flags)
}

fn print_reply(reply: &ChatMessage, flags: &GlobalFlags) -> anyhow::Result<()> {
    if flags.format != OutputFormat::Table {
        return output(reply, flags.format);
    }
    println!("[{}] {}", reply.time, reply.text);
    if let Some(sources) = &reply.source_documents {
        let titles = sources
            .iter()
            .map(|s| s.title.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        println!("  sources: {titles}");
    }
    Ok(())
}

async fn find_report(id: &str, ctx: &AppContext) -> anyhow::Result<ReportMatch> {
    let mut reports = ReportsState::new(ctx);
    reports.refresh().await;
    let report = reports
        .raw()
        .iter()
        .find(|r| r.id == id)
        .with_context(|| format!("report {id} not found"))?;
    Ok(ReportMatch {
        id: report.id.clone(),
        name: report.title.clone(),
        project_name: Some(report.project_name.clone()),
        client_name: Some(report.client_name.clone()),
    })
}

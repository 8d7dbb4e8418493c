use anyhow::Result;

use crate::context::AppContext;

pub async fn list(ctx: &AppContext, project_id: &str, json: bool) -> Result<()> {
    let mut shell = ctx.mount().await?;
    let orchestrator = shell.orchestrator_mut();
    orchestrator.select_project(project_id).await?;
    let sessions = orchestrator.sessions();

    if json {
        println!("{}", serde_json::to_string_pretty(sessions)?);
        return Ok(());
    }

    if sessions.is_empty() {
        println!("No sessions recorded for {}", project_id);
        return Ok(());
    }
    for session in sessions {
        let when = session.last_activity.unwrap_or(session.created_at);
        println!(
            "  {}  {}  {}",
            session.id,
            when.format("%Y-%m-%d %H:%M"),
            session.first_message_preview.as_deref().unwrap_or("-")
        );
    }
    Ok(())
}

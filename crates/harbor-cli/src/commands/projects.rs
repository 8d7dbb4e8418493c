use anyhow::{Context, Result};
use harbor_core::project::Project;
use std::path::PathBuf;

use crate::context::AppContext;

pub async fn list(ctx: &AppContext, query: Option<String>, json: bool) -> Result<()> {
    let mut shell = ctx.mount().await?;
    let orchestrator = shell.orchestrator_mut();
    orchestrator.set_search_query(query.unwrap_or_default());
    let visible = orchestrator.visible_projects();

    if json {
        println!("{}", serde_json::to_string_pretty(&visible)?);
        return Ok(());
    }

    println!("Registered ({})", visible.registered.len());
    for project in &visible.registered {
        print_project(project);
    }
    println!();
    println!("Discovered ({})", visible.discovered.len());
    for project in &visible.discovered {
        print_project(project);
    }
    Ok(())
}

fn print_project(project: &Project) {
    let sessions = project
        .session_count
        .map(|n| format!("  [{} sessions]", n))
        .unwrap_or_default();
    println!(
        "  {}  {}  {}{}",
        project.id,
        project.display_name(),
        project.path.display(),
        sessions
    );
}

pub async fn add(ctx: &AppContext, path: PathBuf, name: Option<String>, json: bool) -> Result<()> {
    let path = std::path::absolute(&path)
        .with_context(|| format!("Invalid path: {}", path.display()))?;

    let mut shell = ctx.mount().await?;
    let project = shell.orchestrator_mut().add_project(&path, name).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&project)?);
    } else {
        println!("Registered {} as {}", project.path.display(), project.id);
    }
    Ok(())
}

pub async fn remove(ctx: &AppContext, project_id: &str) -> Result<()> {
    let mut shell = ctx.mount().await?;
    shell.orchestrator_mut().remove_project(project_id).await?;
    println!("Removed {}", project_id);
    Ok(())
}

pub async fn rename(
    ctx: &AppContext,
    project_id: &str,
    name: Option<String>,
    json: bool,
) -> Result<()> {
    let mut shell = ctx.mount().await?;
    let project = shell.orchestrator_mut().rename_project(project_id, name).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&project)?);
    } else {
        println!("{} is now shown as '{}'", project.id, project.display_name());
    }
    Ok(())
}

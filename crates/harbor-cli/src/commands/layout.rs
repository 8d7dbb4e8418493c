use anyhow::Result;
use clap::ValueEnum;
use harbor_core::settings::PanelLayout;

use crate::context::AppContext;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Panel {
    Left,
    Right,
    /// The discovered-projects group of the project list
    Discovered,
}

pub enum LayoutAction {
    Show,
    Toggle(Panel),
    Resize(Panel, u32),
}

pub async fn run(ctx: &AppContext, action: LayoutAction, json: bool) -> Result<()> {
    let mut shell = ctx.mount().await?;
    let orchestrator = shell.orchestrator_mut();

    match action {
        LayoutAction::Show => {}
        LayoutAction::Toggle(Panel::Left) => {
            orchestrator.toggle_left_panel().await;
        }
        LayoutAction::Toggle(Panel::Right) => {
            orchestrator.toggle_right_panel().await;
        }
        LayoutAction::Toggle(Panel::Discovered) => {
            orchestrator.toggle_discovered_projects().await;
        }
        LayoutAction::Resize(Panel::Left, width) => {
            orchestrator.resize_left_panel(width).await;
        }
        LayoutAction::Resize(Panel::Right, width) => {
            orchestrator.resize_right_panel(width).await;
        }
        LayoutAction::Resize(Panel::Discovered, _) => {
            anyhow::bail!("The discovered-projects group has no width");
        }
    }

    print_layout(orchestrator.layout(), json)
}

fn print_layout(layout: &PanelLayout, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(layout)?);
        return Ok(());
    }

    let state = |collapsed: bool| if collapsed { "collapsed" } else { "open" };
    println!(
        "left panel:      {} ({}px)",
        state(layout.left_panel_collapsed),
        layout.left_panel_width
    );
    println!(
        "right panel:     {} ({}px)",
        state(layout.right_panel_collapsed),
        layout.right_panel_width
    );
    println!(
        "discovered list: {}",
        state(layout.discovered_projects_collapsed)
    );
    Ok(())
}

//! Panel layout model and its string encoding.
//!
//! Layout values live in a flat string key/value store. Widths are stored as
//! decimal strings and flags as the literals `"true"`/`"false"`.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const DEFAULT_LEFT_PANEL_WIDTH: u32 = 300;
pub const DEFAULT_RIGHT_PANEL_WIDTH: u32 = 400;

/// Every settings key read or written by the workspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayoutKey {
    LeftPanelCollapsed,
    RightPanelCollapsed,
    LeftPanelWidth,
    RightPanelWidth,
    DiscoveredProjectsCollapsed,
    LastProjectId,
    LastSessionId,
}

impl LayoutKey {
    pub const ALL: [LayoutKey; 7] = [
        LayoutKey::LeftPanelCollapsed,
        LayoutKey::RightPanelCollapsed,
        LayoutKey::LeftPanelWidth,
        LayoutKey::RightPanelWidth,
        LayoutKey::DiscoveredProjectsCollapsed,
        LayoutKey::LastProjectId,
        LayoutKey::LastSessionId,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            LayoutKey::LeftPanelCollapsed => "leftPanelCollapsed",
            LayoutKey::RightPanelCollapsed => "rightPanelCollapsed",
            LayoutKey::LeftPanelWidth => "leftPanelWidth",
            LayoutKey::RightPanelWidth => "rightPanelWidth",
            LayoutKey::DiscoveredProjectsCollapsed => "discoveredProjectsCollapsed",
            LayoutKey::LastProjectId => "lastProjectId",
            LayoutKey::LastSessionId => "lastSessionId",
        }
    }

    pub fn parse(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == key)
    }

    /// All key names, for the single batched read at startup.
    pub fn all_names() -> Vec<String> {
        Self::ALL.iter().map(|k| k.as_str().to_string()).collect()
    }
}

/// Collapse flags and widths of the workspace panels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PanelLayout {
    pub left_panel_collapsed: bool,
    pub right_panel_collapsed: bool,
    pub left_panel_width: u32,
    pub right_panel_width: u32,
    pub discovered_projects_collapsed: bool,
}

impl Default for PanelLayout {
    fn default() -> Self {
        Self {
            left_panel_collapsed: false,
            right_panel_collapsed: false,
            left_panel_width: DEFAULT_LEFT_PANEL_WIDTH,
            right_panel_width: DEFAULT_RIGHT_PANEL_WIDTH,
            discovered_projects_collapsed: true,
        }
    }
}

impl PanelLayout {
    /// Decodes a layout from raw settings, substituting defaults for absent
    /// or unparsable values.
    pub fn from_settings(values: &HashMap<String, String>) -> Self {
        let get = |key: LayoutKey| values.get(key.as_str()).map(String::as_str);
        let defaults = Self::default();

        Self {
            left_panel_collapsed: get(LayoutKey::LeftPanelCollapsed) == Some("true"),
            right_panel_collapsed: get(LayoutKey::RightPanelCollapsed) == Some("true"),
            left_panel_width: parse_width(get(LayoutKey::LeftPanelWidth))
                .unwrap_or(defaults.left_panel_width),
            right_panel_width: parse_width(get(LayoutKey::RightPanelWidth))
                .unwrap_or(defaults.right_panel_width),
            // Collapsed unless explicitly expanded.
            discovered_projects_collapsed: get(LayoutKey::DiscoveredProjectsCollapsed)
                != Some("false"),
        }
    }

    /// Applies a change and returns the single settings entry to write, or
    /// `None` when the value is unchanged. Zero widths are ignored.
    pub fn apply(&mut self, change: LayoutChange) -> Option<(String, String)> {
        let slot_changed = match change {
            LayoutChange::LeftPanelCollapsed(v) => replace(&mut self.left_panel_collapsed, v),
            LayoutChange::RightPanelCollapsed(v) => replace(&mut self.right_panel_collapsed, v),
            LayoutChange::LeftPanelWidth(v) => v > 0 && replace(&mut self.left_panel_width, v),
            LayoutChange::RightPanelWidth(v) => v > 0 && replace(&mut self.right_panel_width, v),
            LayoutChange::DiscoveredProjectsCollapsed(v) => {
                replace(&mut self.discovered_projects_collapsed, v)
            }
        };
        slot_changed.then(|| change.to_entry())
    }
}

fn replace<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        return false;
    }
    *slot = value;
    true
}

/// Parses a stored width. Zero, negative and non-numeric values are rejected.
fn parse_width(raw: Option<&str>) -> Option<u32> {
    raw.and_then(|s| s.trim().parse::<u32>().ok())
        .filter(|w| *w > 0)
}

/// A single user-driven layout mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutChange {
    LeftPanelCollapsed(bool),
    RightPanelCollapsed(bool),
    LeftPanelWidth(u32),
    RightPanelWidth(u32),
    DiscoveredProjectsCollapsed(bool),
}

impl LayoutChange {
    pub fn key(&self) -> LayoutKey {
        match self {
            LayoutChange::LeftPanelCollapsed(_) => LayoutKey::LeftPanelCollapsed,
            LayoutChange::RightPanelCollapsed(_) => LayoutKey::RightPanelCollapsed,
            LayoutChange::LeftPanelWidth(_) => LayoutKey::LeftPanelWidth,
            LayoutChange::RightPanelWidth(_) => LayoutKey::RightPanelWidth,
            LayoutChange::DiscoveredProjectsCollapsed(_) => LayoutKey::DiscoveredProjectsCollapsed,
        }
    }

    /// Encodes the change as the `(key, value)` pair stored in settings.
    pub fn to_entry(&self) -> (String, String) {
        let value = match self {
            LayoutChange::LeftPanelCollapsed(v)
            | LayoutChange::RightPanelCollapsed(v)
            | LayoutChange::DiscoveredProjectsCollapsed(v) => v.to_string(),
            LayoutChange::LeftPanelWidth(w) | LayoutChange::RightPanelWidth(w) => w.to_string(),
        };
        (self.key().as_str().to_string(), value)
    }
}

/// The project and session restored at startup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LastSelection {
    pub project_id: Option<String>,
    pub session_id: Option<String>,
}

impl LastSelection {
    pub fn from_settings(values: &HashMap<String, String>) -> Self {
        let non_empty = |key: LayoutKey| {
            values
                .get(key.as_str())
                .filter(|v| !v.trim().is_empty())
                .cloned()
        };
        Self {
            project_id: non_empty(LayoutKey::LastProjectId),
            session_id: non_empty(LayoutKey::LastSessionId),
        }
    }

    /// Entries to persist for a confirmed `(project, session)` choice.
    pub fn entries(project_id: &str, session_id: &str) -> HashMap<String, String> {
        HashMap::from([
            (
                LayoutKey::LastProjectId.as_str().to_string(),
                project_id.to_string(),
            ),
            (
                LayoutKey::LastSessionId.as_str().to_string(),
                session_id.to_string(),
            ),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults_when_empty() {
        let layout = PanelLayout::from_settings(&HashMap::new());
        assert_eq!(layout, PanelLayout::default());
        assert_eq!(layout.left_panel_width, 300);
        assert!(layout.discovered_projects_collapsed);
        assert!(!layout.left_panel_collapsed);
    }

    #[test]
    fn test_flags_require_exact_true() {
        let layout = PanelLayout::from_settings(&settings(&[
            ("leftPanelCollapsed", "true"),
            ("rightPanelCollapsed", "TRUE"),
        ]));
        assert!(layout.left_panel_collapsed);
        assert!(!layout.right_panel_collapsed);
    }

    #[test]
    fn test_discovered_flag_is_inverted() {
        let expanded = PanelLayout::from_settings(&settings(&[("discoveredProjectsCollapsed", "false")]));
        assert!(!expanded.discovered_projects_collapsed);

        let garbage = PanelLayout::from_settings(&settings(&[("discoveredProjectsCollapsed", "no")]));
        assert!(garbage.discovered_projects_collapsed);
    }

    #[test]
    fn test_unparsable_widths_fall_back() {
        let layout = PanelLayout::from_settings(&settings(&[
            ("leftPanelWidth", "wide"),
            ("rightPanelWidth", "0"),
        ]));
        assert_eq!(layout.left_panel_width, DEFAULT_LEFT_PANEL_WIDTH);
        assert_eq!(layout.right_panel_width, DEFAULT_RIGHT_PANEL_WIDTH);

        let layout = PanelLayout::from_settings(&settings(&[("leftPanelWidth", "340")]));
        assert_eq!(layout.left_panel_width, 340);
    }

    #[test]
    fn test_apply_returns_only_changed_entry() {
        let mut layout = PanelLayout::default();
        assert_eq!(
            layout.apply(LayoutChange::LeftPanelWidth(340)),
            Some(("leftPanelWidth".to_string(), "340".to_string()))
        );
        assert_eq!(layout.left_panel_width, 340);
        assert_eq!(layout.apply(LayoutChange::LeftPanelWidth(340)), None);
        assert_eq!(
            layout.apply(LayoutChange::DiscoveredProjectsCollapsed(false)),
            Some(("discoveredProjectsCollapsed".to_string(), "false".to_string()))
        );
    }

    #[test]
    fn test_last_selection_ignores_blank_values() {
        let last = LastSelection::from_settings(&settings(&[
            ("lastProjectId", "P1"),
            ("lastSessionId", " "),
        ]));
        assert_eq!(last.project_id.as_deref(), Some("P1"));
        assert!(last.session_id.is_none());
    }

    #[test]
    fn test_key_names_round_trip() {
        for key in LayoutKey::ALL {
            assert_eq!(LayoutKey::parse(key.as_str()), Some(key));
        }
        assert_eq!(LayoutKey::all_names().len(), 7);
    }
}

use executors::Kubectl;
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};

/// One-click commands that ignore whatever is typed in the input box.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum QuickAction {
    Nodes,
    Services,
    Namespaces,
}

#[derive(Debug, Clone, Serialize)]
pub struct QuickActionInfo {
    pub action: QuickAction,
    pub label: &'static str,
    pub command: String,
}

impl QuickAction {
    /// kubectl arguments, without the program name.
    pub fn args(self) -> &'static [&'static str] {
        match self {
            QuickAction::Nodes => &["get", "nodes"],
            QuickAction::Services => &["get", "svc", "-A"],
            QuickAction::Namespaces => &["get", "ns"],
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            QuickAction::Nodes => "Nodes",
            QuickAction::Services => "Services",
            QuickAction::Namespaces => "Namespaces",
        }
    }

    /// Every action with the command line it runs under `kubectl`.
    pub fn all(kubectl: &Kubectl) -> Vec<QuickActionInfo> {
        QuickAction::iter()
            .map(|action| QuickActionInfo {
                action,
                label: action.label(),
                command: kubectl.fixed(action.args()).to_string(),
            })
            .collect()
    }
}

//! State - agent のライフサイクル状態

use serde::{Deserialize, Serialize};
use std::fmt;

/// AgentState は agent のライフサイクル状態を表現
///
/// # 状態遷移
/// - parsed → installing → installed → activating → activated
/// - installing / activating で失敗すると redundant
///
/// fetch の横取りは activated の間だけ行われます。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentState {
    Parsed,
    Installing,
    Installed,
    Activating,
    Activated,
    Redundant,
}

impl AgentState {
    pub fn can_intercept_fetch(&self) -> bool {
        matches!(self, AgentState::Activated)
    }
}

impl fmt::Display for AgentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AgentState::Parsed => "parsed",
            AgentState::Installing => "installing",
            AgentState::Installed => "installed",
            AgentState::Activating => "activating",
            AgentState::Activated => "activated",
            AgentState::Redundant => "redundant",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::parsed(AgentState::Parsed, false)]
    #[case::installed(AgentState::Installed, false)]
    #[case::activating(AgentState::Activating, false)]
    #[case::activated(AgentState::Activated, true)]
    #[case::redundant(AgentState::Redundant, false)]
    fn only_activated_intercepts(#[case] state: AgentState, #[case] expected: bool) {
        assert_eq!(state.can_intercept_fetch(), expected);
    }

    #[test]
    fn serializes_as_snake_case() {
        let s = serde_json::to_string(&AgentState::Activated).unwrap();
        assert_eq!(s, "\"activated\"");
    }
}

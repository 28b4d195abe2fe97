//! Main panel tabs

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Selectable panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tab {
    #[default]
    Results,
    History,
    Saved,
    Schema,
}

impl Tab {
    pub const ALL: [Tab; 4] = [Tab::Results, Tab::History, Tab::Saved, Tab::Schema];

    /// Id as persisted in `activeTabId`
    pub fn as_str(&self) -> &'static str {
        match self {
            Tab::Results => "results",
            Tab::History => "history",
            Tab::Saved => "saved",
            Tab::Schema => "schema",
        }
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tab {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tab::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown tab '{}'", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_round_trip() {
        for tab in Tab::ALL {
            assert_eq!(tab.as_str().parse::<Tab>().unwrap(), tab);
        }
        assert_eq!(" History ".parse::<Tab>().unwrap(), Tab::History);
        assert!("settings".parse::<Tab>().is_err());
    }
}

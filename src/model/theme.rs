use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

/// How the five symbols are drawn. Purely cosmetic; the game always works on the values 1-5.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Number,
    Color,
    Brainrot,
}

impl Default for Theme {
    fn default() -> Self {
        Theme::Number
    }
}

impl Theme {
    pub fn all() -> Vec<Theme> {
        vec![Theme::Number, Theme::Color, Theme::Brainrot]
    }

    pub fn key(&self) -> &'static str {
        match self {
            Theme::Number => "number",
            Theme::Color => "color",
            Theme::Brainrot => "brainrot",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Theme::Number => "Numbers",
            Theme::Color => "Colors",
            Theme::Brainrot => "Brainrot",
        }
    }

    fn items(&self) -> [&'static str; 5] {
        match self {
            Theme::Number => ["1", "2", "3", "4", "5"],
            Theme::Color => ["red", "green", "blue", "yellow", "purple"],
            Theme::Brainrot => ["🤡", "💀", "🔥", "💯", "🧠"],
        }
    }

    /// Symbol for a game value in 1..=5
    pub fn symbol(&self, value: u8) -> &'static str {
        match value {
            1..=5 => self.items()[value as usize - 1],
            _ => "?",
        }
    }
}

impl Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "number" | "numbers" => Ok(Theme::Number),
            "color" | "colors" => Ok(Theme::Color),
            "brainrot" => Ok(Theme::Brainrot),
            other => Err(format!("unknown theme: {}", other)),
        }
    }
}

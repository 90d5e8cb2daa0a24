use serde::{Deserialize, Serialize};

/// Report language requested by the widget.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lang {
    /// English
    #[default]
    En,
    /// Simplified Chinese
    Zh,
    /// Traditional Chinese
    Tw,
}

impl Lang {
    /// Lenient lookup used for request payloads: unknown codes become English.
    pub fn from_code(code: &str) -> Self {
        code.parse().unwrap_or_default()
    }

    pub fn code(&self) -> &'static str {
        match self {
            Lang::En => "en",
            Lang::Zh => "zh",
            Lang::Tw => "tw",
        }
    }
}

impl std::fmt::Display for Lang {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl std::str::FromStr for Lang {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "en" => Ok(Lang::En),
            "zh" | "zh-cn" | "zh-hans" => Ok(Lang::Zh),
            "tw" | "zh-tw" | "zh-hant" => Ok(Lang::Tw),
            _ => Err(format!("Unknown language: {}", s)),
        }
    }
}

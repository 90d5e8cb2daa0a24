use serde::{Deserialize, Deserializer, Serialize};

use bossreport_age::BirthDateInput;
use bossreport_narrative::{Lang, ProfileSummary};

use crate::AnalyzeError;

/// Fields that must be present and non-blank, checked in this order.
pub const REQUIRED_FIELDS: [&str; 6] = [
    "position",
    "experience",
    "sector",
    "challenge",
    "focus",
    "country",
];

/// Form payload posted by the widget.
///
/// Every field is optional on the wire. Numbers are accepted wherever text
/// is expected and kept as their decimal text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    #[serde(default, deserialize_with = "lenient_string")]
    pub position: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub department: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub experience: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub sector: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub challenge: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub focus: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub country: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub email: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub dob_day: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub dob_month: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub dob_year: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub dob: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub lang: String,
}

impl Submission {
    /// Check required fields, reporting the first one missing.
    pub fn validate(&self) -> Result<(), AnalyzeError> {
        for name in REQUIRED_FIELDS {
            if self.field(name).trim().is_empty() {
                return Err(AnalyzeError::MissingField(name));
            }
        }
        Ok(())
    }

    fn field(&self, name: &str) -> &str {
        match name {
            "position" => &self.position,
            "experience" => &self.experience,
            "sector" => &self.sector,
            "challenge" => &self.challenge,
            "focus" => &self.focus,
            "country" => &self.country,
            _ => "",
        }
    }

    pub fn lang(&self) -> Lang {
        Lang::from_code(&self.lang)
    }

    pub fn birth_date_input(&self) -> BirthDateInput {
        BirthDateInput {
            day: self.dob_day.clone(),
            month: self.dob_month.clone(),
            year: self.dob_year.clone(),
            dob: self.dob.clone(),
        }
    }

    pub fn profile(&self, age: u32) -> ProfileSummary<'_> {
        ProfileSummary {
            position: &self.position,
            department: &self.department,
            experience: &self.experience,
            sector: &self.sector,
            challenge: &self.challenge,
            focus: &self.focus,
            country: &self.country,
            age,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TextOrNumber {
    Text(String),
    Integer(i64),
    Float(f64),
}

impl TextOrNumber {
    fn into_text(self) -> String {
        match self {
            TextOrNumber::Text(s) => s,
            TextOrNumber::Integer(n) => n.to_string(),
            TextOrNumber::Float(n) => n.to_string(),
        }
    }
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<TextOrNumber>::deserialize(deserializer)?.map(TextOrNumber::into_text))
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_text(deserializer)?.unwrap_or_default())
}

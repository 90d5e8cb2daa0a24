use chrono::{Datelike, NaiveDate};
use tracing::debug;

use crate::freeform::parse_freeform;
use crate::month::resolve_month;
use crate::BirthDateError;

/// Birth date fields as supplied by the caller.
///
/// Decomposed fields win whenever all three are present and non-blank,
/// even if `dob` is also set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BirthDateInput {
    pub day: Option<String>,
    pub month: Option<String>,
    pub year: Option<String>,
    /// Freeform date string, read day-first
    pub dob: Option<String>,
}

impl BirthDateInput {
    pub fn decomposed(
        day: impl Into<String>,
        month: impl Into<String>,
        year: impl Into<String>,
    ) -> Self {
        Self {
            day: Some(day.into()),
            month: Some(month.into()),
            year: Some(year.into()),
            dob: None,
        }
    }

    pub fn freeform(dob: impl Into<String>) -> Self {
        Self {
            dob: Some(dob.into()),
            ..Default::default()
        }
    }

    /// True when no field carries any non-blank text.
    pub fn is_empty(&self) -> bool {
        [&self.day, &self.month, &self.year, &self.dob]
            .into_iter()
            .all(|field| non_blank(field).is_none())
    }

    fn decomposed_parts(&self) -> Option<(&str, &str, &str)> {
        Some((
            non_blank(&self.day)?,
            non_blank(&self.month)?,
            non_blank(&self.year)?,
        ))
    }
}

fn non_blank(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Outcome of resolving an age, with the degrade-to-zero case made explicit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AgeResolution {
    Resolved { birth_date: NaiveDate, age: u32 },
    /// The input could not be turned into a date; age is reported as 0.
    Fallback { reason: BirthDateError },
}

impl AgeResolution {
    pub fn age(&self) -> u32 {
        match self {
            AgeResolution::Resolved { age, .. } => *age,
            AgeResolution::Fallback { .. } => 0,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, AgeResolution::Fallback { .. })
    }

    pub fn into_result(self) -> Result<u32, BirthDateError> {
        match self {
            AgeResolution::Resolved { age, .. } => Ok(age),
            AgeResolution::Fallback { reason } => Err(reason),
        }
    }
}

/// Strictly resolve the birth date, reporting why resolution failed.
///
/// Invalid decomposed fields do not fall through to `dob`.
pub fn resolve_birth_date(
    input: &BirthDateInput,
    today: NaiveDate,
) -> Result<NaiveDate, BirthDateError> {
    if let Some((day, month, year)) = input.decomposed_parts() {
        let month =
            resolve_month(month).ok_or_else(|| BirthDateError::InvalidMonth(month.to_string()))?;
        let day = day.parse::<u32>().map_err(|_| BirthDateError::InvalidNumber {
            field: "day",
            value: day.to_string(),
        })?;
        let year = year.parse::<i32>().map_err(|_| BirthDateError::InvalidNumber {
            field: "year",
            value: year.to_string(),
        })?;

        return NaiveDate::from_ymd_opt(year, month, day).ok_or(BirthDateError::InvalidDate {
            year,
            month,
            day,
        });
    }

    match non_blank(&input.dob) {
        Some(dob) => parse_freeform(dob, today),
        None => Err(BirthDateError::MissingInput),
    }
}

/// Resolve an age, keeping the fallback branch visible to the caller.
pub fn resolve_age(input: &BirthDateInput, today: NaiveDate) -> AgeResolution {
    match resolve_birth_date(input, today) {
        Ok(birth_date) => AgeResolution::Resolved {
            birth_date,
            age: age_on(birth_date, today),
        },
        Err(reason) => {
            debug!(%reason, "Birth date unresolved, falling back to reference date");
            AgeResolution::Fallback { reason }
        }
    }
}

/// Age in whole years; never fails, degrading to 0 on unusable input.
pub fn compute_age(input: &BirthDateInput, today: NaiveDate) -> u32 {
    resolve_age(input, today).age()
}

/// Whole years from `birth` to `today`.
///
/// One year is subtracted when `today`'s (month, day) sorts before the
/// birthday's. A birth date after `today` yields 0.
pub fn age_on(birth: NaiveDate, today: NaiveDate) -> u32 {
    let mut years = today.year() - birth.year();
    if (today.month(), today.day()) < (birth.month(), birth.day()) {
        years -= 1;
    }
    u32::try_from(years).unwrap_or(0)
}

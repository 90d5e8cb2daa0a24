use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use colored::Colorize;

use bossreport_age::{age_on, resolve_age, resolve_birth_date, AgeResolution, BirthDateInput};

pub struct AgeArgs {
    pub day: Option<String>,
    pub month: Option<String>,
    pub year: Option<String>,
    pub dob: Option<String>,
    pub today: Option<NaiveDate>,
    pub strict: bool,
}

pub fn handle_age_command(args: AgeArgs) -> Result<()> {
    let today = args.today.unwrap_or_else(|| Local::now().date_naive());
    let input = BirthDateInput {
        day: args.day,
        month: args.month,
        year: args.year,
        dob: args.dob,
    };

    println!("{}", describe(&input, today, args.strict)?);
    Ok(())
}

fn describe(input: &BirthDateInput, today: NaiveDate, strict: bool) -> Result<String> {
    if strict {
        let birth_date =
            resolve_birth_date(input, today).context("Birth date could not be resolved")?;
        return Ok(format!(
            "{} (born {})",
            age_on(birth_date, today),
            birth_date
        ));
    }

    Ok(match resolve_age(input, today) {
        AgeResolution::Resolved { birth_date, age } => format!("{} (born {})", age, birth_date),
        AgeResolution::Fallback { reason } => {
            eprintln!("{} {}", "warning:".yellow().bold(), reason);
            "0".to_string()
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    #[test]
    fn test_describe_resolved() {
        let input = BirthDateInput::decomposed("14", "六月", "2000");
        assert_eq!(describe(&input, today(), false).unwrap(), "24 (born 2000-06-14)");
    }

    #[test]
    fn test_describe_fallback_is_zero() {
        let input = BirthDateInput::freeform("someday");
        assert_eq!(describe(&input, today(), false).unwrap(), "0");
    }

    #[test]
    fn test_describe_strict_fails() {
        let input = BirthDateInput::freeform("someday");
        let err = describe(&input, today(), true).unwrap_err();
        assert!(format!("{:#}", err).contains("Birth date could not be resolved"));
    }
}

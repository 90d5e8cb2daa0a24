use crate::{Lang, NarrativeKind, NarrativeRequest};

const GLOBAL_TEMPERATURE: f32 = 0.7;
const CREATIVE_TEMPERATURE: f32 = 0.8;
const STRUCTURED_TEMPERATURE: f32 = 0.7;

/// Profile fields interpolated into every prompt.
#[derive(Debug, Clone, Copy)]
pub struct ProfileSummary<'a> {
    pub position: &'a str,
    pub department: &'a str,
    pub experience: &'a str,
    pub sector: &'a str,
    pub challenge: &'a str,
    pub focus: &'a str,
    pub country: &'a str,
    pub age: u32,
}

/// Prompt templates for the narrative sections
pub struct NarrativePrompts;

impl NarrativePrompts {
    /// Seven-paragraph analysis of the role in its market
    pub fn global_analysis(lang: Lang, p: &ProfileSummary<'_>) -> NarrativeRequest {
        let prompt = match lang {
            Lang::En => format!(
                "You are an expert business analyst. Write seven detailed paragraphs for a {position} in {country}, \
                 {experience} years experience in {sector}. Challenge: '{challenge}'. Focus: '{focus}'.",
                position = p.position,
                country = p.country,
                experience = p.experience,
                sector = p.sector,
                challenge = p.challenge,
                focus = p.focus,
            ),
            Lang::Zh => format!(
                "你是一位专业的商业分析师。请为一位在{country}的{position}撰写七段详细的分析，\
                 拥有{experience}年{sector}行业经验。面临的挑战：'{challenge}'。发展重点：'{focus}'。",
                position = p.position,
                country = p.country,
                experience = p.experience,
                sector = p.sector,
                challenge = p.challenge,
                focus = p.focus,
            ),
            Lang::Tw => format!(
                "你是一位專業的商業分析師。請為一位在{country}的{position}撰寫七段詳細的分析，\
                 擁有{experience}年{sector}行業經驗。面臨的挑戰：'{challenge}'。發展重點：'{focus}'。",
                position = p.position,
                country = p.country,
                experience = p.experience,
                sector = p.sector,
                challenge = p.challenge,
                focus = p.focus,
            ),
        };

        NarrativeRequest::new(NarrativeKind::GlobalAnalysis, prompt, GLOBAL_TEMPERATURE)
    }

    /// Ten numbered, actionable approaches to the stated challenge
    pub fn creative_approaches(lang: Lang, p: &ProfileSummary<'_>) -> NarrativeRequest {
        let prompt = match lang {
            Lang::En => format!(
                "You are an innovation consultant. For a {position} whose challenge is '{challenge}' \
                 and focus is '{focus}', propose 10 creative, actionable approaches, numbered 1–10.",
                position = p.position,
                challenge = p.challenge,
                focus = p.focus,
            ),
            Lang::Zh => format!(
                "你是一位创新顾问。针对一位{position}，面临的挑战是'{challenge}'，\
                 发展重点是'{focus}'，请提出10条有创意且可操作的解决方案，用1-10编号。",
                position = p.position,
                challenge = p.challenge,
                focus = p.focus,
            ),
            Lang::Tw => format!(
                "你是一位創新顧問。針對一位{position}，面臨的挑戰是'{challenge}'，\
                 發展重點是'{focus}'，請提出10條有創意且可操作的解決方案，用1-10編號。",
                position = p.position,
                challenge = p.challenge,
                focus = p.focus,
            ),
        };

        NarrativeRequest::new(NarrativeKind::CreativeApproaches, prompt, CREATIVE_TEMPERATURE)
    }

    /// Single request answered with a `{metrics, analysis}` JSON object
    pub fn structured_report(lang: Lang, p: &ProfileSummary<'_>) -> NarrativeRequest {
        let language = match lang {
            Lang::En => "English",
            Lang::Zh => "Simplified Chinese",
            Lang::Tw => "Traditional Chinese",
        };

        let prompt = format!(
            r#"You are an expert workplace performance analyst.

## Profile
- Age: {age}
- Position: {position}
- Department: {department}
- Experience: {experience} year(s)
- Sector: {sector}
- Country: {country}
- Main challenge: {challenge}
- Development focus: {focus}

## Task
Compare this person against peers in their segment, their region, and globally.
Produce exactly three metrics: "Communication Efficiency", "Leadership Readiness"
and "Task Completion Reliability". Each metric has three integer percentages
between 0 and 100, labelled "Segment", "Regional" and "Global".

Then write an analysis of at least five paragraphs as HTML (<p> elements only).
Write all prose in {language}.

## Required Response Format
Respond with a single JSON object and nothing else:

{{"metrics": [{{"title": "Communication Efficiency", "labels": ["Segment", "Regional", "Global"], "values": [72, 65, 70]}}, ...], "analysis": "<p>...</p>"}}"#,
            age = p.age,
            position = p.position,
            department = p.department,
            experience = p.experience,
            sector = p.sector,
            country = p.country,
            challenge = p.challenge,
            focus = p.focus,
            language = language,
        );

        NarrativeRequest::new(NarrativeKind::StructuredReport, prompt, STRUCTURED_TEMPERATURE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> ProfileSummary<'static> {
        ProfileSummary {
            position: "Operations Manager",
            department: "Logistics",
            experience: "8",
            sector: "Retail",
            challenge: "staff turnover",
            focus: "team retention",
            country: "Singapore",
            age: 41,
        }
    }

    #[test]
    fn test_global_prompt_interpolates_profile() {
        let request = NarrativePrompts::global_analysis(Lang::En, &profile());
        assert_eq!(request.kind, NarrativeKind::GlobalAnalysis);
        assert!(request.prompt.contains("seven detailed paragraphs"));
        assert!(request.prompt.contains("Operations Manager in Singapore"));
        assert!(request.prompt.contains("8 years experience in Retail"));
        assert!(request.prompt.contains("Challenge: 'staff turnover'"));
        assert!((request.temperature - 0.7).abs() < f32::EPSILON);
    }

    #[test]
    fn test_creative_prompt_localized() {
        let zh = NarrativePrompts::creative_approaches(Lang::Zh, &profile());
        assert!(zh.prompt.contains("创新顾问"));
        assert!(zh.prompt.contains("staff turnover"));

        let tw = NarrativePrompts::creative_approaches(Lang::Tw, &profile());
        assert!(tw.prompt.contains("創新顧問"));
        assert!((tw.temperature - 0.8).abs() < f32::EPSILON);
    }

    #[test]
    fn test_structured_prompt_requests_json() {
        let request = NarrativePrompts::structured_report(Lang::Tw, &profile());
        assert_eq!(request.kind, NarrativeKind::StructuredReport);
        assert!(request.prompt.contains("- Age: 41"));
        assert!(request.prompt.contains(r#"{"metrics": [{"title""#));
        assert!(request.prompt.contains("Traditional Chinese"));
    }
}

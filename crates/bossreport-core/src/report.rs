//! HTML report assembly.
//!
//! The same markup is returned to the widget as `analysis` and mailed out.

use std::fmt::Write;

use bossreport_narrative::Lang;

use crate::metrics::{render_bars, Metric};
use crate::Submission;

/// Localized copy for one language
#[derive(Debug)]
pub struct ReportCopy {
    pub email_subject: &'static str,
    pub greeting: &'static str,
    pub report_title: &'static str,
    pub global_title: &'static str,
    pub creative_title: &'static str,
    /// Substituted for any narrative section the model could not produce
    pub placeholder: &'static str,
    pub data_source: &'static str,
    pub ps_content: &'static str,
    pub age_label: &'static str,
    pub position_label: &'static str,
    pub department_label: &'static str,
    pub experience_label: &'static str,
    pub experience_unit: &'static str,
    pub sector_label: &'static str,
    pub country_label: &'static str,
    pub challenge_label: &'static str,
    pub focus_label: &'static str,
}

static EN: ReportCopy = ReportCopy {
    email_subject: "Your Workplace Performance Report",
    greeting: "Dear Talent Recruiter,",
    report_title: "📄 Workplace Performance Report",
    global_title: "🌐 Global Section Analytical Report",
    creative_title: "Creative Innovation Approaches",
    placeholder: "Unable to generate content at this time.",
    data_source: "<strong>The insights in this report are generated by KataChat's AI systems analyzing:</strong><br>\
        1. Our proprietary database of anonymized professional profiles across Singapore, Malaysia, and Taiwan<br>\
        2. Aggregated global business benchmarks from trusted OpenAI research and leadership trend datasets<br>\
        <em>All data is processed through our AI models to identify statistically significant patterns while \
        maintaining strict PDPA compliance. Sample sizes vary by analysis, with minimum thresholds of 1,000+ \
        data points for management comparisons.</em>",
    ps_content: "PS: This report has also been sent to your email inbox and should arrive within 24 hours. \
        If you'd like to discuss it further, feel free to reach out. We're happy to arrange a \
        15-minute call at your convenience.",
    age_label: "Age",
    position_label: "Position",
    department_label: "Department",
    experience_label: "Experience",
    experience_unit: " year(s)",
    sector_label: "Sector",
    country_label: "Country",
    challenge_label: "Main Challenge",
    focus_label: "Development Focus",
};

static ZH: ReportCopy = ReportCopy {
    email_subject: "您的工作表现报告",
    greeting: "尊敬的人才招聘专员,",
    report_title: "📄 工作表现报告",
    global_title: "🌐 全球分析报告",
    creative_title: "创新方法建议",
    placeholder: "暂时无法生成内容。",
    data_source: "<strong>本报告中的见解由KataChat的AI系统分析生成，数据来源包括：</strong><br>\
        1. 我们专有的新加坡、马来西亚和台湾匿名职业资料数据库<br>\
        2. 来自可信的OpenAI研究和领导力趋势数据集的全球商业基准<br>\
        <em>所有数据均通过我们的AI模型进行处理，以识别具有统计意义的模式，同时严格遵守PDPA合规要求。\
        分析样本量各不相同，管理比较的最小阈值为1,000+数据点。</em>",
    ps_content: "PS: 此报告也已发送至您的电子邮箱，应在24小时内送达。\
        如果您想进一步讨论，请随时联系我们，我们很乐意为您安排15分钟的电话会议。",
    age_label: "年龄",
    position_label: "职位",
    department_label: "部门",
    experience_label: "工作经验",
    experience_unit: "年",
    sector_label: "行业",
    country_label: "国家",
    challenge_label: "主要挑战",
    focus_label: "发展重点",
};

static TW: ReportCopy = ReportCopy {
    email_subject: "您的工作表現報告",
    greeting: "尊敬的人才招聘專員,",
    report_title: "📄 工作表現報告",
    global_title: "🌐 全球分析報告",
    creative_title: "創新方法建議",
    placeholder: "暫時無法生成內容。",
    data_source: "<strong>本報告中的見解由KataChat的AI系統分析生成，數據來源包括：</strong><br>\
        1. 我們專有的新加坡、馬來西亞和台灣匿名職業資料數據庫<br>\
        2. 來自可信的OpenAI研究和領導力趨勢數據集的全球商業基準<br>\
        <em>所有數據均通過我們的AI模型進行處理，以識別具有統計意義的模式，同時嚴格遵守PDPA合規要求。\
        分析樣本量各不相同，管理比較的最小閾值為1,000+數據點。</em>",
    ps_content: "PS: 此報告也已發送至您的電子郵箱，應在24小時內送達。\
        如果您想進一步討論，請隨時聯繫我們，我們很樂意為您安排15分鐘的電話會議。",
    age_label: "年齡",
    position_label: "職位",
    department_label: "部門",
    experience_label: "工作經驗",
    experience_unit: "年",
    sector_label: "行業",
    country_label: "國家",
    challenge_label: "主要挑戰",
    focus_label: "發展重點",
};

impl ReportCopy {
    pub fn for_lang(lang: Lang) -> &'static ReportCopy {
        match lang {
            Lang::En => &EN,
            Lang::Zh => &ZH,
            Lang::Tw => &TW,
        }
    }
}

const NOTICE_STYLE: &str =
    "background-color:#e6f7ff; color:#00529B; padding:15px; border-left:4px solid #00529B; margin:20px 0;";

/// Model-generated sections of a report
#[derive(Debug, Clone, Default)]
pub struct ReportSections {
    /// Inserted verbatim under the global heading
    pub global: String,
    /// One `<p>` per non-blank line; the section is omitted when `None`
    pub creative: Option<String>,
}

/// Builds the localized HTML report
#[derive(Debug, Clone, Copy)]
pub struct ReportAssembler {
    lang: Lang,
}

impl ReportAssembler {
    pub fn new(lang: Lang) -> Self {
        Self { lang }
    }

    pub fn copy(&self) -> &'static ReportCopy {
        ReportCopy::for_lang(self.lang)
    }

    pub fn subject(&self) -> &'static str {
        self.copy().email_subject
    }

    pub fn assemble(
        &self,
        submission: &Submission,
        age: u32,
        metrics: &[Metric],
        sections: &ReportSections,
    ) -> String {
        let copy = self.copy();
        let mut html = String::new();

        let _ = write!(html, "<p>{}</p>", copy.greeting);
        html.push_str(&render_bars(metrics));
        html.push_str(&self.profile_block(submission, age));

        let _ = write!(
            html,
            "<h2 class=\"sub\">{}</h2>\n<div class=\"global\">\n{}</div>\n",
            copy.global_title, sections.global
        );

        if let Some(creative) = &sections.creative {
            let _ = write!(
                html,
                "<h3>{}</h3>\n<div class='creative'>\n",
                copy.creative_title
            );
            for line in creative.lines().map(str::trim).filter(|l| !l.is_empty()) {
                let _ = writeln!(html, "<p>{}</p>", line);
            }
            html.push_str("</div>\n");
        }

        html.push_str(&self.footer());
        html
    }

    fn profile_block(&self, s: &Submission, age: u32) -> String {
        let copy = self.copy();
        let department = if s.department.trim().is_empty() {
            "—".to_string()
        } else {
            escape_html(&s.department)
        };

        let rows = [
            (copy.age_label, age.to_string()),
            (copy.position_label, escape_html(&s.position)),
            (copy.department_label, department),
            (
                copy.experience_label,
                format!("{}{}", escape_html(&s.experience), copy.experience_unit),
            ),
            (copy.sector_label, escape_html(&s.sector)),
            (copy.country_label, escape_html(&s.country)),
            (copy.challenge_label, escape_html(&s.challenge)),
            (copy.focus_label, escape_html(&s.focus)),
        ];

        let mut html = String::from("<br>\n<br>\n<br>\n");
        let _ = writeln!(html, "<h2 class=\"sub\">{}</h2>", copy.report_title);
        html.push_str("<div class='narrative'>");
        for (label, value) in rows {
            let _ = write!(html, "• {}: {}<br>", label, value);
        }
        html.push_str("</div>\n");
        html
    }

    fn footer(&self) -> String {
        let copy = self.copy();
        format!(
            "<div style=\"{style}\">{source}</div><p style=\"{style}\"><strong>{ps}</strong></p>",
            style = NOTICE_STYLE,
            source = copy.data_source,
            ps = copy.ps_content,
        )
    }
}

/// Escape text for inclusion in HTML element content or quoted attributes.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

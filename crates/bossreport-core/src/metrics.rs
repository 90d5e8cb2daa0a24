use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt::Write;

use bossreport_narrative::NarrativeMetric;

/// Labels of the three comparison groups, in value order
pub const METRIC_LABELS: [&str; 3] = ["Segment", "Regional", "Global"];

const METRIC_STYLES: [(&str, &str); 3] = [
    ("Communication Efficiency", "#5E9CA0"),
    ("Leadership Readiness", "#FF9F40"),
    ("Task Completion Reliability", "#9966FF"),
];

/// Color for metrics whose title is not one of the built-in three
const FALLBACK_COLOR: &str = "#5E9CA0";

/// One performance metric as returned to the widget
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metric {
    pub title: String,
    pub labels: Vec<String>,
    pub values: Vec<u32>,
    /// Bar color in the HTML report; not part of the JSON payload
    #[serde(skip)]
    pub color: String,
}

impl Metric {
    pub fn new(title: impl Into<String>, values: [u32; 3], color: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            labels: METRIC_LABELS.iter().map(|l| l.to_string()).collect(),
            values: values.to_vec(),
            color: color.into(),
        }
    }
}

impl From<NarrativeMetric> for Metric {
    fn from(metric: NarrativeMetric) -> Self {
        let color = METRIC_STYLES
            .iter()
            .find(|(title, _)| title.eq_ignore_ascii_case(metric.title.trim()))
            .map(|(_, color)| *color)
            .unwrap_or(FALLBACK_COLOR);
        let labels = if metric.labels.is_empty() {
            METRIC_LABELS.iter().map(|l| l.to_string()).collect()
        } else {
            metric.labels
        };

        Self {
            title: metric.title,
            labels,
            values: metric.values,
            color: color.to_string(),
        }
    }
}

/// Inclusive percentage range for one comparison group
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricRange {
    min: u32,
    max: u32,
}

impl MetricRange {
    /// `None` unless `min <= max <= 100`.
    pub fn new(min: u32, max: u32) -> Option<Self> {
        (min <= max && max <= 100).then_some(Self { min, max })
    }

    pub fn min(&self) -> u32 {
        self.min
    }

    pub fn max(&self) -> u32 {
        self.max
    }

    pub fn contains(&self, value: u32) -> bool {
        (self.min..=self.max).contains(&value)
    }

    fn midpoint(&self) -> u32 {
        (self.min + self.max) / 2
    }

    fn sample<R: Rng>(&self, rng: &mut R) -> u32 {
        rng.gen_range(self.min..=self.max)
    }
}

/// How metric values are produced
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricMode {
    /// Uniform draw from each range, fresh per request
    #[default]
    Random,
    /// Range midpoints, for demos and screenshots
    Static,
}

/// Produces the three performance metrics of a report
#[derive(Debug, Clone)]
pub struct MetricSynthesizer {
    segment: MetricRange,
    regional: MetricRange,
    global: MetricRange,
    mode: MetricMode,
}

impl Default for MetricSynthesizer {
    fn default() -> Self {
        Self {
            segment: MetricRange { min: 60, max: 90 },
            regional: MetricRange { min: 55, max: 85 },
            global: MetricRange { min: 60, max: 88 },
            mode: MetricMode::Random,
        }
    }
}

impl MetricSynthesizer {
    pub fn new(
        segment: MetricRange,
        regional: MetricRange,
        global: MetricRange,
        mode: MetricMode,
    ) -> Self {
        Self {
            segment,
            regional,
            global,
            mode,
        }
    }

    pub fn with_mode(mut self, mode: MetricMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn mode(&self) -> MetricMode {
        self.mode
    }

    /// Ranges in label order (segment, regional, global)
    pub fn ranges(&self) -> [MetricRange; 3] {
        [self.segment, self.regional, self.global]
    }

    pub fn generate<R: Rng>(&self, rng: &mut R) -> Vec<Metric> {
        METRIC_STYLES
            .iter()
            .map(|(title, color)| {
                let values = match self.mode {
                    MetricMode::Random => self.ranges().map(|range| range.sample(rng)),
                    MetricMode::Static => self.ranges().map(|range| range.midpoint()),
                };
                Metric::new(*title, values, *color)
            })
            .collect()
    }
}

/// Inline-styled horizontal bars, one per value, grouped by metric.
pub fn render_bars(metrics: &[Metric]) -> String {
    let mut html = String::new();
    for metric in metrics {
        let _ = write!(html, "<strong>{}</strong><br>", metric.title);
        for value in &metric.values {
            let _ = write!(
                html,
                "<span style='display:inline-block;width:{v}%;height:12px;\
                 background:{color};margin-right:6px;border-radius:4px;'></span> {v}%<br>",
                v = value,
                color = metric.color,
            );
        }
        html.push_str("<br>");
    }
    html
}

//! # bossreport-core
//!
//! Everything that happens to one form submission between the HTTP layer and
//! the outside world.
//!
//! ## Key Types
//!
//! - [`Submission`] - The widget payload
//! - [`MetricSynthesizer`] - Pseudo-random performance triples
//! - [`ReportAssembler`] - Localized HTML report
//! - [`ReportPipeline`] - validate, age, metrics, narrative, assemble, mail

mod error;
mod metrics;
mod pipeline;
mod report;
mod submission;

pub use error::AnalyzeError;
pub use metrics::{render_bars, Metric, MetricMode, MetricRange, MetricSynthesizer, METRIC_LABELS};
pub use pipeline::{AnalysisResponse, PipelineOptions, ReportPipeline};
pub use report::{escape_html, ReportAssembler, ReportCopy, ReportSections};
pub use submission::{Submission, REQUIRED_FIELDS};

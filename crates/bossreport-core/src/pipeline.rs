use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use bossreport_age::{resolve_age, AgeResolution};
use bossreport_logging::{submitter_digest, LogEvent, Logger};
use bossreport_mailer::{MailReport, Mailer};
use bossreport_narrative::{
    NarrativeError, NarrativeMode, NarrativePrompts, NarrativeRequest, NarrativeRequester,
    StructuredNarrative,
};

use crate::metrics::{Metric, MetricSynthesizer};
use crate::report::{ReportAssembler, ReportSections};
use crate::{AnalyzeError, Submission};

/// JSON body returned to the widget
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResponse {
    pub metrics: Vec<Metric>,
    /// The full HTML report, identical to the mailed copy
    pub analysis: String,
}

#[derive(Debug, Clone, Default)]
pub struct PipelineOptions {
    pub mode: NarrativeMode,
    /// Reject supplied-but-unusable birth dates instead of reporting age 0
    pub strict_age: bool,
    pub metrics: MetricSynthesizer,
}

/// Runs one submission from validation to response
pub struct ReportPipeline {
    narrator: Arc<dyn NarrativeRequester>,
    mailer: Arc<dyn Mailer>,
    logger: Arc<Logger>,
    options: PipelineOptions,
}

impl ReportPipeline {
    pub fn new(
        narrator: Arc<dyn NarrativeRequester>,
        mailer: Arc<dyn Mailer>,
        logger: Arc<Logger>,
        options: PipelineOptions,
    ) -> Self {
        Self {
            narrator,
            mailer,
            logger,
            options,
        }
    }

    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    pub fn narrator_name(&self) -> &str {
        self.narrator.name()
    }

    pub fn mailer_name(&self) -> &str {
        self.mailer.name()
    }

    /// Produce the report for `submission`, with ages computed as of `today`.
    ///
    /// Narrative failures degrade to a placeholder. The mail send is spawned
    /// and never affects the result.
    pub async fn analyze(
        &self,
        submission: &Submission,
        today: NaiveDate,
    ) -> Result<AnalysisResponse, AnalyzeError> {
        let request_id = Uuid::new_v4();
        let started = Instant::now();
        let lang = submission.lang();

        self.logger.log(&LogEvent::RequestReceived {
            request_id,
            lang: lang.to_string(),
            submitter: submitter_digest(&submission.email),
        });

        if let Err(e) = submission.validate() {
            self.reject(request_id, &e);
            return Err(e);
        }

        let birth_date_input = submission.birth_date_input();
        let resolution = resolve_age(&birth_date_input, today);
        if self.options.strict_age && !birth_date_input.is_empty() {
            if let AgeResolution::Fallback { reason } = &resolution {
                let e = AnalyzeError::InvalidBirthDate(reason.clone());
                self.reject(request_id, &e);
                return Err(e);
            }
        }
        let age = resolution.age();
        self.logger.log(&LogEvent::AgeResolved {
            request_id,
            age,
            fallback: resolution.is_fallback(),
        });

        let assembler = ReportAssembler::new(lang);
        let placeholder = assembler.copy().placeholder;
        let profile = submission.profile(age);

        let (metrics, sections) = match self.options.mode {
            NarrativeMode::Prose => {
                let metrics = self.local_metrics();
                let global = self
                    .request(request_id, &NarrativePrompts::global_analysis(lang, &profile))
                    .await
                    .unwrap_or_else(|_| placeholder.to_string());
                let creative = self
                    .request(request_id, &NarrativePrompts::creative_approaches(lang, &profile))
                    .await
                    .unwrap_or_else(|_| placeholder.to_string());
                (
                    metrics,
                    ReportSections {
                        global,
                        creative: Some(creative),
                    },
                )
            }
            NarrativeMode::Structured => {
                let request = NarrativePrompts::structured_report(lang, &profile);
                match self.request(request_id, &request).await {
                    Ok(raw) => {
                        let parsed = StructuredNarrative::parse(&raw).map_err(|e| {
                            let e = AnalyzeError::MalformedNarrative(e);
                            self.logger.log(&LogEvent::NarrativeFailed {
                                request_id,
                                kind: request.kind.to_string(),
                                error: e.to_string(),
                            });
                            e
                        })?;
                        (
                            parsed.metrics.into_iter().map(Metric::from).collect(),
                            ReportSections {
                                global: parsed.analysis,
                                creative: None,
                            },
                        )
                    }
                    Err(_) => (
                        self.local_metrics(),
                        ReportSections {
                            global: placeholder.to_string(),
                            creative: None,
                        },
                    ),
                }
            }
        };

        let analysis = assembler.assemble(submission, age, &metrics, &sections);
        self.dispatch_mail(
            request_id,
            MailReport::new(assembler.subject(), analysis.clone()),
        );

        let duration_secs = started.elapsed().as_secs_f64();
        self.logger.log(&LogEvent::RequestCompleted {
            request_id,
            metrics: metrics.len(),
            analysis_chars: analysis.chars().count(),
            duration_secs,
        });
        info!(%request_id, %lang, age, duration_secs, "Report generated");

        Ok(AnalysisResponse { metrics, analysis })
    }

    fn reject(&self, request_id: Uuid, error: &AnalyzeError) {
        debug!(%request_id, %error, "Submission rejected");
        self.logger.log(&LogEvent::RequestRejected {
            request_id,
            reason: error.to_string(),
        });
    }

    fn local_metrics(&self) -> Vec<Metric> {
        let mut rng = rand::thread_rng();
        self.options.metrics.generate(&mut rng)
    }

    async fn request(
        &self,
        request_id: Uuid,
        request: &NarrativeRequest,
    ) -> Result<String, NarrativeError> {
        let started = Instant::now();
        debug!(
            %request_id,
            kind = %request.kind,
            prompt_len = request.prompt.len(),
            backend = self.narrator.name(),
            "Requesting narrative"
        );

        match self.narrator.request_narrative(request).await {
            Ok(text) => {
                self.logger.log(&LogEvent::NarrativeCompleted {
                    request_id,
                    kind: request.kind.to_string(),
                    duration_secs: started.elapsed().as_secs_f64(),
                    chars: text.chars().count(),
                });
                Ok(text)
            }
            Err(e) => {
                warn!(%request_id, kind = %request.kind, error = %e, "Narrative request failed, using placeholder");
                self.logger.log(&LogEvent::NarrativeFailed {
                    request_id,
                    kind: request.kind.to_string(),
                    error: e.to_string(),
                });
                Err(e)
            }
        }
    }

    fn dispatch_mail(&self, request_id: Uuid, report: MailReport) {
        let mailer = Arc::clone(&self.mailer);
        let logger = Arc::clone(&self.logger);

        logger.log(&LogEvent::MailQueued {
            request_id,
            mailer: mailer.name().to_string(),
        });

        tokio::spawn(async move {
            if let Err(e) = mailer.send_report(&report).await {
                error!(%request_id, error = %e, "Failed to send report");
                logger.log(&LogEvent::MailFailed {
                    request_id,
                    error: e.to_string(),
                });
            }
        });
    }
}

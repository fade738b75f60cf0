use crate::batch::batch;
use crate::completion::TextCompletion;
use crate::config::CheckerConfig;
use crate::error::Result;
use crate::judge::judge_batch;
use crate::report::{FinalReport, RunSummary, aggregate, collect_unknown_techniques};
use linkpurpose_scanner::{LinkRecord, PageRenderer, extract};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{info, warn};

/// Progress notifications emitted while a check runs
#[derive(Debug, Clone)]
pub enum CheckEvent {
    Rendering { url: String },
    Extracted { links: usize, batches: usize },
    BatchStarted { index: usize, total: usize, size: usize },
    BatchJudged { index: usize, total: usize, links: Vec<LinkRecord> },
    BatchFailed { index: usize, total: usize, error: String },
    Cancelled { remaining_batches: usize },
}

/// Callback for reporting check progress
pub type CheckProgressCallback = Arc<dyn Fn(&CheckEvent) + Send + Sync>;

pub struct CheckOutcome {
    pub report: FinalReport,
    pub summary: RunSummary,
}

/// Runs the judgment pipeline over the links of one page, one batch at a
/// time.
pub struct LinkChecker {
    completion: Arc<dyn TextCompletion>,
    config: CheckerConfig,
    progress_callback: Option<CheckProgressCallback>,
    cancel_flag: Option<Arc<AtomicBool>>,
}

impl LinkChecker {
    pub fn new(completion: Arc<dyn TextCompletion>, config: CheckerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            completion,
            config,
            progress_callback: None,
            cancel_flag: None,
        })
    }

    pub fn with_progress_callback(mut self, callback: CheckProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    /// When the flag is set the run stops before starting the next batch.
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel_flag = Some(flag);
        self
    }

    pub fn config(&self) -> &CheckerConfig {
        &self.config
    }

    fn emit(&self, event: CheckEvent) {
        if let Some(ref callback) = self.progress_callback {
            callback(&event);
        }
    }

    fn is_cancelled(&self) -> bool {
        self.cancel_flag
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::SeqCst))
    }

    /// Render `url`, extract its links and judge them.
    pub async fn check_page(&self, renderer: &dyn PageRenderer, url: &str) -> Result<CheckOutcome> {
        self.emit(CheckEvent::Rendering {
            url: url.to_string(),
        });
        let html = renderer.render(url).await?;
        let links = extract(&html)?;
        self.judge_links(links).await
    }

    pub async fn judge_links(&self, links: Vec<LinkRecord>) -> Result<CheckOutcome> {
        let links_extracted = links.len();
        let batches = batch(links, self.config.batch_size)?;
        let total = batches.len();

        info!("Judging {} links in {} batches", links_extracted, total);
        self.emit(CheckEvent::Extracted {
            links: links_extracted,
            batches: total,
        });

        let mut summary = RunSummary {
            links_extracted,
            batches_total: total,
            ..Default::default()
        };
        let mut judged_batches = Vec::with_capacity(total);

        for (index, current) in batches.iter().enumerate() {
            if self.is_cancelled() {
                warn!("Cancelled with {} batches left", total - index);
                summary.cancelled = true;
                self.emit(CheckEvent::Cancelled {
                    remaining_batches: total - index,
                });
                break;
            }

            if index > 0 && !self.config.batch_delay.is_zero() {
                tokio::time::sleep(self.config.batch_delay).await;
            }

            self.emit(CheckEvent::BatchStarted {
                index,
                total,
                size: current.len(),
            });

            match self.judge_with_retries(index, current).await {
                Ok(judged) => {
                    info!("Batch {}/{} judged", index + 1, total);
                    summary.batches_succeeded += 1;
                    self.emit(CheckEvent::BatchJudged {
                        index,
                        total,
                        links: judged.clone(),
                    });
                    judged_batches.push(judged);
                }
                Err(e) if e.is_batch_scoped() => {
                    warn!("Batch {}/{} dropped: {}", index + 1, total, e);
                    summary.batches_failed += 1;
                    self.emit(CheckEvent::BatchFailed {
                        index,
                        total,
                        error: e.to_string(),
                    });
                }
                Err(e) => return Err(e),
            }
        }

        let report = aggregate(judged_batches);
        summary.links_judged = report.links.len();
        summary.links_dropped = links_extracted - summary.links_judged;
        summary.unknown_techniques = collect_unknown_techniques(&report);

        for unknown in &summary.unknown_techniques {
            warn!(
                "Unknown success technique {:?} cited for {}",
                unknown.technique, unknown.xpath
            );
        }

        Ok(CheckOutcome { report, summary })
    }

    async fn judge_with_retries(
        &self,
        index: usize,
        current: &[LinkRecord],
    ) -> Result<Vec<LinkRecord>> {
        let mut attempt = 1;
        loop {
            match judge_batch(self.completion.as_ref(), current, &self.config).await {
                Ok(judged) => return Ok(judged),
                Err(e) if e.is_batch_scoped() && attempt < self.config.max_attempts => {
                    warn!(
                        "Batch {} attempt {}/{} failed: {}",
                        index + 1,
                        attempt,
                        self.config.max_attempts,
                        e
                    );
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

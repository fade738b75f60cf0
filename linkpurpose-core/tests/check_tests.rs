// End-to-end tests for the judgment pipeline using fake collaborators

use async_trait::async_trait;
use linkpurpose_core::error::Result as CheckResult;
use linkpurpose_core::{CheckError, CheckEvent, CheckerConfig, LinkChecker, TextCompletion};
use linkpurpose_scanner::error::Result as ScanResult;
use linkpurpose_scanner::{Judgment, PageRenderer, ScanError};
use serde_json::json;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

// ============================================================================
// Fakes
// ============================================================================

struct StaticRenderer {
    html: String,
}

#[async_trait]
impl PageRenderer for StaticRenderer {
    async fn render(&self, _url: &str) -> ScanResult<String> {
        Ok(self.html.clone())
    }
}

struct TimingOutRenderer;

#[async_trait]
impl PageRenderer for TimingOutRenderer {
    async fn render(&self, url: &str) -> ScanResult<String> {
        Err(ScanError::RenderTimeout {
            url: url.to_string(),
            timeout: Duration::from_secs(30),
        })
    }
}

enum Reply {
    Text(String),
    Fail,
    Hang,
}

/// Hands out scripted replies in order and records every prompt it sees.
struct ScriptedCompletion {
    replies: Mutex<VecDeque<Reply>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedCompletion {
    fn new(replies: Vec<Reply>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            prompts: Mutex::new(Vec::new()),
        })
    }

    fn prompt_count(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

#[async_trait]
impl TextCompletion for ScriptedCompletion {
    async fn complete(&self, prompt: &str) -> CheckResult<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        let reply = self.replies.lock().unwrap().pop_front();
        match reply {
            Some(Reply::Text(text)) => Ok(text),
            Some(Reply::Fail) | None => Err(CheckError::Completion("scripted failure".to_string())),
            Some(Reply::Hang) => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Err(CheckError::Completion("woke up".to_string()))
            }
        }
    }
}

fn verdicts(count: usize, judgment: &str) -> Reply {
    let links: Vec<_> = (0..count)
        .map(|i| {
            json!({
                "link_text": format!("Link {}", i),
                "analysis": {
                    "judgment": judgment,
                    "reason": "clear from the link text",
                    "success_techniques": ["G91: Providing link text that describes the purpose of a link"]
                }
            })
        })
        .collect();
    Reply::Text(format!(
        "Here is the evaluation:\n```json\n{}\n```",
        json!({ "links": links })
    ))
}

fn page_with_links(count: usize) -> String {
    let mut html = String::from("<html><body><h1>Index</h1><ul>");
    for i in 1..=count {
        html.push_str(&format!(r#"<li><a href="/page{}">Page {}</a></li>"#, i, i));
    }
    html.push_str("</ul></body></html>");
    html
}

fn fast_config() -> CheckerConfig {
    CheckerConfig {
        batch_delay: Duration::ZERO,
        ..Default::default()
    }
}

// ============================================================================
// Scenarios
// ============================================================================

#[tokio::test]
async fn test_malformed_second_batch_is_dropped() {
    let renderer = StaticRenderer {
        html: page_with_links(12),
    };
    let completion = ScriptedCompletion::new(vec![
        verdicts(10, "OK"),
        Reply::Text("Sorry, I cannot help with that.".to_string()),
    ]);

    let checker = LinkChecker::new(completion.clone(), fast_config()).unwrap();
    let outcome = checker
        .check_page(&renderer, "https://example.com/")
        .await
        .unwrap();

    assert_eq!(outcome.report.links.len(), 10);
    assert!(outcome.report.links.iter().all(|l| l.analysis.is_some()));
    assert_eq!(outcome.report.links[0].url, "/page1");
    assert_eq!(outcome.report.links[9].url, "/page10");

    assert_eq!(outcome.summary.links_extracted, 12);
    assert_eq!(outcome.summary.batches_total, 2);
    assert_eq!(outcome.summary.batches_succeeded, 1);
    assert_eq!(outcome.summary.batches_failed, 1);
    assert_eq!(outcome.summary.links_judged, 10);
    assert_eq!(outcome.summary.links_dropped, 2);
    assert_eq!(completion.prompt_count(), 2);
}

#[tokio::test]
async fn test_failed_batch_does_not_affect_later_batches() {
    let renderer = StaticRenderer {
        html: page_with_links(25),
    };
    let completion = ScriptedCompletion::new(vec![
        verdicts(10, "OK"),
        Reply::Text("no json here".to_string()),
        verdicts(5, "NG"),
    ]);

    let checker = LinkChecker::new(completion, fast_config()).unwrap();
    let outcome = checker.check_page(&renderer, "https://example.com/").await.unwrap();

    let urls: Vec<&str> = outcome.report.links.iter().map(|l| l.url.as_str()).collect();
    assert_eq!(urls.len(), 15);
    assert_eq!(urls[10], "/page21");
    assert_eq!(
        outcome.report.links[14].analysis.as_ref().unwrap().judgment,
        Judgment::Ng
    );
}

#[tokio::test]
async fn test_shape_error_drops_batch() {
    let completion = ScriptedCompletion::new(vec![verdicts(2, "OK")]);
    let checker = LinkChecker::new(completion, fast_config()).unwrap();

    let links = linkpurpose_scanner::extract(&page_with_links(3)).unwrap();
    let outcome = checker.judge_links(links).await.unwrap();

    assert!(outcome.report.links.is_empty());
    assert_eq!(outcome.summary.batches_failed, 1);
    assert_eq!(outcome.summary.links_dropped, 3);
}

#[tokio::test]
async fn test_records_keep_extracted_fields() {
    let renderer = StaticRenderer {
        html: page_with_links(2),
    };
    let completion = ScriptedCompletion::new(vec![verdicts(2, "OK")]);
    let checker = LinkChecker::new(completion.clone(), fast_config()).unwrap();

    let outcome = checker.check_page(&renderer, "https://example.com/").await.unwrap();
    let first = &outcome.report.links[0];
    assert_eq!(first.xpath, "//ul/li[1]/a");
    assert_eq!(first.link_text, "Page 1");
    assert_eq!(first.context.section_heading.as_deref(), Some("Index"));

    let prompts = completion.prompts.lock().unwrap();
    assert!(prompts[0].contains("\"xpath\": \"//ul/li[2]/a\""));
}

#[tokio::test]
async fn test_unknown_techniques_are_flagged() {
    let reply = json!({
        "links": [{
            "analysis": {
                "judgment": "OK",
                "reason": "fine",
                "success_techniques": ["H30: anchor text", "Z1: invented"]
            }
        }]
    });
    let completion = ScriptedCompletion::new(vec![Reply::Text(reply.to_string())]);
    let checker = LinkChecker::new(completion, fast_config()).unwrap();

    let links = linkpurpose_scanner::extract(&page_with_links(1)).unwrap();
    let outcome = checker.judge_links(links).await.unwrap();

    assert_eq!(outcome.report.links.len(), 1);
    assert_eq!(outcome.summary.unknown_techniques.len(), 1);
    assert_eq!(outcome.summary.unknown_techniques[0].technique, "Z1: invented");
    assert_eq!(outcome.summary.unknown_techniques[0].xpath, "//ul/li/a");
}

#[tokio::test]
async fn test_empty_page_produces_empty_report() {
    let renderer = StaticRenderer {
        html: "<html><body><p>No links</p></body></html>".to_string(),
    };
    let completion = ScriptedCompletion::new(vec![]);
    let checker = LinkChecker::new(completion.clone(), fast_config()).unwrap();

    let outcome = checker.check_page(&renderer, "https://example.com/").await.unwrap();
    assert!(outcome.report.links.is_empty());
    assert_eq!(outcome.summary.batches_total, 0);
    assert_eq!(completion.prompt_count(), 0);
}

// ============================================================================
// Fatal errors
// ============================================================================

#[tokio::test]
async fn test_render_timeout_is_fatal() {
    let completion = ScriptedCompletion::new(vec![]);
    let checker = LinkChecker::new(completion, fast_config()).unwrap();

    let err = checker
        .check_page(&TimingOutRenderer, "https://example.com/")
        .await
        .err()
        .unwrap();
    assert!(matches!(err, CheckError::Scan(ScanError::RenderTimeout { .. })));
    assert!(!err.is_batch_scoped());
}

#[tokio::test]
async fn test_empty_render_is_malformed_document() {
    let renderer = StaticRenderer {
        html: String::new(),
    };
    let checker = LinkChecker::new(ScriptedCompletion::new(vec![]), fast_config()).unwrap();

    let err = checker
        .check_page(&renderer, "https://example.com/")
        .await
        .err()
        .unwrap();
    assert!(matches!(err, CheckError::Scan(ScanError::MalformedDocument(_))));
}

#[test]
fn test_invalid_batch_size_is_rejected_at_construction() {
    let config = CheckerConfig {
        batch_size: 0,
        ..Default::default()
    };
    let result = LinkChecker::new(ScriptedCompletion::new(vec![]), config);
    assert!(matches!(result, Err(CheckError::InvalidConfiguration(_))));
}

// ============================================================================
// Timing, retries and cancellation
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_pause_between_batches() {
    let completion = ScriptedCompletion::new(vec![
        verdicts(10, "OK"),
        verdicts(10, "OK"),
        verdicts(3, "OK"),
    ]);
    let config = CheckerConfig {
        batch_delay: Duration::from_secs(1),
        ..Default::default()
    };
    let checker = LinkChecker::new(completion, config).unwrap();
    let links = linkpurpose_scanner::extract(&page_with_links(23)).unwrap();

    let started = tokio::time::Instant::now();
    let outcome = checker.judge_links(links).await.unwrap();

    assert_eq!(outcome.report.links.len(), 23);
    assert!(started.elapsed() >= Duration::from_secs(2));
    assert!(started.elapsed() < Duration::from_secs(3));
}

#[tokio::test(start_paused = true)]
async fn test_completion_timeout_drops_only_that_batch() {
    let completion = ScriptedCompletion::new(vec![Reply::Hang, verdicts(1, "OK")]);
    let config = CheckerConfig {
        batch_delay: Duration::ZERO,
        completion_timeout: Duration::from_secs(5),
        ..Default::default()
    };
    let checker = LinkChecker::new(completion, config).unwrap();
    let links = linkpurpose_scanner::extract(&page_with_links(11)).unwrap();

    let outcome = checker.judge_links(links).await.unwrap();
    assert_eq!(outcome.report.links.len(), 1);
    assert_eq!(outcome.report.links[0].url, "/page11");
    assert_eq!(outcome.summary.batches_failed, 1);
}

#[tokio::test]
async fn test_retry_recovers_bad_response() {
    let completion = ScriptedCompletion::new(vec![Reply::Fail, verdicts(4, "OK")]);
    let config = CheckerConfig {
        batch_delay: Duration::ZERO,
        max_attempts: 2,
        ..Default::default()
    };
    let checker = LinkChecker::new(completion.clone(), config).unwrap();
    let links = linkpurpose_scanner::extract(&page_with_links(4)).unwrap();

    let outcome = checker.judge_links(links).await.unwrap();
    assert_eq!(outcome.report.links.len(), 4);
    assert_eq!(completion.prompt_count(), 2);

    let prompts = completion.prompts.lock().unwrap();
    assert_eq!(prompts[0], prompts[1], "retries must resend the same prompt");
}

#[tokio::test]
async fn test_without_retries_a_bad_response_is_final() {
    let completion = ScriptedCompletion::new(vec![Reply::Fail, verdicts(4, "OK")]);
    let checker = LinkChecker::new(completion.clone(), fast_config()).unwrap();
    let links = linkpurpose_scanner::extract(&page_with_links(4)).unwrap();

    let outcome = checker.judge_links(links).await.unwrap();
    assert!(outcome.report.links.is_empty());
    assert_eq!(completion.prompt_count(), 1);
}

#[tokio::test]
async fn test_cancel_stops_before_next_batch() {
    let completion = ScriptedCompletion::new(vec![verdicts(10, "OK"), verdicts(10, "OK")]);
    let cancel = Arc::new(AtomicBool::new(false));
    let cancel_on_first = cancel.clone();

    let events = Arc::new(Mutex::new(Vec::new()));
    let events_clone = events.clone();

    let checker = LinkChecker::new(completion.clone(), fast_config())
        .unwrap()
        .with_cancel_flag(cancel)
        .with_progress_callback(Arc::new(move |event: &CheckEvent| {
            if let CheckEvent::BatchJudged { .. } = event {
                cancel_on_first.store(true, Ordering::SeqCst);
            }
            events_clone.lock().unwrap().push(format!("{:?}", event));
        }));

    let links = linkpurpose_scanner::extract(&page_with_links(20)).unwrap();
    let outcome = checker.judge_links(links).await.unwrap();

    assert_eq!(outcome.report.links.len(), 10);
    assert!(outcome.summary.cancelled);
    assert_eq!(outcome.summary.links_dropped, 10);
    assert_eq!(completion.prompt_count(), 1);

    let events = events.lock().unwrap();
    assert!(events.last().unwrap().starts_with("Cancelled"));
}

// Final report assembly, summary and persistence

use crate::catalog::unknown_techniques;
use linkpurpose_scanner::{Judgment, LinkRecord};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// The artifact handed to persistence: judged links in page order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FinalReport {
    pub links: Vec<LinkRecord>,
}

/// A cited technique that is not in the published catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnknownTechnique {
    pub xpath: String,
    pub technique: String,
}

/// Counts that make dropped links visible instead of silently missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub links_extracted: usize,
    pub batches_total: usize,
    pub batches_succeeded: usize,
    pub batches_failed: usize,
    pub links_judged: usize,
    pub links_dropped: usize,
    pub cancelled: bool,
    pub unknown_techniques: Vec<UnknownTechnique>,
}

impl RunSummary {
    pub fn judgment_counts(report: &FinalReport) -> (usize, usize, usize) {
        let mut ok = 0;
        let mut ng = 0;
        let mut other = 0;
        for analysis in report.links.iter().filter_map(|l| l.analysis.as_ref()) {
            match analysis.judgment {
                Judgment::Ok => ok += 1,
                Judgment::Ng => ng += 1,
                Judgment::Other(_) => other += 1,
            }
        }
        (ok, ng, other)
    }
}

/// Concatenate judged batches in submission order.
pub fn aggregate(judged_batches: Vec<Vec<LinkRecord>>) -> FinalReport {
    FinalReport {
        links: judged_batches.into_iter().flatten().collect(),
    }
}

/// Collect every cited technique outside the catalog, tagged with the link
/// that cited it.
pub fn collect_unknown_techniques(report: &FinalReport) -> Vec<UnknownTechnique> {
    report
        .links
        .iter()
        .flat_map(|record| {
            unknown_techniques(record)
                .into_iter()
                .map(|technique| UnknownTechnique {
                    xpath: record.xpath.clone(),
                    technique,
                })
        })
        .collect()
}

/// Output file name for a checked URL: scheme dropped, `/ : ? & = space`
/// replaced by `_`, trailing underscores removed, `.txt` appended.
pub fn report_filename(url: &str) -> String {
    let stripped = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .unwrap_or(url);

    let replaced: String = stripped
        .chars()
        .map(|c| match c {
            '/' | ':' | '?' | '&' | '=' | ' ' => '_',
            other => other,
        })
        .collect();

    format!("{}.txt", replaced.trim_end_matches('_'))
}

pub fn generate_json_report(report: &FinalReport) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(report)
}

pub fn save_report(content: &str, path: &Path) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(content.as_bytes())?;
    Ok(())
}

/// `・<first 30 chars of link text>... => OK`
pub fn judgment_line(record: &LinkRecord) -> String {
    let prefix: String = record.link_text.chars().take(30).collect();
    let judgment = record
        .analysis
        .as_ref()
        .map(|a| a.judgment.as_str())
        .unwrap_or("-");
    format!("・{}... => {}", prefix, judgment)
}

pub fn generate_summary_text(summary: &RunSummary, report: &FinalReport) -> String {
    let (ok, ng, other) = RunSummary::judgment_counts(report);

    let mut text = String::new();
    text.push_str("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n\n");
    text.push_str("# Summary:\n");
    text.push_str(&format!("  Links extracted: {}\n", summary.links_extracted));
    text.push_str(&format!(
        "  Batches: {} total, {} succeeded, {} failed\n",
        summary.batches_total, summary.batches_succeeded, summary.batches_failed
    ));
    text.push_str(&format!("  Links judged: {}\n", summary.links_judged));
    text.push_str(&format!("  Links dropped: {}\n", summary.links_dropped));
    text.push_str(&format!("  Verdicts: {} OK, {} NG", ok, ng));
    if other > 0 {
        text.push_str(&format!(", {} other", other));
    }
    text.push('\n');

    if summary.cancelled {
        text.push_str("  Run was cancelled before all batches were judged\n");
    }

    if !summary.unknown_techniques.is_empty() {
        text.push_str("\n# Unknown success techniques:\n");
        for unknown in &summary.unknown_techniques {
            text.push_str(&format!("  {}  {}\n", unknown.xpath, unknown.technique));
        }
    }

    text.push_str("\n━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n");
    text
}

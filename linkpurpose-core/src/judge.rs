use crate::completion::TextCompletion;
use crate::config::CheckerConfig;
use crate::error::{CheckError, Result};
use crate::prompt::build_prompt;
use crate::recovery::recover_json;
use linkpurpose_scanner::{Analysis, LinkRecord};
use serde_json::Value;
use tracing::{debug, warn};

/// Judge one batch: prompt, complete, recover, validate, merge.
///
/// Either every record comes back with an analysis or the batch fails as a
/// whole.
pub async fn judge_batch(
    completion: &dyn TextCompletion,
    batch: &[LinkRecord],
    config: &CheckerConfig,
) -> Result<Vec<LinkRecord>> {
    let prompt = build_prompt(batch, config.language)?;

    let raw = tokio::time::timeout(config.completion_timeout, completion.complete(&prompt))
        .await
        .map_err(|_| CheckError::CompletionTimeout(config.completion_timeout))??;
    debug!("Raw model response:\n{}", raw);

    let response = recover_json(&raw)?;
    merge_analysis(batch, &response)
}

/// Pair each returned analysis with the input record at the same position.
pub fn merge_analysis(batch: &[LinkRecord], response: &Value) -> Result<Vec<LinkRecord>> {
    let links = response
        .get("links")
        .and_then(Value::as_array)
        .ok_or_else(|| CheckError::ResponseShape("response has no `links` array".to_string()))?;

    if links.len() != batch.len() {
        return Err(CheckError::ResponseShape(format!(
            "expected {} links, got {}",
            batch.len(),
            links.len()
        )));
    }

    batch
        .iter()
        .zip(links)
        .enumerate()
        .map(|(idx, (record, entry))| {
            let analysis = entry.get("analysis").ok_or_else(|| {
                CheckError::ResponseShape(format!("link {} has no `analysis`", idx))
            })?;
            let analysis: Analysis = serde_json::from_value(analysis.clone()).map_err(|e| {
                CheckError::ResponseShape(format!("link {} has an invalid `analysis`: {}", idx, e))
            })?;

            if let Some(xpath) = entry.get("xpath").and_then(Value::as_str)
                && xpath != record.xpath
            {
                warn!(
                    "Link {} came back as {} but was sent as {}; pairing by position",
                    idx, xpath, record.xpath
                );
            }

            let mut judged = record.clone();
            judged.analysis = Some(analysis);
            Ok(judged)
        })
        .collect()
}

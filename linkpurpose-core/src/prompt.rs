//! Prompt construction.
//!
//! The prompt is a fixed template per language. The only variable part is
//! the JSON payload of the batch, so the same batch always yields the same
//! prompt.

use crate::catalog::TECHNIQUES;
use crate::config::Language;
use crate::error::Result;
use linkpurpose_scanner::LinkRecord;
use serde::Serialize;

const FORMAT_EXAMPLE_JA: &str = r#"{
  "links": [
    {
      "xpath": "//nav/ul/li[1]/a",
      "link_text": "会社概要",
      "url": "/about",
      "context": {
        "parent_text": "企業情報 会社概要",
        "section_heading": "企業情報",
        "aria_label": null,
        "aria_labelledby": null,
        "title": null
      },
      "analysis": {
        "judgment": "OK",
        "reason": "リンクテキスト単独で目的が明確",
        "success_techniques": [
          "G91: リンクの目的を説明したリンクテキストを提供する",
          "H30: a要素のリンクの目的を説明するリンクテキストを提供する"
        ]
      }
    }
  ]
}"#;

const FORMAT_EXAMPLE_EN: &str = r#"{
  "links": [
    {
      "xpath": "//nav/ul/li[1]/a",
      "link_text": "About our company",
      "url": "/about",
      "context": {
        "parent_text": "Corporate information About our company",
        "section_heading": "Corporate information",
        "aria_label": null,
        "aria_labelledby": null,
        "title": null
      },
      "analysis": {
        "judgment": "OK",
        "reason": "The link text alone makes the purpose clear",
        "success_techniques": [
          "G91: Providing link text that describes the purpose of a link",
          "H30: Providing link text that describes the purpose of a link for anchor elements"
        ]
      }
    }
  ]
}"#;

/// The worked example embedded in every prompt.
pub fn format_example(language: Language) -> &'static str {
    match language {
        Language::Japanese => FORMAT_EXAMPLE_JA,
        Language::English => FORMAT_EXAMPLE_EN,
    }
}

#[derive(Serialize)]
struct BatchPayload {
    links: Vec<LinkRecord>,
}

/// Canonical JSON payload for a batch: `{"links": [...]}` with any earlier
/// verdicts stripped. Field order follows the record definition.
pub fn batch_payload(batch: &[LinkRecord]) -> Result<String> {
    let payload = BatchPayload {
        links: batch.iter().map(LinkRecord::without_analysis).collect(),
    };
    Ok(serde_json::to_string_pretty(&payload)?)
}

fn technique_list(language: Language) -> String {
    TECHNIQUES
        .iter()
        .map(|t| {
            let title = match language {
                Language::Japanese => t.title_ja,
                Language::English => t.title_en,
            };
            format!("- {}: {}", t.id, title)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn build_prompt(batch: &[LinkRecord], language: Language) -> Result<String> {
    let payload = batch_payload(batch)?;
    let techniques = technique_list(language);
    let example = format_example(language);

    let prompt = match language {
        Language::Japanese => format!(
            "# あなたは日本語を使うWebアクセシビリティテストのプロです。以下のリンク情報について、WCAG2.4.4で判定を行い、各リンクの目的の明確さを評価するタスクを持っています。

# 達成基準 2.4.4 の判定基準：
リンクの目的が以下のいずれかの方法で理解できること：
1. リンクのテキスト単独で判断可能
2. プログラムによる解釈が可能なリンクのコンテキストから判断可能

# 達成方法のリスト：
{techniques}

# 以下のフォーマット例を参考に、各リンクを解析し、その評価結果をJSON形式で出力してください。

フォーマット例###
{example}

リンク情報###
{payload}"
        ),
        Language::English => format!(
            "# You are an expert web accessibility tester. For the links below, apply WCAG 2.4.4 and evaluate how clearly the purpose of each link can be determined.

# Success criterion 2.4.4 is met when the purpose of a link can be understood by either:
1. the link text alone
2. the link text together with its programmatically determined link context

# Sufficient techniques:
{techniques}

# Following the format example, analyse every link and output the results as JSON. Return exactly one entry per input link, in the same order, and use \"OK\" or \"NG\" as the judgment.

Format example###
{example}

Link information###
{payload}"
        ),
    };

    Ok(prompt)
}

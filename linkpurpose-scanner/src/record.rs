use serde::{Deserialize, Serialize};
use std::fmt;

/// One hyperlink found in a rendered page, plus the context an assessor
/// needs to judge whether its purpose is clear.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkRecord {
    pub element_html: String,
    pub xpath: String,
    pub link_text: String,
    pub url: String,
    pub context: LinkContext,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis: Option<Analysis>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LinkContext {
    pub parent_text: String,
    pub section_heading: Option<String>,
    pub aria_label: Option<String>,
    pub aria_labelledby: Option<String>,
    pub title: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    pub judgment: Judgment,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub success_techniques: Vec<String>,
}

/// Verdict on a single link. Anything the model answers outside OK/NG is
/// kept verbatim rather than rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Judgment {
    Ok,
    Ng,
    Other(String),
}

impl Judgment {
    pub fn as_str(&self) -> &str {
        match self {
            Judgment::Ok => "OK",
            Judgment::Ng => "NG",
            Judgment::Other(value) => value.as_str(),
        }
    }
}

impl From<String> for Judgment {
    fn from(value: String) -> Self {
        match value.trim().to_uppercase().as_str() {
            "OK" => Judgment::Ok,
            "NG" => Judgment::Ng,
            _ => Judgment::Other(value),
        }
    }
}

impl From<Judgment> for String {
    fn from(value: Judgment) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for Judgment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl LinkRecord {
    pub fn is_judged(&self) -> bool {
        self.analysis.is_some()
    }

    /// Copy of this record with any earlier verdict removed, as sent to the model.
    pub fn without_analysis(&self) -> Self {
        Self {
            analysis: None,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> LinkRecord {
        LinkRecord {
            element_html: r#"<a href="/about">About</a>"#.to_string(),
            xpath: "//nav/ul/li[1]/a".to_string(),
            link_text: "About".to_string(),
            url: "/about".to_string(),
            context: LinkContext {
                parent_text: "Company About".to_string(),
                section_heading: Some("Company".to_string()),
                ..Default::default()
            },
            analysis: None,
        }
    }

    #[test]
    fn test_unjudged_record_omits_analysis_key() {
        let value = serde_json::to_value(sample()).unwrap();
        assert!(value.get("analysis").is_none());
        assert_eq!(value["context"]["aria_label"], serde_json::Value::Null);
    }

    #[test]
    fn test_judgment_parses_case_insensitively() {
        let analysis: Analysis = serde_json::from_str(
            r#"{"judgment": "ng", "reason": "ambiguous", "success_techniques": []}"#,
        )
        .unwrap();
        assert_eq!(analysis.judgment, Judgment::Ng);
        assert_eq!(serde_json::to_value(&analysis.judgment).unwrap(), "NG");
    }

    #[test]
    fn test_unknown_judgment_is_preserved() {
        let judgment = Judgment::from("NEEDS REVIEW".to_string());
        assert_eq!(judgment, Judgment::Other("NEEDS REVIEW".to_string()));
        assert_eq!(judgment.to_string(), "NEEDS REVIEW");
    }

    #[test]
    fn test_without_analysis_strips_verdict() {
        let mut record = sample();
        record.analysis = Some(Analysis {
            judgment: Judgment::Ok,
            reason: "clear".to_string(),
            success_techniques: vec!["G91".to_string()],
        });
        assert!(record.is_judged());
        assert!(!record.without_analysis().is_judged());
    }
}

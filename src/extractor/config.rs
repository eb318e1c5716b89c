use serde::{Deserialize, Serialize};

/// Tuning knobs for the main-content heuristic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Paragraphs shorter than this (in characters) do not vote for a container (default: 25)
    pub min_paragraph_chars: usize,

    /// Extracted bodies shorter than this are treated as "no article found" (default: 140)
    pub min_content_chars: usize,

    /// Elements that never contribute text (navigation, chrome, scripts)
    pub boilerplate_tags: Vec<String>,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            min_paragraph_chars: 25,
            min_content_chars: 140,
            boilerplate_tags: [
                "nav", "header", "footer", "aside", "form", "script", "style", "noscript",
                "iframe", "svg", "button", "select", "template",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
        }
    }
}

impl ExtractorConfig {
    pub fn is_boilerplate_tag(&self, tag: &str) -> bool {
        self.boilerplate_tags
            .iter()
            .any(|t| t.eq_ignore_ascii_case(tag))
    }

    /// Accept short pages too; used for link-blog style sources.
    pub fn lenient() -> Self {
        Self {
            min_paragraph_chars: 10,
            min_content_chars: 1,
            ..Default::default()
        }
    }
}

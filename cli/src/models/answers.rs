use serde::{Deserialize, Serialize};

/// Operator responses recognized by the interactive prompts.
///
/// Matching is exact against the configured strings; the YTD answer is
/// lower-cased before comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnswerSets {
    pub open_file: Vec<String>,
    pub write: Vec<String>,
    pub positive: Vec<String>,
    pub negative: Vec<String>,
}

impl Default for AnswerSets {
    fn default() -> Self {
        Self {
            open_file: vec!["F".to_string(), "f".to_string()],
            write: vec!["W".to_string(), "w".to_string()],
            positive: vec!["y".to_string(), "yes".to_string()],
            negative: vec!["n".to_string(), "no".to_string()],
        }
    }
}

impl AnswerSets {
    pub fn is_open_file(&self, answer: &str) -> bool {
        self.open_file.iter().any(|a| a == answer)
    }

    pub fn is_write(&self, answer: &str) -> bool {
        self.write.iter().any(|a| a == answer)
    }

    pub fn is_positive(&self, answer: &str) -> bool {
        self.positive.iter().any(|a| a == answer)
    }

    pub fn is_negative(&self, answer: &str) -> bool {
        self.negative.iter().any(|a| a == answer)
    }
}

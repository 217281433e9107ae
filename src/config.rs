use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::engine::{EitherAttribution, HintShowType, TestDirection};
use crate::kana::KanaCategory;

pub const MIN_ANSWERS: u8 = 2;
pub const MAX_ANSWERS: u8 = 12;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_test_direction")]
    pub test_direction: TestDirection,
    #[serde(default = "default_maximum_answers")]
    pub maximum_answers: u8,
    #[serde(default)]
    pub similar_answers_only: bool,
    #[serde(default)]
    pub hint_show_type: HintShowType,
    #[serde(default)]
    pub answer_timeout_ms: u64,
    #[serde(default = "default_error_highlight_ms")]
    pub error_highlight_ms: u64,
    #[serde(default)]
    pub roomaji_either_attribution: EitherAttribution,
    #[serde(default = "default_enabled_categories")]
    pub enabled_categories: Vec<KanaCategory>,
}

fn default_test_direction() -> TestDirection {
    TestDirection::HiraganaToRoomaji
}
fn default_maximum_answers() -> u8 {
    7
}
fn default_error_highlight_ms() -> u64 {
    1500
}
fn default_enabled_categories() -> Vec<KanaCategory> {
    KanaCategory::ALL.to_vec()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            test_direction: default_test_direction(),
            maximum_answers: default_maximum_answers(),
            similar_answers_only: false,
            hint_show_type: HintShowType::NONE,
            answer_timeout_ms: 0,
            error_highlight_ms: default_error_highlight_ms(),
            roomaji_either_attribution: EitherAttribution::default(),
            enabled_categories: default_enabled_categories(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = fs::read_to_string(path)?;
            let mut config: Config = toml::from_str(&content)?;
            config.normalize();
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("kanadrill")
            .join("config.toml")
    }

    /// Clamp values a hand-edited file may have pushed out of range.
    pub fn normalize(&mut self) {
        self.maximum_answers = self.maximum_answers.clamp(MIN_ANSWERS, MAX_ANSWERS);
        if self.enabled_categories.is_empty() {
            self.enabled_categories = default_enabled_categories();
        }
        let mut seen = Vec::with_capacity(self.enabled_categories.len());
        self.enabled_categories.retain(|c| {
            let first = !seen.contains(c);
            seen.push(*c);
            first
        });
    }

    pub fn answer_count(&self) -> usize {
        self.maximum_answers as usize
    }

    pub fn answer_timeout(&self) -> Option<Duration> {
        (self.answer_timeout_ms > 0).then(|| Duration::from_millis(self.answer_timeout_ms))
    }

    pub fn error_highlight(&self) -> Duration {
        Duration::from_millis(self.error_highlight_ms)
    }

    pub fn toggle_category(&mut self, category: KanaCategory) {
        if let Some(pos) = self.enabled_categories.iter().position(|&c| c == category) {
            if self.enabled_categories.len() > 1 {
                self.enabled_categories.remove(pos);
            }
        } else {
            self.enabled_categories.push(category);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_serde_defaults_from_empty() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.maximum_answers, 7);
        assert_eq!(config.error_highlight_ms, 1500);
        assert!(config.hint_show_type.is_empty());
        assert_eq!(config.enabled_categories.len(), 6);
    }

    #[test]
    fn test_config_parses_named_values() {
        let toml_str = r#"
test_direction = "roomaji-to-hiragana-or-katakana"
maximum_answers = 5
similar_answers_only = true
hint_show_type = 3
roomaji_either_attribution = "answer-script"
enabled_categories = ["base", "digraph-voiced"]
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.test_direction, TestDirection::RoomajiToHiraganaOrKatakana);
        assert_eq!(config.answer_count(), 5);
        assert!(config.similar_answers_only);
        assert!(config.hint_show_type.contains(HintShowType::SHOW_ON_WRONG_ANSWER));
        assert!(config.hint_show_type.contains(HintShowType::SHOW_ON_RIGHT_ANSWER));
        assert_eq!(config.roomaji_either_attribution, EitherAttribution::AnswerScript);
        assert_eq!(
            config.enabled_categories,
            vec![KanaCategory::Base, KanaCategory::DigraphVoiced]
        );
    }

    #[test]
    fn test_unknown_direction_is_rejected() {
        assert!(toml::from_str::<Config>("test_direction = \"upside-down\"").is_err());
    }

    #[test]
    fn test_unknown_hint_bits_are_rejected() {
        assert!(toml::from_str::<Config>("hint_show_type = 64").is_err());
    }

    #[test]
    fn test_normalize_clamps() {
        let mut config = Config {
            maximum_answers: 200,
            enabled_categories: Vec::new(),
            ..Config::default()
        };
        config.normalize();
        assert_eq!(config.maximum_answers, MAX_ANSWERS);
        assert_eq!(config.enabled_categories.len(), 6);
    }

    #[test]
    fn test_timeout_zero_disables() {
        let mut config = Config::default();
        assert_eq!(config.answer_timeout(), None);
        config.answer_timeout_ms = 2500;
        assert_eq!(config.answer_timeout(), Some(Duration::from_millis(2500)));
    }

    #[test]
    fn test_toggle_category_keeps_one_enabled() {
        let mut config = Config {
            enabled_categories: vec![KanaCategory::Base],
            ..Config::default()
        };
        config.toggle_category(KanaCategory::Base);
        assert_eq!(config.enabled_categories, vec![KanaCategory::Base]);
        config.toggle_category(KanaCategory::Digraph);
        assert_eq!(config.enabled_categories.len(), 2);
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let config = Config {
            test_direction: TestDirection::KatakanaToHiragana,
            hint_show_type: HintShowType::SHOW_ON_OTHER_ANSWERS,
            ..Config::default()
        };
        config.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_missing_file_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, Config::default());
    }
}

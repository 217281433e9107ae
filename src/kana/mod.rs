pub mod catalog;

use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

pub use catalog::CATALOG;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum KanaCategory {
    Base,
    BaseVoiced,
    BaseSemiVoiced,
    Digraph,
    DigraphVoiced,
    DigraphSemiVoiced,
}

impl KanaCategory {
    pub const ALL: [KanaCategory; 6] = [
        KanaCategory::Base,
        KanaCategory::BaseVoiced,
        KanaCategory::BaseSemiVoiced,
        KanaCategory::Digraph,
        KanaCategory::DigraphVoiced,
        KanaCategory::DigraphSemiVoiced,
    ];

    pub fn label(self) -> &'static str {
        match self {
            KanaCategory::Base => "Base",
            KanaCategory::BaseVoiced => "Base + voiced",
            KanaCategory::BaseSemiVoiced => "Base + semi-voiced",
            KanaCategory::Digraph => "Digraph",
            KanaCategory::DigraphVoiced => "Digraph + voiced",
            KanaCategory::DigraphSemiVoiced => "Digraph + semi-voiced",
        }
    }
}

/// One of the three ways a sign can be written.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Script {
    Roomaji,
    Hiragana,
    Katakana,
}

/// A kana sign from the static catalog.
///
/// Two signs are equal when roomaji, hiragana and katakana all match; the
/// category tag does not take part in identity.
#[derive(Clone, Copy, Debug)]
pub struct Sign {
    pub roomaji: &'static str,
    pub hiragana: &'static str,
    pub katakana: &'static str,
    pub category: KanaCategory,
}

impl Sign {
    pub const fn new(
        roomaji: &'static str,
        hiragana: &'static str,
        katakana: &'static str,
        category: KanaCategory,
    ) -> Self {
        Self {
            roomaji,
            hiragana,
            katakana,
            category,
        }
    }

    pub fn text(&self, script: Script) -> &'static str {
        match script {
            Script::Roomaji => self.roomaji,
            Script::Hiragana => self.hiragana,
            Script::Katakana => self.katakana,
        }
    }

    pub fn matches_triple(&self, roomaji: &str, hiragana: &str, katakana: &str) -> bool {
        self.roomaji == roomaji && self.hiragana == hiragana && self.katakana == katakana
    }
}

impl PartialEq for Sign {
    fn eq(&self, other: &Self) -> bool {
        self.matches_triple(other.roomaji, other.hiragana, other.katakana)
    }
}

impl Eq for Sign {}

impl Hash for Sign {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.roomaji.hash(state);
        self.hiragana.hash(state);
        self.katakana.hash(state);
    }
}

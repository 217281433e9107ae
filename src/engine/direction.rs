use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::kana::Script;

/// Which script is shown as the prompt and which one the answers are drawn in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TestDirection {
    HiraganaToRoomaji,
    KatakanaToRoomaji,
    HiraganaOrKatakanaToRoomaji,
    RoomajiToHiragana,
    RoomajiToKatakana,
    RoomajiToHiraganaOrKatakana,
    HiraganaToKatakana,
    KatakanaToHiragana,
    HiraganaKatakanaBidirectional,
}

/// The pair of counters a result is booked against.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StatSide {
    Hiragana,
    Katakana,
}

/// How Roomaji -> Hiragana-or-Katakana results are attributed.
///
/// `Hiragana` books every result on the hiragana counters regardless of the
/// script the answers were shown in, which is how existing statistics files
/// were produced. `AnswerScript` books it on the script actually shown.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EitherAttribution {
    #[default]
    Hiragana,
    AnswerScript,
}

/// Prompt and answer scripts resolved for one round.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RoundSides {
    pub ask: Script,
    pub answer: Script,
}

impl TestDirection {
    pub const ALL: [TestDirection; 9] = [
        TestDirection::HiraganaToRoomaji,
        TestDirection::KatakanaToRoomaji,
        TestDirection::HiraganaOrKatakanaToRoomaji,
        TestDirection::RoomajiToHiragana,
        TestDirection::RoomajiToKatakana,
        TestDirection::RoomajiToHiraganaOrKatakana,
        TestDirection::HiraganaToKatakana,
        TestDirection::KatakanaToHiragana,
        TestDirection::HiraganaKatakanaBidirectional,
    ];

    pub fn key(self) -> &'static str {
        match self {
            TestDirection::HiraganaToRoomaji => "hiragana-to-roomaji",
            TestDirection::KatakanaToRoomaji => "katakana-to-roomaji",
            TestDirection::HiraganaOrKatakanaToRoomaji => "hiragana-or-katakana-to-roomaji",
            TestDirection::RoomajiToHiragana => "roomaji-to-hiragana",
            TestDirection::RoomajiToKatakana => "roomaji-to-katakana",
            TestDirection::RoomajiToHiraganaOrKatakana => "roomaji-to-hiragana-or-katakana",
            TestDirection::HiraganaToKatakana => "hiragana-to-katakana",
            TestDirection::KatakanaToHiragana => "katakana-to-hiragana",
            TestDirection::HiraganaKatakanaBidirectional => "hiragana-katakana-bidirectional",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TestDirection::HiraganaToRoomaji => "Hiragana -> Roomaji",
            TestDirection::KatakanaToRoomaji => "Katakana -> Roomaji",
            TestDirection::HiraganaOrKatakanaToRoomaji => "Hiragana or Katakana -> Roomaji",
            TestDirection::RoomajiToHiragana => "Roomaji -> Hiragana",
            TestDirection::RoomajiToKatakana => "Roomaji -> Katakana",
            TestDirection::RoomajiToHiraganaOrKatakana => "Roomaji -> Hiragana or Katakana",
            TestDirection::HiraganaToKatakana => "Hiragana -> Katakana",
            TestDirection::KatakanaToHiragana => "Katakana -> Hiragana",
            TestDirection::HiraganaKatakanaBidirectional => "Hiragana <-> Katakana",
        }
    }

    /// Counter pairs whose wrong counts weight a sign in the pool.
    pub fn weight_sides(self) -> &'static [StatSide] {
        match self {
            TestDirection::HiraganaToRoomaji
            | TestDirection::RoomajiToHiragana
            | TestDirection::HiraganaToKatakana => &[StatSide::Hiragana],
            TestDirection::KatakanaToRoomaji
            | TestDirection::RoomajiToKatakana
            | TestDirection::KatakanaToHiragana => &[StatSide::Katakana],
            TestDirection::HiraganaOrKatakanaToRoomaji
            | TestDirection::RoomajiToHiraganaOrKatakana
            | TestDirection::HiraganaKatakanaBidirectional => {
                &[StatSide::Hiragana, StatSide::Katakana]
            }
        }
    }

    /// Picks the prompt and answer scripts, flipping a coin where the
    /// direction leaves the choice open.
    pub fn resolve_sides<R: Rng + ?Sized>(self, rng: &mut R) -> RoundSides {
        let (ask, answer) = match self {
            TestDirection::HiraganaToRoomaji => (Script::Hiragana, Script::Roomaji),
            TestDirection::KatakanaToRoomaji => (Script::Katakana, Script::Roomaji),
            TestDirection::HiraganaOrKatakanaToRoomaji => (random_kana(rng), Script::Roomaji),
            TestDirection::RoomajiToHiragana => (Script::Roomaji, Script::Hiragana),
            TestDirection::RoomajiToKatakana => (Script::Roomaji, Script::Katakana),
            TestDirection::RoomajiToHiraganaOrKatakana => (Script::Roomaji, random_kana(rng)),
            TestDirection::HiraganaToKatakana => (Script::Hiragana, Script::Katakana),
            TestDirection::KatakanaToHiragana => (Script::Katakana, Script::Hiragana),
            TestDirection::HiraganaKatakanaBidirectional => {
                let ask = random_kana(rng);
                (ask, other_kana(ask))
            }
        };
        RoundSides { ask, answer }
    }

    /// Counter pair a scored answer is booked against.
    pub fn scored_side(self, sides: RoundSides, attribution: EitherAttribution) -> StatSide {
        match sides.ask {
            Script::Hiragana => StatSide::Hiragana,
            Script::Katakana => StatSide::Katakana,
            Script::Roomaji => match self {
                TestDirection::RoomajiToKatakana => StatSide::Katakana,
                TestDirection::RoomajiToHiraganaOrKatakana => match attribution {
                    EitherAttribution::Hiragana => StatSide::Hiragana,
                    EitherAttribution::AnswerScript if sides.answer == Script::Katakana => {
                        StatSide::Katakana
                    }
                    EitherAttribution::AnswerScript => StatSide::Hiragana,
                },
                _ => StatSide::Hiragana,
            },
        }
    }
}

fn random_kana<R: Rng + ?Sized>(rng: &mut R) -> Script {
    if rng.gen_bool(0.5) {
        Script::Hiragana
    } else {
        Script::Katakana
    }
}

fn other_kana(script: Script) -> Script {
    match script {
        Script::Hiragana => Script::Katakana,
        _ => Script::Hiragana,
    }
}

impl fmt::Display for TestDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TestDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TestDirection::ALL
            .into_iter()
            .find(|d| d.key() == s)
            .ok_or_else(|| {
                let known: Vec<&str> = TestDirection::ALL.iter().map(|d| d.key()).collect();
                format!("unknown test direction `{s}` (expected one of: {})", known.join(", "))
            })
    }
}

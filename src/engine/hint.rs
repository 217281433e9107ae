use std::fmt;
use std::ops::{BitOr, BitOrAssign};

use serde::{Deserialize, Serialize};

use crate::engine::scoring::Round;
use crate::kana::{Script, Sign};

/// Bitmask selecting which answer slots reveal their hint. Bits combine with
/// logical OR; an empty mask shows nothing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct HintShowType(u8);

impl HintShowType {
    pub const NONE: Self = Self(0);
    pub const SHOW_ON_WRONG_ANSWER: Self = Self(1);
    pub const SHOW_ON_RIGHT_ANSWER: Self = Self(1 << 1);
    pub const SHOW_ON_MARKED_ANSWERS: Self = Self(1 << 2);
    pub const SHOW_ON_OTHER_ANSWERS: Self = Self(1 << 3);

    const KNOWN: u8 = 0b1111;

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0 && other.0 != 0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn toggle(&mut self, other: Self) {
        self.0 ^= other.0;
    }

    pub fn names(self) -> Vec<&'static str> {
        [
            (Self::SHOW_ON_WRONG_ANSWER, "wrong"),
            (Self::SHOW_ON_RIGHT_ANSWER, "right"),
            (Self::SHOW_ON_MARKED_ANSWERS, "marked"),
            (Self::SHOW_ON_OTHER_ANSWERS, "other"),
        ]
        .into_iter()
        .filter(|(flag, _)| self.contains(*flag))
        .map(|(_, name)| name)
        .collect()
    }
}

impl BitOr for HintShowType {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for HintShowType {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownHintBits(pub u8);

impl fmt::Display for UnknownHintBits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown hint show type bits {:#06b}", self.0)
    }
}

impl TryFrom<u8> for HintShowType {
    type Error = UnknownHintBits;

    fn try_from(bits: u8) -> Result<Self, Self::Error> {
        if bits & !Self::KNOWN != 0 {
            return Err(UnknownHintBits(bits & !Self::KNOWN));
        }
        Ok(Self(bits))
    }
}

impl From<HintShowType> for u8 {
    fn from(value: HintShowType) -> Self {
        value.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Hint {
    Visible(&'static str),
    Hidden,
}

impl Hint {
    pub fn is_visible(&self) -> bool {
        matches!(self, Hint::Visible(_))
    }
}

/// Everything the resolver looks at besides the slot itself.
#[derive(Clone, Copy, Debug)]
pub struct HintQuery<'a> {
    pub show: HintShowType,
    pub question: &'a Sign,
    pub submitted: Option<&'a Sign>,
    /// Per-slot "marked" highlight, indexed like the answers.
    pub marked: &'a [bool],
    /// Script the hint text is written in.
    pub script: Script,
}

impl<'a> HintQuery<'a> {
    pub fn for_round(show: HintShowType, round: &'a Round, marked: &'a [bool]) -> Self {
        Self {
            show,
            question: &round.question,
            submitted: round.submitted(),
            marked,
            script: round.sides.ask,
        }
    }

    pub fn resolve(&self, slot: usize, sign: &Sign) -> Hint {
        let is_question = sign == self.question;
        let wrong_pick = self
            .submitted
            .filter(|s| s.roomaji != self.question.roomaji);
        let is_submitted = self.submitted == Some(sign);

        let show = (self.show.contains(HintShowType::SHOW_ON_RIGHT_ANSWER) && is_question)
            || (self.show.contains(HintShowType::SHOW_ON_WRONG_ANSWER) && wrong_pick == Some(sign))
            || (self.show.contains(HintShowType::SHOW_ON_MARKED_ANSWERS)
                && self.marked.get(slot).copied().unwrap_or(false))
            || (self.show.contains(HintShowType::SHOW_ON_OTHER_ANSWERS)
                && !is_question
                && !is_submitted);

        if show {
            Hint::Visible(sign.text(self.script))
        } else {
            Hint::Hidden
        }
    }

    pub fn resolve_all(&self, answers: &[Sign]) -> Vec<Hint> {
        answers
            .iter()
            .enumerate()
            .map(|(slot, sign)| self.resolve(slot, sign))
            .collect()
    }
}

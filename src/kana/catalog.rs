//! Static kana table, loaded once and shared read-only.

use super::KanaCategory::*;
use super::Sign;

pub static CATALOG: [Sign; 104] = [
    Sign::new("a", "あ", "ア", Base),
    Sign::new("i", "い", "イ", Base),
    Sign::new("u", "う", "ウ", Base),
    Sign::new("e", "え", "エ", Base),
    Sign::new("o", "お", "オ", Base),
    Sign::new("ka", "か", "カ", Base),
    Sign::new("ki", "き", "キ", Base),
    Sign::new("ku", "く", "ク", Base),
    Sign::new("ke", "け", "ケ", Base),
    Sign::new("ko", "こ", "コ", Base),
    Sign::new("sa", "さ", "サ", Base),
    Sign::new("shi", "し", "シ", Base),
    Sign::new("su", "す", "ス", Base),
    Sign::new("se", "せ", "セ", Base),
    Sign::new("so", "そ", "ソ", Base),
    Sign::new("ta", "た", "タ", Base),
    Sign::new("chi", "ち", "チ", Base),
    Sign::new("tsu", "つ", "ツ", Base),
    Sign::new("te", "て", "テ", Base),
    Sign::new("to", "と", "ト", Base),
    Sign::new("na", "な", "ナ", Base),
    Sign::new("ni", "に", "ニ", Base),
    Sign::new("nu", "ぬ", "ヌ", Base),
    Sign::new("ne", "ね", "ネ", Base),
    Sign::new("no", "の", "ノ", Base),
    Sign::new("ha", "は", "ハ", Base),
    Sign::new("hi", "ひ", "ヒ", Base),
    Sign::new("fu", "ふ", "フ", Base),
    Sign::new("he", "へ", "ヘ", Base),
    Sign::new("ho", "ほ", "ホ", Base),
    Sign::new("ma", "ま", "マ", Base),
    Sign::new("mi", "み", "ミ", Base),
    Sign::new("mu", "む", "ム", Base),
    Sign::new("me", "め", "メ", Base),
    Sign::new("mo", "も", "モ", Base),
    Sign::new("ya", "や", "ヤ", Base),
    Sign::new("yu", "ゆ", "ユ", Base),
    Sign::new("yo", "よ", "ヨ", Base),
    Sign::new("ra", "ら", "ラ", Base),
    Sign::new("ri", "り", "リ", Base),
    Sign::new("ru", "る", "ル", Base),
    Sign::new("re", "れ", "レ", Base),
    Sign::new("ro", "ろ", "ロ", Base),
    Sign::new("wa", "わ", "ワ", Base),
    Sign::new("wo", "を", "ヲ", Base),
    Sign::new("n", "ん", "ン", Base),
    Sign::new("ga", "が", "ガ", BaseVoiced),
    Sign::new("gi", "ぎ", "ギ", BaseVoiced),
    Sign::new("gu", "ぐ", "グ", BaseVoiced),
    Sign::new("ge", "げ", "ゲ", BaseVoiced),
    Sign::new("go", "ご", "ゴ", BaseVoiced),
    Sign::new("za", "ざ", "ザ", BaseVoiced),
    Sign::new("ji", "じ", "ジ", BaseVoiced),
    Sign::new("zu", "ず", "ズ", BaseVoiced),
    Sign::new("ze", "ぜ", "ゼ", BaseVoiced),
    Sign::new("zo", "ぞ", "ゾ", BaseVoiced),
    Sign::new("da", "だ", "ダ", BaseVoiced),
    Sign::new("ji", "ぢ", "ヂ", BaseVoiced),
    Sign::new("zu", "づ", "ヅ", BaseVoiced),
    Sign::new("de", "で", "デ", BaseVoiced),
    Sign::new("do", "ど", "ド", BaseVoiced),
    Sign::new("ba", "ば", "バ", BaseVoiced),
    Sign::new("bi", "び", "ビ", BaseVoiced),
    Sign::new("bu", "ぶ", "ブ", BaseVoiced),
    Sign::new("be", "べ", "ベ", BaseVoiced),
    Sign::new("bo", "ぼ", "ボ", BaseVoiced),
    Sign::new("pa", "ぱ", "パ", BaseSemiVoiced),
    Sign::new("pi", "ぴ", "ピ", BaseSemiVoiced),
    Sign::new("pu", "ぷ", "プ", BaseSemiVoiced),
    Sign::new("pe", "ぺ", "ペ", BaseSemiVoiced),
    Sign::new("po", "ぽ", "ポ", BaseSemiVoiced),
    Sign::new("kya", "きゃ", "キャ", Digraph),
    Sign::new("kyu", "きゅ", "キュ", Digraph),
    Sign::new("kyo", "きょ", "キョ", Digraph),
    Sign::new("sha", "しゃ", "シャ", Digraph),
    Sign::new("shu", "しゅ", "シュ", Digraph),
    Sign::new("sho", "しょ", "ショ", Digraph),
    Sign::new("cha", "ちゃ", "チャ", Digraph),
    Sign::new("chu", "ちゅ", "チュ", Digraph),
    Sign::new("cho", "ちょ", "チョ", Digraph),
    Sign::new("nya", "にゃ", "ニャ", Digraph),
    Sign::new("nyu", "にゅ", "ニュ", Digraph),
    Sign::new("nyo", "にょ", "ニョ", Digraph),
    Sign::new("hya", "ひゃ", "ヒャ", Digraph),
    Sign::new("hyu", "ひゅ", "ヒュ", Digraph),
    Sign::new("hyo", "ひょ", "ヒョ", Digraph),
    Sign::new("mya", "みゃ", "ミャ", Digraph),
    Sign::new("myu", "みゅ", "ミュ", Digraph),
    Sign::new("myo", "みょ", "ミョ", Digraph),
    Sign::new("rya", "りゃ", "リャ", Digraph),
    Sign::new("ryu", "りゅ", "リュ", Digraph),
    Sign::new("ryo", "りょ", "リョ", Digraph),
    Sign::new("gya", "ぎゃ", "ギャ", DigraphVoiced),
    Sign::new("gyu", "ぎゅ", "ギュ", DigraphVoiced),
    Sign::new("gyo", "ぎょ", "ギョ", DigraphVoiced),
    Sign::new("ja", "じゃ", "ジャ", DigraphVoiced),
    Sign::new("ju", "じゅ", "ジュ", DigraphVoiced),
    Sign::new("jo", "じょ", "ジョ", DigraphVoiced),
    Sign::new("bya", "びゃ", "ビャ", DigraphVoiced),
    Sign::new("byu", "びゅ", "ビュ", DigraphVoiced),
    Sign::new("byo", "びょ", "ビョ", DigraphVoiced),
    Sign::new("pya", "ぴゃ", "ピャ", DigraphSemiVoiced),
    Sign::new("pyu", "ぴゅ", "ピュ", DigraphSemiVoiced),
    Sign::new("pyo", "ぴょ", "ピョ", DigraphSemiVoiced),
];

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::kana::KanaCategory;

    #[test]
    fn test_catalog_has_no_duplicate_signs() {
        let unique: HashSet<&Sign> = CATALOG.iter().collect();
        assert_eq!(unique.len(), CATALOG.len());
    }

    #[test]
    fn test_every_category_present() {
        for category in KanaCategory::ALL {
            assert!(CATALOG.iter().any(|s| s.category == category), "missing {category:?}");
        }
    }

    #[test]
    fn test_single_letter_roomaji_are_vowels_and_n() {
        let single: Vec<&str> = CATALOG
            .iter()
            .filter(|s| s.roomaji.chars().count() == 1)
            .map(|s| s.roomaji)
            .collect();
        assert_eq!(single, vec!["a", "i", "u", "e", "o", "n"]);
    }
}

use crate::domain::SpamVerdict;

use super::patterns::{matched_indicators, SPAM_INDICATORS};

const MULTI_KEYWORD_CONFIDENCE: f32 = 0.90;
const STYLE_CONFIDENCE: f32 = 0.75;
const SINGLE_KEYWORD_CONFIDENCE: f32 = 0.60;
const MAX_LISTED_KEYWORDS: usize = 3;
const EXCLAMATION_THRESHOLD: usize = 3;
const CAPS_RATIO_THRESHOLD: f64 = 0.3;

/// `None` means no rule fired and the caller should try the next stage.
pub fn score(text: &str) -> Option<SpamVerdict> {
    let indicators = matched_indicators(text, SPAM_INDICATORS);

    if indicators.len() >= 2 {
        let listed = indicators
            .iter()
            .take(MAX_LISTED_KEYWORDS)
            .copied()
            .collect::<Vec<_>>()
            .join(", ");
        return Some(SpamVerdict::spam(
            MULTI_KEYWORD_CONFIDENCE,
            format!("contains spam keywords: {listed}"),
        ));
    }

    if exclamation_count(text) > EXCLAMATION_THRESHOLD && caps_ratio(text) > CAPS_RATIO_THRESHOLD {
        return Some(SpamVerdict::spam(
            STYLE_CONFIDENCE,
            "excessive capitalization and exclamation marks",
        ));
    }

    if let [indicator] = indicators.as_slice() {
        return Some(SpamVerdict::spam(
            SINGLE_KEYWORD_CONFIDENCE,
            format!("contains spam keyword: {indicator}"),
        ));
    }

    None
}

fn exclamation_count(text: &str) -> usize {
    text.chars().filter(|ch| *ch == '!').count()
}

fn caps_ratio(text: &str) -> f64 {
    let total = text.chars().count();
    if total == 0 {
        return 0.0;
    }
    let upper = text.chars().filter(|ch| ch.is_uppercase()).count();
    upper as f64 / total as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn several_keywords_list_the_first_three() {
        let verdict = score("WINNER!!! Congratulations, click here to claim your lottery prize")
            .expect("verdict");
        assert!(verdict.is_spam);
        assert_eq!(verdict.confidence, 0.90);
        assert_eq!(
            verdict.reason,
            "contains spam keywords: lottery, winner, congratulations"
        );
    }

    #[test]
    fn shouting_fires_without_keywords() {
        let verdict = score("BUY NOW!!!! BEST DEALS!").expect("verdict");
        assert!(verdict.is_spam);
        assert_eq!(verdict.confidence, 0.75);
        assert_eq!(
            verdict.reason,
            "excessive capitalization and exclamation marks"
        );
    }

    #[test]
    fn shouting_beats_single_keyword() {
        let verdict = score("URGENT!!!! READ THIS NOW").expect("verdict");
        assert_eq!(verdict.confidence, 0.75);
    }

    #[test]
    fn single_keyword_is_weak_spam() {
        let verdict = score("Meeting moved. This is urgent, see agenda.").expect("verdict");
        assert!(verdict.is_spam);
        assert_eq!(verdict.confidence, 0.60);
        assert_eq!(verdict.reason, "contains spam keyword: urgent");
    }

    #[test]
    fn exclamations_alone_are_not_enough() {
        assert_eq!(score("Great news!!!! see you at lunch"), None);
        assert_eq!(score("HELLO TEAM"), None);
    }

    #[test]
    fn empty_text_has_no_verdict() {
        assert_eq!(caps_ratio(""), 0.0);
        assert_eq!(score(" "), None);
    }
}

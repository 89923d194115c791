//! Advice response parsing
//!
//! Best-effort keyword scan of generated advice text. Never fails: any field
//! without a matching line keeps its default.

use crate::model::AdviceResult;

/// Leading markers stripped from a matched line, applied once each in order
const PREFIXES: [&str; 11] = [
    "1.", "2.", "3.", "4.", "-", "•", "*", "sips:", "lump-sum:", "long-term:", "traders:",
];

/// Split free text into the four advice fields.
///
/// Lines are lowercased and matched in priority order (`sip`, `lump`,
/// `long-term`, `trader`/`short-term`); a later matching line overwrites an
/// earlier one for the same field.
pub fn parse_personalized_advice(text: &str) -> AdviceResult {
    let mut advice = AdviceResult {
        raw_response: text.to_string(),
        ..AdviceResult::default()
    };

    for line in text.to_lowercase().split('\n') {
        let slot = if line.contains("sip") {
            &mut advice.sips
        } else if line.contains("lump") {
            &mut advice.lumpsum
        } else if line.contains("long-term") || line.contains("long term") {
            &mut advice.long_term
        } else if line.contains("trader")
            || line.contains("short-term")
            || line.contains("short term")
        {
            &mut advice.traders
        } else {
            continue;
        };
        *slot = clean_advice_line(line);
    }

    advice
}

fn clean_advice_line(line: &str) -> String {
    let mut result = line.trim();
    for prefix in PREFIXES {
        if let Some(rest) = result.strip_prefix(prefix) {
            result = rest.trim();
        }
    }

    if result.is_empty() {
        capitalize(line.trim())
    } else {
        capitalize(result)
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numbered_and_labelled_lines() {
        let advice = parse_personalized_advice("1. SIPs: keep going\nLump-sum: wait");
        assert_eq!(advice.sips, "Keep going");
        assert_eq!(advice.lumpsum, "Wait");
        assert_eq!(advice.long_term, AdviceResult::default().long_term);
        assert_eq!(advice.traders, AdviceResult::default().traders);
    }

    #[test]
    fn test_no_matches_keeps_defaults() {
        let advice = parse_personalized_advice("The market is a place.\n\nGood luck!");
        let defaults = AdviceResult::default();
        assert_eq!(advice.sips, defaults.sips);
        assert_eq!(advice.lumpsum, defaults.lumpsum);
        assert_eq!(advice.long_term, defaults.long_term);
        assert_eq!(advice.traders, defaults.traders);
        assert_eq!(advice.raw_response, "The market is a place.\n\nGood luck!");
    }

    #[test]
    fn test_empty_text() {
        let advice = parse_personalized_advice("");
        assert_eq!(advice.sips, "Continue your SIPs as planned.");
        assert!(advice.raw_response.is_empty());
    }

    #[test]
    fn test_later_line_overwrites() {
        let advice = parse_personalized_advice("- SIP: start small\n- SIP: stay consistent");
        assert_eq!(advice.sips, "Sip: stay consistent");
    }

    #[test]
    fn test_priority_order_within_a_line() {
        // mentions both SIP and lump-sum; SIP wins
        let advice = parse_personalized_advice("3. Prefer SIPs over lump-sum entries");
        assert_eq!(advice.sips, "Prefer sips over lump-sum entries");
        assert_eq!(advice.lumpsum, AdviceResult::default().lumpsum);
    }

    #[test]
    fn test_bullets_and_traders() {
        let text = "Here's my guidance:\n\
                    • Long-term: stay the course\n\
                    * Short-term traders: keep stop losses tight\r";
        let advice = parse_personalized_advice(text);
        assert_eq!(advice.long_term, "Stay the course");
        assert_eq!(advice.traders, "Short-term traders: keep stop losses tight");
    }

    #[test]
    fn test_marker_only_line_falls_back_to_trimmed_line() {
        assert_eq!(clean_advice_line("  sips:  "), "Sips:");
    }
}

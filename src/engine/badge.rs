//! Maps a final score to a badge.

use chrono::{DateTime, Utc};

use crate::models::{Badge, BadgeTier};

pub struct BadgeRule {
    pub min_score: usize,
    pub tier: BadgeTier,
    pub label: &'static str,
    pub description: &'static str,
    pub color: &'static str,
}

/// Sorted by ascending `min_score`.
pub const BADGE_RULES: [BadgeRule; 3] = [
    BadgeRule {
        min_score: 0,
        tier: BadgeTier::Rookie,
        label: "Neon Rookie",
        description: "Completed Beginner Tier",
        color: "#7b5bff",
    },
    BadgeRule {
        min_score: 5,
        tier: BadgeTier::Strategist,
        label: "Cyber Strategist",
        description: "Dominated Intermediate Tier",
        color: "#00f5c4",
    },
    BadgeRule {
        min_score: 8,
        tier: BadgeTier::Oracle,
        label: "Pixel Oracle",
        description: "Perfect Mastery",
        color: "#ff4f81",
    },
];

/// Badge for `score` out of `total`, stamped with the current time.
pub fn resolve(score: usize, total: usize) -> Badge {
    resolve_at(score, total, Utc::now())
}

pub fn resolve_at(score: usize, total: usize, awarded_at: DateTime<Utc>) -> Badge {
    let rule = BADGE_RULES
        .iter()
        .rev()
        .find(|rule| rule.min_score <= score)
        .unwrap_or(&BADGE_RULES[0]);

    Badge {
        tier: rule.tier,
        label: rule.label.to_string(),
        description: rule.description.to_string(),
        color: rule.color.to_string(),
        score,
        total,
        awarded_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thresholds() {
        assert_eq!(resolve(0, 9).tier, BadgeTier::Rookie);
        assert_eq!(resolve(4, 9).tier, BadgeTier::Rookie);
        assert_eq!(resolve(5, 9).tier, BadgeTier::Strategist);
        assert_eq!(resolve(7, 9).tier, BadgeTier::Strategist);
        assert_eq!(resolve(8, 9).tier, BadgeTier::Oracle);
        assert_eq!(resolve(9, 9).tier, BadgeTier::Oracle);
    }

    #[test]
    fn test_badge_carries_score_and_rule_details() {
        let at = Utc::now();
        let badge = resolve_at(5, 9, at);
        assert_eq!(badge.label, "Cyber Strategist");
        assert_eq!(badge.score, 5);
        assert_eq!(badge.total, 9);
        assert_eq!(badge.awarded_at, at);
    }

    #[test]
    fn test_rules_sorted() {
        assert!(BADGE_RULES.windows(2).all(|w| w[0].min_score < w[1].min_score));
    }
}

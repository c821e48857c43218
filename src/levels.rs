// src/levels.rs

//! Level ladder. Tiers partition the non-negative scores: each tier starts one
//! point after the previous tier ends and the last tier is open ended.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Level {
    pub name: &'static str,
    pub min_score: u64,
    /// Inclusive. `u64::MAX` on the final tier.
    pub max_score: u64,
    pub icon: &'static str,
    pub requirements: &'static str,
    pub perks: &'static [&'static str],
}

impl Level {
    pub fn contains(&self, score: u64) -> bool {
        score >= self.min_score && score <= self.max_score
    }

    pub fn is_final(&self) -> bool {
        self.max_score == u64::MAX
    }
}

pub static LEVELS: &[Level] = &[
    Level {
        name: "Triviaholic Novice",
        min_score: 0,
        max_score: 499,
        icon: "brain.head.profile",
        requirements: "Start your journey",
        perks: &["Access to basic questions"],
    },
    Level {
        name: "Curious Kid",
        min_score: 500,
        max_score: 999,
        icon: "questionmark.circle",
        requirements: "Score 500 points with 70% accuracy",
        perks: &["Unlock daily challenges", "New question categories"],
    },
    Level {
        name: "Eager Student",
        min_score: 1000,
        max_score: 1999,
        icon: "book.fill",
        requirements: "Complete 20 games with 75% accuracy",
        perks: &["Access to medium difficulty", "Special badges"],
    },
    Level {
        name: "Junior Scholar",
        min_score: 2000,
        max_score: 3499,
        icon: "graduationcap.fill",
        requirements: "Win 5 challenges, 80% accuracy",
        perks: &["Challenge mode unlocked", "Profile customization"],
    },
    Level {
        name: "Knowledge Explorer",
        min_score: 3500,
        max_score: 5999,
        icon: "map.fill",
        requirements: "Complete 50 daily challenges",
        perks: &["Expert categories unlocked", "Special effects"],
    },
    Level {
        name: "Brainiac Beginner",
        min_score: 6000,
        max_score: 9999,
        icon: "sparkles",
        requirements: "85% accuracy in 100 games",
        perks: &["Create custom challenges", "Unique animations"],
    },
    Level {
        name: "Triviaholic Enthusiast",
        min_score: 10000,
        max_score: 14999,
        icon: "star.fill",
        requirements: "Win 20 challenges, maintain 85% accuracy",
        perks: &["Premium question sets", "Custom badges"],
    },
    Level {
        name: "Quiz Whiz",
        min_score: 15000,
        max_score: 24999,
        icon: "bolt.fill",
        requirements: "90% accuracy in Time Attack mode",
        perks: &["Create tournaments", "Special effects"],
    },
    Level {
        name: "Smarty Pants",
        min_score: 25000,
        max_score: 39999,
        icon: "crown.fill",
        requirements: "Complete 200 daily challenges",
        perks: &["Exclusive categories", "Custom themes"],
    },
    Level {
        name: "Bright Mind",
        min_score: 40000,
        max_score: 59999,
        icon: "lightbulb.fill",
        requirements: "95% accuracy in 500 games",
        perks: &["Create leagues", "Special animations"],
    },
    Level {
        name: "Triviaholic Challenger",
        min_score: 60000,
        max_score: 89999,
        icon: "trophy.fill",
        requirements: "Win 100 challenges",
        perks: &["Host tournaments", "Unique effects"],
    },
    Level {
        name: "Clever Sage",
        min_score: 90000,
        max_score: 129999,
        icon: "wand.and.stars",
        requirements: "1000 games with 95% accuracy",
        perks: &["Create custom modes", "Special powers"],
    },
    Level {
        name: "Mastermind",
        min_score: 130000,
        max_score: 179999,
        icon: "medal.fill",
        requirements: "Win 500 challenges",
        perks: &["Design questions", "Ultimate badges"],
    },
    Level {
        name: "Professor",
        min_score: 180000,
        max_score: 249999,
        icon: "books.vertical.fill",
        requirements: "2000 games with 97% accuracy",
        perks: &["Create tournaments", "Special effects"],
    },
    Level {
        name: "Brainiac Genius",
        min_score: 250000,
        max_score: 349999,
        icon: "brain",
        requirements: "Win 1000 challenges",
        perks: &["Create special events", "Unique powers"],
    },
    Level {
        name: "Einstein",
        min_score: 350000,
        max_score: u64::MAX,
        icon: "atom",
        requirements: "5000 games with 98% accuracy",
        perks: &["Legendary status", "All features unlocked"],
    },
];

/// The tier containing `score`.
pub fn level_for_score(score: u64) -> &'static Level {
    // Tiers are sorted, so the last tier starting at or below the score holds it.
    let idx = LEVELS.partition_point(|l| l.min_score <= score);
    &LEVELS[idx.saturating_sub(1)]
}

pub fn next_level(score: u64) -> Option<&'static Level> {
    let current = level_for_score(score);
    LEVELS.iter().find(|l| l.min_score > current.max_score)
}

/// Fraction of the current tier completed, in `[0, 1]`. The open-ended final
/// tier always reports 1.0.
pub fn progress_to_next_level(score: u64) -> f64 {
    let current = level_for_score(score);
    if current.is_final() {
        return 1.0;
    }
    let in_level = (score - current.min_score) as f64;
    let range = (current.max_score - current.min_score) as f64;
    if range <= 0.0 {
        return 1.0;
    }
    (in_level / range).clamp(0.0, 1.0)
}

use serde::{Deserialize, Serialize};

use super::answers::*;
use super::weights::{score, BundleScores};
use crate::kernel::catalog::BundleId;

/// Which stage of the cascade produced the recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tier {
    /// Hard override, rules 1..=6.
    Override { rule: u8 },
    /// Secondary match, rules 7..=13.
    Secondary { rule: u8 },
    /// No rule matched; weighted scores decided.
    Weighted(BundleScores),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub bundle: BundleId,
    pub tier: Tier,
}

struct Rule {
    number: u8,
    bundle: u8,
    applies: fn(&QuizAnswers) -> bool,
}

// Atoms. Every comparison against an absent answer is false, including `≠`.

fn is_experience(a: &QuizAnswers, v: Experience) -> bool {
    a.experience == Some(v)
}

fn is_tech(a: &QuizAnswers, v: TechField) -> bool {
    a.tech_field == Some(v)
}

fn is_scale(a: &QuizAnswers, v: ProjectScale) -> bool {
    a.project_scale == Some(v)
}

fn is_dev(a: &QuizAnswers, v: DevStyle) -> bool {
    a.dev_style == Some(v)
}

fn is_visual(a: &QuizAnswers, v: VisualStyle) -> bool {
    a.visual_style == Some(v)
}

fn is_focus(a: &QuizAnswers, v: FocusArea) -> bool {
    a.focus_area == Some(v)
}

fn tech_is_not(a: &QuizAnswers, v: TechField) -> bool {
    matches!(a.tech_field, Some(t) if t != v)
}

fn scale_is_not(a: &QuizAnswers, v: ProjectScale) -> bool {
    matches!(a.project_scale, Some(s) if s != v)
}

// Tier 1

fn cloud_expert(a: &QuizAnswers) -> bool {
    is_tech(a, TechField::CloudAi) && is_experience(a, Experience::Expert)
}

fn cloud_advanced(a: &QuizAnswers) -> bool {
    is_tech(a, TechField::CloudAi) && is_experience(a, Experience::Advanced)
}

fn gentle_beginner(a: &QuizAnswers) -> bool {
    is_experience(a, Experience::Beginner) && gentle_setup(a)
}

fn gentle_setup(a: &QuizAnswers) -> bool {
    is_visual(a, VisualStyle::Subtle)
        && is_scale(a, ProjectScale::Personal)
        && is_dev(a, DevStyle::Minimal)
}

fn seasoned_cyberpunk(a: &QuizAnswers) -> bool {
    is_visual(a, VisualStyle::Cyberpunk)
        && (is_experience(a, Experience::Advanced) || is_experience(a, Experience::Expert))
}

fn flashy_speed(a: &QuizAnswers) -> bool {
    is_visual(a, VisualStyle::Flashy) && is_focus(a, FocusArea::CodingSpeed)
}

fn flashy_debugging(a: &QuizAnswers) -> bool {
    is_visual(a, VisualStyle::Flashy) && is_focus(a, FocusArea::Debugging)
}

// Tier 2

/// Beginners who did not pick exactly the gentle setup. The negation only
/// holds when all three guarded answers are present.
fn companion_fallback(a: &QuizAnswers) -> bool {
    let guarded_known = a.visual_style.is_some() && a.project_scale.is_some() && a.dev_style.is_some();
    (is_experience(a, Experience::Beginner) && guarded_known && !gentle_setup(a))
        || (is_experience(a, Experience::Intermediate)
            && is_tech(a, TechField::Frontend)
            && is_visual(a, VisualStyle::Subtle))
}

fn hacker_fallback(a: &QuizAnswers) -> bool {
    is_dev(a, DevStyle::Customizable)
        || (is_visual(a, VisualStyle::Cyberpunk) && is_experience(a, Experience::Intermediate))
        || (is_experience(a, Experience::Beginner) && is_visual(a, VisualStyle::Cyberpunk))
}

fn guardian_fallback(a: &QuizAnswers) -> bool {
    (is_dev(a, DevStyle::Enterprise) && is_visual(a, VisualStyle::Subtle))
        || (is_focus(a, FocusArea::CodeQuality) && is_visual(a, VisualStyle::Subtle))
}

fn debugger_fallback(a: &QuizAnswers) -> bool {
    (is_experience(a, Experience::Advanced)
        && is_tech(a, TechField::Backend)
        && is_focus(a, FocusArea::Debugging))
        || (is_visual(a, VisualStyle::Flashy) && is_tech(a, TechField::Backend))
}

fn team_fallback(a: &QuizAnswers) -> bool {
    is_dev(a, DevStyle::Enterprise)
        || (is_scale(a, ProjectScale::LargeEnterprise) && is_focus(a, FocusArea::Integration))
        || (is_visual(a, VisualStyle::Moderate) && scale_is_not(a, ProjectScale::Personal))
}

fn architect_fallback(a: &QuizAnswers) -> bool {
    (is_experience(a, Experience::Expert) && tech_is_not(a, TechField::CloudAi))
        || (is_dev(a, DevStyle::Comprehensive) && is_experience(a, Experience::Advanced))
        || (is_tech(a, TechField::Fullstack) && is_experience(a, Experience::Expert))
}

fn alchemist_fallback(a: &QuizAnswers) -> bool {
    is_tech(a, TechField::CloudAi)
        || (is_experience(a, Experience::Expert) && is_dev(a, DevStyle::Customizable))
        || (is_focus(a, FocusArea::CodingSpeed) && is_experience(a, Experience::Expert))
        || (is_focus(a, FocusArea::CodingSpeed) && is_visual(a, VisualStyle::Cyberpunk))
}

const HARD_OVERRIDES: &[Rule] = &[
    Rule { number: 1, bundle: 8, applies: cloud_expert },
    Rule { number: 2, bundle: 7, applies: cloud_advanced },
    Rule { number: 3, bundle: 1, applies: gentle_beginner },
    Rule { number: 4, bundle: 3, applies: seasoned_cyberpunk },
    Rule { number: 5, bundle: 2, applies: flashy_speed },
    Rule { number: 6, bundle: 5, applies: flashy_debugging },
];

const SECONDARY_MATCHES: &[Rule] = &[
    Rule { number: 7, bundle: 1, applies: companion_fallback },
    Rule { number: 8, bundle: 3, applies: hacker_fallback },
    Rule { number: 9, bundle: 4, applies: guardian_fallback },
    Rule { number: 10, bundle: 5, applies: debugger_fallback },
    Rule { number: 11, bundle: 6, applies: team_fallback },
    Rule { number: 12, bundle: 7, applies: architect_fallback },
    Rule { number: 13, bundle: 8, applies: alchemist_fallback },
];

fn first_match(rules: &[Rule], answers: &QuizAnswers) -> Option<(u8, BundleId)> {
    rules
        .iter()
        .find(|rule| (rule.applies)(answers))
        .and_then(|rule| BundleId::new(rule.bundle).ok().map(|id| (rule.number, id)))
}

/// Pure: answers -> bundle. First matching rule wins, weighted scores last.
/// Never fails, whatever is missing from `answers`.
pub fn recommend(answers: &QuizAnswers) -> Recommendation {
    if let Some((rule, bundle)) = first_match(HARD_OVERRIDES, answers) {
        return Recommendation { bundle, tier: Tier::Override { rule } };
    }

    if let Some((rule, bundle)) = first_match(SECONDARY_MATCHES, answers) {
        return Recommendation { bundle, tier: Tier::Secondary { rule } };
    }

    let scores = score(answers);
    Recommendation {
        bundle: scores.best(),
        tier: Tier::Weighted(scores),
    }
}

pub fn best_bundle(answers: &QuizAnswers) -> BundleId {
    recommend(answers).bundle
}

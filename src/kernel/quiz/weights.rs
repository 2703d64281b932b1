use serde::{Deserialize, Serialize};

use super::answers::*;
use crate::kernel::catalog::{BundleId, BUNDLE_COUNT};

/// (bundle id, points) pairs contributed by a single answer.
type Contribution = &'static [(u8, u32)];

fn experience(value: Experience) -> Contribution {
    match value {
        Experience::Beginner => &[(1, 25), (4, 15)],
        Experience::Intermediate => &[(2, 25), (6, 20), (1, 10)],
        Experience::Advanced => &[(5, 25), (3, 20), (7, 15)],
        Experience::Expert => &[(7, 25), (8, 20), (5, 10)],
    }
}

fn tech_field(value: TechField) -> Contribution {
    match value {
        TechField::CloudAi => &[(8, 25), (7, 15)],
        TechField::Frontend => &[(2, 20), (1, 15), (3, 10)],
        TechField::Backend => &[(5, 20), (7, 15), (4, 10)],
        TechField::Fullstack => &[(7, 18), (5, 15), (6, 12)],
    }
}

fn visual_style(value: VisualStyle) -> Contribution {
    match value {
        VisualStyle::Cyberpunk => &[(3, 30), (8, 20), (7, 10)],
        VisualStyle::Flashy => &[(2, 30), (5, 20), (3, 10)],
        VisualStyle::Subtle => &[(4, 30), (1, 20), (6, 10)],
        VisualStyle::Moderate => &[(6, 30), (4, 20), (2, 10)],
    }
}

fn project_scale(value: ProjectScale) -> Contribution {
    match value {
        ProjectScale::LargeEnterprise => &[(6, 15), (7, 12), (4, 8)],
        ProjectScale::MediumEnterprise => &[(4, 15), (6, 12), (5, 8)],
        ProjectScale::SmallTeam => &[(2, 15), (5, 12), (3, 8)],
        ProjectScale::Personal => &[(1, 15), (3, 12), (2, 8)],
    }
}

fn dev_style(value: DevStyle) -> Contribution {
    match value {
        DevStyle::Minimal => &[(1, 15), (4, 12), (2, 8)],
        DevStyle::Comprehensive => &[(6, 15), (7, 12), (5, 8)],
        DevStyle::Customizable => &[(3, 15), (8, 12), (5, 8)],
        DevStyle::Enterprise => &[(4, 15), (6, 12), (7, 8)],
    }
}

fn focus_area(value: FocusArea) -> Contribution {
    match value {
        FocusArea::CodingSpeed => &[(2, 15), (8, 12), (3, 8)],
        FocusArea::CodeQuality => &[(4, 15), (5, 12), (1, 8)],
        FocusArea::Debugging => &[(5, 15), (3, 12), (7, 8)],
        FocusArea::Integration => &[(6, 15), (7, 12), (8, 8)],
    }
}

/// Accumulated fallback scores, slot `i` belongs to bundle `i + 1`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundleScores([u32; BUNDLE_COUNT]);

impl BundleScores {
    pub fn get(&self, bundle: BundleId) -> u32 {
        self.0[bundle.index()]
    }

    fn add(&mut self, contribution: Contribution) {
        for &(bundle, points) in contribution {
            self.0[bundle as usize - 1] += points;
        }
    }

    /// Highest score wins; bundle 1 is the baseline and later bundles only
    /// take over on a strictly greater score, so ties go to the lower id.
    pub fn best(&self) -> BundleId {
        let mut best = 0;
        let mut highest = self.0[0];
        for (index, &score) in self.0.iter().enumerate().skip(1) {
            if score > highest {
                highest = score;
                best = index;
            }
        }
        BundleId::from_index(best)
    }

    pub fn as_array(&self) -> [u32; BUNDLE_COUNT] {
        self.0
    }
}

/// Tier 3 on its own. Absent dimensions contribute nothing.
pub fn score(answers: &QuizAnswers) -> BundleScores {
    let mut scores = BundleScores::default();
    let contributions = [
        answers.experience.map(experience),
        answers.tech_field.map(tech_field),
        answers.visual_style.map(visual_style),
        answers.project_scale.map(project_scale),
        answers.dev_style.map(dev_style),
        answers.focus_area.map(focus_area),
    ];
    for contribution in contributions.into_iter().flatten() {
        scores.add(contribution);
    }
    scores
}

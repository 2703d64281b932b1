use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

use crate::error::UnknownOption;

/// Declares one quiz dimension: the enum, its wire names, and parsing.
macro_rules! quiz_option {
    ($(#[$meta:meta])* $name:ident, $question:literal { $($variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const QUESTION: &'static str = $question;
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }

            fn pick<R: Rng>(rng: &mut R) -> Self {
                Self::ALL[rng.gen_range(0..Self::ALL.len())]
            }
        }

        impl FromStr for $name {
            type Err = UnknownOption;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim() {
                    $($text => Ok($name::$variant),)+
                    other => Err(UnknownOption {
                        question: $question,
                        value: other.to_string(),
                    }),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

quiz_option!(
    /// Question 1.
    Experience, "experience" {
        Beginner => "beginner",
        Intermediate => "intermediate",
        Advanced => "advanced",
        Expert => "expert",
    }
);

quiz_option!(
    /// Question 2.
    TechField, "tech_field" {
        Frontend => "frontend",
        Backend => "backend",
        Fullstack => "fullstack",
        CloudAi => "cloud_ai",
    }
);

quiz_option!(
    /// Question 3.
    ProjectScale, "project_scale" {
        Personal => "personal",
        SmallTeam => "small_team",
        MediumEnterprise => "medium_enterprise",
        LargeEnterprise => "large_enterprise",
    }
);

quiz_option!(
    /// Question 4.
    DevStyle, "dev_style" {
        Minimal => "minimal",
        Comprehensive => "comprehensive",
        Customizable => "customizable",
        Enterprise => "enterprise",
    }
);

quiz_option!(
    /// Question 5.
    VisualStyle, "visual_style" {
        Subtle => "subtle",
        Moderate => "moderate",
        Flashy => "flashy",
        Cyberpunk => "cyberpunk",
    }
);

quiz_option!(
    /// Question 6.
    FocusArea, "focus_area" {
        CodingSpeed => "coding_speed",
        CodeQuality => "code_quality",
        Debugging => "debugging",
        Integration => "integration",
    }
);

/// One completed (or partially completed) quiz.
///
/// `None` means the question was skipped or carried a value outside its
/// option set. The engine treats such a dimension as absent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QuizAnswers {
    pub experience: Option<Experience>,
    pub tech_field: Option<TechField>,
    pub project_scale: Option<ProjectScale>,
    pub dev_style: Option<DevStyle>,
    pub visual_style: Option<VisualStyle>,
    pub focus_area: Option<FocusArea>,
}

pub const QUESTION_COUNT: u8 = 6;

impl QuizAnswers {
    pub fn complete(
        experience: Experience,
        tech_field: TechField,
        project_scale: ProjectScale,
        dev_style: DevStyle,
        visual_style: VisualStyle,
        focus_area: FocusArea,
    ) -> Self {
        Self {
            experience: Some(experience),
            tech_field: Some(tech_field),
            project_scale: Some(project_scale),
            dev_style: Some(dev_style),
            visual_style: Some(visual_style),
            focus_area: Some(focus_area),
        }
    }

    /// Records the answer for question `index` (1..=6).
    pub fn set(&mut self, index: u8, value: &str) -> Result<(), UnknownOption> {
        match index {
            1 => self.experience = Some(value.parse()?),
            2 => self.tech_field = Some(value.parse()?),
            3 => self.project_scale = Some(value.parse()?),
            4 => self.dev_style = Some(value.parse()?),
            5 => self.visual_style = Some(value.parse()?),
            6 => self.focus_area = Some(value.parse()?),
            _ => {
                return Err(UnknownOption {
                    question: "question index",
                    value: index.to_string(),
                })
            }
        }
        Ok(())
    }

    /// Lenient import of the `question1`..`question6` map the quiz pages post.
    /// Unknown keys are ignored, unknown values leave the slot empty.
    pub fn from_raw(raw: &HashMap<String, String>) -> Self {
        let mut answers = Self::default();
        for index in 1..=QUESTION_COUNT {
            let Some(value) = raw.get(&format!("question{index}")) else {
                continue;
            };
            if let Err(e) = answers.set(index, value) {
                tracing::debug!("Dropping answer: {}", e);
            }
        }
        answers
    }

    /// Inverse of [`QuizAnswers::from_raw`]; empty slots are omitted.
    pub fn to_raw(&self) -> BTreeMap<String, String> {
        let slots = [
            self.experience.map(|v| v.as_str()),
            self.tech_field.map(|v| v.as_str()),
            self.project_scale.map(|v| v.as_str()),
            self.dev_style.map(|v| v.as_str()),
            self.visual_style.map(|v| v.as_str()),
            self.focus_area.map(|v| v.as_str()),
        ];
        slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.map(|v| (format!("question{}", i + 1), v.to_string())))
            .collect()
    }

    pub fn answered(&self) -> usize {
        self.to_raw().len()
    }

    pub fn is_complete(&self) -> bool {
        self.answered() == QUESTION_COUNT as usize
    }

    /// Fills every unanswered question with a random valid option.
    /// Answered questions are left untouched.
    pub fn fill_missing<R: Rng>(&mut self, rng: &mut R) {
        self.experience.get_or_insert_with(|| Experience::pick(rng));
        self.tech_field.get_or_insert_with(|| TechField::pick(rng));
        self.project_scale.get_or_insert_with(|| ProjectScale::pick(rng));
        self.dev_style.get_or_insert_with(|| DevStyle::pick(rng));
        self.visual_style.get_or_insert_with(|| VisualStyle::pick(rng));
        self.focus_area.get_or_insert_with(|| FocusArea::pick(rng));
    }
}

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::CatalogError;

/// Reference into the static bundle catalog. Always within 1..=8.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct BundleId(u8);

pub const BUNDLE_COUNT: usize = 8;

impl BundleId {
    pub fn new(id: u8) -> Result<Self, CatalogError> {
        if (1..=BUNDLE_COUNT as u8).contains(&id) {
            Ok(Self(id))
        } else {
            Err(CatalogError::UnknownBundle(id))
        }
    }

    /// Zero-based slot, used by score tables.
    pub(crate) fn from_index(index: usize) -> Self {
        debug_assert!(index < BUNDLE_COUNT);
        Self(index as u8 + 1)
    }

    pub fn get(self) -> u8 {
        self.0
    }

    pub fn index(self) -> usize {
        self.0 as usize - 1
    }

    pub fn all() -> impl Iterator<Item = BundleId> {
        (0..BUNDLE_COUNT).map(Self::from_index)
    }
}

impl TryFrom<u8> for BundleId {
    type Error = CatalogError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<BundleId> for u8 {
    fn from(id: BundleId) -> Self {
        id.0
    }
}

impl fmt::Display for BundleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Extension {
    pub name: &'static str,
    pub icon: &'static str,
    pub description: &'static str,
    pub reason: &'static str,
}

impl Extension {
    /// Identifier the backend and the planet display know this extension by.
    pub fn id(&self) -> String {
        extension_id(self.name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Bundle {
    pub id: u8,
    pub name: &'static str,
    pub emoji: &'static str,
    pub description: &'static str,
    pub extensions: [Extension; 3],
}

const COPILOT: &str = "GitHub Copilot";

static BUNDLES: [Bundle; BUNDLE_COUNT] = [
    Bundle {
        id: 1,
        name: "Cozy Pet Companion Pack",
        emoji: "🐱",
        description: "Adorable virtual pets and an AI partner keep you company through every line you write.",
        extensions: [
            Extension {
                name: "VSCode Pets",
                icon: "🐱",
                description: "Raise a virtual pet inside the editor. It runs around while you code, cheers when things go well and looks worried when they break.",
                reason: "Brings warmth and a bit of healing to the daily grind, so coding never feels lonely.",
            },
            Extension {
                name: "Live Preview",
                icon: "🌐",
                description: "One click starts a local server and an in-editor browser that refreshes on every save.",
                reason: "The most direct feedback loop for frontend work: every save is a small reward.",
            },
            Extension {
                name: COPILOT,
                icon: "🤖",
                description: "Your AI pair programmer, generating code, functions and whole solutions from context and comments.",
                reason: "AI suggestions, instant previews and a pet cheering you on make for the friendliest setup.",
            },
        ],
    },
    Bundle {
        id: 2,
        name: "Visual Fireworks Pack",
        emoji: "💥",
        description: "Turn every keystroke into a party and ride the adrenaline.",
        extensions: [
            Extension {
                name: "Power Mode",
                icon: "💥",
                description: "Every key press explodes into particles; the faster you type, the bigger the blast and the harder the screen shakes.",
                reason: "A visual battle cry for flow state that turns productive hours into a show.",
            },
            Extension {
                name: "Code Runner",
                icon: "⚡",
                description: "Lightweight runner for more than 40 languages that executes a file or a selection with one key.",
                reason: "Paired with Power Mode, every successful run lands like celebratory fireworks.",
            },
            Extension {
                name: COPILOT,
                icon: "🤖",
                description: "Among the flying particles, Copilot becomes the muse that keeps the code coming.",
                reason: "AI writes it, Code Runner runs it, Power Mode blows it up: think it, see it, boom.",
            },
        ],
    },
    Bundle {
        id: 3,
        name: "Cyberpunk Hacker Pack",
        emoji: "🌈",
        description: "Become the top hacker of a neon future, immersed in light and data streams.",
        extensions: [
            Extension {
                name: "Synthwave '84 Theme",
                icon: "🌈",
                description: "A full neon theme with glow effects that turns VS Code into a hacker terminal straight out of Blade Runner.",
                reason: "Every line of code gets its own neon filter.",
            },
            Extension {
                name: "WakaTime",
                icon: "📊",
                description: "Automatic time tracking and productivity analytics with detailed visual reports.",
                reason: "Your intelligence center: analyze your own working patterns from above.",
            },
            Extension {
                name: COPILOT,
                icon: "🤖",
                description: "In a cyberpunk setting Copilot is the AI partner from the future that understands your code.",
                reason: "A future AI partner plus your own data center makes for truly data-driven collaboration.",
            },
        ],
    },
    Bundle {
        id: 4,
        name: "Perfect Code Guardian Pack",
        emoji: "🛡️",
        description: "A lovable code butler helps you check every detail and ship a flawless project.",
        extensions: [
            Extension {
                name: "VSCode Pets",
                icon: "🐱",
                description: "Your code quality supervisor: the pet cheers clean code and nudges you when it spots trouble.",
                reason: "Turns dry quality checks into a friendly interaction instead of cold error messages.",
            },
            Extension {
                name: "TODO Highlight",
                icon: "📝",
                description: "Highlights and tracks TODO, FIXME and similar markers so nothing gets forgotten.",
                reason: "A digital sticky note that keeps technical debt visible and the project healthy.",
            },
            Extension {
                name: COPILOT,
                icon: "🤖",
                description: "Generates quality code and adds TODO markers and comments where they are needed.",
                reason: "AI writes good code and marks follow-ups, TODO Highlight tracks them: a complete quality loop.",
            },
        ],
    },
    Bundle {
        id: 5,
        name: "Visual Debugging Master Pack",
        emoji: "🔍",
        description: "Make debugging a visual storm and hunt down every bug in style.",
        extensions: [
            Extension {
                name: "Power Mode",
                icon: "💥",
                description: "Setting breakpoints and stepping through code triggers its own particle explosions.",
                reason: "Fast bug fixes with flashy feedback make debugging feel like an action movie.",
            },
            Extension {
                name: "GitLens",
                icon: "🔍",
                description: "Shows the author and commit of every line with rich history views.",
                reason: "Turns raw git commands into visual clues so you can track every change like a detective.",
            },
            Extension {
                name: COPILOT,
                icon: "🤖",
                description: "A strategist while debugging: with GitLens history in view, Copilot suggests fixes.",
                reason: "AI that understands how the code evolved proposes fixes with real context.",
            },
        ],
    },
    Bundle {
        id: 6,
        name: "Team Collaboration Paradise Pack",
        emoji: "👥",
        description: "Cute companions and zero-distance communication bring energy to remote teamwork.",
        extensions: [
            Extension {
                name: "VSCode Pets",
                icon: "🐱",
                description: "Every teammate shows off their own pet during Live Share sessions.",
                reason: "Pair programming with pets playing on screen keeps the mood light.",
            },
            Extension {
                name: "Live Share",
                icon: "🤝",
                description: "Real-time collaboration with shared editing, terminals, audio and debugging.",
                reason: "Makes remote work feel like everyone sits at the same machine.",
            },
            Extension {
                name: COPILOT,
                icon: "🤖",
                description: "Everyone in the Live Share session sees and uses Copilot's suggestions.",
                reason: "When the team gets stuck, a shared AI assistant breaks the ice.",
            },
        ],
    },
    Bundle {
        id: 7,
        name: "Cloud Architect Legend Pack",
        emoji: "☁️",
        description: "Command complex cloud services and sketch enterprise blueprints like a future architect.",
        extensions: [
            Extension {
                name: "Synthwave '84 Theme",
                icon: "🌈",
                description: "Under a futuristic look even complex microservice architectures feel elegant.",
                reason: "When your templates glow in neon, designing large systems becomes an art.",
            },
            Extension {
                name: "Azure Tools",
                icon: "☁️",
                description: "Cloud tooling with Docker, Kubernetes, CI/CD pipelines and serverless support.",
                reason: "A one-stop enterprise cloud platform so you can focus on architecture, not deployment chores.",
            },
            Extension {
                name: COPILOT,
                icon: "🤖",
                description: "An architect-level assistant that understands API design, infrastructure as code and containers.",
                reason: "Helps design APIs, generate deployment scripts and follow container best practices.",
            },
        ],
    },
    Bundle {
        id: 8,
        name: "AI Alchemist Gear",
        emoji: "🤖",
        description: "Become a next-generation AI alchemist where AI building AI is no longer science fiction.",
        extensions: [
            Extension {
                name: "Synthwave '84 Theme",
                icon: "🌈",
                description: "Model development in a neon cyberpunk workspace.",
                reason: "Every training run feels like a futuristic AI experiment.",
            },
            Extension {
                name: "Azure Machine Learning",
                icon: "🧠",
                description: "AutoML, model registry, deployment and MLOps pipelines inside the editor.",
                reason: "Brings the whole machine learning workflow into VS Code with cloud-native scale.",
            },
            Extension {
                name: COPILOT,
                icon: "🤖",
                description: "Generates ML pipelines, AutoML settings and cognitive service integrations.",
                reason: "Simplifies working with cloud AI services so you can focus on models and algorithms.",
            },
        ],
    },
];

/// Display names whose backend id is not the plain slug of the name.
const EXTENSION_IDS: &[(&str, &str)] = &[
    ("VSCode Pets", "vscode-pets"),
    ("Live Preview", "live-preview"),
    ("GitHub Copilot", "github-copilot"),
    ("Power Mode", "power-mode"),
    ("Code Runner", "code-runner"),
    ("Synthwave '84 Theme", "synthwave-theme"),
    ("Synthwave Theme", "synthwave-theme"),
    ("WakaTime", "wakatime"),
    ("TODO Highlight", "todo-highlight"),
    ("GitLens", "gitlens"),
    ("Live Share", "live-share"),
    ("Azure Tools", "azure-tools"),
    ("Azure ML", "azure-ml"),
    ("Azure Machine Learning", "azure-ml"),
];

/// Maps an extension display name to its backend id.
///
/// Names missing from the table fall back to lowercase with every whitespace
/// run replaced by a single `-`. Nothing is trimmed, so leading or trailing
/// whitespace becomes a leading or trailing `-`.
pub fn extension_id(name: &str) -> String {
    if let Some((_, id)) = EXTENSION_IDS.iter().find(|(known, _)| *known == name) {
        return id.to_string();
    }

    let mut id = String::with_capacity(name.len());
    let mut in_run = false;
    for c in name.chars() {
        if c.is_whitespace() {
            if !in_run {
                id.push('-');
            }
            in_run = true;
        } else {
            id.extend(c.to_lowercase());
            in_run = false;
        }
    }
    id
}

pub fn bundle(id: BundleId) -> &'static Bundle {
    &BUNDLES[id.index()]
}

pub fn lookup(id: u8) -> Result<&'static Bundle, CatalogError> {
    BundleId::new(id).map(bundle)
}

pub fn bundles() -> &'static [Bundle] {
    &BUNDLES
}

/// Every distinct extension across the catalog, in first-seen order.
/// Feeds the "browse all bundles" page and the planet display roster.
pub fn distinct_extensions() -> Vec<&'static Extension> {
    let mut seen: Vec<&'static Extension> = Vec::new();
    for extension in BUNDLES.iter().flat_map(|b| b.extensions.iter()) {
        if !seen.iter().any(|e| extension_id(e.name) == extension_id(extension.name)) {
            seen.push(extension);
        }
    }
    seen
}

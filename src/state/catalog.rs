//! Static catalog of the debate formats the timer can run.

use std::sync::LazyLock;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One of the two opposing sides of a debate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    /// Affirmative side.
    Pros,
    /// Negative side.
    Cons,
}

impl Side {
    /// The opposing side.
    pub fn other(self) -> Self {
        match self {
            Side::Pros => Side::Cons,
            Side::Cons => Side::Pros,
        }
    }

    /// Lowercase name used in logs.
    pub fn as_str(self) -> &'static str {
        match self {
            Side::Pros => "pros",
            Side::Cons => "cons",
        }
    }
}

/// Who holds the floor during a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ParticipantMode {
    /// Plain countdown not tied to a side.
    Unconstrained,
    /// Single clock owned by one side.
    Restricted(Side),
    /// Both sides hold their own clock and alternate turns.
    DualSide,
}

/// Capability a session must hold to drive a given format.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "kebab-case")]
pub enum Capability {
    /// May run the CEDA format.
    CedaTimer,
    /// May run the free debate format.
    FreeTimer,
    /// May run the general countdowns.
    GeneralTimer,
}

impl Capability {
    /// Wire name of the capability.
    pub fn as_str(self) -> &'static str {
        match self {
            Capability::CedaTimer => "ceda-timer",
            Capability::FreeTimer => "free-timer",
            Capability::GeneralTimer => "general-timer",
        }
    }
}

/// Identifier of a catalog format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum FormatId {
    /// Eleven-step CEDA format with deliberation time.
    Ceda,
    /// Five-step format built around one long free discussion.
    FreeDebate,
    /// Fixed one-to-ten minute countdowns plus a custom entry.
    General,
}

impl FormatId {
    /// Every format, in catalog order.
    pub const ALL: [FormatId; 3] = [FormatId::Ceda, FormatId::FreeDebate, FormatId::General];

    /// Static definition backing this format.
    pub fn definition(self) -> &'static FormatDefinition {
        &CATALOG[&self]
    }

    /// Capability needed to run this format.
    pub fn capability(self) -> Capability {
        match self {
            FormatId::Ceda => Capability::CedaTimer,
            FormatId::FreeDebate => Capability::FreeTimer,
            FormatId::General => Capability::GeneralTimer,
        }
    }

    /// Wire name of the format.
    pub fn as_str(self) -> &'static str {
        match self {
            FormatId::Ceda => "ceda",
            FormatId::FreeDebate => "free_debate",
            FormatId::General => "general",
        }
    }
}

/// A single step of a format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    /// Display label.
    pub label: String,
    /// Full length of the step; applied to each side on dual-side steps.
    pub nominal_secs: u32,
    /// Who holds the floor.
    pub mode: ParticipantMode,
    /// Side allowed to call deliberation time before this step starts.
    pub deliberation_chance: Option<Side>,
}

/// Ordered, non-empty list of steps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatDefinition {
    id: FormatId,
    steps: Vec<Step>,
}

impl FormatDefinition {
    /// Identifier of this format.
    pub fn id(&self) -> FormatId {
        self.id
    }

    /// Steps in order.
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Step at `index`, if it exists.
    pub fn step(&self, index: usize) -> Option<&Step> {
        self.steps.get(index)
    }

    /// Number of steps.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Always false; every catalog format has at least one step.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Index of the final step.
    pub fn last_index(&self) -> usize {
        self.steps.len().saturating_sub(1)
    }

    /// Whether any step of this format grants deliberation time.
    pub fn offers_deliberation(&self) -> bool {
        self.steps.iter().any(|step| step.deliberation_chance.is_some())
    }
}

static CATALOG: LazyLock<IndexMap<FormatId, FormatDefinition>> = LazyLock::new(|| {
    FormatId::ALL
        .into_iter()
        .map(|id| (id, build_format(id)))
        .collect()
});

/// Every catalog format, in catalog order.
pub fn formats() -> impl Iterator<Item = &'static FormatDefinition> {
    CATALOG.values()
}

fn build_format(id: FormatId) -> FormatDefinition {
    use ParticipantMode::{DualSide, Restricted, Unconstrained};
    use Side::{Cons, Pros};

    let steps = match id {
        FormatId::Ceda => vec![
            step("Pros 1 Constructive", 4, Restricted(Pros), None),
            step("Cons 2 Cross-Examination", 3, Restricted(Cons), Some(Cons)),
            step("Cons 1 Constructive", 4, Restricted(Cons), None),
            step("Pros 1 Cross-Examination", 3, Restricted(Pros), Some(Pros)),
            step("Pros 2 Constructive", 4, Restricted(Pros), None),
            step("Cons 1 Cross-Examination", 3, Restricted(Cons), Some(Cons)),
            step("Cons 2 Constructive", 4, Restricted(Cons), None),
            step("Pros 2 Cross-Examination", 3, Restricted(Pros), Some(Pros)),
            step("Free Debate", 8, DualSide, Some(Cons)),
            step("Cons Closing", 2, Restricted(Cons), Some(Cons)),
            step("Pros Closing", 2, Restricted(Pros), Some(Pros)),
        ],
        FormatId::FreeDebate => vec![
            step("Pros Opening", 1, Restricted(Pros), None),
            step("Cons Opening", 1, Restricted(Cons), None),
            step("Free Debate", 11, DualSide, None),
            step("Cons Closing", 1, Restricted(Cons), None),
            step("Pros Closing", 1, Restricted(Pros), None),
        ],
        FormatId::General => {
            let mut steps: Vec<Step> = (1..=10)
                .map(|minutes| {
                    let label = if minutes == 1 {
                        "1 Minute".to_string()
                    } else {
                        format!("{minutes} Minutes")
                    };
                    step(&label, minutes, Unconstrained, None)
                })
                .collect();
            steps.push(step(CUSTOM_STEP_LABEL, 0, Unconstrained, None));
            steps
        }
    };

    FormatDefinition { id, steps }
}

/// Label of the general format's manual-entry step.
pub const CUSTOM_STEP_LABEL: &str = "Custom";

fn step(label: &str, minutes: u32, mode: ParticipantMode, chance: Option<Side>) -> Step {
    Step {
        label: label.to_string(),
        nominal_secs: minutes * 60,
        mode,
        deliberation_chance: chance,
    }
}

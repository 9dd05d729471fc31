use serde::Serialize;
use utoipa::ToSchema;

use crate::state::{
    Capability, FormatId, Side,
    catalog::{FormatDefinition, ParticipantMode, Step},
};

/// One step of a format, as rendered on the client's progress rail.
#[derive(Debug, Serialize, ToSchema, Clone)]
pub struct StepSnapshot {
    /// Position in the format.
    pub index: usize,
    /// Display label.
    pub label: String,
    /// Full length in seconds.
    pub nominal_secs: u32,
    /// Who holds the floor.
    pub mode: ParticipantMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    /// Side that may deliberate before this step.
    pub deliberation_chance: Option<Side>,
}

impl StepSnapshot {
    fn from_step(index: usize, step: &Step) -> Self {
        Self {
            index,
            label: step.label.clone(),
            nominal_secs: step.nominal_secs,
            mode: step.mode,
            deliberation_chance: step.deliberation_chance,
        }
    }

    /// Snapshot every step of `definition`, in order.
    pub fn timeline(definition: &FormatDefinition) -> Vec<Self> {
        definition
            .steps()
            .iter()
            .enumerate()
            .map(|(index, step)| Self::from_step(index, step))
            .collect()
    }
}

/// Catalog entry listed by `GET /formats`.
#[derive(Debug, Serialize, ToSchema)]
pub struct FormatSummary {
    /// Format identifier passed to `POST /timer/start`.
    pub id: FormatId,
    /// Capability required to start it.
    pub capability: Capability,
    /// Whether sides get a deliberation budget.
    pub offers_deliberation: bool,
    /// Steps in order.
    pub steps: Vec<StepSnapshot>,
}

impl From<&FormatDefinition> for FormatSummary {
    fn from(definition: &FormatDefinition) -> Self {
        Self {
            id: definition.id(),
            capability: definition.id().capability(),
            offers_deliberation: definition.offers_deliberation(),
            steps: StepSnapshot::timeline(definition),
        }
    }
}

//! Prompt builders for the generation handlers.

use std::fmt::Write as _;

use serde_json::Value;
use taleforge_core::llm::LlmPrompt;
use taleforge_core::repository::StoredArtifact;

use crate::domain::requests::{
    CharacterGenerationRequest, DetailedPlotRequest, WorldGenerationRequest,
};

const NO_REQUIREMENTS: &str = "none";

const WORLD_SYSTEM: &str = "You are a worldbuilder for long-form cultivation fantasy. \
Answer with a single JSON object and nothing else.";

const CHARACTER_SYSTEM: &str = "You are a character designer for long-form cultivation \
fantasy. Answer with a JSON array of character objects and nothing else.";

const PLOT_SYSTEM: &str = "You are a novelist writing long-form cultivation fantasy. \
Answer with the chapter prose only, without headings or commentary.";

/// Prose chapters run long; leave the model room.
const PLOT_MAX_TOKENS: u32 = 8000;

fn text_field<'a>(value: &'a Value, key: &str, fallback: &'a str) -> &'a str {
    value.get(key).and_then(Value::as_str).unwrap_or(fallback)
}

/// Renders the parts of a world body that downstream prompts need: identity,
/// cultivation realms and main regions.
fn world_summary(world: &StoredArtifact) -> String {
    let body = &world.body;
    let mut summary = String::new();
    let _ = writeln!(summary, "- Name: {}", text_field(body, "name", &world.title));
    let _ = writeln!(
        summary,
        "- Description: {}",
        text_field(body, "description", "not provided")
    );
    let _ = writeln!(
        summary,
        "- Core concept: {}",
        text_field(body, "core_concept", "not provided")
    );

    let realms = body
        .pointer("/power_system/cultivation_realms")
        .and_then(Value::as_array);
    if let Some(realms) = realms.filter(|r| !r.is_empty()) {
        summary.push_str("\nCultivation realms:\n");
        for realm in realms {
            let _ = writeln!(
                summary,
                "- {}: {}",
                text_field(realm, "name", "unnamed realm"),
                text_field(realm, "description", "no description")
            );
        }
    }

    let regions = body
        .pointer("/geography/main_regions")
        .and_then(Value::as_array);
    if let Some(regions) = regions.filter(|r| !r.is_empty()) {
        summary.push_str("\nMain regions:\n");
        for region in regions {
            let _ = writeln!(
                summary,
                "- {}: {}",
                text_field(region, "name", "unnamed region"),
                text_field(region, "description", "no description")
            );
        }
    }
    summary
}

/// Builds the prompt for a new world.
#[must_use]
pub fn world_prompt(request: &WorldGenerationRequest) -> LlmPrompt {
    let requirements = request
        .additional_requirements
        .as_deref()
        .unwrap_or(NO_REQUIREMENTS);
    let user = format!(
        "Design a complete, self-consistent world.\n\n\
         ## Input\n\
         - Core concept: {core_concept}\n\
         - Description: {description}\n\
         - Additional requirements: {requirements}\n\n\
         ## Cover\n\
         1. Foundations: name, governing laws, planes and their properties.\n\
         2. Power system: 6-8 cultivation realms, energy types, technique categories.\n\
         3. Geography: 3-4 main regions and notable special locations.\n\
         4. Society: 3-4 major organizations, hierarchy and economy.\n\
         5. History and culture: 2-3 pivotal events and current conflicts.\n\n\
         ## Output\n\
         Return one JSON object with the keys `name`, `description`, `core_concept`, \
         `power_system` (with `cultivation_realms`, `energy_types`, `technique_categories`), \
         `geography` (with `main_regions`, `special_locations`), `society` \
         (with `organizations`) and `history` (with `key_events`). \
         Every array element must be an object with at least `name` and `description`. \
         Give each dimension at least three concrete entries and avoid stock tropes.",
        core_concept = request.core_concept,
        description = request.description,
    );
    LlmPrompt::new(user).with_system(WORLD_SYSTEM)
}

/// Builds the prompt for a batch of characters set in `world`.
#[must_use]
pub fn character_prompt(world: &StoredArtifact, request: &CharacterGenerationRequest) -> LlmPrompt {
    let focus = request.focus.as_deref().unwrap_or("a varied cast");
    let user = format!(
        "Create {count} characters for the following world.\n\n\
         ## World\n{summary}\n\
         ## Character direction\n{focus}\n\n\
         ## Output\n\
         Return a JSON array with exactly {count} objects. Each object needs \
         `name`, `gender`, `age`, `cultivation_realm`, `affiliation`, `appearance`, \
         `personality`, `background`, `goals` and `abilities` (an array of strings). \
         Infer any detail the direction leaves open; never leave a field empty. \
         Realms and affiliations must exist in the world above.",
        count = request.count,
        summary = world_summary(world),
    );
    LlmPrompt::new(user).with_system(CHARACTER_SYSTEM)
}

/// Builds the prompt for a detailed chapter set in `world`.
#[must_use]
pub fn detailed_plot_prompt(world: &StoredArtifact, request: &DetailedPlotRequest) -> LlmPrompt {
    let requirements = request
        .additional_requirements
        .as_deref()
        .unwrap_or(NO_REQUIREMENTS);
    let user = format!(
        "Write the full text of the chapter \"{title}\".\n\n\
         ## World\n{summary}\n\
         ## Chapter outline\n{outline}\n\n\
         ## Additional requirements\n{requirements}\n\n\
         ## Guidance\n\
         Follow the outline's order of events. Show conflict through scene and \
         dialogue, keep cultivation details consistent with the world, and end \
         on a hook into the next chapter.",
        title = request.title,
        summary = world_summary(world),
        outline = request.chapter_summary,
    );
    LlmPrompt::new(user)
        .with_system(PLOT_SYSTEM)
        .with_max_tokens(PLOT_MAX_TOKENS)
}

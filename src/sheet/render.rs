use std::fmt::Write;

use serde::Serialize;

use super::{
    ability::AbilityInfo, capitalize, moves::MoveCandidate, stats::Projection,
    weakness::WeaknessEntry,
};
use crate::pokeapi::model::CreatureRecord;

/// Everything the renderer needs, gathered by the workflow
#[derive(Clone, Debug)]
pub struct SheetInput<'a> {
    pub creature: &'a CreatureRecord,
    pub projection: &'a Projection,
    pub weaknesses: &'a [WeaknessEntry],
    pub ability: &'a AbilityInfo,
    pub moves: &'a [MoveCandidate],
    pub shiny: bool,
    pub level: u32,
    pub nature: &'a str,
}

/// The finished sheet text and the artwork to post with it
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct RenderedSheet {
    pub text: String,
    pub image_url: Option<String>,
}

pub fn type_icon(type_name: &str) -> &'static str {
    match type_name {
        "normal" => "⚪",
        "fire" => "🔥",
        "water" => "💧",
        "grass" => "🌿",
        "electric" => "⚡",
        "ice" => "❄️",
        "fighting" => "🥊",
        "poison" => "☠️",
        "ground" => "🌍",
        "flying" => "🕊️",
        "psychic" => "🧠",
        "bug" => "🐛",
        "rock" => "🪨",
        "ghost" => "👻",
        "dragon" => "🐉",
        "dark" => "🌑",
        "steel" => "⚙️",
        "fairy" => "✨",
        _ => "",
    }
}

pub fn category_icon(category: &str) -> &'static str {
    match category {
        "physical" => "⚔️",
        "special" => "🧠",
        "status" => "✴️",
        _ => "",
    }
}

/// `🔥 Fire`, or just `Fire` for a type without an icon
pub fn pretty_type(type_name: &str) -> String {
    match type_icon(type_name) {
        "" => capitalize(type_name),
        icon => format!("{} {}", icon, capitalize(type_name)),
    }
}

/// Type, category, power and accuracy of a move, as shown in prompts and sheets
pub fn move_details(candidate: &MoveCandidate) -> String {
    let extra: Vec<String> = [
        candidate.power.filter(|p| *p > 0).map(|p| format!("Power {}", p)),
        candidate.accuracy.filter(|a| *a > 0).map(|a| format!("Acc {}%", a)),
    ]
    .into_iter()
    .flatten()
    .collect();

    let mut details = format!(
        "{} {} {} {}",
        type_icon(&candidate.type_name),
        capitalize(&candidate.type_name),
        category_icon(&candidate.category),
        capitalize(&candidate.category)
    )
    .split_whitespace()
    .collect::<Vec<_>>()
    .join(" ");

    if !extra.is_empty() {
        details.push_str(&format!(" ({})", extra.join(" | ")));
    }
    details
}

/// Shiny art when asked for and available, otherwise the normal art
pub fn select_image(creature: &CreatureRecord, shiny: bool) -> Option<String> {
    let art = &creature.artwork;
    if shiny {
        art.shiny.clone().or_else(|| art.normal.clone())
    } else {
        art.normal.clone()
    }
}

/// Lays the sheet out as one code block
pub fn render(input: &SheetInput<'_>) -> RenderedSheet {
    let mut text = String::new();

    let title = input.creature.name.to_uppercase().replace('-', " ");
    let types: Vec<String> = input.creature.types.iter().map(|t| pretty_type(t)).collect();

    // writing into a String can't fail
    let _ = writeln!(text, "**{} — Level {}**", title, input.level);
    let _ = writeln!(text, "Nature: {}", capitalize(input.nature));
    let _ = writeln!(text, "Type: {}", types.join(" | "));
    if input.shiny {
        let _ = writeln!(text, "✨ Shiny");
    }
    let _ = writeln!(
        text,
        "🏅 Ability: {} — {}",
        input.ability.name, input.ability.effect
    );

    let _ = writeln!(text, "\n💖 **Stats:**");
    for (key, value) in input.projection.stats.iter() {
        let marker = if input.projection.top_three.contains(&key) {
            " ★"
        } else {
            ""
        };
        let _ = writeln!(text, "• {}: {}{}", key.label(), value, marker);
    }

    let _ = writeln!(text, "\n⚠️ **Weaknesses:**");
    if input.weaknesses.is_empty() {
        let _ = writeln!(text, "No weaknesses.");
    }
    for weakness in input.weaknesses {
        let _ = writeln!(
            text,
            "- {} (x{})",
            pretty_type(&weakness.type_name),
            weakness.multiplier()
        );
    }

    let _ = writeln!(text, "\n🎯 **Moves:**");
    if input.moves.is_empty() {
        let _ = writeln!(text, "No moves selected.");
    }
    for candidate in input.moves {
        let _ = writeln!(
            text,
            "• {} — {}",
            candidate.display_name(),
            move_details(candidate)
        );
    }

    RenderedSheet {
        text: format!("```{}```", text),
        image_url: select_image(input.creature, input.shiny),
    }
}

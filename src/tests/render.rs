use crate::{
    pokeapi::model::{Artwork, CreatureRecord},
    sheet::{
        ability::AbilityInfo,
        moves::MoveCandidate,
        nature::NatureModifier,
        render::{SheetInput, move_details, pretty_type, render, select_image},
        stats::{StatKey, project},
        weakness::WeaknessEntry,
    },
};

fn creature(artwork: Artwork) -> CreatureRecord {
    CreatureRecord {
        name: "mr-mime".to_string(),
        base_stats: vec![
            (StatKey::Hp, 40),
            (StatKey::Attack, 45),
            (StatKey::Defense, 65),
            (StatKey::SpecialAttack, 100),
            (StatKey::SpecialDefense, 120),
            (StatKey::Speed, 90),
        ],
        types: vec!["psychic".to_string(), "fairy".to_string()],
        abilities: vec![],
        moves: vec![],
        artwork,
    }
}

fn both_arts() -> Artwork {
    Artwork {
        normal: Some("normal.png".to_string()),
        shiny: Some("shiny.png".to_string()),
    }
}

fn candidate(name: &str, power: Option<u32>, accuracy: Option<u32>) -> MoveCandidate {
    MoveCandidate {
        level_learned: 1,
        name: name.to_string(),
        type_name: "psychic".to_string(),
        category: "special".to_string(),
        power,
        accuracy,
    }
}

#[test]
fn test_image_selection() {
    assert_eq!(select_image(&creature(both_arts()), true).as_deref(), Some("shiny.png"));
    assert_eq!(select_image(&creature(both_arts()), false).as_deref(), Some("normal.png"));

    let normal_only = Artwork {
        normal: Some("normal.png".to_string()),
        shiny: None,
    };
    assert_eq!(select_image(&creature(normal_only), true).as_deref(), Some("normal.png"));
    assert_eq!(select_image(&creature(Artwork::default()), true), None);
}

#[test]
fn test_move_details() {
    assert_eq!(
        move_details(&candidate("confusion", Some(50), Some(100))),
        "🧠 Psychic 🧠 Special (Power 50 | Acc 100%)"
    );
    assert_eq!(
        move_details(&candidate("barrier", None, Some(0))),
        "🧠 Psychic 🧠 Special"
    );
}

#[test]
fn test_pretty_type_without_icon() {
    assert_eq!(pretty_type("fire"), "🔥 Fire");
    assert_eq!(pretty_type("shadow"), "Shadow");
}

#[test]
fn test_render_layout() {
    let creature = creature(both_arts());
    let projection = project(&creature.base_stats, 5, NatureModifier::for_nature("timid"));
    let weaknesses = vec![
        WeaknessEntry {
            type_name: "ghost".to_string(),
            multiplicity: 1,
        },
        WeaknessEntry {
            type_name: "steel".to_string(),
            multiplicity: 2,
        },
    ];
    let ability = AbilityInfo {
        name: "Filter".to_string(),
        effect: "Weakens super effective moves.".to_string(),
        hidden: false,
    };
    let moves = vec![candidate("confusion", Some(50), Some(100))];

    let sheet = render(&SheetInput {
        creature: &creature,
        projection: &projection,
        weaknesses: &weaknesses,
        ability: &ability,
        moves: &moves,
        shiny: true,
        level: 5,
        nature: "timid",
    });

    assert!(sheet.text.starts_with("```"));
    assert!(sheet.text.ends_with("```"));
    assert!(sheet.text.contains("**MR MIME — Level 5**"));
    assert!(sheet.text.contains("Nature: Timid"));
    assert!(sheet.text.contains("Type: 🧠 Psychic | ✨ Fairy"));
    assert!(sheet.text.contains("✨ Shiny"));
    assert!(sheet.text.contains("🏅 Ability: Filter — Weakens super effective moves."));
    assert!(sheet.text.contains("• SP.DEF: "));
    assert!(sheet.text.contains("- 👻 Ghost (x2)"));
    assert!(sheet.text.contains("- ⚙️ Steel (x4)"));
    assert!(sheet.text.contains("• Confusion — 🧠 Psychic 🧠 Special (Power 50 | Acc 100%)"));
    assert_eq!(sheet.image_url.as_deref(), Some("shiny.png"));
}

#[test]
fn test_render_empty_sections() {
    let creature = creature(Artwork::default());
    let projection = project(&creature.base_stats, 1, NatureModifier::default());
    let ability = AbilityInfo {
        name: "Soundproof".to_string(),
        effect: String::new(),
        hidden: true,
    };

    let sheet = render(&SheetInput {
        creature: &creature,
        projection: &projection,
        weaknesses: &[],
        ability: &ability,
        moves: &[],
        shiny: false,
        level: 1,
        nature: "hardy",
    });

    assert!(sheet.text.contains("No weaknesses."));
    assert!(sheet.text.contains("No moves selected."));
    assert!(!sheet.text.contains("✨ Shiny"));
    assert_eq!(sheet.image_url, None);
}

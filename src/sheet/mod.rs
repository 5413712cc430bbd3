/// Ability names and effects, with localized fallbacks
pub mod ability;

/// Level-up move filtering and resolution
pub mod moves;

/// Nature stat modifiers
pub mod nature;

/// Text layout of a finished sheet
pub mod render;

/// Stat keys and level projection
pub mod stats;

/// Type weakness aggregation
pub mod weakness;

/// Upper-cases the first letter and lower-cases the rest, like `Fire`
pub fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Turns a slug such as `solar-power` into `Solar Power`
pub fn title_case(slug: &str) -> String {
    slug.split(['-', ' '])
        .filter(|word| !word.is_empty())
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

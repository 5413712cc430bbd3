use serde::Serialize;

use super::title_case;
use crate::pokeapi::{
    ResourceSource, fetch_batch,
    model::{AbilityRef, AbilityResource, decode},
};

/// An ability as offered to the user
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct AbilityInfo {
    pub name: String,
    pub effect: String,
    pub hidden: bool,
}

/// Languages tried in order when picking localized text
///
/// Each tier is a set of language codes; the first tier with a matching
/// entry wins. English is always the last tier.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LocaleChain {
    tiers: Vec<Vec<String>>,
}

impl LocaleChain {
    pub fn new(preferred: &[String]) -> Self {
        let mut tiers = vec![];
        if !preferred.is_empty() {
            tiers.push(preferred.to_vec());
        }
        tiers.push(vec!["en".to_string()]);
        Self { tiers }
    }

    /// The first entry, walking the tiers in order, whose language matches
    pub fn pick<'a, T, L, V>(&self, entries: &'a [T], language: L, usable: V) -> Option<&'a T>
    where
        L: Fn(&T) -> &str,
        V: Fn(&T) -> bool,
    {
        self.tiers.iter().find_map(|tier| {
            entries
                .iter()
                .find(|entry| tier.iter().any(|lang| lang == language(entry)) && usable(entry))
        })
    }
}

impl Default for LocaleChain {
    fn default() -> Self {
        Self::new(&[])
    }
}

/// Builds the offered ability from a resolved resource
/// A missing resource still gives an option named after the slug
pub fn describe_ability(
    reference: &AbilityRef,
    resource: Option<&AbilityResource>,
    locales: &LocaleChain,
) -> AbilityInfo {
    let Some(resource) = resource else {
        return AbilityInfo {
            name: title_case(&reference.name),
            effect: String::new(),
            hidden: reference.hidden,
        };
    };

    let name = locales
        .pick(&resource.names, |n| n.language.name.as_str(), |n| !n.name.is_empty())
        .map(|n| n.name.clone())
        .unwrap_or_else(|| {
            let slug = if resource.name.is_empty() {
                &reference.name
            } else {
                &resource.name
            };
            title_case(slug)
        });

    let effect = locales
        .pick(&resource.effect_entries, |e| e.language.name.as_str(), |e| e.text().is_some())
        .and_then(|e| e.text())
        .unwrap_or_default()
        .to_string();

    AbilityInfo {
        name,
        effect,
        hidden: reference.hidden,
    }
}

/// Resolves every ability of a creature concurrently, in the creature's order
pub async fn fetch_abilities<S: ResourceSource>(
    source: &S,
    abilities: &[AbilityRef],
    locales: &LocaleChain,
) -> Vec<AbilityInfo> {
    let targets: Vec<&str> = abilities.iter().map(|a| a.url.as_str()).collect();
    let fetched = fetch_batch(source, &targets).await;

    abilities
        .iter()
        .zip(fetched)
        .map(|(reference, value)| {
            let resource: Option<AbilityResource> =
                value.and_then(|v| decode(&reference.url, v).ok());
            describe_ability(reference, resource.as_ref(), locales)
        })
        .collect()
}

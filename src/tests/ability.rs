use crate::{
    pokeapi::model::{AbilityRef, AbilityResource},
    sheet::ability::{LocaleChain, describe_ability, fetch_abilities},
};

use super::fixtures::{FakeSource, ability_json, ability_url, init_logger};

fn reference(name: &str, hidden: bool) -> AbilityRef {
    AbilityRef {
        name: name.to_string(),
        url: ability_url(name),
        hidden,
    }
}

fn resource(names: &[(&str, &str)], effects: &[(&str, &str)]) -> AbilityResource {
    serde_json::from_value(ability_json("solar-power", names, effects)).unwrap()
}

fn portuguese_first() -> LocaleChain {
    LocaleChain::new(&["pt".to_string(), "pt-BR".to_string(), "es".to_string()])
}

#[test]
fn test_preferred_locale_wins() {
    let resource = resource(
        &[("en", "Solar Power"), ("es", "Poder Solar")],
        &[("en", "Boosts Sp. Atk in sun."), ("es", "Sube el At. Esp. con sol.")],
    );

    let info = describe_ability(&reference("solar-power", false), Some(&resource), &portuguese_first());

    assert_eq!(info.name, "Poder Solar");
    assert_eq!(info.effect, "Sube el At. Esp. con sol.");
}

#[test]
fn test_falls_back_to_english() {
    let resource = resource(
        &[("en", "Solar Power"), ("ja", "サンパワー")],
        &[("en", "Boosts Sp. Atk in sun.")],
    );

    let info = describe_ability(&reference("solar-power", true), Some(&resource), &portuguese_first());

    assert_eq!(info.name, "Solar Power");
    assert_eq!(info.effect, "Boosts Sp. Atk in sun.");
    assert!(info.hidden);
}

#[test]
fn test_no_usable_locale_uses_slug() {
    let resource = resource(&[("ja", "サンパワー")], &[("ja", "…")]);

    let info = describe_ability(&reference("solar-power", false), Some(&resource), &portuguese_first());

    assert_eq!(info.name, "Solar Power");
    assert_eq!(info.effect, "");
}

#[test]
fn test_default_chain_is_english_only() {
    let resource = resource(&[("es", "Poder Solar"), ("en", "Solar Power")], &[]);

    let info = describe_ability(&reference("solar-power", false), Some(&resource), &LocaleChain::default());

    assert_eq!(info.name, "Solar Power");
}

#[tokio::test]
async fn test_unresolved_ability_keeps_its_slot() {
    init_logger();
    let source = FakeSource::new().with(
        &ability_url("overgrow"),
        ability_json("overgrow", &[("en", "Overgrow")], &[("en", "Powers up Grass moves.")]),
    );

    let abilities = vec![reference("overgrow", false), reference("chlorophyll", true)];
    let infos = fetch_abilities(&source, &abilities, &LocaleChain::default()).await;

    assert_eq!(infos.len(), 2);
    assert_eq!(infos[0].name, "Overgrow");
    assert_eq!(infos[0].effect, "Powers up Grass moves.");
    assert_eq!(infos[1].name, "Chlorophyll");
    assert_eq!(infos[1].effect, "");
    assert!(infos[1].hidden);
}

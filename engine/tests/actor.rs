use loresheet::actor::CHARACTER_TYPE;
use loresheet::content::builtin_actors;
use loresheet::{Actor, ActorError, ConditionKind};

#[test]
fn builtin_character_parses() {
    let actor = Actor::from_json_str(builtin_actors()["nurhael"]).unwrap();
    assert_eq!(actor.name(), "Nurhael");
    let c = actor.as_character().unwrap();

    assert_eq!(c.portrait.as_deref(), Some("nurhael.webp"));
    assert_eq!(c.biography.calling.as_deref(), Some("Warden"));
    assert!(c.conditions.contains(ConditionKind::Weary));
    assert!(!c.conditions.contains(ConditionKind::Miserable));
    assert_eq!(c.resources.endurance.max, 28);
    assert_eq!(c.resources.shadow_scars, 1);
    assert_eq!(c.skills.len(), 10);
    assert_eq!(c.attribute("heart").unwrap().rating, 3);
    assert_eq!(c.attribute("Wits").unwrap().key, "wits");
}

#[test]
fn builtin_adversary_is_generic() {
    let actor = Actor::from_json_str(builtin_actors()["cave_troll"]).unwrap();
    assert!(actor.as_character().is_none());
    match actor {
        Actor::Generic(g) => {
            assert_eq!(g.kind, "adversary");
            assert_eq!(g.data["system"]["hate"]["value"], 7);
        }
        Actor::Character(_) => panic!("adversary parsed as {}", CHARACTER_TYPE),
    }
}

#[test]
fn missing_favoured_defaults_to_false() {
    let actor = Actor::from_value(serde_json::json!({
        "type": "character",
        "system": { "commonSkills": { "scan": { "value": 2 } } }
    }))
    .unwrap();
    assert!(!actor.as_character().unwrap().skill("scan").unwrap().favoured);
}

#[test]
fn attribute_label_falls_back_to_key() {
    let actor = Actor::from_value(serde_json::json!({
        "type": "character",
        "system": { "attributes": { "heart": { "value": 5 } } }
    }))
    .unwrap();
    let heart = actor.as_character().unwrap().attribute("heart").unwrap();
    assert_eq!(heart.label, "heart");
    assert_eq!(heart.name(), "Heart");
}

#[test]
fn non_object_and_bad_json_are_errors() {
    assert!(matches!(
        Actor::from_value(serde_json::json!([1, 2])),
        Err(ActorError::NotAnObject)
    ));
    assert!(matches!(Actor::from_json_str("{"), Err(ActorError::Json(_))));
}

#[test]
fn sloppy_upstream_fields_degrade_instead_of_failing() {
    let actor = Actor::from_value(serde_json::json!({
        "name": "Sloppy",
        "type": "character",
        "system": {
            "stateOfHealth": { "weary": null, "miserable": { "value": "true" } },
            "resources": { "hope": null, "shadow": { "temporary": null }, "travelLoad": null },
            "combatAttributes": { "parry": null },
            "commonSkills": {
                "awe": { "value": 2, "favoured": { "value": "true" } },
                "lore": { "value": 1, "favoured": 1 },
                "scan": { "value": 1, "favoured": "maybe" }
            }
        },
        "items": [{ "name": null, "type": "weapon" }]
    }))
    .unwrap();
    let c = actor.as_character().unwrap();

    assert!(!c.conditions.contains(ConditionKind::Weary));
    assert!(c.conditions.contains(ConditionKind::Miserable));
    assert_eq!(c.resources.hope.max, 0);
    assert_eq!(c.resources.shadow, 0);
    assert_eq!(c.combat.parry, 0);
    assert!(c.skill("awe").unwrap().favoured);
    assert!(c.skill("lore").unwrap().favoured);
    assert!(!c.skill("scan").unwrap().favoured);
    assert_eq!(c.items.len(), 1);
    assert_eq!(c.items[0].name, "");
}

#[test]
fn bad_skill_entries_report_the_real_cause() {
    let err = Actor::from_value(serde_json::json!({
        "type": "character",
        "system": { "commonSkills": { "awe": { "value": "lots" } } }
    }))
    .unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("invalid type"), "{msg}");
    assert!(!msg.contains("untagged"), "{msg}");

    let err = Actor::from_value(serde_json::json!({
        "type": "character",
        "system": { "commonSkills": 7 }
    }))
    .unwrap_err();
    assert!(err.to_string().contains("map or a list"));
}

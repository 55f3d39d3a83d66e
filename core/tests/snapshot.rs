//! Snapshot documents: layering, validation errors, typed loading.

use econo_core::{
    error::SimError,
    snapshot::{merge_documents, read_documents, Snapshot},
    starter::starter_world,
};
use serde_json::{json, Value};

fn document() -> Value {
    json!({
        "system": {
            "t": 12, "interest_rate": 0.01, "min_balance": -20.0,
            "max_age": 300, "eat_every": 4, "spawn_every": 30
        },
        "market": {
            "food": { "type": "linear", "delta": 3, "rate": 0.02, "initial": 1.0 },
            "reproduction_kit": { "type": "exponential", "delta": 0, "rate": 1.01, "initial": 25.0 },
            "ore": { "type": "exponential", "delta": -4, "rate": 1.05, "initial": 3.0 }
        },
        "careers": {
            "miner": {
                "stats": { "total_balance": 4.0, "total_age": 7, "population": 1, "avg_earnings": 0.5 },
                "ops": {
                    "dig": { "costs": {}, "products": { "ore": 2 }, "time": 2 }
                }
            },
            "cook": {
                "ops": {
                    "stew": { "costs": { "ore": 1 }, "products": { "food": 5 }, "time": 1 }
                }
            }
        },
        "units": {
            "miner_0003": { "age": 7, "busy": 1, "career": "miner", "balance": 4.0,
                            "eat_phase": 3, "spawn_phase": 10 },
            "cook_0001": { "age": 0, "busy": 0, "career": "cook", "balance": 0.0 }
        },
        "next_unit_ids": { "miner": 3, "cook": 1 }
    })
}

fn load(doc: Value) -> Result<econo_core::world::World, SimError> {
    Snapshot::from_value(doc)?.into_world()
}

#[test]
fn valid_document_builds_typed_world() {
    let world = load(document()).unwrap();

    assert_eq!(world.system.t, 12);
    assert_eq!(world.market.delta("food").unwrap(), 3);
    assert_eq!(world.market.delta("ore").unwrap(), -4);
    assert_eq!(world.careers["miner"].stats.avg_earnings, 0.5);
    assert_eq!(world.careers["cook"].stats.population, 0);
    assert_eq!(world.careers["cook"].operation("stew").unwrap().duration, 1);

    let miner = world.population.get("miner_0003").unwrap();
    assert_eq!((miner.eat_phase, miner.spawn_phase, miner.busy), (3, 10, 1));
    assert_eq!(world.population.sequencer().counters()["miner"], 3);
}

#[test]
fn missing_phases_default_to_zero() {
    let world = load(document()).unwrap();
    let cook = world.population.get("cook_0001").unwrap();
    assert_eq!((cook.eat_phase, cook.spawn_phase), (0, 0));
}

#[test]
fn saved_world_loads_back_unchanged() {
    let world = starter_world();
    let text = Snapshot::from_world(&world).to_json().unwrap();
    let loaded = Snapshot::from_json(&text).unwrap().into_world().unwrap();
    assert_eq!(loaded, world);
}

#[test]
fn missing_section_is_rejected() {
    let mut doc = document();
    doc.as_object_mut().unwrap().remove("market");
    assert!(matches!(load(doc), Err(SimError::MissingSection { section: "market" })));
}

#[test]
fn next_unit_ids_section_is_optional() {
    let mut doc = document();
    doc.as_object_mut().unwrap().remove("next_unit_ids");
    let world = load(doc).unwrap();
    assert!(world.population.sequencer().counters().is_empty());
}

#[test]
fn mistyped_system_field_is_rejected() {
    let mut doc = document();
    doc["system"]["max_age"] = json!("old");
    let err = load(doc).unwrap_err();
    assert!(matches!(err, SimError::InvalidEntry { section: "system", .. }), "{err}");
}

#[test]
fn fractional_integer_field_is_rejected() {
    let mut doc = document();
    doc["units"]["cook_0001"]["age"] = json!(1.5);
    let err = load(doc).unwrap_err();
    assert!(
        matches!(&err, SimError::InvalidEntry { section: "units", name, .. } if name == "cook_0001"),
        "{err}"
    );
}

#[test]
fn unknown_price_model_is_rejected() {
    let mut doc = document();
    doc["market"]["ore"]["type"] = json!("logistic");
    assert!(matches!(load(doc), Err(SimError::InvalidEntry { section: "market", .. })));
}

#[test]
fn non_mapping_section_is_rejected() {
    let mut doc = document();
    doc["careers"] = json!(["miner", "cook"]);
    assert!(matches!(load(doc), Err(SimError::InvalidField { .. })));
}

#[test]
fn market_needs_food_and_kits() {
    let mut doc = document();
    doc["market"].as_object_mut().unwrap().remove("reproduction_kit");
    assert!(matches!(
        load(doc),
        Err(SimError::MissingMarketResource { resource: "reproduction_kit" })
    ));
}

#[test]
fn operation_with_unknown_resource_is_rejected() {
    let mut doc = document();
    doc["careers"]["cook"]["ops"]["stew"]["costs"]["salt"] = json!(1);
    let err = load(doc).unwrap_err();
    assert!(matches!(&err, SimError::UnknownResource { resource, .. } if resource == "salt"), "{err}");
}

#[test]
fn zero_time_operation_is_rejected() {
    let mut doc = document();
    doc["careers"]["miner"]["ops"]["dig"]["time"] = json!(0);
    assert!(matches!(load(doc), Err(SimError::ZeroDuration { .. })));
}

#[test]
fn negative_quantity_is_rejected() {
    let mut doc = document();
    doc["careers"]["miner"]["ops"]["dig"]["products"]["ore"] = json!(-2);
    assert!(matches!(load(doc), Err(SimError::InvalidField { .. })));
}

#[test]
fn unit_with_unknown_career_is_rejected() {
    let mut doc = document();
    doc["units"]["cook_0001"]["career"] = json!("pirate");
    let err = load(doc).unwrap_err();
    assert!(matches!(&err, SimError::UnknownCareer { career, .. } if career == "pirate"), "{err}");
}

#[test]
fn phase_outside_interval_is_rejected() {
    let mut doc = document();
    doc["units"]["miner_0003"]["eat_phase"] = json!(4);
    assert!(matches!(load(doc), Err(SimError::InvalidField { .. })));
}

#[test]
fn zero_intervals_are_rejected() {
    let mut doc = document();
    doc["system"]["spawn_every"] = json!(0);
    assert!(matches!(load(doc), Err(SimError::InvalidField { .. })));
}

#[test]
fn later_documents_override_earlier_keys() {
    let mut merged = document();
    merge_documents(&mut merged, json!({
        "system": { "max_age": 50 },
        "market": { "food": { "delta": 0 } },
        "units": { "cook_0002": { "age": 1, "busy": 0, "career": "cook", "balance": 2.0 } }
    }));

    let world = load(merged).unwrap();
    assert_eq!(world.system.max_age, 50);
    assert_eq!(world.system.eat_every, 4, "untouched keys survive");
    assert_eq!(world.market.delta("food").unwrap(), 0);
    assert_eq!(world.market.resource("food").unwrap().rate, 0.02);
    assert_eq!(world.population.len(), 3);
}

#[test]
fn documents_are_read_and_merged_from_disk() {
    let dir = std::env::temp_dir().join(format!("econo-snapshot-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let base = dir.join("base.json");
    let overlay = dir.join("overlay.json");
    std::fs::write(&base, document().to_string()).unwrap();
    std::fs::write(&overlay, json!({ "system": { "t": 99 } }).to_string()).unwrap();

    let merged = read_documents(&[&base, &overlay]).unwrap();
    let world = load(merged).unwrap();
    assert_eq!(world.system.t, 99);

    assert!(read_documents(&[dir.join("missing.json")]).is_err());
    std::fs::remove_dir_all(&dir).ok();
}

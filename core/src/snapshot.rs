//! Snapshot documents: full simulation state to/from JSON.
//!
//! A snapshot has five sections: `system`, `market`, `careers`, `units`
//! and `next_unit_ids`. Several documents may be layered; later documents
//! override earlier keys and nested mappings merge recursively.
//!
//! Loading is a single validation pass: every entry is decoded on its own
//! so an error names the section and entity at fault, then every
//! cross-reference is checked before a typed `World` is built.

use crate::{
    catalog::{Career, CareerStats, Operation},
    config::{field, SystemParams},
    error::{SimError, SimResult},
    market::{Market, PriceModel, Resource},
    population::{Population, Unit, UnitIdSequencer},
    types::{CareerName, ResourceName, Tick, UnitName, FOOD, REPRODUCTION_KIT},
    world::World,
};
use anyhow::Context;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{Map, Value};
use std::{collections::BTreeMap, path::Path};

pub const SNAPSHOT_INTERVAL: Tick = 30;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OperationDoc {
    #[serde(default)]
    pub costs:    BTreeMap<ResourceName, i64>,
    #[serde(default)]
    pub products: BTreeMap<ResourceName, i64>,
    pub time:     Tick,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CareerDoc {
    #[serde(default)]
    pub stats: CareerStats,
    pub ops:   BTreeMap<String, OperationDoc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UnitDoc {
    pub age:         Tick,
    pub busy:        Tick,
    pub career:      CareerName,
    pub balance:     f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eat_phase:   Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spawn_phase: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Snapshot {
    pub system:        SystemParams,
    pub market:        Market,
    pub careers:       BTreeMap<CareerName, CareerDoc>,
    pub units:         BTreeMap<UnitName, UnitDoc>,
    #[serde(default)]
    pub next_unit_ids: BTreeMap<CareerName, u64>,
}

impl Snapshot {
    /// Decode a merged document section by section.
    pub fn from_value(value: Value) -> SimResult<Self> {
        let Value::Object(mut root) = value else {
            return Err(field("snapshot", "must be a mapping"));
        };

        let system = decode_entry("system", "system", required(&mut root, "system")?)?;
        let market = Market::from_entries(
            decode_section("market", required(&mut root, "market")?)?,
        );
        let careers = decode_section("careers", required(&mut root, "careers")?)?;
        let units = decode_section("units", required(&mut root, "units")?)?;
        let next_unit_ids = match root.remove("next_unit_ids") {
            Some(v) => decode_section("next_unit_ids", v)?,
            None => BTreeMap::new(),
        };

        Ok(Self { system, market, careers, units, next_unit_ids })
    }

    pub fn from_json(text: &str) -> SimResult<Self> {
        Self::from_value(serde_json::from_str(text)?)
    }

    pub fn to_json(&self) -> SimResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Capture the full state of `world`.
    pub fn from_world(world: &World) -> Self {
        let careers = world
            .careers
            .iter()
            .map(|(name, career)| {
                let ops = career
                    .operations()
                    .iter()
                    .map(|op| {
                        (op.name.clone(), OperationDoc {
                            costs:    op.costs.clone(),
                            products: op.products.clone(),
                            time:     op.duration,
                        })
                    })
                    .collect();
                (name.clone(), CareerDoc { stats: career.stats.clone(), ops })
            })
            .collect();

        let units = world
            .population
            .iter()
            .map(|u| {
                (u.name.clone(), UnitDoc {
                    age:         u.age,
                    busy:        u.busy,
                    career:      u.career.clone(),
                    balance:     u.balance,
                    eat_phase:   Some(u.eat_phase),
                    spawn_phase: Some(u.spawn_phase),
                })
            })
            .collect();

        Self {
            system: world.system.clone(),
            market: world.market.clone(),
            careers,
            units,
            next_unit_ids: world.population.sequencer().counters().clone(),
        }
    }

    /// Validate every section and cross-reference, producing a `World`.
    pub fn into_world(self) -> SimResult<World> {
        self.system.validate()?;
        validate_market(&self.market)?;

        if self.careers.is_empty() {
            return Err(SimError::NoCareers);
        }
        let mut careers = BTreeMap::new();
        for (career_name, doc) in self.careers {
            let mut ops = Vec::with_capacity(doc.ops.len());
            for (op_name, op) in doc.ops {
                let op = Operation {
                    name:     op_name,
                    costs:    op.costs,
                    products: op.products,
                    duration: op.time,
                };
                validate_operation(&career_name, &op, &self.market)?;
                ops.push(op);
            }
            let career = Career::new(&career_name, ops).with_stats(doc.stats);
            careers.insert(career_name, career);
        }

        for career in self.next_unit_ids.keys() {
            if !careers.contains_key(career) {
                return Err(SimError::UnknownCareer {
                    context: "next_unit_ids".into(),
                    career:  career.clone(),
                });
            }
        }

        let mut population = Population::new(UnitIdSequencer::from_counters(self.next_unit_ids));
        for (name, doc) in self.units {
            if !careers.contains_key(&doc.career) {
                return Err(SimError::UnknownCareer {
                    context: format!("unit '{name}'"),
                    career:  doc.career,
                });
            }
            let eat_phase = phase(&name, "eat_phase", doc.eat_phase, self.system.eat_every)?;
            let spawn_phase =
                phase(&name, "spawn_phase", doc.spawn_phase, self.system.spawn_every)?;
            population.insert(Unit {
                name,
                age: doc.age,
                busy: doc.busy,
                career: doc.career,
                balance: doc.balance,
                eat_phase,
                spawn_phase,
            });
        }

        Ok(World {
            system: self.system,
            market: self.market,
            careers,
            population,
        })
    }
}

impl Market {
    fn from_entries(entries: BTreeMap<ResourceName, Resource>) -> Self {
        entries
            .into_iter()
            .fold(Market::new(), |m, (name, res)| m.with_resource(&name, res))
    }
}

/// Read and merge snapshot documents in order.
pub fn read_documents<P: AsRef<Path>>(paths: &[P]) -> anyhow::Result<Value> {
    let mut merged = Value::Object(Map::new());
    for path in paths {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Cannot read {}", path.display()))?;
        let doc: Value = serde_json::from_str(&content)
            .with_context(|| format!("Cannot parse {}", path.display()))?;
        merge_documents(&mut merged, doc);
    }
    Ok(merged)
}

/// Overlay `top` onto `base`. Mappings merge key by key; anything else
/// replaces the base value.
pub fn merge_documents(base: &mut Value, top: Value) {
    match (base, top) {
        (Value::Object(base), Value::Object(top)) => {
            for (key, value) in top {
                match base.get_mut(&key) {
                    Some(existing) => merge_documents(existing, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (base, top) => *base = top,
    }
}

fn required(root: &mut Map<String, Value>, section: &'static str) -> SimResult<Value> {
    root.remove(section).ok_or(SimError::MissingSection { section })
}

fn decode_entry<T: DeserializeOwned>(section: &'static str, name: &str, value: Value) -> SimResult<T> {
    serde_json::from_value(value).map_err(|e| SimError::InvalidEntry {
        section,
        name:    name.to_string(),
        message: e.to_string(),
    })
}

fn decode_section<T: DeserializeOwned>(
    section: &'static str,
    value: Value,
) -> SimResult<BTreeMap<String, T>> {
    let Value::Object(entries) = value else {
        return Err(field(section, "must be a mapping"));
    };
    entries
        .into_iter()
        .map(|(name, v)| decode_entry(section, &name, v).map(|t| (name, t)))
        .collect()
}

fn validate_market(market: &Market) -> SimResult<()> {
    for resource in [FOOD, REPRODUCTION_KIT] {
        if !market.contains(resource) {
            return Err(SimError::MissingMarketResource { resource });
        }
    }
    for (name, res) in market.resources() {
        if !res.rate.is_finite() || !res.initial.is_finite() {
            return Err(field(&format!("market.{name}"), "rate and initial must be finite"));
        }
        if res.model == PriceModel::Exponential && (res.rate <= 0.0 || res.initial <= 0.0) {
            return Err(field(
                &format!("market.{name}"),
                "exponential rate and initial must be positive",
            ));
        }
    }
    Ok(())
}

fn validate_operation(career: &str, op: &Operation, market: &Market) -> SimResult<()> {
    if op.duration == 0 {
        return Err(SimError::ZeroDuration {
            career:    career.to_string(),
            operation: op.name.clone(),
        });
    }
    for resource in op.resources() {
        if !market.contains(resource) {
            return Err(SimError::UnknownResource {
                context:  format!("operation '{career}.{}'", op.name),
                resource: resource.clone(),
            });
        }
    }
    for (kind, table) in [("costs", &op.costs), ("products", &op.products)] {
        for (resource, qty) in table {
            if *qty < 0 {
                return Err(field(
                    &format!("careers.{career}.ops.{}.{kind}.{resource}", op.name),
                    "quantity must be non-negative",
                ));
            }
        }
    }
    Ok(())
}

fn phase(unit: &str, key: &str, value: Option<u64>, every: u64) -> SimResult<u64> {
    let Some(phase) = value else {
        log::warn!("unit {unit} has no {key}; defaulting to 0");
        return Ok(0);
    };
    if phase >= every {
        return Err(field(
            &format!("units.{unit}.{key}"),
            &format!("must be below {every}"),
        ));
    }
    Ok(phase)
}

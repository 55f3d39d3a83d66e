//! Market: per-resource pricing state with market impact.
//!
//! Price is a pure function of a resource's curve parameters and its
//! current `delta` (net purchases minus sales since the reference point).
//! Buying walks the curve up, selling walks it down. Multi-unit quotes
//! are summed unit by unit, so a batch quote always equals the same
//! number of single quotes interleaved with the matching mutations.

use crate::{
    error::{SimError, SimResult},
    types::ResourceName,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PriceModel {
    /// `initial + delta * rate`, clamped at zero.
    Linear,
    /// `initial * rate^delta`.
    Exponential,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Resource {
    #[serde(rename = "type")]
    pub model:   PriceModel,
    pub delta:   i64,
    pub rate:    f64,
    pub initial: f64,
}

impl Resource {
    pub fn linear(initial: f64, rate: f64) -> Self {
        Self { model: PriceModel::Linear, delta: 0, rate, initial }
    }

    pub fn exponential(initial: f64, rate: f64) -> Self {
        Self { model: PriceModel::Exponential, delta: 0, rate, initial }
    }

    /// Price of a single unit at curve position `at`.
    pub fn unit_price(&self, at: i64) -> f64 {
        match self.model {
            PriceModel::Linear => (self.initial + at as f64 * self.rate).max(0.0),
            PriceModel::Exponential => self.initial * self.rate.powf(at as f64),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct Market {
    resources: BTreeMap<ResourceName, Resource>,
}

impl Market {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_resource(mut self, name: &str, resource: Resource) -> Self {
        self.insert(name, resource);
        self
    }

    pub fn insert(&mut self, name: &str, resource: Resource) {
        self.resources.insert(name.to_string(), resource);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.resources.contains_key(name)
    }

    pub fn resource(&self, name: &str) -> Option<&Resource> {
        self.resources.get(name)
    }

    pub fn resources(&self) -> impl Iterator<Item = (&ResourceName, &Resource)> {
        self.resources.iter()
    }

    /// Current net purchases of `name`.
    pub fn delta(&self, name: &str) -> SimResult<i64> {
        Ok(self.lookup(name)?.delta)
    }

    /// Cost of buying `qty` units right now.
    pub fn ask(&self, name: &str, qty: i64) -> SimResult<f64> {
        let res = self.quote(name, qty)?;
        Ok((0..qty).map(|i| res.unit_price(res.delta + i)).sum())
    }

    /// Value received for selling `qty` units right now.
    /// Evaluated at `delta - 1, delta - 2, ...`.
    pub fn bid(&self, name: &str, qty: i64) -> SimResult<f64> {
        let res = self.quote(name, qty)?;
        Ok((0..qty).map(|i| res.unit_price(res.delta - 1 - i)).sum())
    }

    /// Record a purchase. Callers quote with `ask` first.
    pub fn buy(&mut self, name: &str, qty: i64) -> SimResult<()> {
        check_qty(name, qty)?;
        self.lookup_mut(name)?.delta += qty;
        Ok(())
    }

    /// Record a sale. Callers quote with `bid` first.
    pub fn sell(&mut self, name: &str, qty: i64) -> SimResult<()> {
        check_qty(name, qty)?;
        self.lookup_mut(name)?.delta -= qty;
        Ok(())
    }

    fn quote(&self, name: &str, qty: i64) -> SimResult<&Resource> {
        let res = self.lookup(name)?;
        check_qty(name, qty)?;
        Ok(res)
    }

    fn lookup(&self, name: &str) -> SimResult<&Resource> {
        self.resources.get(name).ok_or_else(|| unknown(name))
    }

    fn lookup_mut(&mut self, name: &str) -> SimResult<&mut Resource> {
        self.resources.get_mut(name).ok_or_else(|| unknown(name))
    }
}

fn check_qty(name: &str, qty: i64) -> SimResult<()> {
    if qty < 0 {
        return Err(SimError::InvalidQuantity { resource: name.to_string(), qty });
    }
    Ok(())
}

fn unknown(name: &str) -> SimError {
    SimError::UnknownResource {
        context:  "market query".into(),
        resource: name.to_string(),
    }
}

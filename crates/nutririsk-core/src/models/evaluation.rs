use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use ts_rs::TS;

use crate::risk::RiskLabel;

/// Clamped points earned on one questionnaire item, next to the item maximum.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ItemPoints {
    #[serde(rename = "puntos")]
    pub points: f64,
    #[serde(rename = "maximo")]
    pub maximum: f64,
}

/// Per-item breakdown keyed by question id, kept in registry order.
///
/// Serialized as a JSON object whose key order matches the registry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScoreDetail {
    entries: Vec<(String, ItemPoints)>,
}

impl ScoreDetail {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an item. A repeated id replaces the earlier entry in place.
    pub fn insert(&mut self, id: impl Into<String>, points: ItemPoints) {
        let id = id.into();
        match self.entries.iter_mut().find(|(k, _)| *k == id) {
            Some(entry) => entry.1 = points,
            None => self.entries.push((id, points)),
        }
    }

    pub fn get(&self, id: &str) -> Option<&ItemPoints> {
        self.entries.iter().find(|(k, _)| k == id).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ItemPoints)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total_maximum(&self) -> f64 {
        self.entries.iter().map(|(_, p)| p.maximum).sum()
    }
}

impl Serialize for ScoreDetail {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (id, points) in &self.entries {
            map.serialize_entry(id, points)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ScoreDetail {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct DetailVisitor;

        impl<'de> Visitor<'de> for DetailVisitor {
            type Value = ScoreDetail;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of question id to {puntos, maximo}")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut detail = ScoreDetail::new();
                while let Some((id, points)) = access.next_entry::<String, ItemPoints>()? {
                    detail.insert(id, points);
                }
                Ok(detail)
            }
        }

        deserializer.deserialize_map(DetailVisitor)
    }
}

/// Outcome of scoring one questionnaire submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct EvaluationResult {
    /// Sum of clamped item points, `0 ≤ score_raw ≤ score_max`.
    pub score_raw: f64,
    /// Sum of every item maximum in the registry.
    pub score_max: f64,
    /// `score_raw / score_max * 100`, or 0 when `score_max` is 0.
    pub score_normalized: f64,
    pub label: RiskLabel,
    #[ts(type = "Record<string, ItemPoints>")]
    pub detail: ScoreDetail,
}

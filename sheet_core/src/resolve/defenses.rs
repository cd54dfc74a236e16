//! Resistances, immunities and senses granted by racial traits

use crate::config::RulesConfig;
use crate::data::{Race, Subrace, Trait};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Defenses {
    pub resistances: Vec<String>,
    pub immunities: Vec<String>,
    pub vulnerabilities: Vec<String>,
    pub condition_immunities: Vec<String>,
    /// Sense -> range in feet, the longest grant wins
    pub senses: BTreeMap<String, u32>,
}

fn add_all(set: &mut Vec<String>, values: &[String]) {
    for value in values {
        if !set.contains(value) {
            set.push(value.clone());
        }
    }
}

impl Defenses {
    fn add(&mut self, t: &Trait) {
        let grants = &t.grants;
        add_all(&mut self.resistances, &grants.resistances);
        add_all(&mut self.immunities, &grants.immunities);
        add_all(&mut self.vulnerabilities, &grants.vulnerabilities);
        add_all(&mut self.condition_immunities, &grants.condition_immunities);
        for (sense, range) in &grants.senses {
            let entry = self.senses.entry(sense.clone()).or_insert(0);
            *entry = (*entry).max(*range);
        }
    }
}

/// Aggregate trait grants of the race and selected subrace
pub fn compute_defenses(race: &Race, subrace: Option<&Subrace>, rules: &RulesConfig) -> Defenses {
    let mut defenses = Defenses::default();
    let subrace_traits = subrace.map(|s| s.traits.as_slice()).unwrap_or_default();
    for t in race.traits.iter().chain(subrace_traits) {
        defenses.add(t);
    }

    if !rules.damage_types.is_empty() {
        let damage_types = defenses
            .resistances
            .iter()
            .chain(&defenses.immunities)
            .chain(&defenses.vulnerabilities);
        for damage_type in damage_types.filter(|d| !rules.is_known_damage_type(d)) {
            tracing::warn!(damage_type = %damage_type, race = %race.name, "trait grants unknown damage type");
        }
    }
    defenses
}

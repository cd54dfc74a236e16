//! Spellcasting: primary source detection, pact and multiclass slot progression

use super::{AbilityStage, ComputeError, FeatureSource, ProgressionStage};
use crate::data::{Class, DataIntegrityError, GameData, Spellcasting};
use crate::state::{CharacterState, ClassLevel};
use crate::types::{Ability, CasterType, SourceKind};
use serde::{Deserialize, Serialize};

/// Added to `level * multiplier` before flooring so thirds land on whole levels
const CASTER_LEVEL_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpellcastingBlock {
    /// Class or subclass that declares the primary spellcasting
    pub source: FeatureSource,
    /// Level of the class the primary source belongs to
    pub class_level: u32,
    pub ability: Ability,
    pub caster_type: CasterType,
    pub save_dc: i32,
    pub attack_bonus: i32,
    pub cantrips_known: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spells_known: Option<u32>,
    pub slots: SpellSlots,
    pub spells: Vec<KnownSpell>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum SpellSlots {
    /// Shared multiclass table; `slots[i]` is the count for spell level `i + 1`
    Standard {
        effective_caster_level: u32,
        slots: Vec<u32>,
    },
    Pact { count: u32, level: u32 },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KnownSpell {
    pub key: String,
    pub name: String,
    pub level: u8,
    pub prepared: bool,
}

/// Pact slots at a class level
pub fn pact_slot_count(class_level: u32) -> u32 {
    match class_level {
        0..=2 => 1,
        3..=11 => 2,
        12..=17 => 3,
        _ => 4,
    }
}

/// Spell level of every pact slot at a class level
pub fn pact_slot_level(class_level: u32) -> u32 {
    match class_level {
        0..=3 => 1,
        4..=5 => 2,
        6..=7 => 3,
        8..=9 => 4,
        _ => 5,
    }
}

/// A spellcasting descriptor and the class or subclass declaring it
struct CasterSource<'a> {
    entry: &'a ClassLevel,
    kind: SourceKind,
    key: &'a str,
    descriptor: &'a Spellcasting,
}

/// The class's own descriptor, else its active subclass's
fn caster_source<'a>(entry: &'a ClassLevel, class: &'a Class) -> Option<CasterSource<'a>> {
    if let Some(descriptor) = &class.spellcasting {
        return Some(CasterSource {
            entry,
            kind: SourceKind::Class,
            key: &entry.class,
            descriptor,
        });
    }
    let subclass_key = entry.subclass.as_deref()?;
    let descriptor = class.subclasses.get(subclass_key)?.spellcasting.as_ref()?;
    Some(CasterSource {
        entry,
        kind: SourceKind::Subclass,
        key: subclass_key,
        descriptor,
    })
}

impl CasterSource<'_> {
    /// Declared caster type, else the rules grouping of the source or its class
    fn caster_type(&self, data: &GameData) -> Result<CasterType, DataIntegrityError> {
        let groups = &data.rules.multiclass_spell_slots;
        self.descriptor
            .caster_type
            .or_else(|| groups.caster_type_of(self.key))
            .or_else(|| groups.caster_type_of(&self.entry.class))
            .ok_or_else(|| DataIntegrityError::MissingCasterType(self.key.to_string()))
    }
}

/// Sum of `floor(level * multiplier)` over every non-pact caster class
fn effective_caster_level(sources: &[CasterSource<'_>], data: &GameData) -> Result<u32, ComputeError> {
    let mut total = 0;
    for source in sources {
        let caster_type = source.caster_type(data)?;
        if caster_type == CasterType::Pact {
            continue;
        }
        let multiplier = data
            .rules
            .multiclass_spell_slots
            .multiplier(caster_type)
            .ok_or(DataIntegrityError::MissingCasterMultiplier(caster_type))?;
        total += (f64::from(source.entry.level) * multiplier + CASTER_LEVEL_EPSILON).floor() as u32;
    }
    Ok(total)
}

fn known_spells(state: &CharacterState, data: &GameData) -> Result<Vec<KnownSpell>, ComputeError> {
    let mut spells: Vec<KnownSpell> = Vec::new();
    for key in state.known_spells.iter().chain(&state.prepared_spells) {
        if spells.iter().any(|s| &s.key == key) {
            continue;
        }
        let spell = data.spell(key)?;
        spells.push(KnownSpell {
            key: key.clone(),
            name: spell.name.clone(),
            level: spell.level,
            prepared: state.prepared_spells.contains(key),
        });
    }
    Ok(spells)
}

/// Spellcasting block, or `None` when no class or active subclass casts
///
/// The first class in list order with a descriptor is the primary source.
/// Pact casters take slots from their own class level; everyone else uses the
/// shared multiclass table at the effective caster level.
pub fn compute_spellcasting(
    state: &CharacterState,
    data: &GameData,
    abilities: &AbilityStage,
    progression: &ProgressionStage,
) -> Result<Option<SpellcastingBlock>, ComputeError> {
    let mut sources = Vec::new();
    for entry in &state.classes {
        let class = data.class(&entry.class)?;
        if let Some(source) = caster_source(entry, class) {
            sources.push(source);
        }
    }

    let Some(primary) = sources.first() else {
        return Ok(None);
    };

    let caster_type = primary.caster_type(data)?;
    let class_level = primary.entry.level;
    let modifier = abilities.modifier(primary.descriptor.ability);
    let pb = progression.proficiency_bonus;

    let slots = match caster_type {
        CasterType::Pact => SpellSlots::Pact {
            count: pact_slot_count(class_level),
            level: pact_slot_level(class_level),
        },
        CasterType::Full | CasterType::Half | CasterType::Third => {
            let effective = effective_caster_level(&sources, data)?;
            tracing::debug!(effective_caster_level = effective, "multiclass caster level");
            SpellSlots::Standard {
                effective_caster_level: effective,
                slots: data.rules.multiclass_spell_slots.slots_for(effective),
            }
        }
    };

    tracing::debug!(source = primary.key, ?caster_type, ?slots, "resolved spellcasting");

    Ok(Some(SpellcastingBlock {
        source: FeatureSource {
            kind: primary.kind,
            key: primary.key.to_string(),
        },
        class_level,
        ability: primary.descriptor.ability,
        caster_type,
        save_dc: 8 + pb + modifier,
        attack_bonus: pb + modifier,
        cantrips_known: primary.descriptor.cantrips_at(class_level),
        spells_known: primary.descriptor.spells_known_at(class_level),
        slots,
        spells: known_spells(state, data)?,
    }))
}

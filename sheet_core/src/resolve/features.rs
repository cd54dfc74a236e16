//! Flattened feature list from race, classes, background and feats

use super::ComputeError;
use crate::data::{ClassFeature, FeatureKind, GameData};
use crate::state::CharacterState;
use crate::types::{feature_id, SourceKind};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feature {
    /// Stable id that `FeatureChoice.featureId` refers to
    pub id: String,
    pub name: String,
    pub description: String,
    pub source: FeatureSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<u32>,
    pub kind: FeatureKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureSource {
    pub kind: SourceKind,
    pub key: String,
}

impl FeatureSource {
    fn new(kind: SourceKind, key: &str) -> Self {
        FeatureSource {
            kind,
            key: key.to_string(),
        }
    }
}

fn unleveled(kind: SourceKind, key: &str, name: &str, description: &str) -> Feature {
    Feature {
        id: feature_id::unleveled(kind.key(), key, name),
        name: name.to_string(),
        description: description.to_string(),
        source: FeatureSource::new(kind, key),
        level: None,
        kind: FeatureKind::Standard,
    }
}

fn leveled(kind: SourceKind, key: &str, feature: &ClassFeature) -> Feature {
    Feature {
        id: feature_id::leveled(key, feature.level, &feature.name),
        name: feature.name.clone(),
        description: feature.description.clone(),
        source: FeatureSource::new(kind, key),
        level: Some(feature.level),
        kind: feature.kind,
    }
}

/// Race traits, subrace traits, each class's unlocked features followed by its
/// subclass's, the background feature, then one entry per feat
///
/// Features are aggregated independently; one feature altering another is not
/// modeled.
pub fn compute_features(
    state: &CharacterState,
    data: &GameData,
) -> Result<Vec<Feature>, ComputeError> {
    let mut features = Vec::new();

    let race = data.race(&state.race)?;
    features.extend(
        race.traits
            .iter()
            .map(|t| unleveled(SourceKind::Race, &state.race, &t.name, &t.description)),
    );

    if let Some(subrace) = data.subrace(race, state.subrace.as_deref()) {
        let key = state.subrace.as_deref().unwrap_or_default();
        features.extend(
            subrace
                .traits
                .iter()
                .map(|t| unleveled(SourceKind::Subrace, key, &t.name, &t.description)),
        );
    }

    for entry in &state.classes {
        let class = data.class(&entry.class)?;
        features.extend(
            class
                .features_through(entry.level)
                .into_iter()
                .map(|f| leveled(SourceKind::Class, &entry.class, f)),
        );

        let Some(subclass_key) = entry.subclass.as_deref() else {
            continue;
        };
        match class.subclasses.get(subclass_key) {
            Some(subclass) => features.extend(
                subclass
                    .features_through(entry.level)
                    .into_iter()
                    .map(|f| leveled(SourceKind::Subclass, subclass_key, f)),
            ),
            None => tracing::warn!(
                class = %entry.class,
                subclass = subclass_key,
                "selected subclass not found; ignoring"
            ),
        }
    }

    let background = data.background(&state.background)?;
    if let Some(feature) = &background.feature {
        features.push(unleveled(
            SourceKind::Background,
            &state.background,
            &feature.name,
            &feature.description,
        ));
    }

    for key in &state.feats {
        let feat = data.feat(key)?;
        features.push(Feature {
            id: feature_id::feat(key),
            name: feat.name.clone(),
            description: feat.description.clone(),
            source: FeatureSource::new(SourceKind::Feat, key),
            level: None,
            kind: FeatureKind::Standard,
        });
    }

    Ok(features)
}

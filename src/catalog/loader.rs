//! Load catalogs from TOML files

use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};

use super::Catalog;
use crate::core::error::{ForgeError, Result};

/// Catalog file names and their embedded copies
const FILES: [(&str, &str); 7] = [
    ("races.toml", include_str!("../../data/catalog/races.toml")),
    ("classes.toml", include_str!("../../data/catalog/classes.toml")),
    ("alignments.toml", include_str!("../../data/catalog/alignments.toml")),
    ("items.toml", include_str!("../../data/catalog/items.toml")),
    ("abilities.toml", include_str!("../../data/catalog/abilities.toml")),
    ("creatures.toml", include_str!("../../data/catalog/creatures.toml")),
    ("quests.toml", include_str!("../../data/catalog/quests.toml")),
];

impl Catalog {
    /// The default catalog compiled into the binary
    pub fn embedded() -> Result<Self> {
        let catalog = Self::assemble(|file| {
            let content = FILES
                .iter()
                .find(|(name, _)| *name == file)
                .map(|(_, content)| content.to_string())
                .unwrap_or_default();
            Ok((PathBuf::from(file), content))
        })?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Load every catalog file from `dir`; a missing or malformed file is an error
    pub fn load_dir(dir: &Path) -> Result<Self> {
        let catalog = Self::assemble(|file| {
            let path = dir.join(file);
            let content = fs::read_to_string(&path).map_err(|source| ForgeError::Io {
                path: path.clone(),
                source,
            })?;
            tracing::debug!("Read catalog file {}", path.display());
            Ok((path, content))
        })?;
        catalog.validate()?;

        tracing::info!(
            "Loaded catalog from {}: {} races, {} classes, {} items, {} abilities, {} creatures, {} quest templates",
            dir.display(),
            catalog.races.len(),
            catalog.classes.len(),
            catalog.items.len(),
            catalog.abilities.len(),
            catalog.creatures.len(),
            catalog.quest_templates.len(),
        );
        Ok(catalog)
    }

    fn assemble(mut read: impl FnMut(&str) -> Result<(PathBuf, String)>) -> Result<Self> {
        let mut next = |file: &str, key: &str| -> Result<(PathBuf, toml::Value)> {
            let (path, content) = read(file)?;
            let mut table: toml::Table = toml::from_str(&content)
                .map_err(|source| ForgeError::Toml { path: path.clone(), source })?;
            let value = table.remove(key).ok_or_else(|| {
                ForgeError::Catalog(format!("{} has no [[{}]] table", path.display(), key))
            })?;
            Ok((path, value))
        };

        Ok(Self {
            races: parse_list(next("races.toml", "race")?)?,
            classes: parse_list(next("classes.toml", "class")?)?,
            alignments: parse_list(next("alignments.toml", "alignment")?)?,
            items: parse_list(next("items.toml", "item")?)?,
            abilities: parse_list(next("abilities.toml", "ability")?)?,
            creatures: parse_list(next("creatures.toml", "creature")?)?,
            quest_templates: parse_list(next("quests.toml", "quest")?)?,
        })
    }
}

fn parse_list<T: DeserializeOwned>((path, value): (PathBuf, toml::Value)) -> Result<Vec<T>> {
    value.try_into().map_err(|source| ForgeError::Toml { path, source })
}

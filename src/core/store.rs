use crate::domain::model::{Coefficients, Localization, ModuleDefinition, DEFAULT_GROUP};
use crate::domain::ports::{ModuleSource, RawModuleFile};
use crate::utils::error::{Result, StatsError};
use indexmap::IndexMap;
use serde::de::{Deserializer, IgnoredAny, MapAccess, Visitor};
use serde::Deserialize;
use serde_json::value::RawValue;
use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::marker::PhantomData;

/// JSON object kept as an ordered list of pairs so that repeated keys
/// survive parsing and can be reported instead of silently overwritten.
struct OrderedEntries<V>(Vec<(String, V)>);

impl<'de, V: Deserialize<'de>> Deserialize<'de> for OrderedEntries<V> {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct EntriesVisitor<V>(PhantomData<V>);

        impl<'de, V: Deserialize<'de>> Visitor<'de> for EntriesVisitor<V> {
            type Value = OrderedEntries<V>;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a JSON object")
            }

            fn visit_map<A>(self, mut map: A) -> std::result::Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((key, value)) = map.next_entry::<String, V>()? {
                    entries.push((key, value));
                }
                Ok(OrderedEntries(entries))
            }
        }

        deserializer.deserialize_map(EntriesVisitor(PhantomData))
    }
}

#[derive(Deserialize)]
struct EntryProbe {
    stats: Option<IgnoredAny>,
}

#[derive(Deserialize)]
struct FullEntry {
    group: Option<String>,
    #[serde(rename = "moduleType")]
    module_type: String,
    #[serde(default)]
    localization: Localization,
    stats: OrderedEntries<Coefficients>,
}

/// Immutable mapping from module key to its coefficients, built once at startup.
#[derive(Debug, Clone, Default)]
pub struct CoefficientStore {
    modules: BTreeMap<String, ModuleDefinition>,
}

impl CoefficientStore {
    pub fn load<S: ModuleSource + ?Sized>(source: &S) -> Result<Self> {
        let files = source.read_all()?;
        if files.is_empty() {
            return Err(StatsError::MissingConfigError {
                field: "data.files".to_string(),
            });
        }
        Self::from_files(&files)
    }

    pub fn from_files(files: &[RawModuleFile]) -> Result<Self> {
        let mut modules = BTreeMap::new();

        for file in files {
            let parsed = parse_file(file)?;
            tracing::debug!("Parsed {} modules from {}", parsed.len(), file.origin);

            for (key, definition) in parsed {
                match modules.entry(key) {
                    Entry::Occupied(entry) => {
                        return Err(StatsError::DuplicateModuleError {
                            module: entry.key().clone(),
                            path: file.origin.clone(),
                        });
                    }
                    Entry::Vacant(entry) => {
                        entry.insert(definition);
                    }
                }
            }
        }

        if modules.is_empty() {
            tracing::warn!("⚠️ Module data loaded but no modules are defined");
        }

        Ok(Self { modules })
    }

    pub fn lookup(&self, module: &str) -> Result<&ModuleDefinition> {
        self.modules
            .get(module)
            .ok_or_else(|| StatsError::not_found(module))
    }

    pub fn coefficients(&self, module: &str, stat: &str) -> Result<Coefficients> {
        let definition = self.lookup(module)?;
        definition
            .stats
            .get(stat)
            .copied()
            .ok_or_else(|| StatsError::UnknownStatError {
                module: module.to_string(),
                stat: stat.to_string(),
            })
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Modules ordered by key.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ModuleDefinition)> {
        self.modules.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn group_counts(&self) -> BTreeMap<&str, usize> {
        let mut counts = BTreeMap::new();
        for definition in self.modules.values() {
            *counts.entry(definition.group.as_str()).or_insert(0) += 1;
        }
        counts
    }
}

fn data_error(file: &RawModuleFile, message: impl Into<String>) -> StatsError {
    StatsError::DataFileError {
        path: file.origin.clone(),
        message: message.into(),
    }
}

/// 支援兩種格式：
/// `{"group": "...", "modules": {...}}` 或直接 `{module_key: entry}`
/// 只有 `modules` 的值是「物件組成的物件」時才視為分組格式，
/// 因此名為 `modules` 的模組仍可出現在直接格式中
fn is_grouped_layout(top: &[(String, Box<RawValue>)]) -> bool {
    if !top.iter().all(|(k, _)| k == "modules" || k == "group") {
        return false;
    }

    top.iter()
        .find(|(k, _)| k == "modules")
        .and_then(|(_, raw)| serde_json::from_str::<OrderedEntries<Box<RawValue>>>(raw.get()).ok())
        .is_some_and(|modules| {
            modules
                .0
                .iter()
                .all(|(_, entry)| entry.get().trim_start().starts_with('{'))
        })
}

fn parse_file(file: &RawModuleFile) -> Result<Vec<(String, ModuleDefinition)>> {
    let top: OrderedEntries<Box<RawValue>> = serde_json::from_str(&file.contents)
        .map_err(|e| data_error(file, format!("invalid JSON: {}", e)))?;

    let (group, entries) = if is_grouped_layout(&top.0) {
        let mut group = DEFAULT_GROUP.to_string();
        let mut entries = Vec::new();
        for (key, raw) in top.0 {
            if key == "group" {
                group = serde_json::from_str::<String>(raw.get())
                    .map_err(|e| data_error(file, format!("'group' must be a string: {}", e)))?;
            } else {
                let modules: OrderedEntries<Box<RawValue>> = serde_json::from_str(raw.get())
                    .map_err(|e| data_error(file, format!("'modules' must be an object: {}", e)))?;
                entries.extend(modules.0);
            }
        }
        (group, entries)
    } else {
        (DEFAULT_GROUP.to_string(), top.0)
    };

    if group.trim().is_empty() {
        return Err(data_error(file, "group name cannot be empty"));
    }

    let mut seen = HashSet::new();
    let mut result = Vec::with_capacity(entries.len());

    for (key, raw) in entries {
        if key.trim().is_empty() {
            return Err(data_error(file, "module key cannot be empty"));
        }
        if !seen.insert(key.clone()) {
            return Err(StatsError::DuplicateModuleError {
                module: key,
                path: file.origin.clone(),
            });
        }

        let definition = parse_entry(file, &key, &group, &raw)?;
        result.push((key, definition));
    }

    Ok(result)
}

fn parse_entry(
    file: &RawModuleFile,
    key: &str,
    file_group: &str,
    raw: &RawValue,
) -> Result<ModuleDefinition> {
    let entry_error = |message: String| data_error(file, format!("module '{}': {}", key, message));

    let probe: EntryProbe = serde_json::from_str(raw.get())
        .map_err(|e| entry_error(format!("entry must be an object: {}", e)))?;

    let definition = if probe.stats.is_none() {
        let coefficients: Coefficients =
            serde_json::from_str(raw.get()).map_err(|e| entry_error(e.to_string()))?;
        ModuleDefinition::compact(file_group, coefficients)
    } else {
        let full: FullEntry =
            serde_json::from_str(raw.get()).map_err(|e| entry_error(e.to_string()))?;

        let mut stats = IndexMap::new();
        for (stat, coefficients) in full.stats.0 {
            if stat.trim().is_empty() {
                return Err(entry_error("stat name cannot be empty".to_string()));
            }
            if stats.insert(stat.clone(), coefficients).is_some() {
                return Err(entry_error(format!("duplicate stat '{}'", stat)));
            }
        }

        ModuleDefinition {
            group: full.group.unwrap_or_else(|| file_group.to_string()),
            module_type: full.module_type,
            localization: full.localization,
            stats,
        }
    };

    if definition.stats.is_empty() {
        return Err(entry_error("at least one stat is required".to_string()));
    }
    if let Some((stat, _)) = definition.stats.iter().find(|(_, c)| !c.is_finite()) {
        return Err(entry_error(format!(
            "coefficients of stat '{}' must be finite",
            stat
        )));
    }

    Ok(definition)
}

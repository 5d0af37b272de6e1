use indexmap::IndexMap;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// compact `{a, b}` 格式的模組使用此 stat 名稱
pub const DEFAULT_STAT: &str = "value";

/// 檔案未指定 group 時的預設值
pub const DEFAULT_GROUP: &str = "default";

pub const DEFAULT_MODULE_TYPE: &str = "Unspecified";

/// Linear stat formula `a + b * q`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct Coefficients {
    /// Base value
    pub a: f64,
    /// Scaling factor applied to the quality level
    pub b: f64,
}

impl Coefficients {
    pub fn new(a: f64, b: f64) -> Self {
        Self { a, b }
    }

    pub fn evaluate(&self, q: f64) -> f64 {
        self.a + self.b * q
    }

    pub fn is_finite(&self) -> bool {
        self.a.is_finite() && self.b.is_finite()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Lang {
    #[default]
    Ru,
    En,
    Es,
    Fr,
}

impl Lang {
    pub const FALLBACK_ORDER: [Lang; 4] = [Lang::Ru, Lang::En, Lang::Es, Lang::Fr];
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Localization {
    pub ru: Option<String>,
    pub en: Option<String>,
    pub es: Option<String>,
    pub fr: Option<String>,
}

impl Localization {
    pub fn get(&self, lang: Lang) -> Option<&str> {
        let name = match lang {
            Lang::Ru => &self.ru,
            Lang::En => &self.en,
            Lang::Es => &self.es,
            Lang::Fr => &self.fr,
        };
        name.as_deref().filter(|n| !n.is_empty())
    }

    /// 依序嘗試：指定語言 -> ru -> en -> es -> fr
    pub fn resolve(&self, lang: Lang) -> Option<&str> {
        self.get(lang)
            .or_else(|| Lang::FALLBACK_ORDER.iter().find_map(|l| self.get(*l)))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModuleDefinition {
    pub group: String,
    pub module_type: String,
    pub localization: Localization,
    /// Stats in the order they appear in the data file
    pub stats: IndexMap<String, Coefficients>,
}

impl ModuleDefinition {
    /// Single-stat module built from a bare coefficient pair.
    pub fn compact(group: &str, coefficients: Coefficients) -> Self {
        let mut stats = IndexMap::new();
        stats.insert(DEFAULT_STAT.to_string(), coefficients);
        Self {
            group: group.to_string(),
            module_type: DEFAULT_MODULE_TYPE.to_string(),
            localization: Localization::default(),
            stats,
        }
    }

    pub fn display_name(&self, lang: Lang) -> Option<String> {
        self.localization.resolve(lang).map(str::to_string)
    }

    pub fn stat_keys(&self) -> Vec<String> {
        self.stats.keys().cloned().collect()
    }

    /// The only stat of the module, if it has exactly one.
    pub fn sole_stat(&self) -> Option<(&str, &Coefficients)> {
        if self.stats.len() == 1 {
            self.stats.iter().next().map(|(k, c)| (k.as_str(), c))
        } else {
            None
        }
    }
}

/// Query parameters of `GET /stat`.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct StatQuery {
    /// Module key as defined in the data files
    pub module: String,
    /// Quality level of the module
    pub q: f64,
    /// Stat name; may be omitted when the module defines a single stat
    pub stat: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct StatResult {
    pub module: String,
    pub stat: String,
    pub q: f64,
    pub value: f64,
}

/// Query parameters of `GET /module-stats`.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ModuleStatsQuery {
    /// Module key as defined in the data files
    pub module: String,
    /// Quality level (percent) of the module
    pub q: f64,
    /// Localization language for the display name
    #[serde(default)]
    pub lang: Lang,
}

#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct ListQuery {
    /// Localization language for display names
    #[serde(default)]
    pub lang: Lang,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ModuleStatsResponse {
    pub module: String,
    pub group: String,
    #[serde(rename = "moduleType")]
    pub module_type: String,
    pub display_name: Option<String>,
    pub percent: f64,
    pub stats: IndexMap<String, f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ModuleListItem {
    pub key: String,
    pub group: String,
    #[serde(rename = "moduleType")]
    pub module_type: String,
    pub display_name: Option<String>,
    pub stat_keys: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct StatusResponse {
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct HealthResponse {
    pub status: String,
    pub modules: usize,
    pub loaded_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ErrorBody {
    /// Error category, e.g. `not_found` or `validation_error`
    pub error: String,
    pub detail: String,
}

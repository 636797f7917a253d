use std::{
  collections::BTreeMap,
  fmt,
  path::PathBuf,
  sync::{Arc, PoisonError, RwLock},
};

use anyhow::Context;
use serde::{Deserialize, Serialize};
use serde_inline_default::serde_inline_default;
use serde_yaml::{Mapping, Value};
use validator::Validate;

use crate::assets;

const BASE_STRATEGY_SCORES: &str = "base_strategy_scores";
const STRATEGY_MODIFIERS: &str = "strategy_modifiers";
const ROUTING_RULES: &str = "routing_rules";

const REQUIRED_SECTIONS: [&str; 3] = [BASE_STRATEGY_SCORES, STRATEGY_MODIFIERS, ROUTING_RULES];

/// Where a scoring configuration document is read from.
#[derive(Clone, Debug, Default)]
pub enum ConfigSource {
  /// The default document shipped with the crate.
  #[default]
  Embedded,
  File(PathBuf),
  Inline(String),
}

impl ConfigSource {
  fn read(&self) -> anyhow::Result<String> {
    match self {
      ConfigSource::Embedded => assets::read(assets::SCORING_CONFIG),
      ConfigSource::File(path) => std::fs::read_to_string(path).with_context(|| format!("could not read {}", path.display())),
      ConfigSource::Inline(content) => Ok(content.clone()),
    }
  }
}

impl fmt::Display for ConfigSource {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ConfigSource::Embedded => f.write_str("embedded"),
      ConfigSource::File(path) => write!(f, "{}", path.display()),
      ConfigSource::Inline(_) => f.write_str("inline"),
    }
  }
}

/// Outcome of a configuration load.
///
/// An empty error list means the document was accepted and is now in effect.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ValidationResult {
  pub errors: Vec<String>,
}

impl ValidationResult {
  pub fn is_valid(&self) -> bool {
    self.errors.is_empty()
  }
}

#[serde_inline_default]
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize, Validate)]
pub struct RoutingRules {
  pub minimum_score_threshold: f64,
  #[validate(range(min = 1, message = "max_strategies_to_run must be at least 1"))]
  pub max_strategies_to_run: usize,
  pub stop_on_good_match: bool,
  /// Score at which `stop_on_good_match` stops running further strategies.
  #[serde_inline_default(80.0)]
  pub good_match_threshold: f64,
}

impl Default for RoutingRules {
  fn default() -> Self {
    RoutingRules {
      minimum_score_threshold: 0.0,
      max_strategies_to_run: usize::MAX,
      stop_on_good_match: false,
      good_match_threshold: 80.0,
    }
  }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RoutingRuleValue {
  Number(f64),
  Integer(usize),
  Flag(bool),
}

/// Validated scoring weights.
///
/// Instances only ever come out of [`ScoringConfig::from_yaml`], or are built by
/// hand in tests, so every value in here has passed both validation phases.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ScoringConfig {
  pub base_strategy_scores: BTreeMap<String, f64>,
  pub strategy_modifiers: BTreeMap<String, BTreeMap<String, f64>>,
  pub routing_rules: RoutingRules,
}

impl ScoringConfig {
  /// Parse and validate a configuration document.
  ///
  /// Validation runs in two phases: structural (required sections exist and
  /// are mappings), then value-level (every number is typed and in range).
  /// Every problem found by the failing phase is reported.
  pub fn from_yaml(content: &str) -> Result<ScoringConfig, ValidationResult> {
    let document = serde_yaml::from_str::<Value>(content).map_err(|err| ValidationResult {
      errors: vec![format!("could not parse configuration: {err}")],
    })?;

    let sections = validate_structure(&document).map_err(|errors| ValidationResult { errors })?;

    validate_values(&sections).map_err(|errors| ValidationResult { errors })
  }

  /// Base score for a strategy, zero for strategies absent from the configuration.
  pub fn base_score(&self, strategy: &str) -> f64 {
    self.base_strategy_scores.get(strategy).copied().unwrap_or_default()
  }

  pub fn modifier_weight(&self, strategy: &str, modifier: &str) -> f64 {
    self.strategy_modifiers.get(strategy).and_then(|modifiers| modifiers.get(modifier)).copied().unwrap_or_default()
  }

  /// Modifiers configured for a strategy, in name order.
  pub fn modifiers<'c>(&'c self, strategy: &str) -> impl Iterator<Item = (&'c str, f64)> + use<'c> {
    self.strategy_modifiers.get(strategy).into_iter().flatten().map(|(name, weight)| (name.as_str(), *weight))
  }

  pub fn routing_rule(&self, name: &str) -> Option<RoutingRuleValue> {
    let rules = &self.routing_rules;

    match name {
      "minimum_score_threshold" => Some(RoutingRuleValue::Number(rules.minimum_score_threshold)),
      "max_strategies_to_run" => Some(RoutingRuleValue::Integer(rules.max_strategies_to_run)),
      "stop_on_good_match" => Some(RoutingRuleValue::Flag(rules.stop_on_good_match)),
      "good_match_threshold" => Some(RoutingRuleValue::Number(rules.good_match_threshold)),
      _ => None,
    }
  }
}

struct Sections<'v> {
  base_strategy_scores: &'v Mapping,
  strategy_modifiers: &'v Mapping,
  routing_rules: &'v Mapping,
}

fn validate_structure(document: &Value) -> Result<Sections<'_>, Vec<String>> {
  let Some(root) = document.as_mapping() else {
    return Err(vec!["configuration document must be a mapping".to_string()]);
  };

  let mut errors = Vec::new();

  for section in REQUIRED_SECTIONS {
    match root.get(section) {
      None => errors.push(format!("missing required section `{section}`")),
      Some(value) if !value.is_mapping() => errors.push(format!("section `{section}` must be a mapping")),
      Some(_) => {}
    }
  }

  if !errors.is_empty() {
    return Err(errors);
  }

  let section = |name: &str| root.get(name).and_then(Value::as_mapping);

  match (section(BASE_STRATEGY_SCORES), section(STRATEGY_MODIFIERS), section(ROUTING_RULES)) {
    (Some(base_strategy_scores), Some(strategy_modifiers), Some(routing_rules)) => Ok(Sections {
      base_strategy_scores,
      strategy_modifiers,
      routing_rules,
    }),
    _ => Err(vec!["configuration sections could not be read".to_string()]),
  }
}

fn validate_values(sections: &Sections) -> Result<ScoringConfig, Vec<String>> {
  let mut errors = Vec::new();
  let mut config = ScoringConfig::default();

  for (key, value) in sections.base_strategy_scores {
    let Some(strategy) = key_name(key, BASE_STRATEGY_SCORES, &mut errors) else {
      continue;
    };

    match finite_number(value) {
      Some(score) if score >= 0.0 => {
        config.base_strategy_scores.insert(strategy.to_string(), score);
      }
      Some(score) => errors.push(format!("{BASE_STRATEGY_SCORES}.{strategy}: score must be non-negative, got {score}")),
      None => errors.push(format!("{BASE_STRATEGY_SCORES}.{strategy}: expected a number, got {}", describe(value))),
    }
  }

  for (key, value) in sections.strategy_modifiers {
    let Some(strategy) = key_name(key, STRATEGY_MODIFIERS, &mut errors) else {
      continue;
    };

    let Some(modifiers) = value.as_mapping() else {
      // An empty section (`strategy:` with no modifiers) is accepted.
      if !value.is_null() {
        errors.push(format!("{STRATEGY_MODIFIERS}.{strategy}: expected a mapping of modifier weights, got {}", describe(value)));
      }

      config.strategy_modifiers.entry(strategy.to_string()).or_default();
      continue;
    };

    let weights = config.strategy_modifiers.entry(strategy.to_string()).or_default();

    for (key, value) in modifiers {
      let Some(modifier) = key_name(key, STRATEGY_MODIFIERS, &mut errors) else {
        continue;
      };

      match finite_number(value) {
        Some(weight) => {
          weights.insert(modifier.to_string(), weight);
        }
        None => errors.push(format!("{STRATEGY_MODIFIERS}.{strategy}.{modifier}: expected a number, got {}", describe(value))),
      }
    }
  }

  validate_routing_rules(sections.routing_rules, &mut errors);

  if !errors.is_empty() {
    return Err(errors);
  }

  match serde_yaml::from_value::<RoutingRules>(Value::Mapping(sections.routing_rules.clone())) {
    Ok(rules) => match rules.validate() {
      Ok(()) => config.routing_rules = rules,

      Err(err) => {
        for (field, field_errors) in err.field_errors() {
          for error in field_errors {
            match &error.message {
              Some(message) => errors.push(format!("{ROUTING_RULES}.{field}: {message}")),
              None => errors.push(format!("{ROUTING_RULES}.{field}: {}", error.code)),
            }
          }
        }
      }
    },

    Err(err) => errors.push(format!("{ROUTING_RULES}: {err}")),
  }

  match errors.is_empty() {
    true => Ok(config),
    false => Err(errors),
  }
}

fn validate_routing_rules(rules: &Mapping, errors: &mut Vec<String>) {
  let field = |name: &str| rules.get(name);

  match field("minimum_score_threshold") {
    None => errors.push(format!("{ROUTING_RULES}.minimum_score_threshold: missing")),
    Some(value) if finite_number(value).is_none() => errors.push(format!("{ROUTING_RULES}.minimum_score_threshold: expected a number, got {}", describe(value))),
    Some(_) => {}
  }

  match field("max_strategies_to_run") {
    None => errors.push(format!("{ROUTING_RULES}.max_strategies_to_run: missing")),
    Some(value) if value.as_u64().is_none() => errors.push(format!("{ROUTING_RULES}.max_strategies_to_run: expected a non-negative integer, got {}", describe(value))),
    Some(_) => {}
  }

  match field("stop_on_good_match") {
    None => errors.push(format!("{ROUTING_RULES}.stop_on_good_match: missing")),
    Some(value) if !value.is_bool() => errors.push(format!("{ROUTING_RULES}.stop_on_good_match: expected a boolean, got {}", describe(value))),
    Some(_) => {}
  }

  if let Some(value) = field("good_match_threshold")
    && finite_number(value).is_none()
  {
    errors.push(format!("{ROUTING_RULES}.good_match_threshold: expected a number, got {}", describe(value)));
  }
}

fn key_name<'v>(key: &'v Value, section: &str, errors: &mut Vec<String>) -> Option<&'v str> {
  match key.as_str() {
    Some(name) if !name.trim().is_empty() => Some(name),
    _ => {
      errors.push(format!("{section}: keys must be non-empty strings, got {}", describe(key)));
      None
    }
  }
}

fn finite_number(value: &Value) -> Option<f64> {
  value.as_f64().filter(|number| number.is_finite())
}

fn describe(value: &Value) -> String {
  match value {
    Value::Null => "null".to_string(),
    Value::Bool(value) => format!("boolean {value}"),
    Value::Number(value) => format!("number {value}"),
    Value::String(value) => format!("string {value:?}"),
    Value::Sequence(_) => "a sequence".to_string(),
    Value::Mapping(_) => "a mapping".to_string(),
    Value::Tagged(tagged) => format!("tagged value {}", tagged.tag),
  }
}

/// Owner of the live scoring configuration.
///
/// Loads are all-or-nothing: a document is fully validated into a new
/// [`ScoringConfig`] before it replaces the current one, and a rejected
/// document leaves whatever was loaded before in effect. Readers take an
/// [`Arc`] snapshot and never observe a partially updated configuration.
#[derive(Debug, Default)]
pub struct ScoringConfigStore {
  source: RwLock<ConfigSource>,
  current: RwLock<Option<Arc<ScoringConfig>>>,
}

impl ScoringConfigStore {
  pub fn new(source: ConfigSource) -> ScoringConfigStore {
    ScoringConfigStore {
      source: RwLock::new(source),
      current: RwLock::new(None),
    }
  }

  /// Load the configuration from the store's source.
  pub fn load(&self) -> ValidationResult {
    let source = self.source.read().unwrap_or_else(PoisonError::into_inner).clone();

    self.apply(&source)
  }

  /// Re-read the store's source and swap in the result if it is valid.
  pub fn reload(&self) -> ValidationResult {
    tracing::info!("reloading scoring configuration");

    self.load()
  }

  /// Load from a different source, which becomes the store's source only if
  /// the document it holds is accepted.
  pub fn load_from(&self, source: ConfigSource) -> ValidationResult {
    let result = self.apply(&source);

    if result.is_valid() {
      *self.source.write().unwrap_or_else(PoisonError::into_inner) = source;
    }

    result
  }

  fn apply(&self, source: &ConfigSource) -> ValidationResult {
    let content = match source.read() {
      Ok(content) => content,

      Err(err) => {
        let result = ValidationResult { errors: vec![format!("{err:#}")] };

        tracing::warn!(source = %source, errors = ?result.errors, "rejected scoring configuration");

        return result;
      }
    };

    match ScoringConfig::from_yaml(&content) {
      Ok(config) => {
        let strategies = config.base_strategy_scores.len();

        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Some(Arc::new(config));

        tracing::info!(source = %source, strategies, "loaded scoring configuration");

        ValidationResult::default()
      }

      Err(result) => {
        tracing::warn!(source = %source, errors = ?result.errors, "rejected scoring configuration");

        result
      }
    }
  }

  pub fn is_loaded(&self) -> bool {
    self.current.read().unwrap_or_else(PoisonError::into_inner).is_some()
  }

  /// The configuration currently in effect.
  pub fn snapshot(&self) -> Option<Arc<ScoringConfig>> {
    self.current.read().unwrap_or_else(PoisonError::into_inner).clone()
  }

  pub fn get_base_score(&self, strategy: &str) -> f64 {
    self.snapshot().map(|config| config.base_score(strategy)).unwrap_or_default()
  }

  pub fn get_modifier_weight(&self, strategy: &str, modifier: &str) -> f64 {
    self.snapshot().map(|config| config.modifier_weight(strategy, modifier)).unwrap_or_default()
  }

  pub fn get_routing_rule(&self, name: &str) -> Option<RoutingRuleValue> {
    self.snapshot().and_then(|config| config.routing_rule(name))
  }
}

#[cfg(test)]
mod tests {
  use std::sync::Arc;

  use float_cmp::approx_eq;

  use super::{ConfigSource, RoutingRuleValue, ScoringConfig, ScoringConfigStore};
  use crate::tests::TEST_CONFIG;

  #[test]
  fn parse_valid_configuration() {
    let config = ScoringConfig::from_yaml(TEST_CONFIG).unwrap();

    assert!(approx_eq!(f64, config.base_score("automated_split"), 60.0));
    assert!(approx_eq!(f64, config.modifier_weight("automated_split", "multiple_brands"), 25.0));
    assert!(approx_eq!(f64, config.modifier_weight("automated_split", "does_not_exist"), 0.0));
    assert!(approx_eq!(f64, config.base_score("unknown_strategy"), 0.0));
    assert_eq!(config.routing_rules.max_strategies_to_run, 10);
    assert!(!config.routing_rules.stop_on_good_match);
  }

  #[test]
  fn good_match_threshold_defaults() {
    let config = ScoringConfig::from_yaml(
      "
base_strategy_scores: {}
strategy_modifiers: {}
routing_rules:
  minimum_score_threshold: 0
  max_strategies_to_run: 3
  stop_on_good_match: true
",
    )
    .unwrap();

    assert!(approx_eq!(f64, config.routing_rules.good_match_threshold, 80.0));
    assert_eq!(config.routing_rule("max_strategies_to_run"), Some(RoutingRuleValue::Integer(3)));
    assert_eq!(config.routing_rule("stop_on_good_match"), Some(RoutingRuleValue::Flag(true)));
    assert_eq!(config.routing_rule("nope"), None);
  }

  #[test]
  fn missing_sections_are_all_reported() {
    let errors = ScoringConfig::from_yaml("base_strategy_scores: {}\n").unwrap_err().errors;

    assert_eq!(errors, vec!["missing required section `strategy_modifiers`", "missing required section `routing_rules`"]);
  }

  #[test]
  fn wrongly_typed_sections() {
    let errors = ScoringConfig::from_yaml("base_strategy_scores: []\nstrategy_modifiers: {}\nrouting_rules: 12\n").unwrap_err().errors;

    assert_eq!(errors, vec!["section `base_strategy_scores` must be a mapping", "section `routing_rules` must be a mapping"]);
    assert!(!ScoringConfig::from_yaml("- a\n- b\n").unwrap_err().is_valid());
    assert!(!ScoringConfig::from_yaml("base_strategy_scores: {").unwrap_err().is_valid());
  }

  #[test]
  fn value_errors_are_collected() {
    let errors = ScoringConfig::from_yaml(
      "
base_strategy_scores:
  complete_brush: -1
  automated_split: high
  known_knot: 10
strategy_modifiers:
  automated_split:
    multiple_brands: -25.5
    fiber_words: lots
  known_knot: 3
routing_rules:
  minimum_score_threshold: zero
  max_strategies_to_run: 1.5
  stop_on_good_match: 'yes'
",
    )
    .unwrap_err()
    .errors;

    assert_eq!(errors.len(), 7);
    assert!(errors.contains(&"base_strategy_scores.complete_brush: score must be non-negative, got -1".to_string()));
    assert!(errors.contains(&"base_strategy_scores.automated_split: expected a number, got string \"high\"".to_string()));
    assert!(errors.contains(&"strategy_modifiers.automated_split.fiber_words: expected a number, got string \"lots\"".to_string()));
    assert!(errors.contains(&"strategy_modifiers.known_knot: expected a mapping of modifier weights, got number 3".to_string()));
    assert!(errors.iter().any(|err| err.starts_with("routing_rules.minimum_score_threshold")));
    assert!(errors.iter().any(|err| err.starts_with("routing_rules.max_strategies_to_run")));
    assert!(errors.iter().any(|err| err.starts_with("routing_rules.stop_on_good_match")));
  }

  #[test]
  fn range_validation() {
    let errors = ScoringConfig::from_yaml(
      "
base_strategy_scores: {}
strategy_modifiers: {}
routing_rules:
  minimum_score_threshold: 0
  max_strategies_to_run: 0
  stop_on_good_match: false
",
    )
    .unwrap_err()
    .errors;

    assert_eq!(errors, vec!["routing_rules.max_strategies_to_run: max_strategies_to_run must be at least 1"]);
  }

  #[test]
  fn rejected_first_load_leaves_store_unloaded() {
    let store = ScoringConfigStore::new(ConfigSource::Inline("base_strategy_scores: {}\nstrategy_modifiers: {}\n".into()));
    let result = store.load();

    assert!(!result.is_valid());
    assert!(!store.is_loaded());
    assert!(store.snapshot().is_none());
    assert!(approx_eq!(f64, store.get_base_score("automated_split"), 0.0));
  }

  #[test]
  fn rejected_reload_keeps_previous_configuration() {
    let store = ScoringConfigStore::new(ConfigSource::Inline(TEST_CONFIG.into()));

    assert!(store.load().is_valid());

    let before = store.snapshot().unwrap();
    let result = store.load_from(ConfigSource::Inline("base_strategy_scores:\n  automated_split: 1\nstrategy_modifiers: {}\n".into()));

    assert_eq!(result.errors, vec!["missing required section `routing_rules`"]);
    assert!(store.is_loaded());
    assert!(Arc::ptr_eq(&before, &store.snapshot().unwrap()));
    assert!(approx_eq!(f64, store.get_base_score("automated_split"), 60.0));

    // The rejected source was not adopted, so a reload re-reads the good one.
    assert!(store.reload().is_valid());
    assert!(approx_eq!(f64, store.get_base_score("automated_split"), 60.0));
  }

  #[test]
  fn reload_swaps_whole_configuration() {
    let store = ScoringConfigStore::new(ConfigSource::Inline(TEST_CONFIG.into()));

    assert!(store.load().is_valid());

    let old = store.snapshot().unwrap();
    let result = store.load_from(ConfigSource::Inline(
      "
base_strategy_scores:
  automated_split: 10
strategy_modifiers: {}
routing_rules:
  minimum_score_threshold: 5
  max_strategies_to_run: 2
  stop_on_good_match: false
"
      .into(),
    ));

    assert!(result.is_valid());
    assert!(approx_eq!(f64, old.base_score("automated_split"), 60.0));
    assert!(approx_eq!(f64, store.get_base_score("automated_split"), 10.0));
    assert!(approx_eq!(f64, store.get_modifier_weight("automated_split", "multiple_brands"), 0.0));
    assert_eq!(store.get_routing_rule("minimum_score_threshold"), Some(RoutingRuleValue::Number(5.0)));
  }

  #[test]
  fn missing_file_is_a_validation_error() {
    let store = ScoringConfigStore::new(ConfigSource::File("/nonexistent/brush_scoring_config.yaml".into()));
    let result = store.load();

    assert_eq!(result.errors.len(), 1);
    assert!(result.errors[0].contains("could not read /nonexistent/brush_scoring_config.yaml"));
  }

  #[test]
  fn embedded_configuration_is_valid() {
    let store = ScoringConfigStore::new(ConfigSource::Embedded);

    assert_eq!(store.load(), Default::default());
    assert!(store.get_base_score("complete_brush") > 0.0);
  }
}

use std::{collections::BTreeMap, path::PathBuf};

use anyhow::Context;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, de::DeserializeOwned};

use crate::{assets, error::BrushMatchError, exact::CuratedMatches, text::Lexicon};

const BRUSHES: &str = "brushes.yaml";
const KNOTS: &str = "knots.yaml";
const HANDLES: &str = "handles.yaml";
const CORRECT_MATCHES: &str = "correct_matches.yaml";

/// Where catalog documents are read from.
#[derive(Clone, Debug, Default)]
pub enum CatalogSource {
  #[default]
  Embedded,
  /// A directory holding `brushes.yaml`, `knots.yaml`, `handles.yaml` and `correct_matches.yaml`.
  Directory(PathBuf),
}

impl CatalogSource {
  fn read<T: DeserializeOwned>(&self, name: &str) -> Result<T, BrushMatchError> {
    let content = match self {
      CatalogSource::Embedded => assets::read(&format!("catalogs/{name}"))?,
      CatalogSource::Directory(dir) => {
        let path = dir.join(name);

        std::fs::read_to_string(&path).with_context(|| format!("could not read {}", path.display()))?
      }
    };

    serde_yaml::from_str::<T>(&content).map_err(|err| BrushMatchError::CatalogError(format!("{name}: {err}")))
  }
}

#[derive(Debug, Default, Deserialize)]
struct RawEntry {
  #[serde(default)]
  patterns: Vec<String>,
  fiber: Option<String>,
  knot_size_mm: Option<f64>,
  priority: Option<u8>,
}

#[derive(Debug, Default, Deserialize)]
struct RawHandle {
  #[serde(default)]
  patterns: Vec<String>,
  #[serde(default)]
  aliases: Vec<String>,
}

type RawModels = BTreeMap<String, BTreeMap<String, RawEntry>>;

/// A catalog product (or handle maker) with its compiled patterns.
#[derive(Clone, Debug)]
pub struct CatalogEntry {
  pub brand: String,
  pub model: Option<String>,
  pub fiber: Option<String>,
  pub knot_size_mm: Option<f64>,
  pub priority: Option<u8>,
  pub aliases: Vec<String>,
  patterns: Vec<Regex>,
}

impl CatalogEntry {
  /// The first pattern of this entry matching the text.
  pub fn find(&self, text: &str) -> Option<&str> {
    self.patterns.iter().find(|pattern| pattern.is_match(text)).map(Regex::as_str)
  }

  fn specificity(&self) -> usize {
    self.patterns.iter().map(|pattern| pattern.as_str().len()).max().unwrap_or_default()
  }
}

/// Entries of one catalog, most specific pattern first.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
  entries: Vec<CatalogEntry>,
}

impl Catalog {
  fn new(mut entries: Vec<CatalogEntry>) -> Catalog {
    entries.sort_by(|lhs, rhs| rhs.specificity().cmp(&lhs.specificity()));

    Catalog { entries }
  }

  fn from_models(file: &str, raw: RawModels) -> Result<Catalog, BrushMatchError> {
    let mut entries = Vec::new();

    for (brand, models) in raw {
      for (model, entry) in models {
        entries.push(CatalogEntry {
          patterns: compile(file, &brand, &entry.patterns)?,
          brand: brand.clone(),
          model: Some(model),
          fiber: entry.fiber,
          knot_size_mm: entry.knot_size_mm,
          priority: entry.priority,
          aliases: Vec::new(),
        });
      }
    }

    Ok(Catalog::new(entries))
  }

  fn from_handles(file: &str, raw: BTreeMap<String, RawHandle>) -> Result<Catalog, BrushMatchError> {
    let mut entries = Vec::with_capacity(raw.len());

    for (brand, handle) in raw {
      entries.push(CatalogEntry {
        patterns: compile(file, &brand, &handle.patterns)?,
        brand,
        model: None,
        fiber: None,
        knot_size_mm: None,
        priority: None,
        aliases: handle.aliases,
      });
    }

    Ok(Catalog::new(entries))
  }

  /// The most specific entry with a pattern matching the text, along with that pattern.
  pub fn first_match(&self, text: &str) -> Option<(&CatalogEntry, &str)> {
    self.entries.iter().find_map(|entry| entry.find(text).map(|pattern| (entry, pattern)))
  }

  pub fn entries(&self) -> &[CatalogEntry] {
    &self.entries
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }
}

fn compile(file: &str, brand: &str, patterns: &[String]) -> Result<Vec<Regex>, BrushMatchError> {
  patterns
    .iter()
    .map(|pattern| {
      RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map_err(|err| BrushMatchError::CatalogError(format!("{file}: {brand}: invalid pattern {pattern:?}: {err}")))
    })
    .collect()
}

/// Every catalog the matcher works from.
#[derive(Clone, Debug, Default)]
pub struct Catalogs {
  pub brushes: Catalog,
  pub knots: Catalog,
  pub handles: Catalog,
  pub curated: CuratedMatches,
}

impl Catalogs {
  pub fn load(source: &CatalogSource) -> Result<Catalogs, BrushMatchError> {
    let catalogs = Catalogs {
      brushes: Catalog::from_models(BRUSHES, source.read(BRUSHES)?)?,
      knots: Catalog::from_models(KNOTS, source.read(KNOTS)?)?,
      handles: Catalog::from_handles(HANDLES, source.read(HANDLES)?)?,
      curated: source.read(CORRECT_MATCHES)?,
    };

    tracing::debug!(
      brushes = catalogs.brushes.len(),
      knots = catalogs.knots.len(),
      handles = catalogs.handles.len(),
      "loaded catalogs"
    );

    Ok(catalogs)
  }

  /// Every brand name known to the heuristic catalogs, aliases included.
  pub fn brand_lexicon(&self) -> Result<Lexicon, BrushMatchError> {
    let entries = [&self.brushes, &self.knots, &self.handles].into_iter().flat_map(Catalog::entries);

    Lexicon::new(entries.flat_map(|entry| std::iter::once(entry.brand.as_str()).chain(entry.aliases.iter().map(String::as_str)).map(move |name| (name, entry.brand.clone()))))
      .map_err(|err| BrushMatchError::CatalogError(format!("could not index brand names: {err}")))
  }
}

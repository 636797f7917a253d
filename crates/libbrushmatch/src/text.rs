use std::sync::LazyLock;

use aho_corasick::{AhoCorasick, AhoCorasickBuilder, BuildError, MatchKind};
use itertools::Itertools;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

/// Case-fold, trim and collapse whitespace.
pub fn normalize(text: &str) -> String {
  text.nfkc().collect::<String>().to_lowercase().split_whitespace().join(" ")
}

/// Keyword dictionary matched on token boundaries.
///
/// Every pattern maps to a canonical value, so several spellings can resolve
/// to the same term (`silvertip` and `two band` both being `Badger`, say).
#[derive(Debug)]
pub struct Lexicon {
  automaton: AhoCorasick,
  values: Vec<String>,
}

impl Lexicon {
  pub fn new<P, V>(entries: impl IntoIterator<Item = (P, V)>) -> Result<Lexicon, BuildError>
  where
    P: AsRef<str>,
    V: Into<String>,
  {
    let mut patterns = Vec::new();
    let mut values = Vec::new();

    for (pattern, value) in entries {
      let pattern = normalize(pattern.as_ref());

      if pattern.is_empty() {
        continue;
      }

      patterns.push(pattern);
      values.push(value.into());
    }

    let automaton = AhoCorasickBuilder::new().match_kind(MatchKind::LeftmostLongest).ascii_case_insensitive(true).build(patterns)?;

    Ok(Lexicon { automaton, values })
  }

  /// Distinct canonical values found in the text, in order of first appearance.
  pub fn find_all(&self, text: &str) -> Vec<&str> {
    let haystack = normalize(text);
    let mut out: Vec<&str> = Vec::new();

    for mat in self.automaton.find_iter(&haystack) {
      if !is_token_boundary(&haystack, mat.start(), mat.end()) {
        continue;
      }

      let value = self.values[mat.pattern().as_usize()].as_str();

      if !out.contains(&value) {
        out.push(value);
      }
    }

    out
  }

  pub fn first(&self, text: &str) -> Option<&str> {
    self.find_all(text).into_iter().next()
  }

  pub fn contains_any(&self, text: &str) -> bool {
    !self.find_all(text).is_empty()
  }

  pub fn len(&self) -> usize {
    self.values.len()
  }

  pub fn is_empty(&self) -> bool {
    self.values.is_empty()
  }
}

/// Whether `phrase` occurs in `text` as whole tokens, ignoring case and spacing.
pub fn contains_phrase(text: &str, phrase: &str) -> bool {
  let (haystack, needle) = (normalize(text), normalize(phrase));

  if needle.is_empty() {
    return false;
  }

  haystack.match_indices(&needle).any(|(start, _)| is_token_boundary(&haystack, start, start + needle.len()))
}

fn is_token_boundary(haystack: &str, start: usize, end: usize) -> bool {
  let start_ok = start == 0 || !haystack[..start].chars().next_back().map(|c| c.is_alphanumeric()).unwrap_or_default();
  let end_ok = end == haystack.len() || !haystack[end..].chars().next().map(|c| c.is_alphanumeric()).unwrap_or_default();

  start_ok && end_ok
}

pub(crate) static FIBERS: LazyLock<Lexicon> = LazyLock::new(|| {
  Lexicon::new([
    ("badger", "Badger"),
    ("silvertip", "Badger"),
    ("silver tip", "Badger"),
    ("two band", "Badger"),
    ("2band", "Badger"),
    ("2 band", "Badger"),
    ("three band", "Badger"),
    ("finest", "Badger"),
    ("super", "Badger"),
    ("manchurian", "Badger"),
    ("shd", "Badger"),
    ("boar", "Boar"),
    ("bristle", "Boar"),
    ("synthetic", "Synthetic"),
    ("syn", "Synthetic"),
    ("synth", "Synthetic"),
    ("nylon", "Synthetic"),
    ("plissoft", "Synthetic"),
    ("tuxedo", "Synthetic"),
    ("cashmere", "Synthetic"),
    ("g5a", "Synthetic"),
    ("g5b", "Synthetic"),
    ("g5c", "Synthetic"),
    ("horse", "Horse"),
    ("horsehair", "Horse"),
    ("mixed", "Mixed Badger/Boar"),
  ])
  .expect("failed to build Aho-Corasick automaton")
});

pub(crate) static HANDLE_WORDS: LazyLock<Lexicon> = LazyLock::new(|| {
  Lexicon::new(
    ["handle", "resin", "wood", "wooden", "acrylic", "turned", "ebonite", "brass", "aluminum", "stag", "burl", "juma", "bakelite"]
      .into_iter()
      .map(|word| (word, word)),
  )
  .expect("failed to build Aho-Corasick automaton")
});

pub(crate) static KNOT_WORDS: LazyLock<Lexicon> = LazyLock::new(|| {
  Lexicon::new(["knot", "bulb", "fan", "hybrid", "loft", "gel"].into_iter().map(|word| (word, word))).expect("failed to build Aho-Corasick automaton")
});

static KNOT_SIZE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\b(\d{2}(?:\.\d+)?)\s*mm\b").expect("invalid knot size expression"));

static HIGH_CONFIDENCE_DELIMITER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\s+(?:w/|with|in)\s+").expect("invalid delimiter expression"));

static MEDIUM_CONFIDENCE_DELIMITER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+[/+-]\s+").expect("invalid delimiter expression"));

/// Knot diameter in millimeters mentioned in the text, if any.
pub fn knot_size(text: &str) -> Option<f64> {
  KNOT_SIZE.captures(text).and_then(|captures| captures.get(1)).and_then(|size| size.as_str().parse::<f64>().ok())
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DelimiterConfidence {
  High,
  Medium,
}

pub fn has_delimiter(text: &str, confidence: DelimiterConfidence) -> bool {
  match confidence {
    DelimiterConfidence::High => HIGH_CONFIDENCE_DELIMITER.is_match(text),
    DelimiterConfidence::Medium => MEDIUM_CONFIDENCE_DELIMITER.is_match(text),
  }
}

/// Split the text in two around the first delimiter, preferring high-confidence ones.
pub fn split_components(text: &str) -> Option<(&str, &str, DelimiterConfidence)> {
  [(&*HIGH_CONFIDENCE_DELIMITER, DelimiterConfidence::High), (&*MEDIUM_CONFIDENCE_DELIMITER, DelimiterConfidence::Medium)]
    .into_iter()
    .find_map(|(delimiter, confidence)| {
      let mat = delimiter.find(text)?;
      let (lhs, rhs) = (text[..mat.start()].trim(), text[mat.end()..].trim());

      match lhs.is_empty() || rhs.is_empty() {
        true => None,
        false => Some((lhs, rhs, confidence)),
      }
    })
}

#[cfg(test)]
mod tests {
  use float_cmp::approx_eq;

  use super::{DelimiterConfidence, FIBERS, Lexicon};

  #[test]
  fn normalize() {
    assert_eq!(super::normalize("  Simpson   Chubby\t2 "), "simpson chubby 2");
    assert_eq!(super::normalize("ＡＰ Shave Co"), "ap shave co");
    assert_eq!(super::normalize(""), "");
  }

  #[test]
  fn lexicon_respects_token_boundaries() {
    let lexicon = Lexicon::new([("simpson", "Simpson"), ("zenith", "Zenith"), ("ap shave co", "AP Shave Co")]).unwrap();

    assert_eq!(lexicon.find_all("Simpson Chubby 2 w/ Zenith B07 Boar"), vec!["Simpson", "Zenith"]);
    assert_eq!(lexicon.find_all("simpsonian zenithal"), Vec::<&str>::new());
    assert_eq!(lexicon.find_all("AP   Shave Co G5C, also AP Shave Co"), vec!["AP Shave Co"]);
    assert!(!Lexicon::new(Vec::<(&str, &str)>::new()).unwrap().contains_any("anything"));
  }

  #[test]
  fn contains_phrase() {
    assert!(super::contains_phrase("Simpson  CHUBBY 2 Best", "chubby 2"));
    assert!(!super::contains_phrase("Simpson Chubby 25", "chubby 2"));
    assert!(super::contains_phrase("chubby 25 or chubby 2", "chubby 2"));
    assert!(!super::contains_phrase("anything", "  "));
  }

  #[test]
  fn fibers() {
    assert_eq!(FIBERS.find_all("Zenith B07 Boar"), vec!["Boar"]);
    assert_eq!(FIBERS.find_all("two band / silvertip"), vec!["Badger"]);
    assert_eq!(FIBERS.first("Declaration B2 Syn"), Some("Synthetic"));
    assert_eq!(FIBERS.first("Synergy"), None);
  }

  #[test]
  fn knot_size() {
    assert!(approx_eq!(f64, super::knot_size("Maggard 24mm Synthetic").unwrap(), 24.0));
    assert!(approx_eq!(f64, super::knot_size("a 25.5 mm knot").unwrap(), 25.5));
    assert_eq!(super::knot_size("Omega 10049"), None);
  }

  #[test]
  fn split_components() {
    assert_eq!(super::split_components("Simpson Chubby 2 w/ Zenith B07 Boar"), Some(("Simpson Chubby 2", "Zenith B07 Boar", DelimiterConfidence::High)));
    assert_eq!(super::split_components("Dogwood / Declaration B2"), Some(("Dogwood", "Declaration B2", DelimiterConfidence::Medium)));
    assert_eq!(super::split_components("Semogue 610"), None);
    assert_eq!(super::split_components(" with Zenith"), None);
    assert!(super::has_delimiter("Wolf Whiskers handle in Maggard knot", DelimiterConfidence::High));
    assert!(!super::has_delimiter("Wolf Whiskers handle in Maggard knot", DelimiterConfidence::Medium));
  }
}

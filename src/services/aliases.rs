//! Studio and performer name normalization with learned aliases
//!
//! The store holds the live studio table (built-in seed plus learned
//! entries) and the learned overlay. Only the overlay is persisted; it is
//! merged back over the seed on the next start.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::alias_seed::STUDIO_SEED;
use super::catalog::CandidateRecord;
use super::filename_parser::ParsedRelease;
use super::json_store::{self, LoadOutcome, Versioned};
use super::text_utils::{collapse_whitespace, similarity, split_camel_case};

static NAME_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\s+(?:jr|sr|ii|iii|iv)\.?$").expect("name suffix regex"));

/// Minimum similarity for a learned performer mapping
const PERFORMER_LEARN_SIMILARITY: f64 = 0.6;

/// Learned mappings persisted between runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AliasOverlay {
    pub version: u32,
    /// Parsed performer string → catalog performer name
    #[serde(default)]
    pub performers: BTreeMap<String, String>,
    /// Canonical studio → known variations
    #[serde(default)]
    pub studios: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub last_updated: Option<DateTime<Utc>>,
}

impl Default for AliasOverlay {
    fn default() -> Self {
        Self {
            version: Self::VERSION,
            performers: BTreeMap::new(),
            studios: BTreeMap::new(),
            last_updated: None,
        }
    }
}

impl Versioned for AliasOverlay {
    const VERSION: u32 = 1;

    fn version(&self) -> u32 {
        self.version
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct StudioEntry {
    canonical: String,
    variations: Vec<String>,
}

impl StudioEntry {
    fn matches(&self, name: &str) -> bool {
        self.canonical == name || self.variations.iter().any(|v| v == name)
    }

    fn matches_ignore_case(&self, name: &str) -> bool {
        self.canonical.eq_ignore_ascii_case(name)
            || self.variations.iter().any(|v| v.eq_ignore_ascii_case(name))
    }
}

/// What a studio learning step changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StudioLearning {
    Unchanged,
    /// A new site name was appended to an existing learned entry
    AddedVariation { canonical: String },
    /// The parsed studio was folded into an existing canonical entry
    FoldedInto { canonical: String },
    /// A brand-new canonical entry keyed by the parsed studio
    Created { canonical: String },
}

/// Changes made by [AliasStore::learn_from_match].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LearningReport {
    pub performer: Option<String>,
    pub studio: StudioLearning,
}

fn push_unique(list: &mut Vec<String>, value: &str) -> bool {
    if list.iter().any(|v| v == value) {
        false
    } else {
        list.push(value.to_string());
        true
    }
}

pub struct AliasStore {
    studios: Vec<StudioEntry>,
    overlay: AliasOverlay,
    path: Option<PathBuf>,
    persist: bool,
}

impl AliasStore {
    /// Built-in seed only, never written to disk.
    pub fn seeded() -> Self {
        Self::with_overlay(AliasOverlay::default(), None, false)
    }

    /// Load the learned overlay from `path` and merge it over the seed.
    /// With `persist = false` (dry run) learning still updates memory but
    /// nothing is written.
    pub fn open(path: impl AsRef<Path>, persist: bool) -> Self {
        let path = path.as_ref().to_path_buf();
        let overlay = match json_store::load_document::<AliasOverlay>(&path) {
            LoadOutcome::Loaded(overlay) => overlay,
            LoadOutcome::Missing => AliasOverlay::default(),
            LoadOutcome::Invalid(reason) => {
                warn!(path = %path.display(), reason = %reason, "Ignoring unreadable learned mappings file");
                AliasOverlay::default()
            }
        };

        let store = Self::with_overlay(overlay, Some(path), persist);
        info!(
            performers = store.learned_performer_count(),
            studios = store.learned_studio_count(),
            "Loaded learned mappings"
        );
        store
    }

    fn with_overlay(overlay: AliasOverlay, path: Option<PathBuf>, persist: bool) -> Self {
        let mut studios: Vec<StudioEntry> = STUDIO_SEED
            .iter()
            .map(|(canonical, variations)| StudioEntry {
                canonical: canonical.to_string(),
                variations: variations.iter().map(|v| v.to_string()).collect(),
            })
            .collect();

        for (canonical, variations) in &overlay.studios {
            match studios.iter_mut().find(|e| &e.canonical == canonical) {
                Some(entry) => {
                    for v in variations {
                        push_unique(&mut entry.variations, v);
                    }
                }
                None => studios.push(StudioEntry {
                    canonical: canonical.clone(),
                    variations: variations.clone(),
                }),
            }
        }

        Self {
            studios,
            overlay,
            path,
            persist,
        }
    }

    pub fn overlay(&self) -> &AliasOverlay {
        &self.overlay
    }

    pub fn learned_performer_count(&self) -> usize {
        self.overlay.performers.len()
    }

    pub fn learned_studio_count(&self) -> usize {
        self.overlay.studios.len()
    }

    pub fn learned_performer(&self, parsed: &str) -> Option<&str> {
        self.overlay.performers.get(parsed).map(String::as_str)
    }

    /// All known spellings of a studio. Learned entries win, then the live
    /// table (canonical key or any variation), else the name itself.
    pub fn normalize_studio(&self, name: &str) -> Vec<String> {
        if let Some(variations) = self.overlay.studios.get(name) {
            return variations.clone();
        }

        self.studios
            .iter()
            .find(|entry| entry.matches(name))
            .map(|entry| entry.variations.clone())
            .unwrap_or_else(|| vec![name.to_string()])
    }

    /// Learned mapping if present, otherwise a structural cleanup:
    /// camel-case split and separators to spaces.
    pub fn normalize_performer(&self, name: &str) -> String {
        if let Some(mapped) = self.learned_performer(name) {
            return mapped.to_string();
        }
        collapse_whitespace(&split_camel_case(name).replace(['.', '_'], " "))
    }

    /// Distinct, non-empty spellings to try for a performer, most literal first.
    pub fn performer_variations(&self, name: &str) -> Vec<String> {
        if name.trim().is_empty() {
            return Vec::new();
        }

        let mut candidates = vec![name.to_string(), self.normalize_performer(name)];
        if name.contains(' ') {
            candidates.push(name.replace(' ', ""));
        } else {
            candidates.push(split_camel_case(name));
        }
        candidates.push(NAME_SUFFIX.replace(name, "").into_owned());

        let mut variations = Vec::new();
        for candidate in candidates {
            let candidate = candidate.trim();
            if !candidate.is_empty() {
                push_unique(&mut variations, candidate);
            }
        }
        variations
    }

    /// Record aliases implied by a confident match.
    pub fn learn_from_match(&mut self, parsed: &ParsedRelease, candidate: &CandidateRecord) -> LearningReport {
        let performer = self.learn_performer(&parsed.performer, &candidate.performer_names);
        let studio = self.learn_studio(&parsed.studio, &candidate.site_name);
        LearningReport { performer, studio }
    }

    /// Map the parsed performer string onto the first catalog performer
    /// that is similar enough. Returns the learned target name.
    pub fn learn_performer(&mut self, parsed: &str, candidate_names: &[String]) -> Option<String> {
        if parsed.is_empty() || self.overlay.performers.contains_key(parsed) {
            return None;
        }

        let parsed_normalized = parsed.to_lowercase().replace(['.', '_'], " ");

        let target = candidate_names.iter().find(|name| {
            let lower = name.to_lowercase();
            !lower.is_empty()
                && (similarity(&parsed_normalized, &lower) > PERFORMER_LEARN_SIMILARITY
                    || lower.contains(&parsed_normalized)
                    || parsed_normalized.contains(&lower))
        })?;

        self.overlay
            .performers
            .insert(parsed.to_string(), target.clone());
        info!(parsed = %parsed, performer = %target, "Learned performer mapping");
        self.persist();
        Some(target.clone())
    }

    pub fn learn_studio(&mut self, parsed: &str, site_name: &str) -> StudioLearning {
        if parsed.is_empty() || site_name.is_empty() {
            return StudioLearning::Unchanged;
        }

        if let Some(variations) = self.overlay.studios.get_mut(parsed) {
            if !push_unique(variations, site_name) {
                return StudioLearning::Unchanged;
            }
            if let Some(entry) = self.studios.iter_mut().find(|e| e.canonical == parsed) {
                push_unique(&mut entry.variations, site_name);
            }
            info!(studio = %parsed, site = %site_name, "Updated studio mapping");
            self.persist();
            return StudioLearning::AddedVariation {
                canonical: parsed.to_string(),
            };
        }

        if let Some(index) = self.studios.iter().position(|e| e.matches_ignore_case(site_name)) {
            let Some(canonical) = self.extend_entry(index, parsed) else {
                return StudioLearning::Unchanged;
            };
            info!(studio = %parsed, canonical = %canonical, site = %site_name, "Learned studio variation");
            self.persist();
            return StudioLearning::FoldedInto { canonical };
        }

        if let Some(index) = self.studios.iter().position(|e| e.matches(parsed)) {
            let Some(canonical) = self.extend_entry(index, site_name) else {
                return StudioLearning::Unchanged;
            };
            info!(studio = %parsed, canonical = %canonical, site = %site_name, "Learned site name for known studio");
            self.persist();
            return StudioLearning::AddedVariation { canonical };
        }

        let mut variations = vec![parsed.to_string()];
        push_unique(&mut variations, site_name);
        self.overlay
            .studios
            .insert(parsed.to_string(), variations.clone());
        self.studios.push(StudioEntry {
            canonical: parsed.to_string(),
            variations,
        });
        info!(studio = %parsed, site = %site_name, "Learned new studio");
        self.persist();
        StudioLearning::Created {
            canonical: parsed.to_string(),
        }
    }

    /// Add `value` to the live entry at `index` and mirror the entry's whole
    /// variation set into the overlay. None if `value` was already known.
    fn extend_entry(&mut self, index: usize, value: &str) -> Option<String> {
        let entry = &mut self.studios[index];
        if !push_unique(&mut entry.variations, value) {
            return None;
        }
        let canonical = entry.canonical.clone();

        // The overlay entry must keep the whole variation set, otherwise
        // the learned lookup would shadow the seed's spellings.
        let learned = self.overlay.studios.entry(canonical.clone()).or_default();
        push_unique(learned, &canonical);
        for v in &entry.variations {
            push_unique(learned, v);
        }
        Some(canonical)
    }

    /// Write the overlay. Failures are logged; in-memory state stays authoritative.
    fn persist(&mut self) {
        self.overlay.last_updated = Some(Utc::now());
        if !self.persist {
            return;
        }
        let Some(path) = &self.path else {
            return;
        };
        if let Err(e) = json_store::save_document(path, &self.overlay) {
            warn!(error = %e, "Failed to save learned mappings");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(site: &str, performers: &[&str]) -> CandidateRecord {
        CandidateRecord {
            id: "1".into(),
            site_name: site.into(),
            performer_names: performers.iter().map(|p| p.to_string()).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_normalize_studio_from_seed() {
        let store = AliasStore::seeded();
        let variations = store.normalize_studio("MilfVR");
        assert!(variations.contains(&"MILF VR".to_string()));

        // Lookup by a variation returns the same canonical set
        assert_eq!(store.normalize_studio("Milf VR"), variations);

        assert_eq!(store.normalize_studio("UnknownStudio"), vec!["UnknownStudio"]);
    }

    #[test]
    fn test_normalize_performer_structural() {
        let store = AliasStore::seeded();
        assert_eq!(store.normalize_performer("AbellaDanger"), "Abella Danger");
        assert_eq!(store.normalize_performer("Jane_Doe"), "Jane Doe");
        assert_eq!(store.normalize_performer(" Jane.Doe "), "Jane Doe");
    }

    #[test]
    fn test_performer_variations() {
        let store = AliasStore::seeded();
        assert_eq!(store.performer_variations("Jane Doe"), vec!["Jane Doe", "JaneDoe"]);
        assert_eq!(store.performer_variations("JaneDoe"), vec!["JaneDoe", "Jane Doe"]);
        assert_eq!(
            store.performer_variations("John Smith Jr"),
            vec!["John Smith Jr", "JohnSmithJr", "John Smith"]
        );
        assert!(store.performer_variations("").is_empty());
    }

    #[test]
    fn test_learn_performer_first_similar_candidate_wins() {
        let mut store = AliasStore::seeded();
        let names = vec!["Someone Else".to_string(), "Jane Doe".to_string(), "Jane Doer".to_string()];
        assert_eq!(store.learn_performer("Jane.Doe", &names), Some("Jane Doe".to_string()));
        assert_eq!(store.learned_performer("Jane.Doe"), Some("Jane Doe"));
        assert_eq!(store.normalize_performer("Jane.Doe"), "Jane Doe");

        // Existing key is never overwritten
        assert_eq!(store.learn_performer("Jane.Doe", &names), None);
    }

    #[test]
    fn test_learn_performer_rejects_dissimilar() {
        let mut store = AliasStore::seeded();
        let names = vec!["Completely Different".to_string()];
        assert_eq!(store.learn_performer("Jane Doe", &names), None);
        assert_eq!(store.learned_performer_count(), 0);
    }

    #[test]
    fn test_learn_studio_creates_new_mapping() {
        let mut store = AliasStore::seeded();
        let outcome = store.learn_studio("NewStudioX", "New Studio X");
        assert_eq!(outcome, StudioLearning::Created { canonical: "NewStudioX".into() });
        assert_eq!(store.normalize_studio("NewStudioX"), vec!["NewStudioX", "New Studio X"]);

        let outcome = store.learn_studio("NewStudioX", "NSX");
        assert_eq!(outcome, StudioLearning::AddedVariation { canonical: "NewStudioX".into() });
        assert_eq!(store.normalize_studio("NewStudioX").len(), 3);
    }

    #[test]
    fn test_learn_studio_folds_into_seed_entry() {
        let mut store = AliasStore::seeded();
        let outcome = store.learn_studio("MilfVRcom", "MILF VR");
        assert_eq!(outcome, StudioLearning::FoldedInto { canonical: "MilfVR".into() });

        let learned = &store.overlay().studios["MilfVR"];
        assert!(learned.contains(&"MilfVR".to_string()));
        assert!(learned.contains(&"MILF VR".to_string()));
        assert!(learned.contains(&"MilfVRcom".to_string()));

        // The new spelling now resolves to the canonical set
        assert!(store.normalize_studio("MilfVRcom").contains(&"Milf VR".to_string()));
    }

    #[test]
    fn test_learn_studio_extends_known_studio_without_losing_seed_spellings() {
        let mut store = AliasStore::seeded();
        let seeded = store.normalize_studio("VirtualRealPorn");
        assert_eq!(seeded, vec!["Virtual Real Porn", "VirtualRealPorn", "VRP"]);

        let outcome = store.learn_studio("VirtualRealPorn", "VR Porn Network");
        assert_eq!(
            outcome,
            StudioLearning::AddedVariation {
                canonical: "VirtualRealPorn".into()
            }
        );

        let variations = store.normalize_studio("VirtualRealPorn");
        for spelling in &seeded {
            assert!(variations.contains(spelling), "lost {spelling}");
        }
        assert!(variations.contains(&"VR Porn Network".to_string()));
        assert_eq!(store.studios.iter().filter(|e| e.canonical == "VirtualRealPorn").count(), 1);

        // A parsed spelling that is only a variation extends the same entry
        let outcome = store.learn_studio("VRP", "VRP Network");
        assert_eq!(
            outcome,
            StudioLearning::AddedVariation {
                canonical: "VirtualRealPorn".into()
            }
        );
        assert!(store.normalize_studio("VRP").contains(&"VRP Network".to_string()));
        assert!(store.normalize_studio("VirtualRealPorn").contains(&"Virtual Real Porn".to_string()));
    }

    #[test]
    fn test_learning_is_idempotent() {
        let mut store = AliasStore::seeded();
        let parsed = crate::services::filename_parser::parse_release("OddStudio.24.01.02.Jane.Doe.XXX");
        let scene = candidate("Odd Studio", &["Jane Doe"]);

        store.learn_from_match(&parsed, &scene);
        let performers = store.learned_performer_count();
        let variations = store.normalize_studio("OddStudio").len();

        let report = store.learn_from_match(&parsed, &scene);
        assert_eq!(report.performer, None);
        assert_eq!(report.studio, StudioLearning::Unchanged);
        assert_eq!(store.learned_performer_count(), performers);
        assert_eq!(store.normalize_studio("OddStudio").len(), variations);
    }

    #[test]
    fn test_overlay_persists_and_reloads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("learned_mappings.json");

        let mut store = AliasStore::open(&path, true);
        store.learn_studio("MilfVRcom", "MILF VR");
        store.learn_performer("JaneDoe", &["Jane Doe".to_string()]);

        let reloaded = AliasStore::open(&path, true);
        assert_eq!(reloaded.learned_performer("JaneDoe"), Some("Jane Doe"));
        assert!(reloaded.normalize_studio("MilfVRcom").contains(&"MILF VR".to_string()));
    }

    #[test]
    fn test_no_persist_mode_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("learned_mappings.json");

        let mut store = AliasStore::open(&path, false);
        store.learn_studio("NewStudioX", "New Studio X");
        assert_eq!(store.learned_studio_count(), 1);
        assert!(!path.exists());
    }
}

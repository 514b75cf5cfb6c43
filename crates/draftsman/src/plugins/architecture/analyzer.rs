//! Pattern Analyzer
//!
//! Turns a free-text architecture description into an
//! [`ArchitectureAnalysis`]: the winning pattern, the components and
//! relationships mentioned, and the size/shape signals the layout stages
//! need. Analysis is heuristic keyword matching and never fails.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, span, trace, Level};

use crate::core::{slugify, title_case, ArchitecturePattern, ContainerType, Detector, Direction, IconType};

use super::vocabulary::{
    contains_phrase, count_matches, find_matches, is_vocabulary_word, CONTAINER_TERMS,
    ENTITY_TERMS, FLOW_TERMS, LAYER_TERMS, NESTING_INDICATORS, RELATION_TEMPLATES, SCALE_TERMS,
    STOPWORDS, SYSTEM_NOUNS,
};
use super::KeywordDetector;

/// Maximum number of entities kept from one description
pub const MAX_ENTITIES: usize = 20;

/// Maximum estimated container nesting depth
pub const MAX_NESTING_DEPTH: usize = 3;

/// Size bucket from entity and relationship counts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Complexity {
    #[default]
    Simple,
    Moderate,
    Complex,
    VeryComplex,
}

impl Complexity {
    pub fn from_count(count: usize) -> Self {
        match count {
            0..=4 => Complexity::Simple,
            5..=10 => Complexity::Moderate,
            11..=20 => Complexity::Complex,
            _ => Complexity::VeryComplex,
        }
    }
}

impl fmt::Display for Complexity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Complexity::Simple => write!(f, "simple"),
            Complexity::Moderate => write!(f, "moderate"),
            Complexity::Complex => write!(f, "complex"),
            Complexity::VeryComplex => write!(f, "very-complex"),
        }
    }
}

/// Deployment scale bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Scale {
    #[default]
    Small,
    Medium,
    Large,
    Enterprise,
}

impl Scale {
    /// Bucket `2 × scale hits + entities`
    pub fn from_score(score: usize) -> Self {
        match score {
            0..=5 => Scale::Small,
            6..=11 => Scale::Medium,
            12..=19 => Scale::Large,
            _ => Scale::Enterprise,
        }
    }
}

impl fmt::Display for Scale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scale::Small => write!(f, "small"),
            Scale::Medium => write!(f, "medium"),
            Scale::Large => write!(f, "large"),
            Scale::Enterprise => write!(f, "enterprise"),
        }
    }
}

/// Kind of relationship implied by a verb phrase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RelationshipKind {
    Dependency,
    DataFlow,
    Communication,
    Containment,
}

impl RelationshipKind {
    /// Fixed strength per kind
    pub const fn strength(&self) -> f64 {
        match self {
            RelationshipKind::Dependency => 0.6,
            RelationshipKind::DataFlow => 0.8,
            RelationshipKind::Communication => 0.7,
            RelationshipKind::Containment => 1.0,
        }
    }
}

impl fmt::Display for RelationshipKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RelationshipKind::Dependency => write!(f, "dependency"),
            RelationshipKind::DataFlow => write!(f, "data-flow"),
            RelationshipKind::Communication => write!(f, "communication"),
            RelationshipKind::Containment => write!(f, "containment"),
        }
    }
}

/// A component named in the description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: String,
    pub name: String,
    pub icon: IconType,
    /// How many times the component was mentioned
    pub mentions: usize,
}

/// A relationship between two extracted entities
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
    pub source: String,
    pub target: String,
    pub kind: RelationshipKind,
    pub strength: f64,
    /// The verb phrase that produced it
    pub label: String,
}

/// Container keyword counts and the nesting estimate
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ContainerRequirements {
    pub counts: BTreeMap<ContainerType, usize>,
    pub layer_mentions: usize,
    pub nesting_depth: usize,
}

impl ContainerRequirements {
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    pub fn needs_containers(&self) -> bool {
        self.total() > 0
    }

    /// Most frequently mentioned container type (earliest type wins ties)
    pub fn dominant_type(&self) -> Option<ContainerType> {
        self.counts
            .iter()
            .fold(None, |best: Option<(ContainerType, usize)>, (ty, count)| match best {
                Some((_, best_count)) if best_count >= *count => best,
                _ => Some((*ty, *count)),
            })
            .map(|(ty, _)| ty)
    }
}

/// Normalized entity and relationship ratios
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DensityMetrics {
    /// Entities relative to the entity cap, in [0, 1]
    pub component: f64,
    /// Relationships relative to all possible pairs, in [0, 1]
    pub connection: f64,
    pub average_degree: f64,
}

impl DensityMetrics {
    pub fn compute(entities: usize, relationships: usize) -> Self {
        let n = entities as f64;
        let rels = relationships as f64;
        let pairs = n * (n - 1.0) / 2.0;
        Self {
            component: (n / MAX_ENTITIES as f64).clamp(0.0, 1.0),
            connection: if entities < 2 {
                0.0
            } else {
                (rels / pairs).clamp(0.0, 1.0)
            },
            average_degree: if entities == 0 { 0.0 } else { 2.0 * rels / n },
        }
    }
}

/// Everything the layout stages learn from a description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchitectureAnalysis {
    pub pattern: ArchitecturePattern,
    pub confidence: f64,
    pub primary_flow: Direction,
    pub complexity: Complexity,
    pub scale: Scale,
    pub entities: Vec<Entity>,
    pub relationships: Vec<Relationship>,
    pub containers: ContainerRequirements,
    pub density: DensityMetrics,
}

impl Default for ArchitectureAnalysis {
    fn default() -> Self {
        Self {
            pattern: ArchitecturePattern::General,
            confidence: 0.0,
            primary_flow: ArchitecturePattern::General.natural_flow(),
            complexity: Complexity::Simple,
            scale: Scale::Small,
            entities: Vec::new(),
            relationships: Vec::new(),
            containers: ContainerRequirements::default(),
            density: DensityMetrics::default(),
        }
    }
}

impl ArchitectureAnalysis {
    pub fn entity(&self, id: &str) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }
}

/// One non-overlapping occurrence of an entity in the text
#[derive(Debug, Clone)]
struct Mention {
    start: usize,
    end: usize,
    name: String,
    icon: IconType,
}

/// Heuristic free-text analyzer
#[derive(Debug, Clone)]
pub struct PatternAnalyzer {
    detectors: Vec<KeywordDetector>,
}

impl Default for PatternAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl PatternAnalyzer {
    pub fn new() -> Self {
        Self {
            detectors: KeywordDetector::all(),
        }
    }

    /// Analyze a description
    pub fn analyze(&self, text: &str) -> ArchitectureAnalysis {
        let analyze_span = span!(Level::INFO, "analyze_architecture", input_len = text.len());
        let _enter = analyze_span.enter();

        let lower = text.to_lowercase();
        let (pattern, confidence) = self.classify(text);

        let mentions = extract_mentions(&lower);
        let entities = collect_entities(&mentions);
        let relationships = extract_relationships(&lower, &mentions, &entities);
        debug!(
            entities = entities.len(),
            relationships = relationships.len(),
            "Extracted components"
        );

        let complexity = Complexity::from_count(entities.len() + relationships.len());
        let scale_hits: usize = SCALE_TERMS.iter().map(|t| count_matches(&lower, t)).sum();
        let scale = Scale::from_score(2 * scale_hits + entities.len());
        let containers = container_requirements(&lower);
        let density = DensityMetrics::compute(entities.len(), relationships.len());
        let primary_flow = explicit_flow(&lower).unwrap_or_else(|| pattern.natural_flow());

        info!(
            %pattern,
            confidence,
            %complexity,
            %scale,
            direction = %primary_flow,
            "Analysis complete"
        );

        ArchitectureAnalysis {
            pattern,
            confidence,
            primary_flow,
            complexity,
            scale,
            entities,
            relationships,
            containers,
            density,
        }
    }

    /// Highest-scoring pattern; earlier patterns win ties
    fn classify(&self, text: &str) -> (ArchitecturePattern, f64) {
        let mut best: Option<(&KeywordDetector, f64)> = None;
        for detector in &self.detectors {
            let score = detector.score(text);
            let better = match best {
                Some((_, best_score)) => score > best_score,
                None => score > 0.0,
            };
            if better {
                best = Some((detector, score));
            }
        }

        match best {
            Some((detector, _)) => (detector.pattern(), detector.confidence(text)),
            None => {
                trace!("No pattern keywords found, falling back to general");
                (ArchitecturePattern::General, 0.0)
            }
        }
    }
}

/// Earliest explicit flow phrase in the text
fn explicit_flow(lower: &str) -> Option<Direction> {
    FLOW_TERMS
        .iter()
        .filter_map(|(phrase, direction)| {
            find_matches(lower, phrase)
                .first()
                .map(|start| (*start, *direction))
        })
        .min_by_key(|(start, _)| *start)
        .map(|(_, direction)| direction)
}

/// Alphanumeric words with their byte spans
fn words(lower: &str) -> Vec<(usize, usize)> {
    let mut spans = Vec::new();
    let mut start = None;
    for (i, c) in lower.char_indices() {
        match (c.is_alphanumeric(), start) {
            (true, None) => start = Some(i),
            (false, Some(s)) => {
                spans.push((s, i));
                start = None;
            }
            _ => {}
        }
    }
    if let Some(s) = start {
        spans.push((s, lower.len()));
    }
    spans
}

fn extract_mentions(lower: &str) -> Vec<Mention> {
    let mut candidates = Vec::new();

    for term in ENTITY_TERMS {
        for start in find_matches(lower, term.phrase) {
            candidates.push(Mention {
                start,
                end: start + term.phrase.len(),
                name: term.name.to_string(),
                icon: term.icon,
            });
        }
    }

    // "<word> <system-noun>" names such as "order service"
    for pair in words(lower).windows(2) {
        let (word_start, word_end) = pair[0];
        let (noun_start, noun_end) = pair[1];
        let word = &lower[word_start..word_end];
        let noun = &lower[noun_start..noun_end];
        if !SYSTEM_NOUNS.contains(&noun)
            || lower[word_end..noun_start].trim() != ""
            || word.len() < 2
            || STOPWORDS.contains(&word)
            || SYSTEM_NOUNS.contains(&word)
            || is_vocabulary_word(word)
            || word.chars().all(|c| c.is_ascii_digit())
        {
            continue;
        }
        let icon = match noun {
            "server" => IconType::Server,
            "store" => IconType::Storage,
            _ => IconType::Service,
        };
        candidates.push(Mention {
            start: word_start,
            end: noun_end,
            name: title_case(&format!("{} {}", word, noun)),
            icon,
        });
    }

    // Longest first; equal lengths keep vocabulary matches ahead
    candidates.sort_by(|a, b| {
        (b.end - b.start)
            .cmp(&(a.end - a.start))
            .then(a.start.cmp(&b.start))
    });

    let mut accepted: Vec<Mention> = Vec::new();
    for candidate in candidates {
        let overlaps = accepted
            .iter()
            .any(|m| candidate.start < m.end && m.start < candidate.end);
        if !overlaps {
            accepted.push(candidate);
        }
    }
    accepted.sort_by_key(|m| m.start);
    trace!(mentions = accepted.len(), "Matched entity mentions");
    accepted
}

fn collect_entities(mentions: &[Mention]) -> Vec<Entity> {
    let mut entities: Vec<Entity> = Vec::new();
    let mut by_name: HashMap<&str, usize> = HashMap::new();
    let mut ids: HashSet<String> = HashSet::new();

    for mention in mentions {
        if let Some(&index) = by_name.get(mention.name.as_str()) {
            entities[index].mentions += 1;
            continue;
        }
        if entities.len() == MAX_ENTITIES {
            continue;
        }

        let base = slugify(&mention.name);
        let mut id = base.clone();
        let mut suffix = 2;
        while ids.contains(&id) {
            id = format!("{}_{}", base, suffix);
            suffix += 1;
        }
        ids.insert(id.clone());

        by_name.insert(&mention.name, entities.len());
        entities.push(Entity {
            id,
            name: mention.name.clone(),
            icon: mention.icon,
            mentions: 1,
        });
    }

    if mentions.len() > entities.iter().map(|e| e.mentions).sum::<usize>() {
        debug!(cap = MAX_ENTITIES, "Entity cap reached, dropping extra components");
    }
    entities
}

fn extract_relationships(
    lower: &str,
    mentions: &[Mention],
    entities: &[Entity],
) -> Vec<Relationship> {
    let id_of: HashMap<&str, &str> = entities
        .iter()
        .map(|e| (e.name.as_str(), e.id.as_str()))
        .collect();

    let mut seen = HashSet::new();
    let mut relationships = Vec::new();

    for pair in mentions.windows(2) {
        let (from, to) = (&pair[0], &pair[1]);
        let between = &lower[from.end..to.start];
        if between.contains(['.', ';', '!', '?', '\n']) {
            continue;
        }

        let Some(template) = RELATION_TEMPLATES
            .iter()
            .find(|t| contains_phrase(between, t.phrase))
        else {
            continue;
        };

        let (Some(source), Some(target)) =
            (id_of.get(from.name.as_str()), id_of.get(to.name.as_str()))
        else {
            continue;
        };
        if source == target {
            continue;
        }

        if seen.insert((*source, *target, template.kind)) {
            trace!(%source, %target, kind = %template.kind, "Found relationship");
            relationships.push(Relationship {
                source: source.to_string(),
                target: target.to_string(),
                kind: template.kind,
                strength: template.strength,
                label: template.phrase.to_string(),
            });
        }
    }

    relationships
}

fn container_requirements(lower: &str) -> ContainerRequirements {
    let mut counts = BTreeMap::new();
    for (phrase, container_type) in CONTAINER_TERMS {
        let hits = count_matches(lower, phrase);
        if hits > 0 {
            *counts.entry(*container_type).or_insert(0) += hits;
        }
    }

    let layer_mentions = LAYER_TERMS.iter().map(|t| count_matches(lower, t)).sum();
    let nested = NESTING_INDICATORS.iter().any(|t| contains_phrase(lower, t));
    let nesting_depth = match (counts.len(), nested) {
        (0, _) => 0,
        (distinct, true) => distinct.min(MAX_NESTING_DEPTH),
        (_, false) => 1,
    };

    ContainerRequirements {
        counts,
        layer_mentions,
        nesting_depth,
    }
}

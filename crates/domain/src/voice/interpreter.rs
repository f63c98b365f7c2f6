use std::collections::{BTreeMap, VecDeque};

use serde::{Deserialize, Serialize};

use super::patterns::{KEYWORDS, patterns};
use super::{Category, Intent, gazetteer, normalize_utterance};

const PATTERN_WEIGHT: f64 = 0.6;
const KNOWN_ENTITY_BONUS: f64 = 0.15;
const UNKNOWN_ENTITY_PENALTY: f64 = 0.05;
/// Below this, pattern matches are not trusted and keywords are tried.
const PATTERN_FLOOR: f64 = 0.5;
const KEYWORD_BASE: f64 = 0.3;
const KEYWORD_STEP: f64 = 0.1;
const KEYWORD_CAP: f64 = 0.6;
const FOLLOW_UP_MAX_WORDS: usize = 4;
const FOLLOW_UP_DECAY: f64 = 0.8;
const FOLLOW_UP_BOOST: f64 = 0.1;
const UNKNOWN_BELOW: f64 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InterpreterConfig {
    /// Intents below this confidence may be treated as follow-ups.
    pub confidence_threshold: f64,
    /// How many recognised intents the conversation context keeps.
    pub context_size: usize,
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: 0.6,
            context_size: 5,
        }
    }
}

struct Scored {
    category: Category,
    entities: BTreeMap<String, String>,
    confidence: f64,
}

/// Stateful intent recogniser with a rolling conversation context.
#[derive(Debug, Clone)]
pub struct Interpreter {
    config: InterpreterConfig,
    context: VecDeque<Intent>,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new(InterpreterConfig::default())
    }
}

impl Interpreter {
    #[must_use]
    pub fn new(config: InterpreterConfig) -> Self {
        Self {
            config,
            context: VecDeque::with_capacity(config.context_size),
        }
    }

    #[must_use]
    pub fn config(&self) -> &InterpreterConfig {
        &self.config
    }

    /// Recognised intents, oldest first.
    pub fn context(&self) -> impl Iterator<Item = &Intent> {
        self.context.iter()
    }

    pub fn clear_context(&mut self) {
        self.context.clear();
    }

    /// Interpret one utterance and remember it when recognised.
    pub fn interpret(&mut self, utterance: &str) -> Intent {
        let text = normalize_utterance(utterance);
        let mut best = match_patterns(&text);
        if best.as_ref().is_none_or(|s| s.confidence < PATTERN_FLOOR)
            && let Some(by_keyword) = match_keywords(&text)
            && best
                .as_ref()
                .is_none_or(|s| by_keyword.confidence > s.confidence)
        {
            best = Some(by_keyword);
        }
        let mut scored = best.unwrap_or_else(|| Scored {
            category: Category::Unknown,
            entities: gazetteer::scan(&text),
            confidence: 0.0,
        });

        let word_count = text.split_whitespace().count();
        if scored.confidence < self.config.confidence_threshold
            && word_count <= FOLLOW_UP_MAX_WORDS
            && let Some(previous) = self.context.back()
        {
            let mut entities = previous.entities.clone();
            entities.append(&mut scored.entities);
            scored = Scored {
                category: previous.category,
                entities,
                confidence: (scored.confidence.max(previous.confidence * FOLLOW_UP_DECAY)
                    + FOLLOW_UP_BOOST)
                    .min(1.0),
            };
        }

        let intent = if scored.confidence < UNKNOWN_BELOW {
            Intent {
                category: Category::Unknown,
                entities: BTreeMap::new(),
                confidence: scored.confidence,
                utterance: text,
            }
        } else {
            Intent {
                category: scored.category,
                entities: scored.entities,
                confidence: scored.confidence,
                utterance: text,
            }
        };
        if !intent.is_unknown() {
            self.remember(intent.clone());
        }
        intent
    }

    fn remember(&mut self, intent: Intent) {
        if self.config.context_size == 0 {
            return;
        }
        while self.context.len() >= self.config.context_size {
            self.context.pop_front();
        }
        self.context.push_back(intent);
    }
}

#[allow(clippy::cast_precision_loss)]
fn match_patterns(text: &str) -> Option<Scored> {
    if text.is_empty() {
        return None;
    }
    let mut best: Option<Scored> = None;
    for pattern in patterns() {
        let Some(captures) = pattern.regex.captures(text) else {
            continue;
        };
        let Some(whole) = captures.get(0) else {
            continue;
        };
        let mut entities = BTreeMap::new();
        for name in pattern.regex.capture_names().flatten() {
            if let Some(value) = captures.name(name) {
                let value = value.as_str().trim();
                if !value.is_empty() {
                    entities.insert(name.to_string(), value.to_string());
                }
            }
        }
        let mut confidence = PATTERN_WEIGHT * (whole.len() as f64 / text.len() as f64);
        for (key, value) in &entities {
            if let Some(known) = gazetteer::known_values(key) {
                if known.contains(&value.as_str()) {
                    confidence += KNOWN_ENTITY_BONUS;
                } else {
                    confidence -= UNKNOWN_ENTITY_PENALTY;
                }
            }
        }
        let confidence = confidence.clamp(0.0, 1.0);
        if best.as_ref().is_none_or(|b| confidence > b.confidence) {
            best = Some(Scored {
                category: pattern.category,
                entities,
                confidence,
            });
        }
    }
    best
}

#[allow(clippy::cast_precision_loss)]
fn match_keywords(text: &str) -> Option<Scored> {
    let words: Vec<&str> = text
        .split(|c: char| !c.is_alphanumeric() && c != '\'')
        .filter(|w| !w.is_empty())
        .collect();
    let (category, hits) = KEYWORDS
        .iter()
        .map(|(category, keywords)| {
            let hits = keywords.iter().filter(|k| words.contains(*k)).count();
            (*category, hits)
        })
        .fold(None, |best: Option<(Category, usize)>, (category, hits)| match best {
            Some((_, top)) if top >= hits => best,
            _ if hits > 0 => Some((category, hits)),
            _ => best,
        })?;
    let confidence = (KEYWORD_BASE + KEYWORD_STEP * (hits - 1) as f64).min(KEYWORD_CAP);
    Some(Scored {
        category,
        entities: gazetteer::scan(text),
        confidence,
    })
}

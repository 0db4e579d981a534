//! Turns an untrusted question payload into a [`QuestionBank`].
//!
//! Accepted payload shapes:
//!
//! * `{"levels": [{"id": "beginner", "questions": [...]}, ...]}`
//! * `{"questions": [...]}` or a bare array, each item declaring a
//!   `difficulty` (or `level`)
//! * `{"beginner": [...], "medium": [...], ...}` keyed by level or
//!   difficulty name
//!
//! An item's own difficulty wins over the one inferred from its enclosing
//! level. When any bucket ends up with fewer than three items the whole
//! payload is dropped for the fallback bank.

use log::{debug, warn};
use serde_json::{Map, Value};

use crate::models::{
    BankOrigin, Difficulty, Question, QuestionBank, LEVELS, OPTIONS_PER_QUESTION,
    QUESTIONS_PER_LEVEL,
};

use super::ids::QuestionIds;

pub const MISSING_PROMPT: &str = "Question missing";
pub const PLACEHOLDER_OPTIONS: [&str; OPTIONS_PER_QUESTION] =
    ["Option A", "Option B", "Option C", "Option D"];

const DEFAULT_SUBJECT: &str = "the title";

const PROMPT_KEYS: [&str; 3] = ["question", "prompt", "text"];
const ANSWER_KEYS: [&str; 4] = ["answer", "correctOption", "correct_option", "correct_answer"];
const DIFFICULTY_KEYS: [&str; 2] = ["difficulty", "level"];
const LEVEL_NAME_KEYS: [&str; 3] = ["id", "name", "difficulty"];

/// Build a bank from `raw`, or the fallback bank for `fallback_subject`.
///
/// The result is either entirely derived from `raw` or entirely fallback.
pub fn normalize(raw: Option<&Value>, fallback_subject: &str, ids: &mut QuestionIds) -> QuestionBank {
    let Some(raw) = raw else {
        debug!("no question payload, using fallback bank");
        return fallback_bank(fallback_subject, ids);
    };

    let buckets = collect_buckets(raw);
    let counts = buckets.each_ref().map(Vec::len);
    if counts.iter().any(|count| *count < QUESTIONS_PER_LEVEL) {
        warn!(
            "question payload rejected (easy/medium/hard = {}/{}/{}), using fallback bank",
            counts[0], counts[1], counts[2]
        );
        return fallback_bank(fallback_subject, ids);
    }

    let levels = buckets.map(|items| {
        items
            .into_iter()
            .take(QUESTIONS_PER_LEVEL)
            .map(|(item, difficulty)| repair_question(item, difficulty, ids))
            .collect()
    });
    QuestionBank::from_levels(levels, BankOrigin::Generated)
}

type Bucket<'a> = Vec<(&'a Map<String, Value>, Difficulty)>;

/// Sort every usable item into its difficulty bucket, in payload order.
fn collect_buckets(raw: &Value) -> [Bucket<'_>; 3] {
    let mut buckets: [Bucket<'_>; 3] = Default::default();

    match raw {
        Value::Array(_) => push_items(raw, None, &mut buckets),
        Value::Object(object) => {
            match object.get("levels") {
                Some(Value::Array(levels)) => {
                    for level in levels {
                        let Some(level) = level.as_object() else {
                            continue;
                        };
                        let inferred = first_str(level, &LEVEL_NAME_KEYS).and_then(Difficulty::parse);
                        if let Some(questions) = level.get("questions") {
                            push_items(questions, inferred, &mut buckets);
                        }
                    }
                }
                Some(Value::Object(keyed)) => push_keyed(keyed, &mut buckets),
                _ => {}
            }
            if let Some(questions) = object.get("questions") {
                push_items(questions, None, &mut buckets);
            }
            push_keyed(object, &mut buckets);
        }
        _ => {}
    }

    buckets
}

/// Items listed under difficulty-named keys, e.g. `{"beginner": [...]}`.
fn push_keyed<'a>(object: &'a Map<String, Value>, buckets: &mut [Bucket<'a>; 3]) {
    for (key, value) in object {
        if let Some(difficulty) = Difficulty::parse(key) {
            push_items(value, Some(difficulty), buckets);
        }
    }
}

fn push_items<'a>(items: &'a Value, inferred: Option<Difficulty>, buckets: &mut [Bucket<'a>; 3]) {
    let Some(items) = items.as_array() else {
        return;
    };
    for item in items {
        let Some(object) = item.as_object() else {
            continue;
        };
        let declared = first_str(object, &DIFFICULTY_KEYS).and_then(Difficulty::parse);
        if let Some(difficulty) = declared.or(inferred) {
            buckets[difficulty.level().ordinal()].push((object, difficulty));
        }
    }
}

fn first_str<'a>(object: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a str> {
    keys.iter().find_map(|key| object.get(*key).and_then(Value::as_str))
}

fn repair_question(item: &Map<String, Value>, difficulty: Difficulty, ids: &mut QuestionIds) -> Question {
    let prompt = first_str(item, &PROMPT_KEYS)
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .unwrap_or(MISSING_PROMPT)
        .to_string();

    let options = item
        .get("options")
        .and_then(parse_options)
        .unwrap_or_else(|| PLACEHOLDER_OPTIONS.map(String::from));

    let correct_option = first_str(item, &ANSWER_KEYS)
        .map(str::trim)
        .and_then(|answer| options.iter().find(|o| o.as_str() == answer))
        .unwrap_or(&options[0])
        .clone();

    let id = match item.get("id").and_then(Value::as_str) {
        Some(supplied) => ids.claim(supplied),
        None => ids.fresh(),
    };

    let topic = item
        .get("topic")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(String::from);

    Question {
        id,
        prompt,
        options,
        correct_option,
        difficulty,
        topic,
    }
}

/// Exactly four distinct, non-blank strings, or nothing.
fn parse_options(value: &Value) -> Option<[String; OPTIONS_PER_QUESTION]> {
    let values = value.as_array()?;
    if values.len() != OPTIONS_PER_QUESTION {
        return None;
    }

    let mut options: Vec<String> = Vec::with_capacity(OPTIONS_PER_QUESTION);
    for value in values {
        let option = value.as_str()?.trim();
        if option.is_empty() || options.iter().any(|o| o == option) {
            return None;
        }
        options.push(option.to_string());
    }
    options.try_into().ok()
}

struct Template {
    prompt: &'static str,
    options: [&'static str; OPTIONS_PER_QUESTION],
    answer: &'static str,
    topic: &'static str,
}

/// Three templates per level, in level order. `{}` is replaced by the subject.
static FALLBACK_TEMPLATES: [[Template; QUESTIONS_PER_LEVEL]; 3] = [
    [
        Template {
            prompt: "Which aspect best defines {}?",
            options: ["Iconic characters", "Groundbreaking visuals", "Soundtrack", "Humor"],
            answer: "Iconic characters",
            topic: "identity",
        },
        Template {
            prompt: "In what era is {} mainly set?",
            options: ["Past", "Present", "Near Future", "Distant Future"],
            answer: "Past",
            topic: "setting",
        },
        Template {
            prompt: "What emotion captures {}?",
            options: ["Hope", "Mystery", "Chaos", "Romance"],
            answer: "Mystery",
            topic: "tone",
        },
    ],
    [
        Template {
            prompt: "What keeps audiences coming back to {}?",
            options: ["Plot twists", "Character development", "Action sequences", "Dialogue quality"],
            answer: "Character development",
            topic: "appeal",
        },
        Template {
            prompt: "Which word best describes the pacing of {}?",
            options: ["Slow burn", "Steady", "Relentless", "Episodic"],
            answer: "Steady",
            topic: "pacing",
        },
        Template {
            prompt: "Which element of {} do fans quote most?",
            options: ["Dialogue", "Music", "Visual gags", "Opening scene"],
            answer: "Dialogue",
            topic: "fandom",
        },
    ],
    [
        Template {
            prompt: "What theme sits at the core of {}?",
            options: ["Identity", "Power", "Loss", "Freedom"],
            answer: "Identity",
            topic: "theme",
        },
        Template {
            prompt: "Which craft gives {} its signature style?",
            options: ["Cinematic style", "Visual effects", "Memorable soundtrack", "Emotional depth"],
            answer: "Cinematic style",
            topic: "craft",
        },
        Template {
            prompt: "How does {} usually resolve its central conflict?",
            options: ["Sacrifice", "Cleverness", "Teamwork", "Luck"],
            answer: "Teamwork",
            topic: "structure",
        },
    ],
];

/// The deterministic bank used when no usable payload is available.
///
/// Text depends only on `subject`; every question gets a fresh id.
pub fn fallback_bank(subject: &str, ids: &mut QuestionIds) -> QuestionBank {
    let subject = match subject.trim() {
        "" => DEFAULT_SUBJECT,
        trimmed => trimmed,
    };

    let levels = LEVELS.map(|level| {
        FALLBACK_TEMPLATES[level.ordinal]
            .iter()
            .map(|template| Question {
                id: ids.fresh(),
                prompt: template.prompt.replace("{}", subject),
                options: template.options.map(String::from),
                correct_option: template.answer.to_string(),
                difficulty: level.id.difficulty(),
                topic: Some(template.topic.to_string()),
            })
            .collect()
    });
    QuestionBank::from_levels(levels, BankOrigin::Fallback)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use serde_json::json;

    use super::*;
    use crate::models::LevelId;

    fn question(prompt: &str) -> Value {
        json!({
            "question": prompt,
            "options": ["Red", "Green", "Blue", "Yellow"],
            "answer": "Blue"
        })
    }

    fn level_payload() -> Value {
        let level = |id: &str| {
            json!({
                "id": id,
                "questions": [question(&format!("{id} 1")), question(&format!("{id} 2")), question(&format!("{id} 3"))]
            })
        };
        json!({ "levels": [level("beginner"), level("intermediate"), level("master")] })
    }

    fn assert_well_formed(bank: &QuestionBank) {
        for level in LEVELS {
            let questions = bank.level(level.id);
            assert_eq!(questions.len(), QUESTIONS_PER_LEVEL);
            for q in questions {
                let distinct: HashSet<&String> = q.options.iter().collect();
                assert_eq!(distinct.len(), OPTIONS_PER_QUESTION);
                assert!(q.options.contains(&q.correct_option));
                assert_eq!(q.difficulty, level.id.difficulty());
            }
        }
    }

    #[test]
    fn test_absent_payload_uses_fallback() {
        let mut ids = QuestionIds::new();
        let bank = normalize(None, "Inception", &mut ids);
        assert!(bank.is_fallback());
        assert_well_formed(&bank);
        assert!(bank.iter().all(|q| q.prompt.contains("Inception")));
    }

    #[test]
    fn test_level_payload_accepted() {
        let mut ids = QuestionIds::new();
        let bank = normalize(Some(&level_payload()), "Inception", &mut ids);
        assert_eq!(bank.origin(), BankOrigin::Generated);
        assert_well_formed(&bank);
        assert_eq!(bank.level(LevelId::Master)[0].prompt, "master 1");
        assert_eq!(bank.level(LevelId::Beginner)[2].correct_option, "Blue");
    }

    #[test]
    fn test_keyed_levels_object_accepted() {
        let level = |id: &str| json!([question(&format!("{id} 1")), question(&format!("{id} 2")), question(&format!("{id} 3"))]);
        let payload = json!({
            "levels": {
                "beginner": level("beginner"),
                "intermediate": level("intermediate"),
                "master": level("master")
            }
        });

        let mut ids = QuestionIds::new();
        let bank = normalize(Some(&payload), "Inception", &mut ids);
        assert_eq!(bank.origin(), BankOrigin::Generated);
        assert_well_formed(&bank);
        assert_eq!(bank.level(LevelId::Intermediate)[1].prompt, "intermediate 2");
    }

    #[test]
    fn test_missing_bucket_falls_back_without_mixing() {
        let mut payload = level_payload();
        payload["levels"][2]["questions"]
            .as_array_mut()
            .unwrap()
            .truncate(2);

        let mut ids = QuestionIds::new();
        let bank = normalize(Some(&payload), "Dune", &mut ids);
        assert!(bank.is_fallback());
        assert!(bank.iter().all(|q| q.prompt.contains("Dune")));
        assert_well_formed(&bank);
    }

    #[test]
    fn test_flat_payload_with_declared_difficulty() {
        let items: Vec<Value> = ["easy", "medium", "hard"]
            .iter()
            .flat_map(|d| {
                (0..3).map(move |i| {
                    json!({
                        "prompt": format!("{d} {i}"),
                        "options": ["a", "b", "c", "d"],
                        "correctOption": "c",
                        "difficulty": d,
                        "topic": "plot"
                    })
                })
            })
            .collect();

        let mut ids = QuestionIds::new();
        let bank = normalize(Some(&json!({ "questions": items })), "X", &mut ids);
        assert!(!bank.is_fallback());
        let first = &bank.level(LevelId::Intermediate)[0];
        assert_eq!(first.prompt, "medium 0");
        assert_eq!(first.correct_option, "c");
        assert_eq!(first.topic.as_deref(), Some("plot"));
    }

    #[test]
    fn test_declared_difficulty_overrides_level() {
        let mut payload = level_payload();
        payload["levels"][0]["questions"][0]["difficulty"] = json!("hard");

        let mut ids = QuestionIds::new();
        let bank = normalize(Some(&payload), "X", &mut ids);
        // beginner is left with two items
        assert!(bank.is_fallback());
    }

    #[test]
    fn test_malformed_fields_are_repaired() {
        let mut payload = level_payload();
        payload["levels"][0]["questions"][0] = json!({
            "question": "   ",
            "options": ["same", "same", "x", "y"],
            "answer": "nope"
        });
        payload["levels"][0]["questions"][1]["answer"] = json!("Purple");

        let mut ids = QuestionIds::new();
        let bank = normalize(Some(&payload), "X", &mut ids);
        let beginner = bank.level(LevelId::Beginner);
        assert_eq!(beginner[0].prompt, MISSING_PROMPT);
        assert_eq!(beginner[0].options, PLACEHOLDER_OPTIONS.map(String::from));
        assert_eq!(beginner[0].correct_option, "Option A");
        assert_eq!(beginner[1].correct_option, "Red");
    }

    #[test]
    fn test_extra_items_are_truncated() {
        let mut payload = level_payload();
        payload["levels"][1]["questions"]
            .as_array_mut()
            .unwrap()
            .push(question("extra"));

        let mut ids = QuestionIds::new();
        let bank = normalize(Some(&payload), "X", &mut ids);
        assert_eq!(bank.total_questions(), 9);
    }

    #[test]
    fn test_structure_is_stable_across_calls() {
        let payload = level_payload();
        let mut ids = QuestionIds::new();
        let first = normalize(Some(&payload), "X", &mut ids);
        let second = normalize(Some(&payload), "X", &mut ids);

        for (a, b) in first.iter().zip(second.iter()) {
            assert_eq!(a.prompt, b.prompt);
            assert_eq!(a.options, b.options);
            assert_eq!(a.correct_option, b.correct_option);
            assert_ne!(a.id, b.id);
        }
    }

    #[test]
    fn test_fallback_is_deterministic_with_distinct_ids() {
        let mut ids = QuestionIds::new();
        let first = fallback_bank("Halo", &mut ids);
        let second = fallback_bank("Halo", &mut ids);

        let prompts = |bank: &QuestionBank| bank.iter().map(|q| q.prompt.clone()).collect::<Vec<_>>();
        assert_eq!(prompts(&first), prompts(&second));

        let all_ids: HashSet<String> = first.iter().chain(second.iter()).map(|q| q.id.clone()).collect();
        assert_eq!(all_ids.len(), 18);
    }

    #[test]
    fn test_blank_subject_uses_default() {
        let mut ids = QuestionIds::new();
        let bank = fallback_bank("  ", &mut ids);
        assert!(bank.iter().all(|q| q.prompt.contains(DEFAULT_SUBJECT)));
    }

    #[test]
    fn test_non_object_payloads_fall_back() {
        let mut ids = QuestionIds::new();
        for raw in [json!(null), json!("levels"), json!(42), json!({ "levels": "none" })] {
            assert!(normalize(Some(&raw), "X", &mut ids).is_fallback());
        }
    }

    #[test]
    fn test_supplied_duplicate_ids_are_replaced() {
        let mut payload = level_payload();
        for level in 0..3 {
            for q in 0..3 {
                payload["levels"][level]["questions"][q]["id"] = json!("dup");
            }
        }

        let mut ids = QuestionIds::new();
        let bank = normalize(Some(&payload), "X", &mut ids);
        let distinct: HashSet<&String> = bank.iter().map(|q| &q.id).collect();
        assert_eq!(distinct.len(), 9);
    }
}

use std::sync::LazyLock;

use regex::Regex;

use super::Category;

pub(super) struct Pattern {
    pub category: Category,
    pub regex: Regex,
}

const ROOM: &str = r"\w+(?:\s+room)?";

static PATTERNS: LazyLock<Vec<Pattern>> = LazyLock::new(|| {
    let sources = [
        (
            Category::Lights,
            format!(
                r"\b(?:turn|switch)\s+(?P<action>on|off)\s+(?:the\s+)?(?:lights?|lamps?)(?:\s+in\s+(?:the\s+)?(?P<location>{ROOM}))?"
            ),
        ),
        (
            Category::Lights,
            format!(
                r"\b(?:turn|switch)\s+(?:the\s+)?(?:(?P<location>{ROOM})\s+)?(?:lights?|lamps?)\s+(?P<action>on|off)"
            ),
        ),
        (
            Category::Lights,
            format!(
                r"\b(?P<action>dim|brighten)\s+(?:the\s+)?(?:lights?|lamps?)(?:\s+in\s+(?:the\s+)?(?P<location>{ROOM}))?"
            ),
        ),
        (
            Category::Temperature,
            r"\b(?:set|change)\s+(?:the\s+)?(?:temperature|thermostat|heating)\s+to\s+(?P<temperature>\d+(?:\.\d+)?)(?:\s*degrees)?".to_string(),
        ),
        (
            Category::Temperature,
            r"\b(?:make\s+it|it's\s+too|it\s+is\s+too)\s+(?P<feeling>warmer|cooler|hot|cold)".to_string(),
        ),
        (
            Category::Temperature,
            format!(
                r"\bwhat(?:'s|\s+is)\s+the\s+temperature(?:\s+in\s+(?:the\s+)?(?P<location>{ROOM}))?"
            ),
        ),
        (
            Category::Music,
            r"\bplay\s+(?:some\s+)?(?P<genre>\w+(?:\s+hop)?)\s+music".to_string(),
        ),
        (
            Category::Music,
            r"\bplay\s+(?P<song>.+?)(?:\s+by\s+(?P<artist>.+))?$".to_string(),
        ),
        (
            Category::Music,
            r"\b(?P<action>pause|stop|resume|skip)\s+(?:the\s+)?(?:music|song|track)".to_string(),
        ),
        (
            Category::Camera,
            r"\b(?:show|check|view)\s+(?:me\s+)?(?:the\s+)?(?:(?P<location>\w+(?:\s+door)?)\s+)?camera".to_string(),
        ),
        (
            Category::Camera,
            r"\b(?P<action>start|stop)\s+recording".to_string(),
        ),
        (
            Category::Security,
            r"\b(?P<action>lock|unlock)\s+(?:the\s+)?(?:(?P<location>\w+)\s+)?door".to_string(),
        ),
        (
            Category::Security,
            r"\b(?P<action>arm|disarm)\s+(?:the\s+)?(?:security|alarm)(?:\s+system)?".to_string(),
        ),
        (
            Category::Weather,
            r"\bwhat(?:'s|\s+is)\s+the\s+weather(?:\s+like)?(?:\s+(?P<when>today|tomorrow|this\s+week))?(?:\s+in\s+(?P<city>[a-z ]+))?".to_string(),
        ),
        (
            Category::Weather,
            r"\b(?:will|is)\s+it\s+(?:going\s+to\s+)?(?P<condition>rain|snow|be\s+sunny)(?:\s+(?P<when>today|tomorrow|tonight))?".to_string(),
        ),
        (
            Category::News,
            r"\b(?:tell\s+me|what's|what\s+is|read|give\s+me)\s+(?:the\s+)?(?:latest\s+)?(?:(?P<topic>sports|tech|technology|business|world|local|science)\s+)?(?:news|headlines)".to_string(),
        ),
        (
            Category::Time,
            r"\bwhat\s+time\s+is\s+it".to_string(),
        ),
        (
            Category::Time,
            r"\bwhat(?:'s|\s+is)\s+(?:the\s+)?(?P<subject>time|date|day)(?:\s+today)?".to_string(),
        ),
        (
            Category::Reminders,
            r"\bremind\s+me\s+to\s+(?P<task>.+?)(?:\s+(?P<when>(?:at|in|on|tomorrow|tonight)\b.*))?$".to_string(),
        ),
        (
            Category::Reminders,
            r"\bset\s+(?:a|an)\s+(?P<reminder>reminder|timer|alarm)\s+for\s+(?P<when>.+)".to_string(),
        ),
        (
            Category::Routines,
            r"\b(?:start|run|activate|begin)\s+(?:the\s+|my\s+)?(?P<routine>\w+)\s+routine".to_string(),
        ),
        (
            Category::Routines,
            r"\b(?:enable\s+|activate\s+)?(?P<routine>\w+)\s+mode".to_string(),
        ),
        (
            Category::Greeting,
            r"^(?:hello|hi|hey|good\s+(?:morning|afternoon|evening))\b".to_string(),
        ),
        (
            Category::Thanks,
            r"\b(?:thanks|thank\s+you)(?:\s+(?:so\s+much|very\s+much|a\s+lot))?".to_string(),
        ),
    ];
    sources
        .into_iter()
        .map(|(category, source)| Pattern {
            category,
            regex: Regex::new(&source).unwrap(),
        })
        .collect()
});

pub(super) fn patterns() -> &'static [Pattern] {
    &PATTERNS
}

/// Keyword lists for the fallback scorer.
pub(super) const KEYWORDS: [(Category, &[&str]); 12] = [
    (Category::Lights, &["light", "lights", "lamp", "bright", "dim", "dark"]),
    (
        Category::Temperature,
        &["temperature", "thermostat", "warm", "warmer", "cold", "colder", "hot", "heat", "cool", "degrees"],
    ),
    (Category::Music, &["music", "song", "play", "playlist", "album", "track"]),
    (Category::Camera, &["camera", "video", "record", "recording", "footage"]),
    (Category::Security, &["lock", "unlock", "door", "alarm", "security", "arm"]),
    (Category::Weather, &["weather", "rain", "sunny", "forecast", "snow", "umbrella"]),
    (Category::News, &["news", "headlines"]),
    (Category::Time, &["time", "date", "day", "clock"]),
    (Category::Reminders, &["remind", "reminder", "timer", "appointment", "schedule"]),
    (Category::Routines, &["routine", "mode", "scene"]),
    (Category::Greeting, &["hello", "hi", "hey", "morning"]),
    (Category::Thanks, &["thanks", "thank", "appreciate"]),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_compile_every_pattern() {
        assert!(!patterns().is_empty());
    }

    #[test]
    fn should_cover_every_recognised_category() {
        for category in Category::RECOGNISED {
            assert!(
                patterns().iter().any(|p| p.category == category),
                "no pattern for {category}"
            );
            assert!(KEYWORDS.iter().any(|(c, _)| *c == category));
        }
    }

    #[test]
    fn should_capture_location_from_lights_command() {
        let caps = patterns()[0]
            .regex
            .captures("turn on the lights in the living room")
            .unwrap();
        assert_eq!(&caps["action"], "on");
        assert_eq!(&caps["location"], "living room");
    }
}

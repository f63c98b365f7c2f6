use std::sync::LazyLock;

use chrono::Timelike;
use rand::seq::IndexedRandom;
use rand::{Rng, RngCore};
use regex::{Captures, Regex};

use super::{Category, Intent};
use crate::time::LocalTime;

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{\s*(\w+)\s*\}\}").unwrap());

/// A response line usable once all `requires` entities are present.
struct Template {
    requires: &'static [&'static str],
    text: &'static str,
}

const fn line(requires: &'static [&'static str], text: &'static str) -> Template {
    Template { requires, text }
}

const LIGHTS: &[Template] = &[
    line(&["action", "location"], "Turning {{action}} the lights in the {{location}}."),
    line(&["action", "location"], "Okay, the {{location}} lights are {{action}}."),
    line(&["action"], "Turning {{action}} the lights."),
    line(&["action"], "Lights {{action}}."),
    line(&[], "Adjusting the lights."),
];

const TEMPERATURE: &[Template] = &[
    line(&["temperature"], "Setting the temperature to {{temperature}} degrees."),
    line(&["temperature"], "Okay, the thermostat is now set to {{temperature}}°."),
    line(&["feeling"], "Making it {{feeling}} for you."),
    line(&["location"], "Checking the temperature in the {{location}}."),
    line(&[], "Checking the current temperature."),
];

const MUSIC: &[Template] = &[
    line(&["song", "artist"], "Playing {{song}} by {{artist}}."),
    line(&["song"], "Playing {{song}}."),
    line(&["song"], "Here's {{song}}."),
    line(&["genre"], "Playing some {{genre}} music."),
    line(&["genre"], "Here's a {{genre}} playlist for you."),
    line(&["action"], "Okay, I'll {{action}} the music."),
    line(&[], "Playing your music."),
];

const CAMERA: &[Template] = &[
    line(&["location"], "Showing the {{location}} camera."),
    line(&["action"], "Okay, I'll {{action}} recording."),
    line(&[], "Opening the camera feed."),
];

const SECURITY: &[Template] = &[
    line(&["action", "location"], "Okay, I'll {{action}} the {{location}} door."),
    line(&["action"], "Security: {{action}} confirmed."),
    line(&[], "Checking your home security."),
];

const WEATHER: &[Template] = &[
    line(&["city"], "Looking up the weather in {{city}}."),
    line(&["condition"], "Checking whether it will {{condition}} {{when}}."),
    line(&[], "Here's the forecast for {{when}}."),
    line(&[], "It's {{day}} and the skies look clear."),
];

const NEWS: &[Template] = &[
    line(&["topic"], "Here are the latest {{topic}} headlines."),
    line(&[], "Here are today's top headlines."),
    line(&[], "Here's what's happening today."),
];

const TIME: &[Template] = &[
    line(&[], "It's {{now}}."),
    line(&[], "Right now it's {{now}}."),
];

const REMINDERS: &[Template] = &[
    line(&["task", "when"], "I'll remind you to {{task}} {{when}}."),
    line(&["task"], "Okay, I'll remind you to {{task}}."),
    line(&["reminder", "when"], "Setting a {{reminder}} for {{when}}."),
    line(&[], "What should I remind you about?"),
];

const ROUTINES: &[Template] = &[
    line(&["routine"], "Starting your {{routine}} routine."),
    line(&["routine"], "Okay, activating {{routine}} mode."),
    line(&[], "Running your routine."),
];

const GREETING: &[Template] = &[
    line(&[], "Hello! How can I help you?"),
    line(&[], "Hi there! What can I do for you?"),
    line(&[], "Good {{period}}!"),
];

const THANKS: &[Template] = &[
    line(&[], "You're welcome!"),
    line(&[], "Happy to help."),
    line(&[], "Anytime!"),
];

const FALLBACKS: [&str; 4] = [
    "Sorry, I didn't understand that.",
    "Could you rephrase that?",
    "I'm not sure how to help with that yet.",
    "I didn't catch that. Could you try again?",
];

fn templates(category: Category) -> &'static [Template] {
    match category {
        Category::Lights => LIGHTS,
        Category::Temperature => TEMPERATURE,
        Category::Music => MUSIC,
        Category::Camera => CAMERA,
        Category::Security => SECURITY,
        Category::Weather => WEATHER,
        Category::News => NEWS,
        Category::Time => TIME,
        Category::Reminders => REMINDERS,
        Category::Routines => ROUTINES,
        Category::Greeting => GREETING,
        Category::Thanks => THANKS,
        Category::Unknown => &[],
    }
}

/// Render a spoken answer for `intent`.
///
/// The most specific templates whose required entities are all present are
/// candidates; one is picked at random. Unknown intents get a fallback line.
pub fn respond(intent: &Intent, now: LocalTime, rng: &mut dyn RngCore) -> String {
    let candidates = templates(intent.category);
    let satisfied = |t: &&Template| {
        t.requires
            .iter()
            .all(|key| intent.entities.contains_key(*key))
    };
    let Some(specificity) = candidates
        .iter()
        .filter(satisfied)
        .map(|t| t.requires.len())
        .max()
    else {
        return FALLBACKS[rng.random_range(0..FALLBACKS.len())].to_string();
    };
    let eligible: Vec<&Template> = candidates
        .iter()
        .filter(satisfied)
        .filter(|t| t.requires.len() == specificity)
        .collect();
    match eligible.choose(rng) {
        Some(template) => render(template.text, intent, now),
        None => FALLBACKS[0].to_string(),
    }
}

fn render(text: &str, intent: &Intent, now: LocalTime) -> String {
    PLACEHOLDER
        .replace_all(text, |caps: &Captures| lookup(&caps[1], intent, now))
        .into_owned()
}

fn lookup(key: &str, intent: &Intent, now: LocalTime) -> String {
    if let Some(value) = intent.entity(key) {
        return value.to_string();
    }
    match key {
        "time" => now.format("%H:%M").to_string(),
        "date" => now.format("%B %-d, %Y").to_string(),
        "day" => now.format("%A").to_string(),
        "now" => match intent.entity("subject") {
            Some("date") => format!("{}", now.format("%B %-d, %Y")),
            Some("day") => format!("{}", now.format("%A")),
            _ => format!("{}", now.format("%H:%M")),
        },
        "period" => match now.hour() {
            5..12 => "morning".to_string(),
            12..18 => "afternoon".to_string(),
            _ => "evening".to_string(),
        },
        "when" => "today".to_string(),
        "location" => "house".to_string(),
        _ => "that".to_string(),
    }
}

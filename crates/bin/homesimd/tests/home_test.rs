//! End-to-end tests for the full homesim stack.
//!
//! Each test wires the real virtual device factory, the tokio scheduler and
//! the home service together. Timer-driven behaviour runs on paused tokio
//! time, so minutes of simulated waiting take no wall-clock time.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{FixedOffset, TimeZone, Utc};
use homesim_adapter_virtual::VirtualDeviceFactory;
use homesim_app::scheduler::TokioScheduler;
use homesim_app::services::HomeService;
use homesim_domain::device::AttributeValue;
use homesim_domain::error::{HomeError, Rejection};
use homesim_domain::time::Timestamp;
use rand::SeedableRng;
use rand::rngs::StdRng;

type Home = HomeService<VirtualDeviceFactory, Arc<TokioScheduler>>;
type Messages = Arc<Mutex<Vec<String>>>;

fn noon() -> Timestamp {
    Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap()
}

/// A home on a fixed midday clock with deterministic randomness.
fn home() -> (Home, Arc<TokioScheduler>) {
    let scheduler = Arc::new(TokioScheduler::new());
    let home = HomeService::builder(VirtualDeviceFactory::default(), Arc::clone(&scheduler))
        .clock(noon)
        .offset(FixedOffset::east_opt(0).unwrap())
        .rng(StdRng::seed_from_u64(42))
        .build();
    (home, scheduler)
}

fn record(home: &Home, name: &str) -> Messages {
    let messages: Messages = Arc::default();
    let sink = Arc::clone(&messages);
    home.subscribe(
        name,
        Arc::new(move |message: &str| sink.lock().unwrap().push(message.to_string())),
    )
    .unwrap();
    messages
}

fn count(messages: &Messages, needle: &str) -> usize {
    messages
        .lock()
        .unwrap()
        .iter()
        .filter(|message| message.contains(needle))
        .count()
}

// ---------------------------------------------------------------------------
// State changes
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_reject_unknown_ac_state_and_keep_status() {
    let (home, _) = home();
    home.add_device("ac", "office").unwrap();
    let messages = record(&home, "office");

    let result = home.change_state("office", "warp-speed");

    assert!(matches!(
        result,
        Err(HomeError::Rejected(Rejection::InvalidState { .. }))
    ));
    assert_eq!(home.get_device("office").unwrap().status, "off");
    assert_eq!(
        messages.lock().unwrap().as_slice(),
        ["office: Invalid state for AC: warp-speed"]
    );
}

#[tokio::test]
async fn should_notify_observers_in_registration_order() {
    let (home, _) = home();
    home.add_device("light", "kitchen").unwrap();
    let order: Messages = Arc::default();
    for tag in ["first", "second"] {
        let sink = Arc::clone(&order);
        home.subscribe(
            "kitchen",
            Arc::new(move |message: &str| sink.lock().unwrap().push(format!("{tag} {message}"))),
        )
        .unwrap();
    }

    home.change_state("kitchen", "on").unwrap();

    assert_eq!(
        order.lock().unwrap().as_slice(),
        ["first kitchen: Light is on", "second kitchen: Light is on"]
    );
}

#[tokio::test]
async fn should_refuse_commands_while_disconnected() {
    let (home, _) = home();
    home.add_device("light", "porch").unwrap();
    let messages = record(&home, "porch");

    home.set_active("porch", false).unwrap();
    let result = home.change_state("porch", "on");
    assert!(matches!(
        result,
        Err(HomeError::Rejected(Rejection::Disconnected))
    ));

    home.set_active("porch", true).unwrap();
    assert!(home.change_state("porch", "on").is_ok());
    assert_eq!(
        messages.lock().unwrap().as_slice(),
        [
            "porch: Device disconnected",
            "porch: Device is disconnected",
            "porch: Device connected",
            "porch: Light is on",
        ]
    );
}

#[tokio::test]
async fn should_reject_duplicate_and_unknown_devices() {
    let (home, _) = home();
    home.add_device("fan", "ceiling").unwrap();
    assert!(matches!(
        home.add_device("fan", "ceiling"),
        Err(HomeError::Validation(_))
    ));
    assert!(matches!(
        home.add_device("toaster", "kitchen"),
        Err(HomeError::Validation(_))
    ));
    assert!(matches!(
        home.change_state("ghost", "on"),
        Err(HomeError::NotFound(_))
    ));
}

// ---------------------------------------------------------------------------
// Timers
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn should_auto_close_garage_only_once_when_reopened() {
    let (home, _) = home();
    home.add_device("garage door", "garage").unwrap();
    let messages = record(&home, "garage");

    home.change_state("garage", "open").unwrap();
    tokio::time::sleep(Duration::from_secs(5 * 60)).await;
    home.change_state("garage", "half-open").unwrap();
    tokio::time::sleep(Duration::from_secs(6 * 60)).await;

    assert_eq!(count(&messages, "closed automatically"), 0);
    assert_eq!(home.get_device("garage").unwrap().status, "half-open");

    tokio::time::sleep(Duration::from_secs(5 * 60)).await;
    assert_eq!(count(&messages, "closed automatically"), 1);
    assert_eq!(home.get_device("garage").unwrap().status, "closed");
}

#[tokio::test(start_paused = true)]
async fn should_relock_after_five_minutes() {
    let (home, _) = home();
    home.add_device("lock", "front").unwrap();

    home.change_state("front", "pin:1234").unwrap();
    tokio::time::sleep(Duration::from_secs(4 * 60)).await;
    assert_eq!(home.get_device("front").unwrap().status, "unlocked");

    tokio::time::sleep(Duration::from_secs(2 * 60)).await;
    let front = home.get_device("front").unwrap();
    assert_eq!(front.status, "locked");
    assert_eq!(front.get_attribute("locked"), Some(&AttributeValue::Bool(true)));
}

#[tokio::test(start_paused = true)]
async fn should_return_doorbell_to_standby_when_unanswered() {
    let (home, scheduler) = home();
    home.add_device("doorbell", "front door").unwrap();
    let messages = record(&home, "front door");

    home.change_state("front door", "ring").unwrap();
    assert_eq!(home.get_device("front door").unwrap().status, "ringing");

    tokio::time::sleep(Duration::from_secs(31)).await;

    assert_eq!(count(&messages, "front door: Ding Dong!"), 4);
    assert_eq!(count(&messages, "No answer. Doorbell returned to standby."), 1);
    assert_eq!(home.get_device("front door").unwrap().status, "standby");
    assert_eq!(scheduler.pending(), 0);
}

#[tokio::test(start_paused = true)]
async fn should_stop_ringing_when_answered() {
    let (home, scheduler) = home();
    home.add_device("doorbell", "front door").unwrap();
    let messages = record(&home, "front door");

    home.change_state("front door", "ring").unwrap();
    home.change_state("front door", "answer").unwrap();
    tokio::time::sleep(Duration::from_secs(60)).await;

    assert_eq!(count(&messages, "No answer"), 0);
    assert_eq!(home.get_device("front door").unwrap().status, "answered");
    assert_eq!(scheduler.pending(), 0);
}

#[tokio::test(start_paused = true)]
async fn should_answer_voice_command_after_thinking_delay() {
    let (home, _) = home();
    home.add_device("voice_assistant", "echo").unwrap();
    let messages = record(&home, "echo");

    home.change_state("echo", "listening").unwrap();
    home.change_state("echo", "command:turn on the lights in the kitchen")
        .unwrap();
    assert_eq!(home.get_device("echo").unwrap().status, "processing");
    assert_eq!(count(&messages, "Response:"), 0);

    tokio::time::sleep(Duration::from_secs(1)).await;

    assert_eq!(count(&messages, "echo: Response:"), 1);
    assert_eq!(home.get_device("echo").unwrap().status, "listening");
}

#[tokio::test(start_paused = true)]
async fn should_cancel_pending_timers_when_device_removed() {
    let (home, scheduler) = home();
    home.add_device("garage door", "garage").unwrap();
    home.change_state("garage", "open").unwrap();
    assert_eq!(scheduler.pending(), 1);

    home.remove_device("garage").unwrap();

    assert_eq!(scheduler.pending(), 0);
    assert!(matches!(
        home.get_device("garage"),
        Err(HomeError::NotFound(_))
    ));
}

#[tokio::test(start_paused = true)]
async fn should_ignore_timer_that_fires_while_disconnected() {
    let (home, _) = home();
    home.add_device("lock", "back").unwrap();
    home.change_state("back", "unlock").unwrap();
    home.set_active("back", false).unwrap();

    tokio::time::sleep(Duration::from_secs(6 * 60)).await;

    assert_eq!(home.get_device("back").unwrap().status, "unlocked");
}

#[tokio::test(start_paused = true)]
async fn should_stop_chiming_when_doorbell_disconnected_while_ringing() {
    let (home, scheduler) = home();
    home.add_device("doorbell", "front door").unwrap();
    let messages = record(&home, "front door");

    home.change_state("front door", "ring").unwrap();
    home.set_active("front door", false).unwrap();
    tokio::time::sleep(Duration::from_secs(31)).await;

    assert_eq!(count(&messages, "front door: Ding Dong!"), 1);
    assert_eq!(count(&messages, "No answer"), 0);
    assert_eq!(home.get_device("front door").unwrap().status, "ringing");
    assert_eq!(scheduler.pending(), 0);
}

#[tokio::test(start_paused = true)]
async fn should_not_answer_when_assistant_disconnected_while_thinking() {
    let (home, _) = home();
    home.add_device("voice_assistant", "echo").unwrap();
    let messages = record(&home, "echo");

    home.change_state("echo", "command:what time is it").unwrap();
    home.set_active("echo", false).unwrap();
    tokio::time::sleep(Duration::from_secs(1)).await;

    assert_eq!(count(&messages, "Response:"), 0);
    assert_eq!(home.get_device("echo").unwrap().status, "idle");
}

// ---------------------------------------------------------------------------
// Simulation ticks
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn should_self_adjust_blinds_after_first_tick() {
    let (home, _) = home();
    home.add_device("blinds", "bedroom").unwrap();
    assert_eq!(home.get_device("bedroom").unwrap().status, "closed");

    home.tick();
    tokio::time::sleep(Duration::from_secs(5 * 60 + 1)).await;
    assert_eq!(home.get_device("bedroom").unwrap().status, "open");

    tokio::time::sleep(Duration::from_secs(5 * 60)).await;
    assert_eq!(home.get_device("bedroom").unwrap().status, "closed");
}

#[tokio::test]
async fn should_warm_room_when_heating_on_tick() {
    let (home, _) = home();
    home.add_device("thermostat", "hall").unwrap();
    home.change_state("hall", "target:28").unwrap();
    home.change_state("hall", "heating").unwrap();

    let before = temperature(&home, "hall");
    home.tick();
    let after = temperature(&home, "hall");
    assert!(after > before, "{before} -> {after}");
}

fn temperature(home: &Home, name: &str) -> f64 {
    match home
        .get_device(name)
        .unwrap()
        .get_attribute("current_temperature")
    {
        Some(AttributeValue::Float(value)) => *value,
        other => panic!("unexpected temperature attribute {other:?}"),
    }
}

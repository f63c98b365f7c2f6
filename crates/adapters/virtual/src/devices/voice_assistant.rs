//! Voice assistant: interprets spoken commands and answers after a short
//! thinking delay.

use std::collections::VecDeque;
use std::fmt;
use std::time::Duration;

use homesim_app::ports::SmartDevice;
use homesim_domain::command::{AssistantCommand, Command, Percent};
use homesim_domain::context::DeviceContext;
use homesim_domain::device::{Device, DeviceKind};
use homesim_domain::error::Rejection;
use homesim_domain::outcome::Outcome;
use homesim_domain::time::Timestamp;
use homesim_domain::timer::TimerPurpose;
use homesim_domain::voice::{Intent, Interpreter, InterpreterConfig, respond};

use super::DeviceCore;

const THINKING_DELAY: Duration = Duration::from_millis(800);
const HISTORY_LIMIT: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListeningMode {
    Active,
    Passive,
    Muted,
}

impl ListeningMode {
    /// Status shown once the assistant is not busy.
    fn idle_status(self) -> &'static str {
        match self {
            Self::Active => "listening",
            Self::Passive => "idle",
            Self::Muted => "muted",
        }
    }
}

impl fmt::Display for ListeningMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Active => "active",
            Self::Passive => "passive",
            Self::Muted => "muted",
        })
    }
}

/// One processed utterance.
#[derive(Debug, Clone)]
struct HistoryEntry {
    at: Timestamp,
    utterance: String,
}

pub struct VoiceAssistant {
    core: DeviceCore,
    interpreter: Interpreter,
    mode: ListeningMode,
    volume: Percent,
    history: VecDeque<HistoryEntry>,
    /// Answers waiting for the thinking delay to elapse.
    pending: VecDeque<String>,
    last_intent: Option<Intent>,
}

impl VoiceAssistant {
    #[must_use]
    pub fn new(name: &str, config: InterpreterConfig) -> Self {
        Self {
            core: DeviceCore::new(DeviceKind::VoiceAssistant, name, "idle"),
            interpreter: Interpreter::new(config),
            mode: ListeningMode::Passive,
            volume: Percent::new(50).unwrap_or(Percent::FULL),
            history: VecDeque::new(),
            pending: VecDeque::new(),
            last_intent: None,
        }
    }

    #[must_use]
    pub fn mode(&self) -> ListeningMode {
        self.mode
    }

    /// The last interpreted intent, if any command was processed.
    #[must_use]
    pub fn last_intent(&self) -> Option<&Intent> {
        self.last_intent.as_ref()
    }

    /// The latest processed utterances with their timestamps, oldest first.
    pub fn history(&self) -> impl Iterator<Item = (Timestamp, &str)> {
        self.history
            .iter()
            .map(|entry| (entry.at, entry.utterance.as_str()))
    }

    fn listen_as(&mut self, mode: ListeningMode) {
        self.mode = mode;
        if self.pending.is_empty() {
            self.core.set_status(mode.idle_status());
        }
    }

    fn ask(&mut self, utterance: String, ctx: &mut DeviceContext<'_>) -> Result<Outcome, Rejection> {
        if self.mode == ListeningMode::Muted {
            return Err(Rejection::Muted);
        }
        self.core.set_status("processing");
        let intent = self.interpreter.interpret(&utterance);
        tracing::debug!(
            device = %self.core.name,
            category = %intent.category,
            confidence = intent.confidence,
            "utterance interpreted"
        );
        let answer = respond(&intent, ctx.local_now(), &mut *ctx.rng);
        self.pending.push_back(answer);
        self.last_intent = Some(intent);
        let notice = format!("Processing command: {utterance}");
        if self.history.len() == HISTORY_LIMIT {
            self.history.pop_front();
        }
        self.history.push_back(HistoryEntry {
            at: ctx.now,
            utterance,
        });
        Ok(Outcome::notice(notice).start(TimerPurpose::AssistantResponse, THINKING_DELAY))
    }

    fn handle(
        &mut self,
        command: AssistantCommand,
        ctx: &mut DeviceContext<'_>,
    ) -> Result<Outcome, Rejection> {
        match command {
            AssistantCommand::Listen => {
                self.listen_as(ListeningMode::Active);
                Ok(Outcome::notice("Now actively listening for commands"))
            }
            AssistantCommand::Passive => {
                self.listen_as(ListeningMode::Passive);
                Ok(Outcome::notice("Switched to passive listening mode"))
            }
            AssistantCommand::Mute => {
                self.listen_as(ListeningMode::Muted);
                Ok(Outcome::notice("Voice assistant muted"))
            }
            AssistantCommand::Volume(level) => {
                self.volume = level;
                Ok(Outcome::notice(format!("Volume set to {level}")))
            }
            AssistantCommand::Ask(utterance) => self.ask(utterance, ctx),
            AssistantCommand::ClearHistory => {
                self.history.clear();
                self.interpreter.clear_context();
                Ok(Outcome::notice("Command history cleared"))
            }
        }
    }
}

impl SmartDevice for VoiceAssistant {
    delegate_core!();

    fn apply(
        &mut self,
        command: Command,
        ctx: &mut DeviceContext<'_>,
    ) -> Result<Outcome, Rejection> {
        self.core.ensure_active()?;
        match command {
            Command::VoiceAssistant(command) => self.handle(command, ctx),
            _ => Err(Rejection::Unsupported {
                kind: self.core.kind,
            }),
        }
    }

    fn on_timer(&mut self, purpose: TimerPurpose, _ctx: &mut DeviceContext<'_>) -> Outcome {
        if purpose != TimerPurpose::AssistantResponse {
            return Outcome::default();
        }
        if !self.core.active {
            tracing::debug!(
                device = %self.core.name,
                dropped = self.pending.len(),
                "answers dropped while disconnected"
            );
            self.pending.clear();
            self.core.set_status(self.mode.idle_status());
            return Outcome::default();
        }
        let outcome = self
            .pending
            .drain(..)
            .fold(Outcome::default(), |outcome, answer| {
                outcome.with_notice(format!("Response: {answer}"))
            });
        self.core.set_status(self.mode.idle_status());
        outcome
    }

    fn snapshot(&self) -> Device {
        let device = self
            .core
            .snapshot()
            .with_attribute("listening_mode", self.mode.to_string())
            .with_attribute("volume", self.volume.value())
            .with_attribute("history", self.history.len())
            .with_attribute(
                "last_command",
                self.history
                    .back()
                    .map(|entry| entry.utterance.clone())
                    .unwrap_or_default(),
            );
        match &self.last_intent {
            Some(intent) => device
                .with_attribute("last_category", intent.category.as_str())
                .with_attribute("last_confidence", intent.confidence),
            None => device,
        }
    }
}

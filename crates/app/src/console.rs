//! Interactive terminal loop.
//!
//! Three event sources feed one `PracticeState`: stdin lines, a one-second
//! heartbeat and the speech channel. Each event is handled to completion
//! before the next is polled.

use std::time::Duration;

use interview_core::model::Category;
use services::{
    IgnoredReason, PracticeState, RecordingToggle, SessionState, SpeechEvent, SubmitOutcome,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;

use crate::render;

pub struct ConsoleOptions {
    pub question_count: usize,
    pub categories: Vec<Category>,
    /// Results go to stdout as JSON; everything else moves to stderr.
    pub json: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

struct Console<'a> {
    practice: PracticeState,
    options: &'a ConsoleOptions,
}

impl Console<'_> {
    fn say(&self, text: &str) {
        if self.options.json {
            eprintln!("{text}");
        } else {
            println!("{text}");
        }
    }

    fn begin(&mut self) {
        let state = self
            .practice
            .start(self.options.question_count, &self.options.categories);
        if state == SessionState::InProgress {
            self.show_question();
        } else {
            self.say(
                "No questions match the current filters. \
                 Adjust --count, --category or --difficulty.",
            );
        }
    }

    fn show_question(&self) {
        let progress = self.practice.controller().progress();
        if let (Some(progress), Some(question)) = (progress, self.practice.current_question()) {
            self.say(&render::question(&progress, question));
        }
    }

    fn show_results(&self) -> Result<(), serde_json::Error> {
        let Some(summary) = self.practice.controller().results() else {
            return Ok(());
        };
        if self.options.json {
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        self.say(&render::results(&summary));
        Ok(())
    }

    fn handle_line(&mut self, line: &str) -> Result<Flow, serde_json::Error> {
        let trimmed = line.trim();
        match trimmed {
            ":quit" | ":q" => return Ok(Flow::Quit),
            ":reset" => {
                self.practice.reset();
                self.begin();
            }
            ":voice" => self.toggle_voice(),
            ":time" => match self.practice.current_question() {
                Some(question) => self.say(&render::timer(
                    self.practice.timer(),
                    question.time_limit_secs(),
                )),
                None => self.say("No question is being timed."),
            },
            ":help" => self.say(
                "Type your answer over one or more lines; an empty line submits.\n\
                 :voice toggles speech input, :time shows the timer, \
                 :reset starts over, :quit exits.",
            ),
            "" => return self.submit(),
            cmd if cmd.starts_with(':') && !cmd.contains(char::is_whitespace) => {
                self.say(&format!("Unknown command {cmd}. Try :help."));
            }
            _ => {
                if self.practice.state() == SessionState::InProgress {
                    self.practice.type_text(line);
                    self.practice.type_text("\n");
                } else {
                    self.say("No question is waiting. :reset starts a new interview.");
                }
            }
        }
        Ok(Flow::Continue)
    }

    fn submit(&mut self) -> Result<Flow, serde_json::Error> {
        match self.practice.submit() {
            SubmitOutcome::Ignored(IgnoredReason::BlankAnswer) => {
                self.say("Type an answer first; an empty line submits it.");
            }
            SubmitOutcome::Ignored(_) => {
                self.say("No question is waiting. :reset starts a new interview.");
            }
            SubmitOutcome::Advanced { record, .. } => {
                self.say(&render::answer_feedback(&record));
                self.show_question();
            }
            SubmitOutcome::Completed { record, .. } => {
                self.say(&render::answer_feedback(&record));
                self.show_results()?;
            }
        }
        Ok(Flow::Continue)
    }

    fn toggle_voice(&mut self) {
        let message = match self.practice.toggle_recording() {
            RecordingToggle::Started => "Listening. Speech is added to your answer; :voice stops.",
            RecordingToggle::Stopped => "Stopped listening.",
            RecordingToggle::Unavailable => "Speech input is not available here. Keep typing.",
            RecordingToggle::NoActiveQuestion => "No question is waiting for an answer.",
            RecordingToggle::Failed(_) => "Could not start speech input. Keep typing.",
        };
        self.say(message);
    }

    fn handle_speech(&mut self, event: SpeechEvent) {
        let was_available = self.practice.speech_available();
        let echo = match &event {
            SpeechEvent::Result {
                text,
                is_final: true,
                ..
            } => Some(format!("> {text}")),
            SpeechEvent::Error(code) => Some(format!("Speech error: {code}")),
            SpeechEvent::End => Some("Stopped listening.".to_owned()),
            SpeechEvent::Result { .. } => None,
        };

        if !self.practice.handle_speech_event(event) {
            return;
        }
        if let Some(echo) = echo {
            self.say(&echo);
        }
        if was_available && !self.practice.speech_available() {
            self.say("Speech input was blocked. Typed answers still work.");
        }
    }

    fn tick(&mut self) {
        let Some(elapsed) = self.practice.tick() else {
            return;
        };
        let limit = self.practice.current_question().map(|q| q.time_limit_secs());
        if limit == Some(elapsed) {
            self.say("Suggested time reached.");
        }
    }
}

/// Run sessions until `:quit` or end of input.
///
/// # Errors
///
/// Returns an error if stdin cannot be read or results fail to serialize.
pub async fn run(
    practice: PracticeState,
    mut speech_rx: mpsc::UnboundedReceiver<SpeechEvent>,
    options: &ConsoleOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut console = Console { practice, options };
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut heartbeat = tokio::time::interval(Duration::from_secs(1));
    heartbeat.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick completes immediately.
    heartbeat.tick().await;

    console.begin();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    tracing::debug!("stdin closed");
                    break;
                };
                if console.handle_line(&line)? == Flow::Quit {
                    break;
                }
            }
            _ = heartbeat.tick() => console.tick(),
            Some(event) = speech_rx.recv() => console.handle_speech(event),
        }
    }

    console.practice.reset();
    Ok(())
}

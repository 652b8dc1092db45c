// SPDX-License-Identifier: PMPL-1.0-or-later
//! Streaming text reveal.
//!
//! `StreamingText` is the pure state machine: it owns the target text and the
//! revealed length, and answers every input with a `Step` telling the caller
//! what to do with its one pending tick. `RevealHost` owns the clock, the
//! timers, and the completion callbacks.
//!
//! ## States
//!
//! - **Idle**: not streaming, the full text is shown, no timer
//! - **Revealing**: one grapheme per tick until the full length
//! - **Done**: full length reached, completion fired once for the run
//! - **Paused**: revealed length frozen, no timer

pub mod host;
pub mod timer;

pub use host::{InstanceId, RevealHost, RevealView};
pub use timer::{TimerArena, TimerHandle};

use serde::{Deserialize, Serialize};
use std::time::Duration;
use unicode_segmentation::UnicodeSegmentation;

/// Upper bound for a custom per-grapheme delay
pub const MAX_DELAY_MS: u64 = 1000;

/// Per-grapheme reveal delay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpeedTier {
    Slow,
    #[default]
    Normal,
    Fast,
    Instant,
    /// Milliseconds, already clamped to `0..=MAX_DELAY_MS`
    Custom(u64),
}

impl SpeedTier {
    /// Custom delay, clamping negative or oversized values
    pub fn custom(ms: i64) -> Self {
        SpeedTier::Custom(ms.clamp(0, MAX_DELAY_MS as i64) as u64)
    }

    pub fn delay_ms(&self) -> u64 {
        match self {
            SpeedTier::Slow => 50,
            SpeedTier::Normal => 25,
            SpeedTier::Fast => 10,
            SpeedTier::Instant => 0,
            SpeedTier::Custom(ms) => (*ms).min(MAX_DELAY_MS),
        }
    }

    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms())
    }

    /// A zero delay reveals the whole text in one step
    pub fn is_instant(&self) -> bool {
        self.delay_ms() == 0
    }
}

impl std::fmt::Display for SpeedTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SpeedTier::Slow => write!(f, "slow"),
            SpeedTier::Normal => write!(f, "normal"),
            SpeedTier::Fast => write!(f, "fast"),
            SpeedTier::Instant => write!(f, "instant"),
            SpeedTier::Custom(ms) => write!(f, "{}ms", ms),
        }
    }
}

impl std::str::FromStr for SpeedTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        match lower.as_str() {
            "slow" => Ok(SpeedTier::Slow),
            "normal" => Ok(SpeedTier::Normal),
            "fast" => Ok(SpeedTier::Fast),
            "instant" => Ok(SpeedTier::Instant),
            other => other
                .trim_end_matches("ms")
                .parse::<i64>()
                .map(SpeedTier::custom)
                .map_err(|_| format!("Unknown speed: {} (expected slow, normal, fast, instant or milliseconds)", s)),
        }
    }
}

/// Cursor glyph shown after the revealed text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CursorStyle {
    #[default]
    Block,
    Line,
    Underscore,
}

impl CursorStyle {
    pub fn glyph(&self) -> &'static str {
        match self {
            CursorStyle::Block => "\u{2588}",
            CursorStyle::Line => "|",
            CursorStyle::Underscore => "_",
        }
    }
}

impl std::str::FromStr for CursorStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "block" => Ok(CursorStyle::Block),
            "line" => Ok(CursorStyle::Line),
            "underscore" => Ok(CursorStyle::Underscore),
            other => Err(format!("Unknown cursor style: {}", other)),
        }
    }
}

/// Observable reveal state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RevealState {
    Idle,
    Revealing,
    Done,
    Paused,
}

/// Inputs of a reveal instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RevealProps {
    pub text: String,
    pub is_streaming: bool,
    pub speed: SpeedTier,
    pub cursor: CursorStyle,
}

impl Default for RevealProps {
    fn default() -> Self {
        Self {
            text: String::new(),
            is_streaming: true,
            speed: SpeedTier::Normal,
            cursor: CursorStyle::Block,
        }
    }
}

impl RevealProps {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into(), ..Self::default() }
    }

    pub fn with_speed(mut self, speed: SpeedTier) -> Self {
        self.speed = speed;
        self
    }

    pub fn with_cursor(mut self, cursor: CursorStyle) -> Self {
        self.cursor = cursor;
        self
    }

    pub fn streaming(mut self, is_streaming: bool) -> Self {
        self.is_streaming = is_streaming;
        self
    }
}

/// What the owner of the pending tick must do after an input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Leave the pending tick, if any, untouched
    Unchanged,
    /// Cancel the pending tick
    Stop,
    /// Cancel the pending tick and schedule a new one after the delay
    Schedule(Duration),
    /// Cancel the pending tick and fire the completion notification
    Complete,
}

/// Reveal state machine for one text
#[derive(Debug, Clone)]
pub struct StreamingText {
    text: String,
    /// Grapheme count of `text`
    total: usize,
    /// Graphemes revealed, `0..=total`
    revealed: usize,
    streaming: bool,
    paused: bool,
    speed: SpeedTier,
    cursor: CursorStyle,
    /// Completion already fired for the current run
    completed: bool,
}

impl StreamingText {
    /// Build the machine and the step for its initial evaluation
    pub fn new(props: RevealProps) -> (Self, Step) {
        let total = props.text.graphemes(true).count();
        let mut machine = Self {
            text: props.text,
            total,
            revealed: total,
            streaming: props.is_streaming,
            paused: false,
            speed: props.speed,
            cursor: props.cursor,
            completed: false,
        };

        let step = if machine.streaming { machine.start_run() } else { Step::Unchanged };
        (machine, step)
    }

    pub fn state(&self) -> RevealState {
        if !self.streaming {
            RevealState::Idle
        } else if self.paused {
            RevealState::Paused
        } else if self.revealed < self.total {
            RevealState::Revealing
        } else {
            RevealState::Done
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn revealed(&self) -> usize {
        self.revealed
    }

    /// Length of the full text in grapheme clusters
    pub fn total(&self) -> usize {
        self.total
    }

    pub fn speed(&self) -> SpeedTier {
        self.speed
    }

    pub fn cursor_style(&self) -> CursorStyle {
        self.cursor
    }

    pub fn is_streaming(&self) -> bool {
        self.streaming
    }

    /// The revealed prefix, cut on a grapheme boundary
    pub fn visible_text(&self) -> &str {
        let end = self
            .text
            .grapheme_indices(true)
            .nth(self.revealed)
            .map(|(i, _)| i)
            .unwrap_or(self.text.len());
        &self.text[..end]
    }

    /// Cursor glyph, shown while revealing or on the done frame of a stream
    pub fn cursor(&self) -> Option<&'static str> {
        match self.state() {
            RevealState::Revealing | RevealState::Done => Some(self.cursor.glyph()),
            RevealState::Idle | RevealState::Paused => None,
        }
    }

    /// Replace the target text; while streaming this restarts the run from 0
    pub fn set_text(&mut self, text: impl Into<String>) -> Step {
        let text = text.into();
        if text == self.text {
            return Step::Unchanged;
        }

        self.total = text.graphemes(true).count();
        self.text = text;

        if self.streaming {
            self.start_run()
        } else {
            self.revealed = self.total;
            Step::Stop
        }
    }

    pub fn set_streaming(&mut self, streaming: bool) -> Step {
        if streaming == self.streaming {
            return Step::Unchanged;
        }
        self.streaming = streaming;

        if streaming {
            self.start_run()
        } else {
            self.paused = false;
            self.revealed = self.total;
            Step::Stop
        }
    }

    /// Change the delay; an in-flight tick is rescheduled at the new delay
    pub fn set_speed(&mut self, speed: SpeedTier) -> Step {
        if speed == self.speed {
            return Step::Unchanged;
        }
        self.speed = speed;

        if self.state() == RevealState::Revealing {
            self.continue_run()
        } else {
            Step::Unchanged
        }
    }

    /// Cursor style does not affect timing
    pub fn set_cursor(&mut self, cursor: CursorStyle) {
        self.cursor = cursor;
    }

    /// Freeze the revealed length mid-run
    pub fn pause(&mut self) -> Step {
        if self.state() != RevealState::Revealing {
            return Step::Unchanged;
        }
        self.paused = true;
        Step::Stop
    }

    /// Continue a paused run from the frozen length
    pub fn resume(&mut self) -> Step {
        if self.state() != RevealState::Paused {
            return Step::Unchanged;
        }
        self.paused = false;
        self.continue_run()
    }

    /// Reveal one more grapheme
    pub fn tick(&mut self) -> Step {
        if self.state() != RevealState::Revealing {
            return Step::Stop;
        }
        self.revealed = (self.revealed + 1).min(self.total);
        self.continue_run()
    }

    fn start_run(&mut self) -> Step {
        self.revealed = 0;
        self.paused = false;
        self.completed = false;
        self.continue_run()
    }

    fn continue_run(&mut self) -> Step {
        if self.speed.is_instant() {
            self.revealed = self.total;
        }

        if self.revealed < self.total {
            return Step::Schedule(self.speed.delay());
        }

        if self.completed {
            Step::Stop
        } else {
            self.completed = true;
            Step::Complete
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn streaming(text: &str, speed: SpeedTier) -> (StreamingText, Step) {
        StreamingText::new(RevealProps::new(text).with_speed(speed))
    }

    #[test]
    fn test_not_streaming_shows_full_text() {
        let (machine, step) = StreamingText::new(RevealProps::new("Hello").streaming(false));
        assert_eq!(step, Step::Unchanged);
        assert_eq!(machine.state(), RevealState::Idle);
        assert_eq!(machine.visible_text(), "Hello");
        assert_eq!(machine.cursor(), None);

        let (empty, step) = StreamingText::new(RevealProps::new("").streaming(false));
        assert_eq!(step, Step::Unchanged);
        assert_eq!(empty.visible_text(), "");
    }

    #[test]
    fn test_instant_completes_in_one_step() {
        let (machine, step) = streaming("Hello", SpeedTier::Instant);
        assert_eq!(step, Step::Complete);
        assert_eq!(machine.state(), RevealState::Done);
        assert_eq!(machine.visible_text(), "Hello");
        assert_eq!(machine.cursor(), Some("\u{2588}"));
    }

    #[test]
    fn test_ticks_until_done() {
        let (mut machine, step) = streaming("abc", SpeedTier::Normal);
        assert_eq!(step, Step::Schedule(Duration::from_millis(25)));
        assert_eq!(machine.visible_text(), "");

        assert_eq!(machine.tick(), Step::Schedule(Duration::from_millis(25)));
        assert_eq!(machine.visible_text(), "a");
        assert_eq!(machine.tick(), Step::Schedule(Duration::from_millis(25)));
        assert_eq!(machine.tick(), Step::Complete);
        assert_eq!(machine.visible_text(), "abc");
        assert_eq!(machine.state(), RevealState::Done);

        // Stale tick after completion
        assert_eq!(machine.tick(), Step::Stop);
        assert_eq!(machine.revealed(), 3);
    }

    #[test]
    fn test_text_change_restarts() {
        let (mut machine, _) = streaming("Hello", SpeedTier::Fast);
        machine.tick();
        machine.tick();
        assert_eq!(machine.set_text("World!"), Step::Schedule(Duration::from_millis(10)));
        assert_eq!(machine.revealed(), 0);
        assert_eq!(machine.total(), 6);
        assert_eq!(machine.set_text("World!"), Step::Unchanged);
    }

    #[test]
    fn test_graphemes() {
        let (mut machine, _) = streaming("e\u{301}👍🏽x", SpeedTier::Slow);
        assert_eq!(machine.total(), 3);
        machine.tick();
        assert_eq!(machine.visible_text(), "e\u{301}");
        machine.tick();
        assert_eq!(machine.visible_text(), "e\u{301}👍🏽");
    }

    #[test]
    fn test_stop_streaming_mid_run() {
        let (mut machine, _) = streaming("Hello", SpeedTier::Normal);
        machine.tick();
        assert_eq!(machine.set_streaming(false), Step::Stop);
        assert_eq!(machine.state(), RevealState::Idle);
        assert_eq!(machine.visible_text(), "Hello");

        assert_eq!(machine.set_streaming(true), Step::Schedule(Duration::from_millis(25)));
        assert_eq!(machine.revealed(), 0);
    }

    #[test]
    fn test_pause_and_resume() {
        let (mut machine, _) = streaming("Hello", SpeedTier::Normal);
        machine.tick();
        machine.tick();
        assert_eq!(machine.pause(), Step::Stop);
        assert_eq!(machine.state(), RevealState::Paused);
        assert_eq!(machine.cursor(), None);
        assert_eq!(machine.tick(), Step::Stop);
        assert_eq!(machine.revealed(), 2);

        assert_eq!(machine.resume(), Step::Schedule(Duration::from_millis(25)));
        assert_eq!(machine.state(), RevealState::Revealing);
        assert_eq!(machine.resume(), Step::Unchanged);
    }

    #[test]
    fn test_speed_change() {
        let (mut machine, _) = streaming("Hello", SpeedTier::Slow);
        assert_eq!(machine.set_speed(SpeedTier::Fast), Step::Schedule(Duration::from_millis(10)));
        assert_eq!(machine.set_speed(SpeedTier::Instant), Step::Complete);
        assert_eq!(machine.visible_text(), "Hello");
        assert_eq!(machine.set_speed(SpeedTier::Slow), Step::Unchanged);
    }

    #[test]
    fn test_empty_stream_completes() {
        let (machine, step) = streaming("", SpeedTier::Normal);
        assert_eq!(step, Step::Complete);
        assert_eq!(machine.state(), RevealState::Done);
    }

    #[test]
    fn test_custom_speed_clamped() {
        assert_eq!(SpeedTier::custom(-5).delay_ms(), 0);
        assert!(SpeedTier::custom(-5).is_instant());
        assert_eq!(SpeedTier::custom(99_999).delay_ms(), MAX_DELAY_MS);
        assert_eq!("40ms".parse::<SpeedTier>().unwrap(), SpeedTier::Custom(40));
        assert_eq!("fast".parse::<SpeedTier>().unwrap(), SpeedTier::Fast);
        assert!("warp".parse::<SpeedTier>().is_err());
    }
}

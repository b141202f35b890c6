//! Typewriter reveal for the newest bot message.
//!
//! The answer is already complete when it arrives; this only paces how much
//! of it is on screen. One character per `interval`, driven by the elapsed
//! time the event loop feeds into [`Typewriter::advance`].

use std::time::Duration;

pub struct Typewriter {
    interval: Duration,
    /// Transcript index of the message being revealed.
    key: Option<usize>,
    text: String,
    /// Byte offset of the revealed prefix, always on a char boundary.
    revealed_bytes: usize,
    /// Time carried over that did not add up to a full interval yet.
    carry: Duration,
}

impl Typewriter {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            key: None,
            text: String::new(),
            revealed_bytes: 0,
            carry: Duration::ZERO,
        }
    }

    /// Point the typewriter at a message. Restarts from zero when either the
    /// index or the text differs from the current source.
    pub fn sync(&mut self, key: usize, text: &str) {
        if self.key == Some(key) && self.text == text {
            return;
        }
        self.key = Some(key);
        self.text = text.to_string();
        self.revealed_bytes = 0;
        self.carry = Duration::ZERO;
    }

    /// Forget the current source.
    pub fn clear(&mut self) {
        self.key = None;
        self.text.clear();
        self.revealed_bytes = 0;
        self.carry = Duration::ZERO;
    }

    /// Reveal as many characters as `elapsed` (plus leftover time) pays for.
    pub fn advance(&mut self, elapsed: Duration) {
        if self.is_done() {
            return;
        }
        if self.interval.is_zero() {
            self.finish();
            return;
        }

        let total = self.carry + elapsed;
        let steps = (total.as_nanos() / self.interval.as_nanos()) as usize;
        self.carry = total - self.interval * (steps.min(u32::MAX as usize) as u32);

        if steps > 0 {
            self.reveal(steps);
        }
    }

    fn reveal(&mut self, steps: usize) {
        let rest = &self.text[self.revealed_bytes..];
        let bytes: usize = rest.chars().take(steps).map(char::len_utf8).sum();
        self.revealed_bytes += bytes;
        if self.is_done() {
            self.carry = Duration::ZERO;
        }
    }

    /// Reveal everything immediately.
    pub fn finish(&mut self) {
        self.revealed_bytes = self.text.len();
        self.carry = Duration::ZERO;
    }

    /// The revealed prefix.
    pub fn visible(&self) -> &str {
        &self.text[..self.revealed_bytes]
    }

    pub fn key(&self) -> Option<usize> {
        self.key
    }

    pub fn is_done(&self) -> bool {
        self.revealed_bytes >= self.text.len()
    }
}

//! TUI App State
//!
//! Local state of the terminal front-end. The transcript itself is owned by
//! the `StreamConsumer`; this only holds what the user is typing.

#[derive(Debug, Default)]
pub struct AppState {
    pub input: String,
    pub should_quit: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the current input, leaving the box empty.
    pub fn take_input(&mut self) -> String {
        std::mem::take(&mut self.input)
    }

    /// Put back a submission the consumer refused, ahead of anything typed
    /// since.
    pub fn restore_input(&mut self, text: String) {
        self.input.insert_str(0, &text);
    }
}

//! Program output sink.
//!
//! The evaluator never prints directly; everything goes through a
//! [`Console`], which keeps a structured log of timestamped messages plus
//! the plain output buffer. An [`Echo`] mode decides whether messages also
//! reach the terminal as they arrive.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use parking_lot::Mutex;

/// Category of a console message.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum MessageKind {
    Output,
    Error,
    Info,
    Warning,
}

impl MessageKind {
    /// Prefix written before the message text.
    pub const fn prefix(self) -> &'static str {
        match self {
            MessageKind::Output => "",
            MessageKind::Error => "[ERROR] ",
            MessageKind::Info => "[INFO] ",
            MessageKind::Warning => "[WARNING] ",
        }
    }
}

/// One entry of the console log.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct ConsoleMessage {
    pub content: String,
    pub kind: MessageKind,
    /// Milliseconds since the UNIX epoch.
    pub timestamp: u128,
    /// Source line that produced the message, when known.
    pub line: Option<u32>,
}

/// Where messages go besides the buffer.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Default)]
pub enum Echo {
    /// Output to stdout, errors and warnings to stderr.
    Stdout,
    /// Buffer only (tests, embedding).
    #[default]
    Silent,
}

#[derive(Default)]
struct ConsoleState {
    messages: Vec<ConsoleMessage>,
    output: String,
}

/// Buffered, structured console.
#[derive(Default)]
pub struct Console {
    echo: Echo,
    state: Mutex<ConsoleState>,
}

/// Console handle shared between the evaluator and its driver.
pub type SharedConsole = Arc<Console>;

impl Console {
    pub fn new(echo: Echo) -> Self {
        Console {
            echo,
            state: Mutex::new(ConsoleState::default()),
        }
    }

    /// Buffer-only console.
    pub fn buffered() -> SharedConsole {
        Arc::new(Console::new(Echo::Silent))
    }

    /// Console that also writes through to the terminal.
    pub fn stdout() -> SharedConsole {
        Arc::new(Console::new(Echo::Stdout))
    }

    pub fn echo(&self) -> Echo {
        self.echo
    }

    /// Program output, appended verbatim.
    pub fn print(&self, content: &str) {
        self.record(MessageKind::Output, content, None);
    }

    /// Program output attributed to a source line.
    pub fn print_at(&self, content: &str, line: u32) {
        self.record(MessageKind::Output, content, Some(line));
    }

    pub fn print_error(&self, content: &str) {
        self.record(MessageKind::Error, content, None);
    }

    pub fn print_info(&self, content: &str) {
        self.record(MessageKind::Info, content, None);
    }

    pub fn print_warning(&self, content: &str) {
        self.record(MessageKind::Warning, content, None);
    }

    /// Append one message of any kind.
    ///
    /// Non-output kinds get their prefix and a trailing newline in the
    /// output buffer, so the buffer reads like the terminal would.
    pub fn record(&self, kind: MessageKind, content: &str, line: Option<u32>) {
        let rendered = match kind {
            MessageKind::Output => content.to_owned(),
            _ => format!("{}{}\n", kind.prefix(), content),
        };

        match (self.echo, kind) {
            (Echo::Silent, _) => {}
            (Echo::Stdout, MessageKind::Output | MessageKind::Info) => print!("{rendered}"),
            (Echo::Stdout, MessageKind::Error | MessageKind::Warning) => eprint!("{rendered}"),
        }

        let mut state = self.state.lock();
        state.output.push_str(&rendered);
        state.messages.push(ConsoleMessage {
            content: content.to_owned(),
            kind,
            timestamp: now_millis(),
            line,
        });
    }

    /// Everything written so far, as one string.
    pub fn output(&self) -> String {
        self.state.lock().output.clone()
    }

    /// Snapshot of the structured log.
    pub fn messages(&self) -> Vec<ConsoleMessage> {
        self.state.lock().messages.clone()
    }

    pub fn message_count(&self) -> usize {
        self.state.lock().messages.len()
    }

    pub fn clear(&self) {
        let mut state = self.state.lock();
        state.messages.clear();
        state.output.clear();
    }
}

fn now_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_millis())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn output_is_buffered_verbatim() {
        let console = Console::buffered();
        console.print("hello");
        console.print(" world\n");
        assert_eq!(console.output(), "hello world\n");
        assert_eq!(console.message_count(), 2);
    }

    #[test]
    fn prefixed_kinds() {
        let console = Console::buffered();
        console.print_error("boom");
        console.print_info("ready");
        console.print_warning("careful");
        assert_eq!(
            console.output(),
            "[ERROR] boom\n[INFO] ready\n[WARNING] careful\n"
        );
        let kinds: Vec<MessageKind> = console.messages().iter().map(|m| m.kind).collect();
        assert_eq!(
            kinds,
            vec![MessageKind::Error, MessageKind::Info, MessageKind::Warning]
        );
    }

    #[test]
    fn line_is_attached() {
        let console = Console::buffered();
        console.print_at("x", 7);
        let messages = console.messages();
        assert_eq!(messages[0].line, Some(7));
        assert_eq!(messages[0].content, "x");
        assert!(messages[0].timestamp > 0);
    }

    #[test]
    fn clear_resets_everything() {
        let console = Console::buffered();
        console.print("a");
        console.clear();
        assert_eq!(console.output(), "");
        assert_eq!(console.message_count(), 0);
    }
}

use std::io::Write;

/// Line-oriented sink for user-facing output.
///
/// Each call writes one block atomically, so reports from concurrently running
/// targets never interleave.
pub trait Console: Send + Sync {
    fn print(&self, block: &str);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutConsole;

impl Console for StdoutConsole {
    fn print(&self, block: &str) {
        let mut out = std::io::stdout().lock();
        // A closed stdout (e.g. `| head`) is not worth failing a target over.
        let _ = writeln!(out, "{block}");
    }
}

/// Keeps every printed block in memory.
#[cfg(any(test, feature = "test-util"))]
#[derive(Debug, Default)]
pub struct MemoryConsole {
    blocks: std::sync::Mutex<Vec<String>>,
}

#[cfg(any(test, feature = "test-util"))]
impl MemoryConsole {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn blocks(&self) -> Vec<String> {
        self.blocks.lock().map(|b| b.clone()).unwrap_or_default()
    }

    /// All output joined the way it would appear on a terminal.
    pub fn transcript(&self) -> String {
        self.blocks().iter().map(|b| format!("{b}\n")).collect()
    }
}

#[cfg(any(test, feature = "test-util"))]
impl Console for MemoryConsole {
    fn print(&self, block: &str) {
        if let Ok(mut blocks) = self.blocks.lock() {
            blocks.push(block.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_console_keeps_order() {
        let console = MemoryConsole::new();
        console.print("first");
        console.print("second\nline");

        assert_eq!(console.blocks(), vec!["first", "second\nline"]);
        assert_eq!(console.transcript(), "first\nsecond\nline\n");
    }
}

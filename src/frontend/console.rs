use std::io;
use tracing::{Level, Metadata};
use tracing_subscriber::fmt::MakeWriter;
use wasm_bindgen::JsValue;

/// Installs the global subscriber, writing each event to the browser console.
pub fn init(max_level: Level) {
    let result = tracing_subscriber::fmt()
        .with_writer(ConsoleWriter)
        .with_max_level(max_level)
        .with_ansi(false)
        .with_target(false)
        .without_time()
        .try_init();

    if let Err(error) = result {
        web_sys::console::warn_1(&format!("logging already initialised: {error}").into());
    }
}

struct ConsoleWriter;

impl<'a> MakeWriter<'a> for ConsoleWriter {
    type Writer = ConsoleLine;

    fn make_writer(&'a self) -> Self::Writer {
        ConsoleLine::new(Level::INFO)
    }

    fn make_writer_for(&'a self, meta: &Metadata<'_>) -> Self::Writer {
        ConsoleLine::new(*meta.level())
    }
}

/// Buffers one formatted event and flushes it to the console on drop.
struct ConsoleLine {
    level: Level,
    buffer: Vec<u8>,
}

impl ConsoleLine {
    fn new(level: Level) -> Self {
        Self {
            level,
            buffer: Vec::new(),
        }
    }
}

impl io::Write for ConsoleLine {
    fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
        self.buffer.extend_from_slice(bytes);
        Ok(bytes.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for ConsoleLine {
    fn drop(&mut self) {
        let text = String::from_utf8_lossy(&self.buffer);
        let line = text.trim_end();
        if line.is_empty() {
            return;
        }

        let message = JsValue::from_str(line);
        if self.level == Level::ERROR {
            web_sys::console::error_1(&message);
        } else if self.level == Level::WARN {
            web_sys::console::warn_1(&message);
        } else if self.level == Level::INFO {
            web_sys::console::info_1(&message);
        } else {
            web_sys::console::debug_1(&message);
        }
    }
}

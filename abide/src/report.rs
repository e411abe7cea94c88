use std::sync::Mutex;

use tracing::info;

/// Sink for the diagnostics and failures of a wait.
///
/// Mirrors what a test harness offers: an appended log line, and a terminal
/// failure of the current test. Implementations must tolerate concurrent
/// use from parallel tests.
pub trait Reporter {
    /// Writes one diagnostic line.
    fn log(&self, line: &str);

    /// Marks the enclosing test as failed.
    ///
    /// The default reporter panics here, ending the test on the spot.
    /// Implementations that return instead still end the wait: the polling
    /// loop never continues past a reported failure.
    fn fail(&self, message: &str);
}

/// Default reporter: logs through `tracing`, panics on failure.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn log(&self, line: &str) {
        info!("{line}");
    }

    fn fail(&self, message: &str) {
        panic!("{message}");
    }
}

/// Reporter capturing everything it receives.
///
/// Used to test waiting behaviour itself: lines and failures are buffered
/// append-only and can be inspected after the wait returns.
#[derive(Debug, Default)]
pub struct RecordingReporter {
    lines: Mutex<Vec<String>>,
    failures: Mutex<Vec<String>>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        RecordingReporter::default()
    }

    /// All log lines received so far.
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().expect("reporter lines lock").clone()
    }

    /// All failure messages received so far.
    pub fn failures(&self) -> Vec<String> {
        self.failures.lock().expect("reporter failures lock").clone()
    }
}

impl Reporter for RecordingReporter {
    fn log(&self, line: &str) {
        self.lines
            .lock()
            .expect("reporter lines lock")
            .push(line.to_string());
    }

    fn fail(&self, message: &str) {
        self.failures
            .lock()
            .expect("reporter failures lock")
            .push(message.to_string());
    }
}

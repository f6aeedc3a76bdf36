//! Terminal activation control, notifier and input loop.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{info, warn};

use super::{
    Activation, ActivationControl, ChartRenderer, Notifier, SimulationRunner, SimulationService,
    IDLE_LABEL,
};

/// A terminal "button": prints its label whenever it changes.
pub struct ConsoleControl {
    disabled: AtomicBool,
    label: Mutex<String>,
}

impl ConsoleControl {
    pub fn new() -> Self {
        Self {
            disabled: AtomicBool::new(false),
            label: Mutex::new(IDLE_LABEL.to_string()),
        }
    }
}

impl Default for ConsoleControl {
    fn default() -> Self {
        Self::new()
    }
}

impl ActivationControl for ConsoleControl {
    fn set_disabled(&self, disabled: bool) {
        self.disabled.store(disabled, Ordering::SeqCst);
    }

    fn set_label(&self, label: &str) {
        let mut current = self.label.lock().unwrap_or_else(|e| e.into_inner());
        if *current != label {
            println!("[ {label} ]");
            *current = label.to_string();
        }
    }

    fn is_disabled(&self) -> bool {
        self.disabled.load(Ordering::SeqCst)
    }

    fn label(&self) -> String {
        self.label.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

/// Shows alerts on stderr.
#[derive(Debug, Default)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn alert(&self, message: &str) {
        eprintln!("!! {message}");
    }
}

/// Why the terminal loop returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopExit {
    /// The user typed `q` or `quit`.
    Quit,
    /// The shutdown future resolved.
    Shutdown,
}

/// Read commands from `input` until the user quits or `shutdown` resolves.
///
/// An empty line or `play` spawns one activation. End of input only stops
/// reading: the loop keeps waiting for `shutdown`, so a detached process
/// keeps serving.
pub async fn run_terminal<S, R, C, N, I, F>(
    runner: Arc<SimulationRunner<S, R, C, N>>,
    input: I,
    shutdown: F,
) -> std::io::Result<LoopExit>
where
    S: SimulationService + 'static,
    R: ChartRenderer + 'static,
    C: ActivationControl + 'static,
    N: Notifier + 'static,
    I: AsyncBufRead + Unpin,
    F: Future<Output = ()>,
{
    let mut lines = input.lines();
    let mut reading = true;
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            line = lines.next_line(), if reading => {
                match line? {
                    Some(cmd) if matches!(cmd.trim(), "q" | "quit") => return Ok(LoopExit::Quit),
                    Some(cmd) if cmd.trim().is_empty() || cmd.trim() == "play" => {
                        let runner = runner.clone();
                        tokio::spawn(async move {
                            if let Activation::Ignored = runner.on_activate().await {
                                warn!("Simulation already running");
                            }
                        });
                    }
                    Some(other) => warn!(input = %other.trim(), "Unknown command"),
                    None => {
                        info!("Input closed; serving until shutdown");
                        reading = false;
                    }
                }
            }
            _ = &mut shutdown => return Ok(LoopExit::Shutdown),
        }
    }
}

//! Application event channel.
//!
//! Terminal input is read on a background task; the accordion's selection
//! callback feeds the same channel so the main loop handles both in order.

use std::time::Duration;

use crossterm::event::{self, Event as CtEvent, KeyEvent, KeyEventKind, MouseEvent};
use tokio::sync::mpsc;

/// High-level events consumed by the application.
#[derive(Debug)]
pub enum AppEvent {
    Key(KeyEvent),
    Mouse(MouseEvent),
    Resize(u16, u16),
    /// A folder summary was clicked.
    Selected(String),
    /// The terminal reader stopped; no more input will arrive.
    InputClosed,
    Tick,
}

pub fn channel() -> (mpsc::UnboundedSender<AppEvent>, mpsc::UnboundedReceiver<AppEvent>) {
    mpsc::unbounded_channel()
}

/// Spawn a task that polls the terminal and forwards events to `tx` until
/// the receiver is dropped.  A terminal error ends the task after sending
/// [`AppEvent::InputClosed`], since the selection callback keeps the
/// channel itself open.
pub fn spawn_terminal_reader(tx: mpsc::UnboundedSender<AppEvent>, tick_rate: Duration) {
    tokio::task::spawn_blocking(move || loop {
        let app_event = match event::poll(tick_rate) {
            Ok(true) => match event::read() {
                // Only presses; some platforms also report releases.
                Ok(CtEvent::Key(k)) if k.kind == KeyEventKind::Press => AppEvent::Key(k),
                Ok(CtEvent::Mouse(m)) => AppEvent::Mouse(m),
                Ok(CtEvent::Resize(w, h)) => AppEvent::Resize(w, h),
                Ok(_) => continue,
                Err(e) => {
                    tracing::warn!("terminal read failed: {e}");
                    let _ = tx.send(AppEvent::InputClosed);
                    break;
                }
            },
            Ok(false) => AppEvent::Tick,
            Err(e) => {
                tracing::warn!("terminal poll failed: {e}");
                let _ = tx.send(AppEvent::InputClosed);
                break;
            }
        };
        if tx.send(app_event).is_err() {
            break; // receiver dropped
        }
    });
}

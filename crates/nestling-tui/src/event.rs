//! Terminal input and timing, multiplexed onto one channel.
//!
//! A background task owns the crossterm `EventStream` and two interval
//! timers; the app loop only ever awaits [`EventReader::next`].

use std::time::Duration;

use crossterm::event::{Event as CrosstermEvent, EventStream, KeyEvent, KeyEventKind};
use futures::StreamExt;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

#[derive(Debug)]
pub enum Event {
    Key(KeyEvent),
    /// New terminal size as (cols, rows).
    Resize(u16, u16),
    /// Housekeeping tick: date rollover, flash expiry.
    Tick,
    /// Frame tick.
    Render,
}

pub struct EventReader {
    events: mpsc::UnboundedReceiver<Event>,
    shutdown: CancellationToken,
}

impl EventReader {
    pub fn new(tick_rate: Duration, render_rate: Duration) -> Self {
        let (tx, events) = mpsc::unbounded_channel();
        let shutdown = CancellationToken::new();

        tokio::spawn(read_loop(tx, tick_rate, render_rate, shutdown.clone()));

        Self { events, shutdown }
    }

    /// Next event, or `None` once the background task has stopped.
    pub async fn next(&mut self) -> Option<Event> {
        self.events.recv().await
    }

    pub fn stop(&self) {
        self.shutdown.cancel();
    }
}

impl Drop for EventReader {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

async fn read_loop(
    tx: mpsc::UnboundedSender<Event>,
    tick_rate: Duration,
    render_rate: Duration,
    shutdown: CancellationToken,
) {
    let mut input = EventStream::new();
    let mut ticks = tokio::time::interval(tick_rate);
    let mut frames = tokio::time::interval(render_rate);
    // Skip rather than burst when the loop falls behind.
    ticks.set_missed_tick_behavior(MissedTickBehavior::Skip);
    frames.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        let event = tokio::select! {
            () = shutdown.cancelled() => break,
            _ = ticks.tick() => Event::Tick,
            _ = frames.tick() => Event::Render,
            Some(Ok(term_event)) = input.next() => match term_event {
                CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => Event::Key(key),
                CrosstermEvent::Resize(cols, rows) => Event::Resize(cols, rows),
                // Key release/repeat, mouse, focus, paste: not our concern.
                _ => continue,
            },
        };

        if tx.send(event).is_err() {
            break;
        }
    }
}

// ── Input and timing events ──
//
// A spawned pump merges crossterm input with two clocks: `Tick` drives
// toast expiry and spinners, `Render` paces frames. The app drains the
// channel on its own task.

use std::time::Duration;

use crossterm::event::{Event as TermEvent, EventStream, KeyEvent, KeyEventKind};
use futures::StreamExt;
use tokio::sync::mpsc;
use tokio::time::{Interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

#[derive(Debug, PartialEq, Eq)]
pub enum Event {
    Key(KeyEvent),
    Resize(u16, u16),
    Tick,
    Render,
}

/// Keep key presses and resizes; releases, repeats, mouse and focus
/// changes are dropped.
fn translate(event: TermEvent) -> Option<Event> {
    match event {
        TermEvent::Key(key) if key.kind == KeyEventKind::Press => Some(Event::Key(key)),
        TermEvent::Resize(cols, rows) => Some(Event::Resize(cols, rows)),
        _ => None,
    }
}

fn clock(period: Duration) -> Interval {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    interval
}

async fn pump(
    tx: mpsc::UnboundedSender<Event>,
    stop: CancellationToken,
    tick_rate: Duration,
    render_rate: Duration,
) {
    let mut input = EventStream::new();
    let mut ticks = clock(tick_rate);
    let mut frames = clock(render_rate);

    loop {
        let event = tokio::select! {
            () = stop.cancelled() => return,
            _ = ticks.tick() => Event::Tick,
            _ = frames.tick() => Event::Render,
            Some(Ok(raw)) = input.next() => match translate(raw) {
                Some(event) => event,
                None => continue,
            },
        };
        if tx.send(event).is_err() {
            return;
        }
    }
}

/// Receiving end of the pump. Dropping it stops the pump.
pub struct EventReader {
    rx: mpsc::UnboundedReceiver<Event>,
    stop: CancellationToken,
}

impl EventReader {
    pub fn new(tick_rate: Duration, render_rate: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let stop = CancellationToken::new();
        tokio::spawn(pump(tx, stop.clone(), tick_rate, render_rate));
        Self { rx, stop }
    }

    /// `None` once the pump has exited.
    pub async fn next(&mut self) -> Option<Event> {
        self.rx.recv().await
    }

    pub fn stop(&self) {
        self.stop.cancel();
    }
}

impl Drop for EventReader {
    fn drop(&mut self) {
        self.stop();
    }
}

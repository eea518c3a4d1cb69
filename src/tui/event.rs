use crossterm::event::{self, Event as CrosstermEvent, KeyEvent};
use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::Duration,
};
use tokio::task::JoinHandle;
use tracing::{error, warn};

pub enum Event {
    /// Terminal tick
    Tick,
    /// Key press
    Key(KeyEvent),
    /// Terminal resize
    Resize(u16, u16),
}

pub struct EventHandler {
    receiver: tokio::sync::mpsc::Receiver<Event>,
    stop: Arc<AtomicBool>,
    poller: JoinHandle<()>,
}

impl EventHandler {
    pub fn new(tick_rate: Duration) -> Self {
        let (sender, receiver) = tokio::sync::mpsc::channel(100);
        let stop = Arc::new(AtomicBool::new(false));
        let stopped = Arc::clone(&stop);

        // crossterm polling blocks, keep it off the runtime workers
        let poller = tokio::task::spawn_blocking(move || {
            let mut last_tick = std::time::Instant::now();

            while !stopped.load(Ordering::Relaxed) {
                let timeout = tick_rate
                    .checked_sub(last_tick.elapsed())
                    .unwrap_or(Duration::from_secs(0));

                match event::poll(timeout) {
                    // Leave pending input unread once shutdown was requested
                    Ok(true) if stopped.load(Ordering::Relaxed) => break,
                    Ok(true) => {
                        let forwarded = match event::read() {
                            Ok(CrosstermEvent::Key(key)) => sender.blocking_send(Event::Key(key)),
                            Ok(CrosstermEvent::Resize(width, height)) => {
                                sender.blocking_send(Event::Resize(width, height))
                            }
                            Ok(_) => Ok(()),
                            Err(e) => {
                                error!("Failed to read terminal event: {}", e);
                                break;
                            }
                        };
                        if forwarded.is_err() {
                            break;
                        }
                    }
                    Ok(false) => {}
                    Err(e) => {
                        error!("Failed to poll terminal events: {}", e);
                        break;
                    }
                }

                if last_tick.elapsed() >= tick_rate {
                    if sender.blocking_send(Event::Tick).is_err() {
                        break;
                    }
                    last_tick = std::time::Instant::now();
                }
            }
        });

        Self {
            receiver,
            stop,
            poller,
        }
    }

    pub async fn next(&mut self) -> Option<Event> {
        self.receiver.recv().await
    }

    /// Stop the polling thread and wait until it no longer reads input
    pub async fn shutdown(self) {
        self.stop.store(true, Ordering::Relaxed);
        drop(self.receiver);
        if let Err(e) = self.poller.await {
            warn!("Event thread ended abnormally: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_shutdown_waits_for_polling_thread() {
        let handler = EventHandler::new(Duration::from_millis(20));
        let finished = tokio::time::timeout(Duration::from_secs(2), handler.shutdown()).await;
        assert!(finished.is_ok());
    }
}

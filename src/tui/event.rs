use crossterm::event::{KeyEvent, KeyEventKind};
use futures::StreamExt;
use tokio::sync::mpsc;

#[derive(Debug, Clone)]
pub enum Event {
    Key(KeyEvent),
    Resize,
    Tick,
}

pub struct EventHandler {
    rx: mpsc::UnboundedReceiver<Event>,
}

impl EventHandler {
    pub fn new(tick_rate_ms: u64) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();

        tokio::spawn(async move {
            let mut reader = crossterm::event::EventStream::new();
            let mut tick_interval =
                tokio::time::interval(std::time::Duration::from_millis(tick_rate_ms));

            loop {
                let event = tokio::select! {
                    maybe_event = reader.next() => match maybe_event {
                        // Filter for Press only (Windows compatibility)
                        Some(Ok(crossterm::event::Event::Key(key)))
                            if key.kind == KeyEventKind::Press => Event::Key(key),
                        Some(Ok(crossterm::event::Event::Resize(_, _))) => Event::Resize,
                        Some(Ok(_)) => continue,
                        Some(Err(_)) | None => break,
                    },
                    _ = tick_interval.tick() => Event::Tick,
                };
                if tx.send(event).is_err() {
                    break;
                }
            }
        });

        EventHandler { rx }
    }

    /// None once the terminal event stream has ended
    pub async fn next(&mut self) -> Option<Event> {
        self.rx.recv().await
    }
}

use std::future::Future;

use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use super::App;

/// A finished request, ready to be folded into the app state.
pub type Update = Box<dyn FnOnce(&mut App) + Send>;

/// Runs requests on the tokio runtime and queues their results for the UI thread.
pub struct Tasks {
    handle: Handle,
    tx: UnboundedSender<Update>,
    rx: UnboundedReceiver<Update>,
}

impl Tasks {
    pub fn new(handle: Handle) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self { handle, tx, rx }
    }

    /// Runs `future` in the background; `apply` receives its output on the UI thread.
    pub fn spawn<T, F, A>(&self, future: F, apply: A)
    where
        T: Send + 'static,
        F: Future<Output = T> + Send + 'static,
        A: FnOnce(&mut App, T) + Send + 'static,
    {
        let tx = self.tx.clone();
        self.handle.spawn(async move {
            let output = future.await;
            // The receiver only goes away when the app is shutting down.
            let _ = tx.send(Box::new(move |app: &mut App| apply(app, output)));
        });
    }

    /// Everything that finished since the last call.
    pub fn drain(&mut self) -> Vec<Update> {
        let mut updates = Vec::new();
        while let Ok(update) = self.rx.try_recv() {
            updates.push(update);
        }
        updates
    }

    pub async fn next(&mut self) -> Option<Update> {
        self.rx.recv().await
    }
}

use std::{
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use tokio::task::JoinHandle;

use crate::page::Page;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum NoticeKind {
    Success,
    Error,
}

impl NoticeKind {
    const fn index(self) -> usize {
        match self {
            Self::Success => 0,
            Self::Error => 1,
        }
    }
}

#[derive(Default)]
struct Channel {
    generation: u64,
    timer: Option<JoinHandle<()>>,
}

/// Timed success and error banners.
///
/// Each channel keeps a single pending hide timer. Showing a notice again
/// replaces the text and restarts that channel's timer.
pub struct Notices<P> {
    page: Arc<P>,
    duration: Duration,
    channels: Arc<Mutex<[Channel; 2]>>,
}

impl<P: Page> Notices<P> {
    pub const DEFAULT_DURATION: Duration = Duration::from_millis(5000);

    pub fn new(page: Arc<P>, duration: Duration) -> Self {
        Self {
            page,
            duration,
            channels: Arc::default(),
        }
    }

    pub fn show_success(&self, text: &str) {
        tracing::info!("{text}");
        self.show(NoticeKind::Success, text)
    }

    pub fn show_error(&self, text: &str) {
        tracing::warn!("{text}");
        self.show(NoticeKind::Error, text)
    }

    pub fn show(&self, kind: NoticeKind, text: &str) {
        let mut channels = Self::lock(&self.channels);
        let channel = &mut channels[kind.index()];
        if let Some(timer) = channel.timer.take() {
            timer.abort();
        }

        channel.generation += 1;
        let generation = channel.generation;
        self.page.set_notice(kind, Some(text));

        let page = Arc::clone(&self.page);
        let shared = Arc::clone(&self.channels);
        let duration = self.duration;

        // the lock is held until the handle is stored
        channel.timer = Some(tokio::spawn(async move {
            tokio::time::sleep(duration).await;
            let mut channels = Self::lock(&shared);
            let channel = &mut channels[kind.index()];
            if channel.generation == generation {
                page.set_notice(kind, None);
                channel.timer = None;
            }
        }));
    }

    fn lock(channels: &Mutex<[Channel; 2]>) -> MutexGuard<'_, [Channel; 2]> {
        channels.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

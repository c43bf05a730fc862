use std::{
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
    time::Duration,
};

use tokio::{
    sync::{
        mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender},
        oneshot,
    },
    task::JoinHandle,
    time::MissedTickBehavior,
};

use crate::{api, format::Zone, page::Page, render::render_list};

/// Keeps the list container in sync with the API.
///
/// A single task owns the loop, so at most one fetch is in flight and every
/// render comes from the newest completed response. Dropping the poller
/// stops the loop.
pub struct Poller {
    refresh: UnboundedSender<()>,
    stop: Option<oneshot::Sender<()>>,
    renders: Arc<AtomicU64>,
    task: Option<JoinHandle<()>>,
}

impl Poller {
    pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(5000);

    pub fn spawn<P: Page>(
        client: api::Client,
        page: Arc<P>,
        zone: Zone,
        interval: Duration,
    ) -> Self {
        let (refresh, refresh_rx) = unbounded_channel();
        let (stop, stop_rx) = oneshot::channel();
        let renders = Arc::<AtomicU64>::default();

        let task = tokio::spawn(Self::run(
            client,
            page,
            zone,
            interval,
            refresh_rx,
            stop_rx,
            Arc::clone(&renders),
        ));

        Self {
            refresh,
            stop: Some(stop),
            renders,
            task: Some(task),
        }
    }

    /// Requests an extra cycle outside of the timer.
    pub fn refresh(&self) {
        let _ = self.refresh.send(());
    }

    /// How many times the list has been rendered.
    pub fn renders(&self) -> u64 {
        self.renders.load(Ordering::Acquire)
    }

    pub fn stop(&mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
    }

    pub async fn join(mut self) {
        self.stop();
        if let Some(task) = self.task.take() {
            if let Err(err) = task.await {
                tracing::error!("poller task failed: {err}");
            }
        }
    }

    async fn run<P: Page>(
        client: api::Client,
        page: Arc<P>,
        zone: Zone,
        interval: Duration,
        mut refresh: UnboundedReceiver<()>,
        mut stop: oneshot::Receiver<()>,
        renders: Arc<AtomicU64>,
    ) {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        tracing::info!(url = %client.base(), ?interval, "polling notifications");

        loop {
            // the first tick completes immediately
            tokio::select! {
                biased;
                _ = &mut stop => break,
                _ = ticker.tick() => {}
                Some(()) = refresh.recv() => {
                    // requests that piled up during the last cycle collapse into this one
                    while refresh.try_recv().is_ok() {}
                }
            }

            tokio::select! {
                biased;
                _ = &mut stop => break,
                _ = Self::cycle(&client, &*page, zone, &renders) => {}
            }
        }

        tracing::info!("stopped polling notifications");
    }

    async fn cycle(client: &api::Client, page: &impl Page, zone: Zone, renders: &AtomicU64) {
        let records = match client.list().await {
            Ok(records) => records,
            Err(err) => {
                tracing::warn!("failed to load notifications: {err}");
                return;
            }
        };

        page.set_list(render_list(Some(records.as_slice()), &zone));
        let render = renders.fetch_add(1, Ordering::AcqRel) + 1;
        tracing::debug!(count = records.len(), render, "rendered notifications");
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        self.stop();
    }
}

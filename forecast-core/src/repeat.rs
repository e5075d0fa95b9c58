//! Press-and-hold map controls.
//!
//! Holding a control performs its step once immediately and then every
//! [`REPEAT_INTERVAL`] until released. The repeating timer is owned by a
//! [`RepeatHandle`]; dropping the handle stops it, so neither a new press
//! nor tearing down the pad can leave an orphaned timer behind.

use parking_lot::Mutex;
use std::{sync::Arc, time::Duration};
use tokio::{
    task::JoinHandle,
    time::{Instant, MissedTickBehavior},
};
use tracing::trace;

use crate::map::{Control, MapView};

pub const REPEAT_INTERVAL: Duration = Duration::from_millis(100);

pub type SharedMap = Arc<Mutex<MapView>>;

/// A running repeat task. Cancelled on drop.
#[derive(Debug)]
pub struct RepeatHandle {
    task: JoinHandle<()>,
}

impl RepeatHandle {
    /// Runs `action` every `period`, starting one period from now.
    pub fn spawn<F>(period: Duration, mut action: F) -> Self
    where
        F: FnMut() + Send + 'static,
    {
        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                action();
            }
        });

        Self { task }
    }

    pub fn cancel(self) {
        // Drop does the work.
    }
}

impl Drop for RepeatHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// The zoom and pan buttons. At most one control is active at a time.
#[derive(Debug)]
pub struct ControlPad {
    map: SharedMap,
    interval: Duration,
    active: Option<(Control, RepeatHandle)>,
}

impl ControlPad {
    pub fn new(map: SharedMap) -> Self {
        Self::with_interval(map, REPEAT_INTERVAL)
    }

    pub fn with_interval(map: SharedMap, interval: Duration) -> Self {
        Self {
            map,
            interval,
            active: None,
        }
    }

    pub fn map(&self) -> &SharedMap {
        &self.map
    }

    pub fn active(&self) -> Option<Control> {
        self.active.as_ref().map(|(control, _)| *control)
    }

    /// Must be called from within a tokio runtime.
    pub fn press(&mut self, control: Control) {
        self.release();
        trace!(%control, "control pressed");

        self.map.lock().apply(control);

        let map = Arc::clone(&self.map);
        let handle = RepeatHandle::spawn(self.interval, move || map.lock().apply(control));
        self.active = Some((control, handle));
    }

    /// Also used when the pointer leaves the control.
    pub fn release(&mut self) {
        if let Some((control, handle)) = self.active.take() {
            trace!(%control, "control released");
            handle.cancel();
        }
    }

    /// Press, keep holding for `duration`, then release.
    pub async fn hold(&mut self, control: Control, duration: Duration) {
        self.press(control);
        tokio::time::sleep(duration).await;
        self.release();
    }
}

impl Drop for ControlPad {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::Pan;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn pad() -> ControlPad {
        ControlPad::new(Arc::new(Mutex::new(MapView::default())))
    }

    #[tokio::test(start_paused = true)]
    async fn press_steps_immediately() {
        let mut pad = pad();
        pad.press(Control::ZoomIn);

        assert_eq!(pad.map().lock().zoom(), 1.1);
        assert_eq!(pad.active(), Some(Control::ZoomIn));
        pad.release();
    }

    #[tokio::test(start_paused = true)]
    async fn holding_repeats_every_interval() {
        let mut pad = pad();
        pad.hold(Control::ZoomIn, Duration::from_millis(350)).await;

        // Immediate step plus ticks at 100, 200 and 300 ms.
        assert!((pad.map().lock().zoom() - 1.4).abs() < 1e-9);
        assert_eq!(pad.active(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn release_stops_repeating() {
        let mut pad = pad();
        pad.hold(Control::PanRight, Duration::from_millis(150)).await;
        let after_release = pad.map().lock().pan();

        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(pad.map().lock().pan(), after_release);
        assert_eq!(after_release, Pan { x: 55.0, y: 50.0 });
    }

    #[tokio::test(start_paused = true)]
    async fn new_press_replaces_previous_action() {
        let mut pad = pad();
        pad.press(Control::PanUp);
        pad.press(Control::PanLeft);
        assert_eq!(pad.active(), Some(Control::PanLeft));

        tokio::time::sleep(Duration::from_millis(250)).await;
        pad.release();

        let pan = pad.map().lock().pan();
        assert_eq!(pan.y, 47.5);
        assert_eq!(pan.x, 50.0 - 3.0 * 2.5);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_pad_cancels_the_timer() {
        let map: SharedMap = Arc::new(Mutex::new(MapView::default()));
        {
            let mut pad = ControlPad::new(Arc::clone(&map));
            pad.press(Control::ZoomIn);
        }

        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(map.lock().zoom(), 1.1);
    }

    #[tokio::test(start_paused = true)]
    async fn dropped_handle_stops_ticking() {
        let ticks = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&ticks);
        let handle = RepeatHandle::spawn(Duration::from_millis(10), move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        tokio::time::sleep(Duration::from_millis(35)).await;
        drop(handle);
        let seen = ticks.load(Ordering::SeqCst);
        assert_eq!(seen, 3);

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(ticks.load(Ordering::SeqCst), seen);
    }
}

//! Static rendering: run the interactive document in a headless DOM, wait
//! for the viewer to draw the diff, then strip every script and keep the
//! resulting markup.

mod chrome;

pub use chrome::ChromeDom;

use crate::error::Result;
use crate::html::DIFF_CONTAINER_ID;
use log::{debug, warn};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::{Duration, Instant};

/// What the static renderer needs from a headless document environment.
/// Any engine that can run the viewer and hand back markup fits here.
pub trait HeadlessDom {
    type Page;

    /// Start loading `html` with scripts enabled
    fn load(&self, html: &str) -> Result<Self::Page>;

    /// Wait until `selector` matches an element with children. `Ok(false)`
    /// means the timeout elapsed first.
    fn wait_for_selector_non_empty(
        &self,
        page: &Self::Page,
        selector: &str,
        timeout: Duration,
    ) -> Result<bool>;

    /// Remove every script element. A page without scripts is left as is.
    fn strip_scripts(&self, page: &Self::Page) -> Result<()>;

    /// Current markup of the whole document
    fn serialize(&self, page: &Self::Page) -> Result<String>;
}

pub struct StaticRenderer<D> {
    dom: D,
    timeout: Duration,
}

impl<D: HeadlessDom> StaticRenderer<D> {
    pub fn new(dom: D, timeout: Duration) -> Self {
        Self { dom, timeout }
    }

    /// Turn an interactive document into a script-free one.
    ///
    /// The wait is bounded: when the viewer has not drawn anything by the
    /// deadline the page is captured as it stands and only a warning is
    /// logged.
    pub fn render(&self, interactive_html: &str) -> Result<String> {
        let page = self.dom.load(interactive_html)?;
        let selector = format!("#{}", DIFF_CONTAINER_ID);

        let started = Instant::now();
        if self
            .dom
            .wait_for_selector_non_empty(&page, &selector, self.timeout)?
        {
            debug!("Diff rendered after {:?}", started.elapsed());
        } else {
            warn!(
                "Diff viewer did not finish within {:?}; the static document may be incomplete",
                self.timeout
            );
        }

        self.dom.strip_scripts(&page)?;
        let html = self.dom.serialize(&page)?;
        Ok(html.trim().to_string())
    }
}

/// Delays used while racing the load event against polling
#[derive(Debug, Clone, Copy)]
pub struct WaitTiming {
    /// Pause after the load event before probing
    pub settle: Duration,
    /// Pause before the first poll
    pub poll_delay: Duration,
    pub poll_interval: Duration,
}

impl Default for WaitTiming {
    fn default() -> Self {
        Self {
            settle: Duration::from_millis(100),
            poll_delay: Duration::from_millis(50),
            poll_interval: Duration::from_millis(50),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Waiter {
    Load,
    Poll,
}

/// Race two waiters for "rendered": one that blocks on `wait_loaded`,
/// settles and probes once, and one that polls `probe` until the deadline.
/// Returns as soon as either sees content, or `false` at the deadline.
///
/// Waiters run on detached threads; the loser is not cancelled and simply
/// stops on its own.
pub fn race_render<L, P>(wait_loaded: L, probe: P, timeout: Duration, timing: WaitTiming) -> bool
where
    L: FnOnce() -> bool + Send + 'static,
    P: Fn() -> bool + Send + Sync + 'static,
{
    let deadline = Instant::now() + timeout;
    let probe = Arc::new(probe);
    let done = Arc::new(AtomicBool::new(false));
    let (tx, rx) = mpsc::channel();

    {
        let tx = tx.clone();
        let probe = Arc::clone(&probe);
        thread::spawn(move || {
            if wait_loaded() {
                thread::sleep(timing.settle);
                if probe() {
                    let _ = tx.send(Waiter::Load);
                }
            }
        });
    }

    {
        let done = Arc::clone(&done);
        thread::spawn(move || {
            thread::sleep(timing.poll_delay);
            while !done.load(Ordering::Relaxed) && Instant::now() < deadline {
                if probe() {
                    let _ = tx.send(Waiter::Poll);
                    return;
                }
                thread::sleep(timing.poll_interval);
            }
        });
    }

    let outcome = rx.recv_timeout(deadline.saturating_duration_since(Instant::now()));
    done.store(true, Ordering::Relaxed);
    match outcome {
        Ok(waiter) => {
            debug!("Render detected by {:?} waiter", waiter);
            true
        }
        // Timed out, or both waiters gave up early.
        Err(_) => false,
    }
}

//! Document-level listeners and cycle scheduling.
//!
//! One capture-phase `drop` listener and one capture-phase `paste` listener
//! are installed on the document for the lifetime of the page. They are held
//! in a thread-local and never removed.

use std::cell::RefCell;
use std::rc::Rc;

use gloo_events::{EventListener, EventListenerOptions, EventListenerPhase};
use transpaste_core::{
    Cycle, CycleQueue, Interception, Interceptor, InterceptorConfig, cycle_queue,
};

use crate::canvas::CanvasCodec;
use crate::dispatch::BrowserPlatform;
use crate::dom::BrowserDom;
use crate::events::capture;

/// Interceptor wired to the live document.
pub type BrowserInterceptor = Interceptor<BrowserPlatform, CanvasCodec>;

/// Runs the asynchronous half of intercepted cycles.
#[derive(Clone)]
pub struct Scheduler {
    interceptor: Rc<BrowserInterceptor>,
    queue: Option<Rc<CycleQueue<BrowserDom>>>,
}

impl Scheduler {
    /// Create a scheduler. With `serialize_cycles`, spawns the queue worker.
    pub fn new(interceptor: Rc<BrowserInterceptor>) -> Self {
        let queue = interceptor.config().serialize_cycles.then(|| {
            let (queue, worker) = cycle_queue();
            let owner = interceptor.clone();
            wasm_bindgen_futures::spawn_local(async move {
                worker.drain(&*owner).await;
            });
            Rc::new(queue)
        });
        Self { interceptor, queue }
    }

    pub fn interceptor(&self) -> &BrowserInterceptor {
        &self.interceptor
    }

    /// Handle one raw event. Must be called from inside the event listener.
    pub fn handle(&self, event: &web_sys::Event) {
        let Some(input) = capture(event) else {
            tracing::warn!(event_type = %event.type_(), "listener received a non-insertion event");
            return;
        };
        match self.interceptor.intercept(input) {
            Ok(Interception::Intercepted(cycle)) => self.schedule(cycle),
            Ok(Interception::Ignored(reason)) => {
                tracing::trace!(?reason, "left to the host");
            }
            // Already logged by the interceptor.
            Err(_) => {}
        }
    }

    fn schedule(&self, cycle: Cycle<BrowserDom>) {
        match &self.queue {
            Some(queue) => {
                if let Err(err) = queue.submit(cycle) {
                    tracing::warn!(error = %err, "could not queue interception");
                }
            }
            None => {
                let interceptor = self.interceptor.clone();
                wasm_bindgen_futures::spawn_local(async move {
                    let _ = interceptor.run(cycle).await;
                });
            }
        }
    }
}

struct Installed {
    _listeners: [EventListener; 2],
}

thread_local! {
    static INSTALLED: RefCell<Option<Installed>> = const { RefCell::new(None) };
}

/// Install the page-lifetime listeners on the current document.
///
/// Returns `false` (and does nothing) if they are already installed.
pub fn install(config: InterceptorConfig) -> bool {
    INSTALLED.with(|slot| {
        if slot.borrow().is_some() {
            tracing::debug!("interceptor already installed");
            return false;
        }

        let document = gloo_utils::document();
        let interceptor = Rc::new(Interceptor::new(
            BrowserPlatform::new(document.clone()),
            CanvasCodec::new(document.clone()),
            config,
        ));
        let scheduler = Scheduler::new(interceptor);

        let options = EventListenerOptions {
            phase: EventListenerPhase::Capture,
            passive: false,
        };
        let listeners = ["drop", "paste"].map(|event_type| {
            let scheduler = scheduler.clone();
            EventListener::new_with_options(&document, event_type, options, move |event| {
                scheduler.handle(event)
            })
        });

        slot.replace(Some(Installed {
            _listeners: listeners,
        }));
        tracing::info!("image insertion interceptor installed");
        true
    })
}

/// Whether the listeners are installed in this page.
pub fn is_installed() -> bool {
    INSTALLED.with(|slot| slot.borrow().is_some())
}

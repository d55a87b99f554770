//! Single-threaded task runner. Futures run on the UI thread and their
//! outputs queue up until the next frame drains them.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::future::Future;
use std::rc::Rc;

pub struct TaskQueue<T> {
    inbox: Rc<RefCell<VecDeque<T>>>,
    repaint: Option<egui::Context>,
}

impl<T> Default for TaskQueue<T> {
    fn default() -> Self {
        Self {
            inbox: Rc::default(),
            repaint: None,
        }
    }
}

impl<T: 'static> TaskQueue<T> {
    /// Context to wake when a task completes, so the next frame drains it.
    pub fn attach(&mut self, ctx: &egui::Context) {
        if self.repaint.is_none() {
            self.repaint = Some(ctx.clone());
        }
    }

    /// Run `future` to completion. On native it finishes before this returns;
    /// on the web it completes on a later turn of the event loop.
    pub fn spawn(&self, future: impl Future<Output = T> + 'static) {
        let inbox = Rc::clone(&self.inbox);

        #[cfg(not(target_arch = "wasm32"))]
        {
            let output = pollster::block_on(future);
            inbox.borrow_mut().push_back(output);
            if let Some(ctx) = &self.repaint {
                ctx.request_repaint();
            }
        }

        #[cfg(target_arch = "wasm32")]
        {
            let repaint = self.repaint.clone();
            wasm_bindgen_futures::spawn_local(async move {
                let output = future.await;
                inbox.borrow_mut().push_back(output);
                if let Some(ctx) = repaint {
                    ctx.request_repaint();
                }
            });
        }
    }

    /// Take every completed output, oldest first.
    pub fn drain(&self) -> Vec<T> {
        self.inbox.borrow_mut().drain(..).collect()
    }
}

use crossbeam::channel::{bounded, Receiver, RecvTimeoutError, Sender};
use std::thread::JoinHandle;
use std::time::Duration;
use tracing::trace;

/// A periodic background task owned by its handle.
///
/// The thread runs `f` once immediately and then every `interval` until the
/// handle is stopped or dropped. There is no process-wide stop flag: the
/// lifetime of the poller is the lifetime of the handle.
#[derive(Debug)]
pub struct BackgroundPoller {
    stop: Sender<()>,
    thread: Option<JoinHandle<()>>,
}

impl BackgroundPoller {
    pub fn spawn<F>(interval: Duration, mut f: F) -> Self
    where
        F: FnMut() + Send + 'static,
    {
        let (stop, stopped) = bounded::<()>(1);
        let thread = std::thread::spawn(move || poll_loop(interval, &stopped, &mut f));

        Self {
            stop,
            thread: Some(thread),
        }
    }

    /// Signals the thread and waits for the in-flight tick to finish.
    /// Stopping does not wait out the remainder of the interval.
    pub fn stop(mut self) {
        self.stop.send(()).ok();
        self.join();
    }

    fn join(&mut self) {
        if let Some(thread) = self.thread.take() {
            thread.join().ok();
        }
    }
}

impl Drop for BackgroundPoller {
    fn drop(&mut self) {
        if self.thread.is_some() {
            self.stop.send(()).ok();
            self.join();
        }
    }
}

/// The interval sleep doubles as the stop wait, so a stop request interrupts
/// the sleep instead of waiting it out.
fn poll_loop<F>(interval: Duration, stopped: &Receiver<()>, f: &mut F)
where
    F: FnMut(),
{
    loop {
        f();
        match stopped.recv_timeout(interval) {
            Ok(()) | Err(RecvTimeoutError::Disconnected) => {
                trace!("background poller stopping");
                return;
            }
            Err(RecvTimeoutError::Timeout) => {}
        }
    }
}

// src/gui/task.rs
//
// Backend calls never run on the UI thread. A page starts a job, keeps the
// `Pending` handle, and polls it once per frame. Dropping the handle (page left)
// means the worker's result goes nowhere.

use std::{
    sync::mpsc::{self, Receiver, TryRecvError},
    thread,
};

use eframe::egui;

#[derive(Clone)]
pub enum Exec {
    /// Run the job right away on the caller's thread (tests, CLI).
    Inline,
    /// One worker thread per job; repaint the UI when it finishes.
    Threaded(Option<egui::Context>),
}

impl Exec {
    pub fn threaded(ctx: &egui::Context) -> Self {
        Exec::Threaded(Some(ctx.clone()))
    }

    pub fn run<T, F>(&self, label: &'static str, job: F) -> Pending<T>
    where
        T: Send + 'static,
        F: FnOnce() -> T + Send + 'static,
    {
        let (tx, rx) = mpsc::channel();

        match self {
            Exec::Inline => {
                let _ = tx.send(job());
            }
            Exec::Threaded(repaint) => {
                let repaint = repaint.clone();
                let spawned = thread::Builder::new()
                    .name(format!("api-{label}"))
                    .spawn(move || {
                        let out = job();
                        if tx.send(out).is_err() {
                            logd!("Task: {label} finished after its page was left; result dropped");
                            return;
                        }
                        if let Some(ctx) = repaint {
                            ctx.request_repaint();
                        }
                    });
                if let Err(e) = spawned {
                    loge!("Task: could not start {label}: {e}");
                }
            }
        }

        Pending { rx }
    }
}

pub enum TaskState<T> {
    Running,
    Ready(T),
    /// Worker died or never started.
    Lost,
}

pub struct Pending<T> {
    rx: Receiver<T>,
}

impl<T> Pending<T> {
    pub fn poll(&self) -> TaskState<T> {
        match self.rx.try_recv() {
            Ok(v) => TaskState::Ready(v),
            Err(TryRecvError::Empty) => TaskState::Running,
            Err(TryRecvError::Disconnected) => TaskState::Lost,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    #[test]
    fn inline_is_ready_immediately() {
        let p = Exec::Inline.run("t", || 41 + 1);
        assert!(matches!(p.poll(), TaskState::Ready(42)));
    }

    #[test]
    fn threaded_eventually_ready() {
        let p = Exec::Threaded(None).run("t", || "done");
        let deadline = Instant::now() + Duration::from_secs(5);
        loop {
            match p.poll() {
                TaskState::Ready(v) => {
                    assert_eq!(v, "done");
                    break;
                }
                TaskState::Running if Instant::now() < deadline => thread::sleep(Duration::from_millis(5)),
                _ => panic!("worker did not report back"),
            }
        }
    }

    #[test]
    fn panicking_worker_is_lost() {
        let p: Pending<u8> = Exec::Threaded(None).run("boom", || panic!("boom"));
        let deadline = Instant::now() + Duration::from_secs(5);
        while Instant::now() < deadline {
            if matches!(p.poll(), TaskState::Lost) {
                return;
            }
            thread::sleep(Duration::from_millis(5));
        }
        panic!("expected Lost");
    }
}

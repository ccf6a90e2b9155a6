// Fire-and-forget scheduling for the page effects. `WindowTimers` goes through
// setTimeout/setInterval, `ManualClock` runs the same tasks against a virtual clock.

use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::Window;

pub trait Timers {
    fn after(&self, delay_ms: u32, task: Box<dyn FnOnce()>);
    fn every(&self, period_ms: u32, task: Box<dyn FnMut()>);
}

#[derive(Clone)]
pub struct WindowTimers {
    window: Window,
}

impl WindowTimers {
    pub fn new(window: Window) -> Self {
        WindowTimers { window }
    }
}

impl Timers for WindowTimers {
    fn after(&self, delay_ms: u32, task: Box<dyn FnOnce()>) {
        let callback = Closure::once_into_js(move || task());
        if let Err(err) = self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(callback.unchecked_ref(), delay_ms as i32)
        {
            log::error!("setTimeout failed: {:?}", err);
        }
    }

    fn every(&self, period_ms: u32, task: Box<dyn FnMut()>) {
        let callback = Closure::wrap(task);
        match self.window.set_interval_with_callback_and_timeout_and_arguments_0(
            callback.as_ref().unchecked_ref(),
            period_ms as i32,
        ) {
            // Intervals run for the lifetime of the page
            Ok(_) => callback.forget(),
            Err(err) => log::error!("setInterval failed: {:?}", err),
        }
    }
}

enum Task {
    Once(Box<dyn FnOnce()>),
    Every(u32, Box<dyn FnMut()>),
}

struct Pending {
    due: u64,
    seq: u64,
    task: Task,
}

#[derive(Default)]
struct ClockState {
    now: u64,
    next_seq: u64,
    pending: Vec<Pending>,
}

impl ClockState {
    fn push(&mut self, due: u64, task: Task) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.pending.push(Pending { due, seq, task });
    }

    // Earliest due task no later than `until`, ties broken by scheduling order
    fn pop_due(&mut self, until: u64) -> Option<Pending> {
        let idx = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, p)| p.due <= until)
            .min_by_key(|(_, p)| (p.due, p.seq))
            .map(|(i, _)| i)?;
        Some(self.pending.swap_remove(idx))
    }
}

/// Virtual clock for driving timed effects deterministically. Clones share one timeline.
#[derive(Clone, Default)]
pub struct ManualClock {
    state: Rc<RefCell<ClockState>>,
}

impl ManualClock {
    pub fn new() -> Self {
        ManualClock::default()
    }

    pub fn now(&self) -> u64 {
        self.state.borrow().now
    }

    pub fn pending(&self) -> usize {
        self.state.borrow().pending.len()
    }

    /// Moves time forward by `ms`, running every task that falls due on the way.
    pub fn advance(&self, ms: u64) {
        let until = self.now() + ms;
        loop {
            // The borrow must end before the task runs, tasks schedule more tasks
            let next = self.state.borrow_mut().pop_due(until);
            let Pending { due, task, .. } = match next {
                Some(pending) => pending,
                None => break,
            };
            self.state.borrow_mut().now = due;
            match task {
                Task::Once(task) => task(),
                Task::Every(period, mut task) => {
                    task();
                    let period = period.max(1);
                    self.state.borrow_mut().push(due + u64::from(period), Task::Every(period, task));
                }
            }
        }
        self.state.borrow_mut().now = until;
    }
}

impl Timers for ManualClock {
    fn after(&self, delay_ms: u32, task: Box<dyn FnOnce()>) {
        let mut state = self.state.borrow_mut();
        let due = state.now + u64::from(delay_ms);
        state.push(due, Task::Once(task));
    }

    fn every(&self, period_ms: u32, task: Box<dyn FnMut()>) {
        let mut state = self.state.borrow_mut();
        let due = state.now + u64::from(period_ms.max(1));
        state.push(due, Task::Every(period_ms, task));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recorder() -> (Rc<RefCell<Vec<String>>>, impl Fn(&str) -> Box<dyn FnOnce()>) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = log.clone();
        let make = move |name: &str| {
            let sink = sink.clone();
            let name = name.to_owned();
            Box::new(move || sink.borrow_mut().push(name)) as Box<dyn FnOnce()>
        };
        (log, make)
    }

    #[test]
    fn runs_in_due_order_then_scheduling_order() {
        let clock = ManualClock::new();
        let (log, task) = recorder();
        clock.after(300, task("slash"));
        clock.after(10, task("sweep"));
        clock.after(300, task("second"));
        clock.advance(299);
        assert_eq!(*log.borrow(), vec!["sweep"]);
        clock.advance(1);
        assert_eq!(*log.borrow(), vec!["sweep", "slash", "second"]);
        assert_eq!(clock.now(), 300);
        assert_eq!(clock.pending(), 0);
    }

    #[test]
    fn nested_tasks_fire_within_the_same_advance() {
        let clock = ManualClock::new();
        let (log, task) = recorder();
        let inner = clock.clone();
        let later = task("inner");
        let first = task("outer");
        clock.after(
            100,
            Box::new(move || {
                first();
                inner.after(50, later);
            }),
        );
        clock.advance(200);
        assert_eq!(*log.borrow(), vec!["outer", "inner"]);
    }

    #[test]
    fn intervals_rearm() {
        let clock = ManualClock::new();
        let count = Rc::new(RefCell::new(0));
        let counter = count.clone();
        clock.every(5000, Box::new(move || *counter.borrow_mut() += 1));
        clock.advance(4999);
        assert_eq!(*count.borrow(), 0);
        clock.advance(15_001);
        assert_eq!(*count.borrow(), 4);
        assert_eq!(clock.pending(), 1);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskHandle(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cadence {
    Once,
    Every(u64),
}

#[derive(Debug, Clone)]
struct Task<T> {
    handle: TaskHandle,
    deadline_ms: u64,
    cadence: Cadence,
    payload: T,
}

/// Tick-driven timer service. Time only moves when `advance` is
/// called, so everything stays deterministic under a fixed step.
#[derive(Debug)]
pub struct Scheduler<T> {
    now_ms: u64,
    next_handle: u64,
    tasks: Vec<Task<T>>,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self {
            now_ms: 0,
            next_handle: 0,
            tasks: Vec::new(),
        }
    }

    pub fn after(&mut self, delay_ms: u64, payload: T) -> TaskHandle {
        let deadline_ms = self.now_ms.saturating_add(delay_ms);
        self.push_task(deadline_ms, Cadence::Once, payload)
    }

    pub fn every(&mut self, interval_ms: u64, payload: T) -> TaskHandle {
        let interval_ms = interval_ms.max(1);
        let deadline_ms = self.now_ms.saturating_add(interval_ms);
        self.push_task(deadline_ms, Cadence::Every(interval_ms), payload)
    }

    pub fn cancel(&mut self, handle: TaskHandle) {
        self.tasks.retain(|task| task.handle != handle);
    }

    pub fn cancel_all(&mut self) {
        self.tasks.clear();
    }

    pub fn is_scheduled(&self, handle: TaskHandle) -> bool {
        self.tasks.iter().any(|task| task.handle == handle)
    }

    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    fn push_task(&mut self, deadline_ms: u64, cadence: Cadence, payload: T) -> TaskHandle {
        let handle = TaskHandle(self.next_handle);
        self.next_handle = self.next_handle.saturating_add(1);
        self.tasks.push(Task {
            handle,
            deadline_ms,
            cadence,
            payload,
        });
        handle
    }
}

impl<T: Clone> Scheduler<T> {
    /// Advances time and returns every payload whose deadline has
    /// elapsed, ordered by (deadline, registration). A repeating task
    /// fires once per elapsed interval, so a large `dt_ms` catches up.
    pub fn advance(&mut self, dt_ms: u64) -> Vec<T> {
        self.now_ms = self.now_ms.saturating_add(dt_ms);
        let mut fired = Vec::new();

        loop {
            let due = self
                .tasks
                .iter()
                .enumerate()
                .filter(|(_, task)| task.deadline_ms <= self.now_ms)
                .min_by_key(|(_, task)| (task.deadline_ms, task.handle.0))
                .map(|(index, _)| index);

            let Some(index) = due else {
                break;
            };

            fired.push(self.tasks[index].payload.clone());
            match self.tasks[index].cadence {
                Cadence::Once => {
                    self.tasks.remove(index);
                }
                Cadence::Every(interval_ms) => {
                    let task = &mut self.tasks[index];
                    task.deadline_ms = task.deadline_ms.saturating_add(interval_ms);
                }
            }
        }

        fired
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_shot_fires_on_the_tick_its_deadline_elapses() {
        let mut scheduler = Scheduler::new();
        scheduler.after(100, "done");

        assert!(scheduler.advance(99).is_empty());
        assert_eq!(scheduler.advance(1), vec!["done"]);
        assert!(scheduler.advance(1000).is_empty());
    }

    #[test]
    fn zero_delay_fires_on_the_same_tick() {
        let mut scheduler = Scheduler::new();
        scheduler.after(0, "now");
        assert_eq!(scheduler.advance(0), vec!["now"]);
    }

    #[test]
    fn cancel_is_idempotent_and_ignores_expired_handles() {
        let mut scheduler = Scheduler::new();
        let handle = scheduler.after(50, "never");
        scheduler.cancel(handle);
        scheduler.cancel(handle);
        assert!(scheduler.advance(100).is_empty());

        let fired = scheduler.after(10, "once");
        assert_eq!(scheduler.advance(10), vec!["once"]);
        scheduler.cancel(fired);
        assert_eq!(scheduler.task_count(), 0);
    }

    #[test]
    fn repeating_task_fires_every_interval() {
        let mut scheduler = Scheduler::new();
        scheduler.every(50, "tick");

        assert!(scheduler.advance(49).is_empty());
        assert_eq!(scheduler.advance(1), vec!["tick"]);
        assert_eq!(scheduler.advance(50), vec!["tick"]);
    }

    #[test]
    fn repeating_task_catches_up_within_one_advance() {
        let mut scheduler = Scheduler::new();
        scheduler.every(10, "t");
        assert_eq!(scheduler.advance(35), vec!["t", "t", "t"]);
    }

    #[test]
    fn due_tasks_fire_in_deadline_then_registration_order() {
        let mut scheduler = Scheduler::new();
        scheduler.after(30, "late");
        scheduler.after(10, "early_a");
        scheduler.after(10, "early_b");

        assert_eq!(scheduler.advance(30), vec!["early_a", "early_b", "late"]);
    }

    #[test]
    fn handles_are_never_reused() {
        let mut scheduler = Scheduler::new();
        let first = scheduler.after(1, ());
        scheduler.cancel(first);
        let second = scheduler.after(1, ());
        assert_ne!(first, second);
    }

    #[test]
    fn cancelled_repeating_task_stops_firing() {
        let mut scheduler = Scheduler::new();
        let handle = scheduler.every(10, "t");
        assert_eq!(scheduler.advance(10).len(), 1);
        scheduler.cancel(handle);
        assert!(!scheduler.is_scheduled(handle));
        assert!(scheduler.advance(100).is_empty());
    }
}

//! Cooperative, non-preemptive periodic task scheduler.
//!
//! Provides [`Scheduler`], a fixed-capacity table of periodic [`Task`]s. Tasks
//! are registered once and never removed; only their enabled flag changes.
//! Each [`Scheduler::tick`] snapshots which enabled tasks are due, stamps them,
//! and hands their jobs back in registration order for the caller to run. An
//! enable or disable issued while those jobs run therefore lands on the next
//! tick boundary, never mid-tick.

use crate::time::{self, TimeDuration, TimeInstant};
use heapless::Vec;

/// Identifier of a registered task, in registration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TaskId(pub usize);

impl From<usize> for TaskId {
    fn from(id: usize) -> Self {
        TaskId(id)
    }
}

impl From<TaskId> for usize {
    fn from(id: TaskId) -> Self {
        id.0
    }
}

/// How many times a task runs once enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Iterations {
    /// Run this many times, then disable.
    Finite(u32),

    /// Run every period until disabled.
    Infinite,
}

impl Default for Iterations {
    fn default() -> Self {
        Iterations::Infinite
    }
}

/// Errors that can occur during scheduler operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SchedulerError {
    /// The task table is full.
    CapacityExceeded,

    /// No task is registered under this id.
    InvalidTaskId(TaskId),
}

impl core::fmt::Display for SchedulerError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            SchedulerError::CapacityExceeded => {
                write!(f, "task table is full, cannot register more tasks")
            }
            SchedulerError::InvalidTaskId(id) => {
                write!(f, "task ID {} is not registered", id.0)
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for SchedulerError {}

/// A periodic unit of work.
pub struct Task<J, I: TimeInstant> {
    job: J,
    period: I::Duration,
    iterations: Iterations,
    runs: u32,
    enabled: bool,
    last_run: Option<I>,
}

impl<J: Copy, I: TimeInstant> Task<J, I> {
    /// The job handed back when this task is due.
    pub fn job(&self) -> J {
        self.job
    }

    pub fn period(&self) -> I::Duration {
        self.period
    }

    pub fn iterations(&self) -> Iterations {
        self.iterations
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Runs since the task was last enabled.
    pub fn runs(&self) -> u32 {
        self.runs
    }

    /// When the task last ran, `None` if it has not run since being enabled.
    pub fn last_run(&self) -> Option<I> {
        self.last_run
    }

    fn is_due(&self, now: I) -> bool {
        self.enabled && time::period_elapsed(self.last_run, now, self.period)
    }

    fn arm(&mut self) {
        self.enabled = true;
        self.runs = 0;
        self.last_run = None;
    }
}

/// Fixed-capacity cooperative scheduler.
///
/// # Type Parameters
/// * `J` - Job tag handed back for each due task
/// * `I` - Time instant type
/// * `T` - Maximum number of tasks
pub struct Scheduler<J, I: TimeInstant, const T: usize> {
    tasks: Vec<Task<J, I>, T>,
}

impl<J: Copy + PartialEq, I: TimeInstant, const T: usize> Scheduler<J, I, T> {
    /// Creates an empty scheduler.
    pub fn new() -> Self {
        Self { tasks: Vec::new() }
    }

    /// Registers a disabled task.
    ///
    /// # Errors
    /// * `CapacityExceeded` - `T` tasks are already registered
    pub fn add(
        &mut self,
        job: J,
        period: I::Duration,
        iterations: Iterations,
    ) -> Result<TaskId, SchedulerError> {
        let id = TaskId(self.tasks.len());
        self.tasks
            .push(Task {
                job,
                period,
                iterations,
                runs: 0,
                enabled: false,
                last_run: None,
            })
            .map_err(|_| SchedulerError::CapacityExceeded)?;
        Ok(id)
    }

    /// Enables a task. It becomes due immediately.
    ///
    /// Enabling restarts the task: its run count and last-run stamp reset.
    pub fn enable(&mut self, id: TaskId) -> Result<(), SchedulerError> {
        self.tasks
            .get_mut(id.0)
            .ok_or(SchedulerError::InvalidTaskId(id))?
            .arm();
        Ok(())
    }

    /// Disables a task. Its period and job are kept.
    pub fn disable(&mut self, id: TaskId) -> Result<(), SchedulerError> {
        self.tasks
            .get_mut(id.0)
            .ok_or(SchedulerError::InvalidTaskId(id))?
            .enabled = false;
        Ok(())
    }

    /// Enables every task registered with `job`. Returns how many matched.
    pub fn enable_job(&mut self, job: J) -> usize {
        let mut matched = 0;
        for task in self.tasks.iter_mut().filter(|t| t.job == job) {
            task.arm();
            matched += 1;
        }
        matched
    }

    /// Disables every task registered with `job`. Returns how many matched.
    pub fn disable_job(&mut self, job: J) -> usize {
        let mut matched = 0;
        for task in self.tasks.iter_mut().filter(|t| t.job == job) {
            task.enabled = false;
            matched += 1;
        }
        matched
    }

    /// Disables every registered task.
    pub fn disable_all(&mut self) {
        for task in self.tasks.iter_mut() {
            task.enabled = false;
        }
    }

    /// Returns whether the task is enabled.
    pub fn is_enabled(&self, id: TaskId) -> Result<bool, SchedulerError> {
        self.tasks
            .get(id.0)
            .map(|t| t.enabled)
            .ok_or(SchedulerError::InvalidTaskId(id))
    }

    /// Returns the task registered under `id`.
    pub fn task(&self, id: TaskId) -> Option<&Task<J, I>> {
        self.tasks.get(id.0)
    }

    /// Jobs of all enabled tasks, in registration order.
    pub fn enabled_jobs(&self) -> Vec<J, T> {
        self.tasks
            .iter()
            .filter(|t| t.enabled)
            .map(|t| t.job)
            .collect()
    }

    /// Collects the jobs due at `now` and stamps their tasks as run.
    ///
    /// Returns jobs in registration order; the caller runs each exactly once.
    /// A `Finite` task that reaches its last run is disabled here.
    pub fn tick(&mut self, now: I) -> Vec<J, T> {
        let mut due = Vec::new();

        for task in self.tasks.iter_mut() {
            if !task.is_due(now) {
                continue;
            }

            task.last_run = Some(now);
            task.runs = task.runs.saturating_add(1);
            if let Iterations::Finite(limit) = task.iterations {
                if task.runs >= limit {
                    task.enabled = false;
                }
            }

            // `due` has the same capacity as the task table.
            let _ = due.push(task.job);
        }

        due
    }

    /// Time until the next enabled task is due.
    ///
    /// # Returns
    /// * `Some(Duration::ZERO)` - At least one task is due now
    /// * `Some(duration)` - Nothing is due; sleep this long
    /// * `None` - No task is enabled
    pub fn time_until_next(&self, now: I) -> Option<I::Duration> {
        let mut min: Option<I::Duration> = None;

        for task in self.tasks.iter().filter(|t| t.enabled) {
            let wait = time::remaining(task.last_run, now, task.period);
            match min {
                Some(current) if current.as_millis() <= wait.as_millis() => {}
                _ => min = Some(wait),
            }
        }

        min
    }

    /// Number of registered tasks.
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Returns true if no task is registered.
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

impl<J: Copy + PartialEq, I: TimeInstant, const T: usize> Default for Scheduler<J, I, T> {
    fn default() -> Self {
        Self::new()
    }
}

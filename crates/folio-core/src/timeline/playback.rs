use tracing::debug;

use super::anchor::ViewportIntersection;
use super::task::{BatchId, TaskId, TaskState, Trigger, TweenSpec};
use crate::frame::FrameTime;
use crate::scroll::timing::lerp;
use crate::stage::{ElementHandle, ElementStore};
use crate::{Error, Result};

#[derive(Debug, Clone)]
struct TweenTask {
    id: TaskId,
    target: ElementHandle,
    spec: TweenSpec,
    /// Delay including any batch stagger
    delay_ms: f64,
    trigger_element: Option<ElementHandle>,
    batch: Option<BatchId>,
    state: TaskState,
    armed_at: Option<f64>,
}

impl TweenTask {
    fn write(&self, store: &mut ElementStore, factor: f64) {
        for p in &self.spec.properties {
            let value = if factor >= 1.0 { p.to } else { lerp(p.from, p.to, factor) };
            store.set(self.target, p.property, value);
        }
    }

    fn visible(&self, intersection: &ViewportIntersection) -> bool {
        match self.spec.trigger {
            Trigger::Immediate => true,
            Trigger::OnVisible { anchor, .. } => anchor.is_crossed(intersection),
        }
    }
}

/// What happened during one `Timeline::advance`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimelineReport {
    /// Tasks that reached `Done` this frame
    pub completed: Vec<TaskId>,
    /// Tasks removed because their target was unmounted
    pub dropped: Vec<TaskId>,
}

impl TimelineReport {
    pub fn is_empty(&self) -> bool {
        self.completed.is_empty() && self.dropped.is_empty()
    }
}

/// Trigger-gated, at-most-once tween playback.
///
/// Tasks are kept after they finish so a later visibility report cannot
/// start them again.
#[derive(Debug, Default)]
pub struct Timeline {
    next_id: u64,
    next_batch: u64,
    tasks: Vec<TweenTask>,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tween on `target`
    pub fn schedule(
        &mut self,
        spec: TweenSpec,
        target: ElementHandle,
        store: &mut ElementStore,
        now_ms: f64,
    ) -> Result<TaskId> {
        spec.validate()?;
        if !store.is_mounted(target) {
            return Err(Error::TargetNotFound(target));
        }
        let delay_ms = spec.delay_ms;
        Ok(self.insert(spec, target, delay_ms, None, None, store, now_ms))
    }

    /// Register one tween per target, each delayed by a further `stagger_ms`.
    ///
    /// Nothing is scheduled if any target is missing.
    pub fn schedule_batch(
        &mut self,
        spec: TweenSpec,
        targets: &[ElementHandle],
        stagger_ms: f64,
        store: &mut ElementStore,
        now_ms: f64,
    ) -> Result<BatchId> {
        spec.validate()?;
        if !(stagger_ms.is_finite() && stagger_ms >= 0.0) {
            return Err(Error::InvalidTween(format!(
                "stagger must be non-negative, got {}",
                stagger_ms
            )));
        }
        if targets.is_empty() {
            return Err(Error::InvalidTween("batch has no targets".to_string()));
        }
        if let Some(missing) = targets.iter().find(|t| !store.is_mounted(**t)) {
            return Err(Error::TargetNotFound(*missing));
        }

        self.next_batch += 1;
        let batch = BatchId(self.next_batch);
        let trigger_element = match spec.trigger {
            Trigger::OnVisible { element, .. } => element.or(Some(targets[0])),
            Trigger::Immediate => None,
        };

        for (i, target) in targets.iter().enumerate() {
            let delay_ms = spec.delay_ms + i as f64 * stagger_ms;
            self.insert(
                spec.clone(),
                *target,
                delay_ms,
                trigger_element,
                Some(batch),
                store,
                now_ms,
            );
        }
        debug!(batch = batch.0, count = targets.len(), "Scheduled tween batch");
        Ok(batch)
    }

    #[allow(clippy::too_many_arguments)]
    fn insert(
        &mut self,
        spec: TweenSpec,
        target: ElementHandle,
        delay_ms: f64,
        trigger_element: Option<ElementHandle>,
        batch: Option<BatchId>,
        store: &mut ElementStore,
        now_ms: f64,
    ) -> TaskId {
        self.next_id += 1;
        let id = TaskId(self.next_id);

        let (state, armed_at, trigger_element) = match spec.trigger {
            Trigger::Immediate => (TaskState::Armed, Some(now_ms), None),
            Trigger::OnVisible { element, .. } => {
                (TaskState::Pending, None, trigger_element.or(element).or(Some(target)))
            }
        };

        let task = TweenTask {
            id,
            target,
            spec,
            delay_ms,
            trigger_element,
            batch,
            state,
            armed_at,
        };
        if task.spec.immediate_render {
            task.write(store, 0.0);
        }
        self.tasks.push(task);
        id
    }

    /// Arm `task` if the intersection crosses its trigger anchor.
    ///
    /// Only a `Pending` task can be armed; batch siblings arm with it.
    pub fn arm_if_visible(
        &mut self,
        task: TaskId,
        intersection: &ViewportIntersection,
        now_ms: f64,
    ) -> bool {
        let Some(found) = self.tasks.iter().find(|t| t.id == task) else {
            return false;
        };
        if found.state != TaskState::Pending || !found.visible(intersection) {
            return false;
        }
        let batch = found.batch;
        self.arm(|t| t.id == task || (batch.is_some() && t.batch == batch), now_ms) > 0
    }

    /// Arm every pending task triggered by `element`. Returns how many armed.
    pub fn report_visibility(
        &mut self,
        element: ElementHandle,
        intersection: &ViewportIntersection,
        now_ms: f64,
    ) -> usize {
        let batches: Vec<Option<BatchId>> = self
            .tasks
            .iter()
            .filter(|t| {
                t.state == TaskState::Pending
                    && t.trigger_element == Some(element)
                    && t.visible(intersection)
            })
            .map(|t| t.batch)
            .collect();
        if batches.is_empty() {
            return 0;
        }

        self.arm(
            |t| {
                (t.trigger_element == Some(element) && t.visible(intersection))
                    || (t.batch.is_some() && batches.contains(&t.batch))
            },
            now_ms,
        )
    }

    fn arm(&mut self, matches: impl Fn(&TweenTask) -> bool, now_ms: f64) -> usize {
        let mut armed = 0;
        for task in self
            .tasks
            .iter_mut()
            .filter(|t| t.state == TaskState::Pending)
        {
            if matches(task) {
                task.state = TaskState::Armed;
                task.armed_at = Some(now_ms);
                armed += 1;
            }
        }
        if armed > 0 {
            debug!(armed, "Armed tween tasks");
        }
        armed
    }

    /// Advance all armed and playing tasks to `frame.now_ms`
    pub fn advance(&mut self, frame: &FrameTime, store: &mut ElementStore) -> TimelineReport {
        let mut report = TimelineReport::default();

        // Any task whose target is gone is pruned; only unfinished ones are reported
        self.tasks.retain(|task| {
            if store.is_mounted(task.target) {
                return true;
            }
            debug!(task = %task.id, target = %task.target, state = ?task.state, "Tween target unmounted, dropping task");
            if task.state != TaskState::Done {
                report.dropped.push(task.id);
            }
            false
        });

        for task in self.tasks.iter_mut() {
            let armed_at = match (task.state, task.armed_at) {
                (TaskState::Armed | TaskState::Playing, Some(at)) => at,
                _ => continue,
            };

            let elapsed = frame.now_ms - armed_at - task.delay_ms;
            if elapsed < 0.0 {
                continue;
            }
            task.state = TaskState::Playing;

            let duration = task.spec.duration_ms;
            if elapsed >= task.spec.total_duration_ms() {
                task.write(store, 1.0);
                task.state = TaskState::Done;
                report.completed.push(task.id);
                continue;
            }

            let iteration_elapsed = elapsed % duration;
            task.write(store, task.spec.easing.apply(iteration_elapsed / duration));
        }

        report
    }

    /// Put a task back to its initial state, e.g. when its target remounts
    pub fn reset(&mut self, task: TaskId, store: &mut ElementStore, now_ms: f64) -> bool {
        let Some(t) = self.tasks.iter_mut().find(|t| t.id == task) else {
            return false;
        };
        match t.spec.trigger {
            Trigger::Immediate => {
                t.state = TaskState::Armed;
                t.armed_at = Some(now_ms);
            }
            Trigger::OnVisible { .. } => {
                t.state = TaskState::Pending;
                t.armed_at = None;
            }
        }
        if t.spec.immediate_render {
            t.write(store, 0.0);
        }
        true
    }

    pub fn cancel(&mut self, task: TaskId) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != task);
        self.tasks.len() != before
    }

    pub fn cancel_batch(&mut self, batch: BatchId) -> usize {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.batch != Some(batch));
        before - self.tasks.len()
    }

    /// Remove every task animating `target`
    pub fn cancel_target(&mut self, target: ElementHandle) -> usize {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.target != target);
        before - self.tasks.len()
    }

    pub fn state(&self, task: TaskId) -> Option<TaskState> {
        self.tasks.iter().find(|t| t.id == task).map(|t| t.state)
    }

    pub fn batch_tasks(&self, batch: BatchId) -> Vec<TaskId> {
        self.tasks
            .iter()
            .filter(|t| t.batch == Some(batch))
            .map(|t| t.id)
            .collect()
    }

    /// Pending tasks triggered by `element`
    pub fn pending_for(&self, element: ElementHandle) -> usize {
        self.tasks
            .iter()
            .filter(|t| t.state == TaskState::Pending && t.trigger_element == Some(element))
            .count()
    }

    /// Tasks that still need frames
    pub fn active_count(&self) -> usize {
        self.tasks
            .iter()
            .filter(|t| matches!(t.state, TaskState::Armed | TaskState::Playing))
            .count()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

//! Draw submission.
//!
//! Scene objects do not call the graph directly. Each drawable carries one or
//! more [`Technique`]s; a technique holds [`Step`]s, each targeting one queue
//! pass by name. Linking resolves those names to pass handles once, and
//! submitting pushes one [`Task`] per active step into the target queues.

use std::sync::Arc;

use crate::device::{Command, RenderDevice};
use crate::error::GraphError;
use crate::graph::{PassHandle, RenderGraph};
use crate::resources::Resource;

/// A drawable piece of geometry with the resources it always binds.
#[derive(Debug)]
pub struct RenderObject {
    label: String,
    index_count: u32,
    bindables: Vec<Resource>,
}

impl RenderObject {
    /// Create a drawable issuing `index_count` indices per draw.
    pub fn new(label: impl Into<String>, index_count: u32) -> Self {
        Self {
            label: label.into(),
            index_count,
            bindables: Vec::new(),
        }
    }

    /// Add a resource bound before every draw of this object.
    pub fn with_bindable(mut self, resource: impl Into<Resource>) -> Self {
        self.bindables.push(resource.into());
        self
    }

    /// Get the debug label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Get the number of indices drawn.
    pub fn index_count(&self) -> u32 {
        self.index_count
    }

    /// Get the object-level bindables.
    pub fn bindables(&self) -> &[Resource] {
        &self.bindables
    }
}

/// One pending draw: an object paired with the step bindables that
/// contributed it.
#[derive(Debug, Clone)]
pub struct Task {
    object: Arc<RenderObject>,
    bindables: Arc<Vec<Resource>>,
}

impl Task {
    /// Create a task.
    pub fn new(object: Arc<RenderObject>, bindables: Arc<Vec<Resource>>) -> Self {
        Self { object, bindables }
    }

    /// Get the drawn object.
    pub fn object(&self) -> &Arc<RenderObject> {
        &self.object
    }

    /// Record this task's draw. Object bindables go first, then the step
    /// bindables, then the indexed draw.
    pub fn execute(&self, device: &RenderDevice) {
        for resource in self.object.bindables() {
            device.record(Command::BindResource {
                kind: resource.kind(),
                label: resource.label().to_string(),
            });
        }
        for resource in self.bindables.iter() {
            device.record(Command::BindResource {
                kind: resource.kind(),
                label: resource.label().to_string(),
            });
        }
        device.record(Command::DrawIndexed {
            index_count: self.object.index_count(),
        });
    }
}

/// Per-pass accumulator of draw tasks, drained in submission order.
#[derive(Debug, Default)]
pub struct RenderQueue {
    tasks: Vec<Task>,
}

impl RenderQueue {
    /// Append a task.
    pub fn accept(&mut self, task: Task) {
        self.tasks.push(task);
    }

    /// Number of pending tasks.
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Whether the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Record every pending draw in submission order.
    pub fn execute(&self, device: &RenderDevice) {
        for task in &self.tasks {
            task.execute(device);
        }
    }

    /// Drop all pending tasks.
    pub fn reset(&mut self) {
        self.tasks.clear();
    }
}

/// One contribution of a technique: a target queue pass plus the resources
/// bound for draws submitted through this step.
#[derive(Debug)]
pub struct Step {
    target_pass: String,
    bindables: Arc<Vec<Resource>>,
    resolved: Option<PassHandle>,
}

impl Step {
    /// Create a step targeting the named queue pass.
    pub fn new(target_pass: impl Into<String>, bindables: Vec<Resource>) -> Self {
        Self {
            target_pass: target_pass.into(),
            bindables: Arc::new(bindables),
            resolved: None,
        }
    }

    /// Get the name of the targeted pass.
    pub fn target_pass(&self) -> &str {
        &self.target_pass
    }

    /// Whether the step has been linked to a pass handle.
    pub fn is_linked(&self) -> bool {
        self.resolved.is_some()
    }

    /// Resolve the target pass name against a graph. Re-linking against
    /// another graph replaces the handle.
    pub fn link(&mut self, graph: &RenderGraph) -> Result<(), GraphError> {
        self.resolved = Some(graph.queue_pass_handle(&self.target_pass)?);
        Ok(())
    }
}

/// A named, switchable group of steps.
#[derive(Debug)]
pub struct Technique {
    name: String,
    active: bool,
    steps: Vec<Step>,
}

impl Technique {
    /// Create an active technique.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            active: true,
            steps: Vec::new(),
        }
    }

    /// Add a step.
    pub fn with_step(mut self, step: Step) -> Self {
        self.steps.push(step);
        self
    }

    /// Get the technique name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether submissions go through.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Enable or disable the technique. An inactive technique submits
    /// nothing but stays linked.
    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    /// Resolve every step against the graph.
    pub fn link(&mut self, graph: &RenderGraph) -> Result<(), GraphError> {
        for step in &mut self.steps {
            step.link(graph)?;
        }
        Ok(())
    }

    /// Push one task per step into the step's target queue. Inactive
    /// techniques submit nothing; unlinked steps are an error.
    pub fn submit(
        &self,
        graph: &mut RenderGraph,
        object: &Arc<RenderObject>,
    ) -> Result<(), GraphError> {
        if !self.active {
            return Ok(());
        }
        for step in &self.steps {
            let handle = step.resolved.ok_or_else(|| GraphError::UnlinkedStep {
                technique: self.name.clone(),
                pass: step.target_pass.clone(),
            })?;
            graph.push_task(handle, Task::new(object.clone(), step.bindables.clone()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::RenderDevice;
    use crate::types::{BufferDesc, BufferUsage};

    #[test]
    fn test_task_records_bindables_then_draw() {
        let device = RenderDevice::new();
        let buffer = device
            .create_buffer(&BufferDesc::new(64, BufferUsage::VERTEX).with_label("cubeVerts"))
            .unwrap();
        let object = Arc::new(RenderObject::new("cube", 36).with_bindable(buffer));

        Task::new(object, Arc::new(Vec::new())).execute(&device);

        let commands = device.commands();
        assert_eq!(commands.len(), 2);
        assert!(matches!(commands[0], Command::BindResource { .. }));
        assert_eq!(commands[1], Command::DrawIndexed { index_count: 36 });
    }

    #[test]
    fn test_queue_executes_in_submission_order() {
        let device = RenderDevice::new();
        let mut queue = RenderQueue::default();
        for count in [3, 6, 9] {
            queue.accept(Task::new(
                Arc::new(RenderObject::new("obj", count)),
                Arc::new(Vec::new()),
            ));
        }

        queue.execute(&device);
        let counts: Vec<u32> = device
            .commands()
            .iter()
            .filter_map(|c| match c {
                Command::DrawIndexed { index_count } => Some(*index_count),
                _ => None,
            })
            .collect();
        assert_eq!(counts, vec![3, 6, 9]);

        queue.reset();
        assert!(queue.is_empty());
    }

    #[test]
    fn test_inactive_technique_submits_nothing() {
        let device = RenderDevice::new();
        let mut graph = RenderGraph::standard(&device, crate::types::Extent2d::new(64, 64))
            .unwrap();
        let mut technique = Technique::new("shade").with_step(Step::new("phong", Vec::new()));
        technique.link(&graph).unwrap();
        technique.set_active(false);

        let object = Arc::new(RenderObject::new("cube", 36));
        technique.submit(&mut graph, &object).unwrap();
        assert!(graph.queue("phong").unwrap().is_empty());
    }

    #[test]
    fn test_unlinked_step_submission_fails() {
        let device = RenderDevice::new();
        let mut graph = RenderGraph::standard(&device, crate::types::Extent2d::new(64, 64))
            .unwrap();
        let technique = Technique::new("shade").with_step(Step::new("phong", Vec::new()));

        let object = Arc::new(RenderObject::new("cube", 36));
        assert_eq!(
            technique.submit(&mut graph, &object),
            Err(GraphError::UnlinkedStep {
                technique: "shade".to_string(),
                pass: "phong".to_string(),
            })
        );
    }

    #[test]
    fn test_linking_unknown_pass_fails() {
        let device = RenderDevice::new();
        let graph = RenderGraph::standard(&device, crate::types::Extent2d::new(64, 64)).unwrap();
        let mut step = Step::new("nonexistent", Vec::new());
        assert!(matches!(
            step.link(&graph),
            Err(GraphError::UnknownPass { .. })
        ));

        let mut step = Step::new("clear", Vec::new());
        assert_eq!(
            step.link(&graph),
            Err(GraphError::NotAQueuePass {
                name: "clear".to_string(),
            })
        );
    }
}

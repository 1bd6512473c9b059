//! In-memory project model.
//!
//! Tasks and resources form trees. They live in flat arenas on [`ProjectFile`]
//! and point at each other by index ([`TaskId`], [`ResourceId`]), which keeps
//! deep hierarchies cheap to build and lets relations refer to any two tasks.
//!
//! The `add_*` operations are the builder interface used by
//! [`SynchroReader`](crate::SynchroReader); everything they create is
//! read-only to callers afterwards.

mod calendar;

pub use calendar::{CalendarException, ProjectCalendar, TimeRange};

use chrono::NaiveDateTime;
use uuid::Uuid;

use crate::synchro::types::models::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CalendarId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceId(pub usize);

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectProperties {
    pub file_application: String,
    pub file_type: String,
    pub version: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintType {
    AsSoonAsPossible,
    AsLateAsPossible,
    MustStartOn,
    MustFinishOn,
    StartNoEarlierThan,
    StartNoLaterThan,
    FinishNoEarlierThan,
    FinishNoLaterThan,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RelationType {
    #[default]
    FinishStart,
    StartStart,
    FinishFinish,
    StartFinish,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Task {
    pub id: Option<TaskId>,
    pub parent: Option<TaskId>,
    pub children: Vec<TaskId>,
    pub name: Option<String>,
    pub guid: Option<Uuid>,
    pub activity_id: Option<String>,
    pub hyperlink: Option<String>,
    pub notes: Option<String>,
    pub start: Option<NaiveDateTime>,
    pub finish: Option<NaiveDateTime>,
    pub actual_start: Option<NaiveDateTime>,
    pub actual_finish: Option<NaiveDateTime>,
    pub duration: Option<Duration>,
    pub remaining_duration: Option<Duration>,
    /// Set only when the task uses a calendar other than the project default.
    pub calendar: Option<CalendarId>,
    pub constraint_type: Option<ConstraintType>,
    pub constraint_date: Option<NaiveDateTime>,
    pub percent_complete: f64,
    pub milestone: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Resource {
    pub id: Option<ResourceId>,
    pub parent: Option<ResourceId>,
    pub children: Vec<ResourceId>,
    pub name: Option<String>,
    pub guid: Option<Uuid>,
    pub resource_id: Option<String>,
    pub email: Option<String>,
    pub hyperlink: Option<String>,
    pub description: Option<String>,
    pub supply_reference: Option<String>,
    pub notes: Option<String>,
    pub active: bool,
}

/// A dependency of `successor` on `predecessor`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Relation {
    pub predecessor: TaskId,
    pub successor: TaskId,
    pub relation_type: RelationType,
    /// Negative for lead time.
    pub lag: Duration,
    /// Calendar the lag is measured in, when the file names one.
    pub calendar: Option<CalendarId>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResourceAssignment {
    pub task: TaskId,
    pub resource: ResourceId,
    pub units: f64,
}

#[derive(Debug, Clone, Default)]
pub struct ProjectFile {
    properties: ProjectProperties,
    calendars: Vec<ProjectCalendar>,
    default_calendar: Option<CalendarId>,
    tasks: Vec<Task>,
    root_tasks: Vec<TaskId>,
    resources: Vec<Resource>,
    root_resources: Vec<ResourceId>,
    relations: Vec<Relation>,
    assignments: Vec<ResourceAssignment>,
}

impl ProjectFile {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn properties(&self) -> &ProjectProperties {
        &self.properties
    }

    pub fn properties_mut(&mut self) -> &mut ProjectProperties {
        &mut self.properties
    }

    // --- calendars ---

    pub fn add_calendar(&mut self, calendar: ProjectCalendar) -> CalendarId {
        self.calendars.push(calendar);
        CalendarId(self.calendars.len() - 1)
    }

    pub fn calendars(&self) -> &[ProjectCalendar] {
        &self.calendars
    }

    pub fn calendar(&self, id: CalendarId) -> &ProjectCalendar {
        &self.calendars[id.0]
    }

    pub fn set_default_calendar(&mut self, id: CalendarId) {
        self.default_calendar = Some(id);
    }

    pub fn default_calendar_id(&self) -> Option<CalendarId> {
        self.default_calendar
    }

    pub fn default_calendar(&self) -> Option<&ProjectCalendar> {
        self.default_calendar.map(|id| self.calendar(id))
    }

    /// The calendar named "Standard", created with standard hours if missing.
    pub fn find_or_create_default_calendar(&mut self) -> CalendarId {
        match self
            .calendars
            .iter()
            .position(|calendar| calendar.name.as_deref() == Some("Standard"))
        {
            Some(index) => CalendarId(index),
            None => self.add_calendar(ProjectCalendar::standard()),
        }
    }

    // --- tasks ---

    /// Adds `task` under `parent`, or at the top level.
    pub fn add_task(&mut self, parent: Option<TaskId>, mut task: Task) -> TaskId {
        let id = TaskId(self.tasks.len());
        task.id = Some(id);
        task.parent = parent;
        task.children.clear();
        self.tasks.push(task);
        match parent {
            Some(parent) => self.tasks[parent.0].children.push(id),
            None => self.root_tasks.push(id),
        }
        id
    }

    pub fn task(&self, id: TaskId) -> &Task {
        &self.tasks[id.0]
    }

    pub fn task_mut(&mut self, id: TaskId) -> &mut Task {
        &mut self.tasks[id.0]
    }

    /// All tasks in the order they were added (depth first, parents first).
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn child_tasks(&self) -> &[TaskId] {
        &self.root_tasks
    }

    pub fn find_task_by_guid(&self, guid: Uuid) -> Option<&Task> {
        self.tasks.iter().find(|task| task.guid == Some(guid))
    }

    /// The calendar a task schedules against: its own, else the project default.
    pub fn effective_calendar(&self, id: TaskId) -> Option<&ProjectCalendar> {
        match self.task(id).calendar {
            Some(calendar) => Some(self.calendar(calendar)),
            None => self.default_calendar(),
        }
    }

    // --- resources ---

    pub fn add_resource(&mut self, parent: Option<ResourceId>, mut resource: Resource) -> ResourceId {
        let id = ResourceId(self.resources.len());
        resource.id = Some(id);
        resource.parent = parent;
        resource.children.clear();
        self.resources.push(resource);
        match parent {
            Some(parent) => self.resources[parent.0].children.push(id),
            None => self.root_resources.push(id),
        }
        id
    }

    pub fn resource(&self, id: ResourceId) -> &Resource {
        &self.resources[id.0]
    }

    pub fn resources(&self) -> &[Resource] {
        &self.resources
    }

    pub fn child_resources(&self) -> &[ResourceId] {
        &self.root_resources
    }

    pub fn find_resource_by_guid(&self, guid: Uuid) -> Option<&Resource> {
        self.resources.iter().find(|resource| resource.guid == Some(guid))
    }

    // --- links ---

    pub fn add_relation(&mut self, relation: Relation) {
        self.relations.push(relation);
    }

    pub fn relations(&self) -> &[Relation] {
        &self.relations
    }

    pub fn predecessors(&self, id: TaskId) -> impl Iterator<Item = &Relation> {
        self.relations.iter().filter(move |relation| relation.successor == id)
    }

    pub fn add_assignment(&mut self, assignment: ResourceAssignment) {
        self.assignments.push(assignment);
    }

    pub fn assignments(&self) -> &[ResourceAssignment] {
        &self.assignments
    }

    pub fn task_assignments(&self, id: TaskId) -> impl Iterator<Item = &ResourceAssignment> {
        self.assignments.iter().filter(move |assignment| assignment.task == id)
    }
}

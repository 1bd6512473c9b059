use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use chrono::{NaiveDateTime, Weekday};
use log::{debug, info};
use uuid::Uuid;

use super::entities::{CalendarReader, CompanyReader, ResourceReader, TaskReader, WEEKDAY_FIELDS};
use super::format::container::SynchroData;
use super::project::{
    CalendarId, ConstraintType, ProjectCalendar, ProjectFile, Relation, RelationType, Resource,
    ResourceAssignment, ResourceId, Task, TaskId, TimeRange,
};
use super::sink::DecodeSink;
use super::stream::StreamReader;
use super::table::{self, TableReader};
use super::types::error::Result;
use super::types::models::{Duration, SynchroVersion};
use super::types::row::Row;

const CALENDARS_TABLE: &str = "Calendars";
const COMPANIES_TABLE: &str = "Companies";
const RESOURCES_TABLE: &str = "Resources";
const TASKS_TABLE: &str = "Tasks";

/// Tables decompressed when reading a file of `version`; all others are skipped.
///
/// Resources live in their own table from 6.2.0 on, and under each company before that.
pub fn required_tables(version: SynchroVersion) -> [&'static str; 3] {
    [CALENDARS_TABLE, resource_table(version), TASKS_TABLE]
}

fn resource_table(version: SynchroVersion) -> &'static str {
    if version.at_least(SynchroVersion::VERSION_6_2_0) {
        RESOURCES_TABLE
    } else {
        COMPANIES_TABLE
    }
}

/// Weekdays in the order of [`WEEKDAY_FIELDS`].
const WEEKDAYS: [Weekday; 7] = [
    Weekday::Sun,
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
];

const STATUS_PLANNED: i64 = 1;
const STATUS_STARTED: i64 = 2;
const STATUS_FINISHED: i64 = 3;

/// Reads Synchro SP files into a [`ProjectFile`].
///
/// A reader holds no state between reads; every call to [`read`](Self::read)
/// starts a fresh decode session.
#[derive(Default, Clone, Copy)]
pub struct SynchroReader<'s> {
    sink: Option<&'s dyn DecodeSink>,
}

impl<'s> SynchroReader<'s> {
    pub fn new() -> Self {
        Self { sink: None }
    }

    /// Report the version, tables and every decoded row to `sink`.
    pub fn with_sink(mut self, sink: &'s dyn DecodeSink) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Read an SP file from the given path.
    pub fn read_file(&self, path: impl AsRef<Path>) -> Result<ProjectFile> {
        let path = path.as_ref();
        info!("Opening Synchro file: {}", path.display());
        let file = File::open(path)?;
        self.read(BufReader::new(file))
    }

    /// Read an SP file from a stream.
    ///
    /// The stream is consumed once, front to back.
    ///
    /// # Errors
    /// Returns an error if:
    /// - The stream cannot be read or ends early
    /// - Any table or row magic number is wrong
    /// - The table directory is inconsistent with the stream
    /// - A table payload cannot be decompressed
    ///
    /// No partially built project is returned on error.
    pub fn read<R: Read>(&self, input: R) -> Result<ProjectFile> {
        let mut data = SynchroData::process_with(
            input,
            |version| required_tables(version).to_vec(),
            self.sink,
        )?;

        let mut session = Session::new(self.sink);
        {
            let properties = session.project.properties_mut();
            properties.file_application = "Synchro".to_string();
            properties.file_type = "SP".to_string();
            properties.version = Some(data.version_text().to_string());
        }

        session.process_calendars(&mut data)?;
        session.process_resources(&mut data)?;
        session.process_tasks(&mut data)?;
        session.process_predecessors();
        session.process_assignments();

        let project = session.project;
        info!(
            "Read {} calendars, {} resources, {} tasks, {} relations, {} assignments",
            project.calendars().len(),
            project.resources().len(),
            project.tasks().len(),
            project.relations().len(),
            project.assignments().len()
        );
        Ok(project)
    }
}

/// A predecessor link waiting for every task to be known.
struct DeferredRelation {
    successor: TaskId,
    predecessor: Option<Uuid>,
    relation_type: RelationType,
    lag: Duration,
    calendar: Option<Uuid>,
}

/// A resource link waiting for the second pass.
struct DeferredAssignment {
    task: TaskId,
    resource: Option<Uuid>,
    units: f64,
}

/// State of a single decode.
struct Session<'s> {
    sink: Option<&'s dyn DecodeSink>,
    project: ProjectFile,
    calendar_map: HashMap<Uuid, CalendarId>,
    resource_map: HashMap<Uuid, ResourceId>,
    task_map: HashMap<Uuid, TaskId>,
    deferred_relations: Vec<DeferredRelation>,
    deferred_assignments: Vec<DeferredAssignment>,
}

impl<'s> Session<'s> {
    fn new(sink: Option<&'s dyn DecodeSink>) -> Self {
        Self {
            sink,
            project: ProjectFile::new(),
            calendar_map: HashMap::new(),
            resource_map: HashMap::new(),
            task_map: HashMap::new(),
            deferred_relations: Vec::new(),
            deferred_assignments: Vec::new(),
        }
    }

    fn read_rows(&self, data: Option<Vec<u8>>, reader: &mut dyn TableReader) -> Result<Vec<Row>> {
        let Some(bytes) = data else {
            return Ok(Vec::new());
        };
        let mut stream = StreamReader::new(&bytes).with_sink(self.sink);
        let rows = table::read_table(reader, &mut stream)?;
        if stream.remaining() != 0 {
            debug!("{} table: {} trailing bytes ignored", reader.name(), stream.remaining());
        }
        Ok(rows)
    }

    // --- calendars ---

    fn process_calendars(&mut self, data: &mut SynchroData) -> Result<()> {
        let mut reader = CalendarReader::default();
        let rows = self.read_rows(data.take_table_data(CALENDARS_TABLE), &mut reader)?;
        for row in &rows {
            self.process_calendar(row);
        }

        let default = reader
            .default_calendar_uuid()
            .and_then(|uuid| self.calendar_map.get(&uuid).copied());
        let default = match default {
            Some(id) => id,
            None => {
                debug!("Default calendar not found, using the standard calendar");
                self.project.find_or_create_default_calendar()
            }
        };
        self.project.set_default_calendar(default);
        Ok(())
    }

    fn process_calendar(&mut self, row: &Row) {
        let day_types = process_day_types(row.get_rows("DAY_TYPES"));
        let resolve = |uuid: Option<Uuid>| -> Vec<TimeRange> {
            uuid.and_then(|uuid| day_types.get(&uuid))
                .cloned()
                .unwrap_or_default()
        };

        let mut calendar = ProjectCalendar::new(owned(row.get_string("NAME")), row.get_uuid("UUID"));
        for (field, day) in WEEKDAY_FIELDS.iter().zip(WEEKDAYS) {
            calendar.set_hours(day, resolve(row.get_uuid(field)));
        }

        for assignment in row.get_rows("DAY_TYPE_ASSIGNMENTS") {
            let Some(date) = assignment.get_date("DATE") else {
                continue;
            };
            calendar.add_exception(date.date(), resolve(assignment.get_uuid("DAY_TYPE_UUID")));
        }

        let id = self.project.add_calendar(calendar);
        if let Some(uuid) = row.get_uuid("UUID") {
            self.calendar_map.insert(uuid, id);
        }
    }

    // --- resources ---

    fn process_resources(&mut self, data: &mut SynchroData) -> Result<()> {
        let table = resource_table(data.version());
        if table == RESOURCES_TABLE {
            let rows = self.read_rows(data.take_table_data(table), &mut ResourceReader)?;
            for row in sort_by_name(&rows) {
                self.process_resource(None, row);
            }
        } else {
            let companies = self.read_rows(data.take_table_data(table), &mut CompanyReader)?;
            for company in &companies {
                for row in sort_by_name(company.get_rows("RESOURCES")) {
                    self.process_resource(None, row);
                }
            }
        }
        Ok(())
    }

    fn process_resource(&mut self, parent: Option<ResourceId>, row: &Row) {
        let resource = Resource {
            name: owned(row.get_string("NAME")),
            guid: row.get_uuid("UUID"),
            resource_id: owned(row.get_string("ID")),
            email: owned(row.get_string("EMAIL")),
            hyperlink: owned(row.get_string("URL")),
            description: owned(row.get_string("DESCRIPTION")),
            supply_reference: owned(row.get_string("SUPPLY_REFERENCE")),
            notes: notes(row.get_rows("COMMENTARY")),
            active: true,
            ..Resource::default()
        };
        let id = self.project.add_resource(parent, resource);

        for child in sort_by_name(row.get_rows("RESOURCES")) {
            self.process_resource(Some(id), child);
        }

        if let Some(uuid) = row.get_uuid("UUID") {
            self.resource_map.insert(uuid, id);
        }
    }

    // --- tasks ---

    fn process_tasks(&mut self, data: &mut SynchroData) -> Result<()> {
        let rows = self.read_rows(data.take_table_data(TASKS_TABLE), &mut TaskReader)?;
        for row in &rows {
            self.process_task(None, row);
        }

        let roots = self.project.child_tasks().to_vec();
        for id in roots {
            self.update_dates(id);
        }
        Ok(())
    }

    fn process_task(&mut self, parent: Option<TaskId>, row: &Row) {
        let duration = row.get_duration("DURATION");
        let mut task = Task {
            name: owned(row.get_string("NAME")),
            guid: row.get_uuid("UUID"),
            activity_id: owned(row.get_string("ID")),
            hyperlink: owned(row.get_string("URL")),
            duration,
            remaining_duration: row.get_duration("REMAINING_DURATION"),
            percent_complete: row.get_double("PERCENT_COMPLETE").unwrap_or(0.0),
            notes: notes(row.get_rows("COMMENTARY")),
            milestone: duration.is_some_and(|duration| duration.is_zero()),
            ..Task::default()
        };

        let calendar = row
            .get_uuid("CALENDAR_UUID")
            .and_then(|uuid| self.calendar_map.get(&uuid).copied());
        if calendar != self.project.default_calendar_id() {
            task.calendar = calendar;
        }

        let id = self.project.add_task(parent, task);
        self.set_dates(id, row);
        self.set_constraint(id, row);

        if let Some(uuid) = row.get_uuid("UUID") {
            self.task_map.insert(uuid, id);
        }

        for child in row.get_rows("TASKS") {
            self.process_task(Some(id), child);
        }

        for predecessor in row.get_rows("PREDECESSORS") {
            let lag = predecessor.get_duration("LAG").unwrap_or_default();
            self.deferred_relations.push(DeferredRelation {
                successor: id,
                predecessor: predecessor.get_uuid("PREDECESSOR_UUID"),
                relation_type: relation_type(predecessor.get_integer("RELATION_TYPE")),
                lag: if predecessor.get_bool("LAG_IS_NEGATIVE") { -lag } else { lag },
                calendar: predecessor.get_uuid("CALENDAR_UUID"),
            });
        }

        for assignment in row.get_rows("RESOURCE_ASSIGNMENTS") {
            self.deferred_assignments.push(DeferredAssignment {
                task: id,
                resource: assignment.get_uuid("RESOURCE_UUID"),
                units: assignment.get_double("UNITS").unwrap_or(0.0),
            });
        }
    }

    fn set_dates(&mut self, id: TaskId, row: &Row) {
        let actual_start = row.get_date("ACTUAL_START");

        match row.get_integer("STATUS").unwrap_or(0) {
            STATUS_PLANNED => {
                let start = row.get_date("START");
                let finish = match (start, self.project.task(id).duration) {
                    (Some(start), Some(duration)) => self
                        .project
                        .effective_calendar(id)
                        .and_then(|calendar| calendar.finish_date(start, duration)),
                    _ => None,
                };
                let task = self.project.task_mut(id);
                task.start = start;
                task.finish = finish;
            }
            STATUS_STARTED => {
                let finish = row
                    .get_date("ESTIMATED_FINISH")
                    .or_else(|| row.get_date("PLANNED_FINISH"));
                let task = self.project.task_mut(id);
                task.actual_start = actual_start;
                task.start = actual_start.or(row.get_date("START"));
                task.finish = finish;
            }
            STATUS_FINISHED => {
                let actual_finish = row.get_date("ACTUAL_FINISH");
                let task = self.project.task_mut(id);
                task.actual_start = actual_start;
                task.actual_finish = actual_finish;
                task.start = actual_start;
                task.finish = actual_finish;
                task.percent_complete = 100.0;
            }
            status => debug!("Task {:?} has unknown status {}, leaving it undated", id, status),
        }
    }

    fn set_constraint(&mut self, id: TaskId, row: &Row) {
        let code = row.get_integer("CONSTRAINT_TYPE").unwrap_or(0);
        let task = self.project.task_mut(id);
        let (constraint_type, constraint_date) = map_constraint(
            code,
            task.start,
            row.get_date("CONSTRAINT_EARLY_DATE"),
            row.get_date("CONSTRAINT_LATE_DATE"),
        );
        task.constraint_type = constraint_type;
        task.constraint_date = constraint_date;
    }

    /// Summary tasks span their children.
    fn update_dates(&mut self, id: TaskId) {
        let children = self.project.task(id).children.clone();
        if children.is_empty() {
            return;
        }

        let mut start = None;
        let mut finish = None;
        for child in children {
            self.update_dates(child);
            let task = self.project.task(child);
            start = earliest(start, task.start);
            finish = latest(finish, task.finish);
        }

        let task = self.project.task_mut(id);
        task.start = start;
        task.finish = finish;
    }

    // --- second pass ---

    fn process_predecessors(&mut self) {
        for edge in std::mem::take(&mut self.deferred_relations) {
            match edge.predecessor.and_then(|uuid| self.task_map.get(&uuid).copied()) {
                Some(predecessor) => self.project.add_relation(Relation {
                    predecessor,
                    successor: edge.successor,
                    relation_type: edge.relation_type,
                    lag: edge.lag,
                    calendar: edge
                        .calendar
                        .and_then(|uuid| self.calendar_map.get(&uuid).copied()),
                }),
                None => debug!(
                    "Dropping predecessor {:?} of task {:?}: no such task",
                    edge.predecessor, edge.successor
                ),
            }
        }
    }

    fn process_assignments(&mut self) {
        for edge in std::mem::take(&mut self.deferred_assignments) {
            match edge.resource.and_then(|uuid| self.resource_map.get(&uuid).copied()) {
                Some(resource) => self.project.add_assignment(ResourceAssignment {
                    task: edge.task,
                    resource,
                    units: edge.units,
                }),
                None => debug!(
                    "Dropping assignment of resource {:?} to task {:?}: no such resource",
                    edge.resource, edge.task
                ),
            }
        }
    }
}

fn process_day_types(rows: &[Row]) -> HashMap<Uuid, Vec<TimeRange>> {
    let mut map = HashMap::new();
    for row in rows {
        let Some(uuid) = row.get_uuid("UUID") else {
            continue;
        };
        let ranges = row
            .get_rows("TIME_RANGES")
            .iter()
            .filter_map(|range| Some(TimeRange::new(range.get_time("START")?, range.get_time("END")?)))
            .collect();
        map.insert(uuid, ranges);
    }
    map
}

/// Maps a Synchro constraint code to a constraint type and the date it applies to.
pub fn map_constraint(
    code: i64,
    start: Option<NaiveDateTime>,
    early: Option<NaiveDateTime>,
    late: Option<NaiveDateTime>,
) -> (Option<ConstraintType>, Option<NaiveDateTime>) {
    match code {
        // Cannot reschedule
        2 => (Some(ConstraintType::MustStartOn), start),
        3 => (Some(ConstraintType::AsSoonAsPossible), None),
        4 => (Some(ConstraintType::AsLateAsPossible), None),
        // Start on, finish on, mandatory start
        5 | 9 | 13 => (Some(ConstraintType::MustStartOn), early),
        6 => (Some(ConstraintType::StartNoLaterThan), early),
        // Start between
        8 => (Some(ConstraintType::AsSoonAsPossible), early),
        10 => (Some(ConstraintType::FinishNoEarlierThan), early),
        11 => (Some(ConstraintType::FinishNoLaterThan), late),
        // Finish between
        12 => (Some(ConstraintType::MustFinishOn), late),
        14 => (Some(ConstraintType::MustFinishOn), early),
        // Work between
        15 => (Some(ConstraintType::StartNoEarlierThan), early),
        _ => (None, None),
    }
}

pub fn relation_type(code: Option<i64>) -> RelationType {
    match code {
        Some(1) => RelationType::StartStart,
        Some(2) => RelationType::FinishFinish,
        Some(3) => RelationType::StartFinish,
        _ => RelationType::FinishStart,
    }
}

/// Joins commentary rows into note text.
fn notes(rows: &[Row]) -> Option<String> {
    if rows.is_empty() {
        return None;
    }
    let mut text = String::new();
    for row in rows {
        text.push_str(row.get_string("TITLE").unwrap_or_default());
        text.push('\n');
        text.push_str(row.get_string("TEXT").unwrap_or_default());
        text.push_str("\n\n");
    }
    Some(text)
}

fn sort_by_name(rows: &[Row]) -> Vec<&Row> {
    let mut sorted: Vec<&Row> = rows.iter().collect();
    sorted.sort_by(|a, b| a.get_string("NAME").cmp(&b.get_string("NAME")));
    sorted
}

fn owned(value: Option<&str>) -> Option<String> {
    value.map(str::to_string)
}

fn earliest(a: Option<NaiveDateTime>, b: Option<NaiveDateTime>) -> Option<NaiveDateTime> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, b) => a.or(b),
    }
}

fn latest(a: Option<NaiveDateTime>, b: Option<NaiveDateTime>) -> Option<NaiveDateTime> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.max(b)),
        (a, b) => a.or(b),
    }
}

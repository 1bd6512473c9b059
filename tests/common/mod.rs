//! Synthetic SP file writer for the integration tests.
//!
//! Produces byte-exact encodings of every entity layout the reader knows, so
//! tests can describe a schedule as plain structs and decode it back.
#![allow(dead_code)]

use std::io::Write;

use chrono::{NaiveDate, NaiveDateTime};
use flate2::write::ZlibEncoder;
use flate2::Compression;
use uuid::Uuid;

use synchro_reader::synchro::entities::magic;
use synchro_reader::synchro::table::{TABLE_CLOSE_MAGIC, TABLE_OPEN_MAGIC};

pub const NULL_SECONDS: u32 = 0x9340_6FFF;

pub fn dt(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|date| date.and_hms_opt(hour, minute, 0))
        .expect("valid test date")
}

pub fn id(n: u128) -> Uuid {
    Uuid::from_u128(n)
}

#[derive(Debug, Default)]
pub struct Writer {
    buf: Vec<u8>,
}

impl Writer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn bytes(&mut self, bytes: &[u8]) -> &mut Self {
        self.buf.extend_from_slice(bytes);
        self
    }

    pub fn zeros(&mut self, count: usize) -> &mut Self {
        self.buf.resize(self.buf.len() + count, 0);
        self
    }

    pub fn u8(&mut self, value: u8) -> &mut Self {
        self.buf.push(value);
        self
    }

    pub fn bool(&mut self, value: bool) -> &mut Self {
        self.u8(value as u8)
    }

    pub fn u16(&mut self, value: u16) -> &mut Self {
        self.bytes(&value.to_le_bytes())
    }

    pub fn i32(&mut self, value: i32) -> &mut Self {
        self.bytes(&value.to_le_bytes())
    }

    pub fn u32(&mut self, value: u32) -> &mut Self {
        self.bytes(&value.to_le_bytes())
    }

    pub fn i64(&mut self, value: i64) -> &mut Self {
        self.bytes(&value.to_le_bytes())
    }

    pub fn f64(&mut self, value: f64) -> &mut Self {
        self.bytes(&value.to_le_bytes())
    }

    pub fn string(&mut self, value: Option<&str>) -> &mut Self {
        let bytes = value.unwrap_or_default().as_bytes();
        if bytes.len() < 0xFF {
            self.u8(0x01).u8(bytes.len() as u8)
        } else {
            self.u8(0xFF).u16(bytes.len() as u16)
        };
        self.bytes(bytes)
    }

    pub fn utf16_string(&mut self, value: &str) -> &mut Self {
        let units: Vec<u16> = value.encode_utf16().collect();
        self.u8(0xFF).u16(0xFFFE).u8(units.len() as u8);
        for unit in units {
            self.u16(unit);
        }
        self
    }

    pub fn uuid(&mut self, value: Uuid) -> &mut Self {
        self.bytes(&value.to_bytes_le())
    }

    pub fn date(&mut self, value: Option<NaiveDateTime>) -> &mut Self {
        match value {
            Some(date) => self.i32((date.and_utc().timestamp() + 3600) as i32),
            None => self.u32(NULL_SECONDS),
        }
    }

    pub fn time(&mut self, hour: u32, minute: u32) -> &mut Self {
        self.u32(86_400 + hour * 3600 + minute * 60)
    }

    pub fn duration(&mut self, hours: Option<f64>) -> &mut Self {
        match hours {
            Some(hours) => self.u32((hours * 3600.0) as u32),
            None => self.u32(NULL_SECONDS),
        }
    }

    /// Table framing around one `write` call per item.
    pub fn table<T>(&mut self, items: &[T], mut write: impl FnMut(&mut Writer, &T)) -> &mut Self {
        self.u32(TABLE_OPEN_MAGIC).u32(items.len() as u32);
        for item in items {
            write(self, item);
        }
        self.u32(TABLE_CLOSE_MAGIC)
    }

    /// Row magic, reserved block and UUID.
    pub fn row_header(&mut self, row_magic: u32, uuid: Uuid) -> &mut Self {
        self.u32(row_magic).zeros(16).uuid(uuid)
    }

    pub fn conditional<T>(
        &mut self,
        items: &Option<Vec<T>>,
        write: impl FnMut(&mut Writer, &T),
    ) -> &mut Self {
        match items {
            Some(items) => self.bool(true).table(items, write),
            None => self.bool(false),
        }
    }
}

// --- entities ---

#[derive(Debug, Clone, Default)]
pub struct DayTypeFixture {
    pub uuid: Uuid,
    pub name: String,
    /// (start hour, start minute, end hour, end minute)
    pub ranges: Vec<(u32, u32, u32, u32)>,
}

impl DayTypeFixture {
    pub fn write(&self, w: &mut Writer) {
        w.row_header(magic::DAY_TYPE, self.uuid)
            .string(Some(self.name.as_str()))
            .zeros(4)
            .u32(self.ranges.len() as u32);
        for &(sh, sm, eh, em) in &self.ranges {
            w.time(sh, sm).time(eh, em);
        }
        w.zeros(4);
    }
}

#[derive(Debug, Clone, Default)]
pub struct CalendarFixture {
    pub uuid: Uuid,
    pub name: String,
    /// Day type per weekday, Sunday first.
    pub weekdays: [Uuid; 7],
    pub assignments: Vec<(Option<NaiveDateTime>, Uuid)>,
    pub day_types: Vec<DayTypeFixture>,
}

impl CalendarFixture {
    /// Monday to Friday `work`, weekends `off`, with both day types defined.
    pub fn weekly(uuid: Uuid, name: &str, work: DayTypeFixture, off: DayTypeFixture) -> Self {
        let mut weekdays = [work.uuid; 7];
        weekdays[0] = off.uuid;
        weekdays[6] = off.uuid;
        Self {
            uuid,
            name: name.to_string(),
            weekdays,
            assignments: Vec::new(),
            day_types: vec![work, off],
        }
    }

    pub fn write(&self, w: &mut Writer) {
        w.row_header(magic::CALENDAR, self.uuid)
            .string(Some(self.name.as_str()))
            .zeros(8);
        for uuid in self.weekdays {
            w.uuid(uuid);
        }
        w.zeros(4);
        w.table(&self.assignments, |w, (date, day_type)| {
            w.u32(magic::DAY_TYPE_ASSIGNMENT).date(*date).uuid(*day_type);
        });
        w.table(&self.day_types, |w, day_type| day_type.write(w));
        w.zeros(8);
    }
}

pub fn working_day(uuid: Uuid) -> DayTypeFixture {
    DayTypeFixture {
        uuid,
        name: "Working".to_string(),
        ranges: vec![(8, 0, 12, 0), (13, 0, 17, 0)],
    }
}

pub fn day_off(uuid: Uuid) -> DayTypeFixture {
    DayTypeFixture {
        uuid,
        name: "Off".to_string(),
        ranges: Vec::new(),
    }
}

#[derive(Debug, Clone, Default)]
pub struct CommentaryFixture {
    pub title: String,
    pub text: String,
}

fn write_commentary(w: &mut Writer, commentary: &CommentaryFixture) {
    w.row_header(magic::COMMENTARY, Uuid::nil())
        .string(Some(commentary.title.as_str()))
        .string(Some(commentary.text.as_str()))
        .zeros(4);
}

fn write_user_field(w: &mut Writer, field: &(String, u16, String)) {
    w.u32(magic::USER_FIELD)
        .string(Some(field.0.as_str()))
        .u16(field.1)
        .string(Some(field.2.as_str()));
}

#[derive(Debug, Clone, Default)]
pub struct ResourceFixture {
    pub uuid: Uuid,
    pub name: Option<String>,
    pub id: Option<String>,
    pub description: Option<String>,
    pub supply_reference: Option<String>,
    pub email: Option<String>,
    pub url: Option<String>,
    pub commentary: Option<Vec<CommentaryFixture>>,
    pub user_fields: Option<Vec<(String, u16, String)>>,
    pub children: Vec<ResourceFixture>,
}

impl ResourceFixture {
    pub fn named(uuid: Uuid, name: &str) -> Self {
        Self {
            uuid,
            name: Some(name.to_string()),
            ..Self::default()
        }
    }

    pub fn write(&self, w: &mut Writer) {
        w.row_header(magic::RESOURCE, self.uuid)
            .string(self.name.as_deref())
            .string(self.id.as_deref())
            .zeros(6)
            .string(self.description.as_deref())
            .string(self.supply_reference.as_deref())
            .string(self.email.as_deref())
            .string(self.url.as_deref())
            .zeros(12)
            .conditional(&self.commentary, write_commentary)
            .conditional(&self.user_fields, write_user_field)
            .table(&self.children, |w, child| child.write(w))
            .zeros(4);
    }
}

#[derive(Debug, Clone, Default)]
pub struct CompanyFixture {
    pub uuid: Uuid,
    pub name: String,
    pub resources: Vec<ResourceFixture>,
}

impl CompanyFixture {
    pub fn write(&self, w: &mut Writer) {
        w.row_header(magic::COMPANY, self.uuid)
            .string(Some(self.name.as_str()))
            .zeros(8)
            .table(&self.resources, |w, resource| resource.write(w))
            .zeros(4);
    }
}

#[derive(Debug, Clone, Default)]
pub struct PredecessorFixture {
    pub task: Uuid,
    pub relation_type: i32,
    pub lag_is_negative: bool,
    pub lag_hours: Option<f64>,
    pub calendar: Uuid,
}

#[derive(Debug, Clone)]
pub struct TaskFixture {
    pub uuid: Uuid,
    pub id: Option<String>,
    pub name: Option<String>,
    pub status: i32,
    pub start: Option<NaiveDateTime>,
    pub duration_hours: Option<f64>,
    pub remaining_hours: Option<f64>,
    pub actual_start: Option<NaiveDateTime>,
    pub actual_finish: Option<NaiveDateTime>,
    pub planned_finish: Option<NaiveDateTime>,
    pub estimated_finish: Option<NaiveDateTime>,
    pub calendar: Uuid,
    pub constraint_type: i32,
    pub constraint_early: Option<NaiveDateTime>,
    pub constraint_late: Option<NaiveDateTime>,
    pub percent_complete: f64,
    pub url: Option<String>,
    pub commentary: Option<Vec<CommentaryFixture>>,
    pub user_fields: Option<Vec<(String, u16, String)>>,
    /// (name, quantity, amount)
    pub costs: Vec<(String, i64, f64)>,
    /// (resource, units)
    pub assignments: Vec<(Uuid, f64)>,
    pub predecessors: Vec<PredecessorFixture>,
    /// Opaque 12-byte records.
    pub unknown: Vec<[u8; 12]>,
    pub children: Vec<TaskFixture>,
}

impl Default for TaskFixture {
    fn default() -> Self {
        Self {
            uuid: Uuid::nil(),
            id: None,
            name: None,
            // Planned
            status: 1,
            start: None,
            duration_hours: None,
            remaining_hours: None,
            actual_start: None,
            actual_finish: None,
            planned_finish: None,
            estimated_finish: None,
            calendar: Uuid::nil(),
            constraint_type: 0,
            constraint_early: None,
            constraint_late: None,
            percent_complete: 0.0,
            url: None,
            commentary: None,
            user_fields: None,
            costs: Vec::new(),
            assignments: Vec::new(),
            predecessors: Vec::new(),
            unknown: Vec::new(),
            children: Vec::new(),
        }
    }
}

impl TaskFixture {
    pub fn named(uuid: Uuid, name: &str) -> Self {
        Self {
            uuid,
            name: Some(name.to_string()),
            ..Self::default()
        }
    }

    pub fn write(&self, w: &mut Writer) {
        w.row_header(magic::TASK, self.uuid)
            .string(self.id.as_deref())
            .string(self.name.as_deref())
            .zeros(12)
            .i32(self.status)
            .date(self.start)
            .duration(self.duration_hours)
            .duration(self.remaining_hours)
            .date(self.actual_start)
            .date(self.actual_finish)
            .date(self.planned_finish)
            .date(self.estimated_finish)
            .uuid(self.calendar)
            .i32(self.constraint_type)
            .date(self.constraint_early)
            .date(self.constraint_late)
            .f64(self.percent_complete)
            .zeros(16)
            .string(self.url.as_deref())
            .conditional(&self.commentary, write_commentary)
            .conditional(&self.user_fields, write_user_field)
            .table(&self.costs, |w, (name, quantity, amount)| {
                w.row_header(magic::COST, Uuid::nil())
                    .string(Some(name.as_str()))
                    .i64(*quantity)
                    .f64(*amount)
                    .zeros(8);
            })
            .table(&self.assignments, |w, (resource, units)| {
                w.row_header(magic::RESOURCE_ASSIGNMENT, Uuid::nil())
                    .uuid(*resource)
                    .zeros(8)
                    .f64(*units)
                    .zeros(4);
            })
            .table(&self.predecessors, |w, predecessor| {
                w.row_header(magic::PREDECESSOR, Uuid::nil())
                    .uuid(predecessor.task)
                    .i32(predecessor.relation_type)
                    .bool(predecessor.lag_is_negative)
                    .duration(predecessor.lag_hours)
                    .uuid(predecessor.calendar)
                    .zeros(8);
            })
            .table(&self.unknown, |w, record| {
                w.u32(magic::TASK_UNKNOWN).bytes(record);
            })
            .table(&self.children, |w, child| child.write(w))
            .zeros(4);
    }
}

// --- tables and container ---

pub fn calendars_table(calendars: &[CalendarFixture], default: Uuid) -> Vec<u8> {
    let mut w = Writer::new();
    w.table(calendars, |w, calendar| calendar.write(w)).uuid(default);
    w.into_bytes()
}

pub fn companies_table(companies: &[CompanyFixture]) -> Vec<u8> {
    let mut w = Writer::new();
    w.table(companies, |w, company| company.write(w));
    w.into_bytes()
}

pub fn resources_table(resources: &[ResourceFixture]) -> Vec<u8> {
    let mut w = Writer::new();
    w.table(resources, |w, resource| resource.write(w));
    w.into_bytes()
}

pub fn tasks_table(tasks: &[TaskFixture]) -> Vec<u8> {
    let mut w = Writer::new();
    w.table(tasks, |w, task| task.write(w));
    w.into_bytes()
}

pub fn compress(data: &[u8]) -> Vec<u8> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).expect("write to memory");
    encoder.finish().expect("finish zlib stream")
}

/// One table as stored: its name and already compressed payload.
#[derive(Debug, Clone)]
pub struct StoredTable {
    pub name: String,
    pub payload: Vec<u8>,
    /// Padding written before the table, not covered by the previous table's length.
    pub gap: usize,
}

impl StoredTable {
    pub fn new(name: &str, data: &[u8]) -> Self {
        Self {
            name: name.to_string(),
            payload: compress(data),
            gap: 0,
        }
    }

    pub fn raw(name: &str, payload: Vec<u8>) -> Self {
        Self {
            name: name.to_string(),
            payload,
            gap: 0,
        }
    }
}

fn string_size(name: &str) -> usize {
    if name.len() < 0xFF {
        2 + name.len()
    } else {
        3 + name.len()
    }
}

/// Encodes a complete file: header, version, directory and tables.
///
/// The directory lists the tables in reverse storage order, so readers have to
/// sort it. `offset_adjust` is added to every directory offset.
pub fn build_file_with(version: &str, tables: &[StoredTable], offset_adjust: i64) -> Vec<u8> {
    let mut w = Writer::new();
    w.zeros(20).string(Some(version));

    let mut offset = w.len() + (tables.len() + 1) * 48;
    let mut offsets = Vec::new();
    for table in tables {
        offset += table.gap;
        offsets.push(offset);
        offset += string_size(&table.name) + table.payload.len();
    }

    for (table, &offset) in tables.iter().zip(&offsets).rev() {
        let mut entry = [0u8; 48];
        entry[..table.name.len()].copy_from_slice(table.name.as_bytes());
        let offset = (offset as i64 + offset_adjust) as u32;
        entry[40..44].copy_from_slice(&offset.to_le_bytes());
        w.bytes(&entry);
    }
    w.zeros(48);

    for table in tables {
        w.zeros(table.gap).string(Some(table.name.as_str())).bytes(&table.payload);
    }
    w.into_bytes()
}

pub fn build_file(version: &str, tables: &[StoredTable]) -> Vec<u8> {
    build_file_with(version, tables, 0)
}

/// A whole schedule as the tests describe it.
#[derive(Debug, Clone)]
pub struct ProjectFixture {
    pub version: String,
    pub calendars: Vec<CalendarFixture>,
    pub default_calendar: Uuid,
    pub companies: Vec<CompanyFixture>,
    pub resources: Vec<ResourceFixture>,
    pub tasks: Vec<TaskFixture>,
}

pub const STANDARD_CALENDAR: u128 = 0xC000;
pub const WORKING_DAY: u128 = 0xD001;
pub const DAY_OFF: u128 = 0xD002;

impl Default for ProjectFixture {
    fn default() -> Self {
        let calendar = CalendarFixture::weekly(
            id(STANDARD_CALENDAR),
            "Standard",
            working_day(id(WORKING_DAY)),
            day_off(id(DAY_OFF)),
        );
        Self {
            version: "6.2.0".to_string(),
            calendars: vec![calendar],
            default_calendar: id(STANDARD_CALENDAR),
            companies: Vec::new(),
            resources: Vec::new(),
            tasks: Vec::new(),
        }
    }
}

impl ProjectFixture {
    pub fn to_bytes(&self) -> Vec<u8> {
        build_file(
            &self.version,
            &[
                StoredTable::new("Calendars", &calendars_table(&self.calendars, self.default_calendar)),
                StoredTable::new("Companies", &companies_table(&self.companies)),
                StoredTable::new("Resources", &resources_table(&self.resources)),
                StoredTable::new("Tasks", &tasks_table(&self.tasks)),
            ],
        )
    }
}

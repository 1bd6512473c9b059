use std::env;

use synchro_reader::{LogSink, ProjectFile, ResourceId, SynchroReader, TaskId};

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <path-to-sp-file> [--rows]", args[0]);
        std::process::exit(1);
    }

    let sp_path = &args[1];
    let dump_rows = args.iter().skip(2).any(|arg| arg == "--rows");

    println!("Reading Synchro file: {}", sp_path);
    println!("{}", "=".repeat(60));

    let sink = LogSink;
    let mut reader = SynchroReader::new();
    if dump_rows {
        reader = reader.with_sink(&sink);
    }

    match reader.read_file(sp_path) {
        Ok(project) => print_project(&project),
        Err(e) => {
            eprintln!("\nERROR: Failed to read Synchro file");
            eprintln!("  {}", e);
            std::process::exit(1);
        }
    }
}

fn print_project(project: &ProjectFile) {
    let properties = project.properties();
    println!("\nProject Information:");
    println!("  Application: {}", properties.file_application);
    println!("  File type: {}", properties.file_type);
    println!("  Version: {}", properties.version.as_deref().unwrap_or("-"));

    println!("\nCalendars:");
    let default = project.default_calendar_id();
    for (index, calendar) in project.calendars().iter().enumerate() {
        let marker = if default.map(|id| id.0) == Some(index) { " (default)" } else { "" };
        println!(
            "  {}{}: {} exceptions",
            calendar.name.as_deref().unwrap_or("<unnamed>"),
            marker,
            calendar.exceptions().len()
        );
    }

    println!("\nResources:");
    for &id in project.child_resources() {
        print_resource(project, id, 1);
    }

    println!("\nTasks:");
    for &id in project.child_tasks() {
        print_task(project, id, 1);
    }

    println!("\nStatistics:");
    println!("  Tasks: {}", project.tasks().len());
    println!("  Resources: {}", project.resources().len());
    println!("  Relations: {}", project.relations().len());
    println!("  Assignments: {}", project.assignments().len());
}

fn print_resource(project: &ProjectFile, id: ResourceId, depth: usize) {
    let resource = project.resource(id);
    println!(
        "{}{}",
        "  ".repeat(depth),
        resource.name.as_deref().unwrap_or("<unnamed>")
    );
    for &child in &resource.children {
        print_resource(project, child, depth + 1);
    }
}

fn print_task(project: &ProjectFile, id: TaskId, depth: usize) {
    let task = project.task(id);
    let date = |value: Option<chrono::NaiveDateTime>| {
        value.map(|date| date.to_string()).unwrap_or_else(|| "-".to_string())
    };
    println!(
        "{}[{}] {} {} .. {}{}",
        "  ".repeat(depth),
        task.activity_id.as_deref().unwrap_or("-"),
        task.name.as_deref().unwrap_or("<unnamed>"),
        date(task.start),
        date(task.finish),
        if task.milestone { " (milestone)" } else { "" }
    );
    for &child in &task.children {
        print_task(project, child, depth + 1);
    }
}

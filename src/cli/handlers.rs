use std::env;
use std::io;
use std::path::PathBuf;

use chrono::{DateTime, Local, NaiveDate};

use super::commands::{AddArgs, ListArgs, PeriodArgs, UpdateArgs};
use crate::config::Config;
use crate::dates::{delivery_overdue_days, parse_price, relative_time, remaining_time};
use crate::entity::{NewProject, NoteTag, Project, ProjectUpdate};
use crate::error::{DpccError, Result};
use crate::query::{parse_filter, parse_month, query, stats, Tab, ViewParams};
use crate::storage::LoroStore;
use crate::store::ProjectStore;

/// Find the project root by looking for .dpcc/ or .git/
fn find_project_root() -> PathBuf {
    let cwd = env::current_dir().unwrap_or_else(|_| PathBuf::from("."));

    let mut current = cwd.as_path();
    loop {
        if current.join(".dpcc").exists() || current.join(".git").exists() {
            return current.to_path_buf();
        }
        match current.parent() {
            Some(parent) => current = parent,
            None => return cwd,
        }
    }
}

fn open_store() -> Result<(ProjectStore<LoroStore>, Config)> {
    let root = find_project_root();
    let kv = LoroStore::open(&root)?;
    let config = Config::load(kv.dpcc_dir())?;
    let store = ProjectStore::open(kv, config.storage_key.clone());
    Ok((store, config))
}

fn parse_enum<T>(field: &str, value: &str) -> Result<T>
where
    T: std::str::FromStr<Err = String>,
{
    value.parse().map_err(|_| DpccError::invalid(field, value))
}

fn parse_date(field: &str, value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| DpccError::invalid(field, value))
}

/// Empty input clears an optional text field.
fn optional_text(value: Option<String>) -> Option<Option<String>> {
    value.map(|v| {
        let trimmed = v.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    })
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn deadline_label(project: &Project, now: &DateTime<Local>) -> String {
    if let Some(delivered_at) = project.delivered_at.filter(|_| project.is_delivered()) {
        let day = delivered_at.with_timezone(&Local).format("%b %d");
        return match delivery_overdue_days(project, &Local) {
            Some(days) => format!("delivered {} (overdue {}d)", day, days),
            None => format!("delivered {}", day),
        };
    }

    let remaining = remaining_time(project.end_date, now);
    if remaining.is_overdue {
        let unit = if remaining.days == 1 { "day" } else { "days" };
        format!("overdue by {} {}", remaining.days, unit)
    } else {
        format!(
            "{}d {}h {}m left",
            remaining.days, remaining.hours, remaining.minutes
        )
    }
}

fn print_project_line(project: &Project, now: &DateTime<Local>) {
    println!(
        "  {} [{}|{}] {} - {}  ${}  {}  (updated {})",
        project.short_id(),
        project.priority,
        project.stage,
        project.title,
        project.client_name,
        project.price,
        deadline_label(project, now),
        relative_time(&project.last_updated_at, now)
    );
}

fn print_project_detail(project: &Project, now: &DateTime<Local>) {
    println!("Project {} ({})", project.short_id(), project.id);
    println!("Title: {}", project.title);
    println!("Client: {}", project.client_name);
    println!("Status: {}", project.status);
    println!("Stage: {}", project.stage);
    println!("Priority: {}", project.priority);
    println!("Price: ${}", project.price);
    println!("Dates: {} -> {}", project.start_date, project.end_date);
    println!("Deadline: {}", deadline_label(project, now));
    println!("Created: {}", project.created_at.with_timezone(&Local).format("%Y-%m-%d %H:%M"));
    println!("Updated: {}", relative_time(&project.last_updated_at, now));
    if let Some(ref link) = project.website_link {
        println!("Website: {}", link);
    }
    if !project.notes.is_empty() {
        println!("Notes: {}", project.notes.len());
    }
    if let Some(ref description) = project.description {
        println!("\n{}", description);
    }
}

fn view_params(period: &PeriodArgs, config: &Config, now: &DateTime<Local>) -> Result<ViewParams> {
    let mut params = ViewParams::current(now);
    params.tab = match period.tab {
        Some(ref tab) => parse_enum("tab", tab)?,
        None => config.default_tab,
    };
    params.sort_by = config.default_sort;
    if let Some(ref month) = period.month {
        params.month = parse_month(month).map_err(|_| DpccError::invalid("month", month.as_str()))?;
    }
    if let Some(year) = period.year {
        params.year = year;
    }
    Ok(params)
}

pub fn handle_init() -> Result<()> {
    let root = env::current_dir()?;

    let kv = LoroStore::init(&root)?;
    Config::default().save(kv.dpcc_dir())?;

    println!("Initialized dpcc project in {}", root.display());
    Ok(())
}

pub fn handle_add(args: AddArgs) -> Result<()> {
    let (mut store, _) = open_store()?;

    let end_date = parse_date("end date", &args.end)?;
    let start_date = match args.start {
        Some(ref start) => parse_date("start date", start)?,
        None => Local::now().date_naive(),
    };

    let mut data = NewProject::new(args.title, args.client, start_date, end_date);
    data.price = parse_price(&args.price);
    data.priority = parse_enum("priority", &args.priority)?;
    data.stage = parse_enum("stage", &args.stage)?;
    data.status = parse_enum("status", &args.status)?;
    data.description = optional_text(args.description).flatten();
    data.website_link = optional_text(args.website).flatten();

    let project = store.create(data)?;

    if args.json {
        print_json(&project)?;
    } else {
        println!("Created project {} - {}", project.short_id(), project.title);
    }
    Ok(())
}

pub fn handle_list(args: ListArgs) -> Result<()> {
    let (store, config) = open_store()?;
    let now = Local::now();

    let mut params = view_params(&args.period, &config, &now)?;
    params.stage = parse_filter(&args.stage).map_err(|_| DpccError::invalid("stage", args.stage.as_str()))?;
    params.priority =
        parse_filter(&args.priority).map_err(|_| DpccError::invalid("priority", args.priority.as_str()))?;
    if let Some(ref sort) = args.sort {
        params.sort_by = parse_enum("sort order", sort)?;
    }
    params.only_overdue = args.overdue;

    let view = query(store.projects(), &params, &now);

    if args.period.json {
        return print_json(&view);
    }
    if view.is_empty() {
        println!("No projects found.");
        return Ok(());
    }

    for (i, group) in view.groups.iter().enumerate() {
        if i > 0 {
            println!();
        }
        let noun = if group.projects.len() == 1 { "Project" } else { "Projects" };
        println!("{} ({} {})\n", group.status, group.projects.len(), noun);
        for project in &group.projects {
            print_project_line(project, &now);
        }
    }
    Ok(())
}

pub fn handle_stats(args: PeriodArgs) -> Result<()> {
    let (store, config) = open_store()?;
    let now = Local::now();

    let params = view_params(&args, &config, &now)?;
    let summary = stats(store.projects(), &params, &Local);

    if args.json {
        return print_json(&summary);
    }

    println!("Running Projects:  {}", summary.running);
    println!("Delivered:         {}", summary.delivered);
    println!("Revision Projects: {}", summary.revision);
    if params.tab != Tab::Revision {
        println!("{}: ${}", summary.tab_total_label, summary.tab_total);
    }
    Ok(())
}

pub fn handle_get(id: String, json: bool) -> Result<()> {
    let (store, _) = open_store()?;
    let project = store.resolve(&id)?;

    if json {
        print_json(project)
    } else {
        print_project_detail(project, &Local::now());
        Ok(())
    }
}

pub fn handle_update(args: UpdateArgs) -> Result<()> {
    let (mut store, _) = open_store()?;
    let id = store.resolve(&args.id)?.id;

    let updates = ProjectUpdate {
        title: args.title,
        client_name: args.client,
        description: optional_text(args.description),
        price: args.price.as_deref().map(parse_price),
        priority: args
            .priority
            .as_deref()
            .map(|p| parse_enum("priority", p))
            .transpose()?,
        start_date: args
            .start
            .as_deref()
            .map(|d| parse_date("start date", d))
            .transpose()?,
        end_date: args
            .end
            .as_deref()
            .map(|d| parse_date("end date", d))
            .transpose()?,
        stage: args.stage.as_deref().map(|s| parse_enum("stage", s)).transpose()?,
        status: args.status.as_deref().map(|s| parse_enum("status", s)).transpose()?,
        website_link: optional_text(args.website),
        notes: None,
    };

    let updated = store
        .update(&id, updates)?
        .ok_or_else(|| DpccError::ProjectNotFound(args.id.clone()))?;

    if args.json {
        print_json(&updated)?;
    } else {
        println!("Updated project {} - {}", updated.short_id(), updated.title);
    }
    Ok(())
}

pub fn handle_touch(id: String) -> Result<()> {
    let (mut store, _) = open_store()?;
    let project_id = store.resolve(&id)?.id;

    let touched = store
        .touch(&project_id)?
        .ok_or_else(|| DpccError::ProjectNotFound(id.clone()))?;

    println!("Touched project {} - {}", touched.short_id(), touched.title);
    Ok(())
}

pub fn handle_deliver(id: String, json: bool) -> Result<()> {
    let (mut store, _) = open_store()?;
    let project_id = store.resolve(&id)?.id;

    let delivered = store
        .deliver(&project_id)?
        .ok_or_else(|| DpccError::ProjectNotFound(id.clone()))?;

    if json {
        print_json(&delivered)?;
    } else {
        println!("Delivered project {} - {}", delivered.short_id(), delivered.title);
    }
    Ok(())
}

pub fn handle_reopen(id: String, json: bool) -> Result<()> {
    let (mut store, _) = open_store()?;
    let project_id = store.resolve(&id)?.id;

    let reopened = store
        .reopen(&project_id)?
        .ok_or_else(|| DpccError::ProjectNotFound(id.clone()))?;

    if json {
        print_json(&reopened)?;
    } else {
        println!("Reopened project {} for revision - {}", reopened.short_id(), reopened.title);
    }
    Ok(())
}

pub fn handle_delete(id: String, force: bool) -> Result<()> {
    let (mut store, _) = open_store()?;
    let project = store.resolve(&id)?.clone();

    // Confirm deletion unless --force is used
    if !force {
        eprintln!(
            "Delete project {} - {}? [y/N] ",
            project.short_id(),
            project.title
        );

        if atty::is(atty::Stream::Stdin) {
            let mut input = String::new();
            io::stdin().read_line(&mut input)?;
            if !input.trim().eq_ignore_ascii_case("y") {
                println!("Cancelled.");
                return Ok(());
            }
        } else {
            return Err(DpccError::Storage(
                "Use --force to delete in non-interactive mode".to_string(),
            ));
        }
    }

    store.delete(&project.id)?;

    println!("Deleted project {} - {}", project.short_id(), project.title);
    Ok(())
}

pub fn handle_note_add(id: String, content: String, tags: Vec<String>, json: bool) -> Result<()> {
    let (mut store, _) = open_store()?;
    let project_id = store.resolve(&id)?.id;

    let mut parsed = tags
        .iter()
        .map(|t| parse_enum::<NoteTag>("note tag", t))
        .collect::<Result<Vec<_>>>()?;
    if parsed.is_empty() {
        parsed.push(NoteTag::Clarification);
    }

    let Some(updated) = store.add_note(&project_id, &content, parsed)? else {
        return Err(DpccError::invalid("note content", content));
    };

    if json {
        if let Some(note) = updated.notes.last() {
            print_json(note)?;
        }
    } else {
        println!(
            "Added note to {} - {} ({} notes)",
            updated.short_id(),
            updated.title,
            updated.notes.len()
        );
    }
    Ok(())
}

pub fn handle_note_list(id: String, json: bool) -> Result<()> {
    let (store, _) = open_store()?;
    let project = store.resolve(&id)?;

    if json {
        return print_json(&project.notes);
    }
    if project.notes.is_empty() {
        println!("No notes yet.");
        return Ok(());
    }

    let now = Local::now();
    println!("Notes for {}:", project.title);
    for tag in NoteTag::ALL {
        let count = project.note_count(tag);
        if count == 0 {
            continue;
        }
        println!("\n{} ({})", tag, count);
        for note in project.notes.iter().filter(|n| n.has_tag(tag)) {
            println!("  [{}] {}", relative_time(&note.timestamp, &now), note.content);
        }
    }
    Ok(())
}

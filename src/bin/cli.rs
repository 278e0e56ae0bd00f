use std::io::{self, IsTerminal, Write};
use std::time::Instant;

use chrono::{Local, NaiveDate};
use timeline_planner::{
    DayEstimate, DragAction, DragOutcome, EngineConfig, WorkingDaySettings, Workspace,
    load_workspace_from_json, save_estimates_to_csv, save_estimates_to_json,
    save_workspace_to_json,
};
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .try_init();
}

fn parse_date(input: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(input, "%Y-%m-%d").ok()
}

fn render_estimates(estimates: &[DayEstimate]) -> String {
    if estimates.is_empty() {
        return "No estimates.".to_string();
    }
    let mut out = String::new();
    out.push_str("date        hours    source                phase\n");
    for estimate in estimates {
        let marker = if estimate.is_completed_event {
            " (completed)"
        } else if estimate.is_planned_event {
            " (planned)"
        } else {
            ""
        };
        out.push_str(&format!(
            "{}  {:>7.2}  {:<20}  {}{}\n",
            estimate.date,
            estimate.hours,
            estimate.source.as_str(),
            estimate.phase_id.as_deref().unwrap_or("-"),
            marker,
        ));
    }
    let total: f64 = estimates.iter().map(|e| e.hours).sum();
    out.push_str(&format!("total {:.2}h over {} row(s)", total, estimates.len()));
    out
}

fn print_help() {
    println!(
        "Commands:\n  help                               Show this help\n  load <json_path>                   Load a workspace snapshot\n  save <json_path>                   Save the workspace snapshot\n  config <json_path>                 Load engine configuration\n  projects                           List projects\n  workdays <YYYY-MM-DD> <YYYY-MM-DD> Count working days in a range\n  remaining <end> <today>            Working days after today up to end\n  occurrences <phase_id>             List occurrence dates of a recurring phase\n  estimates <project_id>             Show day estimates for a project\n  summary <project_id> [today]       Show hour totals for a project\n  export <csv|json> <project_id> <path>\n                                     Write day estimates to a file\n  drag <project_id> <move|start|end> <days>\n                                     Move or resize a project bar\n  quit|exit                          Exit"
    );
}

fn main() {
    init_tracing();
    let mut workspace = Workspace::new(WorkingDaySettings::standard_week());
    let mut cache = workspace.working_day_cache();

    println!("Timeline Planner (CLI) - type 'help' for commands\n");

    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("> ");
        let _ = io::stdout().flush();
        line.clear();
        match stdin.read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        let mut parts = input.split_whitespace();
        let cmd = parts.next().unwrap_or("");

        match cmd {
            "help" => print_help(),
            "quit" | "exit" => break,
            "load" => match parts.next() {
                Some(path) => match load_workspace_from_json(path) {
                    Ok(loaded) => {
                        workspace = loaded;
                        cache = workspace.working_day_cache();
                        println!(
                            "Workspace loaded from {} ({} project(s), {} phase(s), {} event(s), {} holiday(s)).",
                            path,
                            workspace.projects.len(),
                            workspace.phases.len(),
                            workspace.events.len(),
                            workspace.holidays.len(),
                        );
                    }
                    Err(e) => println!("Error loading workspace: {}", e),
                },
                None => println!("Usage: load <json_path>"),
            },
            "save" => match parts.next() {
                Some(path) => match save_workspace_to_json(&workspace, path) {
                    Ok(_) => println!("Workspace saved to {}.", path),
                    Err(e) => println!("Error saving workspace: {}", e),
                },
                None => println!("Usage: save <json_path>"),
            },
            "config" => match parts.next() {
                Some(path) => match EngineConfig::load_from_json(path) {
                    Ok(config) => {
                        workspace.config = config;
                        cache = workspace.working_day_cache();
                        println!("Configuration loaded from {}.", path);
                    }
                    Err(e) => println!("Error loading configuration: {}", e),
                },
                None => println!("Usage: config <json_path>"),
            },
            "projects" => {
                if workspace.projects.is_empty() {
                    println!("No projects.");
                }
                for project in &workspace.projects {
                    println!(
                        "{}  {}  {} -> {}  {:.2}h{}",
                        project.id,
                        project.name,
                        project.start_date,
                        project.end_date,
                        project.estimated_hours,
                        if project.continuous { "  continuous" } else { "" },
                    );
                }
            }
            "workdays" => match (parts.next().and_then(parse_date), parts.next().and_then(parse_date)) {
                (Some(start), Some(end)) => {
                    let summary = workspace.working_days_between(start, end);
                    println!(
                        "{} working day(s), {} holiday day(s), {} day(s) total.",
                        summary.working_day_count, summary.holiday_count, summary.total_days
                    );
                }
                _ => println!("Usage: workdays <YYYY-MM-DD> <YYYY-MM-DD>"),
            },
            "remaining" => match (parts.next().and_then(parse_date), parts.next().and_then(parse_date)) {
                (Some(end), Some(today)) => {
                    println!(
                        "{} working day(s) remaining.",
                        workspace.working_days_remaining(end, today)
                    );
                }
                _ => println!("Usage: remaining <end YYYY-MM-DD> <today YYYY-MM-DD>"),
            },
            "occurrences" => match parts.next() {
                Some(phase_id) => match workspace.phase_occurrences(phase_id, None) {
                    Ok(dates) if dates.is_empty() => println!("No occurrences."),
                    Ok(dates) => {
                        let listed: Vec<String> = dates.iter().map(|d| d.to_string()).collect();
                        println!("{}", listed.join("\n"));
                    }
                    Err(e) => println!("Error: {}", e),
                },
                None => println!("Usage: occurrences <phase_id>"),
            },
            "estimates" => match parts.next() {
                Some(project_id) => match workspace.project_estimates_cached(project_id, None, &cache) {
                    Ok(estimates) => println!("{}", render_estimates(&estimates)),
                    Err(e) => println!("Error: {}", e),
                },
                None => println!("Usage: estimates <project_id>"),
            },
            "summary" => {
                let project_id = parts.next();
                let today = match parts.next() {
                    Some(raw) => match parse_date(raw) {
                        Some(date) => date,
                        None => {
                            println!("Invalid date (YYYY-MM-DD)");
                            continue;
                        }
                    },
                    None => Local::now().date_naive(),
                };
                match project_id {
                    Some(project_id) => match workspace.project_summary(project_id, today, None) {
                        Ok(summary) => println!("{}", summary.to_cli_summary()),
                        Err(e) => println!("Error: {}", e),
                    },
                    None => println!("Usage: summary <project_id> [today]"),
                }
            }
            "export" => {
                let fmt = parts.next();
                let project_id = parts.next();
                let path = parts.next();
                match (fmt, project_id, path) {
                    (Some(fmt @ ("csv" | "json")), Some(project_id), Some(path)) => {
                        let estimates = match workspace.project_estimates_cached(project_id, None, &cache) {
                            Ok(estimates) => estimates,
                            Err(e) => {
                                println!("Error: {}", e);
                                continue;
                            }
                        };
                        let result = if fmt == "csv" {
                            save_estimates_to_csv(&estimates, path)
                        } else {
                            save_estimates_to_json(&estimates, path)
                        };
                        match result {
                            Ok(_) => println!("Exported {} estimate(s) to {}.", estimates.len(), path),
                            Err(e) => println!("Error exporting estimates: {}", e),
                        }
                    }
                    _ => println!("Usage: export <csv|json> <project_id> <path>"),
                }
            }
            "drag" => {
                let project_id = parts.next();
                let action = parts.next().map(str::parse::<DragAction>);
                let days = parts.next().map(str::parse::<i64>);
                match (project_id, action, days) {
                    (Some(project_id), Some(Ok(action)), Some(Ok(days))) => {
                        let mut controller = workspace.drag_controller();
                        let constraints = match workspace.begin_project_drag(
                            &mut controller,
                            project_id,
                            action,
                            None,
                        ) {
                            Ok(constraints) => constraints,
                            Err(e) => {
                                println!("Error: {}", e);
                                continue;
                            }
                        };
                        controller.pointer_move(days, &constraints, Instant::now());
                        match controller.release(&mut workspace) {
                            Ok(DragOutcome::Committed(state)) => println!(
                                "Project {} now spans {} -> {}.",
                                state.entity_id, state.candidate_start, state.candidate_end
                            ),
                            Ok(DragOutcome::Unchanged(state)) => {
                                println!("Project {} unchanged.", state.entity_id)
                            }
                            Ok(DragOutcome::Idle) => println!("No drag in progress."),
                            Err(e) => println!("Error: {}", e),
                        }
                    }
                    (_, Some(Err(e)), _) => println!("Error: {}", e),
                    _ => println!("Usage: drag <project_id> <move|start|end> <days>"),
                }
            }
            _ => {
                println!("Unknown command. Type 'help'.");
            }
        }
    }
}

//! duty-roster: weekly duty rostering and talk-assistant mapping.
//!
//! Usage:
//!   duty-roster roster availability.csv [--config roster.toml] [--out DIR] [--json FILE]
//!   duty-roster talks sessions.csv timetable.csv [--config roster.toml] [--out FILE]
//!   duty-roster web [port] [--config roster.toml]

use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};

use duty_roster::config::RosterConfig;
use duty_roster::display::{print_report, write_report_csv, write_report_json};
use duty_roster::parser::load_availability;
use duty_roster::report::build_roster;
use duty_roster::talks::{build_talk_rows, load_sessions, write_talk_rows, AssistantTimetable, TalkRules};
use duty_roster::web;

fn flag<'a>(args: &'a [String], name: &str) -> Option<&'a str> {
    args.windows(2).find(|w| w[0] == name).map(|w| w[1].as_str())
}

/// Arguments that are neither flags nor flag values.
fn positionals(args: &[String]) -> Vec<&str> {
    let mut out = Vec::new();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if arg.starts_with("--") {
            iter.next();
        } else {
            out.push(arg.as_str());
        }
    }
    out
}

fn load_config(args: &[String]) -> Result<RosterConfig> {
    match flag(args, "--config") {
        Some(path) => RosterConfig::load(path).with_context(|| format!("loading config {}", path)),
        None => Ok(RosterConfig::default()),
    }
}

fn run_roster(args: &[String]) -> Result<()> {
    let config = load_config(args)?;
    let Some(&input) = positionals(args).first() else {
        bail!("usage: duty-roster roster <availability.csv> [--config F] [--out DIR] [--json F]");
    };

    println!("Loading availability from {}...", input);
    let availability =
        load_availability(input, &config).with_context(|| format!("reading availability {}", input))?;
    let report = build_roster(&availability, &config);
    print_report(&report);

    let out_dir = PathBuf::from(flag(args, "--out").unwrap_or("roster_output"));
    let written = write_report_csv(&report, &out_dir)
        .with_context(|| format!("writing roster to {}", out_dir.display()))?;
    println!("\nRoster saved to:");
    for path in &written {
        println!("  - {}", path.display());
    }

    if let Some(json) = flag(args, "--json") {
        write_report_json(&report, Path::new(json)).with_context(|| format!("writing {}", json))?;
        println!("  - {}", json);
    }
    Ok(())
}

fn run_talks(args: &[String]) -> Result<()> {
    let config = load_config(args)?;
    let inputs = positionals(args);
    let (Some(&sessions_path), Some(&timetable_path)) = (inputs.first(), inputs.get(1)) else {
        bail!("usage: duty-roster talks <sessions.csv> <timetable.csv> [--config F] [--out F]");
    };

    let sessions = load_sessions(sessions_path).with_context(|| format!("reading sessions {}", sessions_path))?;
    let timetable =
        AssistantTimetable::load(timetable_path).with_context(|| format!("reading timetable {}", timetable_path))?;
    let rules = TalkRules::from_config(&config.talks)?;

    let rows = build_talk_rows(&sessions, &timetable, &rules);
    let out = flag(args, "--out").unwrap_or("talk_assistants.csv");
    write_talk_rows(&rows, out).with_context(|| format!("writing {}", out))?;
    println!("Assistants assigned for {} sessions, saved to {}", rows.len(), out);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(command) = args.first() else {
        bail!("usage: duty-roster <roster|talks|web> ...");
    };
    let rest = &args[1..];

    match command.as_str() {
        "roster" => run_roster(rest),
        "talks" => run_talks(rest),
        "web" => {
            let config = load_config(rest)?;
            let port = positionals(rest)
                .first()
                .and_then(|p| p.parse::<u16>().ok())
                .unwrap_or(8080);
            let password = std::env::var("ADMIN_PASSWORD").unwrap_or_else(|_| "admin123".to_string());

            log::info!("Starting web server on port {}", port);
            println!("Access the API at http://localhost:{}/api/roster", port);
            web::start_server(port, config, password).await?;
            Ok(())
        }
        other => bail!("unknown command '{}'", other),
    }
}

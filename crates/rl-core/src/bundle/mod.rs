//! The bundle reader (Component D, §6.1, §6.2) and its public inputs.

mod error;
mod helper;
pub mod schema;

use std::fs::File;
use std::io::Read as _;
use std::path::Path;

pub use error::LoadError;
use schema::BundleTables;

use crate::world::WorldHandle;

/// §6.1 inputs to a single bundle load.
pub struct LoadRequest<'a> {
    pub bundle_path: &'a Path,
    pub helper_command: Option<&'a Path>,
    pub ecosystem_repo: Option<&'a Path>,
    pub logger: Option<&'a dyn Logger>,
    pub goal_lookup: Option<&'a dyn GoalLookup>,
    pub cancel: Option<&'a dyn Fn() -> bool>,
}

/// A progress message or a non-fatal per-location diagnostic (§7
/// Parse-failure). One method, so implementors can be a closure-backed
/// adapter or mocked trivially in tests.
pub trait Logger {
    fn log(&self, event: LogEvent<'_>);
}

#[derive(Debug, Clone)]
pub enum LogEvent<'a> {
    Progress(&'a str),
    ParseFailure(&'a ParseDiagnostic),
}

/// §7: offending location, offending token index, and up to three tokens
/// of context on either side.
#[derive(Debug, Clone)]
pub struct ParseDiagnostic {
    pub location: String,
    pub token_index: usize,
    pub context_before: Vec<String>,
    pub context_after: Vec<String>,
}

/// §6.1 goal-lookup callback, used to disambiguate the victory location
/// when a bundle declares more than one.
pub trait GoalLookup {
    fn goal(&self) -> GoalRecord;
}

#[derive(Debug, Clone, Copy)]
pub struct GoalRecord {
    pub goal: i64,
}

/// Loads a bundle end to end: open the archive, extract or synthesise the
/// six JSON tables (§6.2), build the frozen tables (§4.6) and the
/// region-graph synthesis (§4.5), and return an immutable [`WorldHandle`].
pub fn load(request: &LoadRequest<'_>) -> Result<WorldHandle, LoadError> {
    log(request, LogEvent::Progress("opening bundle"));

    if !request.bundle_path.exists() {
        return Err(LoadError::BundleMissing(request.bundle_path.to_path_buf()));
    }

    let mut tables = read_archive(request.bundle_path)?;

    if tables.items.is_empty() && tables.locations.is_empty() {
        log(request, LogEvent::Progress("bundle has no precomputed tables, invoking helper"));
        let helper_command = request
            .helper_command
            .ok_or(LoadError::BundleEmpty)?;
        if is_cancelled(request) {
            return Err(LoadError::HelperFailure("load cancelled before helper ran".to_string()));
        }
        tables = helper::run_helper(
            helper_command,
            request.bundle_path,
            request.ecosystem_repo,
            request.cancel,
        )?;
        if tables.items.is_empty() && tables.locations.is_empty() {
            return Err(LoadError::BundleEmpty);
        }
    }

    if is_cancelled(request) {
        return Err(LoadError::HelperFailure("load cancelled before indexing".to_string()));
    }

    log(request, LogEvent::Progress("building index"));
    let diagnostic_sink = |diagnostic: ParseDiagnostic| {
        if let Some(logger) = request.logger {
            logger.log(LogEvent::ParseFailure(&diagnostic));
        }
    };
    let world = crate::index::build(&tables, request.goal_lookup, &diagnostic_sink);

    log(request, LogEvent::Progress("bundle loaded"));
    Ok(world)
}

fn log(request: &LoadRequest<'_>, event: LogEvent<'_>) {
    if let Some(logger) = request.logger {
        logger.log(event);
    }
}

fn is_cancelled(request: &LoadRequest<'_>) -> bool {
    request.cancel.map(|c| c()).unwrap_or(false)
}

const ENTRIES: [(&str, &str); 6] = [
    ("game", "/data/game.json"),
    ("items", "/data/items.json"),
    ("locations", "/data/locations.json"),
    ("categories", "/data/categories.json"),
    ("options", "/data/options.json"),
    ("regions", "/data/regions.json"),
];

/// Reads the six entries out of the zip archive by suffix match (§6.2:
/// "any prefix path is allowed"). Missing entries are left at their
/// `Default`, except `regions`, which stays `None` so the index builder can
/// tell "no region graph" apart from "empty region graph".
fn read_archive(path: &Path) -> Result<BundleTables, LoadError> {
    let file = File::open(path)?;
    let mut archive = zip::ZipArchive::new(file)?;

    let mut tables = BundleTables::default();
    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;
        let name = entry.name().to_string();
        let Some((table, _)) = ENTRIES.iter().find(|(_, suffix)| name.ends_with(suffix)) else {
            continue;
        };
        let mut contents = String::new();
        entry.read_to_string(&mut contents)?;
        assign_table(&mut tables, table, &contents)?;
    }
    Ok(tables)
}

fn assign_table(tables: &mut BundleTables, table: &'static str, contents: &str) -> Result<(), LoadError> {
    let parse_err = |source| LoadError::Json { table, source };
    match table {
        "game" => tables.game = serde_json::from_str(contents).map_err(parse_err)?,
        "items" => tables.items = serde_json::from_str(contents).map_err(parse_err)?,
        "locations" => tables.locations = serde_json::from_str(contents).map_err(parse_err)?,
        "categories" => tables.categories = serde_json::from_str(contents).map_err(parse_err)?,
        "options" => tables.options = serde_json::from_str(contents).map_err(parse_err)?,
        "regions" => tables.regions = Some(serde_json::from_str(contents).map_err(parse_err)?),
        _ => unreachable!("ENTRIES only names the six known tables"),
    }
    Ok(())
}

//! Entry-point workflows: goal states, problem template, and recognition runs.
//!
//! Each workflow accepts a single input file or a folder (batch mode). Folder
//! contents are processed one file at a time in path order; the first error
//! aborts the whole run.

use std::path::{Path, PathBuf};

use crate::config::GoalRecConfig;
use crate::encode::encode_frame;
use crate::error::{GoalRecResult, OutputError, SourceError};
use crate::goal_state::GoalStateBuilder;
use crate::normalize::Groups;
use crate::obslog::ObservationLog;
use crate::recognizer::Oracle;
use crate::recognizer::process::ProcessOracle;
use crate::recognizer::session::RecognizerSession;
use crate::scores::{ScoreAccumulator, ScoreTable};
use crate::source::{self, RelationFile, RelationSource};
use crate::template::TemplateBuilder;

/// Default goal-state file name.
pub const GOAL_STATES_FILE: &str = "goal_states.dat";

/// Default template file name.
pub const TEMPLATE_FILE: &str = "template.pddl";

/// What a recognition run over one input file produced.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub input: PathBuf,
    pub scores: PathBuf,
    pub frames: usize,
    pub requests: usize,
}

/// Input kind, resolved from the filesystem.
enum Input {
    File(PathBuf),
    Folder(PathBuf),
}

fn resolve_input(path: &Path) -> GoalRecResult<Input> {
    if path.is_file() {
        Ok(Input::File(path.to_path_buf()))
    } else if path.is_dir() {
        Ok(Input::Folder(path.to_path_buf()))
    } else {
        Err(SourceError::NotFound {
            path: path.display().to_string(),
        }
        .into())
    }
}

/// Folder containing `path`, `.` for a bare file name.
fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

fn write_text(path: &Path, content: &str) -> GoalRecResult<()> {
    std::fs::write(path, content).map_err(|e| {
        OutputError::Write {
            path: path.display().to_string(),
            source: e,
        }
        .into()
    })
}

fn ensure_dir(dir: &Path) -> GoalRecResult<()> {
    std::fs::create_dir_all(dir).map_err(|e| {
        OutputError::Write {
            path: dir.display().to_string(),
            source: e,
        }
        .into()
    })
}

// ---------------------------------------------------------------------------
// Goal states
// ---------------------------------------------------------------------------

/// Build goal states from one trial file or a folder of trials.
///
/// Returns the path written. Defaults to [`GOAL_STATES_FILE`] inside the input
/// folder, or next to a single input file.
pub fn generate_goal_states(
    input: &Path,
    output: Option<&Path>,
    config: &GoalRecConfig,
) -> GoalRecResult<PathBuf> {
    let mut builder = GoalStateBuilder::new(config.groups.clone());
    let (files, default_dir) = match resolve_input(input)? {
        Input::File(file) => {
            let dir = parent_dir(&file);
            (vec![file], dir)
        }
        Input::Folder(folder) => (source::list_files(&folder)?, folder),
    };

    for file in &files {
        tracing::info!(file = %file.display(), "reading trial");
        let trial = RelationFile::open(file)?;
        builder.add_trial(&source::recipe_name(file), &trial);
    }

    let output = output.map_or_else(|| default_dir.join(GOAL_STATES_FILE), Path::to_path_buf);
    tracing::info!(
        output = %output.display(),
        recipes = builder.recipes().count(),
        trials = files.len(),
        "saving goal states"
    );
    write_text(&output, &builder.render())?;
    Ok(output)
}

// ---------------------------------------------------------------------------
// Template
// ---------------------------------------------------------------------------

/// Render the problem template described by a configuration.
pub fn build_template(config: &GoalRecConfig) -> String {
    TemplateBuilder::new(&config.template.problem, &config.template.domain)
        .with_objects(&config.objects)
        .with_relations(&config.init, &config.groups)
        .render(&config.groups)
}

/// Write the template for the configuration loaded from `init_file`.
///
/// Defaults to [`TEMPLATE_FILE`] next to `init_file`.
pub fn generate_template(
    init_file: &Path,
    output: Option<&Path>,
    config: &GoalRecConfig,
) -> GoalRecResult<PathBuf> {
    let output = output.map_or_else(
        || parent_dir(init_file).join(TEMPLATE_FILE),
        Path::to_path_buf,
    );
    tracing::info!(relations = config.init.len(), "loaded initial relations");
    tracing::info!(output = %output.display(), "saving template");
    write_text(&output, &build_template(config))?;
    Ok(output)
}

// ---------------------------------------------------------------------------
// Recognition
// ---------------------------------------------------------------------------

/// Stream every frame of a trial through a session and collect scores.
///
/// Frames whose encoded observation repeats the previous one reuse its report;
/// every frame still yields one score entry per tracked goal.
pub fn run_trial<O: Oracle>(
    trial: &dyn RelationSource,
    groups: &Groups,
    goals: &[String],
    session: &mut RecognizerSession<O>,
) -> GoalRecResult<ScoreTable> {
    let mut scores = ScoreAccumulator::new(goals.iter().cloned());
    for (frame, relations) in trial.frames() {
        let observation = encode_frame(relations, groups);
        let before = session.requests();
        let report = session.observe(&observation)?;
        scores.record(frame, report);
        if session.requests() > before {
            tracing::info!(frame, "processed frame");
        }
    }
    Ok(scores.into_table())
}

/// Score file name for an input trial: `scores_<stem>.csv`.
pub fn scores_file_name(input: &Path) -> String {
    format!("scores_{}.csv", source::file_stem(input))
}

/// Run recognition over one trial file with a fresh recognizer process.
pub fn run_file(
    input: &Path,
    output_dir: &Path,
    config: &GoalRecConfig,
) -> GoalRecResult<RunSummary> {
    let trial = RelationFile::open(input)?;
    let command = config.recognizer.command()?;
    let oracle = ProcessOracle::spawn(command)?;
    let log = ObservationLog::create(&config.recognizer.observations)?;
    tracing::info!(log = %log.path().display(), "writing observations");
    let mut session = RecognizerSession::new(oracle, log, config.recognizer.read_timeout());

    let table = run_trial(&trial, &config.groups, &config.goals, &mut session)?;

    ensure_dir(output_dir)?;
    let scores = output_dir.join(scores_file_name(input));
    table.save(&scores)?;
    Ok(RunSummary {
        input: input.to_path_buf(),
        scores,
        frames: table.rows(),
        requests: session.requests(),
    })
}

/// Run recognition over one file or every file of a folder, sequentially.
///
/// Score tables go to `output`, defaulting to the folder holding a single
/// input file, or the parent of an input folder.
pub fn recognize(
    input: &Path,
    output: Option<&Path>,
    config: &GoalRecConfig,
) -> GoalRecResult<Vec<RunSummary>> {
    match resolve_input(input)? {
        Input::File(file) => {
            let out = output.map_or_else(|| parent_dir(&file), Path::to_path_buf);
            Ok(vec![run_file(&file, &out, config)?])
        }
        Input::Folder(folder) => {
            let out = output.map_or_else(|| parent_dir(&folder), Path::to_path_buf);
            let mut summaries = Vec::new();
            for file in source::list_files(&folder)? {
                tracing::info!(file = %file.display(), "reading trial");
                summaries.push(run_file(&file, &out, config)?);
            }
            Ok(summaries)
        }
    }
}

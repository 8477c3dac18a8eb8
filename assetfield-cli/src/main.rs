//! `assetfield` replays an edit session against an in-memory host and prints
//! the value the host ends up storing.
//!
//! ```text
//! assetfield --value '[{"id":"a"},{"id":"b"}]' --op move:2:1 --no-pretty
//! [{"id":"b"},{"id":"a"}]
//! ```
//!
//! Steps run in order and the first refused step aborts the session.
//! Indices are 1-based, matching the row numbers shown by `show`.

mod input;
mod logging;

use std::fmt::Write as FmtWrite;
use std::path::PathBuf;
use std::rc::Rc;

use clap::{ArgAction, Parser};
use color_eyre::eyre::{Result, WrapErr, eyre};
use futures::executor::block_on;
use tracing::info;

use assetfield::{
    ControllerOptions, DocumentFormat, FieldSetup, FieldValueController, HostWrite, Installation,
    MaxItems, MemoryHost, PickOutcome, StaticPicker, ValueSink, moved, without,
};

use crate::input::{DocumentSpec, load_document, load_items, load_value};

#[derive(Debug, Parser)]
#[command(
    name = "assetfield",
    version,
    about = "Replay edit sessions against an assetfield value controller"
)]
struct Cli {
    /// Stored field value: file path, inline payload, or "-" for stdin. Omit for an unset field.
    #[arg(long = "value", value_name = "SPEC")]
    value: Option<DocumentSpec>,

    /// Installation parameters: file path, inline payload, or "-" for stdin
    #[arg(long = "installation", value_name = "SPEC")]
    installation: Option<DocumentSpec>,

    /// Disable the picker once the list reaches the installation parameter KEY
    #[arg(long = "max-items-key", value_name = "KEY")]
    max_items_key: Option<String>,

    /// Reclassify every external push instead of only the value seen at mount
    #[arg(long = "strict")]
    strict: bool,

    /// Session step: pick[:SPEC], move:FROM:TO, remove:INDEX, override, push[:SPEC], disable, enable, show
    #[arg(long = "op", value_name = "STEP", value_parser = parse_step, action = ArgAction::Append)]
    steps: Vec<Step>,

    /// Output destinations ("-" writes to stdout). Defaults to stdout.
    #[arg(short = 'o', long = "output", value_name = "DEST", num_args = 1.., action = ArgAction::Append)]
    outputs: Vec<String>,

    /// Emit compact JSON/TOML rather than pretty formatting
    #[arg(long = "no-pretty")]
    no_pretty: bool,

    /// Print every host write to stderr once the session ends
    #[arg(long = "report")]
    report: bool,

    /// Overwrite output files even if they already exist
    #[arg(short = 'f', long = "force", short_alias = 'y', alias = "yes")]
    force: bool,

    /// Log controller activity to stderr
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,
}

#[derive(Debug, Clone, PartialEq)]
enum Step {
    /// Open the picker; without a selection it is cancelled.
    Pick(Option<DocumentSpec>),
    Move { from: usize, to: usize },
    Remove(usize),
    Override,
    /// Another editor changes the stored value; without a payload it is removed.
    Push(Option<DocumentSpec>),
    Disable,
    Enable,
    Show,
}

impl Step {
    fn name(&self) -> &'static str {
        match self {
            Step::Pick(_) => "pick",
            Step::Move { .. } => "move",
            Step::Remove(_) => "remove",
            Step::Override => "override",
            Step::Push(_) => "push",
            Step::Disable => "disable",
            Step::Enable => "enable",
            Step::Show => "show",
        }
    }

    fn document(&self) -> Option<&DocumentSpec> {
        match self {
            Step::Pick(spec) | Step::Push(spec) => spec.as_ref(),
            _ => None,
        }
    }
}

fn parse_step(raw: &str) -> std::result::Result<Step, String> {
    let mut parts = raw.splitn(2, ':');
    let kind = parts.next().unwrap_or_default().trim();
    let rest = parts.next();
    let document = |rest: Option<&str>| {
        rest.filter(|spec| !spec.trim().is_empty())
            .map(|spec| DocumentSpec(spec.to_string()))
    };
    match (kind, rest) {
        ("pick", rest) => Ok(Step::Pick(document(rest))),
        ("push", rest) => Ok(Step::Push(document(rest))),
        ("move", Some(rest)) => {
            let (from, to) = rest
                .split_once(':')
                .ok_or_else(|| format!("expected move:FROM:TO, got '{raw}'"))?;
            Ok(Step::Move {
                from: parse_index(from)?,
                to: parse_index(to)?,
            })
        }
        ("remove", Some(rest)) => Ok(Step::Remove(parse_index(rest)?)),
        ("override", None) => Ok(Step::Override),
        ("disable", None) => Ok(Step::Disable),
        ("enable", None) => Ok(Step::Enable),
        ("show", None) => Ok(Step::Show),
        ("move" | "remove", None) => Err(format!("'{kind}' needs an index")),
        ("override" | "disable" | "enable" | "show", Some(_)) => {
            Err(format!("'{kind}' takes no argument"))
        }
        _ => Err(format!(
            "unknown step '{raw}'; expected pick, move, remove, override, push, disable, enable or show"
        )),
    }
}

fn parse_index(raw: &str) -> std::result::Result<usize, String> {
    match raw.trim().parse::<usize>() {
        Ok(0) => Err("indices start at 1".to_string()),
        Ok(index) => Ok(index - 1),
        Err(_) => Err(format!("'{raw}' is not an index")),
    }
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let mut diagnostics = DiagnosticCollector::default();
    check_stdin_usage(&cli, &mut diagnostics);
    let output = build_value_sink(&cli, &mut diagnostics);
    diagnostics.into_result()?;

    let stored = match cli.value.as_ref() {
        Some(spec) => load_value(spec, "value")?,
        None => None,
    };
    let installation = match cli.installation.as_ref() {
        Some(spec) => Installation::new(load_document(spec, "installation")?),
        None => Installation::default(),
    };

    let host = MemoryHost::new(stored).with_installation(installation);
    let picker = Rc::new(StaticPicker::default());
    let mut setup = FieldSetup::new(Rc::new(host.clone()), picker.clone())
        .with_options(ControllerOptions::default().with_strict_pushes(cli.strict));
    if let Some(key) = cli.max_items_key.as_ref() {
        setup = setup.with_predicate(MaxItems::with_key(key.clone()));
    }
    let controller = setup.mount();

    for (position, step) in cli.steps.iter().enumerate() {
        run_step(&controller, &host, &picker, step)
            .wrap_err_with(|| format!("step {} ({})", position + 1, step.name()))?;
    }
    controller.close();

    if cli.report {
        print_report(&host.writes());
    }

    output.write(&host.value()).map_err(|err| eyre!("{err:#}"))?;
    Ok(())
}

fn run_step(
    controller: &FieldValueController,
    host: &MemoryHost,
    picker: &StaticPicker,
    step: &Step,
) -> Result<()> {
    match step {
        Step::Pick(selection) => {
            if let Some(spec) = selection {
                picker.push(load_items(spec, "selection")?);
            }
            match block_on(controller.open_picker())? {
                PickOutcome::Cancelled => info!("picker cancelled"),
                PickOutcome::Appended { count } => info!(count, "picked items"),
            }
        }
        Step::Move { from, to } => {
            let items = controller.items();
            let reordered = moved(&items, *from, *to).ok_or_else(|| {
                eyre!(
                    "cannot move #{} to #{} in a list of {}",
                    from + 1,
                    to + 1,
                    items.len()
                )
            })?;
            block_on(controller.replace(reordered)?)?;
        }
        Step::Remove(index) => {
            let items = controller.items();
            let remaining = without(&items, *index)
                .ok_or_else(|| eyre!("no item #{} in a list of {}", index + 1, items.len()))?;
            block_on(controller.replace(remaining)?)?;
        }
        Step::Override => {
            if !controller.override_value() {
                info!("field value already compatible; nothing to override");
            }
        }
        Step::Push(payload) => {
            let value = match payload {
                Some(spec) => load_value(spec, "pushed value")?,
                None => None,
            };
            host.push_external(value);
        }
        Step::Disable => host.set_disabled(true),
        Step::Enable => host.set_disabled(false),
        Step::Show => {
            for line in controller.view().to_lines() {
                eprintln!("{line}");
            }
        }
    }
    Ok(())
}

fn print_report(writes: &[HostWrite]) {
    if writes.is_empty() {
        eprintln!("no writes");
        return;
    }
    for (idx, write) in writes.iter().enumerate() {
        match write {
            HostWrite::Set(items) => {
                let payload = serde_json::to_string(items).unwrap_or_else(|_| "?".to_string());
                eprintln!("{}. set {payload}", idx + 1);
            }
            HostWrite::Remove => eprintln!("{}. remove", idx + 1),
        }
    }
}

fn check_stdin_usage(cli: &Cli, diagnostics: &mut DiagnosticCollector) {
    let mut readers: Vec<&str> = Vec::new();
    if cli.value.as_ref().is_some_and(DocumentSpec::is_stdin) {
        readers.push("value");
    }
    if cli.installation.as_ref().is_some_and(DocumentSpec::is_stdin) {
        readers.push("installation");
    }
    for step in &cli.steps {
        if step.document().is_some_and(DocumentSpec::is_stdin) {
            readers.push(step.name());
        }
    }
    if readers.len() > 1 {
        diagnostics.push_input(
            &readers.join("/"),
            "only one document can be read from stdin; provide inline content or files",
        );
    }
}

#[derive(Default)]
struct DiagnosticCollector {
    messages: Vec<String>,
}

impl DiagnosticCollector {
    fn push_input(&mut self, label: &str, message: impl Into<String>) {
        self.messages
            .push(format!("input ({label}): {}", message.into()));
    }

    fn push_output(&mut self, message: impl Into<String>) {
        self.messages.push(format!("output: {}", message.into()));
    }

    fn into_result(self) -> Result<()> {
        if self.messages.is_empty() {
            return Ok(());
        }
        let mut body = String::from("encountered input/output issues:\n");
        for (idx, msg) in self.messages.iter().enumerate() {
            let _ = writeln!(body, "  {}. {}", idx + 1, msg);
        }
        Err(eyre!(body))
    }
}

fn build_value_sink(cli: &Cli, diagnostics: &mut DiagnosticCollector) -> ValueSink {
    let mut stdout = cli.outputs.is_empty();
    let mut files = Vec::new();
    for raw in &cli.outputs {
        if raw.trim().is_empty() {
            diagnostics.push_output("output destination cannot be empty");
        } else if raw == "-" {
            stdout = true;
        } else {
            files.push(PathBuf::from(raw));
        }
    }

    let format = infer_format_from_files(&files, diagnostics)
        .or_else(|| cli.value.as_ref().and_then(DocumentSpec::extension_format))
        .unwrap_or_default();
    ensure_output_paths_available(&files, cli.force, diagnostics);

    ValueSink {
        format,
        pretty: !cli.no_pretty,
        stdout,
        files,
    }
}

fn infer_format_from_files(
    file_paths: &[PathBuf],
    diagnostics: &mut DiagnosticCollector,
) -> Option<DocumentFormat> {
    let mut detected: Option<DocumentFormat> = None;
    for path in file_paths {
        match (DocumentFormat::from_extension(path), detected) {
            (Some(format), Some(existing)) if format != existing => {
                diagnostics.push_output(format!(
                    "output file {} uses {format} but other destinations use {existing}; align extensions",
                    path.display()
                ));
            }
            (Some(format), None) => detected = Some(format),
            (Some(_), Some(_)) => {}
            (None, _) => diagnostics.push_output(format!(
                "cannot infer format from output file {}; use one of {}",
                path.display(),
                supported_extensions()
            )),
        }
    }
    detected
}

fn supported_extensions() -> String {
    DocumentFormat::available_formats()
        .into_iter()
        .map(|format| format!(".{format}"))
        .collect::<Vec<_>>()
        .join("/")
}

fn ensure_output_paths_available(
    paths: &[PathBuf],
    force: bool,
    diagnostics: &mut DiagnosticCollector,
) {
    if force {
        return;
    }
    for path in paths {
        if path.exists() {
            diagnostics.push_output(format!(
                "file {} already exists (pass --force to overwrite)",
                path.display()
            ));
        }
    }
}

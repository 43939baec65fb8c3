//! Handling the beamrec CLI
//!
//! This module handles the command line parsing and the execution of the subcommands. All output is
//! written to a given writer.
use crate::{
    config::BeamlineConfig,
    entities::{
        EntityKind, HybridDiffractionParameters, HybridUndulatorParameters,
        OpticalElementParameters, SourceParameters,
    },
    entity::ParameterEntity,
    error::{BeamrecError, BrResult},
    field_value::SniffPolicy,
    history::RecordPair,
    get_version,
    record::ParameterRecord,
};
use clap::{builder::Str, Parser, Subcommand, ValueEnum};
use std::{
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

/// Command line arguments for the beamrec application.
#[derive(Parser, Debug)]
#[command(author, version = Str::from(get_version()), about, long_about = None)]
pub struct Args {
    /// YAML configuration file. If not given, the default configuration is used
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// The subcommands of the beamrec application.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// print all fields of a record file together with their sniffed kind
    Inspect {
        /// record file
        file: PathBuf,
    },
    /// apply a record file onto a fresh entity and report the first failure
    Check {
        /// record file
        file: PathBuf,
        /// kind of entity the record belongs to
        #[arg(short, long, value_enum)]
        kind: EntityArg,
    },
    /// print the fields changed between the start and end record of a beam file
    Compare {
        /// beam data file the records belong to
        beam_file: PathBuf,
        /// kind of entity the records belong to
        #[arg(short, long, value_enum)]
        kind: EntityArg,
    },
}

/// Entity kinds selectable on the command line.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityArg {
    /// ray-tracing source
    Source,
    /// optical element
    Oe,
    /// hybrid undulator settings
    Hybrid,
    /// hybrid diffraction inputs
    Diffraction,
}
impl From<EntityArg> for EntityKind {
    fn from(arg: EntityArg) -> Self {
        match arg {
            EntityArg::Source => Self::Source,
            EntityArg::Oe => Self::OpticalElement,
            EntityArg::Hybrid => Self::HybridUndulator,
            EntityArg::Diffraction => Self::HybridDiffraction,
        }
    }
}

fn write_err(e: &std::io::Error) -> BeamrecError {
    BeamrecError::Console(format!("writing output failed: {e}"))
}

/// Load the configuration given on the command line or fall back to the default one.
///
/// # Errors
///
/// This function will return an error if the configuration file cannot be read or parsed.
pub fn load_config(args: &Args) -> BrResult<BeamlineConfig> {
    args.config
        .as_deref()
        .map_or_else(|| Ok(BeamlineConfig::default()), BeamlineConfig::from_file)
}

/// Print every field of a record file with its sniffed kind.
///
/// # Errors
///
/// This function will return an error if the file cannot be read or parsed, or the output cannot be written.
pub fn inspect(path: &Path, policy: SniffPolicy, writer: &mut impl Write) -> BrResult<()> {
    let record = ParameterRecord::from_file(path, policy)?;
    for (name, value) in &record {
        writeln!(writer, "{name} = {value} ({})", value.kind()).map_err(|e| write_err(&e))?;
    }
    writeln!(writer, "{} fields ({policy} policy)", record.len()).map_err(|e| write_err(&e))
}

fn check_entity<E: ParameterEntity>(
    path: &Path,
    policy: SniffPolicy,
    writer: &mut impl Write,
) -> BrResult<()> {
    let entity = E::load_from_file(path, policy)?;
    writeln!(
        writer,
        "{}: record applies to {} ({} fields)",
        path.display(),
        entity.entity_kind(),
        entity.properties().nr_of_props()
    )
    .map_err(|e| write_err(&e))
}

/// Apply a record file onto a fresh entity of the given kind.
///
/// # Errors
///
/// This function will return an error if the record cannot be read, parsed or applied.
pub fn check(
    path: &Path,
    kind: EntityKind,
    policy: SniffPolicy,
    writer: &mut impl Write,
) -> BrResult<()> {
    match kind {
        EntityKind::Source => check_entity::<SourceParameters>(path, policy, writer),
        EntityKind::OpticalElement => check_entity::<OpticalElementParameters>(path, policy, writer),
        EntityKind::HybridUndulator => {
            check_entity::<HybridUndulatorParameters>(path, policy, writer)
        }
        EntityKind::HybridDiffraction => {
            check_entity::<HybridDiffractionParameters>(path, policy, writer)
        }
    }
}

fn compare_entity<E: ParameterEntity>(
    beam_file: &Path,
    policy: SniffPolicy,
    writer: &mut impl Write,
) -> BrResult<()> {
    let pair = RecordPair::<E>::load(beam_file, policy)?;
    let changes = pair.changed_fields();
    if changes.is_empty() {
        return writeln!(writer, "no changes").map_err(|e| write_err(&e));
    }
    for change in changes {
        writeln!(writer, "{}: {} -> {}", change.name, change.start, change.end)
            .map_err(|e| write_err(&e))?;
    }
    Ok(())
}

/// Print the fields changed between the start and the end record of a beam data file.
///
/// # Errors
///
/// This function will return an error if one of the records is missing or cannot be loaded.
pub fn compare(
    beam_file: &Path,
    kind: EntityKind,
    policy: SniffPolicy,
    writer: &mut impl Write,
) -> BrResult<()> {
    match kind {
        EntityKind::Source => compare_entity::<SourceParameters>(beam_file, policy, writer),
        EntityKind::OpticalElement => {
            compare_entity::<OpticalElementParameters>(beam_file, policy, writer)
        }
        EntityKind::HybridUndulator => {
            compare_entity::<HybridUndulatorParameters>(beam_file, policy, writer)
        }
        EntityKind::HybridDiffraction => {
            compare_entity::<HybridDiffractionParameters>(beam_file, policy, writer)
        }
    }
}

/// Execute the subcommand given in the [`Args`].
///
/// # Errors
///
/// This function will return an error if the configuration cannot be loaded or the subcommand fails.
pub fn run(args: &Args, writer: &mut impl Write) -> BrResult<()> {
    let config = load_config(args)?;
    let policy = config.sniff_policy;
    match &args.command {
        Command::Inspect { file } => inspect(file, policy, writer),
        Command::Check { file, kind } => check(file, (*kind).into(), policy, writer),
        Command::Compare { beam_file, kind } => compare(beam_file, (*kind).into(), policy, writer),
    }
}
/// Execute the subcommand given in the [`Args`] with buffered output and flush it at the end.
///
/// # Errors
///
/// This function will return an error if the subcommand fails or the buffered output cannot be
/// written.
pub fn run_buffered<W: Write>(args: &Args, writer: W) -> BrResult<()> {
    let mut writer = BufWriter::new(writer);
    run(args, &mut writer)?;
    writer.flush().map_err(|e| write_err(&e))
}

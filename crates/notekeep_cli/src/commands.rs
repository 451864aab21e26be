//! Subcommand execution against a note service.
//!
//! # Invariants
//! - Success notices go to `out`, error notices to `err`.
//! - A command whose store operation fails reports `Status::Failed`.

use crate::cli::Command;
use crate::render::{write_list, write_note};
use log::info;
use notekeep_core::db::{open_db, DbError};
use notekeep_core::{
    FileStorage, NoteDraft, NoteService, NoteStore, NotekeepConfig, Notice,
    SlotStorage, SqliteSlotStorage, StorageBackend, StorageError, StoreError, StoreOperation,
    StoreResult,
};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io::{self, Write};
use std::process::ExitCode;

/// Outcome of one command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Ok,
    Failed,
}

impl From<Status> for ExitCode {
    fn from(value: Status) -> Self {
        match value {
            Status::Ok => ExitCode::SUCCESS,
            Status::Failed => ExitCode::FAILURE,
        }
    }
}

/// Failure to even reach the store.
#[derive(Debug)]
pub enum CliError {
    Db(DbError),
    Storage(StorageError),
    Store(StoreError),
    Io(io::Error),
}

impl Display for CliError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "database unavailable: {err}"),
            Self::Storage(err) => write!(f, "storage unavailable: {err}"),
            Self::Store(err) => write!(f, "note store unavailable: {err}"),
            Self::Io(err) => write!(f, "output failed: {err}"),
        }
    }
}

impl Error for CliError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Storage(err) => Some(err),
            Self::Store(err) => Some(err),
            Self::Io(err) => Some(err),
        }
    }
}

impl From<DbError> for CliError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<StorageError> for CliError {
    fn from(value: StorageError) -> Self {
        Self::Storage(value)
    }
}

impl From<StoreError> for CliError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl From<io::Error> for CliError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

/// Opens the configured backend and runs `command` against it.
pub fn run(config: &NotekeepConfig, command: Command) -> Result<Status, CliError> {
    info!(
        "event=cli_run module=cli status=start backend={} slot={}",
        config.backend, config.slot
    );
    match config.backend {
        StorageBackend::File => {
            let storage = FileStorage::open(&config.data_path)?;
            run_on(storage, &config.slot, command)
        }
        StorageBackend::Sqlite => {
            let conn = open_db(&config.data_path)?;
            let storage = SqliteSlotStorage::try_new(&conn)?;
            run_on(storage, &config.slot, command)
        }
    }
}

fn run_on<S: SlotStorage>(storage: S, slot: &str, command: Command) -> Result<Status, CliError> {
    let store = NoteStore::initialize(storage, slot)?;
    let mut service = NoteService::new(store);
    let stdout = io::stdout();
    let stderr = io::stderr();
    let status = execute(&mut service, command, &mut stdout.lock(), &mut stderr.lock())?;
    Ok(status)
}

/// Runs one command and prints its result and notice.
pub fn execute<S: SlotStorage>(
    service: &mut NoteService<S>,
    command: Command,
    out: &mut impl Write,
    err: &mut impl Write,
) -> io::Result<Status> {
    if let Some(issue) = service.store().startup_issue() {
        report(&Notice::for_error(issue), out, err)?;
    }

    match command {
        Command::Add { title, content } => {
            let outcome = service.create(NoteDraft::new(title, content));
            if let Ok(note) = &outcome {
                writeln!(out, "{}", note.id)?;
            }
            report_outcome(StoreOperation::Add, &outcome, out, err)
        }
        Command::Edit { id, title, content } => {
            let outcome = service.edit_draft(&id).and_then(|mut draft| {
                if let Some(title) = title {
                    draft.title = title;
                }
                if let Some(content) = content {
                    draft.content = content;
                }
                service.save(draft, Some(id.as_str()))
            });
            report_outcome(StoreOperation::Update, &outcome, out, err)
        }
        Command::List { search } => {
            write_list(out, &service.search(&search))?;
            Ok(Status::Ok)
        }
        Command::View { id } => match service.view(&id) {
            Ok(note) => {
                write_note(out, note)?;
                Ok(Status::Ok)
            }
            Err(store_err) => {
                report(&Notice::for_error(&store_err), out, err)?;
                Ok(Status::Failed)
            }
        },
        Command::Copy { id } => match service.view(&id) {
            Ok(note) if note.content.is_empty() => {
                report(&Notice::nothing_to_copy(), out, err)?;
                Ok(Status::Failed)
            }
            Ok(note) => {
                write!(out, "{}", note.content)?;
                Ok(Status::Ok)
            }
            Err(store_err) => {
                report(&Notice::for_error(&store_err), out, err)?;
                Ok(Status::Failed)
            }
        },
        Command::Delete { id } => {
            let outcome = service.delete(&id);
            report_outcome(StoreOperation::Remove, &outcome, out, err)
        }
        Command::Reset => {
            let outcome = service.reset_all();
            report_outcome(StoreOperation::Reset, &outcome, out, err)
        }
    }
}

fn report_outcome<T>(
    operation: StoreOperation,
    outcome: &StoreResult<T>,
    out: &mut impl Write,
    err: &mut impl Write,
) -> io::Result<Status> {
    report(&Notice::for_outcome(operation, outcome), out, err)?;
    Ok(if outcome.is_ok() {
        Status::Ok
    } else {
        Status::Failed
    })
}

fn report(notice: &Notice, out: &mut impl Write, err: &mut impl Write) -> io::Result<()> {
    if notice.is_error() {
        writeln!(err, "{notice}")
    } else {
        writeln!(out, "{notice}")
    }
}

#[cfg(test)]
mod tests {
    use super::{execute, Status};
    use crate::cli::Command;
    use notekeep_core::{
        FileStorage, FixedClock, MemoryStorage, NoteService, NoteStore, SequentialIdGenerator,
        DEFAULT_SLOT_NAME,
    };

    struct Captured {
        status: Status,
        out: String,
        err: String,
    }

    fn service_over(storage: MemoryStorage) -> NoteService<MemoryStorage> {
        let store = NoteStore::initialize(storage, DEFAULT_SLOT_NAME).unwrap();
        NoteService::with_capabilities(
            store,
            SequentialIdGenerator::new("n"),
            FixedClock::new("2024-01-01T00:00:00.000Z"),
        )
    }

    fn run(service: &mut NoteService<MemoryStorage>, command: Command) -> Captured {
        let mut out = Vec::new();
        let mut err = Vec::new();
        let status = execute(service, command, &mut out, &mut err).unwrap();
        Captured {
            status,
            out: String::from_utf8(out).unwrap(),
            err: String::from_utf8(err).unwrap(),
        }
    }

    #[test]
    fn add_prints_id_and_success_notice() {
        let mut service = service_over(MemoryStorage::new());
        let result = run(
            &mut service,
            Command::Add {
                title: "T".to_string(),
                content: "C".to_string(),
            },
        );
        assert_eq!(result.status, Status::Ok);
        assert_eq!(result.out, "n-1\nNote added successfully!\n");
        assert!(result.err.is_empty());
    }

    #[test]
    fn edit_changes_only_given_fields() {
        let mut service = service_over(MemoryStorage::new());
        run(
            &mut service,
            Command::Add {
                title: "T".to_string(),
                content: "C".to_string(),
            },
        );

        let result = run(
            &mut service,
            Command::Edit {
                id: "n-1".to_string(),
                title: None,
                content: Some("C2".to_string()),
            },
        );
        assert_eq!(result.status, Status::Ok);
        assert_eq!(result.out, "Note updated successfully!\n");
        let stored = service.view("n-1").unwrap();
        assert_eq!(stored.title, "T");
        assert_eq!(stored.content, "C2");
    }

    #[test]
    fn missing_ids_report_not_found_on_stderr() {
        let mut service = service_over(MemoryStorage::new());
        for command in [
            Command::Edit {
                id: "x".to_string(),
                title: Some("t".to_string()),
                content: None,
            },
            Command::View {
                id: "x".to_string(),
            },
            Command::Delete {
                id: "x".to_string(),
            },
        ] {
            let result = run(&mut service, command);
            assert_eq!(result.status, Status::Failed);
            assert_eq!(result.err, "Note not found!\n");
            assert!(result.out.is_empty());
        }
    }

    #[test]
    fn list_filters_by_title() {
        let mut service = service_over(MemoryStorage::new());
        for title in ["Groceries", "Work", "grocery run"] {
            run(
                &mut service,
                Command::Add {
                    title: title.to_string(),
                    content: String::new(),
                },
            );
        }

        let result = run(
            &mut service,
            Command::List {
                search: "GROC".to_string(),
            },
        );
        assert!(result.out.contains("Total notes in store: 3"));
        assert!(result.out.contains("Notes matching search: 2"));
        assert!(!result.out.contains("Work"));
    }

    #[test]
    fn malformed_slot_is_reported_before_command_output() {
        let storage = MemoryStorage::new().with_slot(DEFAULT_SLOT_NAME, "not json");
        let mut service = service_over(storage);
        let result = run(&mut service, Command::Reset);
        assert_eq!(result.status, Status::Ok);
        assert!(result.err.starts_with("Saved notes could not be read"));
        assert_eq!(result.out, "All notes cleared!\n");
    }

    #[test]
    fn copy_prints_raw_content_or_rejects_empty() {
        let mut service = service_over(MemoryStorage::new());
        for (title, content) in [("T", "line one\nline two"), ("Empty", "")] {
            run(
                &mut service,
                Command::Add {
                    title: title.to_string(),
                    content: content.to_string(),
                },
            );
        }

        let copied = run(&mut service, Command::Copy { id: "n-1".to_string() });
        assert_eq!(copied.status, Status::Ok);
        assert_eq!(copied.out, "line one\nline two");
        assert!(copied.err.is_empty());

        let empty = run(&mut service, Command::Copy { id: "n-2".to_string() });
        assert_eq!(empty.status, Status::Failed);
        assert_eq!(empty.err, "No content to copy\n");
        assert!(empty.out.is_empty());

        let missing = run(&mut service, Command::Copy { id: "x".to_string() });
        assert_eq!(missing.err, "Note not found!\n");
    }

    #[test]
    fn non_utf8_file_slot_reports_issue_and_reset_recovers() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("notes.json"), [0xff, 0xfe, b'[', b']']).unwrap();
        let store =
            NoteStore::initialize(FileStorage::open(dir.path()).unwrap(), DEFAULT_SLOT_NAME).unwrap();
        let mut service = NoteService::with_capabilities(
            store,
            SequentialIdGenerator::new("n"),
            FixedClock::new("2024-01-01T00:00:00.000Z"),
        );

        let mut out = Vec::new();
        let mut err = Vec::new();
        let status = execute(&mut service, Command::Reset, &mut out, &mut err).unwrap();
        assert_eq!(status, Status::Ok);
        assert!(String::from_utf8(err).unwrap().starts_with("Saved notes could not be read"));
        assert_eq!(String::from_utf8(out).unwrap(), "All notes cleared!\n");
        assert!(!dir.path().join("notes.json").exists());
    }
}

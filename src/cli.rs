use crate::config::AppConfig;
use crate::error::AppError;
use crate::prompt::Prompter;
use crate::telemetry;
use crate::workflows::hh::HhClient;
use crate::workflows::search::{SearchRequest, VacancySearch};
use crate::workflows::vacancy::{open_store, FilterCriteria, StorageFormat, VacancyRecord};
use clap::{Args, Parser, Subcommand};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing::{debug, info};

#[derive(Parser, Debug)]
#[command(
    name = "vacancy-harvester",
    about = "Fetch hh.ru vacancies, filter them and store the result as JSON or CSV",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Search vacancies and save the filtered result (default command)
    Search(SearchArgs),
    /// Append one serialized vacancy to an existing output file
    Append(RecordArgs),
    /// Remove every matching serialized vacancy from an output file
    Delete(RecordArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct SearchArgs {
    /// Search keyword; when omitted the command asks for all inputs interactively
    #[arg(long)]
    keyword: Option<String>,
    /// Keep only vacancies with exactly this name
    #[arg(long)]
    name: Option<String>,
    /// Keep only vacancies with exactly this URL
    #[arg(long)]
    url: Option<String>,
    /// Salary the vacancy's range must admit
    #[arg(long)]
    salary: Option<String>,
    /// Keep only vacancies with exactly this description
    #[arg(long)]
    description: Option<String>,
    /// Keep only vacancies with exactly these requirements
    #[arg(long)]
    requirements: Option<String>,
    /// Number of vacancies to keep
    #[arg(long, allow_negative_numbers = true)]
    top: Option<i64>,
    /// Result page to request from hh.ru
    #[arg(long)]
    page: Option<u32>,
    #[command(flatten)]
    output: OutputArgs,
    /// Sort by upper salary bound before truncating
    #[arg(long)]
    rank: bool,
    /// Return nothing instead of the unfiltered list when no vacancy matches
    #[arg(long)]
    no_fallback: bool,
}

#[derive(Args, Debug)]
struct RecordArgs {
    /// Serialized vacancy as a JSON object
    #[arg(long)]
    record: String,
    #[command(flatten)]
    output: OutputArgs,
}

#[derive(Args, Debug, Default)]
struct OutputArgs {
    /// Storage format (defaults to APP_STORAGE_FORMAT)
    #[arg(long, value_enum)]
    format: Option<StorageFormat>,
    /// File name inside the data directory
    #[arg(long)]
    output: Option<String>,
}

impl OutputArgs {
    fn resolve(&self, config: &AppConfig) -> (StorageFormat, PathBuf) {
        let format = self.format.unwrap_or(config.storage.format);
        let path = config.storage.output_path(format, self.output.as_deref());
        (format, path)
    }
}

pub(crate) fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;
    debug!(environment = ?config.environment, "configuration loaded");

    match cli.command {
        Some(Command::Search(args)) => run_search(args, &config),
        None => run_search(SearchArgs::default(), &config),
        Some(Command::Append(args)) => run_append(args, &config),
        Some(Command::Delete(args)) => run_delete(args, &config),
    }
}

fn run_search(args: SearchArgs, config: &AppConfig) -> Result<(), AppError> {
    let (format, path) = args.output.resolve(config);
    let mut policy = config.filter;
    if args.no_fallback {
        policy.fallback_to_unfiltered = false;
    }
    let request = if args.keyword.is_some() {
        search_request(args)?
    } else {
        let stdin = io::stdin();
        let mut prompter = Prompter::new(stdin.lock(), io::stdout());
        collect_search_request(args, &mut prompter)?
    };

    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)?;
    }

    let client = HhClient::new(config.api.clone())?;
    let store = open_store(format, path);
    let records = VacancySearch::new(&client, policy).run(&request, &*store)?;

    print_records(&records)
}

fn run_append(args: RecordArgs, config: &AppConfig) -> Result<(), AppError> {
    let record = parse_record(&args.record)?;
    let (format, path) = args.output.resolve(config);
    let store = open_store(format, path);
    store.append(&record)?;
    info!(path = %store.path().display(), "vacancy appended");
    Ok(())
}

fn run_delete(args: RecordArgs, config: &AppConfig) -> Result<(), AppError> {
    let record = parse_record(&args.record)?;
    let (format, path) = args.output.resolve(config);
    let store = open_store(format, path);
    store.delete(&record)?;
    info!(path = %store.path().display(), "vacancy deleted");
    Ok(())
}

fn search_request(args: SearchArgs) -> Result<SearchRequest, AppError> {
    let SearchArgs {
        keyword,
        name,
        url,
        salary,
        description,
        requirements,
        top,
        page,
        rank,
        ..
    } = args;

    let keyword =
        keyword.ok_or_else(|| AppError::InvalidInput("--keyword is required".to_string()))?;
    let top = top.ok_or_else(|| {
        AppError::InvalidInput("--top is required when --keyword is given".to_string())
    })?;

    Ok(SearchRequest {
        keyword,
        page,
        criteria: FilterCriteria {
            name,
            url,
            salary,
            description,
            requirements,
        },
        top,
        rank_by_salary: rank,
    })
}

/// Asks for every search input not already given on the command line.
pub(crate) fn collect_search_request<R: BufRead, W: Write>(
    mut args: SearchArgs,
    prompter: &mut Prompter<R, W>,
) -> Result<SearchRequest, AppError> {
    if args.keyword.is_none() {
        args.keyword = Some(prompter.ask_required("Search keyword")?);
    }
    if args.name.is_none() {
        args.name = prompter.ask_optional("Name to filter by (Enter to skip)")?;
    }
    if args.salary.is_none() {
        args.salary = prompter.ask_optional("Salary to filter by (Enter to skip)")?;
    }
    if args.description.is_none() {
        args.description = prompter.ask_optional("Description to filter by (Enter to skip)")?;
    }
    if args.requirements.is_none() {
        args.requirements = prompter.ask_optional("Requirements to filter by (Enter to skip)")?;
    }
    if args.top.is_none() {
        args.top = Some(prompter.ask_count("Number of vacancies to keep")?);
    }

    search_request(args)
}

fn parse_record(raw: &str) -> Result<VacancyRecord, AppError> {
    let value = serde_json::from_str::<serde_json::Value>(raw)
        .map_err(|err| AppError::InvalidInput(format!("--record is not valid JSON: {err}")))?;
    match value {
        serde_json::Value::Object(record) => Ok(record),
        _ => Err(AppError::InvalidInput(
            "--record must be a JSON object".to_string(),
        )),
    }
}

fn print_records(records: &[VacancyRecord]) -> Result<(), AppError> {
    let mut stdout = io::stdout().lock();
    write_records(&mut stdout, records)
}

fn write_records<W: Write>(out: &mut W, records: &[VacancyRecord]) -> Result<(), AppError> {
    serde_json::to_writer_pretty(&mut *out, records).map_err(AppError::Render)?;
    writeln!(out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use std::io::Cursor;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_search_flags() {
        let cli = Cli::try_parse_from([
            "vacancy-harvester",
            "search",
            "--keyword",
            "rust",
            "--salary",
            "150000",
            "--top",
            "-1",
            "--format",
            "csv",
            "--no-fallback",
        ])
        .expect("arguments parse");

        let Some(Command::Search(args)) = cli.command else {
            panic!("expected search command");
        };
        assert_eq!(args.output.format, Some(StorageFormat::Csv));
        assert!(args.no_fallback);

        let request = search_request(args).expect("request builds");
        assert_eq!(request.keyword, "rust");
        assert_eq!(request.criteria.salary.as_deref(), Some("150000"));
        assert_eq!(request.top, -1);
    }

    #[test]
    fn non_interactive_search_requires_top() {
        let args = SearchArgs {
            keyword: Some("rust".to_string()),
            ..SearchArgs::default()
        };
        assert!(matches!(
            search_request(args),
            Err(AppError::InvalidInput(_))
        ));
    }

    #[test]
    fn interactive_collection_skips_answers_given_on_command_line() {
        let args = SearchArgs {
            salary: Some("90000".to_string()),
            ..SearchArgs::default()
        };
        let mut prompter = Prompter::new(Cursor::new("python\nBackend\n\nDjango\n5\n"), io::sink());

        let request = collect_search_request(args, &mut prompter).expect("inputs collected");
        assert_eq!(request.keyword, "python");
        assert_eq!(request.criteria.name.as_deref(), Some("Backend"));
        assert_eq!(request.criteria.salary.as_deref(), Some("90000"));
        assert_eq!(request.criteria.description, None);
        assert_eq!(request.criteria.requirements.as_deref(), Some("Django"));
        assert_eq!(request.top, 5);
    }

    #[test]
    fn record_argument_must_be_an_object() {
        assert!(parse_record(r#"{"name": "a"}"#).is_ok());
        assert!(matches!(parse_record("[1]"), Err(AppError::InvalidInput(_))));
        assert!(matches!(parse_record("{"), Err(AppError::InvalidInput(_))));
    }

    #[test]
    fn output_failures_are_render_errors() {
        struct Closed;

        impl Write for Closed {
            fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
                Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
            }

            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        let record = parse_record(r#"{"name": "a"}"#).expect("record parses");
        let error = write_records(&mut Closed, &[record.clone()]).expect_err("write fails");
        assert!(matches!(error, AppError::Render(_)));
        assert!(error.to_string().starts_with("render error"));

        let mut rendered = Vec::new();
        write_records(&mut rendered, &[record]).expect("rendered");
        assert!(String::from_utf8(rendered).expect("utf-8").ends_with("}\n]\n"));
    }
}

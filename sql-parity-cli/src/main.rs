mod executor;

use crate::executor::{
    read_file, CliExecutable, CompareExecutor, NormalizeExecutor, OperationExecutor,
};
use clap::{ArgGroup, Parser, Subcommand};
use sql_parity::error::Error;
use sql_parity::{CompareMode, NormalizerOptions};
use std::io::{self, Write};
use std::process::ExitCode;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

#[derive(Debug, Parser)]
#[command(name = "sql-parity")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Turn debugging information on
    #[arg(short, long, action = clap::ArgAction::Count)]
    debug: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Parser, Debug)]
#[clap(group(ArgGroup::new("source").args(& ["sql", "file"]).required(false)))]
struct CommonOptions {
    /// The subject SQL to operate on
    #[clap(value_parser, group = "source")]
    sql: Option<String>,
    /// The dialect used to split the input into statements.
    #[clap(short, long)]
    dialect: Option<String>,
    /// The file containing the SQL to operate on
    #[clap(short, long, value_parser, group = "source")]
    file: Option<String>,
}

#[derive(Parser, Debug)]
struct NormalizerFlags {
    /// Keep `--` and `/* */` comments.
    #[clap(long)]
    keep_comments: bool,
    /// Keep backtick, double-quote and bracket identifier quotes.
    #[clap(long)]
    keep_quotes: bool,
    /// Keep `$1`, `:name` and `@name` placeholders as written.
    #[clap(long)]
    keep_placeholders: bool,
    /// Keep keyword case as written.
    #[clap(long)]
    keep_keyword_case: bool,
    /// Replace SELECT column lists with `*`.
    #[clap(long)]
    collapse_select: bool,
    /// Rewrite `INNER JOIN` to `JOIN` and `X OUTER JOIN` to `X JOIN`.
    #[clap(long)]
    normalize_joins: bool,
    /// Drop redundant `ASC` in ORDER BY.
    #[clap(long)]
    drop_asc: bool,
    /// Sort INSERT columns and their values by column name.
    #[clap(long)]
    sort_insert: bool,
    /// Sort UPDATE SET assignments by column name.
    #[clap(long)]
    sort_update: bool,
    /// Drop a trailing RETURNING clause.
    #[clap(long)]
    drop_returning: bool,
    /// Drop `table.` qualifiers in single-table statements.
    #[clap(long)]
    drop_table_qualifiers: bool,
    /// Enable every semantic stage above.
    #[clap(long)]
    semantic: bool,
}

impl NormalizerFlags {
    fn options(&self) -> NormalizerOptions {
        let base = if self.semantic {
            NormalizerOptions::semantic()
        } else {
            NormalizerOptions::new()
        };
        base.with_remove_comments(!self.keep_comments)
            .with_remove_quotes(!self.keep_quotes)
            .with_unify_placeholders(!self.keep_placeholders)
            .with_uppercase_keywords(!self.keep_keyword_case)
            .with_collapse_select_columns(base.collapse_select_columns || self.collapse_select)
            .with_normalize_join_syntax(base.normalize_join_syntax || self.normalize_joins)
            .with_remove_order_by_asc(base.remove_order_by_asc || self.drop_asc)
            .with_sort_insert_columns(base.sort_insert_columns || self.sort_insert)
            .with_sort_update_columns(base.sort_update_columns || self.sort_update)
            .with_remove_returning_clause(base.remove_returning_clause || self.drop_returning)
            .with_remove_table_qualifiers(
                base.remove_table_qualifiers || self.drop_table_qualifiers,
            )
    }
}

#[derive(Parser, Debug)]
struct NormalizeCommandOptions {
    #[clap(flatten)]
    common_options: CommonOptions,
    #[clap(flatten)]
    normalizer_flags: NormalizerFlags,
}

#[derive(Parser, Debug)]
struct CompareCommandOptions {
    /// The file containing the expected SQL statements
    #[clap(short, long)]
    expected: String,
    /// The file containing the actual SQL statements
    #[clap(short, long)]
    actual: String,
    /// Compare the statements as multisets, ignoring their order.
    #[clap(long)]
    ignore_order: bool,
    /// The dialect used to split the input into statements.
    #[clap(short, long)]
    dialect: Option<String>,
    #[clap(flatten)]
    normalizer_flags: NormalizerFlags,
}

impl CompareCommandOptions {
    fn executor(&self) -> CompareExecutor {
        let mode = if self.ignore_order {
            CompareMode::Unordered
        } else {
            CompareMode::Strict
        };
        CompareExecutor::new(self.expected.clone(), self.actual.clone(), self.dialect.clone())
            .with_options(self.normalizer_flags.options())
            .with_mode(mode)
    }
}

enum ProcessType {
    Sql(String),
    File(String),
    Interactive,
}

impl From<&CommonOptions> for ProcessType {
    fn from(opts: &CommonOptions) -> Self {
        match (&opts.sql, &opts.file) {
            (Some(sql), _) => ProcessType::Sql(sql.clone()),
            (None, Some(file)) => ProcessType::File(file.clone()),
            (None, None) => ProcessType::Interactive,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Normalize SQL
    Normalize(NormalizeCommandOptions),
    /// Compare the SQL statements of two files
    Compare(CompareCommandOptions),
    /// Detect the operation of SQL statements
    Operation(CommonOptions),
}

impl Commands {
    fn execute(&self) -> Result<Vec<String>, Error> {
        let common_options = match self {
            Commands::Normalize(opts) => &opts.common_options,
            Commands::Operation(opts) => opts,
            Commands::Compare(opts) => return opts.executor().execute(),
        };
        match ProcessType::from(common_options) {
            ProcessType::Sql(sql) => self.execute_sql(sql),
            ProcessType::File(file) => self.execute_file(file),
            ProcessType::Interactive => self.execute_interactive(),
        }
    }

    fn execute_sql(&self, sql: String) -> Result<Vec<String>, Error> {
        self.executor(sql).execute()
    }

    fn execute_file(&self, file: String) -> Result<Vec<String>, Error> {
        self.executor(read_file(&file)?).execute()
    }

    fn execute_interactive(&self) -> Result<Vec<String>, Error> {
        self.entering_interactive_mode()?;
        Ok(vec![])
    }

    fn entering_interactive_mode(&self) -> Result<(), Error> {
        println!(
            "Entering interactive mode. Type sql statement end with `;` to execute. \
             Type `exit` or `quit` to exit."
        );
        let stdin = io::stdin();
        let mut stdout = io::stdout();
        let mut input_buffer = String::new();
        let mut new_input = true;
        loop {
            if new_input {
                print!("sql> ");
            } else {
                print!("  -> ");
            }
            stdout.flush()?;
            let mut line = String::new();
            let read = stdin.read_line(&mut line)?;
            if read == 0 {
                println!();
                break Ok(());
            }
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if line.eq_ignore_ascii_case("exit") || line.eq_ignore_ascii_case("quit") {
                println!("Bye");
                break Ok(());
            }
            input_buffer.push_str(line);
            input_buffer.push('\n');
            if line.ends_with(';') {
                match self.executor(input_buffer.clone()).execute() {
                    Ok(result) => {
                        for r in result {
                            println!("{}", r);
                        }
                    }
                    Err(e) => {
                        eprintln!("Error: {}", e);
                    }
                }
                input_buffer.clear();
                new_input = true;
            } else {
                new_input = false;
            }
        }
    }

    fn executor(&self, sql: String) -> Box<dyn CliExecutable> {
        match self {
            Commands::Normalize(opts) => Box::new(
                NormalizeExecutor::new(sql, opts.common_options.dialect.clone())
                    .with_options(opts.normalizer_flags.options()),
            ),
            Commands::Operation(opts) => {
                Box::new(OperationExecutor::new(sql, opts.dialect.clone()))
            }
            // Compare reads both of its files itself.
            Commands::Compare(opts) => Box::new(opts.executor()),
        }
    }
}

fn init_tracing(debug: u8) {
    let log_level = match debug {
        0 => Level::WARN,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .without_time()
        .with_writer(io::stderr)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Error: {}", e);
    }
}

fn main() -> ExitCode {
    let args = Cli::parse();
    init_tracing(args.debug);
    let result = args.command.execute();
    match result {
        Ok(result) => {
            for r in result {
                println!("{}", r);
            }
            ExitCode::SUCCESS
        }
        Err(Error::Mismatch(report)) => {
            print!("{}", report);
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

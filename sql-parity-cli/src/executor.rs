use sql_parity::error::Error;
use sql_parity::sqlparser::dialect::Dialect;
use sql_parity::{CompareMode, Comparator, Normalizer, NormalizerOptions};

pub trait CliExecutable {
    fn execute(&self) -> Result<Vec<String>, Error>;
}

fn get_dialect(dialect_name: Option<&str>) -> Result<Box<dyn Dialect>, Error> {
    sql_parity::dialect_from_name(dialect_name)
}

pub fn read_file(file: &str) -> Result<String, Error> {
    std::fs::read_to_string(file)
        .map_err(|e| Error::ArgumentError(format!("Failed to read file {}: {}", file, e)))
}

pub struct NormalizeExecutor {
    sql: String,
    dialect_name: Option<String>,
    options: NormalizerOptions,
}

impl NormalizeExecutor {
    pub fn new(sql: String, dialect_name: Option<String>) -> Self {
        Self {
            sql,
            dialect_name,
            options: NormalizerOptions::new(),
        }
    }

    pub fn with_options(mut self, options: NormalizerOptions) -> Self {
        self.options = options;
        self
    }
}

impl CliExecutable for NormalizeExecutor {
    fn execute(&self) -> Result<Vec<String>, Error> {
        let statements = sql_parity::split_statements(
            get_dialect(self.dialect_name.as_deref())?.as_ref(),
            self.sql.as_ref(),
        )?;
        let normalizer = Normalizer::new(self.options);
        Ok(statements
            .iter()
            .map(|statement| normalizer.normalize(statement))
            .collect())
    }
}

pub struct OperationExecutor {
    sql: String,
    dialect_name: Option<String>,
}

impl OperationExecutor {
    pub fn new(sql: String, dialect_name: Option<String>) -> Self {
        Self { sql, dialect_name }
    }
}

impl CliExecutable for OperationExecutor {
    fn execute(&self) -> Result<Vec<String>, Error> {
        let statements = sql_parity::split_statements(
            get_dialect(self.dialect_name.as_deref())?.as_ref(),
            self.sql.as_ref(),
        )?;
        Ok(statements
            .iter()
            .map(|statement| sql_parity::detect_operation(statement).to_string())
            .collect())
    }
}

/// Compares two script files. A mismatch is returned as [`Error::Mismatch`] carrying the
/// report.
pub struct CompareExecutor {
    expected_file: String,
    actual_file: String,
    dialect_name: Option<String>,
    options: NormalizerOptions,
    mode: CompareMode,
}

impl CompareExecutor {
    pub fn new(expected_file: String, actual_file: String, dialect_name: Option<String>) -> Self {
        Self {
            expected_file,
            actual_file,
            dialect_name,
            options: NormalizerOptions::new(),
            mode: CompareMode::Strict,
        }
    }

    pub fn with_options(mut self, options: NormalizerOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_mode(mut self, mode: CompareMode) -> Self {
        self.mode = mode;
        self
    }

    fn normalized_file(&self, dialect: &dyn Dialect, file: &str) -> Result<Vec<String>, Error> {
        let normalizer = Normalizer::new(self.options);
        Ok(sql_parity::split_statements(dialect, &read_file(file)?)?
            .iter()
            .map(|statement| normalizer.normalize(statement))
            .collect())
    }
}

impl CliExecutable for CompareExecutor {
    fn execute(&self) -> Result<Vec<String>, Error> {
        let dialect = get_dialect(self.dialect_name.as_deref())?;
        let expected = self.normalized_file(dialect.as_ref(), &self.expected_file)?;
        let actual = self.normalized_file(dialect.as_ref(), &self.actual_file)?;
        let comparison = Comparator::new(self.mode).compare(&expected, &actual);
        let report = sql_parity::format_report(&comparison);
        if comparison.is_equal() {
            Ok(report.lines().map(String::from).collect())
        } else {
            Err(Error::Mismatch(report))
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_cmd::Command;
    use predicates::prelude::*;
    use std::io::Write;
    use std::process;
    use tempfile::NamedTempFile;

    fn sql_parity_cmd() -> Command {
        Command::cargo_bin("sql-parity").unwrap()
    }

    fn sql_file(content: &str) -> NamedTempFile {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(content.as_bytes()).unwrap();
        temp_file
    }

    mod normalize {
        use super::*;

        #[test]
        fn test_normalize() {
            sql_parity_cmd()
                .arg("normalize")
                .arg("select  *  \n  from  users where id = $1; INSERT INTO t (c, b, a) VALUES (?, ?, ?);")
                .assert()
                .success()
                .stdout("SELECT * FROM users WHERE id = ?\nINSERT INTO t (c, b, a) VALUES (?, ?, ?)\n")
                .stderr("");
        }

        #[test]
        fn test_normalize_with_stage_flags() {
            sql_parity_cmd()
                .arg("normalize")
                .arg("--sort-insert")
                .arg("--drop-returning")
                .arg("INSERT INTO t (c, b, a) VALUES (?, ?, ?) RETURNING id")
                .assert()
                .success()
                .stdout("INSERT INTO t (a, b, c) VALUES (?, ?, ?)\n")
                .stderr("");
        }

        #[test]
        fn test_normalize_with_semantic_flag() {
            sql_parity_cmd()
                .arg("normalize")
                .arg("--semantic")
                .arg("select u.id from users u inner join orders o on o.user_id = u.id order by u.id asc")
                .assert()
                .success()
                .stdout("SELECT * FROM users u JOIN orders o ON o.user_id = u.id ORDER BY u.id\n")
                .stderr("");
        }

        #[test]
        fn test_normalize_with_keep_flags() {
            sql_parity_cmd()
                .arg("normalize")
                .arg("--keep-keyword-case")
                .arg("--keep-placeholders")
                .arg("select * from `users` where id = :id -- note")
                .assert()
                .success()
                .stdout("select * from users where id = :id\n")
                .stderr("");
        }

        #[test]
        fn test_normalize_with_dialect() {
            sql_parity_cmd()
                .arg("normalize")
                .arg("--dialect")
                .arg("mysql")
                .arg("select  `a`  from  t1; select 'x;y' from t2")
                .assert()
                .success()
                .stdout("SELECT a FROM t1\nSELECT 'x;y' FROM t2\n")
                .stderr("");
        }

        #[test]
        fn test_normalize_from_file() {
            let temp_file = sql_file("select  *  \n  from  t1;\n-- trailing comment\nDELETE FROM t2 WHERE id = @id;");
            sql_parity_cmd()
                .arg("normalize")
                .arg("--file")
                .arg(temp_file.path())
                .assert()
                .success()
                .stdout("SELECT * FROM t1\nDELETE FROM t2 WHERE id = ?\n")
                .stderr("");
        }

        #[test]
        fn test_normalize_with_debug_logging() {
            sql_parity_cmd()
                .arg("-d")
                .arg("normalize")
                .arg("--drop-table-qualifiers")
                .arg("SELECT * FROM a JOIN b ON a.id = b.a_id")
                .assert()
                .success()
                .stdout("SELECT * FROM a JOIN b ON a.id = b.a_id\n")
                .stderr(predicate::str::contains("leaving statement unchanged"));
        }
    }

    mod compare {
        use super::*;

        #[test]
        fn test_compare_equal_files() {
            let expected = sql_file("SELECT * FROM users WHERE id = ?;\nUPDATE users SET name = ? WHERE id = ?;");
            let actual = sql_file("select * from users where id = $1;\nupdate users set name = $1 where id = $2;");
            sql_parity_cmd()
                .arg("compare")
                .arg("--expected")
                .arg(expected.path())
                .arg("--actual")
                .arg(actual.path())
                .assert()
                .success()
                .stdout(concat!(
                    "queries match\n",
                    "\n",
                    "Expected 2 queries, got 2 queries\n",
                    "\n",
                    "Differences:\n",
                    "  [0] OK: SELECT * FROM users WHERE id = ?\n",
                    "  [1] OK: UPDATE users SET name = ? WHERE id = ?\n",
                ))
                .stderr("");
        }

        #[test]
        fn test_compare_mismatched_files() {
            let expected = sql_file("SELECT * FROM users; SELECT * FROM orders;");
            let actual = sql_file("SELECT * FROM orders; SELECT * FROM users; SELECT 1;");
            sql_parity_cmd()
                .arg("compare")
                .arg("-e")
                .arg(expected.path())
                .arg("-a")
                .arg(actual.path())
                .assert()
                .code(1)
                .stdout(concat!(
                    "queries do not match\n",
                    "\n",
                    "Expected 2 queries, got 3 queries\n",
                    "\n",
                    "Differences:\n",
                    "  [0] MODIFIED:\n",
                    "      expected: SELECT * FROM users\n",
                    "      actual:   SELECT * FROM orders\n",
                    "  [1] MODIFIED:\n",
                    "      expected: SELECT * FROM orders\n",
                    "      actual:   SELECT * FROM users\n",
                    "  [2] EXTRA:\n",
                    "      actual:   SELECT 1\n",
                ))
                .stderr("");
        }

        #[test]
        fn test_compare_ignore_order() {
            let expected = sql_file("SELECT * FROM users; SELECT * FROM orders;");
            let actual = sql_file("SELECT * FROM orders; SELECT * FROM users;");
            sql_parity_cmd()
                .arg("compare")
                .arg("--expected")
                .arg(expected.path())
                .arg("--actual")
                .arg(actual.path())
                .arg("--ignore-order")
                .assert()
                .success()
                .stdout(predicate::str::starts_with("queries match\n"))
                .stderr("");
        }

        #[test]
        fn test_compare_with_semantic_flag() {
            let expected = sql_file("INSERT INTO users (name, email) VALUES ($1, $2) RETURNING id;");
            let actual = sql_file("INSERT INTO `users` (`email`, `name`) VALUES (?, ?);");
            sql_parity_cmd()
                .arg("compare")
                .arg("--expected")
                .arg(expected.path())
                .arg("--actual")
                .arg(actual.path())
                .arg("--semantic")
                .assert()
                .success()
                .stdout(predicate::str::contains(
                    "  [0] OK: INSERT INTO users (email, name) VALUES (?, ?)\n",
                ))
                .stderr("");
        }
    }

    mod operation {
        use super::*;

        #[test]
        fn test_operation() {
            sql_parity_cmd()
                .arg("operation")
                .arg("select 1; insert into t values (1); Update t set a = 2; DELETE FROM t; WITH x AS (SELECT 1) SELECT * FROM x")
                .assert()
                .success()
                .stdout("SELECT\nINSERT\nUPDATE\nDELETE\nOTHER\n")
                .stderr("");
        }

        #[test]
        fn test_operation_from_file() {
            let temp_file = sql_file("SELECT 1;\nCREATE TABLE t (a INT);");
            sql_parity_cmd()
                .arg("operation")
                .arg("--file")
                .arg(temp_file.path())
                .assert()
                .success()
                .stdout("SELECT\nOTHER\n")
                .stderr("");
        }
    }

    mod interactive_mode {
        use super::*;
        use std::time::Duration;
        use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
        use tokio::process::{ChildStderr, ChildStdin, ChildStdout, Command};
        use tokio::time;

        const BIN_PATH: &str = "../target/debug/sql-parity";
        const TIMEOUT_DURATION: Duration = Duration::from_secs(1);

        async fn write_to_stdin(
            stdin: &mut ChildStdin,
            message: &str,
        ) -> Result<(), Box<dyn std::error::Error>> {
            time::timeout(TIMEOUT_DURATION, stdin.write_all(message.as_bytes()))
                .await?
                .map_err(Into::into)
        }

        async fn read_from_stdout(
            stdout_reader: &mut Lines<BufReader<ChildStdout>>,
        ) -> Result<String, Box<dyn std::error::Error>> {
            time::timeout(TIMEOUT_DURATION, stdout_reader.next_line())
                .await??
                .ok_or_else(|| "Received None from stdout".into())
        }

        async fn read_from_stderr(
            stderr_reader: &mut Lines<BufReader<ChildStderr>>,
        ) -> Result<String, Box<dyn std::error::Error>> {
            time::timeout(TIMEOUT_DURATION, stderr_reader.next_line())
                .await??
                .ok_or_else(|| "Received None from stderr".into())
        }

        #[tokio::test]
        async fn test_interactive() -> Result<(), Box<dyn std::error::Error>> {
            let mut child = Command::new(BIN_PATH)
                .arg("normalize")
                .stdin(process::Stdio::piped())
                .stdout(process::Stdio::piped())
                .stderr(process::Stdio::piped())
                .spawn()
                .expect("Failed to spawn child process");

            let stdin = child.stdin.as_mut().expect("Failed to open stdin");
            let stdout = child.stdout.take().expect("Failed to open stdout");
            let stderr = child.stderr.take().expect("Failed to open stderr");
            let mut stdout_reader = BufReader::new(stdout).lines();
            let mut stderr_reader = BufReader::new(stderr).lines();

            // Initial prompt
            let initial_prompt = read_from_stdout(&mut stdout_reader).await?;
            assert!(
                initial_prompt.contains("Entering interactive mode."),
                "Initial prompt not as expected: {initial_prompt:?}"
            );

            // Check SQL query
            write_to_stdin(stdin, "select *  \n from   t1 where id = $1;\n").await?;
            let query_result = read_from_stdout(&mut stdout_reader).await?;
            assert!(
                query_result.contains("SELECT * FROM t1 WHERE id = ?"),
                "Query result not as expected: {query_result:?}"
            );

            // Check unterminated literal
            write_to_stdin(stdin, "SELECT 'abc;\n").await?;
            let invalid_query_result = read_from_stderr(&mut stderr_reader).await?;
            assert!(
                invalid_query_result.contains("Error: sql parser error: Unterminated string literal"),
                "Invalid query result not as expected: {invalid_query_result:?}"
            );

            // Empty input do nothing
            write_to_stdin(stdin, "\n").await?;

            // Send quit command
            write_to_stdin(stdin, "quit\n").await?;
            let exit_message = read_from_stdout(&mut stdout_reader).await?;
            assert!(
                exit_message.contains("Bye"),
                "Exit message not as expected: {exit_message:?}"
            );

            child.wait().await?;

            Ok(())
        }
    }

    mod invalid_cases {
        use super::*;

        #[test]
        fn test_both_sql_and_file_provided() {
            let temp_file = sql_file("select 1;");
            sql_parity_cmd()
                .arg("normalize")
                .arg("select 1;")
                .arg("--file")
                .arg(temp_file.path())
                .assert()
                .failure()
                .stdout("")
                .stderr(predicate::str::contains(
                    "the argument '[SQL]' cannot be used with '--file <FILE>'",
                ));
        }

        #[test]
        fn test_invalid_dialect_name_provided() {
            sql_parity_cmd()
                .arg("normalize")
                .arg("--dialect")
                .arg("invalid_dialect")
                .arg("select 1;")
                .assert()
                .failure()
                .stdout("")
                .stderr(predicate::str::contains(
                    "Error: Dialect not found: invalid_dialect\n",
                ));
        }

        #[test]
        fn test_unterminated_literal() {
            sql_parity_cmd()
                .arg("operation")
                .arg("select 'abc")
                .assert()
                .failure()
                .stdout("")
                .stderr(predicate::str::contains("Error: sql parser error:"));
        }

        #[test]
        fn test_file_not_found() {
            sql_parity_cmd()
                .arg("normalize")
                .arg("--file")
                .arg("non_existent_file.sql")
                .assert()
                .failure()
                .stdout("")
                .stderr(predicate::str::contains(
                    "Failed to read file non_existent_file.sql:",
                ));
        }

        #[test]
        fn test_compare_file_not_found() {
            let expected = sql_file("select 1;");
            sql_parity_cmd()
                .arg("compare")
                .arg("--expected")
                .arg(expected.path())
                .arg("--actual")
                .arg("non_existent_file.sql")
                .assert()
                .failure()
                .stdout("")
                .stderr(predicate::str::contains(
                    "Error: Failed to read file non_existent_file.sql:",
                ));
        }

        #[test]
        fn test_compare_requires_both_files() {
            let expected = sql_file("select 1;");
            sql_parity_cmd()
                .arg("compare")
                .arg("--expected")
                .arg(expected.path())
                .assert()
                .failure()
                .stdout("")
                .stderr(predicate::str::contains(
                    "the following required arguments were not provided",
                ));
        }
    }
}

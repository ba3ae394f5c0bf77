use std::fs;
use std::io::{self, IsTerminal, Read, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use crate::core::db::Database;
use crate::core::sql::TableFormatter;
use crate::core::types::QueryResult;

/// 查询结果的输出格式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputMode {
    #[default]
    Ascii,
    Csv,
    Json,
}

/// Execute semicolon-terminated statements from stdin (or a file) against an in-memory database
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Render query results as comma-separated values
    #[arg(long, overrides_with_all = ["ascii", "json"])]
    csv: bool,

    /// Render query results as a bordered text table (default)
    #[arg(long, overrides_with_all = ["csv", "json"])]
    ascii: bool,

    /// Render query results as JSON documents
    #[arg(long, overrides_with_all = ["csv", "ascii"])]
    json: bool,

    /// Read statements from a file instead of standard input
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}

impl Cli {
    pub fn output_mode(&self) -> OutputMode {
        // 三个开关互相覆盖，最多只有一个为 true
        if self.csv {
            OutputMode::Csv
        } else if self.json {
            OutputMode::Json
        } else if self.ascii {
            OutputMode::Ascii
        } else {
            OutputMode::default()
        }
    }

    pub fn run(&self) -> anyhow::Result<()> {
        let input = self.read_input()?;
        let stdout = io::stdout();
        let stderr = io::stderr();
        let mut db = Database::new();
        self.run_with(&mut db, &input, &mut stdout.lock(), &mut stderr.lock())
    }

    /// 执行整段输入：查询结果写入 `out`，每条失败语句的错误写入 `err`
    pub fn run_with<W: Write, E: Write>(
        &self,
        db: &mut Database,
        input: &str,
        out: &mut W,
        err: &mut E,
    ) -> anyhow::Result<()> {
        let mode = self.output_mode();
        for entry in db.execute_batch(input) {
            match entry.result {
                Ok(result) => {
                    if let Some(query) = result.query() {
                        out.write_all(render(query, mode)?.as_bytes())?;
                    }
                }
                Err(e) => {
                    writeln!(err, "{} in statement {}: {}", e.stage(), entry.index, e)?;
                }
            }
        }
        out.flush()?;
        Ok(())
    }

    fn read_input(&self) -> anyhow::Result<String> {
        if let Some(path) = &self.file {
            return fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()));
        }

        let stdin = io::stdin();
        if stdin.is_terminal() {
            eprintln!("Enter SQL statements (end with Ctrl+D):");
        }
        let mut input = String::new();
        stdin
            .lock()
            .read_to_string(&mut input)
            .context("failed to read standard input")?;
        Ok(input)
    }
}

fn render(result: &QueryResult, mode: OutputMode) -> anyhow::Result<String> {
    Ok(match mode {
        OutputMode::Ascii => TableFormatter::format_ascii(result),
        OutputMode::Csv => TableFormatter::format_csv(result),
        OutputMode::Json => TableFormatter::format_json(result)?,
    })
}

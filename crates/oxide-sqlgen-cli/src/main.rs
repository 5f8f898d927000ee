//! oxide-sqlgen CLI
//!
//! Command-line tool printing the generated SQL for a model described in JSON.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{debug, info, Level};
use tracing_subscriber::FmtSubscriber;

use oxide_sqlgen_core::ddl::{build_fts_artifacts, create_table, FtsMode};
use oxide_sqlgen_core::{BuilderConfig, DialectKind, ModelDescriptor, TableCache};

/// Dialect-aware CRUD templates and DDL from a model description.
#[derive(Parser)]
#[command(name = "oxide-sqlgen")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// JSON file describing the model.
    #[arg(short, long)]
    model: PathBuf,

    /// Target dialect (`sqlite` or `sqlserver`).
    #[arg(short, long, env = "OXIDE_SQLGEN_DIALECT", default_value = "sqlite")]
    dialect: DialectKind,

    /// Table name override.
    #[arg(short, long)]
    table: Option<String>,

    /// JSON file with builder settings.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print every CRUD template of the table.
    Templates,

    /// Print the CREATE TABLE statement.
    CreateTable,

    /// Print the FTS5 virtual table and its triggers.
    Fts {
        /// Comma separated fields to index.
        #[arg(long, value_delimiter = ',', required = true)]
        columns: Vec<String>,

        /// How the index stores its text.
        #[arg(long, value_enum, default_value_t = Mode::ExternalContent)]
        mode: Mode,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Mode {
    Content,
    ContentLess,
    ExternalContent,
}

impl From<Mode> for FtsMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Content => Self::Content,
            Mode::ContentLess => Self::ContentLess,
            Mode::ExternalContent => Self::ExternalContent,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let output = run(&cli)?;
    println!("{output}");
    Ok(())
}

fn run(cli: &Cli) -> anyhow::Result<String> {
    let model = load_model(&cli.model)?;
    let config = cli
        .config
        .as_deref()
        .map(load_config)
        .transpose()?
        .unwrap_or_default();
    debug!(?config, "loaded builder configuration");

    let cache = TableCache::new(config);
    let table = cache
        .get_or_build(&model, cli.dialect, cli.table.as_deref())
        .with_context(|| format!("invalid model `{}`", model.name))?;
    info!(
        "Generating SQL for table {} ({})",
        table.name(),
        cli.dialect
    );

    let output = match &cli.command {
        Commands::Templates => {
            let sections: Vec<String> = table
                .templates()
                .iter()
                .map(|template| format!("-- {}\n{}", template.kind(), template.sql()))
                .collect();
            sections.join("\n\n")
        }
        Commands::CreateTable => create_table(&table),
        Commands::Fts { columns, mode } => {
            let columns: Vec<&str> = columns.iter().map(String::as_str).collect();
            build_fts_artifacts(&table, &columns, (*mode).into())?
        }
    };
    Ok(output)
}

fn load_model(path: &Path) -> anyhow::Result<ModelDescriptor> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read model file {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("failed to parse model file {}", path.display()))
}

fn load_config(path: &Path) -> anyhow::Result<BuilderConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("failed to parse config file {}", path.display()))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    const PERSON: &str = r#"{
        "name": "Person",
        "fields": [
            { "name": "Id", "type": "long" },
            { "name": "Name", "type": "string" },
            { "name": "Age", "type": "int", "nullable": true }
        ]
    }"#;

    fn json_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("oxide-sqlgen").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_templates_output() {
        let model = json_file(PERSON);
        let path = model.path().to_str().unwrap();
        let output = run(&cli(&["--model", path, "templates"])).unwrap();

        assert!(output.starts_with("-- select\nSELECT\n    [Person].[Id] AS 'Id',"));
        assert!(output.contains(
            "-- insert\nINSERT INTO [Person] ([Name],[Age])\nVALUES (@Name,@Age);\nSELECT last_insert_rowid() AS Id;"
        ));
        assert!(output.ends_with("-- delete\nDELETE FROM [Person] WHERE 1=1;"));
        assert_eq!(output.matches("-- ").count(), 6);
    }

    #[test]
    fn test_create_table_with_override_and_dialect() {
        let model = json_file(PERSON);
        let path = model.path().to_str().unwrap();
        let output = run(&cli(&[
            "--model",
            path,
            "--dialect",
            "mssql",
            "--table",
            "People",
            "create-table",
        ]))
        .unwrap();
        assert_eq!(
            output,
            "IF OBJECT_ID(N'[People]', N'U') IS NULL\n\
             CREATE TABLE [People] (\n    \
             [Id] BIGINT IDENTITY(1,1) PRIMARY KEY,\n    \
             [Name] NVARCHAR(MAX) NOT NULL,\n    \
             [Age] INT\n);"
        );
    }

    #[test]
    fn test_config_disables_identity_convention() {
        let model = json_file(PERSON);
        let config = json_file(r#"{ "identity_convention": "disabled" }"#);
        let output = run(&cli(&[
            "--model",
            model.path().to_str().unwrap(),
            "--config",
            config.path().to_str().unwrap(),
            "create-table",
        ]))
        .unwrap();
        assert!(output.contains("    [Id] INTEGER NOT NULL,\n"));
    }

    #[test]
    fn test_fts_columns() {
        let model = json_file(PERSON);
        let path = model.path().to_str().unwrap();
        let output = run(&cli(&[
            "--model",
            path,
            "fts",
            "--columns",
            "Name",
            "--mode",
            "content-less",
        ]))
        .unwrap();
        assert_eq!(
            output,
            "CREATE VIRTUAL TABLE IF NOT EXISTS [Person_fts] USING fts5(\n    [Name],\n    content = ''\n);"
        );
    }

    #[test]
    fn test_fts_on_sql_server_fails() {
        let model = json_file(PERSON);
        let path = model.path().to_str().unwrap();
        let err = run(&cli(&[
            "--model",
            path,
            "--dialect",
            "sqlserver",
            "fts",
            "--columns",
            "Name",
        ]))
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "dialect `sqlserver` does not support FTS5 virtual tables"
        );
    }

    #[test]
    fn test_invalid_model_reports_context() {
        let model = json_file(r#"{ "name": "Empty", "fields": [] }"#);
        let err = run(&cli(&["--model", model.path().to_str().unwrap(), "templates"])).unwrap_err();
        assert_eq!(err.to_string(), "invalid model `Empty`");
        assert_eq!(
            err.root_cause().to_string(),
            "model `Empty` has no persisted columns"
        );
    }

    #[test]
    fn test_unknown_dialect_rejected() {
        let parsed = Cli::try_parse_from([
            "oxide-sqlgen",
            "--model",
            "m.json",
            "--dialect",
            "oracle",
            "templates",
        ]);
        assert!(parsed.is_err());
    }
}

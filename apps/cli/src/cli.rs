//! # Command Line Surface
//!
//! ```text
//! cotizador [--config F] [--db F] [--output-dir D] [--assets D] [--format pdf|html]
//!           [--ephemeral] [--verbose] <COMMAND>
//!
//!   generate  --client NAME [--address TEXT] --id CC [--item "DESC[=VALUE]"]...
//!             [--input quotation.toml] [--json]
//!   preview   (same inputs as generate)
//!   counter
//! ```
//!
//! ## Input File
//! ```toml
//! [client]
//! name = "Juan Perez"
//! id = "123"
//!
//! [[items]]
//! description = "Pintura"
//! value = 50000
//!
//! [[items]]
//! description = "Latonería"
//! ```
//!
//! Flags override the file's client fields; `--item`s are appended after the
//! file's items.

use clap::{Args, Parser, Subcommand};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use cotizador_render::RenderFormat;

use crate::error::AppError;
use crate::state::{ConfigOverrides, QuotationForm};

#[derive(Debug, Parser)]
#[command(name = "cotizador", version, about = "Numbered quotations for AUTOROSEMBERG")]
pub struct Cli {
    /// Config file (default: config.toml in the platform config dir)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// SQLite database holding the quotation counter
    #[arg(long, global = true, value_name = "FILE")]
    pub db: Option<PathBuf>,

    /// Directory for generated quotations
    #[arg(long, global = true, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Directory holding the logo and signature images
    #[arg(long, global = true, value_name = "DIR")]
    pub assets: Option<PathBuf>,

    /// Output format: pdf or html
    #[arg(long, global = true)]
    pub format: Option<RenderFormat>,

    /// Keep the counter in memory; numbers are not persisted
    #[arg(long, global = true)]
    pub ephemeral: bool,

    /// Debug logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Issue the next number and write the quotation
    Generate(QuotationArgs),
    /// Show the current counter and the next number
    Counter,
    /// Print the document tree without issuing a number
    Preview(QuotationArgs),
}

#[derive(Debug, Clone, Default, Args)]
pub struct QuotationArgs {
    /// Client name
    #[arg(long)]
    pub client: Option<String>,

    /// Client address
    #[arg(long)]
    pub address: Option<String>,

    /// Client C.C. or NIT
    #[arg(long)]
    pub id: Option<String>,

    /// Line item as DESC or DESC=VALUE; repeatable
    #[arg(long = "item", value_name = "DESC[=VALUE]")]
    pub items: Vec<String>,

    /// TOML file with [client] and [[items]]
    #[arg(long, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Print a JSON summary instead of text
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            config_file: self.config.clone(),
            database: self.db.clone(),
            output_dir: self.output_dir.clone(),
            asset_dir: self.assets.clone(),
            format: self.format,
            ephemeral: self.ephemeral,
        }
    }
}

// =============================================================================
// Input File
// =============================================================================

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct QuotationInput {
    pub client: ClientInput,
    pub items: Vec<ItemInput>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ClientInput {
    pub name: String,
    pub address: String,
    pub id: String,
}

#[derive(Debug, Deserialize)]
pub struct ItemInput {
    pub description: String,
    #[serde(default)]
    pub value: Option<ItemValue>,
}

/// Item values may be written as TOML numbers or strings.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ItemValue {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl ItemValue {
    fn as_raw(&self) -> String {
        match self {
            ItemValue::Integer(n) => n.to_string(),
            ItemValue::Float(n) => n.to_string(),
            ItemValue::Text(s) => s.clone(),
        }
    }
}

impl QuotationInput {
    pub fn read(path: &Path) -> Result<Self, AppError> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            AppError::validation(format!("Could not read input file {}: {}", path.display(), e))
        })?;
        Self::parse(&text)
            .map_err(|e| AppError::validation(format!("Invalid input file {}: {}", path.display(), e)))
    }

    pub fn parse(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }
}

/// Splits `DESC=VALUE` at the last `=`; no `=` means no value.
pub fn split_item(raw: &str) -> (&str, &str) {
    match raw.rsplit_once('=') {
        Some((description, value)) => (description, value),
        None => (raw, ""),
    }
}

impl QuotationArgs {
    /// Builds the form: file first, then flags.
    ///
    /// Items go through the form one at a time; the first rejected item
    /// stops the build and is reported with its 1-based position.
    pub fn to_form(&self) -> Result<QuotationForm, AppError> {
        let input = match &self.input {
            Some(path) => QuotationInput::read(path)?,
            None => QuotationInput::default(),
        };
        self.build_form(input)
    }

    pub fn build_form(&self, input: QuotationInput) -> Result<QuotationForm, AppError> {
        let pick = |flag: &Option<String>, file: String| flag.clone().unwrap_or(file);

        let mut form = QuotationForm::for_client(
            &pick(&self.client, input.client.name),
            &pick(&self.address, input.client.address),
            &pick(&self.id, input.client.id),
        );

        let file_items = input.items.into_iter().map(|item| {
            let raw = item.value.as_ref().map(ItemValue::as_raw).unwrap_or_default();
            (item.description, raw)
        });
        let flag_items = self.items.iter().map(|raw| {
            let (description, value) = split_item(raw);
            (description.to_string(), value.to_string())
        });

        for (position, (description, value)) in file_items.chain(flag_items).enumerate() {
            form.add_item(&description, &value).map_err(|e| {
                AppError::validation(format!(
                    "Item {} ('{}'): {}",
                    position + 1,
                    description.trim(),
                    e
                ))
            })?;
        }

        Ok(form)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use cotizador_core::Money;

    #[test]
    fn test_parse_generate() {
        let cli = Cli::try_parse_from([
            "cotizador",
            "--format",
            "html",
            "generate",
            "--client",
            "Juan Perez",
            "--id",
            "123",
            "--item",
            "Pintura=50000",
            "--item",
            "Latonería",
            "--ephemeral",
        ])
        .unwrap();

        assert_eq!(cli.format, Some(RenderFormat::Html));
        assert!(cli.ephemeral);
        let Command::Generate(args) = cli.command else {
            panic!("expected generate");
        };

        let form = args.build_form(QuotationInput::default()).unwrap();
        assert_eq!(form.cliente, "Juan Perez");
        assert_eq!(form.items.len(), 2);
        assert_eq!(form.items.items()[1].value(), None);
        assert_eq!(form.items.total(), Money::from_units(50_000));
    }

    #[test]
    fn test_unknown_format_rejected() {
        assert!(Cli::try_parse_from(["cotizador", "--format", "docx", "counter"]).is_err());
    }

    #[test]
    fn test_split_item() {
        assert_eq!(split_item("Pintura=50000"), ("Pintura", "50000"));
        assert_eq!(split_item("Latonería"), ("Latonería", ""));
        assert_eq!(split_item("a=b=7"), ("a=b", "7"));
    }

    #[test]
    fn test_input_file_then_flags() {
        let input = QuotationInput::parse(
            r#"
            [client]
            name = "Juan Perez"
            address = "Calle 1"
            id = "123"

            [[items]]
            description = "Pintura"
            value = 50000

            [[items]]
            description = "Latonería"

            [[items]]
            description = "Pulida"
            value = "20000"
            "#,
        )
        .unwrap();

        let args = QuotationArgs {
            address: Some("Carrera 2".to_string()),
            items: vec!["Polichada=1000".to_string()],
            ..QuotationArgs::default()
        };

        let form = args.build_form(input).unwrap();
        assert_eq!(form.cliente, "Juan Perez");
        assert_eq!(form.direccion, "Carrera 2");
        let descriptions: Vec<_> = form.items.items().iter().map(|i| i.description()).collect();
        assert_eq!(descriptions, ["Pintura", "Latonería", "Pulida", "Polichada"]);
    }

    #[test]
    fn test_first_invalid_item_reported_with_position() {
        let args = QuotationArgs {
            items: vec![
                "Pintura=50000".to_string(),
                "Latonería=abc".to_string(),
                "=5".to_string(),
            ],
            ..QuotationArgs::default()
        };

        let err = args.build_form(QuotationInput::default()).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert!(err.message.starts_with("Item 2 ('Latonería')"));
    }
}

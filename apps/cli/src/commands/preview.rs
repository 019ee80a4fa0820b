//! `cotizador preview`

use chrono::NaiveDate;
use std::io::Write;

use cotizador_render::renderer_for;

use crate::cli::QuotationArgs;
use crate::error::AppError;
use crate::generator::QuotationGenerator;
use crate::state::{ConfigState, DbState};

/// Prints the document tree the next `generate` would render.
pub async fn run(
    config: &ConfigState,
    db: &DbState,
    args: &QuotationArgs,
    date: NaiveDate,
    out: &mut impl Write,
) -> Result<(), AppError> {
    let form = args.to_form()?;
    // The renderer is never invoked by a preview.
    let renderer = renderer_for(config.format, &config.asset_dir, &config.output_dir);
    let mut generator = QuotationGenerator::new(db.counter(), super::composer(config), renderer);

    let document = generator.preview(&form, date).await?;
    serde_json::to_writer_pretty(&mut *out, &document)?;
    writeln!(out)?;
    Ok(())
}

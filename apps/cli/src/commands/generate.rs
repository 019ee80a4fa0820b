//! `cotizador generate`

use chrono::NaiveDate;
use std::io::Write;
use tracing::info;

use cotizador_render::renderer_for;

use crate::cli::QuotationArgs;
use crate::error::AppError;
use crate::generator::QuotationGenerator;
use crate::state::{ConfigState, DbState};

/// Issues the next number and writes the quotation artifact.
///
/// ## Output
/// ```text
/// COT-2
/// Total: $ 50.000
/// ./Factura_Juan Perez.pdf
/// ```
pub async fn run(
    config: &ConfigState,
    db: &DbState,
    args: &QuotationArgs,
    date: NaiveDate,
    out: &mut impl Write,
) -> Result<(), AppError> {
    let mut form = args.to_form()?;
    info!(items = form.items.len(), format = %config.format, "Generating quotation");

    let renderer = renderer_for(config.format, &config.asset_dir, &config.output_dir);
    let mut generator = QuotationGenerator::new(db.counter(), super::composer(config), renderer);

    let generated = generator.generate(&mut form, date).await?;

    if args.json {
        serde_json::to_writer_pretty(&mut *out, &generated)?;
        writeln!(out)?;
    } else {
        writeln!(out, "{}", generated.number)?;
        writeln!(out, "Total: {}", generated.total_display)?;
        writeln!(out, "{}", generated.artifact.path.display())?;
    }
    Ok(())
}

//! # HTML Renderer
//!
//! Standalone HTML page with the workshop's stylesheet. Every string from
//! the document tree goes through [`escape_html`]; the logo and signature
//! are embedded as `data:` URIs so the page opens correctly wherever it is
//! saved.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use std::path::PathBuf;

use cotizador_core::document::{
    Block, ClientInfoBlock, HeaderBlock, ItemTable, QuotationInfoBlock, SignatureBlock,
};
use cotizador_core::{Document, ImageRef};
use tracing::info;

use crate::assets::AssetResolver;
use crate::error::RenderResult;
use crate::output::{output_file_name, write_atomic};
use crate::{DocumentRenderer, RenderFormat, RenderedArtifact};

const STYLESHEET: &str = r#"
        body { font-family: Arial, sans-serif; margin: 0; padding: 20px; }
        .invoice-container { max-width: 800px; margin: 0 auto; border: 1px solid #ccc; padding: 20px; background-color: #fff; box-shadow: 0 2px 5px rgba(0, 0, 0, 0.1); }
        .header { text-align: center; margin-bottom: 20px; position: relative; }
        .company-name { color: navy; font-size: 28px; font-weight: bold; letter-spacing: 2px; }
        .company-details { font-size: 14px; margin: 5px 0; }
        .company-logo { margin-top: 20px; text-align: center; }
        .company-logo img { max-width: 100%; height: auto; }
        .invoice-info { display: flex; justify-content: space-between; margin: 20px 0; border: 2px solid #0066cc; padding: 10px; }
        .client-info { flex: 2; }
        .form-row { display: flex; margin-bottom: 10px; }
        .form-label { width: 100px; font-weight: bold; }
        .form-value { flex: 1; border-bottom: 1px solid #ccc; }
        .invoice-table { width: 100%; max-width: 98%; border-collapse: collapse; margin: 10px auto; }
        .invoice-table th, .invoice-table td { border: 1px solid #0066cc; padding: 8px; }
        .invoice-table th { background-color: #0066cc; color: white; text-align: center; }
        .total-row { font-weight: bold; }
        .signatures { display: flex; justify-content: space-evenly; margin-top: 50px; }
        .signature-line { text-align: center; width: 200px; display: flex; flex-direction: column; align-items: center; }
        .signature-image, .signature-placeholder { max-width: 200px; height: 100px; margin-bottom: 2px; }
        .signature-placeholder { background-color: transparent; }
        .signature-divider { border-top: 1px solid #000; width: 100%; margin: 5px 0; }
"#;

/// Escapes text for use in HTML element content and attribute values.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Writes `.html` files into an output directory.
#[derive(Debug, Clone)]
pub struct HtmlRenderer {
    assets: AssetResolver,
    output_dir: PathBuf,
}

impl HtmlRenderer {
    pub fn new(assets: AssetResolver, output_dir: impl Into<PathBuf>) -> Self {
        HtmlRenderer {
            assets,
            output_dir: output_dir.into(),
        }
    }

    /// Produces the page markup without writing anything.
    ///
    /// Fails with `MissingAsset` if an image can't be resolved or read.
    pub fn to_html(&self, document: &Document) -> RenderResult<String> {
        let mut html = String::new();

        html.push_str("<!DOCTYPE html>\n<html lang=\"es\">\n<head>\n");
        html.push_str("    <meta charset=\"UTF-8\">\n");
        html.push_str(&format!("    <title>{}</title>\n", escape_html(&document.title)));
        html.push_str(&format!("    <style>{}    </style>\n", STYLESHEET));
        html.push_str("</head>\n<body>\n<div class=\"invoice-container\">\n");

        // Client and quotation info share one bordered row.
        let mut info_open = false;
        for block in &document.blocks {
            match block {
                Block::Header(header) => self.header(&mut html, header)?,
                Block::ClientInfo(client) => {
                    open_info(&mut html, &mut info_open);
                    client_info(&mut html, client);
                }
                Block::QuotationInfo(info) => {
                    open_info(&mut html, &mut info_open);
                    quotation_info(&mut html, info);
                }
                Block::ItemTable(table) => {
                    close_info(&mut html, &mut info_open);
                    item_table(&mut html, table);
                }
                Block::Signatures(signatures) => {
                    close_info(&mut html, &mut info_open);
                    self.signatures(&mut html, signatures)?;
                }
            }
        }
        close_info(&mut html, &mut info_open);

        html.push_str("</div>\n</body>\n</html>\n");
        Ok(html)
    }

    /// `<img>` with the asset inlined as a base64 data URI.
    fn image_tag(&self, image: &ImageRef, class: &str) -> RenderResult<String> {
        let asset = self.assets.resolve(image)?;
        let bytes = asset.read()?;
        Ok(format!(
            "<img src=\"data:{};base64,{}\" alt=\"{}\" class=\"{}\">",
            asset.kind.mime_type(),
            BASE64.encode(bytes),
            escape_html(&image.alt),
            class
        ))
    }

    fn header(&self, html: &mut String, header: &HeaderBlock) -> RenderResult<()> {
        html.push_str("<div class=\"header\">\n");
        html.push_str(&format!(
            "    <div class=\"company-name\">{}</div>\n",
            escape_html(&header.company_name)
        ));
        for line in &header.details {
            html.push_str(&format!(
                "    <div class=\"company-details\">{}</div>\n",
                escape_html(line)
            ));
        }
        html.push_str("</div>\n");

        html.push_str(&format!(
            "<div class=\"company-logo\">\n    {}\n</div>\n",
            self.image_tag(&header.logo, "logo")?
        ));
        Ok(())
    }

    fn signatures(&self, html: &mut String, block: &SignatureBlock) -> RenderResult<()> {
        html.push_str("<div class=\"signatures\">\n");
        for slot in &block.slots {
            html.push_str("    <div class=\"signature-line\">\n");
            match &slot.image {
                Some(image) => html.push_str(&format!(
                    "        {}\n",
                    self.image_tag(image, "signature-image")?
                )),
                None => html.push_str("        <div class=\"signature-placeholder\"></div>\n"),
            }
            html.push_str("        <div class=\"signature-divider\"></div>\n");
            html.push_str(&format!("        {}\n", escape_html(&slot.label)));
            html.push_str("    </div>\n");
        }
        html.push_str("</div>\n");
        Ok(())
    }
}

fn open_info(html: &mut String, open: &mut bool) {
    if !*open {
        html.push_str("<div class=\"invoice-info\">\n");
        *open = true;
    }
}

fn close_info(html: &mut String, open: &mut bool) {
    if *open {
        html.push_str("</div>\n");
        *open = false;
    }
}

fn client_info(html: &mut String, block: &ClientInfoBlock) {
    html.push_str("    <div class=\"client-info\">\n");
    for field in &block.fields {
        html.push_str(&format!(
            "        <div class=\"form-row\"><div class=\"form-label\">{}</div><div class=\"form-value\">{}</div></div>\n",
            escape_html(&field.label),
            escape_html(&field.value)
        ));
    }
    html.push_str("    </div>\n");
}

fn quotation_info(html: &mut String, info: &QuotationInfoBlock) {
    html.push_str("    <div class=\"invoice-number\">\n");
    for line in [&info.title, &info.number, &info.date_label, &info.date] {
        html.push_str(&format!("        <div>{}</div>\n", escape_html(line)));
    }
    html.push_str("    </div>\n");
}

fn item_table(html: &mut String, table: &ItemTable) {
    html.push_str("<table class=\"invoice-table\">\n    <thead>\n        <tr>");
    for column in &table.columns {
        html.push_str(&format!("<th>{}</th>", escape_html(column)));
    }
    html.push_str("</tr>\n    </thead>\n    <tbody>\n");

    for row in &table.rows {
        html.push_str(&format!(
            "        <tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
            row.index,
            escape_html(&row.description),
            escape_html(&row.unit_value),
            escape_html(&row.total_value)
        ));
    }

    let span = table.columns.len().saturating_sub(1).max(1);
    html.push_str(&format!(
        "    </tbody>\n    <tfoot>\n        <tr class=\"total-row\"><td colspan=\"{}\" style=\"text-align: right;\">{}</td><td>{}</td></tr>\n    </tfoot>\n</table>\n",
        span,
        escape_html(&table.total.label),
        escape_html(&table.total.value)
    ));
}

impl DocumentRenderer for HtmlRenderer {
    fn format(&self) -> RenderFormat {
        RenderFormat::Html
    }

    fn render(&self, document: &Document, suggested_file_name: &str) -> RenderResult<RenderedArtifact> {
        let html = self.to_html(document)?;
        let file_name = output_file_name(suggested_file_name, RenderFormat::Html.extension());
        let path = write_atomic(&self.output_dir, &file_name, html.as_bytes())?;

        info!(path = %path.display(), "HTML quotation written");
        Ok(RenderedArtifact {
            path,
            format: RenderFormat::Html,
            bytes_written: html.len() as u64,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RenderError;
    use chrono::NaiveDate;
    use cotizador_core::{ClientRecord, DocumentComposer, LineItem, Money, QuotationNumber};

    fn document(client_name: &str) -> Document {
        let items = vec![
            LineItem::new("Pintura", Some(Money::from_units(50_000))).unwrap(),
            LineItem::new("Latonería <b>", None).unwrap(),
        ];
        DocumentComposer::default()
            .compose(
                &ClientRecord::new(client_name, "", "123"),
                &items,
                &QuotationNumber::new(2),
                NaiveDate::from_ymd_opt(2026, 10, 16).unwrap(),
            )
            .unwrap()
    }

    fn asset_dir() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("LOGO.jpg"), b"logo").unwrap();
        std::fs::write(dir.path().join("FIRMA.jpg"), b"firma").unwrap();
        dir
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<script>alert("x") & 'y'</script>"#),
            "&lt;script&gt;alert(&quot;x&quot;) &amp; &#39;y&#39;&lt;/script&gt;"
        );
        assert_eq!(escape_html("José Núñez"), "José Núñez");
    }

    #[test]
    fn test_to_html_content() {
        let assets = asset_dir();
        let out = tempfile::tempdir().unwrap();
        let renderer = HtmlRenderer::new(AssetResolver::new(assets.path()), out.path());

        let html = renderer.to_html(&document("<i>Juan</i>")).unwrap();

        assert!(html.contains("<title>Factura Autorosemberg</title>"));
        assert!(html.contains("&lt;i&gt;Juan&lt;/i&gt;"));
        assert!(!html.contains("<i>Juan</i>"));
        assert!(html.contains("Latonería &lt;b&gt;"));
        assert!(html.contains("<div>N° COT-2</div>"));
        assert!(html.contains("<div>16/10/2026</div>"));
        assert!(html.contains("<td>$ 50.000</td></tr>\n    </tfoot>"));
        assert!(html.contains("colspan=\"3\""));

        let buyer = html.find("FIRMA COMPRADOR").unwrap();
        let vendor = html.find("FIRMA VENDEDOR").unwrap();
        assert!(buyer < vendor);
    }

    #[test]
    fn test_images_are_embedded_as_data_uris() {
        // Relative asset dir, output somewhere else entirely.
        let assets = tempfile::tempdir_in(".").unwrap();
        std::fs::write(assets.path().join("LOGO.jpg"), b"logo").unwrap();
        std::fs::write(assets.path().join("FIRMA.jpg"), b"firma").unwrap();
        let relative = std::path::Path::new(assets.path().file_name().unwrap());
        let out = tempfile::tempdir().unwrap();
        let renderer = HtmlRenderer::new(AssetResolver::new(relative), out.path().join("sub"));

        let artifact = renderer
            .render(&document("Juan Perez"), "Factura_Juan Perez.pdf")
            .unwrap();
        let html = std::fs::read_to_string(&artifact.path).unwrap();

        // "logo" and "firma" in base64
        assert!(html.contains(r#"src="data:image/jpeg;base64,bG9nbw==""#));
        assert!(html.contains(r#"src="data:image/jpeg;base64,ZmlybWE=""#));
        assert!(!html.contains("LOGO.jpg"));
        assert!(!html.contains(&*relative.to_string_lossy()));
    }

    #[test]
    fn test_png_asset_mime_type() {
        let assets = tempfile::tempdir().unwrap();
        std::fs::write(assets.path().join("logo.png"), b"png").unwrap();
        let renderer = HtmlRenderer::new(AssetResolver::new(assets.path()), assets.path());

        let tag = renderer
            .image_tag(&ImageRef::new("logo.png", "Logo"), "logo")
            .unwrap();
        assert_eq!(
            tag,
            r#"<img src="data:image/png;base64,cG5n" alt="Logo" class="logo">"#
        );
    }

    #[test]
    fn test_render_writes_html_file() {
        let assets = asset_dir();
        let out = tempfile::tempdir().unwrap();
        let renderer = HtmlRenderer::new(AssetResolver::new(assets.path()), out.path());

        let artifact = renderer
            .render(&document("Juan Perez"), "Factura_Juan Perez.pdf")
            .unwrap();

        assert_eq!(artifact.path, out.path().join("Factura_Juan Perez.html"));
        assert_eq!(artifact.format, RenderFormat::Html);
        let written = std::fs::read_to_string(&artifact.path).unwrap();
        assert_eq!(written.len() as u64, artifact.bytes_written);
    }

    #[test]
    fn test_missing_asset_writes_nothing() {
        let assets = tempfile::tempdir().unwrap();
        std::fs::write(assets.path().join("LOGO.jpg"), b"logo").unwrap();
        let out = tempfile::tempdir().unwrap();
        let renderer = HtmlRenderer::new(AssetResolver::new(assets.path()), out.path());

        let err = renderer
            .render(&document("Juan Perez"), "Factura_Juan Perez.pdf")
            .unwrap_err();

        assert!(matches!(err, RenderError::MissingAsset { .. }));
        assert_eq!(std::fs::read_dir(out.path()).unwrap().count(), 0);
    }
}

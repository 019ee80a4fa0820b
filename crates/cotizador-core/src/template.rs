//! # Document Template
//!
//! Fixed content of every quotation: company identity, image references and
//! the Spanish labels printed on the document.
//!
//! The defaults reproduce the workshop's letterhead. A config file may
//! override the [`CompanyProfile`]; labels are not configurable.

use serde::{Deserialize, Serialize};

use crate::document::ImageRef;

// =============================================================================
// Labels
// =============================================================================

pub const LABEL_CLIENT: &str = "CLIENTE:";
pub const LABEL_ADDRESS: &str = "DIRECCION:";
pub const LABEL_CLIENT_ID: &str = "C.C. ó NIT:";
pub const LABEL_QUOTATION: &str = "COTIZACIÓN";
pub const LABEL_NUMBER_PREFIX: &str = "N°";
pub const LABEL_DATE: &str = "FECHA";
pub const LABEL_TOTAL: &str = "Total:";
pub const LABEL_BUYER_SIGNATURE: &str = "FIRMA COMPRADOR";
pub const LABEL_VENDOR_SIGNATURE: &str = "FIRMA VENDEDOR";

/// Item table column headers, in display order.
pub const ITEM_COLUMNS: [&str; 4] = ["Unit", "Descripción", "Valor Unitario", "Valor Total"];

/// Prefix of the suggested output file name.
pub const FILE_NAME_PREFIX: &str = "Factura_";

/// Suggested artifact name for a client: `Factura_<clientName>.pdf`.
///
/// The name is returned verbatim; renderers sanitize it before touching the
/// filesystem.
pub fn suggested_file_name(client_name: &str) -> String {
    format!("{}{}.pdf", FILE_NAME_PREFIX, client_name)
}

// =============================================================================
// Company Profile
// =============================================================================

/// Letterhead printed at the top of the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct CompanyProfile {
    /// Title of the rendered document (HTML `<title>`, PDF metadata).
    pub document_title: String,

    /// Company name, printed large.
    pub name: String,

    /// Detail lines under the name (trade, owner, tax id, address).
    pub details: Vec<String>,

    /// Logo image, relative to the asset directory.
    pub logo: String,

    /// Pre-filled vendor signature image, relative to the asset directory.
    pub signature: String,
}

impl Default for CompanyProfile {
    fn default() -> Self {
        CompanyProfile {
            document_title: "Factura Autorosemberg".to_string(),
            name: "AUTOROSEMBERG".to_string(),
            details: vec![
                "LATONERÍA Y PINTURA AUTOMOTRIZ".to_string(),
                "Rosemberg Castellanos G.".to_string(),
                "Nit. 17.332.303-3 Régimen Simplificado".to_string(),
                "Villavicencio: Cra 16 No. 15-37 B. Remanso Cel.: 311 534 72 24".to_string(),
            ],
            logo: "LOGO.jpg".to_string(),
            signature: "FIRMA.jpg".to_string(),
        }
    }
}

impl CompanyProfile {
    pub fn logo_ref(&self) -> ImageRef {
        ImageRef::new(&self.logo, "Logo de la empresa")
    }

    pub fn signature_ref(&self) -> ImageRef {
        ImageRef::new(&self.signature, "Firma del Vendedor")
    }
}

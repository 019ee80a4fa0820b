//! # Quotation Generation
//!
//! Drives one generation attempt from form to artifact.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    generate(form, date)                                 │
//! │                                                                         │
//! │  Validating ──── fail ──► Validation error, nothing issued               │
//! │      │                                                                  │
//! │      ▼                                                                  │
//! │  IssuingSequence ── fail ──► Persistence error, counter unchanged       │
//! │      │                                                                  │
//! │      ▼                                                                  │
//! │  Composing                                                              │
//! │      │                                                                  │
//! │      ▼                                                                  │
//! │  Rendering ──── fail ──► Render { number } error: the number is spent,  │
//! │      │                   the form is kept for a retry                   │
//! │      ▼                                                                  │
//! │  ResetState ──► form cleared, GeneratedQuotation returned               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A failed render is never retried and the issued number is never rolled
//! back; the next attempt gets the following number.

use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use cotizador_core::validation::{validate_client, validate_items};
use cotizador_core::{
    suggested_file_name, Document, DocumentComposer, Money, Quotation, QuotationNumber,
    ValidationError,
};
use cotizador_db::{KeyValueStore, PersistenceError, SequenceCounter};
use cotizador_render::{DocumentRenderer, RenderError, RenderedArtifact};

use crate::state::QuotationForm;

/// Steps of a generation attempt, as logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationStage {
    Validating,
    IssuingSequence,
    Composing,
    Rendering,
    ResetState,
}

impl fmt::Display for GenerationStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GenerationStage::Validating => "validating",
            GenerationStage::IssuingSequence => "issuing_sequence",
            GenerationStage::Composing => "composing",
            GenerationStage::Rendering => "rendering",
            GenerationStage::ResetState => "reset_state",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    /// Rendering failed after `number` was issued.
    #[error("Quotation {number} could not be rendered: {source}")]
    Render {
        number: QuotationNumber,
        #[source]
        source: RenderError,
    },
}

/// Result of a successful generation.
#[derive(Debug, Clone, Serialize)]
pub struct GeneratedQuotation {
    pub number: QuotationNumber,
    pub total: Money,
    /// Total as printed on the document.
    pub total_display: String,
    pub artifact: RenderedArtifact,
}

/// Owns the counter, composer and renderer for the life of the process.
pub struct QuotationGenerator<S> {
    counter: SequenceCounter<S>,
    composer: DocumentComposer,
    renderer: Box<dyn DocumentRenderer>,
}

impl<S: KeyValueStore> QuotationGenerator<S> {
    pub fn new(
        counter: SequenceCounter<S>,
        composer: DocumentComposer,
        renderer: Box<dyn DocumentRenderer>,
    ) -> Self {
        QuotationGenerator {
            counter,
            composer,
            renderer,
        }
    }

    pub fn counter(&self) -> &SequenceCounter<S> {
        &self.counter
    }

    /// Runs one generation attempt.
    ///
    /// On success the form is reset. On any error the form is left as it was.
    #[instrument(skip_all, fields(attempt = %Uuid::new_v4()))]
    pub async fn generate(
        &mut self,
        form: &mut QuotationForm,
        date: NaiveDate,
    ) -> Result<GeneratedQuotation, GenerationError> {
        debug!(stage = %GenerationStage::Validating, "Generation started");
        let client = form.client_record();
        validate_client(&client)?;
        validate_items(form.items.items())?;

        debug!(stage = %GenerationStage::IssuingSequence);
        let number = self.counter.issue().await?;

        debug!(stage = %GenerationStage::Composing, number = %number);
        let quotation = Quotation::new(client, form.items.snapshot(), number, date);
        let document = self.composer.compose_quotation(&quotation)?;

        debug!(stage = %GenerationStage::Rendering, format = %self.renderer.format());
        let file_name = suggested_file_name(&quotation.client.name);
        let artifact = match self.renderer.render(&document, &file_name) {
            Ok(artifact) => artifact,
            Err(source) => {
                warn!(
                    number = %number,
                    error = %source,
                    "Render failed; the issued number is left unused"
                );
                return Err(GenerationError::Render { number, source });
            }
        };

        debug!(stage = %GenerationStage::ResetState);
        form.reset();

        let total_display = self.composer.currency().format_money(quotation.total);
        info!(
            number = %number,
            total = %total_display,
            path = %artifact.path.display(),
            "Quotation generated"
        );

        Ok(GeneratedQuotation {
            number,
            total: quotation.total,
            total_display,
            artifact,
        })
    }

    /// Composes the document the next generation would produce, using the
    /// next number as a placeholder. Issues nothing and renders nothing.
    pub async fn preview(
        &mut self,
        form: &QuotationForm,
        date: NaiveDate,
    ) -> Result<Document, GenerationError> {
        let client = form.client_record();
        validate_client(&client)?;
        validate_items(form.items.items())?;

        let number = self.counter.peek_next().await?;
        let quotation = Quotation::new(client, form.items.snapshot(), number, date);
        Ok(self.composer.compose_quotation(&quotation)?)
    }
}

//! Turns announcement blocks into dated records.
//!
//! Each block goes through extraction, phrase parsing and conversion. A block
//! that fails any stage is dropped with a [`Diagnostic`]; the rest of the
//! batch is unaffected.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::ExtractorConfig;
use crate::convert::{AdDate, ConversionError, to_ad};
use crate::extract::{ExtractError, RangeExtractor};
use crate::parse::parse_phrase;
use crate::prelude::*;
use crate::range::{IssueWindow, RangeError};
use crate::ParseError;

/// Layout the text was scraped from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StructureHint {
    TableRow { cells: Vec<String> },
}

/// One scraped announcement.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AnnouncementBlock {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<StructureHint>,
}

impl AnnouncementBlock {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            hint: None,
        }
    }

    pub fn with_hint(mut self, hint: StructureHint) -> Self {
        self.hint = Some(hint);
        self
    }

    /// Text to extract from. A table row with no text of its own reads as
    /// its cells joined by a dash.
    pub fn content(&self) -> String {
        match &self.hint {
            Some(StructureHint::TableRow { cells }) if self.text.trim().is_empty() => {
                cells
                    .iter()
                    .map(|cell| cell.trim())
                    .filter(|cell| !cell.is_empty())
                    .collect::<Vec<_>>()
                    .join(" - ")
            },
            _ => self.text.trim().to_owned(),
        }
    }
}

/// A fully dated announcement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedRecord {
    pub company:       String,
    #[serde(rename = "startDateBS")]
    pub start_date_bs: String,
    #[serde(rename = "endDateBS")]
    pub end_date_bs:   String,
    #[serde(rename = "startDateAD")]
    pub start_date_ad: AdDate,
    #[serde(rename = "endDateAD")]
    pub end_date_ad:   AdDate,
}

/// The `{company, startDate, endDate}` shape handed to storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IpoRow {
    pub company:    String,
    pub start_date: NaiveDate,
    pub end_date:   NaiveDate,
}

impl ExtractedRecord {
    /// Both dates came from tabulated years.
    pub const fn is_exact(&self) -> bool {
        self.start_date_ad.is_exact() && self.end_date_ad.is_exact()
    }

    /// # Errors
    /// `RangeError::InvalidRange` when the end converts to a day before the start.
    pub fn window(&self) -> Result<IssueWindow, RangeError> {
        IssueWindow::new(self.start_date_ad.date(), self.end_date_ad.date())
    }

    pub fn to_row(&self) -> IpoRow {
        IpoRow {
            company:    self.company.clone(),
            start_date: self.start_date_ad.date(),
            end_date:   self.end_date_ad.date(),
        }
    }
}

impl IpoRow {
    /// # Errors
    /// `RangeError::InvalidRange` when the end is before the start.
    pub fn window(&self) -> Result<IssueWindow, RangeError> {
        IssueWindow::new(self.start_date, self.end_date)
    }
}

/// Where in the pipeline a block was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    #[display(fmt = "relevance")]
    Relevance,
    #[display(fmt = "extract")]
    Extract,
    #[display(fmt = "parse_start")]
    ParseStart,
    #[display(fmt = "parse_end")]
    ParseEnd,
    #[display(fmt = "convert_start")]
    ConvertStart,
    #[display(fmt = "convert_end")]
    ConvertEnd,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StageError {
    #[error("no relevance keyword found")]
    NotRelevant,

    #[error(transparent)]
    Extract(#[from] ExtractError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Convert(#[from] ConversionError),
}

/// Why a block produced no record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Position of the block in the input.
    pub index:   usize,
    pub company: Option<String>,
    pub stage:   Stage,
    /// The date phrase that failed, for parse and convert stages.
    pub phrase:  Option<String>,
    pub error:   StageError,
}

/// Records and diagnostics from one run, both in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineReport {
    pub records:     Vec<ExtractedRecord>,
    pub diagnostics: Vec<Diagnostic>,
}

#[derive(Debug, Clone, Default)]
pub struct ExtractionPipeline {
    extractor: RangeExtractor,
}

impl ExtractionPipeline {
    pub const fn new(config: ExtractorConfig) -> Self {
        Self {
            extractor: RangeExtractor::new(config),
        }
    }

    pub const fn extractor(&self) -> &RangeExtractor {
        &self.extractor
    }

    /// Records for every block that made it through all stages, in input order.
    pub fn run(&self, blocks: &[AnnouncementBlock]) -> Vec<ExtractedRecord> {
        self.run_with_diagnostics(blocks).records
    }

    pub fn run_with_diagnostics(&self, blocks: &[AnnouncementBlock]) -> PipelineReport {
        let mut report = PipelineReport::default();

        for (index, block) in blocks.iter().enumerate() {
            match self.process(index, block) {
                Ok(record) => report.records.push(record),
                Err(diagnostic) => {
                    warn!(
                        index,
                        company = diagnostic.company.as_deref().unwrap_or("<unknown>"),
                        stage = %diagnostic.stage,
                        phrase = diagnostic.phrase.as_deref().unwrap_or(""),
                        error = %diagnostic.error,
                        "skipping announcement"
                    );
                    report.diagnostics.push(diagnostic);
                },
            }
        }

        info!(
            blocks = blocks.len(),
            records = report.records.len(),
            skipped = report.diagnostics.len(),
            "extraction finished"
        );
        report
    }

    /// Runs one block through every stage.
    ///
    /// # Errors
    /// A [`Diagnostic`] naming the first stage that failed.
    pub fn process(
        &self,
        index: usize,
        block: &AnnouncementBlock,
    ) -> Result<ExtractedRecord, Diagnostic> {
        let text = block.content();
        let fail = |company: Option<String>, stage, phrase: Option<&str>, error| Diagnostic {
            index,
            company,
            stage,
            phrase: phrase.map(str::to_owned),
            error,
        };

        if !self.extractor.config().is_relevant(&text) {
            return Err(fail(None, Stage::Relevance, None, StageError::NotRelevant));
        }

        let extraction = self.extractor.try_extract(&text).map_err(|e| {
            let company = match e {
                ExtractError::NoDatePatternMatch => self.extractor.company(&text),
                ExtractError::NoCompanyCandidate => None,
            };
            fail(company, Stage::Extract, None, e.into())
        })?;
        let company = extraction.company;
        let start_phrase = extraction.start_phrase;
        let end_phrase = extraction.end_phrase;

        let start = parse_phrase(&start_phrase).map_err(|e| {
            fail(Some(company.clone()), Stage::ParseStart, Some(&start_phrase), e.into())
        })?;
        let end = parse_phrase(&end_phrase).map_err(|e| {
            fail(Some(company.clone()), Stage::ParseEnd, Some(&end_phrase), e.into())
        })?;

        let start_date_ad = to_ad(start).map_err(|e| {
            fail(Some(company.clone()), Stage::ConvertStart, Some(&start_phrase), e.into())
        })?;
        let end_date_ad = to_ad(end).map_err(|e| {
            fail(Some(company.clone()), Stage::ConvertEnd, Some(&end_phrase), e.into())
        })?;

        if start_date_ad > end_date_ad {
            warn!(%company, start = %start_date_ad, end = %end_date_ad, "issue closes before it opens");
        }

        Ok(ExtractedRecord {
            company,
            start_date_bs: start_phrase,
            end_date_bs: end_phrase,
            start_date_ad,
            end_date_ad,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::ad;

    fn pipeline() -> ExtractionPipeline {
        ExtractionPipeline::default()
    }

    #[test]
    fn test_scenario_from_to() {
        let blocks = [AnnouncementBlock::new(
            "ABC Hydropower Ltd IPO opens from 1st Chaitra to 5th Chaitra, 2082",
        )];
        let records = pipeline().run(&blocks);
        assert_eq!(records.len(), 1);

        let record = &records[0];
        assert_eq!(record.company, "ABC Hydropower Ltd");
        assert_eq!(record.start_date_bs, "1 Chaitra 2082");
        assert_eq!(record.end_date_bs, "5 Chaitra 2082");
        assert_eq!(record.start_date_ad.date(), ad(2026, 3, 14));
        assert_eq!(record.end_date_ad.date(), ad(2026, 3, 18));
        assert!(record.is_exact());
    }

    #[test]
    fn test_untabulated_year_is_approximate() {
        let blocks = [AnnouncementBlock::new("Old Finance Ltd IPO from 3rd to 7th Poush, 2070")];
        let records = pipeline().run(&blocks);
        assert_eq!(records.len(), 1);
        assert!(!records[0].is_exact());
        assert_eq!(records[0].start_date_ad.date(), ad(2013, 12, 3));
    }

    #[test]
    fn test_no_date_pattern_diagnostic() {
        let blocks = [AnnouncementBlock::new("Nepal Bank Limited announces AGM for shareholders")];
        let report = pipeline().run_with_diagnostics(&blocks);
        assert!(report.records.is_empty());
        assert_eq!(report.diagnostics.len(), 1);

        let diagnostic = &report.diagnostics[0];
        assert_eq!(diagnostic.stage, Stage::Extract);
        assert_eq!(
            diagnostic.error,
            StageError::Extract(ExtractError::NoDatePatternMatch)
        );
        assert_eq!(diagnostic.company.as_deref(), Some("Nepal Bank Limited"));
    }

    #[test]
    fn test_year_digits_not_taken_as_day() {
        let blocks = [AnnouncementBlock::new("Sanima Hydro IPO 12th Magh 2081 - 16th Falgun 2081")];
        let report = pipeline().run_with_diagnostics(&blocks);
        assert!(report.records.is_empty());

        let diagnostic = &report.diagnostics[0];
        assert_eq!(diagnostic.stage, Stage::Extract);
        assert_eq!(diagnostic.phrase, None);
        assert_eq!(
            diagnostic.error,
            StageError::Extract(ExtractError::NoDatePatternMatch)
        );
    }

    #[test]
    fn test_unrecognized_month_diagnostic() {
        let blocks = [AnnouncementBlock::new("Shivam Cements - IPO from 3rd to 7th Smarch, 2081")];
        let report = pipeline().run_with_diagnostics(&blocks);
        assert!(report.records.is_empty());

        let diagnostic = &report.diagnostics[0];
        assert_eq!(diagnostic.stage, Stage::ParseStart);
        assert_eq!(diagnostic.phrase.as_deref(), Some("3 Smarch 2081"));
        assert!(matches!(
            diagnostic.error,
            StageError::Parse(ParseError::UnrecognizedMonth(_))
        ));
    }

    #[test]
    fn test_out_of_range_diagnostic() {
        // Magh 2081 has 29 days
        let blocks = [AnnouncementBlock::new("Shivam Cements - IPO from 25th to 30th Magh, 2081")];
        let report = pipeline().run_with_diagnostics(&blocks);
        assert!(report.records.is_empty());

        let diagnostic = &report.diagnostics[0];
        assert_eq!(diagnostic.stage, Stage::ConvertEnd);
        assert_eq!(diagnostic.company.as_deref(), Some("Shivam Cements"));
        assert_eq!(diagnostic.phrase.as_deref(), Some("30 Magh 2081"));
        assert!(matches!(
            diagnostic.error,
            StageError::Convert(ConversionError::OutOfRange { max: 29, .. })
        ));
    }

    #[test]
    fn test_bad_block_does_not_stop_batch() {
        let blocks = [
            AnnouncementBlock::new("Shivam Cements - IPO from 3rd to 7th Poush, 2081"),
            AnnouncementBlock::new("garbage"),
            AnnouncementBlock::new("ABC Hydropower Ltd IPO opens from 1st Chaitra to 5th Chaitra, 2082"),
        ];
        let report = pipeline().run_with_diagnostics(&blocks);

        let companies: Vec<&str> = report.records.iter().map(|r| r.company.as_str()).collect();
        assert_eq!(companies, vec!["Shivam Cements", "ABC Hydropower Ltd"]);
        assert_eq!(report.diagnostics.len(), 1);
        assert_eq!(report.diagnostics[0].index, 1);
    }

    #[test]
    fn test_empty_input() {
        assert!(pipeline().run(&[]).is_empty());
    }

    #[test]
    fn test_relevance_filter() {
        let pipeline = ExtractionPipeline::new(ExtractorConfig {
            relevance_keywords: vec!["ipo".into(), "share".into()],
            ..ExtractorConfig::default()
        });
        let blocks = [
            AnnouncementBlock::new("Himalayan Bank Ltd book closure from 3rd to 7th Poush, 2081"),
            AnnouncementBlock::new("Himalayan Bank Ltd right share from 3rd to 7th Poush, 2081"),
        ];
        let report = pipeline.run_with_diagnostics(&blocks);
        assert_eq!(report.records.len(), 1);
        assert_eq!(report.diagnostics[0].stage, Stage::Relevance);
        assert_eq!(report.diagnostics[0].error, StageError::NotRelevant);
    }

    #[test]
    fn test_table_row_hint() {
        let block = AnnouncementBlock::default().with_hint(StructureHint::TableRow {
            cells: vec![
                "Mountain Agro".into(),
                " ".into(),
                "3rd to 7th Poush, 2081".into(),
            ],
        });
        assert_eq!(block.content(), "Mountain Agro - 3rd to 7th Poush, 2081");

        let records = pipeline().run(&[block]);
        assert_eq!(records[0].company, "Mountain Agro");
        assert_eq!(records[0].start_date_bs, "3 Poush 2081");
    }

    #[test]
    fn test_table_row_hint_yields_to_text() {
        let block = AnnouncementBlock::new(" Shivam Cements - IPO from 3rd to 7th Poush, 2081 ")
            .with_hint(StructureHint::TableRow {
                cells: vec!["ignored".into()],
            });
        assert_eq!(block.content(), "Shivam Cements - IPO from 3rd to 7th Poush, 2081");
    }

    #[test]
    fn test_block_serde() {
        let json = r#"{"text":"","hint":{"kind":"table_row","cells":["Mountain Agro","3rd to 7th Poush, 2081"]}}"#;
        let block: AnnouncementBlock = serde_json::from_str(json).unwrap();
        assert_eq!(block.content(), "Mountain Agro - 3rd to 7th Poush, 2081");

        let block: AnnouncementBlock = serde_json::from_str(r#"{"text":"plain"}"#).unwrap();
        assert_eq!(block.hint, None);
        let unknown = r#"{"text":"","hint":{"kind":"link"}}"#;
        assert!(serde_json::from_str::<AnnouncementBlock>(unknown).is_err());
    }

    #[test]
    fn test_row_and_window() {
        let blocks = [AnnouncementBlock::new(
            "ABC Hydropower Ltd IPO opens from 1st Chaitra to 5th Chaitra, 2082",
        )];
        let record = pipeline().run(&blocks).remove(0);

        let row = record.to_row();
        let json = serde_json::to_string(&row).unwrap();
        assert_eq!(
            json,
            r#"{"company":"ABC Hydropower Ltd","startDate":"2026-03-14","endDate":"2026-03-18"}"#
        );

        let window = record.window().unwrap();
        assert_eq!(window.len_days(), 5);
        assert_eq!(row.window().unwrap(), window);
    }

    #[test]
    fn test_inverted_range_is_kept() {
        // Crosses the year boundary without saying so
        let blocks = [AnnouncementBlock::new("Shivam Cements - IPO 28th Chaitra - 3rd Baisakh, 2082")];
        let records = pipeline().run(&blocks);
        assert_eq!(records.len(), 1);
        assert!(records[0].window().is_err());
    }
}

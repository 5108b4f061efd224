pub mod builder;
pub mod stages;
pub mod step;

pub use builder::Pipeline;
pub use stages::{AnswerStep, ExtractStep, QuestionBatch, QuestionStep, SegmentStep};
pub use step::Step;

use cuecard_document::DocumentError;
use cuecard_llm::LlmError;

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// The input could not be read as a supported document.
    #[error("document format error: {0}")]
    DocumentFormat(DocumentError),

    /// Sentence segmentation or keyphrase extraction failed.
    #[error("extraction failed: {0}")]
    Extraction(String),

    /// Question generation, answering or prompt truncation failed.
    #[error("generation service error: {0}")]
    GenerationService(#[from] LlmError),
}

impl From<DocumentError> for PipelineError {
    fn from(err: DocumentError) -> Self {
        match err {
            DocumentError::Segmentation(msg) => Self::Extraction(msg),
            other => Self::DocumentFormat(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct AddSuffix {
        suffix: String,
    }

    impl Step for AddSuffix {
        type Input = String;
        type Output = String;
        const NAME: &'static str = "add_suffix";

        async fn run(&self, input: Self::Input) -> Result<Self::Output, PipelineError> {
            Ok(format!("{input}{}", self.suffix))
        }
    }

    struct ParseLen;

    impl Step for ParseLen {
        type Input = String;
        type Output = usize;
        const NAME: &'static str = "parse_len";

        async fn run(&self, input: Self::Input) -> Result<Self::Output, PipelineError> {
            Ok(input.len())
        }
    }

    struct FailStep;

    impl Step for FailStep {
        type Input = String;
        type Output = String;
        const NAME: &'static str = "fail";

        async fn run(&self, _input: Self::Input) -> Result<Self::Output, PipelineError> {
            Err(PipelineError::Extraction("boom".into()))
        }
    }

    #[tokio::test]
    async fn single_step_pipeline() {
        let result = Pipeline::start(AddSuffix { suffix: "!".into() })
            .run("hello".into())
            .await
            .unwrap();
        assert_eq!(result, "hello!");
    }

    #[tokio::test]
    async fn heterogeneous_chain() {
        let result = Pipeline::start(AddSuffix {
            suffix: "abc".into(),
        })
        .step(ParseLen)
        .run(String::new())
        .await
        .unwrap();
        assert_eq!(result, 3);
    }

    #[tokio::test]
    async fn failure_stops_later_steps() {
        let result = Pipeline::start(AddSuffix {
            suffix: "ok".into(),
        })
        .step(FailStep)
        .step(ParseLen)
        .run("hi".into())
        .await;
        assert!(matches!(result, Err(PipelineError::Extraction(msg)) if msg == "boom"));
    }

    #[test]
    fn segmentation_error_maps_to_extraction() {
        let err: PipelineError = DocumentError::Segmentation("parser crashed".into()).into();
        assert!(matches!(err, PipelineError::Extraction(_)));
    }

    #[test]
    fn other_document_errors_map_to_format() {
        let err: PipelineError = DocumentError::Empty.into();
        assert!(matches!(err, PipelineError::DocumentFormat(DocumentError::Empty)));
        assert_eq!(err.to_string(), "document format error: document is empty");
    }

    #[test]
    fn llm_error_maps_to_generation_service() {
        let err: PipelineError = LlmError::Unavailable.into();
        assert!(matches!(
            err,
            PipelineError::GenerationService(LlmError::Unavailable)
        ));
    }
}

use std::future::Future;

use super::PipelineError;

/// One typed stage of a linear pipeline.
pub trait Step: Send + Sync {
    type Input: Send;
    type Output: Send;

    /// Stage name used in logs.
    const NAME: &'static str;

    fn run(
        &self,
        input: Self::Input,
    ) -> impl Future<Output = Result<Self::Output, PipelineError>> + Send;
}

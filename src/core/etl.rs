use crate::core::Pipeline;
use crate::utils::error::Result;

/// Drives a [`Pipeline`] through extract, transform and load.
pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<String> {
        tracing::debug!("Extracting...");
        let extracted = self.pipeline.extract().await?;

        tracing::debug!("Transforming...");
        let transformed = self.pipeline.transform(extracted).await?;

        tracing::debug!("Loading...");
        let output = self.pipeline.load(transformed).await?;

        tracing::info!("Pipeline finished ({} bytes of output)", output.len());
        Ok(output)
    }
}

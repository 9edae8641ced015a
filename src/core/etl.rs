use crate::core::Pipeline;
use crate::utils::error::Result;
use std::time::Instant;

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<String> {
        let started = Instant::now();
        tracing::info!("Starting cleaning run");

        // Extract
        let raw_data = self.pipeline.extract().await?;
        tracing::info!("Extracted {} bytes", raw_data.len());

        // Transform
        let output = match self.pipeline.transform(raw_data).await {
            Ok(output) => output,
            Err(e) => {
                tracing::warn!("Transform failed after {:?}: {}", started.elapsed(), e);
                return Err(e);
            }
        };
        tracing::info!(
            "Transformed {} rows: {} kept, {} dropped, {} field warnings",
            output.dataset,
            output.rows,
            output.report.rows_dropped(),
            output.report.warnings.len()
        );

        // Load
        let output_path = self.pipeline.load(output).await?;
        tracing::info!("Output saved to: {} ({:?})", output_path, started.elapsed());

        Ok(output_path)
    }
}

use crate::domain::model::{Invocation, RunStatus};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::path::PathBuf;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
    /// True when any filesystem entry (dangling symlinks included) sits at `path`.
    fn exists(&self, path: &str) -> impl std::future::Future<Output = Result<bool>> + Send;
}

pub trait ProcessRunner: Send + Sync {
    /// Runs the invocation to completion with inherited stdio.
    fn run(
        &self,
        invocation: &Invocation,
    ) -> impl std::future::Future<Output = Result<RunStatus>> + Send;
}

pub trait ExecutableResolver: Send + Sync {
    fn resolve(&self, name: &str) -> Option<PathBuf>;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    type Extracted: Send;
    type Transformed: Send;

    async fn extract(&self) -> Result<Self::Extracted>;
    async fn transform(&self, data: Self::Extracted) -> Result<Self::Transformed>;
    async fn load(&self, result: Self::Transformed) -> Result<String>;
}

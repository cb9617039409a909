use std::future::Future;

/// What the finalize step attaches to the target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinalizeRequest {
    pub remote_asset_id: String,
    /// Playback length, when the caller knows it.
    pub duration_secs: Option<u64>,
}

/// Backend collaborator that attaches a finished asset to its target resource.
///
/// Must be safe to repeat: a finalize that failed is retried on the next run.
pub trait AssetFinalizer: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    fn finalize(
        &self,
        target_id: &str,
        request: &FinalizeRequest,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send;
}

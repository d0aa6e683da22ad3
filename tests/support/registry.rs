use std::sync::atomic::{AtomicUsize, Ordering};

use symptra::registry::{
    FrequencyMapping, FrequencySummary, MemoryRegistry, ModelRegistry, PredictionRecord,
    RegistryError, TrainedModel,
};

/// Reads succeed from an in-memory store; every write fails as if the
/// database had gone away mid-request.
pub struct ReadOnlyRegistry {
    inner: MemoryRegistry,
    failed_writes: AtomicUsize,
}

impl ReadOnlyRegistry {
    pub fn new() -> Self {
        Self {
            inner: MemoryRegistry::with_default_mappings(),
            failed_writes: AtomicUsize::new(0),
        }
    }

    pub fn failed_writes(&self) -> usize {
        self.failed_writes.load(Ordering::SeqCst)
    }

    fn refuse(&self) -> RegistryError {
        self.failed_writes.fetch_add(1, Ordering::SeqCst);
        RegistryError::Busy
    }
}

impl ModelRegistry for ReadOnlyRegistry {
    fn save_model(&self, _model: &TrainedModel) -> Result<String, RegistryError> {
        Err(self.refuse())
    }

    fn get_active_model(&self) -> Result<Option<String>, RegistryError> {
        self.inner.get_active_model()
    }

    fn get_frequency_mapping(
        &self,
        condition: &str,
    ) -> Result<Option<FrequencyMapping>, RegistryError> {
        self.inner.get_frequency_mapping(condition)
    }

    fn save_prediction(&self, _record: &PredictionRecord) -> Result<String, RegistryError> {
        Err(self.refuse())
    }

    fn list_frequency_mappings(&self) -> Result<Vec<FrequencySummary>, RegistryError> {
        self.inner.list_frequency_mappings()
    }
}

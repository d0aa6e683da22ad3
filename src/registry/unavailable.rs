use super::{
    FrequencyMapping, FrequencySummary, ModelRegistry, PredictionRecord, RegistryError,
    TrainedModel,
};

/// Stand-in used when the configured store cannot be opened. Every call fails
/// with [`RegistryError::Unavailable`], so operations still complete and report
/// the failure as a warning.
#[derive(Debug, Clone)]
pub struct UnavailableRegistry {
    reason: String,
}

impl UnavailableRegistry {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    fn error(&self) -> RegistryError {
        RegistryError::Unavailable(self.reason.clone())
    }
}

impl ModelRegistry for UnavailableRegistry {
    fn save_model(&self, _model: &TrainedModel) -> Result<String, RegistryError> {
        Err(self.error())
    }

    fn get_active_model(&self) -> Result<Option<String>, RegistryError> {
        Err(self.error())
    }

    fn get_frequency_mapping(
        &self,
        _condition: &str,
    ) -> Result<Option<FrequencyMapping>, RegistryError> {
        Err(self.error())
    }

    fn save_prediction(&self, _record: &PredictionRecord) -> Result<String, RegistryError> {
        Err(self.error())
    }

    fn list_frequency_mappings(&self) -> Result<Vec<FrequencySummary>, RegistryError> {
        Err(self.error())
    }
}

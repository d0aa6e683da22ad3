use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::{
    FrequencyMapping, FrequencySummary, ModelRegistry, PredictionRecord, RegistryError,
    TrainedModel, default_frequency_mappings, new_record_id,
};

#[derive(Debug, Default)]
struct MemoryState {
    models: Vec<(String, TrainedModel)>,
    predictions: Vec<(String, PredictionRecord)>,
    mappings: Vec<FrequencyMapping>,
}

/// In-process registry. Records live as long as the value does.
#[derive(Debug, Default)]
pub struct MemoryRegistry {
    state: RwLock<MemoryState>,
}

impl MemoryRegistry {
    /// Empty registry without any frequency reference data.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry seeded with the built-in frequency mappings.
    pub fn with_default_mappings() -> Self {
        Self::with_mappings(default_frequency_mappings())
    }

    pub fn with_mappings(mappings: Vec<FrequencyMapping>) -> Self {
        Self {
            state: RwLock::new(MemoryState {
                mappings,
                ..MemoryState::default()
            }),
        }
    }

    /// Stored models in save order.
    pub fn models(&self) -> Vec<(String, TrainedModel)> {
        self.read().models.clone()
    }

    /// Stored predictions in save order.
    pub fn predictions(&self) -> Vec<(String, PredictionRecord)> {
        self.read().predictions.clone()
    }

    // A panicking writer cannot leave the vectors half-updated, so poisoning
    // is ignored.
    fn read(&self) -> RwLockReadGuard<'_, MemoryState> {
        self.state.read().unwrap_or_else(|err| err.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, MemoryState> {
        self.state.write().unwrap_or_else(|err| err.into_inner())
    }
}

impl ModelRegistry for MemoryRegistry {
    fn save_model(&self, model: &TrainedModel) -> Result<String, RegistryError> {
        let id = new_record_id();
        let mut state = self.write();
        if model.is_active {
            for (_, stored) in state.models.iter_mut() {
                stored.is_active = false;
            }
        }
        state.models.push((id.clone(), model.clone()));
        Ok(id)
    }

    fn get_active_model(&self) -> Result<Option<String>, RegistryError> {
        Ok(self
            .read()
            .models
            .iter()
            .rev()
            .find(|(_, model)| model.is_active)
            .map(|(id, _)| id.clone()))
    }

    fn get_frequency_mapping(
        &self,
        condition: &str,
    ) -> Result<Option<FrequencyMapping>, RegistryError> {
        Ok(self
            .read()
            .mappings
            .iter()
            .find(|mapping| mapping.disease_name == condition)
            .cloned())
    }

    fn save_prediction(&self, record: &PredictionRecord) -> Result<String, RegistryError> {
        let id = new_record_id();
        self.write().predictions.push((id.clone(), record.clone()));
        Ok(id)
    }

    fn list_frequency_mappings(&self) -> Result<Vec<FrequencySummary>, RegistryError> {
        Ok(self
            .read()
            .mappings
            .iter()
            .map(FrequencySummary::from)
            .collect())
    }
}

use std::sync::Arc;

use crate::application::ports::{LocationModel, SpeechModel};
use crate::application::services::AnalysisService;

pub struct AppState<L, S>
where
    L: LocationModel,
    S: SpeechModel,
{
    pub analysis_service: Arc<AnalysisService<L, S>>,
}

impl<L, S> Clone for AppState<L, S>
where
    L: LocationModel,
    S: SpeechModel,
{
    fn clone(&self) -> Self {
        Self {
            analysis_service: Arc::clone(&self.analysis_service),
        }
    }
}

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::{
    admission::AdmissionController,
    ai::{Synthesizer, Transcriber},
    classify::{IntentEngine, SpamEngine},
};

pub struct ApiState {
    pub admission: Arc<AdmissionController>,
    pub intents: IntentEngine,
    pub spam: SpamEngine,
    pub transcriber: Option<Arc<dyn Transcriber>>,
    pub synthesizer: Option<Arc<dyn Synthesizer>>,
    pub started_at: DateTime<Utc>,
}

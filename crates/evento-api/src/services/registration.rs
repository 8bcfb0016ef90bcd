// Registration service: thin adapter from HTTP requests onto the engine

use std::sync::Arc;

use uuid::Uuid;

use evento_contracts::{
    RegisterResponse, SubmitFeedbackRequest, SubmitFeedbackResponse, UnregisterResponse,
};
use evento_core::{RegistrationEngine, Result};

pub struct RegistrationService {
    engine: Arc<RegistrationEngine>,
}

impl RegistrationService {
    pub fn new(engine: Arc<RegistrationEngine>) -> Self {
        Self { engine }
    }

    pub async fn register(&self, event_id: Uuid, student_id: Uuid) -> Result<RegisterResponse> {
        let outcome = self.engine.register(event_id, student_id).await?;
        Ok(RegisterResponse {
            outcome: outcome.into(),
        })
    }

    pub async fn unregister(&self, event_id: Uuid, student_id: Uuid) -> Result<UnregisterResponse> {
        let outcome = self.engine.unregister(event_id, student_id).await?;
        Ok(outcome.into())
    }

    pub async fn submit_feedback(
        &self,
        event_id: Uuid,
        req: SubmitFeedbackRequest,
    ) -> Result<SubmitFeedbackResponse> {
        let average = self
            .engine
            .submit_feedback(event_id, req.student_id, req.rating, req.comment)
            .await?;
        Ok(SubmitFeedbackResponse {
            outcome: "recorded".to_string(),
            average_rating: average,
        })
    }
}

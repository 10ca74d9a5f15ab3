//! Generate script use case (the generation requester).

use std::sync::Arc;

use scriptgen_domain::{GeneratedScript, GenerationRequest, SessionContext};

use crate::ports::{Clock, GenerationError, ScriptGenerator};

/// Use case for requesting a test script from the generation service.
pub struct GenerateScript<G: ScriptGenerator, K: Clock> {
    generator: Arc<G>,
    clock: Arc<K>,
}

impl<G: ScriptGenerator, K: Clock> GenerateScript<G, K> {
    /// Creates a new `GenerateScript` use case.
    pub const fn new(generator: Arc<G>, clock: Arc<K>) -> Self {
        Self { generator, clock }
    }

    /// Requests a script and stamps it with the arrival time.
    ///
    /// # Validation
    ///
    /// - the API id must not be blank; otherwise nothing is sent
    ///
    /// # Errors
    ///
    /// Returns `GenerationError::SelectionRequired` on a blank id and
    /// `GenerationError::Failed` when the service call fails.
    pub async fn execute(
        &self,
        session: &SessionContext,
        request: &GenerationRequest,
    ) -> Result<GeneratedScript, GenerationError> {
        Self::validate(request)?;

        let content = self.generator.generate(session, request).await?;
        Ok(GeneratedScript::new(content, request, self.clock.now()))
    }

    /// Validates the request before it reaches the network.
    ///
    /// # Errors
    ///
    /// Returns `GenerationError::SelectionRequired` if no API is selected.
    pub fn validate(request: &GenerationRequest) -> Result<(), GenerationError> {
        if request.api_id.is_blank() {
            return Err(GenerationError::SelectionRequired);
        }
        Ok(())
    }
}

impl<G: ScriptGenerator, K: Clock> Clone for GenerateScript<G, K> {
    fn clone(&self) -> Self {
        Self {
            generator: Arc::clone(&self.generator),
            clock: Arc::clone(&self.clock),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_support::{FixedClock, MockGenerator};
    use pretty_assertions::assert_eq;
    use scriptgen_domain::{ApiId, ScriptLanguage, TestFramework};

    fn request(id: &str) -> GenerationRequest {
        GenerationRequest::new(ApiId::new(id), ScriptLanguage::Python, TestFramework::Postman)
    }

    #[tokio::test]
    async fn test_generate_success() {
        let generator = Arc::new(MockGenerator::new());
        generator.push_ok("import requests...");
        let clock = Arc::new(FixedClock::at_millis(1_700_000_000_000));
        let use_case = GenerateScript::new(Arc::clone(&generator), clock);

        let script = use_case
            .execute(&SessionContext::new("u1"), &request("a1"))
            .await
            .unwrap();

        assert_eq!(script.content(), "import requests...");
        assert_eq!(script.generated_at.timestamp_millis(), 1_700_000_000_000);
        assert!(!script.is_edited());
        assert_eq!(generator.requests(), vec![request("a1")]);
    }

    #[tokio::test]
    async fn test_blank_id_never_reaches_network() {
        let generator = Arc::new(MockGenerator::new());
        let use_case = GenerateScript::new(Arc::clone(&generator), Arc::new(FixedClock::default()));

        let result = use_case
            .execute(&SessionContext::new("u1"), &request("  "))
            .await;

        assert_eq!(result, Err(GenerationError::SelectionRequired));
        assert_eq!(generator.calls(), 0);
    }

    #[tokio::test]
    async fn test_generate_failure() {
        let generator = Arc::new(MockGenerator::new());
        generator.push_err("HTTP 500");
        let use_case = GenerateScript::new(generator, Arc::new(FixedClock::default()));

        let result = use_case
            .execute(&SessionContext::new("u1"), &request("a1"))
            .await;

        assert_eq!(result, Err(GenerationError::failed("HTTP 500")));
    }
}

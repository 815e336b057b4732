use super::{
    types::{AcceptCandidate, Accepted, Candidate, CreateCandidate, FoundCandidate},
    ApiClient, Envelope, Error,
};
use serde_json::Value;

const CANDIDATES_PATH: &str = "/api/v1/api/v1/candidates";

impl ApiClient {
    /// Public intake submission; no credential is required.
    ///
    /// # Errors
    /// Returns the request failure or the backend's validation errors.
    pub async fn create_candidate(
        &self,
        candidate: &CreateCandidate,
    ) -> Result<Envelope<Candidate>, Error> {
        self.post_json(CANDIDATES_PATH, candidate).await
    }

    /// Query pairs are forwarded as-is, e.g. `[("status", "PENDING")]`.
    ///
    /// # Errors
    /// Returns the request failure.
    pub async fn list_candidates(
        &self,
        query: &[(&str, String)],
    ) -> Result<Envelope<Vec<Candidate>>, Error> {
        self.get_json_with_query(CANDIDATES_PATH, query).await
    }

    /// # Errors
    /// Returns the request failure.
    pub async fn get_candidate(&self, id: &str) -> Result<Envelope<FoundCandidate>, Error> {
        self.get_json(&format!("{CANDIDATES_PATH}/{id}")).await
    }

    /// # Errors
    /// Returns the request failure.
    pub async fn reject_candidate(&self, id: &str) -> Result<Envelope<Candidate>, Error> {
        self.patch_empty(&format!("{CANDIDATES_PATH}/{id}/reject"))
            .await
    }

    /// Hires the candidate; the backend answers with the new employee record.
    ///
    /// # Errors
    /// Returns the request failure.
    pub async fn accept_candidate(
        &self,
        id: &str,
        hire: &AcceptCandidate,
    ) -> Result<Envelope<Accepted>, Error> {
        self.patch_json(&format!("{CANDIDATES_PATH}/{id}/accept"), hire)
            .await
    }

    /// # Errors
    /// Returns the request failure.
    pub async fn delete_candidate(&self, id: &str) -> Result<Envelope<Value>, Error> {
        self.delete_json(&format!("{CANDIDATES_PATH}/{id}")).await
    }
}

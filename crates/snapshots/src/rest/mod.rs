//! REST-backed snapshot source.
//!
//! The portal backend speaks JSON over HTTP; every repository trait maps
//! onto one endpoint family. Payloads arrive as DTOs and are converted
//! into validated domain types before anything downstream sees them.

use std::env;

use async_trait::async_trait;
use portal_core::model::{
    CatalogItem, Enrollment, LearnerId, Program, ProgramId, Survey, SurveySubmission,
};
use reqwest::{Client, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::repository::{
    CatalogRepository, EnrollmentRepository, SnapshotError, SubmissionRepository,
    SurveyRepository,
};

mod dto;

use dto::{CatalogItemDto, EnrollmentDto, ProgramDto, SubmissionDto, SurveyDto};

//
// ─── CONFIG ────────────────────────────────────────────────────────────────────
//

#[derive(Clone, Debug)]
pub struct RestConfig {
    pub base_url: String,
    pub api_token: String,
}

impl RestConfig {
    #[must_use]
    pub fn new(base_url: impl Into<String>, api_token: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_token: api_token.into(),
        }
    }

    /// Reads `PORTAL_API_BASE_URL` and `PORTAL_API_TOKEN`; `None` when
    /// either is missing or blank.
    #[must_use]
    pub fn from_env() -> Option<Self> {
        let base_url = env::var("PORTAL_API_BASE_URL").ok()?;
        if base_url.trim().is_empty() {
            return None;
        }
        let api_token = env::var("PORTAL_API_TOKEN").ok()?;
        if api_token.trim().is_empty() {
            return None;
        }
        Some(Self {
            base_url,
            api_token,
        })
    }
}

//
// ─── CLIENT ────────────────────────────────────────────────────────────────────
//

/// HTTP client implementing every snapshot repository trait.
#[derive(Clone)]
pub struct RestClient {
    client: Client,
    config: RestConfig,
}

impl RestClient {
    #[must_use]
    pub fn new(config: RestConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    /// Builds a client from the environment, if configured.
    #[must_use]
    pub fn from_env() -> Option<Self> {
        RestConfig::from_env().map(Self::new)
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{path}", self.config.base_url.trim_end_matches('/'))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, SnapshotError> {
        debug!(path, "fetching snapshot");
        let response = self
            .client
            .get(self.url(path))
            .bearer_auth(&self.config.api_token)
            .send()
            .await
            .map_err(|e| SnapshotError::Unavailable(e.to_string()))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(SnapshotError::NotFound);
        }
        if !response.status().is_success() {
            return Err(SnapshotError::Unavailable(format!(
                "unexpected status {}",
                response.status()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| SnapshotError::Malformed(e.to_string()))
    }

    async fn post_json<T: Serialize + Sync>(
        &self,
        path: &str,
        payload: &T,
    ) -> Result<(), SnapshotError> {
        debug!(path, "posting record");
        let response = self
            .client
            .post(self.url(path))
            .bearer_auth(&self.config.api_token)
            .json(payload)
            .send()
            .await
            .map_err(|e| SnapshotError::Unavailable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(SnapshotError::Unavailable(format!(
                "unexpected status {}",
                response.status()
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl SurveyRepository for RestClient {
    async fn surveys_for_program(
        &self,
        program_id: ProgramId,
    ) -> Result<Vec<Survey>, SnapshotError> {
        let payload: Vec<SurveyDto> = self
            .get_json(&format!("programs/{program_id}/surveys"))
            .await?;
        payload.into_iter().map(SurveyDto::into_domain).collect()
    }

    async fn risk_assessment_surveys(&self) -> Result<Vec<Survey>, SnapshotError> {
        let payload: Vec<SurveyDto> = self.get_json("surveys?kind=risk_assessment").await?;
        payload.into_iter().map(SurveyDto::into_domain).collect()
    }
}

#[async_trait]
impl SubmissionRepository for RestClient {
    async fn submissions_for_learner(
        &self,
        learner_id: LearnerId,
    ) -> Result<Vec<SurveySubmission>, SnapshotError> {
        let payload: Vec<SubmissionDto> = self
            .get_json(&format!("learners/{learner_id}/submissions"))
            .await?;
        payload.into_iter().map(SubmissionDto::into_domain).collect()
    }

    async fn record_submission(
        &self,
        submission: &SurveySubmission,
    ) -> Result<(), SnapshotError> {
        self.post_json("submissions", &SubmissionDto::from_domain(submission))
            .await
    }
}

#[async_trait]
impl CatalogRepository for RestClient {
    async fn catalog(&self) -> Result<Vec<CatalogItem>, SnapshotError> {
        let payload: Vec<CatalogItemDto> = self.get_json("catalog").await?;
        payload
            .into_iter()
            .map(CatalogItemDto::into_domain)
            .collect()
    }

    async fn get_program(&self, id: ProgramId) -> Result<Program, SnapshotError> {
        let payload: ProgramDto = self.get_json(&format!("programs/{id}")).await?;
        payload.into_domain()
    }
}

#[async_trait]
impl EnrollmentRepository for RestClient {
    async fn enrollments_for_learner(
        &self,
        learner_id: LearnerId,
    ) -> Result<Vec<Enrollment>, SnapshotError> {
        let payload: Vec<EnrollmentDto> = self
            .get_json(&format!("learners/{learner_id}/enrollments"))
            .await?;
        Ok(payload.into_iter().map(EnrollmentDto::into_domain).collect())
    }

    async fn record_enrollment(&self, enrollment: &Enrollment) -> Result<(), SnapshotError> {
        self.post_json("enrollments", &EnrollmentDto::from_domain(enrollment))
            .await
    }
}

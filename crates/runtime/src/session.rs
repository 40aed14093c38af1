//! Per-scenario context: browser handle, Salesforce session and the
//! test-run identifier.

use std::sync::Arc;

use lexbdd_core::driver::{DriverPool, UiDriver};
use lexbdd_core::engine::SfdcEngine;
use lexbdd_core::record::{Connection, Credentials};
use tracing::info;
use uuid::Uuid;

use crate::error::StepError;

/// Everything one scenario needs after its login/navigation step ran.
///
/// The test-run identifier is generated once here and carried along
/// explicitly; components needing it read it from the session instead of a
/// process-wide channel.
pub struct Session {
    driver: Arc<dyn UiDriver>,
    credentials: Option<Credentials>,
    connection: Option<Connection>,
    engine: Option<Arc<dyn SfdcEngine>>,
    test_run_id: String,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("user", &self.credentials.as_ref().map(|c| c.username.as_str()))
            .field("authenticated", &self.connection.is_some())
            .field("test_run_id", &self.test_run_id)
            .finish()
    }
}

impl Session {
    /// Establishes an authenticated session: acquires a browser for the
    /// user, logs the engine in and points the browser at the frontdoor URL.
    pub async fn login(
        pool: &dyn DriverPool,
        engine: Arc<dyn SfdcEngine>,
        credentials: Credentials,
    ) -> Result<Self, StepError> {
        let driver = pool.acquire(&credentials.username).await?;
        let connection = engine
            .login(&credentials)
            .await
            .map_err(StepError::engine(format!("login as {}", credentials.username)))?;
        let url =
            engine.login_url().await.map_err(StepError::engine("resolve frontdoor URL"))?;
        driver.goto(&url).await?;

        let test_run_id = Uuid::new_v4().to_string();
        info!(user = %credentials.username, run_id = %test_run_id, "session established");
        Ok(Self {
            driver,
            credentials: Some(credentials),
            connection: Some(connection),
            engine: Some(engine),
            test_run_id,
        })
    }

    /// Unauthenticated session for public pages: browser only, no engine.
    pub async fn public(pool: &dyn DriverPool) -> Result<Self, StepError> {
        let driver = pool.acquire("public").await?;
        Ok(Self {
            driver,
            credentials: None,
            connection: None,
            engine: None,
            test_run_id: Uuid::new_v4().to_string(),
        })
    }

    pub fn driver(&self) -> &dyn UiDriver {
        self.driver.as_ref()
    }

    pub fn connection(&self) -> Result<&Connection, StepError> {
        self.connection.as_ref().ok_or(StepError::NotAuthenticated)
    }

    pub fn engine(&self) -> Result<&dyn SfdcEngine, StepError> {
        match &self.engine {
            Some(engine) => Ok(engine.as_ref()),
            None => Err(StepError::NotAuthenticated),
        }
    }

    pub fn credentials(&self) -> Option<&Credentials> {
        self.credentials.as_ref()
    }

    /// Identifier correlating everything this run created on the backend.
    pub fn test_run_id(&self) -> &str {
        &self.test_run_id
    }

    /// Asks the engine to drop backend data created under this run.
    pub async fn cleanup_test_data(&self) -> Result<(), StepError> {
        self.engine()?
            .cleanup_test_data(&self.test_run_id)
            .await
            .map_err(StepError::engine(format!("cleanup run {}", self.test_run_id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lexbdd_driver_mock::MockDriverPool;
    use lexbdd_engine_mock::MockSfdcEngine;
    use lexbdd_core::record::Credentials;

    fn credentials() -> Credentials {
        Credentials {
            username: "qa.user@example.org".into(),
            password: "hunter2".into(),
            environment: "https://test.salesforce.com".into(),
            security_token: None,
        }
    }

    #[tokio::test]
    async fn login_wires_driver_to_the_frontdoor_url() {
        let pool = MockDriverPool::new();
        let engine = Arc::new(MockSfdcEngine::new());
        let session = Session::login(&pool, engine, credentials()).await.unwrap();

        let driver = pool.driver_for("qa.user@example.org").unwrap();
        let visited = driver.visited_urls();
        assert_eq!(visited.len(), 1);
        assert!(visited[0].contains("frontdoor.jsp"));
        assert!(session.connection().is_ok());
        assert!(session.engine().is_ok());
    }

    #[tokio::test]
    async fn run_ids_are_unique_per_session() {
        let pool = MockDriverPool::new();
        let a = Session::public(&pool).await.unwrap();
        let b = Session::public(&pool).await.unwrap();
        assert_ne!(a.test_run_id(), b.test_run_id());
    }

    #[tokio::test]
    async fn public_session_has_no_engine() {
        let pool = MockDriverPool::new();
        let session = Session::public(&pool).await.unwrap();
        assert!(matches!(session.engine(), Err(StepError::NotAuthenticated)));
        assert!(matches!(session.connection(), Err(StepError::NotAuthenticated)));
    }

    #[tokio::test]
    async fn cleanup_forwards_the_run_id() {
        let pool = MockDriverPool::new();
        let engine = Arc::new(MockSfdcEngine::new());
        let session = Session::login(&pool, Arc::clone(&engine) as _, credentials())
            .await
            .unwrap();
        session.cleanup_test_data().await.unwrap();
        assert_eq!(engine.cleanups(), vec![session.test_run_id().to_owned()]);
    }
}

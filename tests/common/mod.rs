#![allow(dead_code)]

use std::env;
use std::sync::Arc;

use fake::{Fake, faker::name::en::Name};
use sqlx::{PgPool, postgres::PgPoolOptions};

use review_assigner::database::{models::TeamMember, run_migrations};
use review_assigner::{AppState, Config, ReviewerSelector, SeededSelector, TeamService};

pub const ADMIN_TOKEN: &str = "test-admin-token";

pub fn setup_test_env() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Builds a test app around `$state` with the test config.
#[macro_export]
macro_rules! init_app {
    ($state:expr) => {{
        let state = $state.clone();
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data(actix_web::web::Data::new(review_assigner::Config::test_config()))
                .wrap(review_assigner::middleware::RequestId)
                .configure(move |cfg| state.configure(cfg)),
        )
        .await
    }};
}

/// A pool that never connects. Enough for requests rejected before any query.
pub fn lazy_state() -> AppState {
    let pool = PgPoolOptions::new()
        .max_connections(1)
        .min_connections(0)
        .connect_lazy(&Config::test_config().database_url)
        .expect("lazy pool");
    AppState::new(pool, selector())
}

pub fn selector() -> Arc<dyn ReviewerSelector> {
    Arc::new(SeededSelector::new(42))
}

pub fn bearer() -> (&'static str, String) {
    ("Authorization", format!("Bearer {}", ADMIN_TOKEN))
}

/// Database-backed fixture. Every id it hands out carries a per-test suffix so
/// tests can share one database.
///
/// Tests using it are `#[ignore]`d; run them with
/// `TEST_DATABASE_URL=postgres://... cargo test -- --ignored`.
pub struct TestContext {
    pub pool: PgPool,
    pub state: AppState,
    suffix: String,
}

impl TestContext {
    /// Panics when `TEST_DATABASE_URL` is not set or unreachable.
    pub async fn new() -> Self {
        setup_test_env();

        let database_url = env::var("TEST_DATABASE_URL")
            .expect("TEST_DATABASE_URL must point at a Postgres database for this test");

        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(&database_url)
            .await
            .expect("connect to test database");
        run_migrations(&pool).await.expect("run migrations");

        let state = AppState::new(pool.clone(), selector());
        let suffix = uuid::Uuid::new_v4().simple().to_string()[..8].to_string();

        Self {
            pool,
            state,
            suffix,
        }
    }

    pub fn id(&self, name: &str) -> String {
        format!("{}-{}", name, self.suffix)
    }

    pub fn member(&self, name: &str, is_active: bool) -> TeamMember {
        TeamMember {
            user_id: self.id(name),
            username: Name().fake(),
            is_active,
        }
    }

    /// Creates `team` with the given `(name, is_active)` members.
    pub async fn seed_team(&self, team: &str, members: &[(&str, bool)]) -> String {
        let team_name = self.id(team);
        let input = review_assigner::database::models::CreateTeamInput {
            team_name: team_name.clone(),
            members: members
                .iter()
                .map(|(name, active)| self.member(name, *active))
                .collect(),
        };

        TeamService::new(self.pool.clone())
            .create_team(input)
            .await
            .expect("seed team");

        team_name
    }

    pub async fn open_pull_request(
        &self,
        name: &str,
        author: &str,
    ) -> review_assigner::database::models::PullRequest {
        self.state
            .pull_request_service
            .create(review_assigner::database::models::CreatePullRequestInput {
                pull_request_id: self.id(name),
                pull_request_name: format!("{} change", name),
                author_id: self.id(author),
            })
            .await
            .expect("create pull request")
    }
}

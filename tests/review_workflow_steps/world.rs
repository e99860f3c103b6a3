//! Shared world state for review workflow BDD scenarios.

use std::collections::HashMap;
use std::sync::Arc;

use atelier::notification::{adapters::memory::NotificationHub, services::Notifier};
use atelier::task::{
    adapters::memory::InMemoryTaskRepository,
    domain::{Task, UserId},
    services::{ReviewWorkflowService, TaskWorkflowError},
};
use mockable::DefaultClock;
use rstest::fixture;

/// Service type used by the BDD world.
pub type TestWorkflowService =
    ReviewWorkflowService<InMemoryTaskRepository, NotificationHub, DefaultClock>;

/// Scenario world for review workflow behaviour tests.
pub struct ReviewWorkflowWorld {
    pub service: TestWorkflowService,
    pub users: HashMap<String, UserId>,
    pub task: Option<Task>,
    pub last_result: Option<Result<Task, TaskWorkflowError>>,
}

impl ReviewWorkflowWorld {
    /// Creates a world backed by in-memory adapters.
    #[must_use]
    pub fn new() -> Self {
        let hub = NotificationHub::new();
        let notifier = Notifier::new(Arc::new(hub)).expect("templates should parse");
        let service = ReviewWorkflowService::new(
            Arc::new(InMemoryTaskRepository::new()),
            notifier,
            Arc::new(DefaultClock),
        );

        Self {
            service,
            users: HashMap::new(),
            task: None,
            last_result: None,
        }
    }

    /// Resolves a scenario user name to a stable identifier.
    pub fn user(&mut self, name: &str) -> UserId {
        *self
            .users
            .entry(name.to_owned())
            .or_insert_with(UserId::new)
    }
}

impl Default for ReviewWorkflowWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> ReviewWorkflowWorld {
    ReviewWorkflowWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}

//! Unit tests for the task domain and workflow service.

mod support;

mod service_tests;

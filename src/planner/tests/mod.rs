//! Unit tests for the planner domain and service.

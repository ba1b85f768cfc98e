/// CRUD, timestamp and relation tests against PostgreSQL
pub mod crud_tests;

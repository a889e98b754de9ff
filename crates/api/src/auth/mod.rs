//! Access-token handling for protected dashboard endpoints.

pub mod jwt;

pub mod auth;
pub mod comments;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod oauth;
pub mod password;
pub mod posts;
pub mod respond;
pub mod routes;
pub mod token;

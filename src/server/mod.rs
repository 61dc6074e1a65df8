mod access_log;
pub mod router;
pub mod routes;

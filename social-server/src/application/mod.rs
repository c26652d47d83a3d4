pub(crate) mod auth_service;
pub(crate) mod credentials;
pub(crate) mod post_service;
pub(crate) mod stats_service;
pub(crate) mod user_service;

pub(crate) mod jobs;
pub(crate) mod methods;
pub(crate) mod serve;
pub(crate) mod sessions;

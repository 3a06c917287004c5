pub mod captures;
pub mod filters;
pub(crate) mod health;

pub use captures::process_capture;
pub use filters::list_filters;
pub use health::health_check;

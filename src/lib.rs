pub mod api;
pub mod events;
pub mod fetch;
pub mod output;
pub mod scores;
pub mod timeline;

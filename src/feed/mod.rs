mod fetch;
mod title;

pub use fetch::fetch_feed;
pub use title::extract_title;

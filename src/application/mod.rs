pub mod publish_post;
pub mod report_post;

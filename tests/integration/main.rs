mod test_moderation;
mod test_posts;

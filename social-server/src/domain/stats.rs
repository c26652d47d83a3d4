#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct UserStats {
    pub(crate) total_users: i64,
    pub(crate) active_users: i64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct PostStats {
    pub(crate) total_posts: i64,
    pub(crate) deleted_posts: i64,
    pub(crate) total_comments: i64,
    pub(crate) total_likes: i64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct DashboardStats {
    pub(crate) users: UserStats,
    pub(crate) posts: PostStats,
}

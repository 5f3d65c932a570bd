use async_trait::async_trait;

use crate::api::TransportError;

/// Resource type the branch permissions hang off.
pub const RESOURCE_BRANCH: &str = "BRANCH";

pub const PERMISSION_LEAVE_COMMENTS: &str = "BranchPermission.LEAVE_COMMENTS_IN_CODE_REVIEW";
pub const PERMISSION_EDIT_OWN_POSTS: &str = "BranchPermission.EDIT_OWN_POSTS";
pub const PERMISSION_EDIT_OTHERS_POSTS: &str = "BranchPermission.EDIT_OTHERS_POSTS";

/// Permission evaluation, delegated to the forum's permission backend.
#[async_trait]
pub trait PermissionService: Send + Sync {
    /// Whether the current user holds `permission` on the given resource.
    async fn has_permission(
        &self,
        branch_id: u64,
        resource: &str,
        permission: &str,
    ) -> Result<bool, TransportError>;
}

/// Caller identity and capability flags, resolved once when the overlay
/// attaches and read-only for the rest of the page's lifetime.
#[derive(Debug, Clone, Copy)]
pub struct CapabilityContext {
    pub branch_id: u64,
    pub current_user_id: u64,
    pub can_edit_own_posts: bool,
    pub can_edit_other_posts: bool,
    /// Gates the whole add-comment path; without it line clicks do nothing.
    pub can_leave_comments: bool,
}

impl CapabilityContext {
    /// Resolve all capability flags for the current user on this branch.
    pub async fn resolve(
        service: &dyn PermissionService,
        branch_id: u64,
        current_user_id: u64,
    ) -> Result<Self, TransportError> {
        let can_edit_own_posts = service
            .has_permission(branch_id, RESOURCE_BRANCH, PERMISSION_EDIT_OWN_POSTS)
            .await?;
        let can_edit_other_posts = service
            .has_permission(branch_id, RESOURCE_BRANCH, PERMISSION_EDIT_OTHERS_POSTS)
            .await?;
        let can_leave_comments = service
            .has_permission(branch_id, RESOURCE_BRANCH, PERMISSION_LEAVE_COMMENTS)
            .await?;
        tracing::debug!(
            branch_id,
            current_user_id,
            can_edit_own_posts,
            can_edit_other_posts,
            can_leave_comments,
            "resolved capability context"
        );
        Ok(Self {
            branch_id,
            current_user_id,
            can_edit_own_posts,
            can_edit_other_posts,
            can_leave_comments,
        })
    }

    /// Whether the edit affordance is shown for a comment by `author_id`:
    /// the caller may edit anyone's posts, or the comment is their own and
    /// they may edit their own.
    pub fn can_edit(&self, author_id: u64) -> bool {
        self.can_edit_other_posts
            || (self.current_user_id == author_id && self.can_edit_own_posts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StaticPermissions {
        own: bool,
        others: bool,
        leave: bool,
    }

    #[async_trait]
    impl PermissionService for StaticPermissions {
        async fn has_permission(
            &self,
            _branch_id: u64,
            _resource: &str,
            permission: &str,
        ) -> Result<bool, TransportError> {
            Ok(match permission {
                PERMISSION_EDIT_OWN_POSTS => self.own,
                PERMISSION_EDIT_OTHERS_POSTS => self.others,
                PERMISSION_LEAVE_COMMENTS => self.leave,
                other => panic!("unexpected permission lookup: {}", other),
            })
        }
    }

    #[tokio::test]
    async fn resolve_reads_all_three_flags() {
        let service = StaticPermissions {
            own: true,
            others: false,
            leave: true,
        };
        let ctx = CapabilityContext::resolve(&service, 9, 5).await.unwrap();
        assert_eq!(ctx.branch_id, 9);
        assert_eq!(ctx.current_user_id, 5);
        assert!(ctx.can_edit_own_posts);
        assert!(!ctx.can_edit_other_posts);
        assert!(ctx.can_leave_comments);
    }

    #[test]
    fn edit_own_posts_only_covers_own_comments() {
        let ctx = CapabilityContext {
            branch_id: 1,
            current_user_id: 5,
            can_edit_own_posts: true,
            can_edit_other_posts: false,
            can_leave_comments: true,
        };
        assert!(ctx.can_edit(5));
        assert!(!ctx.can_edit(7));
    }

    #[test]
    fn edit_others_posts_covers_everything() {
        let ctx = CapabilityContext {
            branch_id: 1,
            current_user_id: 5,
            can_edit_own_posts: false,
            can_edit_other_posts: true,
            can_leave_comments: true,
        };
        assert!(ctx.can_edit(5));
        assert!(ctx.can_edit(7));
    }

    #[test]
    fn no_capabilities_means_no_affordance() {
        let ctx = CapabilityContext {
            branch_id: 1,
            current_user_id: 5,
            can_edit_own_posts: false,
            can_edit_other_posts: false,
            can_leave_comments: false,
        };
        assert!(!ctx.can_edit(5));
        assert!(!ctx.can_edit(7));
    }
}

/// Authorization checks for blog-service
///
/// Ownership rules for blogs and comments, plus role gates.
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{Blog, Comment, Role, User};

/// Result type for permission checks
pub type PermissionResult = Result<(), AppError>;

/// Only the author may edit a blog
pub fn check_blog_update(user: &User, blog: &Blog) -> PermissionResult {
    if blog.author_id == user.id {
        Ok(())
    } else {
        Err(AppError::Forbidden(
            "You don't have permission to modify this blog".to_string(),
        ))
    }
}

/// The author or an admin may delete a blog
pub fn check_blog_deletion(user: &User, blog: &Blog) -> PermissionResult {
    if blog.author_id == user.id {
        return Ok(());
    }
    require_role(user, &[Role::Admin]).map_err(|_| {
        AppError::Forbidden("You don't have permission to delete this blog".to_string())
    })
}

/// The commenter, the blog's author, or an admin may delete a comment
pub fn check_comment_deletion(user: &User, comment: &Comment, blog_author_id: Uuid) -> PermissionResult {
    if comment.user_id == user.id || blog_author_id == user.id {
        return Ok(());
    }
    require_role(user, &[Role::Admin]).map_err(|_| {
        AppError::Forbidden("You don't have permission to delete this comment".to_string())
    })
}

pub fn require_role(user: &User, allowed: &[Role]) -> PermissionResult {
    if allowed.contains(&user.role()) {
        Ok(())
    } else {
        Err(AppError::Forbidden(
            "You do not have permission to perform this action".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn user(role: Role) -> User {
        let now = Utc::now();
        User {
            id: Uuid::new_v4(),
            username: "someone".into(),
            email: "someone@example.com".into(),
            password_hash: String::new(),
            first_name: "Some".into(),
            last_name: "One".into(),
            age: None,
            profile_image: None,
            role: role.as_str().into(),
            bookmarked_blogs: vec![],
            password_changed_at: None,
            token_version: 0,
            created_at: now,
            updated_at: now,
        }
    }

    fn blog_by(author_id: Uuid) -> Blog {
        let now = Utc::now();
        Blog {
            id: Uuid::new_v4(),
            title: "t".into(),
            content: "c".into(),
            feature_image: None,
            slug: "t".into(),
            visibility: "public".into(),
            author_id,
            category_id: Uuid::new_v4(),
            like_count: 0,
            comment_count: 0,
            share_count: 0,
            read_count: 0,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_only_author_updates() {
        let author = user(Role::User);
        let admin = user(Role::Admin);
        let blog = blog_by(author.id);

        assert!(check_blog_update(&author, &blog).is_ok());
        assert!(matches!(check_blog_update(&admin, &blog), Err(AppError::Forbidden(_))));
    }

    #[test]
    fn test_author_or_admin_deletes() {
        let author = user(Role::User);
        let stranger = user(Role::User);
        let admin = user(Role::Admin);
        let blog = blog_by(author.id);

        assert!(check_blog_deletion(&author, &blog).is_ok());
        assert!(check_blog_deletion(&admin, &blog).is_ok());
        assert!(check_blog_deletion(&stranger, &blog).is_err());
    }

    #[test]
    fn test_comment_deletion_rights() {
        let commenter = user(Role::User);
        let blog_author = user(Role::User);
        let stranger = user(Role::User);
        let comment = Comment {
            id: Uuid::new_v4(),
            blog_id: Uuid::new_v4(),
            user_id: commenter.id,
            content: "nice".into(),
            created_at: Utc::now(),
        };

        assert!(check_comment_deletion(&commenter, &comment, blog_author.id).is_ok());
        assert!(check_comment_deletion(&blog_author, &comment, blog_author.id).is_ok());
        assert!(check_comment_deletion(&user(Role::Admin), &comment, blog_author.id).is_ok());
        assert!(check_comment_deletion(&stranger, &comment, blog_author.id).is_err());
    }

    #[test]
    fn test_require_role() {
        assert!(require_role(&user(Role::Admin), &[Role::Admin]).is_ok());
        assert!(require_role(&user(Role::User), &[Role::Admin]).is_err());
        assert!(require_role(&user(Role::User), &[Role::User, Role::Admin]).is_ok());
    }
}

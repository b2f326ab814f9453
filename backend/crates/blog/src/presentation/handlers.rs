//! HTTP Handlers

use auth::AuthContext;
use auth::models::MessageResponse;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Extension;
use kernel::extract::Json;
use kernel::id::{CommentId, PostId};
use std::str::FromStr;
use std::sync::Arc;

use crate::application::config::BlogConfig;
use crate::application::{CommentUseCase, CreatePostInput, PostUseCase, UpdatePostInput};
use crate::domain::repository::{CommentRepository, PostRepository};
use crate::error::{BlogError, BlogResult};
use crate::presentation::dto::{
    CommentRequest, CommentResponse, LikeResponse, ListPostsQuery, PostListResponse, PostRequest,
    PostResponse,
};

/// Shared state for blog handlers
#[derive(Clone)]
pub struct BlogAppState<R>
where
    R: PostRepository + CommentRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub config: Arc<BlogConfig>,
}

// ============================================================================
// Posts
// ============================================================================

/// GET /api/posts
pub async fn list_posts<R>(
    State(state): State<BlogAppState<R>>,
    Query(query): Query<ListPostsQuery>,
) -> BlogResult<Json<PostListResponse>>
where
    R: PostRepository + CommentRepository + Clone + Send + Sync + 'static,
{
    let pagination = state
        .config
        .pagination(query.page.as_deref(), query.limit.as_deref());

    let page = PostUseCase::new(state.repo.clone())
        .list(query.search, pagination.clone())
        .await?;

    Ok(Json(PostListResponse::new(&page, &pagination)))
}

/// GET /api/posts/mine
pub async fn list_my_posts<R>(
    State(state): State<BlogAppState<R>>,
    Extension(ctx): Extension<AuthContext>,
    Query(query): Query<ListPostsQuery>,
) -> BlogResult<Json<PostListResponse>>
where
    R: PostRepository + CommentRepository + Clone + Send + Sync + 'static,
{
    let pagination = state
        .config
        .pagination(query.page.as_deref(), query.limit.as_deref());

    let page = PostUseCase::new(state.repo.clone())
        .list_mine(&ctx, query.search, pagination.clone())
        .await?;

    Ok(Json(PostListResponse::new(&page, &pagination)))
}

/// GET /api/posts/{id}
pub async fn get_post<R>(
    State(state): State<BlogAppState<R>>,
    Path(id): Path<String>,
) -> BlogResult<Json<PostResponse>>
where
    R: PostRepository + CommentRepository + Clone + Send + Sync + 'static,
{
    let post_id = parse_post_id(&id)?;
    let post = PostUseCase::new(state.repo.clone()).get(&post_id).await?;

    Ok(Json(PostResponse::from(&post)))
}

/// POST /api/posts
pub async fn create_post<R>(
    State(state): State<BlogAppState<R>>,
    Extension(ctx): Extension<AuthContext>,
    Json(req): Json<PostRequest>,
) -> BlogResult<(StatusCode, Json<PostResponse>)>
where
    R: PostRepository + CommentRepository + Clone + Send + Sync + 'static,
{
    let input = CreatePostInput {
        title: req.title,
        content: req.content,
    };

    let post = PostUseCase::new(state.repo.clone())
        .create(&ctx, input)
        .await?;

    Ok((StatusCode::CREATED, Json(PostResponse::from(&post))))
}

/// PUT /api/posts/{id}
pub async fn update_post<R>(
    State(state): State<BlogAppState<R>>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<String>,
    Json(req): Json<PostRequest>,
) -> BlogResult<Json<PostResponse>>
where
    R: PostRepository + CommentRepository + Clone + Send + Sync + 'static,
{
    let post_id = parse_post_id(&id)?;
    let input = UpdatePostInput {
        title: req.title,
        content: req.content,
    };

    let post = PostUseCase::new(state.repo.clone())
        .update(&ctx, &post_id, input)
        .await?;

    Ok(Json(PostResponse::from(&post)))
}

/// DELETE /api/posts/{id}
pub async fn delete_post<R>(
    State(state): State<BlogAppState<R>>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<String>,
) -> BlogResult<Json<MessageResponse>>
where
    R: PostRepository + CommentRepository + Clone + Send + Sync + 'static,
{
    let post_id = parse_post_id(&id)?;

    PostUseCase::new(state.repo.clone())
        .delete(&ctx, &post_id)
        .await?;

    Ok(Json(MessageResponse::new("Post deleted")))
}

/// POST /api/posts/{id}/like
pub async fn toggle_like<R>(
    State(state): State<BlogAppState<R>>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<String>,
) -> BlogResult<Json<LikeResponse>>
where
    R: PostRepository + CommentRepository + Clone + Send + Sync + 'static,
{
    let post_id = parse_post_id(&id)?;

    let like = PostUseCase::new(state.repo.clone())
        .toggle_like(&ctx, &post_id)
        .await?;

    Ok(Json(LikeResponse::from(like)))
}

// ============================================================================
// Comments
// ============================================================================

/// GET /api/comments/{post_id}
pub async fn list_comments<R>(
    State(state): State<BlogAppState<R>>,
    Path(post_id): Path<String>,
) -> BlogResult<Json<Vec<CommentResponse>>>
where
    R: PostRepository + CommentRepository + Clone + Send + Sync + 'static,
{
    let post_id = parse_post_id(&post_id)?;

    let comments = CommentUseCase::new(state.repo.clone(), state.repo.clone())
        .list(&post_id)
        .await?;

    Ok(Json(comments.iter().map(CommentResponse::from).collect()))
}

/// POST /api/comments/{post_id}
pub async fn add_comment<R>(
    State(state): State<BlogAppState<R>>,
    Extension(ctx): Extension<AuthContext>,
    Path(post_id): Path<String>,
    Json(req): Json<CommentRequest>,
) -> BlogResult<(StatusCode, Json<CommentResponse>)>
where
    R: PostRepository + CommentRepository + Clone + Send + Sync + 'static,
{
    let post_id = parse_post_id(&post_id)?;

    let comment = CommentUseCase::new(state.repo.clone(), state.repo.clone())
        .add(&ctx, &post_id, req.content)
        .await?;

    Ok((StatusCode::CREATED, Json(CommentResponse::from(&comment))))
}

/// DELETE /api/comments/item/{comment_id}
pub async fn delete_comment<R>(
    State(state): State<BlogAppState<R>>,
    Extension(ctx): Extension<AuthContext>,
    Path(comment_id): Path<String>,
) -> BlogResult<Json<MessageResponse>>
where
    R: PostRepository + CommentRepository + Clone + Send + Sync + 'static,
{
    let comment_id = CommentId::from_str(&comment_id)
        .map_err(|_| BlogError::validation("commentId", "Invalid comment id"))?;

    CommentUseCase::new(state.repo.clone(), state.repo.clone())
        .delete(&ctx, &comment_id)
        .await?;

    Ok(Json(MessageResponse::new("Comment deleted")))
}

fn parse_post_id(raw: &str) -> BlogResult<PostId> {
    PostId::from_str(raw).map_err(|_| BlogError::validation("postId", "Invalid post id"))
}

//! Data Transfer Objects - request/response types for the API.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use blog_core::domain::{NewPost, NewUser, Owner, PostDetails, PostPatch, User, UserDetails};
use blog_core::stats::AuthorCount;

/// Request to register a new user.
///
/// Missing fields deserialize as empty so that validation reports them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RegisterUserRequest {
    pub username: String,
    pub name: String,
    pub password: String,
}

impl From<RegisterUserRequest> for NewUser {
    fn from(req: RegisterUserRequest) -> Self {
        Self {
            username: req.username,
            name: req.name,
            password: req.password,
        }
    }
}

/// Request to login.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Successful login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub username: String,
    pub name: String,
}

/// A user's public information. Never carries the password hash.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub name: String,
    /// Ids of the posts this user owns.
    pub posts: Vec<Uuid>,
}

impl From<UserDetails> for UserResponse {
    fn from(details: UserDetails) -> Self {
        Self {
            id: details.user.id,
            username: details.user.username,
            name: details.user.name,
            posts: details.posts,
        }
    }
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        UserDetails {
            user,
            posts: Vec::new(),
        }
        .into()
    }
}

/// Owner reference embedded in a post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostOwner {
    pub id: Uuid,
    pub username: String,
    pub name: String,
}

impl From<Owner> for PostOwner {
    fn from(owner: Owner) -> Self {
        Self {
            id: owner.id,
            username: owner.username,
            name: owner.name,
        }
    }
}

/// A post as served to clients. The liked-by set stays server side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostResponse {
    pub id: Uuid,
    pub title: String,
    pub author: String,
    pub url: String,
    pub likes: i64,
    pub user: Option<PostOwner>,
}

impl From<PostDetails> for PostResponse {
    fn from(details: PostDetails) -> Self {
        let PostDetails { post, owner } = details;
        Self {
            id: post.id,
            title: post.title,
            author: post.author,
            url: post.url,
            likes: post.likes,
            user: owner.map(Into::into),
        }
    }
}

/// Request to create a post.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CreatePostRequest {
    pub title: String,
    pub author: String,
    pub url: String,
    pub likes: Option<i64>,
}

impl From<CreatePostRequest> for NewPost {
    fn from(req: CreatePostRequest) -> Self {
        Self {
            title: req.title,
            author: req.author,
            url: req.url,
            likes: req.likes,
        }
    }
}

/// Body of `PUT /posts/{id}`. Unknown fields (such as an embedded `user`)
/// are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdatePostRequest {
    pub title: Option<String>,
    pub author: Option<String>,
    pub url: Option<String>,
    pub likes: Option<i64>,
}

impl From<UpdatePostRequest> for PostPatch {
    fn from(req: UpdatePostRequest) -> Self {
        Self {
            title: req.title,
            author: req.author,
            url: req.url,
            likes: req.likes,
        }
    }
}

/// Aggregate figures over all posts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsResponse {
    pub total_likes: i64,
    pub favorite: Option<PostResponse>,
    pub most_posts: Option<AuthorPosts>,
}

/// An author and their post count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthorPosts {
    pub author: String,
    pub posts: usize,
}

impl From<AuthorCount> for AuthorPosts {
    fn from(count: AuthorCount) -> Self {
        Self {
            author: count.author,
            posts: count.posts,
        }
    }
}

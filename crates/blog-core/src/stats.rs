//! Aggregate figures over a list of posts.

use serde::Serialize;

use crate::domain::{Post, PostDetails};

/// Figures served by the statistics endpoint.
#[derive(Debug, Clone)]
pub struct PostStats {
    pub total_likes: i64,
    pub favorite: Option<PostDetails>,
    pub most_posts: Option<AuthorCount>,
}

/// An author and how many posts they wrote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorCount {
    pub author: String,
    pub posts: usize,
}

/// Sum of likes over all posts, clamped at `i64::MAX`.
pub fn total_likes(posts: &[Post]) -> i64 {
    posts
        .iter()
        .fold(0i64, |total, p| total.saturating_add(p.likes))
}

/// The most liked post. On a tie the later post wins.
pub fn favorite_post(posts: &[Post]) -> Option<&Post> {
    posts
        .iter()
        .reduce(|best, post| if best.likes > post.likes { best } else { post })
}

/// The author with the most posts.
///
/// Authors are compared in order of first appearance; on a tie the later
/// author wins.
pub fn most_posts(posts: &[Post]) -> Option<AuthorCount> {
    let mut counts: Vec<AuthorCount> = Vec::new();
    for post in posts {
        match counts.iter_mut().find(|c| c.author == post.author) {
            Some(count) => count.posts += 1,
            None => counts.push(AuthorCount {
                author: post.author.clone(),
                posts: 1,
            }),
        }
    }

    counts
        .into_iter()
        .reduce(|best, count| if best.posts > count.posts { best } else { count })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::NewPost;
    use uuid::Uuid;

    fn post(title: &str, author: &str, likes: i64) -> Post {
        Post::new(
            Uuid::new_v4(),
            NewPost {
                title: title.to_string(),
                author: author.to_string(),
                url: format!("https://example.com/{title}"),
                likes: Some(likes),
            },
        )
    }

    fn sample() -> Vec<Post> {
        vec![
            post("React patterns", "Michael Chan", 7),
            post("Go To Statement Considered Harmful", "Edsger W. Dijkstra", 5),
            post("Canonical string reduction", "Edsger W. Dijkstra", 12),
            post("First class tests", "Robert C. Martin", 10),
            post("TDD harms architecture", "Robert C. Martin", 0),
            post("Type wars", "Robert C. Martin", 2),
        ]
    }

    #[test]
    fn test_total_likes() {
        assert_eq!(total_likes(&[]), 0);
        assert_eq!(total_likes(&sample()[..1]), 7);
        assert_eq!(total_likes(&sample()), 36);
    }

    #[test]
    fn test_total_likes_saturates() {
        let posts = vec![post("Huge", "A. Author", i64::MAX), post("Small", "B. Author", 1)];
        assert_eq!(total_likes(&posts), i64::MAX);
    }

    #[test]
    fn test_favorite_post() {
        assert!(favorite_post(&[]).is_none());

        let posts = sample();
        let favorite = favorite_post(&posts).unwrap();
        assert_eq!(favorite.title, "Canonical string reduction");
    }

    #[test]
    fn test_favorite_post_tie_takes_later() {
        let posts = vec![post("First", "A. Author", 3), post("Second", "B. Author", 3)];
        assert_eq!(favorite_post(&posts).unwrap().title, "Second");
    }

    #[test]
    fn test_most_posts() {
        assert!(most_posts(&[]).is_none());

        let single = most_posts(&sample()[..1]).unwrap();
        assert_eq!(
            single,
            AuthorCount {
                author: "Michael Chan".to_string(),
                posts: 1
            }
        );

        let most = most_posts(&sample()).unwrap();
        assert_eq!(most.author, "Robert C. Martin");
        assert_eq!(most.posts, 3);
    }
}

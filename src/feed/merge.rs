use std::collections::HashSet;

use crate::models::post::{Post, PostId};

/// Appends a freshly fetched page to the current list.
///
/// Items whose id is already present are dropped, so refetching an
/// overlapping page never duplicates or reorders existing entries.
/// Returns the merged list and how many incoming items were accepted.
pub fn merge_page(existing: &[Post], incoming: Vec<Post>) -> (Vec<Post>, usize) {
    let mut seen: HashSet<PostId> = existing.iter().map(|post| post.id).collect();

    let mut merged = existing.to_vec();
    let before = merged.len();
    merged.extend(incoming.into_iter().filter(|post| seen.insert(post.id)));

    let accepted = merged.len() - before;
    (merged, accepted)
}

/// Server order, first occurrence of each id wins.
pub fn replace_page(incoming: Vec<Post>) -> Vec<Post> {
    let mut seen = HashSet::with_capacity(incoming.len());
    incoming
        .into_iter()
        .filter(|post| seen.insert(post.id))
        .collect()
}

/// Puts a locally created post at the head of the list.
pub fn prepend_post(existing: &[Post], post: Post) -> Vec<Post> {
    let mut next = Vec::with_capacity(existing.len() + 1);
    let id = post.id;
    next.push(post);
    next.extend(existing.iter().filter(|p| p.id != id).cloned());
    next
}

/// Flips the liked flag of one post, moving its count by exactly one.
/// A post already in the requested state is left as is.
pub fn with_like(existing: &[Post], id: PostId, liked: bool) -> Vec<Post> {
    existing
        .iter()
        .map(|post| {
            if post.id != id {
                return post.clone();
            }
            if post.is_liked == liked {
                tracing::debug!(
                    post_id = id,
                    liked,
                    "Post already in requested like state, leaving it unchanged"
                );
                return post.clone();
            }
            let delta = if liked { 1 } else { -1 };
            Post {
                is_liked: liked,
                likes_count: (post.likes_count + delta).max(0),
                ..post.clone()
            }
        })
        .collect()
}

/// Swaps in the server's copy of a post, keeping its position.
pub fn with_post_replaced(existing: &[Post], fresh: Post) -> Vec<Post> {
    existing
        .iter()
        .map(|post| if post.id == fresh.id { fresh.clone() } else { post.clone() })
        .collect()
}

pub fn without_post(existing: &[Post], id: PostId) -> Vec<Post> {
    existing.iter().filter(|post| post.id != id).cloned().collect()
}

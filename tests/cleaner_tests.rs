//! Integration tests for the cleanup dispatcher
//!
//! These tests verify that:
//! - every resolved rule produces exactly one execution or one submission
//! - queue presence alone decides sync-vs-async dispatch
//! - the soft/hard cascade decision matrix behaves per policy
//! - one relation's failure does not block dispatch of the next

use cleans::prelude::*;
use serde_json::json;
use std::sync::Mutex;
use tokio_test::assert_ok;

impl_cleanable!(Post, "post", { title: String });

/// Queue transport that records submissions instead of executing them
#[derive(Default)]
struct RecordingQueue {
    submitted: Mutex<Vec<(CleanupJob, String)>>,
}

impl RecordingQueue {
    fn submissions(&self) -> Vec<(CleanupJob, String)> {
        self.submitted.lock().unwrap().clone()
    }
}

#[async_trait]
impl CleanupQueue for RecordingQueue {
    async fn submit(&self, job: CleanupJob, queue_name: &str) -> Result<(), CleanError> {
        self.submitted
            .lock()
            .unwrap()
            .push((job, queue_name.to_string()));
        Ok(())
    }
}

struct Stack {
    persistence: Arc<InMemoryPersistence>,
    queue: Arc<RecordingQueue>,
    cleaner: Cleaner,
}

fn stack_with_handlers(handlers: HandlerRegistry) -> Stack {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();

    let persistence = Arc::new(InMemoryPersistence::new());
    let queue = Arc::new(RecordingQueue::default());
    let executor = Arc::new(JobExecutor::new(persistence.clone(), Arc::new(handlers)));
    let cleaner = Cleaner::new(executor, queue.clone());
    Stack {
        persistence,
        queue,
        cleaner,
    }
}

fn stack() -> Stack {
    stack_with_handlers(HandlerRegistry::new())
}

/// Seed `n` records of `record_type` under the owner's relation
fn seed(stack: &Stack, post: &Post, relation: &str, record_type: &str, n: usize) -> Vec<Uuid> {
    let owner = OwnerRef::new(post.id, "post");
    (0..n)
        .map(|i| {
            let record = RelatedRecord::new(record_type, json!({ "index": i }));
            let id = record.id;
            stack.persistence.insert_record(record);
            stack.persistence.link(&owner, relation, id);
            id
        })
        .collect()
}

// =============================================================================
// Fan-out
// =============================================================================

mod fan_out {
    use super::*;

    #[tokio::test]
    async fn test_sync_and_queued_split() {
        let stack = stack();
        let mut post = Post::new("hello".to_string());

        // Three relations, one of them queued
        post.set_cleanups(vec![
            "comments".into(),
            CleanupEntry::with_settings("revisions", CleanupSpec::new().queue("cleanup")),
            "tags".into(),
        ]);

        let comment_ids = seed(&stack, &post, "comments", "comment", 2);
        let revision_ids = seed(&stack, &post, "revisions", "revision", 2);
        let tag_ids = seed(&stack, &post, "tags", "tag", 1);

        tokio_test::assert_ok!(stack.cleaner.handle(&post, false).await);

        // Synchronous relations were cleaned inline
        for id in comment_ids.iter().chain(&tag_ids) {
            assert!(!stack.persistence.contains(id));
        }

        // The queued relation was submitted, not executed
        for id in &revision_ids {
            assert!(stack.persistence.contains(id));
        }
        let submissions = stack.queue.submissions();
        assert_eq!(submissions.len(), 1);
        assert_eq!(submissions[0].0.relation, "revisions");
        assert_eq!(submissions[0].1, "cleanup");
    }

    #[tokio::test]
    async fn test_queued_job_carries_detached_owner() {
        let stack = stack();
        let mut post = Post::new("hello".to_string());
        post.set_cleanups(vec![CleanupEntry::with_settings(
            "revisions",
            CleanupSpec::new().queue("cleanup").propagate_soft_delete(true),
        )]);
        seed(&stack, &post, "revisions", "revision", 1);

        stack.cleaner.handle(&post, true).await.unwrap();

        let submissions = stack.queue.submissions();
        assert_eq!(submissions.len(), 1);

        let job = &submissions[0].0;
        assert_eq!(job.owner, OwnerRef::new(post.id, "post"));
        assert!(job.propagate_soft_delete);
        assert!(job.is_force);

        // The payload must serialize without dragging relation data along
        let payload = serde_json::to_value(job).unwrap();
        assert_eq!(payload["owner"]["entity_type"], "post");
        assert!(payload.get("records").is_none());
    }

    #[tokio::test]
    async fn test_entity_default_queue_applies() {
        let stack = stack();
        let mut post = Post::new("hello".to_string());
        post.set_cleanups(vec!["comments".into()]);
        post.set_cleanup_queue(Some("low".to_string()));
        seed(&stack, &post, "comments", "comment", 1);

        stack.cleaner.handle(&post, false).await.unwrap();

        let submissions = stack.queue.submissions();
        assert_eq!(submissions.len(), 1);
        assert_eq!(submissions[0].1, "low");
    }

    #[tokio::test]
    async fn test_no_rules_is_a_noop() {
        let stack = stack();
        let post = Post::new("hello".to_string());

        stack.cleaner.handle(&post, false).await.unwrap();
        assert!(stack.queue.submissions().is_empty());
    }
}

// =============================================================================
// Failure independence
// =============================================================================

mod failure_domains {
    use super::*;

    #[tokio::test]
    async fn test_failed_relation_does_not_block_later_rules() {
        let stack = stack();
        let mut post = Post::new("hello".to_string());

        // "ghosts" is never declared on the persistence layer
        post.set_cleanups(vec!["ghosts".into(), "comments".into()]);
        let comment_ids = seed(&stack, &post, "comments", "comment", 2);

        let err = stack.cleaner.handle(&post, false).await.unwrap_err();
        assert!(matches!(
            err,
            CleanError::Relation(RelationError::UnknownRelation { relation, .. })
                if relation == "ghosts"
        ));

        // The second relation was still cleaned
        for id in &comment_ids {
            assert!(!stack.persistence.contains(id));
        }
    }

    #[tokio::test]
    async fn test_unknown_handler_surfaces_but_dispatch_continues() {
        let stack = stack();
        let mut post = Post::new("hello".to_string());
        post.set_cleanups(vec![
            CleanupEntry::with_settings("comments", CleanupSpec::new().handler("missing")),
            "tags".into(),
        ]);
        let comment_ids = seed(&stack, &post, "comments", "comment", 1);
        let tag_ids = seed(&stack, &post, "tags", "tag", 1);

        let err = stack.cleaner.handle(&post, false).await.unwrap_err();
        assert!(matches!(
            err,
            CleanError::Config(ConfigError::UnknownHandler { name }) if name == "missing"
        ));

        // The failing relation left its records alone, the next one ran
        assert!(stack.persistence.contains(&comment_ids[0]));
        assert!(!stack.persistence.contains(&tag_ids[0]));
    }

    #[tokio::test]
    async fn test_unknown_handler_on_queued_rule_fails_at_dispatch() {
        let stack = stack();
        let mut post = Post::new("hello".to_string());
        post.set_cleanups(vec![CleanupEntry::with_settings(
            "revisions",
            CleanupSpec::new().handler("missing").queue("cleanup"),
        )]);
        seed(&stack, &post, "revisions", "revision", 1);

        // The misconfiguration surfaces to the caller, not in a worker log
        let err = stack.cleaner.handle(&post, false).await.unwrap_err();
        assert!(matches!(
            err,
            CleanError::Config(ConfigError::UnknownHandler { name }) if name == "missing"
        ));
        assert!(stack.queue.submissions().is_empty());
    }
}

// =============================================================================
// Soft/hard cascade matrix
// =============================================================================

mod delete_modes {
    use super::*;

    fn soft_capable_stack() -> Stack {
        let stack = stack();
        stack.persistence.mark_soft_capable("post");
        stack.persistence.mark_soft_capable("comment");
        stack
    }

    #[tokio::test]
    async fn test_soft_owner_with_propagation_soft_deletes() {
        let stack = soft_capable_stack();
        let mut post = Post::new("hello".to_string());
        post.set_cleanups(vec![CleanupEntry::with_settings(
            "comments",
            CleanupSpec::new().propagate_soft_delete(true),
        )]);
        let ids = seed(&stack, &post, "comments", "comment", 2);

        post.soft_delete();
        stack.cleaner.handle(&post, false).await.unwrap();

        for id in &ids {
            assert!(stack.persistence.contains(id));
            assert!(stack.persistence.is_soft_deleted(id));
        }
    }

    #[tokio::test]
    async fn test_soft_owner_without_propagation_hard_deletes() {
        let stack = soft_capable_stack();
        let mut post = Post::new("hello".to_string());
        post.set_cleanups(vec!["comments".into()]);
        let ids = seed(&stack, &post, "comments", "comment", 2);

        post.soft_delete();
        stack.cleaner.handle(&post, false).await.unwrap();

        for id in &ids {
            assert!(!stack.persistence.contains(id));
        }
    }

    #[tokio::test]
    async fn test_force_delete_always_hard_deletes() {
        let stack = soft_capable_stack();
        let mut post = Post::new("hello".to_string());
        post.set_cleanups(vec![CleanupEntry::with_settings(
            "comments",
            CleanupSpec::new().propagate_soft_delete(true),
        )]);
        let ids = seed(&stack, &post, "comments", "comment", 2);

        stack.cleaner.handle(&post, true).await.unwrap();

        for id in &ids {
            assert!(!stack.persistence.contains(id));
        }
    }

    #[tokio::test]
    async fn test_propagation_falls_back_to_hard_delete_per_type() {
        let stack = soft_capable_stack();
        let mut post = Post::new("hello".to_string());
        post.set_cleanups(vec![CleanupEntry::with_settings(
            "reactions",
            CleanupSpec::new().propagate_soft_delete(true),
        )]);

        // "comment" supports soft deletion, "reaction" does not
        let soft_ids = seed(&stack, &post, "reactions", "comment", 1);
        let hard_ids = seed(&stack, &post, "reactions", "reaction", 1);

        post.soft_delete();
        stack.cleaner.handle(&post, false).await.unwrap();

        assert!(stack.persistence.is_soft_deleted(&soft_ids[0]));
        assert!(!stack.persistence.contains(&hard_ids[0]));
    }

    #[tokio::test]
    async fn test_owner_without_soft_capability_hard_deletes() {
        // "post" is not soft-capable here, so even propagate=true cascades hard
        let stack = stack();
        stack.persistence.mark_soft_capable("comment");

        let mut post = Post::new("hello".to_string());
        post.set_cleanups(vec![CleanupEntry::with_settings(
            "comments",
            CleanupSpec::new().propagate_soft_delete(true),
        )]);
        let ids = seed(&stack, &post, "comments", "comment", 1);

        stack.cleaner.handle(&post, false).await.unwrap();
        assert!(!stack.persistence.contains(&ids[0]));
    }
}

// =============================================================================
// Handlers
// =============================================================================

mod handlers {
    use super::*;

    struct DropPublished;

    impl CleanupHandler for DropPublished {
        fn apply(&self, records: Vec<RelatedRecord>) -> Vec<RelatedRecord> {
            records
                .into_iter()
                .filter(|r| r.data["status"] == "draft")
                .collect()
        }
    }

    #[tokio::test]
    async fn test_handler_scopes_the_related_set() {
        let mut registry = HandlerRegistry::new();
        registry.register("drop_published", || DropPublished);
        let stack = stack_with_handlers(registry);

        let mut post = Post::new("hello".to_string());
        post.set_cleanups(vec![CleanupEntry::with_settings(
            "revisions",
            CleanupSpec::new().handler("drop_published"),
        )]);

        let owner = OwnerRef::new(post.id, "post");
        let draft = RelatedRecord::new("revision", json!({"status": "draft"}));
        let published = RelatedRecord::new("revision", json!({"status": "published"}));
        let (draft_id, published_id) = (draft.id, published.id);
        stack.persistence.insert_record(draft);
        stack.persistence.insert_record(published);
        stack.persistence.link(&owner, "revisions", draft_id);
        stack.persistence.link(&owner, "revisions", published_id);

        stack.cleaner.handle(&post, false).await.unwrap();

        assert!(!stack.persistence.contains(&draft_id));
        assert!(stack.persistence.contains(&published_id));
    }
}

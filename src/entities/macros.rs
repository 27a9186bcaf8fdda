//! Macros for reducing boilerplate when defining cleanable entities
//!
//! These macros generate the struct and the repetitive trait
//! implementations needed for each entity type that participates in
//! cascading cleanup.

/// Complete macro to create a cleanable entity with automatic trait
/// implementations
///
/// Generates the struct (standard `id` / `deleted_at` / `cleanup` fields
/// plus the given specific fields), a `new` constructor, and the `Entity` +
/// `Cleanable` implementations. The optional trailing block registers
/// annotated cleanup rules, keyed by method name; these overwrite
/// declarative rules under the same key at resolution time.
///
/// # Example
///
/// ```rust,ignore
/// use cleans::prelude::*;
///
/// impl_cleanable!(
///     Post,
///     "post",
///     {
///         title: String,
///     },
///     {
///         stale_drafts => CleanupSpec::new().handler("drop_published"),
///         audit_trail => CleanupSpec::new().queue("cleanup"),
///     }
/// );
///
/// let mut post = Post::new("hello".to_string());
/// post.set_cleanups(vec!["comments".into()]);
/// ```
#[macro_export]
macro_rules! impl_cleanable {
    (
        $type:ident,
        $type_name:expr,
        {
            $( $specific_field:ident : $specific_type:ty ),* $(,)?
        }
    ) => {
        $crate::impl_cleanable!($type, $type_name, { $( $specific_field : $specific_type ),* }, {});
    };
    (
        $type:ident,
        $type_name:expr,
        {
            $( $specific_field:ident : $specific_type:ty ),* $(,)?
        },
        {
            $( $method:ident => $spec:expr ),* $(,)?
        }
    ) => {
        #[derive(Debug, Clone, ::serde::Serialize, ::serde::Deserialize)]
        pub struct $type {
            /// Unique identifier for this entity
            pub id: ::uuid::Uuid,

            /// When this entity was soft-deleted (if applicable)
            pub deleted_at: Option<::chrono::DateTime<::chrono::Utc>>,

            /// Cleanup configuration for cascading deletes
            #[serde(default)]
            pub cleanup: $crate::config::CleanupConfig,

            $( pub $specific_field : $specific_type ),*
        }

        impl $type {
            pub fn new( $( $specific_field : $specific_type ),* ) -> Self {
                Self {
                    id: ::uuid::Uuid::new_v4(),
                    deleted_at: None,
                    cleanup: $crate::config::CleanupConfig::new(),
                    $( $specific_field ),*
                }
            }

            /// Mark this entity as soft-deleted
            pub fn soft_delete(&mut self) {
                self.deleted_at = Some(::chrono::Utc::now());
            }

            /// Clear the soft-delete marker
            pub fn restore(&mut self) {
                self.deleted_at = None;
            }
        }

        impl $crate::core::entity::Entity for $type {
            fn id(&self) -> ::uuid::Uuid {
                self.id
            }

            fn entity_type(&self) -> &str {
                $type_name
            }

            fn deleted_at(&self) -> Option<::chrono::DateTime<::chrono::Utc>> {
                self.deleted_at
            }
        }

        impl $crate::core::entity::Cleanable for $type {
            fn cleanup_config(&self) -> &$crate::config::CleanupConfig {
                &self.cleanup
            }

            fn cleanup_config_mut(&mut self) -> &mut $crate::config::CleanupConfig {
                &mut self.cleanup
            }

            fn annotated_rules(&self) -> Vec<(String, $crate::core::rule::CleanupSpec)> {
                vec![
                    $( (stringify!($method).to_string(), $spec) ),*
                ]
            }
        }
    };
}

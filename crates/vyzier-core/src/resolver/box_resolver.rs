//! BoxResolver -- object-safe dynamic dispatch wrapper for ResponseResolver.
//!
//! 1. Define an object-safe `ResponseResolverDyn` trait with boxed futures
//! 2. Blanket-impl `ResponseResolverDyn` for all `T: ResponseResolver`
//! 3. `BoxResolver` wraps `Box<dyn ResponseResolverDyn>` and delegates

use std::future::Future;
use std::pin::Pin;

use vyzier_types::error::NetworkError;
use vyzier_types::message::Message;

use super::provider::ResponseResolver;

/// Object-safe version of [`ResponseResolver`] with boxed futures.
pub trait ResponseResolverDyn: Send + Sync {
    fn name(&self) -> &str;

    fn resolve_boxed<'a>(
        &'a self,
        user_text: &'a str,
        history: &'a [Message],
    ) -> Pin<Box<dyn Future<Output = Result<Message, NetworkError>> + Send + 'a>>;
}

impl<T: ResponseResolver> ResponseResolverDyn for T {
    fn name(&self) -> &str {
        ResponseResolver::name(self)
    }

    fn resolve_boxed<'a>(
        &'a self,
        user_text: &'a str,
        history: &'a [Message],
    ) -> Pin<Box<dyn Future<Output = Result<Message, NetworkError>> + Send + 'a>> {
        Box::pin(self.resolve(user_text, history))
    }
}

/// Type-erased resolver for runtime strategy selection.
///
/// Lets the binary pick local or remote resolution from configuration and
/// hand either one to the same `SessionController` type.
pub struct BoxResolver {
    inner: Box<dyn ResponseResolverDyn>,
}

impl BoxResolver {
    /// Wrap a concrete `ResponseResolver` in a type-erased box.
    pub fn new<T: ResponseResolver + 'static>(resolver: T) -> Self {
        Self {
            inner: Box::new(resolver),
        }
    }
}

impl ResponseResolver for BoxResolver {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn resolve(&self, user_text: &str, history: &[Message]) -> Result<Message, NetworkError> {
        self.inner.resolve_boxed(user_text, history).await
    }
}

impl std::fmt::Debug for BoxResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoxResolver")
            .field("name", &self.inner.name())
            .finish()
    }
}

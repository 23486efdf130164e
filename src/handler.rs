//! Route handlers and type erasure.
//!
//! A handler receives the request and produces the one response for it.
//! The route table holds handlers of many concrete types side by side, so
//! each is stored as a [`BoxedHandler`] (`Arc<dyn Handler>`) and called
//! through one virtual dispatch per request:
//!
//! ```text
//! async fn hello(req: Request) -> Response { … }   ← user writes this
//!        ↓ Router::on(Method::Get, "/", hello)
//! Arc::new(hello) as BoxedHandler                  ← blanket impl below
//!        ↓
//! handler.call(req)  at request time               → BoxFuture
//! ```

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::request::Request;
use crate::response::{IntoResponse, Response};

/// A heap-allocated, type-erased future that resolves to a [`Response`].
///
/// `Send + 'static` so the dispatcher can run it on its own task.
pub type BoxFuture = Pin<Box<dyn Future<Output = Response> + Send + 'static>>;

/// A handler shared by every request that matches its route.
pub type BoxedHandler = Arc<dyn Handler>;

/// Anything that can answer a request.
///
/// Implemented automatically for `async fn`s and closures of the shape
/// `Fn(Request) -> impl Future<Output = impl IntoResponse>`. Implement it by
/// hand for handlers that carry state:
///
/// ```rust
/// use lightserve::{BoxFuture, Handler, Request, Response};
///
/// struct Greeting(&'static str);
///
/// impl Handler for Greeting {
///     fn call(&self, _req: Request) -> BoxFuture {
///         let text = self.0;
///         Box::pin(async move { Response::text(text) })
///     }
/// }
/// ```
pub trait Handler: Send + Sync + 'static {
    fn call(&self, req: Request) -> BoxFuture;
}

impl<F, Fut, R> Handler for F
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
    fn call(&self, req: Request) -> BoxFuture {
        let fut = self(req);
        Box::pin(async move { fut.await.into_response() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn echo_path(req: Request) -> String {
        req.path().to_owned()
    }

    #[tokio::test]
    async fn async_fn_is_a_handler() {
        let handler: BoxedHandler = Arc::new(echo_path);
        let res = handler.call(Request::new("GET", "/a/b?c")).await;
        assert_eq!(res.body(), b"/a/b");
    }

    #[tokio::test]
    async fn closure_capturing_state_is_a_handler() {
        let prefix = String::from("hi ");
        let handler: BoxedHandler = Arc::new(move |req: Request| {
            let body = format!("{prefix}{}", req.method());
            async move { body }
        });
        let res = handler.call(Request::new("PUT", "/")).await;
        assert_eq!(res.body(), b"hi PUT");
    }
}

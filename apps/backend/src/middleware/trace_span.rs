//! Per-request tracing span.
//!
//! Every event logged while serving a request carries the `request` span's
//! `trace_id`, `method` and `path`. `player_id` starts empty and is filled in
//! by `JwtExtract` once a bearer token checks out, so quiz and admin logs
//! name the player without each handler repeating it.
//!
//! Reads the [`TraceId`] left in extensions by `RequestTrace`, which has to
//! be registered after this one (actix runs the last `wrap` first):
//!
//! App::new()
//!     .wrap(StructuredLogger)
//!     .wrap(TraceSpan)
//!     .wrap(RequestTrace)

use std::future::{ready, Ready};

use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::Error;
use actix_web::HttpMessage;
use futures_util::future::LocalBoxFuture;
use tracing::{field, info_span, Instrument, Span};

use crate::trace_ctx::TraceId;

#[derive(Clone, Default)]
pub struct TraceSpan;

impl<S, B> Transform<S, ServiceRequest> for TraceSpan
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = TraceSpanMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(TraceSpanMiddleware { service }))
    }
}

pub struct TraceSpanMiddleware<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for TraceSpanMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let span = request_span(&req);

        // Inner middleware does synchronous work in `call` (JwtExtract records
        // player_id there), so the span is entered for that part too.
        let fut = {
            let _entered = span.enter();
            self.service.call(req)
        };

        Box::pin(fut.instrument(span))
    }
}

fn request_span(req: &ServiceRequest) -> Span {
    let trace_id = req
        .extensions()
        .get::<TraceId>()
        .map(TraceId::to_string)
        .unwrap_or_else(|| "missing-trace-id".to_string());

    info_span!(
        "request",
        trace_id = %trace_id,
        method = %req.method(),
        path = %req.path(),
        player_id = field::Empty,
    )
}

/// Attach the authenticated player to the enclosing `request` span.
pub fn record_player(player_id: &str) {
    Span::current().record("player_id", player_id);
}

use actix_web::{web, HttpResponse};
use uuid::Uuid;
use validator::Validate;

use crate::models::{IncomingRequest, SendRequestBody};
use crate::routes::{ApiError, AppState, Requester};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/requests", web::post().to(send_request))
        .route("/requests/incoming", web::get().to(incoming_requests))
        .route("/requests/{id}/accept", web::post().to(accept_request))
        .route("/requests/{id}/decline", web::post().to(decline_request));
}

/// Send a study-match request
///
/// POST /api/v1/requests
///
/// Request body:
/// ```json
/// { "to": "bob@purdue.edu" }
/// ```
async fn send_request(
    state: web::Data<AppState>,
    requester: Requester,
    body: web::Json<SendRequestBody>,
) -> Result<HttpResponse, ApiError> {
    body.validate().map_err(ApiError::validation)?;

    if state.users.get(requester.email()).await.is_none() {
        return Err(ApiError::profile_not_found(requester.email()));
    }
    if state.users.get(&body.to).await.is_none() {
        return Err(ApiError::profile_not_found(&body.to));
    }

    let request = state.requests.send(requester.email(), &body.to).await?;

    tracing::info!("Match request {} sent: {} -> {}", request.id, request.from, request.to);
    Ok(HttpResponse::Created().json(request))
}

/// Requests addressed to the requester, each with its sender's profile
///
/// GET /api/v1/requests/incoming
async fn incoming_requests(
    state: web::Data<AppState>,
    requester: Requester,
) -> Result<HttpResponse, ApiError> {
    let requests = state.requests.incoming(requester.email()).await;

    let mut incoming = Vec::with_capacity(requests.len());
    for request in requests {
        let sender = state.users.get(&request.from).await;
        incoming.push(IncomingRequest { request, sender });
    }

    Ok(HttpResponse::Ok().json(incoming))
}

/// POST /api/v1/requests/{id}/accept
async fn accept_request(
    state: web::Data<AppState>,
    requester: Requester,
    id: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let request = state.requests.accept(id.into_inner(), requester.email()).await?;

    tracing::info!("Match request {} accepted by {}", request.id, requester.email());
    Ok(HttpResponse::Ok().json(request))
}

/// POST /api/v1/requests/{id}/decline
async fn decline_request(
    state: web::Data<AppState>,
    requester: Requester,
    id: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let request = state.requests.decline(id.into_inner(), requester.email()).await?;

    tracing::info!("Match request {} declined by {}", request.id, requester.email());
    Ok(HttpResponse::NoContent().finish())
}

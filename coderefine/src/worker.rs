//! Background request dispatch.
//!
//! Every backend exchange runs in its own tokio task and reports back through
//! the event bus as exactly one `AppEvent::Api`. Requests carry the ticket of
//! the workspace that issued them; the workspace decides on arrival whether
//! the answer is still wanted. Nothing is cancelled.

use std::sync::Arc;

use tokio::sync::mpsc::UnboundedSender;

use coderefine_core::auth::AuthRequest;
use coderefine_core::convert::ConvertTicket;
use coderefine_core::dashboard::RefreshTicket;
use coderefine_core::history::ListTicket;
use coderefine_core::review::{LoadTicket, ReviewTicket};
use coderefine_core::types::{
    ConversionResult, ReviewDetail, ReviewHistoryRecord, ReviewResult, Session, Stats, UserProfile,
};
use coderefine_core::{ApiClient, ApiError, SessionStore};

use crate::event::AppEvent;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiRequest {
    Login { email: String, password: String },
    Register { username: String, email: String, password: String },
    Me,
    SubmitReview(ReviewTicket),
    LoadReview(LoadTicket),
    ListHistory(ListTicket),
    DeleteReview { id: i64 },
    Stats(RefreshTicket),
    Recent { ticket: RefreshTicket, limit: usize },
    Convert(ConvertTicket),
    Logout,
}

impl From<AuthRequest> for ApiRequest {
    fn from(req: AuthRequest) -> Self {
        match req {
            AuthRequest::Login { email, password } => ApiRequest::Login { email, password },
            AuthRequest::Register { username, email, password } => {
                ApiRequest::Register { username, email, password }
            }
        }
    }
}

impl ApiRequest {
    /// Short name for logs. Never includes credentials.
    pub fn name(&self) -> &'static str {
        match self {
            ApiRequest::Login { .. } => "login",
            ApiRequest::Register { .. } => "register",
            ApiRequest::Me => "me",
            ApiRequest::SubmitReview(_) => "submit_review",
            ApiRequest::LoadReview(_) => "load_review",
            ApiRequest::ListHistory(_) => "list_history",
            ApiRequest::DeleteReview { .. } => "delete_review",
            ApiRequest::Stats(_) => "stats",
            ApiRequest::Recent { .. } => "recent",
            ApiRequest::Convert(_) => "convert",
            ApiRequest::Logout => "logout",
        }
    }
}

#[derive(Debug)]
pub enum ApiResponse {
    Auth(Result<Session, ApiError>),
    Me(Result<UserProfile, ApiError>),
    Review { seq: u64, result: Result<ReviewResult, ApiError> },
    ReviewLoaded { ticket: LoadTicket, result: Result<ReviewDetail, ApiError> },
    History { ticket: ListTicket, result: Result<Vec<ReviewHistoryRecord>, ApiError> },
    Deleted { id: i64, result: Result<(), ApiError> },
    Stats { ticket: RefreshTicket, result: Result<Stats, ApiError> },
    Recent { ticket: RefreshTicket, result: Result<Vec<ReviewHistoryRecord>, ApiError> },
    Converted { seq: u64, result: Result<ConversionResult, ApiError> },
    LoggedOut,
}

/// Spawns one task for `request`. The task sends its answer on `tx` and ends.
pub fn dispatch(client: &ApiClient, request: ApiRequest, tx: &UnboundedSender<AppEvent>) {
    let client = client.clone();
    let tx = tx.clone();
    tokio::spawn(async move {
        let name = request.name();
        tracing::debug!(request = name, "dispatching");
        let response = execute(&client, request).await;
        if tx.send(AppEvent::Api(Box::new(response))).is_err() {
            tracing::debug!(request = name, "event bus closed, response dropped");
        }
    });
}

/// Runs `request` to completion against the backend.
pub async fn execute(client: &ApiClient, request: ApiRequest) -> ApiResponse {
    match request {
        ApiRequest::Login { email, password } => {
            ApiResponse::Auth(client.login(&email, &password).await)
        }
        ApiRequest::Register { username, email, password } => {
            ApiResponse::Auth(client.register(&username, &email, &password).await)
        }
        ApiRequest::Me => ApiResponse::Me(client.me().await),
        ApiRequest::SubmitReview(ticket) => ApiResponse::Review {
            seq: ticket.seq,
            result: client.submit_review(&ticket.code, ticket.language.as_str()).await,
        },
        ApiRequest::LoadReview(ticket) => ApiResponse::ReviewLoaded {
            ticket,
            result: client.get_review(ticket.id).await,
        },
        ApiRequest::ListHistory(ticket) => ApiResponse::History {
            ticket,
            result: client.list_reviews(ticket.limit).await,
        },
        ApiRequest::DeleteReview { id } => {
            ApiResponse::Deleted { id, result: client.delete_review(id).await }
        }
        ApiRequest::Stats(ticket) => ApiResponse::Stats { ticket, result: client.stats().await },
        ApiRequest::Recent { ticket, limit } => ApiResponse::Recent {
            ticket,
            result: client.list_reviews(limit).await,
        },
        ApiRequest::Convert(ticket) => ApiResponse::Converted {
            seq: ticket.seq,
            result: client.convert(&ticket.code, ticket.target.as_str()).await,
        },
        ApiRequest::Logout => {
            client.session().clear().await;
            ApiResponse::LoggedOut
        }
    }
}

/// Forwards every change of the shared session onto the event bus.
///
/// Ends when the store is dropped or the bus closes.
pub fn spawn_session_watcher(store: &Arc<SessionStore>, tx: UnboundedSender<AppEvent>) {
    let mut rx = store.subscribe();
    tokio::spawn(async move {
        while rx.changed().await.is_ok() {
            let session = rx.borrow_and_update().clone();
            tracing::debug!(logged_in = session.is_some(), "session changed");
            if tx.send(AppEvent::SessionChanged(session)).is_err() {
                break;
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use coderefine_core::types::User;
    use tokio::sync::mpsc;

    use super::*;

    fn offline_client(store: Arc<SessionStore>) -> ApiClient {
        ApiClient::new("http://127.0.0.1:9", Duration::from_secs(2), store)
    }

    #[tokio::test]
    async fn dispatch_sends_exactly_one_response() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let client = offline_client(Arc::new(SessionStore::in_memory()));
        dispatch(&client, ApiRequest::DeleteReview { id: 7 }, &tx);
        drop(tx);

        match rx.recv().await {
            Some(AppEvent::Api(resp)) => match *resp {
                ApiResponse::Deleted { id: 7, result: Err(ApiError::Request { status: None, .. }) } => {}
                other => panic!("unexpected response {other:?}"),
            },
            other => panic!("unexpected event {other:?}"),
        }
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn logout_clears_store_and_notifies_watcher() {
        let store = Arc::new(SessionStore::in_memory());
        store
            .save(Session {
                token: "t".into(),
                user: User { username: "ada".into(), email: "ada@example.com".into() },
            })
            .await;
        let (tx, mut rx) = mpsc::unbounded_channel();
        spawn_session_watcher(&store, tx);

        let client = offline_client(Arc::clone(&store));
        assert!(matches!(execute(&client, ApiRequest::Logout).await, ApiResponse::LoggedOut));
        assert!(!store.is_logged_in());

        match rx.recv().await {
            Some(AppEvent::SessionChanged(None)) => {}
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[test]
    fn auth_requests_map_to_login_and_register() {
        let req: ApiRequest =
            AuthRequest::Login { email: "a@b.c".into(), password: "pw".into() }.into();
        assert_eq!(req.name(), "login");
        let req: ApiRequest = AuthRequest::Register {
            username: "a".into(),
            email: "a@b.c".into(),
            password: "secret".into(),
        }
        .into();
        assert_eq!(req.name(), "register");
    }
}

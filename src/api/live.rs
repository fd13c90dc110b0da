//! Live queries over Server-Sent Events. Each event carries the full current
//! result; the subscription ends when the client disconnects.

use actix_web::http::header::{CACHE_CONTROL, CONTENT_TYPE};
use actix_web::web::Bytes;
use actix_web::{HttpResponse, web};
use futures::stream;
use serde::Serialize;
use serde_json::json;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use super::DateQuery;
use crate::auth::session::Session;
use crate::service::{AttendanceLedger, EmployeeRegistry};
use crate::store::{StoreResult, Subscription};

/// One SSE frame: `snapshot` with the result, or `error` with a message.
pub fn sse_frame<T: Serialize>(result: &StoreResult<T>) -> Bytes {
    let (event, data) = match result {
        Ok(value) => match serde_json::to_string(value) {
            Ok(json) => ("snapshot", json),
            Err(e) => ("error", json!({ "message": e.to_string() }).to_string()),
        },
        Err(e) => {
            warn!(error = %e, "Live query refresh failed");
            ("error", json!({ "message": e.to_string() }).to_string())
        }
    };
    Bytes::from(format!("event: {event}\ndata: {data}\n\n"))
}

type Frames = mpsc::UnboundedReceiver<Bytes>;

/// Streams frames until the client goes away, then drops (cancels) `subscription`.
fn event_stream(frames: Frames, subscription: Subscription) -> HttpResponse {
    let body = stream::unfold((frames, subscription), |(mut frames, subscription)| async move {
        frames
            .recv()
            .await
            .map(|frame| (Ok::<_, actix_web::Error>(frame), (frames, subscription)))
    });

    HttpResponse::Ok()
        .insert_header((CONTENT_TYPE, "text/event-stream"))
        .insert_header((CACHE_CONTROL, "no-cache"))
        .streaming(body)
}

/// Live employee list
#[utoipa::path(
    get,
    path = "/api/employees/live",
    responses(
        (status = 200, description = "text/event-stream of employee lists ordered by ID")
    ),
    tag = "Employee",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn employees_live(session: Session, registry: web::Data<EmployeeRegistry>) -> HttpResponse {
    let (tx, rx) = mpsc::unbounded_channel();
    let subscription = registry.subscribe_employees(move |result| {
        let _ = tx.send(sse_frame(&result));
    });
    debug!(session = %session.session_id, "Employee live query opened");

    event_stream(rx, subscription)
}

/// Live attendance for one day
///
/// Records are not joined to employee names; pair with the live employee list.
#[utoipa::path(
    get,
    path = "/api/attendance/live",
    params(DateQuery),
    responses(
        (status = 200, description = "text/event-stream of the day's attendance records")
    ),
    tag = "Attendance",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn attendance_live(
    session: Session,
    ledger: web::Data<AttendanceLedger>,
    query: web::Query<DateQuery>,
) -> HttpResponse {
    let date = query.day();
    let (tx, rx) = mpsc::unbounded_channel();
    let subscription = ledger.subscribe_attendance_for_date(date, move |result| {
        let _ = tx.send(sse_frame(&result));
    });
    debug!(session = %session.session_id, %date, "Attendance live query opened");

    event_stream(rx, subscription)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::StoreError;

    #[test]
    fn snapshot_frame() {
        let frame = sse_frame(&Ok(vec!["E001"]));
        assert_eq!(&frame[..], b"event: snapshot\ndata: [\"E001\"]\n\n");
    }

    #[test]
    fn error_frame() {
        let frame = sse_frame::<Vec<String>>(&Err(StoreError::EmployeeNotFound("E9".into())));
        let text = std::str::from_utf8(&frame).unwrap();
        assert!(text.starts_with("event: error\n"));
        assert!(text.contains("employee `E9` not found"));
    }
}

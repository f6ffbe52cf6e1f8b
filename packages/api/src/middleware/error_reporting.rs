use axum::{extract::Request, middleware::Next, response::Response};

use crate::error::ErrorReport;

const MAX_REPORT_LEN: usize = 4 * 1024;

fn truncate(mut input: String) -> String {
    if input.len() > MAX_REPORT_LEN {
        let mut end = MAX_REPORT_LEN;
        while !input.is_char_boundary(end) {
            end -= 1;
        }
        input.truncate(end);
    }
    input
}

/// Takes the [`ErrorReport`] off failed responses and logs it under the id sent to the client.
pub async fn error_reporting_middleware(req: Request, next: Next) -> Response {
    let method = req.method().to_string();
    let path = req.uri().path().to_string();

    let mut response = next.run(req).await;

    let Some(report) = response.extensions_mut().remove::<ErrorReport>() else {
        return response;
    };

    tracing::error!(
        error_id = %report.id,
        status_code = report.status_code,
        public_code = %report.public_code,
        method = %method,
        path = %path,
        details = %report.details.map(truncate).unwrap_or_default(),
        "{}",
        truncate(report.summary)
    );

    response
}

//! Deprecated: forwards a report to an external ticketing API instead of
//! storing it. Kept for clients that still post to `/api/reports/legacy`.

use chrono::Utc;
use log::{error, info};
use serde::Serialize;
use uuid::Uuid;

use super::service::{ReportRequest, ReportResponse};
use crate::core::shared::enums::STATUS_OPEN;

#[derive(Debug, Serialize)]
struct ForwardPayload<'a> {
    ticket_id: &'a str,
    name: &'a str,
    keywords: &'a [String],
    description: &'a str,
    error_message: Option<&'a str>,
    screenshot_url: Option<&'a str>,
    created_at: String,
    status: &'static str,
}

pub struct LegacyForwarder<'a> {
    client: &'a reqwest::Client,
    endpoint: &'a str,
}

impl<'a> LegacyForwarder<'a> {
    pub fn new(client: &'a reqwest::Client, endpoint: &'a str) -> Self {
        Self { client, endpoint }
    }

    /// Never fails: transport problems and non-2xx answers come back as a
    /// `success: false` envelope.
    pub async fn forward(&self, report: &ReportRequest) -> ReportResponse {
        let ticket_id = Uuid::new_v4().to_string();
        let payload = ForwardPayload {
            ticket_id: &ticket_id,
            name: &report.name,
            keywords: &report.keywords,
            description: &report.description,
            error_message: report.error_message.as_deref(),
            screenshot_url: report.screenshot_url.as_deref(),
            created_at: Utc::now().to_rfc3339(),
            status: STATUS_OPEN,
        };

        let response = match self.client.post(self.endpoint).json(&payload).send().await {
            Ok(response) => response,
            Err(e) if e.is_timeout() => {
                error!("Timeout while forwarding report to {}", self.endpoint);
                return ReportResponse::failed("Request timeout while sending report");
            }
            Err(e) => {
                error!("Error forwarding report: {e}");
                return ReportResponse::failed(format!("Error sending report: {e}"));
            }
        };

        let status = response.status();
        if status == reqwest::StatusCode::OK || status == reqwest::StatusCode::CREATED {
            info!("Report forwarded with ticket id {ticket_id}");
            ReportResponse::created("Report sent successfully", ticket_id)
        } else {
            let body = response.text().await.unwrap_or_default();
            error!("Ticket API returned status {status}: {body}");
            ReportResponse::failed(format!(
                "Failed to send report: API returned {}",
                status.as_u16()
            ))
        }
    }
}

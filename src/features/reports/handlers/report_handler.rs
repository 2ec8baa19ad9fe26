use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::{
        sse::{Event, KeepAlive},
        IntoResponse, Response, Sse,
    },
    Json,
};
use futures::StreamExt;
use tracing::{debug, error};
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::core::extractor::{AppJson, AppQuery};
use crate::features::media::handlers::{multipart_error, read_media_field};
use crate::features::reports::dtos::{
    CreateReportDto, FeedSnapshotDto, ReportListQuery, ReportResponseDto, ResponsiblePartyDto,
    SubmitReportDto,
};
use crate::features::reports::services::{FeedEvent, ReportService};
use crate::modules::media::MediaFile;
use crate::shared::types::{ApiResponse, Meta, PaginationQuery};

const SUBMITTED_MESSAGE: &str = "Report submitted successfully";

/// Submit a report (JSON)
///
/// For clients that upload media first through `/api/media/upload` and pass
/// the returned URL as `imageUrl`.
#[utoipa::path(
    post,
    path = "/api/reports",
    request_body = CreateReportDto,
    responses(
        (status = 201, description = "Report stored", body = ApiResponse<ReportResponseDto>),
        (status = 400, description = "Missing or invalid fields")
    ),
    tag = "reports"
)]
pub async fn create_report(
    State(service): State<Arc<ReportService>>,
    AppJson(dto): AppJson<CreateReportDto>,
) -> Result<(StatusCode, Json<ApiResponse<ReportResponseDto>>)> {
    let report = service.create(dto).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(report.into()),
            Some(SUBMITTED_MESSAGE.to_string()),
            None,
        )),
    ))
}

/// Submit a report (form)
///
/// Accepts the form fields and an optional `file` in one multipart request.
/// The file is uploaded only after the fields pass validation.
#[utoipa::path(
    post,
    path = "/api/reports/submit",
    request_body(
        content = SubmitReportDto,
        content_type = "multipart/form-data",
    ),
    responses(
        (status = 201, description = "Report stored", body = ApiResponse<ReportResponseDto>),
        (status = 400, description = "Missing or invalid fields"),
        (status = 413, description = "File too large"),
        (status = 502, description = "Media host rejected the upload")
    ),
    tag = "reports"
)]
pub async fn submit_report(
    State(service): State<Arc<ReportService>>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<ApiResponse<ReportResponseDto>>)> {
    let mut dto = CreateReportDto::default();
    let mut file: Option<MediaFile> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, "Failed to read multipart data"))?
    {
        let field_name = field.name().unwrap_or("").to_string();

        if field_name == "file" {
            file = read_media_field(field).await?;
            continue;
        }

        let value = field.text().await.map_err(|e| {
            multipart_error(e, &format!("Failed to read field '{}'", field_name))
        })?;

        match field_name.as_str() {
            "province" => dto.province = value,
            "district" => dto.district = value,
            "municipality" => dto.municipality = value,
            "cityDetails" => dto.city_details = value,
            "description" => dto.description = value,
            "coordinates" => dto.coordinates = value,
            "imageUrl" | "imageURL" => dto.image_url = Some(value),
            "responsibleParty" => dto.responsible_party = parse_responsible_party(&value)?,
            _ => debug!("Ignoring unknown field: {}", field_name),
        }
    }

    let report = service.submit(dto, file).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(report.into()),
            Some(SUBMITTED_MESSAGE.to_string()),
            None,
        )),
    ))
}

fn parse_responsible_party(raw: &str) -> Result<Option<ResponsiblePartyDto>> {
    if raw.trim().is_empty() {
        return Ok(None);
    }

    serde_json::from_str(raw)
        .map(Some)
        .map_err(|e| AppError::BadRequest(format!("Invalid responsibleParty JSON: {}", e)))
}

/// List reports, newest first
#[utoipa::path(
    get,
    path = "/api/reports",
    params(ReportListQuery, PaginationQuery),
    responses(
        (status = 200, description = "Page of reports; meta.total is the filtered count", body = ApiResponse<Vec<ReportResponseDto>>)
    ),
    tag = "reports"
)]
pub async fn list_reports(
    State(service): State<Arc<ReportService>>,
    AppQuery(query): AppQuery<ReportListQuery>,
    AppQuery(pagination): AppQuery<PaginationQuery>,
) -> Result<Json<ApiResponse<Vec<ReportResponseDto>>>> {
    let (reports, total) = service.list(&query.into(), &pagination).await?;
    let dtos: Vec<ReportResponseDto> = reports.into_iter().map(Into::into).collect();

    Ok(Json(ApiResponse::success(
        Some(dtos),
        None,
        Some(Meta { total }),
    )))
}

/// Get a report by ID
#[utoipa::path(
    get,
    path = "/api/reports/{id}",
    params(("id" = Uuid, Path, description = "Report ID")),
    responses(
        (status = 200, description = "Report", body = ApiResponse<ReportResponseDto>),
        (status = 404, description = "Report not found")
    ),
    tag = "reports"
)]
pub async fn get_report(
    State(service): State<Arc<ReportService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<ReportResponseDto>>> {
    let report = service.get(id).await?;
    Ok(Json(ApiResponse::success(Some(report.into()), None, None)))
}

/// Live report feed (server-sent events)
///
/// Emits `snapshot` with the newest reports on connect, then
/// `report.created` for every new report. A client that falls behind
/// receives `resync` with a fresh snapshot.
#[utoipa::path(
    get,
    path = "/api/reports/stream",
    responses(
        (status = 200, description = "SSE stream of feed events", content_type = "text/event-stream", body = FeedSnapshotDto)
    ),
    tag = "reports"
)]
pub async fn stream_reports(State(service): State<Arc<ReportService>>) -> Result<Response> {
    let events = service.subscribe().await?;

    let stream = events.map(|event| Ok::<_, Infallible>(to_sse_event(event)));

    let sse = Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("ping"),
    );

    Ok(sse.into_response())
}

fn to_sse_event(event: FeedEvent) -> Event {
    let event_type = event.event_type();
    let data = match event {
        FeedEvent::Snapshot(reports) | FeedEvent::Resync(reports) => {
            serde_json::to_string(&FeedSnapshotDto::from(reports))
        }
        FeedEvent::Created(report) => serde_json::to_string(&ReportResponseDto::from(report)),
    };

    match data {
        Ok(json) => Event::default().event(event_type).data(json),
        Err(e) => {
            error!("Failed to serialize {} event: {}", event_type, e);
            Event::default().comment("serialization failed")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum_test::multipart::{MultipartForm, Part};
    use axum_test::TestServer;
    use serde_json::json;

    use crate::features::reports::routes;
    use crate::shared::test_helpers::{report_context, FakeUploader, ReportContext};

    fn server(ctx: &ReportContext) -> TestServer {
        TestServer::new(routes::routes(ctx.service.clone())).unwrap()
    }

    fn form() -> MultipartForm {
        MultipartForm::new()
            .add_text("province", "Bagmati Province")
            .add_text("district", "Kathmandu")
            .add_text("municipality", "Kirtipur")
            .add_text("cityDetails", "Ward 3, below the university gate")
            .add_text("description", "Deep pothole on the main road")
            .add_text("coordinates", "27.6785, 85.2776")
    }

    #[tokio::test]
    async fn test_create_report_json() {
        let ctx = report_context(FakeUploader::default());
        let response = server(&ctx)
            .post("/api/reports")
            .json(&json!({
                "province": "Koshi Province",
                "district": "Sunsari",
                "municipality": "Itahari",
                "cityDetails": "Itahari chowk",
                "coordinates": "26.66, 87.27",
                "responsibleParty": {"name": "Ward Office", "role": "Ward 4"},
                "imageURL": "https://res.cloudinary.com/demo/image/upload/p.jpg"
            }))
            .await;

        response.assert_status(StatusCode::CREATED);
        let body: ApiResponse<ReportResponseDto> = response.json();
        assert_eq!(body.message.as_deref(), Some(SUBMITTED_MESSAGE));
        let report = body.data.unwrap();
        assert_eq!(report.coordinates, "26.660000, 87.270000");
        assert_eq!(report.responsible_party.unwrap().name, "Ward Office");
        assert_eq!(
            report.image_url,
            "https://res.cloudinary.com/demo/image/upload/p.jpg"
        );
    }

    #[tokio::test]
    async fn test_create_report_missing_fields() {
        let ctx = report_context(FakeUploader::default());
        let response = server(&ctx)
            .post("/api/reports")
            .json(&json!({"province": "Koshi Province"}))
            .expect_failure()
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: ApiResponse<()> = response.json();
        assert!(!body.success);
        assert_eq!(
            body.message.as_deref(),
            Some("Please fill all required fields.")
        );
    }

    #[tokio::test]
    async fn test_submit_form_with_file() {
        let ctx = report_context(FakeUploader::default());
        let multipart = form().add_part(
            "file",
            Part::bytes(vec![7u8; 32])
                .file_name("pothole.jpg")
                .mime_type("image/jpeg"),
        );

        let response = server(&ctx)
            .post("/api/reports/submit")
            .multipart(multipart)
            .await;

        response.assert_status(StatusCode::CREATED);
        let body: ApiResponse<ReportResponseDto> = response.json();
        let report = body.data.unwrap();
        assert!(report.image_url.contains("/image/"));
        assert_eq!(report.coordinates, "27.678500, 85.277600");
        assert_eq!(ctx.uploader.uploaded_names(), vec!["pothole.jpg".to_string()]);
    }

    #[tokio::test]
    async fn test_submit_form_without_file() {
        let ctx = report_context(FakeUploader::default());
        let multipart = form().add_text("responsibleParty", r#"{"name":"Kirtipur Municipality"}"#);

        let response = server(&ctx)
            .post("/api/reports/submit")
            .multipart(multipart)
            .await;

        response.assert_status(StatusCode::CREATED);
        let body: ApiResponse<ReportResponseDto> = response.json();
        let report = body.data.unwrap();
        assert_eq!(report.image_url, "");
        assert_eq!(
            report.responsible_party.unwrap().name,
            "Kirtipur Municipality"
        );
        assert!(ctx.uploader.uploaded_names().is_empty());
    }

    #[tokio::test]
    async fn test_submit_upload_failure_is_bad_gateway() {
        let ctx = report_context(FakeUploader::failing());
        let multipart = form().add_part(
            "file",
            Part::bytes(vec![1u8; 8])
                .file_name("clip.mp4")
                .mime_type("video/mp4"),
        );

        let response = server(&ctx)
            .post("/api/reports/submit")
            .multipart(multipart)
            .expect_failure()
            .await;

        response.assert_status(StatusCode::BAD_GATEWAY);
        assert_eq!(ctx.repository.len(), 0);
    }

    #[tokio::test]
    async fn test_submit_oversized_file_is_payload_too_large() {
        let ctx = report_context(FakeUploader::default());
        let multipart = form().add_part(
            "file",
            Part::bytes(vec![0u8; 3 * 1024 * 1024])
                .file_name("clip.mp4")
                .mime_type("video/mp4"),
        );

        let response = server(&ctx)
            .post("/api/reports/submit")
            .multipart(multipart)
            .expect_failure()
            .await;

        response.assert_status(StatusCode::PAYLOAD_TOO_LARGE);
        let body: ApiResponse<()> = response.json();
        assert!(!body.success);
        assert!(ctx.uploader.uploaded_names().is_empty());
        assert_eq!(ctx.repository.len(), 0);
    }

    #[tokio::test]
    async fn test_list_and_get_reports() {
        let ctx = report_context(FakeUploader::default());
        let server = server(&ctx);

        for _ in 0..3 {
            server
                .post("/api/reports/submit")
                .multipart(form())
                .await
                .assert_status(StatusCode::CREATED);
        }

        let response = server
            .get("/api/reports")
            .add_query_param("district", "Kathmandu")
            .add_query_param("pageSize", 2)
            .await;
        response.assert_status_ok();
        let body: ApiResponse<Vec<ReportResponseDto>> = response.json();
        assert_eq!(body.meta.unwrap().total, 3);
        let reports = body.data.unwrap();
        assert_eq!(reports.len(), 2);
        assert!(reports[0].created_at >= reports[1].created_at);

        let response = server.get(&format!("/api/reports/{}", reports[0].id)).await;
        response.assert_status_ok();
        let body: ApiResponse<ReportResponseDto> = response.json();
        assert_eq!(body.data.unwrap().id, reports[0].id);
    }

    #[tokio::test]
    async fn test_get_unknown_report_is_not_found() {
        let ctx = report_context(FakeUploader::default());
        server(&ctx)
            .get(&format!("/api/reports/{}", Uuid::now_v7()))
            .expect_failure()
            .await
            .assert_status_not_found();
    }

    #[test]
    fn test_parse_responsible_party() {
        assert!(parse_responsible_party("  ").unwrap().is_none());
        let party = parse_responsible_party(r#"{"name":"DoR","contact":"01-4262693"}"#)
            .unwrap()
            .unwrap();
        assert_eq!(party.name, "DoR");
        assert_eq!(party.role, "");
        assert!(parse_responsible_party("{not json").is_err());
    }
}

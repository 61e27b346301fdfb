// Rust guideline compliant 2026-10-12

//! MCP server runtime for Slotwise.

use crate::types::{
    BookingResult, CreateBookingInput, CreateBulkSlotsInput, CreateBulkSlotsResult,
    CreateSlotInput, DeleteSlotInput, DeleteSlotResult, DistanceInput, ListSlotsInput,
    ListSlotsResult, ProviderResource, ProvidersResource, SearchAvailabilityInput,
    SearchAvailabilityResult, ShowBookingInput, SlotResult, UpdateBookingStatusInput,
};
use chrono::Duration;
use rmcp::handler::server::{router::tool::ToolRouter, wrapper::Parameters};
use rmcp::model::{
    AnnotateAble, CallToolResult, Content, ErrorData, Implementation, ListResourceTemplatesResult,
    ListResourcesResult, PaginatedRequestParams, ProtocolVersion, RawResource,
    RawResourceTemplate, ReadResourceRequestParams, ReadResourceResult, ResourceContents,
    ServerCapabilities, ServerInfo,
};
use rmcp::service::RequestContext;
use rmcp::transport::stdio;
use rmcp::{tool, tool_handler, tool_router, RoleServer, ServiceExt};
use serde::Serialize;
use slotwise_app::{
    now, parse_actor, parse_date, parse_datetime, parse_status, parse_time, parse_weekday,
    parse_weekdays, AppError, ErrorCode, ErrorEnvelope, RepoContext, Scheduler, SlotQuery,
    SuccessEnvelope,
};
use slotwise_core::geo;
use slotwise_core::{
    BookingRequest, BookingStatus, BulkRequest, Distance, FileRepository, GeoPoint, Interval,
    NewSlot, Recurrence, SearchCriteria, StatusChange, TimeRange, TimeTemplate,
};
use std::fs::OpenOptions;
use std::path::PathBuf;
use thiserror::Error;
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt;

const PROVIDERS_URI: &str = "slotwise://providers";
const RESOURCE_PREFIX: &str = "slotwise://";

/// Runtime options for the MCP server.
#[derive(Debug, Clone)]
pub struct McpOptions {
    /// Optional repository root to pin to.
    pub repo: Option<PathBuf>,
    /// Whether mutating tools are disabled.
    pub read_only: bool,
    /// Logging level.
    pub log_level: String,
    /// Optional log file path.
    pub log_file: Option<PathBuf>,
}

impl Default for McpOptions {
    fn default() -> Self {
        Self {
            repo: None,
            read_only: false,
            log_level: "info".to_string(),
            log_file: None,
        }
    }
}

/// MCP server errors.
#[derive(Debug, Error)]
pub enum McpServerError {
    /// IO errors during runtime setup.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// Invalid log level provided.
    #[error("Invalid log level: {0}")]
    InvalidLogLevel(String),
    /// Transport or server errors.
    #[error("MCP server error: {0}")]
    Transport(String),
}

/// Runs the MCP server on stdio until the client disconnects.
///
/// # Errors
///
/// Returns an error if the runtime cannot be initialized or the server fails.
pub fn run(options: McpOptions) -> Result<(), McpServerError> {
    let _guard = init_tracing(&options)?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async move {
        tracing::info!(read_only = options.read_only, "starting slotwise MCP server");
        let server = SlotwiseMcp::new(options);
        let service = server
            .serve(stdio())
            .await
            .map_err(|err| McpServerError::Transport(err.to_string()))?;
        service
            .waiting()
            .await
            .map_err(|err| McpServerError::Transport(err.to_string()))?;
        Ok(())
    })
}

// Stdout carries the protocol, so logs go to stderr or the log file.
fn init_tracing(options: &McpOptions) -> Result<Option<WorkerGuard>, McpServerError> {
    let level = parse_log_level(&options.log_level)?;

    if let Some(path) = &options.log_file {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        let (writer, guard) = tracing_appender::non_blocking(file);
        let subscriber = fmt()
            .with_max_level(level)
            .with_target(false)
            .json()
            .with_writer(writer)
            .finish();
        let _ = tracing::subscriber::set_global_default(subscriber);
        return Ok(Some(guard));
    }

    let subscriber = fmt()
        .with_max_level(level)
        .with_target(false)
        .json()
        .with_writer(std::io::stderr)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
    Ok(None)
}

fn parse_log_level(level: &str) -> Result<Level, McpServerError> {
    match level.to_lowercase().as_str() {
        "error" => Ok(Level::ERROR),
        "warn" => Ok(Level::WARN),
        "info" => Ok(Level::INFO),
        "debug" => Ok(Level::DEBUG),
        "trace" => Ok(Level::TRACE),
        other => Err(McpServerError::InvalidLogLevel(other.to_string())),
    }
}

/// MCP handler exposing scheduling tools.
#[derive(Clone)]
pub struct SlotwiseMcp {
    tool_router: ToolRouter<Self>,
    options: McpOptions,
}

impl SlotwiseMcp {
    /// Creates a handler with the given options.
    pub fn new(options: McpOptions) -> Self {
        Self {
            tool_router: Self::tool_router(),
            options,
        }
    }

    fn scheduler(&self) -> Result<Scheduler<FileRepository>, AppError> {
        RepoContext::discover(self.options.repo.as_deref())?.open_scheduler()
    }

    fn ensure_writable(&self) -> Result<(), AppError> {
        if self.options.read_only {
            return Err(AppError::InvalidInput(
                "Server is running in read-only mode".to_string(),
            ));
        }
        Ok(())
    }

    fn search_tool(&self, input: SearchAvailabilityInput) -> Result<SearchAvailabilityResult, AppError> {
        let scheduler = self.scheduler()?;
        let from = match input.from.as_deref() {
            Some(value) => parse_datetime(value)?,
            None => now(),
        };
        let to = match input.to.as_deref() {
            Some(value) => parse_datetime(value)?,
            None => from + Duration::days(i64::from(scheduler.config().upcoming_window_days)),
        };
        let criteria = SearchCriteria {
            keyword: input.keyword,
            min_duration_minutes: input.min_duration_minutes,
            location: point(input.latitude, input.longitude)?,
            radius_km: input.radius_km,
            provider_id: input.provider_id,
            limit: input.limit,
            sort_by_start: !input.unsorted.unwrap_or(false),
            ..SearchCriteria::between(from, to)
        };
        let matches = scheduler.search(&criteria)?;
        Ok(SearchAvailabilityResult {
            total: matches.len(),
            matches,
        })
    }

    fn list_slots_tool(&self, input: ListSlotsInput) -> Result<ListSlotsResult, AppError> {
        let range = TimeRange {
            from: input.from.as_deref().map(parse_datetime).transpose()?,
            to: input.to.as_deref().map(parse_datetime).transpose()?,
        };
        if let (Some(from), Some(to)) = (range.from, range.to) {
            TimeRange::between(from, to)?;
        }
        let query = SlotQuery {
            range,
            unbooked_only: input.unbooked_only.unwrap_or(false),
            booked_only: input.booked_only.unwrap_or(false),
            min_duration_minutes: input.min_duration_minutes,
        };
        let slots = self.scheduler()?.list_slots(&input.provider_id, &query)?;
        Ok(ListSlotsResult {
            total: slots.len(),
            slots,
        })
    }

    fn create_slot_tool(&self, input: CreateSlotInput) -> Result<SlotResult, AppError> {
        self.ensure_writable()?;
        let actor = parse_actor(&input.actor)?;
        let interval = Interval::new(parse_datetime(&input.start)?, parse_datetime(&input.end)?)?;
        let recurrence = input
            .repeat_weekday
            .as_deref()
            .map(parse_weekday)
            .transpose()?
            .map(|day_of_week| Recurrence {
                day_of_week,
                start_time: interval.start.time(),
                end_time: interval.end.time(),
            });
        let slot = self.scheduler()?.create_slot(
            &actor,
            NewSlot {
                interval,
                recurrence,
                notes: input.notes,
            },
            now(),
        )?;
        Ok(SlotResult { slot })
    }

    fn create_bulk_tool(&self, input: CreateBulkSlotsInput) -> Result<CreateBulkSlotsResult, AppError> {
        self.ensure_writable()?;
        let actor = parse_actor(&input.actor)?;
        let templates = input
            .times
            .iter()
            .map(|window| {
                Ok(TimeTemplate {
                    start: parse_time(&window.start)?,
                    end: parse_time(&window.end)?,
                })
            })
            .collect::<Result<Vec<_>, AppError>>()?;
        let request = BulkRequest {
            date_from: parse_date(&input.date_from)?,
            date_to: parse_date(&input.date_to)?,
            days: parse_weekdays(&input.days.join(","))?,
            templates,
            notes: input.notes,
        };
        let outcome = self.scheduler()?.create_bulk(&actor, &request, now())?;
        Ok(CreateBulkSlotsResult {
            created_count: outcome.created.len(),
            skipped_count: outcome.skipped.len(),
            created: outcome.created,
            skipped: outcome.skipped,
        })
    }

    fn delete_slot_tool(&self, input: DeleteSlotInput) -> Result<DeleteSlotResult, AppError> {
        self.ensure_writable()?;
        let actor = parse_actor(&input.actor)?;
        self.scheduler()?.delete_slot(&actor, &input.slot_id)?;
        Ok(DeleteSlotResult {
            slot_id: input.slot_id,
        })
    }

    fn create_booking_tool(&self, input: CreateBookingInput) -> Result<BookingResult, AppError> {
        self.ensure_writable()?;
        let actor = parse_actor(&input.actor)?;
        let request = BookingRequest {
            service_id: input.service_id,
            scheduled_at: Some(parse_datetime(&input.scheduled_at)?),
            slot_id: input.slot_id,
            notes: input.notes,
            customer_address: input.customer_address,
            customer_location: point(input.latitude, input.longitude)?,
        };
        let booking = self.scheduler()?.create_booking(&actor, request, now())?;
        Ok(BookingResult { booking })
    }

    fn show_booking_tool(&self, input: ShowBookingInput) -> Result<BookingResult, AppError> {
        let actor = parse_actor(&input.actor)?;
        let booking = self.scheduler()?.show_booking(&input.booking_id, &actor)?;
        Ok(BookingResult { booking })
    }

    fn update_status_tool(&self, input: UpdateBookingStatusInput) -> Result<BookingResult, AppError> {
        self.ensure_writable()?;
        let actor = parse_actor(&input.actor)?;
        let target = parse_status(&input.status)?;
        if target == BookingStatus::Pending {
            return Err(AppError::InvalidInput(
                "A booking cannot be moved back to pending".to_string(),
            ));
        }
        let change = StatusChange {
            target,
            reason: input.reason,
            actual_start: input.actual_start.as_deref().map(parse_datetime).transpose()?,
            actual_end: input.actual_end.as_deref().map(parse_datetime).transpose()?,
            notes: input.notes,
        };
        let booking = self
            .scheduler()?
            .update_status(&input.booking_id, &actor, change, now())?;
        Ok(BookingResult { booking })
    }

    fn distance_tool(&self, input: DistanceInput) -> Result<Distance, AppError> {
        let a = GeoPoint::new(input.from_latitude, input.from_longitude)?;
        let b = GeoPoint::new(input.to_latitude, input.to_longitude)?;
        Ok(geo::distance(&a, &b)?)
    }

    fn providers_resource(&self) -> Result<ProvidersResource, AppError> {
        let providers = self.scheduler()?.providers()?;
        Ok(ProvidersResource {
            total: providers.len(),
            providers,
        })
    }

    fn provider_resource(&self, provider_id: &str) -> Result<ProviderResource, AppError> {
        let scheduler = self.scheduler()?;
        let provider = scheduler.provider(provider_id)?;
        let services = scheduler.services(Some(provider_id))?;
        Ok(ProviderResource { provider, services })
    }

    fn read_resource_by_uri(&self, uri: &str) -> Result<ReadResourceResult, ErrorData> {
        let payload = if uri == PROVIDERS_URI {
            to_json(&self.providers_resource().map_err(map_app_error)?)?
        } else {
            match uri.strip_prefix(RESOURCE_PREFIX) {
                Some(id) if id.starts_with("prv-") => {
                    to_json(&self.provider_resource(id).map_err(map_app_error)?)?
                }
                _ => {
                    return Err(ErrorData::resource_not_found(
                        "Resource not found",
                        Some(serde_json::json!({ "uri": uri })),
                    ))
                }
            }
        };

        let contents = ResourceContents::TextResourceContents {
            uri: uri.to_string(),
            mime_type: Some("application/json".to_string()),
            text: payload,
            meta: None,
        };
        Ok(ReadResourceResult {
            contents: vec![contents],
        })
    }
}

#[tool_router(router = tool_router)]
impl SlotwiseMcp {
    /// Searches bookable slots by time, keyword and place.
    #[tool(
        name = "search_availability",
        description = "Search unbooked slots of available providers by time range, service keyword and distance."
    )]
    async fn search_availability(
        &self,
        params: Parameters<SearchAvailabilityInput>,
    ) -> Result<CallToolResult, ErrorData> {
        respond(self.search_tool(params.0))
    }

    /// Lists a provider's slots.
    #[tool(name = "list_slots", description = "List a provider's slots with optional filters.")]
    async fn list_slots(&self, params: Parameters<ListSlotsInput>) -> Result<CallToolResult, ErrorData> {
        respond(self.list_slots_tool(params.0))
    }

    /// Creates one slot.
    #[tool(
        name = "create_slot",
        description = "Create an availability slot for the acting provider. Rejects overlaps."
    )]
    async fn create_slot(&self, params: Parameters<CreateSlotInput>) -> Result<CallToolResult, ErrorData> {
        respond(self.create_slot_tool(params.0))
    }

    /// Generates slots across a date range.
    #[tool(
        name = "create_bulk_slots",
        description = "Create slots on selected weekdays across a date range, skipping overlaps."
    )]
    async fn create_bulk_slots(
        &self,
        params: Parameters<CreateBulkSlotsInput>,
    ) -> Result<CallToolResult, ErrorData> {
        respond(self.create_bulk_tool(params.0))
    }

    /// Deletes an unbooked slot.
    #[tool(name = "delete_slot", description = "Delete an unbooked slot of the acting provider.")]
    async fn delete_slot(&self, params: Parameters<DeleteSlotInput>) -> Result<CallToolResult, ErrorData> {
        respond(self.delete_slot_tool(params.0))
    }

    /// Creates a pending booking.
    #[tool(
        name = "create_booking",
        description = "Book a service for the acting customer. Rejects overlaps with the provider's bookings."
    )]
    async fn create_booking(
        &self,
        params: Parameters<CreateBookingInput>,
    ) -> Result<CallToolResult, ErrorData> {
        respond(self.create_booking_tool(params.0))
    }

    /// Reads a booking.
    #[tool(name = "show_booking", description = "Show a booking the actor takes part in.")]
    async fn show_booking(&self, params: Parameters<ShowBookingInput>) -> Result<CallToolResult, ErrorData> {
        respond(self.show_booking_tool(params.0))
    }

    /// Moves a booking through its lifecycle.
    #[tool(
        name = "update_booking_status",
        description = "Confirm, start, complete or cancel a booking."
    )]
    async fn update_booking_status(
        &self,
        params: Parameters<UpdateBookingStatusInput>,
    ) -> Result<CallToolResult, ErrorData> {
        respond(self.update_status_tool(params.0))
    }

    /// Great-circle distance between two points.
    #[tool(description = "Great-circle distance between two points in km and miles.")]
    async fn distance(&self, params: Parameters<DistanceInput>) -> Result<CallToolResult, ErrorData> {
        respond(self.distance_tool(params.0))
    }
}

#[tool_handler(router = self.tool_router)]
impl rmcp::ServerHandler for SlotwiseMcp {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::default(),
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_resources()
                .build(),
            server_info: Implementation {
                name: "slotwise".to_string(),
                title: Some("Slotwise MCP".to_string()),
                version: env!("CARGO_PKG_VERSION").to_string(),
                icons: None,
                website_url: None,
            },
            ..Default::default()
        }
    }

    async fn list_resources(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourcesResult, ErrorData> {
        let providers = RawResource {
            uri: PROVIDERS_URI.to_string(),
            name: "providers".to_string(),
            title: Some("Providers".to_string()),
            description: Some("Registered providers".to_string()),
            mime_type: Some("application/json".to_string()),
            size: None,
            icons: None,
            meta: None,
        }
        .no_annotation();

        Ok(ListResourcesResult::with_all_items(vec![providers]))
    }

    async fn list_resource_templates(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourceTemplatesResult, ErrorData> {
        let template = RawResourceTemplate {
            uri_template: "slotwise://prv-{id}".to_string(),
            name: "provider".to_string(),
            title: Some("Provider".to_string()),
            description: Some("A provider and its services".to_string()),
            mime_type: Some("application/json".to_string()),
            icons: None,
        }
        .no_annotation();

        Ok(ListResourceTemplatesResult::with_all_items(vec![template]))
    }

    async fn read_resource(
        &self,
        request: ReadResourceRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> Result<ReadResourceResult, ErrorData> {
        self.read_resource_by_uri(request.uri.as_str())
    }
}

fn point(latitude: Option<f64>, longitude: Option<f64>) -> Result<Option<GeoPoint>, AppError> {
    match (latitude, longitude) {
        (Some(lat), Some(lon)) => Ok(Some(GeoPoint::new(lat, lon)?)),
        (None, None) => Ok(None),
        _ => Err(AppError::InvalidInput(
            "latitude and longitude must be given together".to_string(),
        )),
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<String, ErrorData> {
    serde_json::to_string(value).map_err(|err| {
        ErrorData::internal_error("Failed to serialize response", Some(err.to_string().into()))
    })
}

fn respond<T: Serialize>(result: Result<T, AppError>) -> Result<CallToolResult, ErrorData> {
    let result = result.map_err(map_app_error)?;
    let payload = to_json(&SuccessEnvelope::new(result))?;
    Ok(CallToolResult::success(vec![Content::text(payload)]))
}

fn map_app_error(error: AppError) -> ErrorData {
    let envelope = ErrorEnvelope::from_error(&error);
    let data = serde_json::to_value(&envelope).ok();
    match envelope.code {
        ErrorCode::NotFound => ErrorData::resource_not_found(envelope.message, data),
        ErrorCode::ValidationError
        | ErrorCode::SchedulingConflict
        | ErrorCode::Unauthorized
        | ErrorCode::InvalidTransition
        | ErrorCode::AlreadyBooked
        | ErrorCode::SlotBooked
        | ErrorCode::InvalidInput
        | ErrorCode::RepoNotInitialized => ErrorData::invalid_params(envelope.message, data),
        ErrorCode::Unavailable | ErrorCode::IoError | ErrorCode::JsonError => {
            tracing::error!(code = ?envelope.code, message = %envelope.message, "tool failed");
            ErrorData::internal_error(envelope.message, data)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TimeWindowInput;
    use slotwise_core::{NewProvider, NewService};
    use tempfile::TempDir;

    struct Seeded {
        _temp: TempDir,
        server: SlotwiseMcp,
        provider_id: String,
        service_id: String,
    }

    fn seed() -> Seeded {
        let temp = TempDir::new().expect("Failed to create temp dir");
        let context = RepoContext::init(temp.path()).expect("init repo");
        let scheduler = context.open_scheduler().expect("open scheduler");
        let provider = scheduler
            .add_provider(
                NewProvider {
                    business_name: "Colaba Electricians".to_string(),
                    location: Some(GeoPoint::new(18.9067, 72.8147).unwrap()),
                    service_radius_km: Some(12.0),
                },
                now(),
            )
            .expect("add provider");
        let service = scheduler
            .add_service(
                &slotwise_core::Actor::provider(provider.id.clone()),
                NewService {
                    name: "Fan installation".to_string(),
                    category: "electrical".to_string(),
                    price_cents: 3000,
                    duration_minutes: Some(60),
                    location: None,
                },
            )
            .expect("add service");
        let server = server_for(&temp, false);
        Seeded {
            _temp: temp,
            server,
            provider_id: provider.id,
            service_id: service.id,
        }
    }

    fn server_for(temp: &TempDir, read_only: bool) -> SlotwiseMcp {
        SlotwiseMcp::new(McpOptions {
            repo: Some(temp.path().to_path_buf()),
            read_only,
            log_level: "info".to_string(),
            log_file: None,
        })
    }

    fn extract_text(result: ReadResourceResult) -> String {
        match &result.contents[0] {
            ResourceContents::TextResourceContents { text, .. } => text.clone(),
            ResourceContents::BlobResourceContents { .. } => {
                panic!("Unexpected blob resource contents")
            }
        }
    }

    #[test]
    fn test_slot_search_and_booking_lifecycle() {
        let seeded = seed();
        let server = &seeded.server;
        let provider = format!("provider:{}", seeded.provider_id);

        let slot = server
            .create_slot_tool(CreateSlotInput {
                actor: provider.clone(),
                start: "2099-06-01T10:00".to_string(),
                end: "2099-06-01T12:00".to_string(),
                repeat_weekday: None,
                notes: None,
            })
            .expect("create slot")
            .slot;

        let found = server
            .search_tool(SearchAvailabilityInput {
                keyword: Some("Electrical".to_string()),
                from: Some("2099-06-01T00:00".to_string()),
                to: Some("2099-06-02T00:00".to_string()),
                latitude: Some(18.9220),
                longitude: Some(72.8347),
                radius_km: Some(5.0),
                ..SearchAvailabilityInput::default()
            })
            .expect("search");
        assert_eq!(found.total, 1);
        assert_eq!(found.matches[0].slot.id, slot.id);

        let booking = server
            .create_booking_tool(CreateBookingInput {
                actor: "customer:cus-7".to_string(),
                service_id: seeded.service_id.clone(),
                scheduled_at: "2099-06-01T10:30".to_string(),
                slot_id: Some(slot.id.clone()),
                ..CreateBookingInput::default()
            })
            .expect("create booking")
            .booking;
        assert_eq!(booking.status, BookingStatus::Pending);

        let booked = server
            .list_slots_tool(ListSlotsInput {
                provider_id: seeded.provider_id.clone(),
                booked_only: Some(true),
                ..ListSlotsInput::default()
            })
            .expect("list slots");
        assert_eq!(booked.total, 1);

        let confirmed = server
            .update_status_tool(UpdateBookingStatusInput {
                actor: provider.clone(),
                booking_id: booking.id.clone(),
                status: "confirmed".to_string(),
                ..UpdateBookingStatusInput::default()
            })
            .expect("confirm")
            .booking;
        assert_eq!(confirmed.status, BookingStatus::Confirmed);

        let err = server
            .update_status_tool(UpdateBookingStatusInput {
                actor: "customer:cus-7".to_string(),
                booking_id: booking.id.clone(),
                status: "cancelled".to_string(),
                ..UpdateBookingStatusInput::default()
            })
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::ValidationError);

        let shown = server
            .show_booking_tool(ShowBookingInput {
                actor: "customer:cus-7".to_string(),
                booking_id: booking.id.clone(),
            })
            .expect("show");
        assert_eq!(shown.booking.status, BookingStatus::Confirmed);

        let err = server
            .delete_slot_tool(DeleteSlotInput {
                actor: provider,
                slot_id: slot.id,
            })
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::SlotBooked);
    }

    #[test]
    fn test_bulk_reports_skipped_candidates() {
        let seeded = seed();
        let provider = format!("provider:{}", seeded.provider_id);
        let input = CreateBulkSlotsInput {
            actor: provider,
            date_from: "2099-06-01".to_string(),
            date_to: "2099-06-07".to_string(),
            days: vec!["mon".to_string(), "tue".to_string()],
            times: vec![TimeWindowInput {
                start: "09:00".to_string(),
                end: "10:00".to_string(),
            }],
            notes: None,
        };

        let first = seeded.server.create_bulk_tool(input.clone()).expect("bulk");
        assert_eq!(first.created_count, 2);
        let second = seeded.server.create_bulk_tool(input).expect("bulk again");
        assert_eq!(second.created_count, 0);
        assert_eq!(second.skipped_count, 2);
    }

    #[test]
    fn test_read_only_refuses_mutations() {
        let seeded = seed();
        let server = server_for(&seeded._temp, true);

        let err = server
            .create_slot_tool(CreateSlotInput {
                actor: format!("provider:{}", seeded.provider_id),
                start: "2099-06-01T10:00".to_string(),
                end: "2099-06-01T11:00".to_string(),
                repeat_weekday: None,
                notes: None,
            })
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidInput);

        let listed = server
            .list_slots_tool(ListSlotsInput {
                provider_id: seeded.provider_id.clone(),
                ..ListSlotsInput::default()
            })
            .expect("reads still work");
        assert_eq!(listed.total, 0);
    }

    #[test]
    fn test_distance_tool() {
        let seeded = seed();
        let result = seeded
            .server
            .distance_tool(DistanceInput {
                from_latitude: 19.0760,
                from_longitude: 72.8777,
                to_latitude: 19.0760,
                to_longitude: 72.8777,
            })
            .expect("distance");
        assert_eq!(result.km, 0.0);

        let err = seeded
            .server
            .distance_tool(DistanceInput {
                from_latitude: 91.0,
                from_longitude: 0.0,
                to_latitude: 0.0,
                to_longitude: 0.0,
            })
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::ValidationError);
    }

    #[test]
    fn test_location_needs_both_coordinates() {
        let seeded = seed();
        let err = seeded
            .server
            .search_tool(SearchAvailabilityInput {
                latitude: Some(19.0),
                ..SearchAvailabilityInput::default()
            })
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidInput);
    }

    #[test]
    fn test_error_mapping_carries_envelope() {
        let not_found = map_app_error(AppError::Core(slotwise_core::Error::not_found(
            "booking",
            "bkg-0000000000",
        )));
        let data = not_found.data.expect("error data");
        assert_eq!(data["code"], "not_found");
        assert_eq!(data["details"]["id"], "bkg-0000000000");

        let conflict = map_app_error(AppError::Core(slotwise_core::Error::SchedulingConflict(
            Vec::new(),
        )));
        assert_eq!(conflict.data.expect("error data")["code"], "scheduling_conflict");
    }

    #[test]
    fn test_resources() {
        let seeded = seed();
        let listing = extract_text(
            seeded
                .server
                .read_resource_by_uri(PROVIDERS_URI)
                .expect("providers resource"),
        );
        assert!(listing.contains("Colaba Electricians"));

        let uri = format!("{}{}", RESOURCE_PREFIX, seeded.provider_id);
        let detail = extract_text(seeded.server.read_resource_by_uri(&uri).expect("provider"));
        assert!(detail.contains("Fan installation"));

        assert!(seeded.server.read_resource_by_uri("slotwise://nope").is_err());
    }

    #[test]
    fn test_parse_log_level() {
        assert_eq!(parse_log_level("DEBUG").unwrap(), Level::DEBUG);
        assert!(matches!(
            parse_log_level("loud"),
            Err(McpServerError::InvalidLogLevel(_))
        ));
    }
}

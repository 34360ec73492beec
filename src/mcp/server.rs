//! RxHub MCP Server Implementation
//!
//! Implements the MCP server with the patient hub tools.

use std::sync::Arc;

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::{schemars, tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::calculators::InsulinInput;
use crate::config::{HubConfig, ENV_FORM_ENDPOINT};
use crate::contact::{ContactFields, ContactFormController, HttpFormTransport, TransportError};
use crate::tools::calculators;
use crate::tools::contact;
use crate::tools::pages;
use crate::tools::status::StatusTracker;

/// RxHub MCP Service
#[derive(Clone)]
pub struct RxHubService {
    status_tracker: Arc<Mutex<StatusTracker>>,
    /// Shared contact form; `None` when no delivery endpoint is configured
    contact: Option<Arc<ContactFormController>>,
    tool_router: ToolRouter<RxHubService>,
}

impl RxHubService {
    pub fn new(form_endpoint: Option<String>, contact: Option<Arc<ContactFormController>>) -> Self {
        Self {
            status_tracker: Arc::new(Mutex::new(StatusTracker::new(form_endpoint))),
            contact,
            tool_router: Self::tool_router(),
        }
    }

    /// Build the service and its HTTP form transport from configuration
    pub fn from_config(config: &HubConfig) -> Result<Self, TransportError> {
        let Some(form) = &config.form else {
            return Ok(Self::new(None, None));
        };
        let transport = HttpFormTransport::new(form)?;
        let controller = ContactFormController::new(Arc::new(transport));
        Ok(Self::new(Some(form.endpoint.clone()), Some(Arc::new(controller))))
    }

    fn contact(&self) -> Option<&ContactFormController> {
        self.contact.as_deref()
    }
}

#[derive(Debug, Serialize)]
struct FormUnavailableResponse {
    error: String,
}

fn form_unavailable() -> Result<CallToolResult, McpError> {
    json_result(&FormUnavailableResponse {
        error: format!("Contact form is not configured (set {})", ENV_FORM_ENDPOINT),
    })
}

fn json_result<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| McpError::internal_error(format!("Serialization error: {}", e), None))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

// ============================================================================
// Calculator Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct CalculateBmiParams {
    /// Height: centimeters (metric) or inches (imperial)
    pub height: Option<f64>,
    /// Weight: kilograms (metric) or pounds (imperial)
    pub weight: Option<f64>,
    /// Unit system: metric (default) or imperial
    #[serde(default = "default_unit_system")]
    pub unit_system: String,
}

fn default_unit_system() -> String { "metric".to_string() }

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct CalculateInsulinDoseParams {
    /// Mode: mealtime (default) or correction
    #[serde(default = "default_insulin_mode")]
    pub mode: String,
    /// Grams of carbohydrate in the meal (mealtime)
    pub carb_grams: Option<f64>,
    /// Grams of carbohydrate covered by one unit of insulin (mealtime)
    pub carb_ratio: Option<f64>,
    /// Current blood glucose in mg/dL
    pub current_bg: Option<f64>,
    /// Target blood glucose in mg/dL
    pub target_bg: Option<f64>,
    /// Blood glucose drop in mg/dL per unit of insulin
    pub correction_factor: Option<f64>,
}

fn default_insulin_mode() -> String { "mealtime".to_string() }

// ============================================================================
// Site Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ResolvePageParams {
    /// Site path, e.g. /patient-hub
    pub path: String,
}

// ============================================================================
// Contact Form Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SubmitContactFormParams {
    /// Visitor's full name
    pub name: String,
    /// Visitor's email address (replies go here)
    pub email: String,
    /// Optional phone number
    #[serde(default)]
    pub phone: Option<String>,
    /// Optional reason for contact (e.g. prescriptions, vaccinations, general)
    #[serde(default)]
    pub reason: Option<String>,
    /// The message to send
    pub message: String,
    /// True only if the visitor agreed to the privacy policy
    #[serde(default)]
    pub privacy: bool,
}

impl From<SubmitContactFormParams> for ContactFields {
    fn from(p: SubmitContactFormParams) -> Self {
        Self {
            name: p.name,
            email: p.email,
            phone: p.phone.unwrap_or_default(),
            reason: p.reason.unwrap_or_default(),
            message: p.message,
            privacy: p.privacy,
        }
    }
}

// ============================================================================
// Tool Implementations
// ============================================================================

#[tool_router]
impl RxHubService {
    // --- Status ---

    #[tool(description = "Get the current status of the RxHub service including build info, contact form delivery, and process information")]
    async fn rxhub_status(&self) -> Result<CallToolResult, McpError> {
        let tracker = self.status_tracker.lock().await;
        json_result(&tracker.get_status())
    }

    #[tool(description = "Get instructions for the patient hub calculators and contact form. Call this before using the other tools for the first time.")]
    fn hub_instructions(&self) -> Result<CallToolResult, McpError> {
        use crate::tools::status::HUB_INSTRUCTIONS;
        Ok(CallToolResult::success(vec![Content::text(HUB_INSTRUCTIONS)]))
    }

    // --- Site ---

    #[tool(description = "List the pages of the pharmacy website with their paths")]
    fn list_pages(&self) -> Result<CallToolResult, McpError> {
        json_result(&pages::list_pages())
    }

    #[tool(description = "Resolve a website path (e.g. /patient-hub) to its page")]
    fn resolve_page(&self, Parameters(p): Parameters<ResolvePageParams>) -> Result<CallToolResult, McpError> {
        let result = pages::resolve_page(&p.path).map_err(|e| McpError::invalid_params(e, None))?;
        json_result(&result)
    }

    // --- Calculators ---

    #[tool(description = "Calculate Body Mass Index and weight category. Metric: height in cm, weight in kg. Imperial: height in inches, weight in pounds. Returns calculated=false (not an error) when input is incomplete.")]
    fn calculate_bmi(&self, Parameters(p): Parameters<CalculateBmiParams>) -> Result<CallToolResult, McpError> {
        let result = calculators::calculate_bmi(p.height, p.weight, &p.unit_system)
            .map_err(|e| McpError::invalid_params(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Estimate an insulin dose. mealtime: carb_grams / carb_ratio, plus a correction if current_bg, target_bg and correction_factor are all given. correction: (current_bg - target_bg) / correction_factor, never negative. Always show the returned disclaimer to the user.")]
    fn calculate_insulin_dose(&self, Parameters(p): Parameters<CalculateInsulinDoseParams>) -> Result<CallToolResult, McpError> {
        let input = InsulinInput {
            carb_grams: p.carb_grams,
            carb_ratio: p.carb_ratio,
            current_bg: p.current_bg,
            target_bg: p.target_bg,
            correction_factor: p.correction_factor,
            ..InsulinInput::default()
        };
        let result = calculators::calculate_insulin_dose(&p.mode, input)
            .map_err(|e| McpError::invalid_params(e, None))?;
        json_result(&result)
    }

    // --- Contact Form ---

    #[tool(description = "Submit the pharmacy contact form. name, email and message are required; privacy must be true (only if the visitor agreed to the privacy policy). Returns the outcome (delivered, invalid, failed, ignored) and the form state.")]
    async fn submit_contact_form(&self, Parameters(p): Parameters<SubmitContactFormParams>) -> Result<CallToolResult, McpError> {
        let Some(controller) = self.contact() else {
            return form_unavailable();
        };
        let result = contact::submit_contact_form(controller, p.into()).await;
        json_result(&result)
    }

    #[tool(description = "Get the current contact form state: phase, field errors, message, and entered values")]
    async fn get_contact_form_state(&self) -> Result<CallToolResult, McpError> {
        let Some(controller) = self.contact() else {
            return form_unavailable();
        };
        json_result(&contact::get_contact_form_state(controller).await)
    }

    #[tool(description = "Reset the contact form to a blank idle form. Required before sending another message after a successful submission.")]
    async fn reset_contact_form(&self) -> Result<CallToolResult, McpError> {
        let Some(controller) = self.contact() else {
            return form_unavailable();
        };
        json_result(&contact::reset_contact_form(controller).await)
    }
}

// ============================================================================
// Server Handler
// ============================================================================

#[tool_handler]
impl ServerHandler for RxHubService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "rxhub".into(),
                version: crate::build_info::VERSION.into(),
                title: Some("RxHub Patient Hub".into()),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "RxHub - pharmacy patient hub. \
                 IMPORTANT: Call hub_instructions first. \
                 Calculators: calculate_bmi, calculate_insulin_dose (always relay the disclaimer). \
                 Contact: submit_contact_form, get_contact_form_state, reset_contact_form. \
                 Site: list_pages, resolve_page. Status: rxhub_status."
                    .into(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use crate::config::FormConfig;

    #[test]
    fn test_from_config_without_endpoint() {
        let service = RxHubService::from_config(&HubConfig::default()).unwrap();
        assert!(service.contact().is_none());
    }

    #[test]
    fn test_from_config_with_endpoint() {
        let config = HubConfig {
            form: Some(FormConfig {
                endpoint: "https://forms.example.com/f/abc".to_string(),
                subject: "Website enquiry".to_string(),
                request_timeout: Duration::from_secs(10),
            }),
        };
        let service = RxHubService::from_config(&config).unwrap();
        assert_eq!(service.contact().map(|c| c.transport_name()), Some("http"));
    }

    #[test]
    fn test_params_into_fields() {
        let params: SubmitContactFormParams = serde_json::from_value(serde_json::json!({
            "name": "Dana Reyes",
            "email": "dana@example.com",
            "message": "Hello",
            "privacy": true
        }))
        .unwrap();
        let fields = ContactFields::from(params);
        assert_eq!(fields.phone, "");
        assert!(fields.privacy);
    }

    #[test]
    fn test_server_info_names_tools() {
        let service = RxHubService::new(None, None);
        let info = service.get_info();
        assert_eq!(info.server_info.name, "rxhub");
        assert!(info.instructions.unwrap().contains("calculate_insulin_dose"));
    }
}

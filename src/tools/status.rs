//! RxHub Status Tool
//!
//! Runtime status and usage instructions for the RxHub service.

use serde::Serialize;
use std::time::Instant;
use sysinfo::{Pid, ProcessesToUpdate, System};

use crate::build_info::BuildInfo;

/// Patient hub instructions for AI assistants
pub const HUB_INSTRUCTIONS: &str = r#"
# RxHub Patient Hub Instructions

RxHub exposes the patient hub of the pharmacy website: two educational
calculators and the contact form.

---

## BMI Calculator

**Tool:** `calculate_bmi(height, weight, unit_system)`

| unit_system | height | weight |
|-------------|--------|--------|
| `metric`    | centimeters | kilograms |
| `imperial`  | inches | pounds |

Categories (based on the unrounded value):

| BMI | Category |
|-----|----------|
| below 18.5 | Underweight |
| 18.5 - 24.9 | Normal weight |
| 25.0 - 29.9 | Overweight |
| 30.0 and above | Obesity |

If height or weight is missing or zero the tool answers `calculated: false`
with a hint. This is not an error; ask the user for the missing value.

---

## Insulin Dose Estimate

**Tool:** `calculate_insulin_dose(mode, ...)`

### Mealtime mode
- Required: `carb_grams`, `carb_ratio` (grams covered by one unit)
- Optional: `current_bg`, `target_bg`, `correction_factor`. The correction is
  only added when all three are given.

### Correction mode
- Required: `current_bg`, `target_bg` (mg/dL), `correction_factor` (mg/dL per unit)

A blood glucose at or below target never produces a negative correction.
When `calculated` is false, `missing_fields` lists what to ask for.

**ALWAYS repeat the `disclaimer` text to the user with any dose.** The
estimate is educational and must be confirmed with their care team.

---

## Contact Form

**Tool:** `submit_contact_form(name, email, phone?, reason?, message, privacy)`

- `name`, `email`, `message` are required; `privacy` must be `true` and only
  after the user has agreed to the privacy policy. Never set it on their behalf.
- Validation problems come back as `outcome: "invalid"` with `field_errors`.
- `outcome: "failed"` means the message was not delivered; the input is kept,
  so calling the tool again retries.
- After `outcome: "delivered"` the form is locked. Call `reset_contact_form`
  before sending another message.

Use `get_contact_form_state` to inspect the form at any time.
"#;

/// Runtime status of the RxHub service
#[derive(Debug, Clone, Serialize)]
pub struct HubStatus {
    /// Build information
    pub build_number: u64,
    pub build_timestamp: &'static str,
    pub version: &'static str,

    /// Contact form delivery
    pub contact_form_enabled: bool,
    pub form_endpoint: Option<String>,

    /// Process information
    pub uptime_seconds: u64,
    pub process_id: u32,
    pub memory_usage_bytes: u64,
}

/// Status tracker for collecting runtime information
pub struct StatusTracker {
    start_time: Instant,
    form_endpoint: Option<String>,
}

impl StatusTracker {
    pub fn new(form_endpoint: Option<String>) -> Self {
        Self {
            start_time: Instant::now(),
            form_endpoint,
        }
    }

    pub fn get_status(&self) -> HubStatus {
        let build_info = BuildInfo::current();

        let pid = std::process::id();
        let mut sys = System::new();
        sys.refresh_processes(ProcessesToUpdate::Some(&[Pid::from_u32(pid)]));

        let memory_usage_bytes = sys
            .process(Pid::from_u32(pid))
            .map(|p| p.memory())
            .unwrap_or(0);

        HubStatus {
            build_number: build_info.build_number,
            build_timestamp: build_info.build_timestamp,
            version: build_info.version,
            contact_form_enabled: self.form_endpoint.is_some(),
            form_endpoint: self.form_endpoint.clone(),
            uptime_seconds: self.start_time.elapsed().as_secs(),
            process_id: pid,
            memory_usage_bytes,
        }
    }
}

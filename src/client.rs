use std::sync::{Mutex, PoisonError, RwLock, RwLockReadGuard};
use std::time::Duration;

use serde_json::Value;
use tracing::{debug, trace, warn};

use crate::diff::status_events;
use crate::logger::{MessageLogMode, MessageLogger};
use crate::protocol::{
    command_url, parse_command_response, setpoint_form, switch_param, value_form, API_PREFIX,
    CMD_FAN_SPEED, CMD_KEYBOARD_LOCK, CMD_NIGHT_MODE, CMD_POWER_OFF, CMD_POWER_ON, CMD_ROTATION,
    CMD_SCHEDULING, CMD_SET_TEMP, CMD_STATUS, ROTATION_OFF, ROTATION_ON,
};
use crate::status::DeviceStatus;
use crate::types::{Event, FanSpeed, Mode};
use crate::{Error, Result};

/// Per-request ceiling so one unresponsive unit cannot hold the poll loop.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

type EventCallback = Box<dyn Fn(&Event) + Send + Sync>;
type Form = Vec<(&'static str, String)>;

pub struct InnovaClientBuilder {
    host: String,
    request_timeout: Duration,
    event_callbacks: Vec<EventCallback>,
    log_mode: Option<MessageLogMode>,
    log_path: Option<String>,
}

impl InnovaClientBuilder {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            event_callbacks: Vec::new(),
            log_mode: None,
            log_path: None,
        }
    }

    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn on_event(mut self, f: impl Fn(&Event) + Send + Sync + 'static) -> Self {
        self.event_callbacks.push(Box::new(f));
        self
    }

    pub fn message_log(mut self, mode: MessageLogMode, path: impl Into<String>) -> Self {
        self.log_mode = Some(mode);
        self.log_path = Some(path.into());
        self
    }

    pub fn build(self) -> Result<InnovaClient> {
        let http = reqwest::Client::builder()
            .timeout(self.request_timeout)
            .build()?;

        let logger = match (self.log_mode, self.log_path) {
            (Some(mode), Some(path)) => Some(Mutex::new(MessageLogger::new(mode, &path)?)),
            _ => None,
        };

        let host = self.host.trim().trim_end_matches('/').to_string();
        Ok(InnovaClient {
            http,
            base_url: base_url(&host),
            host,
            status: RwLock::new(DeviceStatus::default()),
            in_flight: tokio::sync::Mutex::new(()),
            event_callbacks: self.event_callbacks,
            logger,
        })
    }
}

/// HTTP client for one Innova unit, holding its last known status.
///
/// Refreshes and commands are serialized: at most one request is in flight
/// per client. The cached status is replaced wholesale by a refresh and
/// patched field-by-field when a command is acknowledged; readers always
/// see a complete snapshot.
pub struct InnovaClient {
    http: reqwest::Client,
    host: String,
    base_url: String,
    status: RwLock<DeviceStatus>,
    in_flight: tokio::sync::Mutex<()>,
    event_callbacks: Vec<EventCallback>,
    logger: Option<Mutex<MessageLogger>>,
}

impl InnovaClient {
    pub fn builder(host: impl Into<String>) -> InnovaClientBuilder {
        InnovaClientBuilder::new(host)
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    /// Copy of the cached status.
    pub fn status(&self) -> DeviceStatus {
        self.read_status().clone()
    }

    /// Serial, then uid, then the configured host. Never empty.
    pub fn unique_id(&self) -> String {
        self.read_status()
            .unique_id()
            .map(str::to_string)
            .unwrap_or_else(|| self.host.clone())
    }

    pub fn display_name(&self) -> String {
        let name = self.read_status().name.clone();
        name.unwrap_or_else(|| self.unique_id())
    }

    /// Fetches `/status` and replaces the cached status. On any failure the
    /// cache is left as it was and `false` is returned.
    pub async fn refresh(&self) -> bool {
        let _guard = self.in_flight.lock().await;
        match self.fetch_status().await {
            Ok(fresh) => {
                self.update_status(|status| *status = fresh);
                true
            }
            Err(e) => {
                warn!(host = %self.host, error = %e, "status refresh failed, keeping last known status");
                false
            }
        }
    }

    /// Posts a raw command. Succeeds only on HTTP 200 with `success: true`.
    /// Does not touch the cached status.
    pub async fn send_command(&self, path: &str, form: Option<&[(&str, String)]>) -> bool {
        let _guard = self.in_flight.lock().await;
        self.post_logged(path, form).await
    }

    // -- Command methods --

    pub async fn power_on(&self) -> bool {
        self.execute(CMD_POWER_ON, None, |s| s.power = true).await
    }

    pub async fn power_off(&self) -> bool {
        self.execute(CMD_POWER_OFF, None, |s| s.power = false).await
    }

    /// Sends the setpoint as given. Bounds are the device's call.
    pub async fn set_temperature(&self, temperature: f64) -> bool {
        self.execute(CMD_SET_TEMP, Some(setpoint_form(temperature)), move |s| {
            s.target_temperature = temperature
        })
        .await
    }

    pub async fn set_fan_speed(&self, speed: FanSpeed) -> bool {
        let form = value_form(speed.code().to_string());
        self.execute(CMD_FAN_SPEED, Some(form), move |s| s.fan_speed = Some(speed))
            .await
    }

    pub async fn set_mode(&self, mode: Mode) -> bool {
        let Some(path) = mode.command_path() else {
            warn!(error = %Error::UnsupportedMode(mode), "not sending mode command");
            return false;
        };
        self.execute(path, None, move |s| s.mode = mode).await
    }

    pub async fn rotation_on(&self) -> bool {
        let form = value_form(ROTATION_ON.to_string());
        self.execute(CMD_ROTATION, Some(form), |s| s.rotation_enabled = true)
            .await
    }

    pub async fn rotation_off(&self) -> bool {
        let form = value_form(ROTATION_OFF.to_string());
        self.execute(CMD_ROTATION, Some(form), |s| s.rotation_enabled = false)
            .await
    }

    pub async fn set_night_mode(&self, on: bool) -> bool {
        let form = value_form(switch_param(on));
        self.execute(CMD_NIGHT_MODE, Some(form), move |s| s.night_mode = Some(on))
            .await
    }

    pub async fn set_scheduling(&self, on: bool) -> bool {
        let form = value_form(switch_param(on));
        self.execute(CMD_SCHEDULING, Some(form), move |s| s.scheduling_mode = Some(on))
            .await
    }

    pub async fn set_keyboard_lock(&self, on: bool) -> bool {
        let form = value_form(switch_param(on));
        self.execute(CMD_KEYBOARD_LOCK, Some(form), move |s| s.keyboard_locked = Some(on))
            .await
    }

    // -- Helpers --

    fn read_status(&self) -> RwLockReadGuard<'_, DeviceStatus> {
        self.status.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn log(&self, f: impl FnOnce(&mut MessageLogger)) {
        if let Some(ref logger) = self.logger {
            f(&mut logger.lock().unwrap_or_else(PoisonError::into_inner));
        }
    }

    /// Sends a command and applies `patch` to the cache only if the device
    /// acknowledged it. The next refresh is what reconciles any drift.
    async fn execute(
        &self,
        path: &str,
        form: Option<Form>,
        patch: impl FnOnce(&mut DeviceStatus) + Send,
    ) -> bool {
        let _guard = self.in_flight.lock().await;
        if !self.post_logged(path, form.as_deref()).await {
            return false;
        }
        self.update_status(patch);
        true
    }

    async fn post_logged(&self, path: &str, form: Option<&[(&str, String)]>) -> bool {
        match self.post_command(path, form).await {
            Ok(()) => true,
            Err(e) => {
                warn!(host = %self.host, path, error = %e, "command failed");
                false
            }
        }
    }

    async fn fetch_status(&self) -> Result<DeviceStatus> {
        let url = command_url(&self.base_url, CMD_STATUS);
        debug!(url = %url, "fetching status");
        self.log(|l| l.log_request("GET", &format!("{API_PREFIX}/{CMD_STATUS}")));

        let resp = self.http.get(&url).send().await?.error_for_status()?;
        let http_status = resp.status().as_u16();
        let body = resp.text().await?;

        let raw: Value = serde_json::from_str(&body)
            .map_err(|e| Error::Protocol(format!("malformed status body: {e}")))?;
        if !raw.is_object() {
            return Err(Error::Protocol("status body is not a JSON object".to_string()));
        }

        self.log(|l| l.log_status(http_status, &raw));
        Ok(DeviceStatus::parse(&raw))
    }

    async fn post_command(&self, path: &str, form: Option<&[(&str, String)]>) -> Result<()> {
        let url = command_url(&self.base_url, path);
        debug!(url = %url, "sending command");
        self.log(|l| l.log_command(path, form.unwrap_or_default()));

        let mut request = self.http.post(&url);
        if let Some(form) = form {
            request = request.form(form);
        }

        let resp = request.send().await?;
        let code = resp.status().as_u16();
        if code != 200 {
            return Err(Error::Status(code));
        }
        let body = resp.text().await?;
        parse_command_response(&body, path)
    }

    fn update_status(&self, apply: impl FnOnce(&mut DeviceStatus)) {
        let (previous, current) = {
            let mut status = self.status.write().unwrap_or_else(PoisonError::into_inner);
            let previous = status.clone();
            apply(&mut status);
            (previous, status.clone())
        };

        let events = status_events(&previous, &current);
        if events.is_empty() {
            trace!("status unchanged");
            return;
        }

        for event in &events {
            for cb in &self.event_callbacks {
                cb(event);
            }
        }
        debug!(count = events.len(), "status changed");
    }
}

fn base_url(host: &str) -> String {
    if host.starts_with("http://") || host.starts_with("https://") {
        host.to_string()
    } else {
        format!("http://{host}")
    }
}

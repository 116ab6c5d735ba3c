use crux_core::Command;
use serde_valid::Validate;

use crate::device_request;
use crate::events::{Event, SettingsEvent};
use crate::http_helpers::{self, parse_json, Completion};
use crate::model::Model;
use crate::types::{
    sort_by_signal, ErrorBody, MessagePanel, SettingsUpdate, WebCredentials, WifiCredentials,
    WifiNetwork,
};
use crate::update_field;
use crate::Effect;

use super::view;

const CONFIG_ENDPOINT: &str = "/api/config";

/// User facing text of one settings form
struct SettingsCopy {
    blank: &'static str,
    success: &'static str,
    failure: &'static str,
    unreachable: &'static str,
}

const WEB_COPY: SettingsCopy = SettingsCopy {
    blank: "The user or password field was blank!",
    success: "The username and password were set successfully.",
    failure: "The user/password update failed.",
    unreachable: "Could not connect to the device, the username and password were not changed.",
};

const WIFI_COPY: SettingsCopy = SettingsCopy {
    blank: "The network name or password field was blank!",
    success: "The network name and password were set successfully. \
              The device will join the new network at the next restart.",
    failure: "The wifi configuration update failed.",
    unreachable: "Could not connect to the device, the wifi configuration was not changed.",
};

/// Handle settings form events (credentials, WiFi, network scan)
pub fn handle(event: SettingsEvent, model: &mut Model) -> Command<Effect, Event> {
    match event {
        SettingsEvent::UpdateCredentials { username, password } => {
            let credentials = WebCredentials { username, password };
            if let Err(e) = credentials.validate() {
                log::debug!("credentials rejected: {e}");
                return view::show_message(model, MessagePanel::error(WEB_COPY.blank), true);
            }
            submit(SettingsUpdate::Web(credentials), |completion| {
                Event::Settings(SettingsEvent::CredentialsResponse(completion))
            })
        }
        SettingsEvent::CredentialsResponse(completion) => {
            handle_settings_response(completion, &WEB_COPY, model)
        }

        SettingsEvent::UpdateWifiCredentials { ssid, password } => {
            let credentials = WifiCredentials { ssid, password };
            if let Err(e) = credentials.validate() {
                log::debug!("wifi credentials rejected: {e}");
                return view::show_message(model, MessagePanel::error(WIFI_COPY.blank), true);
            }
            submit(SettingsUpdate::Wifi(credentials), |completion| {
                Event::Settings(SettingsEvent::WifiCredentialsResponse(completion))
            })
        }
        SettingsEvent::WifiCredentialsResponse(completion) => {
            handle_settings_response(completion, &WIFI_COPY, model)
        }

        SettingsEvent::RequestWifiScan => {
            log::info!("requesting wifi network scan");
            device_request!(Settings, SettingsEvent, "/api/wifiScan", WifiScanResponse, method: get)
        }
        SettingsEvent::WifiScanResponse(completion) => handle_scan(completion, model),
    }
}

fn submit<F>(update: SettingsUpdate, on_complete: F) -> Command<Effect, Event>
where
    F: FnOnce(Completion) -> Event + Send + 'static,
{
    match serde_json::to_string(&update) {
        Ok(body) => {
            log::debug!("POST {CONFIG_ENDPOINT}");
            http_helpers::post(CONFIG_ENDPOINT, Some(body), on_complete)
        }
        Err(e) => {
            log::error!("failed to serialize settings update: {e}");
            Command::done()
        }
    }
}

fn handle_settings_response(
    completion: Completion,
    copy: &SettingsCopy,
    model: &mut Model,
) -> Command<Effect, Event> {
    match completion {
        Completion::Success(body) => {
            match parse_json::<serde_json::Value>("Settings update", &body) {
                Ok(_) => view::show_message(model, MessagePanel::info(copy.success), true),
                Err(e) => {
                    log::warn!("{e}");
                    Command::done()
                }
            }
        }
        Completion::Failed { status, body } => {
            let error = ErrorBody::message_from(&body);
            log::warn!("settings update rejected with HTTP {status}: {error}");
            view::show_message(
                model,
                MessagePanel::error(format!(
                    "The device returned an error: {error}. {}",
                    copy.failure
                )),
                true,
            )
        }
        Completion::Unreachable(reason) => {
            log::warn!("settings update failed: {reason}");
            view::show_message(model, MessagePanel::error(copy.unreachable), true)
        }
    }
}

fn handle_scan(completion: Completion, model: &mut Model) -> Command<Effect, Event> {
    match completion {
        Completion::Success(body) => match parse_json::<Vec<WifiNetwork>>("Wifi scan", &body) {
            Ok(mut networks) => {
                sort_by_signal(&mut networks);
                for network in &networks {
                    log::info!("wifi network {:?} rssi {}", network.ssid, network.rssi);
                }
                update_field!(model.wifi_networks, networks)
            }
            Err(e) => {
                log::warn!("{e}");
                Command::done()
            }
        },
        Completion::Failed { status, .. } => {
            log::warn!("wifi scan failed with HTTP {status}");
            Command::done()
        }
        Completion::Unreachable(reason) => view::show_unreachable(model, &reason),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{MessageKind, View};

    fn http_requests(
        command: &mut Command<Effect, Event>,
    ) -> Vec<crux_http::protocol::HttpRequest> {
        command
            .effects()
            .filter_map(|effect| match effect {
                Effect::Http(request) => Some(request.operation.clone()),
                _ => None,
            })
            .collect()
    }

    fn message_body(model: &Model) -> &str {
        model.message.as_ref().map(|m| m.body.as_str()).unwrap_or_default()
    }

    #[test]
    fn blank_username_is_rejected_before_sending() {
        let mut model = Model::default();

        let mut command = handle(
            SettingsEvent::UpdateCredentials {
                username: String::new(),
                password: "x".to_string(),
            },
            &mut model,
        );

        assert!(http_requests(&mut command).is_empty());
        assert_eq!(model.current_view, View::Messages);
        assert_eq!(message_body(&model), WEB_COPY.blank);
    }

    #[test]
    fn credentials_are_posted_as_web_object() {
        let mut model = Model::default();

        let mut command = handle(
            SettingsEvent::UpdateCredentials {
                username: "admin".to_string(),
                password: "secret".to_string(),
            },
            &mut model,
        );
        let requests = http_requests(&mut command);

        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, "POST");
        assert_eq!(requests[0].url, "http://device/api/config");
        let body: serde_json::Value =
            serde_json::from_slice(&requests[0].body).expect("json body");
        assert_eq!(
            body,
            serde_json::json!({"web": {"username": "admin", "password": "secret"}})
        );
    }

    #[test]
    fn wifi_rejection_shows_device_error() {
        let mut model = Model::default();

        let _ = handle(
            SettingsEvent::WifiCredentialsResponse(Completion::Failed {
                status: 500,
                body: br#"{"error":"bad ssid"}"#.to_vec(),
            }),
            &mut model,
        );

        assert_eq!(model.message.as_ref().map(|m| m.kind), Some(MessageKind::Error));
        assert!(message_body(&model).contains("bad ssid"));
        assert!(message_body(&model).contains(WIFI_COPY.failure));
    }

    #[test]
    fn rejection_without_error_field_uses_default() {
        let mut model = Model::default();

        let _ = handle(
            SettingsEvent::CredentialsResponse(Completion::Failed {
                status: 400,
                body: b"oops".to_vec(),
            }),
            &mut model,
        );

        assert!(message_body(&model).contains("Unknown error"));
    }

    #[test]
    fn malformed_success_body_is_ignored() {
        let mut model = Model::default();

        let _ = handle(
            SettingsEvent::CredentialsResponse(Completion::Success(b"<html>".to_vec())),
            &mut model,
        );

        assert_eq!(model, Model::default());
    }

    #[test]
    fn transport_failure_uses_connection_message() {
        let mut model = Model::default();

        let _ = handle(
            SettingsEvent::WifiCredentialsResponse(Completion::Unreachable(
                "refused".to_string(),
            )),
            &mut model,
        );

        assert_eq!(message_body(&model), WIFI_COPY.unreachable);
    }

    #[test]
    fn scan_results_are_sorted_strongest_first() {
        let mut model = Model::default();
        let body = br#"[{"ssid":"A","rssi":-80},{"ssid":"B","rssi":-40,"channel":6}]"#;

        let _ = handle(
            SettingsEvent::WifiScanResponse(Completion::Success(body.to_vec())),
            &mut model,
        );

        let ssids: Vec<_> = model.wifi_networks.iter().map(|n| n.ssid.as_str()).collect();
        assert_eq!(ssids, vec!["B", "A"]);
        assert_eq!(
            model.wifi_networks[0].extra.get("channel"),
            Some(&serde_json::json!(6))
        );
    }
}

/// Macro for model field updates with automatic rendering.
/// Supports both single and multiple field updates.
///
/// # Examples
///
/// Single field update:
/// ```ignore
/// update_field!(model.wifi_networks, networks)
/// ```
///
/// Multiple field updates:
/// ```ignore
/// update_field!(
///     model.current_view, View::Home;
///     model.message, None
/// )
/// ```
#[macro_export]
macro_rules! update_field {
    // Multiple field updates (must come first to match the pattern)
    ($($model_field:expr, $value:expr);+ $(;)?) => {{
        let mut changed = false;
        $(
            let value = $value;
            if $model_field != value {
                $model_field = value;
                changed = true;
            }
        )+
        if changed {
            crux_core::render::render()
        } else {
            crux_core::Command::done()
        }
    }};

    // Single field update
    ($model_field:expr, $value:expr) => {{
        update_field!($model_field, $value;)
    }};
}

/// Macro for body-less device requests whose completion is wrapped into a
/// domain response event.
///
/// # Patterns
///
/// Pattern 1: POST without body
/// ```ignore
/// device_request!(Door, DoorEvent, "/api/door1", ActivateResponse)
/// ```
///
/// Pattern 2: GET
/// ```ignore
/// device_request!(Settings, SettingsEvent, "/api/wifiScan", WifiScanResponse, method: get)
/// ```
#[macro_export]
macro_rules! device_request {
    ($domain:ident, $domain_event:ident, $endpoint:expr, $response_event:ident) => {{
        log::debug!("POST {}", $endpoint);
        $crate::http_helpers::post(&$endpoint, None, |completion| {
            $crate::events::Event::$domain($crate::events::$domain_event::$response_event(
                completion,
            ))
        })
    }};

    ($domain:ident, $domain_event:ident, $endpoint:expr, $response_event:ident, method: get) => {{
        log::debug!("GET {}", $endpoint);
        $crate::http_helpers::get(&$endpoint, |completion| {
            $crate::events::Event::$domain($crate::events::$domain_event::$response_event(
                completion,
            ))
        })
    }};
}

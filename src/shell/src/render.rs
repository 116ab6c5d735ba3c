use garage_panel_core::{DeviceConfig, Model, View};
use std::fmt::Write;

/// Render the view model as the text page shown to the user
pub fn render(model: &Model) -> String {
    let mut page = String::new();

    match model.current_view {
        View::Home => home(model, &mut page),
        View::Messages => messages(model, &mut page),
    }

    if !model.wifi_networks.is_empty() {
        let _ = writeln!(page, "-- wifi networks --");
        for network in &model.wifi_networks {
            let _ = writeln!(page, "  {:<32} {:>4} dBm", network.ssid, network.rssi);
        }
    }

    if let Some(config) = &model.device_config {
        let _ = writeln!(page, "-- device --");
        device_summary(config, &mut page);
    }

    page
}

fn home(model: &Model, page: &mut String) {
    let _ = writeln!(page, "== garage ==");
    for door in model.visible_doors() {
        let icon = model
            .doors
            .icon(door)
            .map(|icon| icon.resource())
            .unwrap_or("-");
        let _ = writeln!(page, "  {:<10} {icon}", door.label());
    }

    let layout = model.door_layout();
    if layout.spacer_visible {
        let _ = writeln!(page);
    }
    let _ = writeln!(page, "  [{}] show door two", layout.check_mark.class());
}

fn messages(model: &Model, page: &mut String) {
    match &model.message {
        Some(message) => {
            let _ = writeln!(page, "== {} ==", message.title);
            let _ = writeln!(page, "  {}", message.body);
        }
        None => {
            let _ = writeln!(page, "== messages ==");
        }
    }
}

fn device_summary(config: &DeviceConfig, page: &mut String) {
    if let Some(web) = &config.web {
        if let Some(hostname) = &web.hostname {
            let _ = writeln!(page, "  hostname   {hostname}");
        }
        if let Some(username) = &web.username {
            let _ = writeln!(page, "  admin      {username}");
        }
    }
    if let Some(wifi) = &config.wifi {
        if let Some(ssid) = &wifi.ssid {
            let _ = writeln!(page, "  network    {ssid}");
        }
        if let Some(ap_ssid) = &wifi.ap_ssid {
            let _ = writeln!(page, "  ap         {ap_ssid}");
        }
    }
    if let Some(server) = config.ntp.as_ref().and_then(|ntp| ntp.server.as_ref()) {
        let _ = writeln!(page, "  ntp        {server}");
    }
    if let Some(server) = config.syslog.as_ref().and_then(|syslog| syslog.server.as_ref()) {
        let _ = writeln!(page, "  syslog     {server}");
    }
}

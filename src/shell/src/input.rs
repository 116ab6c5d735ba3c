use anyhow::{bail, Context, Result};
use garage_panel_core::{
    DeviceEvent, DoorEvent, DoorId, Event, SettingsEvent, View, Visibility,
};

/// Help text listing the accepted gestures
pub const USAGE: &str = "\
commands:
  open <1|2>                  activate a door
  toggle                      show or hide the second door
  home | messages             switch view
  show | hide                 page visibility
  refresh                     refresh door states
  reset | restart             factory reset or restart the device
  password <user> <pass>      set the admin credentials
  wifi <ssid> <pass>          set the station network
                              (quote values containing spaces)
  scan                        scan wifi networks
  firmware [file]             upload a firmware image
  filesystem [file]           upload a filesystem image
  quit";

/// A parsed line of user input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Gesture {
    Event(Event),
    Help,
    Quit,
}

/// Parse one input line; blank lines yield `None`.
///
/// Words follow shell quoting, so `wifi "My Net" secret` keeps the space in
/// the network name.
pub fn parse(line: &str) -> Result<Option<Gesture>> {
    let words = shlex::split(line).context("unbalanced quotes in input")?;
    let Some((command, args)) = words.split_first() else {
        return Ok(None);
    };
    let args: Vec<&str> = args.iter().map(String::as_str).collect();

    let event = match (command.to_ascii_lowercase().as_str(), args.as_slice()) {
        ("quit" | "exit", []) => return Ok(Some(Gesture::Quit)),
        ("help" | "?", _) => return Ok(Some(Gesture::Help)),

        ("open", [door]) => Event::Door(DoorEvent::Activate(door_id(door)?)),
        ("toggle", []) => Event::Door(DoorEvent::ToggleDoorTwo),
        ("refresh", []) => Event::Door(DoorEvent::RefreshStatus),

        ("home", []) => Event::ShowView(View::Home),
        ("messages", []) => Event::ShowView(View::Messages),
        ("show", []) => Event::VisibilityChanged(Visibility::Visible),
        ("hide", []) => Event::VisibilityChanged(Visibility::Hidden),

        ("reset", []) => Event::Device(DeviceEvent::FactoryReset),
        ("restart", []) => Event::Device(DeviceEvent::Restart),
        ("firmware", file) => Event::Device(DeviceEvent::SubmitFirmwareImage {
            file: optional_file(file)?,
        }),
        ("filesystem", file) => Event::Device(DeviceEvent::SubmitFilesystemImage {
            file: optional_file(file)?,
        }),

        // missing fields are sent blank so the core reports them
        ("password", fields) if fields.len() <= 2 => {
            Event::Settings(SettingsEvent::UpdateCredentials {
                username: field(fields, 0),
                password: field(fields, 1),
            })
        }
        ("wifi", fields) if fields.len() <= 2 => {
            Event::Settings(SettingsEvent::UpdateWifiCredentials {
                ssid: field(fields, 0),
                password: field(fields, 1),
            })
        }
        ("scan", []) => Event::Settings(SettingsEvent::RequestWifiScan),

        (command, _) => bail!("unrecognized input {command:?}, type 'help' for commands"),
    };

    Ok(Some(Gesture::Event(event)))
}

fn door_id(value: &str) -> Result<DoorId> {
    match value
        .parse::<u8>()
        .with_context(|| format!("invalid door {value:?}"))?
    {
        1 => Ok(DoorId::One),
        2 => Ok(DoorId::Two),
        other => bail!("invalid door {other}, expected 1 or 2"),
    }
}

fn optional_file(args: &[&str]) -> Result<Option<String>> {
    match args {
        [] => Ok(None),
        [file] => Ok(Some((*file).to_string())),
        _ => bail!("expected at most one file"),
    }
}

fn field(fields: &[&str], index: usize) -> String {
    fields.get(index).map(|s| s.to_string()).unwrap_or_default()
}

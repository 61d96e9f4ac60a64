use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_io::{Timer, block_on};
use tracing::{info, warn};
use zbus::{Connection, interface};
use zvariant::{ObjectPath, OwnedValue, Value};

use crate::catalog::TrackDescriptor;
use crate::control::{Command, CommandSender};
use crate::error::PlayerError;

const OBJECT_PATH: &str = "/org/mpris/MediaPlayer2";
const BUS_NAME: &str = "org.mpris.MediaPlayer2.segue";

#[derive(Debug, Default)]
struct SharedState {
    playing: bool,
    track_id: Option<String>,
    title: Option<String>,
    artist: Option<String>,
    art_url: Option<String>,
    length_micros: Option<i64>,
}

/// Handle the event loop uses to publish what the media session shows.
pub struct MprisHandle {
    state: Arc<Mutex<SharedState>>,
}

impl MprisHandle {
    pub fn set_playing(&self, playing: bool) {
        if let Ok(mut s) = self.state.lock() {
            s.playing = playing;
        }
    }

    pub fn set_track(&self, index: usize, track: &TrackDescriptor) {
        if let Ok(mut s) = self.state.lock() {
            s.track_id = Some(format!("{OBJECT_PATH}/track/{index}"));
            s.title = Some(track.title.clone());
            s.artist = (!track.artist.is_empty()).then(|| track.artist.clone());
            s.art_url = (!track.cover.is_empty()).then(|| track.cover.clone());
            s.length_micros = i64::try_from(track.duration().as_micros()).ok();
        }
    }
}

struct RootIface {
    commands: CommandSender,
}

#[interface(name = "org.mpris.MediaPlayer2")]
impl RootIface {
    fn raise(&self) {}

    fn quit(&self) {
        self.commands.send(Command::Quit);
    }

    #[zbus(property)]
    fn can_quit(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_raise(&self) -> bool {
        false
    }

    #[zbus(property)]
    fn has_track_list(&self) -> bool {
        false
    }

    #[zbus(property)]
    fn identity(&self) -> &str {
        "segue"
    }

    #[zbus(property)]
    fn supported_uri_schemes(&self) -> Vec<String> {
        vec![]
    }

    #[zbus(property)]
    fn supported_mime_types(&self) -> Vec<String> {
        vec![]
    }
}

struct PlayerIface {
    commands: CommandSender,
    state: Arc<Mutex<SharedState>>,
}

fn owned(value: Value<'_>) -> Option<OwnedValue> {
    OwnedValue::try_from(value).ok()
}

#[interface(name = "org.mpris.MediaPlayer2.Player")]
impl PlayerIface {
    fn next(&self) {
        self.commands.send(Command::Next);
    }

    fn previous(&self) {
        self.commands.send(Command::Previous);
    }

    fn play(&self) {
        self.commands.send(Command::Play);
    }

    fn pause(&self) {
        self.commands.send(Command::Pause);
    }

    fn play_pause(&self) {
        self.commands.send(Command::TogglePlay);
    }

    // There is no stopped state; stopping holds the position like pause.
    fn stop(&self) {
        self.commands.send(Command::Pause);
    }

    #[zbus(property)]
    fn playback_status(&self) -> &str {
        match self.state.lock() {
            Ok(s) if s.playing => "Playing",
            _ => "Paused",
        }
    }

    #[zbus(property)]
    fn can_control(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_play(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_pause(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_go_next(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_go_previous(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_seek(&self) -> bool {
        false
    }

    #[zbus(property)]
    fn metadata(&self) -> HashMap<String, OwnedValue> {
        let mut map = HashMap::new();
        let Ok(s) = self.state.lock() else {
            return map;
        };

        let track_id = s
            .track_id
            .as_deref()
            .and_then(|id| ObjectPath::try_from(id).ok())
            .and_then(|path| owned(Value::from(path)));
        if let Some(v) = track_id {
            map.insert("mpris:trackid".to_string(), v);
        }
        if let Some(v) = s.title.clone().and_then(|t| owned(Value::from(t))) {
            map.insert("xesam:title".to_string(), v);
        }
        if let Some(v) = s.artist.clone().and_then(|a| owned(Value::from(vec![a]))) {
            map.insert("xesam:artist".to_string(), v);
        }
        if let Some(v) = s.art_url.clone().and_then(|u| owned(Value::from(u))) {
            map.insert("mpris:artUrl".to_string(), v);
        }
        if let Some(v) = s.length_micros.and_then(|l| owned(Value::from(l))) {
            map.insert("mpris:length".to_string(), v);
        }
        map
    }
}

/// Publish the player on the session bus from a background thread.
///
/// Without a session bus the handle still works; nothing is published and a
/// warning is logged.
pub fn spawn_mpris(commands: CommandSender) -> MprisHandle {
    let state = Arc::new(Mutex::new(SharedState::default()));

    let state_for_thread = state.clone();
    std::thread::spawn(move || {
        block_on(async move {
            if let Err(e) = serve(commands, state_for_thread).await {
                warn!(error = %e, "media session controls disabled");
            }
        });
    });

    MprisHandle { state }
}

async fn serve(
    commands: CommandSender,
    state: Arc<Mutex<SharedState>>,
) -> Result<(), PlayerError> {
    let unsupported = |e: zbus::Error| PlayerError::Unsupported {
        feature: "media session",
        reason: e.to_string(),
    };

    let connection = Connection::session().await.map_err(unsupported)?;
    connection.request_name(BUS_NAME).await.map_err(unsupported)?;

    let object_server = connection.object_server();
    object_server
        .at(
            OBJECT_PATH,
            RootIface {
                commands: commands.clone(),
            },
        )
        .await
        .map_err(unsupported)?;
    object_server
        .at(OBJECT_PATH, PlayerIface { commands, state })
        .await
        .map_err(unsupported)?;
    info!(name = BUS_NAME, "media session controls registered");

    loop {
        Timer::after(std::time::Duration::from_secs(3600)).await;
    }
}

use crate::mpris::MprisHandle;
use crate::playback::AudioBackend;
use crate::player::Player;

/// What was last pushed to the media session.
#[derive(Debug, Default)]
pub struct Published {
    index: Option<usize>,
    playing: Option<bool>,
}

/// Push the active track and play state to MPRIS when either changed.
/// Returns `true` if anything was published.
pub fn update_mpris<B: AudioBackend>(
    mpris: &MprisHandle,
    player: &Player<B>,
    published: &mut Published,
) -> bool {
    let state = player.snapshot();
    let playing = player.is_active();
    let mut changed = false;

    if published.index != Some(state.index) {
        if let Some(track) = player.current_track() {
            mpris.set_track(state.index, track);
        }
        published.index = Some(state.index);
        changed = true;
    }
    if published.playing != Some(playing) {
        mpris.set_playing(playing);
        published.playing = Some(playing);
        changed = true;
    }
    changed
}

//! Editable draft of the settings behind the options dialog.

use crate::settings::{
    AnimationSpeed, AppSettings, MAXIMUM_FRAMES_PER_SECOND, MAXIMUM_MAXIMUM_HEARTS, MAXIMUM_SCALE,
    MINIMUM_FRAMES_PER_SECOND, MINIMUM_MAXIMUM_HEARTS, MINIMUM_SCALE,
};

/// Values bound to the dialog widgets. Nothing reaches the running settings
/// until [`OptionsState::apply_to_settings`] is called.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionsState {
    pub frames_per_second: i32,
    pub maximum_hearts: i32,
    pub scale: i32,
    pub animation_speed: AnimationSpeed,
    pub show_status: bool,
    pub show_help: bool,
}

impl OptionsState {
    pub fn from_settings(settings: &AppSettings) -> Self {
        Self {
            frames_per_second: settings.frames_per_second(),
            maximum_hearts: settings.maximum_hearts(),
            scale: settings.scale(),
            animation_speed: settings.animation_speed,
            show_status: settings.show_status,
            show_help: settings.show_help,
        }
    }

    /// Copy the draft into settings; out-of-range values are clamped by the setters.
    pub fn apply_to_settings(&self, settings: &mut AppSettings) {
        settings.set_frames_per_second(self.frames_per_second);
        settings.set_maximum_hearts(self.maximum_hearts);
        settings.set_scale(self.scale);
        settings.animation_speed = self.animation_speed;
        settings.show_status = self.show_status;
        settings.show_help = self.show_help;
    }

    /// True when applying the draft would change `settings`.
    pub fn is_dirty(&self, settings: &AppSettings) -> bool {
        let mut applied = settings.clone();
        self.apply_to_settings(&mut applied);
        applied != *settings
    }

    pub fn reset_to_defaults(&mut self) {
        *self = Self::from_settings(&AppSettings::default());
    }

    pub fn frames_per_second_range() -> std::ops::RangeInclusive<i32> {
        MINIMUM_FRAMES_PER_SECOND..=MAXIMUM_FRAMES_PER_SECOND
    }

    pub fn maximum_hearts_range() -> std::ops::RangeInclusive<i32> {
        MINIMUM_MAXIMUM_HEARTS..=MAXIMUM_MAXIMUM_HEARTS
    }

    pub fn scale_range() -> std::ops::RangeInclusive<i32> {
        MINIMUM_SCALE..=MAXIMUM_SCALE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_draft_is_clean() {
        let settings = AppSettings::default();
        let state = OptionsState::from_settings(&settings);
        assert!(!state.is_dirty(&settings));
    }

    #[test]
    fn edits_mark_dirty_until_applied() {
        let mut settings = AppSettings::default();
        let mut state = OptionsState::from_settings(&settings);
        state.maximum_hearts = 80;
        state.animation_speed = AnimationSpeed::Fast;
        assert!(state.is_dirty(&settings));

        state.apply_to_settings(&mut settings);
        assert_eq!(settings.maximum_hearts(), 80);
        assert_eq!(settings.animation_speed, AnimationSpeed::Fast);
        assert!(!state.is_dirty(&settings));
    }

    #[test]
    fn out_of_range_values_are_clamped_on_apply() {
        let mut settings = AppSettings::default();
        let mut state = OptionsState::from_settings(&settings);
        state.frames_per_second = 500;
        state.scale = -3;
        state.apply_to_settings(&mut settings);
        assert_eq!(settings.frames_per_second(), MAXIMUM_FRAMES_PER_SECOND);
        assert_eq!(settings.scale(), MINIMUM_SCALE);
    }

    #[test]
    fn reset_restores_defaults() {
        let mut settings = AppSettings::default();
        settings.set_scale(15);
        settings.show_status = true;
        let mut state = OptionsState::from_settings(&settings);

        state.reset_to_defaults();
        assert_eq!(state, OptionsState::from_settings(&AppSettings::default()));
        assert!(state.is_dirty(&settings));
    }
}

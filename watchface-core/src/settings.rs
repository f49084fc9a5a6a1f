//! Persisted display settings and the configuration keys that change them.

use crate::record::{RecordStore, KEY_SETTINGS};

const SETTINGS_RECORD_VERSION: u8 = 1;

const FLAG_SHOW_DATE: u8 = 1 << 0;
const FLAG_SHOW_BATTERY: u8 = 1 << 1;
const FLAG_BOLD_FONT: u8 = 1 << 2;
const FLAG_LARGER_FONT: u8 = 1 << 3;
const FLAG_BIG_SECOND_HAND: u8 = 1 << 4;

/// Keys of the inbound configuration message.
#[derive(Clone, Copy, PartialEq, Eq, Debug, num_derive::FromPrimitive, num_derive::ToPrimitive)]
pub enum ConfigKey {
    ShowDate = 0,
    ShowBattery,
    UseBoldFont,
    UseLargerFont,
    StopwatchUsesBigSecondHand,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Settings {
    pub show_date: bool,
    pub show_battery: bool,
    pub use_bold_font: bool,
    pub use_larger_font: bool,
    pub stopwatch_uses_big_second_hand: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            show_date: false,
            show_battery: false,
            use_bold_font: false,
            use_larger_font: false,
            stopwatch_uses_big_second_hand: true,
        }
    }
}

impl Settings {
    pub fn apply(&mut self, key: ConfigKey, value: bool) {
        match key {
            ConfigKey::ShowDate => self.show_date = value,
            ConfigKey::ShowBattery => self.show_battery = value,
            ConfigKey::UseBoldFont => self.use_bold_font = value,
            ConfigKey::UseLargerFont => self.use_larger_font = value,
            ConfigKey::StopwatchUsesBigSecondHand => self.stopwatch_uses_big_second_hand = value,
        }
    }

    /// Whether the date/battery row is reserved at the top of the screen.
    pub fn has_header(&self) -> bool {
        self.show_date || self.show_battery
    }

    /// Layout: version byte, then one flag byte.
    pub fn to_record(&self) -> [u8; 2] {
        let mut flags = 0u8;
        if self.show_date {
            flags |= FLAG_SHOW_DATE;
        }
        if self.show_battery {
            flags |= FLAG_SHOW_BATTERY;
        }
        if self.use_bold_font {
            flags |= FLAG_BOLD_FONT;
        }
        if self.use_larger_font {
            flags |= FLAG_LARGER_FONT;
        }
        if self.stopwatch_uses_big_second_hand {
            flags |= FLAG_BIG_SECOND_HAND;
        }
        [SETTINGS_RECORD_VERSION, flags]
    }

    pub fn from_record(data: &[u8]) -> Option<Self> {
        match data {
            [SETTINGS_RECORD_VERSION, flags] => Some(Self {
                show_date: flags & FLAG_SHOW_DATE != 0,
                show_battery: flags & FLAG_SHOW_BATTERY != 0,
                use_bold_font: flags & FLAG_BOLD_FONT != 0,
                use_larger_font: flags & FLAG_LARGER_FONT != 0,
                stopwatch_uses_big_second_hand: flags & FLAG_BIG_SECOND_HAND != 0,
            }),
            _ => None,
        }
    }

    pub fn load<S: RecordStore>(store: &S) -> Self {
        store
            .load(KEY_SETTINGS)
            .and_then(|data| Self::from_record(&data))
            .unwrap_or_default()
    }

    pub fn save<S: RecordStore>(&self, store: &mut S) {
        if let Err(e) = store.save(KEY_SETTINGS, &self.to_record()) {
            log::error!("Failed to save settings: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::MemoryStore;
    use num_traits::FromPrimitive;

    #[test]
    fn test_defaults() {
        let s = Settings::default();
        assert!(!s.show_date);
        assert!(!s.show_battery);
        assert!(!s.use_bold_font);
        assert!(!s.use_larger_font);
        assert!(s.stopwatch_uses_big_second_hand);
        assert!(!s.has_header());
    }

    #[test]
    fn test_apply_each_key() {
        let mut s = Settings::default();
        s.apply(ConfigKey::ShowDate, true);
        s.apply(ConfigKey::UseLargerFont, true);
        s.apply(ConfigKey::StopwatchUsesBigSecondHand, false);
        assert!(s.show_date);
        assert!(s.use_larger_font);
        assert!(!s.stopwatch_uses_big_second_hand);
        assert!(!s.show_battery);
        assert!(s.has_header());
    }

    #[test]
    fn test_key_ids() {
        assert_eq!(ConfigKey::from_u32(0), Some(ConfigKey::ShowDate));
        assert_eq!(ConfigKey::from_u32(4), Some(ConfigKey::StopwatchUsesBigSecondHand));
        assert_eq!(ConfigKey::from_u32(5), None);
    }

    #[test]
    fn test_record_flags() {
        let s = Settings {
            show_date: true,
            show_battery: false,
            use_bold_font: true,
            use_larger_font: false,
            stopwatch_uses_big_second_hand: true,
        };
        assert_eq!(s.to_record(), [1, 0b10101]);
        assert_eq!(Settings::from_record(&s.to_record()), Some(s));
        assert_eq!(Settings::from_record(&[2, 0]), None);
        assert_eq!(Settings::from_record(&[1]), None);
    }

    #[test]
    fn test_load_falls_back_to_defaults() {
        let mut store = MemoryStore::new();
        assert_eq!(Settings::load(&store), Settings::default());

        store.save(KEY_SETTINGS, &[0xff, 0xff, 0xff]).ok();
        assert_eq!(Settings::load(&store), Settings::default());

        let mut s = Settings::default();
        s.show_battery = true;
        s.save(&mut store);
        assert_eq!(Settings::load(&store), s);
    }
}
